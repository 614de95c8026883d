use serde::Serialize;

use crate::store::Value;

mod sentiment;

pub use sentiment::Sentiment;

/// One release year of a developer's catalog
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DeveloperYearStats {
    pub release_year: i64,
    pub item_count: u64,
    /// Share of zero-price items, in percent, rounded to 2 decimals
    pub free_percentage: f64,
}

/// Spending and review habits of one user
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserSummary {
    pub user_id: String,
    pub total_spend: f64,
    /// Recommending rows over all of the user's rows, in percent
    pub recommend_percentage: f64,
    pub distinct_item_count: usize,
    pub record_count: usize,
}

/// Hours played in one release year
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct YearPlaytime {
    pub release_year: i64,
    pub hours: f64,
}

/// The user with the most playtime in a genre
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GenreChampion {
    pub genre: String,
    pub user_id: String,
    pub play_history: Vec<YearPlaytime>,
}

/// Top three developers of a year, best first
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TopDevelopers {
    pub year: i64,
    pub podium: [String; 3],
}

/// Positive/negative review counts for a developer
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReviewSummary {
    pub developer: String,
    pub negative: usize,
    pub positive: usize,
    pub total: usize,
}

/// Precomputed similar items for one game
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GameRecommendations {
    pub item_id: String,
    pub recommendations: Vec<Value>,
}
