//! Read-only queries over the catalog's tables
//!
//! Every query validates its key, filters, aggregates and returns a
//! structured value. Display strings are left to the API layer.

pub mod best_developer_year;
pub mod developer;
pub mod genre;
pub mod recommendations;
pub mod reviews;
pub mod user_data;

/// Column names the datasets are expected to carry
pub(crate) mod columns {
    pub const DEVELOPER: &str = "developer";
    pub const GENRES: &str = "genres";
    pub const ITEM_ID: &str = "item_id";
    pub const PLAYTIME: &str = "playtime_forever";
    pub const PRICE: &str = "price";
    pub const RECOMMEND: &str = "recommend";
    pub const RECOMMENDATIONS: &str = "recommendations";
    pub const RELEASE_YEAR: &str = "release_year";
    pub const SENTIMENT: &str = "sentiment_analysis";
    pub const USER_ID: &str = "user_id";
}

/// Rounds to two decimal places, halves to even
pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round_ties_even() / 100.0
}
