use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;
use serde_json::{json, Value as JsonValue};
use std::collections::HashMap;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{
        DeveloperYearStats, GameRecommendations, GenreChampion, ReviewSummary, TopDevelopers,
        UserSummary,
    },
    services,
    store::{Dataset, DatasetStatus, Value},
};

use super::AppState;

// Response types

#[derive(Debug, Serialize)]
pub struct DeveloperYearResponse {
    pub release_year: i64,
    pub item_count: u64,
    pub free_content: String,
}

impl From<&DeveloperYearStats> for DeveloperYearResponse {
    fn from(stats: &DeveloperYearStats) -> Self {
        Self {
            release_year: stats.release_year,
            item_count: stats.item_count,
            free_content: format_percentage(stats.free_percentage),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserDataResponse {
    pub user_id: String,
    pub total_spend: f64,
    pub recommend_percentage: f64,
    pub distinct_item_count: usize,
}

impl From<UserSummary> for UserDataResponse {
    fn from(summary: UserSummary) -> Self {
        Self {
            user_id: summary.user_id,
            total_spend: summary.total_spend,
            recommend_percentage: summary.recommend_percentage,
            distinct_item_count: summary.distinct_item_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserForGenreResponse {
    pub user: String,
    pub play_history: Vec<String>,
}

impl From<GenreChampion> for UserForGenreResponse {
    fn from(champion: GenreChampion) -> Self {
        Self {
            user: champion.user_id,
            play_history: champion
                .play_history
                .iter()
                .map(|year| format!("In year {} played {} hours", year.release_year, year.hours))
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BestDeveloperYearResponse {
    pub rank_1: String,
    pub rank_2: String,
    pub rank_3: String,
}

impl From<TopDevelopers> for BestDeveloperYearResponse {
    fn from(top: TopDevelopers) -> Self {
        let [rank_1, rank_2, rank_3] = top.podium;
        Self {
            rank_1,
            rank_2,
            rank_3,
        }
    }
}

/// `{"<developer>": "[Negative = N, Positive = P]"}`
pub type ReviewAnalysisResponse = HashMap<String, String>;

fn review_analysis_response(summary: ReviewSummary) -> ReviewAnalysisResponse {
    let line = format!(
        "[Negative = {}, Positive = {}]",
        summary.negative, summary.positive
    );
    HashMap::from([(summary.developer, line)])
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub item_id: String,
    pub recommendations: Vec<Value>,
}

impl From<GameRecommendations> for RecommendationsResponse {
    fn from(found: GameRecommendations) -> Self {
        Self {
            item_id: found.item_id,
            recommendations: found.recommendations,
        }
    }
}

/// Renders a percentage the way the dashboard expects: `33.33%`, `0.0%`
pub fn format_percentage(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}%", value)
    } else {
        format!("{}%", value)
    }
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<JsonValue>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Lists the datasets currently held in memory
pub async fn dataset_status(State(state): State<AppState>) -> Json<Vec<DatasetStatus>> {
    Json(state.catalog.status().await)
}

/// Drops every cached table; the next query reloads from disk
pub async fn reload_datasets(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> Json<JsonValue> {
    let invalidated = state.catalog.invalidate(None).await;
    tracing::info!(request_id = %request_id, invalidated, "Datasets invalidated");
    Json(json!({ "invalidated": invalidated }))
}

/// Release counts and free-content share per year for a developer
pub async fn developer(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(name): Path<String>,
) -> AppResult<Json<Vec<DeveloperYearResponse>>> {
    tracing::info!(request_id = %request_id, developer = %name, "Processing developer request");

    let games = state.catalog.table(Dataset::DeveloperGames).await?;
    let stats = services::developer::developer_activity(&games, &name)?;

    Ok(Json(stats.iter().map(DeveloperYearResponse::from).collect()))
}

/// Spend and recommendation summary for a user
pub async fn userdata(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(user_id): Path<String>,
) -> AppResult<Json<UserDataResponse>> {
    tracing::info!(request_id = %request_id, user_id = %user_id, "Processing userdata request");

    let activity = state.catalog.table(Dataset::UserData).await?;
    let summary = services::user_data::user_summary(&activity, &user_id)?;

    Ok(Json(summary.into()))
}

/// Top player of a genre with their yearly playtime
pub async fn user_for_genre(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(requested): Path<String>,
) -> AppResult<Json<UserForGenreResponse>> {
    tracing::info!(request_id = %request_id, genre = %requested, "Processing genre request");

    let plays = state.catalog.table(Dataset::UserGenres).await?;
    let champion = services::genre::genre_champion(&plays, &requested)?;

    Ok(Json(champion.into()))
}

/// Three most recommended developers of a year
pub async fn best_developer_year(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(year): Path<String>,
) -> AppResult<Json<BestDeveloperYearResponse>> {
    let year: i64 = year
        .parse()
        .map_err(|_| AppError::InvalidInput(format!("year must be an integer, got {:?}", year)))?;

    tracing::info!(request_id = %request_id, year, "Processing best developer request");

    let reviews = state.catalog.table(Dataset::DeveloperYearReviews).await?;
    let top = services::best_developer_year::best_developers(&reviews, year)?;

    Ok(Json(top.into()))
}

/// Positive/negative review split for a developer
pub async fn developer_reviews_analysis(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(name): Path<String>,
) -> AppResult<Json<ReviewAnalysisResponse>> {
    tracing::info!(request_id = %request_id, developer = %name, "Processing review analysis request");

    let table = state.catalog.table(Dataset::DeveloperReviews).await?;
    let summary = services::reviews::review_summary(&table, &name)?;

    Ok(Json(review_analysis_response(summary)))
}

/// Precomputed similar games for an item
pub async fn recommendations(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(item_id): Path<String>,
) -> AppResult<Json<RecommendationsResponse>> {
    tracing::info!(request_id = %request_id, item_id = %item_id, "Processing recommendation request");

    let model = state.catalog.table(Dataset::Recommendations).await?;
    let found = services::recommendations::similar_games(&model, &item_id)?;

    Ok(Json(found.into()))
}
