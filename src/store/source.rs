use serde::Serialize;
use std::fmt::Display;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::instrument;

use super::error::{StoreError, StoreResult};
use super::table::Table;

/// The precomputed datasets the queries read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dataset {
    /// Game catalog: developer, release year, price
    DeveloperGames,
    /// Per-user item ownership and reviews
    UserData,
    /// User playtime joined with game genres
    UserGenres,
    /// Reviews with sentiment, keyed by release year
    DeveloperYearReviews,
    /// Reviews with sentiment, keyed by developer
    DeveloperReviews,
    /// Output of the offline similarity model
    Recommendations,
}

impl Dataset {
    pub const ALL: [Dataset; 6] = [
        Dataset::DeveloperGames,
        Dataset::UserData,
        Dataset::UserGenres,
        Dataset::DeveloperYearReviews,
        Dataset::DeveloperReviews,
        Dataset::Recommendations,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            Dataset::DeveloperGames => "steam_games_developer.json",
            Dataset::UserData => "userdata.json",
            Dataset::UserGenres => "userforgenre.json",
            Dataset::DeveloperYearReviews => "best_developer_year.json",
            Dataset::DeveloperReviews => "developer_reviews_analysis.json",
            Dataset::Recommendations => "recommendation_model.json",
        }
    }
}

impl Display for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Dataset::DeveloperGames => "developer_games",
            Dataset::UserData => "user_data",
            Dataset::UserGenres => "user_genres",
            Dataset::DeveloperYearReviews => "developer_year_reviews",
            Dataset::DeveloperReviews => "developer_reviews",
            Dataset::Recommendations => "recommendations",
        };
        write!(f, "{}", name)
    }
}

/// Where tables come from
///
/// The production source reads files from a data directory; tests swap in
/// mocks to observe how often the catalog loads.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait DatasetSource: Send + Sync {
    /// Loads a full table for `dataset`
    async fn load(&self, dataset: Dataset) -> StoreResult<Table>;

    /// Source name for logging
    fn name(&self) -> &'static str;
}

/// Reads `<data_dir>/<dataset file>` as a JSON array of records
#[derive(Debug, Clone)]
pub struct FileSource {
    data_dir: PathBuf,
}

impl FileSource {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn path_for(&self, dataset: Dataset) -> PathBuf {
        self.data_dir.join(dataset.file_name())
    }
}

#[async_trait::async_trait]
impl DatasetSource for FileSource {
    #[instrument(skip(self), fields(source = self.name()))]
    async fn load(&self, dataset: Dataset) -> StoreResult<Table> {
        let path = self.path_for(dataset);

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::DatasetNotFound { dataset, path });
            }
            Err(e) => return Err(e.into()),
        };

        let table = Table::from_json_records(&bytes)
            .map_err(|source| StoreError::Corrupt { dataset, source })?;

        tracing::debug!(
            path = %path.display(),
            rows = table.len(),
            columns = table.column_names().len(),
            "Dataset read from disk"
        );

        Ok(table)
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Value;

    #[tokio::test]
    async fn test_file_source_loads_records() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("recommendation_model.json"),
            r#"[{"item_id": 10, "recommendations": ["a", "b", "c", "d", "e"]}]"#,
        )
        .unwrap();

        let source = FileSource::new(dir.path());
        let table = source.load(Dataset::Recommendations).await.unwrap();

        assert_eq!(table.len(), 1);
        let row = table.row(0).unwrap();
        assert_eq!(row.get("item_id").unwrap(), &Value::Int(10));
        assert_eq!(row.get("recommendations").unwrap().as_list().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_file_source_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileSource::new(dir.path());

        let result = source.load(Dataset::UserData).await;
        assert!(matches!(
            result,
            Err(StoreError::DatasetNotFound { dataset: Dataset::UserData, .. })
        ));
    }

    #[tokio::test]
    async fn test_file_source_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("userdata.json"), "not json").unwrap();
        let source = FileSource::new(dir.path());

        let result = source.load(Dataset::UserData).await;
        assert!(matches!(result, Err(StoreError::Corrupt { .. })));
    }

    #[test]
    fn test_dataset_file_names_are_distinct() {
        let mut names: Vec<_> = Dataset::ALL.iter().map(|d| d.file_name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), Dataset::ALL.len());
    }
}
