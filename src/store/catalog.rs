use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use super::error::StoreResult;
use super::source::{Dataset, DatasetSource};
use super::table::Table;

/// A table held by the catalog together with when it was read
#[derive(Debug, Clone)]
struct Entry {
    table: Arc<Table>,
    loaded_at: DateTime<Utc>,
}

/// Load status of one dataset
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DatasetStatus {
    pub dataset: Dataset,
    pub rows: usize,
    pub loaded_at: DateTime<Utc>,
}

/// Owner of load-once table handles
///
/// The first access to a dataset reads it through the [`DatasetSource`];
/// later accesses share the same `Arc<Table>` until [`Catalog::invalidate`]
/// drops it. Failed loads are not remembered.
///
/// Loads of one dataset are serialized so it is read once; the table map
/// is only locked to look up or insert, never across a load.
pub struct Catalog {
    source: Arc<dyn DatasetSource>,
    tables: RwLock<HashMap<Dataset, Entry>>,
    loading: HashMap<Dataset, Mutex<()>>,
}

impl Catalog {
    pub fn new(source: Arc<dyn DatasetSource>) -> Self {
        Self {
            source,
            tables: RwLock::new(HashMap::new()),
            loading: Dataset::ALL
                .into_iter()
                .map(|dataset| (dataset, Mutex::new(())))
                .collect(),
        }
    }

    async fn cached(&self, dataset: Dataset) -> Option<Arc<Table>> {
        self.tables
            .read()
            .await
            .get(&dataset)
            .map(|entry| entry.table.clone())
    }

    /// Returns the table for `dataset`, loading it on first use
    pub async fn table(&self, dataset: Dataset) -> StoreResult<Arc<Table>> {
        if let Some(table) = self.cached(dataset).await {
            return Ok(table);
        }

        let _loading = match self.loading.get(&dataset) {
            Some(lock) => Some(lock.lock().await),
            None => None,
        };
        // Another request may have loaded it while we waited for the lock
        if let Some(table) = self.cached(dataset).await {
            return Ok(table);
        }

        let table = match self.source.load(dataset).await {
            Ok(table) => Arc::new(table),
            Err(e) => {
                tracing::error!(
                    dataset = %dataset,
                    source = self.source.name(),
                    error = %e,
                    "Dataset load failed"
                );
                return Err(e);
            }
        };

        tracing::info!(
            dataset = %dataset,
            source = self.source.name(),
            rows = table.len(),
            "Dataset loaded"
        );

        self.tables.write().await.insert(
            dataset,
            Entry {
                table: table.clone(),
                loaded_at: Utc::now(),
            },
        );

        Ok(table)
    }

    /// Loads every dataset, stopping at the first failure
    pub async fn preload(&self) -> StoreResult<()> {
        for dataset in Dataset::ALL {
            self.table(dataset).await?;
        }
        Ok(())
    }

    /// Drops the cached handle for one dataset, or for all of them
    ///
    /// Requests already holding a table keep reading their snapshot.
    pub async fn invalidate(&self, dataset: Option<Dataset>) -> usize {
        let mut tables = self.tables.write().await;
        let dropped = match dataset {
            Some(dataset) => tables.remove(&dataset).map_or(0, |_| 1),
            None => {
                let count = tables.len();
                tables.clear();
                count
            }
        };

        tracing::info!(
            dataset = ?dataset,
            dropped,
            "Catalog invalidated"
        );

        dropped
    }

    /// Currently loaded datasets, in declaration order
    pub async fn status(&self) -> Vec<DatasetStatus> {
        let tables = self.tables.read().await;
        let mut status: Vec<DatasetStatus> = tables
            .iter()
            .map(|(dataset, entry)| DatasetStatus {
                dataset: *dataset,
                rows: entry.table.len(),
                loaded_at: entry.loaded_at,
            })
            .collect();
        status.sort_by_key(|s| s.dataset);
        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::source::MockDatasetSource;
    use crate::store::{StoreError, Value};
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Notify;

    fn one_row_table() -> Table {
        Table::from_rows(&["item_id"], vec![vec![Value::Int(1)]]).unwrap()
    }

    /// Source whose `UserData` load blocks until released
    #[derive(Default)]
    struct GatedSource {
        started: Notify,
        release: Notify,
        loads: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl DatasetSource for GatedSource {
        async fn load(&self, dataset: Dataset) -> StoreResult<Table> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            if dataset == Dataset::UserData {
                self.started.notify_one();
                self.release.notified().await;
            }
            Ok(one_row_table())
        }

        fn name(&self) -> &'static str {
            "gated"
        }
    }

    #[tokio::test]
    async fn test_table_is_loaded_once() {
        let mut source = MockDatasetSource::new();
        source
            .expect_load()
            .withf(|dataset| *dataset == Dataset::Recommendations)
            .times(1)
            .returning(|_| Ok(one_row_table()));
        source.expect_name().return_const("mock");

        let catalog = Catalog::new(Arc::new(source));
        let first = catalog.table(Dataset::Recommendations).await.unwrap();
        let second = catalog.table(Dataset::Recommendations).await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_slow_load_does_not_block_cached_reads() {
        let source = Arc::new(GatedSource::default());
        let catalog = Arc::new(Catalog::new(source.clone()));
        catalog.table(Dataset::Recommendations).await.unwrap();

        let loader = tokio::spawn({
            let catalog = catalog.clone();
            async move { catalog.table(Dataset::UserData).await }
        });
        source.started.notified().await;

        let cached = tokio::time::timeout(
            Duration::from_millis(200),
            catalog.table(Dataset::Recommendations),
        )
        .await;
        assert!(matches!(cached, Ok(Ok(_))));

        let status = tokio::time::timeout(Duration::from_millis(200), catalog.status()).await;
        assert_eq!(status.unwrap().len(), 1);

        source.release.notify_one();
        assert!(loader.await.unwrap().is_ok());
        assert_eq!(catalog.status().await.len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_requests_share_one_load() {
        let source = Arc::new(GatedSource::default());
        let catalog = Arc::new(Catalog::new(source.clone()));

        let first = tokio::spawn({
            let catalog = catalog.clone();
            async move { catalog.table(Dataset::UserData).await }
        });
        source.started.notified().await;

        let second = tokio::spawn({
            let catalog = catalog.clone();
            async move { catalog.table(Dataset::UserData).await }
        });
        tokio::task::yield_now().await;

        source.release.notify_one();
        let first = first.await.unwrap().unwrap();
        let second = second.await.unwrap().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(source.loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalidate_forces_reload() {
        let mut source = MockDatasetSource::new();
        source
            .expect_load()
            .times(2)
            .returning(|_| Ok(one_row_table()));
        source.expect_name().return_const("mock");

        let catalog = Catalog::new(Arc::new(source));
        let first = catalog.table(Dataset::UserData).await.unwrap();

        assert_eq!(catalog.invalidate(Some(Dataset::UserData)).await, 1);
        assert_eq!(catalog.invalidate(Some(Dataset::UserData)).await, 0);

        let second = catalog.table(Dataset::UserData).await.unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_load_is_not_cached() {
        let mut source = MockDatasetSource::new();
        let mut seq = mockall::Sequence::new();
        source
            .expect_load()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|dataset| {
                Err(StoreError::DatasetNotFound {
                    dataset,
                    path: PathBuf::from("missing.json"),
                })
            });
        source
            .expect_load()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(one_row_table()));
        source.expect_name().return_const("mock");

        let catalog = Catalog::new(Arc::new(source));
        assert!(catalog.table(Dataset::DeveloperGames).await.is_err());
        assert!(catalog.status().await.is_empty());
        assert!(catalog.table(Dataset::DeveloperGames).await.is_ok());
    }

    #[tokio::test]
    async fn test_preload_and_status() {
        let mut source = MockDatasetSource::new();
        source
            .expect_load()
            .times(Dataset::ALL.len())
            .returning(|_| Ok(one_row_table()));
        source.expect_name().return_const("mock");

        let catalog = Catalog::new(Arc::new(source));
        catalog.preload().await.unwrap();

        let status = catalog.status().await;
        assert_eq!(status.len(), Dataset::ALL.len());
        assert_eq!(status[0].dataset, Dataset::DeveloperGames);
        assert!(status.iter().all(|s| s.rows == 1));

        assert_eq!(catalog.invalidate(None).await, Dataset::ALL.len());
        assert!(catalog.status().await.is_empty());
    }
}
