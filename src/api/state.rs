use std::sync::Arc;

use crate::store::{Catalog, DatasetSource};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
}

impl AppState {
    /// Creates state around a catalog that has not loaded anything yet
    pub fn new(source: Arc<dyn DatasetSource>) -> Self {
        Self {
            catalog: Arc::new(Catalog::new(source)),
        }
    }
}
