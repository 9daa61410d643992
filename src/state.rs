use std::path::PathBuf;
use std::sync::Arc;

use crate::query::Query;
use crate::recorder::Recorder;
use crate::registry::Registry;
use crate::store::Store;

/// Everything a handler needs, built once at startup around one store.
#[derive(Clone)]
pub struct AppState {
    pub registry: Registry,
    pub recorder: Recorder,
    pub query: Query,
    pub frontend_dir: Arc<PathBuf>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, frontend_dir: PathBuf) -> Self {
        Self {
            registry: Registry::new(store.clone()),
            recorder: Recorder::new(store.clone()),
            query: Query::new(store),
            frontend_dir: Arc::new(frontend_dir),
        }
    }
}
