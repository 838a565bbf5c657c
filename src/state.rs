use std::sync::Arc;

use crate::config::Config;
use crate::storage::BlobStore;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    /// None when no usable connection string was configured. The server
    /// still runs; submissions answer 500 until storage is configured.
    pub store: Option<Arc<dyn BlobStore>>,
    pub config: Config,
}
