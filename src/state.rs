use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::store::DocumentStore;

pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub config: AppConfig,
}
