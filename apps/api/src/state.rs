use std::sync::Arc;

use crate::config::Config;
use crate::listings::pagination::Paginator;
use crate::store::files::MemoryFileStore;
use crate::store::kv::MemoryKvStore;
use crate::store::memory::{
    MemoryAlertSource, MemoryApplicationSource, MemoryJobSource, MemoryResumeSource,
};
use crate::store::{AlertSource, ApplicationSource, JobSource, KeyValueStore, ResumeSource};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub jobs: Arc<dyn JobSource>,
    pub applications: Arc<dyn ApplicationSource>,
    pub resumes: Arc<dyn ResumeSource>,
    pub alerts: Arc<dyn AlertSource>,
    /// Backs the saved-jobs registry.
    pub kv: Arc<dyn KeyValueStore>,
    pub paginator: Paginator,
    pub config: Config,
}

impl AppState {
    /// Process-local stores for every data source.
    pub fn in_memory(config: Config) -> Self {
        AppState {
            jobs: Arc::new(MemoryJobSource::new()),
            applications: Arc::new(MemoryApplicationSource::new()),
            resumes: Arc::new(MemoryResumeSource::new(Arc::new(MemoryFileStore::new()))),
            alerts: Arc::new(MemoryAlertSource::new()),
            kv: Arc::new(MemoryKvStore::new()),
            paginator: Paginator::new(config.jobs_per_page),
            config,
        }
    }
}
