//! Saved-jobs registry: a per-user toggle set of job ids kept in the
//! key-value store as a JSON array.
//!
//! Every toggle writes the whole set back before returning. Two sessions
//! toggling at once race and the last write wins.

use std::sync::Arc;

use anyhow::Context;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job::JobId;
use crate::store::KeyValueStore;

pub const SAVED_JOBS_KEY: &str = "careerhub_saved_jobs";

pub struct SavedJobsRegistry {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl SavedJobsRegistry {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn for_user(store: Arc<dyn KeyValueStore>, user_id: Uuid) -> Self {
        Self::new(store, format!("{SAVED_JOBS_KEY}:{user_id}"))
    }

    /// Saved ids in the order they were saved.
    pub async fn list(&self) -> Result<Vec<JobId>, AppError> {
        match self.store.get(&self.key).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)
                .with_context(|| format!("Saved jobs under '{}' are not a list of ids", self.key))?),
            None => Ok(Vec::new()),
        }
    }

    pub async fn is_saved(&self, job_id: JobId) -> Result<bool, AppError> {
        Ok(self.list().await?.contains(&job_id))
    }

    /// Flips membership of `job_id` and returns whether it is now saved.
    pub async fn toggle(&self, job_id: JobId) -> Result<bool, AppError> {
        let mut ids = self.list().await?;
        let saved = toggle_membership(&mut ids, job_id);
        let encoded = serde_json::to_string(&ids).context("Failed to encode saved jobs")?;
        self.store.set(&self.key, encoded).await?;
        debug!("Job {job_id} saved={saved} under '{}'", self.key);
        Ok(saved)
    }
}

fn toggle_membership(ids: &mut Vec<JobId>, job_id: JobId) -> bool {
    if let Some(pos) = ids.iter().position(|&id| id == job_id) {
        ids.remove(pos);
        false
    } else {
        ids.push(job_id);
        true
    }
}
