use std::collections::HashMap;
use std::future::Future;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::intelligence::error::IntelligenceError;
use crate::intelligence::types::{ActivityLogEntry, UserProgress};

/// Read side of the activity log and progress stores.
///
/// All I/O happens here, before any modeling runs. Unknown users should
/// yield empty history rather than an error.
pub trait LearningDataSource: Send + Sync {
    fn task_logs(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Vec<ActivityLogEntry>, IntelligenceError>> + Send;

    fn user_progress(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<UserProgress, IntelligenceError>> + Send;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserActivity {
    #[serde(default)]
    pub logs: Vec<ActivityLogEntry>,
    #[serde(default)]
    pub progress: UserProgress,
}

#[derive(Debug, Default)]
pub struct InMemoryDataSource {
    users: RwLock<HashMap<String, UserActivity>>,
}

impl InMemoryDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_users(users: HashMap<String, UserActivity>) -> Self {
        Self {
            users: RwLock::new(users),
        }
    }

    pub fn insert_user(&self, user_id: &str, activity: UserActivity) {
        self.users.write().insert(user_id.to_string(), activity);
    }

    pub fn push_log(&self, user_id: &str, entry: ActivityLogEntry) {
        self.users
            .write()
            .entry(user_id.to_string())
            .or_default()
            .logs
            .push(entry);
    }

    pub fn set_progress(&self, user_id: &str, progress: UserProgress) {
        self.users
            .write()
            .entry(user_id.to_string())
            .or_default()
            .progress = progress;
    }

    pub fn user_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.users.read().keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl LearningDataSource for InMemoryDataSource {
    async fn task_logs(&self, user_id: &str) -> Result<Vec<ActivityLogEntry>, IntelligenceError> {
        let logs = self
            .users
            .read()
            .get(user_id)
            .map(|activity| activity.logs.clone())
            .unwrap_or_default();
        Ok(logs)
    }

    async fn user_progress(&self, user_id: &str) -> Result<UserProgress, IntelligenceError> {
        let progress = self
            .users
            .read()
            .get(user_id)
            .map(|activity| activity.progress.clone())
            .unwrap_or_default();
        Ok(progress)
    }
}
