use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::models::{Task, TaskDraft};

/// The four CRUD calls the backend exposes, plus the owner lookup. The
/// mutating calls return nothing: the caller is expected to re-list to
/// observe its own change.
#[async_trait]
pub trait TaskBackend: Send + Sync {
    async fn list_tasks(&self) -> Result<Vec<Task>>;
    async fn create_task(&self, draft: &TaskDraft) -> Result<()>;
    async fn update_task(&self, id: &str, draft: &TaskDraft) -> Result<()>;
    async fn delete_task(&self, id: &str) -> Result<()>;
    async fn find_by_owner(&self, owner: &str) -> Result<Option<Task>>;
}

/// reqwest-backed client for the task backend.
pub struct HttpTaskApi {
    client: Client,
    base_url: String,
}

impl HttpTaskApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        HttpTaskApi {
            client: Client::new(),
            base_url,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl TaskBackend for HttpTaskApi {
    async fn list_tasks(&self) -> Result<Vec<Task>> {
        let tasks = self
            .client
            .get(self.url("/tasks"))
            .send()
            .await
            .context("Failed to reach task backend")?
            .error_for_status()
            .context("Task list request rejected")?
            .json()
            .await
            .context("Failed to parse task list")?;
        Ok(tasks)
    }

    async fn create_task(&self, draft: &TaskDraft) -> Result<()> {
        // The backend returns the created entity; the body is ignored and
        // the caller re-lists instead.
        self.client
            .post(self.url("/add-task"))
            .json(draft)
            .send()
            .await
            .context("Failed to reach task backend")?
            .error_for_status()
            .context("Create request rejected")?;
        Ok(())
    }

    async fn update_task(&self, id: &str, draft: &TaskDraft) -> Result<()> {
        self.client
            .put(self.url(&format!("/task-edit/{}", id)))
            .json(draft)
            .send()
            .await
            .context("Failed to reach task backend")?
            .error_for_status()
            .context("Update request rejected")?;
        Ok(())
    }

    async fn delete_task(&self, id: &str) -> Result<()> {
        self.client
            .delete(self.url(&format!("/task-del/{}", id)))
            .send()
            .await
            .context("Failed to reach task backend")?
            .error_for_status()
            .context("Delete request rejected")?;
        Ok(())
    }

    async fn find_by_owner(&self, owner: &str) -> Result<Option<Task>> {
        let response = self
            .client
            .get(self.url(&format!("/task/{}", owner)))
            .send()
            .await
            .context("Failed to reach task backend")?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let task = response
            .error_for_status()
            .context("Owner lookup rejected")?
            .json()
            .await
            .context("Failed to parse task")?;
        Ok(Some(task))
    }
}

/// One create (no edit target) or one update (edit target set), then one
/// list. A failed mutation aborts the flow so the caller keeps its draft.
pub async fn submit_draft(
    api: &dyn TaskBackend,
    editing_id: Option<&str>,
    draft: &TaskDraft,
) -> Result<Vec<Task>> {
    match editing_id {
        Some(id) => api.update_task(id, draft).await?,
        None => api.create_task(draft).await?,
    }
    api.list_tasks().await
}

/// One delete, then one list regardless of the delete's outcome. A delete
/// of an id the backend no longer knows is logged and swallowed.
pub async fn delete_and_refresh(api: &dyn TaskBackend, id: &str) -> Result<Vec<Task>> {
    if let Err(err) = api.delete_task(id).await {
        log::warn!("Delete of task {} failed: {:#}", id, err);
    }
    api.list_tasks().await
}
