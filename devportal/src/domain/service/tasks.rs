//! Background task bookkeeping.

use devportal_sdk::{Page, PageRequest, TaskKind, TaskState, TaskStatus};
use sea_orm::DatabaseConnection;
use tracing::instrument;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::infra::storage::repos::TasksRepo;

pub struct TasksService {
    db: DatabaseConnection,
}

impl TasksService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn create(&self, kind: TaskKind, actor: &str) -> Result<TaskStatus, DomainError> {
        let row = TasksRepo::create(&self.db, kind, actor).await?;
        TaskStatus::try_from(row)
    }

    pub async fn get(&self, task_id: Uuid) -> Result<TaskStatus, DomainError> {
        let row = TasksRepo::by_id(&self.db, task_id)
            .await?
            .ok_or_else(|| DomainError::not_found("task", task_id))?;
        TaskStatus::try_from(row)
    }

    pub async fn list(
        &self,
        kind: Option<TaskKind>,
        page: PageRequest,
    ) -> Result<Page<TaskStatus>, DomainError> {
        let (models, total) = TasksRepo::list(&self.db, kind, page).await?;
        let items = models
            .into_iter()
            .map(TaskStatus::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page {
            items,
            total,
            page: page.page,
            size: page.size,
        })
    }

    /// Advance a task's state and/or message. A missing task is a
    /// silent no-op so progress writers never fail the job itself.
    pub async fn advance(
        &self,
        task_id: Uuid,
        state: Option<TaskState>,
        message: Option<String>,
        actor: &str,
    ) -> Result<(), DomainError> {
        let Some(task) = TasksRepo::by_id(&self.db, task_id).await? else {
            return Ok(());
        };
        TasksRepo::update(&self.db, task, state, message, actor).await?;
        Ok(())
    }
}
