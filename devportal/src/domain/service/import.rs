//! Bulk import of the provider's directory into local mirrors.

use std::sync::Arc;

use devportal_sdk::{TaskKind, TaskState, TaskStatus};
use sea_orm::DatabaseConnection;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::ports::IdentityProvider;
use crate::domain::service::Actor;
use crate::domain::SYSTEM_ACTOR;
use crate::infra::storage::repos::{IdentityUsersRepo, NewIdentityUser, TasksRepo, TenantsRepo};

/// Walks the provider's organizations and users page by page and
/// upserts local tenants and identity users, reporting progress into
/// the task row after every entity.
///
/// Not cancellable mid-flight; a crash leaves the task IN_PROGRESS.
#[derive(Clone)]
pub struct ImportService {
    db: DatabaseConnection,
    provider: Arc<dyn IdentityProvider>,
    page_size: u64,
}

impl ImportService {
    pub fn new(db: DatabaseConnection, provider: Arc<dyn IdentityProvider>, page_size: u64) -> Self {
        Self {
            db,
            provider,
            page_size,
        }
    }

    /// Create the task row and run the import in the background.
    #[instrument(skip(self, actor))]
    pub async fn start(&self, actor: &Actor) -> Result<TaskStatus, DomainError> {
        let row = TasksRepo::create(&self.db, TaskKind::UserImport, &actor.audit_id()).await?;
        let status = TaskStatus::try_from(row)?;

        let job = self.clone();
        let task_id = status.id;
        tokio::spawn(async move {
            if let Err(e) = job.run(task_id).await {
                error!(%task_id, error = %e, "import job aborted");
            }
        });

        Ok(status)
    }

    /// One full import pass. The first provider or database failure
    /// marks the task FAILED with the captured message; success marks
    /// it COMPLETED.
    #[instrument(skip(self))]
    pub async fn run(&self, task_id: Uuid) -> Result<(), DomainError> {
        self.advance(
            task_id,
            Some(TaskState::InProgress),
            Some("importing tenants".to_owned()),
        )
        .await?;

        match self.import_all(task_id).await {
            Ok(()) => {
                info!(%task_id, "import completed");
                self.advance(
                    task_id,
                    Some(TaskState::Completed),
                    Some("import finished".to_owned()),
                )
                .await
            }
            Err(e) => {
                warn!(%task_id, error = %e, "import failed");
                self.advance(task_id, Some(TaskState::Failed), Some(e.to_string()))
                    .await
            }
        }
    }

    async fn import_all(&self, task_id: Uuid) -> Result<(), DomainError> {
        let limit = self.page_size;
        let mut tenants_imported: u64 = 0;
        let mut org_offset: u64 = 0;

        loop {
            let orgs = self
                .provider
                .organizations(org_offset, limit)
                .await
                .map_err(|e| DomainError::upstream(e.to_string()))?;
            if orgs.is_empty() {
                break;
            }

            for org in orgs {
                let tenant = match TenantsRepo::by_provider_org_id(&self.db, &org.provider_org_id)
                    .await?
                {
                    Some(existing) => existing,
                    None => {
                        TenantsRepo::create(
                            &self.db,
                            org.provider_org_id.clone(),
                            org.name,
                            SYSTEM_ACTOR,
                        )
                        .await?
                    }
                };
                tenants_imported += 1;
                self.advance(
                    task_id,
                    None,
                    Some(format!("imported {tenants_imported} tenants")),
                )
                .await?;

                let mut users_imported: u64 = 0;
                let mut user_offset: u64 = 0;
                loop {
                    let users = self
                        .provider
                        .users(&org.provider_org_id, user_offset, limit)
                        .await
                        .map_err(|e| DomainError::upstream(e.to_string()))?;
                    if users.is_empty() {
                        break;
                    }

                    for user in users {
                        let known = IdentityUsersRepo::by_provider_user_id(
                            &self.db,
                            &user.provider_user_id,
                        )
                        .await?;
                        if known.is_none() {
                            IdentityUsersRepo::create(
                                &self.db,
                                NewIdentityUser {
                                    email: user.email,
                                    provider_user_id: Some(user.provider_user_id),
                                    tenant_id: Some(tenant.id),
                                    name: user.display_name,
                                    created_by: SYSTEM_ACTOR.to_owned(),
                                },
                            )
                            .await?;
                        }
                        users_imported += 1;
                        self.advance(
                            task_id,
                            None,
                            Some(format!("imported {users_imported} users")),
                        )
                        .await?;
                    }

                    user_offset += limit;
                }
            }

            org_offset += limit;
        }

        Ok(())
    }

    async fn advance(
        &self,
        task_id: Uuid,
        state: Option<TaskState>,
        message: Option<String>,
    ) -> Result<(), DomainError> {
        let Some(task) = TasksRepo::by_id(&self.db, task_id).await? else {
            return Ok(());
        };
        TasksRepo::update(&self.db, task, state, message, SYSTEM_ACTOR).await?;
        Ok(())
    }
}
