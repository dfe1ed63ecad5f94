use devportal_sdk::{PageRequest, TaskKind, TaskState};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::infra::storage::entity::task_status::{ActiveModel, Column, Entity, Model};
use crate::infra::storage::repos::fetch_page;

pub struct TasksRepo;

impl TasksRepo {
    pub async fn by_id<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id).one(conn).await
    }

    pub async fn create<C: ConnectionTrait>(
        conn: &C,
        kind: TaskKind,
        actor: &str,
    ) -> Result<Model, DbErr> {
        let now = OffsetDateTime::now_utc();
        ActiveModel {
            id: Set(Uuid::now_v7()),
            kind: Set(kind.as_str().to_owned()),
            state: Set(TaskState::Pending.as_str().to_owned()),
            message: Set(None),
            created_by: Set(Some(actor.to_owned())),
            created_at: Set(now),
            updated_by: Set(None),
            updated_at: Set(now),
        }
        .insert(conn)
        .await
    }

    /// Advance a task: either field may stay as-is when `None`.
    pub async fn update<C: ConnectionTrait>(
        conn: &C,
        task: Model,
        state: Option<TaskState>,
        message: Option<String>,
        actor: &str,
    ) -> Result<Model, DbErr> {
        let mut am: ActiveModel = task.into();
        if let Some(state) = state {
            am.state = Set(state.as_str().to_owned());
        }
        if let Some(message) = message {
            am.message = Set(Some(message));
        }
        am.updated_by = Set(Some(actor.to_owned()));
        am.updated_at = Set(OffsetDateTime::now_utc());
        am.update(conn).await
    }

    pub async fn list<C: ConnectionTrait>(
        conn: &C,
        kind: Option<TaskKind>,
        page: PageRequest,
    ) -> Result<(Vec<Model>, u64), DbErr> {
        let mut query = Entity::find();
        if let Some(kind) = kind {
            query = query.filter(Column::Kind.eq(kind.as_str()));
        }
        fetch_page(query.order_by_desc(Column::CreatedAt), page, conn).await
    }
}
