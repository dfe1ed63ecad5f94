use devportal_sdk::{PortalUserFilter, Role};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::infra::storage::entity::portal_user::{ActiveModel, Column, Entity, Model};
use crate::infra::storage::repos::fetch_page;

/// Attributes of a freshly created portal principal.
#[derive(Debug, Clone)]
pub struct NewPortalUser {
    pub email: String,
    pub name: Option<String>,
    pub password_hash: String,
    pub role: Role,
    pub tenant_id: Option<Uuid>,
    pub created_by: String,
}

/// Partial update applied to an existing portal principal.
#[derive(Debug, Clone, Default)]
pub struct PortalUserChanges {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password_hash: Option<String>,
    pub tenant_id: Option<Uuid>,
    pub active: Option<bool>,
}

pub struct PortalUsersRepo;

impl PortalUsersRepo {
    pub async fn by_id<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id).one(conn).await
    }

    pub async fn by_email<C: ConnectionTrait>(
        conn: &C,
        email: &str,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find().filter(Column::Email.eq(email)).one(conn).await
    }

    /// Login lookup; deactivated rows are invisible here.
    pub async fn active_by_email<C: ConnectionTrait>(
        conn: &C,
        email: &str,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::Email.eq(email))
            .filter(Column::Active.eq(true))
            .one(conn)
            .await
    }

    pub async fn create<C: ConnectionTrait>(conn: &C, new: NewPortalUser) -> Result<Model, DbErr> {
        let now = OffsetDateTime::now_utc();
        ActiveModel {
            id: Set(Uuid::now_v7()),
            email: Set(new.email),
            name: Set(new.name),
            password_hash: Set(new.password_hash),
            role: Set(new.role.as_str().to_owned()),
            tenant_id: Set(new.tenant_id),
            active: Set(true),
            created_by: Set(Some(new.created_by)),
            created_at: Set(now),
            updated_by: Set(None),
            updated_at: Set(now),
        }
        .insert(conn)
        .await
    }

    /// Apply a partial change set; unset fields keep their value.
    pub async fn apply<C: ConnectionTrait>(
        conn: &C,
        user: Model,
        changes: PortalUserChanges,
        actor: &str,
    ) -> Result<Model, DbErr> {
        let mut am: ActiveModel = user.into();
        if let Some(email) = changes.email {
            am.email = Set(email);
        }
        if let Some(name) = changes.name {
            am.name = Set(Some(name));
        }
        if let Some(password_hash) = changes.password_hash {
            am.password_hash = Set(password_hash);
        }
        if let Some(tenant_id) = changes.tenant_id {
            am.tenant_id = Set(Some(tenant_id));
        }
        if let Some(active) = changes.active {
            am.active = Set(active);
        }
        am.updated_by = Set(Some(actor.to_owned()));
        am.updated_at = Set(OffsetDateTime::now_utc());
        am.update(conn).await
    }

    pub async fn list<C: ConnectionTrait>(
        conn: &C,
        filter: &PortalUserFilter,
    ) -> Result<(Vec<Model>, u64), DbErr> {
        let mut query = Entity::find();
        if let Some(role) = filter.role {
            query = query.filter(Column::Role.eq(role.as_str()));
        }
        if let Some(needle) = &filter.email_contains {
            query = query.filter(Column::Email.contains(needle));
        }
        fetch_page(query.order_by_desc(Column::CreatedAt), filter.page, conn).await
    }
}
