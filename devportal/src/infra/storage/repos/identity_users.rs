use devportal_sdk::IdentityUserFilter;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::infra::storage::entity::identity_user::{ActiveModel, Column, Entity, Model};
use crate::infra::storage::repos::fetch_page;

/// Attributes of a freshly mirrored identity user.
#[derive(Debug, Clone)]
pub struct NewIdentityUser {
    pub email: String,
    pub provider_user_id: Option<String>,
    pub tenant_id: Option<Uuid>,
    pub name: Option<String>,
    pub created_by: String,
}

pub struct IdentityUsersRepo;

impl IdentityUsersRepo {
    pub async fn by_id<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id).one(conn).await
    }

    pub async fn by_email<C: ConnectionTrait>(
        conn: &C,
        email: &str,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find().filter(Column::Email.eq(email)).one(conn).await
    }

    pub async fn by_provider_user_id<C: ConnectionTrait>(
        conn: &C,
        provider_user_id: &str,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::ProviderUserId.eq(provider_user_id))
            .one(conn)
            .await
    }

    pub async fn create<C: ConnectionTrait>(
        conn: &C,
        new: NewIdentityUser,
    ) -> Result<Model, DbErr> {
        let now = OffsetDateTime::now_utc();
        ActiveModel {
            id: Set(Uuid::now_v7()),
            email: Set(new.email),
            provider_user_id: Set(new.provider_user_id),
            tenant_id: Set(new.tenant_id),
            name: Set(new.name),
            pin_hash: Set(None),
            created_by: Set(Some(new.created_by)),
            created_at: Set(now),
            updated_by: Set(None),
            updated_at: Set(now),
        }
        .insert(conn)
        .await
    }

    pub async fn set_pin_hash<C: ConnectionTrait>(
        conn: &C,
        user: Model,
        pin_hash: String,
        actor: &str,
    ) -> Result<Model, DbErr> {
        let mut am: ActiveModel = user.into();
        am.pin_hash = Set(Some(pin_hash));
        am.updated_by = Set(Some(actor.to_owned()));
        am.updated_at = Set(OffsetDateTime::now_utc());
        am.update(conn).await
    }

    pub async fn list<C: ConnectionTrait>(
        conn: &C,
        filter: &IdentityUserFilter,
    ) -> Result<(Vec<Model>, u64), DbErr> {
        let mut query = Entity::find();
        if let Some(tenant_id) = filter.tenant_id {
            query = query.filter(Column::TenantId.eq(tenant_id));
        }
        fetch_page(query.order_by_desc(Column::CreatedAt), filter.page, conn).await
    }

    /// Every user in a tenant, used by the tenant cascade.
    pub async fn all_in_tenant<C: ConnectionTrait>(
        conn: &C,
        tenant_id: Uuid,
    ) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::TenantId.eq(tenant_id))
            .all(conn)
            .await
    }

    pub async fn delete_by_id<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<(), DbErr> {
        Entity::delete_by_id(id).exec(conn).await?;
        Ok(())
    }
}
