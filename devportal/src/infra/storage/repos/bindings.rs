use devportal_sdk::BindingFilter;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::infra::storage::entity::device_binding::{ActiveModel, Column, Entity, Model, Relation};
use crate::infra::storage::entity::identity_user;
use crate::infra::storage::repos::fetch_page;

pub struct BindingsRepo;

impl BindingsRepo {
    pub async fn by_id<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id).one(conn).await
    }

    /// The binding for an exact (device, owner, username) triple.
    pub async fn find_exact<C: ConnectionTrait>(
        conn: &C,
        device_id: Uuid,
        identity_user_id: Uuid,
        device_username: &str,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::DeviceId.eq(device_id))
            .filter(Column::IdentityUserId.eq(identity_user_id))
            .filter(Column::DeviceUsername.eq(device_username))
            .one(conn)
            .await
    }

    /// Lookup by username alone, not scoped to a device.
    ///
    /// Known limitation kept from the existing behavior: two devices
    /// sharing a device-local username resolve to an arbitrary one of
    /// the matching rows.
    pub async fn by_username_global<C: ConnectionTrait>(
        conn: &C,
        device_username: &str,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::DeviceUsername.eq(device_username))
            .one(conn)
            .await
    }

    pub async fn create<C: ConnectionTrait>(
        conn: &C,
        device_id: Uuid,
        identity_user_id: Uuid,
        device_username: String,
        actor: &str,
    ) -> Result<Model, DbErr> {
        let now = OffsetDateTime::now_utc();
        ActiveModel {
            id: Set(Uuid::now_v7()),
            device_id: Set(device_id),
            identity_user_id: Set(identity_user_id),
            device_username: Set(device_username),
            created_by: Set(Some(actor.to_owned())),
            created_at: Set(now),
            updated_by: Set(None),
            updated_at: Set(now),
        }
        .insert(conn)
        .await
    }

    pub async fn list<C: ConnectionTrait>(
        conn: &C,
        filter: &BindingFilter,
    ) -> Result<(Vec<Model>, u64), DbErr> {
        let mut query = Entity::find();
        if let Some(tenant_id) = filter.tenant_id {
            query = query
                .join(JoinType::InnerJoin, Relation::Owner.def())
                .filter(identity_user::Column::TenantId.eq(tenant_id));
        }
        if let Some(user_id) = filter.identity_user_id {
            query = query.filter(Column::IdentityUserId.eq(user_id));
        }
        if let Some(device_id) = filter.device_id {
            query = query.filter(Column::DeviceId.eq(device_id));
        }
        fetch_page(query.order_by_desc(Column::CreatedAt), filter.page, conn).await
    }

    pub async fn all_for_device<C: ConnectionTrait>(
        conn: &C,
        device_id: Uuid,
    ) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::DeviceId.eq(device_id))
            .all(conn)
            .await
    }

    pub async fn all_for_owner<C: ConnectionTrait>(
        conn: &C,
        identity_user_id: Uuid,
    ) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::IdentityUserId.eq(identity_user_id))
            .all(conn)
            .await
    }

    pub async fn count_for_device<C: ConnectionTrait>(
        conn: &C,
        device_id: Uuid,
    ) -> Result<u64, DbErr> {
        Entity::find()
            .filter(Column::DeviceId.eq(device_id))
            .count(conn)
            .await
    }

    pub async fn delete_by_id<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<(), DbErr> {
        Entity::delete_by_id(id).exec(conn).await?;
        Ok(())
    }
}
