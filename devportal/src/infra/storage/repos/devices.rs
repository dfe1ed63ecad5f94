use devportal_sdk::DeviceFilter;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::infra::storage::entity::device::{ActiveModel, Column, Entity, Model, Relation};
use crate::infra::storage::entity::identity_user;
use crate::infra::storage::repos::fetch_page;

pub struct DevicesRepo;

impl DevicesRepo {
    pub async fn by_id<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id).one(conn).await
    }

    pub async fn by_external_id<C: ConnectionTrait>(
        conn: &C,
        external_id: &str,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::ExternalId.eq(external_id))
            .one(conn)
            .await
    }

    pub async fn create<C: ConnectionTrait>(
        conn: &C,
        external_id: String,
        name: Option<String>,
        registered_by: Option<Uuid>,
    ) -> Result<Model, DbErr> {
        let now = OffsetDateTime::now_utc();
        ActiveModel {
            id: Set(Uuid::now_v7()),
            external_id: Set(external_id),
            name: Set(name),
            registered_by: Set(registered_by),
            created_by: Set(registered_by.map(|u| u.to_string())),
            created_at: Set(now),
            updated_by: Set(None),
            updated_at: Set(now),
        }
        .insert(conn)
        .await
    }

    pub async fn rename<C: ConnectionTrait>(
        conn: &C,
        device: Model,
        name: String,
        actor: Uuid,
    ) -> Result<Model, DbErr> {
        let mut am: ActiveModel = device.into();
        am.name = Set(Some(name));
        am.updated_by = Set(Some(actor.to_string()));
        am.updated_at = Set(OffsetDateTime::now_utc());
        am.update(conn).await
    }

    pub async fn list<C: ConnectionTrait>(
        conn: &C,
        filter: &DeviceFilter,
    ) -> Result<(Vec<Model>, u64), DbErr> {
        let mut query = Entity::find();
        if let Some(tenant_id) = filter.tenant_id {
            // Tenant scoping goes through the registering user.
            query = query
                .join(JoinType::InnerJoin, Relation::RegisteredByUser.def())
                .filter(identity_user::Column::TenantId.eq(tenant_id))
                .distinct();
        }
        if let Some(user_id) = filter.identity_user_id {
            query = query.filter(Column::RegisteredBy.eq(user_id));
        }
        fetch_page(query.order_by_desc(Column::CreatedAt), filter.page, conn).await
    }

    /// Devices first connected by the given user, used by the tenant
    /// cascade.
    pub async fn all_registered_by<C: ConnectionTrait>(
        conn: &C,
        user_id: Uuid,
    ) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::RegisteredBy.eq(user_id))
            .all(conn)
            .await
    }

    pub async fn delete_by_id<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<(), DbErr> {
        Entity::delete_by_id(id).exec(conn).await?;
        Ok(())
    }
}
