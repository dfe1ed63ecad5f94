use devportal_sdk::ShareFilter;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::infra::storage::entity::share::{ActiveModel, Column, Entity, Model, Relation};
use crate::infra::storage::entity::{device_binding, identity_user};
use crate::infra::storage::repos::fetch_page;

pub struct SharesRepo;

impl SharesRepo {
    pub async fn by_id<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id).one(conn).await
    }

    pub async fn find_pair<C: ConnectionTrait>(
        conn: &C,
        binding_id: Uuid,
        recipient_id: Uuid,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::BindingId.eq(binding_id))
            .filter(Column::RecipientId.eq(recipient_id))
            .one(conn)
            .await
    }

    pub async fn create<C: ConnectionTrait>(
        conn: &C,
        binding_id: Uuid,
        recipient_id: Uuid,
        actor: &str,
    ) -> Result<Model, DbErr> {
        let now = OffsetDateTime::now_utc();
        ActiveModel {
            id: Set(Uuid::now_v7()),
            binding_id: Set(binding_id),
            recipient_id: Set(recipient_id),
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
        filter: &ShareFilter,
    ) -> Result<(Vec<Model>, u64), DbErr> {
        let mut query = Entity::find();
        if let Some(tenant_id) = filter.tenant_id {
            // Tenant scoping goes through the binding's owner.
            query = query
                .join(JoinType::InnerJoin, Relation::Binding.def())
                .join(JoinType::InnerJoin, device_binding::Relation::Owner.def())
                .filter(identity_user::Column::TenantId.eq(tenant_id))
                .distinct();
        }
        if let Some(recipient_id) = filter.recipient_id {
            query = query.filter(Column::RecipientId.eq(recipient_id));
        }
        if let Some(binding_id) = filter.binding_id {
            query = query.filter(Column::BindingId.eq(binding_id));
        }
        fetch_page(query.order_by_desc(Column::CreatedAt), filter.page, conn).await
    }

    pub async fn delete_by_id<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<(), DbErr> {
        Entity::delete_by_id(id).exec(conn).await?;
        Ok(())
    }

    pub async fn delete_for_binding<C: ConnectionTrait>(
        conn: &C,
        binding_id: Uuid,
    ) -> Result<u64, DbErr> {
        let res = Entity::delete_many()
            .filter(Column::BindingId.eq(binding_id))
            .exec(conn)
            .await?;
        Ok(res.rows_affected)
    }

    pub async fn delete_for_recipient<C: ConnectionTrait>(
        conn: &C,
        recipient_id: Uuid,
    ) -> Result<u64, DbErr> {
        let res = Entity::delete_many()
            .filter(Column::RecipientId.eq(recipient_id))
            .exec(conn)
            .await?;
        Ok(res.rows_affected)
    }
}
