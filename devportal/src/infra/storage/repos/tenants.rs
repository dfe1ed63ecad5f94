use devportal_sdk::PageRequest;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::infra::storage::entity::tenant::{ActiveModel, Column, Entity, Model};
use crate::infra::storage::repos::fetch_page;

pub struct TenantsRepo;

impl TenantsRepo {
    pub async fn by_id<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id).one(conn).await
    }

    pub async fn by_provider_org_id<C: ConnectionTrait>(
        conn: &C,
        provider_org_id: &str,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::ProviderOrgId.eq(provider_org_id))
            .one(conn)
            .await
    }

    pub async fn create<C: ConnectionTrait>(
        conn: &C,
        provider_org_id: String,
        name: Option<String>,
        actor: &str,
    ) -> Result<Model, DbErr> {
        let now = OffsetDateTime::now_utc();
        ActiveModel {
            id: Set(Uuid::now_v7()),
            provider_org_id: Set(provider_org_id),
            name: Set(name),
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
        page: PageRequest,
    ) -> Result<(Vec<Model>, u64), DbErr> {
        let query = Entity::find().order_by_desc(Column::CreatedAt);
        fetch_page(query, page, conn).await
    }

    pub async fn delete_by_id<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<(), DbErr> {
        Entity::delete_by_id(id).exec(conn).await?;
        Ok(())
    }
}
