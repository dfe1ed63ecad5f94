use devportal_sdk::{
    ActivityRefs, DeviceActivityFilter, DeviceActivityKind, PortalAction, PortalActivityFilter,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::infra::storage::entity::{device_activity, identity_user, portal_activity};
use crate::infra::storage::repos::fetch_page;

/// Append-only writes and scoped reads over both activity logs.
pub struct ActivityRepo;

impl ActivityRepo {
    pub async fn insert_device<C: ConnectionTrait>(
        conn: &C,
        identity_user_id: Option<Uuid>,
        device_id: Option<Uuid>,
        binding_id: Option<Uuid>,
        login_as: Option<String>,
        kind: DeviceActivityKind,
        actor: &str,
    ) -> Result<device_activity::Model, DbErr> {
        let now = OffsetDateTime::now_utc();
        device_activity::ActiveModel {
            id: Set(Uuid::now_v7()),
            identity_user_id: Set(identity_user_id),
            device_id: Set(device_id),
            binding_id: Set(binding_id),
            login_as: Set(login_as),
            kind: Set(kind.as_str().to_owned()),
            created_by: Set(Some(actor.to_owned())),
            created_at: Set(now),
            updated_by: Set(None),
            updated_at: Set(now),
        }
        .insert(conn)
        .await
    }

    pub async fn insert_portal<C: ConnectionTrait>(
        conn: &C,
        portal_user_id: Option<Uuid>,
        endpoint: &str,
        action: PortalAction,
        refs: ActivityRefs,
        actor: &str,
    ) -> Result<portal_activity::Model, DbErr> {
        let now = OffsetDateTime::now_utc();
        portal_activity::ActiveModel {
            id: Set(Uuid::now_v7()),
            portal_user_id: Set(portal_user_id),
            endpoint: Set(endpoint.to_owned()),
            action: Set(action.as_str().to_owned()),
            identity_user_id: Set(refs.identity_user_id),
            tenant_id: Set(refs.tenant_id),
            device_id: Set(refs.device_id),
            binding_id: Set(refs.binding_id),
            share_id: Set(refs.share_id),
            created_by: Set(Some(actor.to_owned())),
            created_at: Set(now),
            updated_by: Set(None),
            updated_at: Set(now),
        }
        .insert(conn)
        .await
    }

    pub async fn list_device<C: ConnectionTrait>(
        conn: &C,
        filter: &DeviceActivityFilter,
    ) -> Result<(Vec<device_activity::Model>, u64), DbErr> {
        let mut query = device_activity::Entity::find();
        if let Some(tenant_id) = filter.tenant_id {
            query = query
                .join(
                    JoinType::InnerJoin,
                    device_activity::Relation::IdentityUser.def(),
                )
                .filter(identity_user::Column::TenantId.eq(tenant_id));
        }
        if let Some(user_id) = filter.identity_user_id {
            query = query.filter(device_activity::Column::IdentityUserId.eq(user_id));
        }
        if let Some(device_id) = filter.device_id {
            query = query.filter(device_activity::Column::DeviceId.eq(device_id));
        }
        if let Some(binding_id) = filter.binding_id {
            query = query.filter(device_activity::Column::BindingId.eq(binding_id));
        }
        fetch_page(
            query.order_by_desc(device_activity::Column::CreatedAt),
            filter.page,
            conn,
        )
        .await
    }

    pub async fn list_portal<C: ConnectionTrait>(
        conn: &C,
        filter: &PortalActivityFilter,
    ) -> Result<(Vec<portal_activity::Model>, u64), DbErr> {
        let mut query = portal_activity::Entity::find();
        // Tenant is not stored on every row; scope through the
        // referenced identity user instead.
        if let Some(tenant_id) = filter.tenant_id {
            query = query
                .join(
                    JoinType::InnerJoin,
                    portal_activity::Relation::IdentityUser.def(),
                )
                .filter(identity_user::Column::TenantId.eq(tenant_id));
        }
        if let Some(portal_user_id) = filter.portal_user_id {
            query = query.filter(portal_activity::Column::PortalUserId.eq(portal_user_id));
        }
        if let Some(user_id) = filter.identity_user_id {
            query = query.filter(portal_activity::Column::IdentityUserId.eq(user_id));
        }
        if let Some(device_id) = filter.device_id {
            query = query.filter(portal_activity::Column::DeviceId.eq(device_id));
        }
        if let Some(binding_id) = filter.binding_id {
            query = query.filter(portal_activity::Column::BindingId.eq(binding_id));
        }
        if let Some(share_id) = filter.share_id {
            query = query.filter(portal_activity::Column::ShareId.eq(share_id));
        }
        fetch_page(
            query.order_by_desc(portal_activity::Column::CreatedAt),
            filter.page,
            conn,
        )
        .await
    }
}
