use sea_orm::entity::prelude::*;
use time::OffsetDateTime;
use uuid::Uuid;

/// Append-only record of a portal (admin) action.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "portal_activity")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub portal_user_id: Option<Uuid>,
    /// Logical endpoint that triggered the action, e.g. `/shares`.
    pub endpoint: String,
    pub action: String,
    pub identity_user_id: Option<Uuid>,
    pub tenant_id: Option<Uuid>,
    pub device_id: Option<Uuid>,
    pub binding_id: Option<Uuid>,
    pub share_id: Option<Uuid>,
    pub created_by: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_by: Option<String>,
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::identity_user::Entity",
        from = "Column::IdentityUserId",
        to = "super::identity_user::Column::Id"
    )]
    IdentityUser,
}

impl ActiveModelBehavior for ActiveModel {}
