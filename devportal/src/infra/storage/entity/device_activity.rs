use sea_orm::entity::prelude::*;
use time::OffsetDateTime;
use uuid::Uuid;

/// Append-only record of a device-side action.
///
/// Entity references are nullable and cleared (not cascaded) when the
/// referenced row is deleted, so the log outlives its subjects.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "device_activity")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub identity_user_id: Option<Uuid>,
    pub device_id: Option<Uuid>,
    pub binding_id: Option<Uuid>,
    /// Email the user chose to log in as, when the login went through a
    /// shared binding.
    pub login_as: Option<String>,
    pub kind: String,
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
    #[sea_orm(
        belongs_to = "super::device::Entity",
        from = "Column::DeviceId",
        to = "super::device::Column::Id"
    )]
    Device,
}

impl ActiveModelBehavior for ActiveModel {}
