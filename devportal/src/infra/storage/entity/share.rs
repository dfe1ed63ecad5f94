use sea_orm::entity::prelude::*;
use time::OffsetDateTime;
use uuid::Uuid;

/// Grant letting `recipient_id` see the owner email of `binding_id`.
///
/// At most one row per (binding, recipient) pair, enforced by a
/// pre-insert existence check rather than a unique constraint.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "shares")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub binding_id: Uuid,
    pub recipient_id: Uuid,
    pub created_by: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_by: Option<String>,
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::device_binding::Entity",
        from = "Column::BindingId",
        to = "super::device_binding::Column::Id"
    )]
    Binding,
    #[sea_orm(
        belongs_to = "super::identity_user::Entity",
        from = "Column::RecipientId",
        to = "super::identity_user::Column::Id"
    )]
    Recipient,
}

impl Related<super::device_binding::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Binding.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
