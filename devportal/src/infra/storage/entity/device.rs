use sea_orm::entity::prelude::*;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "devices")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// External device identifier reported by the client.
    #[sea_orm(unique)]
    pub external_id: String,
    pub name: Option<String>,
    /// Identity user that first connected this device.
    pub registered_by: Option<Uuid>,
    pub created_by: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_by: Option<String>,
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::identity_user::Entity",
        from = "Column::RegisteredBy",
        to = "super::identity_user::Column::Id"
    )]
    RegisteredByUser,
    #[sea_orm(has_many = "super::device_binding::Entity")]
    Bindings,
}

impl Related<super::device_binding::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bindings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
