use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

fn audit_columns(table: &mut TableCreateStatement) -> &mut TableCreateStatement {
    table
        .col(ColumnDef::new(Audit::CreatedBy).string())
        .col(
            ColumnDef::new(Audit::CreatedAt)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(ColumnDef::new(Audit::UpdatedBy).string())
        .col(
            ColumnDef::new(Audit::UpdatedAt)
                .timestamp_with_time_zone()
                .not_null(),
        )
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut tenants = Table::create()
            .table(Tenants::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Tenants::Id)
                    .uuid()
                    .not_null()
                    .primary_key(),
            )
            .col(
                ColumnDef::new(Tenants::ProviderOrgId)
                    .string()
                    .not_null()
                    .unique_key(),
            )
            .col(ColumnDef::new(Tenants::Name).string())
            .to_owned();
        manager.create_table(audit_columns(&mut tenants).to_owned()).await?;

        let mut identity_users = Table::create()
            .table(IdentityUsers::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(IdentityUsers::Id)
                    .uuid()
                    .not_null()
                    .primary_key(),
            )
            .col(
                ColumnDef::new(IdentityUsers::Email)
                    .string()
                    .not_null()
                    .unique_key(),
            )
            .col(
                ColumnDef::new(IdentityUsers::ProviderUserId)
                    .string()
                    .unique_key(),
            )
            .col(ColumnDef::new(IdentityUsers::TenantId).uuid())
            .col(ColumnDef::new(IdentityUsers::Name).string())
            .col(ColumnDef::new(IdentityUsers::PinHash).string())
            .foreign_key(
                ForeignKey::create()
                    .name("fk_identity_users_tenant")
                    .from(IdentityUsers::Table, IdentityUsers::TenantId)
                    .to(Tenants::Table, Tenants::Id)
                    .on_delete(ForeignKeyAction::Restrict),
            )
            .to_owned();
        manager
            .create_table(audit_columns(&mut identity_users).to_owned())
            .await?;

        let mut devices = Table::create()
            .table(Devices::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Devices::Id)
                    .uuid()
                    .not_null()
                    .primary_key(),
            )
            .col(
                ColumnDef::new(Devices::ExternalId)
                    .string()
                    .not_null()
                    .unique_key(),
            )
            .col(ColumnDef::new(Devices::Name).string())
            .col(ColumnDef::new(Devices::RegisteredBy).uuid())
            .foreign_key(
                ForeignKey::create()
                    .name("fk_devices_registered_by")
                    .from(Devices::Table, Devices::RegisteredBy)
                    .to(IdentityUsers::Table, IdentityUsers::Id)
                    .on_delete(ForeignKeyAction::SetNull),
            )
            .to_owned();
        manager.create_table(audit_columns(&mut devices).to_owned()).await?;

        let mut bindings = Table::create()
            .table(DeviceBindings::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(DeviceBindings::Id)
                    .uuid()
                    .not_null()
                    .primary_key(),
            )
            .col(ColumnDef::new(DeviceBindings::DeviceId).uuid().not_null())
            .col(
                ColumnDef::new(DeviceBindings::IdentityUserId)
                    .uuid()
                    .not_null(),
            )
            .col(
                ColumnDef::new(DeviceBindings::DeviceUsername)
                    .string()
                    .not_null(),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_device_bindings_device")
                    .from(DeviceBindings::Table, DeviceBindings::DeviceId)
                    .to(Devices::Table, Devices::Id)
                    .on_delete(ForeignKeyAction::Restrict),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_device_bindings_owner")
                    .from(DeviceBindings::Table, DeviceBindings::IdentityUserId)
                    .to(IdentityUsers::Table, IdentityUsers::Id)
                    .on_delete(ForeignKeyAction::Restrict),
            )
            .to_owned();
        manager.create_table(audit_columns(&mut bindings).to_owned()).await?;

        // No unique index on (device_id, device_username): duplicates are
        // prevented by application-level lookup-before-insert only.
        manager
            .create_index(
                Index::create()
                    .name("idx_device_bindings_username")
                    .table(DeviceBindings::Table)
                    .col(DeviceBindings::DeviceUsername)
                    .to_owned(),
            )
            .await?;

        let mut shares = Table::create()
            .table(Shares::Table)
            .if_not_exists()
            .col(ColumnDef::new(Shares::Id).uuid().not_null().primary_key())
            .col(ColumnDef::new(Shares::BindingId).uuid().not_null())
            .col(ColumnDef::new(Shares::RecipientId).uuid().not_null())
            .foreign_key(
                ForeignKey::create()
                    .name("fk_shares_binding")
                    .from(Shares::Table, Shares::BindingId)
                    .to(DeviceBindings::Table, DeviceBindings::Id)
                    .on_delete(ForeignKeyAction::Restrict),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_shares_recipient")
                    .from(Shares::Table, Shares::RecipientId)
                    .to(IdentityUsers::Table, IdentityUsers::Id)
                    .on_delete(ForeignKeyAction::Restrict),
            )
            .to_owned();
        manager.create_table(audit_columns(&mut shares).to_owned()).await?;

        let mut device_activity = Table::create()
            .table(DeviceActivity::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(DeviceActivity::Id)
                    .uuid()
                    .not_null()
                    .primary_key(),
            )
            .col(ColumnDef::new(DeviceActivity::IdentityUserId).uuid())
            .col(ColumnDef::new(DeviceActivity::DeviceId).uuid())
            .col(ColumnDef::new(DeviceActivity::BindingId).uuid())
            .col(ColumnDef::new(DeviceActivity::LoginAs).string())
            .col(ColumnDef::new(DeviceActivity::Kind).string().not_null())
            .foreign_key(
                ForeignKey::create()
                    .name("fk_device_activity_user")
                    .from(DeviceActivity::Table, DeviceActivity::IdentityUserId)
                    .to(IdentityUsers::Table, IdentityUsers::Id)
                    .on_delete(ForeignKeyAction::SetNull),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_device_activity_device")
                    .from(DeviceActivity::Table, DeviceActivity::DeviceId)
                    .to(Devices::Table, Devices::Id)
                    .on_delete(ForeignKeyAction::SetNull),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_device_activity_binding")
                    .from(DeviceActivity::Table, DeviceActivity::BindingId)
                    .to(DeviceBindings::Table, DeviceBindings::Id)
                    .on_delete(ForeignKeyAction::SetNull),
            )
            .to_owned();
        manager
            .create_table(audit_columns(&mut device_activity).to_owned())
            .await?;

        let mut portal_users = Table::create()
            .table(PortalUsers::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(PortalUsers::Id)
                    .uuid()
                    .not_null()
                    .primary_key(),
            )
            .col(
                ColumnDef::new(PortalUsers::Email)
                    .string()
                    .not_null()
                    .unique_key(),
            )
            .col(ColumnDef::new(PortalUsers::Name).string())
            .col(
                ColumnDef::new(PortalUsers::PasswordHash)
                    .string()
                    .not_null(),
            )
            .col(ColumnDef::new(PortalUsers::Role).string().not_null())
            .col(ColumnDef::new(PortalUsers::TenantId).uuid())
            .col(
                ColumnDef::new(PortalUsers::Active)
                    .boolean()
                    .not_null()
                    .default(true),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_portal_users_tenant")
                    .from(PortalUsers::Table, PortalUsers::TenantId)
                    .to(Tenants::Table, Tenants::Id)
                    .on_delete(ForeignKeyAction::SetNull),
            )
            .to_owned();
        manager
            .create_table(audit_columns(&mut portal_users).to_owned())
            .await?;

        let mut portal_activity = Table::create()
            .table(PortalActivity::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(PortalActivity::Id)
                    .uuid()
                    .not_null()
                    .primary_key(),
            )
            .col(ColumnDef::new(PortalActivity::PortalUserId).uuid())
            .col(
                ColumnDef::new(PortalActivity::Endpoint)
                    .string()
                    .not_null(),
            )
            .col(ColumnDef::new(PortalActivity::Action).string().not_null())
            .col(ColumnDef::new(PortalActivity::IdentityUserId).uuid())
            .col(ColumnDef::new(PortalActivity::TenantId).uuid())
            .col(ColumnDef::new(PortalActivity::DeviceId).uuid())
            .col(ColumnDef::new(PortalActivity::BindingId).uuid())
            .col(ColumnDef::new(PortalActivity::ShareId).uuid())
            .foreign_key(
                ForeignKey::create()
                    .name("fk_portal_activity_portal_user")
                    .from(PortalActivity::Table, PortalActivity::PortalUserId)
                    .to(PortalUsers::Table, PortalUsers::Id)
                    .on_delete(ForeignKeyAction::SetNull),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_portal_activity_user")
                    .from(PortalActivity::Table, PortalActivity::IdentityUserId)
                    .to(IdentityUsers::Table, IdentityUsers::Id)
                    .on_delete(ForeignKeyAction::SetNull),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_portal_activity_tenant")
                    .from(PortalActivity::Table, PortalActivity::TenantId)
                    .to(Tenants::Table, Tenants::Id)
                    .on_delete(ForeignKeyAction::SetNull),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_portal_activity_device")
                    .from(PortalActivity::Table, PortalActivity::DeviceId)
                    .to(Devices::Table, Devices::Id)
                    .on_delete(ForeignKeyAction::SetNull),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_portal_activity_binding")
                    .from(PortalActivity::Table, PortalActivity::BindingId)
                    .to(DeviceBindings::Table, DeviceBindings::Id)
                    .on_delete(ForeignKeyAction::SetNull),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_portal_activity_share")
                    .from(PortalActivity::Table, PortalActivity::ShareId)
                    .to(Shares::Table, Shares::Id)
                    .on_delete(ForeignKeyAction::SetNull),
            )
            .to_owned();
        manager
            .create_table(audit_columns(&mut portal_activity).to_owned())
            .await?;

        let mut task_status = Table::create()
            .table(TaskStatus::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(TaskStatus::Id)
                    .uuid()
                    .not_null()
                    .primary_key(),
            )
            .col(ColumnDef::new(TaskStatus::Kind).string().not_null())
            .col(ColumnDef::new(TaskStatus::State).string().not_null())
            .col(ColumnDef::new(TaskStatus::Message).string())
            .to_owned();
        manager
            .create_table(audit_columns(&mut task_status).to_owned())
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TaskStatus::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PortalActivity::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PortalUsers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DeviceActivity::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Shares::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DeviceBindings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Devices::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(IdentityUsers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tenants::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Audit {
    CreatedBy,
    CreatedAt,
    UpdatedBy,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Tenants {
    Table,
    Id,
    ProviderOrgId,
    Name,
}

#[derive(DeriveIden)]
enum IdentityUsers {
    Table,
    Id,
    Email,
    ProviderUserId,
    TenantId,
    Name,
    PinHash,
}

#[derive(DeriveIden)]
enum Devices {
    Table,
    Id,
    ExternalId,
    Name,
    RegisteredBy,
}

#[derive(DeriveIden)]
enum DeviceBindings {
    Table,
    Id,
    DeviceId,
    IdentityUserId,
    DeviceUsername,
}

#[derive(DeriveIden)]
enum Shares {
    Table,
    Id,
    BindingId,
    RecipientId,
}

#[derive(DeriveIden)]
enum DeviceActivity {
    Table,
    Id,
    IdentityUserId,
    DeviceId,
    BindingId,
    LoginAs,
    Kind,
}

#[derive(DeriveIden)]
enum PortalActivity {
    Table,
    Id,
    PortalUserId,
    Endpoint,
    Action,
    IdentityUserId,
    TenantId,
    DeviceId,
    BindingId,
    ShareId,
}

#[derive(DeriveIden)]
enum PortalUsers {
    Table,
    Id,
    Email,
    Name,
    PasswordHash,
    Role,
    TenantId,
    Active,
}

#[derive(DeriveIden)]
enum TaskStatus {
    Table,
    Id,
    Kind,
    State,
    Message,
}
