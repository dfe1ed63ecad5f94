//! `SeaORM` entity definitions.
//!
//! Every table carries the same audit quartet: `created_by`,
//! `created_at`, `updated_by`, `updated_at`.

pub mod device;
pub mod device_activity;
pub mod device_binding;
pub mod identity_user;
pub mod portal_activity;
pub mod portal_user;
pub mod share;
pub mod task_status;
pub mod tenant;
