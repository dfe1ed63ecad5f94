//! Infrastructure layer: persistence and auth primitives.

pub mod auth;
pub mod storage;
