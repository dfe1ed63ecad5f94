//! Storage layer: all `SeaORM`-specific code lives here.
//!
//! - `entity/` - entity definitions
//! - `migrations/` - schema migrations
//! - `repos/` - stateless query helpers, generic over [`sea_orm::ConnectionTrait`]
//!   so every call can run on a plain connection or inside a transaction
//! - `mapper.rs` - conversions between entity models and SDK contract types

pub mod db;
pub mod entity;
pub mod mapper;
pub mod migrations;
pub mod repos;
