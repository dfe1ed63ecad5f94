//! Credential hashing and access-token plumbing.

pub mod password;
pub mod tokens;
