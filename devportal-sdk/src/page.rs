use serde::{Deserialize, Serialize};

/// One page of a listing.
///
/// `total` is the number of rows matching the filter, counted
/// independently of the page window. Pages are 1-indexed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub size: u64,
}
