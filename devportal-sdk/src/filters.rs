use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Role;

const DEFAULT_PAGE_SIZE: u64 = 50;

/// 1-indexed page window for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u64,
    pub size: u64,
}

impl PageRequest {
    #[must_use]
    pub fn new(page: u64, size: u64) -> Self {
        Self {
            page: page.max(1),
            size,
        }
    }

    /// Row offset of the first item on this page. The fields are
    /// public and deserializable, so `page: 0` reaching here must not
    /// underflow; it reads as the first page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1) * self.size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Filters for listing identity users. Unset filters are not applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityUserFilter {
    pub tenant_id: Option<Uuid>,
    #[serde(default)]
    pub page: PageRequest,
}

/// Filters for listing devices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceFilter {
    pub tenant_id: Option<Uuid>,
    pub identity_user_id: Option<Uuid>,
    #[serde(default)]
    pub page: PageRequest,
}

/// Filters for listing device bindings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingFilter {
    pub tenant_id: Option<Uuid>,
    pub identity_user_id: Option<Uuid>,
    pub device_id: Option<Uuid>,
    #[serde(default)]
    pub page: PageRequest,
}

/// Filters for listing shares.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareFilter {
    pub tenant_id: Option<Uuid>,
    pub recipient_id: Option<Uuid>,
    pub binding_id: Option<Uuid>,
    #[serde(default)]
    pub page: PageRequest,
}

/// Filters for listing portal activity records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalActivityFilter {
    pub tenant_id: Option<Uuid>,
    pub portal_user_id: Option<Uuid>,
    pub identity_user_id: Option<Uuid>,
    pub device_id: Option<Uuid>,
    pub binding_id: Option<Uuid>,
    pub share_id: Option<Uuid>,
    #[serde(default)]
    pub page: PageRequest,
}

/// Filters for listing device activity records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceActivityFilter {
    pub tenant_id: Option<Uuid>,
    pub identity_user_id: Option<Uuid>,
    pub device_id: Option<Uuid>,
    pub binding_id: Option<Uuid>,
    #[serde(default)]
    pub page: PageRequest,
}

/// Filters for listing portal users.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalUserFilter {
    pub role: Option<Role>,
    /// Substring match on the email column.
    pub email_contains: Option<String>,
    #[serde(default)]
    pub page: PageRequest,
}

#[cfg(test)]
mod tests {
    use super::PageRequest;

    #[test]
    fn offset_walks_one_indexed_pages() {
        assert_eq!(PageRequest::new(1, 10).offset(), 0);
        assert_eq!(PageRequest::new(3, 10).offset(), 20);
    }

    #[test]
    fn page_zero_reads_as_the_first_page() {
        // Bypasses the clamp in `new` the way a deserialized value can.
        let raw = PageRequest { page: 0, size: 10 };
        assert_eq!(raw.offset(), 0);
        assert_eq!(PageRequest::new(0, 10).page, 1);
    }
}
