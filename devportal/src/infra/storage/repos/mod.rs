//! Stateless query helpers per entity.
//!
//! Every function is generic over [`ConnectionTrait`] so callers decide
//! whether it runs on the pooled connection or inside a transaction.

use devportal_sdk::PageRequest;
use sea_orm::{ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QuerySelect, Select};

mod activity;
mod bindings;
mod devices;
mod identity_users;
mod portal_users;
mod shares;
mod tasks;
mod tenants;

pub use activity::ActivityRepo;
pub use bindings::BindingsRepo;
pub use devices::DevicesRepo;
pub use identity_users::{IdentityUsersRepo, NewIdentityUser};
pub use portal_users::{NewPortalUser, PortalUserChanges, PortalUsersRepo};
pub use shares::SharesRepo;
pub use tasks::TasksRepo;
pub use tenants::TenantsRepo;

/// Run a filtered query as one page: total counted independently of the
/// window, then the window itself. Ordering is the caller's concern.
pub(crate) async fn fetch_page<E, C>(
    query: Select<E>,
    page: PageRequest,
    conn: &C,
) -> Result<(Vec<E::Model>, u64), DbErr>
where
    E: EntityTrait,
    E::Model: Send + Sync,
    C: ConnectionTrait,
{
    let total = query.clone().count(conn).await?;
    let items = query
        .offset(page.offset())
        .limit(page.size)
        .all(conn)
        .await?;
    Ok((items, total))
}
