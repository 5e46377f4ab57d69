//! Resource clients, one per API area.

mod authorizations;
mod miscellaneous;
mod notifications;
mod organizations;
mod releases;
mod repositories;
mod ssh_keys;
mod users;

pub use authorizations::*;
pub use miscellaneous::*;
pub use notifications::*;
pub use organizations::*;
pub use releases::*;
pub use repositories::*;
pub use ssh_keys::*;
pub use users::*;
