mod group;
mod pagination;
mod scim;

pub use group::*;
pub use pagination::*;
pub use scim::*;
