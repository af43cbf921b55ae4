//! Forum authorization: permission resolution, the role predicate and the
//! gate rules applied by the HTTP handlers.

pub mod context;
pub mod gate;
pub mod model;
pub mod service;

pub use context::MemberContext;
pub use gate::{authorize, ForumAction, ForumPermissions};
pub use model::{PermissionModel, PermissionModelBuilder, SecurityError};
pub use service::has_permission;
