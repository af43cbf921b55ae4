pub mod category;
pub mod forum;
pub mod member;
pub mod permission_set;

pub use category::CategoryRow;
pub use forum::ForumRow;
pub use member::MemberRow;
pub use permission_set::{PermissionRow, PermissionSetRow};
