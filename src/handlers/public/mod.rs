pub mod forums;

// Re-export handler functions for use in routing
pub use forums::authorize as forum_authorize;
pub use forums::permissions as forum_permissions;
pub use forums::readable as forums_readable;
