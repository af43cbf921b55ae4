pub mod permission_set_service;

pub use permission_set_service::{
    CreatePermissionSet, PermissionSetError, PermissionSetService, PermissionSetSummary,
    UpdatePermissionSet,
};
