pub mod permission_sets;

pub use permission_sets::create as permission_set_create;
pub use permission_sets::delete as permission_set_delete;
pub use permission_sets::list as permission_set_list;
pub use permission_sets::show as permission_set_show;
pub use permission_sets::update as permission_set_update;
