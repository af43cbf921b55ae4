// handlers/mod.rs - two handler tiers
//
// Public: any caller, anonymous included. Every handler checks the forum's
//         permission set against the caller's effective roles.
// Admin:  members holding the Admin role on the site.
pub mod admin;
pub mod public;
