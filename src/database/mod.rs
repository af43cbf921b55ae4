pub mod fixture;
pub mod manager;
pub mod memory;
pub mod models;
pub mod repository;

pub use fixture::{FixtureError, SiteFixture};
pub use manager::{DatabaseError, DatabaseManager};
pub use memory::{ForumData, MemoryForumRepository};
pub use repository::{ForumRepository, PgForumRepository};
