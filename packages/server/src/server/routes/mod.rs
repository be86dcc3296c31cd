// HTTP routes
pub mod admin;
pub mod health;
pub mod listings;

pub use admin::*;
pub use health::*;
pub use listings::*;
