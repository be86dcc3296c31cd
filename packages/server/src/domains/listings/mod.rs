pub mod data;
pub mod models;
pub mod store;

pub use store::{ImageUpload, ListingStore};
