// Campus Marketplace - API Core
//
// This crate provides the backend API for a campus marketplace: product and
// service listings with an admin moderation workflow, image hosting delegated
// to a third-party media store, and a single-admin JWT login.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
