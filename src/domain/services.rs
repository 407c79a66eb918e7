//! Domain services
//!
//! Contains the collaborator seams the catalog pipeline talks to.

pub mod catalog_services;

pub use catalog_services::{CatalogStore, StoreSnapshot};
