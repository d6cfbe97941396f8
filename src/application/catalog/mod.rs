//! Room catalog queries

pub mod service;

pub use service::CatalogClient;
