//! REST transport (reqwest) and wire DTOs

mod api_client;
pub mod dto;

pub use api_client::ApiClient;
