pub mod client;
pub mod errors;
#[cfg(test)]
pub mod mock_cloud_oauth;
pub mod models;
pub mod service;
