pub mod engine;
pub mod protocol;
pub mod store;

pub mod api_client;
pub mod apply_response;
pub mod fallback;
pub mod normalizer;
pub mod transport;
