pub mod config;
pub mod console;
pub mod engine;
pub mod error;
pub mod logging;
pub mod model;
