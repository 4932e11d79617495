pub mod client;
pub mod models;
pub mod queries;

pub use client::{classify_response, HttpQueryExecutor};
