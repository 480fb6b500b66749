pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod service;
pub mod session;
pub mod types;
pub mod views;

pub use error::BookwormError;
pub use router::{BookwormState, bookworm_router};
