pub mod classify_client;

pub use classify_client::ClassifyClient;
