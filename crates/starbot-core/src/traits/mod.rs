//! Ports implemented by infrastructure crates

mod chat_client;

pub use chat_client::{ChatClient, ClientResult};
