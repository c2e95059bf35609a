pub mod api;
pub mod config;
pub mod error;
pub mod listing;
pub mod models;
pub mod navigation;
pub mod services;
pub mod session;
pub mod validation;

pub use api::ApiClient;
pub use config::ClientConfig;
pub use error::ClientError;
pub use session::{FileSessionStore, MemorySessionStore, Session, SessionStore};
