pub mod store;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ClientError;
use crate::models::UserProfile;

pub use store::{FileSessionStore, MemorySessionStore};

/// Credentials and profile of the signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserProfile,
}

/// Durable home of the session. Implementations keep the three entries
/// (access token, refresh token, profile) together and clear them together.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self) -> Result<Option<Session>, ClientError>;
    async fn save(&self, session: &Session) -> Result<(), ClientError>;
    /// Replaces the tokens of the stored session, keeping the profile.
    /// The refresh token is left as is when `refresh_token` is `None`.
    async fn set_tokens(
        &self,
        access_token: &str,
        refresh_token: Option<&str>,
    ) -> Result<(), ClientError>;
    async fn clear(&self) -> Result<(), ClientError>;
}
