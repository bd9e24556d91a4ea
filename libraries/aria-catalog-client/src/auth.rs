//! Bearer token sources for catalog requests.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Supplies the bearer token attached to catalog requests.
///
/// Identity providers usually hand out short-lived tokens, so the client asks
/// for a token on every request instead of caching one.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Current access token, or `None` for anonymous requests.
    async fn access_token(&self) -> Option<String>;
}

/// A fixed token that can be swapped at runtime (sign-in, sign-out).
#[derive(Debug, Clone, Default)]
pub struct StaticToken {
    token: Arc<RwLock<Option<String>>>,
}

impl StaticToken {
    /// Create a provider holding `token`.
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: Arc::new(RwLock::new(token.filter(|t| !t.is_empty()))),
        }
    }

    /// Replace the stored token.
    pub async fn set(&self, token: Option<String>) {
        *self.token.write().await = token.filter(|t| !t.is_empty());
    }

    /// Clear the stored token (sign-out).
    pub async fn clear(&self) {
        *self.token.write().await = None;
    }
}

#[async_trait]
impl TokenProvider for StaticToken {
    async fn access_token(&self) -> Option<String> {
        self.token.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_token_is_anonymous() {
        let provider = StaticToken::new(Some(String::new()));
        assert!(provider.access_token().await.is_none());
    }

    #[tokio::test]
    async fn token_can_be_replaced_and_cleared() {
        let provider = StaticToken::new(None);
        let shared = provider.clone();

        provider.set(Some("abc".to_string())).await;
        assert_eq!(shared.access_token().await.as_deref(), Some("abc"));

        shared.clear().await;
        assert!(provider.access_token().await.is_none());
    }
}
