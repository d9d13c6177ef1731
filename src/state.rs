use std::sync::Arc;

use crate::auth::{PasswordHasher, TokenService};
use crate::config::AppConfig;
use crate::database::Store;

/// Shared handles injected into every handler through axum state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub tokens: Arc<TokenService>,
    pub hasher: PasswordHasher,
    pub enable_cors: bool,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, tokens: TokenService, hasher: PasswordHasher) -> Self {
        Self {
            store,
            tokens: Arc::new(tokens),
            hasher,
            enable_cors: true,
        }
    }

    /// Wire the token service, hasher and CORS switch from configuration.
    pub fn from_config(store: Arc<dyn Store>, config: &AppConfig) -> Self {
        let security = &config.security;
        Self {
            store,
            tokens: Arc::new(TokenService::new(&security.jwt_secret, security.jwt_expiry_hours)),
            hasher: PasswordHasher::new(security.bcrypt_cost),
            enable_cors: security.enable_cors,
        }
    }
}
