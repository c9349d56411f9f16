//! Application state - shared across all handlers.

use std::sync::Arc;

use circle_core::ports::{
    AccountRepository, MediaStore, PasswordService, PostRepository, ProfileRepository,
    TokenService, UserRepository,
};
use circle_infra::{
    Argon2PasswordService, DatabaseConfig, InMemoryStore, JwtConfig, JwtTokenService,
    LocalMediaStore, MediaConfig,
};

#[cfg(feature = "postgres")]
use circle_infra::{
    PostgresAccountRepository, PostgresPostRepository, PostgresProfileRepository,
    PostgresUserRepository,
};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub accounts: Arc<dyn AccountRepository>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    pub media: Arc<dyn MediaStore>,
}

impl AppState {
    /// Build the application state, connecting to PostgreSQL when configured.
    pub async fn new(config: &AppConfig) -> std::io::Result<Self> {
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());
        let media: Arc<dyn MediaStore> = Arc::new(LocalMediaStore::new(config.media.clone()));

        if let Some(db_config) = &config.database {
            if let Some(state) = Self::postgres(db_config, &tokens, &passwords, &media).await? {
                tracing::info!("Application state initialized (postgres)");
                return Ok(state);
            }
        }

        tracing::warn!("Running with the in-memory store; data is lost on restart.");

        Ok(Self::with_memory_store(tokens, passwords, media))
    }

    #[cfg(feature = "postgres")]
    async fn postgres(
        db_config: &DatabaseConfig,
        tokens: &Arc<dyn TokenService>,
        passwords: &Arc<dyn PasswordService>,
        media: &Arc<dyn MediaStore>,
    ) -> std::io::Result<Option<Self>> {
        let conn = db_config.connect().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to connect to database");
            std::io::Error::other(e.to_string())
        })?;

        Ok(Some(Self {
            users: Arc::new(PostgresUserRepository::new(conn.clone())),
            profiles: Arc::new(PostgresProfileRepository::new(conn.clone())),
            posts: Arc::new(PostgresPostRepository::new(conn.clone())),
            accounts: Arc::new(PostgresAccountRepository::new(conn)),
            tokens: tokens.clone(),
            passwords: passwords.clone(),
            media: media.clone(),
        }))
    }

    #[cfg(not(feature = "postgres"))]
    async fn postgres(
        _db_config: &DatabaseConfig,
        _tokens: &Arc<dyn TokenService>,
        _passwords: &Arc<dyn PasswordService>,
        _media: &Arc<dyn MediaStore>,
    ) -> std::io::Result<Option<Self>> {
        tracing::warn!("DATABASE_URL set but postgres feature disabled");
        Ok(None)
    }

    /// State over a fresh in-memory store.
    pub fn in_memory(jwt: JwtConfig, media: MediaConfig) -> Self {
        Self::with_memory_store(
            Arc::new(JwtTokenService::new(jwt)),
            Arc::new(Argon2PasswordService::new()),
            Arc::new(LocalMediaStore::new(media)),
        )
    }

    fn with_memory_store(
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
        media: Arc<dyn MediaStore>,
    ) -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            users: store.clone(),
            profiles: store.clone(),
            posts: store.clone(),
            accounts: store,
            tokens,
            passwords,
            media,
        }
    }
}
