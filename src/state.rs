//! Shared application state and startup wiring

use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use warp::Filter;

use crate::auth::{AccountService, TokenError, TokenService};
use crate::blog::PostService;
use crate::chat::ChatRelay;
use crate::config::{AppConfig, ConfigError};
use crate::db::{self, BlogDb, DbConfig};
use crate::error::AppError;
use crate::llm::{GroqClient, GroqModel, LlmError};
use crate::upload::{CloudinaryClient, UploadError};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("database error: {0}")]
    Database(#[from] db::Error),

    #[error("token service error: {0}")]
    Token(#[from] TokenError),

    #[error("LLM client error: {0}")]
    Llm(#[from] LlmError),

    #[error("upload client error: {0}")]
    Upload(#[from] UploadError),

    #[error("seeding failed: {0}")]
    Seed(#[from] AppError),
}

/// Everything handlers need, built once at startup
#[derive(Clone)]
pub struct AppState {
    pub db: BlogDb,
    pub accounts: AccountService,
    pub posts: PostService,
    pub chat: ChatRelay,
    /// Absent when no upload credentials are configured
    pub uploader: Option<Arc<CloudinaryClient>>,
}

impl AppState {
    pub fn new(
        db: BlogDb,
        tokens: TokenService,
        chat: ChatRelay,
        uploader: Option<CloudinaryClient>,
    ) -> Self {
        Self {
            accounts: AccountService::new(db.clone(), tokens),
            posts: PostService::new(db.clone()),
            db,
            chat,
            uploader: uploader.map(Arc::new),
        }
    }

    pub fn tokens(&self) -> &TokenService {
        self.accounts.tokens()
    }
}

/// Filter handing a clone of the state to each handler
pub fn with_state(
    state: AppState,
) -> impl Filter<Extract = (AppState,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || state.clone())
}

/// Connect, create the schema, seed the admin account and build the clients
pub async fn bootstrap(config: &AppConfig) -> Result<AppState, StartupError> {
    let db_config = DbConfig::from_connection_string(&config.database_url)?
        .with_max_pool_size(config.db_max_pool_size);
    info!(
        "Connecting to database {} at {}:{}",
        db_config.database, db_config.host, db_config.port
    );
    let db = BlogDb::new(db_config).await?;
    db.initialize_schema().await?;
    info!("Database schema ready");

    let tokens = TokenService::new(config.jwt_secret.as_bytes(), config.token_ttl)?;

    let groq = GroqClient::new(config.groq_api_key.clone(), GroqModel::default())?;
    info!("Chat model: {}", groq.model().as_str());
    let chat = ChatRelay::new(Arc::new(groq));

    let uploader = match &config.cloudinary_url {
        Some(url) => Some(CloudinaryClient::from_url(url)?),
        None => {
            warn!("CLOUDINARY_URL not set, image upload disabled");
            None
        }
    };

    let state = AppState::new(db, tokens, chat, uploader);
    state
        .accounts
        .seed_admin(&config.admin_username, &config.admin_password)
        .await?;

    Ok(state)
}
