use std::sync::Arc;

use sqlx::PgPool;

use sp_cache::QueryCache;

use crate::{
    ApiConfig,
    ai::client::LlmClient,
    config::Environment,
    storage::StorageClient,
};

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct ApiState {
    pub pool: PgPool,
    /// Read-through query cache; invalidated on every successful mutation.
    pub cache: Arc<QueryCache>,
    pub jwt_secret: String,
    pub llm: LlmClient,
    /// Object-storage client; `None` when storage is not configured, in
    /// which case file deletes are skipped with a warning.
    pub storage: Option<StorageClient>,
    pub environment: Environment,
}

impl ApiState {
    pub fn new(config: ApiConfig, pool: PgPool) -> Self {
        let llm = LlmClient::new(
            config.llm_base_url.clone(),
            config.llm_api_key.clone(),
            config.llm_model.clone(),
        );

        let storage = match (&config.storage_url, &config.storage_service_key) {
            (Some(url), Some(key)) => Some(StorageClient::new(url.clone(), key.clone())),
            _ => {
                tracing::warn!(
                    "Object storage not configured (missing STORAGE_URL / STORAGE_SERVICE_KEY); \
                     material file deletes will be skipped"
                );
                None
            }
        };

        Self {
            pool,
            cache: Arc::new(QueryCache::new()),
            jwt_secret: config.jwt_secret,
            llm,
            storage,
            environment: config.env,
        }
    }
}
