use std::env;

/// Deployment environment, selected by `APP_ENV`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn from_env() -> Self {
        match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Self::Production,
            _ => Self::Development,
        }
    }

    pub const fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub frontend_url: String,
    /// Upstream chat-completion provider. The key is optional on purpose:
    /// its absence surfaces as an upstream failure at request time, not at
    /// startup.
    pub llm_api_key: Option<String>,
    pub llm_base_url: String,
    pub llm_model: String,
    /// Object-storage service; when unset, best-effort file deletes are
    /// skipped with a warning.
    pub storage_url: Option<String>,
    pub storage_service_key: Option<String>,
    pub allowed_origins: String,
    pub env: Environment,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")?,
            jwt_secret: env::var("JWT_SECRET")?,
            frontend_url: env::var("FRONTEND_URL")?,
            llm_api_key: env::var("LLM_API_KEY").ok(),
            llm_base_url: env::var("LLM_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            llm_model: env::var("LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            storage_url: env::var("STORAGE_URL").ok(),
            storage_service_key: env::var("STORAGE_SERVICE_KEY").ok(),
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            env: Environment::from_env(),
        })
    }

    /// The CORS allow-list, parsed from the comma-separated env value.
    pub fn parsed_allowed_origins(&self) -> Vec<String> {
        self.allowed_origins
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parsed_allowed_origins() {
        let config = ApiConfig {
            database_url: String::new(),
            jwt_secret: String::new(),
            frontend_url: String::new(),
            llm_api_key: None,
            llm_base_url: String::new(),
            llm_model: String::new(),
            storage_url: None,
            storage_service_key: None,
            allowed_origins: "http://localhost:8080, https://app.example.com,".to_string(),
            env: Environment::Development,
        };
        assert_eq!(
            config.parsed_allowed_origins(),
            vec!["http://localhost:8080", "https://app.example.com"]
        );
    }
}
