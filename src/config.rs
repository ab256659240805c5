use std::env;

pub fn init_logging() {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
}

pub const OPENAI_MODEL_NAME: &str = "gpt-3.5-turbo";
pub const OLLAMA_MODEL_NAME: &str = "llama3.2";
pub const TEMPERATURE: f32 = 0.7;
pub const MAX_TOKENS: u32 = 500;
pub const SESSION_MAX_AGE_DAYS: i64 = 30;
pub const TOAST_DURATION_SECS: i64 = 3;
pub const OUTLOOK_SCOPES: &str = "openid profile email offline_access Mail.ReadWrite Mail.Send User.Read";

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const OLLAMA_HOST: &str = "http://localhost";
const OLLAMA_PORT: u16 = 11434;
const DATABASE_URL: &str = "sqlite://mailpilot.db?mode=rwc";
const GRAPH_BASE_URL: &str = "https://graph.microsoft.com/v1.0";
const PUBLIC_URL: &str = "http://localhost:8080";
const BIND_ADDR: &str = "127.0.0.1:8080";
const MIN_SESSION_SECRET_LEN: usize = 32;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct AzureConfig {
    pub client_id: String,
    pub client_secret: String,
    pub tenant_id: String,
}

impl AzureConfig {
    pub fn authorize_url(&self) -> String {
        format!("https://login.microsoftonline.com/{}/oauth2/v2.0/authorize", self.tenant_id)
    }

    pub fn token_url(&self) -> String {
        format!("https://login.microsoftonline.com/{}/oauth2/v2.0/token", self.tenant_id)
    }
}

/// Which text-generation service answers `/api/ai`.
#[derive(Debug, Clone)]
pub enum CompletionBackend {
    OpenAi {
        api_key: String,
        base_url: String,
        model: String,
    },
    Ollama {
        host: String,
        port: u16,
        model: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub public_url: String,
    pub database_url: String,
    pub graph_base_url: String,
    pub session_secret: String,
    pub azure: AzureConfig,
    pub completion: CompletionBackend,
}

impl Config {
    /// Loads `.env` if present, then reads everything from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };
        let optional = |name: &str, default: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let session_secret = required("SESSION_SECRET")?;
        if session_secret.len() < MIN_SESSION_SECRET_LEN {
            return Err(ConfigError::Invalid {
                name: "SESSION_SECRET",
                reason: format!("must be at least {} bytes", MIN_SESSION_SECRET_LEN),
            });
        }

        let azure = AzureConfig {
            client_id: required("AZURE_AD_CLIENT_ID")?,
            client_secret: required("AZURE_AD_CLIENT_SECRET")?,
            tenant_id: required("AZURE_AD_TENANT_ID")?,
        };

        let completion = match optional("COMPLETION_BACKEND", "openai").to_lowercase().as_str() {
            "openai" => CompletionBackend::OpenAi {
                api_key: required("OPENAI_API_KEY")?,
                base_url: optional("OPENAI_BASE_URL", OPENAI_BASE_URL),
                model: optional("MODEL_NAME", OPENAI_MODEL_NAME),
            },
            "ollama" => {
                let port = optional("OLLAMA_PORT", &OLLAMA_PORT.to_string());
                CompletionBackend::Ollama {
                    host: optional("OLLAMA_HOST", OLLAMA_HOST),
                    port: port.parse().map_err(|_| ConfigError::Invalid {
                        name: "OLLAMA_PORT",
                        reason: format!("'{}' is not a port number", port),
                    })?,
                    model: optional("MODEL_NAME", OLLAMA_MODEL_NAME),
                }
            }
            other => {
                return Err(ConfigError::Invalid {
                    name: "COMPLETION_BACKEND",
                    reason: format!("unknown backend '{}'", other),
                })
            }
        };

        Ok(Config {
            bind_addr: optional("BIND_ADDR", BIND_ADDR),
            public_url: optional("PUBLIC_URL", PUBLIC_URL),
            database_url: optional("DATABASE_URL", DATABASE_URL),
            graph_base_url: optional("GRAPH_BASE_URL", GRAPH_BASE_URL),
            session_secret,
            azure,
            completion,
        })
    }

    pub fn secure_cookies(&self) -> bool {
        self.public_url.starts_with("https://")
    }
}
