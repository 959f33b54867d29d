use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub swagger: SwaggerConfig,
    pub consensus: ConsensusConfig,
    pub search: SearchConfig,
    pub locations: LocationConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_request_body_size: usize,
    /// Deadline applied to every store round trip made while serving a request
    pub request_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
    pub connect_retries: u32,
    pub connect_retry_delay: Duration,
    /// Server-side `statement_timeout`, never above the request deadline
    pub statement_timeout: Duration,
}

#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_leeway: Duration,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

/// Quorum settings for the approval workflow
#[derive(Debug, Clone, Copy)]
pub struct ConsensusConfig {
    /// Number of distinct approvers needed to publish a pandal
    pub required_approvals: i32,
}

#[derive(Debug, Clone, Copy)]
pub struct SearchConfig {
    pub default_radius_meters: f64,
}

#[derive(Debug, Clone)]
pub struct LocationConfig {
    /// JSON file holding the country/state/district hierarchy
    pub data_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        let app = AppConfig::from_env()?;
        let database = DatabaseConfig::from_env(app.request_timeout)?;

        Ok(Config {
            app,
            database,
            auth: AuthConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
            consensus: ConsensusConfig::from_env(),
            search: SearchConfig::from_env(),
            locations: LocationConfig::from_env(),
        })
    }
}

impl AppConfig {
    const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 1024 * 1024; // 1MB
    const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_request_body_size = env::var("MAX_REQUEST_BODY_SIZE")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_REQUEST_BODY_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| "MAX_REQUEST_BODY_SIZE must be a valid number".to_string())?;

        let request_timeout_secs = env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_REQUEST_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "REQUEST_TIMEOUT_SECS must be a valid number".to_string())?;

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            max_request_body_size,
            request_timeout: Duration::from_secs(request_timeout_secs),
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    // Default values for database connection pool (conservative defaults for small-medium apps)
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes
    const DEFAULT_CONNECT_RETRIES: u32 = 5;
    const DEFAULT_CONNECT_RETRY_DELAY_SECS: u64 = 2;

    pub fn from_env(request_timeout: Duration) -> Result<Self, String> {
        let url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MAX_CONNECTIONS must be a valid number".to_string())?;

        let min_connections = env::var("DB_MIN_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MIN_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MIN_CONNECTIONS must be a valid number".to_string())?;

        let acquire_timeout_secs = env::var("DB_ACQUIRE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_ACQUIRE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_ACQUIRE_TIMEOUT_SECS must be a valid number".to_string())?;

        let idle_timeout_secs = env::var("DB_IDLE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_IDLE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_IDLE_TIMEOUT_SECS must be a valid number".to_string())?;

        let max_lifetime_secs = env::var("DB_MAX_LIFETIME_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_LIFETIME_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_MAX_LIFETIME_SECS must be a valid number".to_string())?;

        let connect_retries = env::var("DB_CONNECT_RETRIES")
            .unwrap_or_else(|_| Self::DEFAULT_CONNECT_RETRIES.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_CONNECT_RETRIES must be a valid number".to_string())?;

        let connect_retry_delay_secs = env::var("DB_CONNECT_RETRY_DELAY_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_CONNECT_RETRY_DELAY_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_CONNECT_RETRY_DELAY_SECS must be a valid number".to_string())?;

        let statement_timeout = Self::statement_timeout_from_raw(
            env::var("DB_STATEMENT_TIMEOUT_MS").ok().as_deref(),
            request_timeout,
        )?;

        Ok(Self {
            url,
            max_connections,
            min_connections,
            acquire_timeout_secs,
            idle_timeout_secs,
            max_lifetime_secs,
            connect_retries,
            connect_retry_delay: Duration::from_secs(connect_retry_delay_secs),
            statement_timeout,
        })
    }

    /// Defaults to four fifths of the request deadline and is capped at it
    fn statement_timeout_from_raw(
        raw: Option<&str>,
        request_timeout: Duration,
    ) -> Result<Duration, String> {
        let configured = match raw.map(str::trim).filter(|s| !s.is_empty()) {
            Some(ms) => Duration::from_millis(
                ms.parse::<u64>()
                    .map_err(|_| "DB_STATEMENT_TIMEOUT_MS must be a valid number".to_string())?,
            ),
            None => request_timeout * 4 / 5,
        };

        if configured.is_zero() || configured > request_timeout {
            return Err(format!(
                "DB_STATEMENT_TIMEOUT_MS must be between 1 and {} (REQUEST_TIMEOUT_SECS)",
                request_timeout.as_millis()
            ));
        }
        Ok(configured)
    }
}

impl AuthConfig {
    const DEFAULT_JWT_LEEWAY_SECS: u64 = 60; // 1 minute

    pub fn from_env() -> Result<Self, String> {
        let jwt_secret = env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| "JWT_SECRET environment variable is required".to_string())?;

        let jwt_leeway_secs = env::var("JWT_LEEWAY")
            .unwrap_or_else(|_| Self::DEFAULT_JWT_LEEWAY_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "JWT_LEEWAY must be a valid number".to_string())?;

        Ok(Self {
            jwt_secret,
            jwt_leeway: Duration::from_secs(jwt_leeway_secs),
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Pandal Directory API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "Crowd-moderated directory of festival pandals".to_string());

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

impl ConsensusConfig {
    pub const DEFAULT_REQUIRED_APPROVALS: i32 = 3;

    /// Never fails: a missing or unusable value falls back to the default quorum.
    pub fn from_env() -> Self {
        Self::from_raw(env::var("REQUIRED_APPROVALS").ok().as_deref())
    }

    fn from_raw(raw: Option<&str>) -> Self {
        let required_approvals = raw
            .and_then(|s| s.trim().parse::<i32>().ok())
            .filter(|n| *n >= 1)
            .unwrap_or(Self::DEFAULT_REQUIRED_APPROVALS);

        Self { required_approvals }
    }
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        Self {
            required_approvals: Self::DEFAULT_REQUIRED_APPROVALS,
        }
    }
}

impl SearchConfig {
    pub const DEFAULT_RADIUS_METERS: f64 = 5000.0;

    pub fn from_env() -> Self {
        Self::from_raw(env::var("DEFAULT_SEARCH_RADIUS_METERS").ok().as_deref())
    }

    fn from_raw(raw: Option<&str>) -> Self {
        let default_radius_meters = raw
            .and_then(|s| s.trim().parse::<f64>().ok())
            .filter(|r| r.is_finite() && *r > 0.0)
            .unwrap_or(Self::DEFAULT_RADIUS_METERS);

        Self {
            default_radius_meters,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_radius_meters: Self::DEFAULT_RADIUS_METERS,
        }
    }
}

impl LocationConfig {
    const DEFAULT_DATA_PATH: &'static str = "data/india-administrative.json";

    pub fn from_env() -> Self {
        let data_path = env::var("ADMIN_DATA_PATH")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| Self::DEFAULT_DATA_PATH.to_string());

        Self {
            data_path: PathBuf::from(data_path),
        }
    }
}
