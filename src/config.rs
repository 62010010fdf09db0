use std::env;

/// Branding shown on every server-rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    pub site_header: String,
    pub site_title: String,
    pub index_title: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_header: "Custom Product Management Admin".to_string(),
            site_title: "Product Admin Portal".to_string(),
            index_title: "Welcome to Product Management".to_string(),
        }
    }
}

impl SiteConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            site_header: env::var("SITE_HEADER").unwrap_or(defaults.site_header),
            site_title: env::var("SITE_TITLE").unwrap_or(defaults.site_title),
            index_title: env::var("INDEX_TITLE").unwrap_or(defaults.index_title),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub site: SiteConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET is not set"))?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = parse_or("APP_PORT", 3000);
        let max_connections = parse_or("DB_MAX_CONNECTIONS", 10);
        let jwt_ttl_hours = parse_or("JWT_TTL_HOURS", 24);
        Ok(Self {
            database_url,
            host,
            port,
            max_connections,
            jwt_secret,
            jwt_ttl_hours,
            site: SiteConfig::from_env(),
        })
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
