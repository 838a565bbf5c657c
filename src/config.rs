use std::net::IpAddr;

use axum::http::HeaderValue;

/// Environment variables checked for the storage connection string, first
/// present value wins. Hosting platforms disagree about which one they set,
/// so all the historically observed names are accepted.
pub const CONNECTION_STRING_KEYS: [&str; 4] = [
    "AZURE_STORAGE_CONNECTION_STRING",
    "AzureWebJobsStorage",
    "AZURE_STORAGE_CONNECTION_STRING_ALT",
    "WEBSITE_CONTENTAZUREFILECONNECTIONSTRING",
];

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub envelope: EnvelopeStyle,
    pub cors_allow_origin: HeaderValue,
    pub static_dir: String,
    pub max_body_size: usize,
    pub log_level: String,
    pub storage: Option<StorageConfig>,
}

/// Resolved storage settings. Absent entirely when no connection string is
/// configured — the server still starts and rejects submissions per request.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub connection_string: String,
    pub container: String,
    pub access: ContainerAccess,
}

/// Shape of the HTTP response bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeStyle {
    /// JSON `{ok, file}` on success, plain-text error bodies.
    Classic,
    /// JSON bodies everywhere, echoing a per-request correlation id.
    Correlated,
}

/// Public-access level applied when the container is first created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerAccess {
    Private,
    Blob,
    Container,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let host: IpAddr = env_or("FORMVAULT_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid FORMVAULT_HOST: {e}"))?;

        let port: u16 = env_or("FORMVAULT_PORT", "8080")
            .parse()
            .map_err(|e| format!("Invalid FORMVAULT_PORT: {e}"))?;

        let envelope = match env_or("FORMVAULT_ENVELOPE", "correlated").as_str() {
            "classic" => EnvelopeStyle::Classic,
            _ => EnvelopeStyle::Correlated,
        };

        let cors_allow_origin: HeaderValue = env_or("FORMVAULT_CORS_ORIGIN", "*")
            .parse()
            .map_err(|e| format!("Invalid FORMVAULT_CORS_ORIGIN: {e}"))?;

        let static_dir = env_or("FORMVAULT_STATIC_DIR", "static");

        let max_body_size: usize = env_or("FORMVAULT_MAX_BODY_SIZE", "1048576")
            .parse()
            .map_err(|e| format!("Invalid FORMVAULT_MAX_BODY_SIZE: {e}"))?;

        let log_level = env_or("FORMVAULT_LOG_LEVEL", "info");

        let storage = resolve_connection_string(|key| std::env::var(key).ok()).map(
            |connection_string| StorageConfig {
                connection_string,
                container: env_or("SUBMISSIONS_CONTAINER", "submissions"),
                access: match env_or("SUBMISSIONS_CONTAINER_ACCESS", "private").as_str() {
                    "blob" => ContainerAccess::Blob,
                    "container" => ContainerAccess::Container,
                    _ => ContainerAccess::Private,
                },
            },
        );

        Ok(Config {
            host,
            port,
            envelope,
            cors_allow_origin,
            static_dir,
            max_body_size,
            log_level,
            storage,
        })
    }
}

/// Walk the candidate keys in order and take the first non-empty value.
pub fn resolve_connection_string(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    CONNECTION_STRING_KEYS
        .iter()
        .find_map(|key| lookup(key).filter(|value| !value.is_empty()))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
