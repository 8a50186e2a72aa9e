use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    /// Base URL of the hosted backend (rows API and storage share it).
    pub backend_url: String,
    pub backend_api_key: String,
    /// Storage bucket holding item images.
    pub storage_bucket: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub gateway_timeout_secs: u64,
    pub probe_timeout_secs: u64,
    pub user_agent: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("backend_url", &self.backend_url)
            .field("backend_api_key", &"[redacted]")
            .field("storage_bucket", &self.storage_bucket)
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("gateway_timeout_secs", &self.gateway_timeout_secs)
            .field("probe_timeout_secs", &self.probe_timeout_secs)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}
