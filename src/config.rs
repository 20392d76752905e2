use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    pub gateway: GatewayConfig,
    /// PostgreSQL connection URL for the ledger store
    pub postgres_url: String,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound for a single transfer request, commit included
    pub request_timeout_ms: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_duration_minutes: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_duration_minutes: 60,
        }
    }
}

impl AppConfig {
    pub fn load(env: &str) -> Self {
        let config_path = format!("config/{}.yaml", env);
        let content = fs::read_to_string(&config_path)
            .unwrap_or_else(|_| panic!("Failed to read config file: {}", config_path));
        serde_yaml::from_str(&content).expect("Failed to parse config yaml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
log_level: "debug"
log_dir: "./logs"
log_file: "test.log"
use_json: true
rotation: "hourly"
gateway:
  host: "127.0.0.1"
  port: 9090
  request_timeout_ms: 2500
postgres_url: "postgresql://u:p@localhost:5432/ledger"
auth:
  jwt_secret: "0123456789abcdef0123456789abcdef"
  token_duration_minutes: 15
"#;
        let cfg: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.gateway.port, 9090);
        assert_eq!(cfg.gateway.request_timeout_ms, 2500);
        assert_eq!(cfg.auth.token_duration_minutes, 15);
        assert!(cfg.use_json);
    }

    #[test]
    fn test_auth_section_defaults() {
        let yaml = r#"
log_level: "info"
log_dir: "./logs"
log_file: "test.log"
use_json: false
rotation: "daily"
gateway:
  host: "0.0.0.0"
  port: 8080
  request_timeout_ms: 5000
postgres_url: "postgresql://u:p@localhost:5432/ledger"
"#;
        let cfg: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(cfg.auth.jwt_secret.is_empty());
        assert_eq!(cfg.auth.token_duration_minutes, 60);
    }
}
