use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;

/// Environment variable that overrides `mail.password` from the YAML file.
pub const SMTP_PASSWORD_ENV: &str = "CAFE_SMTP_PASSWORD";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub orders: OrdersConfig,
    #[serde(default)]
    pub mail: MailConfig,
    #[serde(default)]
    pub receipt: ReceiptConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoggingConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    /// "hourly" | "daily" | anything else = never rotate
    pub rotation: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// sqlx SQLite URL, e.g. `sqlite://cafe.db` or `sqlite::memory:`
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://cafe.db".to_string(),
            max_connections: 5,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct OrdersConfig {
    /// Reject orders whose total differs from the sum of `qty * price`.
    /// When false the client total is stored as sent and a mismatch is only logged.
    #[serde(default)]
    pub enforce_total: bool,
}

/// Partner notification mail
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MailConfig {
    pub enabled: bool,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub sender: String,
    pub recipients: Vec<String>,
    pub cafe_name: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            username: String::new(),
            password: String::new(),
            sender: String::new(),
            recipients: Vec::new(),
            cafe_name: "Hook Café".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ReceiptConfig {
    pub enabled: bool,
    pub output_dir: String,
    pub cafe_name: String,
    /// Command run with the receipt path as its only argument (e.g. `xdg-open`).
    #[serde(default)]
    pub open_command: Option<String>,
}

impl Default for ReceiptConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            output_dir: "./receipts".to_string(),
            cafe_name: "Hook Café".to_string(),
            open_command: None,
        }
    }
}

impl AppConfig {
    /// Load `config/<env>.yaml`, then apply environment overrides.
    pub fn load(env: &str) -> anyhow::Result<Self> {
        let config_path = format!("config/{}.yaml", env);
        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path))?;
        let mut config = Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path))?;

        if let Ok(password) = std::env::var(SMTP_PASSWORD_ENV) {
            config.mail.password = password;
        }
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }
}
