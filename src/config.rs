use config::{Config, ConfigError, File};
use secrecy::{ExposeSecret, Secret};
use serde_aux::field_attributes::deserialize_number_from_string;
use std::time::Duration;

use crate::intake::{IntakeConfig, StoreCredentials};

#[derive(Debug)]
pub enum Environment {
    Development,
    Production,
}

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub record_store: RecordStoreSettings,
    pub notification: NotificationSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
}

/// Hosted table service. Both `url` and `anon_key` must be set for leads to be stored.
#[derive(serde::Deserialize, Clone)]
pub struct RecordStoreSettings {
    pub url: Option<String>,
    // secrecy protects secret information and prevents them to be exposed (eg: via logs)
    pub anon_key: Option<Secret<String>>,
    pub table: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

#[derive(serde::Deserialize, Clone)]
pub struct NotificationSettings {
    // catch-hook URLs embed their own access token
    pub webhook_url: Option<Secret<String>>,
    pub recipient: String,
    pub source: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

impl Settings {
    pub fn get_address(&self) -> String {
        format!(
            "{}:{}",
            self.application.get_host(),
            self.application.get_port()
        )
    }

    pub fn set_app_port(&mut self, port: u16) {
        self.application.port = port;
    }

    pub fn set_record_store(&mut self, url: Option<String>, anon_key: Option<Secret<String>>) {
        self.record_store.url = url;
        self.record_store.anon_key = anon_key;
    }

    pub fn set_webhook_url(&mut self, webhook_url: Option<String>) {
        self.notification.webhook_url = webhook_url.map(Secret::new);
    }

    pub fn get_intake_config(&self) -> IntakeConfig {
        IntakeConfig {
            store: self.record_store.get_credentials(),
            webhook_url: self.notification.get_webhook_url(),
            recipient: self.notification.recipient.clone(),
            source: self.notification.source.clone(),
            store_timeout: self.record_store.get_timeout(),
            webhook_timeout: self.notification.get_timeout(),
        }
    }
}

impl ApplicationSettings {
    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub fn get_host(&self) -> String {
        self.host.clone()
    }
}

impl RecordStoreSettings {
    /// Empty values count as missing.
    pub fn get_credentials(&self) -> Option<StoreCredentials> {
        let url = self.url.as_ref().filter(|url| !url.trim().is_empty())?;
        let anon_key = self
            .anon_key
            .as_ref()
            .filter(|key| !key.expose_secret().trim().is_empty())?;

        Some(StoreCredentials {
            url: url.clone(),
            api_key: anon_key.clone(),
            table: self.table.clone(),
        })
    }

    pub fn get_timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }
}

impl NotificationSettings {
    pub fn get_webhook_url(&self) -> Option<Secret<String>> {
        self.webhook_url
            .clone()
            .filter(|url| !url.expose_secret().trim().is_empty())
    }

    pub fn get_timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "development" => Ok(Self::Development),
            "production" => Ok(Self::Production),
            unknown_env => Err(format!(
                "{} is not supported environment. Use either 'development' or 'production'.",
                unknown_env
            )),
        }
    }
}

pub fn get_configuration() -> Result<Settings, ConfigError> {
    let root_path = std::env::current_dir()
        .map_err(|err| ConfigError::Message(format!("Failed to determine the current directory: {}", err)))?;
    let config_directory = root_path.join("config");
    // Uses development environment by default
    let enviroment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "development".into())
        .try_into()
        .map_err(ConfigError::Message)?;
    let config_base_filepath = config_directory.join("base");
    let config_env_filepath = config_directory.join(enviroment.as_str());

    // It merges the base configuration file with the one from the specific environment (development or production)
    let settings = Config::builder()
        .add_source(File::from(config_base_filepath).required(true))
        .add_source(File::from(config_env_filepath).required(true))
        // Merge settings from environment variables with a prefix of APP and "__" separator
        // E.g APP_RECORD_STORE__ANON_KEY would set Settings.record_store.anon_key
        .add_source(
            config::Environment::with_prefix("app")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    tracing::info!("Application environment = {:?}", enviroment);

    // Try to convert the value from the configuration file into a Settings type
    settings.try_deserialize()
}
