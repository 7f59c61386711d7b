use serde::Deserialize;
use std::env;

// Главная структура конфигурации - контейнер для всех настроек
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub store: StoreConfig,
    pub auth: AuthConfig,
    pub circuit_breaker: CircuitBreakerConfig,
    pub sync: SyncConfig,
    pub features: FeatureFlags,
}

// Настройки приложения
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub environment: String,
    pub rust_log: String,
}

// Настройки документного хранилища
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_seconds: u64,
}

// Настройки провайдера аутентификации
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub base_url: String,
    pub api_key: String,
}

// Настройки Circuit Breaker
#[derive(Debug, Clone, Deserialize)]
pub struct CircuitBreakerConfig {
    pub failure_threshold: u32,
    pub timeout_seconds: u64,
}

// Настройки live-синхронизации профиля
#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    pub poll_interval_seconds: u64,
}

// Feature flags для включения/выключения функциональности
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureFlags {
    pub enable_live_sync: bool,
    pub enable_analytics: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            app: AppConfig {
                environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
                rust_log: env::var("RUST_LOG")
                    .unwrap_or_else(|_| "cinema_booking=debug".to_string()),
            },
            store: StoreConfig {
                base_url: env::var("STORE_BASE_URL")
                    .unwrap_or_else(|_| "https://docstore.example.com/v1".to_string()),
                api_key: env::var("STORE_API_KEY").unwrap_or_else(|_| "demo-api-key".to_string()),
                timeout_seconds: env::var("STORE_TIMEOUT_SECONDS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .expect("STORE_TIMEOUT_SECONDS must be a valid number"),
            },
            auth: AuthConfig {
                base_url: env::var("AUTH_BASE_URL")
                    .unwrap_or_else(|_| "https://identity.example.com/v1".to_string()),
                api_key: env::var("AUTH_API_KEY").unwrap_or_else(|_| "demo-api-key".to_string()),
            },
            circuit_breaker: CircuitBreakerConfig {
                failure_threshold: env::var("CIRCUIT_BREAKER_FAILURE_THRESHOLD")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()
                    .expect("CIRCUIT_BREAKER_FAILURE_THRESHOLD must be a valid number"),
                timeout_seconds: env::var("CIRCUIT_BREAKER_TIMEOUT_SECONDS")
                    .unwrap_or_else(|_| "60".to_string())
                    .parse()
                    .expect("CIRCUIT_BREAKER_TIMEOUT_SECONDS must be a valid number"),
            },
            sync: SyncConfig {
                poll_interval_seconds: env::var("SYNC_POLL_INTERVAL_SECONDS")
                    .unwrap_or_else(|_| "15".to_string())
                    .parse()
                    .expect("SYNC_POLL_INTERVAL_SECONDS must be a valid number"),
            },
            features: FeatureFlags {
                enable_live_sync: env::var("ENABLE_LIVE_SYNC")
                    .unwrap_or_else(|_| "true".to_string())
                    .parse()
                    .expect("ENABLE_LIVE_SYNC must be true or false"),
                enable_analytics: env::var("ENABLE_ANALYTICS")
                    .unwrap_or_else(|_| "true".to_string())
                    .parse()
                    .expect("ENABLE_ANALYTICS must be true or false"),
            },
        }
    }
}
