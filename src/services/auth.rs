//! auth.rs
//!
//! Клиент провайдера идентификации. Держит сессию текущего пользователя
//! явным объектом (никаких глобалов): создаётся при старте, очищается
//! при выходе.

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::models::Principal;

/// Активная сессия: кто вошёл и его токен для бэкенда.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub principal: Principal,
    pub id_token: String,
}

// --- Модели данных для API провайдера ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignUpRequest<'a> {
    email: &'a str,
    password: &'a str,
    display_name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthResponse {
    user_id: String,
    id_token: String,
    display_name: Option<String>,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AuthErrorBody {
    message: Option<String>,
}

/// Клиент для взаимодействия с API провайдера идентификации.
#[derive(Clone)]
pub struct IdentityClient {
    base_url: String,
    api_key: String,
    http: reqwest::Client,
    session: Arc<RwLock<Option<AuthSession>>>,
}

impl IdentityClient {
    pub fn from_config(config: &AuthConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            http: reqwest::Client::new(),
            session: Arc::new(RwLock::new(None)),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn call(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<AuthResponse, AuthError> {
        let response = self
            .http
            .post(self.url(path))
            .header("X-Api-Key", &self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 400 || status.as_u16() == 401 {
            return Err(AuthError::InvalidCredentials);
        }
        if !status.is_success() {
            let message = response
                .json::<AuthErrorBody>()
                .await
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| "no error details".to_string());
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<AuthResponse>().await?)
    }

    fn open_session(&self, response: AuthResponse) -> Principal {
        let principal = Principal {
            id: response.user_id,
            display_name: response.display_name,
            email: response.email,
        };

        *self.session.write().unwrap() = Some(AuthSession {
            principal: principal.clone(),
            id_token: response.id_token,
        });

        principal
    }

    /// Регистрация нового аккаунта. Открывает сессию сразу.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<Principal, AuthError> {
        let response = self
            .call(
                "/accounts/signup",
                &SignUpRequest {
                    email,
                    password,
                    display_name,
                },
            )
            .await?;

        let principal = self.open_session(response);
        info!("Registered new account {}", principal.id);
        Ok(principal)
    }

    /// Вход по email и паролю.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Principal, AuthError> {
        let response = self
            .call("/accounts/signin", &SignInRequest { email, password })
            .await;

        match response {
            Ok(body) => {
                let principal = self.open_session(body);
                info!("User {} signed in", principal.id);
                Ok(principal)
            }
            Err(e) => {
                warn!("Sign in failed: {}", e);
                Err(e)
            }
        }
    }

    /// Выход: сессия очищается локально, на сервер ничего не уходит.
    pub fn sign_out(&self) {
        let had = self.session.write().unwrap().take();
        if had.is_some() {
            info!("User signed out");
        }
    }

    /// Текущий аутентифицированный пользователь, если сессия открыта.
    pub fn current_principal(&self) -> Option<Principal> {
        self.session
            .read()
            .unwrap()
            .as_ref()
            .map(|s| s.principal.clone())
    }

    pub fn id_token(&self) -> Option<String> {
        self.session
            .read()
            .unwrap()
            .as_ref()
            .map(|s| s.id_token.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.read().unwrap().is_some()
    }
}
