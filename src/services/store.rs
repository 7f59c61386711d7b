//! store.rs
//!
//! Этот модуль реализует клиент внешнего документного хранилища.
//!
//! Ключевые компоненты:
//! 1.  **CircuitBreaker**: Реализация паттерна "Автоматический выключатель"
//!     для обеспечения отказоустойчивости при работе с внешним API. Он
//!     предотвращает постоянные запросы к неработающему сервису.
//! 2.  **DocumentStoreClient**: Основной клиент, который инкапсулирует
//!     запросы к коллекциям "bookings" и "users": отправку брони, чтение
//!     занятых мест, историю пользователя, отмену и работу с профилями.
//!     Все сетевые вызовы защищены с помощью `CircuitBreaker`.
//! 3.  **Валидация при чтении**: хранилище бессхемное, поэтому каждый
//!     прочитанный документ проверяется перед использованием.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tokio::time::{Duration, Instant};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::{CircuitBreakerConfig, StoreConfig};
use crate::error::StoreError;
use crate::models::{BookingRecord, ShowContext, UserProfile};
use crate::services::{BookingStore, UserDirectory};

/// Состояния "Автоматического выключателя" (Circuit Breaker).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Нормальный режим работы. Запросы к сервису разрешены.
    Closed,
    /// Режим блокировки после множественных сбоев.
    Open,
    /// Тестовый режим: после таймаута разрешается один пробный запрос.
    HalfOpen,
}

/// Контроль доступа к внешнему сервису при его деградации.
#[derive(Debug)]
pub struct CircuitBreaker {
    state: RwLock<CircuitState>,
    failure_count: AtomicU32,
    last_failure: RwLock<Option<Instant>>,
    failure_threshold: u32,
    timeout: Duration,
}

impl CircuitBreaker {
    pub fn new(failure_threshold: u32, timeout_seconds: u64) -> Self {
        Self {
            state: RwLock::new(CircuitState::Closed),
            failure_count: AtomicU32::new(0),
            last_failure: RwLock::new(None),
            failure_threshold,
            timeout: Duration::from_secs(timeout_seconds),
        }
    }

    /// Проверяет, можно ли выполнить следующий запрос к сервису.
    pub fn can_execute(&self) -> bool {
        let state = *self.state.read().unwrap();

        match state {
            CircuitState::Closed | CircuitState::HalfOpen => true,
            CircuitState::Open => {
                let elapsed = self
                    .last_failure
                    .read()
                    .unwrap()
                    .map(|at| at.elapsed())
                    .unwrap_or(self.timeout);

                if elapsed >= self.timeout {
                    // Таймаут истёк - переходим в полуоткрытое состояние
                    // и пропускаем один пробный запрос.
                    *self.state.write().unwrap() = CircuitState::HalfOpen;
                    info!("Circuit breaker transitioning to HalfOpen state");
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Регистрирует успешное выполнение запроса.
    pub fn record_success(&self) {
        let mut state = self.state.write().unwrap();

        match *state {
            CircuitState::HalfOpen => {
                *state = CircuitState::Closed;
                self.failure_count.store(0, Ordering::Relaxed);
                info!("Circuit breaker recovered - transitioning to Closed state");
            }
            CircuitState::Closed => {
                self.failure_count.store(0, Ordering::Relaxed);
            }
            CircuitState::Open => {}
        }
    }

    /// Регистрирует неудачное выполнение запроса.
    pub fn record_failure(&self) {
        let failure_count = self.failure_count.fetch_add(1, Ordering::Relaxed) + 1;
        *self.last_failure.write().unwrap() = Some(Instant::now());

        let mut state = self.state.write().unwrap();

        match *state {
            CircuitState::Closed => {
                if failure_count >= self.failure_threshold {
                    *state = CircuitState::Open;
                    error!(
                        "Circuit breaker OPENED - {} failures reached threshold {}",
                        failure_count, self.failure_threshold
                    );
                }
            }
            CircuitState::HalfOpen => {
                *state = CircuitState::Open;
                warn!("Circuit breaker test failed - returning to Open state");
            }
            CircuitState::Open => {}
        }
    }

    /// Текущее состояние выключателя для мониторинга.
    pub fn state(&self) -> CircuitState {
        *self.state.read().unwrap()
    }
}

// --- Модели данных для API хранилища ---

/// Конверт отправки брони: сама запись плюс клиентский id запроса,
/// чтобы повтор после сетевой ошибки не создал дубликат.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitEnvelope<'a> {
    client_request_id: Uuid,
    #[serde(flatten)]
    record: &'a BookingRecord,
}

#[derive(Debug, Deserialize)]
struct CreatedResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct DocumentList {
    documents: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Клиент документного хранилища.
#[derive(Clone)]
pub struct DocumentStoreClient {
    base_url: String,
    api_key: String,
    http: reqwest::Client,
    circuit_breaker: Arc<CircuitBreaker>,
}

impl DocumentStoreClient {
    /// Создает и конфигурирует клиент на основе настроек приложения.
    pub fn from_config(store: &StoreConfig, breaker: &CircuitBreakerConfig) -> Self {
        Self {
            base_url: store.base_url.trim_end_matches('/').to_string(),
            api_key: store.api_key.clone(),
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(store.timeout_seconds))
                .build()
                .expect("Failed to create HTTP client"),
            circuit_breaker: Arc::new(CircuitBreaker::new(
                breaker.failure_threshold,
                breaker.timeout_seconds,
            )),
        }
    }

    /// Текущее состояние Circuit Breaker для мониторинга.
    pub fn circuit_breaker_status(&self) -> (CircuitState, u32) {
        (
            self.circuit_breaker.state(),
            self.circuit_breaker.failure_count.load(Ordering::Relaxed),
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Выполняет асинхронную операцию, пропуская её через Circuit Breaker.
    /// Сбоем для выключателя считаются только транспортные ошибки: отказ
    /// бэкенда по существу (конфликт, 4xx) не говорит о его недоступности.
    async fn execute_with_circuit_breaker<F, T>(&self, operation: F) -> Result<T, StoreError>
    where
        F: std::future::Future<Output = Result<T, StoreError>>,
    {
        if !self.circuit_breaker.can_execute() {
            warn!("Circuit breaker is OPEN - blocking document store request");
            return Err(StoreError::CircuitOpen);
        }

        match operation.await {
            Ok(result) => {
                self.circuit_breaker.record_success();
                Ok(result)
            }
            Err(StoreError::Transport(e)) => {
                error!("Document store request failed: {:?}", e);
                self.circuit_breaker.record_failure();
                Err(StoreError::Transport(e))
            }
            Err(other) => {
                self.circuit_breaker.record_success();
                Err(other)
            }
        }
    }

    /// Превращает неуспешный HTTP-ответ в ошибку хранилища.
    async fn rejection(response: reqwest::Response) -> StoreError {
        let status = response.status().as_u16();
        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| "no error details".to_string());

        if status == 409 {
            StoreError::SeatConflict(message)
        } else {
            StoreError::Rejected { status, message }
        }
    }

    /// Валидация при чтении: документы без обязательных полей или с
    /// рассинхронизированными массивами мест пропускаются с предупреждением.
    fn parse_records(documents: Vec<serde_json::Value>) -> Vec<BookingRecord> {
        documents
            .into_iter()
            .filter_map(|doc| match serde_json::from_value::<BookingRecord>(doc) {
                Ok(record) => match record.check_integrity() {
                    Ok(()) => Some(record),
                    Err(reason) => {
                        warn!("Skipping malformed booking document: {}", reason);
                        None
                    }
                },
                Err(e) => {
                    warn!("Skipping undecodable booking document: {}", e);
                    None
                }
            })
            .collect()
    }

    async fn fetch_bookings(&self, query: &[(&str, &str)]) -> Result<Vec<BookingRecord>, StoreError> {
        let operation = async {
            let response = self
                .http
                .get(self.url("/collections/bookings/documents"))
                .header("X-Api-Key", &self.api_key)
                .query(query)
                .send()
                .await?;

            if !response.status().is_success() {
                return Err(Self::rejection(response).await);
            }

            let list = response.json::<DocumentList>().await?;
            Ok(Self::parse_records(list.documents))
        };

        self.execute_with_circuit_breaker(operation).await
    }
}

impl BookingStore for DocumentStoreClient {
    async fn submit_booking(&self, record: &BookingRecord) -> Result<String, StoreError> {
        let envelope = SubmitEnvelope {
            client_request_id: Uuid::new_v4(),
            record,
        };

        info!(
            "Submitting booking: movie={}, seats={}, total={}",
            record.movie_id,
            record.seats.len(),
            record.total_price
        );

        let operation = async {
            let response = self
                .http
                .post(self.url("/collections/bookings/documents"))
                .header("X-Api-Key", &self.api_key)
                .json(&envelope)
                .send()
                .await?;

            if !response.status().is_success() {
                return Err(Self::rejection(response).await);
            }

            let created = response.json::<CreatedResponse>().await?;
            Ok(created.id)
        };

        self.execute_with_circuit_breaker(operation).await
    }

    async fn fetch_booked_seats(&self, show: &ShowContext) -> Result<HashSet<String>, StoreError> {
        let records = self
            .fetch_bookings(&[
                ("movieId", show.movie_id.as_str()),
                ("theatreId", show.theatre_id.as_str()),
                ("date", show.date.as_str()),
                ("time", show.time.as_str()),
            ])
            .await?;

        // Отменённые брони места не держат
        let seats = records
            .iter()
            .filter(|r| !r.is_cancelled())
            .flat_map(|r| r.seats.iter().cloned())
            .collect();

        Ok(seats)
    }

    async fn fetch_user_bookings(&self, user_id: &str) -> Result<Vec<BookingRecord>, StoreError> {
        self.fetch_bookings(&[("userId", user_id)]).await
    }

    async fn fetch_all_bookings(&self) -> Result<Vec<BookingRecord>, StoreError> {
        self.fetch_bookings(&[]).await
    }

    async fn cancel_booking(&self, booking_id: &str) -> Result<(), StoreError> {
        let operation = async {
            let response = self
                .http
                .patch(self.url(&format!("/collections/bookings/documents/{booking_id}")))
                .header("X-Api-Key", &self.api_key)
                .json(&serde_json::json!({ "status": "cancelled" }))
                .send()
                .await?;

            if !response.status().is_success() {
                return Err(Self::rejection(response).await);
            }

            Ok(())
        };

        let result = self.execute_with_circuit_breaker(operation).await;
        if result.is_ok() {
            info!("Booking {} cancelled", booking_id);
        }
        result
    }
}

impl UserDirectory for DocumentStoreClient {
    async fn fetch_profile(&self, user_id: &str) -> Result<Option<UserProfile>, StoreError> {
        let operation = async {
            let response = self
                .http
                .get(self.url(&format!("/collections/users/documents/{user_id}")))
                .header("X-Api-Key", &self.api_key)
                .send()
                .await?;

            if response.status().as_u16() == 404 {
                return Ok(None);
            }
            if !response.status().is_success() {
                return Err(Self::rejection(response).await);
            }

            let profile = response.json::<UserProfile>().await?;
            Ok(Some(profile))
        };

        self.execute_with_circuit_breaker(operation).await
    }

    async fn save_profile(&self, user_id: &str, profile: &UserProfile) -> Result<(), StoreError> {
        let operation = async {
            let response = self
                .http
                .put(self.url(&format!("/collections/users/documents/{user_id}")))
                .header("X-Api-Key", &self.api_key)
                .json(profile)
                .send()
                .await?;

            if !response.status().is_success() {
                return Err(Self::rejection(response).await);
            }

            Ok(())
        };

        self.execute_with_circuit_breaker(operation).await
    }

    async fn add_favorite(&self, user_id: &str, movie_id: &str) -> Result<UserProfile, StoreError> {
        let mut profile = self.fetch_profile(user_id).await?.ok_or_else(|| {
            StoreError::Rejected {
                status: 404,
                message: format!("user profile {user_id} not found"),
            }
        })?;

        if !profile.favorites.iter().any(|id| id == movie_id) {
            profile.favorites.push(movie_id.to_string());
            self.save_profile(user_id, &profile).await?;
        }

        Ok(profile)
    }

    async fn remove_favorite(
        &self,
        user_id: &str,
        movie_id: &str,
    ) -> Result<UserProfile, StoreError> {
        let mut profile = self.fetch_profile(user_id).await?.ok_or_else(|| {
            StoreError::Rejected {
                status: 404,
                message: format!("user profile {user_id} not found"),
            }
        })?;

        let before = profile.favorites.len();
        profile.favorites.retain(|id| id != movie_id);
        if profile.favorites.len() != before {
            self.save_profile(user_id, &profile).await?;
        }

        Ok(profile)
    }
}
