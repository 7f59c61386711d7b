pub mod config;
pub mod error;
pub mod models;
pub mod catalog;
pub mod seating;
pub mod flow;
pub mod services;

use std::sync::Arc;

use tokio::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{BookingError, StoreError};
use crate::flow::assembler::BookingStats;
use crate::flow::BookingFlow;
use crate::models::{Principal, ShowContext, UserProfile};
use crate::services::{BookingStore, ProfileSubscription, UserDirectory};

// Shared state для всего приложения
#[derive(Clone)]
pub struct AppState {
    pub config: config::Config,
    pub catalog: catalog::Catalog,
    pub store: services::DocumentStoreClient,
    pub auth: services::IdentityClient,
}

impl AppState {
    pub fn new(config: config::Config) -> Arc<Self> {
        let store = services::DocumentStoreClient::from_config(&config.store, &config.circuit_breaker);
        let auth = services::IdentityClient::from_config(&config.auth);
        let catalog = catalog::Catalog::load();

        Arc::new(Self {
            config,
            catalog,
            store,
            auth,
        })
    }

    /// Регистрация: аккаунт у провайдера плюс документ профиля в хранилище.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<Principal, Box<dyn std::error::Error>> {
        let principal = self.auth.sign_up(email, password, name).await?;

        let profile = UserProfile {
            name: name.to_string(),
            email: email.to_string(),
            role: "user".to_string(),
            favorites: Vec::new(),
            created_at: Some(chrono::Utc::now()),
        };
        self.store.save_profile(&principal.id, &profile).await?;

        Ok(principal)
    }

    /// Открывает сессию бронирования: находит фильм и кинотеатр в каталоге
    /// и один раз загружает занятые места показа. Отсутствие фильма или
    /// кинотеатра - ошибка целостности ещё до создания мастера.
    pub async fn start_booking(
        &self,
        movie_id: &str,
        theatre_id: &str,
        date: &str,
        time: &str,
    ) -> Result<BookingFlow, Box<dyn std::error::Error>> {
        let movie = self.catalog.movie(movie_id).cloned();
        let theatre = self.catalog.theatre(theatre_id).cloned();

        let show = ShowContext {
            movie_id: movie_id.to_string(),
            theatre_id: theatre_id.to_string(),
            date: date.to_string(),
            time: time.to_string(),
        };
        let booked = self.store.fetch_booked_seats(&show).await?;
        debug!("Loaded {} booked seats for {}/{}", booked.len(), movie_id, theatre_id);

        Ok(BookingFlow::new(movie, theatre, date, time, &booked)?)
    }

    /// История пользователя, разбитая на (предстоящие, прошедшие).
    pub async fn booking_history(
        &self,
        user_id: &str,
        today: chrono::NaiveDate,
    ) -> Result<(Vec<models::BookingRecord>, Vec<models::BookingRecord>), StoreError> {
        let records = self.store.fetch_user_bookings(user_id).await?;
        Ok(flow::assembler::partition_by_date(records, today))
    }

    /// Отмена брони. Переход односторонний: раз отменённая бронь
    /// обратно не подтверждается.
    pub async fn cancel_booking(&self, booking_id: &str) -> Result<(), StoreError> {
        self.store.cancel_booking(booking_id).await
    }

    /// Статистика для административной панели.
    pub async fn admin_stats(&self) -> Result<BookingStats, StoreError> {
        if !self.config.features.enable_analytics {
            debug!("Analytics disabled, returning empty stats");
            return Ok(BookingStats::default());
        }
        let records = self.store.fetch_all_bookings().await?;
        Ok(BookingStats::collect(&records))
    }

    /// Live-подписка на профиль. None, если синхронизация выключена
    /// конфигурацией. Drop возвращённого значения останавливает опрос.
    pub fn subscribe_profile(&self, user_id: &str) -> Option<ProfileSubscription> {
        if !self.config.features.enable_live_sync {
            info!("Live sync disabled, profile subscription skipped");
            return None;
        }
        Some(ProfileSubscription::subscribe(
            self.store.clone(),
            user_id.to_string(),
            Duration::from_secs(self.config.sync.poll_interval_seconds),
        ))
    }

    /// Подтверждение текущей сессии с учётом охран мастера. Тонкая обёртка,
    /// чтобы презентационный слой не собирал аргументы сам.
    pub async fn confirm_booking(&self, booking: &BookingFlow) -> Result<String, BookingError> {
        let principal = self.auth.current_principal();
        match booking.confirm(&self.store, principal.as_ref()).await {
            Ok(id) => Ok(id),
            Err(BookingError::AuthenticationRequired) => {
                warn!("Confirm attempted without an authenticated user");
                Err(BookingError::AuthenticationRequired)
            }
            Err(e) => Err(e),
        }
    }
}
