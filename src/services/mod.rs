pub mod auth;
pub mod store;
pub mod sync;

pub use auth::{AuthSession, IdentityClient};
pub use store::{CircuitState, DocumentStoreClient};
pub use sync::ProfileSubscription;

use std::collections::HashSet;

use crate::error::StoreError;
use crate::models::{BookingRecord, ShowContext, UserProfile};

/// Контракт документного хранилища для коллекции "bookings". Ядро видит
/// только эти операции; где они живут (managed-бэкенд, мок в тестах) -
/// дело реализации.
#[allow(async_fn_in_trait)]
pub trait BookingStore {
    /// Отправляет новую бронь. Возвращает id созданного документа.
    /// Бэкенд может атомарно отказать, если места успели занять.
    async fn submit_booking(&self, record: &BookingRecord) -> Result<String, StoreError>;

    /// Множество меток мест, уже занятых на данном показе.
    async fn fetch_booked_seats(&self, show: &ShowContext) -> Result<HashSet<String>, StoreError>;

    /// Брони пользователя, валидированные при чтении.
    async fn fetch_user_bookings(&self, user_id: &str) -> Result<Vec<BookingRecord>, StoreError>;

    /// Все брони - для административной статистики.
    async fn fetch_all_bookings(&self) -> Result<Vec<BookingRecord>, StoreError>;

    /// Помечает бронь отменённой. Переход односторонний.
    async fn cancel_booking(&self, booking_id: &str) -> Result<(), StoreError>;
}

/// Контракт коллекции "users": документы профилей.
#[allow(async_fn_in_trait)]
pub trait UserDirectory {
    async fn fetch_profile(&self, user_id: &str) -> Result<Option<UserProfile>, StoreError>;

    async fn save_profile(&self, user_id: &str, profile: &UserProfile) -> Result<(), StoreError>;

    async fn add_favorite(&self, user_id: &str, movie_id: &str) -> Result<UserProfile, StoreError>;

    async fn remove_favorite(&self, user_id: &str, movie_id: &str)
        -> Result<UserProfile, StoreError>;
}
