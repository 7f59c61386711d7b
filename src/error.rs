use thiserror::Error;

/// Ошибки внешнего документного хранилища.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Circuit Breaker разомкнут - запросы временно блокируются.
    #[error("document store temporarily unavailable (circuit breaker open)")]
    CircuitOpen,

    #[error("document store request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Бэкенд отказал в атомарной записи: места заняты между fetch и submit.
    #[error("seats no longer available: {0}")]
    SeatConflict(String),

    #[error("document store rejected the request: {status} {message}")]
    Rejected { status: u16, message: String },

    #[error("document store returned a malformed document: {0}")]
    Malformed(String),
}

/// Ошибки провайдера аутентификации.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("identity provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("identity provider rejected the request: {status} {message}")]
    Rejected { status: u16, message: String },
}

/// Ошибки мастера бронирования. Все варианты обрабатываются на границе
/// мастера и никогда не валят процесс.
#[derive(Debug, Error)]
pub enum BookingError {
    /// Попытка перейти дальше без выбранных мест.
    #[error("no seats selected")]
    EmptySelection,

    /// Контактные данные не прошли валидацию.
    #[error("contact details invalid: {0}")]
    InvalidDetails(String),

    /// Подтверждение возможно только на шаге Confirmation.
    #[error("confirmation step not reached")]
    NotAtConfirmation,

    /// Повторный confirm пока первый запрос в полёте - отклоняется, не ставится в очередь.
    #[error("a booking submission is already in flight")]
    SubmissionInFlight,

    #[error("sign in required to book tickets")]
    AuthenticationRequired,

    /// Места заняли между загрузкой схемы зала и отправкой брони.
    #[error("seats were taken before submission: {0}")]
    SeatConflict(String),

    /// Сбой внешнего хранилища при отправке. Восстановимо: мастер остаётся
    /// на Confirmation и отправку можно повторить.
    #[error("booking submission failed: {0}")]
    Submission(#[source] StoreError),

    /// Сборка записи без фильма/кинотеатра. Фатально для этой попытки.
    #[error("booking context incomplete: {0}")]
    DataIntegrity(&'static str),
}

impl From<StoreError> for BookingError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::SeatConflict(seats) => BookingError::SeatConflict(seats),
            other => BookingError::Submission(other),
        }
    }
}
