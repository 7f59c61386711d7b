//! Сборка записи брони и производные представления истории:
//! разбиение на предстоящие/прошедшие и статистика для админки.

use chrono::{NaiveDate, Utc};
use serde::Serialize;

use crate::error::BookingError;
use crate::models::{
    BookingRecord, BookingStatus, ContactDetails, Movie, PaymentStatus, Principal, Theatre,
};
use crate::seating::{pricing, SelectionTracker};

/// Собирает запись для хранилища из состояния мастера. Массивы `seats` и
/// `seat_types` параллельны по индексу; сумма пересчитывается здесь же,
/// а не берётся из закэшированного значения.
pub fn assemble(
    movie: Option<&Movie>,
    theatre: Option<&Theatre>,
    date: &str,
    time: &str,
    selection: &SelectionTracker,
    details: &ContactDetails,
    principal: &Principal,
) -> Result<BookingRecord, BookingError> {
    let movie = movie.ok_or(BookingError::DataIntegrity("movie context is missing"))?;
    let theatre = theatre.ok_or(BookingError::DataIntegrity("theatre context is missing"))?;

    let seats = selection.labels();
    let seat_types = selection
        .seats()
        .iter()
        .map(|s| s.tier.as_str().to_string())
        .collect();

    Ok(BookingRecord {
        id: None,
        movie_id: movie.id.clone(),
        movie_title: movie.title.clone(),
        movie_poster: movie.poster.clone(),
        theatre_id: theatre.id.clone(),
        theatre_name: theatre.name.clone(),
        date: date.to_string(),
        time: time.to_string(),
        seats,
        seat_types,
        total_price: pricing::total_of(selection.seats()),
        user_id: principal.id.clone(),
        user_email: details.email.clone(),
        user_name: details.name.clone(),
        user_phone: details.phone.clone(),
        status: BookingStatus::Confirmed,
        payment_status: PaymentStatus::Paid,
        created_at: Utc::now(),
    })
}

/// Делит историю на (предстоящие, прошедшие). Прошедшая - та, чья дата
/// строго раньше `today`; сегодняшние и непарсящиеся даты считаются
/// предстоящими. Чистая тотальная функция.
pub fn partition_by_date(
    records: Vec<BookingRecord>,
    today: NaiveDate,
) -> (Vec<BookingRecord>, Vec<BookingRecord>) {
    records
        .into_iter()
        .partition(|r| r.show_date().is_none_or(|d| d >= today))
}

/// Агрегаты по всем броням для административной панели.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BookingStats {
    pub total_bookings: usize,
    pub total_revenue: i64,
}

impl BookingStats {
    pub fn collect(records: &[BookingRecord]) -> Self {
        BookingStats {
            total_bookings: records.len(),
            total_revenue: records.iter().map(|r| r.total_price).sum(),
        }
    }
}

/// Свежие брони первыми - порядок ленты в админке.
pub fn recent_first(mut records: Vec<BookingRecord>) -> Vec<BookingRecord> {
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    records
}
