use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Pending,
    Refunded,
}

/// Контекст сеанса, к которому относится бронь: идентифицирует показ,
/// для которого загружается список занятых мест.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowContext {
    pub movie_id: String,
    pub theatre_id: String,
    /// Дата показа в формате YYYY-MM-DD.
    pub date: String,
    /// Время показа в формате HH:MM.
    pub time: String,
}

/// Запись брони в том виде, в котором она хранится в документной базе.
/// Имена полей на проводе - camelCase, byte-for-byte как у существующей
/// коллекции "bookings".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRecord {
    /// Идентификатор документа. Присваивается хранилищем, при отправке
    /// новой брони отсутствует.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub movie_id: String,
    pub movie_title: String,
    pub movie_poster: String,
    pub theatre_id: String,
    pub theatre_name: String,
    pub date: String,
    pub time: String,
    /// Метки мест ("A1", "C3"...). Параллелен seat_types по индексу.
    pub seats: Vec<String>,
    pub seat_types: Vec<String>,
    pub total_price: i64,
    pub user_id: String,
    pub user_email: String,
    pub user_name: String,
    pub user_phone: String,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

impl BookingRecord {
    /// Валидация при чтении: хранилище бессхемное, поэтому каждую запись
    /// проверяем на обязательные поля и выравнивание параллельных массивов.
    pub fn check_integrity(&self) -> Result<(), String> {
        if self.movie_id.is_empty() {
            return Err("movieId is empty".to_string());
        }
        if self.theatre_id.is_empty() {
            return Err("theatreId is empty".to_string());
        }
        if self.user_id.is_empty() {
            return Err("userId is empty".to_string());
        }
        if self.seats.is_empty() {
            return Err("seats is empty".to_string());
        }
        if self.seats.len() != self.seat_types.len() {
            return Err(format!(
                "seats/seatTypes misaligned: {} vs {}",
                self.seats.len(),
                self.seat_types.len()
            ));
        }
        Ok(())
    }

    /// Дата показа как NaiveDate, если поле парсится.
    pub fn show_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == BookingStatus::Cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> BookingRecord {
        BookingRecord {
            id: Some("doc-1".to_string()),
            movie_id: "movie_1".to_string(),
            movie_title: "Inception".to_string(),
            movie_poster: "https://example.com/p.jpg".to_string(),
            theatre_id: "theatre_1".to_string(),
            theatre_name: "Grand Cinema".to_string(),
            date: "2026-08-10".to_string(),
            time: "18:45".to_string(),
            seats: vec!["A1".to_string(), "D3".to_string()],
            seat_types: vec!["VIP".to_string(), "STANDARD".to_string()],
            total_price: 400,
            user_id: "uid-1".to_string(),
            user_email: "john@example.com".to_string(),
            user_name: "John Doe".to_string(),
            user_phone: "+1 234 567 8900".to_string(),
            status: BookingStatus::Confirmed,
            payment_status: PaymentStatus::Paid,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn wire_field_names_are_camel_case() {
        let json = serde_json::to_value(record()).unwrap();
        for key in [
            "movieId",
            "movieTitle",
            "moviePoster",
            "theatreId",
            "theatreName",
            "seats",
            "seatTypes",
            "totalPrice",
            "userId",
            "userEmail",
            "userName",
            "userPhone",
            "status",
            "paymentStatus",
            "createdAt",
        ] {
            assert!(json.get(key).is_some(), "missing wire field {key}");
        }
        assert_eq!(json["status"], "confirmed");
        assert_eq!(json["paymentStatus"], "paid");
    }

    #[test]
    fn misaligned_seat_arrays_fail_integrity() {
        let mut r = record();
        r.seat_types.pop();
        assert!(r.check_integrity().is_err());
    }

    #[test]
    fn integrity_requires_ids() {
        let mut r = record();
        r.movie_id.clear();
        assert!(r.check_integrity().is_err());
    }

    #[test]
    fn show_date_parses_iso_dates_only() {
        let mut r = record();
        assert_eq!(
            r.show_date(),
            Some(NaiveDate::from_ymd_opt(2026, 8, 10).unwrap())
        );
        r.date = "next friday".to_string();
        assert_eq!(r.show_date(), None);
    }
}
