//! flow.rs
//!
//! Этот модуль реализует мастер бронирования - трёхшаговый линейный
//! визард с одним побочным действием в конце.
//!
//! Ключевые компоненты:
//! 1.  **BookingFlow**: конечный автомат шагов
//!     SeatSelection -> ContactDetails -> Confirmation. Переходы вперёд
//!     закрыты охранами; переходы назад безусловные и ничего не стирают.
//! 2.  **Охраны**: движок проверяет их сам, независимо от того, что
//!     блокирует UI: непустой выбор мест, валидные контактные данные,
//!     наличие аутентифицированного пользователя.
//! 3.  **Single-flight подтверждение**: пока отправка в полёте, повторный
//!     confirm отклоняется, а не ставится в очередь. Сбой бэкенда
//!     возвращает мастер на Confirmation с возможностью повторить.

pub mod assembler;

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use tracing::{info, warn};
use validator::Validate;

use crate::error::BookingError;
use crate::models::{ContactDetails, Movie, Principal, Seat, Theatre};
use crate::seating::{pricing, SeatMap, SelectionTracker, ToggleAction};
use crate::services::BookingStore;

/// Шаг мастера.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    SeatSelection,
    ContactDetails,
    Confirmation,
}

/// Показ, ради которого открыта сессия: фильм, кинотеатр, дата, время.
#[derive(Debug, Clone)]
pub struct BookingContext {
    pub movie: Movie,
    pub theatre: Theatre,
    pub date: String,
    pub time: String,
}

#[derive(Debug)]
struct WizardState {
    step: Step,
    selection: SelectionTracker,
    details: ContactDetails,
}

/// Сессия бронирования. Одна на попытку: создаётся при входе в мастер,
/// выбрасывается при уходе - частичное состояние никуда не пишется.
#[derive(Debug)]
pub struct BookingFlow {
    context: BookingContext,
    map: SeatMap,
    state: Mutex<WizardState>,
    in_flight: AtomicBool,
}

/// Сбрасывает флаг отправки при любом выходе из confirm, включая
/// брошенную будущую задачу.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl BookingFlow {
    /// Открывает сессию. Без фильма или кинотеатра мастер не стартует -
    /// это ошибка целостности, а не повод собирать запись из null-ов.
    /// Схема зала генерируется здесь один раз из списка занятых мест.
    pub fn new(
        movie: Option<Movie>,
        theatre: Option<Theatre>,
        date: impl Into<String>,
        time: impl Into<String>,
        booked_ids: &HashSet<String>,
    ) -> Result<Self, BookingError> {
        let movie = movie.ok_or(BookingError::DataIntegrity("movie context is missing"))?;
        let theatre = theatre.ok_or(BookingError::DataIntegrity("theatre context is missing"))?;

        Ok(BookingFlow {
            context: BookingContext {
                movie,
                theatre,
                date: date.into(),
                time: time.into(),
            },
            map: SeatMap::standard(booked_ids),
            state: Mutex::new(WizardState {
                step: Step::SeatSelection,
                selection: SelectionTracker::new(),
                details: ContactDetails::default(),
            }),
            in_flight: AtomicBool::new(false),
        })
    }

    pub fn context(&self) -> &BookingContext {
        &self.context
    }

    pub fn seat_map(&self) -> &SeatMap {
        &self.map
    }

    pub fn step(&self) -> Step {
        self.state.lock().unwrap().step
    }

    /// Жест выбора места с презентационного слоя. Занятые и несуществующие
    /// места отклоняются здесь, даже если UI пропустил клик.
    pub fn toggle_seat(&self, row: char, number: u32) -> ToggleAction {
        let Some(seat) = self.map.seat(row, number) else {
            return ToggleAction::Refused;
        };
        self.state.lock().unwrap().selection.toggle(seat)
    }

    pub fn is_selected(&self, row: char, number: u32) -> bool {
        self.state.lock().unwrap().selection.is_selected(row, number)
    }

    pub fn selected_seats(&self) -> Vec<Seat> {
        self.state.lock().unwrap().selection.seats().to_vec()
    }

    pub fn selected_labels(&self) -> Vec<String> {
        self.state.lock().unwrap().selection.labels()
    }

    /// Итоговая сумма. Производная величина: пересчитывается при каждом
    /// обращении, никогда не кэшируется.
    pub fn current_total(&self) -> i64 {
        pricing::total_of(self.state.lock().unwrap().selection.seats())
    }

    pub fn contact_details(&self) -> ContactDetails {
        self.state.lock().unwrap().details.clone()
    }

    pub fn set_contact_details(&self, details: ContactDetails) {
        self.state.lock().unwrap().details = details;
    }

    /// Предзаполнение контактов из аутентифицированного пользователя.
    pub fn prefill_details(&self, principal: &Principal) {
        self.state.lock().unwrap().details = ContactDetails::prefill_from(principal);
    }

    /// Переход на следующий шаг. Охраны проверяются движком независимо
    /// от UI; на последнем шаге - тождественная операция (дальше только
    /// confirm).
    pub fn advance(&self) -> Result<Step, BookingError> {
        let mut state = self.state.lock().unwrap();

        match state.step {
            Step::SeatSelection => {
                if state.selection.is_empty() {
                    return Err(BookingError::EmptySelection);
                }
                state.step = Step::ContactDetails;
            }
            Step::ContactDetails => {
                // Полная проверка формата здесь, а не при отправке:
                // до подтверждения с кривым телефоном дойти нельзя.
                state
                    .details
                    .validate()
                    .map_err(|e| BookingError::InvalidDetails(validation_message(&e)))?;
                state.step = Step::Confirmation;
            }
            Step::Confirmation => {}
        }

        Ok(state.step)
    }

    /// Шаг назад. Безусловный: выбор мест и контакты не стираются.
    pub fn back(&self) -> Step {
        let mut state = self.state.lock().unwrap();

        state.step = match state.step {
            Step::SeatSelection => Step::SeatSelection,
            Step::ContactDetails => Step::SeatSelection,
            Step::Confirmation => Step::ContactDetails,
        };

        state.step
    }

    /// Сброс мастера: пустой выбор, пустые контакты, первый шаг.
    pub fn reset(&self) {
        let mut state = self.state.lock().unwrap();
        state.selection.clear();
        state.details = ContactDetails::default();
        state.step = Step::SeatSelection;
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Подтверждение брони: последняя проверка охран, сборка записи и
    /// ровно один вызов хранилища на каждое действие пользователя.
    pub async fn confirm<S: BookingStore>(
        &self,
        store: &S,
        principal: Option<&Principal>,
    ) -> Result<String, BookingError> {
        // Single-flight: второй confirm во время полёта - ошибка
        // пользователя, отклоняем сразу.
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(BookingError::SubmissionInFlight);
        }
        let _guard = InFlightGuard(&self.in_flight);

        // Запись собирается под локом до await: что пользователь видел,
        // то и уходит в хранилище.
        let record = {
            let state = self.state.lock().unwrap();

            if state.step != Step::Confirmation {
                return Err(BookingError::NotAtConfirmation);
            }
            let principal = principal.ok_or(BookingError::AuthenticationRequired)?;
            if state.selection.is_empty() {
                return Err(BookingError::EmptySelection);
            }
            state
                .details
                .validate()
                .map_err(|e| BookingError::InvalidDetails(validation_message(&e)))?;

            assembler::assemble(
                Some(&self.context.movie),
                Some(&self.context.theatre),
                &self.context.date,
                &self.context.time,
                &state.selection,
                &state.details,
                principal,
            )?
        };

        match store.submit_booking(&record).await {
            Ok(id) => {
                info!("Booking confirmed: {}", id);
                Ok(id)
            }
            Err(e) => {
                // Восстановимо: мастер остаётся на Confirmation,
                // отправку можно повторить.
                warn!("Booking submission failed: {}", e);
                Err(e.into())
            }
        }
    }
}

/// Собирает сообщения валидатора в одну строку для пользователя.
fn validation_message(errors: &validator::ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .iter()
        .map(|(field, errs)| {
            let detail = errs
                .iter()
                .filter_map(|e| e.message.as_ref())
                .map(|m| m.to_string())
                .next()
                .unwrap_or_else(|| "invalid value".to_string());
            format!("{field}: {detail}")
        })
        .collect();
    parts.sort();
    parts.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::error::StoreError;
    use crate::models::{BookingRecord, ShowContext};
    use std::sync::atomic::AtomicUsize;
    use tokio::time::Duration;

    /// Хранилище-заглушка: считает вызовы, умеет тормозить и падать.
    #[derive(Default)]
    struct MockStore {
        calls: AtomicUsize,
        delay: Option<Duration>,
        fail_first: AtomicUsize,
        conflict: bool,
        last_record: Mutex<Option<BookingRecord>>,
    }

    impl MockStore {
        fn submit_calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl BookingStore for MockStore {
        async fn submit_booking(&self, record: &BookingRecord) -> Result<String, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_record.lock().unwrap() = Some(record.clone());

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.conflict {
                return Err(StoreError::SeatConflict("A1".to_string()));
            }
            if self
                .fail_first
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return Err(StoreError::Rejected {
                    status: 503,
                    message: "backend unavailable".to_string(),
                });
            }
            Ok("doc-42".to_string())
        }

        async fn fetch_booked_seats(
            &self,
            _show: &ShowContext,
        ) -> Result<std::collections::HashSet<String>, StoreError> {
            Ok(Default::default())
        }

        async fn fetch_user_bookings(
            &self,
            _user_id: &str,
        ) -> Result<Vec<BookingRecord>, StoreError> {
            Ok(Vec::new())
        }

        async fn fetch_all_bookings(&self) -> Result<Vec<BookingRecord>, StoreError> {
            Ok(Vec::new())
        }

        async fn cancel_booking(&self, _booking_id: &str) -> Result<(), StoreError> {
            Ok(())
        }
    }

    fn principal() -> Principal {
        Principal {
            id: "uid-1".to_string(),
            display_name: Some("John Doe".to_string()),
            email: Some("john@example.com".to_string()),
        }
    }

    fn valid_details() -> ContactDetails {
        ContactDetails {
            name: "John Doe".to_string(),
            email: "john@example.com".to_string(),
            phone: "+1 234 567 8900".to_string(),
        }
    }

    fn flow_with_booked(booked: &[&str]) -> BookingFlow {
        let catalog = Catalog::load();
        let booked: HashSet<String> = booked.iter().map(|s| s.to_string()).collect();
        BookingFlow::new(
            catalog.movie("movie_1").cloned(),
            catalog.theatre("theatre_1").cloned(),
            "2026-08-10",
            "18:45",
            &booked,
        )
        .unwrap()
    }

    /// Доводит мастер до шага подтверждения с местами A1 и D3.
    fn flow_at_confirmation() -> BookingFlow {
        let flow = flow_with_booked(&["B2"]);
        flow.toggle_seat('A', 1);
        flow.toggle_seat('D', 3);
        flow.advance().unwrap();
        flow.set_contact_details(valid_details());
        flow.advance().unwrap();
        flow
    }

    #[test]
    fn missing_movie_refuses_to_start() {
        let catalog = Catalog::load();
        let err = BookingFlow::new(
            None,
            catalog.theatre("theatre_1").cloned(),
            "2026-08-10",
            "18:45",
            &HashSet::new(),
        )
        .unwrap_err();
        assert!(matches!(err, BookingError::DataIntegrity(_)));
    }

    #[test]
    fn advance_requires_a_selection() {
        let flow = flow_with_booked(&[]);
        let err = flow.advance().unwrap_err();
        assert!(matches!(err, BookingError::EmptySelection));
        // состояние не изменилось
        assert_eq!(flow.step(), Step::SeatSelection);

        flow.toggle_seat('A', 1);
        assert_eq!(flow.advance().unwrap(), Step::ContactDetails);
    }

    #[test]
    fn booked_seat_is_refused_by_the_engine() {
        let flow = flow_with_booked(&["B2"]);
        assert_eq!(flow.toggle_seat('B', 2), ToggleAction::Refused);
        assert!(flow.selected_labels().is_empty());
    }

    #[test]
    fn unknown_seat_is_refused() {
        let flow = flow_with_booked(&[]);
        assert_eq!(flow.toggle_seat('Z', 99), ToggleAction::Refused);
    }

    #[test]
    fn details_gate_enforces_format_not_just_presence() {
        let flow = flow_with_booked(&[]);
        flow.toggle_seat('A', 1);
        flow.advance().unwrap();

        // все поля заполнены, но телефон кривой - дальше нельзя
        flow.set_contact_details(ContactDetails {
            name: "John".to_string(),
            email: "john@example.com".to_string(),
            phone: "nope".to_string(),
        });
        let err = flow.advance().unwrap_err();
        assert!(matches!(err, BookingError::InvalidDetails(_)));
        assert_eq!(flow.step(), Step::ContactDetails);

        flow.set_contact_details(valid_details());
        assert_eq!(flow.advance().unwrap(), Step::Confirmation);
    }

    #[test]
    fn back_preserves_selection_and_details() {
        let flow = flow_at_confirmation();

        assert_eq!(flow.back(), Step::ContactDetails);
        assert_eq!(flow.contact_details(), valid_details());

        assert_eq!(flow.back(), Step::SeatSelection);
        assert_eq!(flow.selected_labels(), vec!["A1", "D3"]);

        // с первого шага назад некуда
        assert_eq!(flow.back(), Step::SeatSelection);
    }

    #[test]
    fn reset_clears_everything() {
        let flow = flow_at_confirmation();
        flow.reset();
        assert_eq!(flow.step(), Step::SeatSelection);
        assert!(flow.selected_labels().is_empty());
        assert_eq!(flow.contact_details(), ContactDetails::default());
    }

    #[test]
    fn total_is_recomputed_on_every_read() {
        let flow = flow_with_booked(&[]);
        assert_eq!(flow.current_total(), 0);
        flow.toggle_seat('A', 1); // VIP 250
        assert_eq!(flow.current_total(), 250);
        flow.toggle_seat('D', 3); // Standard 150
        assert_eq!(flow.current_total(), 400);
        flow.toggle_seat('A', 1);
        assert_eq!(flow.current_total(), 150);
    }

    #[tokio::test]
    async fn confirm_without_principal_never_reaches_the_store() {
        let flow = flow_at_confirmation();
        let store = MockStore::default();

        let err = flow.confirm(&store, None).await.unwrap_err();
        assert!(matches!(err, BookingError::AuthenticationRequired));
        assert_eq!(store.submit_calls(), 0);
        // состояние мастера сохранено для возврата после входа
        assert_eq!(flow.step(), Step::Confirmation);
        assert_eq!(flow.selected_labels(), vec!["A1", "D3"]);
    }

    #[tokio::test]
    async fn confirm_off_the_confirmation_step_is_rejected() {
        let flow = flow_with_booked(&[]);
        flow.toggle_seat('A', 1);
        let store = MockStore::default();

        let err = flow.confirm(&store, Some(&principal())).await.unwrap_err();
        assert!(matches!(err, BookingError::NotAtConfirmation));
        assert_eq!(store.submit_calls(), 0);
    }

    #[tokio::test]
    async fn confirm_submits_the_assembled_record_once() {
        let flow = flow_at_confirmation();
        let store = MockStore::default();

        let id = flow.confirm(&store, Some(&principal())).await.unwrap();
        assert_eq!(id, "doc-42");
        assert_eq!(store.submit_calls(), 1);

        let record = store.last_record.lock().unwrap().clone().unwrap();
        assert_eq!(record.seats, vec!["A1", "D3"]);
        assert_eq!(record.seat_types, vec!["VIP", "STANDARD"]);
        assert_eq!(record.total_price, 400);
        assert_eq!(record.movie_title, "Inception");
        assert_eq!(record.theatre_name, "Grand Cinema");
        assert_eq!(record.user_id, "uid-1");
        assert!(!flow.is_submitting());
    }

    #[tokio::test(start_paused = true)]
    async fn double_confirm_results_in_exactly_one_submission() {
        let flow = flow_at_confirmation();
        let store = MockStore {
            delay: Some(Duration::from_millis(100)),
            ..Default::default()
        };
        let principal = principal();

        let (first, second) =
            tokio::join!(flow.confirm(&store, Some(&principal)), async {
                // второй confirm стартует, пока первый в полёте
                tokio::task::yield_now().await;
                flow.confirm(&store, Some(&principal)).await
            });

        assert!(first.is_ok());
        assert!(matches!(second, Err(BookingError::SubmissionInFlight)));
        assert_eq!(store.submit_calls(), 1);
    }

    #[tokio::test]
    async fn failed_submission_is_recoverable() {
        let flow = flow_at_confirmation();
        let store = MockStore {
            fail_first: AtomicUsize::new(1),
            ..Default::default()
        };

        let err = flow.confirm(&store, Some(&principal())).await.unwrap_err();
        assert!(matches!(err, BookingError::Submission(_)));
        // мастер остался на подтверждении, отправка снова доступна
        assert_eq!(flow.step(), Step::Confirmation);
        assert!(!flow.is_submitting());

        let id = flow.confirm(&store, Some(&principal())).await.unwrap();
        assert_eq!(id, "doc-42");
        assert_eq!(store.submit_calls(), 2);
    }

    #[tokio::test]
    async fn seat_conflict_is_surfaced_as_its_own_error() {
        let flow = flow_at_confirmation();
        let store = MockStore {
            conflict: true,
            ..Default::default()
        };

        let err = flow.confirm(&store, Some(&principal())).await.unwrap_err();
        assert!(matches!(err, BookingError::SeatConflict(_)));
        assert_eq!(flow.step(), Step::Confirmation);
    }
}
