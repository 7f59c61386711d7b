//! seating.rs
//!
//! Схема зала и всё, что с ней связано:
//! 1. **SeatMap**: генерация сетки мест (ряды x места в ряду) с назначением
//!    ценовой категории по ряду и пометкой занятых мест.
//! 2. **SelectionTracker**: набор выбранных пользователем мест в рамках
//!    одной сессии бронирования.
//! 3. **pricing**: цены категорий и подсчёт итоговой суммы.

pub mod pricing;
pub mod selection;

pub use selection::{SelectionTracker, ToggleAction};

use std::collections::HashSet;

use crate::models::{Seat, SeatTier};

/// Ряды зала по умолчанию.
pub const DEFAULT_ROWS: [char; 8] = ['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H'];

/// Мест в ряду по умолчанию.
pub const DEFAULT_SEATS_PER_ROW: u32 = 10;

/// Один ряд сгенерированной схемы.
#[derive(Debug, Clone)]
pub struct SeatRow {
    pub row: char,
    pub tier: SeatTier,
    pub seats: Vec<Seat>,
}

/// Сгенерированная схема зала. Создаётся один раз на сессию бронирования;
/// для одинаковых входов результат одинаковый.
#[derive(Debug, Clone)]
pub struct SeatMap {
    rows: Vec<SeatRow>,
}

impl SeatMap {
    /// Генерирует сетку мест. Категория - фиксированная функция позиции
    /// ряда: первый ряд VIP, следующие два Premium, последний Accessible,
    /// остальные Standard. Это политика, а не параметр: другая планировка
    /// зала задаётся другим списком рядов, но не другим правилом категорий.
    pub fn generate(rows: &[char], seats_per_row: u32, booked_ids: &HashSet<String>) -> SeatMap {
        let generated = rows
            .iter()
            .enumerate()
            .map(|(idx, &row)| {
                let tier = tier_for_position(idx, rows.len());
                let seats = (1..=seats_per_row)
                    .map(|number| {
                        let id = format!("{row}{number}");
                        Seat {
                            row,
                            number,
                            tier,
                            booked: booked_ids.contains(&id),
                        }
                    })
                    .collect();
                SeatRow { row, tier, seats }
            })
            .collect();

        SeatMap { rows: generated }
    }

    /// Схема по умолчанию: ряды A-H по 10 мест.
    pub fn standard(booked_ids: &HashSet<String>) -> SeatMap {
        SeatMap::generate(&DEFAULT_ROWS, DEFAULT_SEATS_PER_ROW, booked_ids)
    }

    pub fn rows(&self) -> &[SeatRow] {
        &self.rows
    }

    pub fn seat_count(&self) -> usize {
        self.rows.iter().map(|r| r.seats.len()).sum()
    }

    pub fn seat(&self, row: char, number: u32) -> Option<&Seat> {
        self.rows
            .iter()
            .find(|r| r.row == row)
            .and_then(|r| r.seats.iter().find(|s| s.number == number))
    }

    /// Все места схемы в порядке ряд за рядом.
    pub fn seats(&self) -> impl Iterator<Item = &Seat> {
        self.rows.iter().flat_map(|r| r.seats.iter())
    }
}

/// Первый ряд VIP, следующие два Premium, последний Accessible,
/// остальное Standard. При пересечении правил (маленький зал) приоритет
/// сверху вниз.
fn tier_for_position(idx: usize, total_rows: usize) -> SeatTier {
    if idx == 0 {
        SeatTier::Vip
    } else if idx == 1 || idx == 2 {
        SeatTier::Premium
    } else if idx + 1 == total_rows {
        SeatTier::Accessible
    } else {
        SeatTier::Standard
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn grid_size_is_rows_times_seats_per_row() {
        let map = SeatMap::generate(&['A', 'B', 'C', 'D'], 4, &HashSet::new());
        assert_eq!(map.seat_count(), 16);
        assert_eq!(map.rows().len(), 4);
    }

    #[test]
    fn tier_policy_follows_row_position() {
        let map = SeatMap::standard(&HashSet::new());
        let tier_of = |row| map.seat(row, 1).unwrap().tier;
        assert_eq!(tier_of('A'), SeatTier::Vip);
        assert_eq!(tier_of('B'), SeatTier::Premium);
        assert_eq!(tier_of('C'), SeatTier::Premium);
        assert_eq!(tier_of('D'), SeatTier::Standard);
        assert_eq!(tier_of('G'), SeatTier::Standard);
        assert_eq!(tier_of('H'), SeatTier::Accessible);
    }

    #[test]
    fn tier_is_uniform_within_a_row() {
        let map = SeatMap::standard(&HashSet::new());
        for row in map.rows() {
            assert!(row.seats.iter().all(|s| s.tier == row.tier));
        }
    }

    #[test]
    fn booked_flag_comes_from_the_supplied_set() {
        let booked: HashSet<String> = ["B2".to_string(), "H10".to_string()].into();
        let map = SeatMap::standard(&booked);
        assert!(map.seat('B', 2).unwrap().booked);
        assert!(map.seat('H', 10).unwrap().booked);
        assert!(!map.seat('B', 3).unwrap().booked);
        let booked_count = map.seats().filter(|s| s.booked).count();
        assert_eq!(booked_count, 2);
    }

    #[test]
    fn single_row_hall_is_vip() {
        let map = SeatMap::generate(&['A'], 3, &HashSet::new());
        assert_eq!(map.seat('A', 2).unwrap().tier, SeatTier::Vip);
    }

    #[test]
    fn generation_is_idempotent() {
        let booked: HashSet<String> = ["C7".to_string()].into();
        let a = SeatMap::standard(&booked);
        let b = SeatMap::standard(&booked);
        let left: Vec<_> = a.seats().cloned().collect();
        let right: Vec<_> = b.seats().cloned().collect();
        assert_eq!(left, right);
    }

    proptest! {
        #[test]
        fn grid_size_holds_for_any_layout(
            row_count in 1usize..12,
            seats_per_row in 1u32..20,
        ) {
            let rows: Vec<char> = ('A'..).take(row_count).collect();
            let map = SeatMap::generate(&rows, seats_per_row, &HashSet::new());
            prop_assert_eq!(map.seat_count(), row_count * seats_per_row as usize);
        }
    }
}
