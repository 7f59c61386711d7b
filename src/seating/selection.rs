use crate::models::Seat;

/// Результат переключения места.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleAction {
    Added,
    Removed,
    /// Место занято - трекер отказывает сам, независимо от UI.
    Refused,
}

/// Набор выбранных мест одной сессии бронирования. Порядок выбора
/// сохраняется, дубликатов по id не бывает, занятые места не попадают
/// внутрь никогда.
#[derive(Debug, Clone, Default)]
pub struct SelectionTracker {
    seats: Vec<Seat>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        SelectionTracker { seats: Vec::new() }
    }

    /// Переключает место: выбранное убирает, невыбранное добавляет,
    /// занятое игнорирует. Тотальная функция - двойное переключение
    /// возвращает набор в исходное состояние.
    pub fn toggle(&mut self, seat: &Seat) -> ToggleAction {
        if seat.booked {
            return ToggleAction::Refused;
        }

        let id = seat.id();
        if let Some(pos) = self.seats.iter().position(|s| s.id() == id) {
            self.seats.remove(pos);
            ToggleAction::Removed
        } else {
            self.seats.push(seat.clone());
            ToggleAction::Added
        }
    }

    pub fn is_selected(&self, row: char, number: u32) -> bool {
        self.seats.iter().any(|s| s.row == row && s.number == number)
    }

    pub fn clear(&mut self) {
        self.seats.clear();
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    /// Выбранные места в порядке выбора.
    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    /// Метки выбранных мест ("A1", "C3"...), в порядке выбора.
    pub fn labels(&self) -> Vec<String> {
        self.seats.iter().map(Seat::id).collect()
    }
}
