use serde::{Deserialize, Serialize};

/// Ценовая категория места. Назначается рядом при генерации схемы зала
/// и больше не меняется.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatTier {
    Vip,
    Premium,
    Standard,
    Accessible,
}

impl SeatTier {
    /// Метка уровня в том виде, в котором она хранится в документе брони.
    pub fn as_str(&self) -> &'static str {
        match self {
            SeatTier::Vip => "VIP",
            SeatTier::Premium => "PREMIUM",
            SeatTier::Standard => "STANDARD",
            SeatTier::Accessible => "ACCESSIBLE",
        }
    }

    /// Разбор метки из документа. Хранилище бессхемное, поэтому
    /// незнакомая метка - не ошибка, а None (цену за неё считает
    /// pricing по умолчанию).
    pub fn parse(label: &str) -> Option<SeatTier> {
        match label {
            "VIP" => Some(SeatTier::Vip),
            "PREMIUM" => Some(SeatTier::Premium),
            "STANDARD" => Some(SeatTier::Standard),
            "ACCESSIBLE" => Some(SeatTier::Accessible),
            _ => None,
        }
    }
}

/// Место в зале. Value object: пересоздаётся при каждой генерации схемы,
/// собственного жизненного цикла за пределами сессии бронирования нет.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seat {
    pub row: char,
    pub number: u32,
    pub tier: SeatTier,
    /// Выставляется один раз при генерации из списка занятых мест,
    /// пользовательские действия его не меняют.
    pub booked: bool,
}

impl Seat {
    /// Идентификатор вида "A1": буква ряда + номер.
    pub fn id(&self) -> String {
        format!("{}{}", self.row, self.number)
    }
}
