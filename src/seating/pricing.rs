use crate::models::{Seat, SeatTier};

/// Строка каталога категорий: цена за место и подпись.
#[derive(Debug, Clone, Copy)]
pub struct TierInfo {
    pub tier: SeatTier,
    pub unit_price: i64,
    pub label: &'static str,
}

/// Фиксированный каталог категорий. Каждая категория, на которую может
/// сослаться место, здесь есть.
pub static TIER_CATALOG: [TierInfo; 4] = [
    TierInfo {
        tier: SeatTier::Vip,
        unit_price: 250,
        label: "VIP",
    },
    TierInfo {
        tier: SeatTier::Premium,
        unit_price: 200,
        label: "Premium",
    },
    TierInfo {
        tier: SeatTier::Standard,
        unit_price: 150,
        label: "Standard",
    },
    TierInfo {
        tier: SeatTier::Accessible,
        unit_price: 100,
        label: "Accessible",
    },
];

/// Строка каталога для категории. Категория без строки в каталоге
/// получает строку Standard - защитный дефолт.
pub fn tier_info(tier: SeatTier) -> &'static TierInfo {
    TIER_CATALOG
        .iter()
        .find(|info| info.tier == tier)
        .unwrap_or(&TIER_CATALOG[2]) // Standard
}

/// Цена места данной категории.
pub fn price_of(tier: SeatTier) -> i64 {
    tier_info(tier).unit_price
}

/// Цена по текстовой метке категории. Записи приходят из бессхемного
/// хранилища: незнакомая метка получает цену Standard, а не ошибку.
pub fn price_for_label(label: &str) -> i64 {
    match SeatTier::parse(label) {
        Some(tier) => price_of(tier),
        None => price_of(SeatTier::Standard),
    }
}

/// Сумма за набор мест. Чистая производная величина: порядок не важен,
/// пустой набор стоит 0. Пересчитывается при каждом обращении и нигде
/// не кэшируется.
pub fn total_of<'a, I>(seats: I) -> i64
where
    I: IntoIterator<Item = &'a Seat>,
{
    seats.into_iter().map(|s| price_of(s.tier)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seat(tier: SeatTier) -> Seat {
        Seat {
            row: 'A',
            number: 1,
            tier,
            booked: false,
        }
    }

    #[test]
    fn catalog_prices() {
        assert_eq!(price_of(SeatTier::Vip), 250);
        assert_eq!(price_of(SeatTier::Premium), 200);
        assert_eq!(price_of(SeatTier::Standard), 150);
        assert_eq!(price_of(SeatTier::Accessible), 100);
    }

    #[test]
    fn unknown_label_falls_back_to_standard() {
        assert_eq!(price_for_label("VIP"), 250);
        assert_eq!(price_for_label("GOLD"), 150);
        assert_eq!(price_for_label(""), 150);
    }

    #[test]
    fn empty_selection_costs_zero() {
        let seats: Vec<Seat> = Vec::new();
        assert_eq!(total_of(&seats), 0);
    }

    #[test]
    fn total_is_the_sum_of_tier_prices() {
        let seats = vec![seat(SeatTier::Vip), seat(SeatTier::Standard)];
        assert_eq!(total_of(&seats), 400);
    }

    #[test]
    fn adding_a_seat_raises_the_total_by_its_price() {
        let mut seats = vec![seat(SeatTier::Premium)];
        let before = total_of(&seats);
        seats.push(seat(SeatTier::Accessible));
        assert_eq!(total_of(&seats), before + 100);
    }

    #[test]
    fn total_is_order_independent() {
        let forward = vec![seat(SeatTier::Vip), seat(SeatTier::Premium), seat(SeatTier::Accessible)];
        let mut backward = forward.clone();
        backward.reverse();
        assert_eq!(total_of(&forward), total_of(&backward));
    }
}
