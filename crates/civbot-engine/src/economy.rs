//! Economy resolver: passive accrual rates and purchase rules.
//!
//! Balances themselves live in storage; this module owns the numbers and
//! the validation. The storage layer enforces the same preconditions a
//! second time as conditional updates, so a validation that passes here
//! can still lose a race -- the dispatcher treats zero-rows-affected as
//! the same domain error.

use civbot_types::Group;

use crate::error::GameError;

/// Bricks earned per message before market bonuses.
pub const BASE_INCOME: i64 = 1;

/// Additional bricks per message contributed by each market.
pub const MARKET_INCOME_BONUS: i64 = 2;

/// Price of one market.
pub const MARKET_COST: i64 = 500;

/// Price of the (single) wall.
pub const WALL_COST: i64 = 1000;

/// Bricks accrued for one message by a group owning `markets` markets.
pub const fn passive_income(markets: i64) -> i64 {
    let markets = if markets > 0 { markets } else { 0 };
    BASE_INCOME.saturating_add(MARKET_INCOME_BONUS.saturating_mul(markets))
}

/// An upgrade that can be bought in the shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShopItem {
    /// Repeatable income upgrade: +2 bricks per message each.
    Market,
    /// One-time defense upgrade: halves incoming raid losses.
    Wall,
}

impl ShopItem {
    /// Parse a `/buy` argument. Unknown items yield `None` (shop menu).
    pub fn parse(item: &str) -> Option<Self> {
        match item {
            "market" => Some(Self::Market),
            "wall" => Some(Self::Wall),
            _ => None,
        }
    }

    /// The item's price in bricks.
    pub const fn cost(self) -> i64 {
        match self {
            Self::Market => MARKET_COST,
            Self::Wall => WALL_COST,
        }
    }
}

/// Check whether `group` may buy `item` right now.
///
/// Ownership limits are checked before affordability so a walled group
/// is told "already owned" rather than teased about its balance.
pub const fn validate_purchase(group: &Group, item: ShopItem) -> Result<(), GameError> {
    if matches!(item, ShopItem::Wall) && group.has_wall() {
        return Err(GameError::AlreadyOwned);
    }
    let cost = item.cost();
    if group.bricks < cost {
        return Err(GameError::InsufficientResources {
            cost,
            have: group.bricks,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use civbot_types::ChatId;

    use super::*;

    fn group_with(bricks: i64, markets: i64, walls: i64) -> Group {
        Group {
            bricks,
            markets,
            walls,
            ..Group::new(ChatId::new("1"), "Testers", Utc::now())
        }
    }

    #[test]
    fn income_scales_with_markets() {
        assert_eq!(passive_income(0), 1);
        assert_eq!(passive_income(1), 3);
        assert_eq!(passive_income(5), 11);
    }

    #[test]
    fn income_ignores_nonsense_negative_counts() {
        assert_eq!(passive_income(-3), 1);
    }

    #[test]
    fn market_at_499_is_rejected() {
        let g = group_with(499, 0, 0);
        assert_eq!(
            validate_purchase(&g, ShopItem::Market),
            Err(GameError::InsufficientResources { cost: 500, have: 499 })
        );
    }

    #[test]
    fn market_at_exactly_500_passes() {
        let g = group_with(500, 0, 0);
        assert_eq!(validate_purchase(&g, ShopItem::Market), Ok(()));
    }

    #[test]
    fn markets_are_repeatable() {
        let g = group_with(10_000, 7, 0);
        assert_eq!(validate_purchase(&g, ShopItem::Market), Ok(()));
    }

    #[test]
    fn wall_needs_1000_bricks() {
        let g = group_with(999, 0, 0);
        assert_eq!(
            validate_purchase(&g, ShopItem::Wall),
            Err(GameError::InsufficientResources { cost: 1000, have: 999 })
        );
        let g = group_with(1000, 0, 0);
        assert_eq!(validate_purchase(&g, ShopItem::Wall), Ok(()));
    }

    #[test]
    fn second_wall_is_rejected_regardless_of_balance() {
        let g = group_with(1_000_000, 0, 1);
        assert_eq!(
            validate_purchase(&g, ShopItem::Wall),
            Err(GameError::AlreadyOwned)
        );
    }

    #[test]
    fn unknown_items_do_not_parse() {
        assert_eq!(ShopItem::parse("market"), Some(ShopItem::Market));
        assert_eq!(ShopItem::parse("wall"), Some(ShopItem::Wall));
        assert_eq!(ShopItem::parse("moat"), None);
        assert_eq!(ShopItem::parse("Market"), None);
    }
}
