//! Bet shortcuts offered next to the amount field.

use gemmines_core::BetAmount;

pub const PRESETS: [BetAmount; 4] = [10, 100, 1000, 10000];

pub const fn half(bet: BetAmount) -> BetAmount {
    bet / 2
}

pub const fn double(bet: BetAmount) -> BetAmount {
    bet.saturating_mul(2)
}

pub const fn increment(bet: BetAmount) -> BetAmount {
    bet.saturating_add(1)
}

pub const fn decrement(bet: BetAmount) -> BetAmount {
    bet.saturating_sub(1)
}

pub fn is_preset(bet: BetAmount) -> bool {
    PRESETS.contains(&bet)
}
