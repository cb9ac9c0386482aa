//! Player currency and persistent stat upgrades
//!
//! Six independently leveled stats with geometric cost scaling, plus two flat
//! one-off purchases (medkit, lure-all) handled by the world. Money is an
//! integer that may go negative transiently (escape penalties); purchases are
//! refused when it cannot cover the price.

use serde::{Deserialize, Serialize};

/// Base price of every leveled stat
pub const STAT_BASE_COST: i64 = 150;
/// Price multiplier per purchased level
pub const COST_GROWTH: f32 = 1.6;
/// Level cap shared by all six stats
pub const STAT_MAX_LEVEL: u32 = 8;

/// Flat price of a life restore
pub const MEDKIT_COST: i64 = 500;
/// Flat price of the lure-all effect
pub const LURE_ALL_COST: i64 = 1000;

/// The six purchasable stats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatKind {
    /// Coin pickup radius
    Magnet,
    /// Run speed
    Speed,
    /// Jetpack tank capacity
    Fuel,
    /// Shot charge rate
    Charge,
    /// Capture pull speed
    Pull,
    /// Harpoon flight budget
    Cable,
}

impl StatKind {
    pub const ALL: [Self; 6] = [
        Self::Magnet,
        Self::Speed,
        Self::Fuel,
        Self::Charge,
        Self::Pull,
        Self::Cable,
    ];
}

/// One leveled stat: current level, cap and the price of the next level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpgradeStat {
    pub level: u32,
    pub max_level: u32,
    /// Raw geometric price; quote with [`UpgradeStat::price`]
    cost: f32,
}

impl Default for UpgradeStat {
    fn default() -> Self {
        Self {
            level: 0,
            max_level: STAT_MAX_LEVEL,
            cost: STAT_BASE_COST as f32,
        }
    }
}

impl UpgradeStat {
    /// Integer price of the next level
    #[inline]
    pub fn price(&self) -> i64 {
        self.cost.round() as i64
    }

    #[inline]
    pub fn maxed(&self) -> bool {
        self.level >= self.max_level
    }
}

/// All six stat levels plus purchase logic
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Upgrades {
    magnet: UpgradeStat,
    speed: UpgradeStat,
    fuel: UpgradeStat,
    charge: UpgradeStat,
    pull: UpgradeStat,
    cable: UpgradeStat,
}

impl Upgrades {
    pub fn stat(&self, kind: StatKind) -> &UpgradeStat {
        match kind {
            StatKind::Magnet => &self.magnet,
            StatKind::Speed => &self.speed,
            StatKind::Fuel => &self.fuel,
            StatKind::Charge => &self.charge,
            StatKind::Pull => &self.pull,
            StatKind::Cable => &self.cable,
        }
    }

    fn stat_mut(&mut self, kind: StatKind) -> &mut UpgradeStat {
        match kind {
            StatKind::Magnet => &mut self.magnet,
            StatKind::Speed => &mut self.speed,
            StatKind::Fuel => &mut self.fuel,
            StatKind::Charge => &mut self.charge,
            StatKind::Pull => &mut self.pull,
            StatKind::Cable => &mut self.cable,
        }
    }

    /// Buy one level of `kind` out of `money`; refused when the stat is maxed
    /// or the balance cannot cover the price
    pub fn buy(&mut self, kind: StatKind, money: &mut i64) -> bool {
        let stat = self.stat_mut(kind);
        if stat.maxed() || *money < stat.price() {
            return false;
        }
        *money -= stat.price();
        stat.level += 1;
        stat.cost *= COST_GROWTH;
        true
    }

    /// True when any stat or consumable is within reach (drives HUD glow)
    pub fn can_afford_anything(&self, money: i64, lives: u32, max_lives: u32) -> bool {
        if StatKind::ALL
            .iter()
            .any(|&k| !self.stat(k).maxed() && money >= self.stat(k).price())
        {
            return true;
        }
        (money >= MEDKIT_COST && lives < max_lives) || money >= LURE_ALL_COST
    }

    // Derived gameplay parameters, one per stat, monotonic in level.

    pub fn magnet_radius(&self) -> f32 {
        60.0 + self.magnet.level as f32 * 60.0
    }

    pub fn move_speed(&self) -> f32 {
        0.6 + self.speed.level as f32 * 0.08
    }

    pub fn max_fuel(&self) -> f32 {
        100.0 + self.fuel.level as f32 * 40.0
    }

    pub fn charge_rate(&self) -> f32 {
        0.5 + self.charge.level as f32 * 0.25
    }

    pub fn pull_speed(&self) -> f32 {
        13.0 + self.pull.level as f32 * 2.5
    }

    /// Harpoon flight budget in ticks before forced retraction
    pub fn cable_life(&self) -> u32 {
        35 + self.cable.level * 15
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_progression() {
        let mut upgrades = Upgrades::default();
        let mut money = 100_000;
        let mut prices = vec![upgrades.stat(StatKind::Pull).price()];
        for _ in 0..5 {
            assert!(upgrades.buy(StatKind::Pull, &mut money));
            prices.push(upgrades.stat(StatKind::Pull).price());
        }
        assert_eq!(prices, vec![150, 240, 384, 614, 983, 1573]);
    }

    #[test]
    fn test_purchase_refused_when_poor() {
        let mut upgrades = Upgrades::default();
        let mut money = 149;
        assert!(!upgrades.buy(StatKind::Speed, &mut money));
        assert_eq!(money, 149);
        assert_eq!(upgrades.stat(StatKind::Speed).level, 0);
    }

    #[test]
    fn test_purchase_refused_when_negative() {
        let mut upgrades = Upgrades::default();
        let mut money = -50;
        assert!(!upgrades.buy(StatKind::Magnet, &mut money));
        assert_eq!(money, -50);
    }

    #[test]
    fn test_purchase_refused_at_max_level() {
        let mut upgrades = Upgrades::default();
        let mut money = 10_000_000;
        for _ in 0..STAT_MAX_LEVEL {
            assert!(upgrades.buy(StatKind::Cable, &mut money));
        }
        let before = money;
        assert!(!upgrades.buy(StatKind::Cable, &mut money));
        assert_eq!(money, before);
        assert_eq!(upgrades.stat(StatKind::Cable).level, STAT_MAX_LEVEL);
    }

    #[test]
    fn test_purchase_deducts_exact_price() {
        let mut upgrades = Upgrades::default();
        let mut money = 200;
        assert!(upgrades.buy(StatKind::Fuel, &mut money));
        assert_eq!(money, 50);
    }

    #[test]
    fn test_stats_are_independent() {
        let mut upgrades = Upgrades::default();
        let mut money = 1000;
        assert!(upgrades.buy(StatKind::Speed, &mut money));
        assert_eq!(upgrades.stat(StatKind::Speed).level, 1);
        assert_eq!(upgrades.stat(StatKind::Magnet).level, 0);
        assert_eq!(upgrades.stat(StatKind::Magnet).price(), 150);
    }

    #[test]
    fn test_derived_values_scale_with_level() {
        let mut upgrades = Upgrades::default();
        let mut money = 1_000_000;
        let base = upgrades.magnet_radius();
        upgrades.buy(StatKind::Magnet, &mut money);
        assert!(upgrades.magnet_radius() > base);
        assert_eq!(upgrades.magnet_radius(), 120.0);
        assert_eq!(upgrades.cable_life(), 35);
        assert!((upgrades.pull_speed() - 13.0).abs() < 1e-6);
    }
}
