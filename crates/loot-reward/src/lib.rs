//! Reward definitions and weighted random selection.
//!
//! A [`RewardSource`] rolls one [`Reward`] for an actor. The session treats
//! the roll as a pure capability; [`WeightedTable`] is the standard
//! implementation, picking proportionally to per-reward weight.

use rand::Rng as _;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identity of a participant (player) for the duration of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(pub u64);

/// Item shown by a reward preview.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Diamond,
    Emerald,
    GoldIngot,
    IronIngot,
    NetheriteScrap,
    EnderPearl,
    Bread,
    Stick,
}

impl core::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::Diamond => "diamond",
            Self::Emerald => "emerald",
            Self::GoldIngot => "gold_ingot",
            Self::IronIngot => "iron_ingot",
            Self::NetheriteScrap => "netherite_scrap",
            Self::EnderPearl => "ender_pearl",
            Self::Bread => "bread",
            Self::Stick => "stick",
        };
        f.write_str(name)
    }
}

/// A reward that can be rolled from a crate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    /// Display name, shown as the label of the reveal entity.
    pub name: String,
    /// Item shown while this reward is previewed.
    pub item: ItemKind,
    /// Selection weight relative to the rest of the table.
    pub weight: u32,
}

impl Reward {
    /// Create a new reward.
    #[must_use]
    pub fn new(name: impl Into<String>, item: ItemKind, weight: u32) -> Self {
        Self {
            name: name.into(),
            item,
            weight,
        }
    }
}

/// Rolls one reward for an actor.
pub trait RewardSource: Send + Sync {
    /// Roll a weighted-random reward. Side-effect-free from the caller's
    /// perspective.
    fn roll(&self, actor: ActorId) -> Reward;
}

/// Error building a weighted table.
#[derive(Debug, Error)]
pub enum TableError {
    /// The table has no rewards at all.
    #[error("reward table is empty")]
    Empty,

    /// Every reward has weight zero, so nothing can ever be rolled.
    #[error("reward table has zero total weight")]
    ZeroWeight,
}

/// A reward table with weight-proportional selection.
#[derive(Clone, Debug)]
pub struct WeightedTable {
    rewards: Vec<Reward>,
    total_weight: u64,
}

impl WeightedTable {
    /// Build a table from a list of rewards.
    ///
    /// Rejects empty tables and tables whose weights sum to zero; a crate
    /// that can never produce a reward is a configuration mistake.
    pub fn new(rewards: Vec<Reward>) -> Result<Self, TableError> {
        if rewards.is_empty() {
            return Err(TableError::Empty);
        }

        let total_weight = rewards.iter().map(|r| u64::from(r.weight)).sum();
        if total_weight == 0 {
            return Err(TableError::ZeroWeight);
        }

        Ok(Self {
            rewards,
            total_weight,
        })
    }

    /// All rewards in the table.
    #[must_use]
    pub fn rewards(&self) -> &[Reward] {
        &self.rewards
    }

    fn pick(&self, mut point: u64) -> &Reward {
        for reward in &self.rewards {
            let weight = u64::from(reward.weight);
            if point < weight {
                return reward;
            }
            point -= weight;
        }
        // total_weight > 0, so the loop always returns for in-range points.
        &self.rewards[self.rewards.len() - 1]
    }
}

impl RewardSource for WeightedTable {
    fn roll(&self, _actor: ActorId) -> Reward {
        let point = rand::thread_rng().gen_range(0..self.total_weight);
        self.pick(point).clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> WeightedTable {
        WeightedTable::new(vec![
            Reward::new("Common", ItemKind::Bread, 70),
            Reward::new("Uncommon", ItemKind::IronIngot, 25),
            Reward::new("Rare", ItemKind::Diamond, 5),
        ])
        .unwrap()
    }

    #[test]
    fn test_empty_table_rejected() {
        assert!(matches!(WeightedTable::new(vec![]), Err(TableError::Empty)));
    }

    #[test]
    fn test_zero_weight_rejected() {
        let result = WeightedTable::new(vec![Reward::new("Nothing", ItemKind::Stick, 0)]);
        assert!(matches!(result, Err(TableError::ZeroWeight)));
    }

    #[test]
    fn test_pick_boundaries() {
        let table = table();

        assert_eq!(table.pick(0).name, "Common");
        assert_eq!(table.pick(69).name, "Common");
        assert_eq!(table.pick(70).name, "Uncommon");
        assert_eq!(table.pick(94).name, "Uncommon");
        assert_eq!(table.pick(95).name, "Rare");
        assert_eq!(table.pick(99).name, "Rare");
    }

    #[test]
    fn test_zero_weight_entry_never_picked() {
        let table = WeightedTable::new(vec![
            Reward::new("Never", ItemKind::Stick, 0),
            Reward::new("Always", ItemKind::Diamond, 1),
        ])
        .unwrap();

        assert_eq!(table.pick(0).name, "Always");
        for _ in 0..50 {
            assert_eq!(table.roll(ActorId(1)).name, "Always");
        }
    }

    #[test]
    fn test_roll_is_in_table() {
        let table = table();
        for _ in 0..100 {
            let rolled = table.roll(ActorId(7));
            assert!(table.rewards().contains(&rolled));
        }
    }
}
