pub mod bonuses;
pub mod catalog;

pub use bonuses::rarity_multipliers;
pub use catalog::{GardenStep, RARITIES, Rarity, Relic, RewardItem, Season};
