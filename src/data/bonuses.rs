use super::catalog::{RARITIES, Rarity};

/// Rarity multipliers granted while a token sits in the garden.
pub struct BonusEffect {
    pub token_id: &'static str,
    pub multipliers: &'static [(Rarity, f64)],
}

pub static BONUS_EFFECTS: [BonusEffect; 4] = [
    BonusEffect {
        token_id: "bonsai",
        multipliers: &[(Rarity::Rare, 1.10)],
    },
    BonusEffect {
        token_id: "koi-pond",
        multipliers: &[(Rarity::Rare, 1.05), (Rarity::Epic, 1.10)],
    },
    BonusEffect {
        token_id: "tea-house",
        multipliers: &[(Rarity::Epic, 1.15)],
    },
    BonusEffect {
        token_id: "golden-pagoda",
        multipliers: &[(Rarity::Epic, 1.10), (Rarity::Legendary, 1.25)],
    },
];

pub fn bonus_for(token_id: &str) -> Option<&'static BonusEffect> {
    BONUS_EFFECTS.iter().find(|effect| effect.token_id == token_id)
}

/// Folds every placed token's bonus into one multiplier per rarity.
/// Duplicate placements compound.
pub fn rarity_multipliers<'a, I>(placed_tokens: I) -> [f64; 4]
where
    I: IntoIterator<Item = &'a str>,
{
    placed_tokens
        .into_iter()
        .filter_map(bonus_for)
        .flat_map(|effect| effect.multipliers.iter())
        .fold([1.0; RARITIES.len()], |mut acc, (rarity, factor)| {
            acc[rarity.index()] *= factor;
            acc
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_placed_bonus_items_means_identity() {
        assert_eq!(rarity_multipliers(["raked-sand", "moss-stone"]), [1.0; 4]);
    }

    #[test]
    fn bonuses_compound_multiplicatively() {
        let multipliers = rarity_multipliers(["bonsai", "bonsai", "koi-pond"]);
        assert!((multipliers[Rarity::Rare.index()] - 1.10 * 1.10 * 1.05).abs() < 1e-9);
        assert!((multipliers[Rarity::Epic.index()] - 1.10).abs() < 1e-9);
        assert_eq!(multipliers[Rarity::Common.index()], 1.0);
    }
}
