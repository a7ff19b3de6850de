use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

pub const RARITIES: [Rarity; 4] = [
    Rarity::Common,
    Rarity::Rare,
    Rarity::Epic,
    Rarity::Legendary,
];

impl Rarity {
    pub fn index(&self) -> usize {
        match self {
            Rarity::Common => 0,
            Rarity::Rare => 1,
            Rarity::Epic => 2,
            Rarity::Legendary => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Rare => "rare",
            Rarity::Epic => "epic",
            Rarity::Legendary => "legendary",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    /// Meteorological seasons; `month` is 1-based.
    pub fn from_month(month: u32) -> Self {
        match month {
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            9..=11 => Season::Autumn,
            _ => Season::Winter,
        }
    }
}

/// A decoration that can be placed in the garden.
#[derive(Clone, Debug, PartialEq)]
pub struct GardenStep {
    pub id: &'static str,
    pub label: &'static str,
    pub img: &'static str,
    pub rarity: Rarity,
    pub season: Option<Season>,
    pub width: i32,
    pub height: i32,
}

/// A keepsake that is unlocked once and never placed.
#[derive(Clone, Debug, PartialEq)]
pub struct Relic {
    pub id: &'static str,
    pub label: &'static str,
    pub img: &'static str,
    pub rarity: Rarity,
    pub season: Option<Season>,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RewardItem {
    Garden(&'static GardenStep),
    Relic(&'static Relic),
}

impl RewardItem {
    pub fn id(&self) -> &'static str {
        match self {
            RewardItem::Garden(step) => step.id,
            RewardItem::Relic(relic) => relic.id,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RewardItem::Garden(step) => step.label,
            RewardItem::Relic(relic) => relic.label,
        }
    }

    pub fn rarity(&self) -> Rarity {
        match self {
            RewardItem::Garden(step) => step.rarity,
            RewardItem::Relic(relic) => relic.rarity,
        }
    }

    pub fn season(&self) -> Option<Season> {
        match self {
            RewardItem::Garden(step) => step.season,
            RewardItem::Relic(relic) => relic.season,
        }
    }

    pub fn in_season(&self, season: Season) -> bool {
        self.season().map_or(true, |tag| tag == season)
    }
}

const fn step(
    id: &'static str,
    label: &'static str,
    img: &'static str,
    rarity: Rarity,
    season: Option<Season>,
    width: i32,
    height: i32,
) -> GardenStep {
    GardenStep {
        id,
        label,
        img,
        rarity,
        season,
        width,
        height,
    }
}

const fn relic(
    id: &'static str,
    label: &'static str,
    img: &'static str,
    rarity: Rarity,
    season: Option<Season>,
) -> Relic {
    Relic {
        id,
        label,
        img,
        rarity,
        season,
    }
}

pub static GARDEN_STEPS: [GardenStep; 14] = [
    step("raked-sand", "Raked Sand", "garden/raked-sand.png", Rarity::Common, None, 1, 1),
    step("moss-stone", "Moss Stone", "garden/moss-stone.png", Rarity::Common, None, 1, 1),
    step("stone-lantern", "Stone Lantern", "garden/stone-lantern.png", Rarity::Common, None, 1, 1),
    step("bamboo-fence", "Bamboo Fence", "garden/bamboo-fence.png", Rarity::Common, None, 2, 1),
    step(
        "cherry-blossom",
        "Cherry Blossom",
        "garden/cherry-blossom.png",
        Rarity::Common,
        Some(Season::Spring),
        1,
        1,
    ),
    step("bonsai", "Bonsai", "garden/bonsai.png", Rarity::Rare, None, 1, 1),
    step("koi-pond", "Koi Pond", "garden/koi-pond.png", Rarity::Rare, None, 2, 2),
    step(
        "red-maple",
        "Red Maple",
        "garden/red-maple.png",
        Rarity::Rare,
        Some(Season::Autumn),
        1,
        1,
    ),
    step(
        "lotus-pool",
        "Lotus Pool",
        "garden/lotus-pool.png",
        Rarity::Rare,
        Some(Season::Summer),
        2,
        2,
    ),
    step("tea-house", "Tea House", "garden/tea-house.png", Rarity::Epic, None, 2, 2),
    step("moon-bridge", "Moon Bridge", "garden/moon-bridge.png", Rarity::Epic, None, 2, 1),
    step(
        "snow-lantern",
        "Snow Lantern",
        "garden/snow-lantern.png",
        Rarity::Epic,
        Some(Season::Winter),
        1,
        1,
    ),
    step(
        "golden-pagoda",
        "Golden Pagoda",
        "garden/golden-pagoda.png",
        Rarity::Legendary,
        None,
        2,
        3,
    ),
    step(
        "dragon-gate",
        "Dragon Gate",
        "garden/dragon-gate.png",
        Rarity::Legendary,
        Some(Season::Spring),
        3,
        1,
    ),
];

pub static RELICS: [Relic; 5] = [
    relic("prayer-beads", "Prayer Beads", "relics/prayer-beads.png", Rarity::Rare, None),
    relic("bronze-bell", "Bronze Bell", "relics/bronze-bell.png", Rarity::Epic, None),
    relic(
        "harvest-bowl",
        "Harvest Bowl",
        "relics/harvest-bowl.png",
        Rarity::Epic,
        Some(Season::Autumn),
    ),
    relic("jade-buddha", "Jade Buddha", "relics/jade-buddha.png", Rarity::Legendary, None),
    relic(
        "winter-sutra",
        "Winter Sutra",
        "relics/winter-sutra.png",
        Rarity::Legendary,
        Some(Season::Winter),
    ),
];

pub fn garden_step(id: &str) -> Option<&'static GardenStep> {
    GARDEN_STEPS.iter().find(|step| step.id == id)
}

pub fn relic_by_id(id: &str) -> Option<&'static Relic> {
    RELICS.iter().find(|relic| relic.id == id)
}

/// Footprint in garden tiles; ids missing from the catalog occupy a single tile.
pub fn footprint(id: &str) -> (i32, i32) {
    garden_step(id).map_or((1, 1), |step| (step.width, step.height))
}

pub fn season_of(id: &str) -> Option<Season> {
    garden_step(id)
        .map(|step| step.season)
        .or_else(|| relic_by_id(id).map(|relic| relic.season))
        .flatten()
}

/// Every catalog entry of one rarity, garden steps before relics.
pub fn pool(rarity: Rarity) -> Vec<RewardItem> {
    GARDEN_STEPS
        .iter()
        .filter(|step| step.rarity == rarity)
        .map(RewardItem::Garden)
        .chain(
            RELICS
                .iter()
                .filter(|relic| relic.rarity == rarity)
                .map(RewardItem::Relic),
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seasons_follow_calendar_months() {
        assert_eq!(Season::from_month(3), Season::Spring);
        assert_eq!(Season::from_month(5), Season::Spring);
        assert_eq!(Season::from_month(6), Season::Summer);
        assert_eq!(Season::from_month(9), Season::Autumn);
        assert_eq!(Season::from_month(11), Season::Autumn);
        assert_eq!(Season::from_month(12), Season::Winter);
        assert_eq!(Season::from_month(1), Season::Winter);
        assert_eq!(Season::from_month(2), Season::Winter);
    }

    #[test]
    fn every_rarity_has_a_year_round_entry() {
        for rarity in RARITIES {
            assert!(
                pool(rarity).iter().any(|item| item.season().is_none()),
                "{} pool is seasonal only",
                rarity.as_str()
            );
        }
    }

    #[test]
    fn footprint_lookup_defaults_to_single_tile() {
        assert_eq!(footprint("koi-pond"), (2, 2));
        assert_eq!(footprint("golden-pagoda"), (2, 3));
        assert_eq!(footprint("not-a-token"), (1, 1));
    }

    #[test]
    fn seasonal_tag_lookup_covers_relics() {
        assert_eq!(season_of("red-maple"), Some(Season::Autumn));
        assert_eq!(season_of("winter-sutra"), Some(Season::Winter));
        assert_eq!(season_of("bonsai"), None);
    }

    #[test]
    fn catalog_ids_are_unique() {
        let mut ids: Vec<&str> = GARDEN_STEPS
            .iter()
            .map(|step| step.id)
            .chain(RELICS.iter().map(|relic| relic.id))
            .collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }
}
