//! Loot drawn at the end of a focus session.
//!
//! Session length picks a rarity table, the current season filters each
//! rarity's pool, and bonuses from decorations standing in the garden tilt
//! the weights. The draw itself is a cumulative-threshold pick over the
//! surviving rarities followed by a uniform pick inside the chosen pool.

use bracket_random::prelude::RandomNumberGenerator;
use chrono::{DateTime, Datelike, Local};

use crate::{
    data::{RARITIES, Rarity, RewardItem, Season, catalog, rarity_multipliers},
    garden::PlacedItem,
    progress::ProgressDocument,
    session::local_day,
};

/// Relative weight per rarity, indexed by [`Rarity::index`].
pub type RarityWeights = [f64; 4];

/// Duration bands, in whole minutes of focus.
pub fn weights_for_seconds(seconds: u32) -> RarityWeights {
    let minutes = seconds / 60;
    match minutes {
        0..10 => [0.0, 0.0, 0.0, 0.0],
        10..30 => [100.0, 0.0, 0.0, 0.0],
        30..45 => [60.0, 40.0, 0.0, 0.0],
        45..60 => [30.0, 50.0, 20.0, 0.0],
        _ => [0.0, 40.0, 40.0, 20.0],
    }
}

fn seasonal_pool(rarity: Rarity, season: Season) -> Vec<RewardItem> {
    catalog::pool(rarity)
        .into_iter()
        .filter(|item| item.in_season(season))
        .collect()
}

/// Rarities still in play with their weights normalized to sum to 100.
pub fn candidate_rarities(
    seconds: u32,
    season: Season,
    placed: &[PlacedItem],
) -> Vec<(Rarity, f64, Vec<RewardItem>)> {
    let base = weights_for_seconds(seconds);
    let multipliers = rarity_multipliers(placed.iter().map(|item| item.token_id.as_str()));

    let mut candidates: Vec<(Rarity, f64, Vec<RewardItem>)> = RARITIES
        .iter()
        .filter_map(|&rarity| {
            let weight = base[rarity.index()] * multipliers[rarity.index()];
            if weight <= 0.0 {
                return None;
            }
            let pool = seasonal_pool(rarity, season);
            if pool.is_empty() {
                return None;
            }
            Some((rarity, weight, pool))
        })
        .collect();

    let total: f64 = candidates.iter().map(|(_, weight, _)| weight).sum();
    for (_, weight, _) in &mut candidates {
        *weight = *weight * 100.0 / total;
    }
    candidates
}

/// Draws zero or one reward for a session of `seconds`.
pub fn draw_reward(
    seconds: u32,
    season: Season,
    placed: &[PlacedItem],
    rng: &mut RandomNumberGenerator,
) -> Option<RewardItem> {
    let candidates = candidate_rarities(seconds, season, placed);
    let (_, _, last_pool) = candidates.last()?;

    let total: f64 = candidates.iter().map(|(_, weight, _)| weight).sum();
    let mut roll = rng.rand::<f64>() * total;
    let mut chosen = last_pool;
    for (_, weight, pool) in &candidates {
        if roll < *weight {
            chosen = pool;
            break;
        }
        roll -= weight;
    }

    let idx = rng.range(0, chosen.len() as i32) as usize;
    let item = chosen[idx];
    log::debug!(
        "drew {} ({}) for a {}s session",
        item.id(),
        item.rarity().as_str(),
        seconds
    );
    Some(item)
}

/// Draws using the document's garden and the season of `now`.
pub fn draw_for_session(
    doc: &ProgressDocument,
    seconds: u32,
    now: &DateTime<Local>,
    rng: &mut RandomNumberGenerator,
) -> Option<RewardItem> {
    draw_reward(seconds, Season::from_month(now.month()), &doc.garden.placed, rng)
}

/// Records a drawn reward: garden pieces queue up for placement, relics unlock once.
pub fn grant_reward(doc: &mut ProgressDocument, item: &RewardItem, now: &DateTime<Local>) {
    match item {
        RewardItem::Garden(step) => doc.pending_tokens.push(step.id.to_string()),
        RewardItem::Relic(relic) => {
            if !doc.relics.iter().any(|id| id == relic.id) {
                doc.relics.push(relic.id.to_string());
            }
        }
    }

    let today = local_day(now);
    if doc.counters.items_date != Some(today) {
        doc.counters.items_received_today = 0;
        doc.counters.items_date = Some(today);
    }
    doc.counters.items_received_today += 1;
    doc.last_reward_at = Some(now.timestamp_millis());
}
