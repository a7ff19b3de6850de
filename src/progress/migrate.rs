//! Loading persisted progress of any age.
//!
//! Documents are first parsed into [`RawProgress`], where every field is
//! optional and legacy encodings are tolerated, then [`migrate`] fills in
//! defaults and repairs shapes to produce the canonical [`ProgressDocument`].

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

use super::{ProgressDocument, ProgressError};
use crate::{
    garden::{Garden, snap_rotation},
    journey::Journey,
    map::{
        DEFAULT_MAP_COLS, DEFAULT_MAP_ROWS, Direction, Facing, Fog, MAX_MAP_DIM, REVEAL_RADIUS,
    },
    session::{Counters, Rules, SessionRecord, Streak},
};

/// v0 is any document written before the version field existed.
pub const CURRENT_SCHEMA: u32 = 1;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFog {
    pub cols: Option<i32>,
    pub rows: Option<i32>,
    /// Older builds stored `0`/`1` numbers instead of booleans.
    pub revealed: Option<Vec<Value>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawJourney {
    pub tx: Option<i32>,
    pub ty: Option<i32>,
    pub path_id: Option<String>,
    pub step: Option<u64>,
    pub facing: Option<Facing>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProgress {
    pub schema_version: Option<u32>,
    pub fog: Option<RawFog>,
    pub journey: Option<RawJourney>,
    pub next_dir: Option<Direction>,
    pub steps_today: Option<u32>,
    pub sparks: Option<u32>,
    pub pending_steps: Option<u32>,
    pub ad_step_used: Option<bool>,
    pub bonus45_used: Option<bool>,
    pub bonus60_used: Option<bool>,
    pub last_step_date: Option<NaiveDate>,
    pub session_history: Option<Vec<SessionRecord>>,
    pub rules: Option<Rules>,
    pub counters: Option<Counters>,
    pub streak: Option<Streak>,
    pub garden: Option<Garden>,
    pub inventory: Option<Vec<String>>,
    pub pending_tokens: Option<Vec<String>>,
    pub relics: Option<Vec<String>>,
    pub last_reward_at: Option<i64>,
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        _ => false,
    }
}

fn migrate_fog(raw: Option<RawFog>) -> Result<Fog, ProgressError> {
    let raw = raw.unwrap_or_default();
    let cols = raw.cols.filter(|c| *c > 0).unwrap_or(DEFAULT_MAP_COLS);
    let rows = raw.rows.filter(|r| *r > 0).unwrap_or(DEFAULT_MAP_ROWS);
    if cols > MAX_MAP_DIM || rows > MAX_MAP_DIM {
        return Err(ProgressError::MapTooLarge {
            cols,
            rows,
            max: MAX_MAP_DIM,
        });
    }
    let mut fog = Fog::new(cols, rows);
    match raw.revealed {
        Some(cells) if cells.len() == fog.revealed.len() => {
            fog.revealed = cells.iter().map(truthy).collect();
        }
        Some(cells) => {
            log::warn!(
                "fog bitmap has {} cells, expected {}; starting hidden",
                cells.len(),
                fog.revealed.len()
            );
        }
        None => {}
    }
    Ok(fog)
}

fn migrate_journey(raw: Option<RawJourney>, fog: &Fog) -> Journey {
    let raw = raw.unwrap_or_default();
    let fallback = Journey::default();
    let tx = raw.tx.unwrap_or(fog.cols / 2);
    let ty = raw.ty.unwrap_or(fog.rows / 2);
    Journey {
        tx: tx.clamp(0, fog.cols - 1),
        ty: ty.clamp(0, fog.rows - 1),
        path_id: raw.path_id.unwrap_or(fallback.path_id),
        step: raw.step.unwrap_or(0),
        facing: raw.facing.unwrap_or(fallback.facing),
    }
}

pub fn migrate(raw: RawProgress) -> Result<ProgressDocument, ProgressError> {
    let version = raw.schema_version.unwrap_or(0);
    if version > CURRENT_SCHEMA {
        return Err(ProgressError::UnsupportedSchema(version));
    }
    if version < CURRENT_SCHEMA {
        log::info!("migrating progress schema v{version} -> v{CURRENT_SCHEMA}");
    }

    let mut fog = migrate_fog(raw.fog)?;
    let journey = migrate_journey(raw.journey, &fog);
    if fog.revealed_count() == 0 {
        fog.reveal_radius(journey.tx, journey.ty, REVEAL_RADIUS);
    }

    let mut garden = raw.garden.unwrap_or_default();
    for item in &mut garden.placed {
        item.rotation = snap_rotation(i32::from(item.rotation));
    }

    Ok(ProgressDocument {
        schema_version: CURRENT_SCHEMA,
        fog,
        journey,
        next_dir: raw.next_dir.unwrap_or_default(),
        steps_today: raw.steps_today.unwrap_or(0),
        sparks: raw.sparks.unwrap_or(0).min(2),
        pending_steps: raw.pending_steps.unwrap_or(0),
        ad_step_used: raw.ad_step_used.unwrap_or(false),
        bonus45_used: raw.bonus45_used.unwrap_or(false),
        bonus60_used: raw.bonus60_used.unwrap_or(false),
        last_step_date: raw.last_step_date,
        session_history: raw.session_history.unwrap_or_default(),
        rules: raw.rules.unwrap_or_default(),
        counters: raw.counters.unwrap_or_default(),
        streak: raw.streak.unwrap_or_default(),
        garden,
        inventory: raw.inventory.unwrap_or_default(),
        pending_tokens: raw.pending_tokens.unwrap_or_default(),
        relics: raw.relics.unwrap_or_default(),
        last_reward_at: raw.last_reward_at,
    })
}

pub fn parse_progress(json: &str) -> Result<ProgressDocument, ProgressError> {
    let raw: RawProgress = serde_json::from_str(json)?;
    migrate(raw)
}
