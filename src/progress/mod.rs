pub mod journal;
pub mod migrate;
pub mod store;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    garden::Garden,
    journey::Journey,
    map::{DEFAULT_MAP_COLS, DEFAULT_MAP_ROWS, Direction, Fog, REVEAL_RADIUS},
    session::{Counters, Rules, SessionRecord, Streak},
};

pub use journal::ProgressLog;
pub use migrate::{CURRENT_SCHEMA, RawProgress, migrate, parse_progress};
pub use store::{JsonFileStore, MemoryStore, ProgressStore};

#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("progress file i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("progress document is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("progress schema v{0} is newer than this build understands")]
    UnsupportedSchema(u32),
    #[error("journey map of {cols}x{rows} tiles exceeds the {max}-tile limit")]
    MapTooLarge { cols: i32, rows: i32, max: i32 },
}

/// Everything the journey, economy and garden persist between launches.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressDocument {
    pub schema_version: u32,
    pub fog: Fog,
    pub journey: Journey,
    pub next_dir: Direction,

    pub steps_today: u32,
    pub sparks: u32,
    pub pending_steps: u32,
    pub ad_step_used: bool,
    pub bonus45_used: bool,
    pub bonus60_used: bool,
    pub last_step_date: Option<NaiveDate>,
    pub session_history: Vec<SessionRecord>,

    pub rules: Rules,
    pub counters: Counters,
    pub streak: Streak,

    pub garden: Garden,
    pub inventory: Vec<String>,
    pub pending_tokens: Vec<String>,
    pub relics: Vec<String>,
    /// Epoch milliseconds of the last loot drop.
    pub last_reward_at: Option<i64>,
}

impl ProgressDocument {
    /// First-launch state: monk in the middle of a hidden map with its
    /// immediate surroundings uncovered.
    pub fn new() -> Self {
        let journey = Journey::default();
        let mut fog = Fog::new(DEFAULT_MAP_COLS, DEFAULT_MAP_ROWS);
        fog.reveal_radius(journey.tx, journey.ty, REVEAL_RADIUS);
        Self {
            schema_version: CURRENT_SCHEMA,
            fog,
            journey,
            next_dir: Direction::Right,
            steps_today: 0,
            sparks: 0,
            pending_steps: 0,
            ad_step_used: false,
            bonus45_used: false,
            bonus60_used: false,
            last_step_date: None,
            session_history: Vec::new(),
            rules: Rules::default(),
            counters: Counters::default(),
            streak: Streak::default(),
            garden: Garden::default(),
            inventory: Vec::new(),
            pending_tokens: Vec::new(),
            relics: Vec::new(),
            last_reward_at: None,
        }
    }

    pub fn to_json(&self) -> Result<String, ProgressError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for ProgressDocument {
    fn default() -> Self {
        Self::new()
    }
}
