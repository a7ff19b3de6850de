pub mod steps;
pub mod validate;

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};

pub use steps::{ExtraStepError, award_extra_step, award_session_steps};
pub use validate::{
    Counters, Rules, SessionRejection, Streak, midnight_reset, record_session_use,
    validate_session,
};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionMode {
    #[default]
    Pomodoro,
    Flow,
}

impl SessionMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "pomodoro" => Some(SessionMode::Pomodoro),
            "flow" | "flowtime" => Some(SessionMode::Flow),
            _ => None,
        }
    }
}

/// One finished focus session as kept in history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub date: DateTime<Local>,
    pub seconds: u32,
    pub steps: u32,
}

/// Calendar day in the user's local time zone.
pub fn local_day(now: &DateTime<Local>) -> NaiveDate {
    now.date_naive()
}
