use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{SessionMode, local_day};
use crate::progress::ProgressDocument;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Rules {
    pub min_seconds_pomodoro: u32,
    pub min_seconds_flow: u32,
    pub daily_max_placements: u32,
    pub cooldown_seconds: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            min_seconds_pomodoro: 180,
            min_seconds_flow: 180,
            daily_max_placements: 6,
            cooldown_seconds: 30,
        }
    }
}

impl Rules {
    pub fn min_seconds(&self, mode: SessionMode) -> u32 {
        match mode {
            SessionMode::Flow => self.min_seconds_flow,
            SessionMode::Pomodoro => self.min_seconds_pomodoro,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Counters {
    pub placements_today: u32,
    /// Epoch milliseconds.
    pub last_session_ended_at: Option<i64>,
    pub items_received_today: u32,
    pub items_date: Option<NaiveDate>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Streak {
    pub days: u32,
    pub last_date: Option<NaiveDate>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum SessionRejection {
    #[error("session too short to count")]
    TooShort,
    #[error("still cooling down from the last session")]
    Cooldown,
    #[error("daily placement cap reached")]
    DailyCap,
}

impl SessionRejection {
    pub fn reason(&self) -> &'static str {
        match self {
            SessionRejection::TooShort => "too_short",
            SessionRejection::Cooldown => "cooldown",
            SessionRejection::DailyCap => "daily_cap",
        }
    }
}

/// Zeroes the per-day counters when the streak was last stamped on another day.
pub fn midnight_reset(doc: &mut ProgressDocument, now: &DateTime<Local>) {
    let today = local_day(now);
    if doc.streak.last_date != Some(today) {
        doc.counters.placements_today = 0;
        doc.counters.items_received_today = 0;
        doc.counters.items_date = Some(today);
    }
}

/// Decides whether a finished session counts. Only the day rollover touches
/// the document; usage counters are left to [`record_session_use`].
pub fn validate_session(
    doc: &mut ProgressDocument,
    mode: SessionMode,
    seconds: u32,
    now: &DateTime<Local>,
) -> Result<(), SessionRejection> {
    midnight_reset(doc, now);

    if seconds < doc.rules.min_seconds(mode) {
        return Err(SessionRejection::TooShort);
    }

    if let Some(ended_at) = doc.counters.last_session_ended_at {
        let since = now.timestamp_millis() - ended_at;
        if since < i64::from(doc.rules.cooldown_seconds) * 1000 {
            return Err(SessionRejection::Cooldown);
        }
    }

    if doc.counters.placements_today >= doc.rules.daily_max_placements {
        return Err(SessionRejection::DailyCap);
    }

    Ok(())
}

/// Bookkeeping after a session was accepted: cooldown stamp, placement count, streak.
pub fn record_session_use(doc: &mut ProgressDocument, now: &DateTime<Local>) {
    let today = local_day(now);
    doc.counters.last_session_ended_at = Some(now.timestamp_millis());
    doc.counters.placements_today += 1;

    let streak = &mut doc.streak;
    match streak.last_date {
        Some(last) if last == today => {}
        Some(last) if last.succ_opt() == Some(today) => streak.days += 1,
        _ => streak.days = 1,
    }
    streak.last_date = Some(today);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn noon(day: u32) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2026, 10, day, 12, 0, 0)
            .single()
            .expect("unambiguous local noon")
    }

    fn stamped_today(now: &DateTime<Local>) -> ProgressDocument {
        let mut doc = ProgressDocument::default();
        doc.streak.last_date = Some(local_day(now));
        doc
    }

    #[test]
    fn short_flow_session_is_too_short() {
        let now = noon(16);
        let mut doc = ProgressDocument::default();
        assert_eq!(
            validate_session(&mut doc, SessionMode::Flow, 100, &now),
            Err(SessionRejection::TooShort)
        );
    }

    #[test]
    fn too_short_wins_over_other_limits() {
        let now = noon(16);
        let mut doc = stamped_today(&now);
        doc.counters.placements_today = 6;
        doc.counters.last_session_ended_at = Some(now.timestamp_millis());
        assert_eq!(
            validate_session(&mut doc, SessionMode::Pomodoro, 179, &now),
            Err(SessionRejection::TooShort)
        );
    }

    #[test]
    fn session_right_after_another_is_cooling_down() {
        let now = noon(16);
        let mut doc = ProgressDocument::default();
        doc.counters.last_session_ended_at = Some(now.timestamp_millis());
        assert_eq!(
            validate_session(&mut doc, SessionMode::Flow, 200, &now),
            Err(SessionRejection::Cooldown)
        );
    }

    #[test]
    fn placement_cap_blocks_sessions() {
        let now = noon(16);
        let mut doc = stamped_today(&now);
        doc.counters.placements_today = 6;
        assert_eq!(
            validate_session(&mut doc, SessionMode::Flow, 200, &now),
            Err(SessionRejection::DailyCap)
        );
    }

    #[test]
    fn session_past_cooldown_is_accepted() {
        let now = noon(16);
        let mut doc = stamped_today(&now);
        doc.counters.last_session_ended_at = Some(now.timestamp_millis() - 31_000);
        assert_eq!(validate_session(&mut doc, SessionMode::Flow, 200, &now), Ok(()));
    }

    #[test]
    fn new_day_clears_daily_counters() {
        let now = noon(16);
        let mut doc = ProgressDocument::default();
        doc.streak.last_date = Some(local_day(&noon(15)));
        doc.counters.placements_today = 6;
        doc.counters.items_received_today = 4;
        assert_eq!(validate_session(&mut doc, SessionMode::Flow, 200, &now), Ok(()));
        assert_eq!(doc.counters.placements_today, 0);
        assert_eq!(doc.counters.items_received_today, 0);
        assert_eq!(doc.counters.items_date, Some(local_day(&now)));
    }

    #[test]
    fn validation_leaves_usage_counters_alone() {
        let now = noon(16);
        let mut doc = stamped_today(&now);
        validate_session(&mut doc, SessionMode::Pomodoro, 1500, &now).unwrap();
        assert_eq!(doc.counters.placements_today, 0);
        assert_eq!(doc.counters.last_session_ended_at, None);
    }

    #[test]
    fn recording_use_extends_streak_on_consecutive_days() {
        let mut doc = ProgressDocument::default();
        record_session_use(&mut doc, &noon(14));
        assert_eq!(doc.streak.days, 1);
        record_session_use(&mut doc, &(noon(14) + Duration::minutes(40)));
        assert_eq!(doc.streak.days, 1);
        assert_eq!(doc.counters.placements_today, 2);
        record_session_use(&mut doc, &noon(15));
        assert_eq!(doc.streak.days, 2);
        record_session_use(&mut doc, &noon(17));
        assert_eq!(doc.streak.days, 1);
        assert_eq!(doc.counters.last_session_ended_at, Some(noon(17).timestamp_millis()));
    }
}
