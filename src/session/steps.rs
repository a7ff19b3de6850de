//! Turns focus time into steps for the monk.
//!
//! A session earns raw steps from three independent rules (long session,
//! 45-minute bonus, 60-minute bonus) plus sparks for shorter sessions. Raw
//! steps are then applied one at a time against the daily caps: free up to
//! [`SOFT_CAP`], and beyond that only for extra-step grants or sessions of at
//! least [`EXTENSION_SECONDS`], never past [`HARD_CAP`].

use chrono::{DateTime, Local};
use thiserror::Error;

use super::{SessionRecord, local_day};
use crate::progress::ProgressDocument;

pub const SOFT_CAP: u32 = 6;
pub const HARD_CAP: u32 = 9;
pub const EXTENSION_SECONDS: u32 = 2100;

pub const SPARK_SECONDS: u32 = 300;
pub const SPARKS_PER_STEP: u32 = 3;
pub const FULL_STEP_SECONDS: u32 = 1500;
pub const BONUS_45_SECONDS: u32 = 2700;
pub const BONUS_60_SECONDS: u32 = 3600;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum ExtraStepError {
    #[error("today's extra step was already used")]
    AlreadyUsed,
    #[error("no more steps can be earned today")]
    DailyLimit,
}

fn roll_over_day(doc: &mut ProgressDocument, now: &DateTime<Local>) {
    let today = local_day(now);
    if doc.last_step_date != Some(today) {
        doc.steps_today = 0;
        doc.sparks = 0;
        doc.bonus45_used = false;
        doc.bonus60_used = false;
        doc.ad_step_used = false;
        doc.last_step_date = Some(today);
    }
}

/// Raw steps one session is worth before caps. Consumes sparks and the
/// once-per-day bonuses as a side effect.
fn raw_session_steps(doc: &mut ProgressDocument, seconds: u32) -> u32 {
    let mut raw = 0;

    if seconds >= FULL_STEP_SECONDS {
        raw += 1;
    } else if seconds >= SPARK_SECONDS {
        doc.sparks += 1;
        if doc.sparks >= SPARKS_PER_STEP {
            doc.sparks -= SPARKS_PER_STEP;
            raw += 1;
        }
    }

    if (BONUS_45_SECONDS..BONUS_60_SECONDS).contains(&seconds) && !doc.bonus45_used {
        doc.bonus45_used = true;
        raw += 1;
    }

    if seconds >= BONUS_60_SECONDS && !doc.bonus60_used {
        doc.bonus60_used = true;
        raw += 2;
    }

    raw
}

fn apply_caps(doc: &mut ProgressDocument, raw: u32, may_extend: bool) -> u32 {
    let mut awarded = 0;
    for _ in 0..raw {
        if doc.steps_today >= HARD_CAP {
            break;
        }
        if doc.steps_today >= SOFT_CAP && !may_extend {
            break;
        }
        doc.steps_today += 1;
        awarded += 1;
    }
    if awarded < raw {
        log::debug!(
            "daily cap kept {} of {} steps (today {})",
            raw - awarded,
            raw,
            doc.steps_today
        );
    }
    awarded
}

fn walk_awarded(doc: &mut ProgressDocument, awarded: u32) {
    if awarded == 0 {
        return;
    }
    let direction = doc.next_dir;
    doc.journey.advance(&mut doc.fog, direction, awarded);
}

/// Awards steps for a finished session, logs it to history and walks the monk.
/// Returns how many steps were actually applied after caps.
pub fn award_session_steps(doc: &mut ProgressDocument, seconds: u32, now: &DateTime<Local>) -> u32 {
    roll_over_day(doc, now);

    let raw = raw_session_steps(doc, seconds);
    let awarded = apply_caps(doc, raw, seconds >= EXTENSION_SECONDS);

    doc.session_history.push(SessionRecord {
        date: *now,
        seconds,
        steps: awarded,
    });
    walk_awarded(doc, awarded);
    awarded
}

/// One bonus step per day from the rewarded-ad flow.
pub fn award_extra_step(
    doc: &mut ProgressDocument,
    now: &DateTime<Local>,
) -> Result<u32, ExtraStepError> {
    roll_over_day(doc, now);

    if doc.ad_step_used {
        return Err(ExtraStepError::AlreadyUsed);
    }
    if doc.steps_today >= HARD_CAP {
        return Err(ExtraStepError::DailyLimit);
    }
    doc.ad_step_used = true;

    let awarded = apply_caps(doc, 1, true);
    walk_awarded(doc, awarded);
    Ok(awarded)
}
