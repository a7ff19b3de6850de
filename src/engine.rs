use bracket_geometry::prelude::Point;
use bracket_random::prelude::RandomNumberGenerator;
use chrono::{DateTime, Local};

use crate::{
    data::RewardItem,
    garden::{self, PlacementError},
    journey::MoveError,
    map::Direction,
    progress::{ProgressDocument, ProgressLog},
    reward,
    session::{
        self, ExtraStepError, SessionMode, SessionRejection, record_session_use, validate_session,
    },
};

/// What one finished focus session produced.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionReport {
    pub outcome: Result<(), SessionRejection>,
    pub awarded_steps: u32,
    pub reward: Option<RewardItem>,
}

impl SessionReport {
    fn rejected(reason: SessionRejection) -> Self {
        Self {
            outcome: Err(reason),
            awarded_steps: 0,
            reward: None,
        }
    }

    pub fn accepted(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Sole owner of one progress document; every mutation goes through here.
pub struct FocusEngine {
    doc: ProgressDocument,
    rng: RandomNumberGenerator,
    log: ProgressLog,
}

impl FocusEngine {
    pub fn new(doc: ProgressDocument) -> Self {
        Self {
            doc,
            rng: RandomNumberGenerator::new(),
            log: ProgressLog::default(),
        }
    }

    pub fn seeded(doc: ProgressDocument, seed: u64) -> Self {
        Self {
            doc,
            rng: RandomNumberGenerator::seeded(seed),
            log: ProgressLog::default(),
        }
    }

    pub fn document(&self) -> &ProgressDocument {
        &self.doc
    }

    pub fn into_document(self) -> ProgressDocument {
        self.doc
    }

    pub fn drain_log(&mut self) -> Vec<String> {
        self.log.drain()
    }

    /// Validate, award steps, roll for loot, then stamp usage counters.
    pub fn complete_session(
        &mut self,
        mode: SessionMode,
        seconds: u32,
        now: &DateTime<Local>,
    ) -> SessionReport {
        if let Err(reason) = validate_session(&mut self.doc, mode, seconds, now) {
            log::info!("session of {seconds}s rejected: {}", reason.reason());
            self.log.push(format!("Session not counted: {reason}."));
            return SessionReport::rejected(reason);
        }

        let awarded_steps = session::award_session_steps(&mut self.doc, seconds, now);
        if awarded_steps > 0 {
            self.log.push(format!(
                "Earned {awarded_steps} step(s); the monk walks to {},{}.",
                self.doc.journey.tx, self.doc.journey.ty
            ));
        }

        let reward = reward::draw_for_session(&self.doc, seconds, now, &mut self.rng);
        if let Some(item) = &reward {
            reward::grant_reward(&mut self.doc, item, now);
            self.log.push(format!(
                "Found {} ({}).",
                item.label(),
                item.rarity().as_str()
            ));
        }

        record_session_use(&mut self.doc, now);
        SessionReport {
            outcome: Ok(()),
            awarded_steps,
            reward,
        }
    }

    pub fn grant_extra_step(&mut self, now: &DateTime<Local>) -> Result<u32, ExtraStepError> {
        let awarded = session::award_extra_step(&mut self.doc, now)?;
        self.log.push(format!("Bonus step granted ({awarded})."));
        Ok(awarded)
    }

    pub fn set_travel_direction(&mut self, direction: Direction) {
        self.doc.next_dir = direction;
    }

    pub fn add_pending_steps(&mut self, steps: u32) {
        self.doc.pending_steps += steps;
    }

    pub fn move_monk(&mut self, target: Point) -> Result<(), MoveError> {
        let doc = &mut self.doc;
        doc.journey
            .move_to(&mut doc.fog, &mut doc.pending_steps, target)?;
        self.log
            .push(format!("Stepped to {},{}.", target.x, target.y));
        Ok(())
    }

    pub fn walk_monk(&mut self, target: Point) -> Result<Vec<Point>, MoveError> {
        let doc = &mut self.doc;
        let walked = doc
            .journey
            .walk_toward(&mut doc.fog, &mut doc.pending_steps, target)?;
        self.log.push(format!(
            "Walked {} tile(s) toward {},{}.",
            walked.len(),
            target.x,
            target.y
        ));
        Ok(walked)
    }

    pub fn preview_path(&self, target: Point) -> Vec<Point> {
        self.doc.journey.preview(&self.doc.fog, target)
    }

    pub fn place(
        &mut self,
        token_id: &str,
        x: i32,
        y: i32,
        rotation: i32,
        now: &DateTime<Local>,
    ) -> Result<String, PlacementError> {
        let placed_at = now.timestamp_millis();
        let id = garden::place(&mut self.doc, token_id, x, y, rotation, placed_at)?;
        self.log.push(format!("Placed {token_id} at {x},{y}."));
        Ok(id)
    }

    pub fn move_item(&mut self, id: &str, x: i32, y: i32) -> Result<(), PlacementError> {
        garden::move_item(&mut self.doc, id, x, y)?;
        self.log.push(format!("Moved {id} to {x},{y}."));
        Ok(())
    }

    pub fn rotate_item(&mut self, id: &str, delta_deg: i32) -> Result<u16, PlacementError> {
        let rotation = garden::rotate_item(&mut self.doc, id, delta_deg)?;
        self.log.push(format!("Turned {id} to {rotation}°."));
        Ok(rotation)
    }

    pub fn remove_item(&mut self, id: &str) -> Result<(), PlacementError> {
        let item = garden::remove_item(&mut self.doc, id)?;
        self.log
            .push(format!("Picked up {}; it is back in the satchel.", item.label));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(hour: u32) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2026, 10, 16, hour, 0, 0)
            .single()
            .expect("unambiguous local time")
    }

    #[test]
    fn accepted_session_awards_draws_and_stamps() {
        let mut engine = FocusEngine::seeded(ProgressDocument::new(), 9);
        let report = engine.complete_session(SessionMode::Pomodoro, 1500, &at(10));
        assert!(report.accepted());
        assert_eq!(report.awarded_steps, 1);
        let reward = report.reward.expect("25 minutes always drops a common");
        assert_eq!(reward.rarity(), crate::data::Rarity::Common);

        let doc = engine.document();
        assert_eq!(doc.counters.placements_today, 1);
        assert_eq!(doc.counters.items_received_today, 1);
        assert_eq!(doc.streak.days, 1);
        assert!(!engine.drain_log().is_empty());
    }

    #[test]
    fn rejected_session_changes_nothing_but_rollover() {
        let mut engine = FocusEngine::seeded(ProgressDocument::new(), 1);
        engine.complete_session(SessionMode::Flow, 1500, &at(10));
        let soon = at(10) + Duration::seconds(10);
        let report = engine.complete_session(SessionMode::Flow, 1500, &soon);
        assert_eq!(report.outcome, Err(SessionRejection::Cooldown));
        assert_eq!(report.awarded_steps, 0);
        assert_eq!(engine.document().session_history.len(), 1);
        assert_eq!(engine.document().counters.placements_today, 1);
    }

    #[test]
    fn extra_step_and_monk_moves_go_through_engine() {
        let mut engine = FocusEngine::seeded(ProgressDocument::new(), 2);
        engine.set_travel_direction(Direction::Down);
        let start = engine.document().journey.tile();
        assert_eq!(engine.grant_extra_step(&at(9)), Ok(1));
        assert_eq!(engine.document().journey.tile(), Point::new(start.x, start.y + 1));

        engine.add_pending_steps(1);
        let target = Point::new(start.x + 1, start.y + 1);
        engine.move_monk(target).unwrap();
        assert_eq!(engine.document().pending_steps, 0);
        assert_eq!(engine.preview_path(target), vec![target]);
    }
}
