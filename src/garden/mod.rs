use bracket_geometry::prelude::Point;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{data::catalog, progress::ProgressDocument};

pub const DEFAULT_GARDEN_COLS: i32 = 12;
pub const DEFAULT_GARDEN_ROWS: i32 = 10;

/// The temple sits here; nothing may be placed over it.
pub const TEMPLE_ZONE: Footprint = Footprint {
    x: 4,
    y: 0,
    w: 4,
    h: 3,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Footprint {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Footprint {
    pub fn of_token(token_id: &str, x: i32, y: i32) -> Self {
        let (w, h) = catalog::footprint(token_id);
        Self { x, y, w, h }
    }

    pub fn overlaps(&self, other: &Footprint) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x < self.x + self.w
            && point.y >= self.y
            && point.y < self.y + self.h
    }

    /// Whether the footprint lies inside a `cols` x `rows` board. Sums are
    /// taken in `i64` so coordinates near `i32::MAX` can't wrap.
    pub fn within(&self, cols: i32, rows: i32) -> bool {
        let right = i64::from(self.x) + i64::from(self.w);
        let bottom = i64::from(self.y) + i64::from(self.h);
        self.x >= 0 && self.y >= 0 && right <= i64::from(cols) && bottom <= i64::from(rows)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedItem {
    pub id: String,
    pub token_id: String,
    pub img: String,
    pub label: String,
    pub x: i32,
    pub y: i32,
    pub rotation: u16,
    /// Epoch milliseconds.
    pub placed_at: i64,
}

impl PlacedItem {
    pub fn footprint(&self) -> Footprint {
        Footprint::of_token(&self.token_id, self.x, self.y)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Garden {
    pub cols: i32,
    pub rows: i32,
    pub placed: Vec<PlacedItem>,
    pub bg: String,
    pub next_instance: u64,
}

impl Default for Garden {
    fn default() -> Self {
        Self {
            cols: DEFAULT_GARDEN_COLS,
            rows: DEFAULT_GARDEN_ROWS,
            placed: Vec::new(),
            bg: "garden/bg-sand.png".to_string(),
            next_instance: 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("does not fit inside the garden")]
    OutOfBounds,
    #[error("the temple grounds cannot be built on")]
    Locked,
    #[error("another piece is already there")]
    Occupied,
    #[error("no garden piece or placed item with id {0}")]
    NotFound(String),
}

impl PlacementError {
    pub fn reason(&self) -> &'static str {
        match self {
            PlacementError::OutOfBounds => "out_of_bounds",
            PlacementError::Locked => "locked",
            PlacementError::Occupied => "occupied",
            PlacementError::NotFound(_) => "not_found",
        }
    }
}

/// Nearest quarter turn, normalized into `0..360`.
pub fn snap_rotation(degrees: i32) -> u16 {
    let quarters = (f64::from(degrees) / 90.0).round() as i32;
    (quarters.rem_euclid(4) * 90) as u16
}

impl Garden {
    pub fn item(&self, id: &str) -> Option<&PlacedItem> {
        self.placed.iter().find(|item| item.id == id)
    }

    pub fn occupant_at(&self, point: Point) -> Option<&PlacedItem> {
        self.placed.iter().find(|item| item.footprint().contains(point))
    }

    /// Checks a footprint against bounds, the temple and every placed item
    /// except `ignore`.
    pub fn check_fit(
        &self,
        footprint: &Footprint,
        ignore: Option<&str>,
    ) -> Result<(), PlacementError> {
        if !footprint.within(self.cols, self.rows) {
            return Err(PlacementError::OutOfBounds);
        }
        if footprint.overlaps(&TEMPLE_ZONE) {
            return Err(PlacementError::Locked);
        }
        let blocked = self
            .placed
            .iter()
            .filter(|item| Some(item.id.as_str()) != ignore)
            .any(|item| item.footprint().overlaps(footprint));
        if blocked {
            return Err(PlacementError::Occupied);
        }
        Ok(())
    }

    fn fresh_instance_id(&mut self, token_id: &str) -> String {
        loop {
            let id = format!("{token_id}-{}", self.next_instance);
            self.next_instance += 1;
            if self.item(&id).is_none() {
                return id;
            }
        }
    }
}

fn take_first(list: &mut Vec<String>, token_id: &str) -> bool {
    match list.iter().position(|entry| entry == token_id) {
        Some(idx) => {
            list.remove(idx);
            true
        }
        None => false,
    }
}

/// Puts a garden piece on the board, consuming it from the pending queue or,
/// failing that, the inventory. Returns the new instance id.
///
/// Only ids in the garden catalog can be placed; relics and unknown ids fail
/// with `NotFound`. A known piece held in neither list is still placed, which
/// is how the debug script seeds a garden.
pub fn place(
    doc: &mut ProgressDocument,
    token_id: &str,
    x: i32,
    y: i32,
    rotation: i32,
    now_ms: i64,
) -> Result<String, PlacementError> {
    let Some(step) = catalog::garden_step(token_id) else {
        log::debug!("cannot place {token_id}: not a garden piece");
        return Err(PlacementError::NotFound(token_id.to_string()));
    };
    let footprint = Footprint::of_token(token_id, x, y);
    if let Err(err) = doc.garden.check_fit(&footprint, None) {
        log::debug!("cannot place {token_id} at {x},{y}: {}", err.reason());
        return Err(err);
    }

    if !take_first(&mut doc.pending_tokens, token_id) {
        take_first(&mut doc.inventory, token_id);
    }

    let id = doc.garden.fresh_instance_id(token_id);
    doc.garden.placed.push(PlacedItem {
        id: id.clone(),
        token_id: token_id.to_string(),
        img: step.img.to_string(),
        label: step.label.to_string(),
        x,
        y,
        rotation: snap_rotation(rotation),
        placed_at: now_ms,
    });
    Ok(id)
}

pub fn move_item(
    doc: &mut ProgressDocument,
    id: &str,
    x: i32,
    y: i32,
) -> Result<(), PlacementError> {
    let token_id = doc
        .garden
        .item(id)
        .map(|item| item.token_id.clone())
        .ok_or_else(|| PlacementError::NotFound(id.to_string()))?;
    let footprint = Footprint::of_token(&token_id, x, y);
    doc.garden.check_fit(&footprint, Some(id))?;
    if let Some(item) = doc.garden.placed.iter_mut().find(|item| item.id == id) {
        item.x = x;
        item.y = y;
    }
    Ok(())
}

pub fn rotate_item(
    doc: &mut ProgressDocument,
    id: &str,
    delta_deg: i32,
) -> Result<u16, PlacementError> {
    let item = doc
        .garden
        .placed
        .iter_mut()
        .find(|item| item.id == id)
        .ok_or_else(|| PlacementError::NotFound(id.to_string()))?;
    item.rotation = snap_rotation(i32::from(item.rotation) + delta_deg);
    Ok(item.rotation)
}

/// Takes an item back out of the garden; its token returns to the inventory.
pub fn remove_item(doc: &mut ProgressDocument, id: &str) -> Result<PlacedItem, PlacementError> {
    let idx = doc
        .garden
        .placed
        .iter()
        .position(|item| item.id == id)
        .ok_or_else(|| PlacementError::NotFound(id.to_string()))?;
    let item = doc.garden.placed.remove(idx);
    doc.inventory.push(item.token_id.clone());
    Ok(item)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_pending(tokens: &[&str]) -> ProgressDocument {
        let mut doc = ProgressDocument::default();
        doc.pending_tokens = tokens.iter().map(|t| t.to_string()).collect();
        doc
    }

    #[test]
    fn rectangles_overlap_only_when_sharing_cells() {
        let a = Footprint { x: 0, y: 0, w: 2, h: 2 };
        assert!(a.overlaps(&Footprint { x: 1, y: 1, w: 2, h: 2 }));
        assert!(!a.overlaps(&Footprint { x: 2, y: 0, w: 1, h: 1 }));
        assert!(!a.overlaps(&Footprint { x: 0, y: 2, w: 3, h: 1 }));
    }

    #[test]
    fn place_consumes_pending_token() {
        let mut doc = doc_with_pending(&["bonsai"]);
        let id = place(&mut doc, "bonsai", 1, 5, 0, 42).unwrap();
        assert!(doc.pending_tokens.is_empty());
        let item = doc.garden.item(&id).unwrap();
        assert_eq!((item.x, item.y, item.placed_at), (1, 5, 42));
        assert_eq!(item.label, "Bonsai");
    }

    #[test]
    fn place_falls_back_to_inventory() {
        let mut doc = ProgressDocument::default();
        doc.inventory.push("moss-stone".to_string());
        place(&mut doc, "moss-stone", 0, 9, 0, 0).unwrap();
        assert!(doc.inventory.is_empty());
    }

    #[test]
    fn overlapping_footprints_are_occupied() {
        let mut doc = doc_with_pending(&["koi-pond", "tea-house"]);
        place(&mut doc, "koi-pond", 1, 4, 0, 0).unwrap();
        assert_eq!(
            place(&mut doc, "tea-house", 2, 5, 0, 0),
            Err(PlacementError::Occupied)
        );
        assert_eq!(doc.pending_tokens, vec!["tea-house"]);
        assert_eq!(doc.garden.placed.len(), 1);
    }

    #[test]
    fn temple_and_edges_are_rejected() {
        let mut doc = ProgressDocument::default();
        assert_eq!(place(&mut doc, "bonsai", 5, 1, 0, 0), Err(PlacementError::Locked));
        assert_eq!(place(&mut doc, "koi-pond", 3, 2, 0, 0), Err(PlacementError::Locked));
        assert_eq!(place(&mut doc, "koi-pond", 11, 0, 0, 0), Err(PlacementError::OutOfBounds));
        assert_eq!(place(&mut doc, "bonsai", -1, 4, 0, 0), Err(PlacementError::OutOfBounds));
        assert!(doc.garden.placed.is_empty());
    }

    #[test]
    fn extreme_coordinates_are_out_of_bounds() {
        let mut doc = doc_with_pending(&["bonsai", "koi-pond"]);
        for (x, y) in [(i32::MAX, 0), (0, i32::MAX), (i32::MIN, 4), (4, i32::MIN)] {
            assert_eq!(place(&mut doc, "bonsai", x, y, 0, 0), Err(PlacementError::OutOfBounds));
            assert_eq!(place(&mut doc, "koi-pond", x, y, 0, 0), Err(PlacementError::OutOfBounds));
        }
        assert!(doc.garden.placed.is_empty());
        assert_eq!(doc.pending_tokens, vec!["bonsai", "koi-pond"]);
    }

    #[test]
    fn move_to_extreme_coordinates_leaves_item_in_place() {
        let mut doc = ProgressDocument::default();
        let pond = place(&mut doc, "koi-pond", 0, 4, 0, 0).unwrap();
        for (x, y) in [(i32::MAX, 4), (0, i32::MAX), (i32::MIN, 4), (0, i32::MIN)] {
            assert_eq!(move_item(&mut doc, &pond, x, y), Err(PlacementError::OutOfBounds));
        }
        let item = doc.garden.item(&pond).unwrap();
        assert_eq!((item.x, item.y), (0, 4));
    }

    #[test]
    fn only_garden_pieces_can_be_placed() {
        let mut doc = ProgressDocument::default();
        doc.inventory.push("bronze-bell".to_string());
        assert_eq!(
            place(&mut doc, "bronze-bell", 0, 5, 0, 0),
            Err(PlacementError::NotFound("bronze-bell".to_string()))
        );
        assert_eq!(
            place(&mut doc, "paper-crane", 0, 5, 0, 0).map_err(|err| err.reason()),
            Err("not_found")
        );
        assert!(doc.garden.placed.is_empty());
        assert_eq!(doc.inventory, vec!["bronze-bell"]);

        // a known piece held nowhere is still accepted
        assert!(place(&mut doc, "bonsai", 0, 5, 0, 0).is_ok());
    }

    #[test]
    fn instance_ids_are_unique() {
        let mut doc = ProgressDocument::default();
        let a = place(&mut doc, "raked-sand", 0, 4, 0, 0).unwrap();
        let b = place(&mut doc, "raked-sand", 1, 4, 0, 0).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn move_respects_other_items_but_not_itself() {
        let mut doc = ProgressDocument::default();
        let pond = place(&mut doc, "koi-pond", 0, 4, 0, 0).unwrap();
        let lantern = place(&mut doc, "stone-lantern", 5, 6, 0, 0).unwrap();
        move_item(&mut doc, &pond, 1, 4).unwrap();
        assert_eq!(doc.garden.item(&pond).map(|i| i.x), Some(1));
        assert_eq!(move_item(&mut doc, &lantern, 2, 5), Err(PlacementError::Occupied));
        assert_eq!(move_item(&mut doc, &lantern, 6, 2), Err(PlacementError::Locked));
        assert_eq!(
            move_item(&mut doc, "ghost", 0, 0),
            Err(PlacementError::NotFound("ghost".to_string()))
        );
        assert_eq!(doc.garden.occupant_at(Point::new(2, 5)).map(|i| i.id.clone()), Some(pond));
    }

    #[test]
    fn rotation_snaps_to_quarter_turns() {
        assert_eq!(snap_rotation(0), 0);
        assert_eq!(snap_rotation(100), 90);
        assert_eq!(snap_rotation(-90), 270);
        assert_eq!(snap_rotation(359), 0);
        assert_eq!(snap_rotation(500), 180);

        let mut doc = ProgressDocument::default();
        let id = place(&mut doc, "bonsai", 0, 4, 270, 0).unwrap();
        assert_eq!(rotate_item(&mut doc, &id, 80), Ok(0));
        assert_eq!(rotate_item(&mut doc, &id, -95), Ok(270));
    }

    #[test]
    fn remove_returns_token_to_inventory() {
        let mut doc = doc_with_pending(&["koi-pond"]);
        let id = place(&mut doc, "koi-pond", 0, 4, 0, 0).unwrap();
        let removed = remove_item(&mut doc, &id).unwrap();
        assert_eq!(removed.token_id, "koi-pond");
        assert!(doc.garden.placed.is_empty());
        assert_eq!(doc.inventory, vec!["koi-pond"]);
        assert!(remove_item(&mut doc, &id).is_err());
    }
}
