//! Construction rules for availability blocks on the weekly grid.
//!
//! Positions are fractional hours of a day in `[0, 24]`. Every edit snaps to
//! half hours, keeps a block at least 30 minutes long, and caps a block at
//! 4 hours while its end is being dragged. These caps only apply to how
//! blocks are built; stored availability may be longer once merged.
//!
//! Pointer interaction is modelled as [`GridEditor`], a small state machine:
//!
//! ```text
//! Idle ──press_body──▶ Dragging ──release──▶ Idle
//! Idle ──press_handle(Top|Bottom)──▶ Resizing{edge} ──release──▶ Idle
//! ```

use chrono::DateTime;
use chrono_tz::Tz;

use crate::error::Result;
use crate::interval::TimeInterval;
use crate::week::day_offset;

/// Hours in a grid day.
pub const DAY_HOURS: f64 = 24.0;
/// Snapping step in hours.
pub const SNAP_HOURS: f64 = 0.5;
/// Shortest block that can be built.
pub const MIN_BLOCK_HOURS: f64 = 0.5;
/// Longest block that can be built by resizing.
pub const MAX_BLOCK_HOURS: f64 = 4.0;
/// Length of a block created by clicking an empty cell.
pub const DEFAULT_BLOCK_HOURS: f64 = 1.0;

/// Round fractional hours to the nearest half hour (half-up).
pub fn snap_hours(hours: f64) -> f64 {
    ((hours / SNAP_HOURS) + 0.5).floor() * SNAP_HOURS
}

fn clamp_day(hours: f64) -> f64 {
    hours.clamp(0.0, DAY_HOURS)
}

// ── Block ───────────────────────────────────────────────────────────────────

/// One availability block within a single grid day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Block {
    start: f64,
    end: f64,
}

impl Block {
    /// Build a block from raw positions: both ends snap, and the end is
    /// moved to keep the block between 30 minutes and 4 hours.
    pub fn new(start: f64, end: f64) -> Self {
        let start = snap_hours(clamp_day(start)).min(DAY_HOURS - MIN_BLOCK_HOURS);
        let end = snap_hours(clamp_day(end))
            .clamp(start + MIN_BLOCK_HOURS, start + MAX_BLOCK_HOURS);
        Block { start, end }
    }

    /// The default one-hour block for a click at `hours`, clipped to the day.
    pub fn from_click(hours: f64) -> Self {
        let start = snap_hours(clamp_day(hours));
        Block::new(start, (start + DEFAULT_BLOCK_HOURS).min(DAY_HOURS))
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn hours(&self) -> f64 {
        self.end - self.start
    }

    /// `HH:MM - HH:MM`, the label shown on the block.
    pub fn label(&self) -> String {
        format!("{} - {}", format_hours(self.start), format_hours(self.end))
    }

    /// Anchor this block to day `day_index` of the week starting at `week_start`.
    ///
    /// # Errors
    ///
    /// Propagates grid and DST errors from [`day_offset`].
    pub fn to_interval(
        &self,
        week_start: DateTime<Tz>,
        day_index: usize,
    ) -> Result<TimeInterval> {
        let start = day_offset(week_start, day_index, self.start)?;
        let end = day_offset(week_start, day_index, self.end)?;
        TimeInterval::new(start, end)
    }

    /// Final pass applied after every edit: re-snap, then enforce the
    /// minimum and maximum by moving the end.
    fn settle(start: f64, end: f64) -> Self {
        let start = snap_hours(start);
        let mut end = snap_hours(end);
        let height = end - start;
        if height < MIN_BLOCK_HOURS {
            end = start + MIN_BLOCK_HOURS;
        }
        if height > MAX_BLOCK_HOURS {
            end = start + MAX_BLOCK_HOURS;
        }
        Block { start, end }
    }
}

fn format_hours(hours: f64) -> String {
    let total_minutes = (hours * 60.0).round() as i64;
    format!("{:02}:{:02}", total_minutes / 60, total_minutes % 60)
}

// ── GridEditor ──────────────────────────────────────────────────────────────

/// Which resize handle is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Bottom,
}

/// Pointer interaction state for one grid.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GridEditor {
    #[default]
    Idle,
    Dragging {
        day: usize,
        block: Block,
    },
    Resizing {
        day: usize,
        block: Block,
        edge: Edge,
    },
}

impl GridEditor {
    pub fn new() -> Self {
        GridEditor::Idle
    }

    /// Grab the body of `block` to move it. Ignored unless idle.
    pub fn press_body(&mut self, day: usize, block: Block) {
        if matches!(self, GridEditor::Idle) {
            *self = GridEditor::Dragging { day, block };
        }
    }

    /// Grab a resize handle of `block`. Ignored unless idle.
    pub fn press_handle(&mut self, day: usize, block: Block, edge: Edge) {
        if matches!(self, GridEditor::Idle) {
            *self = GridEditor::Resizing { day, block, edge };
        }
    }

    /// Pointer moved to `hours` within the held block's day.
    ///
    /// Returns the updated block, or `None` when nothing is held.
    pub fn move_to(&mut self, hours: f64) -> Option<Block> {
        let pointer = snap_hours(clamp_day(hours));
        match self {
            GridEditor::Idle => None,
            GridEditor::Dragging { block, .. } => {
                let height = block.hours();
                let start = pointer.min(DAY_HOURS - height).max(0.0);
                *block = Block::settle(start, start + height);
                Some(*block)
            }
            GridEditor::Resizing { block, edge, .. } => {
                let (start, end) = match edge {
                    Edge::Top => {
                        let start = pointer.min(block.end - MIN_BLOCK_HOURS).max(0.0);
                        (start, block.end)
                    }
                    Edge::Bottom => {
                        let end = pointer
                            .max(block.start + MIN_BLOCK_HOURS)
                            .min(DAY_HOURS)
                            .min(block.start + MAX_BLOCK_HOURS);
                        (block.start, end)
                    }
                };
                *block = Block::settle(start, end);
                Some(*block)
            }
        }
    }

    /// Let go. Returns the day and final block that was being edited.
    pub fn release(&mut self) -> Option<(usize, Block)> {
        let released = match *self {
            GridEditor::Idle => None,
            GridEditor::Dragging { day, block } | GridEditor::Resizing { day, block, .. } => {
                Some((day, block))
            }
        };
        *self = GridEditor::Idle;
        released
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, GridEditor::Idle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::{AvailabilitySet, Granularity};
    use crate::week::week_start;
    use chrono::{TimeZone, Utc};

    // ── snapping tests ──────────────────────────────────────────────────

    #[test]
    fn test_snap_hours_half_up() {
        assert_eq!(snap_hours(10.2), 10.0);
        assert_eq!(snap_hours(10.25), 10.5);
        assert_eq!(snap_hours(10.74), 10.5);
        assert_eq!(snap_hours(10.75), 11.0);
    }

    // ── Block tests ─────────────────────────────────────────────────────

    #[test]
    fn test_block_enforces_minimum() {
        let block = Block::new(10.0, 10.1);
        assert_eq!((block.start(), block.end()), (10.0, 10.5));
    }

    #[test]
    fn test_block_caps_at_four_hours() {
        let block = Block::new(8.0, 20.0);
        assert_eq!((block.start(), block.end()), (8.0, 12.0));
        assert!(block.hours() <= MAX_BLOCK_HOURS);
    }

    #[test]
    fn test_block_from_click_is_one_hour() {
        let block = Block::from_click(18.3);
        assert_eq!((block.start(), block.end()), (18.5, 19.5));
    }

    #[test]
    fn test_block_from_click_clipped_at_end_of_day() {
        let block = Block::from_click(23.6);
        assert_eq!((block.start(), block.end()), (23.5, 24.0));

        let block = Block::from_click(23.9);
        assert_eq!((block.start(), block.end()), (23.5, 24.0));
    }

    #[test]
    fn test_block_label() {
        assert_eq!(Block::new(9.0, 10.5).label(), "09:00 - 10:30");
        assert_eq!(Block::new(23.5, 24.0).label(), "23:30 - 24:00");
    }

    #[test]
    fn test_block_to_interval() {
        let monday = week_start(Utc.with_ymd_and_hms(2026, 3, 18, 8, 0, 0).unwrap(), Tz::UTC)
            .unwrap();
        let interval = Block::new(18.0, 20.5).to_interval(monday, 4).unwrap();
        assert_eq!(
            interval.start(),
            Utc.with_ymd_and_hms(2026, 3, 20, 18, 0, 0).unwrap()
        );
        assert_eq!(
            interval.end(),
            Utc.with_ymd_and_hms(2026, 3, 20, 20, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_block_survives_normalization_off_utc_grid() {
        let tz = Tz::Asia__Kathmandu;
        let monday = week_start(Utc.with_ymd_and_hms(2026, 3, 18, 8, 0, 0).unwrap(), tz).unwrap();
        let built = Block::new(20.0, 22.0).to_interval(monday, 0).unwrap();

        let stored = AvailabilitySet::new(&[built], Granularity::default(), tz);
        assert_eq!(stored.intervals(), &[built]);
        assert_eq!(built.start(), Utc.with_ymd_and_hms(2026, 3, 16, 14, 15, 0).unwrap());
    }

    #[test]
    fn test_block_to_interval_rejects_bad_day() {
        let monday = week_start(Utc.with_ymd_and_hms(2026, 3, 18, 8, 0, 0).unwrap(), Tz::UTC)
            .unwrap();
        assert!(Block::new(9.0, 10.0).to_interval(monday, 9).is_err());
    }

    // ── GridEditor tests ────────────────────────────────────────────────

    #[test]
    fn test_move_while_idle_is_noop() {
        let mut editor = GridEditor::new();
        assert_eq!(editor.move_to(12.0), None);
        assert_eq!(editor.release(), None);
        assert!(editor.is_idle());
    }

    #[test]
    fn test_drag_keeps_height() {
        let mut editor = GridEditor::new();
        editor.press_body(2, Block::new(9.0, 11.0));

        let moved = editor.move_to(14.2).unwrap();
        assert_eq!((moved.start(), moved.end()), (14.0, 16.0));

        assert_eq!(editor.release(), Some((2, moved)));
        assert!(editor.is_idle());
    }

    #[test]
    fn test_drag_clamps_to_end_of_day() {
        let mut editor = GridEditor::new();
        editor.press_body(0, Block::new(9.0, 11.0));
        let moved = editor.move_to(23.5).unwrap();
        assert_eq!((moved.start(), moved.end()), (22.0, 24.0));
    }

    #[test]
    fn test_resize_top_keeps_minimum() {
        let mut editor = GridEditor::new();
        editor.press_handle(0, Block::new(9.0, 11.0), Edge::Top);

        let resized = editor.move_to(12.0).unwrap();
        assert_eq!((resized.start(), resized.end()), (10.5, 11.0));

        let resized = editor.move_to(7.0).unwrap();
        assert_eq!((resized.start(), resized.end()), (7.0, 11.0));
    }

    #[test]
    fn test_resize_bottom_caps_at_four_hours() {
        let mut editor = GridEditor::new();
        editor.press_handle(1, Block::new(18.0, 19.0), Edge::Bottom);
        let resized = editor.move_to(23.5).unwrap();
        assert_eq!((resized.start(), resized.end()), (18.0, 22.0));
    }

    #[test]
    fn test_resize_bottom_keeps_minimum() {
        let mut editor = GridEditor::new();
        editor.press_handle(1, Block::new(18.0, 20.0), Edge::Bottom);
        let resized = editor.move_to(17.0).unwrap();
        assert_eq!((resized.start(), resized.end()), (18.0, 18.5));
    }

    #[test]
    fn test_resize_top_long_block_is_capped_by_settle() {
        let mut editor = GridEditor::new();
        editor.press_handle(3, Block::new(12.0, 16.0), Edge::Top);
        let resized = editor.move_to(8.0).unwrap();
        assert_eq!((resized.start(), resized.end()), (8.0, 12.0));
    }

    #[test]
    fn test_press_ignored_while_busy() {
        let mut editor = GridEditor::new();
        editor.press_body(0, Block::new(9.0, 10.0));
        editor.press_handle(5, Block::new(18.0, 19.0), Edge::Bottom);
        assert!(matches!(editor, GridEditor::Dragging { day: 0, .. }));
    }

    #[test]
    fn test_every_edit_respects_bounds() {
        let mut editor = GridEditor::new();
        for edge in [Edge::Top, Edge::Bottom] {
            editor.press_handle(0, Block::new(10.0, 12.0), edge);
            for step in 0..=48 {
                let block = editor.move_to(f64::from(step) * 0.5).unwrap();
                assert!(block.hours() >= MIN_BLOCK_HOURS, "{block:?}");
                assert!(block.hours() <= MAX_BLOCK_HOURS, "{block:?}");
                assert!(block.start() >= 0.0, "{block:?}");
            }
            editor.release();
        }
    }
}
