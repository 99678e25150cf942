use super::grid::{grid_to_slots, slots_to_grid, AvailabilityGrid, CELLS_PER_DAY};
use super::history::History;
use super::presets::Preset;
use crate::availability::models::{AvailabilitySlot, ReplaceAvailabilityRequest};
use crate::utils::time::DAYS_PER_WEEK;

/// Whether a drag switches cells on or off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintMode {
    Paint,
    Erase,
}

impl PaintMode {
    fn value(self) -> bool {
        self == PaintMode::Paint
    }
}

/// Maps pointer coordinates to a `(day, cell)` pair.
///
/// Supplied by the rendering layer and consulted on every move event, so
/// fast drags always hit the cell currently under the pointer.
pub trait CellLocator {
    fn locate(&self, x: f64, y: f64) -> Option<(u8, usize)>;
}

/// Locator for a grid drawn as equally sized cells, one row per weekday
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformCellLocator {
    pub origin_x: f64,
    pub origin_y: f64,
    pub cell_width: f64,
    pub cell_height: f64,
}

impl CellLocator for UniformCellLocator {
    fn locate(&self, x: f64, y: f64) -> Option<(u8, usize)> {
        if self.cell_width <= 0.0 || self.cell_height <= 0.0 {
            return None;
        }
        let column = ((x - self.origin_x) / self.cell_width).floor();
        let row = ((y - self.origin_y) / self.cell_height).floor();
        if column < 0.0 || row < 0.0 {
            return None;
        }
        let (column, row) = (column as usize, row as usize);
        (column < CELLS_PER_DAY && row < usize::from(DAYS_PER_WEEK)).then_some((row as u8, column))
    }
}

#[derive(Debug, Clone)]
struct Drag {
    mode: PaintMode,
}

/// Interactive state of the weekly availability editor
#[derive(Debug, Clone)]
pub struct AvailabilityEditor {
    grid: AvailabilityGrid,
    history: History<AvailabilityGrid>,
    /// Last loaded or saved grid
    saved: AvailabilityGrid,
    selected_day: Option<u8>,
    drag: Option<Drag>,
    copy_source: Option<u8>,
}

impl Default for AvailabilityEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl AvailabilityEditor {
    /// Editor over an empty grid
    pub fn new() -> Self {
        Self::from_grid(AvailabilityGrid::new())
    }

    /// Editor over the teacher's stored recurring slots
    pub fn from_slots(slots: &[AvailabilitySlot]) -> Self {
        Self::from_grid(slots_to_grid(slots))
    }

    fn from_grid(grid: AvailabilityGrid) -> Self {
        Self {
            history: History::new(grid.clone()),
            saved: grid.clone(),
            grid,
            selected_day: None,
            drag: None,
            copy_source: None,
        }
    }

    /// Replace the grid with stored slots, dropping history and selections
    pub fn load(&mut self, slots: &[AvailabilitySlot]) {
        *self = Self::from_slots(slots);
    }

    pub fn grid(&self) -> &AvailabilityGrid {
        &self.grid
    }

    /// Current grid as a slot list
    pub fn slots(&self) -> Vec<AvailabilitySlot> {
        grid_to_slots(&self.grid)
    }

    /// Select one day as the target of presets and clear, `None` for all days
    pub fn select_day(&mut self, day: Option<u8>) {
        self.selected_day = day.filter(|d| *d < DAYS_PER_WEEK);
    }

    pub fn selected_day(&self) -> Option<u8> {
        self.selected_day
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Toggle a cell and start a drag in the resulting mode
    pub fn pointer_down(&mut self, day: u8, cell: usize) {
        if day >= DAYS_PER_WEEK || cell >= CELLS_PER_DAY {
            return;
        }
        if self.drag.is_some() {
            self.pointer_up();
        }

        let value = !self.grid.get(day, cell);
        self.grid.set(day, cell, value);
        self.drag = Some(Drag {
            mode: if value { PaintMode::Paint } else { PaintMode::Erase },
        });
    }

    /// Apply the drag's mode to a cell the pointer entered
    pub fn pointer_enter(&mut self, day: u8, cell: usize) {
        if let Some(drag) = &self.drag {
            let value = drag.mode.value();
            self.grid.set(day, cell, value);
        }
    }

    /// Resolve pointer coordinates and treat the hit cell as entered
    pub fn pointer_move(&mut self, locator: &impl CellLocator, x: f64, y: f64) {
        if self.drag.is_none() {
            return;
        }
        if let Some((day, cell)) = locator.locate(x, y) {
            self.pointer_enter(day, cell);
        }
    }

    /// End the drag; the whole gesture becomes one undo step
    pub fn pointer_up(&mut self) {
        if self.drag.take().is_some() {
            self.commit();
        }
    }

    /// Overwrite the target day(s) with a preset row
    pub fn apply_preset(&mut self, preset: Preset) {
        self.finish_drag();
        let row = preset.row();
        for day in self.target_days() {
            self.grid.set_day(day, row);
        }
        self.commit();
    }

    /// Switch every cell of the target day(s) off
    pub fn clear(&mut self) {
        self.finish_drag();
        for day in self.target_days() {
            self.grid.fill(day, 0..CELLS_PER_DAY, false);
        }
        self.commit();
    }

    /// First step of copy-day: pick the source row
    pub fn begin_copy(&mut self, source: u8) {
        self.copy_source = (source < DAYS_PER_WEEK).then_some(source);
    }

    pub fn copy_source(&self) -> Option<u8> {
        self.copy_source
    }

    pub fn cancel_copy(&mut self) {
        self.copy_source = None;
    }

    /// Second step of copy-day: overwrite each destination with the source row.
    ///
    /// Returns `false` when no source was picked.
    pub fn copy_to(&mut self, destinations: &[u8]) -> bool {
        let Some(source) = self.copy_source.take() else {
            return false;
        };
        let Some(row) = self.grid.day(source).copied() else {
            return false;
        };

        self.finish_drag();
        for &day in destinations {
            self.grid.set_day(day, row);
        }
        self.commit();
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) -> bool {
        self.finish_drag();
        match self.history.undo() {
            Some(grid) => {
                self.grid = grid.clone();
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        self.finish_drag();
        match self.history.redo() {
            Some(grid) => {
                self.grid = grid.clone();
                true
            }
            None => false,
        }
    }

    /// Whether the grid differs from the last load or save
    pub fn is_dirty(&self) -> bool {
        self.grid != self.saved
    }

    /// Full-replacement payload for the current grid
    pub fn save_request(&self) -> ReplaceAvailabilityRequest {
        ReplaceAvailabilityRequest {
            slots: self.slots(),
        }
    }

    /// Record that the current grid has been persisted
    pub fn mark_saved(&mut self) {
        self.saved = self.grid.clone();
    }

    fn target_days(&self) -> Vec<u8> {
        match self.selected_day {
            Some(day) => vec![day],
            None => (0..DAYS_PER_WEEK).collect(),
        }
    }

    fn finish_drag(&mut self) {
        if self.drag.is_some() {
            self.pointer_up();
        }
    }

    /// Push the grid onto the history unless nothing changed
    fn commit(&mut self) {
        if &self.grid != self.history.current() {
            self.history.push(self.grid.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paint_drag_is_one_undo_step() {
        let mut editor = AvailabilityEditor::new();

        editor.pointer_down(0, 4);
        editor.pointer_enter(0, 5);
        editor.pointer_enter(0, 6);
        editor.pointer_up();

        assert_eq!(editor.slots(), vec![AvailabilitySlot::new(0, "09:00", "10:30")]);
        assert!(editor.is_dirty());

        assert!(editor.undo());
        assert!(editor.grid().is_empty());
        assert!(!editor.can_undo());

        assert!(editor.redo());
        assert_eq!(editor.slots(), vec![AvailabilitySlot::new(0, "09:00", "10:30")]);
    }

    #[test]
    fn test_erase_drag_follows_first_cell() {
        let mut editor = AvailabilityEditor::from_slots(&[AvailabilitySlot::new(1, "09:00", "12:00")]);

        // First cell was on, so the gesture erases, even across cells that are already off
        editor.pointer_down(1, 5);
        editor.pointer_enter(1, 6);
        editor.pointer_enter(1, 12);
        editor.pointer_up();

        assert_eq!(
            editor.slots(),
            vec![
                AvailabilitySlot::new(1, "09:00", "09:30"),
                AvailabilitySlot::new(1, "10:30", "12:00"),
            ]
        );
    }

    #[test]
    fn test_enter_without_drag_is_ignored() {
        let mut editor = AvailabilityEditor::new();
        editor.pointer_enter(0, 0);
        editor.pointer_up();
        assert!(editor.grid().is_empty());
        assert!(!editor.can_undo());
    }

    #[test]
    fn test_pointer_move_uses_locator() {
        let locator = UniformCellLocator {
            origin_x: 100.0,
            origin_y: 50.0,
            cell_width: 20.0,
            cell_height: 30.0,
        };
        assert_eq!(locator.locate(99.0, 60.0), None);
        assert_eq!(locator.locate(100.0, 50.0), Some((0, 0)));
        assert_eq!(locator.locate(145.0, 115.0), Some((2, 2)));
        assert_eq!(locator.locate(100.0 + 20.0 * 30.0, 60.0), None);

        let mut editor = AvailabilityEditor::new();
        editor.pointer_down(2, 0);
        editor.pointer_move(&locator, 125.0, 110.0); // (2, 1)
        editor.pointer_move(&locator, 145.0, 110.0); // (2, 2)
        editor.pointer_move(&locator, 0.0, 0.0); // off grid
        editor.pointer_up();

        assert_eq!(editor.slots(), vec![AvailabilitySlot::new(2, "07:00", "08:30")]);
    }

    #[test]
    fn test_preset_on_selected_day_overwrites_row() {
        let mut editor = AvailabilityEditor::from_slots(&[
            AvailabilitySlot::new(3, "18:00", "20:00"),
            AvailabilitySlot::new(4, "18:00", "20:00"),
        ]);
        editor.select_day(Some(3));
        editor.apply_preset(Preset::Morning);

        assert_eq!(
            editor.slots(),
            vec![
                AvailabilitySlot::new(3, "07:00", "12:00"),
                AvailabilitySlot::new(4, "18:00", "20:00"),
            ]
        );
    }

    #[test]
    fn test_preset_without_selection_hits_all_days() {
        let mut editor = AvailabilityEditor::new();
        editor.select_day(Some(9)); // out of range means no selection
        assert_eq!(editor.selected_day(), None);

        editor.apply_preset(Preset::Afternoon);
        let slots = editor.slots();
        assert_eq!(slots.len(), 7);
        assert!(slots.iter().all(|s| s.start_time == "12:00" && s.end_time == "17:00"));
    }

    #[test]
    fn test_clear_and_undo() {
        let mut editor = AvailabilityEditor::new();
        editor.apply_preset(Preset::FullDay);
        editor.select_day(Some(0));
        editor.clear();

        assert_eq!(editor.slots().len(), 6);
        assert!(editor.slots().iter().all(|s| s.day_of_week != 0));

        assert!(editor.undo());
        assert_eq!(editor.slots().len(), 7);
        assert!(editor.undo());
        assert!(editor.grid().is_empty());
    }

    #[test]
    fn test_copy_day_overwrites_destinations() {
        let mut editor = AvailabilityEditor::from_slots(&[
            AvailabilitySlot::new(0, "09:00", "11:00"),
            AvailabilitySlot::new(2, "15:00", "16:00"),
        ]);

        // No source picked yet
        assert!(!editor.copy_to(&[1]));

        editor.begin_copy(0);
        assert_eq!(editor.copy_source(), Some(0));
        assert!(editor.copy_to(&[1, 2]));
        assert_eq!(editor.copy_source(), None);

        assert_eq!(
            editor.slots(),
            vec![
                AvailabilitySlot::new(0, "09:00", "11:00"),
                AvailabilitySlot::new(1, "09:00", "11:00"),
                AvailabilitySlot::new(2, "09:00", "11:00"),
            ]
        );

        assert!(editor.undo());
        assert_eq!(editor.slots().len(), 2);
    }

    #[test]
    fn test_new_action_after_undo_drops_redo() {
        let mut editor = AvailabilityEditor::new();
        editor.apply_preset(Preset::Morning);
        editor.apply_preset(Preset::Evening);
        assert!(editor.undo());
        assert!(editor.can_redo());

        editor.clear();
        assert!(!editor.can_redo());
        assert!(editor.undo());
        assert!(editor.slots().iter().all(|s| s.start_time == "07:00" && s.end_time == "12:00"));
    }

    #[test]
    fn test_no_op_actions_not_recorded() {
        let mut editor = AvailabilityEditor::new();
        editor.clear();
        assert!(!editor.can_undo());
    }

    #[test]
    fn test_save_cycle() {
        let mut editor = AvailabilityEditor::new();
        assert!(!editor.is_dirty());

        editor.pointer_down(5, 0);
        editor.pointer_up();
        let request = editor.save_request();
        assert_eq!(request.slots, vec![AvailabilitySlot::new(5, "07:00", "07:30")]);

        editor.mark_saved();
        assert!(!editor.is_dirty());

        editor.load(&[]);
        assert!(editor.grid().is_empty());
        assert!(!editor.can_undo());
    }
}
