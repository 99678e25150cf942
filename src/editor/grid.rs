use crate::availability::models::AvailabilitySlot;
use crate::availability::{WORK_DAY_END, WORK_DAY_START};
use crate::utils::time::{format_minutes, parse_minutes, DAYS_PER_WEEK};
use std::ops::Range;

/// Length of one editor cell in minutes
pub const CELL_MINUTES: u32 = 30;

/// Half-hour cells between 07:00 and 22:00
pub const CELLS_PER_DAY: usize = ((WORK_DAY_END - WORK_DAY_START) / CELL_MINUTES) as usize;

/// One weekday row of the grid
pub type DayCells = [bool; CELLS_PER_DAY];

/// 7×30 availability grid, rows Saturday-first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailabilityGrid {
    days: [DayCells; DAYS_PER_WEEK as usize],
}

impl AvailabilityGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cell value, `false` outside the grid
    pub fn get(&self, day: u8, cell: usize) -> bool {
        self.days
            .get(usize::from(day))
            .and_then(|row| row.get(cell))
            .copied()
            .unwrap_or(false)
    }

    /// Set a cell, returning whether it changed
    pub fn set(&mut self, day: u8, cell: usize, value: bool) -> bool {
        match self
            .days
            .get_mut(usize::from(day))
            .and_then(|row| row.get_mut(cell))
        {
            Some(slot) if *slot != value => {
                *slot = value;
                true
            }
            _ => false,
        }
    }

    pub fn day(&self, day: u8) -> Option<&DayCells> {
        self.days.get(usize::from(day))
    }

    /// Overwrite a whole row
    pub fn set_day(&mut self, day: u8, cells: DayCells) {
        if let Some(row) = self.days.get_mut(usize::from(day)) {
            *row = cells;
        }
    }

    /// Set every cell of `range` in a row to `value`
    pub fn fill(&mut self, day: u8, range: Range<usize>, value: bool) {
        if let Some(row) = self.days.get_mut(usize::from(day)) {
            let end = range.end.min(CELLS_PER_DAY);
            for cell in range.start.min(end)..end {
                row[cell] = value;
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.days.iter().flatten().all(|cell| !cell)
    }

    /// Number of available cells across the week
    #[cfg(test)]
    fn available_cells(&self) -> usize {
        self.days.iter().flatten().filter(|cell| **cell).count()
    }
}

/// Wall-clock minute at which a cell boundary sits
pub fn cell_boundary(cell: usize) -> u32 {
    WORK_DAY_START + cell as u32 * CELL_MINUTES
}

/// Cell containing a minute of the day, clamped to `0..=CELLS_PER_DAY`
fn cell_floor(minutes: u32) -> usize {
    let offset = minutes.saturating_sub(WORK_DAY_START) / CELL_MINUTES;
    (offset as usize).min(CELLS_PER_DAY)
}

/// One slot per maximal run of available cells, day by day
pub fn grid_to_slots(grid: &AvailabilityGrid) -> Vec<AvailabilitySlot> {
    let mut slots = Vec::new();

    for (day, row) in grid.days.iter().enumerate() {
        let mut run_start: Option<usize> = None;
        for cell in 0..=CELLS_PER_DAY {
            let available = cell < CELLS_PER_DAY && row[cell];
            match (available, run_start) {
                (true, None) => run_start = Some(cell),
                (false, Some(start)) => {
                    slots.push(AvailabilitySlot::new(
                        day as u8,
                        format_minutes(cell_boundary(start)),
                        format_minutes(cell_boundary(cell)),
                    ));
                    run_start = None;
                }
                _ => {}
            }
        }
    }

    slots
}

/// Mark every cell covered by a slot.
///
/// Both boundaries are floored to the cell grid, so slots that are not
/// aligned to half hours are coarsened: `09:10-10:05` becomes `09:00-10:00`.
/// Slots with an invalid weekday or unparseable times are ignored.
pub fn slots_to_grid(slots: &[AvailabilitySlot]) -> AvailabilityGrid {
    let mut grid = AvailabilityGrid::new();

    for slot in slots {
        if slot.day_of_week >= DAYS_PER_WEEK {
            continue;
        }
        let (Some(start), Some(end)) = (parse_minutes(&slot.start_time), parse_minutes(&slot.end_time))
        else {
            continue;
        };
        grid.fill(slot.day_of_week, cell_floor(start)..cell_floor(end), true);
    }

    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_grid_dimensions() {
        assert_eq!(CELLS_PER_DAY, 30);
        assert_eq!(cell_boundary(0), 7 * 60);
        assert_eq!(cell_boundary(CELLS_PER_DAY), 22 * 60);
    }

    #[test]
    fn test_grid_to_slots_runs() {
        let mut grid = AvailabilityGrid::new();
        grid.fill(0, 4..10, true); // 09:00-12:00
        grid.fill(0, 12..14, true); // 13:00-14:00
        grid.fill(6, 28..30, true); // runs to the end of the grid

        assert_eq!(
            grid_to_slots(&grid),
            vec![
                AvailabilitySlot::new(0, "09:00", "12:00"),
                AvailabilitySlot::new(0, "13:00", "14:00"),
                AvailabilitySlot::new(6, "21:00", "22:00"),
            ]
        );
        assert!(grid_to_slots(&AvailabilityGrid::new()).is_empty());
    }

    #[test]
    fn test_aligned_round_trip() {
        let slots = vec![
            AvailabilitySlot::new(2, "10:00", "12:00"),
            AvailabilitySlot::new(0, "07:00", "09:30"),
            AvailabilitySlot::new(0, "09:00", "11:00"), // overlaps the previous one
            AvailabilitySlot::new(5, "20:00", "22:00"),
        ];

        let round_trip: HashSet<AvailabilitySlot> = grid_to_slots(&slots_to_grid(&slots)).into_iter().collect();
        let expected: HashSet<AvailabilitySlot> = [
            AvailabilitySlot::new(0, "07:00", "11:00"),
            AvailabilitySlot::new(2, "10:00", "12:00"),
            AvailabilitySlot::new(5, "20:00", "22:00"),
        ]
        .into_iter()
        .collect();
        assert_eq!(round_trip, expected);
    }

    #[test]
    fn test_unaligned_slots_are_floored() {
        let grid = slots_to_grid(&[AvailabilitySlot::new(1, "09:10", "10:05")]);
        assert_eq!(grid_to_slots(&grid), vec![AvailabilitySlot::new(1, "09:00", "10:00")]);

        // Shorter than a cell after flooring: nothing survives
        let grid = slots_to_grid(&[AvailabilitySlot::new(1, "09:05", "09:25")]);
        assert!(grid.is_empty());
    }

    #[test]
    fn test_slots_outside_window_clamped() {
        let grid = slots_to_grid(&[
            AvailabilitySlot::new(3, "05:00", "08:00"),
            AvailabilitySlot::new(3, "21:00", "23:30"),
            AvailabilitySlot::new(9, "09:00", "10:00"),
            AvailabilitySlot::new(3, "noon", "13:00"),
        ]);
        assert_eq!(
            grid_to_slots(&grid),
            vec![
                AvailabilitySlot::new(3, "07:00", "08:00"),
                AvailabilitySlot::new(3, "21:00", "22:00"),
            ]
        );
    }

    #[test]
    fn test_set_reports_change() {
        let mut grid = AvailabilityGrid::new();
        assert!(grid.set(0, 0, true));
        assert!(!grid.set(0, 0, true));
        assert!(!grid.set(7, 0, true));
        assert!(!grid.set(0, CELLS_PER_DAY, true));
        assert!(grid.get(0, 0));
        assert!(!grid.get(7, 0));
        assert_eq!(grid.available_cells(), 1);
    }
}
