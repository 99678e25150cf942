//! Teacher availability: interval algebra, the weekly schedule builder and
//! the free-slot finder, plus the service that feeds them from storage.

pub mod free_slots;
pub mod interval;
pub mod models;
mod service;
pub mod weekly;

pub use free_slots::find_free_slots;
pub use interval::{build_day_segments, subtract_intervals, Interval, Segment, SegmentState};
pub use service::AvailabilityService;
pub use weekly::build_weekly_schedule;

/// Start of the daily work window, minutes since midnight (07:00)
pub const WORK_DAY_START: u32 = 7 * 60;

/// End of the daily work window, minutes since midnight (22:00)
pub const WORK_DAY_END: u32 = 22 * 60;
