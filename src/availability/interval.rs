//! Half-open minute intervals within a single day.
//!
//! Everything here is defensive by construction: an interval with
//! `start >= end` is empty and simply disappears from results.

use serde::{Deserialize, Serialize};

/// A half-open range `[start, end)` of minutes since midnight
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Interval {
    pub start: u32,
    pub end: u32,
}

impl Interval {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Whether the interval covers no time
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Length in minutes, zero for degenerate intervals
    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Whether a half-open interval contains a (possibly fractional) point
    pub fn contains_point(&self, point: f64) -> bool {
        f64::from(self.start) <= point && point < f64::from(self.end)
    }

    /// Restrict to `[lo, hi)`, `None` when nothing is left
    pub fn clip(&self, lo: u32, hi: u32) -> Option<Interval> {
        let clipped = Interval::new(self.start.max(lo), self.end.min(hi));
        (!clipped.is_empty()).then_some(clipped)
    }
}

/// Occupancy state of a run of time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentState {
    Unavailable,
    Available,
    Busy,
}

/// A maximal run of one state within the work window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub start: u32,
    pub end: u32,
    pub state: SegmentState,
}

/// Remove every `cut` from `base`.
///
/// The result is disjoint when `base` is, but carries no ordering
/// guarantee. Cut order does not change the covered time.
pub fn subtract_intervals(base: &[Interval], cuts: &[Interval]) -> Vec<Interval> {
    let mut remaining: Vec<Interval> = base.iter().copied().filter(|i| !i.is_empty()).collect();

    for cut in cuts.iter().filter(|c| !c.is_empty()) {
        let mut next = Vec::with_capacity(remaining.len() + 1);
        for interval in remaining {
            if !interval.overlaps(cut) {
                next.push(interval);
                continue;
            }
            // Left remainder
            if interval.start < cut.start {
                next.push(Interval::new(interval.start, cut.start));
            }
            // Right remainder
            if cut.end < interval.end {
                next.push(Interval::new(cut.end, interval.end));
            }
        }
        remaining = next;
    }

    remaining
}

/// Split `[work_start, work_end)` into contiguous segments.
///
/// A point covered by `busy` is busy even when it is also available.
/// Adjacent segments never share a state.
pub fn build_day_segments(
    available: &[Interval],
    busy: &[Interval],
    work_start: u32,
    work_end: u32,
) -> Vec<Segment> {
    if work_start >= work_end {
        return Vec::new();
    }

    let available: Vec<Interval> = available
        .iter()
        .filter_map(|i| i.clip(work_start, work_end))
        .collect();
    let busy: Vec<Interval> = busy
        .iter()
        .filter_map(|i| i.clip(work_start, work_end))
        .collect();

    let mut points = vec![work_start, work_end];
    for interval in available.iter().chain(busy.iter()) {
        points.push(interval.start);
        points.push(interval.end);
    }
    points.sort_unstable();
    points.dedup();

    let mut segments: Vec<Segment> = Vec::new();
    for pair in points.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        if start >= end {
            continue;
        }

        let mid = (f64::from(start) + f64::from(end)) / 2.0;
        let state = if busy.iter().any(|i| i.contains_point(mid)) {
            SegmentState::Busy
        } else if available.iter().any(|i| i.contains_point(mid)) {
            SegmentState::Available
        } else {
            SegmentState::Unavailable
        };

        match segments.last_mut() {
            Some(last) if last.state == state && last.end == start => last.end = end,
            _ => segments.push(Segment { start, end, state }),
        }
    }

    segments
}

/// Union of possibly overlapping intervals, sorted by start.
///
/// Touching intervals are joined.
pub fn merge_intervals(intervals: &[Interval]) -> Vec<Interval> {
    let mut sorted: Vec<Interval> = intervals.iter().copied().filter(|i| !i.is_empty()).collect();
    sorted.sort_unstable();

    let mut merged: Vec<Interval> = Vec::with_capacity(sorted.len());
    for interval in sorted {
        match merged.last_mut() {
            Some(last) if interval.start <= last.end => last.end = last.end.max(interval.end),
            _ => merged.push(interval),
        }
    }
    merged
}
