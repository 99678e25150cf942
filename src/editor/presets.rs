use super::grid::{DayCells, CELLS_PER_DAY};
use crate::error::{validation_error, Error};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::str::FromStr;

/// Named time-of-day templates for a whole weekday row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// 07:00-12:00
    Morning,
    /// 12:00-17:00
    Afternoon,
    /// 17:00-22:00
    Evening,
    /// 07:00-22:00
    FullDay,
}

impl Preset {
    pub const ALL: [Preset; 4] = [
        Preset::Morning,
        Preset::Afternoon,
        Preset::Evening,
        Preset::FullDay,
    ];

    /// Cells switched on by this preset
    pub fn cells(&self) -> Range<usize> {
        match self {
            Preset::Morning => 0..10,
            Preset::Afternoon => 10..20,
            Preset::Evening => 20..CELLS_PER_DAY,
            Preset::FullDay => 0..CELLS_PER_DAY,
        }
    }

    /// The full row a preset leaves behind: its range on, everything else off
    pub fn row(&self) -> DayCells {
        let mut row = [false; CELLS_PER_DAY];
        for cell in self.cells() {
            row[cell] = true;
        }
        row
    }

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Morning => "morning",
            Preset::Afternoon => "afternoon",
            Preset::Evening => "evening",
            Preset::FullDay => "full_day",
        }
    }
}

impl FromStr for Preset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|preset| preset.name() == s)
            .ok_or_else(|| validation_error(&format!("Unknown preset: {}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_rows() {
        let morning = Preset::Morning.row();
        assert!(morning[..10].iter().all(|c| *c));
        assert!(morning[10..].iter().all(|c| !c));

        let full = Preset::FullDay.row();
        assert!(full.iter().all(|c| *c));

        // Partial presets tile the day without overlap
        let covered: usize = [Preset::Morning, Preset::Afternoon, Preset::Evening]
            .iter()
            .map(|p| p.cells().len())
            .sum();
        assert_eq!(covered, CELLS_PER_DAY);
    }

    #[test]
    fn test_preset_names() {
        for preset in Preset::ALL {
            assert_eq!(preset.name().parse::<Preset>().unwrap(), preset);
        }
        assert!("brunch".parse::<Preset>().is_err());
    }
}
