//! Cognitive-load ceilings by time of day.
//!
//! Later in the day the learner tolerates less mental load. The table is
//! plain data so callers can retune it through configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayPeriod {
    Morning,
    Afternoon,
    Evening,
}

impl DayPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            DayPeriod::Morning => "morning",
            DayPeriod::Afternoon => "afternoon",
            DayPeriod::Evening => "evening",
        }
    }
}

/// Load limits for one period. Hours are inclusive; a band whose start is
/// after its end wraps past midnight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadCeiling {
    pub period: DayPeriod,
    pub start_hour: usize,
    pub end_hour: usize,
    /// Highest cognitive load (1-5) that fits this period
    pub max_load: u8,
    /// Difficulty that suits this period best
    pub optimal_difficulty: u8,
}

impl LoadCeiling {
    pub fn contains(&self, hour: usize) -> bool {
        let hour = hour % 24;
        if self.start_hour <= self.end_hour {
            (self.start_hour..=self.end_hour).contains(&hour)
        } else {
            hour >= self.start_hour || hour <= self.end_hour
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CognitiveLoadTable {
    /// Checked in order; the first period containing the hour applies
    pub periods: Vec<LoadCeiling>,
}

impl Default for CognitiveLoadTable {
    fn default() -> Self {
        Self {
            periods: vec![
                LoadCeiling {
                    period: DayPeriod::Morning,
                    start_hour: 5,
                    end_hour: 11,
                    max_load: 5,
                    optimal_difficulty: 4,
                },
                LoadCeiling {
                    period: DayPeriod::Afternoon,
                    start_hour: 12,
                    end_hour: 16,
                    max_load: 4,
                    optimal_difficulty: 3,
                },
                LoadCeiling {
                    period: DayPeriod::Evening,
                    start_hour: 17,
                    end_hour: 4,
                    max_load: 3,
                    optimal_difficulty: 2,
                },
            ],
        }
    }
}

impl CognitiveLoadTable {
    pub fn ceiling_at(&self, hour: usize) -> Option<&LoadCeiling> {
        self.periods.iter().find(|c| c.contains(hour))
    }

    /// Highest load allowed at an hour; hours no period covers are unrestricted
    pub fn max_load_at(&self, hour: usize) -> u8 {
        self.ceiling_at(hour).map(|c| c.max_load).unwrap_or(5)
    }

    /// Difficulty best matched to an hour, if any period covers it
    pub fn optimal_difficulty_at(&self, hour: usize) -> Option<u8> {
        self.ceiling_at(hour).map(|c| c.optimal_difficulty.clamp(1, 5))
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }
}
