//! Descriptive performance metrics over the whole session history.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::velocity::hours_between;
use super::PerformancePredictor;
use crate::models::{average_effectiveness, StudySession, StudyTechnique, Subject};
use crate::time;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    pub total_study_hours: f64,
    pub session_count: usize,
    /// Mean self-reported effectiveness (1-5), 0 with no sessions
    pub average_effectiveness: f64,
    /// Completed over estimated hours across all subjects, in [0, 1]
    pub completion_rate: f64,
    /// Consecutive days with at least one session, ending today or yesterday
    pub study_streak_days: u32,
    pub hours_last_7_days: f64,
    /// Mean effectiveness per technique used
    pub technique_effectiveness: BTreeMap<StudyTechnique, f64>,
    /// Hour of day with the most effective minutes
    pub most_productive_hour: Option<usize>,
    pub total_interruptions: u64,
}

impl PerformancePredictor {
    pub fn compute_performance_metrics(
        &self,
        subjects: &[Subject],
        sessions: &[StudySession],
        now: DateTime<Utc>,
    ) -> PerformanceMetrics {
        let total_study_hours = sessions.iter().map(|s| s.hours()).sum();

        let estimated: f64 = subjects.iter().map(|s| s.estimated_hours.max(0.0)).sum();
        let completed: f64 = subjects
            .iter()
            .map(|s| s.completed_hours.max(0.0).min(s.estimated_hours.max(0.0)))
            .sum();
        let completion_rate = if estimated > 0.0 { (completed / estimated).clamp(0.0, 1.0) } else { 0.0 };

        let mut by_technique: BTreeMap<StudyTechnique, Vec<&StudySession>> = BTreeMap::new();
        for session in sessions {
            by_technique.entry(session.technique).or_default().push(session);
        }
        let technique_effectiveness = by_technique
            .into_iter()
            .filter_map(|(technique, group)| {
                average_effectiveness(group.into_iter()).map(|avg| (technique, avg))
            })
            .collect();

        let mut effective_minutes = [0.0f64; 24];
        for session in sessions {
            effective_minutes[time::hour_of(session.start_time)] +=
                session.duration as f64 * session.effectiveness_clamped() / 5.0;
        }
        let most_productive_hour = effective_minutes
            .iter()
            .enumerate()
            .filter(|(_, m)| **m > 0.0)
            .fold(None, |best: Option<(usize, f64)>, (hour, m)| match best {
                Some((_, top)) if top >= *m => best,
                _ => Some((hour, *m)),
            })
            .map(|(hour, _)| hour);

        PerformanceMetrics {
            total_study_hours,
            session_count: sessions.len(),
            average_effectiveness: average_effectiveness(sessions).unwrap_or(0.0),
            completion_rate,
            study_streak_days: study_streak(sessions, now),
            hours_last_7_days: hours_between(sessions, now - Duration::days(7), now),
            technique_effectiveness,
            most_productive_hour,
            total_interruptions: sessions.iter().map(|s| s.interruptions as u64).sum(),
        }
    }
}

/// Consecutive study days counting back from today, or from yesterday when
/// nothing has been logged yet today
fn study_streak(sessions: &[StudySession], now: DateTime<Utc>) -> u32 {
    let days: BTreeSet<NaiveDate> = sessions
        .iter()
        .filter(|s| s.start_time <= now)
        .map(|s| s.start_time.date_naive())
        .collect();

    let today = now.date_naive();
    let mut cursor = if days.contains(&today) {
        Some(today)
    } else {
        today.pred_opt()
    };

    let mut streak = 0;
    while let Some(day) = cursor.filter(|d| days.contains(d)) {
        streak += 1;
        cursor = day.pred_opt();
    }
    streak
}
