//! Risk assessment: deadline pressure, burnout, and a hard subject mix.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{StudySession, Subject};
use crate::time;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskKind {
    DeadlinePressure,
    BurnoutRisk,
    TopicDifficulty,
}

impl RiskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskKind::DeadlinePressure => "deadline_pressure",
            RiskKind::BurnoutRisk => "burnout_risk",
            RiskKind::TopicDifficulty => "topic_difficulty",
        }
    }
}

impl std::fmt::Display for RiskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskFactor {
    pub kind: RiskKind,
    /// 1 to 5
    pub severity: u8,
    pub probability: f64,
    pub affected_subject_ids: Vec<String>,
    pub description: String,
    pub mitigation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub overall_risk: RiskLevel,
    pub factors: Vec<RiskFactor>,
}

impl RiskAssessment {
    pub fn factor(&self, kind: RiskKind) -> Option<&RiskFactor> {
        self.factors.iter().find(|f| f.kind == kind)
    }
}

/// Thresholds for the risk heuristics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RiskConfig {
    /// Deadlines this close count as urgent
    pub urgent_days: i64,
    /// Urgent subjects below this progress are under pressure
    pub min_progress: f64,
    pub burnout_window_days: i64,
    /// Average daily hours above this signal burnout
    pub burnout_daily_hours: f64,
    pub burnout_severity: u8,
    pub burnout_probability: f64,
    /// Share of hard subjects above which difficulty is a risk
    pub hard_subject_share: f64,
    /// Share at which the difficulty risk becomes more severe
    pub severe_hard_subject_share: f64,
    pub hard_difficulty: u8,
    pub high_mean_severity: f64,
    pub medium_mean_severity: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            urgent_days: 7,
            min_progress: 0.8,
            burnout_window_days: 7,
            burnout_daily_hours: 8.0,
            burnout_severity: 3,
            burnout_probability: 0.7,
            hard_subject_share: 0.6,
            severe_hard_subject_share: 0.8,
            hard_difficulty: 4,
            high_mean_severity: 4.0,
            medium_mean_severity: 2.5,
        }
    }
}

/// Flag deadline pressure, burnout, and difficulty risks and rate the overall level.
///
/// The overall level is high when the mean severity is 4 or more, medium at
/// 2.5 or more, and low otherwise (including when nothing is flagged).
pub fn assess_risk(
    config: &RiskConfig,
    subjects: &[Subject],
    sessions: &[StudySession],
    now: DateTime<Utc>,
) -> RiskAssessment {
    let mut factors = Vec::new();

    let pressured: Vec<&Subject> = subjects
        .iter()
        .filter(|s| {
            s.estimated_hours > 0.0
                && time::days_until(s.deadline, now) <= config.urgent_days
                && s.progress() < config.min_progress
        })
        .collect();
    if !pressured.is_empty() {
        let count = pressured.len();
        factors.push(RiskFactor {
            kind: RiskKind::DeadlinePressure,
            severity: (2 + count).min(5) as u8,
            probability: (0.5 + 0.1 * count as f64).min(0.95),
            affected_subject_ids: pressured.iter().map(|s| s.id.clone()).collect(),
            description: format!(
                "{} subject(s) due within {} days are less than {:.0}% complete",
                count,
                config.urgent_days,
                config.min_progress * 100.0
            ),
            mitigation: "Focus on the nearest deadlines first and trim lower-priority topics".to_string(),
        });
    }

    let window = config.burnout_window_days.max(1);
    let cutoff = now - Duration::days(window);
    let recent: Vec<&StudySession> = sessions
        .iter()
        .filter(|s| s.start_time > cutoff && s.start_time <= now)
        .collect();
    let daily_average = recent.iter().map(|s| s.hours()).sum::<f64>() / window as f64;
    if daily_average > config.burnout_daily_hours {
        let mut affected: Vec<String> = recent.iter().map(|s| s.subject_id.clone()).collect();
        affected.sort();
        affected.dedup();
        factors.push(RiskFactor {
            kind: RiskKind::BurnoutRisk,
            severity: config.burnout_severity,
            probability: config.burnout_probability,
            affected_subject_ids: affected,
            description: format!(
                "Averaging {:.1} hours of study per day over the last {} days",
                daily_average, window
            ),
            mitigation: "Cap study at 6-7 hours per day and keep one lighter day each week".to_string(),
        });
    }

    if !subjects.is_empty() {
        let hard: Vec<&Subject> = subjects
            .iter()
            .filter(|s| s.difficulty_clamped() >= config.hard_difficulty)
            .collect();
        let share = hard.len() as f64 / subjects.len() as f64;
        if share > config.hard_subject_share {
            factors.push(RiskFactor {
                kind: RiskKind::TopicDifficulty,
                severity: if share > config.severe_hard_subject_share { 4 } else { 3 },
                probability: share,
                affected_subject_ids: hard.iter().map(|s| s.id.clone()).collect(),
                description: format!("{:.0}% of subjects are rated difficult", share * 100.0),
                mitigation: "Alternate hard subjects with lighter ones and schedule them in peak hours"
                    .to_string(),
            });
        }
    }

    let overall_risk = if factors.is_empty() {
        RiskLevel::Low
    } else {
        let mean = factors.iter().map(|f| f.severity as f64).sum::<f64>() / factors.len() as f64;
        if mean >= config.high_mean_severity {
            RiskLevel::High
        } else if mean >= config.medium_mean_severity {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    };

    if overall_risk == RiskLevel::High {
        tracing::warn!("High study risk: {} factor(s) flagged", factors.len());
    }

    RiskAssessment { overall_risk, factors }
}
