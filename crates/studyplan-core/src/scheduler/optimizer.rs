//! Greedy day packing and multi-day plan generation.

use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use super::tasks::StudyTask;
use super::{ScheduleConstraints, ScheduleOptimizer};
use crate::ids::{IdKind, IdProvider};
use crate::models::{StudySession, StudyTechnique, Subject, TimeBlock, UserPreferences};
use crate::productivity::ProductivityPattern;
use crate::time::{self, clock_time};

// ============================================================================
// TASK SCORING
// ============================================================================

/// Hard work in a sharp hour
const PEAK_MATCH_BONUS: f64 = 20.0;
/// Light work in a dull hour
const LOW_MATCH_BONUS: f64 = 15.0;
const PEAK_HOUR_THRESHOLD: f64 = 0.7;
const LOW_HOUR_THRESHOLD: f64 = 0.5;
const DEADLINE_CRITICAL_BONUS: f64 = 30.0;
const DEADLINE_NEAR_BONUS: f64 = 15.0;
const WITHIN_CEILING_BONUS: f64 = 10.0;
const OVER_CEILING_PENALTY: f64 = -15.0;
const FITS_BONUS: f64 = 10.0;
const SPILLS_PENALTY: f64 = -5.0;
const REVIEW_BONUS: f64 = 25.0;
const PRIORITY_STEP: f64 = 5.0;

// ============================================================================
// OUTPUT TYPES
// ============================================================================

/// A task allocated to a concrete slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledSession {
    pub id: String,
    pub task_id: String,
    pub subject_id: String,
    pub subject_name: String,
    pub topic_ids: Vec<String>,
    pub date: NaiveDate,
    #[serde(with = "clock_time")]
    pub start_time: NaiveTime,
    #[serde(with = "clock_time")]
    pub end_time: NaiveTime,
    pub duration_minutes: u32,
    pub technique: StudyTechnique,
    pub is_review: bool,
    pub difficulty: u8,
    pub cognitive_load: u8,
    /// Pattern productivity at the starting hour
    pub expected_productivity: f64,
}

/// Result of packing a single day
#[derive(Debug, Clone, PartialEq)]
pub struct DaySchedule {
    pub sessions: Vec<ScheduledSession>,
    /// Tasks with minutes left, in their original order
    pub remaining_tasks: Vec<StudyTask>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySchedule {
    pub date: NaiveDate,
    pub sessions: Vec<ScheduledSession>,
    pub planned_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MotivationFactors {
    /// Share of sessions starting in one of the learner's peak hours
    pub peak_hour_share: f64,
    /// Share of sessions that are reviews
    pub review_share: f64,
    pub subjects_covered: usize,
    /// Days with at least one session
    pub active_days: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdaptiveFactors {
    pub productivity_pattern: ProductivityPattern,
    /// Mean scheduled difficulty per day (0 on empty days)
    pub difficulty_progression: Vec<f64>,
    pub motivation_factors: MotivationFactors,
}

/// Multi-day study plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyPlan {
    pub id: String,
    pub generated_at: DateTime<Utc>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: Vec<DailySchedule>,
    pub total_planned_hours: f64,
    /// 0.3 to 1.0
    pub confidence: f64,
    pub adaptive_factors: AdaptiveFactors,
    /// Work left over after the horizon (minutes)
    pub unscheduled_minutes: u32,
}

impl StudyPlan {
    pub fn sessions(&self) -> impl Iterator<Item = &ScheduledSession> {
        self.days.iter().flat_map(|d| d.sessions.iter())
    }
}

// ============================================================================
// OPTIMIZER
// ============================================================================

impl ScheduleOptimizer {
    /// Pack one day's time blocks with tasks.
    ///
    /// Blocks are walked chronologically. While at least `min_slot_minutes`
    /// remain in the block (and in the daily budget), the best-scoring
    /// eligible task gets a slot of `min(optimal, preferred, remaining)`
    /// minutes (at least `min_slot_minutes`, at most what is left of the
    /// budget), the clock advances by the slot plus the minimum break, and the
    /// task's remaining minutes shrink. Exhausted tasks drop out.
    pub fn schedule_day_optimally(
        &self,
        tasks: Vec<StudyTask>,
        blocks: &[TimeBlock],
        date: NaiveDate,
        pattern: &ProductivityPattern,
        constraints: &ScheduleConstraints,
        ids: &mut dyn IdProvider,
    ) -> DaySchedule {
        let min_slot = self.config.min_slot_minutes as i64;
        let mut tasks = tasks;
        let mut sessions = Vec::new();
        let mut budget = constraints.max_daily_minutes;

        let mut available: Vec<&TimeBlock> = blocks.iter().filter(|b| b.available).collect();
        available.sort_by_key(|b| b.start);

        'blocks: for block in available {
            let block_end = minute_of_day(block.end);
            let mut cursor = minute_of_day(block.start);

            while !tasks.is_empty() && block_end - cursor >= min_slot {
                if budget < min_slot {
                    break 'blocks;
                }
                let free = block_end - cursor;
                let hour = (cursor / 60) as usize;
                let Some(index) = self.select_optimal_task(&tasks, hour, free, pattern, constraints) else {
                    break;
                };

                let duration = self.slot_length(&tasks[index], constraints).min(budget);
                let task = &mut tasks[index];
                sessions.push(ScheduledSession {
                    id: ids.next_id(IdKind::Session),
                    task_id: task.id.clone(),
                    subject_id: task.subject_id.clone(),
                    subject_name: task.subject_name.clone(),
                    topic_ids: task.topic_ids.clone(),
                    date,
                    start_time: clock_at(cursor),
                    end_time: clock_at(cursor + duration),
                    duration_minutes: duration as u32,
                    technique: task.recommended_technique,
                    is_review: task.is_review_due,
                    difficulty: task.difficulty,
                    cognitive_load: task.cognitive_load,
                    expected_productivity: pattern.productivity_at(hour),
                });

                task.remaining_minutes = task.remaining_minutes.saturating_sub(duration as u32);
                if task.remaining_minutes == 0 {
                    tasks.remove(index);
                }
                budget -= duration;
                cursor += duration + constraints.min_break_between_sessions as i64;
            }
        }

        tracing::debug!(
            "Packed {} sessions on {}, {} tasks left",
            sessions.len(),
            date,
            tasks.len()
        );

        DaySchedule {
            sessions,
            remaining_tasks: tasks,
        }
    }

    /// Index of the best task for a slot starting at `hour` with `available_minutes` free.
    ///
    /// Only tasks whose slot length fits are eligible. Equal scores go to the
    /// earlier task.
    pub fn select_optimal_task(
        &self,
        tasks: &[StudyTask],
        hour: usize,
        available_minutes: i64,
        pattern: &ProductivityPattern,
        constraints: &ScheduleConstraints,
    ) -> Option<usize> {
        let productivity = pattern.productivity_at(hour);
        let ceiling = self.config.cognitive_load.max_load_at(hour);

        let mut best: Option<(usize, f64)> = None;
        for (index, task) in tasks.iter().enumerate() {
            if self.slot_length(task, constraints) > available_minutes {
                continue;
            }
            let score = task_score(task, productivity, ceiling, available_minutes);
            if best.is_none_or(|(_, b)| score > b) {
                best = Some((index, score));
            }
        }
        best.map(|(index, _)| index)
    }

    /// Minutes a task asks for in one slot, never below the minimum slot
    fn slot_length(&self, task: &StudyTask, constraints: &ScheduleConstraints) -> i64 {
        task.optimal_session_length
            .min(constraints.preferred_session_length)
            .min(task.remaining_minutes)
            .max(self.config.min_slot_minutes) as i64
    }

    /// Plan the next `days_ahead` days.
    ///
    /// Tasks are generated and prioritized once, then each day is packed with
    /// whatever is left from the previous one. Today's blocks are clipped to
    /// start no earlier than `now`.
    #[allow(clippy::too_many_arguments)]
    pub fn generate_optimal_schedule(
        &self,
        subjects: &[Subject],
        sessions: &[StudySession],
        prefs: &UserPreferences,
        pattern: &ProductivityPattern,
        days_ahead: u32,
        now: DateTime<Utc>,
        ids: &mut dyn IdProvider,
    ) -> StudyPlan {
        let cfg = &self.config;
        let tasks = self.generate_study_tasks_within(subjects, sessions, pattern, days_ahead, now, ids);
        let mut tasks = self.prioritize_study_tasks(tasks, &cfg.priority_weights);
        let constraints = ScheduleConstraints::from(prefs);

        let start_date = now.date_naive();
        let mut days = Vec::with_capacity(days_ahead as usize);
        for offset in 0..days_ahead {
            let date = time::add_days(now, offset as i64);
            let blocks = if time::is_weekend(date) {
                &prefs.weekend_blocks
            } else {
                &prefs.weekday_blocks
            };
            let blocks = if offset == 0 {
                clip_blocks(blocks, now.time())
            } else {
                blocks.clone()
            };

            let day = self.schedule_day_optimally(tasks, &blocks, date, pattern, &constraints, ids);
            tasks = day.remaining_tasks;
            days.push(DailySchedule {
                date,
                planned_minutes: day.sessions.iter().map(|s| s.duration_minutes).sum(),
                sessions: day.sessions,
            });
        }

        let planned_minutes: u32 = days.iter().map(|d| d.planned_minutes).sum();
        let total_planned_hours = planned_minutes as f64 / 60.0;
        let budget_hours = prefs.max_daily_hours.max(0.0) * days_ahead as f64;

        let mut confidence = cfg.base_confidence;
        if total_planned_hours > cfg.overload_ratio * budget_hours {
            confidence -= cfg.overload_penalty;
        }
        let confidence = confidence.clamp(cfg.min_confidence, cfg.max_confidence);

        let adaptive_factors = AdaptiveFactors {
            productivity_pattern: pattern.clone(),
            difficulty_progression: days.iter().map(mean_difficulty).collect(),
            motivation_factors: motivation_factors(&days, prefs),
        };
        let unscheduled_minutes = tasks
            .iter()
            .fold(0u32, |total, t| total.saturating_add(t.remaining_minutes));

        tracing::info!(
            "Generated {}-day plan: {:.1}h planned, {} min unscheduled, confidence {:.2}",
            days_ahead,
            total_planned_hours,
            unscheduled_minutes,
            confidence
        );

        StudyPlan {
            id: ids.next_id(IdKind::Plan),
            generated_at: now,
            start_date,
            end_date: time::add_days(now, days_ahead.saturating_sub(1) as i64),
            days,
            total_planned_hours,
            confidence,
            adaptive_factors,
            unscheduled_minutes,
        }
    }
}

fn task_score(task: &StudyTask, productivity: f64, ceiling: u8, available_minutes: i64) -> f64 {
    let mut score = 0.0;
    if task.difficulty >= 4 && productivity > PEAK_HOUR_THRESHOLD {
        score += PEAK_MATCH_BONUS;
    }
    if task.difficulty <= 2 && productivity < LOW_HOUR_THRESHOLD {
        score += LOW_MATCH_BONUS;
    }
    if task.days_until_deadline <= 3 {
        score += DEADLINE_CRITICAL_BONUS;
    } else if task.days_until_deadline <= 7 {
        score += DEADLINE_NEAR_BONUS;
    }
    score += if task.cognitive_load <= ceiling {
        WITHIN_CEILING_BONUS
    } else {
        OVER_CEILING_PENALTY
    };
    score += if task.remaining_minutes as i64 <= available_minutes {
        FITS_BONUS
    } else {
        SPILLS_PENALTY
    };
    if task.is_review_due {
        score += REVIEW_BONUS;
    }
    score + (4 - task.priority.clamp(1, 3) as i64) as f64 * PRIORITY_STEP
}

fn minute_of_day(t: NaiveTime) -> i64 {
    (t.num_seconds_from_midnight() / 60) as i64
}

fn clock_at(minute: i64) -> NaiveTime {
    NaiveTime::from_num_seconds_from_midnight_opt((minute.clamp(0, 24 * 60 - 1) * 60) as u32, 0)
        .unwrap_or_default()
}

/// Drop the part of each block that lies before `not_before`
fn clip_blocks(blocks: &[TimeBlock], not_before: NaiveTime) -> Vec<TimeBlock> {
    // round up to the next whole minute
    let minute = minute_of_day(not_before) + i64::from(not_before.second() > 0 || not_before.nanosecond() > 0);
    let not_before = clock_at(minute);
    blocks
        .iter()
        .filter(|b| b.end > not_before)
        .map(|b| TimeBlock {
            start: b.start.max(not_before),
            ..b.clone()
        })
        .collect()
}

fn mean_difficulty(day: &DailySchedule) -> f64 {
    if day.sessions.is_empty() {
        return 0.0;
    }
    day.sessions.iter().map(|s| s.difficulty as f64).sum::<f64>() / day.sessions.len() as f64
}

fn motivation_factors(days: &[DailySchedule], prefs: &UserPreferences) -> MotivationFactors {
    let sessions: Vec<&ScheduledSession> = days.iter().flat_map(|d| d.sessions.iter()).collect();
    let total = sessions.len().max(1) as f64;
    let peak = sessions
        .iter()
        .filter(|s| prefs.peak_hours.contains(&s.start_time.hour()))
        .count();
    let reviews = sessions.iter().filter(|s| s.is_review).count();
    let mut subjects: Vec<&str> = sessions.iter().map(|s| s.subject_id.as_str()).collect();
    subjects.sort_unstable();
    subjects.dedup();

    MotivationFactors {
        peak_hour_share: peak as f64 / total,
        review_share: reviews as f64 / total,
        subjects_covered: subjects.len(),
        active_days: days.iter().filter(|d| !d.sessions.is_empty()).count(),
    }
}
