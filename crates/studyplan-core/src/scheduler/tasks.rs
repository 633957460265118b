//! Study tasks: the units of work a scheduling run packs into time blocks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ScheduleOptimizer;
use crate::ids::{IdKind, IdProvider};
use crate::models::{StudySession, StudyTechnique, Subject, SubjectCategory};
use crate::productivity::ProductivityPattern;
use crate::time;

/// Outstanding work on a subject, created per scheduling run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyTask {
    pub id: String,
    pub subject_id: String,
    pub subject_name: String,
    pub topic_ids: Vec<String>,
    pub difficulty: u8,
    pub cognitive_load: u8,
    /// 1 (highest) to 3
    pub priority: u8,
    pub remaining_minutes: u32,
    pub optimal_session_length: u32,
    pub days_until_deadline: i64,
    pub is_review_due: bool,
    pub recommended_technique: StudyTechnique,
}

/// Weights of the task priority score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PriorityWeights {
    pub deadline: f64,
    pub priority: f64,
    pub review: f64,
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self {
            deadline: 1.0,
            priority: 1.0,
            review: 1.0,
        }
    }
}

impl PriorityWeights {
    /// `(30 - days) * w1 + (4 - priority) * w2 * 10 + (review ? w3 * 20 : 0)`
    pub fn score(&self, task: &StudyTask) -> f64 {
        let deadline = (30 - task.days_until_deadline) as f64 * self.deadline;
        let priority = (4 - task.priority.clamp(1, 3) as i64) as f64 * self.priority * 10.0;
        let review = if task.is_review_due { self.review * 20.0 } else { 0.0 };
        deadline + priority + review
    }
}

/// Minutes in a day
const DAY_MINUTES: u32 = 24 * 60;

impl ScheduleOptimizer {
    /// One task per chunk of remaining work, plus one review task per due topic.
    ///
    /// Chunks rotate through the subject's incomplete topics. Review tasks use
    /// active recall and jump to priority 1 when the deadline is close.
    /// Chunk counts are bounded by what the default horizon could ever place.
    pub fn generate_study_tasks(
        &self,
        subjects: &[Subject],
        sessions: &[StudySession],
        pattern: &ProductivityPattern,
        now: DateTime<Utc>,
        ids: &mut dyn IdProvider,
    ) -> Vec<StudyTask> {
        self.generate_study_tasks_within(
            subjects,
            sessions,
            pattern,
            self.config.default_days_ahead,
            now,
            ids,
        )
    }

    /// [`generate_study_tasks`](Self::generate_study_tasks) for a `days_ahead` horizon.
    ///
    /// A subject gets at most one chunk per slot the horizon holds; the last
    /// chunk carries whatever work is left over.
    pub(crate) fn generate_study_tasks_within(
        &self,
        subjects: &[Subject],
        sessions: &[StudySession],
        pattern: &ProductivityPattern,
        days_ahead: u32,
        now: DateTime<Utc>,
        ids: &mut dyn IdProvider,
    ) -> Vec<StudyTask> {
        let cfg = &self.config;
        let max_chunks = days_ahead
            .max(1)
            .saturating_mul(DAY_MINUTES / cfg.min_slot_minutes.clamp(1, DAY_MINUTES));
        let chunk = cfg.chunk_minutes.max(1);
        let chunk_session = pattern
            .session_length_optimal
            .clamp(cfg.min_slot_minutes, cfg.max_chunk_session_minutes.max(cfg.min_slot_minutes));

        let mut tasks = Vec::new();
        for subject in subjects {
            let days_until_deadline = time::days_until(subject.deadline, now);
            let technique = technique_for(subject, sessions);

            let remaining_minutes = (subject.remaining_hours() * 60.0).round() as u32;
            if remaining_minutes > 0 {
                let incomplete: Vec<&str> = subject
                    .topics
                    .iter()
                    .filter(|t| t.is_incomplete())
                    .map(|t| t.id.as_str())
                    .collect();
                let count = remaining_minutes.div_ceil(chunk).min(max_chunks);
                for i in 0..count {
                    let topic_ids = if incomplete.is_empty() {
                        Vec::new()
                    } else {
                        vec![incomplete[i as usize % incomplete.len()].to_string()]
                    };
                    tasks.push(StudyTask {
                        id: ids.next_id(IdKind::Task),
                        subject_id: subject.id.clone(),
                        subject_name: subject.name.clone(),
                        topic_ids,
                        difficulty: subject.difficulty_clamped(),
                        cognitive_load: subject.cognitive_load_clamped(),
                        priority: subject.priority_clamped(),
                        remaining_minutes: if i + 1 == count {
                            remaining_minutes - i * chunk
                        } else {
                            chunk
                        },
                        optimal_session_length: chunk_session,
                        days_until_deadline,
                        is_review_due: false,
                        recommended_technique: technique,
                    });
                }
            }

            let urgent = days_until_deadline <= cfg.urgent_days;
            for topic in self.retention.due_for_review(&subject.topics, now) {
                tasks.push(StudyTask {
                    id: ids.next_id(IdKind::Task),
                    subject_id: subject.id.clone(),
                    subject_name: subject.name.clone(),
                    topic_ids: vec![topic.id.clone()],
                    difficulty: topic.difficulty_clamped(),
                    cognitive_load: subject.cognitive_load_clamped(),
                    priority: if urgent { 1 } else { subject.priority_clamped() },
                    remaining_minutes: cfg.review_minutes,
                    optimal_session_length: cfg.min_slot_minutes,
                    days_until_deadline,
                    is_review_due: true,
                    recommended_technique: StudyTechnique::ActiveRecall,
                });
            }
        }

        tracing::debug!("Generated {} study tasks for {} subjects", tasks.len(), subjects.len());
        tasks
    }

    /// Sort tasks by weighted priority score, highest first; equal scores keep input order
    pub fn prioritize_study_tasks(&self, mut tasks: Vec<StudyTask>, weights: &PriorityWeights) -> Vec<StudyTask> {
        tasks.sort_by(|a, b| {
            weights
                .score(b)
                .partial_cmp(&weights.score(a))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        tasks
    }
}

/// Technique for regular work on a subject: its best-rated technique so far,
/// else a default for its category and difficulty
fn technique_for(subject: &Subject, sessions: &[StudySession]) -> StudyTechnique {
    let mut best: Option<(StudyTechnique, f64)> = None;
    for technique in StudyTechnique::ALL {
        let rated: Vec<f64> = sessions
            .iter()
            .filter(|s| s.subject_id == subject.id && s.technique == technique)
            .map(|s| s.effectiveness_clamped())
            .collect();
        if rated.len() < 2 {
            continue;
        }
        let mean = rated.iter().sum::<f64>() / rated.len() as f64;
        if best.is_none_or(|(_, b)| mean > b) {
            best = Some((technique, mean));
        }
    }
    if let Some((technique, _)) = best {
        return technique;
    }

    match subject.category {
        Some(SubjectCategory::Quantitative) => StudyTechnique::PracticeProblems,
        Some(SubjectCategory::Memorization) => StudyTechnique::SpacedRepetition,
        Some(SubjectCategory::Language) => StudyTechnique::Flashcards,
        Some(SubjectCategory::Conceptual) => StudyTechnique::Elaboration,
        None if subject.difficulty_clamped() >= 4 => StudyTechnique::ActiveRecall,
        None => StudyTechnique::Pomodoro,
    }
}
