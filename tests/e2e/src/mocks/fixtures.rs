//! Test Data Factory
//!
//! Builds realistic learner data:
//! - Subjects with topics at a chosen SM-2 state
//! - Session histories spread over past days
//! - Pre-built snapshots for common scenarios

use chrono::{DateTime, Duration, TimeZone, Utc};
use studyplan_core::{
    StudySession, StudySnapshot, StudyTechnique, Subject, SubjectCategory, Topic, UserPreferences,
};

/// Factory for creating test data
///
/// Every scenario is anchored at [`TestDataFactory::now`], so the same call
/// always yields the same snapshot.
///
/// # Example
///
/// ```rust,ignore
/// let now = TestDataFactory::now();
/// let snapshot = TestDataFactory::create_semester_scenario();
/// let bundle = RecommendationFacade::new().generate_insights(
///     &snapshot.subjects, &snapshot.sessions, &snapshot.preferences, now, &mut ids,
/// )?;
/// ```
pub struct TestDataFactory;

/// Shape of a generated session history
#[derive(Debug, Clone)]
pub struct HistoryConfig {
    /// Days of history, ending yesterday
    pub days: i64,
    pub sessions_per_day: usize,
    /// Minutes per session
    pub minutes: u32,
    /// Hour of day the first session of each day starts
    pub first_hour: i64,
    /// Hours between session starts on the same day
    pub spacing_hours: i64,
    /// Cycled through per session, 1 to 5
    pub effectiveness: Vec<u8>,
    /// Cycled through per session
    pub techniques: Vec<StudyTechnique>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            days: 14,
            sessions_per_day: 2,
            minutes: 45,
            first_hour: 9,
            spacing_hours: 3,
            effectiveness: vec![4, 3, 5],
            techniques: vec![StudyTechnique::Pomodoro, StudyTechnique::ActiveRecall],
        }
    }
}

impl TestDataFactory {
    /// Monday 2026-03-02 06:00 UTC
    pub fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 6, 0, 0).unwrap()
    }

    // ========================================================================
    // SINGLE RECORDS
    // ========================================================================

    /// Subject with `topic_count` fresh topics of the subject's difficulty
    pub fn create_subject(
        id: &str,
        name: &str,
        days_to_deadline: i64,
        difficulty: u8,
        estimated_hours: f64,
        completed_hours: f64,
        topic_count: usize,
    ) -> Subject {
        Subject {
            id: id.to_string(),
            name: name.to_string(),
            deadline: (Self::now() + Duration::days(days_to_deadline)).date_naive(),
            priority: 2,
            difficulty,
            estimated_hours,
            completed_hours,
            topics: (0..topic_count)
                .map(|i| {
                    let mut topic = Topic::new(format!("{id}-t{}", i + 1), id, difficulty);
                    topic.name = format!("{name} topic {}", i + 1);
                    topic
                })
                .collect(),
            cognitive_load: difficulty.min(5),
            retention_rate: 0.8,
            category: None,
        }
    }

    /// Topic last reviewed `days_ago` days before [`TestDataFactory::now`]
    pub fn create_reviewed_topic(
        id: &str,
        subject_id: &str,
        difficulty: u8,
        days_ago: i64,
        interval: u32,
        review_count: u32,
    ) -> Topic {
        let mut topic = Topic::new(id, subject_id, difficulty);
        topic.last_reviewed = Some(Self::now() - Duration::days(days_ago));
        topic.review_interval = interval;
        topic.review_count = review_count;
        topic.mastery_level = 0.5;
        topic
    }

    pub fn create_session(
        id: &str,
        subject_id: &str,
        topic_id: Option<&str>,
        start_time: DateTime<Utc>,
        minutes: u32,
        effectiveness: u8,
    ) -> StudySession {
        StudySession {
            id: id.to_string(),
            subject_id: subject_id.to_string(),
            topic_id: topic_id.map(str::to_string),
            start_time,
            end_time: Some(start_time + Duration::minutes(minutes as i64)),
            duration: minutes,
            effectiveness,
            technique: StudyTechnique::Pomodoro,
            interruptions: 0,
        }
    }

    // ========================================================================
    // BATCHES
    // ========================================================================

    /// Session history over the past `config.days` days, rotating subjects
    /// and tagging each session with one of the subject's topics when it has any
    pub fn create_history(subjects: &[Subject], config: &HistoryConfig) -> Vec<StudySession> {
        if subjects.is_empty() {
            return Vec::new();
        }

        let mut sessions = Vec::new();
        let mut n = 0usize;
        for day in (1..=config.days).rev() {
            let midnight = Self::now() - Duration::days(day) - Duration::hours(6);
            for slot in 0..config.sessions_per_day {
                let subject = &subjects[n % subjects.len()];
                let topic_id = if subject.topics.is_empty() {
                    None
                } else {
                    Some(subject.topics[n % subject.topics.len()].id.clone())
                };
                let start = midnight + Duration::hours(config.first_hour + slot as i64 * config.spacing_hours);
                sessions.push(StudySession {
                    id: format!("hist-{:04}", n + 1),
                    subject_id: subject.id.clone(),
                    topic_id,
                    start_time: start,
                    end_time: None,
                    duration: config.minutes,
                    effectiveness: cycle(&config.effectiveness, n).unwrap_or(3),
                    technique: cycle(&config.techniques, n).unwrap_or_default(),
                    interruptions: (n % 3) as u32,
                });
                n += 1;
            }
        }
        sessions
    }

    // ========================================================================
    // SCENARIOS
    // ========================================================================

    /// Four subjects of mixed difficulty and two weeks of steady history
    pub fn create_semester_scenario() -> StudySnapshot {
        let mut calculus = Self::create_subject("calculus", "Calculus II", 21, 4, 30.0, 8.0, 4);
        calculus.priority = 1;
        calculus.category = Some(SubjectCategory::Quantitative);
        calculus.topics[0] = Self::create_reviewed_topic("calculus-t1", "calculus", 4, 3, 1, 1);

        let mut history = Self::create_subject("history", "European History", 35, 2, 20.0, 5.0, 3);
        history.priority = 3;
        history.category = Some(SubjectCategory::Memorization);

        let spanish = Self::create_subject("spanish", "Spanish Vocabulary", 10, 3, 12.0, 6.0, 5);
        let philosophy = Self::create_subject("philosophy", "Philosophy of Mind", 28, 3, 15.0, 2.0, 2);

        let subjects = vec![calculus, history, spanish, philosophy];
        let sessions = Self::create_history(&subjects, &HistoryConfig::default());

        StudySnapshot {
            subjects,
            sessions,
            preferences: UserPreferences::default(),
        }
    }

    /// Five subjects due within a week, each barely started
    pub fn create_deadline_crunch_scenario() -> StudySnapshot {
        let subjects: Vec<Subject> = (0..5)
            .map(|i| {
                Self::create_subject(
                    &format!("exam-{}", i + 1),
                    &format!("Exam {}", i + 1),
                    2 + i as i64,
                    3,
                    20.0,
                    4.0,
                    2,
                )
            })
            .collect();
        let sessions = Self::create_history(
            &subjects,
            &HistoryConfig {
                days: 5,
                sessions_per_day: 1,
                ..HistoryConfig::default()
            },
        );

        StudySnapshot {
            subjects,
            sessions,
            preferences: UserPreferences::default(),
        }
    }

    /// Nine hours of study a day for the last week
    pub fn create_burnout_scenario() -> StudySnapshot {
        let subjects = vec![
            Self::create_subject("organic", "Organic Chemistry", 40, 3, 120.0, 60.0, 3),
            Self::create_subject("statistics", "Statistics", 45, 3, 100.0, 50.0, 3),
        ];
        let sessions = Self::create_history(
            &subjects,
            &HistoryConfig {
                days: 7,
                sessions_per_day: 3,
                minutes: 180,
                first_hour: 8,
                spacing_hours: 4,
                ..HistoryConfig::default()
            },
        );

        StudySnapshot {
            subjects,
            sessions,
            preferences: UserPreferences::default(),
        }
    }

    /// A learner who has just signed up
    pub fn create_empty_scenario() -> StudySnapshot {
        StudySnapshot::default()
    }
}

fn cycle<T: Copy>(values: &[T], n: usize) -> Option<T> {
    if values.is_empty() {
        None
    } else {
        Some(values[n % values.len()])
    }
}
