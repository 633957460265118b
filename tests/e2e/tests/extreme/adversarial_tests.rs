//! Adversarial input: out-of-range values, degenerate preferences, bad structure.

use chrono::Duration;
use studyplan_core::{
    EngineError, RecommendationFacade, SequentialIdProvider, StudySnapshot, TimeBlock,
    UserPreferences,
};
use studyplan_e2e_tests::{HistoryConfig, TestDataFactory};

fn run(snapshot: &StudySnapshot) -> studyplan_core::Result<studyplan_core::InsightBundle> {
    let mut ids = SequentialIdProvider::new();
    RecommendationFacade::new().generate_insights(
        &snapshot.subjects,
        &snapshot.sessions,
        &snapshot.preferences,
        TestDataFactory::now(),
        &mut ids,
    )
}

#[test]
fn test_out_of_range_ratings_are_clamped() {
    let mut subject = TestDataFactory::create_subject("wild", "Wild Ratings", 10, 9, 12.0, 0.0, 2);
    subject.priority = 0;
    subject.cognitive_load = 11;
    subject.topics[0].difficulty = 0;

    let sessions = TestDataFactory::create_history(
        std::slice::from_ref(&subject),
        &HistoryConfig {
            effectiveness: vec![0, 9, 250],
            ..HistoryConfig::default()
        },
    );
    let snapshot = StudySnapshot {
        subjects: vec![subject],
        sessions,
        preferences: UserPreferences::default(),
    };

    let bundle = run(&snapshot).unwrap();
    for session in bundle.study_plan.sessions() {
        assert!((1..=5).contains(&session.difficulty));
        assert!((1..=5).contains(&session.cognitive_load));
    }
    assert!((1.0..=5.0).contains(&bundle.metrics.average_effectiveness));
    for forecast in &bundle.topic_retention {
        assert!((0.0..=1.0).contains(&forecast.retention));
        assert!((1..=30).contains(&forecast.optimal_interval_days));
    }
}

#[test]
fn test_overshot_subject_is_complete_not_negative() {
    let subject = TestDataFactory::create_subject("done", "Finished Course", 5, 3, 10.0, 25.0, 1);
    let snapshot = StudySnapshot {
        subjects: vec![subject],
        sessions: vec![],
        preferences: UserPreferences::default(),
    };

    let bundle = run(&snapshot).unwrap();
    assert!(bundle.study_plan.sessions().all(|s| s.is_review));
    assert_eq!(bundle.metrics.completion_rate, 1.0);
    assert_eq!(bundle.deadlines[0].probability, 0.95);
    assert!(bundle.risk.factor(studyplan_core::RiskKind::DeadlinePressure).is_none());
}

#[test]
fn test_past_deadline_still_plans() {
    let subject = TestDataFactory::create_subject("late", "Overdue Essay", -4, 3, 8.0, 2.0, 1);
    let snapshot = StudySnapshot {
        subjects: vec![subject],
        sessions: vec![],
        preferences: UserPreferences::default(),
    };

    let bundle = run(&snapshot).unwrap();
    assert_eq!(bundle.deadlines[0].days_remaining, 0);
    assert!(bundle.deadlines[0].probability < 0.5);
    assert!(bundle.study_plan.sessions().count() > 0);
}

#[test]
fn test_unusable_preferences_produce_an_empty_plan() {
    let mut snapshot = TestDataFactory::create_semester_scenario();
    snapshot.preferences = UserPreferences {
        weekday_blocks: vec![
            TimeBlock::new((10, 0), (10, 20)),
            TimeBlock::new((15, 0), (14, 0)),
            TimeBlock {
                available: false,
                ..TimeBlock::new((8, 0), (12, 0))
            },
        ],
        weekend_blocks: vec![],
        ..UserPreferences::default()
    };

    let bundle = run(&snapshot).unwrap();
    assert_eq!(bundle.study_plan.sessions().count(), 0);
    assert!(bundle.study_plan.unscheduled_minutes > 0);
}

#[test]
fn test_zero_daily_budget_schedules_nothing() {
    let mut snapshot = TestDataFactory::create_semester_scenario();
    snapshot.preferences.max_daily_hours = 0.0;

    let bundle = run(&snapshot).unwrap();
    assert_eq!(bundle.study_plan.sessions().count(), 0);
}

#[test]
fn test_zero_length_and_future_sessions_do_not_skew_metrics() {
    let mut snapshot = TestDataFactory::create_semester_scenario();
    let mut ghost = snapshot.sessions[0].clone();
    ghost.id = "ghost".to_string();
    ghost.duration = 0;
    let mut future = snapshot.sessions[0].clone();
    future.id = "future".to_string();
    future.start_time = TestDataFactory::now() + Duration::days(3);
    snapshot.sessions.push(ghost);
    snapshot.sessions.push(future);

    let bundle = run(&snapshot).unwrap();
    assert!((bundle.metrics.hours_last_7_days - 10.5).abs() < 1e-9);
    assert_eq!(bundle.metrics.study_streak_days, 14);
}

#[test]
fn test_duplicate_subject_ids_rejected() {
    let mut snapshot = TestDataFactory::create_semester_scenario();
    let copy = snapshot.subjects[0].clone();
    snapshot.subjects.push(copy);

    assert!(matches!(run(&snapshot), Err(EngineError::DuplicateSubject(id)) if id == "calculus"));
}

#[test]
fn test_malformed_snapshot_json_is_a_serialization_error() {
    let result = StudySnapshot::from_json_str(r#"{ "subjects": [ { "id": 7 } ] }"#);
    assert!(matches!(result, Err(EngineError::Serialization(_))));
}

#[test]
fn test_huge_review_interval_does_not_overflow_dates() {
    let mut subject = TestDataFactory::create_subject("archive", "Archive", 20, 3, 10.0, 2.0, 0);
    let mut topic = TestDataFactory::create_reviewed_topic("ancient", "archive", 3, 1, u32::MAX, u32::MAX);
    topic.ease_factor = 1.0e12;
    subject.topics = vec![topic];
    let snapshot = StudySnapshot {
        subjects: vec![subject],
        sessions: vec![],
        preferences: UserPreferences::default(),
    };

    let bundle = run(&snapshot).unwrap();
    assert!(bundle.review_schedule["ancient"] > TestDataFactory::now().date_naive());
    for forecast in &bundle.topic_retention {
        assert!((0.0..=1.0).contains(&forecast.retention));
    }
}

#[test]
fn test_enormous_estimate_plans_within_horizon() {
    let subject = TestDataFactory::create_subject("thesis", "Thesis", 60, 4, 1.0e8, 0.0, 3);
    let snapshot = StudySnapshot {
        subjects: vec![subject],
        sessions: vec![],
        preferences: UserPreferences::default(),
    };

    let bundle = run(&snapshot).unwrap();
    let plan = &bundle.study_plan;
    assert!(plan.sessions().count() > 0);
    assert!(plan.total_planned_hours <= snapshot.preferences.max_daily_hours * plan.days.len() as f64);
    // nearly all of the estimate is still outstanding after two weeks
    assert!(plan.unscheduled_minutes >= u32::MAX - 14 * 24 * 60);
}
