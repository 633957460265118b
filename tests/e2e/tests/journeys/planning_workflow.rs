//! Planning journey: snapshot in, multi-day plan out.

use chrono::{Duration, NaiveTime, Timelike};
use studyplan_core::{
    EngineConfig, RecommendationFacade, ScheduledSession, SequentialIdProvider, StudyPlan,
    StudySnapshot, UserPreferences,
};
use studyplan_e2e_tests::TestDataFactory;

fn plan_for(snapshot: &StudySnapshot, facade: &RecommendationFacade) -> StudyPlan {
    let mut ids = SequentialIdProvider::new();
    facade
        .plan(
            &snapshot.subjects,
            &snapshot.sessions,
            &snapshot.preferences,
            TestDataFactory::now(),
            &mut ids,
        )
        .expect("valid snapshot")
}

fn within_some_block(session: &ScheduledSession, prefs: &UserPreferences) -> bool {
    let blocks = if studyplan_core::time::is_weekend(session.date) {
        &prefs.weekend_blocks
    } else {
        &prefs.weekday_blocks
    };
    blocks
        .iter()
        .any(|b| b.available && session.start_time >= b.start && session.end_time <= b.end)
}

#[test]
fn test_semester_plan_covers_the_horizon() {
    let snapshot = TestDataFactory::create_semester_scenario();
    let plan = plan_for(&snapshot, &RecommendationFacade::new());

    assert_eq!(plan.id, "plan-0001");
    assert_eq!(plan.days.len(), 14);
    assert_eq!(plan.start_date, TestDataFactory::now().date_naive());
    assert_eq!(plan.end_date, plan.start_date + Duration::days(13));
    assert!(plan.sessions().count() > 0);
    assert!(plan.total_planned_hours > 0.0);
    assert!((0.3..=1.0).contains(&plan.confidence));
    assert_eq!(plan.adaptive_factors.difficulty_progression.len(), 14);
}

#[test]
fn test_sessions_respect_blocks_breaks_and_budget() {
    let snapshot = TestDataFactory::create_semester_scenario();
    let prefs = &snapshot.preferences;
    let plan = plan_for(&snapshot, &RecommendationFacade::new());

    for day in &plan.days {
        let mut sessions: Vec<&ScheduledSession> = day.sessions.iter().collect();
        sessions.sort_by_key(|s| s.start_time);

        for session in &sessions {
            assert_eq!(session.date, day.date);
            assert!(session.duration_minutes >= 30, "{} is too short", session.id);
            assert!(within_some_block(session, prefs), "{} leaves its block", session.id);
            let span = session.end_time.signed_duration_since(session.start_time);
            assert_eq!(span.num_minutes(), session.duration_minutes as i64);
        }
        for pair in sessions.windows(2) {
            assert!(pair[1].start_time >= pair[0].end_time, "overlap on {}", day.date);
        }

        let planned: u32 = day.sessions.iter().map(|s| s.duration_minutes).sum();
        assert_eq!(planned, day.planned_minutes);
        assert!(planned as i64 <= prefs.max_daily_minutes());
    }
}

#[test]
fn test_same_input_same_plan() {
    let snapshot = TestDataFactory::create_semester_scenario();
    let facade = RecommendationFacade::new();
    assert_eq!(plan_for(&snapshot, &facade), plan_for(&snapshot, &facade));
}

#[test]
fn test_nothing_scheduled_before_now() {
    let snapshot = TestDataFactory::create_semester_scenario();
    let late_morning = TestDataFactory::now() + Duration::hours(4) + Duration::minutes(10);
    let mut ids = SequentialIdProvider::new();
    let plan = RecommendationFacade::new()
        .plan(&snapshot.subjects, &snapshot.sessions, &snapshot.preferences, late_morning, &mut ids)
        .unwrap();

    let today = &plan.days[0];
    assert!(!today.sessions.is_empty());
    assert!(today.sessions.iter().all(|s| s.start_time >= late_morning.time()));
    assert_eq!(today.sessions[0].start_time, NaiveTime::from_hms_opt(10, 10, 0).unwrap());
}

#[test]
fn test_configured_horizon_and_review_length() {
    let config = EngineConfig::from_json_str(
        r#"{ "scheduler": { "defaultDaysAhead": 3, "reviewMinutes": 30 } }"#,
    )
    .unwrap();
    let snapshot = TestDataFactory::create_semester_scenario();
    let plan = plan_for(&snapshot, &RecommendationFacade::with_config(config));

    assert_eq!(plan.days.len(), 3);
    assert!(plan.unscheduled_minutes > 0);
    for review in plan.sessions().filter(|s| s.is_review) {
        assert_eq!(review.duration_minutes, 30);
        assert_eq!(review.topic_ids.len(), 1);
    }
}

#[test]
fn test_no_subjects_yields_empty_plan() {
    let snapshot = TestDataFactory::create_empty_scenario();
    let plan = plan_for(&snapshot, &RecommendationFacade::new());

    assert_eq!(plan.sessions().count(), 0);
    assert_eq!(plan.total_planned_hours, 0.0);
    assert_eq!(plan.unscheduled_minutes, 0);
    assert_eq!(plan.confidence, 0.8);
}

#[test]
fn test_peak_hours_drive_motivation_share() {
    let snapshot = TestDataFactory::create_semester_scenario();
    let plan = plan_for(&snapshot, &RecommendationFacade::new());
    let motivation = &plan.adaptive_factors.motivation_factors;

    let total = plan.sessions().count() as f64;
    let peak = plan
        .sessions()
        .filter(|s| snapshot.preferences.peak_hours.contains(&s.start_time.hour()))
        .count() as f64;
    assert!((motivation.peak_hour_share - peak / total).abs() < 1e-9);
    assert!(motivation.subjects_covered >= 1 && motivation.subjects_covered <= 4);
    assert!(motivation.active_days <= 14);
}
