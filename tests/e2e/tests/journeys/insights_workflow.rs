//! Insight journey: the full pipeline over realistic learners.

use studyplan_core::{
    EngineError, InsightBundle, RecommendationFacade, RecommendationKind, RiskKind, RiskLevel,
    SequentialIdProvider, StudySnapshot, StudyTechnique,
};
use studyplan_e2e_tests::TestDataFactory;

fn insights_for(snapshot: &StudySnapshot) -> InsightBundle {
    let mut ids = SequentialIdProvider::new();
    RecommendationFacade::new()
        .generate_insights(
            &snapshot.subjects,
            &snapshot.sessions,
            &snapshot.preferences,
            TestDataFactory::now(),
            &mut ids,
        )
        .expect("valid snapshot")
}

#[test]
fn test_semester_bundle_is_complete() {
    let snapshot = TestDataFactory::create_semester_scenario();
    let bundle = insights_for(&snapshot);
    let topic_count: usize = snapshot.subjects.iter().map(|s| s.topics.len()).sum();

    assert_eq!(bundle.generated_at, TestDataFactory::now());
    assert_eq!(bundle.review_schedule.len(), topic_count);
    assert_eq!(bundle.topic_retention.len(), topic_count);
    assert_eq!(bundle.completion.len(), snapshot.subjects.len());
    assert_eq!(bundle.deadlines.len(), snapshot.subjects.len());
    assert!(bundle.review_queue.len() <= 10);
    assert!(bundle.study_plan.sessions().count() > 0);

    // 28 sessions of 45 minutes, two a day for the last 14 days
    assert_eq!(bundle.metrics.session_count, 28);
    assert!((bundle.metrics.total_study_hours - 21.0).abs() < 1e-9);
    assert!((bundle.metrics.hours_last_7_days - 10.5).abs() < 1e-9);
    assert_eq!(bundle.metrics.study_streak_days, 14);
    assert!((bundle.velocity.current_velocity - 1.5).abs() < 1e-9);
    assert!(bundle.metrics.technique_effectiveness.contains_key(&StudyTechnique::Pomodoro));
}

#[test]
fn test_recommendations_are_ranked_and_capped() {
    let bundle = insights_for(&TestDataFactory::create_semester_scenario());

    assert!(!bundle.recommendations.is_empty());
    assert!(bundle.recommendations.len() <= 10);
    for pair in bundle.recommendations.windows(2) {
        assert!(pair[0].priority <= pair[1].priority);
    }
    assert!(bundle.recommendations.iter().all(|r| (1..=3).contains(&r.priority)));
}

#[test]
fn test_deadlines_sorted_most_at_risk_first() {
    let bundle = insights_for(&TestDataFactory::create_semester_scenario());

    for pair in bundle.deadlines.windows(2) {
        assert!(pair[0].probability <= pair[1].probability);
    }
    for forecast in &bundle.deadlines {
        assert!((0.05..=0.95).contains(&forecast.probability));
        assert!(forecast.recommendations.len() <= 2);
    }
}

#[test]
fn test_explicit_categories_drive_technique_suggestions() {
    let bundle = insights_for(&TestDataFactory::create_semester_scenario());

    let practice = bundle
        .techniques
        .iter()
        .find(|t| t.technique == StudyTechnique::PracticeProblems)
        .expect("quantitative subject present");
    assert_eq!(practice.subject_ids, vec!["calculus".to_string()]);

    let spaced = bundle
        .techniques
        .iter()
        .find(|t| t.technique == StudyTechnique::SpacedRepetition)
        .expect("memorization subject present");
    assert!(spaced.subject_ids.contains(&"history".to_string()));

    assert!(bundle.techniques.len() <= 5);
    for pair in bundle.techniques.windows(2) {
        assert!(pair[0].expected_improvement >= pair[1].expected_improvement);
    }
}

#[test]
fn test_deadline_crunch_flags_every_urgent_subject() {
    let snapshot = TestDataFactory::create_deadline_crunch_scenario();
    let bundle = insights_for(&snapshot);

    let pressure = bundle
        .risk
        .factor(RiskKind::DeadlinePressure)
        .expect("deadline pressure flagged");
    let mut affected = pressure.affected_subject_ids.clone();
    affected.sort();
    let mut expected: Vec<String> = snapshot.subjects.iter().map(|s| s.id.clone()).collect();
    expected.sort();
    assert_eq!(affected, expected);
    assert_eq!(pressure.severity, 5);
    assert!(bundle.risk.overall_risk >= RiskLevel::Medium);

    assert_eq!(bundle.recommendations[0].priority, 1);
    assert!(bundle
        .recommendations
        .iter()
        .any(|r| r.kind == RecommendationKind::Deadline));
}

#[test]
fn test_burnout_is_flagged_with_mitigation() {
    let bundle = insights_for(&TestDataFactory::create_burnout_scenario());

    let burnout = bundle.risk.factor(RiskKind::BurnoutRisk).expect("burnout flagged");
    assert_eq!(burnout.severity, 3);
    assert!(burnout.mitigation.contains("6-7 hours"));
    assert_eq!(burnout.affected_subject_ids.len(), 2);
    assert!(bundle.risk.factor(RiskKind::DeadlinePressure).is_none());
    assert_eq!(bundle.risk.overall_risk, RiskLevel::Medium);
}

#[test]
fn test_new_learner_gets_defaults_not_errors() {
    let bundle = insights_for(&TestDataFactory::create_empty_scenario());

    assert!(bundle.completion.is_empty());
    assert!(bundle.deadlines.is_empty());
    assert_eq!(bundle.metrics.session_count, 0);
    assert_eq!(bundle.metrics.study_streak_days, 0);
    assert_eq!(bundle.risk.overall_risk, RiskLevel::Low);
    assert_eq!(bundle.productivity_pattern.productivity_at(9), 0.9);
    assert_eq!(bundle.productivity_pattern.productivity_at(2), 0.2);
}

#[test]
fn test_session_for_unknown_subject_fails_fast() {
    let mut snapshot = TestDataFactory::create_semester_scenario();
    snapshot.sessions[0].subject_id = "astronomy".to_string();

    let mut ids = SequentialIdProvider::new();
    let result = RecommendationFacade::new().generate_insights(
        &snapshot.subjects,
        &snapshot.sessions,
        &snapshot.preferences,
        TestDataFactory::now(),
        &mut ids,
    );
    assert!(matches!(result, Err(EngineError::UnknownSubject { .. })));
}
