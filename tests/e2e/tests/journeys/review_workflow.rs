//! Review journey: a topic moving through SM-2 as the learner reviews it.

use chrono::Duration;
use studyplan_core::{
    RecommendationFacade, RetentionModel, SequentialIdProvider, ScheduleOptimizer, Topic,
    UserPreferences,
};
use studyplan_e2e_tests::TestDataFactory;

#[test]
fn test_perfect_reviews_lengthen_intervals() {
    let model = RetentionModel::new();
    let mut now = TestDataFactory::now();
    let mut topic = Topic::new("derivatives", "calculus", 3);
    let mut intervals = Vec::new();

    for _ in 0..3 {
        topic = model.next_topic_state(&topic, 5.0, &[], now);
        intervals.push(topic.review_interval);
        now += Duration::days(topic.review_interval as i64);
    }

    // Ease climbs 2.6, 2.7, 2.8 when carried forward: round(6 * 2.8) = 17
    assert_eq!(intervals, vec![1, 6, 17]);
    assert_eq!(topic.review_count, 3);
    assert!((topic.ease_factor - 2.8).abs() < 1e-9);
}

#[test]
fn test_fixed_ease_scenario_reaches_sixteen_days() {
    let model = RetentionModel::new();
    let now = TestDataFactory::now();

    let first = model.next_review(5.0, 2.5, 1, 0, now);
    let second = model.next_review(5.0, 2.5, first.interval, first.review_count, now);
    let third = model.next_review(5.0, 2.5, second.interval, second.review_count, now);

    assert_eq!((first.interval, second.interval, third.interval), (1, 6, 16));
}

#[test]
fn test_lapse_sends_topic_back_to_learning() {
    let model = RetentionModel::new();
    let now = TestDataFactory::now();
    let mut topic = TestDataFactory::create_reviewed_topic("verbs", "spanish", 3, 20, 20, 5);
    topic.ease_factor = 2.2;

    let lapsed = model.next_topic_state(&topic, 1.0, &[], now);
    assert_eq!(lapsed.review_interval, 1);
    assert_eq!(lapsed.review_count, 0);
    assert!(lapsed.ease_factor < 2.2);
    assert!(lapsed.ease_factor >= 1.3);
    assert_eq!(lapsed.last_reviewed, Some(now));

    // the input is left untouched
    assert_eq!(topic.review_interval, 20);
}

#[test]
fn test_due_state_follows_the_interval() {
    let model = RetentionModel::new();
    let now = TestDataFactory::now();
    let reviewed = model.next_topic_state(&Topic::new("limits", "calculus", 2), 4.0, &[], now);
    let topics = vec![reviewed];

    assert!(model.due_for_review(&topics, now).is_empty());
    assert!(model.due_for_review(&topics, now + Duration::hours(12)).is_empty());
    assert_eq!(model.due_for_review(&topics, now + Duration::days(1)).len(), 1);

    let schedule = model.review_schedule(&topics, now);
    assert_eq!(schedule["limits"], (now + Duration::days(1)).date_naive());
}

#[test]
fn test_stale_hard_topics_lead_the_queue() {
    let model = RetentionModel::new();
    let now = TestDataFactory::now();
    let topics = vec![
        TestDataFactory::create_reviewed_topic("fresh-easy", "history", 1, 1, 6, 2),
        TestDataFactory::create_reviewed_topic("stale-hard", "history", 5, 30, 6, 2),
        TestDataFactory::create_reviewed_topic("mid", "history", 3, 8, 6, 2),
    ];

    let queue = model.prioritize_reviews(&topics, &[], 2, now);
    assert_eq!(queue.len(), 2);
    assert_eq!(queue[0].topic_id, "stale-hard");
    assert_eq!(queue[1].topic_id, "mid");
    assert!(queue[0].retention < queue[1].retention);
}

#[test]
fn test_due_topics_become_review_sessions() {
    let snapshot = TestDataFactory::create_semester_scenario();
    let optimizer = ScheduleOptimizer::new();
    let analyzer = studyplan_core::ProductivityPatternAnalyzer::new();
    let pattern = analyzer.analyze(&snapshot.sessions);
    let mut ids = SequentialIdProvider::new();

    let tasks = optimizer.generate_study_tasks(
        &snapshot.subjects,
        &snapshot.sessions,
        &pattern,
        TestDataFactory::now(),
        &mut ids,
    );
    let reviews: Vec<_> = tasks.iter().filter(|t| t.is_review_due).collect();

    // every topic is due: thirteen never reviewed, one reviewed three days ago on a 1-day interval
    assert_eq!(reviews.len(), 14);
    assert!(reviews.iter().all(|t| t.remaining_minutes == 20));
    assert!(reviews
        .iter()
        .all(|t| t.recommended_technique == studyplan_core::StudyTechnique::ActiveRecall));
}

#[test]
fn test_low_retention_rate_brings_review_forward() {
    let now = TestDataFactory::now();
    let mut subject = TestDataFactory::create_subject("spanish", "Spanish", 30, 3, 20.0, 4.0, 0);
    subject.topics = vec![TestDataFactory::create_reviewed_topic("verbs", "spanish", 3, 2, 6, 2)];
    let sessions = vec![TestDataFactory::create_session(
        "verbs-review",
        "spanish",
        Some("verbs"),
        now - Duration::days(2),
        30,
        3,
    )];

    let review_date = |retention_rate: f64| {
        let mut learner = subject.clone();
        learner.retention_rate = retention_rate;
        RecommendationFacade::new()
            .generate_insights(
                &[learner],
                &sessions,
                &UserPreferences::default(),
                now,
                &mut SequentialIdProvider::new(),
            )
            .unwrap()
            .review_schedule["verbs"]
    };

    let steady = review_date(0.8);
    let struggling = review_date(0.5);
    assert_eq!(steady, (now + Duration::days(4)).date_naive());
    assert_eq!(struggling, (now + Duration::days(1)).date_naive());
    assert!(struggling < steady);
}
