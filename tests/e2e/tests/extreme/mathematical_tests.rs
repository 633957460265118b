//! Mathematical properties of the engine, checked over generated input.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use studyplan_core::retention::{next_review, retention_probability};
use studyplan_core::{
    PerformancePredictor, ProductivityPatternAnalyzer, RetentionModel, ScheduleConstraints,
    ScheduleOptimizer, SequentialIdProvider, StudySession, StudyTask, StudyTechnique, Subject,
    TimeBlock, Topic,
};
use studyplan_e2e_tests::TestDataFactory;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_ease() -> impl Strategy<Value = f64> {
    (130u32..=350u32).prop_map(|v| v as f64 / 100.0)
}

fn arb_technique() -> impl Strategy<Value = StudyTechnique> {
    (0usize..StudyTechnique::ALL.len()).prop_map(|i| StudyTechnique::ALL[i])
}

fn arb_session(index: usize) -> impl Strategy<Value = StudySession> {
    (
        0i64..(60 * 24),  // hours before now
        0u32..=240u32,    // duration
        0u8..=6u8,        // effectiveness, including out of range
        arb_technique(),
    )
        .prop_map(move |(hours_ago, duration, effectiveness, technique)| StudySession {
            id: format!("gen-{index}"),
            subject_id: "gen".to_string(),
            topic_id: None,
            start_time: TestDataFactory::now() - Duration::hours(hours_ago),
            end_time: None,
            duration,
            effectiveness,
            technique,
            interruptions: 0,
        })
}

fn arb_sessions() -> impl Strategy<Value = Vec<StudySession>> {
    (0usize..40).prop_flat_map(|n| (0..n).map(arb_session).collect::<Vec<_>>())
}

fn arb_task() -> impl Strategy<Value = StudyTask> {
    (
        1u8..=5u8,     // difficulty
        1u8..=5u8,     // cognitive load
        1u8..=3u8,     // priority
        1u32..=300u32, // remaining minutes
        prop_oneof![Just(30u32), Just(45u32)],
        -3i64..=60i64, // days until deadline
        any::<bool>(),
    )
        .prop_map(|(difficulty, cognitive_load, priority, remaining, optimal, days, review)| StudyTask {
            id: String::new(),
            subject_id: "gen".to_string(),
            subject_name: "Generated".to_string(),
            topic_ids: vec![],
            difficulty,
            cognitive_load,
            priority,
            remaining_minutes: remaining,
            optimal_session_length: optimal,
            days_until_deadline: days,
            is_review_due: review,
            recommended_technique: StudyTechnique::Pomodoro,
        })
}

/// Up to four non-overlapping blocks between 06:00 and 23:00
fn arb_blocks() -> impl Strategy<Value = Vec<TimeBlock>> {
    proptest::collection::vec((0u32..=60u32, 0u32..=240u32), 0..4).prop_map(|spans| {
        let mut cursor = 6 * 60;
        let mut blocks = Vec::new();
        for (gap, length) in spans {
            let start = cursor + gap;
            let end = (start + length).min(23 * 60);
            if start >= end {
                break;
            }
            blocks.push(TimeBlock::new((start / 60, start % 60), (end / 60, end % 60)));
            cursor = end;
        }
        blocks
    })
}

fn arb_subject(index: usize) -> impl Strategy<Value = Subject> {
    (
        -10i64..=90i64,  // days to deadline
        0u8..=7u8,       // difficulty, including out of range
        0u32..=200u32,   // estimated hours
        0u32..=250u32,   // completed hours
    )
        .prop_map(move |(days, difficulty, estimated, completed)| {
            TestDataFactory::create_subject(
                &format!("subject-{index}"),
                "Generated",
                days,
                difficulty,
                estimated as f64,
                completed as f64,
                1,
            )
        })
}

// ============================================================================
// RETENTION
// ============================================================================

proptest! {
    #[test]
    fn prop_failed_recall_resets(
        quality in 0.0f64..3.0f64,
        ease in arb_ease(),
        interval in 1u32..=365u32,
        count in 0u32..=50u32,
    ) {
        let r = next_review(quality, ease, interval, count, TestDataFactory::now());
        prop_assert_eq!(r.interval, 1);
        prop_assert_eq!(r.review_count, 0);
    }

    #[test]
    fn prop_ease_never_below_floor(
        quality in 0.0f64..=5.0f64,
        ease in arb_ease(),
        interval in 1u32..=365u32,
        count in 0u32..=50u32,
    ) {
        let r = next_review(quality, ease, interval, count, TestDataFactory::now());
        prop_assert!(r.ease_factor >= 1.3);
    }

    #[test]
    fn prop_passing_recall_never_shrinks_interval_after_second_review(
        quality in 3.0f64..=5.0f64,
        ease in arb_ease(),
        interval in 6u32..=365u32,
        count in 2u32..=50u32,
    ) {
        let r = next_review(quality, ease, interval, count, TestDataFactory::now());
        prop_assert!(r.interval >= interval);
        prop_assert_eq!(r.review_count, count + 1);
    }

    #[test]
    fn prop_never_reviewed_is_always_due(
        difficulty in 1u8..=5u8,
        interval in 1u32..=365u32,
        hours in -1000i64..=100_000i64,
    ) {
        let mut topic = Topic::new("t", "s", difficulty);
        topic.review_interval = interval;
        let now = TestDataFactory::now() + Duration::hours(hours);
        let topics = vec![topic];
        prop_assert_eq!(RetentionModel::new().due_for_review(&topics, now).len(), 1);
    }

    #[test]
    fn prop_retention_strictly_decreasing(
        days in 0.01f64..50.0f64,
        step in 0.01f64..10.0f64,
        ease in arb_ease(),
    ) {
        let earlier = retention_probability(days, ease, 1.0);
        let later = retention_probability(days + step, ease, 1.0);
        prop_assert!(later < earlier);
        prop_assert!((0.0..=1.0).contains(&later));
    }
}

// ============================================================================
// SCHEDULING
// ============================================================================

proptest! {
    #[test]
    fn prop_day_packing_respects_slot_and_overlap(
        tasks in proptest::collection::vec(arb_task(), 0..12),
        blocks in arb_blocks(),
        preferred in 15u32..=90u32,
        gap in 0u32..=30u32,
        max_daily in 0i64..=600i64,
    ) {
        let optimizer = ScheduleOptimizer::new();
        let pattern = ProductivityPatternAnalyzer::new().default_pattern();
        let constraints = ScheduleConstraints {
            preferred_session_length: preferred,
            min_break_between_sessions: gap,
            max_daily_minutes: max_daily,
        };
        let date = NaiveDate::from_ymd_opt(2026, 3, 3).unwrap();
        let mut ids = SequentialIdProvider::new();

        let day = optimizer.schedule_day_optimally(tasks, &blocks, date, &pattern, &constraints, &mut ids);

        let mut sessions = day.sessions.clone();
        sessions.sort_by_key(|s| s.start_time);
        for session in &sessions {
            prop_assert!(session.duration_minutes >= 30);
            prop_assert!(blocks.iter().any(|b| session.start_time >= b.start && session.end_time <= b.end));
        }
        for pair in sessions.windows(2) {
            prop_assert!(pair[1].start_time >= pair[0].end_time);
        }
        let planned: i64 = sessions.iter().map(|s| s.duration_minutes as i64).sum();
        prop_assert!(planned <= max_daily.max(0));
        prop_assert!(day.remaining_tasks.iter().all(|t| t.remaining_minutes > 0));
    }

    #[test]
    fn prop_plan_confidence_bounded(days_ahead in 0u32..=21u32) {
        let snapshot = TestDataFactory::create_semester_scenario();
        let pattern = ProductivityPatternAnalyzer::new().analyze(&snapshot.sessions);
        let mut ids = SequentialIdProvider::new();
        let plan = ScheduleOptimizer::new().generate_optimal_schedule(
            &snapshot.subjects,
            &snapshot.sessions,
            &snapshot.preferences,
            &pattern,
            days_ahead,
            TestDataFactory::now(),
            &mut ids,
        );
        prop_assert_eq!(plan.days.len(), days_ahead as usize);
        prop_assert!((0.3..=1.0).contains(&plan.confidence));
    }
}

// ============================================================================
// PREDICTION AND PATTERNS
// ============================================================================

proptest! {
    #[test]
    fn prop_deadline_probability_bounded(
        subjects in (0usize..8).prop_flat_map(|n| (0..n).map(arb_subject).collect::<Vec<_>>()),
        velocity in 0.0f64..12.0f64,
    ) {
        let forecasts = PerformancePredictor::new().predict_deadline_success(
            &subjects,
            &[],
            velocity,
            TestDataFactory::now(),
        );
        prop_assert_eq!(forecasts.len(), subjects.len());
        for forecast in &forecasts {
            prop_assert!((0.05..=0.95).contains(&forecast.probability));
        }
        for pair in forecasts.windows(2) {
            prop_assert!(pair[0].probability <= pair[1].probability);
        }
    }

    #[test]
    fn prop_analyze_is_idempotent(sessions in arb_sessions()) {
        let analyzer = ProductivityPatternAnalyzer::new();
        let first = analyzer.analyze(&sessions);
        let second = analyzer.analyze(&sessions);
        prop_assert_eq!(&first, &second);
        for value in first.hourly_productivity {
            prop_assert!((0.0..=1.0).contains(&value));
        }
    }
}
