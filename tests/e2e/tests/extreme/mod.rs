//! Extreme suite entry: every scenario at many instants, checking bundle-wide invariants.

use chrono::Duration;
use studyplan_core::{RecommendationFacade, SequentialIdProvider, StudySnapshot};
use studyplan_e2e_tests::TestDataFactory;

fn scenarios() -> Vec<(&'static str, StudySnapshot)> {
    vec![
        ("semester", TestDataFactory::create_semester_scenario()),
        ("crunch", TestDataFactory::create_deadline_crunch_scenario()),
        ("burnout", TestDataFactory::create_burnout_scenario()),
        ("empty", TestDataFactory::create_empty_scenario()),
    ]
}

#[test]
fn test_invariants_hold_across_scenarios_and_instants() {
    let facade = RecommendationFacade::new();

    for (name, snapshot) in scenarios() {
        // every three hours over ten days, starting from the fixture anchor
        for step in 0..80 {
            let now = TestDataFactory::now() + Duration::hours(3 * step);
            let mut ids = SequentialIdProvider::new();
            let bundle = facade
                .generate_insights(&snapshot.subjects, &snapshot.sessions, &snapshot.preferences, now, &mut ids)
                .unwrap_or_else(|e| panic!("{name} at {now}: {e}"));

            let plan = &bundle.study_plan;
            assert!((0.3..=1.0).contains(&plan.confidence), "{name} at {now}");
            for session in plan.sessions() {
                assert!(session.duration_minutes >= 30, "{name} at {now}");
                if session.date == now.date_naive() {
                    assert!(session.start_time >= now.time(), "{name} scheduled in the past at {now}");
                }
            }
            for forecast in &bundle.deadlines {
                assert!((0.05..=0.95).contains(&forecast.probability), "{name} at {now}");
            }
            for prediction in &bundle.completion {
                assert!((0.1..=1.0).contains(&prediction.probability), "{name} at {now}");
                assert!(prediction.recommendations.len() <= 3);
            }
            assert!(bundle.recommendations.len() <= facade.config().max_recommendations);
            assert!(bundle.review_queue.len() <= facade.config().retention.max_reviews_per_day);
            let multiplier = bundle.velocity.motivation_multiplier;
            assert!((0.8..=1.2).contains(&multiplier), "{name} at {now}");
        }
    }
}
