use chrono::NaiveDate;
use services::{AppServices, Clock, MoveDirection, NewSetInput};
use track_core::model::Category;
use track_core::stats::Window;
use track_core::time::fixed_now;

fn day(s: &str) -> NaiveDate {
    s.parse().expect("date")
}

fn app() -> AppServices {
    AppServices::new_in_memory(Clock::Fixed(fixed_now()), "owner@example.com".to_owned())
}

fn input(exercise: &str, date: &str, weight: f64, reps: u32) -> NewSetInput {
    NewSetInput {
        exercise: exercise.to_owned(),
        category: Category::Strength,
        weight,
        reps,
        date: day(date),
        count: 1,
    }
}

#[tokio::test]
async fn full_logging_and_stats_flow() {
    let app = app();
    let workouts = app.workouts();
    let progress = app.progress();

    // First session.
    let ids = workouts
        .log_sets(input("squat", "2024-01-10", 100.0, 5))
        .await
        .unwrap();
    workouts.set_completed(ids[0], true).await.unwrap();

    // Second session a week later, heavier.
    let ids = workouts
        .log_sets(input("squat", "2024-01-17", 110.0, 5))
        .await
        .unwrap();
    workouts.set_completed(ids[0], true).await.unwrap();

    let summary = progress
        .exercise_summary("squat", Window::Session, day("2024-01-17"))
        .await
        .unwrap();
    assert_eq!(summary.total_sets, 1);
    assert!((summary.max_weight - 110.0).abs() < f64::EPSILON);

    let comparison = progress
        .session_comparison("squat")
        .await
        .unwrap()
        .expect("two sessions logged");
    assert!(comparison.improved);
    assert_eq!(comparison.latest.date, day("2024-01-17"));
    assert_eq!(comparison.previous.unwrap().date, day("2024-01-10"));

    let dates = workouts.workout_dates().await.unwrap();
    assert_eq!(dates, vec![day("2024-01-17"), day("2024-01-10")]);
}

#[tokio::test]
async fn clone_reorder_and_clear_flow() {
    let app = app();
    let workouts = app.workouts();

    let ids = workouts
        .log_sets(input("squat", "2024-01-10", 100.0, 5))
        .await
        .unwrap();
    workouts
        .log_sets(input("row", "2024-01-10", 60.0, 8))
        .await
        .unwrap();
    workouts.set_completed(ids[0], true).await.unwrap();

    let cloned = workouts
        .clone_day(day("2024-01-10"), day("2024-01-12"))
        .await
        .unwrap();
    assert_eq!(cloned, 2);

    let plan = workouts.day_plan(day("2024-01-12")).await.unwrap();
    assert_eq!(plan.completed_sets, 0);

    workouts
        .move_exercise(day("2024-01-12"), "row", MoveDirection::Up)
        .await
        .unwrap();
    let plan = workouts.day_plan(day("2024-01-12")).await.unwrap();
    assert_eq!(plan.groups[0].exercises[0].exercise, "ROW");

    let removed = workouts.clear_day(day("2024-01-12")).await.unwrap();
    assert_eq!(removed, 2);

    // The source day is untouched.
    let plan = workouts.day_plan(day("2024-01-10")).await.unwrap();
    assert_eq!(plan.total_sets, 2);
}

#[tokio::test]
async fn invite_generation_and_redemption_flow() {
    let app = app();
    let invites = app.invites();

    let code = invites.generate("owner@example.com").await.unwrap();
    invites.redeem(&code, "friend@example.com").await.unwrap();

    let err = invites
        .redeem(&code, "friend@example.com")
        .await
        .unwrap_err();
    assert!(matches!(err, services::InviteError::AlreadyUsed));
}
