mod common;

use std::time::Duration;

use study_timer::tasks::tick_driver_task;
use tokio::time::{sleep, timeout};

use common::Fixture;

#[tokio::test(start_paused = true)]
async fn ticks_once_per_second_while_running() {
    let fx = Fixture::new(None);
    tokio::spawn(tick_driver_task(fx.state.clone()));

    fx.state.start_timer().await;
    sleep(Duration::from_millis(5_500)).await;
    assert_eq!(fx.state.get_timer_state().await.remaining_seconds, 1500 - 5);

    fx.state.pause_timer().await;
    sleep(Duration::from_secs(10)).await;
    assert_eq!(fx.state.get_timer_state().await.remaining_seconds, 1500 - 5);
}

#[tokio::test(start_paused = true)]
async fn countdown_runs_to_completion() {
    let fx = Fixture::new(None);
    fx.state.set_minutes(1).await.unwrap();
    let mut completions = fx.state.subscribe_completions();
    tokio::spawn(tick_driver_task(fx.state.clone()));

    fx.state.start_timer().await;
    let done = timeout(Duration::from_secs(120), completions.recv())
        .await
        .expect("countdown should finish")
        .unwrap();

    // The manual wall clock never moved, so no study time was measured
    assert_eq!(done.minutes, 0);
    assert!(!done.reported);

    let timer = fx.state.get_timer_state().await;
    assert!(!timer.running);
    assert_eq!(timer.remaining_seconds, 0);
    assert!(!*fx.state.running_tx.borrow());
}
