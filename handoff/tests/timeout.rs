use handoff::task;
use handoff::time::{Elapsed, sleep, timeout};
use std::time::{Duration, Instant};

#[handoff::test]
async fn test_timeout_completes_before_deadline() {
    let handle = task::spawn(async {
        sleep(Duration::from_millis(10)).await;
        123
    });

    let result = timeout(Duration::from_millis(500), handle).await;

    assert!(
        matches!(result, Ok(Ok(123))),
        "Timeout should return the task output"
    );
}

#[handoff::test]
async fn test_timeout_expires() {
    let handle = task::spawn(async {
        sleep(Duration::from_millis(300)).await;
        456
    });
    let result = timeout(Duration::from_millis(20), handle).await;

    assert!(result.is_err(), "deadline should be exceeded");
}

#[handoff::test]
async fn test_elapsed_display() {
    let err: Elapsed = timeout(Duration::ZERO, std::future::pending::<()>())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "deadline has elapsed");
}

#[handoff::test]
async fn test_sleep_waits_at_least_duration() {
    let start = Instant::now();
    sleep(Duration::from_millis(30)).await;

    assert!(start.elapsed() >= Duration::from_millis(30));
}

#[handoff::test]
async fn test_yield_now_lets_other_tasks_run() {
    let handle = task::spawn(async { 1 });

    while !handle.is_finished() {
        handoff::yield_now().await;
    }

    assert_eq!(handle.await.unwrap(), 1);
}

#[handoff::test(worker_threads = 1)]
async fn test_timeout_with_max_duration_never_expires() {
    let result = timeout(Duration::MAX, async { 7 }).await;
    assert_eq!(result, Ok(7));

    let handle = task::spawn(async {
        sleep(Duration::from_millis(10)).await;
        "done"
    });
    assert!(matches!(
        timeout(Duration::MAX, handle).await,
        Ok(Ok("done"))
    ));
}

#[handoff::test(worker_threads = 1)]
async fn test_unrepresentable_sleep_loses_select() {
    let winner = handoff::select! {
        sleep(Duration::MAX) => |_| "sleep",
        sleep(Duration::from_millis(5)) => |_| "short",
    };

    assert_eq!(winner, "short");
}
