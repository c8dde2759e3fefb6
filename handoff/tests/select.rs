use handoff::select;
use handoff::sync::Channel;
use handoff::time::sleep;
use std::time::Duration;

#[handoff::test]
async fn test_select_single_future() {
    let result = select! {
        async { 42 } => |v| v * 2,
    };

    assert_eq!(result, 84);
}

#[handoff::test]
async fn test_select_first_ready_branch_wins() {
    let result = select! {
        async { 10 } => |v| v,
        async { 20 } => |v| v,
    };

    assert_eq!(result, 10);
}

#[handoff::test]
async fn test_select_different_types() {
    let result = select! {
        sleep(Duration::from_millis(200)) => |_| String::from("slow"),
        async { "hello" } => |v| format!("string: {}", v),
    };

    assert_eq!(result, "string: hello");
}

#[handoff::test]
async fn test_select_pattern_binding() {
    let result = select! {
        async { (1, 2) } => |(a, b)| a + b,
        async { (3, 4) } => |(a, b)| a * b,
    };

    assert_eq!(result, 3);
}

#[handoff::test]
async fn test_select_cancels_losing_receive() {
    let channel = Channel::<u32>::new(1);

    let timed_out = select! {
        channel.receive() => |_| false,
        sleep(Duration::from_millis(20)) => |_| true,
    };

    assert!(timed_out);
    assert_eq!(channel.waiting_receivers(), 0);

    // The cancelled receive did not consume anything.
    channel.send(5).await.unwrap();
    assert_eq!(channel.receive().await, Ok(5));
}
