use handoff::sync::Channel;
use handoff::time::sleep;
use handoff::{Runtime, RuntimeBuilder};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn wait_until(condition: impl Fn() -> bool) {
    while !condition() {
        thread::yield_now();
    }
}

#[test]
fn test_drop_releases_suspended_receiver() {
    let rt = RuntimeBuilder::new().worker_threads(1).build();
    let channel = Channel::<u32>::rendezvous();
    let marker = Arc::new(());

    let receiver = channel.clone();
    let held = marker.clone();
    let handle = rt.spawn(async move {
        let _held = held;
        receiver.receive().await
    });

    wait_until(|| channel.waiting_receivers() == 1);
    drop(rt);

    assert_eq!(channel.waiting_receivers(), 0);
    assert_eq!(Arc::strong_count(&marker), 1, "task future must be dropped");
    assert!(handle.is_finished());

    let err = Runtime::new().block_on(handle).unwrap_err();
    assert!(err.is_cancelled());
}

#[test]
fn test_drop_returns_nothing_from_suspended_sender() {
    let rt = RuntimeBuilder::new().worker_threads(2).build();
    let channel = Channel::rendezvous();
    let value = Arc::new(());

    let sender = channel.clone();
    let sent = value.clone();
    let handle = rt.spawn(async move { sender.send(sent).await.is_ok() });

    wait_until(|| channel.waiting_senders() == 1);
    drop(rt);

    assert_eq!(channel.waiting_senders(), 0);
    assert_eq!(Arc::strong_count(&value), 1, "parked value must be dropped");
    assert!(channel.try_receive().is_err());
    assert!(handle.is_finished());
}

#[test]
fn test_drop_cancels_sleeping_task() {
    let rt = RuntimeBuilder::new().worker_threads(1).build();
    let marker = Arc::new(());

    let held = marker.clone();
    let handle = rt.spawn(async move {
        let _held = held;
        sleep(Duration::from_secs(3600)).await;
    });

    wait_until(|| Arc::strong_count(&marker) == 2);
    drop(rt);

    assert_eq!(Arc::strong_count(&marker), 1);
    assert!(handle.is_finished());
}

#[test]
fn test_completed_output_survives_drop() {
    let rt = RuntimeBuilder::new().worker_threads(1).build();

    let handle = rt.spawn(async { 7 });
    wait_until(|| handle.is_finished());
    drop(rt);

    assert_eq!(Runtime::new().block_on(handle).unwrap(), 7);
}
