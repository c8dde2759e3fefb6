use handoff::sync::{Channel, TryRecvError};
use handoff::task;
use handoff::time::timeout;
use std::sync::Arc;
use std::time::Duration;

#[handoff::test]
async fn timed_out_receive_leaves_channel_unchanged() {
    let channel = Channel::<u32>::rendezvous();

    let result = timeout(Duration::from_millis(20), channel.receive()).await;
    assert!(result.is_err());
    assert_eq!(channel.waiting_receivers(), 0);

    // A later send pairs with a fresh receive, not the cancelled one.
    let receiver = channel.clone();
    let handle = task::spawn(async move { receiver.receive().await });

    channel.send(1).await.unwrap();
    assert_eq!(handle.await.unwrap(), Ok(1));
}

#[handoff::test]
async fn timed_out_send_drops_its_value() {
    let channel = Channel::rendezvous();
    let value = Arc::new(());

    let result = timeout(Duration::from_millis(20), channel.send(value.clone())).await;
    assert!(result.is_err());

    assert_eq!(Arc::strong_count(&value), 1, "cancelled value must be dropped");
    assert_eq!(channel.waiting_senders(), 0);
    assert_eq!(channel.try_receive(), Err(TryRecvError::Empty));
}

#[handoff::test]
async fn aborted_sender_is_not_delivered() {
    let channel = Channel::rendezvous();

    let sender = channel.clone();
    let handle = task::spawn(async move { sender.send("never").await });

    while channel.waiting_senders() < 1 {
        handoff::yield_now().await;
    }

    handle.abort();
    let err = handle.await.unwrap_err();
    assert!(err.is_cancelled());
    assert!(err.try_into_panic().unwrap_err().is_cancelled());

    assert_eq!(channel.waiting_senders(), 0);
    assert_eq!(channel.try_receive(), Err(TryRecvError::Empty));
}

#[handoff::test]
async fn aborted_receiver_does_not_consume() {
    let channel = Channel::new(1);

    let receiver = channel.clone();
    let handle = task::spawn(async move { receiver.receive().await });

    while channel.waiting_receivers() < 1 {
        handoff::yield_now().await;
    }
    handle.abort();
    assert!(handle.await.unwrap_err().is_cancelled());
    assert_eq!(channel.waiting_receivers(), 0);

    channel.send(5).await.unwrap();
    assert_eq!(channel.len(), 1);
    assert_eq!(channel.receive().await, Ok(5));
}
