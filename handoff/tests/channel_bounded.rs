use handoff::sync::{Capacity, Channel, ChannelBuilder, ConfigError};
use handoff::task;
use handoff::time::timeout;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

#[handoff::test]
async fn sends_up_to_capacity_without_suspending() {
    let channel = Channel::new(3);

    for value in 0..3 {
        timeout(Duration::from_millis(100), channel.send(value))
            .await
            .expect("send within capacity must not suspend")
            .unwrap();
    }

    assert_eq!(channel.len(), 3);

    let overflow = timeout(Duration::from_millis(30), channel.send(3)).await;
    assert!(overflow.is_err(), "send beyond capacity must suspend");

    // The cancelled send left the buffer untouched.
    assert_eq!(channel.len(), 3);
    assert_eq!(channel.waiting_senders(), 0);
}

#[handoff::test]
async fn receive_frees_a_slot_for_a_suspended_sender() {
    let channel = Channel::new(1);
    channel.send(1).await.unwrap();

    let done = Arc::new(AtomicBool::new(false));
    let sender = channel.clone();
    let flag = done.clone();
    let handle = task::spawn(async move {
        sender.send(2).await.unwrap();
        flag.store(true, Ordering::SeqCst);
    });

    while channel.waiting_senders() < 1 {
        handoff::yield_now().await;
    }
    assert!(!done.load(Ordering::SeqCst));

    assert_eq!(channel.receive().await, Ok(1));
    handle.await.unwrap();

    assert!(done.load(Ordering::SeqCst));
    assert_eq!(channel.len(), 1);
    assert_eq!(channel.receive().await, Ok(2));
}

#[handoff::test]
async fn fifo_across_buffer_and_suspended_senders() {
    let channel = Channel::new(2);

    let sender = channel.clone();
    let producer = task::spawn(async move {
        for value in 1..=5 {
            sender.send(value).await.unwrap();
        }
    });

    while channel.waiting_senders() < 1 {
        handoff::yield_now().await;
    }

    let mut received = Vec::new();
    for _ in 0..5 {
        received.push(channel.receive().await.unwrap());
    }

    producer.await.unwrap();
    assert_eq!(received, vec![1, 2, 3, 4, 5]);
}

#[handoff::test]
async fn try_send_reports_full_buffer() {
    let channel = Channel::new(1);

    assert!(channel.try_send('a').is_ok());

    let err = channel.try_send('b').unwrap_err();
    assert!(!err.is_closed());
    assert_eq!(err.into_inner(), 'b');

    assert_eq!(channel.try_receive(), Ok('a'));
    assert!(channel.is_empty());
}

#[test]
fn builder_and_parsed_capacity() {
    let channel = Channel::<u8>::builder().capacity(4).build::<u8>();
    assert_eq!(channel.capacity(), Capacity::new(4));
    assert!(!channel.capacity().is_rendezvous());

    assert_eq!(
        Capacity::try_from(-1i64),
        Err(ConfigError::NegativeCapacity(-1))
    );
    assert!(matches!(
        "many".parse::<Capacity>(),
        Err(ConfigError::Unparsable(_))
    ));

    let capacity: Capacity = "rendezvous".parse().unwrap();
    let channel = ChannelBuilder::new().capacity_from(capacity).build::<u8>();
    assert!(channel.capacity().is_rendezvous());
}
