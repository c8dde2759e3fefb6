use handoff::sync::{Channel, ChannelClosed, TryRecvError, TrySendError};
use handoff::task;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[handoff::test]
async fn send_waits_for_a_receiver() {
    let channel = Channel::rendezvous();
    let delivered = Arc::new(AtomicBool::new(false));

    let sender = channel.clone();
    let flag = delivered.clone();
    let handle = task::spawn(async move {
        sender.send(7).await.unwrap();
        flag.store(true, Ordering::SeqCst);
    });

    while channel.waiting_senders() < 1 {
        handoff::yield_now().await;
    }

    assert!(
        !delivered.load(Ordering::SeqCst),
        "send must not complete before a receive"
    );
    assert_eq!(channel.waiting_senders(), 1);
    assert_eq!(channel.len(), 0);

    assert_eq!(channel.receive().await, Ok(7));
    handle.await.unwrap();

    assert!(delivered.load(Ordering::SeqCst));
    assert_eq!(channel.waiting_senders(), 0);
}

#[handoff::test]
async fn receive_waits_for_a_sender() {
    let channel = Channel::rendezvous();

    let receiver = channel.clone();
    let handle = task::spawn(async move { receiver.receive().await });

    while channel.waiting_receivers() < 1 {
        handoff::yield_now().await;
    }

    channel.send("hello").await.unwrap();

    assert_eq!(handle.await.unwrap(), Ok("hello"));
    assert_eq!(channel.waiting_receivers(), 0);
}

#[handoff::test]
async fn fifo_from_single_producer() {
    let channel = Channel::rendezvous();

    let sender = channel.clone();
    let producer = task::spawn(async move {
        for value in 1..=5 {
            sender.send(value).await.unwrap();
        }
    });

    let mut received = Vec::new();
    for _ in 0..5 {
        received.push(channel.receive().await.unwrap());
    }

    producer.await.unwrap();
    assert_eq!(received, vec![1, 2, 3, 4, 5]);
}

#[handoff::test]
async fn try_operations_on_rendezvous() {
    let channel = Channel::rendezvous();

    assert_eq!(channel.try_receive(), Err(TryRecvError::Empty));
    assert_eq!(channel.try_send(1), Err(TrySendError::Full(1)));

    let sender = channel.clone();
    let handle = task::spawn(async move { sender.send(2).await });

    // Take the value of the parked sender without suspending.
    let value = loop {
        match channel.try_receive() {
            Ok(value) => break value,
            Err(TryRecvError::Empty) => handoff::yield_now().await,
            Err(TryRecvError::Closed) => unreachable!("channel is open"),
        }
    };

    assert_eq!(value, 2);
    assert_eq!(handle.await.unwrap(), Ok(()));

    channel.close();
    assert_eq!(channel.try_receive(), Err(TryRecvError::Closed));
    assert_eq!(channel.try_send(3), Err(TrySendError::Closed(3)));
    assert_eq!(channel.receive().await, Err(ChannelClosed));
}
