use handoff::RuntimeBuilder;
use handoff::sync::{Channel, ChannelClosed};
use std::thread;

#[test]
fn rendezvous_between_os_threads() {
    let channel = Channel::rendezvous();

    let sender = channel.clone();
    let producer = thread::spawn(move || {
        for value in 1..=5 {
            sender.send_blocking(value).unwrap();
        }
        sender.close();
    });

    let mut received = Vec::new();
    while let Ok(value) = channel.receive_blocking() {
        received.push(value);
    }

    producer.join().unwrap();
    assert_eq!(received, vec![1, 2, 3, 4, 5]);
}

#[test]
fn blocking_receivers_wake_on_close() {
    let channel = Channel::<u8>::new(2);

    let receivers: Vec<_> = (0..3)
        .map(|_| {
            let channel = channel.clone();
            thread::spawn(move || channel.receive_blocking())
        })
        .collect();

    while channel.waiting_receivers() < 3 {
        thread::yield_now();
    }
    channel.close();

    for receiver in receivers {
        assert_eq!(receiver.join().unwrap(), Err(ChannelClosed));
    }
}

#[test]
fn thread_feeds_runtime_task() {
    let rt = RuntimeBuilder::new().worker_threads(2).build();
    let channel = Channel::new(1);

    let sender = channel.clone();
    let producer = thread::spawn(move || {
        for word in ["hand", "off"] {
            sender.send_blocking(word.to_owned()).unwrap();
        }
        sender.close();
    });

    let joined = rt.block_on(async move {
        let mut joined = String::new();
        while let Ok(word) = channel.receive().await {
            joined.push_str(&word);
        }
        joined
    });

    producer.join().unwrap();
    assert_eq!(joined, "handoff");
}
