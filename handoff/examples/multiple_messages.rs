//! Example: a producer streams messages until it closes the channel.

use handoff::sync::Channel;
use handoff::task;

#[handoff::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let channel = Channel::rendezvous();

    let sender = channel.clone();
    let producer = task::spawn(async move {
        for value in [1, 2, 3, 4, 5] {
            if let Err(err) = sender.send(value).await {
                log::warn!("could not send {}: channel closed", err.into_inner());
                return;
            }
        }
        sender.close();
    });

    while let Ok(value) = channel.receive().await {
        log::info!("received {value}");
    }
    log::info!("channel closed, all messages received");

    let _ = producer.await;
}
