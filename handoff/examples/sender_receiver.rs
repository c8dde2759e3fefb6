//! Example: one sender, one receiver on a rendezvous channel.
//!
//! Run with `RUST_LOG=trace` to see tasks park and wake.

use handoff::sync::Channel;
use handoff::task;
use handoff::time::sleep;
use std::time::Duration;

#[handoff::main(worker_threads = 2)]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let channel = Channel::rendezvous();

    let sender = channel.clone();
    let producer = task::spawn(async move {
        log::info!("sending 10");
        // Suspends until the receiver below picks the value up.
        sender.send(10).await?;
        log::info!("10 was received");
        Ok::<_, handoff::sync::SendError<i32>>(())
    });

    sleep(Duration::from_millis(100)).await;

    match channel.receive().await {
        Ok(value) => log::info!("received {value}"),
        Err(err) => log::error!("receive failed: {err}"),
    }

    match producer.await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => log::error!("send failed: {err}"),
        Err(err) => log::error!("producer failed: {err}"),
    }
}
