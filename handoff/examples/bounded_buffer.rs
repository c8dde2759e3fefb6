//! Example: several producers and consumers sharing a bounded channel.

use handoff::sync::{Capacity, Channel, ChannelBuilder};
use handoff::task::JoinSet;
use handoff::time::sleep;
use std::time::Duration;

const PRODUCERS: usize = 3;
const CONSUMERS: usize = 2;
const MESSAGES: usize = 4;

#[handoff::main(worker_threads = 4)]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let capacity: Capacity = match std::env::var("HANDOFF_CAPACITY").as_deref().unwrap_or("2").parse() {
        Ok(capacity) => capacity,
        Err(err) => {
            log::error!("{err}");
            return;
        }
    };
    log::info!("channel capacity: {capacity}");

    let channel: Channel<(usize, usize)> = ChannelBuilder::new().capacity_from(capacity).build();

    let mut consumers = JoinSet::new();
    for consumer in 0..CONSUMERS {
        let channel = channel.clone();
        consumers.spawn(async move {
            let mut count = 0;
            while let Ok((producer, message)) = channel.receive().await {
                log::info!("consumer {consumer} got message {message} from producer {producer}");
                sleep(Duration::from_millis(20)).await;
                count += 1;
            }
            count
        });
    }

    let mut producers = JoinSet::new();
    for producer in 0..PRODUCERS {
        let channel = channel.clone();
        producers.spawn(async move {
            for message in 0..MESSAGES {
                channel.send((producer, message)).await?;
                log::debug!("producer {producer} buffered message {message}");
            }
            Ok::<_, handoff::sync::SendError<(usize, usize)>>(())
        });
    }

    for outcome in producers.join_all().await {
        if let Ok(Err(err)) = outcome {
            log::warn!("producer stopped early: {err}");
        }
    }
    channel.close();

    let received: usize = consumers.join_all().await.into_iter().flatten().sum();
    log::info!("{received} messages received in total");
}
