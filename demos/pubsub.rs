//! Pub/sub example: one thread publishes, the main thread fetches.
//!
//! Run with: cargo run --example pubsub

use std::thread;
use std::time::Duration;

use simple_redis::{Interrupts, Message, RedisResult};

fn main() -> RedisResult<()> {
    let mut subscriber = simple_redis::create("redis://127.0.0.1:6379/")?;
    subscriber.subscribe("important_notifications")?;
    subscriber.psubscribe("*_notifications")?;

    let publisher = thread::spawn(|| -> RedisResult<()> {
        let mut client = simple_redis::create("redis://127.0.0.1:6379/")?;
        for index in 0..5 {
            thread::sleep(Duration::from_millis(200));
            client.publish("important_notifications", &format!("message {}", index))?;
            client.publish("other_notifications", "pattern message")?;
        }
        Ok(())
    });

    let mut received = 0;
    let mut polls = 0;
    subscriber.fetch_messages(
        &mut |message: Message| -> bool {
            let payload: String = message.get_payload().unwrap_or_default();
            match message.get_pattern::<String>() {
                Ok(pattern) => println!("[{}] {}: {}", pattern, message.get_channel_name(), payload),
                Err(_) => println!("{}: {}", message.get_channel_name(), payload),
            }
            received += 1;
            received == 10
        },
        &mut || -> Interrupts {
            polls += 1;
            Interrupts {
                // give up after roughly five seconds
                stop: polls > 50,
                next_polling_time: Some(100),
            }
        },
    )?;

    if let Ok(result) = publisher.join() {
        result?;
    }

    subscriber.unsubscribe_all()?;
    println!("Received {} messages", received);

    Ok(())
}
