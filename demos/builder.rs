//! Example using ClientBuilder for advanced configuration.
//!
//! Run with: cargo run --example builder

use std::time::Duration;

use simple_redis::{ClientBuilder, RedisResult};

fn main() -> RedisResult<()> {
    let mut client = ClientBuilder::new()
        .address("redis://127.0.0.1:6379")
        .database(0)
        .client_name("builder-demo")
        .connection_timeout(Duration::from_secs(2))
        .read_timeout(Some(Duration::from_secs(5)))
        .write_timeout(Some(Duration::from_secs(5)))
        .build()?;

    client.set("builder_example", "Built with ClientBuilder")?;
    println!("Value: {}", client.get_string("builder_example")?);

    client.del("builder_example")?;
    client.quit()?;

    Ok(())
}
