//! Basic usage example for the simple-redis client.
//!
//! Run with: cargo run --example basic

use simple_redis::RedisResult;

fn main() -> RedisResult<()> {
    // No connection is opened yet, the first command connects
    let mut client = simple_redis::create("redis://127.0.0.1:6379/")?;

    client.set("my_key", "my_value")?;
    println!("GET my_key: {}", client.get_string("my_key")?);

    client.set("my_number", 500)?;
    let number: i64 = client.get("my_number")?;
    println!("GET my_number: {}", number);

    let count = client.incr("counter")?;
    println!("INCR counter: {}", count);

    client.hset("my_map", "field", 123)?;
    println!("HGETALL my_map: {:?}", client.hgetall("my_map")?);

    // Arbitrary commands
    let info: String = client.run_command("ECHO", vec!["raw command"])?;
    println!("ECHO: {}", info);

    for key in ["my_key", "my_number", "counter", "my_map"] {
        client.del(key)?;
    }

    client.quit()?;
    println!("Connection open after quit: {}", client.is_connection_open());

    Ok(())
}
