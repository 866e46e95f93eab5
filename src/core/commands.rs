//! One method per supported Redis command.

use std::collections::HashMap;
use std::str::FromStr;

use crate::core::Client;
use crate::types::{RedisArg, RedisBoolResult, RedisEmptyResult, RedisResult, RedisStringResult};

impl Client {
    /// Authenticates the current connection with a password (`AUTH`).
    ///
    /// Prefer putting the password in the connection string or on the
    /// [`ClientBuilder`](crate::ClientBuilder): it is then replayed whenever
    /// the client reconnects.
    pub fn auth(&mut self, password: &str) -> RedisEmptyResult {
        self.run_command_empty_response("AUTH", vec![password])
    }

    /// Echoes the provided value back from the server (`ECHO`).
    pub fn echo(&mut self, value: &str) -> RedisStringResult {
        self.run_command_string_response("ECHO", vec![value])
    }

    /// Posts a message to the given channel (`PUBLISH`).
    ///
    /// # Example
    ///
    /// ```no_run
    /// # let mut client = simple_redis::create("redis://127.0.0.1:6379/").unwrap();
    /// if let Err(error) = client.publish("important_notifications", "message text") {
    ///     println!("Publish error: {}", error);
    /// }
    /// ```
    pub fn publish(&mut self, channel: &str, message: &str) -> RedisEmptyResult {
        self.run_command_empty_response("PUBLISH", vec![channel, message])
    }

    /// Gets the value of a key and parses it into `T` (`GET`).
    ///
    /// # Arguments
    ///
    /// * `key` - The key to retrieve.
    ///
    /// # Errors
    ///
    /// A missing key or a value that does not parse as `T` is an error.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # let mut client = simple_redis::create("redis://127.0.0.1:6379/").unwrap();
    /// let counter = client.get::<i64>("my_counter").unwrap();
    /// ```
    pub fn get<T: FromStr>(&mut self, key: &str) -> RedisResult<T> {
        self.run_command_from_string_response("GET", vec![key])
    }

    /// Gets the value of a key as a string (`GET`).
    pub fn get_string(&mut self, key: &str) -> RedisStringResult {
        self.run_command_string_response("GET", vec![key])
    }

    /// Sets the string value of a key (`SET`).
    ///
    /// # Arguments
    ///
    /// * `key` - The key to set.
    /// * `value` - Any [`RedisArg`], written in its string form.
    pub fn set<T: RedisArg>(&mut self, key: &str, value: T) -> RedisEmptyResult {
        self.run_command_empty_response("SET", vec![key, &value.to_string()])
    }

    /// Sets the value of a key with an expiration in seconds (`SETEX`).
    pub fn setex<T: RedisArg>(&mut self, key: &str, value: T, seconds: u64) -> RedisEmptyResult {
        self.run_command_empty_response(
            "SETEX",
            vec![key, &seconds.to_string(), &value.to_string()],
        )
    }

    /// Sets the value of a key only if it does not exist yet (`SETNX`).
    pub fn setnx<T: RedisArg>(&mut self, key: &str, value: T) -> RedisEmptyResult {
        self.run_command_empty_response("SETNX", vec![key, &value.to_string()])
    }

    /// Sets a new value and returns the previous one parsed into `V` (`GETSET`).
    pub fn getset<T: RedisArg, V: FromStr>(&mut self, key: &str, value: T) -> RedisResult<V> {
        self.run_command_from_string_response::<V>("GETSET", vec![key, &value.to_string()])
    }

    /// Sets a new value and returns the previous one as a string (`GETSET`).
    pub fn getset_string<T: RedisArg>(&mut self, key: &str, value: T) -> RedisStringResult {
        self.run_command_string_response("GETSET", vec![key, &value.to_string()])
    }

    /// Removes the specified key (`DEL`).
    pub fn del(&mut self, key: &str) -> RedisEmptyResult {
        self.run_command_empty_response("DEL", vec![key])
    }

    /// Returns true if the key exists (`EXISTS`).
    pub fn exists(&mut self, key: &str) -> RedisBoolResult {
        self.run_command_bool_response("EXISTS", vec![key])
    }

    /// Sets a timeout on a key, in seconds (`EXPIRE`).
    pub fn expire(&mut self, key: &str, seconds: u64) -> RedisEmptyResult {
        self.run_command_empty_response("EXPIRE", vec![key, &seconds.to_string()])
    }

    /// Sets a timeout on a key, in milliseconds (`PEXPIRE`).
    pub fn pexpire(&mut self, key: &str, millis: u64) -> RedisEmptyResult {
        self.run_command_empty_response("PEXPIRE", vec![key, &millis.to_string()])
    }

    /// Removes the timeout of a key (`PERSIST`).
    pub fn persist(&mut self, key: &str) -> RedisEmptyResult {
        self.run_command_empty_response("PERSIST", vec![key])
    }

    /// Renames a key, overwriting `new_key` if it exists (`RENAME`).
    pub fn rename(&mut self, key: &str, new_key: &str) -> RedisEmptyResult {
        self.run_command_empty_response("RENAME", vec![key, new_key])
    }

    /// Renames a key only if `new_key` does not exist (`RENAMENX`).
    pub fn renamenx(&mut self, key: &str, new_key: &str) -> RedisEmptyResult {
        self.run_command_empty_response("RENAMENX", vec![key, new_key])
    }

    /// Appends a value to the string stored at key (`APPEND`).
    pub fn append(&mut self, key: &str, value: &str) -> RedisEmptyResult {
        self.run_command_empty_response("APPEND", vec![key, value])
    }

    /// Increments the number stored at key by one (`INCR`).
    ///
    /// # Returns
    ///
    /// The value of the key after the increment.
    pub fn incr(&mut self, key: &str) -> RedisResult<i64> {
        self.run_command::<i64>("INCR", vec![key])
    }

    /// Increments the number stored at key by the specified amount (`INCRBY`).
    pub fn incrby<T: RedisArg>(&mut self, key: &str, value: T) -> RedisResult<i64> {
        self.run_command::<i64>("INCRBY", vec![key, &value.to_string()])
    }

    /// Increments the float stored at key by the specified amount (`INCRBYFLOAT`).
    pub fn incrbyfloat<T: RedisArg>(&mut self, key: &str, value: T) -> RedisResult<f64> {
        self.run_command::<f64>("INCRBYFLOAT", vec![key, &value.to_string()])
    }

    /// Returns the length of the string stored at key (`STRLEN`).
    pub fn strlen(&mut self, key: &str) -> RedisResult<i32> {
        self.run_command::<i32>("STRLEN", vec![key])
    }

    /// Returns all keys matching the pattern (`KEYS`).
    pub fn keys(&mut self, pattern: &str) -> RedisResult<Vec<String>> {
        self.run_command::<Vec<String>>("KEYS", vec![pattern])
    }

    /// Gets a hash field and parses it into `T` (`HGET`).
    pub fn hget<T: FromStr>(&mut self, key: &str, field: &str) -> RedisResult<T> {
        self.run_command_from_string_response("HGET", vec![key, field])
    }

    /// Gets a hash field as a string (`HGET`).
    pub fn hget_string(&mut self, key: &str, field: &str) -> RedisStringResult {
        self.run_command_string_response("HGET", vec![key, field])
    }

    /// Gets all fields and values of a hash (`HGETALL`).
    ///
    /// # Example
    ///
    /// ```no_run
    /// # let mut client = simple_redis::create("redis://127.0.0.1:6379/").unwrap();
    /// let map = client.hgetall("my_map").unwrap();
    /// if let Some(value) = map.get("my_field") {
    ///     println!("my_field = {}", value);
    /// }
    /// ```
    pub fn hgetall(&mut self, key: &str) -> RedisResult<HashMap<String, String>> {
        self.run_command::<HashMap<String, String>>("HGETALL", vec![key])
    }

    /// Sets a hash field (`HSET`).
    pub fn hset<T: RedisArg>(&mut self, key: &str, field: &str, value: T) -> RedisEmptyResult {
        self.run_command_empty_response("HSET", vec![key, field, &value.to_string()])
    }

    /// Sets a hash field only if it does not exist yet (`HSETNX`).
    pub fn hsetnx<T: RedisArg>(&mut self, key: &str, field: &str, value: T) -> RedisEmptyResult {
        self.run_command_empty_response("HSETNX", vec![key, field, &value.to_string()])
    }

    /// Deletes a hash field (`HDEL`).
    pub fn hdel(&mut self, key: &str, field: &str) -> RedisEmptyResult {
        self.run_command_empty_response("HDEL", vec![key, field])
    }

    /// Returns true if the hash field exists (`HEXISTS`).
    pub fn hexists(&mut self, key: &str, field: &str) -> RedisBoolResult {
        self.run_command_bool_response("HEXISTS", vec![key, field])
    }

    /// Returns all field names of a hash (`HKEYS`).
    pub fn hkeys(&mut self, key: &str) -> RedisResult<Vec<String>> {
        self.run_command::<Vec<String>>("HKEYS", vec![key])
    }

    /// Returns all values of a hash (`HVALS`).
    pub fn hvals(&mut self, key: &str) -> RedisResult<Vec<String>> {
        self.run_command::<Vec<String>>("HVALS", vec![key])
    }

    /// Sets the list element at `index` (`LSET`).
    pub fn lset<T: RedisArg>(&mut self, key: &str, index: isize, value: T) -> RedisEmptyResult {
        self.run_command_empty_response(
            "LSET",
            vec![key, &index.to_string(), &value.to_string()],
        )
    }

    /// Gets the list element at `index` and parses it into `T` (`LINDEX`).
    pub fn lindex<T: FromStr>(&mut self, key: &str, index: isize) -> RedisResult<T> {
        self.run_command_from_string_response("LINDEX", vec![key, &index.to_string()])
    }

    /// Gets the list element at `index` as a string (`LINDEX`).
    pub fn lindex_string(&mut self, key: &str, index: isize) -> RedisStringResult {
        self.run_command_string_response("LINDEX", vec![key, &index.to_string()])
    }

    /// Returns the length of a list (`LLEN`).
    pub fn llen(&mut self, key: &str) -> RedisResult<i32> {
        self.run_command::<i32>("LLEN", vec![key])
    }

    /// Removes and returns the first list element, parsed into `T` (`LPOP`).
    pub fn lpop<T: FromStr>(&mut self, key: &str) -> RedisResult<T> {
        self.run_command_from_string_response("LPOP", vec![key])
    }

    /// Prepends a value to a list (`LPUSH`).
    pub fn lpush<T: RedisArg>(&mut self, key: &str, value: T) -> RedisEmptyResult {
        self.run_command_empty_response("LPUSH", vec![key, &value.to_string()])
    }

    /// Prepends a value to a list only if the list exists (`LPUSHX`).
    pub fn lpushx<T: RedisArg>(&mut self, key: &str, value: T) -> RedisEmptyResult {
        self.run_command_empty_response("LPUSHX", vec![key, &value.to_string()])
    }

    /// Returns the list elements between `start` and `stop`, inclusive (`LRANGE`).
    pub fn lrange(&mut self, key: &str, start: isize, stop: isize) -> RedisResult<Vec<String>> {
        self.run_command::<Vec<String>>(
            "LRANGE",
            vec![key, &start.to_string(), &stop.to_string()],
        )
    }

    /// Removes `count` occurrences of a value from a list (`LREM`).
    pub fn lrem<T: RedisArg>(&mut self, key: &str, count: isize, value: T) -> RedisEmptyResult {
        self.run_command_empty_response(
            "LREM",
            vec![key, &count.to_string(), &value.to_string()],
        )
    }

    /// Trims a list to the range between `start` and `stop` (`LTRIM`).
    pub fn ltrim(&mut self, key: &str, start: isize, stop: isize) -> RedisEmptyResult {
        self.run_command_empty_response(
            "LTRIM",
            vec![key, &start.to_string(), &stop.to_string()],
        )
    }

    /// Removes and returns the last list element, parsed into `T` (`RPOP`).
    pub fn rpop<T: FromStr>(&mut self, key: &str) -> RedisResult<T> {
        self.run_command_from_string_response("RPOP", vec![key])
    }

    /// Appends a value to a list (`RPUSH`).
    pub fn rpush<T: RedisArg>(&mut self, key: &str, value: T) -> RedisEmptyResult {
        self.run_command_empty_response("RPUSH", vec![key, &value.to_string()])
    }

    /// Appends a value to a list only if the list exists (`RPUSHX`).
    pub fn rpushx<T: RedisArg>(&mut self, key: &str, value: T) -> RedisEmptyResult {
        self.run_command_empty_response("RPUSHX", vec![key, &value.to_string()])
    }

    /// Adds a member to a set (`SADD`).
    ///
    /// # Returns
    ///
    /// The number of members added: 0 when it was already present.
    pub fn sadd(&mut self, key: &str, member: &str) -> RedisResult<i32> {
        self.run_command::<i32>("SADD", vec![key, member])
    }

    /// Returns the number of members in a set (`SCARD`).
    pub fn scard(&mut self, key: &str) -> RedisResult<i32> {
        self.run_command::<i32>("SCARD", vec![key])
    }

    /// Returns the members of the first set missing from all following sets (`SDIFF`).
    pub fn sdiff(&mut self, keys: Vec<&str>) -> RedisResult<Vec<String>> {
        self.run_command::<Vec<String>>("SDIFF", keys)
    }

    /// Returns true if `member` belongs to the set (`SISMEMBER`).
    pub fn sismember(&mut self, key: &str, member: &str) -> RedisBoolResult {
        self.run_command_bool_response("SISMEMBER", vec![key, member])
    }

    /// Returns all members of a set (`SMEMBERS`).
    pub fn smembers(&mut self, key: &str) -> RedisResult<Vec<String>> {
        self.run_command::<Vec<String>>("SMEMBERS", vec![key])
    }

    /// Moves a member from one set to another (`SMOVE`).
    pub fn smove(
        &mut self,
        source_key: &str,
        destination_key: &str,
        member: &str,
    ) -> RedisEmptyResult {
        self.run_command_empty_response("SMOVE", vec![source_key, destination_key, member])
    }

    /// Removes a member from a set (`SREM`).
    pub fn srem(&mut self, key: &str, member: &str) -> RedisEmptyResult {
        self.run_command_empty_response("SREM", vec![key, member])
    }

    /// Adds a member with a score to a sorted set (`ZADD`).
    pub fn zadd(&mut self, key: &str, score: f64, member: &str) -> RedisResult<i32> {
        self.run_command::<i32>("ZADD", vec![key, &score.to_string(), member])
    }

    /// Returns the sorted set members between `start` and `stop` by rank (`ZRANGE`).
    pub fn zrange(&mut self, key: &str, start: isize, stop: isize) -> RedisResult<Vec<String>> {
        self.run_command::<Vec<String>>(
            "ZRANGE",
            vec![key, &start.to_string(), &stop.to_string()],
        )
    }
}
