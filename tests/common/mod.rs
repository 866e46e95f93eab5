//! In-process RESP server used by the integration tests.
//!
//! Runs on its own thread with its own tokio runtime so the blocking client
//! under test can be driven from the test thread.

#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use simple_redis::proto::codec::{Decoder, Encoder};
use simple_redis::proto::frame::Frame;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, oneshot};

const WRONGTYPE: &str = "WRONGTYPE Operation against a key holding the wrong kind of value";
const NOT_INTEGER: &str = "ERR value is not an integer or out of range";
const NOT_FLOAT: &str = "ERR value is not a valid float";

pub struct MockServer {
    addr: SocketAddr,
    state: Arc<State>,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl MockServer {
    pub fn start() -> Self {
        Self::start_with_password(None)
    }

    pub fn start_with_password(password: Option<&str>) -> Self {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.set_nonblocking(true).unwrap();
        let addr = listener.local_addr().unwrap();

        let state = Arc::new(State::new(password.map(str::to_string)));
        let server_state = state.clone();
        let (shutdown, stopped) = oneshot::channel::<()>();

        let handle = thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            runtime.block_on(async move {
                let listener = TcpListener::from_std(listener).unwrap();
                tokio::select! {
                    _ = stopped => {}
                    _ = accept_loop(listener, server_state) => {}
                }
            });
        });

        Self {
            addr,
            state,
            shutdown: Some(shutdown),
            handle: Some(handle),
        }
    }

    pub fn url(&self) -> String {
        format!("redis://{}/", self.addr)
    }

    pub fn url_with_password(&self, password: &str) -> String {
        format!("redis://:{}@{}/", password, self.addr)
    }

    pub fn client(&self) -> simple_redis::Client {
        simple_redis::create(&self.url()).unwrap()
    }

    /// Number of connections accepted so far.
    pub fn connections(&self) -> usize {
        self.state.accepted.load(Ordering::SeqCst)
    }

    /// Closes every open client connection.
    pub fn kill_connections(&self) {
        let _ = self.state.kill.send(());
        // give the server tasks a moment to close their sockets
        thread::sleep(Duration::from_millis(50));
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

struct State {
    password: Option<String>,
    db: Mutex<HashMap<String, Entry>>,
    publisher: broadcast::Sender<(String, String)>,
    kill: broadcast::Sender<()>,
    accepted: AtomicUsize,
}

impl State {
    fn new(password: Option<String>) -> Self {
        Self {
            password,
            db: Mutex::new(HashMap::new()),
            publisher: broadcast::channel(1024).0,
            kill: broadcast::channel(16).0,
            accepted: AtomicUsize::new(0),
        }
    }
}

struct Entry {
    value: Value,
    expires_at: Option<Instant>,
}

impl Entry {
    fn new(value: Value) -> Self {
        Self {
            value,
            expires_at: None,
        }
    }
}

enum Value {
    Str(String),
    Hash(BTreeMap<String, String>),
    List(VecDeque<String>),
    Set(BTreeSet<String>),
    ZSet(Vec<(f64, String)>),
}

async fn accept_loop(listener: TcpListener, state: Arc<State>) {
    loop {
        let (socket, _) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(_) => return,
        };
        state.accepted.fetch_add(1, Ordering::SeqCst);
        tokio::spawn(handle_connection(socket, state.clone()));
    }
}

async fn handle_connection(mut socket: TcpStream, state: Arc<State>) {
    let mut session = Session::new(state.password.is_none());
    let mut killed = state.kill.subscribe();
    let mut decoder = Decoder::new();
    let mut encoder = Encoder::new();
    let mut buf = [0u8; 4096];

    loop {
        tokio::select! {
            read = socket.read(&mut buf) => {
                let n = match read {
                    Ok(0) | Err(_) => return,
                    Ok(n) => n,
                };
                decoder.append(&buf[..n]);
                while let Ok(Some(frame)) = decoder.decode() {
                    for reply in session.dispatch(&state, frame) {
                        encoder.encode(&reply);
                    }
                    if session.closing {
                        break;
                    }
                }
            }
            published = next_published(&mut session.published) => {
                match published {
                    Ok((channel, payload)) => {
                        for frame in session.deliveries(&channel, &payload) {
                            encoder.encode(&frame);
                        }
                    }
                    Err(RecvError::Lagged(_)) => {}
                    Err(RecvError::Closed) => return,
                }
            }
            _ = killed.recv() => return,
        }

        let data = encoder.take();
        if !data.is_empty() && socket.write_all(&data).await.is_err() {
            return;
        }
        if session.closing {
            return;
        }
    }
}

async fn next_published(
    receiver: &mut Option<broadcast::Receiver<(String, String)>>,
) -> Result<(String, String), RecvError> {
    match receiver {
        Some(receiver) => receiver.recv().await,
        None => std::future::pending().await,
    }
}

struct Session {
    authenticated: bool,
    channels: BTreeSet<String>,
    patterns: BTreeSet<String>,
    published: Option<broadcast::Receiver<(String, String)>>,
    closing: bool,
}

impl Session {
    fn new(authenticated: bool) -> Self {
        Self {
            authenticated,
            channels: BTreeSet::new(),
            patterns: BTreeSet::new(),
            published: None,
            closing: false,
        }
    }

    fn in_pubsub(&self) -> bool {
        !self.channels.is_empty() || !self.patterns.is_empty()
    }

    fn subscription_count(&self) -> i64 {
        (self.channels.len() + self.patterns.len()) as i64
    }

    fn dispatch(&mut self, state: &State, frame: Frame) -> Vec<Frame> {
        let args: Vec<String> = match frame {
            Frame::Array(items) => items.into_iter().map(text).collect(),
            _ => return vec![error("ERR Protocol error: expected array")],
        };
        let Some((name, args)) = args.split_first() else {
            return vec![error("ERR Protocol error: empty command")];
        };
        let name = name.to_ascii_uppercase();

        match name.as_str() {
            "QUIT" => {
                self.closing = true;
                vec![ok()]
            }
            "AUTH" => vec![self.auth(state, args)],
            _ if !self.authenticated => vec![error("NOAUTH Authentication required.")],
            "SUBSCRIBE" => self.subscribe(state, args, false),
            "PSUBSCRIBE" => self.subscribe(state, args, true),
            "UNSUBSCRIBE" => self.unsubscribe(args, false),
            "PUNSUBSCRIBE" => self.unsubscribe(args, true),
            "PING" if self.in_pubsub() => vec![Frame::Array(vec![bulk("pong"), bulk("")])],
            _ if self.in_pubsub() => vec![error(
                "ERR only (P)SUBSCRIBE / (P)UNSUBSCRIBE / PING / QUIT allowed in this context",
            )],
            "PING" => vec![Frame::SimpleString(b"PONG".to_vec())],
            "ECHO" if args.len() == 1 => vec![bulk(&args[0])],
            "SELECT" | "CLIENT" => vec![ok()],
            "PUBLISH" if args.len() == 2 => {
                let receivers = state
                    .publisher
                    .send((args[0].clone(), args[1].clone()))
                    .unwrap_or(0);
                vec![Frame::Integer(receivers as i64)]
            }
            _ => {
                let mut db = state.db.lock().unwrap();
                let now = Instant::now();
                db.retain(|_, entry| entry.expires_at.map_or(true, |at| at > now));
                vec![execute(&mut db, &name, args).unwrap_or_else(|reply| reply)]
            }
        }
    }

    fn auth(&mut self, state: &State, args: &[String]) -> Frame {
        let Some(expected) = &state.password else {
            return error("ERR AUTH <password> called without any password configured for the default user");
        };
        match args.last() {
            Some(password) if password == expected => {
                self.authenticated = true;
                ok()
            }
            _ => error("WRONGPASS invalid username-password pair or user is disabled."),
        }
    }

    fn subscribe(&mut self, state: &State, names: &[String], pattern: bool) -> Vec<Frame> {
        if self.published.is_none() {
            self.published = Some(state.publisher.subscribe());
        }
        let kind = if pattern { "psubscribe" } else { "subscribe" };
        names
            .iter()
            .map(|name| {
                if pattern {
                    self.patterns.insert(name.clone());
                } else {
                    self.channels.insert(name.clone());
                }
                confirmation(kind, Some(name), self.subscription_count())
            })
            .collect()
    }

    fn unsubscribe(&mut self, names: &[String], pattern: bool) -> Vec<Frame> {
        let kind = if pattern { "punsubscribe" } else { "unsubscribe" };
        let names: Vec<String> = if names.is_empty() {
            let current = if pattern { &self.patterns } else { &self.channels };
            current.iter().cloned().collect()
        } else {
            names.to_vec()
        };

        let mut replies = Vec::new();
        for name in &names {
            if pattern {
                self.patterns.remove(name);
            } else {
                self.channels.remove(name);
            }
            replies.push(confirmation(kind, Some(name), self.subscription_count()));
        }
        if replies.is_empty() {
            replies.push(confirmation(kind, None, self.subscription_count()));
        }
        if !self.in_pubsub() {
            self.published = None;
        }
        replies
    }

    fn deliveries(&self, channel: &str, payload: &str) -> Vec<Frame> {
        let mut frames = Vec::new();
        if self.channels.contains(channel) {
            frames.push(Frame::Array(vec![
                bulk("message"),
                bulk(channel),
                bulk(payload),
            ]));
        }
        for pattern in &self.patterns {
            if glob_match(pattern.as_bytes(), channel.as_bytes()) {
                frames.push(Frame::Array(vec![
                    bulk("pmessage"),
                    bulk(pattern),
                    bulk(channel),
                    bulk(payload),
                ]));
            }
        }
        frames
    }
}

type Reply = Result<Frame, Frame>;

fn execute(db: &mut HashMap<String, Entry>, name: &str, args: &[String]) -> Reply {
    let arity = match name {
        "GET" | "DEL" | "EXISTS" | "PERSIST" | "INCR" | "STRLEN" | "KEYS" | "HGETALL"
        | "HKEYS" | "HVALS" | "LLEN" | "LPOP" | "RPOP" | "SCARD" | "SMEMBERS" | "SDIFF" => 1,
        "SET" | "SETNX" | "GETSET" | "EXPIRE" | "PEXPIRE" | "RENAME" | "RENAMENX" | "APPEND"
        | "INCRBY" | "INCRBYFLOAT" | "HGET" | "HDEL" | "HEXISTS" | "LINDEX" | "LPUSH"
        | "LPUSHX" | "RPUSH" | "RPUSHX" | "SADD" | "SISMEMBER" | "SREM" => 2,
        "SETEX" | "HSET" | "HSETNX" | "LSET" | "LRANGE" | "LREM" | "LTRIM" | "SMOVE" | "ZADD"
        | "ZRANGE" => 3,
        _ => {
            return Err(error(&format!(
                "ERR unknown command '{}'",
                name.to_ascii_lowercase()
            )))
        }
    };
    if args.len() < arity {
        return Err(error(&format!(
            "ERR wrong number of arguments for '{}' command",
            name.to_ascii_lowercase()
        )));
    }

    let key = args[0].as_str();
    match name {
        "GET" => Ok(optional(string(db, key)?.cloned())),
        "SET" => {
            db.insert(key.to_string(), Entry::new(Value::Str(args[1].clone())));
            Ok(ok())
        }
        "SETEX" => {
            let seconds = integer(&args[1])?;
            let mut entry = Entry::new(Value::Str(args[2].clone()));
            entry.expires_at = Some(Instant::now() + Duration::from_secs(seconds.max(0) as u64));
            db.insert(key.to_string(), entry);
            Ok(ok())
        }
        "SETNX" => {
            if db.contains_key(key) {
                return Ok(Frame::Integer(0));
            }
            db.insert(key.to_string(), Entry::new(Value::Str(args[1].clone())));
            Ok(Frame::Integer(1))
        }
        "GETSET" => {
            let previous = string(db, key)?.cloned();
            db.insert(key.to_string(), Entry::new(Value::Str(args[1].clone())));
            Ok(optional(previous))
        }
        "DEL" => Ok(count(args.iter().filter(|k| db.remove(k.as_str()).is_some()))),
        "EXISTS" => Ok(count(args.iter().filter(|k| db.contains_key(k.as_str())))),
        "EXPIRE" | "PEXPIRE" => {
            let amount = integer(&args[1])?.max(0) as u64;
            let ttl = if name == "EXPIRE" {
                Duration::from_secs(amount)
            } else {
                Duration::from_millis(amount)
            };
            match db.get_mut(key) {
                Some(entry) => {
                    entry.expires_at = Some(Instant::now() + ttl);
                    Ok(Frame::Integer(1))
                }
                None => Ok(Frame::Integer(0)),
            }
        }
        "PERSIST" => match db.get_mut(key) {
            Some(entry) if entry.expires_at.is_some() => {
                entry.expires_at = None;
                Ok(Frame::Integer(1))
            }
            _ => Ok(Frame::Integer(0)),
        },
        "RENAME" | "RENAMENX" => {
            if !db.contains_key(key) {
                return Err(error("ERR no such key"));
            }
            if name == "RENAMENX" && db.contains_key(&args[1]) {
                return Ok(Frame::Integer(0));
            }
            if let Some(entry) = db.remove(key) {
                db.insert(args[1].clone(), entry);
            }
            Ok(if name == "RENAME" { ok() } else { Frame::Integer(1) })
        }
        "APPEND" => {
            let value = string_mut(db, key)?;
            value.push_str(&args[1]);
            Ok(Frame::Integer(value.len() as i64))
        }
        "INCR" | "INCRBY" => {
            let delta = if name == "INCR" { 1 } else { integer(&args[1])? };
            let value = string_mut(db, key)?;
            let current = if value.is_empty() { 0 } else { integer(value)? };
            let next = current
                .checked_add(delta)
                .ok_or_else(|| error("ERR increment or decrement would overflow"))?;
            *value = next.to_string();
            Ok(Frame::Integer(next))
        }
        "INCRBYFLOAT" => {
            let delta = float(&args[1])?;
            let value = string_mut(db, key)?;
            let current = if value.is_empty() { 0.0 } else { float(value)? };
            *value = (current + delta).to_string();
            Ok(bulk(value))
        }
        "STRLEN" => Ok(Frame::Integer(
            string(db, key)?.map_or(0, |value| value.len()) as i64,
        )),
        "KEYS" => {
            let mut keys: Vec<&String> = db
                .keys()
                .filter(|k| glob_match(key.as_bytes(), k.as_bytes()))
                .collect();
            keys.sort();
            Ok(Frame::Array(keys.into_iter().map(|k| bulk(k)).collect()))
        }
        "HGET" => Ok(optional(
            hash(db, key)?.and_then(|h| h.get(&args[1])).cloned(),
        )),
        "HGETALL" => Ok(Frame::Array(
            hash(db, key)?
                .map(|h| {
                    h.iter()
                        .flat_map(|(field, value)| [bulk(field), bulk(value)])
                        .collect()
                })
                .unwrap_or_default(),
        )),
        "HSET" => {
            let added = hash_mut(db, key)?
                .insert(args[1].clone(), args[2].clone())
                .is_none();
            Ok(Frame::Integer(added as i64))
        }
        "HSETNX" => {
            let fields = hash_mut(db, key)?;
            if fields.contains_key(&args[1]) {
                return Ok(Frame::Integer(0));
            }
            fields.insert(args[1].clone(), args[2].clone());
            Ok(Frame::Integer(1))
        }
        "HDEL" => {
            if hash(db, key)?.is_none() {
                return Ok(Frame::Integer(0));
            }
            let fields = hash_mut(db, key)?;
            let removed = count(args[1..].iter().filter(|f| fields.remove(f.as_str()).is_some()));
            remove_if_empty(db, key);
            Ok(removed)
        }
        "HEXISTS" => Ok(Frame::Integer(
            hash(db, key)?.map_or(false, |h| h.contains_key(&args[1])) as i64,
        )),
        "HKEYS" => Ok(array(hash(db, key)?.into_iter().flat_map(|h| h.keys()))),
        "HVALS" => Ok(array(hash(db, key)?.into_iter().flat_map(|h| h.values()))),
        "LSET" => {
            let index = integer(&args[1])?;
            if list(db, key)?.is_none() {
                return Err(error("ERR no such key"));
            }
            let items = list_mut(db, key)?;
            let position = normalize_index(items.len(), index)
                .ok_or_else(|| error("ERR index out of range"))?;
            items[position] = args[2].clone();
            Ok(ok())
        }
        "LINDEX" => {
            let index = integer(&args[1])?;
            Ok(optional(list(db, key)?.and_then(|items| {
                normalize_index(items.len(), index).map(|i| items[i].clone())
            })))
        }
        "LLEN" => Ok(Frame::Integer(
            list(db, key)?.map_or(0, |items| items.len()) as i64,
        )),
        "LPOP" | "RPOP" => {
            if list(db, key)?.is_none() {
                return Ok(Frame::BulkString(None));
            }
            let items = list_mut(db, key)?;
            let popped = if name == "LPOP" {
                items.pop_front()
            } else {
                items.pop_back()
            };
            remove_if_empty(db, key);
            Ok(optional(popped))
        }
        "LPUSH" | "RPUSH" | "LPUSHX" | "RPUSHX" => {
            if name.ends_with('X') && list(db, key)?.is_none() {
                return Ok(Frame::Integer(0));
            }
            let items = list_mut(db, key)?;
            for value in &args[1..] {
                if name.starts_with('L') {
                    items.push_front(value.clone());
                } else {
                    items.push_back(value.clone());
                }
            }
            Ok(Frame::Integer(items.len() as i64))
        }
        "LRANGE" => {
            let (start, stop) = (integer(&args[1])?, integer(&args[2])?);
            let items = list(db, key)?;
            Ok(array(items.into_iter().flat_map(|items| {
                let window = normalize_range(items.len(), start, stop);
                items
                    .iter()
                    .enumerate()
                    .filter(move |(i, _)| window.map_or(false, |(s, e)| *i >= s && *i <= e))
                    .map(|(_, item)| item)
            })))
        }
        "LREM" => {
            let limit = integer(&args[1])?;
            if list(db, key)?.is_none() {
                return Ok(Frame::Integer(0));
            }
            let items = list_mut(db, key)?;
            let target = &args[2];
            let max = if limit == 0 { usize::MAX } else { limit.unsigned_abs() as usize };
            let mut removed = 0;
            if limit >= 0 {
                let mut i = 0;
                while i < items.len() && removed < max {
                    if &items[i] == target {
                        items.remove(i);
                        removed += 1;
                    } else {
                        i += 1;
                    }
                }
            } else {
                let mut i = items.len();
                while i > 0 && removed < max {
                    i -= 1;
                    if &items[i] == target {
                        items.remove(i);
                        removed += 1;
                    }
                }
            }
            remove_if_empty(db, key);
            Ok(Frame::Integer(removed as i64))
        }
        "LTRIM" => {
            let (start, stop) = (integer(&args[1])?, integer(&args[2])?);
            if list(db, key)?.is_none() {
                return Ok(ok());
            }
            let items = list_mut(db, key)?;
            match normalize_range(items.len(), start, stop) {
                Some((s, e)) => {
                    items.truncate(e + 1);
                    items.drain(..s);
                }
                None => items.clear(),
            }
            remove_if_empty(db, key);
            Ok(ok())
        }
        "SADD" => {
            let members = set_mut(db, key)?;
            Ok(count(args[1..].iter().filter(|m| members.insert(m.to_string()))))
        }
        "SCARD" => Ok(Frame::Integer(
            set(db, key)?.map_or(0, |members| members.len()) as i64,
        )),
        "SDIFF" => {
            let mut result = set(db, key)?.cloned().unwrap_or_default();
            for other in &args[1..] {
                if let Some(members) = set(db, other)? {
                    result.retain(|m| !members.contains(m));
                }
            }
            Ok(array(result.iter()))
        }
        "SISMEMBER" => Ok(Frame::Integer(
            set(db, key)?.map_or(false, |members| members.contains(&args[1])) as i64,
        )),
        "SMEMBERS" => Ok(array(set(db, key)?.into_iter().flat_map(|m| m.iter()))),
        "SMOVE" => {
            let destination = &args[1];
            let member = &args[2];
            set(db, destination)?;
            if !set(db, key)?.map_or(false, |members| members.contains(member)) {
                return Ok(Frame::Integer(0));
            }
            set_mut(db, key)?.remove(member);
            remove_if_empty(db, key);
            set_mut(db, destination)?.insert(member.clone());
            Ok(Frame::Integer(1))
        }
        "SREM" => {
            if set(db, key)?.is_none() {
                return Ok(Frame::Integer(0));
            }
            let members = set_mut(db, key)?;
            let removed = count(args[1..].iter().filter(|m| members.remove(m.as_str())));
            remove_if_empty(db, key);
            Ok(removed)
        }
        "ZADD" => {
            let score = float(&args[1])?;
            let member = &args[2];
            let entries = zset_mut(db, key)?;
            let added = match entries.iter_mut().find(|(_, m)| m == member) {
                Some(entry) => {
                    entry.0 = score;
                    false
                }
                None => {
                    entries.push((score, member.clone()));
                    true
                }
            };
            entries.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
            Ok(Frame::Integer(added as i64))
        }
        "ZRANGE" => {
            let (start, stop) = (integer(&args[1])?, integer(&args[2])?);
            let members: Vec<&String> = zset(db, key)?
                .map(|entries| {
                    let window = normalize_range(entries.len(), start, stop);
                    entries
                        .iter()
                        .enumerate()
                        .filter(|(i, _)| window.map_or(false, |(s, e)| *i >= s && *i <= e))
                        .map(|(_, (_, member))| member)
                        .collect()
                })
                .unwrap_or_default();
            Ok(array(members.into_iter()))
        }
        _ => Err(error("ERR unknown command")),
    }
}

macro_rules! accessors {
    ($get:ident, $get_mut:ident, $variant:ident, $ty:ty) => {
        fn $get<'a>(db: &'a HashMap<String, Entry>, key: &str) -> Result<Option<&'a $ty>, Frame> {
            match db.get(key) {
                None => Ok(None),
                Some(Entry {
                    value: Value::$variant(value),
                    ..
                }) => Ok(Some(value)),
                Some(_) => Err(error(WRONGTYPE)),
            }
        }

        fn $get_mut<'a>(db: &'a mut HashMap<String, Entry>, key: &str) -> Result<&'a mut $ty, Frame> {
            let entry = db
                .entry(key.to_string())
                .or_insert_with(|| Entry::new(Value::$variant(Default::default())));
            match &mut entry.value {
                Value::$variant(value) => Ok(value),
                _ => Err(error(WRONGTYPE)),
            }
        }
    };
}

accessors!(string, string_mut, Str, String);
accessors!(hash, hash_mut, Hash, BTreeMap<String, String>);
accessors!(list, list_mut, List, VecDeque<String>);
accessors!(set, set_mut, Set, BTreeSet<String>);
accessors!(zset, zset_mut, ZSet, Vec<(f64, String)>);

fn remove_if_empty(db: &mut HashMap<String, Entry>, key: &str) {
    let empty = match db.get(key).map(|entry| &entry.value) {
        Some(Value::Hash(fields)) => fields.is_empty(),
        Some(Value::List(items)) => items.is_empty(),
        Some(Value::Set(members)) => members.is_empty(),
        Some(Value::ZSet(entries)) => entries.is_empty(),
        _ => false,
    };
    if empty {
        db.remove(key);
    }
}

fn normalize_index(len: usize, index: i64) -> Option<usize> {
    let len = len as i64;
    let index = if index < 0 { len + index } else { index };
    (0..len).contains(&index).then_some(index as usize)
}

fn normalize_range(len: usize, start: i64, stop: i64) -> Option<(usize, usize)> {
    let len = len as i64;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };
    if start > stop || start >= len || stop < 0 {
        None
    } else {
        Some((start as usize, stop as usize))
    }
}

pub fn glob_match(pattern: &[u8], text: &[u8]) -> bool {
    match (pattern.first(), text.first()) {
        (None, None) => true,
        (Some(b'*'), _) => {
            glob_match(&pattern[1..], text) || (!text.is_empty() && glob_match(pattern, &text[1..]))
        }
        (Some(b'?'), Some(_)) => glob_match(&pattern[1..], &text[1..]),
        (Some(p), Some(t)) if p == t => glob_match(&pattern[1..], &text[1..]),
        _ => false,
    }
}

fn text(frame: Frame) -> String {
    match frame {
        Frame::BulkString(Some(data)) => String::from_utf8_lossy(&data).into_owned(),
        Frame::SimpleString(data) => String::from_utf8_lossy(&data).into_owned(),
        Frame::Integer(n) => n.to_string(),
        _ => String::new(),
    }
}

fn integer(value: &str) -> Result<i64, Frame> {
    value.parse().map_err(|_| error(NOT_INTEGER))
}

fn float(value: &str) -> Result<f64, Frame> {
    value.parse().map_err(|_| error(NOT_FLOAT))
}

fn ok() -> Frame {
    Frame::SimpleString(b"OK".to_vec())
}

fn error(message: &str) -> Frame {
    Frame::Error(message.as_bytes().to_vec())
}

fn bulk(value: &str) -> Frame {
    Frame::bulk(value)
}

fn optional(value: Option<String>) -> Frame {
    match value {
        Some(value) => bulk(&value),
        None => Frame::BulkString(None),
    }
}

fn array<'a>(values: impl Iterator<Item = &'a String>) -> Frame {
    Frame::Array(values.map(|value| bulk(value)).collect())
}

fn count<T>(matches: impl Iterator<Item = T>) -> Frame {
    Frame::Integer(matches.count() as i64)
}

fn confirmation(kind: &str, name: Option<&String>, remaining: i64) -> Frame {
    Frame::Array(vec![
        bulk(kind),
        name.map_or(Frame::BulkString(None), |name| bulk(name)),
        Frame::Integer(remaining),
    ])
}
