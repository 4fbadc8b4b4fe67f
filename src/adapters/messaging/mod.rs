//! Messaging adapters for the dispatch sink port.

mod in_memory;
mod redis_dispatch_sink;

pub use in_memory::InMemoryDispatchSink;
pub use redis_dispatch_sink::RedisDispatchSink;
