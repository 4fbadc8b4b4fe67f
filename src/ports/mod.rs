//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `LedgerReader` / `LedgerWriter` - append-only expense ledger access
//! - `BacklogProvider` - pending analyses in priority order
//! - `DispatchSink` - trigger a single analysis

mod backlog_provider;
mod dispatch_sink;
mod ledger_reader;
mod ledger_writer;

pub use backlog_provider::BacklogProvider;
pub use dispatch_sink::DispatchSink;
pub use ledger_reader::LedgerReader;
pub use ledger_writer::LedgerWriter;
