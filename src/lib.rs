//! Serial Timestamp - line-oriented timestamp annotation for session streams.
//!
//! This library sits between a byte-stream producer (a serial port or
//! terminal session) and its consumer (the rendering surface) and prepends
//! a bracketed wall-clock timestamp to the start of each logical line,
//! without buffering, dropping, or reordering payload bytes.
//!
//! # Guarantees
//!
//! - **Byte conservation**: every input byte is re-emitted, in order;
//!   stripping the inserted `[...] ` markers recovers the input exactly
//! - **No added latency**: partial lines are forwarded immediately;
//!   line-start tracking is carried as state, never as buffered bytes
//! - **Binary safe**: chunks may split lines, UTF-8 sequences, or escape
//!   sequences at any byte boundary
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       Serial Timestamp                       │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌──────────┐   ┌────────────────────────┐   ┌────────────┐  │
//! │  │ Session  │──▶│ LineTimestampAnnotator │──▶│ OutputSink │  │
//! │  │ (chunks) │   │  (stamp line starts)   │   │ (consumer) │  │
//! │  └──────────┘   └────────────────────────┘   └────────────┘  │
//! │                    ▲                 │                       │
//! │             ┌──────┴──────┐    ┌─────▼─────┐                 │
//! │             │ FormatWatch │    │ StatusLog │                 │
//! │             │  (config)   │    │ (tracing) │                 │
//! │             └─────────────┘    └───────────┘                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use serial_timestamp::{LineTimestampAnnotator, NullLog};
//!
//! let mut annotator = LineTimestampAnnotator::new("time-only", Box::new(NullLog));
//! let mut writes: Vec<Vec<u8>> = Vec::new();
//! annotator.feed(b"hello\nwor", &mut writes);
//! annotator.feed(b"ld\n", &mut writes);
//! // writes[0] == "[hh:mm:ss.SSS] hello\n", writes[1] == "[hh:mm:ss.SSS] wor",
//! // writes[2] == "ld\n" (mid-line continuation, not stamped)
//! assert_eq!(writes.len(), 3);
//! ```

pub mod annotator;
pub mod config;
pub mod format;
pub mod log;

// Re-export key types at crate root for convenience
pub use annotator::{LineTimestampAnnotator, OutputSink, WriterSink};
pub use config::{Config, ConfigError, FormatWatch};
pub use format::{timestamp_for, TimestampFormat, UnknownFormat, ALL_FORMATS};
pub use log::{NullLog, StatusLog, TracingLog};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
