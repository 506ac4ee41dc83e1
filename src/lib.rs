//! # ContestFlow
//!
//! Contest-calendar aggregation for competitive-programming platforms.
//!
//! ```text
//! clist.by contest API → ClistClient (ContestSource)
//!     ↓
//! ContestListResponse (parse-or-reject)
//!     ↓
//! normalize_records (allow-list, aliases, long-event split, sort)
//!     ↓
//! Vec<NormalizedEvent> → calendar helpers
//! ```

pub mod config;
pub mod events;

pub use config::{ClistConfig, ConfigError};
pub use events::{EventService, EventServiceError, NormalizedEvent, PlatformRegistry};
