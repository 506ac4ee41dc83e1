//! # Contest Event Aggregation
//!
//! Turns the clist.by contest listing into calendar-ready events:
//! - Queries a rolling window (one month back, one year ahead)
//! - Keeps only allow-listed coding platforms (aliases and subdomains included)
//! - Normalizes titles, links, durations and platform identity
//! - Splits contests longer than 24h into start/end markers
//! - Returns one list sorted by start time
//!
//! ## Module Organization
//!
//! - `error` - Batch and per-record error types
//! - `platforms` - Allow-list, alias map, icon inference
//! - `window` - Rolling query window
//! - `clist` - External schema and HTTP client
//! - `normalizer` - Pure filter/transform/split/sort step
//! - `calendar` - View helpers (upcoming, per-day grouping)
//! - `service` - `EventService` entry point

pub mod calendar;
pub mod clist;
pub mod error;
pub mod normalizer;
pub mod platforms;
pub mod service;
pub mod window;

pub use clist::{ClistClient, ContestListResponse, ContestSource, RawContestRecord};
pub use error::{EventServiceError, RecordError};
pub use normalizer::{normalize_records, EventMarker, NormalizedEvent};
pub use platforms::{PlatformDescriptor, PlatformRegistry};
pub use service::EventService;
pub use window::QueryWindow;
