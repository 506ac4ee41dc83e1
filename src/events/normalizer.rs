//! Contest record normalization into calendar events
//!
//! Pure transformation: the same input slice and registry always yield the
//! same output. Records that are filtered out or fail to transform are logged
//! and skipped; nothing here fails the batch.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::clist::RawContestRecord;
use super::error::RecordError;
use super::platforms::PlatformRegistry;

pub const DEFAULT_TITLE: &str = "Coding Contest";
pub const DEFAULT_LINK: &str = "#";

/// Spans longer than this many seconds are split into start/end markers
pub const LONG_EVENT_THRESHOLD_SECS: i64 = 86_400;

/// Length of each synthetic marker, in seconds
pub const MARKER_LENGTH_SECS: i64 = 3_600;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventMarker {
    Start,
    End,
}

/// Calendar-ready contest event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedEvent {
    pub id: String,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub platform: String,
    pub platform_icon: Option<String>,
    pub description: String,
    pub link: String,
    /// Seconds
    pub duration: i64,
    pub all_day: bool,
    pub is_long_event: bool,
    /// Set on the two halves of a split long event
    pub marker: Option<EventMarker>,
    /// Hostname as reported by the API
    pub host: String,
}

impl NormalizedEvent {
    pub fn is_marker(&self) -> bool {
        self.marker.is_some()
    }

    /// Id of the contest this event came from (marker suffix removed)
    pub fn source_id(&self) -> &str {
        match self.marker {
            Some(EventMarker::Start) => self.id.strip_suffix("-start").unwrap_or(&self.id),
            Some(EventMarker::End) => self.id.strip_suffix("-end").unwrap_or(&self.id),
            None => &self.id,
        }
    }
}

/// Filter, transform and sort a batch of raw API objects
pub fn normalize_records(objects: &[Value], registry: &PlatformRegistry) -> Vec<NormalizedEvent> {
    let mut events = Vec::with_capacity(objects.len());
    let mut filtered = 0usize;
    let mut failed = 0usize;

    for value in objects {
        let record = match RawContestRecord::from_value(value.clone()) {
            Ok(record) => record,
            Err(e) => {
                log::warn!("Skipping undecodable contest record ({}): {}", e, value);
                failed += 1;
                continue;
            }
        };

        let canonical = match admit(&record, registry) {
            Ok(Some(canonical)) => canonical,
            Ok(None) => {
                filtered += 1;
                continue;
            }
            Err(e) => {
                log::warn!("Skipping invalid event ({}): {:?}", e, record);
                failed += 1;
                continue;
            }
        };

        match normalize_record(&record, &canonical, registry) {
            Ok(mut normalized) => events.append(&mut normalized),
            Err(e) => {
                log::warn!("Error processing event ({}): {:?}", e, record);
                failed += 1;
            }
        }
    }

    // Stable sort keeps a split pair in start/end order when starts tie
    events.sort_by_key(|event| event.start);

    log::debug!(
        "Normalized {} records into {} events ({} filtered, {} failed)",
        objects.len(),
        events.len(),
        filtered,
        failed
    );
    events
}

/// Allow-list check followed by required-field check
///
/// * `Ok(Some(canonical))` - record should be transformed
/// * `Ok(None)` - record is not from an allowed platform
/// * `Err(...)` - allowed platform but a required field is missing
pub fn admit(
    record: &RawContestRecord,
    registry: &PlatformRegistry,
) -> Result<Option<String>, RecordError> {
    let host = match non_empty(&record.host) {
        Some(host) => host,
        None => {
            log::debug!("Filtered out - No host: {:?}", record.title());
            return Ok(None);
        }
    };

    let canonical = registry.resolve_host(host);
    if !registry.is_allowed(&canonical) {
        log::debug!(
            "Filtered out - Platform not in allowed list: {} -> {} {:?}",
            host,
            canonical,
            record.title()
        );
        return Ok(None);
    }

    let id_missing = match &record.id {
        None => true,
        Some(id) => id.to_string().is_empty(),
    };
    if id_missing {
        return Err(RecordError::MissingField("id"));
    }
    if non_empty(&record.start).is_none() {
        return Err(RecordError::MissingField("start"));
    }
    if non_empty(&record.end).is_none() {
        return Err(RecordError::MissingField("end"));
    }

    Ok(Some(canonical))
}

/// Transform one admitted record into one event, or two markers if it is long
pub fn normalize_record(
    record: &RawContestRecord,
    canonical: &str,
    registry: &PlatformRegistry,
) -> Result<Vec<NormalizedEvent>, RecordError> {
    let id = record
        .id
        .as_ref()
        .map(|id| id.to_string())
        .ok_or(RecordError::MissingField("id"))?;
    let host = non_empty(&record.host).ok_or(RecordError::MissingField("host"))?;
    let start = parse_timestamp("start", non_empty(&record.start))?;
    let end = parse_timestamp("end", non_empty(&record.end))?;

    if end < start {
        return Err(RecordError::Malformed(format!(
            "end {} precedes start {}",
            end, start
        )));
    }

    let span = end - start;
    let duration = match record.duration {
        Some(secs) if secs.is_finite() && secs > 0.0 => secs.round() as i64,
        _ => span.num_seconds(),
    };
    let is_long_event = span > Duration::seconds(LONG_EVENT_THRESHOLD_SECS);
    let title = record.title().unwrap_or(DEFAULT_TITLE).to_string();

    let base = NormalizedEvent {
        id,
        title,
        start,
        end,
        platform: registry.display_name(canonical),
        platform_icon: registry.icon(canonical),
        description: format!("Host: {}", host),
        link: record.link().unwrap_or(DEFAULT_LINK).to_string(),
        duration,
        all_day: is_long_event,
        is_long_event,
        marker: None,
        host: host.to_string(),
    };

    if !is_long_event {
        return Ok(vec![base]);
    }

    let start_marker = NormalizedEvent {
        id: format!("{}-start", base.id),
        title: format!("Start: {}", base.title),
        end: start + Duration::seconds(MARKER_LENGTH_SECS),
        marker: Some(EventMarker::Start),
        ..base.clone()
    };
    let end_marker = NormalizedEvent {
        id: format!("{}-end", base.id),
        title: format!("End: {}", base.title),
        start: end - Duration::seconds(MARKER_LENGTH_SECS),
        marker: Some(EventMarker::End),
        ..base
    };

    log::debug!(
        "Split long event into start/end markers: {} ({} .. {})",
        start_marker.source_id(),
        start,
        end
    );

    Ok(vec![start_marker, end_marker])
}

/// RFC 3339, or naive `YYYY-MM-DDTHH:MM:SS[.fff]` read as UTC
pub fn parse_timestamp(
    field: &'static str,
    value: Option<&str>,
) -> Result<DateTime<Utc>, RecordError> {
    let value = value.ok_or(RecordError::MissingField(field))?.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| RecordError::InvalidTimestamp {
            field,
            value: value.to_string(),
        })
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.trim().is_empty())
}
