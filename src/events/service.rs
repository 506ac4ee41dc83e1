//! Event service: the entry point used by the calendar
//!
//! ## Usage
//!
//! ```rust,ignore
//! use contestflow::{ClistConfig, EventService};
//!
//! let config = ClistConfig::from_env()?;
//! let service = EventService::from_config(&config)?;
//! let events = service.fetch_events().await?;
//! ```

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::clist::{ClistClient, ContestSource};
use super::error::EventServiceError;
use super::normalizer::{normalize_records, NormalizedEvent};
use super::platforms::PlatformRegistry;
use super::window::QueryWindow;
use crate::config::ClistConfig;

/// Fetches and normalizes contest events
///
/// Holds no mutable state: every call issues one request and builds a fresh
/// list. Re-invoke to refresh. No retry is performed on failure.
#[derive(Debug, Clone)]
pub struct EventService<S = ClistClient> {
    source: S,
    registry: Arc<PlatformRegistry>,
}

impl EventService<ClistClient> {
    /// clist-backed service; `platforms_path`, when set, replaces the built-in table
    pub fn from_config(config: &ClistConfig) -> Result<Self, EventServiceError> {
        let registry = match &config.platforms_path {
            Some(path) => PlatformRegistry::from_json_file(path)
                .map_err(|e| EventServiceError::Platforms(format!("{}: {}", path.display(), e)))?,
            None => PlatformRegistry::builtin(),
        };
        let client = ClistClient::new(config)?;
        Ok(Self::new(client, Arc::new(registry)))
    }
}

impl<S: ContestSource> EventService<S> {
    pub fn new(source: S, registry: Arc<PlatformRegistry>) -> Self {
        Self { source, registry }
    }

    pub fn registry(&self) -> &PlatformRegistry {
        &self.registry
    }

    /// Events for the rolling window around the current time
    pub async fn fetch_events(&self) -> Result<Vec<NormalizedEvent>, EventServiceError> {
        self.fetch_events_in(&QueryWindow::current()).await
    }

    pub async fn fetch_events_in(
        &self,
        window: &QueryWindow,
    ) -> Result<Vec<NormalizedEvent>, EventServiceError> {
        log::debug!(
            "Fetching events between {} and {}",
            window.start_param(),
            window.end_param()
        );

        let response = self.source.fetch_contests(window).await.map_err(|e| {
            log::error!("Error fetching events: {}", e);
            e
        })?;

        let events = normalize_records(&response.objects, &self.registry);
        log::info!(
            "Successfully processed {} events from {} records",
            events.len(),
            response.len()
        );
        Ok(events)
    }

    /// `fetch_events`, abandoned as soon as `cancel` fires
    pub async fn fetch_events_cancellable(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<NormalizedEvent>, EventServiceError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                log::info!("Event fetch cancelled");
                Err(EventServiceError::Cancelled)
            }
            result = self.fetch_events() => result,
        }
    }

    pub async fn create_event(
        &self,
        _event: &NormalizedEvent,
    ) -> Result<NormalizedEvent, EventServiceError> {
        log::warn!("create_event is not implemented");
        Err(EventServiceError::NotImplemented(
            "event creation requires a writable backend",
        ))
    }

    pub async fn update_event(
        &self,
        _id: &str,
        _event: &NormalizedEvent,
    ) -> Result<NormalizedEvent, EventServiceError> {
        log::warn!("update_event is not implemented");
        Err(EventServiceError::NotImplemented(
            "event update requires a writable backend",
        ))
    }

    pub async fn delete_event(&self, _id: &str) -> Result<(), EventServiceError> {
        log::warn!("delete_event is not implemented");
        Err(EventServiceError::NotImplemented(
            "event deletion requires a writable backend",
        ))
    }
}
