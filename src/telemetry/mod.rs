//! Telemetry sinks.
//!
//! Telemetry is best effort: the widget hands every event to
//! [`emit_best_effort`], which logs sink failures and never returns them.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`TelemetryEvent`] | Typed event enum |
//! | [`TelemetrySink`] | Trait for event destinations |
//! | [`NoopTelemetrySink`] | Drops everything |
//! | [`InMemoryTelemetrySink`] | Bounded in-memory sink for testing |
//! | [`LoggingTelemetrySink`] | Forwards events to `tracing` |
//! | [`CompositeTelemetrySink`] | Fans out to several sinks |

pub use crate::feedback::{
    noop_sink, LikertRateEvent, NoopTelemetrySink, StringFeedbackEvent, TelemetryError,
    TelemetryEvent, TelemetrySink, LIKERT_RATE_EVENT, STRING_FEEDBACK_EVENT,
};

use async_trait::async_trait;
use std::sync::{Arc, RwLock};
use tracing::{info, warn};

/// Hand `event` to `sink`, logging instead of failing.
pub async fn emit_best_effort(sink: &dyn TelemetrySink, event: TelemetryEvent) {
    let name = event.name();
    if let Err(e) = sink.emit(event).await {
        warn!(event = name, error = %e, "dropping telemetry event");
    }
}

/// In-memory sink for testing.
pub struct InMemoryTelemetrySink {
    events: Arc<RwLock<Vec<TelemetryEvent>>>,
    max_events: usize,
}

impl InMemoryTelemetrySink {
    pub fn new(max: usize) -> Self {
        Self {
            events: Arc::new(RwLock::new(Vec::new())),
            max_events: max,
        }
    }

    pub fn get_events(&self) -> Vec<TelemetryEvent> {
        self.events
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn get_events_by_name(&self, name: &str) -> Vec<TelemetryEvent> {
        self.events
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|e| e.name() == name)
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.events
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }

    pub fn len(&self) -> usize {
        self.events.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl TelemetrySink for InMemoryTelemetrySink {
    async fn emit(&self, event: TelemetryEvent) -> Result<(), TelemetryError> {
        let mut events = self.events.write().unwrap_or_else(|e| e.into_inner());
        events.push(event);
        if events.len() > self.max_events {
            events.remove(0);
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "in_memory"
    }
}

/// Logs each event through `tracing` at info level.
#[derive(Default)]
pub struct LoggingTelemetrySink;

#[async_trait]
impl TelemetrySink for LoggingTelemetrySink {
    async fn emit(&self, event: TelemetryEvent) -> Result<(), TelemetryError> {
        info!(
            event = event.name(),
            instance = event.instance_id(),
            user = event.user_id(),
            payload = %event.payload(),
            "telemetry"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "logging"
    }
}

/// Composite sink for multiple destinations.
///
/// Every sink sees every event; the first failure is reported after all
/// sinks have been tried.
pub struct CompositeTelemetrySink {
    sinks: Vec<Arc<dyn TelemetrySink>>,
}

impl CompositeTelemetrySink {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn add_sink(mut self, sink: Arc<dyn TelemetrySink>) -> Self {
        self.sinks.push(sink);
        self
    }
}

impl Default for CompositeTelemetrySink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TelemetrySink for CompositeTelemetrySink {
    async fn emit(&self, event: TelemetryEvent) -> Result<(), TelemetryError> {
        let mut first_error = None;
        for s in &self.sinks {
            if let Err(e) = s.emit(event.clone()).await {
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn name(&self) -> &'static str {
        "composite"
    }
}
