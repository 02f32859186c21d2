//! Free-text feedback and the telemetry events the widget emits.
//!
//! Provides the TelemetrySink trait, typed TelemetryEvent values and
//! NoopTelemetrySink. Concrete sinks (in-memory, logging, composite) live in
//! [`crate::telemetry`].

use crate::state::UserState;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

/// Event name for likert votes.
pub const LIKERT_RATE_EVENT: &str = "edx.ratexblock.likert_rate";
/// Event name for free-text feedback.
pub const STRING_FEEDBACK_EVENT: &str = "edx.ratexblock.string_feedback";

fn timestamp() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

/// A user picked a scale option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LikertRateEvent {
    pub instance_id: String,
    pub user_id: String,
    pub old_vote: Option<usize>,
    pub new_vote: usize,
    pub timestamp: f64,
}

impl LikertRateEvent {
    pub fn new(
        instance_id: impl Into<String>,
        user_id: impl Into<String>,
        old_vote: Option<usize>,
        new_vote: usize,
    ) -> Self {
        Self {
            instance_id: instance_id.into(),
            user_id: user_id.into(),
            old_vote,
            new_vote,
            timestamp: timestamp(),
        }
    }
}

/// A user replaced their free-text feedback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StringFeedbackEvent {
    pub instance_id: String,
    pub user_id: String,
    pub old_feedback: String,
    pub new_feedback: String,
    pub timestamp: f64,
}

impl StringFeedbackEvent {
    pub fn new(
        instance_id: impl Into<String>,
        user_id: impl Into<String>,
        old_feedback: impl Into<String>,
        new_feedback: impl Into<String>,
    ) -> Self {
        Self {
            instance_id: instance_id.into(),
            user_id: user_id.into(),
            old_feedback: old_feedback.into(),
            new_feedback: new_feedback.into(),
            timestamp: timestamp(),
        }
    }
}

/// Typed telemetry events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TelemetryEvent {
    LikertRate(LikertRateEvent),
    StringFeedback(StringFeedbackEvent),
}

impl TelemetryEvent {
    /// Event name as the tracking backend knows it.
    pub fn name(&self) -> &'static str {
        match self {
            TelemetryEvent::LikertRate(_) => LIKERT_RATE_EVENT,
            TelemetryEvent::StringFeedback(_) => STRING_FEEDBACK_EVENT,
        }
    }

    /// The `{old, new}` mapping sent alongside the name.
    pub fn payload(&self) -> serde_json::Value {
        match self {
            TelemetryEvent::LikertRate(e) => serde_json::json!({
                "old_vote": e.old_vote,
                "new_vote": e.new_vote,
            }),
            TelemetryEvent::StringFeedback(e) => serde_json::json!({
                "old_feedback": e.old_feedback,
                "new_feedback": e.new_feedback,
            }),
        }
    }

    pub fn user_id(&self) -> &str {
        match self {
            TelemetryEvent::LikertRate(e) => &e.user_id,
            TelemetryEvent::StringFeedback(e) => &e.user_id,
        }
    }

    pub fn instance_id(&self) -> &str {
        match self {
            TelemetryEvent::LikertRate(e) => &e.instance_id,
            TelemetryEvent::StringFeedback(e) => &e.instance_id,
        }
    }
}

/// Failure reported by a sink. The widget logs it and moves on.
#[derive(Debug, Clone, thiserror::Error)]
#[error("telemetry sink '{sink}' failed: {message}")]
pub struct TelemetryError {
    pub sink: String,
    pub message: String,
}

impl TelemetryError {
    pub fn new(sink: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            sink: sink.into(),
            message: message.into(),
        }
    }
}

/// Telemetry sink trait, supplied by the host.
#[async_trait]
pub trait TelemetrySink: Send + Sync {
    async fn emit(&self, event: TelemetryEvent) -> std::result::Result<(), TelemetryError>;

    fn name(&self) -> &'static str {
        "custom"
    }
}

/// No-op sink for hosts without event tracking.
pub struct NoopTelemetrySink;

#[async_trait]
impl TelemetrySink for NoopTelemetrySink {
    async fn emit(&self, _: TelemetryEvent) -> std::result::Result<(), TelemetryError> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}

/// Returns a no-op telemetry sink.
pub fn noop_sink() -> Arc<dyn TelemetrySink> {
    Arc::new(NoopTelemetrySink)
}

/// Stores free-text feedback; the newest text always wins.
pub struct FeedbackRecorder;

impl FeedbackRecorder {
    /// Overwrite the stored text and return what was there before.
    pub fn record_feedback(state: &mut UserState, text: impl Into<String>) -> String {
        let text = text.into();
        info!(chars = text.chars().count(), "recorded feedback");
        std::mem::replace(&mut state.feedback_text, text)
    }
}
