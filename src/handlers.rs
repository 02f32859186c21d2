//! JSON request surface for hosts that route client calls by handler name.
//!
//! | Handler | Request | Reply |
//! |---------|---------|-------|
//! | `vote` | `{"vote": 2}` | `{"success": true}` |
//! | `feedback` | `{"feedback": "..."}` | `{"success": true}` |
//!
//! An out-of-range vote is answered with `{"success": false, "error": ...}`
//! rather than an error, since it comes from the end user's browser.

use crate::error::{Error, ErrorContext};
use crate::widget::FeedbackWidget;
use crate::Result;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};
use tracing::warn;

pub const VOTE_HANDLER: &str = "vote";
pub const FEEDBACK_HANDLER: &str = "feedback";

#[derive(Debug, Deserialize)]
struct VoteRequest {
    vote: i64,
}

#[derive(Debug, Deserialize)]
struct FeedbackRequest {
    feedback: String,
}

fn parse<T: DeserializeOwned>(handler: &str, data: Value) -> Result<T> {
    serde_json::from_value(data).map_err(|e| {
        Error::validation_with_context(
            "malformed request body",
            ErrorContext::new()
                .with_source(format!("{}_handler", handler))
                .with_details(e.to_string()),
        )
    })
}

/// Dispatch `data` to the handler named `handler` for `user_id`.
pub async fn handle(
    widget: &FeedbackWidget,
    user_id: &str,
    handler: &str,
    data: Value,
) -> Result<Value> {
    match handler {
        VOTE_HANDLER => {
            let request: VoteRequest = parse(handler, data)?;
            match widget.vote(user_id, request.vote).await {
                Ok(outcome) => Ok(serde_json::to_value(outcome)?),
                Err(e @ Error::InvalidVote { .. }) => {
                    warn!(user = user_id, error = %e, "rejected vote");
                    Ok(json!({"success": false, "error": e.to_string()}))
                }
                Err(e) => Err(e),
            }
        }
        FEEDBACK_HANDLER => {
            let request: FeedbackRequest = parse(handler, data)?;
            let ack = widget.feedback(user_id, request.feedback).await?;
            Ok(serde_json::to_value(ack)?)
        }
        other => Err(Error::validation_with_context(
            "unknown handler",
            ErrorContext::new().with_field_path("handler").with_details(other),
        )),
    }
}
