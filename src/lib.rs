//! # likert-rate
//!
//! Core of an embeddable course feedback widget: a rotating question with a
//! five-point icon scale, per-user display sampling, a running vote tally
//! and free-text feedback.
//!
//! ## Overview
//!
//! The widget lives inside a host content system. The host supplies
//! storage scoped by user and instance, a telemetry sink and (optionally) a
//! random source; this crate supplies the state machines that run on top.
//!
//! - **Prompt assignment**: each user is pinned to one prompt of the
//!   instance, drawn uniformly on first view and kept while it exists.
//! - **Display sampling**: each user draws once in `[0, 100)`; the widget
//!   shows only while that draw is below the configured percentage.
//! - **Vote tally**: one counter per scale option counting each user's
//!   latest vote only.
//!
//! ## Quick Start
//!
//! ```rust
//! use likert_rate::storage::MemoryStorage;
//! use likert_rate::FeedbackWidget;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> likert_rate::Result<()> {
//!     let widget = FeedbackWidget::builder("course-1/unit-3")
//!         .storage(Arc::new(MemoryStorage::new()))
//!         .build()?;
//!
//!     let view = widget.view("student-42").await?;
//!     println!("{}", view.render_html());
//!
//!     widget.vote("student-42", 1).await?;
//!     widget.feedback("student-42", "More worked examples, please").await?;
//!     assert_eq!(widget.tally().await?.iter().sum::<u64>(), 1);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Instance configuration, loading and validation |
//! | [`prompt`] | Prompt records, default merge, prompt assignment |
//! | [`sampling`] | Per-user display sampling |
//! | [`tally`] | Vote recording and the shared tally |
//! | [`feedback`] | Free-text feedback and telemetry event types |
//! | [`telemetry`] | Telemetry sinks |
//! | [`storage`] | Storage collaborator interface and typed store |
//! | [`random`] | Random sources |
//! | [`state`] | Per-user and per-instance records |
//! | [`view`] | View assembly and HTML rendering |
//! | [`widget`] | The widget façade |
//! | [`handlers`] | JSON request dispatch |
//! | [`scenarios`] | Demo instances |

pub mod config;
pub mod feedback;
pub mod handlers;
pub mod prompt;
pub mod random;
pub mod sampling;
pub mod scenarios;
pub mod state;
pub mod storage;
pub mod tally;
pub mod telemetry;
pub mod view;
pub mod widget;

// Re-export main types for convenience
pub use config::InstanceConfig;
pub use prompt::{Prompt, PromptOverride, PromptSelector};
pub use sampling::DisplaySampler;
pub use scenarios::{list_demo_instances, DemoScenario};
pub use state::{AggregateState, UserState};
pub use tally::{VoteAggregator, VoteChange};
pub use telemetry::{TelemetryEvent, TelemetrySink};
pub use view::WidgetView;
pub use widget::{FeedbackWidget, FeedbackWidgetBuilder};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
