//! The embeddable feedback widget.
//!
//! [`FeedbackWidget`] is one configured instance. Each operation loads the
//! user's record (and the shared tally where needed), runs the pure
//! selector/sampler/aggregator logic, writes the records back and emits
//! telemetry.

use crate::config::InstanceConfig;
use crate::error::{Error, ErrorContext};
use crate::feedback::{FeedbackRecorder, LikertRateEvent, StringFeedbackEvent, TelemetryEvent};
use crate::prompt::{Prompt, PromptSelector};
use crate::random::{RandomSource, ThreadRandom};
use crate::sampling::DisplaySampler;
use crate::storage::{StateStore, StorageBackend};
use crate::tally::{VoteAggregator, VoteChange};
use crate::telemetry::{emit_best_effort, noop_sink, TelemetrySink};
use crate::view::{build_view, WidgetView};
use crate::Result;
use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Reply to a vote request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteOutcome {
    pub success: bool,
    #[serde(skip)]
    pub change: Option<VoteChange>,
}

/// Reply to a feedback request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackAck {
    pub success: bool,
}

pub struct FeedbackWidget {
    instance_id: String,
    config: ArcSwap<InstanceConfig>,
    store: StateStore,
    telemetry: Arc<dyn TelemetrySink>,
    random: Arc<dyn RandomSource>,
}

impl FeedbackWidget {
    pub fn builder(instance_id: impl Into<String>) -> FeedbackWidgetBuilder {
        FeedbackWidgetBuilder::new(instance_id)
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// Snapshot of the configuration currently in effect.
    pub fn config(&self) -> Arc<InstanceConfig> {
        self.config.load_full()
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    /// Pick up author edits saved in the settings scope.
    ///
    /// Returns whether a stored configuration was found. Operations already
    /// in flight finish with the configuration they started with.
    pub async fn refresh_config(&self) -> Result<bool> {
        match self.store.load_config(&self.instance_id).await? {
            Some(config) => {
                config.validate()?;
                debug!(instance = %self.instance_id, prompts = config.prompt_count(), "reloaded settings");
                self.config.store(Arc::new(config));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Render the widget for `user_id`, assigning a prompt and a display
    /// sample on first sight.
    pub async fn view(&self, user_id: &str) -> Result<WidgetView> {
        let mut state = self.store.load_user_state(&self.instance_id, user_id).await?;
        let before = state.clone();

        let config = self.config.load();
        let prompt = PromptSelector::select(&config, &mut state, self.random.as_ref());
        let shown = DisplaySampler::should_display(&config, &mut state, self.random.as_ref());

        if state != before {
            self.store
                .save_user_state(&self.instance_id, user_id, &state)
                .await?;
        }
        debug!(instance = %self.instance_id, user = user_id, shown, "rendered view");
        Ok(build_view(
            &prompt,
            state.current_vote,
            &state.feedback_text,
            shown,
        ))
    }

    /// The prompt `user_id` is pinned to, assigning one if needed.
    pub async fn prompt_for(&self, user_id: &str) -> Result<Prompt> {
        let mut state = self.store.load_user_state(&self.instance_id, user_id).await?;
        let before = state.prompt_index;
        let prompt = PromptSelector::select(&self.config.load(), &mut state, self.random.as_ref());
        if state.prompt_index != before {
            self.store
                .save_user_state(&self.instance_id, user_id, &state)
                .await?;
        }
        Ok(prompt)
    }

    /// Record `vote` as this user's current choice.
    ///
    /// The vote is checked against the scale of the user's own prompt. An
    /// out-of-range vote fails with [`Error::InvalidVote`] and writes nothing.
    ///
    /// The user record is written before the tally. If the tally write fails
    /// the previous user record is put back, so a failed vote leaves both
    /// records as they were and can be retried.
    pub async fn vote(&self, user_id: &str, vote: i64) -> Result<VoteOutcome> {
        let mut state = self.store.load_user_state(&self.instance_id, user_id).await?;
        let mut aggregate = self.store.load_aggregate(&self.instance_id).await?;
        let previous = state.clone();

        let prompt = PromptSelector::select(&self.config.load(), &mut state, self.random.as_ref());
        let change = VoteAggregator::cast_vote(&prompt, &mut state, &mut aggregate, vote)?;

        self.store
            .save_user_state(&self.instance_id, user_id, &state)
            .await?;
        if let Err(e) = self.store.save_aggregate(&self.instance_id, &aggregate).await {
            if let Err(restore) = self
                .store
                .save_user_state(&self.instance_id, user_id, &previous)
                .await
            {
                warn!(
                    instance = %self.instance_id,
                    user = user_id,
                    error = %restore,
                    "could not restore user record after failed tally write"
                );
            }
            return Err(e);
        }
        info!(
            instance = %self.instance_id,
            user = user_id,
            old_vote = ?change.old_vote,
            new_vote = change.new_vote,
            "recorded vote"
        );

        emit_best_effort(
            self.telemetry.as_ref(),
            TelemetryEvent::LikertRate(LikertRateEvent::new(
                &self.instance_id,
                user_id,
                change.old_vote,
                change.new_vote,
            )),
        )
        .await;

        Ok(VoteOutcome {
            success: true,
            change: Some(change),
        })
    }

    /// Replace this user's free-text feedback.
    pub async fn feedback(&self, user_id: &str, text: impl Into<String>) -> Result<FeedbackAck> {
        let text = text.into();
        let mut state = self.store.load_user_state(&self.instance_id, user_id).await?;
        let old = FeedbackRecorder::record_feedback(&mut state, text.clone());
        self.store
            .save_user_state(&self.instance_id, user_id, &state)
            .await?;

        emit_best_effort(
            self.telemetry.as_ref(),
            TelemetryEvent::StringFeedback(StringFeedbackEvent::new(
                &self.instance_id,
                user_id,
                old,
                text,
            )),
        )
        .await;

        Ok(FeedbackAck { success: true })
    }

    /// Current per-option counts; empty before the first vote.
    pub async fn tally(&self) -> Result<Vec<u64>> {
        Ok(self.store.load_aggregate(&self.instance_id).await?.vote_tally)
    }
}

/// Builder for FeedbackWidget
pub struct FeedbackWidgetBuilder {
    instance_id: String,
    config: Option<InstanceConfig>,
    storage: Option<Arc<dyn StorageBackend>>,
    telemetry: Option<Arc<dyn TelemetrySink>>,
    random: Option<Arc<dyn RandomSource>>,
}

impl FeedbackWidgetBuilder {
    pub fn new(instance_id: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            config: None,
            storage: None,
            telemetry: None,
            random: None,
        }
    }

    /// Use this configuration instead of the built-in default
    pub fn config(mut self, config: InstanceConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Storage backend (required)
    pub fn storage(mut self, storage: Arc<dyn StorageBackend>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Telemetry sink; defaults to a no-op sink
    pub fn telemetry(mut self, sink: Arc<dyn TelemetrySink>) -> Self {
        self.telemetry = Some(sink);
        self
    }

    /// Random source; defaults to the thread RNG
    pub fn random(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.random = Some(random);
        self
    }

    pub fn build(self) -> Result<FeedbackWidget> {
        let storage = self.storage.ok_or_else(|| {
            Error::configuration_with_context(
                "a storage backend is required",
                ErrorContext::new().with_source("widget_builder"),
            )
        })?;
        let config = self.config.unwrap_or_default();
        config.validate()?;
        Ok(FeedbackWidget {
            instance_id: self.instance_id,
            config: ArcSwap::from_pointee(config),
            store: StateStore::new(storage),
            telemetry: self.telemetry.unwrap_or_else(noop_sink),
            random: self.random.unwrap_or_else(|| Arc::new(ThreadRandom)),
        })
    }
}
