//! End-to-end behavior of a widget instance over shared storage.

use async_trait::async_trait;
use likert_rate::random::{RandomSource, ScriptedRandom, SeededRandom};
use likert_rate::storage::{
    MemoryStorage, StorageBackend, StorageError, StorageKey, AGGREGATE_FIELD, USER_STATE_FIELD,
};
use likert_rate::telemetry::{
    InMemoryTelemetrySink, TelemetryError, TelemetryEvent, TelemetrySink, LIKERT_RATE_EVENT,
    STRING_FEEDBACK_EVENT,
};
use likert_rate::{Error, FeedbackWidget, InstanceConfig, Prompt, PromptOverride};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

fn labels(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn widget_on(storage: Arc<MemoryStorage>, config: InstanceConfig) -> FeedbackWidget {
    FeedbackWidget::builder("course/unit-1")
        .config(config)
        .storage(storage)
        .random(Arc::new(SeededRandom::new(11)))
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_tally_counts_latest_vote_per_user() {
    let storage = Arc::new(MemoryStorage::new());
    let widget = widget_on(storage, InstanceConfig::default());

    widget.vote("alice", 2).await.unwrap();
    assert_eq!(widget.tally().await.unwrap(), vec![0, 0, 1, 0, 0]);
    widget.vote("bob", 2).await.unwrap();
    assert_eq!(widget.tally().await.unwrap(), vec![0, 0, 2, 0, 0]);
    widget.vote("alice", 4).await.unwrap();
    assert_eq!(widget.tally().await.unwrap(), vec![0, 0, 1, 0, 1]);
}

#[tokio::test]
async fn test_tally_matches_final_votes_after_many_changes() {
    let storage = Arc::new(MemoryStorage::new());
    let widget = widget_on(storage, InstanceConfig::default());
    let random = SeededRandom::new(99);
    let mut last = std::collections::HashMap::new();

    for _ in 0..300 {
        let user = format!("user-{}", random.index_below(25));
        let vote = random.index_below(5);
        widget.vote(&user, vote as i64).await.unwrap();
        last.insert(user, vote);
    }

    let mut expected = vec![0u64; 5];
    for vote in last.values() {
        expected[*vote] += 1;
    }
    assert_eq!(widget.tally().await.unwrap(), expected);
}

#[tokio::test]
async fn test_invalid_vote_leaves_everything_untouched() {
    let storage = Arc::new(MemoryStorage::new());
    let widget = widget_on(storage, InstanceConfig::default());
    widget.vote("alice", 1).await.unwrap();

    for bad in [-1, 5, 1000] {
        let err = widget.vote("alice", bad).await.unwrap_err();
        assert!(matches!(err, Error::InvalidVote { .. }));
    }
    assert_eq!(widget.tally().await.unwrap(), vec![0, 1, 0, 0, 0]);
    let state = widget
        .store()
        .load_user_state("course/unit-1", "alice")
        .await
        .unwrap();
    assert_eq!(state.current_vote, Some(1));
}

#[tokio::test]
async fn test_override_inherits_default_fields() {
    let default = Prompt::new(
        "D",
        "L",
        labels(&["a", "b", "c", "d", "e"]),
        labels(&["1", "2", "3", "4", "5"]),
    );
    let config = InstanceConfig::builder()
        .default_prompt(default.clone())
        .add_prompt(PromptOverride::new().with_text("Custom"))
        .build()
        .unwrap();
    let widget = FeedbackWidget::builder("b")
        .config(config)
        .storage(Arc::new(MemoryStorage::new()))
        .random(Arc::new(ScriptedRandom::new().with_indices([1])))
        .build()
        .unwrap();

    let prompt = widget.prompt_for("u").await.unwrap();
    assert_eq!(prompt.text, "Custom");
    assert_eq!(prompt.likert_text, default.likert_text);
    assert_eq!(prompt.mouseover_labels, default.mouseover_labels);
    assert_eq!(prompt.icons, default.icons);
}

#[tokio::test]
async fn test_prompt_is_stable_and_reassigned_when_list_shrinks() {
    let storage = Arc::new(MemoryStorage::new());
    let three = InstanceConfig::builder()
        .add_prompt(PromptOverride::new().with_text("second"))
        .add_prompt(PromptOverride::new().with_text("third"))
        .build()
        .unwrap();
    let widget = FeedbackWidget::builder("b")
        .config(three)
        .storage(storage.clone())
        .random(Arc::new(ScriptedRandom::new().with_indices([2, 0]).with_percents([1.0])))
        .build()
        .unwrap();

    for _ in 0..3 {
        assert_eq!(widget.prompt_for("u").await.unwrap().text, "third");
    }

    // Author removes the third prompt.
    let two = InstanceConfig::builder()
        .add_prompt(PromptOverride::new().with_text("second"))
        .build()
        .unwrap();
    widget.store().save_config("b", &two).await.unwrap();
    assert!(widget.refresh_config().await.unwrap());

    let view = widget.view("u").await.unwrap();
    let state = widget.store().load_user_state("b", "u").await.unwrap();
    assert_eq!(state.prompt_index, Some(0));
    assert_eq!(view.prompt().unwrap().text, two.default_prompt.text);
}

#[tokio::test]
async fn test_display_decision_is_sticky_per_user() {
    let config = InstanceConfig::builder()
        .display_probability_percent(50.0)
        .build()
        .unwrap();
    let widget = FeedbackWidget::builder("b")
        .config(config)
        .storage(Arc::new(MemoryStorage::new()))
        .random(Arc::new(
            ScriptedRandom::new().with_percents([20.0, 80.0, 5.0, 95.0]),
        ))
        .build()
        .unwrap();

    assert!(widget.view("shown").await.unwrap().is_shown());
    let hidden = widget.view("hidden").await.unwrap();
    assert!(!hidden.is_shown());
    assert_eq!(hidden.render_html(), "");

    for _ in 0..3 {
        assert!(widget.view("shown").await.unwrap().is_shown());
        assert!(!widget.view("hidden").await.unwrap().is_shown());
    }
}

#[tokio::test]
async fn test_view_reflects_vote_and_feedback() {
    let widget = widget_on(Arc::new(MemoryStorage::new()), InstanceConfig::default());
    widget.vote("u", 3).await.unwrap();
    widget.feedback("u", "a").await.unwrap();
    widget.feedback("u", "b").await.unwrap();

    let view = widget.view("u").await.unwrap();
    let prompt = view.prompt().unwrap();
    assert_eq!(prompt.selected().map(|s| s.index), Some(3));
    assert_eq!(prompt.feedback_text, "b");
    assert!(view.render_html().contains(r#"title="Fair" checked"#));
}

#[tokio::test]
async fn test_telemetry_records_old_and_new_values() {
    let sink = Arc::new(InMemoryTelemetrySink::new(100));
    let widget = FeedbackWidget::builder("b")
        .storage(Arc::new(MemoryStorage::new()))
        .telemetry(sink.clone())
        .build()
        .unwrap();

    widget.vote("u", 0).await.unwrap();
    widget.vote("u", 3).await.unwrap();
    widget.feedback("u", "first").await.unwrap();
    widget.feedback("u", "second").await.unwrap();

    let votes = sink.get_events_by_name(LIKERT_RATE_EVENT);
    assert_eq!(votes.len(), 2);
    assert_eq!(votes[0].payload(), serde_json::json!({"old_vote": null, "new_vote": 0}));
    assert_eq!(votes[1].payload(), serde_json::json!({"old_vote": 0, "new_vote": 3}));

    let texts = sink.get_events_by_name(STRING_FEEDBACK_EVENT);
    assert_eq!(texts[1].payload()["old_feedback"], "first");
    assert_eq!(texts[1].payload()["new_feedback"], "second");
}

struct BrokenTracker;

#[async_trait]
impl TelemetrySink for BrokenTracker {
    async fn emit(&self, _: TelemetryEvent) -> Result<(), TelemetryError> {
        Err(TelemetryError::new("broken", "connection refused"))
    }
}

#[tokio::test]
async fn test_telemetry_failure_does_not_block_vote() {
    let widget = FeedbackWidget::builder("b")
        .storage(Arc::new(MemoryStorage::new()))
        .telemetry(Arc::new(BrokenTracker))
        .build()
        .unwrap();

    assert!(widget.vote("u", 1).await.unwrap().success);
    assert!(widget.feedback("u", "still saved").await.unwrap().success);
    assert_eq!(widget.tally().await.unwrap(), vec![0, 1, 0, 0, 0]);
}

struct ReadOnlyStorage;

#[async_trait]
impl StorageBackend for ReadOnlyStorage {
    async fn get(&self, _: &StorageKey) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(None)
    }
    async fn set(&self, _: &StorageKey, _: &[u8]) -> Result<(), StorageError> {
        Err(StorageError::Backend {
            backend: "read_only",
            message: "writes disabled".into(),
        })
    }
    async fn delete(&self, _: &StorageKey) -> Result<bool, StorageError> {
        Ok(false)
    }
    fn name(&self) -> &'static str {
        "read_only"
    }
}

#[tokio::test]
async fn test_storage_errors_propagate_unchanged() {
    let widget = FeedbackWidget::builder("b")
        .storage(Arc::new(ReadOnlyStorage))
        .build()
        .unwrap();

    let err = widget.vote("u", 1).await.unwrap_err();
    match err {
        Error::Storage(StorageError::Backend { backend, .. }) => assert_eq!(backend, "read_only"),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_instances_do_not_share_tallies() {
    let storage = Arc::new(MemoryStorage::new());
    let first = FeedbackWidget::builder("unit-1")
        .storage(storage.clone())
        .build()
        .unwrap();
    let second = FeedbackWidget::builder("unit-2")
        .storage(storage)
        .build()
        .unwrap();

    first.vote("u", 0).await.unwrap();
    second.vote("u", 4).await.unwrap();
    assert_eq!(first.tally().await.unwrap(), vec![1, 0, 0, 0, 0]);
    assert_eq!(second.tally().await.unwrap(), vec![0, 0, 0, 0, 1]);
}

/// Memory storage that rejects the first write of one field.
struct FailFirstWrite {
    inner: MemoryStorage,
    field: &'static str,
    armed: AtomicBool,
}

impl FailFirstWrite {
    fn new(field: &'static str) -> Self {
        Self {
            inner: MemoryStorage::new(),
            field,
            armed: AtomicBool::new(true),
        }
    }
}

#[async_trait]
impl StorageBackend for FailFirstWrite {
    async fn get(&self, key: &StorageKey) -> Result<Option<Vec<u8>>, StorageError> {
        self.inner.get(key).await
    }
    async fn set(&self, key: &StorageKey, value: &[u8]) -> Result<(), StorageError> {
        if key.field == self.field && self.armed.swap(false, Ordering::SeqCst) {
            return Err(StorageError::Unavailable("fail_first_write"));
        }
        self.inner.set(key, value).await
    }
    async fn delete(&self, key: &StorageKey) -> Result<bool, StorageError> {
        self.inner.delete(key).await
    }
    fn name(&self) -> &'static str {
        "fail_first_write"
    }
}

#[tokio::test]
async fn test_retry_after_failed_user_write_counts_once() {
    let widget = FeedbackWidget::builder("b")
        .storage(Arc::new(FailFirstWrite::new(USER_STATE_FIELD)))
        .build()
        .unwrap();

    let err = widget.vote("u", 1).await.unwrap_err();
    assert!(matches!(err, Error::Storage(StorageError::Unavailable(_))));
    assert!(widget.tally().await.unwrap().is_empty());

    widget.vote("u", 1).await.unwrap();
    assert_eq!(widget.tally().await.unwrap(), vec![0, 1, 0, 0, 0]);
}

#[tokio::test]
async fn test_failed_tally_write_restores_user_record() {
    let widget = FeedbackWidget::builder("b")
        .storage(Arc::new(FailFirstWrite::new(AGGREGATE_FIELD)))
        .build()
        .unwrap();

    let err = widget.vote("u", 2).await.unwrap_err();
    assert!(matches!(err, Error::Storage(StorageError::Unavailable(_))));
    let state = widget.store().load_user_state("b", "u").await.unwrap();
    assert_eq!(state.current_vote, None);

    widget.vote("u", 2).await.unwrap();
    widget.vote("u", 3).await.unwrap();
    assert_eq!(widget.tally().await.unwrap(), vec![0, 0, 0, 1, 0]);
}

#[tokio::test]
async fn test_shared_widget_picks_up_author_edits() {
    let storage = Arc::new(MemoryStorage::new());
    let widget = Arc::new(widget_on(storage, InstanceConfig::default()));
    assert_eq!(widget.config().prompt_count(), 2);

    let single = InstanceConfig::builder().build().unwrap();
    widget.store().save_config("course/unit-1", &single).await.unwrap();

    let shared = Arc::clone(&widget);
    let reloaded = tokio::spawn(async move { shared.refresh_config().await })
        .await
        .unwrap()
        .unwrap();
    assert!(reloaded);
    assert_eq!(widget.config().prompt_count(), 1);
    assert_eq!(
        widget.prompt_for("anyone").await.unwrap().text,
        single.default_prompt.text
    );
}
