//! Per-user and per-instance state records.
//!
//! Fields that start out unset are `Option`s. Records written by older hosts
//! used `-1` for "unset"; any negative value read back is treated as absent.

use serde::{Deserialize, Deserializer, Serialize};

/// State of one user in one widget instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserState {
    /// Index into the instance's prompt list, fixed once drawn.
    #[serde(default, deserialize_with = "non_negative_index")]
    pub prompt_index: Option<usize>,
    /// Display draw in `[0, 100)`, fixed once drawn.
    #[serde(default, deserialize_with = "non_negative_sample")]
    pub display_sample: Option<f64>,
    /// Scale option the user currently selects.
    #[serde(default, deserialize_with = "non_negative_index")]
    pub current_vote: Option<usize>,
    #[serde(default)]
    pub feedback_text: String,
}

impl UserState {
    pub fn has_voted(&self) -> bool {
        self.current_vote.is_some()
    }
}

/// Summary state shared by every user of one instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateState {
    /// One counter per scale option; empty until the first vote.
    #[serde(default, alias = "vote_aggregate", deserialize_with = "nullable_tally")]
    pub vote_tally: Vec<u64>,
}

impl AggregateState {
    pub fn is_initialized(&self) -> bool {
        !self.vote_tally.is_empty()
    }

    /// Total number of users currently counted.
    pub fn total_votes(&self) -> u64 {
        self.vote_tally.iter().sum()
    }
}

fn non_negative_index<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<i64>::deserialize(deserializer)?;
    Ok(raw.and_then(|v| usize::try_from(v).ok()))
}

fn non_negative_sample<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?;
    Ok(raw.filter(|v| *v >= 0.0))
}

fn nullable_tally<'de, D>(deserializer: D) -> Result<Vec<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<u64>>::deserialize(deserializer)?.unwrap_or_default())
}
