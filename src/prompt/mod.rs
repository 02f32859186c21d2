//! Prompt definitions and per-user prompt assignment.
//!
//! An instance carries an ordered prompt list whose first entry is the
//! default. Every later entry is a [`PromptOverride`] merged onto that
//! default, and each user is pinned to one entry by [`PromptSelector`].

mod selector;
mod types;

pub use selector::PromptSelector;
pub use types::{Prompt, PromptOverride};
