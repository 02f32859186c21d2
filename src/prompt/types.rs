//! Prompt records and the default/override merge.

use serde::{Deserialize, Serialize};

/// A fully specified prompt: question text plus a likert scale.
///
/// The first prompt of an instance is stored as a `Prompt` and acts as the
/// base every [`PromptOverride`] is merged onto.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    /// Free-text question.
    #[serde(alias = "string")]
    pub text: String,
    /// Question shown above the scale.
    #[serde(alias = "likert")]
    pub likert_text: String,
    /// One label per scale option.
    #[serde(alias = "mouseovers")]
    pub mouseover_labels: Vec<String>,
    /// One glyph per scale option.
    pub icons: Vec<String>,
}

impl Prompt {
    pub fn new(
        text: impl Into<String>,
        likert_text: impl Into<String>,
        mouseover_labels: Vec<String>,
        icons: Vec<String>,
    ) -> Self {
        Self {
            text: text.into(),
            likert_text: likert_text.into(),
            mouseover_labels,
            icons,
        }
    }

    /// Number of options on the scale.
    pub fn option_count(&self) -> usize {
        self.mouseover_labels.len()
    }

    /// Overlay every field present on `patch` onto a copy of `self`.
    pub fn merged_with(&self, patch: &PromptOverride) -> Prompt {
        Prompt {
            text: patch.text.clone().unwrap_or_else(|| self.text.clone()),
            likert_text: patch
                .likert_text
                .clone()
                .unwrap_or_else(|| self.likert_text.clone()),
            mouseover_labels: patch
                .mouseover_labels
                .clone()
                .unwrap_or_else(|| self.mouseover_labels.clone()),
            icons: patch.icons.clone().unwrap_or_else(|| self.icons.clone()),
        }
    }
}

/// A prompt that only replaces some fields of the default prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptOverride {
    #[serde(default, alias = "string", skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, alias = "likert", skip_serializing_if = "Option::is_none")]
    pub likert_text: Option<String>,
    #[serde(default, alias = "mouseovers", skip_serializing_if = "Option::is_none")]
    pub mouseover_labels: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icons: Option<Vec<String>>,
}

impl PromptOverride {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_likert_text(mut self, likert_text: impl Into<String>) -> Self {
        self.likert_text = Some(likert_text.into());
        self
    }

    pub fn with_scale(mut self, mouseover_labels: Vec<String>, icons: Vec<String>) -> Self {
        self.mouseover_labels = Some(mouseover_labels);
        self.icons = Some(icons);
        self
    }

    /// Promote to a full prompt, or name the first missing field.
    pub(crate) fn into_complete(self) -> std::result::Result<Prompt, &'static str> {
        Ok(Prompt {
            text: self.text.ok_or("text")?,
            likert_text: self.likert_text.ok_or("likert_text")?,
            mouseover_labels: self.mouseover_labels.ok_or("mouseover_labels")?,
            icons: self.icons.ok_or("icons")?,
        })
    }
}

impl From<Prompt> for PromptOverride {
    fn from(prompt: Prompt) -> Self {
        Self {
            text: Some(prompt.text),
            likert_text: Some(prompt.likert_text),
            mouseover_labels: Some(prompt.mouseover_labels),
            icons: Some(prompt.icons),
        }
    }
}
