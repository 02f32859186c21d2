//! Author-facing instance configuration.
//!
//! On the wire an instance is an ordered `prompts` list plus a display
//! probability. The first list entry must be complete and becomes the
//! default prompt; every later entry may omit fields.
//!
//! ```rust
//! use likert_rate::config::InstanceConfig;
//!
//! let config = InstanceConfig::from_yaml_str(
//!     r#"
//! display_probability_percent: 25
//! prompts:
//!   - text: "How was this section?"
//!     likert_text: "Rate this section."
//!     mouseover_labels: [Great, Fine, Poor]
//!     icons: ["+", "=", "-"]
//!   - text: "What was missing?"
//! "#,
//! )
//! .unwrap();
//! assert_eq!(config.prompt_count(), 2);
//! assert_eq!(config.resolve_prompt(1).likert_text, "Rate this section.");
//! ```

use crate::error::{Error, ErrorContext};
use crate::prompt::{Prompt, PromptOverride};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Probability used when an author sets none.
pub const DEFAULT_DISPLAY_PROBABILITY: f64 = 100.0;

/// Configuration shared by all users of one embedded instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawInstanceConfig", into = "RawInstanceConfig")]
pub struct InstanceConfig {
    /// Prompt at index 0; base for every override.
    pub default_prompt: Prompt,
    /// Prompts at index 1.. of the list.
    pub overrides: Vec<PromptOverride>,
    /// Percent of users who see the widget at all, in `[0, 100]`.
    pub display_probability_percent: f64,
}

impl InstanceConfig {
    pub fn builder() -> InstanceConfigBuilder {
        InstanceConfigBuilder::default()
    }

    /// Build from an ordered prompt list whose head is the default prompt.
    pub fn from_prompts(
        prompts: Vec<PromptOverride>,
        display_probability_percent: f64,
    ) -> Result<Self> {
        let mut iter = prompts.into_iter();
        let head = iter.next().ok_or_else(|| {
            Error::configuration_with_context(
                "prompt list is empty",
                ErrorContext::new().with_field_path("prompts"),
            )
        })?;
        let default_prompt = head.into_complete().map_err(|missing| {
            Error::configuration_with_context(
                "default prompt must set every field",
                ErrorContext::new().with_field_path(format!("prompts[0].{}", missing)),
            )
        })?;
        let config = Self {
            default_prompt,
            overrides: iter.collect(),
            display_probability_percent,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(source: &str) -> Result<Self> {
        let raw: RawInstanceConfig = serde_yaml::from_str(source)?;
        raw.try_into()
    }

    pub fn from_json_str(source: &str) -> Result<Self> {
        let raw: RawInstanceConfig = serde_json::from_str(source)?;
        raw.try_into()
    }

    /// Load a `.json`, `.yaml` or `.yml` file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content),
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            other => Err(Error::configuration_with_context(
                "unsupported config file extension",
                ErrorContext::new()
                    .with_field_path(path.display().to_string())
                    .with_details(format!("extension {:?}", other)),
            )),
        }
    }

    /// Number of prompts in the list, never zero.
    pub fn prompt_count(&self) -> usize {
        1 + self.overrides.len()
    }

    /// The effective prompt at `index`; out-of-range indices fall back to the default.
    pub fn resolve_prompt(&self, index: usize) -> Prompt {
        match index.checked_sub(1).and_then(|i| self.overrides.get(i)) {
            Some(patch) => self.default_prompt.merged_with(patch),
            None => self.default_prompt.clone(),
        }
    }

    /// The prompt list as authored, default first.
    pub fn prompts(&self) -> Vec<PromptOverride> {
        std::iter::once(PromptOverride::from(self.default_prompt.clone()))
            .chain(self.overrides.iter().cloned())
            .collect()
    }

    pub fn validate(&self) -> Result<()> {
        let p = self.display_probability_percent;
        if !p.is_finite() || !(0.0..=100.0).contains(&p) {
            return Err(Error::configuration_with_context(
                "display probability must be within [0, 100]",
                ErrorContext::new()
                    .with_field_path("display_probability_percent")
                    .with_details(format!("got {}", p)),
            ));
        }
        for index in 0..self.prompt_count() {
            let prompt = self.resolve_prompt(index);
            if prompt.mouseover_labels.is_empty() {
                return Err(Error::configuration_with_context(
                    "prompt has an empty scale",
                    ErrorContext::new().with_field_path(format!("prompts[{}]", index)),
                ));
            }
            if prompt.icons.len() != prompt.mouseover_labels.len() {
                return Err(Error::configuration_with_context(
                    "icons and mouseover labels differ in length",
                    ErrorContext::new()
                        .with_field_path(format!("prompts[{}]", index))
                        .with_details(format!(
                            "{} icons, {} labels",
                            prompt.icons.len(),
                            prompt.mouseover_labels.len()
                        )),
                ));
            }
        }
        Ok(())
    }
}

impl Default for InstanceConfig {
    fn default() -> Self {
        Self {
            default_prompt: builtin_default_prompt(),
            overrides: vec![PromptOverride::new()
                .with_text("What could be improved to make this section more clear?")
                .with_likert_text("Was this section clear or confusing?")],
            display_probability_percent: DEFAULT_DISPLAY_PROBABILITY,
        }
    }
}

/// The stock feedback question and five-point smiley scale.
pub fn builtin_default_prompt() -> Prompt {
    let owned = |items: &[&str]| -> Vec<String> { items.iter().map(|s| s.to_string()).collect() };
    Prompt::new(
        "Please provide us feedback on this section.",
        "Please rate your overall experience with this section.",
        owned(&["Excellent", "Good", "Average", "Fair", "Poor"]),
        owned(&["😁", "😊", "😐", "☹", "😟"]),
    )
}

#[derive(Clone, Serialize, Deserialize)]
struct RawInstanceConfig {
    #[serde(default = "default_prompt_list")]
    prompts: Vec<PromptOverride>,
    #[serde(default = "default_probability", alias = "p")]
    display_probability_percent: f64,
}

fn default_prompt_list() -> Vec<PromptOverride> {
    InstanceConfig::default().prompts()
}

fn default_probability() -> f64 {
    DEFAULT_DISPLAY_PROBABILITY
}

impl TryFrom<RawInstanceConfig> for InstanceConfig {
    type Error = Error;

    fn try_from(raw: RawInstanceConfig) -> Result<Self> {
        InstanceConfig::from_prompts(raw.prompts, raw.display_probability_percent)
    }
}

impl From<InstanceConfig> for RawInstanceConfig {
    fn from(config: InstanceConfig) -> Self {
        Self {
            prompts: config.prompts(),
            display_probability_percent: config.display_probability_percent,
        }
    }
}

/// Builder for InstanceConfig
#[derive(Debug, Default)]
pub struct InstanceConfigBuilder {
    default_prompt: Option<Prompt>,
    overrides: Vec<PromptOverride>,
    display_probability_percent: Option<f64>,
}

impl InstanceConfigBuilder {
    /// Replace the built-in default prompt
    pub fn default_prompt(mut self, prompt: Prompt) -> Self {
        self.default_prompt = Some(prompt);
        self
    }

    /// Append a prompt after the default
    pub fn add_prompt(mut self, prompt: PromptOverride) -> Self {
        self.overrides.push(prompt);
        self
    }

    /// Set the display probability in percent
    pub fn display_probability_percent(mut self, percent: f64) -> Self {
        self.display_probability_percent = Some(percent);
        self
    }

    pub fn build(self) -> Result<InstanceConfig> {
        let config = InstanceConfig {
            default_prompt: self.default_prompt.unwrap_or_else(builtin_default_prompt),
            overrides: self.overrides,
            display_probability_percent: self
                .display_probability_percent
                .unwrap_or(DEFAULT_DISPLAY_PROBABILITY),
        };
        config.validate()?;
        Ok(config)
    }
}
