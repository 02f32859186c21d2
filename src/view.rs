//! View assembly.
//!
//! A hidden instance still produces a [`WidgetView`]; it just renders to
//! nothing, so the host's embed slot is always filled.

use crate::prompt::Prompt;
use html_escape::{encode_double_quoted_attribute, encode_text};
use serde::{Deserialize, Serialize};

/// One option on the likert scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleItem {
    pub index: usize,
    pub label: String,
    pub icon: String,
    pub selected: bool,
}

/// Everything a visible widget shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptView {
    pub text: String,
    pub likert_text: String,
    pub scale: Vec<ScaleItem>,
    pub feedback_text: String,
}

impl PromptView {
    pub fn selected(&self) -> Option<&ScaleItem> {
        self.scale.iter().find(|item| item.selected)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WidgetView {
    /// The user was sampled out; renders as empty content.
    Hidden,
    Shown(PromptView),
}

impl WidgetView {
    pub fn is_shown(&self) -> bool {
        matches!(self, WidgetView::Shown(_))
    }

    pub fn prompt(&self) -> Option<&PromptView> {
        match self {
            WidgetView::Shown(view) => Some(view),
            WidgetView::Hidden => None,
        }
    }

    /// HTML fragment for the host page. Empty when hidden.
    pub fn render_html(&self) -> String {
        match self {
            WidgetView::Hidden => String::new(),
            WidgetView::Shown(view) => render_prompt(view),
        }
    }
}

/// Zip labels and icons into scale items, marking `current_vote`.
pub fn build_scale(prompt: &Prompt, current_vote: Option<usize>) -> Vec<ScaleItem> {
    prompt
        .mouseover_labels
        .iter()
        .zip(prompt.icons.iter())
        .enumerate()
        .map(|(index, (label, icon))| ScaleItem {
            index,
            label: label.clone(),
            icon: icon.clone(),
            selected: current_vote == Some(index),
        })
        .collect()
}

pub fn build_view(
    prompt: &Prompt,
    current_vote: Option<usize>,
    feedback_text: &str,
    shown: bool,
) -> WidgetView {
    if !shown {
        return WidgetView::Hidden;
    }
    WidgetView::Shown(PromptView {
        text: prompt.text.clone(),
        likert_text: prompt.likert_text.clone(),
        scale: build_scale(prompt, current_vote),
        feedback_text: feedback_text.to_string(),
    })
}

fn render_prompt(view: &PromptView) -> String {
    let scale: String = view
        .scale
        .iter()
        .map(|item| {
            let title = encode_double_quoted_attribute(&item.label);
            format!(
                r#"<input id="radio_{i}" type="radio" name="rate_scale" class="rate_radio" title="{title}"{checked}><label for="radio_{i}" title="{title}">{icon}<span class="rate_sr_text">{label}</span></label>"#,
                i = item.index,
                title = title,
                checked = if item.selected { " checked" } else { "" },
                icon = encode_text(&item.icon),
                label = encode_text(&item.label),
            )
        })
        .collect();
    format!(
        concat!(
            r#"<div class="rate_block">"#,
            r#"<div class="rate_string_prompt">{text}</div>"#,
            r#"<textarea class="rate_string_input">{feedback}</textarea>"#,
            r#"<div class="rate_likert_prompt">{likert}</div>"#,
            r#"<div class="rate_likert_scale">{scale}</div>"#,
            r#"</div>"#
        ),
        text = encode_text(&view.text),
        feedback = encode_text(&view.feedback_text),
        likert = encode_text(&view.likert_text),
        scale = scale,
    )
}
