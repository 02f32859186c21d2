//! Prompt assignment: draw once per user, keep it while it stays valid.

use super::Prompt;
use crate::config::InstanceConfig;
use crate::random::RandomSource;
use crate::state::UserState;
use tracing::{debug, warn};

/// Chooses and memoizes which prompt a user sees.
pub struct PromptSelector;

impl PromptSelector {
    /// Resolve the prompt for `state`, assigning one first if needed.
    ///
    /// An index that no longer fits the configured list (the author removed
    /// prompts) is replaced by a fresh uniform draw.
    pub fn select(
        config: &InstanceConfig,
        state: &mut UserState,
        random: &dyn RandomSource,
    ) -> Prompt {
        let count = config.prompt_count();
        let index = match state.prompt_index {
            Some(index) if index < count => index,
            stale => {
                let drawn = random.index_below(count);
                if let Some(old) = stale {
                    warn!(
                        old_index = old,
                        new_index = drawn,
                        prompt_count = count,
                        "assigned prompt no longer exists, reassigning"
                    );
                } else {
                    debug!(prompt_index = drawn, prompt_count = count, "assigned prompt");
                }
                state.prompt_index = Some(drawn);
                drawn
            }
        };
        config.resolve_prompt(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::PromptOverride;
    use crate::random::{ScriptedRandom, SeededRandom};

    fn three_prompt_config() -> InstanceConfig {
        InstanceConfig::builder()
            .add_prompt(PromptOverride::new().with_text("second"))
            .add_prompt(PromptOverride::new().with_text("third"))
            .build()
            .unwrap()
    }

    #[test]
    fn test_assigns_index_in_range_and_keeps_it() {
        let config = three_prompt_config();
        let random = SeededRandom::new(7);
        for _ in 0..50 {
            let mut state = UserState::default();
            let first = PromptSelector::select(&config, &mut state, &random);
            let index = state.prompt_index.unwrap();
            assert!(index < config.prompt_count());

            for _ in 0..5 {
                let again = PromptSelector::select(&config, &mut state, &random);
                assert_eq!(again, first);
                assert_eq!(state.prompt_index, Some(index));
            }
        }
    }

    #[test]
    fn test_uses_scripted_draw() {
        let config = three_prompt_config();
        let random = ScriptedRandom::new().with_indices([2]);
        let mut state = UserState::default();
        let prompt = PromptSelector::select(&config, &mut state, &random);
        assert_eq!(state.prompt_index, Some(2));
        assert_eq!(prompt.text, "third");
        assert_eq!(prompt.likert_text, config.default_prompt.likert_text);
    }

    #[test]
    fn test_redraws_after_list_shrinks() {
        let config = three_prompt_config();
        let mut state = UserState {
            prompt_index: Some(2),
            ..UserState::default()
        };
        let random = ScriptedRandom::new().with_indices([0]);

        let shrunk = InstanceConfig::builder()
            .add_prompt(PromptOverride::new().with_text("second"))
            .build()
            .unwrap();
        assert_eq!(PromptSelector::select(&config, &mut state, &random).text, "third");

        let prompt = PromptSelector::select(&shrunk, &mut state, &random);
        assert_eq!(state.prompt_index, Some(0));
        assert_eq!(prompt, shrunk.default_prompt);
    }
}
