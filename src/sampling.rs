//! Per-user display sampling.
//!
//! Each user gets one draw in `[0, 100)` the first time the instance is
//! viewed. The widget is shown while that draw is below the configured
//! probability, so a user either always or never sees a given instance.

use crate::config::InstanceConfig;
use crate::random::RandomSource;
use crate::state::UserState;
use tracing::debug;

/// Decides once per user whether the instance renders.
pub struct DisplaySampler;

impl DisplaySampler {
    pub fn should_display(
        config: &InstanceConfig,
        state: &mut UserState,
        random: &dyn RandomSource,
    ) -> bool {
        let sample = match state.display_sample {
            Some(sample) => sample,
            None => {
                let drawn = random.percent();
                debug!(display_sample = drawn, "drew display sample");
                state.display_sample = Some(drawn);
                drawn
            }
        };
        sample < config.display_probability_percent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{ScriptedRandom, SeededRandom};

    fn config_with(percent: f64) -> InstanceConfig {
        InstanceConfig::builder()
            .display_probability_percent(percent)
            .build()
            .unwrap()
    }

    #[test]
    fn test_draws_once_then_sticks() {
        let config = config_with(50.0);
        let random = ScriptedRandom::new().with_percents([10.0, 90.0]);
        let mut state = UserState::default();

        assert!(DisplaySampler::should_display(&config, &mut state, &random));
        assert!(DisplaySampler::should_display(&config, &mut state, &random));
        assert_eq!(state.display_sample, Some(10.0));
        assert_eq!(random.percent_draws(), 1);
    }

    #[test]
    fn test_hidden_user_stays_hidden() {
        let config = config_with(50.0);
        let random = ScriptedRandom::new().with_percents([75.0, 1.0]);
        let mut state = UserState::default();
        for _ in 0..4 {
            assert!(!DisplaySampler::should_display(&config, &mut state, &random));
        }
    }

    #[test]
    fn test_extreme_probabilities() {
        let never = config_with(0.0);
        let always = config_with(100.0);
        let random = SeededRandom::new(3);
        for _ in 0..500 {
            let mut state = UserState::default();
            assert!(!DisplaySampler::should_display(&never, &mut state, &random));
            assert!(DisplaySampler::should_display(&always, &mut state, &random));
        }

        let mut edge = UserState::default();
        let zero = ScriptedRandom::new().with_percents([0.0]);
        assert!(!DisplaySampler::should_display(&never, &mut edge, &zero));
    }
}
