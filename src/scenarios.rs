//! Canned instances for demo and integration harnesses.

use crate::config::InstanceConfig;
use serde::Serialize;

/// A named page of widget instances.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemoScenario {
    pub name: String,
    pub instances: Vec<InstanceConfig>,
}

/// Fixed list of demo scenarios.
///
/// The single scenario stacks three stock instances, each shown to half of
/// the users.
pub fn list_demo_instances() -> Vec<DemoScenario> {
    let half = InstanceConfig {
        display_probability_percent: 50.0,
        ..InstanceConfig::default()
    };
    vec![DemoScenario {
        name: "RateXBlock".to_string(),
        instances: vec![half.clone(), half.clone(), half],
    }]
}
