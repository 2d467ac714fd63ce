//! Declarative transformer configuration.

use serde::{Deserialize, Serialize};

use crate::events::{EventConfig, EventTransformer};
use crate::seasonality::{SeasonalityConfig, SeasonalityTransformer};
use crate::transformer::FeatureTransformer;
use crate::trend::{TrendConfig, TrendTransformer};

/// One built-in transformer, tagged by `kind`:
///
/// ```json
/// {"kind": "seasonality", "period": 7, "order": 2}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeatureConfig {
    Trend(TrendConfig),
    Seasonality(SeasonalityConfig),
    Events(EventConfig),
}

impl FeatureConfig {
    pub fn build(&self) -> Box<dyn FeatureTransformer> {
        match self {
            Self::Trend(config) => Box::new(TrendTransformer::new(config.clone())),
            Self::Seasonality(config) => Box::new(SeasonalityTransformer::new(*config)),
            Self::Events(config) => Box::new(EventTransformer::new(config.clone())),
        }
    }
}

impl From<TrendConfig> for FeatureConfig {
    fn from(config: TrendConfig) -> Self {
        Self::Trend(config)
    }
}

impl From<SeasonalityConfig> for FeatureConfig {
    fn from(config: SeasonalityConfig) -> Self {
        Self::Seasonality(config)
    }
}

impl From<EventConfig> for FeatureConfig {
    fn from(config: EventConfig) -> Self {
        Self::Events(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tagged_list() {
        let configs: Vec<FeatureConfig> = serde_json::from_str(
            r#"[
                {"kind": "trend"},
                {"kind": "seasonality", "period": 7, "order": 2},
                {"kind": "events", "events": {"promo": ["2023-01-03"]}}
            ]"#,
        )
        .unwrap();
        assert_eq!(configs[0], FeatureConfig::Trend(TrendConfig::default()));
        assert_eq!(
            configs[1],
            FeatureConfig::Seasonality(SeasonalityConfig::new(7, 2))
        );
        let names: Vec<String> = configs
            .iter()
            .map(|config| config.build().name().to_string())
            .collect();
        assert_eq!(
            names,
            vec!["TrendTransformer", "SeasonalityTransformer", "EventTransformer"]
        );
    }
}
