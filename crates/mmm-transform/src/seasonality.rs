//! Fourier seasonality terms.

use std::f64::consts::PI;

use mmm_model::FeatureStep;
use mmm_validate::Dataset;
use polars::prelude::Column;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::FeatureError;
use crate::transformer::{FeatureOutput, FeatureTransformer, ensure_absent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonalityConfig {
    /// Cycle length in rows. Must be >= 1.
    pub period: u32,
    /// Number of harmonics. Must be >= 1.
    pub order: u32,
}

impl SeasonalityConfig {
    pub fn new(period: u32, order: u32) -> Self {
        Self { period, order }
    }
}

/// `sin`/`cos` pairs of `2πk·t/period` for `k = 1..=order`, `t` being the
/// row's 0-based rank.
#[derive(Debug, Clone)]
pub struct SeasonalityTransformer {
    config: SeasonalityConfig,
}

impl SeasonalityTransformer {
    pub fn new(config: SeasonalityConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SeasonalityConfig {
        &self.config
    }

    /// Output column names, harmonic by harmonic, `sin` before `cos`.
    pub fn column_names(&self) -> Vec<String> {
        (1..=self.config.order)
            .flat_map(|k| {
                ["sin", "cos"].map(|wave| fourier_column(self.config.period, k, wave))
            })
            .collect()
    }
}

pub fn fourier_column(period: u32, k: u32, wave: &str) -> String {
    format!("baseline__seasonality__fourier__p{period}__k{k}__{wave}")
}

impl FeatureTransformer for SeasonalityTransformer {
    fn name(&self) -> &str {
        "SeasonalityTransformer"
    }

    fn validate(&self) -> Result<(), FeatureError> {
        if self.config.period < 1 {
            return Err(FeatureError::parameter(
                self.name(),
                "period",
                format!("must be a positive integer, got {}", self.config.period),
            ));
        }
        if self.config.order < 1 {
            return Err(FeatureError::parameter(
                self.name(),
                "order",
                format!("must be a positive integer, got {}", self.config.order),
            ));
        }
        Ok(())
    }

    fn transform(&self, dataset: &Dataset) -> Result<FeatureOutput, FeatureError> {
        self.validate()?;
        let names = self.column_names();
        for name in &names {
            ensure_absent(self.name(), dataset, name)?;
        }

        let period = f64::from(self.config.period);
        let n = dataset.height();
        let mut columns = Vec::with_capacity(names.len());
        for k in 1..=self.config.order {
            let angles: Vec<f64> = (0..n)
                .map(|t| 2.0 * PI * f64::from(k) * t as f64 / period)
                .collect();
            let sin: Vec<f64> = angles.iter().map(|angle| angle.sin()).collect();
            let cos: Vec<f64> = angles.iter().map(|angle| angle.cos()).collect();
            columns.push(Column::new(
                fourier_column(self.config.period, k, "sin").into(),
                sin,
            ));
            columns.push(Column::new(
                fourier_column(self.config.period, k, "cos").into(),
                cos,
            ));
        }
        debug!(
            period = self.config.period,
            order = self.config.order,
            rows = n,
            "Computed Fourier terms"
        );

        let step = FeatureStep::new(self.name())
            .with_param("period", self.config.period)
            .with_param("order", self.config.order)
            .with_added_features(names);
        Ok(FeatureOutput { columns, step })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_follow_harmonic_order() {
        let transformer = SeasonalityTransformer::new(SeasonalityConfig::new(7, 2));
        assert_eq!(
            transformer.column_names(),
            vec![
                "baseline__seasonality__fourier__p7__k1__sin",
                "baseline__seasonality__fourier__p7__k1__cos",
                "baseline__seasonality__fourier__p7__k2__sin",
                "baseline__seasonality__fourier__p7__k2__cos",
            ]
        );
    }

    #[test]
    fn rejects_zero_period_and_order() {
        let err = SeasonalityTransformer::new(SeasonalityConfig::new(0, 2))
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            FeatureError::InvalidParameter { ref parameter, .. } if parameter == "period"
        ));

        let err = SeasonalityTransformer::new(SeasonalityConfig::new(7, 0))
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            FeatureError::InvalidParameter { ref parameter, .. } if parameter == "order"
        ));
    }

    #[test]
    fn period_one_is_accepted() {
        assert!(SeasonalityTransformer::new(SeasonalityConfig::new(1, 1))
            .validate()
            .is_ok());
    }
}
