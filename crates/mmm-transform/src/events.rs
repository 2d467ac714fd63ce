//! Binary event indicators.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use mmm_model::naming::is_snake_case_token;
use mmm_model::{FeatureStep, ROLE_SEPARATOR, Role};
use mmm_validate::{Dataset, parse_date};
use polars::prelude::Column;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::FeatureError;
use crate::transformer::{FeatureOutput, FeatureTransformer, ensure_absent};

pub const DEFAULT_EVENT_NAME: &str = "event";

/// Event dates: a flat list (one event named after `default_event_name`)
/// or a map of event name to dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventDates {
    Flat(Vec<String>),
    Named(BTreeMap<String, Vec<String>>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventConfig {
    pub events: EventDates,
    #[serde(default = "default_event_name")]
    pub default_event_name: String,
}

fn default_event_name() -> String {
    DEFAULT_EVENT_NAME.to_string()
}

impl EventConfig {
    pub fn flat<I, S>(dates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            events: EventDates::Flat(dates.into_iter().map(Into::into).collect()),
            default_event_name: default_event_name(),
        }
    }

    pub fn named<I, N, D, S>(events: I) -> Self
    where
        I: IntoIterator<Item = (N, D)>,
        N: Into<String>,
        D: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            events: EventDates::Named(
                events
                    .into_iter()
                    .map(|(name, dates)| (name.into(), dates.into_iter().map(Into::into).collect()))
                    .collect(),
            ),
            default_event_name: default_event_name(),
        }
    }

    #[must_use]
    pub fn with_default_event_name(mut self, name: impl Into<String>) -> Self {
        self.default_event_name = name.into();
        self
    }
}

/// An event with its dates resolved to calendar days.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ResolvedEvent {
    name: String,
    days: BTreeSet<NaiveDate>,
}

/// One `event__{name}` column per event: 1.0 on rows whose calendar day is an
/// event date, 0.0 elsewhere. Dates outside the dataset range are ignored.
#[derive(Debug, Clone)]
pub struct EventTransformer {
    config: EventConfig,
}

impl EventTransformer {
    pub fn new(config: EventConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EventConfig {
        &self.config
    }

    /// Events sorted by name, dates parsed.
    fn resolve(&self) -> Result<Vec<ResolvedEvent>, FeatureError> {
        if !is_snake_case_token(&self.config.default_event_name) {
            return Err(FeatureError::InvalidEventName {
                name: self.config.default_event_name.clone(),
            });
        }

        let raw: Vec<(&str, &[String])> = match &self.config.events {
            EventDates::Flat(dates) => {
                vec![(self.config.default_event_name.as_str(), dates.as_slice())]
            }
            EventDates::Named(events) => events
                .iter()
                .map(|(name, dates)| (name.as_str(), dates.as_slice()))
                .collect(),
        };

        let mut resolved = Vec::with_capacity(raw.len());
        for (name, dates) in raw {
            if !is_snake_case_token(name) {
                return Err(FeatureError::InvalidEventName {
                    name: name.to_string(),
                });
            }
            let days = dates
                .iter()
                .map(|value| {
                    parse_date(value).ok_or_else(|| FeatureError::InvalidEventDate {
                        event: name.to_string(),
                        value: value.clone(),
                    })
                })
                .collect::<Result<BTreeSet<_>, _>>()?;
            resolved.push(ResolvedEvent {
                name: name.to_string(),
                days,
            });
        }
        resolved.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(resolved)
    }
}

pub fn event_column(name: &str) -> String {
    format!("{}{ROLE_SEPARATOR}{name}", Role::Event)
}

impl FeatureTransformer for EventTransformer {
    fn name(&self) -> &str {
        "EventTransformer"
    }

    fn validate(&self) -> Result<(), FeatureError> {
        self.resolve().map(|_| ())
    }

    fn transform(&self, dataset: &Dataset) -> Result<FeatureOutput, FeatureError> {
        let events = self.resolve()?;
        let days: Vec<NaiveDate> = dataset.dates().iter().map(|ts| ts.date()).collect();
        let range = days.first().copied().zip(days.last().copied());

        let mut columns = Vec::with_capacity(events.len());
        let mut added = Vec::with_capacity(events.len());
        let mut ignored = 0usize;
        for event in &events {
            let column = event_column(&event.name);
            ensure_absent(self.name(), dataset, &column)?;

            let outside = event
                .days
                .iter()
                .filter(|day| range.is_none_or(|(first, last)| **day < first || **day > last))
                .count();
            if outside > 0 {
                warn!(
                    event = %event.name,
                    count = outside,
                    "Ignoring event dates outside the dataset range"
                );
            }
            ignored += outside;

            let values: Vec<f64> = days
                .iter()
                .map(|day| if event.days.contains(day) { 1.0 } else { 0.0 })
                .collect();
            debug!(
                event = %event.name,
                hits = values.iter().filter(|value| **value > 0.0).count(),
                "Computed event indicator"
            );
            columns.push(Column::new(column.as_str().into(), values));
            added.push(column);
        }

        let mut step = FeatureStep::new(self.name())
            .with_param("default_event_name", self.config.default_event_name.as_str())
            .with_param(
                "events",
                events.iter().map(|event| event.name.clone()).collect::<Vec<_>>(),
            )
            .with_added_features(added);
        if ignored > 0 {
            step = step.with_notes(format!(
                "{ignored} event date(s) outside the dataset range ignored"
            ));
        }
        Ok(FeatureOutput { columns, step })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_dates_use_default_name() {
        let transformer = EventTransformer::new(EventConfig::flat(["2023-01-03"]));
        let events = transformer.resolve().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, "event");
        assert_eq!(event_column(&events[0].name), "event__event");
    }

    #[test]
    fn named_events_sort_by_name() {
        let transformer = EventTransformer::new(EventConfig::named([
            ("promo", vec!["2023-01-03"]),
            ("black_friday", vec!["2023-11-24"]),
        ]));
        let names: Vec<String> = transformer
            .resolve()
            .unwrap()
            .into_iter()
            .map(|event| event.name)
            .collect();
        assert_eq!(names, vec!["black_friday", "promo"]);
    }

    #[test]
    fn rejects_bad_names_and_dates() {
        let err = EventTransformer::new(EventConfig::named([(
            "Black Friday",
            vec!["2023-11-24"],
        )]))
        .validate()
        .unwrap_err();
        assert!(matches!(
            err,
            FeatureError::InvalidEventName { ref name } if name == "Black Friday"
        ));

        let err = EventTransformer::new(
            EventConfig::flat(["2023-01-03"]).with_default_event_name("promo__x"),
        )
        .validate()
        .unwrap_err();
        assert!(matches!(err, FeatureError::InvalidEventName { .. }));

        let err = EventTransformer::new(EventConfig::named([("promo", vec!["03/01/2023"])]))
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            FeatureError::InvalidEventDate { ref value, .. } if value == "03/01/2023"
        ));
    }

    #[test]
    fn deserializes_flat_and_named_forms() {
        let flat: EventConfig = serde_json::from_str(r#"{"events": ["2023-01-03"]}"#).unwrap();
        assert_eq!(flat, EventConfig::flat(["2023-01-03"]));

        let named: EventConfig = serde_json::from_str(
            r#"{"events": {"promo": ["2023-01-03"]}, "default_event_name": "x"}"#,
        )
        .unwrap();
        assert_eq!(
            named,
            EventConfig::named([("promo", vec!["2023-01-03"])]).with_default_event_name("x")
        );
    }
}
