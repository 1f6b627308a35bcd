//! Layout constants, loadable from TOML.
//!
//! Every key is optional; missing keys keep their default.
//!
//! ```toml
//! start_year = -4004
//! end_year = -400
//! drawable_width = 4800.0
//!
//! [zoom]
//! step = 1.3
//! min = 0.3
//! max = 3.0
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layout::{CoordinateMapper, Domain, LaneParams, LayoutError, Zoom};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error("{key} must be {expected}, got {value}")]
    InvalidValue {
        key: &'static str,
        expected: &'static str,
        value: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    pub start_year: i32,
    pub end_year: i32,
    /// Pixels the domain spans at zoom 1.
    pub drawable_width: f64,
    pub left_margin: f64,
    /// Width of a person bar with no death year.
    pub open_ended_width: f64,
    /// Years between axis ticks.
    pub marker_interval: i32,
    pub people: PeopleConfig,
    pub events: EventsConfig,
    pub periods: PeriodsConfig,
    pub zoom: ZoomConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeopleConfig {
    pub base_top: f64,
    pub lane_height: f64,
    pub max_probes: u32,
    pub bar_height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    pub label_top: f64,
    pub label_lane_height: f64,
    pub label_probes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeriodsConfig {
    pub top: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    pub step: f64,
    pub min: f64,
    pub max: f64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            start_year: -4004,
            end_year: -400,
            drawable_width: 4800.0,
            left_margin: 100.0,
            open_ended_width: 240.0,
            marker_interval: 500,
            people: PeopleConfig::default(),
            events: EventsConfig::default(),
            periods: PeriodsConfig::default(),
            zoom: ZoomConfig::default(),
        }
    }
}

impl Default for PeopleConfig {
    fn default() -> Self {
        Self {
            base_top: 250.0,
            lane_height: 40.0,
            max_probes: 50,
            bar_height: 32.0,
        }
    }
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            label_top: 40.0,
            label_lane_height: 18.0,
            label_probes: 4,
        }
    }
}

impl Default for PeriodsConfig {
    fn default() -> Self {
        Self {
            top: 100.0,
            height: 1200.0,
        }
    }
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            step: 1.3,
            min: 0.3,
            max: 3.0,
        }
    }
}

impl TimelineConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: TimelineConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        Domain::new(self.start_year, self.end_year)?;
        positive("drawable_width", self.drawable_width)?;
        non_negative("left_margin", self.left_margin)?;
        non_negative("open_ended_width", self.open_ended_width)?;
        positive("marker_interval", f64::from(self.marker_interval))?;
        positive("people.lane_height", self.people.lane_height)?;
        positive("people.bar_height", self.people.bar_height)?;
        positive("people.max_probes", f64::from(self.people.max_probes))?;
        positive("events.label_lane_height", self.events.label_lane_height)?;
        positive("events.label_probes", f64::from(self.events.label_probes))?;
        non_negative("periods.height", self.periods.height)?;

        let min = Zoom::new(self.zoom.min)?;
        let max = Zoom::new(self.zoom.max)?;
        if min > max {
            return Err(ConfigError::InvalidValue {
                key: "zoom.min",
                expected: "at most zoom.max",
                value: self.zoom.min,
            });
        }
        if !(self.zoom.step > 1.0 && self.zoom.step.is_finite()) {
            return Err(ConfigError::InvalidValue {
                key: "zoom.step",
                expected: "greater than 1",
                value: self.zoom.step,
            });
        }
        Ok(())
    }

    /// The year domain. A config that skipped [`Self::validate`] and holds
    /// a degenerate range gets the default domain.
    pub fn domain(&self) -> Domain {
        Domain::new(self.start_year, self.end_year).unwrap_or_else(|err| {
            tracing::warn!(%err, "using default timeline domain");
            Domain::default()
        })
    }

    pub fn mapper(&self, zoom: Zoom) -> CoordinateMapper {
        CoordinateMapper {
            domain: self.domain(),
            drawable_width: self.drawable_width,
            left_margin: self.left_margin,
            zoom,
            open_ended_width: self.open_ended_width,
        }
    }

    pub fn people_lanes(&self) -> LaneParams {
        LaneParams {
            base_top: self.people.base_top,
            lane_height: self.people.lane_height,
            max_probes: self.people.max_probes,
        }
    }

    pub fn event_label_lanes(&self) -> LaneParams {
        LaneParams {
            base_top: self.events.label_top,
            lane_height: self.events.label_lane_height,
            max_probes: self.events.label_probes,
        }
    }

    /// Zoom bounds as validated values, `(min, max)`.
    pub fn zoom_bounds(&self) -> (Zoom, Zoom) {
        let min = Zoom::new(self.zoom.min).unwrap_or(Zoom::ONE);
        let max = Zoom::new(self.zoom.max).unwrap_or(Zoom::ONE);
        (min, max)
    }
}

fn positive(key: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            key,
            expected: "positive",
            value,
        })
    }
}

fn non_negative(key: &'static str, value: f64) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            key,
            expected: "non-negative",
            value,
        })
    }
}
