//! Phenology timelines for street trees.
//!
//! Daily weather for a site is first turned into derived variables
//! (photoperiod, growing degree days, chill, stress flags) by
//! [`normalize::normalize`]. Each species profile in the
//! [`registry::SpeciesRegistry`] then maps a derived day to a phase and a
//! display color, giving one [`timeline::PhenologyTimeline`] per species.
//! Individual trees reuse their grid cell's timeline with a small day shift
//! from [`adjustment::calculate_adjustment_days`].

pub mod adjustment;
pub mod color;
pub mod error;
pub mod model;
pub mod normalize;
pub mod registry;
pub mod solar;
pub mod species;
pub mod thresholds;
pub mod timeline;

pub use adjustment::{calculate_adjustment_days, shift_timeline, AdjustmentTraitsTable};
pub use color::Rgb;
pub use error::{PhenologyError, Result};
pub use model::{DailyState, Phase};
pub use normalize::{normalize, DerivedDailyVariables, DerivedSeries, NormalizerConfig};
pub use registry::SpeciesRegistry;
pub use species::SpeciesProfile;
pub use thresholds::{adjust_thresholds, LocationModifiers};
pub use timeline::{resolve_states, resolve_timeline, PhenologyTimeline};
