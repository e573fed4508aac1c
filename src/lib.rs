//! # flightphase
//!
//! Segmentation of aircraft research flights from high-rate instrument records and
//! dropsonde launch catalogues.
//!
//! * [`timeseries`] – time index, windowed lookups, extremum/threshold searches, and the
//!   heading-matched circle boundary resolver used to **construct** segment boundaries.
//! * [`validation`] – the rule engine that **verifies** a curated segment list against the
//!   raw data and the sonde catalogue.
//! * [`flight`] – typed flight/segment model, sonde attachment, derived circle metrics, and
//!   per-segment summaries.
//! * [`events`] – the dropsonde catalogue.
//!
//! Loading datasets, YAML, plotting, and report rendering are left to the caller.
pub mod constants;
pub mod events;
pub mod flight;
pub mod flightphase_errors;
pub mod time;
pub mod timeseries;
pub mod validation;

pub use constants::{SondeFlag, SondesByFlag};
pub use events::{SondeCatalogue, SondeRecord};
pub use flight::{FlightSegment, ResearchFlight};
pub use flightphase_errors::FlightPhaseError;
pub use timeseries::TimeSeries;
