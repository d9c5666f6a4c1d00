//! Models how an infectious disease spreads through a simulated population
//! under time-varying, activity-specific restrictions, and reduces the
//! resulting event stream to epidemiological summary statistics.
//!
//! The crate supplies the probabilistic core of an agent-based epidemic
//! simulation; the surrounding engine owns the population, the contact
//! schedule and the event loop. Per simulated day the engine asks the
//! [`policy::FixedPolicy`] for the day's restrictions; per contact it asks an
//! [`infection::InfectionModel`] (which consults a [`masks::FaceMaskModel`])
//! whether transmission occurs; the emitted events are later replayed,
//! independently, through [`analysis::calculate_r_values`].
//!
//! All randomness flows through caller-seeded generators, so runs with the
//! same seed and call order reproduce exactly.

pub mod analysis;
pub mod config;
pub mod error;
pub mod events;
pub mod infection;
pub mod log;
pub mod masks;
pub mod person;
pub mod policy;
pub mod utils;

pub use config::{InfectionParams, SimulationConfig};
pub use error::ContagionError;
pub use events::{Event, EventWriter, InfectionEvent, PersonStatusEvent};
pub use infection::{InfectionModel, ViralLoadInfectionModel};
pub use masks::{DefaultFaceMaskModel, FaceMask, FaceMaskModel};
pub use person::{DiseaseStatus, PersonAttributes, PersonId};
pub use policy::{FixedPolicy, Restriction};

pub use crate::log::{debug, error, info, trace, warn};
