use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};

/// A stable person identifier assigned by the simulation engine.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct PersonId(pub usize);

impl Display for PersonId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Debug for PersonId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Person {}", self.0)
    }
}

/// Disease progression states as they appear in the event logs.
///
/// The analysis only acts on the transition into `Contagious`; the remaining
/// states are carried so status events round-trip unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiseaseStatus {
    Susceptible,
    InfectedButNotContagious,
    Contagious,
    ShowingSymptoms,
    SeriouslySick,
    Critical,
    Recovered,
}

/// Read-only view of a person owned by the simulation engine.
///
/// `susceptibility` and `viral_load` are assigned once at population build
/// time and are immutable for the run. A `None` means the attribute was never
/// seeded; the infection model treats that as a configuration error rather
/// than substituting a default.
pub trait PersonAttributes {
    fn person_id(&self) -> PersonId;

    /// Individual scaling of the chance to get infected.
    fn susceptibility(&self) -> Option<f64>;

    /// Individual scaling of the amount of virus shed while infectious.
    fn viral_load(&self) -> Option<f64>;
}
