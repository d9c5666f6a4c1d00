//! Mask kinds and the per-person mask compliance model.

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::InfectionParams;
use crate::person::PersonId;
use crate::policy::Restriction;

/// Face mask kinds, ordered by protection level.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum FaceMask {
    #[default]
    None,
    Cloth,
    Surgical,
    N95,
}

impl FaceMask {
    /// Multiplier on the amount of virus shed by an infectious wearer.
    pub fn shedding(self) -> f64 {
        match self {
            FaceMask::None => 1.0,
            FaceMask::Cloth => 0.6,
            FaceMask::Surgical => 0.3,
            FaceMask::N95 => 0.15,
        }
    }

    /// Multiplier on the amount of virus inhaled by a susceptible wearer.
    pub fn intake(self) -> f64 {
        match self {
            FaceMask::None => 1.0,
            FaceMask::Cloth => 0.5,
            FaceMask::Surgical => 0.3,
            FaceMask::N95 => 0.025,
        }
    }
}

/// Decides which mask a person actually wears on a given day.
pub trait FaceMaskModel {
    /// Clears per-iteration state. The caller must invoke this exactly once
    /// per iteration, before the first `worn_mask` query of that iteration.
    fn set_iteration(&mut self, iteration: u32);

    /// The mask `person` wears during `act` on `day` under `restriction`.
    fn worn_mask(
        &mut self,
        person: PersonId,
        act: &InfectionParams,
        day: u32,
        restriction: &Restriction,
    ) -> FaceMask;
}

/// Default model, which only requires people to wear the mask mandated by the
/// current [`Restriction`]. Whether a person complies is decided anew every
/// iteration, with one coin flip per person memoized for the whole iteration.
///
/// Each simulation run must own its model instance and rng so that parallel
/// runs stay reproducible.
pub struct DefaultFaceMaskModel {
    person_wears_mask: HashMap<PersonId, bool>,
    mask_compliance: f64,
    rng: StdRng,
}

impl DefaultFaceMaskModel {
    /// `mask_compliance` is the process-wide default compliance rate, in
    /// `[0, 1]`; restrictions may override it per activity.
    pub fn new(mask_compliance: f64, rng: StdRng) -> DefaultFaceMaskModel {
        DefaultFaceMaskModel {
            person_wears_mask: HashMap::new(),
            mask_compliance,
            rng,
        }
    }
}

impl FaceMaskModel for DefaultFaceMaskModel {
    fn set_iteration(&mut self, _iteration: u32) {
        // reset so the wearing decision is made anew each iteration
        self.person_wears_mask.clear();
    }

    fn worn_mask(
        &mut self,
        person: PersonId,
        _act: &InfectionParams,
        _day: u32,
        restriction: &Restriction,
    ) -> FaceMask {
        let required = restriction.required_mask();
        if required == FaceMask::None {
            return FaceMask::None;
        }

        // global compliance rate overwritten, re-sampled on every call
        if let Some(rate) = restriction.compliance_rate() {
            if rate >= 1.0 {
                return required;
            }
            if rate <= 0.0 {
                return FaceMask::None;
            }
            return if self.rng.random_bool(rate) {
                required
            } else {
                FaceMask::None
            };
        }

        if self.mask_compliance >= 1.0 {
            return required;
        }
        if self.mask_compliance <= 0.0 {
            return FaceMask::None;
        }

        let compliance = self.mask_compliance;
        let rng = &mut self.rng;
        let wears = *self
            .person_wears_mask
            .entry(person)
            .or_insert_with(|| rng.random_bool(compliance));

        if wears {
            required
        } else {
            FaceMask::None
        }
    }
}
