//! Per-contact infection probability.

use std::collections::BTreeMap;

use crate::config::InfectionParams;
use crate::error::ContagionError;
use crate::masks::FaceMaskModel;
use crate::person::PersonAttributes;
use crate::policy::Restriction;

/// Decides the probability that one contact transmits infection.
pub trait InfectionModel {
    /// Called by the host once per simulated day, before any probability
    /// queries for that day.
    fn set_iteration(&mut self, day: u32);

    /// Probability in `[0, 1)` that `infector` infects `target` during
    /// `joint_time` seconds of shared presence, with `target` engaged in
    /// `act1` and `infector` in `act2`.
    ///
    /// # Errors
    ///
    /// Returns a `ContagionError::ConfigError` when either person lacks a
    /// seeded `susceptibility`/`viral_load` attribute, or when `restrictions`
    /// has no entry for one of the two activities.
    fn calc_infection_probability(
        &mut self,
        target: &dyn PersonAttributes,
        infector: &dyn PersonAttributes,
        restrictions: &BTreeMap<String, Restriction>,
        act1: &InfectionParams,
        act2: &InfectionParams,
        joint_time: f64,
    ) -> Result<f64, ContagionError>;
}

/// Infection model sensitive to individual biological variation, reading the
/// per-person `susceptibility` and `viral_load` attributes.
///
/// Owns the mask model of its run; `set_iteration` forwards to it so the host
/// makes exactly one per-day call.
pub struct ViralLoadInfectionModel<M> {
    calibration_parameter: f64,
    mask_model: M,
    current_day: u32,
}

impl<M: FaceMaskModel> ViralLoadInfectionModel<M> {
    pub fn new(calibration_parameter: f64, mask_model: M) -> ViralLoadInfectionModel<M> {
        ViralLoadInfectionModel {
            calibration_parameter,
            mask_model,
            current_day: 0,
        }
    }
}

fn restriction<'a>(
    restrictions: &'a BTreeMap<String, Restriction>,
    act: &InfectionParams,
) -> Result<&'a Restriction, ContagionError> {
    restrictions.get(act.container_name()).ok_or_else(|| {
        ContagionError::ConfigError(format!(
            "no restriction for activity '{}'",
            act.container_name()
        ))
    })
}

impl<M: FaceMaskModel> InfectionModel for ViralLoadInfectionModel<M> {
    fn set_iteration(&mut self, day: u32) {
        self.current_day = day;
        self.mask_model.set_iteration(day);
    }

    fn calc_infection_probability(
        &mut self,
        target: &dyn PersonAttributes,
        infector: &dyn PersonAttributes,
        restrictions: &BTreeMap<String, Restriction>,
        act1: &InfectionParams,
        act2: &InfectionParams,
        joint_time: f64,
    ) -> Result<f64, ContagionError> {
        let r1 = restriction(restrictions, act1)?;
        let r2 = restriction(restrictions, act2)?;

        // the stricter of the two active restrictions dominates
        let ci_correction = r1.ci_correction().min(r2.ci_correction());
        // the less intimate of the two contact contexts dominates
        let contact_intensity = act1.contact_intensity().min(act2.contact_intensity());

        let susceptibility = target.susceptibility().ok_or_else(|| {
            ContagionError::ConfigError(format!(
                "person {} has no susceptibility attribute",
                target.person_id()
            ))
        })?;
        let viral_load = infector.viral_load().ok_or_else(|| {
            ContagionError::ConfigError(format!(
                "person {} has no viral load attribute",
                infector.person_id()
            ))
        })?;

        let shedding = self
            .mask_model
            .worn_mask(infector.person_id(), act2, self.current_day, r2)
            .shedding();
        let intake = self
            .mask_model
            .worn_mask(target.person_id(), act1, self.current_day, r1)
            .intake();

        Ok(1.0
            - (-self.calibration_parameter
                * susceptibility
                * viral_load
                * contact_intensity
                * joint_time
                * ci_correction
                * shedding
                * intake)
                .exp())
    }
}
