//! Restriction snapshots and the fixed, calendar-driven policy that produces
//! them.
//!
//! A policy is authored as an ordered list of directives: a fixed value that
//! applies on exactly one day, or a range that interpolates linearly between
//! two dated endpoint values. Evaluation is a pure function of the directives
//! and the query day, so consecutive days never alias each other's maps.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::ContagionError;
use crate::masks::FaceMask;

/// Snapshot of a policy's effect on one activity for one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restriction {
    /// Fraction of the activity still taking place, in `[0, 1]`.
    remaining_fraction: f64,
    required_mask: FaceMask,
    /// Overrides the process-wide mask compliance rate when present.
    compliance_rate: Option<f64>,
    /// Correction factor on contact intensity, stricter below 1.
    ci_correction: f64,
}

impl Default for Restriction {
    fn default() -> Self {
        Restriction::none()
    }
}

impl Restriction {
    /// An unrestricted activity.
    pub fn none() -> Restriction {
        Restriction {
            remaining_fraction: 1.0,
            required_mask: FaceMask::None,
            compliance_rate: None,
            ci_correction: 1.0,
        }
    }

    /// Restriction limiting only the remaining fraction of an activity.
    pub fn of(remaining_fraction: f64) -> Restriction {
        Restriction {
            remaining_fraction,
            ..Restriction::none()
        }
    }

    pub fn with_required_mask(mut self, required_mask: FaceMask) -> Restriction {
        self.required_mask = required_mask;
        self
    }

    pub fn with_compliance_rate(mut self, compliance_rate: f64) -> Restriction {
        self.compliance_rate = Some(compliance_rate);
        self
    }

    pub fn with_ci_correction(mut self, ci_correction: f64) -> Restriction {
        self.ci_correction = ci_correction;
        self
    }

    pub fn remaining_fraction(&self) -> f64 {
        self.remaining_fraction
    }

    pub fn required_mask(&self) -> FaceMask {
        self.required_mask
    }

    pub fn compliance_rate(&self) -> Option<f64> {
        self.compliance_rate
    }

    pub fn ci_correction(&self) -> f64 {
        self.ci_correction
    }

    fn validate(&self) -> Result<(), ContagionError> {
        if !(0.0..=1.0).contains(&self.remaining_fraction) {
            return Err(ContagionError::ConfigError(format!(
                "remaining fraction must be within [0, 1], was {}",
                self.remaining_fraction
            )));
        }
        if self.ci_correction <= 0.0 {
            return Err(ContagionError::ConfigError(format!(
                "ci correction must be positive, was {}",
                self.ci_correction
            )));
        }
        if let Some(rate) = self.compliance_rate {
            if !(0.0..=1.0).contains(&rate) {
                return Err(ContagionError::ConfigError(format!(
                    "compliance rate must be within [0, 1], was {rate}"
                )));
            }
        }
        Ok(())
    }

    /// Linear interpolation between two restrictions at `t`, clamped to
    /// `[0, 1]`. Numeric fields interpolate; the mask requirement and a
    /// one-sided compliance override are taken from `from` until `t` reaches 1.
    pub fn interpolate(from: &Restriction, to: &Restriction, t: f64) -> Restriction {
        let t = t.clamp(0.0, 1.0);
        if t <= 0.0 {
            return from.clone();
        }
        if t >= 1.0 {
            return to.clone();
        }
        Restriction {
            remaining_fraction: lerp(from.remaining_fraction, to.remaining_fraction, t),
            required_mask: from.required_mask,
            compliance_rate: match (from.compliance_rate, to.compliance_rate) {
                (Some(a), Some(b)) => Some(lerp(a, b, t)),
                _ => from.compliance_rate,
            },
            ci_correction: lerp(from.ci_correction, to.ci_correction, t),
        }
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[derive(Debug, Clone)]
enum Directive {
    Fixed {
        day: u32,
        activity: String,
        value: Restriction,
    },
    Interpolated {
        start: NaiveDate,
        end: NaiveDate,
        activity: String,
        from: Restriction,
        to: Restriction,
    },
}

/// Policy that replays a fixed list of time-indexed directives.
#[derive(Debug, Clone)]
pub struct FixedPolicy {
    directives: Vec<Directive>,
}

impl FixedPolicy {
    pub fn config() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Resolves the restriction of every known activity for the query day.
    ///
    /// `base` supplies the value of each activity without a matching
    /// directive, typically [`Restriction::none`]. Directives apply in
    /// declaration order, so the latest declared directive wins where two
    /// cover the same activity and day. Returns a fresh map; callers replace
    /// the previous day's map rather than mutating shared state.
    pub fn evaluate(
        &self,
        day: u32,
        date: NaiveDate,
        base: &BTreeMap<String, Restriction>,
    ) -> BTreeMap<String, Restriction> {
        let mut restrictions = base.clone();
        for directive in &self.directives {
            match directive {
                Directive::Fixed {
                    day: fixed_day,
                    activity,
                    value,
                } => {
                    if *fixed_day == day {
                        restrictions.insert(activity.clone(), value.clone());
                    }
                }
                Directive::Interpolated {
                    start,
                    end,
                    activity,
                    from,
                    to,
                } => {
                    if date < *start || date > *end {
                        continue;
                    }
                    let span = (*end - *start).num_days();
                    let t = if span == 0 {
                        1.0
                    } else {
                        (date - *start).num_days() as f64 / span as f64
                    };
                    restrictions.insert(activity.clone(), Restriction::interpolate(from, to, t));
                }
            }
        }
        restrictions
    }
}

/// Builds a validated [`FixedPolicy`] from individual directives.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    directives: Vec<Directive>,
}

impl ConfigBuilder {
    /// Overrides `activity` with `value` on exactly `day`.
    #[must_use]
    pub fn restrict(mut self, day: u32, value: Restriction, activity: &str) -> ConfigBuilder {
        self.directives.push(Directive::Fixed {
            day,
            activity: activity.to_string(),
            value,
        });
        self
    }

    /// Interpolates `activity` linearly from `from` at `start` to `to` at
    /// `end`, both dates inclusive.
    #[must_use]
    pub fn interpolate(
        mut self,
        start: NaiveDate,
        end: NaiveDate,
        from: Restriction,
        to: Restriction,
        activity: &str,
    ) -> ConfigBuilder {
        self.directives.push(Directive::Interpolated {
            start,
            end,
            activity: activity.to_string(),
            from,
            to,
        });
        self
    }

    /// Validates every directive and produces the policy.
    ///
    /// # Errors
    ///
    /// Returns a `ContagionError::ConfigError` for an interpolation range
    /// whose end date precedes its start date, or for any restriction field
    /// outside its domain.
    pub fn build(self) -> Result<FixedPolicy, ContagionError> {
        for directive in &self.directives {
            match directive {
                Directive::Fixed { value, .. } => value.validate()?,
                Directive::Interpolated {
                    start,
                    end,
                    activity,
                    from,
                    to,
                } => {
                    if end < start {
                        return Err(ContagionError::ConfigError(format!(
                            "interpolation for '{activity}' ends {end} before it starts {start}"
                        )));
                    }
                    from.validate()?;
                    to.validate()?;
                }
            }
        }
        Ok(FixedPolicy {
            directives: self.directives,
        })
    }
}
