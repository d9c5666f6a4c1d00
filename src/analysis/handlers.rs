//! Event handlers accumulating the two derived time series.

use std::collections::HashMap;

use crate::events::{day_of, Event};
use crate::person::{DiseaseStatus, PersonId};

/// Canonical analysis buckets, in output order.
pub const ACTIVITY_BUCKETS: [&str; 6] = ["edu", "leisure", "work&business", "home", "pt", "other"];

const TOTAL: &str = "total";

enum Rule {
    Suffix(&'static str),
    Prefix(&'static str),
}

/// Ordered coarsening cascade; the first matching rule wins.
const BUCKET_RULES: &[(Rule, &str)] = &[
    (Rule::Suffix("educ_primary"), "edu"),
    (Rule::Suffix("educ_secondary"), "edu"),
    (Rule::Suffix("educ_tertiary"), "edu"),
    (Rule::Suffix("educ_higher"), "edu"),
    (Rule::Suffix("educ_other"), "edu"),
    (Rule::Suffix("educ_kiga"), "edu"),
    (Rule::Suffix("leisure"), "leisure"),
    (Rule::Suffix("work"), "work&business"),
    (Rule::Suffix("business"), "work&business"),
    (Rule::Suffix("home"), "home"),
    (Rule::Prefix("pt"), "pt"),
];

/// Maps a raw infection type onto its analysis bucket.
pub fn coarsen_activity(infection_type: &str) -> &'static str {
    for (rule, bucket) in BUCKET_RULES {
        let matches = match rule {
            Rule::Suffix(suffix) => infection_type.ends_with(suffix),
            Rule::Prefix(prefix) => infection_type.starts_with(prefix),
        };
        if matches {
            return bucket;
        }
    }
    "other"
}

#[derive(Debug, Default)]
struct InfectedPerson {
    infected_count: u32,
    /// The day this person turned contagious; `None` if the event log never
    /// recorded the transition.
    contagious_day: Option<usize>,
}

/// Reconstructs who-infected-whom from the event stream.
///
/// Records are created on first reference, as infector or as newly
/// contagious, and live for the whole scenario replay.
#[derive(Debug, Default)]
pub struct ReproductionHandler {
    infected_persons: HashMap<PersonId, InfectedPerson>,
}

impl ReproductionHandler {
    pub fn handle(&mut self, event: &Event) {
        match event {
            Event::Infection(infection) => {
                self.infected_persons
                    .entry(infection.infector)
                    .or_default()
                    .infected_count += 1;
            }
            Event::PersonStatus(status) if status.status == DiseaseStatus::Contagious => {
                self.infected_persons
                    .entry(status.person)
                    .or_default()
                    .contagious_day = Some(day_of(status.time));
            }
            Event::PersonStatus(_) => {}
        }
    }

    /// Effective reproduction number for `day`, together with the number of
    /// persons who became contagious that day. R is defined as 0 when nobody
    /// did.
    pub fn r_value(&self, day: usize) -> (f64, usize) {
        let mut infectors = 0usize;
        let mut infected = 0u32;
        for person in self.infected_persons.values() {
            if person.contagious_day == Some(day) {
                infectors += 1;
                infected += person.infected_count;
            }
        }
        if infectors == 0 {
            (0.0, 0)
        } else {
            (f64::from(infected) / infectors as f64, infectors)
        }
    }
}

/// Per-bucket, per-day infection counts, with a synthetic total.
#[derive(Debug, Default)]
pub struct ActivityTally {
    infections_per_activity: HashMap<&'static str, HashMap<usize, u32>>,
}

impl ActivityTally {
    pub fn handle(&mut self, event: &Event) {
        let Event::Infection(infection) = event else {
            return;
        };
        let day = day_of(infection.time);
        let bucket = coarsen_activity(&infection.infection_type);
        for key in [bucket, TOTAL] {
            *self
                .infections_per_activity
                .entry(key)
                .or_default()
                .entry(day)
                .or_insert(0) += 1;
        }
    }

    pub fn infections(&self, bucket: &str, day: usize) -> u32 {
        self.infections_per_activity
            .get(bucket)
            .and_then(|per_day| per_day.get(&day))
            .copied()
            .unwrap_or(0)
    }

    pub fn total(&self, day: usize) -> u32 {
        self.infections(TOTAL, day)
    }

    /// Share of `bucket` among the day's infections, 0 when the day has none.
    pub fn share(&self, bucket: &str, day: usize) -> f64 {
        let total = self.total(day);
        if total == 0 {
            return 0.0;
        }
        f64::from(self.infections(bucket, day)) / f64::from(total)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::events::{InfectionEvent, PersonStatusEvent, SECONDS_PER_DAY};

    fn infection(time: f64, infector: usize, person: usize, infection_type: &str) -> Event {
        Event::Infection(InfectionEvent {
            time,
            infector: PersonId(infector),
            person: PersonId(person),
            infection_type: infection_type.to_string(),
        })
    }

    fn contagious(time: f64, person: usize) -> Event {
        Event::PersonStatus(PersonStatusEvent {
            time,
            person: PersonId(person),
            status: DiseaseStatus::Contagious,
        })
    }

    #[test]
    fn coarsening_cascade() {
        assert_eq!(coarsen_activity("work_educ_primary"), "edu");
        assert_eq!(coarsen_activity("educ_kiga"), "edu");
        assert_eq!(coarsen_activity("home_educ_higher"), "edu");
        assert_eq!(coarsen_activity("leisure"), "leisure");
        assert_eq!(coarsen_activity("home_leisure"), "leisure");
        assert_eq!(coarsen_activity("work"), "work&business");
        assert_eq!(coarsen_activity("business"), "work&business");
        assert_eq!(coarsen_activity("home"), "home");
        assert_eq!(coarsen_activity("pt_tram"), "pt");
        assert_eq!(coarsen_activity("shop_daily"), "other");
        assert_eq!(coarsen_activity(""), "other");
    }

    #[test]
    fn r_value_counts_one_infector() {
        let mut handler = ReproductionHandler::default();
        handler.handle(&infection(3.0 * SECONDS_PER_DAY + 60.0, 1, 2, "work"));
        handler.handle(&infection(3.0 * SECONDS_PER_DAY + 120.0, 1, 3, "home"));
        handler.handle(&contagious(3.0 * SECONDS_PER_DAY, 1));

        let (r, new_contagious) = handler.r_value(3);
        assert_eq!(r, 2.0);
        assert_eq!(new_contagious, 1);
    }

    #[test]
    fn r_value_is_zero_without_new_contagious() {
        let mut handler = ReproductionHandler::default();
        handler.handle(&infection(60.0, 1, 2, "work"));

        assert_eq!(handler.r_value(0), (0.0, 0));
        assert_eq!(handler.r_value(5), (0.0, 0));
    }

    #[test]
    fn r_value_averages_over_infectors() {
        let mut handler = ReproductionHandler::default();
        // person 1 infects three, person 2 infects one, both contagious day 2
        for target in [10, 11, 12] {
            handler.handle(&infection(2.2 * SECONDS_PER_DAY, 1, target, "home"));
        }
        handler.handle(&infection(2.4 * SECONDS_PER_DAY, 2, 13, "home"));
        handler.handle(&contagious(2.0 * SECONDS_PER_DAY, 1));
        handler.handle(&contagious(2.5 * SECONDS_PER_DAY, 2));
        // person 3 became contagious the same day but infected nobody
        handler.handle(&contagious(2.9 * SECONDS_PER_DAY, 3));

        let (r, new_contagious) = handler.r_value(2);
        assert_eq!(new_contagious, 3);
        assert_eq!(r, 4.0 / 3.0);
    }

    #[test]
    fn infectors_without_status_event_never_count() {
        let mut handler = ReproductionHandler::default();
        handler.handle(&infection(60.0, 1, 2, "work"));

        // no day may claim person 1 as newly contagious
        for day in 0..5 {
            assert_eq!(handler.r_value(day).1, 0);
        }
    }

    #[test]
    fn handlers_are_order_independent() {
        let events = vec![
            contagious(3.0 * SECONDS_PER_DAY, 1),
            infection(3.1 * SECONDS_PER_DAY, 1, 2, "work"),
            infection(3.2 * SECONDS_PER_DAY, 1, 3, "home"),
            contagious(4.0 * SECONDS_PER_DAY, 2),
            infection(4.5 * SECONDS_PER_DAY, 2, 4, "pt_bus"),
        ];

        let mut forward = ReproductionHandler::default();
        let mut backward = ReproductionHandler::default();
        for event in &events {
            forward.handle(event);
        }
        for event in events.iter().rev() {
            backward.handle(event);
        }

        for day in 0..6 {
            assert_eq!(forward.r_value(day), backward.r_value(day));
        }
    }

    #[test]
    fn tally_tracks_buckets_and_total() {
        let mut tally = ActivityTally::default();
        tally.handle(&infection(3.0 * SECONDS_PER_DAY, 1, 2, "work"));
        tally.handle(&infection(3.1 * SECONDS_PER_DAY, 1, 3, "home"));
        tally.handle(&contagious(3.0 * SECONDS_PER_DAY, 1));

        assert_eq!(tally.infections("work&business", 3), 1);
        assert_eq!(tally.infections("home", 3), 1);
        assert_eq!(tally.total(3), 2);
        assert_eq!(tally.share("work&business", 3), 0.5);
        assert_eq!(tally.share("home", 3), 0.5);
        assert_eq!(tally.share("edu", 3), 0.0);
        // a status event is not an infection
        assert_eq!(tally.total(2), 0);
    }

    #[test]
    fn total_equals_sum_of_buckets() {
        let mut tally = ActivityTally::default();
        let types = ["work", "home", "leisure", "pt_bus", "educ_kiga", "shop", "business"];
        for (i, infection_type) in types.iter().enumerate() {
            let day = i % 3;
            tally.handle(&infection(
                day as f64 * SECONDS_PER_DAY + 60.0,
                1,
                i + 10,
                infection_type,
            ));
        }

        for day in 0..4 {
            let sum: u32 = ACTIVITY_BUCKETS
                .iter()
                .map(|bucket| tally.infections(bucket, day))
                .sum();
            assert_eq!(sum, tally.total(day));
        }
    }

    #[test]
    fn empty_day_shares_are_zero() {
        let tally = ActivityTally::default();
        for bucket in ACTIVITY_BUCKETS {
            assert_eq!(tally.share(bucket, 0), 0.0);
        }
    }
}
