use super::PlanOptions;
use crate::model::{hour_of, ArrivalRates, QueueLengths};

/// Bandes horaires du constructeur de planning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Band {
    /// [0, 7)
    Night,
    /// [7, 13)
    Morning,
    /// [13, 24)
    Rest,
}

pub(super) const NIGHT_END: usize = 7;
pub(super) const MORNING_END: usize = 13;

// Règles de travail communes au constructeur et au validateur.
pub(super) const MAX_DAYS: usize = 6;
pub(super) const MAX_NIGHTS: usize = 2;
pub(super) const MIN_PERIOD_HOURS: usize = 4;
pub(super) const MAX_PERIOD_HOURS: usize = 8;
pub(super) const MAX_DAY_HOURS: usize = 10;
pub(super) const MIN_SPLIT_GAP: usize = 2;
pub(super) const NIGHT_REST_BEFORE: usize = 8;
pub(super) const NIGHT_REST_AFTER: usize = 24;

impl Band {
    pub(super) fn of(slot: usize) -> Self {
        match hour_of(slot) {
            h if h < NIGHT_END => Band::Night,
            h if h < MORNING_END => Band::Morning,
            _ => Band::Rest,
        }
    }
}

/// Recalcule `lengths[j + 1]` pour `j` dans `from..=to`.
pub(super) fn propagate(
    arrivals: &ArrivalRates,
    servers: &[u32],
    lengths: &mut QueueLengths,
    from: usize,
    to: usize,
    opts: &PlanOptions,
) {
    for slot in from..=to {
        let next = opts.estimator.step(
            opts.service_rate,
            arrivals[slot],
            servers[slot],
            lengths[slot],
        );
        lengths.set(slot + 1, next);
    }
}
