use super::util::{propagate, MORNING_END, NIGHT_END};
use super::{Heuristic, PlanError, PlanOptions};
use crate::model::{day_start, hour_of, ArrivalRates, QueueLengths, StaffingVector, WEEK_HOURS};
use std::ops::Range;

/// Fin (exclue) de la bande du matin pour l'heuristique B.
const BLOCK_MORNING_END: usize = 11;
/// Largeur fixe d'un relèvement du matin pour l'heuristique B.
const BLOCK_MORNING_SPAN: usize = 4;
/// Début de la bande du soir pour l'heuristique C.
const EVENING_START: usize = 21;
/// Heure plancher (exclue) de la marche arrière du soir.
const EVENING_WALK_FLOOR: usize = 20;

/// Effet d'un relèvement de capacité.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Adjustment {
    /// Créneaux dont la capacité vient d'augmenter.
    pub raised: Range<usize>,
    /// Premier créneau antérieur dont la propagation doit être rejouée.
    pub replay_from: Option<usize>,
}

impl Adjustment {
    fn single(slot: usize) -> Self {
        Self {
            raised: slot..slot + 1,
            replay_from: None,
        }
    }
}

/// Politique de relèvement de capacité pour un créneau qui dépasse le plafond.
pub trait BlockPolicy {
    fn adjust(&self, slot: usize, servers: &mut [u32]) -> Adjustment;
}

fn raise(servers: &mut [u32], range: Range<usize>) -> Range<usize> {
    for c in &mut servers[range.clone()] {
        *c += 1;
    }
    range
}

fn raise_night_block(slot: usize, servers: &mut [u32]) -> Adjustment {
    let begin = day_start(slot);
    Adjustment {
        raised: raise(servers, begin..begin + NIGHT_END),
        replay_from: Some(begin),
    }
}

/// Heuristique A : seul le créneau courant monte.
#[derive(Debug, Default, Clone, Copy)]
pub struct IndependentHour;

impl BlockPolicy for IndependentHour {
    fn adjust(&self, slot: usize, servers: &mut [u32]) -> Adjustment {
        servers[slot] += 1;
        Adjustment::single(slot)
    }
}

/// Heuristique B : bloc de nuit entier, 4 heures fixes le matin.
#[derive(Debug, Default, Clone, Copy)]
pub struct BlockAware;

impl BlockPolicy for BlockAware {
    fn adjust(&self, slot: usize, servers: &mut [u32]) -> Adjustment {
        match hour_of(slot) {
            h if h < NIGHT_END => raise_night_block(slot, servers),
            h if h < BLOCK_MORNING_END => Adjustment {
                raised: raise(servers, slot..slot + BLOCK_MORNING_SPAN),
                replay_from: None,
            },
            _ => IndependentHour.adjust(slot, servers),
        }
    }
}

/// Heuristique C : matin jusqu'à la fin de bande, soirée équilibrée vers l'arrière.
#[derive(Debug, Default, Clone, Copy)]
pub struct Tightened;

impl BlockPolicy for Tightened {
    fn adjust(&self, slot: usize, servers: &mut [u32]) -> Adjustment {
        let begin = day_start(slot);
        match hour_of(slot) {
            h if h < NIGHT_END => raise_night_block(slot, servers),
            h if h < MORNING_END => Adjustment {
                raised: raise(servers, slot..begin + MORNING_END),
                replay_from: None,
            },
            h if h >= EVENING_START => {
                // Recule vers la première heure encore au même niveau (20h au plus tôt).
                let mut target = slot;
                while target > begin + EVENING_WALK_FLOOR && servers[target - 1] == servers[slot] {
                    target -= 1;
                }
                servers[target] += 1;
                Adjustment {
                    raised: target..target + 1,
                    replay_from: Some(target),
                }
            }
            _ => IndependentHour.adjust(slot, servers),
        }
    }
}

impl Heuristic {
    pub fn policy(&self) -> &'static dyn BlockPolicy {
        match self {
            Heuristic::IndependentHour => &IndependentHour,
            Heuristic::BlockAware => &BlockAware,
            Heuristic::Tightened => &Tightened,
        }
    }
}

pub(super) fn plan_capacity(
    arrivals: &ArrivalRates,
    heuristic: Heuristic,
    opts: &PlanOptions,
) -> Result<StaffingVector, PlanError> {
    opts.validate()?;
    let policy = heuristic.policy();
    let mut servers = StaffingVector::ones();
    let mut lengths = QueueLengths::empty_week();

    for slot in 0..WEEK_HOURS {
        loop {
            let next = opts.estimator.step(
                opts.service_rate,
                arrivals[slot],
                servers[slot],
                lengths[slot],
            );
            if next <= opts.ceiling {
                lengths.set(slot + 1, next);
                break;
            }
            if servers[slot] >= opts.max_servers {
                tracing::warn!(slot, servers = servers[slot], "server cap reached");
                return Err(PlanError::CapacityUnschedulable {
                    slot,
                    servers: servers[slot],
                });
            }
            let adjustment = policy.adjust(slot, servers.as_mut_slice());
            tracing::debug!(
                slot,
                length = next,
                raised = ?adjustment.raised,
                heuristic = heuristic.label(),
                "capacity raised"
            );
            if let Some(from) = adjustment.replay_from.filter(|&from| from < slot) {
                propagate(
                    arrivals,
                    servers.as_slice(),
                    &mut lengths,
                    from,
                    slot - 1,
                    opts,
                );
            }
        }
    }

    tracing::info!(
        heuristic = heuristic.label(),
        total_hours = servers.total_hours(),
        peak_length = lengths.peak(),
        "staffing planned"
    );
    Ok(servers)
}

/// Rejoue une couverture horaire depuis une file vide.
pub(super) fn replay(
    arrivals: &ArrivalRates,
    servers: &[u32],
    opts: &PlanOptions,
) -> Result<QueueLengths, PlanError> {
    opts.validate()?;
    if servers.len() != WEEK_HOURS {
        return Err(PlanError::Other(anyhow::anyhow!(
            "expected {WEEK_HOURS} hourly server counts, got {}",
            servers.len()
        )));
    }
    let mut lengths = QueueLengths::empty_week();
    propagate(arrivals, servers, &mut lengths, 0, WEEK_HOURS - 1, opts);
    Ok(lengths)
}
