//! Interface vers l'optimiseur combinatoire externe.
//!
//! L'optimiseur reçoit un vecteur de couverture minimale et un nombre maximal
//! de médecins, et renvoie pour chaque médecin et chaque jour un motif de
//! garde tiré de [`shift_catalog`]. Aucun solveur n'est fourni ici : la
//! bibliothèque ne fait que préparer le catalogue, relire la solution et la
//! rendre vérifiable par le validateur.

use crate::model::{
    Doctor, DoctorId, Period, Roster, StaffingVector, BASELINE_DOCTORS, DAYS_PER_WEEK,
    EXTRA_DOCTOR_PENALTY, HOURS_PER_DAY, WEEK_HOURS,
};
use serde::{Deserialize, Serialize};

const NIGHT_MASK: u32 = (1 << 7) - 1;
const DAY_START: u32 = 7;
const MIN_HOURS: u32 = 4;
const MAX_HOURS: u32 = 8;
const MIN_GAP: u32 = 2;
const MAX_SPLIT_HOURS: u32 = 10;

/// Couverture d'un médecin sur une journée (bit `h` = heure `h`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShiftPattern(u32);

impl ShiftPattern {
    pub fn from_mask(mask: u32) -> Self {
        Self(mask & ((1 << HOURS_PER_DAY) - 1))
    }

    fn span(begin: u32, hours: u32) -> u32 {
        ((1 << hours) - 1) << begin
    }

    pub fn mask(&self) -> u32 {
        self.0
    }

    pub fn covers(&self, hour: usize) -> bool {
        hour < HOURS_PER_DAY && self.0 & (1 << hour) != 0
    }

    pub fn hours(&self) -> u32 {
        self.0.count_ones()
    }

    pub fn is_night(&self) -> bool {
        self.0 == NIGHT_MASK
    }

    /// Périodes contiguës du motif, placées sur le jour `day`.
    pub fn periods(&self, day: usize) -> Vec<Period> {
        let offset = day * HOURS_PER_DAY;
        let mut out = Vec::new();
        let mut start: Option<usize> = None;
        for hour in 0..=HOURS_PER_DAY {
            match (self.covers(hour), start) {
                (true, None) => start = Some(hour),
                (false, Some(begin)) => {
                    out.push(Period {
                        begin: offset + begin,
                        end: offset + hour,
                    });
                    start = None;
                }
                _ => {}
            }
        }
        out
    }
}

/// Catalogue des motifs légaux d'une journée : la nuit [0, 7), toute période
/// simple de 4 à 8 heures commençant à 7h ou plus tard, et toute paire
/// coupée (pause ≥ 2h, total ≤ 10h).
pub fn shift_catalog() -> Vec<ShiftPattern> {
    let day = HOURS_PER_DAY as u32;
    let mut out = vec![ShiftPattern(NIGHT_MASK)];
    for begin in DAY_START..day {
        for hours in MIN_HOURS..=MAX_HOURS {
            if begin + hours <= day {
                out.push(ShiftPattern(ShiftPattern::span(begin, hours)));
            }
        }
    }
    for b1 in DAY_START..day {
        for t1 in MIN_HOURS..=MAX_HOURS {
            for b2 in (b1 + t1 + MIN_GAP)..day {
                for t2 in MIN_HOURS..=MAX_HOURS {
                    if b2 + t2 <= day && t1 + t2 <= MAX_SPLIT_HOURS {
                        out.push(ShiftPattern(
                            ShiftPattern::span(b1, t1) | ShiftPattern::span(b2, t2),
                        ));
                    }
                }
            }
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveStatus {
    Optimal,
    Feasible,
    Infeasible,
    /// Temps écoulé sans réponse.
    Unknown,
}

impl SolveStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }
}

/// Motif choisi par médecin (ligne) et par jour (colonne), `None` = repos.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Assignment {
    pub doctors: Vec<[Option<ShiftPattern>; DAYS_PER_WEEK]>,
}

impl Assignment {
    /// Nombre de médecins par heure de la semaine.
    pub fn coverage(&self) -> Vec<u32> {
        let mut out = vec![0u32; WEEK_HOURS];
        for week in &self.doctors {
            for (day, pattern) in week.iter().enumerate() {
                let Some(pattern) = pattern else { continue };
                for hour in 0..HOURS_PER_DAY {
                    if pattern.covers(hour) {
                        out[day * HOURS_PER_DAY + hour] += 1;
                    }
                }
            }
        }
        out
    }

    /// Convertit la solution en planning ; les médecins sans garde sont omis.
    pub fn to_roster(&self) -> Roster {
        let doctors = self
            .doctors
            .iter()
            .map(|week| {
                week.iter()
                    .enumerate()
                    .filter_map(|(day, pattern)| pattern.map(|p| p.periods(day)))
                    .flatten()
                    .collect::<Vec<_>>()
            })
            .filter(|periods| !periods.is_empty())
            .enumerate()
            .map(|(n, periods)| Doctor {
                id: DoctorId::sequential(n + 1),
                periods,
            })
            .collect();
        Roster { doctors }
    }

    /// La couverture atteint-elle la cible à chaque heure ?
    pub fn meets(&self, target: &StaffingVector) -> bool {
        self.coverage()
            .iter()
            .zip(target.as_slice())
            .all(|(have, need)| have >= need)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerOutcome {
    pub status: SolveStatus,
    pub objective: Option<f64>,
    pub assignment: Option<Assignment>,
}

impl OptimizerOutcome {
    pub fn infeasible() -> Self {
        Self {
            status: SolveStatus::Infeasible,
            objective: None,
            assignment: None,
        }
    }
}

/// Oracle d'affectation à coût minimal (solveur de contraintes externe).
pub trait ShiftOptimizer {
    fn solve(&self, target: &StaffingVector, max_doctors: usize) -> OptimizerOutcome;
}

/// Meilleure solution trouvée par [`search_doctor_count`].
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub doctors: usize,
    pub outcome: OptimizerOutcome,
    /// Objectif du solveur + pénalité par médecin au-delà de l'effectif de référence.
    pub penalized_objective: f64,
}

/// Essaie des plafonds de médecins croissants à partir de `start` jusqu'à la
/// première solution réalisable.
pub fn search_doctor_count(
    optimizer: &dyn ShiftOptimizer,
    target: &StaffingVector,
    start: usize,
    limit: usize,
) -> Option<SearchResult> {
    for doctors in start..=limit {
        let outcome = optimizer.solve(target, doctors);
        tracing::debug!(doctors, status = ?outcome.status, "optimizer attempt");
        if !outcome.status.is_ok() {
            continue;
        }
        let objective = outcome.objective.unwrap_or_default();
        let penalty = EXTRA_DOCTOR_PENALTY * doctors.saturating_sub(BASELINE_DOCTORS);
        return Some(SearchResult {
            doctors,
            penalized_objective: objective + penalty as f64,
            outcome,
        });
    }
    tracing::warn!(start, limit, "no feasible doctor count");
    None
}
