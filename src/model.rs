use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ops::Index;

/// Heures par jour calendaire.
pub const HOURS_PER_DAY: usize = 24;
/// Jours dans la semaine planifiée.
pub const DAYS_PER_WEEK: usize = 7;
/// Nombre de créneaux horaires d'une semaine (index = jour * 24 + heure).
pub const WEEK_HOURS: usize = HOURS_PER_DAY * DAYS_PER_WEEK;

/// Jour calendaire (0..7) d'un créneau de la semaine.
pub fn day_of(slot: usize) -> usize {
    slot / HOURS_PER_DAY
}

/// Heure dans la journée (0..24) d'un créneau de la semaine.
pub fn hour_of(slot: usize) -> usize {
    slot % HOURS_PER_DAY
}

/// Premier créneau du jour contenant `slot`.
pub fn day_start(slot: usize) -> usize {
    slot - hour_of(slot)
}

/// Taux d'arrivée horaires (arrivées/heure) sur la semaine, jour 0 heure 0 en tête.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrivalRates(Vec<f64>);

impl ArrivalRates {
    /// Valide 168 valeurs finies et positives.
    pub fn new(rates: Vec<f64>) -> Result<Self, String> {
        if rates.len() != WEEK_HOURS {
            return Err(format!(
                "expected {WEEK_HOURS} hourly rates, got {}",
                rates.len()
            ));
        }
        if let Some(slot) = rates.iter().position(|r| !r.is_finite() || *r < 0.0) {
            return Err(format!(
                "arrival rate at slot {slot} must be finite and nonnegative, got {}",
                rates[slot]
            ));
        }
        Ok(Self(rates))
    }

    /// Même taux sur toute la semaine.
    pub fn constant(rate: f64) -> Result<Self, String> {
        Self::new(vec![rate; WEEK_HOURS])
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

impl Index<usize> for ArrivalRates {
    type Output = f64;

    fn index(&self, slot: usize) -> &f64 {
        &self.0[slot]
    }
}

/// Nombre minimal de serveurs actifs par heure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffingVector(Vec<u32>);

impl StaffingVector {
    pub fn new(servers: Vec<u32>) -> Result<Self, String> {
        if servers.len() != WEEK_HOURS {
            return Err(format!(
                "expected {WEEK_HOURS} hourly server counts, got {}",
                servers.len()
            ));
        }
        Ok(Self(servers))
    }

    /// Un serveur par heure : point de départ des heuristiques.
    pub fn ones() -> Self {
        Self(vec![1; WEEK_HOURS])
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [u32] {
        &mut self.0
    }

    /// Somme des heures-serveurs de la semaine.
    pub fn total_hours(&self) -> u64 {
        self.0.iter().map(|&c| u64::from(c)).sum()
    }

    /// Maximum par jour calendaire.
    pub fn daily_peaks(&self) -> Vec<u32> {
        self.0
            .chunks(HOURS_PER_DAY)
            .map(|day| day.iter().copied().max().unwrap_or(0))
            .collect()
    }
}

impl Index<usize> for StaffingVector {
    type Output = u32;

    fn index(&self, slot: usize) -> &u32 {
        &self.0[slot]
    }
}

/// Longueurs de file aux 169 frontières horaires (`lengths[0] == 0`).
#[derive(Debug, Clone, PartialEq)]
pub struct QueueLengths(Vec<f64>);

impl QueueLengths {
    pub fn empty_week() -> Self {
        Self(vec![0.0; WEEK_HOURS + 1])
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub(crate) fn set(&mut self, boundary: usize, length: f64) {
        self.0[boundary] = length;
    }

    /// Plus grande longueur observée sur la semaine.
    pub fn peak(&self) -> f64 {
        self.0.iter().copied().fold(0.0, f64::max)
    }
}

impl Index<usize> for QueueLengths {
    type Output = f64;

    fn index(&self, boundary: usize) -> &f64 {
        &self.0[boundary]
    }
}

/// Période de garde [begin, end) en heures depuis le début de la semaine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    pub begin: usize,
    pub end: usize,
}

impl Period {
    /// Crée une période en validant `end > begin` et la borne de fin de semaine.
    pub fn new(begin: usize, end: usize) -> Result<Self, String> {
        if end <= begin {
            return Err("period end must be strictly after begin".to_string());
        }
        if end > WEEK_HOURS {
            return Err(format!("period end {end} is past the end of the week"));
        }
        Ok(Self { begin, end })
    }

    /// Garde de nuit : exactement 0h-7h d'un jour calendaire.
    pub fn is_night(&self) -> bool {
        self.begin % HOURS_PER_DAY == 0 && self.end % HOURS_PER_DAY == 7
    }

    /// Jour calendaire de début.
    pub fn day(&self) -> usize {
        day_of(self.begin)
    }

    pub fn hours(&self) -> usize {
        self.end - self.begin
    }

    pub fn contains(&self, slot: usize) -> bool {
        self.begin <= slot && slot < self.end
    }
}

/// Identifiant fort pour Doctor
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DoctorId(String);

impl DoctorId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }

    /// Identifiant déterministe dans l'ordre de création.
    pub fn sequential(n: usize) -> Self {
        Self(format!("doctor-{n:02}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Médecin : liste ordonnée de périodes sans chevauchement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: DoctorId,
    #[serde(default)]
    pub periods: Vec<Period>,
}

impl Doctor {
    pub fn new(id: DoctorId) -> Self {
        Self {
            id,
            periods: Vec::new(),
        }
    }

    /// Nombre de jours calendaires distincts déjà touchés.
    pub fn days_touched(&self) -> usize {
        self.periods
            .iter()
            .map(Period::day)
            .collect::<BTreeSet<_>>()
            .len()
    }

    pub fn night_count(&self) -> usize {
        self.periods.iter().filter(|p| p.is_night()).count()
    }

    pub fn is_busy_at(&self, slot: usize) -> bool {
        self.periods.iter().any(|p| p.contains(slot))
    }

    pub fn periods_on(&self, day: usize) -> impl Iterator<Item = &Period> {
        self.periods.iter().filter(move |p| p.day() == day)
    }

    pub fn total_hours(&self) -> usize {
        self.periods.iter().map(Period::hours).sum()
    }
}

/// Planning complet de la semaine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Roster {
    pub doctors: Vec<Doctor>,
}

/// Effectif de référence au-delà duquel chaque médecin supplémentaire est pénalisé.
pub const BASELINE_DOCTORS: usize = 10;
/// Pénalité (en heures) par médecin au-delà de [`BASELINE_DOCTORS`].
pub const EXTRA_DOCTOR_PENALTY: usize = 10;

impl Roster {
    pub fn find_doctor<'a>(&'a self, id: &DoctorId) -> Option<&'a Doctor> {
        self.doctors.iter().find(|d| &d.id == id)
    }

    /// Nombre de médecins présents à chaque heure.
    pub fn coverage(&self) -> Vec<u32> {
        let mut coverage = vec![0u32; WEEK_HOURS];
        for period in self.doctors.iter().flat_map(|d| d.periods.iter()) {
            for slot in period.begin..period.end.min(WEEK_HOURS) {
                coverage[slot] += 1;
            }
        }
        coverage
    }

    pub fn total_hours(&self) -> usize {
        self.doctors.iter().map(Doctor::total_hours).sum()
    }

    /// Coût du planning : heures totales + pénalité par médecin au-delà de l'effectif de référence.
    pub fn score(&self) -> usize {
        self.total_hours()
            + EXTRA_DOCTOR_PENALTY * self.doctors.len().saturating_sub(BASELINE_DOCTORS)
    }
}
