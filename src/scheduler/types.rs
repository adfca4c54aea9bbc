use crate::model::DoctorId;
use crate::queue::Estimator;
use std::fmt;
use thiserror::Error;

/// Taux de service par défaut (patients traités par médecin et par heure).
pub const DEFAULT_SERVICE_RATE: f64 = 5.9113;
/// Longueur de file maximale tolérée.
pub const DEFAULT_CEILING: f64 = 15.0;
/// Garde-fou contre les boucles « encore un serveur » sur entrée pathologique.
pub const DEFAULT_MAX_SERVERS: u32 = 256;

/// Options de planification
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanOptions {
    pub service_rate: f64,
    pub ceiling: f64,
    pub max_servers: u32,
    pub estimator: Estimator,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            service_rate: DEFAULT_SERVICE_RATE,
            ceiling: DEFAULT_CEILING,
            max_servers: DEFAULT_MAX_SERVERS,
            estimator: Estimator::default(),
        }
    }
}

impl PlanOptions {
    pub fn with_estimator(self, estimator: Estimator) -> Self {
        Self { estimator, ..self }
    }

    pub fn validate(&self) -> Result<(), PlanError> {
        if !self.service_rate.is_finite() || self.service_rate <= 0.0 {
            return Err(PlanError::InvalidServiceRate(self.service_rate));
        }
        if !self.ceiling.is_finite() || self.ceiling <= 0.0 {
            return Err(PlanError::InvalidCeiling(self.ceiling));
        }
        Ok(())
    }
}

/// Politique d'ajustement par blocs du dimensionnement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Heuristic {
    /// Heure par heure, sans jamais revenir en arrière.
    #[value(name = "a")]
    IndependentHour,
    /// Bloc de nuit entier, 4 heures le matin.
    #[value(name = "b")]
    BlockAware,
    /// Comme B, matin jusqu'à la fin de la bande, soirée équilibrée.
    #[default]
    #[value(name = "c")]
    Tightened,
}

impl Heuristic {
    pub const ALL: [Heuristic; 3] = [
        Heuristic::IndependentHour,
        Heuristic::BlockAware,
        Heuristic::Tightened,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Heuristic::IndependentHour => "A",
            Heuristic::BlockAware => "B",
            Heuristic::Tightened => "C",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    TooManyDays { days: usize },
    BadDayShape { periods: usize },
    PeriodLength { begin: usize, end: usize },
    DayTooLong { hours: usize },
    SplitGapTooShort { gap: usize },
    TooManyNights { nights: usize },
    NightRestBefore { gap: usize },
    NightRestAfter { gap: usize },
    Unordered { begin: usize, previous_end: usize },
    Uncovered { slot: usize },
}

/// Règle de travail violée par un planning terminé.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// `None` pour les violations globales (couverture).
    pub doctor: Option<DoctorId>,
    pub day: Option<usize>,
    pub kind: ViolationKind,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(doctor) = &self.doctor {
            write!(f, "{}: ", doctor.as_str())?;
        }
        if let Some(day) = self.day {
            write!(f, "day {day}: ")?;
        }
        match &self.kind {
            ViolationKind::TooManyDays { days } => write!(f, "works {days} distinct days (max 6)"),
            ViolationKind::BadDayShape { periods } => {
                write!(f, "{periods} periods on one day (one, or two non-night)")
            }
            ViolationKind::PeriodLength { begin, end } => {
                write!(f, "period [{begin}, {end}) lasts {}h (4 to 8)", end - begin)
            }
            ViolationKind::DayTooLong { hours } => write!(f, "{hours}h on duty (max 10)"),
            ViolationKind::SplitGapTooShort { gap } => {
                write!(f, "split shift gap of {gap}h (min 2)")
            }
            ViolationKind::TooManyNights { nights } => write!(f, "{nights} night periods (max 2)"),
            ViolationKind::NightRestBefore { gap } => {
                write!(f, "{gap}h rest before night period (min 8)")
            }
            ViolationKind::NightRestAfter { gap } => {
                write!(f, "{gap}h rest after night period (min 24)")
            }
            ViolationKind::Unordered {
                begin,
                previous_end,
            } => write!(f, "period at {begin} does not start after {previous_end}"),
            ViolationKind::Uncovered { slot } => write!(f, "slot {slot} has no doctor on duty"),
        }
    }
}

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("invalid arrival rates: {0}")]
    InvalidArrivals(String),
    #[error("service rate must be positive and finite, got {0}")]
    InvalidServiceRate(f64),
    #[error("ceiling must be positive and finite, got {0}")]
    InvalidCeiling(f64),
    #[error("invalid period [{begin}, {end})")]
    InvalidPeriod { begin: usize, end: usize },
    #[error("slot {slot} still above the ceiling with {servers} servers")]
    CapacityUnschedulable { slot: usize, servers: u32 },
    #[error("roster stepped out of order: expected slot {expected}, got {got}")]
    SlotOutOfOrder { expected: usize, got: usize },
    #[error("roster invariant violated: {0}")]
    InvariantViolation(Violation),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
