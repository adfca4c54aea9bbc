#![forbid(unsafe_code)]
//! Garde : dimensionnement et planning hebdomadaire d'une garde médicale.
//!
//! - Estimation fluide de la longueur de file (M/M/c à taux variables).
//! - Trois heuristiques de dimensionnement heure par heure sous un plafond de file.
//! - Construction gloutonne d'un premier planning respectant les règles de travail.
//! - Validation a posteriori du planning ; interface vers un optimiseur externe.

pub mod io;
pub mod model;
pub mod optimizer;
pub mod queue;
pub mod scheduler;

pub use model::{
    ArrivalRates, Doctor, DoctorId, Period, QueueLengths, Roster, StaffingVector, WEEK_HOURS,
};
pub use optimizer::{
    search_doctor_count, shift_catalog, Assignment, OptimizerOutcome, SearchResult,
    ShiftOptimizer, ShiftPattern, SolveStatus,
};
pub use queue::{Estimator, LengthModel};
pub use scheduler::{
    detect_violations, validate, Heuristic, PlanError, PlanOptions, Planner, RosterState,
    Violation, ViolationKind,
};
