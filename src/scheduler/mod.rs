mod capacity;
mod roster;
mod types;
mod util;
mod validate;

pub use capacity::{Adjustment, BlockAware, BlockPolicy, IndependentHour, Tightened};
pub use roster::RosterState;
pub use types::{
    Heuristic, PlanError, PlanOptions, Violation, ViolationKind, DEFAULT_CEILING,
    DEFAULT_MAX_SERVERS, DEFAULT_SERVICE_RATE,
};

use crate::model::{ArrivalRates, QueueLengths, Roster, StaffingVector};

/// Planner : encapsule les taux d'arrivée et les options d'une semaine à planifier
#[derive(Debug, Clone)]
pub struct Planner {
    arrivals: ArrivalRates,
    opts: PlanOptions,
}

impl Planner {
    pub fn new(arrivals: ArrivalRates, opts: PlanOptions) -> Result<Self, PlanError> {
        opts.validate()?;
        Ok(Self { arrivals, opts })
    }

    /// Valide les taux bruts avant de construire le planner.
    pub fn from_rates(rates: Vec<f64>, opts: PlanOptions) -> Result<Self, PlanError> {
        let arrivals = ArrivalRates::new(rates).map_err(PlanError::InvalidArrivals)?;
        Self::new(arrivals, opts)
    }

    pub fn arrivals(&self) -> &ArrivalRates {
        &self.arrivals
    }

    pub fn options(&self) -> &PlanOptions {
        &self.opts
    }

    pub fn plan_capacity(&self, heuristic: Heuristic) -> Result<StaffingVector, PlanError> {
        capacity::plan_capacity(&self.arrivals, heuristic, &self.opts)
    }

    /// Rejoue `servers` heure par heure depuis une file vide.
    pub fn replay(&self, servers: &[u32]) -> Result<QueueLengths, PlanError> {
        capacity::replay(&self.arrivals, servers, &self.opts)
    }

    /// État initial du constructeur de planning, à avancer avec [`RosterState::step`].
    pub fn roster_state(&self) -> Result<RosterState<'_>, PlanError> {
        RosterState::new(&self.arrivals, self.opts)
    }

    pub fn build_roster(&self) -> Result<Roster, PlanError> {
        roster::build_roster(&self.arrivals, &self.opts)
    }
}

/// Liste toutes les règles de travail violées par `roster`.
pub fn detect_violations(roster: &Roster) -> Vec<Violation> {
    validate::detect_violations(roster)
}

/// Échoue sur la première violation trouvée.
pub fn validate(roster: &Roster) -> Result<(), PlanError> {
    validate::validate(roster)
}
