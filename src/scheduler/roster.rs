use super::util::{
    propagate, Band, MAX_DAYS, MAX_NIGHTS, MIN_SPLIT_GAP, NIGHT_END, NIGHT_REST_BEFORE,
};
use super::{PlanError, PlanOptions};
use crate::model::{
    day_of, day_start, hour_of, ArrivalRates, Doctor, DoctorId, Period, QueueLengths, Roster,
    DAYS_PER_WEEK, HOURS_PER_DAY, WEEK_HOURS,
};

const MORNING_HOURS: usize = 6;
const FULL_SHIFT_HOURS: usize = 8;
const SPLIT_SHIFT_HOURS: usize = 4;
/// Au-delà de cette heure, une période de l'après-midi est recalée sur [20h, 24h).
const LATE_START: usize = 20;
const LAST_DAY: usize = DAYS_PER_WEEK - 1;

/// État du constructeur glouton, avancé créneau par créneau.
///
/// Chaque appel à [`RosterState::step`] consomme l'état et le rend ; aucune
/// identité n'est portée implicitement d'un créneau à l'autre.
#[derive(Debug, Clone)]
pub struct RosterState<'a> {
    arrivals: &'a ArrivalRates,
    opts: PlanOptions,
    coverage: Vec<u32>,
    lengths: QueueLengths,
    doctors: Vec<Doctor>,
    next_slot: usize,
    created: usize,
}

impl<'a> RosterState<'a> {
    pub fn new(arrivals: &'a ArrivalRates, opts: PlanOptions) -> Result<Self, PlanError> {
        opts.validate()?;
        Ok(Self {
            arrivals,
            opts,
            coverage: vec![0; WEEK_HOURS],
            lengths: QueueLengths::empty_week(),
            doctors: Vec::new(),
            next_slot: 0,
            created: 0,
        })
    }

    pub fn coverage(&self) -> &[u32] {
        &self.coverage
    }

    pub fn lengths(&self) -> &QueueLengths {
        &self.lengths
    }

    pub fn doctors(&self) -> &[Doctor] {
        &self.doctors
    }

    pub fn next_slot(&self) -> usize {
        self.next_slot
    }

    pub fn is_complete(&self) -> bool {
        self.next_slot == WEEK_HOURS
    }

    /// Traite le créneau `slot` : couverture minimale, puis un médecin de plus
    /// tant que la file dépasse le plafond, puis réordonnancement des médecins.
    pub fn step(mut self, slot: usize) -> Result<Self, PlanError> {
        if slot != self.next_slot || slot >= WEEK_HOURS {
            return Err(PlanError::SlotOutOfOrder {
                expected: self.next_slot,
                got: slot,
            });
        }

        let from = if self.coverage[slot] == 0 {
            self.schedule_doctor(slot)
        } else {
            slot
        };
        self.propagate(from, slot);

        while self.lengths[slot + 1] > self.opts.ceiling {
            if self.coverage[slot] >= self.opts.max_servers {
                tracing::warn!(slot, doctors = self.coverage[slot], "doctor cap reached");
                return Err(PlanError::CapacityUnschedulable {
                    slot,
                    servers: self.coverage[slot],
                });
            }
            let from = self.schedule_doctor(slot);
            self.propagate(from, slot);
        }

        // Tri stable : à égalité, l'ordre d'insertion départage.
        self.doctors.sort_by_key(Doctor::days_touched);
        self.next_slot += 1;
        Ok(self)
    }

    pub fn finish(self) -> Roster {
        tracing::info!(
            doctors = self.doctors.len(),
            peak_length = self.lengths.peak(),
            "roster built"
        );
        Roster {
            doctors: self.doctors,
        }
    }

    fn propagate(&mut self, from: usize, to: usize) {
        propagate(
            self.arrivals,
            &self.coverage,
            &mut self.lengths,
            from,
            to,
            &self.opts,
        );
    }

    /// Ajoute une période pour `slot` ; renvoie le début de la période créée.
    fn schedule_doctor(&mut self, slot: usize) -> usize {
        let (chosen, period) = match Band::of(slot) {
            Band::Night => self.pick_night(slot),
            Band::Morning => self.pick_morning(slot),
            Band::Rest => self.pick_rest(slot),
        };
        let index = chosen.unwrap_or_else(|| {
            self.created += 1;
            let doctor = Doctor::new(DoctorId::sequential(self.created));
            tracing::debug!(slot, doctor = doctor.id.as_str(), "new doctor");
            self.doctors.push(doctor);
            self.doctors.len() - 1
        });

        let periods = &mut self.doctors[index].periods;
        let at = periods.partition_point(|p| p.begin < period.begin);
        periods.insert(at, period);
        for hour in period.begin..period.end {
            self.coverage[hour] += 1;
        }
        period.begin
    }

    /// Libre à `slot` et sous le plafond de jours le dernier jour.
    fn is_available(doctor: &Doctor, slot: usize) -> bool {
        if doctor.is_busy_at(slot) {
            return false;
        }
        !(day_of(slot) == LAST_DAY && doctor.days_touched() >= MAX_DAYS)
    }

    fn pick_night(&self, slot: usize) -> (Option<usize>, Period) {
        let day = day_of(slot);
        let begin = day_start(slot);
        let chosen = self.doctors.iter().position(|doctor| {
            if !Self::is_available(doctor, slot) || doctor.night_count() >= MAX_NIGHTS {
                return false;
            }
            if day == 0 {
                return true;
            }
            !doctor
                .periods_on(day - 1)
                .any(|p| p.is_night() || p.end > begin - NIGHT_REST_BEFORE)
        });
        (
            chosen,
            Period {
                begin,
                end: begin + NIGHT_END,
            },
        )
    }

    fn pick_morning(&self, slot: usize) -> (Option<usize>, Period) {
        let day = day_of(slot);
        let chosen = self.doctors.iter().position(|doctor| {
            Self::is_available(doctor, slot) && !doctor.periods_on(day).any(Period::is_night)
        });
        (
            chosen,
            Period {
                begin: slot,
                end: slot + MORNING_HOURS,
            },
        )
    }

    fn pick_rest(&self, slot: usize) -> (Option<usize>, Period) {
        let day = day_of(slot);
        let full = rest_period(slot, FULL_SHIFT_HOURS);
        let split = rest_period(slot, SPLIT_SHIFT_HOURS);
        for (index, doctor) in self.doctors.iter().enumerate() {
            if !Self::is_available(doctor, slot) {
                continue;
            }
            let today: Vec<&Period> = doctor.periods_on(day).collect();
            if today.iter().any(|p| p.is_night()) {
                continue;
            }
            match today.as_slice() {
                [] => return (Some(index), full),
                [first] if first.end + MIN_SPLIT_GAP <= split.begin => {
                    return (Some(index), split)
                }
                _ => continue,
            }
        }
        (None, full)
    }
}

/// Période de l'après-midi/soir tronquée à minuit, recalée sur [20h, 24h) après 20h.
fn rest_period(slot: usize, hours: usize) -> Period {
    let day_begin = day_start(slot);
    if hour_of(slot) > LATE_START {
        return Period {
            begin: day_begin + LATE_START,
            end: day_begin + HOURS_PER_DAY,
        };
    }
    Period {
        begin: slot,
        end: (slot + hours).min(day_begin + HOURS_PER_DAY),
    }
}

pub(super) fn build_roster(
    arrivals: &ArrivalRates,
    opts: &PlanOptions,
) -> Result<Roster, PlanError> {
    let state = (0..WEEK_HOURS).try_fold(RosterState::new(arrivals, *opts)?, |state, slot| {
        state.step(slot)
    })?;
    Ok(state.finish())
}
