use super::util::{
    MAX_DAYS, MAX_DAY_HOURS, MAX_NIGHTS, MAX_PERIOD_HOURS, MIN_PERIOD_HOURS, MIN_SPLIT_GAP,
    NIGHT_REST_AFTER, NIGHT_REST_BEFORE,
};
use super::{PlanError, Violation, ViolationKind};
use crate::model::{Doctor, Period, Roster};
use std::collections::BTreeMap;

pub(super) fn detect_violations(roster: &Roster) -> Vec<Violation> {
    let mut out = Vec::new();

    for doctor in &roster.doctors {
        check_doctor(doctor, &mut out);
    }

    for (slot, count) in roster.coverage().iter().enumerate() {
        if *count == 0 {
            out.push(Violation {
                doctor: None,
                day: None,
                kind: ViolationKind::Uncovered { slot },
            });
        }
    }

    out
}

pub(super) fn validate(roster: &Roster) -> Result<(), PlanError> {
    match detect_violations(roster).into_iter().next() {
        Some(violation) => Err(PlanError::InvariantViolation(violation)),
        None => Ok(()),
    }
}

fn check_doctor(doctor: &Doctor, out: &mut Vec<Violation>) {
    let mut push = |day: Option<usize>, kind: ViolationKind| {
        out.push(Violation {
            doctor: Some(doctor.id.clone()),
            day,
            kind,
        })
    };

    let mut by_day: BTreeMap<usize, Vec<&Period>> = BTreeMap::new();
    for period in &doctor.periods {
        by_day.entry(period.day()).or_default().push(period);
    }

    if by_day.len() > MAX_DAYS {
        push(None, ViolationKind::TooManyDays { days: by_day.len() });
    }

    for (&day, periods) in &by_day {
        let shape_ok = match periods.as_slice() {
            [_] => true,
            [a, b] => !a.is_night() && !b.is_night(),
            _ => false,
        };
        if !shape_ok {
            push(
                Some(day),
                ViolationKind::BadDayShape {
                    periods: periods.len(),
                },
            );
        }
        for p in periods {
            if !(MIN_PERIOD_HOURS..=MAX_PERIOD_HOURS).contains(&p.hours()) {
                push(
                    Some(day),
                    ViolationKind::PeriodLength {
                        begin: p.begin,
                        end: p.end,
                    },
                );
            }
        }
        let hours: usize = periods.iter().map(|p| p.hours()).sum();
        if hours > MAX_DAY_HOURS {
            push(Some(day), ViolationKind::DayTooLong { hours });
        }
        if let [a, b] = periods.as_slice() {
            let gap = b.begin.saturating_sub(a.end);
            if gap < MIN_SPLIT_GAP {
                push(Some(day), ViolationKind::SplitGapTooShort { gap });
            }
        }
    }

    let nights = by_day.values().filter(|ps| ps[0].is_night()).count();
    if nights > MAX_NIGHTS {
        push(None, ViolationKind::TooManyNights { nights });
    }

    for (&day, periods) in &by_day {
        let night = periods[0];
        if !night.is_night() {
            continue;
        }
        if let Some(before) = day.checked_sub(1).and_then(|d| by_day.get(&d)) {
            for p in before {
                let gap = night.begin.saturating_sub(p.end);
                if gap < NIGHT_REST_BEFORE {
                    push(Some(day), ViolationKind::NightRestBefore { gap });
                }
            }
        }
        if let Some(after) = by_day.get(&(day + 1)) {
            for p in after {
                let gap = p.begin.saturating_sub(night.end);
                if gap < NIGHT_REST_AFTER {
                    push(Some(day), ViolationKind::NightRestAfter { gap });
                }
            }
        }
    }

    let mut previous_end: Option<usize> = None;
    for p in &doctor.periods {
        if let Some(end) = previous_end {
            if p.begin <= end {
                push(
                    Some(p.day()),
                    ViolationKind::Unordered {
                        begin: p.begin,
                        previous_end: end,
                    },
                );
            }
        }
        previous_end = Some(p.end);
    }
}
