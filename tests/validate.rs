#![forbid(unsafe_code)]
use garde::{
    detect_violations, validate, Doctor, DoctorId, Period, PlanError, Roster, ViolationKind,
};
use insta::assert_snapshot;

fn doctor(name: &str, spans: &[(usize, usize)]) -> Doctor {
    Doctor {
        id: DoctorId::new(name),
        periods: spans
            .iter()
            .map(|&(begin, end)| Period::new(begin, end).unwrap())
            .collect(),
    }
}

/// Un médecin de nuit et un de jour sur chaque journée : couverture complète.
fn covering_roster() -> Roster {
    let mut doctors = Vec::new();
    for day in 0..7 {
        let d = day * 24;
        doctors.push(doctor(&format!("n{day}"), &[(d, d + 7)]));
        doctors.push(doctor(&format!("m{day}"), &[(d + 7, d + 13)]));
        doctors.push(doctor(&format!("a{day}"), &[(d + 13, d + 21)]));
        doctors.push(doctor(&format!("e{day}"), &[(d + 20, d + 24)]));
    }
    Roster { doctors }
}

#[test]
fn clean_roster_has_no_violation() {
    let roster = covering_roster();
    assert!(detect_violations(&roster).is_empty());
    assert!(validate(&roster).is_ok());
}

#[test]
fn legal_split_and_nights() {
    let mut roster = covering_roster();
    roster.doctors.push(doctor(
        "split",
        &[(7, 13), (15, 19), (48, 55), (103, 109), (144, 151)],
    ));
    assert!(detect_violations(&roster).is_empty());
}

#[test]
fn each_rule_reports_its_breach() {
    let mut roster = covering_roster();
    roster.doctors.extend([
        doctor("long", &[(7, 16)]),
        doctor("split", &[(7, 13), (14, 18)]),
        doctor("nights", &[(0, 7), (48, 55), (96, 103)]),
        doctor("late", &[(14, 20), (24, 31)]),
        doctor("after", &[(24, 31), (50, 56)]),
        doctor(
            "busy",
            &[
                (7, 13),
                (31, 37),
                (55, 61),
                (79, 85),
                (103, 109),
                (127, 133),
                (151, 157),
            ],
        ),
        doctor("unordered", &[(30, 36), (7, 13)]),
        doctor("day", &[(7, 13), (15, 21)]),
        doctor("shape", &[(0, 7), (12, 16)]),
    ]);

    let rendered = detect_violations(&roster)
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n");
    assert_snapshot!(rendered, @r"
    long: day 0: period [7, 16) lasts 9h (4 to 8)
    split: day 0: split shift gap of 1h (min 2)
    nights: 3 night periods (max 2)
    late: day 1: 4h rest before night period (min 8)
    after: day 1: 19h rest after night period (min 24)
    busy: works 7 distinct days (max 6)
    unordered: day 0: period at 7 does not start after 36
    day: day 0: 12h on duty (max 10)
    shape: day 0: 2 periods on one day (one, or two non-night)
    shape: day 0: 11h on duty (max 10)
    ");
}

#[test]
fn uncovered_hours_are_listed() {
    let mut roster = covering_roster();
    roster.doctors.retain(|d| d.id.as_str() != "m3");
    let violations = detect_violations(&roster);
    let slots: Vec<usize> = violations
        .iter()
        .map(|v| match v.kind {
            ViolationKind::Uncovered { slot } => slot,
            ref other => panic!("unexpected {other:?}"),
        })
        .collect();
    assert_eq!(slots, (79..85).collect::<Vec<_>>());
    assert!(violations.iter().all(|v| v.doctor.is_none()));
}

#[test]
fn validate_stops_on_first_violation() {
    let roster = Roster {
        doctors: vec![doctor("solo", &[(0, 7)])],
    };
    match validate(&roster) {
        Err(PlanError::InvariantViolation(v)) => {
            assert_eq!(v.kind, ViolationKind::Uncovered { slot: 7 });
        }
        other => panic!("expected violation, got {other:?}"),
    }
}

#[test]
fn period_constructor_rejects_bad_ranges() {
    assert!(Period::new(5, 5).is_err());
    assert!(Period::new(9, 3).is_err());
    assert!(Period::new(160, 170).is_err());
    assert!(Period::new(24, 31).unwrap().is_night());
    assert!(!Period::new(25, 31).unwrap().is_night());
}
