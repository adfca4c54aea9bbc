#![forbid(unsafe_code)]
use garde::{io, Doctor, DoctorId, Period, Roster, StaffingVector, WEEK_HOURS};
use std::fs;
use tempfile::tempdir;

fn sample_roster() -> Roster {
    let mut night = Doctor::new(DoctorId::sequential(1));
    night.periods.push(Period::new(0, 7).unwrap());
    let mut split = Doctor::new(DoctorId::sequential(2));
    split.periods.push(Period::new(7, 11).unwrap());
    split.periods.push(Period::new(14, 19).unwrap());
    Roster {
        doctors: vec![night, split],
    }
}

#[test]
fn arrivals_read_as_single_column() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("arrivals.csv");
    let mut body = String::from("rate\n");
    for slot in 0..WEEK_HOURS {
        body.push_str(&format!("{}\n", slot % 24));
    }
    fs::write(&path, body).unwrap();

    let rates = io::import_arrivals_csv(&path).unwrap();
    assert_eq!(rates.as_slice().len(), WEEK_HOURS);
    assert_eq!(rates[23], 23.0);
    assert_eq!(rates[24], 0.0);
}

#[test]
fn arrivals_read_as_day_grid() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("grid.csv");
    let header: Vec<String> = (0..24).map(|h| format!("h{h}")).collect();
    let mut body = header.join(",") + "\n";
    for day in 0..7 {
        let row: Vec<String> = (0..24).map(|h| format!("{}.5", day + h)).collect();
        body.push_str(&row.join(", "));
        body.push('\n');
    }
    fs::write(&path, body).unwrap();

    let rates = io::import_arrivals_csv(&path).unwrap();
    assert_eq!(rates[0], 0.5);
    assert_eq!(rates[24 + 3], 4.5);
    assert_eq!(rates[167], 29.5);
}

#[test]
fn arrivals_with_wrong_count_are_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("short.csv");
    fs::write(&path, "rate\n1\n2\n3\n").unwrap();
    let err = io::import_arrivals_csv(&path).unwrap_err();
    assert!(err.to_string().contains("holds 3 rates"), "{err}");

    let bad = dir.path().join("bad.csv");
    fs::write(&bad, "rate\nabc\n").unwrap();
    assert!(io::import_arrivals_csv(&bad).is_err());
}

#[test]
fn roster_json_roundtrip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("roster.json");
    let roster = sample_roster();
    io::export_roster_json(&path, &roster).unwrap();
    let loaded = io::load_roster_json(&path).unwrap();
    assert_eq!(loaded, roster);
    let split = loaded.find_doctor(&DoctorId::sequential(2)).unwrap();
    assert_eq!(split.total_hours(), 9);
}

#[test]
fn roster_json_with_inverted_period_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("inverted.json");
    fs::write(
        &path,
        r#"{"doctors":[{"id":"x","periods":[{"begin":12,"end":8}]}]}"#,
    )
    .unwrap();
    let err = io::load_roster_json(&path).unwrap_err();
    assert!(format!("{err:#}").contains("invalid period [12, 8)"), "{err:#}");
}

#[test]
fn staffing_and_periods_csv_layout() {
    let dir = tempdir().unwrap();
    let staffing_path = dir.path().join("staffing.csv");
    io::export_staffing_csv(&staffing_path, &StaffingVector::ones()).unwrap();
    let staffing = fs::read_to_string(&staffing_path).unwrap();
    let lines: Vec<&str> = staffing.lines().collect();
    assert_eq!(lines.len(), WEEK_HOURS + 1);
    assert_eq!(lines[0], "slot,day,hour,servers");
    assert_eq!(lines[26], "25,1,1,1");

    let periods_path = dir.path().join("periods.csv");
    io::export_periods_csv(&periods_path, &sample_roster()).unwrap();
    let periods = fs::read_to_string(&periods_path).unwrap();
    let lines: Vec<&str> = periods.lines().collect();
    assert_eq!(lines[0], "doctor,begin,end,day,start_hour,end_hour,night");
    assert_eq!(lines[1], "doctor-01,0,7,0,0,7,true");
    assert_eq!(lines[3], "doctor-02,14,19,0,14,19,false");
}
