use crate::model::{
    day_of, hour_of, ArrivalRates, Period, Roster, StaffingVector, HOURS_PER_DAY, WEEK_HOURS,
};
use crate::scheduler::PlanError;
use anyhow::{bail, Context};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Import des taux d'arrivée: une ligne d'en-tête puis 168 nombres, lus ligne
/// par ligne (une colonne de 168 lignes, ou 7 lignes de 24 colonnes).
pub fn import_arrivals_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<ArrivalRates> {
    let path = path.as_ref();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let mut rates = Vec::with_capacity(WEEK_HOURS);
    for (line, rec) in rdr.records().enumerate() {
        let rec = rec?;
        for field in rec.iter().filter(|f| !f.is_empty()) {
            let rate: f64 = field
                .parse()
                .with_context(|| format!("invalid rate {field:?} on data row {}", line + 1))?;
            rates.push(rate);
        }
    }
    if rates.len() != WEEK_HOURS {
        bail!(
            "{} holds {} rates, expected {WEEK_HOURS}",
            path.display(),
            rates.len()
        );
    }
    ArrivalRates::new(rates).map_err(anyhow::Error::msg)
}

/// Export CSV du dimensionnement: header `slot,day,hour,servers`
pub fn export_staffing_csv<P: AsRef<Path>>(path: P, staffing: &StaffingVector) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["slot", "day", "hour", "servers"])?;
    for (slot, servers) in staffing.as_slice().iter().enumerate() {
        w.write_record([
            slot.to_string(),
            day_of(slot).to_string(),
            hour_of(slot).to_string(),
            servers.to_string(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// Export JSON du planning (jolie mise en forme), écrit de manière atomique.
pub fn export_roster_json<P: AsRef<Path>>(path: P, roster: &Roster) -> anyhow::Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_vec_pretty(roster)?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
    tmp.write_all(&json)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).with_context(|| "atomic rename")?;
    Ok(())
}

pub fn load_roster_json<P: AsRef<Path>>(path: P) -> anyhow::Result<Roster> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let roster: Roster = serde_json::from_slice(&data)
        .with_context(|| format!("parsing roster {}", path.display()))?;
    // Les bornes ne sont pas revérifiées par serde.
    for p in roster.doctors.iter().flat_map(|d| &d.periods) {
        if Period::new(p.begin, p.end).is_err() {
            return Err(PlanError::InvalidPeriod {
                begin: p.begin,
                end: p.end,
            })
            .with_context(|| format!("in roster {}", path.display()));
        }
    }
    Ok(roster)
}

/// Export CSV des périodes: header `doctor,begin,end,day,start_hour,end_hour,night`
pub fn export_periods_csv<P: AsRef<Path>>(path: P, roster: &Roster) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record([
        "doctor",
        "begin",
        "end",
        "day",
        "start_hour",
        "end_hour",
        "night",
    ])?;
    for doctor in &roster.doctors {
        for p in &doctor.periods {
            let end_hour = p.end - p.day() * HOURS_PER_DAY;
            w.write_record([
                doctor.id.as_str().to_string(),
                p.begin.to_string(),
                p.end.to_string(),
                p.day().to_string(),
                hour_of(p.begin).to_string(),
                end_hour.to_string(),
                p.is_night().to_string(),
            ])?;
        }
    }
    w.flush()?;
    Ok(())
}
