use crate::clock::parse_time;
use crate::generator::GeneratedSchedule;
use crate::model::{
    Assignment, AssignmentStatus, CoverageReport, Employee, EmployeeId, Role, Shift, ShiftId,
    ShiftTypeId, StaffingRequirement,
};
use anyhow::{bail, Context};
use chrono::NaiveDate;
use csv::{ReaderBuilder, WriterBuilder};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Import d'employés depuis CSV :
/// header `id,role,max_weekly_hours[,allow_overtime][,weekly_hours_scheduled]`
pub fn import_employees_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Employee>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let id = rec.get(0).context("missing id")?.trim();
        let role = rec.get(1).context("missing role")?.trim();
        if id.is_empty() {
            bail!("invalid employee row (empty id)");
        }
        let mut employee = Employee::new(id, parse_role(role)?);
        if let Some(cap) = rec.get(2) {
            let cap = cap.trim();
            if !cap.is_empty() {
                employee.max_weekly_hours = cap
                    .parse()
                    .with_context(|| format!("invalid max_weekly_hours for {id}"))?;
            }
        }
        if let Some(flag) = rec.get(3) {
            let flag = flag.trim();
            if !flag.is_empty() {
                employee.allow_overtime = parse_bool(flag)
                    .with_context(|| format!("invalid allow_overtime value for {id}"))?;
            }
        }
        if let Some(hours) = rec.get(4) {
            let hours = hours.trim();
            if !hours.is_empty() {
                employee.weekly_hours_scheduled = hours
                    .parse()
                    .with_context(|| format!("invalid weekly_hours_scheduled for {id}"))?;
            }
        }
        out.push(employee);
    }
    Ok(out)
}

fn parse_bool(s: &str) -> anyhow::Result<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" | "oui" => Ok(true),
        "false" | "0" | "no" | "n" | "non" => Ok(false),
        _ => bail!("expected boolean"),
    }
}

fn parse_role(s: &str) -> anyhow::Result<Role> {
    match s.to_ascii_lowercase().as_str() {
        "staff" => Ok(Role::Staff),
        "supervisor" => Ok(Role::Supervisor),
        "management" => Ok(Role::Management),
        other => bail!("unknown role: {other}"),
    }
}

/// Import de gabarits de quart : header `id,type,start,end` (HH:MM)
pub fn import_shifts_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Shift>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let id = rec.get(0).context("missing id")?.trim();
        let shift_type = rec.get(1).context("missing type")?.trim();
        let start = rec.get(2).context("missing start")?.trim();
        let end = rec.get(3).context("missing end")?.trim();
        let start = parse_time(start).with_context(|| format!("invalid start for {id}"))?;
        let end = parse_time(end).with_context(|| format!("invalid end for {id}"))?;
        let mut shift = Shift::new(shift_type, start, end);
        shift.id = ShiftId::new(id);
        out.push(shift);
    }
    Ok(out)
}

/// Import d'exigences de permanence :
/// header `period,start,end,minimum_employees[,supervisor_required]`
pub fn import_requirements_csv<P: AsRef<Path>>(
    path: P,
) -> anyhow::Result<Vec<StaffingRequirement>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let period = rec.get(0).context("missing period")?.trim();
        let start = rec.get(1).context("missing start")?.trim();
        let end = rec.get(2).context("missing end")?.trim();
        let minimum = rec.get(3).context("missing minimum_employees")?.trim();
        let start = parse_time(start).with_context(|| format!("invalid start for {period}"))?;
        let end = parse_time(end).with_context(|| format!("invalid end for {period}"))?;
        let minimum: u32 = minimum
            .parse()
            .with_context(|| format!("invalid minimum_employees for {period}"))?;
        let mut requirement = StaffingRequirement::new(period, start, end, minimum, false);
        if let Some(flag) = rec.get(4) {
            let flag = flag.trim();
            if !flag.is_empty() {
                requirement.supervisor_required = parse_bool(flag)
                    .with_context(|| format!("invalid supervisor_required for {period}"))?;
            }
        }
        out.push(requirement);
    }
    Ok(out)
}

/// Export CSV des affectations : header `id,employee_id,shift_id,date,status`
pub fn export_assignments_csv<P: AsRef<Path>>(
    path: P,
    assignments: &[Assignment],
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["id", "employee_id", "shift_id", "date", "status"])?;
    for a in assignments {
        let date = a.date.to_string();
        w.write_record([
            a.id.as_str(),
            a.employee_id.as_str(),
            a.shift_id.as_str(),
            date.as_str(),
            match a.status {
                AssignmentStatus::Draft => "draft",
                AssignmentStatus::Published => "published",
            },
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// Export CSV de la couverture :
/// header `date,period,window,required,actual,supervisors`
pub fn export_coverage_csv<P: AsRef<Path>>(
    path: P,
    reports: &BTreeMap<NaiveDate, CoverageReport>,
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["date", "period", "window", "required", "actual", "supervisors"])?;
    for (date, report) in reports {
        for (window, slot) in &report.periods {
            let date = date.to_string();
            let required = slot.required.to_string();
            let actual = slot.actual.to_string();
            let supervisors = slot.supervisors.to_string();
            w.write_record([
                date.as_str(),
                slot.period.as_str(),
                window.as_str(),
                required.as_str(),
                actual.as_str(),
                supervisors.as_str(),
            ])?;
        }
    }
    w.flush()?;
    Ok(())
}

/// Export JSON du planning généré (jolie mise en forme)
pub fn export_schedule_json<P: AsRef<Path>>(
    path: P,
    schedule: &GeneratedSchedule,
) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(schedule)?;
    fs::write(path, s)?;
    Ok(())
}

/// Table de préférences depuis CSV : header `employee_id,shift_type,level`
pub fn import_preferences_csv<P: AsRef<Path>>(
    path: P,
) -> anyhow::Result<crate::generator::PreferenceTable> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut table = crate::generator::PreferenceTable::new();
    for rec in rdr.records() {
        let rec = rec?;
        let employee = rec.get(0).context("missing employee_id")?.trim();
        let shift_type = rec.get(1).context("missing shift_type")?.trim();
        let level: u8 = rec
            .get(2)
            .context("missing level")?
            .trim()
            .parse()
            .with_context(|| format!("invalid level for {employee}"))?;
        table.set(EmployeeId::new(employee), ShiftTypeId::new(shift_type), level);
    }
    Ok(table)
}
