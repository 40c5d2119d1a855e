#![forbid(unsafe_code)]
use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use quart::{
    io,
    metrics::summarize,
    validate::{ValidateOptions, ViolationKind},
    Constraints, DateRange, GenerateOptions, JsonAssignmentStore, JsonCatalog, Planner,
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI minimaliste de planification de quarts (sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON des catalogues (roster, quarts, permanences, motifs)
    #[arg(long, global = true, default_value = "catalog.json")]
    catalog: String,

    /// Fichier JSON des affectations
    #[arg(long, global = true, default_value = "assignments.json")]
    store: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Importer des employés depuis un CSV
    ImportEmployees {
        #[arg(long)]
        csv: String,
    },

    /// Importer des gabarits de quart depuis un CSV
    ImportShifts {
        #[arg(long)]
        csv: String,
    },

    /// Importer des exigences de permanence depuis un CSV
    ImportRequirements {
        #[arg(long)]
        csv: String,
    },

    /// Générer un planning brouillon pour un intervalle de dates
    Generate {
        /// AAAA-MM-JJ
        #[arg(long)]
        from: String,
        /// AAAA-MM-JJ (inclus)
        #[arg(long)]
        to: String,
        #[arg(long, default_value_t = 8)]
        min_rest_hours: u32,
        #[arg(long, default_value_t = 6)]
        max_consecutive_days: u32,
        /// CSV de préférences `employee_id,shift_type,level` (optionnel)
        #[arg(long)]
        preferences: Option<String>,
        /// Export JSON du résultat (optionnel)
        #[arg(long)]
        out_json: Option<String>,
    },

    /// Couverture par date des affectations stockées
    Coverage {
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Vérifier repos / jours consécutifs / motifs interdits
    Check {
        #[arg(long, default_value_t = 8)]
        min_rest_hours: u32,
        #[arg(long, default_value_t = 6)]
        max_consecutive_days: u32,
        /// Export CSV des violations (optionnel)
        #[arg(long)]
        report: Option<String>,
    },

    /// Publier les brouillons d'un intervalle de dates
    Publish {
        /// AAAA-MM-JJ
        #[arg(long)]
        from: String,
        /// AAAA-MM-JJ (inclus)
        #[arg(long)]
        to: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let catalog_file = JsonCatalog::open(&cli.catalog);
    let store = JsonAssignmentStore::open(&cli.store);

    let code = match cli.cmd {
        Commands::ImportEmployees { csv } => {
            let employees = io::import_employees_csv(csv)?;
            let mut data = catalog_file.load().unwrap_or_default();
            data.employees = employees;
            catalog_file.save(&data)?;
            0
        }
        Commands::ImportShifts { csv } => {
            let shifts = io::import_shifts_csv(csv)?;
            let mut data = catalog_file.load().unwrap_or_default();
            data.shifts = shifts;
            catalog_file.save(&data)?;
            0
        }
        Commands::ImportRequirements { csv } => {
            let requirements = io::import_requirements_csv(csv)?;
            let mut data = catalog_file.load().unwrap_or_default();
            data.requirements = requirements;
            catalog_file.save(&data)?;
            0
        }
        Commands::Generate {
            from,
            to,
            min_rest_hours,
            max_consecutive_days,
            preferences,
            out_json,
        } => {
            let range = DateRange::new(parse_date(&from)?, parse_date(&to)?);
            let data = catalog_file.load()?;
            if data.employees.is_empty() {
                bail!("catalog has no employees (run import-employees first)");
            }
            let planner = Planner::new(data);
            let opts = GenerateOptions {
                constraints: Constraints {
                    min_rest_hours,
                    max_consecutive_days,
                    ..Constraints::default()
                },
                preferences: match preferences {
                    Some(path) => Some(io::import_preferences_csv(path)?),
                    None => None,
                },
                cancel: None,
            };
            let schedule = planner.generate(range, &opts)?;
            store.upsert(&schedule.assignments)?;

            let validate_opts = ValidateOptions {
                min_rest_hours,
                fallback_max_consecutive: max_consecutive_days,
            };
            let violations = planner.validate(&schedule.assignments, &validate_opts)?;
            let metrics = summarize(
                &schedule,
                &violations,
                &planner.catalog().employees,
                &planner.catalog().shifts,
                Constraints::default().default_weekly_cap,
            );
            println!(
                "{} assignment(s), {} shortfall(s), {} violation(s), {} ms",
                schedule.assignments.len(),
                metrics.coverage_deficits,
                metrics.pattern_errors,
                metrics.generation_ms
            );
            for shortfall in &schedule.shortfalls {
                eprintln!(
                    "under-covered: {} {} ({}) {}/{}{}",
                    shortfall.date,
                    shortfall.period,
                    shortfall.window,
                    shortfall.actual,
                    shortfall.required,
                    if shortfall.missing_supervisor {
                        ", no supervisor"
                    } else {
                        ""
                    }
                );
            }
            if let Some(path) = out_json {
                io::export_schedule_json(path, &schedule)?;
            }
            // Code 2 = planning produit mais incomplet
            if schedule.shortfalls.is_empty() && violations.is_empty() {
                0
            } else {
                2
            }
        }
        Commands::Coverage { out_csv } => {
            let data = catalog_file.load()?;
            let planner = Planner::new(data);
            let assignments = store.load()?;
            let reports = planner.compute_coverage(&assignments)?;
            if let Some(path) = out_csv {
                io::export_coverage_csv(path, &reports)?;
            }
            // impression compacte
            for report in reports.values() {
                for (window, slot) in &report.periods {
                    println!(
                        "{} | {} ({}) | {}/{} | sup {}",
                        report.date, slot.period, window, slot.actual, slot.required,
                        slot.supervisors
                    );
                }
            }
            0
        }
        Commands::Check {
            min_rest_hours,
            max_consecutive_days,
            report,
        } => {
            let data = catalog_file.load()?;
            let planner = Planner::new(data);
            let assignments = store.load()?;
            let opts = ValidateOptions {
                min_rest_hours,
                fallback_max_consecutive: max_consecutive_days,
            };
            let violations = planner.validate(&assignments, &opts)?;
            if violations.is_empty() {
                println!("OK: no violations");
                0
            } else {
                eprintln!("Found {} violation(s)", violations.len());
                if let Some(path) = report {
                    // CSV simple
                    let mut w = csv::Writer::from_path(path)?;
                    w.write_record(["employee_id", "date", "kind", "details"])?;
                    for v in &violations {
                        let date = v.date.to_string();
                        let (kind, details) = match &v.kind {
                            ViolationKind::ConsecutiveDays { run, limit } => {
                                ("consecutive_days", format!("{run} days, limit {limit}"))
                            }
                            ViolationKind::ForbiddenPattern { pattern } => {
                                ("pattern_violation", pattern.clone())
                            }
                            ViolationKind::InsufficientRest {
                                rest_hours,
                                required_hours,
                            } => (
                                "insufficient_rest",
                                format!("{rest_hours}h rest, minimum {required_hours}h"),
                            ),
                            ViolationKind::InvalidInput { reason } => {
                                ("invalid_input", reason.clone())
                            }
                        };
                        w.write_record([
                            v.employee.as_str(),
                            date.as_str(),
                            kind,
                            details.as_str(),
                        ])?;
                    }
                    w.flush()?;
                }
                // Code 2 = WARNING/INCOMPLETE
                2
            }
        }
        Commands::Publish { from, to } => {
            let touched = store.publish(parse_date(&from)?, parse_date(&to)?)?;
            println!("{touched} assignment(s) published");
            0
        }
    };

    std::process::exit(code);
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    match raw.parse() {
        Ok(date) => Ok(date),
        Err(_) => bail!("invalid date (expected YYYY-MM-DD): {raw}"),
    }
}
