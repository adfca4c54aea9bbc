#![forbid(unsafe_code)]
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use garde::{
    io,
    queue::Estimator,
    scheduler::{
        detect_violations, Heuristic, PlanOptions, Planner, DEFAULT_CEILING,
        DEFAULT_MAX_SERVERS, DEFAULT_SERVICE_RATE,
    },
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de dimensionnement et de planning de garde
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    #[command(subcommand)]
    cmd: Commands,
}

/// Entrée commune : taux d'arrivée et paramètres de file
#[derive(Args, Debug)]
struct QueueArgs {
    /// CSV des 168 taux d'arrivée horaires
    #[arg(long)]
    arrivals: String,
    /// Patients traités par médecin et par heure
    #[arg(long, default_value_t = DEFAULT_SERVICE_RATE)]
    mu: f64,
    /// Longueur de file maximale tolérée
    #[arg(long, default_value_t = DEFAULT_CEILING)]
    ceiling: f64,
    #[arg(long, default_value_t = DEFAULT_MAX_SERVERS)]
    max_servers: u32,
}

impl QueueArgs {
    fn planner(&self, estimator: Estimator) -> Result<Planner> {
        let arrivals = io::import_arrivals_csv(&self.arrivals)?;
        let opts = PlanOptions {
            service_rate: self.mu,
            ceiling: self.ceiling,
            max_servers: self.max_servers,
            estimator,
        };
        Ok(Planner::new(arrivals, opts)?)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Dimensionner le nombre minimal de médecins par heure
    Plan {
        #[command(flatten)]
        queue: QueueArgs,
        #[arg(long, value_enum, default_value_t = Heuristic::Tightened)]
        heuristic: Heuristic,
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Construire un premier planning glouton
    Roster {
        #[command(flatten)]
        queue: QueueArgs,
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Vérifier les règles de travail d'un planning JSON
    Check {
        #[arg(long)]
        roster: String,
    },

    /// Comparer les heures-serveurs des trois heuristiques
    Compare {
        #[command(flatten)]
        queue: QueueArgs,
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

    let code = match cli.cmd {
        Commands::Plan {
            queue,
            heuristic,
            out_csv,
        } => {
            let planner = queue.planner(Estimator::refined())?;
            let staffing = planner.plan_capacity(heuristic)?;
            if let Some(path) = out_csv {
                io::export_staffing_csv(path, &staffing)?;
            }
            println!(
                "heuristic {}: {} server-hours",
                heuristic.label(),
                staffing.total_hours()
            );
            for (day, peak) in staffing.daily_peaks().iter().enumerate() {
                println!("day {day}: peak {peak}");
            }
            0
        }
        Commands::Roster {
            queue,
            out_json,
            out_csv,
        } => {
            let planner = queue.planner(Estimator::simple())?;
            let roster = planner.build_roster()?;
            garde::validate(&roster)?;
            if let Some(path) = out_json {
                io::export_roster_json(path, &roster)?;
            }
            if let Some(path) = out_csv {
                io::export_periods_csv(path, &roster)?;
            }
            println!(
                "{} doctors | {} hours | score {}",
                roster.doctors.len(),
                roster.total_hours(),
                roster.score()
            );
            0
        }
        Commands::Check { roster } => {
            let roster = io::load_roster_json(roster)?;
            let violations = detect_violations(&roster);
            if violations.is_empty() {
                println!("OK: no violations");
                0
            } else {
                eprintln!("Found {} violation(s)", violations.len());
                for v in &violations {
                    eprintln!("  {v}");
                }
                // Code 2 = WARNING/INCOMPLETE
                2
            }
        }
        Commands::Compare { queue } => {
            let planner = queue.planner(Estimator::refined())?;
            for heuristic in Heuristic::ALL {
                let staffing = planner.plan_capacity(heuristic)?;
                println!("{}: {}", heuristic.label(), staffing.total_hours());
            }
            0
        }
    };

    std::process::exit(code);
}
