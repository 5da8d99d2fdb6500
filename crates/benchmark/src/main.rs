//! Pallet stacking runner CLI

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use u_stacking_benchmark::{RunOptions, RunReport, Scenario, ScenarioRunner};
use u_stacking_pallet::default_patterns;

#[derive(Parser)]
#[command(name = "stack-runner")]
#[command(about = "Layer stacking runner for U-Stacking")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available layer patterns
    Patterns,

    /// Solve a scenario file
    Run {
        /// Path to the JSON scenario file
        scenario: PathBuf,

        /// Number of solutions to print (0 = all)
        #[arg(short = 'n', long, default_value = "10")]
        top: usize,

        /// Evaluate branches on a single thread
        #[arg(long)]
        sequential: bool,

        /// Time limit in seconds
        #[arg(short, long)]
        time_limit: Option<u64>,

        /// Output file for the best solution (CSV)
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Output file for all solutions (JSON)
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Solve the built-in 400x300x200 on 1200x800 scenario
    Demo {
        /// Number of solutions to print (0 = all)
        #[arg(short = 'n', long, default_value = "10")]
        top: usize,
    },
}

fn write_outputs(
    report: &RunReport,
    csv: Option<PathBuf>,
    json: Option<PathBuf>,
) -> anyhow::Result<()> {
    if let Some(path) = csv {
        if report.save_best_csv(&path)? {
            println!("Best solution saved to: {}", path.display());
        } else {
            eprintln!("No solution to export");
        }
    }

    if let Some(path) = json {
        report.save_json(&path)?;
        println!("Results saved to: {}", path.display());
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Patterns => {
            println!("Available layer patterns:");
            println!("=========================");
            for pattern in default_patterns() {
                println!(
                    "  - {:<16} swappable: {}",
                    pattern.name(),
                    if pattern.can_be_swapped() { "yes" } else { "no" }
                );
            }
        }

        Commands::Run {
            scenario,
            top,
            sequential,
            time_limit,
            csv,
            json,
        } => {
            let scenario = Scenario::from_file(&scenario)?;

            let mut options = RunOptions::new().with_sequential(sequential);
            if let Some(secs) = time_limit {
                options = options.with_time_limit(secs * 1000);
            }

            let report = ScenarioRunner::new(options).run(&scenario)?;
            report.print_summary(top);
            write_outputs(&report, csv, json)?;
        }

        Commands::Demo { top } => {
            let report = ScenarioRunner::default().run(&Scenario::demo())?;
            report.print_summary(top);
        }
    }

    Ok(())
}
