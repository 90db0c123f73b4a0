use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use serde::Serialize;

use rusty_burn::state::DashboardState;
use rusty_burn::{load_file, AgeCategory, BmiCategory, DistanceCategory, Selection};

#[derive(Parser)]
#[command(name = "rusty-burn")]
#[command(version, about = "Calories burned by running: category filters and linked charts")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the categories each filter can offer
    Options {
        /// Workout table (.csv, .json or .parquet)
        data: PathBuf,
    },

    /// Print the five chart specifications for a selection as JSON
    Charts {
        /// Workout table (.csv, .json or .parquet)
        data: PathBuf,

        /// Age category, e.g. "Middle-Aged"
        #[arg(long)]
        age: Option<AgeCategory>,

        /// Distance category, e.g. "5-10 km"
        #[arg(long)]
        distance: Option<DistanceCategory>,

        /// BMI category, e.g. "Normal"
        #[arg(long)]
        bmi: Option<BmiCategory>,

        /// Output file path (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Indent the JSON
        #[arg(long)]
        pretty: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Options { data } => {
            let table = load_file(&data)
                .with_context(|| format!("loading workouts from {}", data.display()))?;
            let state = DashboardState::new(Arc::new(table));
            write_json(state.options(), None, true)?;
        }

        Commands::Charts {
            data,
            age,
            distance,
            bmi,
            output,
            pretty,
        } => {
            let table = load_file(&data)
                .with_context(|| format!("loading workouts from {}", data.display()))?;
            let mut state = DashboardState::new(Arc::new(table));

            let initial = state.selection();
            let selection = Selection {
                age: age.unwrap_or(initial.age),
                distance: distance.unwrap_or(initial.distance),
                bmi: bmi.unwrap_or(initial.bmi),
            };
            if !state.options().contains(&selection) {
                info!("selection {selection} is not fully present in the data; charts will be empty");
            }

            let view = state.select(selection);
            write_json(view, output.as_ref(), pretty)?;
        }
    }

    Ok(())
}

fn write_json<T: Serialize>(value: &T, output: Option<&PathBuf>, pretty: bool) -> Result<()> {
    let mut sink: Box<dyn Write> = match output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    if pretty {
        serde_json::to_writer_pretty(&mut sink, value)?;
    } else {
        serde_json::to_writer(&mut sink, value)?;
    }
    writeln!(sink)?;
    sink.flush()?;
    Ok(())
}
