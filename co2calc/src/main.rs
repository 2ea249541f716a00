//! co2calc CLI - Carbonate chemistry from seawater observations
//!
//! # Main Command
//!
//! ```bash
//! co2calc run                                  # ../CMS1DataFALL2016.xlsx -> focbco2sys_out.csv
//! co2calc run -i data.xlsx -o out.csv --ph-scale total
//! ```
//!
//! # Debug Commands
//!
//! ```bash
//! co2calc parse data.xlsx                      # Loaded table as JSON
//! co2calc solve --pco2 400 --ph 8 --sal 32 --temp 15
//! co2calc solve --pco2 400 --ph 8 --sal 32 --temp 15 --select TAlk --select OmegaARin
//! co2calc parameters                           # Names of all solver outputs
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use co2calc::logs::{log_error, log_info, log_success};
use co2calc::{
    load_table, run, Co2Sys, Parameter, PhScale, PipelineOptions, Projection, SolverConfig,
};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "co2calc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Carbonate chemistry (saturation states, TA, DIC) from pCO2 and pH",
    long_about = None
)]
struct Cli {
    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevelArg::Info, global = true)]
    log_level: LogLevelArg,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Full pipeline: table -> carbonate system -> focbco2sys_out.csv
    Run {
        /// Input workbook or delimited file
        #[arg(short, long, default_value = "../CMS1DataFALL2016.xlsx")]
        input: PathBuf,

        /// Output CSV file
        #[arg(short, long, default_value = "focbco2sys_out.csv")]
        output: PathBuf,

        /// Scale the input pH is reported on
        #[arg(long, value_enum, default_value_t = PhScaleArg::Nbs)]
        ph_scale: PhScaleArg,
    },

    /// Load an observation table and output JSON
    Parse {
        /// Input workbook or delimited file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Solve one observation and print every derived parameter as JSON
    Solve {
        /// pCO2, µatm
        #[arg(long)]
        pco2: f64,

        #[arg(long)]
        ph: f64,

        /// Practical salinity
        #[arg(long)]
        sal: f64,

        /// Temperature, °C
        #[arg(long)]
        temp: f64,

        /// Output temperature, °C (default: same as --temp)
        #[arg(long)]
        temp_out: Option<f64>,

        #[arg(long, value_enum, default_value_t = PhScaleArg::Nbs)]
        ph_scale: PhScaleArg,

        /// Total silicate, µmol/kg
        #[arg(long, default_value = "0")]
        silicate: f64,

        /// Total phosphate, µmol/kg
        #[arg(long, default_value = "0")]
        phosphate: f64,

        /// Only print these parameters (CO2SYS names, repeatable)
        #[arg(short, long, conflicts_with = "projection")]
        select: Vec<String>,

        /// Print the five output-file columns instead
        #[arg(long)]
        projection: bool,
    },

    /// List solver output parameters and units
    Parameters,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PhScaleArg {
    Total,
    Sws,
    Free,
    Nbs,
}

impl From<PhScaleArg> for PhScale {
    fn from(arg: PhScaleArg) -> Self {
        match arg {
            PhScaleArg::Total => PhScale::Total,
            PhScaleArg::Sws => PhScale::Seawater,
            PhScaleArg::Free => PhScale::Free,
            PhScaleArg::Nbs => PhScale::Nbs,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Level::ERROR,
            LogLevelArg::Warn => Level::WARN,
            LogLevelArg::Info => Level::INFO,
            LogLevelArg::Debug => Level::DEBUG,
            LogLevelArg::Trace => Level::TRACE,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::from(cli.log_level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to install logger: {}", e);
    }

    let result = match cli.command {
        Commands::Run {
            input,
            output,
            ph_scale,
        } => cmd_run(input, output, ph_scale.into()),

        Commands::Parse { input, output } => cmd_parse(&input, output.as_deref()),

        Commands::Solve {
            pco2,
            ph,
            sal,
            temp,
            temp_out,
            ph_scale,
            silicate,
            phosphate,
            select,
            projection,
        } => {
            let config = SolverConfig::default()
                .with_ph_scale(ph_scale.into())
                .with_nutrients(silicate, phosphate);
            let sample = [pco2, ph, sal, temp, temp_out.unwrap_or(temp)];
            if projection {
                cmd_solve_projection(config, sample)
            } else {
                cmd_solve(config, sample, &select)
            }
        }

        Commands::Parameters => cmd_parameters(),
    };

    if let Err(e) = result {
        log_error(format!("Error: {}", e));
        std::process::exit(1);
    }
}

fn cmd_run(
    input: PathBuf,
    output: PathBuf,
    ph_scale: PhScale,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = PipelineOptions {
        input,
        output,
        solver: SolverConfig::default().with_ph_scale(ph_scale),
    };

    let report = run(&options)?;
    log_success(format!(
        "Done: {} rows written to {}",
        report.row_count,
        report.output.display()
    ));
    Ok(())
}

fn cmd_parse(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    log_info(format!("Parsing: {}", input.display()));

    let result = load_table(input)?;
    log_info(format!("Columns: {}", result.headers.join(", ")));
    log_success(format!("Parsed {} rows", result.table.len()));

    let json = serde_json::to_string_pretty(&result)?;
    write_output(&json, output)
}

/// `sample` is pCO2, pH, salinity, input and output temperature.
fn cmd_solve(
    config: SolverConfig,
    sample: [f64; 5],
    select: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let [pco2, ph, sal, temp, temp_out] = sample;
    let solver = Co2Sys::new(config)?;
    let result = solver.solve_table(&[pco2], &[ph], &[sal], &[temp], &[temp_out])?;

    let values: BTreeMap<String, f64> = if select.is_empty() {
        result
            .to_columns()
            .into_iter()
            .map(|(name, series)| (name.to_string(), series[0]))
            .collect()
    } else {
        select
            .iter()
            .map(|name| {
                result
                    .series_by_name(name)
                    .map(|series| (name.clone(), series[0]))
                    .ok_or_else(|| {
                        format!("Unknown parameter '{}' (see `co2calc parameters`)", name)
                    })
            })
            .collect::<Result<_, _>>()?
    };
    println!("{}", serde_json::to_string_pretty(&values)?);
    Ok(())
}

fn cmd_solve_projection(
    config: SolverConfig,
    sample: [f64; 5],
) -> Result<(), Box<dyn std::error::Error>> {
    let [pco2, ph, sal, temp, temp_out] = sample;
    let result = Co2Sys::new(config)?.solve_table(&[pco2], &[ph], &[sal], &[temp], &[temp_out])?;
    let records = Projection::from_result(&result).to_records();
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}

fn cmd_parameters() -> Result<(), Box<dyn std::error::Error>> {
    for parameter in Parameter::ALL {
        println!("{:<14} {}", parameter.name(), parameter.unit());
    }
    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            log_success(format!("Output written to: {}", p.display()));
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
