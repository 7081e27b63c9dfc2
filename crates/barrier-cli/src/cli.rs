use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "barriermd contributors",
    version,
    about = "barriermd - Langevin dynamics of independent particles on a two-barrier potential energy surface.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel force evaluation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a Langevin dynamics simulation and write frames and contour data.
    Run(RunArgs),
    /// Evaluate the potential energy and force at a single point.
    Energy(EnergyArgs),
    /// Sample the potential on a regular x/y grid for contour plotting.
    Grid(GridArgs),
    /// Print the default configuration as TOML.
    Config(ConfigArgs),
}

/// Arguments for the `run` subcommand.
#[derive(Args, Debug)]
pub struct RunArgs {
    // --- Core Arguments ---
    /// Directory that receives frames.csv and potential_grid.csv.
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- System Overrides ---
    /// Override the number of particles.
    #[arg(short = 'n', long, value_name = "INT")]
    pub num_particles: Option<usize>,

    /// Override the particle mass in amu.
    #[arg(long, value_name = "FLOAT")]
    pub mass: Option<f64>,

    // --- Integrator Overrides ---
    /// Override the bath temperature in K.
    #[arg(short = 't', long, value_name = "FLOAT")]
    pub temperature: Option<f64>,

    /// Override the friction coefficient in 1/ps.
    #[arg(long, value_name = "FLOAT")]
    pub friction: Option<f64>,

    /// Override the integration step size in ps.
    #[arg(long, value_name = "FLOAT")]
    pub timestep: Option<f64>,

    /// Seed for reproducible runs. A random seed is drawn and logged when omitted.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    // --- Run Overrides ---
    /// Override the total number of integration steps.
    #[arg(short = 's', long, value_name = "INT")]
    pub steps: Option<u64>,

    /// Override the number of steps between recorded frames.
    #[arg(short = 'r', long, value_name = "INT")]
    pub report_interval: Option<u64>,

    /// Skip writing potential_grid.csv.
    #[arg(long)]
    pub no_grid: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S integrator.temperature=300
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `energy` subcommand.
#[derive(Args, Debug)]
pub struct EnergyArgs {
    /// x coordinate in nm.
    #[arg(allow_negative_numbers = true)]
    pub x: f64,

    /// y coordinate in nm.
    #[arg(allow_negative_numbers = true)]
    pub y: f64,

    /// z coordinate in nm.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub z: f64,

    /// Read surface parameters from a configuration file instead of the defaults.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Read surface parameters from a standalone TOML file, overriding `[surface]` in --config.
    #[arg(long, value_name = "PATH")]
    pub surface: Option<PathBuf>,
}

/// Arguments for the `grid` subcommand.
#[derive(Args, Debug)]
pub struct GridArgs {
    /// Path of the CSV file to write.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Read surface and grid settings from a configuration file.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Read surface parameters from a standalone TOML file, overriding `[surface]` in --config.
    #[arg(long, value_name = "PATH")]
    pub surface: Option<PathBuf>,

    #[arg(long, value_name = "FLOAT", allow_negative_numbers = true)]
    pub x_min: Option<f64>,

    #[arg(long, value_name = "FLOAT", allow_negative_numbers = true)]
    pub x_max: Option<f64>,

    #[arg(long, value_name = "FLOAT", allow_negative_numbers = true)]
    pub y_min: Option<f64>,

    #[arg(long, value_name = "FLOAT", allow_negative_numbers = true)]
    pub y_max: Option<f64>,

    /// Number of grid points along each axis.
    #[arg(long, value_name = "INT")]
    pub resolution: Option<usize>,

    /// Number of contour levels to report, clipped at --ceiling.
    #[arg(long, value_name = "INT", default_value_t = 10)]
    pub levels: usize,

    /// Highest contour level in kJ/mol.
    #[arg(long, value_name = "FLOAT", allow_negative_numbers = true)]
    pub ceiling: Option<f64>,
}

/// Arguments for the `config` subcommand.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Write the configuration to a file instead of standard output.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}
