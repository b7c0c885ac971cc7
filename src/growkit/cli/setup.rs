use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use growkit::model::{Position, UnitLength};
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "0.2.0" for releases, "0.2.0@abc1234 2026-01-15 14:30" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

/// Parses `x,y` into a position.
pub fn parse_position(s: &str) -> Result<Position, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y but got '{}'", s))?;
    let x: f64 = x.trim().parse().map_err(|_| format!("invalid x in '{}'", s))?;
    let y: f64 = y.trim().parse().map_err(|_| format!("invalid y in '{}'", s))?;
    Ok(Position(x, y))
}

#[derive(Parser, Debug)]
#[command(name = "growkit", bin_name = "growkit", version = get_version())]
#[command(about = "Plan garden beds, plantings and tasks, with placement checks", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Use this store directory instead of searching for .growkit
    #[arg(long, global = true, value_name = "PATH", help_heading = "Options")]
    pub dir: Option<PathBuf>,

    /// Operate on the global garden
    #[arg(short, long, global = true, help_heading = "Options")]
    pub global: bool,

    /// Accept edits without validating the garden first
    #[arg(long, global = true, help_heading = "Options")]
    pub no_validate: bool,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new garden in the store
    Init {
        /// Garden name
        name: String,

        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,

        #[arg(long, allow_hyphen_values = true)]
        lon: Option<f64>,
    },

    /// Show the garden
    #[command(alias = "ls")]
    Show {
        /// Print the garden document as JSON
        #[arg(long)]
        json: bool,
    },

    /// Update garden name, location or frost dates
    Meta(MetaArgs),

    /// Manage beds
    #[command(subcommand)]
    Bed(BedCommands),

    /// Manage plantings
    #[command(subcommand)]
    Plant(PlantCommands),

    /// Manage tasks
    #[command(subcommand)]
    Task(TaskCommands),

    /// Attach a free-form comment to the garden
    Comment {
        /// Comment words (joined with spaces)
        #[arg(required = true, trailing_var_arg = true)]
        text: Vec<String>,
    },

    /// Check the garden for spacing, boundary and date problems
    Validate,

    /// Print the garden JSON Schema
    Schema {
        /// Write the schema to this file instead of stdout
        #[arg(long, value_name = "PATH")]
        out: Option<PathBuf>,
    },

    /// Apply a JSON array of mutations, validating once at the end
    Batch {
        /// File holding the mutations (use - for stdin)
        file: PathBuf,
    },

    /// Get or set configuration
    Config {
        /// Configuration key (validate, unit, garden-file)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

#[derive(Args, Debug)]
pub struct MetaArgs {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long, allow_hyphen_values = true, requires = "lon")]
    pub lat: Option<f64>,

    #[arg(long, allow_hyphen_values = true, requires = "lat")]
    pub lon: Option<f64>,

    /// Average last spring frost (YYYY-MM-DD)
    #[arg(long)]
    pub last_frost: Option<NaiveDate>,

    /// Average first autumn frost (YYYY-MM-DD)
    #[arg(long)]
    pub first_frost: Option<NaiveDate>,
}

#[derive(Subcommand, Debug)]
pub enum BedCommands {
    /// Add a bed
    Add {
        name: String,

        #[arg(long)]
        width: f64,

        #[arg(long)]
        length: f64,

        #[arg(long)]
        depth: Option<f64>,

        /// Length unit (m, ft, in); defaults to the configured unit
        #[arg(long)]
        unit: Option<UnitLength>,

        /// Position in the garden as x,y
        #[arg(long, value_parser = parse_position, allow_hyphen_values = true)]
        at: Option<Position>,

        #[arg(long)]
        soil: Option<String>,
    },

    /// Remove a bed and its plantings
    #[command(alias = "remove")]
    Rm {
        /// Bed name or id
        bed: String,
    },

    /// Move a bed within the garden
    Move {
        /// Bed name or id
        bed: String,

        /// New position as x,y
        #[arg(value_parser = parse_position, allow_hyphen_values = true)]
        to: Position,
    },

    /// Change a bed's dimensions
    Resize {
        /// Bed name or id
        bed: String,

        #[arg(long)]
        width: f64,

        #[arg(long)]
        length: f64,

        #[arg(long)]
        depth: Option<f64>,

        #[arg(long)]
        unit: Option<UnitLength>,
    },
}

#[derive(Subcommand, Debug)]
pub enum PlantCommands {
    /// Add a planting to a bed
    Add {
        /// Bed name or id
        bed: String,

        species: String,

        /// Position in the bed as x,y
        #[arg(long, value_parser = parse_position, allow_hyphen_values = true)]
        at: Position,

        /// Spacing radius, in the bed's unit
        #[arg(long)]
        spacing: Option<f64>,

        #[arg(long)]
        variety: Option<String>,

        /// Planting date (YYYY-MM-DD)
        #[arg(long)]
        planted: Option<NaiveDate>,

        /// Expected harvest date (YYYY-MM-DD)
        #[arg(long)]
        harvest: Option<NaiveDate>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Remove plantings by their position in the bed list (e.g. 0 2)
    #[command(alias = "remove")]
    Rm {
        /// Bed name or id
        bed: String,

        #[arg(required = true, num_args = 1..)]
        indexes: Vec<usize>,
    },
}

#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Add a task
    Add {
        title: String,

        /// Target date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,

        #[arg(long)]
        description: Option<String>,

        /// Tie the task to a planting (id or id prefix)
        #[arg(long, conflicts_with = "bed")]
        planting: Option<String>,

        /// Tie the task to a bed (name or id)
        #[arg(long)]
        bed: Option<String>,
    },

    /// Mark a task completed
    Done {
        /// Task id or id prefix
        task: String,

        /// Completion date (default: today)
        #[arg(long)]
        on: Option<NaiveDate>,
    },

    /// Mark a task skipped
    Skip {
        /// Task id or id prefix
        task: String,
    },

    /// Mark a task pending again
    Reopen {
        /// Task id or id prefix
        task: String,
    },

    /// Remove a task
    #[command(alias = "remove")]
    Rm {
        /// Task id or id prefix
        task: String,
    },
}
