//! # CLI Layer
//!
//! The CLI is **one client** of the growkit library. It is the only place that:
//! - Parses arguments
//! - Writes to stdout/stderr
//! - Decides the process exit code
//! - Sets up logging
//!
//! ## Structure
//!
//! - `run()`: Main dispatch logic (called by `main.rs`)
//! - `init_context()`: Builds `AppContext` from flags, store discovery and config
//! - `handle_*()`: Per-command handlers that call `GardenApi` and print results
//!
//! Rejected edits and a failing `validate` surface as
//! [`GrowkitError::Validation`], which `main.rs` prints with every issue.

use super::render::{print_config, print_garden, print_issues, print_messages};
use super::setup::{BedCommands, Cli, Commands, MetaArgs, PlantCommands, TaskCommands};
use clap::Parser;
use growkit::api::GardenApi;
use growkit::commands::beds::{AddBedParams, UpdateBedDimensionsParams};
use growkit::commands::config::ConfigAction;
use growkit::commands::garden::{CreateGardenParams, UpdateGardenMetadataParams};
use growkit::commands::helpers::{resolve_bed, BedSelector};
use growkit::commands::plantings::AddPlantingParams;
use growkit::commands::tasks::{AddPlantingTaskParams, AddTaskParams, SetTaskStatusParams};
use growkit::commands::{CmdResult, Mutation};
use growkit::document;
use growkit::error::{GrowkitError, Result};
use growkit::init::initialize;
use growkit::model::{Coordinates, TaskStatus, UnitLength};
use growkit::policy::CommitMode;
use growkit::schema::save_garden_schema;
use growkit::store::fs::FileStore;
use growkit::store::DataStore;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

struct AppContext {
    api: GardenApi<FileStore>,
    default_unit: UnitLength,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut ctx = init_context(&cli)?;

    match cli.command {
        Some(Commands::Init { name, lat, lon }) => handle_init(&mut ctx, name, lat, lon),
        Some(Commands::Show { json }) => handle_show(&ctx, json),
        Some(Commands::Meta(args)) => handle_meta(&mut ctx, args),
        Some(Commands::Bed(cmd)) => handle_bed(&mut ctx, cmd),
        Some(Commands::Plant(cmd)) => handle_plant(&mut ctx, cmd),
        Some(Commands::Task(cmd)) => handle_task(&mut ctx, cmd),
        Some(Commands::Comment { text }) => {
            let result = ctx.api.add_comment(&text.join(" "))?;
            print_messages(&result.messages);
            Ok(())
        }
        Some(Commands::Validate) => handle_validate(&ctx),
        Some(Commands::Schema { out }) => handle_schema(&ctx, out),
        Some(Commands::Batch { file }) => handle_batch(&mut ctx, &file),
        Some(Commands::Config { key, value }) => handle_config(&ctx, key, value),
        None => handle_show(&ctx, false),
    }
}

/// Logs go to stderr so they never mix with command output. `RUST_LOG`
/// overrides the level set by `--verbose`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let ctx = initialize(&cwd, cli.dir.as_deref(), cli.global)?;

    let api = if cli.no_validate {
        ctx.api.with_mode(CommitMode::Unvalidated)
    } else {
        ctx.api
    };

    Ok(AppContext {
        api,
        default_unit: ctx.config.default_unit,
    })
}

fn handle_init(
    ctx: &mut AppContext,
    name: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> Result<()> {
    let result = ctx.api.create_garden(&CreateGardenParams {
        name,
        latitude,
        longitude,
    })?;
    print_messages(&result.messages);
    if let Some(path) = ctx.api.store().garden_path() {
        println!("Initialized {}", path.display());
    }
    Ok(())
}

fn handle_show(ctx: &AppContext, json: bool) -> Result<()> {
    let result = ctx.api.show()?;
    if let Some(garden) = &result.garden {
        if json {
            println!("{}", document::to_json(garden)?);
        } else {
            print_garden(garden);
        }
    }
    Ok(())
}

fn handle_meta(ctx: &mut AppContext, args: MetaArgs) -> Result<()> {
    let location = match (args.lat, args.lon) {
        (Some(latitude), Some(longitude)) => Some(Coordinates::new(latitude, longitude)?),
        _ => None,
    };
    let result = ctx.api.update_metadata(UpdateGardenMetadataParams {
        name: args.name,
        location,
        average_last_frost: args.last_frost,
        average_first_frost: args.first_frost,
    })?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_bed(ctx: &mut AppContext, cmd: BedCommands) -> Result<()> {
    let result = match cmd {
        BedCommands::Add {
            name,
            width,
            length,
            depth,
            unit,
            at,
            soil,
        } => ctx.api.add_bed(AddBedParams {
            name,
            position: at,
            width,
            length,
            depth,
            unit: unit.unwrap_or(ctx.default_unit),
            soil_type: soil,
        })?,
        BedCommands::Rm { bed } => ctx.api.remove_bed(&selector(&bed))?,
        BedCommands::Move { bed, to } => ctx.api.move_bed(&selector(&bed), to)?,
        BedCommands::Resize {
            bed,
            width,
            length,
            depth,
            unit,
        } => {
            let selector = selector(&bed);
            let unit = match unit {
                Some(unit) => unit,
                None => current_unit(ctx, &selector)?,
            };
            ctx.api.resize_bed(
                &selector,
                UpdateBedDimensionsParams {
                    bed_id: Uuid::nil(),
                    width,
                    length,
                    depth,
                    unit,
                },
            )?
        }
    };
    print_result(&result);
    Ok(())
}

fn handle_plant(ctx: &mut AppContext, cmd: PlantCommands) -> Result<()> {
    let result = match cmd {
        PlantCommands::Add {
            bed,
            species,
            at,
            spacing,
            variety,
            planted,
            harvest,
            notes,
        } => ctx.api.add_planting(
            &selector(&bed),
            AddPlantingParams {
                bed_id: Uuid::nil(),
                species,
                variety,
                planted_on: planted,
                expected_harvest: harvest,
                spacing,
                position: at,
                notes,
            },
        )?,
        PlantCommands::Rm { bed, indexes } => {
            ctx.api.remove_plantings(&selector(&bed), &indexes)?
        }
    };
    print_result(&result);
    Ok(())
}

fn handle_task(ctx: &mut AppContext, cmd: TaskCommands) -> Result<()> {
    let result = match cmd {
        TaskCommands::Add {
            title,
            date,
            description,
            planting: Some(planting),
            ..
        } => ctx.api.add_planting_task(
            &planting,
            AddPlantingTaskParams {
                planting_id: Uuid::nil(),
                title,
                target_date: date,
                description,
            },
        )?,
        TaskCommands::Add {
            title,
            date,
            description,
            planting: None,
            bed,
        } => {
            let related_bed_id = match bed {
                Some(bed) => Some(ctx.api.resolve_bed(&selector(&bed))?),
                None => None,
            };
            ctx.api.add_task(AddTaskParams {
                title,
                target_date: date,
                description,
                related_planting_id: None,
                related_bed_id,
            })?
        }
        TaskCommands::Done { task, on } => {
            set_status(ctx, &task, TaskStatus::Completed, on)?
        }
        TaskCommands::Skip { task } => set_status(ctx, &task, TaskStatus::Skipped, None)?,
        TaskCommands::Reopen { task } => set_status(ctx, &task, TaskStatus::Pending, None)?,
        TaskCommands::Rm { task } => ctx.api.remove_task(&task)?,
    };
    print_result(&result);
    Ok(())
}

fn set_status(
    ctx: &mut AppContext,
    task: &str,
    status: TaskStatus,
    completed_on: Option<chrono::NaiveDate>,
) -> Result<CmdResult> {
    ctx.api.set_task_status(
        task,
        SetTaskStatusParams {
            task_id: Uuid::nil(),
            status,
            completed_on,
        },
    )
}

fn handle_validate(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.validate()?;
    if result.issues.is_empty() {
        print_messages(&result.messages);
        return Ok(());
    }
    Err(GrowkitError::Validation(result.issues))
}

fn handle_schema(ctx: &AppContext, out: Option<PathBuf>) -> Result<()> {
    match out {
        Some(path) => {
            save_garden_schema(&path)?;
            println!("Schema written to {}", path.display());
        }
        None => {
            let result = ctx.api.schema()?;
            if let Some(schema) = result.schema {
                println!("{}", serde_json::to_string_pretty(&schema)?);
            }
        }
    }
    Ok(())
}

fn handle_batch(ctx: &mut AppContext, file: &Path) -> Result<()> {
    let content = if file == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        std::fs::read_to_string(file)?
    };
    let mutations: Vec<Mutation> = serde_json::from_str(&content)?;
    let result = ctx.api.apply_batch(&mutations)?;
    print_result(&result);
    if result.issues.is_empty() {
        println!("Applied {} mutation(s)", mutations.len());
    }
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };
    let result = ctx.api.config(action)?;
    if result.messages.is_empty() {
        if let Some(config) = &result.config {
            print_config(config);
        }
    }
    print_messages(&result.messages);
    Ok(())
}

fn print_result(result: &CmdResult) {
    print_messages(&result.messages);
    print_issues(&result.issues);
}

fn selector(input: &str) -> BedSelector {
    match input.parse() {
        Ok(selector) => selector,
        Err(never) => match never {},
    }
}

fn current_unit(ctx: &AppContext, selector: &BedSelector) -> Result<UnitLength> {
    let garden = ctx.api.garden()?;
    let bed_id = resolve_bed(&garden, selector)?;
    Ok(garden
        .bed(&bed_id)
        .map(|b| b.dimensions.unit)
        .unwrap_or(ctx.default_unit))
}
