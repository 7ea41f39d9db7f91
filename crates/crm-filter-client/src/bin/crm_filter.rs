//! crm-filter: command-line access to the CRM filter compiler and API.
//!
//! `compile` and `decompile` work offline on JSON files (or stdin). `query`
//! and `saved` talk to the CRM API configured through `CRM_API_*` variables.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crm_filter_client::HttpCrmClient;
use crm_filter_core::logging;
use crm_filter_core::{
    compile_conditions, decompile, CreateSavedFilterRequest, EntitySchema, EntityType,
    FilterCondition, FilterContributions, FilterGroup, ListQuery, PersonRole, RecordQueryEngine,
    SavedFilterStore, SortOrder,
};

#[derive(Parser)]
#[command(name = "crm-filter")]
#[command(author, version, about = "Compile, inspect and run CRM list filters")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile flat conditions JSON into a filter group
    Compile {
        /// Conditions file (reads stdin when omitted or "-")
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Reject conditions whose field or operator the entity does not offer
        #[arg(short, long)]
        entity: Option<EntityType>,
    },

    /// Flatten a filter group JSON back into conditions
    Decompile {
        /// Filter group file (reads stdin when omitted or "-")
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Run a list query against the CRM API
    Query {
        /// Entity to list (singular or plural)
        entity: EntityType,

        /// Advanced filter conditions file
        #[arg(short, long)]
        conditions: Option<PathBuf>,

        /// Free-text search across the entity's searchable columns
        #[arg(short, long)]
        search: Option<String>,

        /// Person ids to filter by (can specify multiple)
        #[arg(long, num_args = 1..)]
        person: Vec<String>,

        /// Which person field the ids are matched against
        #[arg(long, value_enum, default_value_t = RoleArg::AssignedTo)]
        role: RoleArg,

        /// Saved filter id; replaces every other filter option
        #[arg(long)]
        saved_filter: Option<String>,

        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Page size (default: CRM_PAGE_LIMIT)
        #[arg(long)]
        limit: Option<u32>,

        #[arg(long)]
        sort_by: Option<String>,

        #[arg(long, default_value = "asc")]
        sort_order: SortOrder,
    },

    /// Manage saved filters
    Saved {
        #[command(subcommand)]
        command: SavedCommands,
    },
}

#[derive(Subcommand)]
enum SavedCommands {
    /// List saved filters for an entity
    List { entity: EntityType },

    /// Show a saved filter and its editor rows
    Show { id: String },

    /// Save a conditions file as a named filter
    Save {
        /// Display name
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        entity: EntityType,

        /// Conditions file (reads stdin when omitted or "-")
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Mark as the entity's default filter
        #[arg(long)]
        default: bool,

        /// Share with the rest of the team
        #[arg(long)]
        shared: bool,
    },

    /// Delete a saved filter
    Delete { id: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum RoleArg {
    AssignedTo,
    CreatedBy,
}

impl From<RoleArg> for PersonRole {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::AssignedTo => PersonRole::AssignedTo,
            RoleArg::CreatedBy => PersonRole::CreatedBy,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let _log_guard = init_logging();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Initialize tracing on stderr so command output on stdout stays parseable.
///
/// Environment variables:
///   LOG_FORMAT  - "json" or "text" (default: "text")
///   LOG_FILE    - path to log file (optional, replaces stderr output)
///   RUST_LOG    - standard env filter (default: "crm_filter=info")
fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "crm_filter=info".into());
    let registry = tracing_subscriber::registry().with(env_filter);

    if let Some(ref path) = log_file {
        let file_dir = Path::new(path).parent().unwrap_or(Path::new("."));
        let file_name = Path::new(path)
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("crm-filter.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(non_blocking),
                )
                .init();
        }
        Some(guard)
    } else if log_format == "json" {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
        None
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
        None
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Compile { input, entity } => cmd_compile(input.as_deref(), entity),
        Commands::Decompile { input } => cmd_decompile(input.as_deref()),
        Commands::Query {
            entity,
            conditions,
            search,
            person,
            role,
            saved_filter,
            page,
            limit,
            sort_by,
            sort_order,
        } => {
            let client = HttpCrmClient::from_env()?;
            let limit = limit.unwrap_or(client.config().default_limit);

            let conditions = match conditions {
                Some(path) => read_json::<Vec<FilterCondition>>(Some(path.as_path()))?,
                None => Vec::new(),
            };
            let schema = EntitySchema::default_for(entity);
            let columns = schema.searchable_columns();

            let mut contributions = FilterContributions::new()
                .with_search(search.as_deref().unwrap_or(""), columns.as_slice())
                .with_advanced(&conditions)
                .with_people(person.as_slice(), role.into(), &schema);
            if let Some(id) = saved_filter {
                contributions = contributions.with_saved_filter(id);
            }

            let mut query = ListQuery::new()
                .page(page)
                .limit(limit)
                .filter(contributions.assemble());
            if let Some(sort_by) = sort_by {
                query = query.sort(sort_by, sort_order);
            }

            debug!({ logging::ENTITY_TYPE } = %entity, "Running list query");
            let page = client.list_records(entity, &query).await?;
            print_json(&page)
        }
        Commands::Saved { command } => {
            let client = HttpCrmClient::from_env()?;
            cmd_saved(&client, command).await
        }
    }
}

fn cmd_compile(input: Option<&Path>, entity: Option<EntityType>) -> anyhow::Result<()> {
    let conditions: Vec<FilterCondition> = read_json(input)?;

    if let Some(entity) = entity {
        let schema = EntitySchema::default_for(entity);
        for condition in &conditions {
            schema.validate_condition(condition)?;
        }
    }

    match compile_conditions(&conditions) {
        Some(group) => print_json(&group),
        None => {
            info!({ logging::CONDITION_COUNT } = conditions.len(), "No active conditions");
            println!("null");
            Ok(())
        }
    }
}

fn cmd_decompile(input: Option<&Path>) -> anyhow::Result<()> {
    let group: FilterGroup = read_json(input)?;
    print_json(&decompile(&group))
}

async fn cmd_saved(client: &HttpCrmClient, command: SavedCommands) -> anyhow::Result<()> {
    match command {
        SavedCommands::List { entity } => {
            let filters = client.list(entity).await?;
            print_json(&filters)
        }
        SavedCommands::Show { id } => {
            let saved = client.load(&id).await?;
            let conditions = decompile(&saved.filter_group);
            print_json(&serde_json::json!({
                "filter": saved,
                "conditions": conditions,
            }))
        }
        SavedCommands::Save {
            name,
            entity,
            input,
            default,
            shared,
        } => {
            let conditions: Vec<FilterCondition> = read_json(input.as_deref())?;
            let Some(group) = compile_conditions(&conditions) else {
                bail!("no active conditions to save");
            };

            let mut req = CreateSavedFilterRequest::new(name, entity, group);
            if default {
                req = req.as_default();
            }
            if shared {
                req = req.shared();
            }

            let saved = client.save(req).await?;
            print_json(&saved)
        }
        SavedCommands::Delete { id } => {
            client.delete(&id).await?;
            println!("Deleted saved filter {}", id);
            Ok(())
        }
    }
}

fn read_input(input: Option<&Path>) -> crm_filter_core::Result<String> {
    match input {
        Some(path) if path != Path::new("-") => Ok(std::fs::read_to_string(path)?),
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(input: Option<&Path>) -> anyhow::Result<T> {
    let source = match input {
        Some(path) if path != Path::new("-") => path.display().to_string(),
        _ => "stdin".to_string(),
    };
    let text = read_input(input).with_context(|| format!("failed to read {}", source))?;
    serde_json::from_str(&text).with_context(|| format!("invalid JSON in {}", source))
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
