use std::{path::PathBuf, process::ExitCode, sync::Arc};

use clap::Parser;
use scim_provider_admin::{
    api::{ApiClient, ApiError},
    config::{AdminConfig, ConfigError},
    dual_select::{DualSelectPane, PaneUpdate},
    form::{FieldErrors, ScimProviderForm},
    models::{MappingKind, ProviderDraft},
    observability,
    services::{GroupLookup, ScimMappingsProvider, is_filter_group},
};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(version, about = "SCIM provider administration", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Path to config file (required for commands that talk to the API)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// List a page of SCIM property mappings with their initial selection
    Mappings {
        /// Mapping field: user or group
        #[arg(short, long, default_value = "user")]
        kind: MappingKind,
        /// Page number (1-based)
        #[arg(short, long, default_value_t = 1)]
        page: u32,
        /// Filter mappings by name
        #[arg(short, long, default_value = "")]
        search: String,
        /// Provider draft JSON file (omit for a new provider)
        #[arg(short, long)]
        draft: Option<PathBuf>,
    },
    /// Search groups for the provider's user filter
    Groups {
        /// Filter groups by name
        #[arg(short, long)]
        search: Option<String>,
        /// Provider draft JSON file
        #[arg(short, long)]
        draft: Option<PathBuf>,
    },
    /// Print the form description for a provider draft
    Form {
        /// Provider draft JSON file (omit for a new provider)
        #[arg(short, long)]
        draft: Option<PathBuf>,
        /// Validation errors JSON file returned by the server
        #[arg(short, long)]
        errors: Option<PathBuf>,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("--config is required for this command")]
    MissingConfig,

    #[error("Failed to read {1}: {0}")]
    Io(std::io::Error, PathBuf),

    #[error("Invalid JSON in {1}: {0}")]
    Json(serde_json::Error, PathBuf),

    #[error("Failed to write output: {0}")]
    Output(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct MappingRow<'a> {
    id: &'a str,
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    managed: Option<&'a str>,
    selected: bool,
}

#[derive(Serialize)]
struct GroupRow<'a> {
    id: &'a str,
    name: &'a str,
    selected: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match args.config.as_deref().map(AdminConfig::from_file).transpose() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", CliError::from(e));
            return ExitCode::FAILURE;
        }
    };

    let logging = config
        .as_ref()
        .map(|c| c.observability.logging.clone())
        .unwrap_or_default();
    if let Err(e) = observability::init_tracing(&logging) {
        eprintln!("Warning: {e}");
    }

    match run(args.command, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command, config: Option<AdminConfig>) -> Result<(), CliError> {
    match command {
        Command::Mappings {
            kind,
            page,
            search,
            draft,
        } => {
            let client = connect(config.as_ref())?;
            let draft = draft.map(read_json::<ProviderDraft>).transpose()?;
            let form = ScimProviderForm::new(draft, FieldErrors::default());
            let selector = form.selector(kind);

            let mut pane = DualSelectPane::new(ScimMappingsProvider::new(client));
            if pane.load(page, &search).await == PaneUpdate::Failed
                && let Some(e) = pane.take_error()
            {
                return Err(e.into());
            }

            let Some(displayed) = pane.displayed() else {
                return Ok(());
            };
            let rows: Vec<_> = displayed
                .entries
                .iter()
                .map(|entry| MappingRow {
                    id: &entry.id,
                    name: &entry.display_label,
                    managed: entry.record.as_ref().and_then(|m| m.managed.as_deref()),
                    selected: selector.is_selected(entry),
                })
                .collect();

            print_json(&serde_json::json!({
                "field": kind.field_name(),
                "pagination": displayed.pagination,
                "entries": rows,
            }))
        }
        Command::Groups { search, draft } => {
            let client = connect(config.as_ref())?;
            let draft = draft.map(read_json::<ProviderDraft>).transpose()?;
            let filter_group = draft.as_ref().and_then(|d| d.filter_group.as_deref());

            let groups = GroupLookup::new(client).search(search.as_deref()).await?;
            let rows: Vec<_> = groups
                .iter()
                .map(|group| GroupRow {
                    id: &group.pk,
                    name: &group.name,
                    selected: is_filter_group(group, filter_group),
                })
                .collect();

            print_json(&rows)
        }
        Command::Form { draft, errors } => {
            let draft = draft.map(read_json::<ProviderDraft>).transpose()?;
            let errors = errors
                .map(read_json::<FieldErrors>)
                .transpose()?
                .unwrap_or_default();

            print_json(&ScimProviderForm::new(draft, errors).render())
        }
    }
}

fn connect(config: Option<&AdminConfig>) -> Result<Arc<ApiClient>, CliError> {
    let config = config.ok_or(CliError::MissingConfig)?;
    let client = ApiClient::new(&config.api)?;
    tracing::debug!(base_url = %client.base_url(), "Connected admin API client");
    Ok(Arc::new(client))
}

fn read_json<T: serde::de::DeserializeOwned>(path: PathBuf) -> Result<T, CliError> {
    let contents = std::fs::read_to_string(&path).map_err(|e| CliError::Io(e, path.clone()))?;
    serde_json::from_str(&contents).map_err(|e| CliError::Json(e, path))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
