//! jira-service - JIRA issue operations from the command line
//!
//! Every subcommand maps onto one service operation and prints its result as
//! JSON on stdout. Logs go to a file, see [`jira_service::logging`].

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::{json, Map, Value};

use jira_service::config::{validate_config, ConfigError, Settings};
use jira_service::error::{AppError, Result};
use jira_service::{
    execute_tool, logging, tool_definitions, CreateIssueParams, JiraService, SearchIssuesParams,
};

/// Talk to JIRA the way an LLM tool call would.
#[derive(Parser)]
#[command(name = "jira-service", version, about)]
struct Cli {
    /// Settings file (defaults to <config dir>/jira-service/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter directives, e.g. `jira_service=debug`; overrides RUST_LOG.
    #[arg(long, global = true)]
    log_filter: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report missing settings.
    CheckConfig {
        /// Only look at environment variables, ignoring the settings file.
        #[arg(long)]
        env_only: bool,
    },

    /// Print the tool declarations as JSON.
    Tools,

    /// Search issues with JQL.
    Search {
        /// The JQL query.
        jql: String,
        /// Maximum number of issues to return.
        #[arg(long, default_value_t = jira_service::tools::DEFAULT_MAX_RESULTS)]
        max_results: u32,
        /// Index of the first issue to return.
        #[arg(long)]
        start_at: Option<u32>,
        /// Entities to expand; may be repeated.
        #[arg(long)]
        expand: Vec<String>,
    },

    /// Fetch one issue.
    Issue {
        /// Issue key, e.g. PROJ-123.
        key: String,
        /// Entities to expand.
        #[arg(long)]
        expand: Option<String>,
    },

    /// Fetch the comments on an issue.
    Comments {
        /// Issue key, e.g. PROJ-123.
        key: String,
        /// Entities to expand.
        #[arg(long)]
        expand: Option<String>,
    },

    /// Add a comment to an issue.
    Comment {
        /// Issue key, e.g. PROJ-123.
        key: String,
        /// Comment text in JIRA wiki markup.
        text: String,
    },

    /// Create an issue.
    Create {
        /// Project key.
        #[arg(long)]
        project: String,
        /// Issue summary.
        #[arg(long)]
        summary: String,
        /// Issue description.
        #[arg(long)]
        description: String,
        /// Issue type ID.
        #[arg(long)]
        issue_type_id: String,
        /// Extra field as NAME=VALUE; VALUE is parsed as JSON when possible.
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<(String, Value)>,
    },

    /// Run a tool by name with JSON arguments.
    Call {
        /// Tool name, see `tools`.
        tool: String,
        /// Arguments as a JSON object.
        #[arg(default_value = "{}")]
        arguments: String,
    },
}

/// Parse `NAME=VALUE`, falling back to a JSON string when VALUE is not JSON.
fn parse_field(raw: &str) -> std::result::Result<(String, Value), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", raw))?;
    if name.is_empty() {
        return Err(format!("field name missing in '{}'", raw));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((name.to_string(), value))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::other(format!("Failed to encode output: {}", e)))?;
    println!("{}", text);
    Ok(())
}

/// Load settings and build a service from them.
fn connect(config: Option<&Path>) -> Result<JiraService> {
    let settings = Settings::load(config)?;
    JiraService::from_settings(&settings)
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.config.as_deref();

    match cli.command {
        Commands::CheckConfig { env_only } => {
            let missing = if env_only {
                validate_config()
            } else {
                Settings::load(config)?.missing()
            };
            print_json(&json!({ "missing": missing }))?;
            if missing.is_empty() {
                Ok(())
            } else {
                Err(ConfigError::MissingSettings(missing).into())
            }
        }
        Commands::Tools => print_json(&tool_definitions()),
        Commands::Search {
            jql,
            max_results,
            start_at,
            expand,
        } => {
            let params = SearchIssuesParams {
                jql,
                start_at,
                expand: if expand.is_empty() { None } else { Some(expand) },
                max_results,
            };
            print_json(&connect(config)?.search_issues(params).await?)
        }
        Commands::Issue { key, expand } => {
            print_json(&connect(config)?.get_issue(&key, expand.as_deref()).await?)
        }
        Commands::Comments { key, expand } => print_json(
            &connect(config)?
                .get_issue_comments(&key, expand.as_deref())
                .await?,
        ),
        Commands::Comment { key, text } => {
            print_json(&connect(config)?.post_issue_comment(&key, &text).await?)
        }
        Commands::Create {
            project,
            summary,
            description,
            issue_type_id,
            fields,
        } => {
            let custom_fields: Map<String, Value> = fields.into_iter().collect();
            let params = CreateIssueParams {
                project_key: project,
                summary,
                description,
                issue_type_id,
                custom_fields: if custom_fields.is_empty() {
                    None
                } else {
                    Some(custom_fields)
                },
            };
            print_json(&connect(config)?.create_issue(params).await?)
        }
        Commands::Call { tool, arguments } => {
            let arguments: Value = serde_json::from_str(&arguments)
                .map_err(|e| AppError::other(format!("Arguments are not valid JSON: {}", e)))?;
            let service = connect(config)?;
            print_json(&execute_tool(&service, &tool, arguments).await?)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.log_filter.as_deref()) {
        eprintln!("warning: file logging disabled: {}", e);
    }

    let outcome = run(cli).await;
    tracing::info!("jira-service shutting down");

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("error: {}", e.user_message());
            if let Some(action) = e.suggested_action() {
                eprintln!("hint: {}", action);
            }
            ExitCode::FAILURE
        }
    }
}
