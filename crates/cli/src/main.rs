/// Dispatch on a [`FormKind`] to code generic over its [`sts_core::ChecklistForm`].
macro_rules! with_form {
    ($kind:expr, $form:ident => $body:expr) => {
        match $kind {
            sts_core::FormKind::PreFixture => {
                type $form = sts_core::PreFixture;
                $body
            }
            sts_core::FormKind::BeforeOperation => {
                type $form = sts_core::BeforeOperation;
                $body
            }
            sts_core::FormKind::BeforeMooring => {
                type $form = sts_core::BeforeMooring;
                $body
            }
            sts_core::FormKind::BeforeTransfer => {
                type $form = sts_core::BeforeTransfer;
                $body
            }
            sts_core::FormKind::BeforeUnmooring => {
                type $form = sts_core::BeforeUnmooring;
                $body
            }
        }
    };
}

mod commands;
mod serve;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use sts_client::{ConfigOverrides, StsConfig};
use sts_core::FormKind;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive.
const LOG_ENV: &str = "STS_LOG";

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Ship-to-ship transfer checklist toolkit.
#[derive(Parser)]
#[command(name = "sts", version, about = "Ship-to-ship transfer checklist toolkit")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Path to an sts.toml config file (default: ./sts.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Checklist proxy base URL (overrides STS_PROXY_URL and the config file)
    #[arg(long, global = true)]
    proxy_url: Option<String>,

    /// Backend API base URL, used to resolve signature image paths
    #[arg(long, global = true)]
    api_base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the checklist forms and their slugs
    Forms,

    /// Print a blank record for a form
    Template {
        /// Form slug, e.g. ops-ofd-001
        form: FormKind,
        /// Operation reference to seed the record with
        #[arg(long)]
        operation_ref: Option<String>,
        /// Print the submission payload instead of the in-memory record
        #[arg(long)]
        payload: bool,
    },

    /// Fetch and print an existing record
    Show {
        /// Form slug, e.g. ops-ofd-001
        form: FormKind,
        /// Operation reference of the record
        operation_ref: String,
    },

    /// Submit a record from a JSON file
    Submit {
        /// Form slug, e.g. ops-ofd-001
        form: FormKind,
        /// Path to the record JSON
        file: PathBuf,
        /// Operation reference (used when the file has none, and as the page reference;
        /// with --update it defaults to the file's operationRef)
        #[arg(long)]
        operation_ref: Option<String>,
        /// Update the existing record instead of creating a new one
        #[arg(long)]
        update: bool,
        /// Attach a signature or stamp image, as ROLE=PATH (roles: chs, ms, stamp)
        #[arg(long = "sign", value_name = "ROLE=PATH")]
        signatures: Vec<String>,
    },

    /// List the records of one form for a year
    List {
        /// Form slug, e.g. ops-ofd-001
        form: FormKind,
        /// Year to list (default: current year)
        #[arg(long)]
        year: Option<i32>,
    },

    /// Per-status record counts for every form
    Dashboard {
        /// Year to summarize (default: current year)
        #[arg(long)]
        year: Option<i32>,
    },

    /// Show the sentence a raw error message is reported as
    ExplainError {
        /// Raw error message; omit to explain a missing error value
        message: Option<String>,
    },

    /// Resolve a stored signature value to a displayable URL
    ResolveImage {
        /// Stored value: data URL, absolute URL or backend-relative path
        value: String,
    },

    /// Run an in-memory checklist proxy for local development and tests
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "3000")]
        port: u16,
    },
}

fn main() {
    let cli = Cli::parse();
    let output = cli.output;
    let quiet = cli.quiet;

    let serving = matches!(cli.command, Commands::Serve { .. });
    init_tracing(if serving { "info" } else { "off" });

    let overrides = ConfigOverrides {
        api_base_url: cli.api_base_url,
        proxy_url: cli.proxy_url,
    };
    let config = match StsConfig::load(cli.config.as_deref(), &overrides) {
        Ok(config) => config,
        Err(e) => {
            report_error(&format!("config error: {}", e), output, quiet);
            process::exit(1);
        }
    };

    match cli.command {
        Commands::Forms => commands::forms::cmd_forms(output, quiet),
        Commands::Template {
            form,
            operation_ref,
            payload,
        } => commands::record::cmd_template(form, operation_ref.as_deref(), payload, output, quiet),
        Commands::Show {
            form,
            operation_ref,
        } => commands::record::cmd_show(form, &operation_ref, &config, output, quiet),
        Commands::Submit {
            form,
            file,
            operation_ref,
            update,
            signatures,
        } => commands::submit::cmd_submit(
            form,
            &file,
            operation_ref.as_deref(),
            update,
            &signatures,
            &config,
            output,
            quiet,
        ),
        Commands::List { form, year } => {
            commands::list::cmd_list(form, year, &config, output, quiet)
        }
        Commands::Dashboard { year } => commands::list::cmd_dashboard(year, &config, output, quiet),
        Commands::ExplainError { message } => {
            commands::explain::cmd_explain_error(message.as_deref(), output, quiet)
        }
        Commands::ResolveImage { value } => {
            commands::explain::cmd_resolve_image(&value, &config, output, quiet)
        }
        Commands::Serve { port } => {
            let rt = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    report_error(&format!("failed to create tokio runtime: {}", e), output, quiet);
                    process::exit(1);
                }
            };
            if let Err(e) = rt.block_on(serve::start_server(port)) {
                report_error(&format!("server error: {}", e), output, quiet);
                process::exit(1);
            }
        }
    }
}

/// Install the stderr log subscriber. `STS_LOG` overrides `default_filter`.
fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Print a JSON value to stdout, pretty-printed.
pub(crate) fn print_json(value: &serde_json::Value) {
    println!(
        "{}",
        serde_json::to_string_pretty(value)
            .unwrap_or_else(|e| format!("serialization error: {}", e))
    );
}

/// Report an error to stderr in the selected format.
pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            let err_json = serde_json::json!({ "error": msg });
            eprintln!(
                "{}",
                serde_json::to_string_pretty(&err_json).unwrap_or_default()
            );
        }
    }
}
