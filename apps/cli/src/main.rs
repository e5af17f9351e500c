use std::{fs, path::PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use indicatif::ProgressBar;
use output::{OutputFormat, Renderer};
use progress::spinner;
use querybridge_client::store::JsonStore;
use querybridge_core::{
    bootstrap, ServerConfig, ServerMode, ToolExecutor, ToolExecutorError,
};
use serde::Serialize;
use serde_json::Value;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Parser, Clone)]
#[command(
    name = "querybridge",
    version,
    about = "Register third-party APIs and run natural-language queries against them."
)]
struct Cli {
    /// Preferred renderer for command output.
    #[arg(long, global = true, value_enum, default_value = "markdown")]
    format: OutputFormat,
    /// Override the data directory used by the record store.
    #[arg(long, global = true)]
    store_dir: Option<PathBuf>,
    /// Disable ANSI colors in CLI output.
    #[arg(long, global = true)]
    no_color: bool,
    /// Suppress non-critical CLI output.
    #[arg(long, global = true)]
    quiet: bool,
    /// Disable progress indicators for long-running tasks.
    #[arg(long, global = true)]
    no_progress: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand, Clone)]
enum Command {
    /// Run the server over STDIO (JSON-RPC transport).
    Serve,
    /// Inspect and invoke available tools.
    Tools {
        #[command(subcommand)]
        command: ToolCommand,
    },
    /// Browse the provider catalog without starting the server.
    Providers {
        #[command(subcommand)]
        command: ProviderCommand,
    },
    /// Inspect the on-disk record store.
    Store {
        #[command(subcommand)]
        command: StoreCommand,
    },
    /// View recent tool telemetry captured by the server.
    Telemetry {
        /// Maximum number of telemetry entries to display (0 = all).
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Generate shell completion scripts.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, Subcommand, Clone)]
enum ToolCommand {
    /// List registered tools and their descriptions.
    List,
    /// Execute a tool by name with optional JSON arguments.
    Call {
        name: String,
        /// Tool arguments expressed as JSON (`{"key": "value"}`) or @path to a JSON file.
        #[arg(short, long)]
        arguments: Option<String>,
    },
}

#[derive(Debug, Subcommand, Clone)]
enum ProviderCommand {
    /// List every catalogued provider.
    List,
    /// Substring search over keys, names, and descriptions.
    Search { query: String },
}

#[derive(Debug, Subcommand, Clone)]
enum StoreCommand {
    /// Report store directory status and record file counts.
    Status,
}

#[derive(Clone, Debug, Serialize)]
struct StoreStatusReport {
    path: String,
    exists: bool,
    readable: bool,
    file_count: usize,
}

impl Cli {
    fn progress_enabled(&self) -> bool {
        !self.quiet && !self.no_progress
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli)?;

    if cli.no_color {
        std::env::set_var("NO_COLOR", "1");
    }

    let config = ServerConfig {
        store_dir: cli.store_dir.clone(),
        mode: match cli.command {
            Command::Serve => ServerMode::Stdio,
            _ => ServerMode::Headless,
        },
        ..ServerConfig::default()
    };

    let runtime = bootstrap(config).await?;
    let executor = runtime.executor();

    match &cli.command {
        Command::Serve => runtime.clone().serve().await,
        Command::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(*shell, &mut command, "querybridge", &mut std::io::stdout());
            Ok(())
        }
        Command::Tools { command } => {
            let renderer = Renderer::new(cli.format);
            handle_tool_command(command.clone(), &cli, &renderer, executor).await
        }
        Command::Providers { command } => {
            let renderer = Renderer::new(cli.format);
            handle_provider_command(command.clone(), &cli, &renderer, &executor)
        }
        Command::Store { command } => {
            let renderer = Renderer::new(cli.format);
            handle_store_command(command.clone(), &cli, &renderer)
        }
        Command::Telemetry { limit } => {
            let renderer = Renderer::new(cli.format);
            handle_telemetry_command(*limit, &cli, &renderer, executor).await
        }
    }
}

async fn handle_tool_command(
    command: ToolCommand,
    cli: &Cli,
    renderer: &Renderer,
    executor: ToolExecutor,
) -> Result<()> {
    match command {
        ToolCommand::List => {
            let definitions = executor.list_tools().await;
            if cli.quiet {
                return Ok(());
            }
            renderer.tool_definitions(&definitions)?;
        }
        ToolCommand::Call { name, arguments } => {
            let payload = parse_arguments(arguments)?;
            let spinner = spinner(cli.progress_enabled(), format!("Calling `{name}`..."));
            let result = executor.call_tool(&name, payload).await;
            match result {
                Ok(response) => {
                    finish_spinner(spinner, Some(format!("Tool `{name}` completed")));
                    if !cli.quiet {
                        renderer.tool_response(&response)?;
                    }
                }
                Err(ToolExecutorError::UnknownTool(_)) => {
                    finish_spinner(spinner, None);
                    anyhow::bail!("unknown tool: {name}");
                }
                Err(ToolExecutorError::Execution { source, .. }) => {
                    finish_spinner(spinner, None);
                    return Err(source.context(format!("tool `{name}` failed")));
                }
            }
        }
    }

    Ok(())
}

fn handle_provider_command(
    command: ProviderCommand,
    cli: &Cli,
    renderer: &Renderer,
    executor: &ToolExecutor,
) -> Result<()> {
    if cli.quiet {
        return Ok(());
    }
    let registry = executor.context().registry.clone();
    match command {
        ProviderCommand::List => {
            let rows: Vec<output::ProviderRow> = registry
                .iter()
                .map(|descriptor| output::ProviderRow {
                    key: descriptor.key,
                    name: descriptor.name,
                    auth: descriptor.auth_type.as_str(),
                    description: descriptor.description,
                })
                .collect();
            renderer.providers(&rows)?;
        }
        ProviderCommand::Search { query } => {
            let rows: Vec<output::ProviderRow> = registry
                .search(&query)
                .into_iter()
                .filter_map(|summary| registry.lookup_by_key(summary.key))
                .map(|descriptor| output::ProviderRow {
                    key: descriptor.key,
                    name: descriptor.name,
                    auth: descriptor.auth_type.as_str(),
                    description: descriptor.description,
                })
                .collect();
            if rows.is_empty() {
                println!("No providers matched `{query}`.");
            } else {
                renderer.providers(&rows)?;
            }
        }
    }
    Ok(())
}

fn handle_store_command(command: StoreCommand, cli: &Cli, renderer: &Renderer) -> Result<()> {
    match command {
        StoreCommand::Status => {
            let path = cli
                .store_dir
                .clone()
                .unwrap_or_else(JsonStore::default_dir);
            let (exists, readable, file_count) = match fs::read_dir(&path) {
                Ok(entries) => {
                    let count = entries.filter_map(std::result::Result::ok).count();
                    (true, true, count)
                }
                Err(error) => {
                    tracing::info!(
                        target: "querybridge_cli",
                        error = %error,
                        path = %path.display(),
                        "unable to inspect store directory"
                    );
                    (path.exists(), false, 0)
                }
            };

            if cli.quiet {
                return Ok(());
            }

            let report = StoreStatusReport {
                path: path.display().to_string(),
                exists,
                readable,
                file_count,
            };
            renderer.store_status(&report)?;
        }
    }
    Ok(())
}

async fn handle_telemetry_command(
    limit: usize,
    cli: &Cli,
    renderer: &Renderer,
    executor: ToolExecutor,
) -> Result<()> {
    if cli.quiet {
        return Ok(());
    }

    let context = executor.context();
    let entries = context.telemetry_snapshot().await;
    if entries.is_empty() {
        renderer.no_telemetry()?;
        return Ok(());
    }

    let total = entries.len();
    let start = if limit == 0 {
        0
    } else {
        total.saturating_sub(limit)
    };
    let sliced: Vec<_> = entries.into_iter().skip(start).collect();
    renderer.telemetry(&sliced)?;
    Ok(())
}

fn init_tracing(cli: &Cli) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,querybridge_cli=info"));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .without_time()
        .with_ansi(!cli.no_color)
        .compact()
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow!("failed to initialize logging: {error}"))
}

fn parse_arguments(arguments: Option<String>) -> Result<Value> {
    match arguments {
        Some(raw) if raw.starts_with('@') => {
            let path = raw.trim_start_matches('@');
            let contents =
                fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("invalid JSON arguments in {path}"))
        }
        Some(raw) => serde_json::from_str(&raw).context("invalid JSON arguments"),
        None => Ok(Value::Object(Default::default())),
    }
}

fn finish_spinner(spinner: Option<ProgressBar>, message: Option<String>) {
    if let Some(progress) = spinner {
        if let Some(msg) = message {
            progress.finish_with_message(msg);
        } else {
            progress.finish_and_clear();
        }
    }
}

mod output {
    use std::fmt::Write;

    use anyhow::Result;
    use clap::ValueEnum;
    use querybridge_core::state::{TelemetryEntry, ToolDefinition, ToolResponse};
    use serde::Serialize;
    use serde_json::{self, json};

    #[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
    pub enum OutputFormat {
        Json,
        Markdown,
        Table,
        Text,
    }

    #[derive(Clone, Debug, Serialize)]
    pub struct ProviderRow {
        pub key: &'static str,
        pub name: &'static str,
        pub auth: &'static str,
        pub description: &'static str,
    }

    #[derive(Copy, Clone, Debug)]
    pub struct Renderer {
        format: OutputFormat,
    }

    impl Renderer {
        pub fn new(format: OutputFormat) -> Self {
            Self { format }
        }

        pub fn tool_definitions(&self, definitions: &[ToolDefinition]) -> Result<()> {
            match self.format {
                OutputFormat::Json => {
                    let payload = json!({ "tools": definitions });
                    println!("{}", serde_json::to_string_pretty(&payload)?);
                }
                OutputFormat::Markdown => {
                    println!("| Tool | Description |");
                    println!("| --- | --- |");
                    for entry in definitions {
                        println!("| `{}` | {} |", entry.name, sanitize(&entry.description));
                    }
                }
                OutputFormat::Table => {
                    let rows: Vec<Vec<String>> = definitions
                        .iter()
                        .map(|entry| {
                            vec![
                                entry.name.clone(),
                                truncate(&sanitize(&entry.description), 80),
                            ]
                        })
                        .collect();
                    render_table(&["Tool", "Description"], &rows);
                }
                OutputFormat::Text => {
                    for entry in definitions {
                        println!("• {} — {}", entry.name, entry.description);
                    }
                }
            }
            Ok(())
        }

        pub fn tool_response(&self, response: &ToolResponse) -> Result<()> {
            match self.format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(response)?);
                }
                OutputFormat::Markdown | OutputFormat::Text => {
                    for content in &response.content {
                        println!("{}", content.text.trim());
                        println!();
                    }
                    if let Some(metadata) = &response.metadata {
                        println!("```json");
                        println!("{}", serde_json::to_string_pretty(metadata)?);
                        println!("```");
                    }
                }
                OutputFormat::Table => {
                    let rows: Vec<Vec<String>> = response
                        .content
                        .iter()
                        .map(|content| {
                            vec![
                                content.r#type.clone(),
                                truncate(&sanitize(&content.text), 120),
                            ]
                        })
                        .collect();
                    render_table(&["Type", "Content"], &rows);
                    if let Some(metadata) = &response.metadata {
                        println!();
                        println!("Metadata: {}", serde_json::to_string_pretty(metadata)?);
                    }
                }
            }
            Ok(())
        }

        pub fn providers(&self, rows: &[ProviderRow]) -> Result<()> {
            match self.format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(rows)?);
                }
                OutputFormat::Markdown => {
                    println!("| Key | Name | Auth | Description |");
                    println!("| --- | --- | --- | --- |");
                    for row in rows {
                        println!(
                            "| `{}` | {} | {} | {} |",
                            row.key, row.name, row.auth, row.description
                        );
                    }
                }
                OutputFormat::Table => {
                    let table_rows: Vec<Vec<String>> = rows
                        .iter()
                        .map(|row| {
                            vec![
                                row.key.to_string(),
                                row.name.to_string(),
                                row.auth.to_string(),
                                truncate(row.description, 60),
                            ]
                        })
                        .collect();
                    render_table(&["Key", "Name", "Auth", "Description"], &table_rows);
                }
                OutputFormat::Text => {
                    for row in rows {
                        println!("• {} ({}) — {}", row.key, row.auth, row.description);
                    }
                }
            }
            Ok(())
        }

        pub fn telemetry(&self, entries: &[TelemetryEntry]) -> Result<()> {
            match self.format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(entries)?);
                }
                OutputFormat::Markdown => {
                    println!("| Timestamp | Tool | Latency (ms) | Success |");
                    println!("| --- | --- | ---: | --- |");
                    for entry in entries {
                        println!(
                            "| {} | `{}` | {} | {} |",
                            entry.timestamp, entry.tool, entry.latency_ms, entry.success
                        );
                    }
                }
                OutputFormat::Table => {
                    let rows: Vec<Vec<String>> = entries
                        .iter()
                        .map(|entry| {
                            vec![
                                entry.timestamp.to_string(),
                                entry.tool.clone(),
                                entry.latency_ms.to_string(),
                                entry.success.to_string(),
                            ]
                        })
                        .collect();
                    render_table(&["Timestamp", "Tool", "Latency (ms)", "Success"], &rows);
                }
                OutputFormat::Text => {
                    for entry in entries {
                        println!(
                            "[{}] {} — {} ms ({})",
                            entry.timestamp,
                            entry.tool,
                            entry.latency_ms,
                            if entry.success { "success" } else { "error" }
                        );
                        if let Some(error) = &entry.error {
                            println!("  error: {error}");
                        }
                    }
                }
            }
            Ok(())
        }

        pub fn store_status(&self, report: &crate::StoreStatusReport) -> Result<()> {
            match self.format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(report)?);
                }
                OutputFormat::Markdown => {
                    println!("| Property | Value |");
                    println!("| --- | --- |");
                    println!("| Path | `{}` |", report.path);
                    println!("| Exists | {} |", report.exists);
                    println!("| Readable | {} |", report.readable);
                    println!("| File Count | {} |", report.file_count);
                }
                OutputFormat::Table => {
                    let rows = vec![
                        vec!["Path".to_string(), report.path.clone()],
                        vec!["Exists".to_string(), report.exists.to_string()],
                        vec!["Readable".to_string(), report.readable.to_string()],
                        vec!["File Count".to_string(), report.file_count.to_string()],
                    ];
                    render_table(&["Property", "Value"], &rows);
                }
                OutputFormat::Text => {
                    println!("Store directory: {}", report.path);
                    println!("Exists: {}", report.exists);
                    println!("Readable: {}", report.readable);
                    println!("File count: {}", report.file_count);
                }
            }
            Ok(())
        }

        pub fn no_telemetry(&self) -> Result<()> {
            match self.format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&Vec::<TelemetryEntry>::new())?
                    );
                }
                OutputFormat::Markdown | OutputFormat::Text | OutputFormat::Table => {
                    println!("No telemetry entries recorded yet.");
                }
            }
            Ok(())
        }
    }

    fn render_table(headers: &[&str], rows: &[Vec<String>]) {
        let mut widths: Vec<usize> = headers.iter().map(|header| header.len()).collect();
        for row in rows {
            for (idx, cell) in row.iter().enumerate() {
                widths[idx] = widths[idx].max(cell.len());
            }
        }

        fn render_line(columns: &[&str], widths: &[usize]) -> String {
            let mut line = String::new();
            for (idx, value) in columns.iter().enumerate() {
                let width = widths[idx];
                let _ = write!(line, "| {:width$} ", value, width = width);
            }
            line.push('|');
            line
        }

        let header_line = render_line(headers, &widths);
        println!("{header_line}");
        let separator: String = widths
            .iter()
            .map(|width| format!("|{:-^1$}", "", width + 2))
            .collect::<Vec<_>>()
            .join("");
        println!("{separator}|");

        for row in rows {
            let cols: Vec<&str> = row.iter().map(String::as_str).collect();
            println!("{}", render_line(&cols, &widths));
        }
    }

    fn sanitize(value: &str) -> String {
        value
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn truncate(value: &str, max: usize) -> String {
        if value.len() <= max {
            value.to_string()
        } else {
            let mut truncated = value
                .chars()
                .take(max.saturating_sub(1))
                .collect::<String>();
            truncated.push('…');
            truncated
        }
    }
}

mod progress {
    use std::time::Duration;

    use indicatif::{ProgressBar, ProgressStyle};

    pub fn spinner(message_enabled: bool, message: impl Into<String>) -> Option<ProgressBar> {
        if !message_enabled {
            return None;
        }
        let progress = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        progress.set_style(style);
        progress.set_message(message.into());
        progress.enable_steady_tick(Duration::from_millis(80));
        Some(progress)
    }
}
