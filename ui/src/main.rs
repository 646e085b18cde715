use anyhow::{Context, Result, anyhow};
use clap::Parser;
use community_settings::app::session::SettingsSession;
use community_settings::components::community::{ConfigDocument, Field, RegionStatus};
use community_settings::config;
use community_settings::logger;
use server::community::CommunityClient;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "community-settings")]
#[command(about = "Edit and test community connection settings")]
struct Cli {
    /// Settings document (JSON). An empty document is used when omitted.
    document: Option<PathBuf>,

    /// Configuration file. Defaults to ./config.toml when present.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host name, as typed into the form
    #[arg(long)]
    host: Option<String>,

    /// Port, as typed into the form. Non-numeric input becomes 0.
    #[arg(long)]
    port: Option<String>,

    /// Protocol, HTTP or HTTPS
    #[arg(long)]
    protocol: Option<String>,

    /// Login method
    #[arg(long)]
    method: Option<String>,

    /// Test the connection against the community service
    #[arg(short, long)]
    test: bool,

    /// Seconds to wait for the connection test and method list
    #[arg(long, default_value_t = 60)]
    wait_secs: u64,

    /// Write the resulting document here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl Cli {
    fn edits(&self) -> Vec<(Field, &str)> {
        [
            (Field::Host, self.host.as_deref()),
            (Field::Port, self.port.as_deref()),
            (Field::Protocol, self.protocol.as_deref()),
            (Field::Method, self.method.as_deref()),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|v| (field, v)))
        .collect()
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let app_config = config::load_config(cli.config.as_deref())
        .into_result()
        .map_err(|e| anyhow!(e))?;

    if let Err(e) = logger::setup_logger(app_config.logging()) {
        eprintln!("Warning: Failed to initialize logger: {e}");
    }

    let document = match &cli.document {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            ConfigDocument::from_json(&json)
                .with_context(|| format!("Invalid settings document {}", path.display()))?
        }
        None => ConfigDocument::default(),
    };

    let client = CommunityClient::new(app_config.community().client_config())?;
    let mut session = SettingsSession::new(Arc::new(client), &app_config);
    session.load(document);

    for (field, value) in cli.edits() {
        session.input(field, value);
    }

    if cli.test {
        session.test_connection();
        session.run_until_idle(Duration::from_secs(cli.wait_secs))?;
    }

    let widget = session.widget();
    println!("{}", widget.surface());
    for warning in session.warnings() {
        eprintln!("Warning: {warning}");
    }
    for error in session.errors() {
        eprintln!("{error}");
    }

    let json = serde_json::to_string_pretty(&widget.get_config().to_json_value())?;
    match &cli.output {
        Some(path) => std::fs::write(path, json + "\n")
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{json}"),
    }

    if cli.test && widget.region_status() == RegionStatus::Error {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
