//! `lacre` - process-package label station
//!
//! One-shot operator commands over the station library:
//!
//! ```bash
//! # Generate five labels and print the ids
//! lacre generate 9001941457766 --quantity 5
//!
//! # Generate, write the ZPL artifact next to the shell
//! lacre generate 9001941457766 -q 5 --download
//!
//! # Reprint labels pasted on stdin through the configured printer
//! cat ids.txt | lacre reprint --print
//! ```

use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use lacre_station::{
    Config, LabelTemplate, Notification, NotificationSink, PrintOrchestrator, Severity, Station,
};

#[derive(Parser)]
#[command(name = "lacre")]
#[command(about = "Process-package label station for Zebra-compatible printers")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate sequential labels for a package
    Generate {
        /// Package id printed on every label
        package_id: String,

        /// Number of labels to generate
        #[arg(short, long, default_value_t = 1)]
        quantity: i64,

        #[command(flatten)]
        delivery: Delivery,
    },

    /// Prepare pasted label ids for reprint, one per line
    Reprint {
        /// File with one label id per line, `-` for stdin
        #[arg(default_value = "-")]
        input: String,

        #[command(flatten)]
        delivery: Delivery,
    },
}

#[derive(Args)]
struct Delivery {
    /// Connect the configured transport and print the batch
    #[arg(long)]
    print: bool,

    /// Write the batch to a print-ready file
    #[arg(long)]
    download: bool,
}

/// Prints notifications the way the station UI shows toasts
struct ConsoleSink;

impl NotificationSink for ConsoleSink {
    fn publish(&self, notification: Notification) {
        let prefix = match notification.severity {
            Severity::Info => "info",
            Severity::Success => "ok",
            Severity::Warning => "warn",
            Severity::Error => "error",
        };
        eprintln!("[{}] {}", prefix, notification.message);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "lacre=warn".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    match cli.command {
        Command::Generate {
            package_id,
            quantity,
            delivery,
        } => {
            // Labels on the generation page use the process layout
            let mut station = build_station(&config, LabelTemplate::Process)?;

            if let Some(delay) = config.feedback_delay() {
                tokio::time::sleep(delay).await;
            }
            if !station.generate(&package_id, quantity) {
                std::process::exit(1);
            }

            for label in station.batch().labels() {
                println!("{}", label);
            }
            deliver(&mut station, &config, &delivery).await;
        }

        Command::Reprint { input, delivery } => {
            let raw_text = read_input(&input).await?;

            // Reprinted labels use the mailer layout
            let mut station = build_station(&config, LabelTemplate::Mailer)?;
            if !station.prepare_reprint(&raw_text) {
                std::process::exit(1);
            }

            for label in station.batch().labels() {
                println!("{}", label);
            }
            deliver(&mut station, &config, &delivery).await;
        }
    }

    Ok(())
}

fn build_station(config: &Config, template: LabelTemplate) -> anyhow::Result<Station> {
    let transport = config
        .build_transport()
        .context("failed to build the configured transport")?;
    let orchestrator = PrintOrchestrator::new(transport, template);
    Ok(Station::new(
        orchestrator,
        Arc::new(ConsoleSink),
        config.max_labels,
    ))
}

async fn read_input(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        std::io::read_to_string(std::io::stdin()).context("failed to read stdin")
    } else {
        tokio::fs::read_to_string(input)
            .await
            .with_context(|| format!("failed to read {}", input))
    }
}

async fn deliver(station: &mut Station, config: &Config, delivery: &Delivery) {
    if delivery.download && station.download(&config.download_dir).await.is_none() {
        std::process::exit(1);
    }

    if delivery.print {
        if !station.connect().await {
            std::process::exit(1);
        }
        if !station.print_all().await {
            std::process::exit(1);
        }
    }
}
