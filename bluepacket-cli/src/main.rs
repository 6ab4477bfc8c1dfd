//! bluepacket-cli - Command-line interface for the BluePacket calculator
//!
//! Sends calculator requests to a server, and encodes or decodes
//! calculator packets locally.

mod commands;

use bluepacket_calc::{CalcClient, CalcMeanType};
use bluepacket_client::ClientConfig;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bluepacket-cli")]
#[command(about = "Command-line interface for the BluePacket calculator service")]
#[command(version)]
struct Cli {
    /// Server host
    #[arg(long, default_value = "localhost", env = "BLUEPACKET_HOST")]
    host: String,

    /// Server port
    #[arg(short, long, env = "BLUEPACKET_PORT")]
    #[arg(default_value_t = bluepacket_protocol::DEFAULT_PORT)]
    port: u16,

    /// Response timeout in milliseconds
    #[arg(short, long, default_value_t = 1000)]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sum of the values
    Sum {
        #[arg(required = true, allow_negative_numbers = true)]
        values: Vec<f32>,
    },

    /// Mean of the values
    Mean {
        /// Kind of mean
        kind: MeanKind,

        #[arg(required = true, allow_negative_numbers = true)]
        values: Vec<f32>,
    },

    /// Decode a hex-encoded calculator packet and print it
    Decode {
        /// Envelope bytes as hex (hash then body)
        hex: String,
    },

    /// Encode a calculator request and print its envelope as hex
    Encode {
        #[command(subcommand)]
        packet: EncodeCommand,
    },
}

#[derive(Subcommand)]
enum EncodeCommand {
    /// A CalcSum request
    Sum {
        #[arg(allow_negative_numbers = true)]
        values: Vec<f32>,
    },

    /// A CalcMean request
    Mean {
        kind: MeanKind,

        #[arg(allow_negative_numbers = true)]
        values: Vec<f32>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MeanKind {
    Arithmetic,
    Geometric,
    Harmonic,
}

impl From<MeanKind> for CalcMeanType {
    fn from(kind: MeanKind) -> Self {
        match kind {
            MeanKind::Arithmetic => CalcMeanType::Arithmetic,
            MeanKind::Geometric => CalcMeanType::Geometric,
            MeanKind::Harmonic => CalcMeanType::Harmonic,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Decode { hex } => commands::decode(&hex),
        Commands::Encode { packet } => commands::encode(packet),
        command => {
            tracing::debug!(
                "Connecting to {}:{} (timeout {} ms)",
                cli.host,
                cli.port,
                cli.timeout_ms
            );
            let config = ClientConfig::new(cli.host, cli.port)
                .with_read_timeout(Duration::from_millis(cli.timeout_ms));
            let client = CalcClient::new(config)?;
            commands::execute(&client, command).await
        }
    };

    match result {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(e) => {
            eprintln!("{}: {}", "Error".red(), e);
            std::process::exit(1);
        }
    }
}
