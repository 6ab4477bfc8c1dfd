//! Command execution.

use crate::{Commands, EncodeCommand};
use bluepacket_calc::{packets, CalcClient, CalcMean, CalcSum};
use bluepacket_protocol::{envelope, Packet};
use colored::Colorize;

/// Executes a server command and returns the formatted output.
pub async fn execute(
    client: &CalcClient,
    cmd: Commands,
) -> Result<String, Box<dyn std::error::Error>> {
    match cmd {
        Commands::Sum { values } => {
            tracing::debug!("Requesting sum of {} values", values.len());
            let value = client.sum(&values).await?;
            Ok(value.to_string().green().to_string())
        }

        Commands::Mean { kind, values } => {
            tracing::debug!("Requesting {:?} mean of {} values", kind, values.len());
            let value = client.mean(kind.into(), &values).await?;
            Ok(value.to_string().green().to_string())
        }

        Commands::Decode { .. } | Commands::Encode { .. } => unreachable!(),
    }
}

/// Decodes an envelope given as hex and renders the packet.
pub fn decode(input: &str) -> Result<String, Box<dyn std::error::Error>> {
    let bytes = hex::decode(input.trim())?;
    tracing::debug!("Decoding {} bytes", bytes.len());
    let registry = packets::registry()?;
    match envelope::deserialize(&registry, &bytes)? {
        Some(packet) => {
            tracing::debug!("Decoded {} ({})", packet.packet_name(), packet.hash_hex());
            Ok(packet.to_string())
        }
        None => Ok("null packet".yellow().to_string()),
    }
}

/// Encodes a request and returns its envelope as hex.
pub fn encode(cmd: EncodeCommand) -> Result<String, Box<dyn std::error::Error>> {
    let packet: Box<dyn Packet> = match cmd {
        EncodeCommand::Sum { values } => Box::new(CalcSum::new(values)),
        EncodeCommand::Mean { kind, values } => Box::new(CalcMean::new(kind.into(), values)),
    };
    let bytes = envelope::serialize(packet.as_ref())?;
    tracing::debug!("Encoded {} into {} bytes", packet.packet_name(), bytes.len());
    Ok(hex::encode(bytes))
}
