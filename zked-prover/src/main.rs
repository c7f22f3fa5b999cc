use std::{fs, path::Path, path::PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use sha2::{Digest, Sha512};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use zked_circuit::{
    bytes_to_bits, Eddsa25519Assignment, Eddsa25519Circuit, Sha512Assignment, Sha512Circuit,
};
use zked_prover::{prove_bundle, CircuitShape, MockProofSystem, ProofSystem};

/// Message of the built-in Ed25519 test vector.
const VECTOR_MESSAGE: &str = "53756363696e6374204c616273";

#[derive(Parser)]
#[command(about = "Synthesize and check the SHA-512 and Ed25519 circuits")]
struct Cli {
    /// Write the proof bundle (or the shapes, for `stats`) as JSON.
    #[arg(long, global = true)]
    output: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Prove knowledge of a message with a given SHA-512 digest.
    Sha512 {
        #[arg(long)]
        message_hex: String,
        /// Expected digest; computed natively when omitted.
        #[arg(long)]
        digest_hex: Option<String>,
    },
    /// Prove that a signature verifies under a public key.
    Eddsa {
        #[arg(long)]
        message_hex: String,
        #[arg(long)]
        public_key_hex: String,
        #[arg(long)]
        signature_hex: String,
    },
    /// Print constraint counts for the built-in test vector.
    Stats,
}

#[derive(Serialize)]
struct Stats {
    sha512: CircuitShape,
    eddsa25519: CircuitShape,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "zked_prover=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    match &cli.command {
        Command::Sha512 {
            message_hex,
            digest_hex,
        } => {
            let assignment =
                Sha512Assignment::from_hex(message_hex).context("failed to decode message")?;
            let digest = match digest_hex {
                Some(hex) => hex::decode(hex.trim()).context("failed to decode digest")?,
                None => Sha512::digest(hex::decode(message_hex.trim())?).to_vec(),
            };
            if digest.len() != 64 {
                bail!("digest must be 64 bytes, got {}", digest.len());
            }
            let digest_bits = bytes_to_bits(&digest);

            let circuit = Sha512Circuit::for_assignment(&assignment);
            info!(message_bits = circuit.message_bits, "proving sha512 preimage");
            let bundle = prove_bundle("sha512", &circuit, &assignment, digest_bits.as_slice())
                .context("sha512 proof failed")?;
            info!(public_inputs = bundle.proof.public_inputs.len(), "proof verified");
            write_json(cli.output.as_deref(), &bundle)?;
        }
        Command::Eddsa {
            message_hex,
            public_key_hex,
            signature_hex,
        } => {
            let assignment =
                Eddsa25519Assignment::from_hex(message_hex, public_key_hex, signature_hex)
                    .context("failed to decode eddsa inputs")?;
            let instance = assignment.instance();

            let circuit = Eddsa25519Circuit::for_assignment(&assignment);
            info!(message_bits = circuit.message_bits, "proving ed25519 signature");
            let bundle = prove_bundle("eddsa25519", &circuit, &assignment, &instance)
                .context("eddsa proof failed")?;
            info!(public_inputs = bundle.proof.public_inputs.len(), "proof verified");
            write_json(cli.output.as_deref(), &bundle)?;
        }
        Command::Stats => {
            let message_bits = VECTOR_MESSAGE.len() * 4;
            let (sha512, _) = MockProofSystem.setup(&Sha512Circuit { message_bits })?;
            let (eddsa, _) = MockProofSystem.setup(&Eddsa25519Circuit { message_bits })?;
            let stats = Stats {
                sha512: sha512.shape,
                eddsa25519: eddsa.shape,
            };
            for (name, shape) in [("sha512", &stats.sha512), ("eddsa25519", &stats.eddsa25519)] {
                println!(
                    "{name}: {} constraints ({} mul, {} linear), {} wires, {} public inputs",
                    shape.total_constraints(),
                    shape.num_mul,
                    shape.num_linear,
                    shape.num_wires,
                    shape.num_public_inputs
                );
            }
            write_json(cli.output.as_deref(), &stats)?;
        }
    }

    Ok(())
}

fn write_json<T: Serialize>(path: Option<&Path>, value: &T) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let json = serde_json::to_vec_pretty(value).context("failed to serialize output")?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}
