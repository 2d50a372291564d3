// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction. Parses arguments with
// clap and hands the work to Layer 2 (application).
//
// Commands:
//   1. `reconstruct` — load a checkpoint, reconstruct one image
//   2. `devices`     — list the accelerators wgpu can see
//   3. `init`        — write a fresh checkpoint to evaluate
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, InitArgs, ReconstructArgs};

use crate::domain::{device::HOST_DEVICE_NAME, traits::DeviceOracle};
use crate::infra::device_oracle::WgpuOracle;

#[derive(Parser, Debug)]
#[command(
    name = "mnist-recon-eval",
    version = "0.1.0",
    about = "Evaluate an MNIST autoencoder checkpoint on single-image reconstruction."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Reconstruct(args) => run_reconstruct(args),
            Commands::Devices           => run_devices(),
            Commands::Init(args)        => run_init(args),
        }
    }
}

fn run_reconstruct(args: ReconstructArgs) -> Result<()> {
    use crate::application::evaluate_use_case::EvaluateUseCase;

    tracing::info!("Reconstructing '{}' with '{}'", args.image, args.checkpoint);

    let report = EvaluateUseCase::new((&args).into()).execute()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("\nDevice:  {}", report.device);
        println!("Loss:    {:.6}", report.loss);
        println!("Time:    {:.3} ms", report.elapsed_ms);
        if let Some(path) = &report.output_path {
            println!("Output:  {}", path);
        }
    }
    Ok(())
}

fn run_devices() -> Result<()> {
    let oracle = WgpuOracle::detect();
    if !oracle.is_available() {
        println!("{}", HOST_DEVICE_NAME);
        return Ok(());
    }
    for index in 0..oracle.device_count() {
        let name = oracle.device_name(index).unwrap_or_default();
        println!("[{index}]: {name}");
    }
    Ok(())
}

fn run_init(args: InitArgs) -> Result<()> {
    use crate::application::init_use_case::InitUseCase;

    let path = InitUseCase::new(args.into()).execute()?;
    println!("Checkpoint written to {}", path.display());
    Ok(())
}
