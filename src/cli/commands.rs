// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the three subcommands: `reconstruct`, `devices` and
// `init`, and all their configurable flags.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};
use crate::application::{evaluate_use_case::EvaluateConfig, init_use_case::InitConfig};

/// The top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Reconstruct one image with a trained checkpoint
    Reconstruct(ReconstructArgs),

    /// List the accelerators this machine exposes
    Devices,

    /// Write a freshly initialised checkpoint
    Init(InitArgs),
}

/// All arguments for the `reconstruct` command.
#[derive(Args, Debug)]
pub struct ReconstructArgs {
    /// Checkpoint file: model.mpk, or a PyTorch .pt/.pth whose
    /// "model_state_dict" entry holds the parameters
    #[arg(long)]
    pub checkpoint: String,

    /// Model architecture JSON (default: model_config.json next to the checkpoint)
    #[arg(long)]
    pub model_config: Option<String>,

    /// Image to reconstruct: a .json ImageSample or an MNIST IDX image file
    #[arg(long)]
    pub image: String,

    /// Which image of an IDX file to use
    #[arg(long, default_value_t = 0)]
    pub index: usize,

    /// Accelerator index; -1 runs on the CPU
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    pub device: i64,

    /// Write the reconstructed image to this JSON file
    #[arg(long)]
    pub output: Option<String>,

    /// Print the report as JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// Convert CLI ReconstructArgs into the application-layer EvaluateConfig.
impl From<&ReconstructArgs> for EvaluateConfig {
    fn from(a: &ReconstructArgs) -> Self {
        EvaluateConfig {
            checkpoint:   a.checkpoint.clone(),
            model_config: a.model_config.clone(),
            image:        a.image.clone(),
            index:        a.index,
            device:       a.device,
            output:       a.output.clone(),
        }
    }
}

/// All arguments for the `init` command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to write model.mpk and model_config.json into
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Image channels
    #[arg(long, default_value_t = 1)]
    pub channels: usize,

    /// Image height in pixels
    #[arg(long, default_value_t = 28)]
    pub height: usize,

    /// Image width in pixels
    #[arg(long, default_value_t = 28)]
    pub width: usize,

    /// Width of the hidden layers
    #[arg(long, default_value_t = 128)]
    pub hidden: usize,

    /// Size of the latent code
    #[arg(long, default_value_t = 32)]
    pub latent: usize,

    /// Dropout probability (inactive during evaluation)
    #[arg(long, default_value_t = 0.2)]
    pub dropout: f64,
}

impl From<InitArgs> for InitConfig {
    fn from(a: InitArgs) -> Self {
        InitConfig {
            checkpoint_dir: a.checkpoint_dir,
            channels:       a.channels,
            height:         a.height,
            width:          a.width,
            hidden:         a.hidden,
            latent:         a.latent,
            dropout:        a.dropout,
        }
    }
}
