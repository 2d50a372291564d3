use serde::{Deserialize, Serialize};

/// Summary of one reconstruction, printed by the CLI or emitted as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconstructionReport {
    pub device:      String,
    pub checkpoint:  String,
    pub image:       String,
    pub loss:        f64,
    pub elapsed_ms:  f64,
    /// Where the reconstructed image was written, if anywhere
    pub output_path: Option<String>,
}
