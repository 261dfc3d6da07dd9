use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct OutputConfig {
    /// Show timestamps next to every section and line.
    pub time_detail: bool,
    /// Also write the report to `<video_id>_<timestamp>.txt`.
    pub file_output: bool,
    pub directory: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            time_detail: false,
            file_output: true,
            directory: PathBuf::from("."),
        }
    }
}
