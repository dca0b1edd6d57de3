// Operating system detection from free-text OS names

use serde::{Deserialize, Serialize};

/// Closed set of operating systems a target can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperatingSystem {
    Linux,
    Mac,
    Windows,
}

impl OperatingSystem {
    /// Normalize a free-text OS name into the closed set
    ///
    /// Total over every input: absent, empty, and unrecognized names all map
    /// to Linux, with an error logged since those are anomalous inputs.
    pub fn detect(name: Option<&str>) -> Self {
        let name = match name {
            Some(n) if !n.trim().is_empty() => n,
            _ => {
                log::error!("no operating system name supplied, assuming linux");
                return Self::Linux;
            }
        };

        let lower = name.to_lowercase();
        if lower.contains("win") {
            Self::Windows
        } else if lower.contains("mac") {
            Self::Mac
        } else if lower.contains("linux") {
            Self::Linux
        } else {
            log::error!("unrecognized operating system name {:?}, assuming linux", name);
            Self::Linux
        }
    }

    /// Operating system of the machine this process runs on
    pub fn host() -> Self {
        Self::detect(Some(std::env::consts::OS))
    }
}
