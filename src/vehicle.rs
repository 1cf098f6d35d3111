//! Supported vehicle identities and their source-tree directory names.

use clap::ValueEnum;
use std::fmt;
use std::path::{Path, PathBuf};

/// The six supported vehicle types. Anything else is rejected by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "PascalCase")]
pub enum Vehicle {
    Copter,
    Plane,
    Rover,
    Sub,
    Tracker,
    Blimp,
}

impl Vehicle {
    /// Directory under the source root holding this vehicle's code,
    /// including its `Log.cpp` aggregation file.
    pub fn code_dirname(self) -> &'static str {
        match self {
            Vehicle::Copter => "ArduCopter",
            Vehicle::Plane => "ArduPlane",
            Vehicle::Rover => "Rover",
            Vehicle::Sub => "ArduSub",
            Vehicle::Tracker => "AntennaTracker",
            Vehicle::Blimp => "Blimp",
        }
    }

    pub fn code_dirpath(self, rootdir: &Path) -> PathBuf {
        rootdir.join(self.code_dirname())
    }
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Vehicle::Copter => "Copter",
            Vehicle::Plane => "Plane",
            Vehicle::Rover => "Rover",
            Vehicle::Sub => "Sub",
            Vehicle::Tracker => "Tracker",
            Vehicle::Blimp => "Blimp",
        };
        f.write_str(name)
    }
}
