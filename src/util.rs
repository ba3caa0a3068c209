// zipit: Timing Plots and Topology Diagrams of Simulated Zipper Traces
// Copyright (C) 2024-2025 Roland Schmid <roschmi@ethz.ch> and Tibor Schneider <sctibor@ethz.ch>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.
//! Utility module collection of functions

use std::{path::Path, sync::Once};

/// Logging configuration looked up in the working directory.
pub const LOG_CONFIG: &str = "log4rs.yml";

static INIT_LOGGING: Once = Once::new();

/// Sets up logging from [`LOG_CONFIG`] if present, and from `RUST_LOG` otherwise. Calling it more
/// than once is harmless.
pub fn init_logging() {
    INIT_LOGGING.call_once(|| {
        if Path::new(LOG_CONFIG).exists() {
            match log4rs::init_file(LOG_CONFIG, Default::default()) {
                Ok(()) => return,
                Err(e) => eprintln!("Could not set up logging from {LOG_CONFIG}: {e}"),
            }
        }
        if let Err(e) = pretty_env_logger::try_init() {
            eprintln!("Could not set up logging from RUST_LOG: {e}");
        }
    });
}
