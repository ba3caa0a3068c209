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
//! Test cases running the whole pipeline on a small trace of a source feeding a zipit feeding a
//! sink.
//!
//! ```shell
//! cargo test -- --nocapture
//! ```

use std::path::PathBuf;

use crate::trace::Trace;


/// Loads the trace stored next to this module.
pub fn fixture() -> Trace {
    // tests log to the console only, never to the files configured in log4rs.yml
    let _ = pretty_env_logger::try_init();
    let path: PathBuf = [env!("CARGO_MANIFEST_DIR"), "src", "test", "simzip_trace.json"]
        .iter()
        .collect();
    Trace::load(path).expect("the fixture should load")
}

/// Fresh scratch directory for a test.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("zipit-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).expect("temp dir should be writable");
    dir
}
