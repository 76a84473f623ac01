// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Logger bootstrap for binaries embedding the compositing core.

use env_logger::{Builder, Env};

/// Initialises `env_logger`, honouring `RUST_LOG` and falling back to `default_filter`.
///
/// Calling it more than once is harmless; only the first call installs the logger.
pub fn init_logging(default_filter: &str) {
    if Builder::from_env(Env::default().default_filter_or(default_filter))
        .try_init()
        .is_err()
    {
        log::debug!("Logger already initialised.");
    }
}
