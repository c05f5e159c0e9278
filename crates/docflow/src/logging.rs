/*
 *  Copyright 2025-2026 Colliery Software
 *
 *  Licensed under the Apache License, Version 2.0 (the "License");
 *  you may not use this file except in compliance with the License.
 *  You may obtain a copy of the License at
 *
 *      http://www.apache.org/licenses/LICENSE-2.0
 *
 *  Unless required by applicable law or agreed to in writing, software
 *  distributed under the License is distributed on an "AS IS" BASIS,
 *  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *  See the License for the specific language governing permissions and
 *  limitations under the License.
 */

//! Logging setup shared by the CLI and the integration tests.

use tracing::Subscriber;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Builds the formatted stderr subscriber without installing it.
///
/// The filter comes from `RUST_LOG` when set, otherwise from `level`, otherwise
/// `info`.
pub fn subscriber(level: Option<&str>) -> impl Subscriber + Send + Sync + 'static {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.unwrap_or("info")));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
}

/// Installs [`subscriber`] as the global default.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_logging(level: Option<&str>) {
    let _ = subscriber(level).try_init();
}

/// Log levels accepted by `logging.level` in the configuration file.
pub const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Returns true if `level` is one of [`LOG_LEVELS`] (case-insensitive).
pub fn is_valid_level(level: &str) -> bool {
    LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str())
}
