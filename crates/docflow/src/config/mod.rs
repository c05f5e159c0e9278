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

//! TOML configuration for docflow: database connection, workflow tunables and
//! logging.
//!
//! ```toml
//! [database]
//! url = "${DOCFLOW_DATABASE_URL:-sqlite://docflow.db}"
//! pool_size = 1
//!
//! [workflow]
//! default_page_size = 20
//! max_page_size = 100
//!
//! [logging]
//! level = "info"
//! ```

pub mod error;
pub mod loader;
pub mod types;
pub mod validation;

pub use error::{ConfigError, ConfigValidationError};
pub use loader::ConfigLoader;
pub use types::{DatabaseConfig, DocflowConfig, LoggingConfig, WorkflowConfig};
pub use validation::Validate;
