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

//! Errors raised while locating, parsing and validating `docflow.toml`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found in any search location")]
    ConfigNotFound,

    #[error("Failed to read configuration file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse TOML configuration: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("Environment variable substitution failed: {0}")]
    EnvSubstitutionError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ConfigValidationError),

    #[error("Unsupported configuration file format: {extension}")]
    UnsupportedFormat { extension: String },
}

/// Problems found in a parsed configuration. When several are found,
/// [`Validate`](super::Validate) reports them together as `Multiple`.
#[derive(Error, Debug)]
pub enum ConfigValidationError {
    #[error("Invalid database URL {url}: {reason}")]
    InvalidDatabaseUrl { url: String, reason: String },

    #[error("Invalid pool size: {size} (must be between 1 and 100)")]
    InvalidPoolSize { size: u32 },

    #[error("Invalid schema name: {0}")]
    InvalidSchema(String),

    #[error("Invalid log level: {level} (must be one of: error, warn, info, debug, trace)")]
    InvalidLogLevel { level: String },

    #[error("Invalid page size: {message}")]
    InvalidPageSize { message: String },

    #[error("Invalid expiry horizon for {role}: {days} (must be between 0 and 366 days)")]
    InvalidHorizon { role: &'static str, days: i64 },

    #[error("Multiple validation errors: {errors:?}")]
    Multiple { errors: Vec<ConfigValidationError> },
}
