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

//! Error types for the storage layer and the workflow engine.
//!
//! [`StoreError`] is what the DAL returns. [`WorkflowError`] is the taxonomy the
//! workflows expose to callers; storage faults are wrapped in
//! [`WorkflowError::Storage`] together with the name of the failed operation,
//! and the displayed message never echoes query text.

use thiserror::Error;

/// Errors raised by the data access layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A pooled connection could not be obtained, or the blocking task running
    /// the query was lost.
    #[error("Connection pool error: {0}")]
    ConnectionPool(String),

    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),

    /// A stored value could not be mapped back to its domain type.
    #[error("Corrupt stored value in {field}: '{value}'")]
    CorruptValue { field: &'static str, value: String },

    #[error("Migration failed: {0}")]
    Migration(String),
}

/// Errors surfaced by the assignment, acknowledgment and dashboard workflows.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("authentication required")]
    Unauthenticated,

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("{0} not found")]
    NotFound(String),

    /// A malformed identifier or a reference to a record that does not exist.
    #[error("invalid reference: {0}")]
    InvalidReference(String),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("no valid recipients selected")]
    EmptyRecipients,

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("storage failure during {operation}")]
    Storage {
        operation: &'static str,
        #[source]
        source: StoreError,
    },
}

impl WorkflowError {
    /// Wraps a storage fault with the name of the operation that hit it.
    pub fn storage(operation: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| WorkflowError::Storage { operation, source }
    }
}
