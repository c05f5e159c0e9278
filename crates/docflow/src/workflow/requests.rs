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

//! Request payloads accepted at the workflow boundary.
//!
//! Identifiers and dates arrive as strings (camelCase JSON) and are parsed by
//! the workflows, which report malformed ids as
//! [`InvalidReference`](crate::WorkflowError::InvalidReference) and malformed
//! dates or enums as [`Validation`](crate::WorkflowError::Validation).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssignmentRequest {
    pub document_id: String,
    /// `incoming` or `outgoing`.
    pub document_kind: String,
    pub executor_id: String,
    pub content: String,
    /// `YYYY-MM-DD`; blank or absent for no deadline.
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub co_executor_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssignmentRequest {
    pub id: String,
    pub executor_id: String,
    pub content: String,
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub co_executor_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionRequest {
    pub id: String,
    pub status: String,
    /// Replaces the stored report when present.
    #[serde(default)]
    pub report: Option<String>,
}

/// Filters for the assignment journal. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssignmentFilter {
    pub search: Option<String>,
    pub document_id: Option<String>,
    /// Matches the primary executor or any co-executor.
    pub executor_id: Option<String>,
    pub status: Option<String>,
    pub deadline_from: Option<String>,
    pub deadline_to: Option<String>,
    pub overdue_only: bool,
    pub show_finished: bool,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAcknowledgmentRequest {
    pub document_id: String,
    pub document_kind: String,
    pub content: String,
    pub recipient_ids: Vec<String>,
}

/// Dashboard parameters. `period` (`month`, `quarter`, `year`) takes
/// precedence over explicit dates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatsRequest {
    pub role: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub period: Option<String>,
}
