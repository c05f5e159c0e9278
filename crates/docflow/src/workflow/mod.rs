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

//! The workflow engine: role-gated operations over assignments,
//! acknowledgments and the dashboard.
//!
//! Every operation takes the calling [`Actor`](crate::Actor) explicitly
//! (`None` means unauthenticated), validates its string-typed request, checks
//! the [`policy`](crate::policy) tables and only then touches storage.

pub mod acknowledgment;
pub mod assignment;
pub mod audit;
pub mod dashboard;
pub mod requests;

pub use acknowledgment::AcknowledgmentWorkflow;
pub use assignment::AssignmentWorkflow;
pub use dashboard::DashboardService;
pub use requests::{
    AssignmentFilter, CreateAcknowledgmentRequest, CreateAssignmentRequest, StatsRequest,
    TransitionRequest, UpdateAssignmentRequest,
};

use chrono::NaiveDate;

use crate::database::UniversalUuid;
use crate::error::WorkflowError;
use crate::models::{AssignmentStatus, DocumentKind, DocumentRef};

/// Treats blank strings as absent.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Parses an identifier supplied by a caller.
pub(crate) fn parse_id(what: &str, value: &str) -> Result<UniversalUuid, WorkflowError> {
    UniversalUuid::parse(value.trim())
        .map_err(|_| WorkflowError::InvalidReference(format!("malformed {} id '{}'", what, value)))
}

/// Parses an optional `YYYY-MM-DD` date; blank means absent.
pub(crate) fn parse_date(what: &str, value: Option<&str>) -> Result<Option<NaiveDate>, WorkflowError> {
    non_blank(value)
        .map(|s| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
                WorkflowError::Validation(format!("{} '{}' is not a YYYY-MM-DD date", what, s))
            })
        })
        .transpose()
}

pub(crate) fn parse_status(value: &str) -> Result<AssignmentStatus, WorkflowError> {
    AssignmentStatus::from_str(value.trim())
        .ok_or_else(|| WorkflowError::Validation(format!("unknown assignment status '{}'", value)))
}

pub(crate) fn parse_document(id: &str, kind: &str) -> Result<DocumentRef, WorkflowError> {
    let id = parse_id("document", id)?;
    let kind = DocumentKind::from_str(kind.trim())
        .ok_or_else(|| WorkflowError::Validation(format!("unknown document kind '{}'", kind)))?;
    Ok(DocumentRef { id, kind })
}
