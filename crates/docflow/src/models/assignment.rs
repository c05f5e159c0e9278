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

//! Assignment domain model: statuses, the completion timestamp rule and the
//! deadline lateness predicates.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::database::{UniversalTimestamp, UniversalUuid};

/// Which register a document belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Incoming,
    Outgoing,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Incoming => "incoming",
            DocumentKind::Outgoing => "outgoing",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "incoming" => Some(DocumentKind::Incoming),
            "outgoing" => Some(DocumentKind::Outgoing),
            _ => None,
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reference to a registered document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRef {
    pub id: UniversalUuid,
    pub kind: DocumentKind,
}

/// Lifecycle status of an assignment.
///
/// `new → in_progress → completed → finished`, with `returned` and `cancelled`
/// reachable from intermediate states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    New,
    InProgress,
    Completed,
    Finished,
    Returned,
    Cancelled,
}

impl AssignmentStatus {
    pub const ALL: [AssignmentStatus; 6] = [
        AssignmentStatus::New,
        AssignmentStatus::InProgress,
        AssignmentStatus::Completed,
        AssignmentStatus::Finished,
        AssignmentStatus::Returned,
        AssignmentStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentStatus::New => "new",
            AssignmentStatus::InProgress => "in_progress",
            AssignmentStatus::Completed => "completed",
            AssignmentStatus::Finished => "finished",
            AssignmentStatus::Returned => "returned",
            AssignmentStatus::Cancelled => "cancelled",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "new" => Some(AssignmentStatus::New),
            "in_progress" => Some(AssignmentStatus::InProgress),
            "completed" => Some(AssignmentStatus::Completed),
            "finished" => Some(AssignmentStatus::Finished),
            "returned" => Some(AssignmentStatus::Returned),
            "cancelled" => Some(AssignmentStatus::Cancelled),
            _ => None,
        }
    }

    /// Work still owed by the executor.
    pub fn is_active(&self) -> bool {
        matches!(self, AssignmentStatus::New | AssignmentStatus::InProgress)
    }

    /// The completion timestamp an assignment carries after moving into `self`.
    ///
    /// Entering `completed` stamps `now`; entering `finished` keeps whatever was
    /// recorded when the executor completed it; every other target clears it.
    pub fn completed_at_after_transition(
        &self,
        existing: Option<UniversalTimestamp>,
        now: UniversalTimestamp,
    ) -> Option<UniversalTimestamp> {
        match self {
            AssignmentStatus::Completed => Some(now),
            AssignmentStatus::Finished => existing,
            AssignmentStatus::New
            | AssignmentStatus::InProgress
            | AssignmentStatus::Returned
            | AssignmentStatus::Cancelled => None,
        }
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A co-executor listed on an assignment. Informational only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoExecutor {
    pub user_id: UniversalUuid,
    pub full_name: Option<String>,
}

/// A work item delegated to a member of staff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: UniversalUuid,
    pub document: DocumentRef,
    pub document_number: Option<String>,
    pub document_subject: Option<String>,
    pub executor_id: UniversalUuid,
    pub executor_name: Option<String>,
    pub co_executors: Vec<CoExecutor>,
    pub content: String,
    pub deadline: Option<NaiveDate>,
    pub status: AssignmentStatus,
    pub report: Option<String>,
    pub completed_at: Option<UniversalTimestamp>,
    pub created_at: UniversalTimestamp,
    pub updated_at: UniversalTimestamp,
}

impl Assignment {
    /// True if `user_id` is the executor or one of the co-executors.
    pub fn involves(&self, user_id: UniversalUuid) -> bool {
        self.executor_id == user_id || self.co_executors.iter().any(|c| c.user_id == user_id)
    }

    /// Completion instant used by the clerk's reporting window: the recorded
    /// completion, or the last update when none was recorded.
    pub fn effective_completion(&self) -> UniversalTimestamp {
        self.completed_at.unwrap_or(self.updated_at)
    }

    /// Whether the assignment counts as overdue on `today`.
    ///
    /// Active work is overdue once its deadline is strictly before today.
    /// Completed work is overdue (late) when the calendar date of its
    /// completion is strictly after the deadline. No deadline, never overdue.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        let Some(deadline) = self.deadline else {
            return false;
        };
        match self.status {
            AssignmentStatus::New | AssignmentStatus::InProgress => deadline < today,
            AssignmentStatus::Completed => self
                .completed_at
                .map(|at| at.date() > deadline)
                .unwrap_or(false),
            _ => false,
        }
    }

    /// Whether a finished assignment was completed after its deadline.
    /// Without a recorded completion it is never late.
    pub fn is_finished_late(&self) -> bool {
        match (self.status, self.deadline, self.completed_at) {
            (AssignmentStatus::Finished, Some(deadline), Some(completed)) => {
                completed.date() > deadline
            }
            _ => false,
        }
    }
}

/// Validated input for creating an assignment.
#[derive(Debug, Clone)]
pub struct NewAssignment {
    pub document: DocumentRef,
    pub executor_id: UniversalUuid,
    pub content: String,
    pub deadline: Option<NaiveDate>,
    pub co_executor_ids: Vec<UniversalUuid>,
}

/// Validated replacement for an assignment's mutable fields.
#[derive(Debug, Clone)]
pub struct AssignmentUpdate {
    pub executor_id: UniversalUuid,
    pub content: String,
    pub deadline: Option<NaiveDate>,
    pub co_executor_ids: Vec<UniversalUuid>,
}

/// A resolved list query. Page numbers are 1-based.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentQuery {
    pub search: Option<String>,
    pub document_id: Option<UniversalUuid>,
    pub executor_id: Option<UniversalUuid>,
    pub status: Option<AssignmentStatus>,
    pub deadline_from: Option<NaiveDate>,
    pub deadline_to: Option<NaiveDate>,
    pub overdue_only: bool,
    pub show_finished: bool,
    pub page: i64,
    pub page_size: i64,
}

impl Default for AssignmentQuery {
    fn default() -> Self {
        Self {
            search: None,
            document_id: None,
            executor_id: None,
            status: None,
            deadline_from: None,
            deadline_to: None,
            overdue_only: false,
            show_finished: false,
            page: 1,
            page_size: 20,
        }
    }
}

impl AssignmentQuery {
    /// Rows to skip; saturates so an absurd page number yields an empty page.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    /// Finished work is hidden unless asked for, so an explicit `finished`
    /// status filter without `show_finished` can never match.
    pub fn is_trivially_empty(&self) -> bool {
        !self.show_finished && self.status == Some(AssignmentStatus::Finished)
    }
}

/// One page of results plus the total number of matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: i64,
    pub page: i64,
    pub page_size: i64,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> i64 {
        if self.page_size <= 0 {
            return 0;
        }
        (self.total_count + self.page_size - 1) / self.page_size
    }
}
