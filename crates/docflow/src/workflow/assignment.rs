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

//! The assignment lifecycle: creation, detail edits, role-gated status
//! transitions, queries and deletion.

use std::collections::BTreeSet;

use tracing::{debug, Instrument};

use super::requests::{
    AssignmentFilter, CreateAssignmentRequest, TransitionRequest, UpdateAssignmentRequest,
};
use super::{audit, non_blank, parse_date, parse_document, parse_id, parse_status};
use crate::config::WorkflowConfig;
use crate::dal::DAL;
use crate::database::universal_types::today;
use crate::database::{UniversalTimestamp, UniversalUuid};
use crate::error::WorkflowError;
use crate::identity::Actor;
use crate::models::{
    Assignment, AssignmentQuery, AssignmentStatus, AssignmentUpdate, DocumentRef, NewAssignment,
    Page,
};
use crate::policy::{self, Operation};

/// Entry point for every assignment operation.
#[derive(Clone)]
pub struct AssignmentWorkflow {
    dal: DAL,
    config: WorkflowConfig,
}

impl AssignmentWorkflow {
    pub fn new(dal: DAL, config: WorkflowConfig) -> Self {
        Self { dal, config }
    }

    /// Creates an assignment in status `new`.
    ///
    /// Any authenticated actor may create. The document, the executor and
    /// every co-executor must exist.
    pub async fn create(
        &self,
        actor: Option<&Actor>,
        request: CreateAssignmentRequest,
    ) -> Result<Assignment, WorkflowError> {
        let actor = policy::authorize(actor, Operation::CreateAssignment)?;
        let document = parse_document(&request.document_id, &request.document_kind)?;
        let executor_id = parse_id("executor", &request.executor_id)?;
        let deadline = parse_date("deadline", request.deadline.as_deref())?;
        let co_executor_ids = parse_co_executors(&request.co_executor_ids)?;

        let span = tracing::info_span!(
            "assignment.create",
            actor_id = %actor.user_id,
            document_id = %document.id,
        );
        async {
            self.ensure_document_exists(document).await?;
            self.ensure_users_exist(executor_id, &co_executor_ids).await?;

            let assignment = self
                .dal
                .assignment()
                .create(NewAssignment {
                    document,
                    executor_id,
                    content: request.content,
                    deadline,
                    co_executor_ids,
                })
                .await
                .map_err(WorkflowError::storage("assignment.create"))?;

            audit::log_assignment_created(actor.user_id, assignment.id, executor_id);
            Ok::<_, WorkflowError>(assignment)
        }
        .instrument(span)
        .await
    }

    /// Replaces executor, content, deadline and co-executors.
    ///
    /// Requires `admin` or `clerk`; a `finished` assignment can only be edited
    /// by an admin.
    pub async fn update_details(
        &self,
        actor: Option<&Actor>,
        request: UpdateAssignmentRequest,
    ) -> Result<Assignment, WorkflowError> {
        let actor = policy::authorize(actor, Operation::UpdateAssignment)?;
        let id = parse_id("assignment", &request.id)?;

        let span = tracing::info_span!("assignment.update", actor_id = %actor.user_id, assignment_id = %id);
        async {
            let existing = self.load(id, "assignment.update").await?;
            if existing.status == AssignmentStatus::Finished
                && !policy::permits(actor, Operation::ModifyFinishedAssignment)
            {
                return Err(WorkflowError::InvalidState(
                    "finished assignments can only be edited by an administrator".to_string(),
                ));
            }

            let executor_id = parse_id("executor", &request.executor_id)?;
            let deadline = parse_date("deadline", request.deadline.as_deref())?;
            let co_executor_ids = parse_co_executors(&request.co_executor_ids)?;
            self.ensure_users_exist(executor_id, &co_executor_ids).await?;

            let found = self
                .dal
                .assignment()
                .update_details(
                    id,
                    AssignmentUpdate {
                        executor_id,
                        content: request.content,
                        deadline,
                        co_executor_ids,
                    },
                )
                .await
                .map_err(WorkflowError::storage("assignment.update"))?;
            if !found {
                return Err(not_found(id));
            }

            audit::log_assignment_updated(actor.user_id, id);
            self.load(id, "assignment.update").await
        }
        .instrument(span)
        .await
    }

    /// Moves an assignment to a new status.
    ///
    /// Permission comes from the transition table: admins may make any move,
    /// clerks may finish or return completed work, and the assignment's own
    /// executor may start or complete active work. Only the actor's
    /// highest-ranking capacity counts, so a clerk assigned as executor still
    /// acts as a clerk. The completion timestamp
    /// follows [`AssignmentStatus::completed_at_after_transition`].
    pub async fn transition_status(
        &self,
        actor: Option<&Actor>,
        request: TransitionRequest,
    ) -> Result<Assignment, WorkflowError> {
        let actor = policy::require_actor(actor)?;
        let id = parse_id("assignment", &request.id)?;
        let target = parse_status(&request.status)?;

        let span = tracing::info_span!(
            "assignment.transition",
            actor_id = %actor.user_id,
            assignment_id = %id,
            to = %target,
        );
        async {
            let existing = self.load(id, "assignment.transition").await?;
            if let Err(denied) = policy::authorize_transition(actor, &existing, target) {
                audit::log_assignment_transition_denied(actor.user_id, id, existing.status, target);
                return Err(denied);
            }

            let completed_at =
                target.completed_at_after_transition(existing.completed_at, UniversalTimestamp::now());
            let found = self
                .dal
                .assignment()
                .update_status(id, target, request.report, completed_at)
                .await
                .map_err(WorkflowError::storage("assignment.transition"))?;
            if !found {
                return Err(not_found(id));
            }

            audit::log_assignment_transitioned(actor.user_id, id, existing.status, target);
            self.load(id, "assignment.transition").await
        }
        .instrument(span)
        .await
    }

    /// Fetches one assignment. An unknown id is `Ok(None)`.
    pub async fn get_by_id(
        &self,
        actor: Option<&Actor>,
        id: &str,
    ) -> Result<Option<Assignment>, WorkflowError> {
        policy::authorize(actor, Operation::ViewAssignments)?;
        let id = parse_id("assignment", id)?;
        self.dal
            .assignment()
            .get_by_id(id)
            .await
            .map_err(WorkflowError::storage("assignment.get"))
    }

    /// One page of the assignment journal, newest first.
    pub async fn get_list(
        &self,
        actor: Option<&Actor>,
        filter: AssignmentFilter,
    ) -> Result<Page<Assignment>, WorkflowError> {
        policy::authorize(actor, Operation::ViewAssignments)?;
        let query = self.build_query(filter)?;
        debug!(page = query.page, page_size = query.page_size, "Listing assignments");

        self.dal
            .assignment()
            .list(&query, today())
            .await
            .map_err(WorkflowError::storage("assignment.list"))
    }

    /// Deletes an assignment with its co-executors. Unknown ids are a no-op.
    pub async fn delete(&self, actor: Option<&Actor>, id: &str) -> Result<(), WorkflowError> {
        let actor = policy::authorize(actor, Operation::DeleteAssignment)?;
        let id = parse_id("assignment", id)?;

        let Some(existing) = self
            .dal
            .assignment()
            .get_by_id(id)
            .await
            .map_err(WorkflowError::storage("assignment.delete"))?
        else {
            debug!(assignment_id = %id, "Delete of absent assignment ignored");
            return Ok(());
        };

        if existing.status == AssignmentStatus::Finished
            && !policy::permits(actor, Operation::ModifyFinishedAssignment)
        {
            return Err(WorkflowError::InvalidState(
                "finished assignments can only be deleted by an administrator".to_string(),
            ));
        }

        self.dal
            .assignment()
            .delete(id)
            .await
            .map_err(WorkflowError::storage("assignment.delete"))?;
        audit::log_assignment_deleted(actor.user_id, id);
        Ok(())
    }

    fn build_query(&self, filter: AssignmentFilter) -> Result<AssignmentQuery, WorkflowError> {
        let (page, page_size) = self.config.normalize_paging(filter.page, filter.page_size);
        Ok(AssignmentQuery {
            search: non_blank(filter.search.as_deref()).map(str::to_string),
            document_id: non_blank(filter.document_id.as_deref())
                .map(|s| parse_id("document", s))
                .transpose()?,
            executor_id: non_blank(filter.executor_id.as_deref())
                .map(|s| parse_id("executor", s))
                .transpose()?,
            status: non_blank(filter.status.as_deref())
                .map(parse_status)
                .transpose()?,
            deadline_from: parse_date("deadlineFrom", filter.deadline_from.as_deref())?,
            deadline_to: parse_date("deadlineTo", filter.deadline_to.as_deref())?,
            overdue_only: filter.overdue_only,
            show_finished: filter.show_finished,
            page,
            page_size,
        })
    }

    async fn load(&self, id: UniversalUuid, operation: &'static str) -> Result<Assignment, WorkflowError> {
        self.dal
            .assignment()
            .get_by_id(id)
            .await
            .map_err(WorkflowError::storage(operation))?
            .ok_or_else(|| not_found(id))
    }

    async fn ensure_document_exists(&self, document: DocumentRef) -> Result<(), WorkflowError> {
        let found = self
            .dal
            .directory()
            .get_document(document)
            .await
            .map_err(WorkflowError::storage("directory.document"))?;
        match found {
            Some(_) => Ok(()),
            None => Err(WorkflowError::InvalidReference(format!(
                "{} document {} does not exist",
                document.kind, document.id
            ))),
        }
    }

    async fn ensure_users_exist(
        &self,
        executor_id: UniversalUuid,
        co_executor_ids: &[UniversalUuid],
    ) -> Result<(), WorkflowError> {
        let mut wanted = vec![executor_id];
        wanted.extend_from_slice(co_executor_ids);
        let found = self
            .dal
            .directory()
            .existing_user_ids(&wanted)
            .await
            .map_err(WorkflowError::storage("directory.users"))?;
        match wanted.iter().find(|id| !found.contains(id)) {
            Some(missing) => Err(WorkflowError::InvalidReference(format!(
                "user {} does not exist",
                missing
            ))),
            None => Ok(()),
        }
    }
}

fn not_found(id: UniversalUuid) -> WorkflowError {
    WorkflowError::NotFound(format!("assignment {}", id))
}

/// Parses co-executor ids, dropping duplicates. Any malformed id rejects the
/// whole request.
fn parse_co_executors(ids: &[String]) -> Result<Vec<UniversalUuid>, WorkflowError> {
    let mut seen = BTreeSet::new();
    let mut parsed = Vec::with_capacity(ids.len());
    for raw in ids {
        let id = parse_id("co-executor", raw)?;
        if seen.insert(id) {
            parsed.push(id);
        }
    }
    Ok(parsed)
}
