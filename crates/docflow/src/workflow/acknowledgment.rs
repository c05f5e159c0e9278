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

//! Acknowledgment fan-out: broadcast a read/confirm obligation to many users
//! and converge once all of them have confirmed.

use std::collections::BTreeSet;

use tracing::{debug, warn, Instrument};

use super::requests::CreateAcknowledgmentRequest;
use super::{audit, parse_document, parse_id};
use crate::dal::DAL;
use crate::database::UniversalUuid;
use crate::error::WorkflowError;
use crate::identity::Actor;
use crate::models::{AcknowledgmentTask, ConfirmOutcome, NewAcknowledgment, RecipientUpdate};
use crate::policy::{self, Operation};

/// Entry point for every acknowledgment operation.
#[derive(Clone)]
pub struct AcknowledgmentWorkflow {
    dal: DAL,
}

impl AcknowledgmentWorkflow {
    pub fn new(dal: DAL) -> Self {
        Self { dal }
    }

    /// Creates a task with one recipient row per distinct, well-formed user id.
    ///
    /// Malformed ids are skipped. If none remain the call fails with
    /// [`WorkflowError::EmptyRecipients`]; a well-formed id naming no user is an
    /// [`WorkflowError::InvalidReference`].
    pub async fn create(
        &self,
        actor: Option<&Actor>,
        request: CreateAcknowledgmentRequest,
    ) -> Result<AcknowledgmentTask, WorkflowError> {
        let actor = policy::authorize(actor, Operation::CreateAcknowledgment)?;
        let document = parse_document(&request.document_id, &request.document_kind)?;
        let recipient_ids = collect_recipients(&request.recipient_ids);
        if recipient_ids.is_empty() {
            return Err(WorkflowError::EmptyRecipients);
        }

        let span = tracing::info_span!(
            "acknowledgment.create",
            actor_id = %actor.user_id,
            document_id = %document.id,
        );
        async {
            let directory = self.dal.directory();
            if directory
                .get_document(document)
                .await
                .map_err(WorkflowError::storage("directory.document"))?
                .is_none()
            {
                return Err(WorkflowError::InvalidReference(format!(
                    "{} document {} does not exist",
                    document.kind, document.id
                )));
            }

            let known = directory
                .existing_user_ids(&recipient_ids)
                .await
                .map_err(WorkflowError::storage("directory.users"))?;
            if let Some(missing) = recipient_ids.iter().find(|id| !known.contains(id)) {
                return Err(WorkflowError::InvalidReference(format!(
                    "user {} does not exist",
                    missing
                )));
            }

            let fan_out = recipient_ids.len();
            let task = self
                .dal
                .acknowledgment()
                .create(NewAcknowledgment {
                    document,
                    content: request.content,
                    creator_id: actor.user_id,
                    recipient_ids,
                })
                .await
                .map_err(WorkflowError::storage("acknowledgment.create"))?;

            audit::log_acknowledgment_created(actor.user_id, task.id, fan_out);
            Ok(task)
        }
        .instrument(span)
        .await
    }

    /// Records that the actor opened the task. Repeat calls change nothing.
    pub async fn mark_viewed(&self, actor: Option<&Actor>, task_id: &str) -> Result<(), WorkflowError> {
        let actor = policy::require_actor(actor)?;
        let task_id = parse_id("acknowledgment", task_id)?;

        let update = self
            .dal
            .acknowledgment()
            .mark_viewed(task_id, actor.user_id)
            .await
            .map_err(WorkflowError::storage("acknowledgment.view"))?;

        match update {
            RecipientUpdate::Recorded => {
                audit::log_acknowledgment_viewed(actor.user_id, task_id);
                Ok(())
            }
            RecipientUpdate::AlreadyRecorded => Ok(()),
            RecipientUpdate::NotRecipient => Err(not_a_recipient(task_id)),
        }
    }

    /// Records the actor's confirmation, completing the task when it was the
    /// last one outstanding. Re-confirming changes nothing.
    pub async fn mark_confirmed(
        &self,
        actor: Option<&Actor>,
        task_id: &str,
    ) -> Result<ConfirmOutcome, WorkflowError> {
        let actor = policy::require_actor(actor)?;
        let task_id = parse_id("acknowledgment", task_id)?;

        let span = tracing::info_span!(
            "acknowledgment.confirm",
            actor_id = %actor.user_id,
            acknowledgment_id = %task_id,
        );
        let outcome = self
            .dal
            .acknowledgment()
            .mark_confirmed(task_id, actor.user_id)
            .instrument(span)
            .await
            .map_err(WorkflowError::storage("acknowledgment.confirm"))?;

        match outcome.recipient {
            RecipientUpdate::NotRecipient => return Err(not_a_recipient(task_id)),
            RecipientUpdate::AlreadyRecorded => {
                debug!(acknowledgment_id = %task_id, "Repeat confirmation ignored");
            }
            RecipientUpdate::Recorded => audit::log_acknowledgment_confirmed(actor.user_id, task_id),
        }
        if outcome.completed_task {
            audit::log_acknowledgment_completed(task_id);
        }
        Ok(outcome)
    }

    /// Fetches one task, or `None`.
    pub async fn get_by_id(
        &self,
        actor: Option<&Actor>,
        task_id: &str,
    ) -> Result<Option<AcknowledgmentTask>, WorkflowError> {
        policy::authorize(actor, Operation::ViewAcknowledgments)?;
        let task_id = parse_id("acknowledgment", task_id)?;
        self.dal
            .acknowledgment()
            .get_by_id(task_id)
            .await
            .map_err(WorkflowError::storage("acknowledgment.get"))
    }

    /// All tasks raised against a document, newest first.
    pub async fn get_by_document_id(
        &self,
        actor: Option<&Actor>,
        document_id: &str,
    ) -> Result<Vec<AcknowledgmentTask>, WorkflowError> {
        policy::authorize(actor, Operation::ViewAcknowledgments)?;
        let document_id = parse_id("document", document_id)?;
        self.dal
            .acknowledgment()
            .list_by_document(document_id)
            .await
            .map_err(WorkflowError::storage("acknowledgment.by_document"))
    }

    /// Tasks still awaiting `user_id`'s confirmation; `None` means the actor.
    ///
    /// Reading someone else's queue requires `admin` or `clerk`.
    pub async fn get_pending_for_user(
        &self,
        actor: Option<&Actor>,
        user_id: Option<&str>,
    ) -> Result<Vec<AcknowledgmentTask>, WorkflowError> {
        let actor = policy::authorize(actor, Operation::ViewAcknowledgments)?;
        let user_id = match user_id {
            Some(raw) => parse_id("user", raw)?,
            None => actor.user_id,
        };
        if user_id != actor.user_id {
            policy::authorize(Some(actor), Operation::ViewOthersAcknowledgments)?;
        }

        self.dal
            .acknowledgment()
            .list_pending_for_user(user_id)
            .await
            .map_err(WorkflowError::storage("acknowledgment.pending"))
    }

    /// Every task not yet completed. Requires `admin` or `clerk`.
    pub async fn get_all_active(
        &self,
        actor: Option<&Actor>,
    ) -> Result<Vec<AcknowledgmentTask>, WorkflowError> {
        policy::authorize(actor, Operation::ListActiveAcknowledgments)?;
        self.dal
            .acknowledgment()
            .list_active()
            .await
            .map_err(WorkflowError::storage("acknowledgment.active"))
    }

    /// Deletes a task and its recipients. Unknown ids are a no-op.
    pub async fn delete(&self, actor: Option<&Actor>, task_id: &str) -> Result<(), WorkflowError> {
        let actor = policy::authorize(actor, Operation::DeleteAcknowledgment)?;
        let task_id = parse_id("acknowledgment", task_id)?;

        let deleted = self
            .dal
            .acknowledgment()
            .delete(task_id)
            .await
            .map_err(WorkflowError::storage("acknowledgment.delete"))?;
        if deleted {
            audit::log_acknowledgment_deleted(actor.user_id, task_id);
        } else {
            debug!(acknowledgment_id = %task_id, "Delete of absent acknowledgment ignored");
        }
        Ok(())
    }
}

fn not_a_recipient(task_id: UniversalUuid) -> WorkflowError {
    WorkflowError::NotFound(format!("recipient entry on acknowledgment {}", task_id))
}

/// Distinct well-formed ids in first-seen order.
fn collect_recipients(raw: &[String]) -> Vec<UniversalUuid> {
    let mut seen = BTreeSet::new();
    raw.iter()
        .filter_map(|s| match UniversalUuid::parse(s.trim()) {
            Ok(id) => Some(id),
            Err(_) => {
                warn!(recipient = %s, "Skipping malformed recipient id");
                None
            }
        })
        .filter(|id| seen.insert(*id))
        .collect()
}
