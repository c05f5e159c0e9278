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

//! Acknowledgment fan-out model: one task, many recipients.

use serde::{Deserialize, Serialize};

use super::assignment::DocumentRef;
use crate::database::{UniversalTimestamp, UniversalUuid};

/// One recipient's progress on an acknowledgment task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcknowledgmentRecipient {
    pub id: UniversalUuid,
    pub acknowledgment_id: UniversalUuid,
    pub user_id: UniversalUuid,
    pub user_name: Option<String>,
    pub viewed_at: Option<UniversalTimestamp>,
    pub confirmed_at: Option<UniversalTimestamp>,
    pub created_at: UniversalTimestamp,
}

impl AcknowledgmentRecipient {
    pub fn is_confirmed(&self) -> bool {
        self.confirmed_at.is_some()
    }
}

/// A read/confirm obligation broadcast to a fixed set of users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcknowledgmentTask {
    pub id: UniversalUuid,
    pub document: DocumentRef,
    pub document_number: Option<String>,
    pub content: String,
    pub creator_id: UniversalUuid,
    pub creator_name: Option<String>,
    pub created_at: UniversalTimestamp,
    pub completed_at: Option<UniversalTimestamp>,
    pub recipients: Vec<AcknowledgmentRecipient>,
}

impl AcknowledgmentTask {
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    pub fn confirmed_count(&self) -> usize {
        self.recipients.iter().filter(|r| r.is_confirmed()).count()
    }

    pub fn recipient(&self, user_id: UniversalUuid) -> Option<&AcknowledgmentRecipient> {
        self.recipients.iter().find(|r| r.user_id == user_id)
    }
}

/// Validated input for creating an acknowledgment task.
#[derive(Debug, Clone)]
pub struct NewAcknowledgment {
    pub document: DocumentRef,
    pub content: String,
    pub creator_id: UniversalUuid,
    /// Distinct, well-formed user ids; never empty.
    pub recipient_ids: Vec<UniversalUuid>,
}

/// What a view or confirm call did to the caller's recipient row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipientUpdate {
    /// The timestamp was set by this call.
    Recorded,
    /// The timestamp was already set; nothing changed.
    AlreadyRecorded,
    /// The user is not a recipient of the task.
    NotRecipient,
}

/// Result of confirming on behalf of one recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmOutcome {
    pub recipient: RecipientUpdate,
    /// True when this confirmation was the last one outstanding and the task
    /// was stamped complete by it.
    pub completed_task: bool,
}
