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

//! Row models shared by both backends, and their conversion into domain types.
//!
//! Rows carry raw column values (UUID text, naive UTC timestamps, status
//! strings). Conversion into the domain models in [`crate::models`] validates
//! every stored value and reports anything unparseable as
//! [`StoreError::CorruptValue`].

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use std::collections::HashMap;

use crate::database::schema::{
    acknowledgment_recipients, acknowledgments, assignment_co_executors, assignments, users,
};
use crate::database::{UniversalTimestamp, UniversalUuid};
use crate::error::StoreError;
use crate::identity::Role;
use crate::models::{
    AcknowledgmentRecipient, AcknowledgmentTask, Assignment, AssignmentStatus, CoExecutor,
    Document, DocumentKind, DocumentRef, User,
};

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = assignments)]
pub struct AssignmentRow {
    pub id: String,
    pub document_id: String,
    pub document_kind: String,
    pub executor_id: String,
    pub content: String,
    pub deadline: Option<NaiveDate>,
    pub status: String,
    pub report: Option<String>,
    pub completed_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = assignment_co_executors)]
pub struct CoExecutorRow {
    pub assignment_id: String,
    pub user_id: String,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = acknowledgments)]
pub struct AcknowledgmentRow {
    pub id: String,
    pub document_id: String,
    pub document_kind: String,
    pub content: String,
    pub creator_id: String,
    pub created_at: NaiveDateTime,
    pub completed_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = acknowledgment_recipients)]
pub struct RecipientRow {
    pub id: String,
    pub acknowledgment_id: String,
    pub user_id: String,
    pub viewed_at: Option<NaiveDateTime>,
    pub confirmed_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = users)]
pub struct UserRow {
    pub id: String,
    pub login: String,
    pub full_name: String,
    pub roles: String,
    pub created_at: NaiveDateTime,
}

/// `(id, number, subject, created_at)` from either document table.
pub type DocumentRow = (String, String, String, NaiveDateTime);

/// An assignment with its read-time joins: executor name, then number and
/// subject from the incoming and outgoing registers (at most one pair is set).
pub type AssignmentJoinRow = (
    AssignmentRow,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
);

/// An acknowledgment with creator name and incoming/outgoing document number.
pub type AcknowledgmentJoinRow = (
    AcknowledgmentRow,
    Option<String>,
    Option<String>,
    Option<String>,
);

/// `(assignment_id, user_id, full_name)`.
pub type CoExecutorJoinRow = (String, String, Option<String>);

/// A recipient with the recipient's full name.
pub type RecipientJoinRow = (RecipientRow, Option<String>);

pub(crate) fn parse_uuid(field: &'static str, value: &str) -> Result<UniversalUuid, StoreError> {
    UniversalUuid::parse(value).map_err(|_| StoreError::CorruptValue {
        field,
        value: value.to_string(),
    })
}

pub(crate) fn parse_kind(field: &'static str, value: &str) -> Result<DocumentKind, StoreError> {
    DocumentKind::from_str(value).ok_or_else(|| StoreError::CorruptValue {
        field,
        value: value.to_string(),
    })
}

fn ts(value: NaiveDateTime) -> UniversalTimestamp {
    UniversalTimestamp::from_naive(value)
}

impl UserRow {
    pub fn into_user(self) -> Result<User, StoreError> {
        Ok(User {
            id: parse_uuid("users.id", &self.id)?,
            roles: Role::parse_list(&self.roles),
            login: self.login,
            full_name: self.full_name,
            created_at: ts(self.created_at),
        })
    }
}

pub(crate) fn into_document(kind: DocumentKind, row: DocumentRow) -> Result<Document, StoreError> {
    let (id, number, subject, created_at) = row;
    Ok(Document {
        id: parse_uuid("documents.id", &id)?,
        kind,
        number,
        subject,
        created_at: ts(created_at),
    })
}

/// Groups co-executor rows by assignment id.
pub(crate) fn group_co_executors(
    rows: Vec<CoExecutorJoinRow>,
) -> Result<HashMap<String, Vec<CoExecutor>>, StoreError> {
    let mut grouped: HashMap<String, Vec<CoExecutor>> = HashMap::new();
    for (assignment_id, user_id, full_name) in rows {
        let co = CoExecutor {
            user_id: parse_uuid("assignment_co_executors.user_id", &user_id)?,
            full_name,
        };
        grouped.entry(assignment_id).or_default().push(co);
    }
    Ok(grouped)
}

pub(crate) fn into_assignment(
    row: AssignmentJoinRow,
    co_executors: &mut HashMap<String, Vec<CoExecutor>>,
) -> Result<Assignment, StoreError> {
    let (row, executor_name, in_number, in_subject, out_number, out_subject) = row;
    let status =
        AssignmentStatus::from_str(&row.status).ok_or_else(|| StoreError::CorruptValue {
            field: "assignments.status",
            value: row.status.clone(),
        })?;
    let kind = parse_kind("assignments.document_kind", &row.document_kind)?;
    let (document_number, document_subject) = match kind {
        DocumentKind::Incoming => (in_number, in_subject),
        DocumentKind::Outgoing => (out_number, out_subject),
    };

    Ok(Assignment {
        id: parse_uuid("assignments.id", &row.id)?,
        document: DocumentRef {
            id: parse_uuid("assignments.document_id", &row.document_id)?,
            kind,
        },
        document_number,
        document_subject,
        executor_id: parse_uuid("assignments.executor_id", &row.executor_id)?,
        executor_name,
        co_executors: co_executors.remove(&row.id).unwrap_or_default(),
        content: row.content,
        deadline: row.deadline,
        status,
        report: row.report,
        completed_at: row.completed_at.map(ts),
        created_at: ts(row.created_at),
        updated_at: ts(row.updated_at),
    })
}

/// Groups recipient rows by acknowledgment id.
pub(crate) fn group_recipients(
    rows: Vec<RecipientJoinRow>,
) -> Result<HashMap<String, Vec<AcknowledgmentRecipient>>, StoreError> {
    let mut grouped: HashMap<String, Vec<AcknowledgmentRecipient>> = HashMap::new();
    for (row, user_name) in rows {
        let recipient = AcknowledgmentRecipient {
            id: parse_uuid("acknowledgment_recipients.id", &row.id)?,
            acknowledgment_id: parse_uuid(
                "acknowledgment_recipients.acknowledgment_id",
                &row.acknowledgment_id,
            )?,
            user_id: parse_uuid("acknowledgment_recipients.user_id", &row.user_id)?,
            user_name,
            viewed_at: row.viewed_at.map(ts),
            confirmed_at: row.confirmed_at.map(ts),
            created_at: ts(row.created_at),
        };
        grouped
            .entry(row.acknowledgment_id)
            .or_default()
            .push(recipient);
    }
    Ok(grouped)
}

pub(crate) fn into_acknowledgment(
    row: AcknowledgmentJoinRow,
    recipients: &mut HashMap<String, Vec<AcknowledgmentRecipient>>,
) -> Result<AcknowledgmentTask, StoreError> {
    let (row, creator_name, in_number, out_number) = row;
    let kind = parse_kind("acknowledgments.document_kind", &row.document_kind)?;
    let document_number = match kind {
        DocumentKind::Incoming => in_number,
        DocumentKind::Outgoing => out_number,
    };

    Ok(AcknowledgmentTask {
        id: parse_uuid("acknowledgments.id", &row.id)?,
        document: DocumentRef {
            id: parse_uuid("acknowledgments.document_id", &row.document_id)?,
            kind,
        },
        document_number,
        content: row.content,
        creator_id: parse_uuid("acknowledgments.creator_id", &row.creator_id)?,
        creator_name,
        created_at: ts(row.created_at),
        completed_at: row.completed_at.map(ts),
        recipients: recipients.remove(&row.id).unwrap_or_default(),
    })
}
