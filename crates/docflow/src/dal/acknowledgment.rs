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

//! Acknowledgment persistence: atomic fan-out on creation, per-recipient
//! view/confirm updates and convergence of the parent task.
//!
//! Confirmation is the one place where the backends differ: PostgreSQL locks
//! the parent row with `SELECT ... FOR UPDATE` while SQLite takes the write
//! lock up front with an immediate transaction. Either way the recipient
//! update, the count of outstanding confirmations and the parent stamp
//! happen in one serialised transaction per task, so the last confirmation
//! always sees every earlier one.

use diesel::prelude::*;
use tracing::debug;

use super::models::{
    group_recipients, into_acknowledgment, AcknowledgmentJoinRow, AcknowledgmentRow,
    RecipientJoinRow, RecipientRow,
};
use super::DAL;
use crate::database::schema::{
    acknowledgment_recipients, acknowledgments, incoming_documents, outgoing_documents, users,
};
use crate::database::{UniversalTimestamp, UniversalUuid};
use crate::error::StoreError;
use crate::models::{
    AcknowledgmentTask, ConfirmOutcome, DocumentKind, NewAcknowledgment, RecipientUpdate,
};

/// Which acknowledgments a read selects.
#[derive(Debug, Clone)]
enum Selection {
    Id(String),
    Document(String),
    PendingFor(String),
    Active,
}

macro_rules! joined_acknowledgments {
    () => {
        acknowledgments::table
            .left_join(users::table.on(users::id.eq(acknowledgments::creator_id)))
            .left_join(
                incoming_documents::table.on(incoming_documents::id
                    .eq(acknowledgments::document_id)
                    .and(acknowledgments::document_kind.eq(DocumentKind::Incoming.as_str()))),
            )
            .left_join(
                outgoing_documents::table.on(outgoing_documents::id
                    .eq(acknowledgments::document_id)
                    .and(acknowledgments::document_kind.eq(DocumentKind::Outgoing.as_str()))),
            )
    };
}

/// Confirms `$user`'s row on `$task` and stamps the task once nothing is
/// outstanding. Expects the caller to hold the per-task write lock.
macro_rules! confirm_and_converge {
    ($conn:expr, $task:expr, $user:expr, $now:expr) => {{
        let conn = $conn;
        let recipient_row = || {
            acknowledgment_recipients::table
                .filter(acknowledgment_recipients::acknowledgment_id.eq($task))
                .filter(acknowledgment_recipients::user_id.eq($user))
        };

        // Viewing is implied by confirming.
        diesel::update(
            recipient_row()
                .filter(acknowledgment_recipients::confirmed_at.is_null())
                .filter(acknowledgment_recipients::viewed_at.is_null()),
        )
        .set(acknowledgment_recipients::viewed_at.eq(Some($now)))
        .execute(conn)?;

        let confirmed = diesel::update(
            recipient_row().filter(acknowledgment_recipients::confirmed_at.is_null()),
        )
        .set(acknowledgment_recipients::confirmed_at.eq(Some($now)))
        .execute(conn)?;

        if confirmed == 0 {
            let exists: i64 = recipient_row().count().get_result(conn)?;
            let recipient = if exists > 0 {
                RecipientUpdate::AlreadyRecorded
            } else {
                RecipientUpdate::NotRecipient
            };
            Ok(ConfirmOutcome {
                recipient,
                completed_task: false,
            })
        } else {
            let outstanding: i64 = acknowledgment_recipients::table
                .filter(acknowledgment_recipients::acknowledgment_id.eq($task))
                .filter(acknowledgment_recipients::confirmed_at.is_null())
                .count()
                .get_result(conn)?;

            let completed_task = if outstanding == 0 {
                diesel::update(
                    acknowledgments::table
                        .find($task)
                        .filter(acknowledgments::completed_at.is_null()),
                )
                .set(acknowledgments::completed_at.eq(Some($now)))
                .execute(conn)?
                    > 0
            } else {
                false
            };

            Ok(ConfirmOutcome {
                recipient: RecipientUpdate::Recorded,
                completed_task,
            })
        }
    }};
}

/// Data access for acknowledgment tasks and their recipients.
#[derive(Clone)]
pub struct AcknowledgmentDAL<'a> {
    dal: &'a DAL,
}

impl<'a> AcknowledgmentDAL<'a> {
    pub fn new(dal: &'a DAL) -> Self {
        Self { dal }
    }

    /// Inserts the task and one recipient row per user id in one transaction.
    pub async fn create(&self, new: NewAcknowledgment) -> Result<AcknowledgmentTask, StoreError> {
        let id = UniversalUuid::new_v4();
        let now = UniversalTimestamp::now().to_naive();
        let task = AcknowledgmentRow {
            id: id.to_string(),
            document_id: new.document.id.to_string(),
            document_kind: new.document.kind.as_str().to_string(),
            content: new.content,
            creator_id: new.creator_id.to_string(),
            created_at: now,
            completed_at: None,
        };
        let recipients: Vec<RecipientRow> = new
            .recipient_ids
            .iter()
            .map(|user| RecipientRow {
                id: UniversalUuid::new_v4().to_string(),
                acknowledgment_id: task.id.clone(),
                user_id: user.to_string(),
                viewed_at: None,
                confirmed_at: None,
                created_at: now,
            })
            .collect();
        let fan_out = recipients.len();

        crate::interact_backend!(self.dal, |conn| {
            conn.transaction::<_, diesel::result::Error, _>(|conn| {
                diesel::insert_into(acknowledgments::table)
                    .values(&task)
                    .execute(conn)?;
                diesel::insert_into(acknowledgment_recipients::table)
                    .values(&recipients)
                    .execute(conn)?;
                Ok(())
            })
        })?;

        debug!(acknowledgment_id = %id, recipients = fan_out, "Acknowledgment fan-out written");
        self.get_by_id(id)
            .await?
            .ok_or(StoreError::Database(diesel::result::Error::NotFound))
    }

    pub async fn get_by_id(
        &self,
        id: UniversalUuid,
    ) -> Result<Option<AcknowledgmentTask>, StoreError> {
        Ok(self
            .load(Selection::Id(id.to_string()))
            .await?
            .into_iter()
            .next())
    }

    /// All tasks raised against a document, newest first.
    pub async fn list_by_document(
        &self,
        document_id: UniversalUuid,
    ) -> Result<Vec<AcknowledgmentTask>, StoreError> {
        self.load(Selection::Document(document_id.to_string())).await
    }

    /// Tasks on which `user_id` still has to confirm, newest first.
    pub async fn list_pending_for_user(
        &self,
        user_id: UniversalUuid,
    ) -> Result<Vec<AcknowledgmentTask>, StoreError> {
        self.load(Selection::PendingFor(user_id.to_string())).await
    }

    /// Tasks not yet completed, newest first.
    pub async fn list_active(&self) -> Result<Vec<AcknowledgmentTask>, StoreError> {
        self.load(Selection::Active).await
    }

    async fn load(&self, selection: Selection) -> Result<Vec<AcknowledgmentTask>, StoreError> {
        let (rows, recipient_rows) = crate::interact_backend!(self.dal, |conn| {
            conn.transaction::<_, diesel::result::Error, _>(|conn| {
                let mut q = joined_acknowledgments!().into_boxed();
                q = match &selection {
                    Selection::Id(id) => q.filter(acknowledgments::id.eq(id.clone())),
                    Selection::Document(doc) => {
                        q.filter(acknowledgments::document_id.eq(doc.clone()))
                    }
                    Selection::PendingFor(user) => {
                        let pending: Vec<String> = acknowledgment_recipients::table
                            .filter(acknowledgment_recipients::user_id.eq(user.clone()))
                            .filter(acknowledgment_recipients::confirmed_at.is_null())
                            .select(acknowledgment_recipients::acknowledgment_id)
                            .load(conn)?;
                        q.filter(acknowledgments::id.eq_any(pending))
                    }
                    Selection::Active => q.filter(acknowledgments::completed_at.is_null()),
                };

                let rows: Vec<AcknowledgmentJoinRow> = q
                    .select((
                        AcknowledgmentRow::as_select(),
                        users::full_name.nullable(),
                        incoming_documents::number.nullable(),
                        outgoing_documents::number.nullable(),
                    ))
                    .order((acknowledgments::created_at.desc(), acknowledgments::id.desc()))
                    .load(conn)?;

                let ids: Vec<String> = rows.iter().map(|r| r.0.id.clone()).collect();
                let recipient_rows: Vec<RecipientJoinRow> = if ids.is_empty() {
                    Vec::new()
                } else {
                    acknowledgment_recipients::table
                        .left_join(users::table.on(users::id.eq(acknowledgment_recipients::user_id)))
                        .filter(acknowledgment_recipients::acknowledgment_id.eq_any(ids))
                        .select((RecipientRow::as_select(), users::full_name.nullable()))
                        .order((
                            acknowledgment_recipients::acknowledgment_id.asc(),
                            users::full_name.nullable().asc(),
                        ))
                        .load(conn)?
                };
                Ok((rows, recipient_rows))
            })
        })?;

        let mut recipients = group_recipients(recipient_rows)?;
        rows.into_iter()
            .map(|row| into_acknowledgment(row, &mut recipients))
            .collect()
    }

    /// Records that `user_id` opened the task. Only the first view counts.
    pub async fn mark_viewed(
        &self,
        task_id: UniversalUuid,
        user_id: UniversalUuid,
    ) -> Result<RecipientUpdate, StoreError> {
        let task = task_id.to_string();
        let user = user_id.to_string();
        let now = UniversalTimestamp::now().to_naive();

        let outcome = crate::interact_backend!(self.dal, |conn| {
            conn.transaction::<_, diesel::result::Error, _>(|conn| {
                let recipient_row = || {
                    acknowledgment_recipients::table
                        .filter(acknowledgment_recipients::acknowledgment_id.eq(&task))
                        .filter(acknowledgment_recipients::user_id.eq(&user))
                };

                let updated = diesel::update(
                    recipient_row().filter(acknowledgment_recipients::viewed_at.is_null()),
                )
                .set(acknowledgment_recipients::viewed_at.eq(Some(now)))
                .execute(conn)?;
                if updated > 0 {
                    return Ok(RecipientUpdate::Recorded);
                }

                let exists: i64 = recipient_row().count().get_result(conn)?;
                Ok(if exists > 0 {
                    RecipientUpdate::AlreadyRecorded
                } else {
                    RecipientUpdate::NotRecipient
                })
            })
        })?;

        Ok(outcome)
    }

    /// Records `user_id`'s confirmation and completes the task if it was the
    /// last one outstanding.
    pub async fn mark_confirmed(
        &self,
        task_id: UniversalUuid,
        user_id: UniversalUuid,
    ) -> Result<ConfirmOutcome, StoreError> {
        crate::backend_dispatch!(
            self.dal.backend(),
            self.mark_confirmed_postgres(task_id, user_id).await,
            self.mark_confirmed_sqlite(task_id, user_id).await
        )
    }

    #[cfg(feature = "postgres")]
    async fn mark_confirmed_postgres(
        &self,
        task_id: UniversalUuid,
        user_id: UniversalUuid,
    ) -> Result<ConfirmOutcome, StoreError> {
        let task = task_id.to_string();
        let user = user_id.to_string();
        let now = UniversalTimestamp::now().to_naive();

        let conn = self
            .dal
            .database
            .get_postgres_connection()
            .await
            .map_err(|e| StoreError::ConnectionPool(e.to_string()))?;

        let outcome = conn
            .interact(move |conn| {
                conn.transaction::<_, diesel::result::Error, _>(|conn| {
                    let locked: Option<String> = acknowledgments::table
                        .find(&task)
                        .select(acknowledgments::id)
                        .for_update()
                        .first(conn)
                        .optional()?;
                    if locked.is_none() {
                        return Ok(ConfirmOutcome {
                            recipient: RecipientUpdate::NotRecipient,
                            completed_task: false,
                        });
                    }
                    confirm_and_converge!(conn, &task, &user, now)
                })
            })
            .await
            .map_err(|e| StoreError::ConnectionPool(e.to_string()))??;

        Ok(outcome)
    }

    #[cfg(feature = "sqlite")]
    async fn mark_confirmed_sqlite(
        &self,
        task_id: UniversalUuid,
        user_id: UniversalUuid,
    ) -> Result<ConfirmOutcome, StoreError> {
        let task = task_id.to_string();
        let user = user_id.to_string();
        let now = UniversalTimestamp::now().to_naive();

        let conn = self
            .dal
            .database
            .get_sqlite_connection()
            .await
            .map_err(|e| StoreError::ConnectionPool(e.to_string()))?;

        let outcome = conn
            .interact(move |conn| {
                conn.immediate_transaction::<_, diesel::result::Error, _>(|conn| {
                    confirm_and_converge!(conn, &task, &user, now)
                })
            })
            .await
            .map_err(|e| StoreError::ConnectionPool(e.to_string()))??;

        Ok(outcome)
    }

    /// Deletes the task and all its recipient rows. Returns `false` if nothing
    /// was deleted.
    pub async fn delete(&self, task_id: UniversalUuid) -> Result<bool, StoreError> {
        let task = task_id.to_string();

        let deleted = crate::interact_backend!(self.dal, |conn| {
            conn.transaction::<_, diesel::result::Error, _>(|conn| {
                diesel::delete(
                    acknowledgment_recipients::table
                        .filter(acknowledgment_recipients::acknowledgment_id.eq(&task)),
                )
                .execute(conn)?;
                diesel::delete(acknowledgments::table.find(&task)).execute(conn)
            })
        })?;

        Ok(deleted > 0)
    }
}
