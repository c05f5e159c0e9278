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

//! Assignment persistence: creation with co-executors, filtered paging,
//! status and detail updates, and cascading deletes.
//!
//! Multi-row writes run in a single transaction. Reads resolve the executor
//! name and the document number/subject at query time and batch-load
//! co-executors for the whole result set.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{Bool, Text};
use tracing::debug;

use super::models::{
    group_co_executors, into_assignment, AssignmentJoinRow, AssignmentRow, CoExecutorJoinRow,
    CoExecutorRow,
};
use super::predicates;
use super::DAL;
use crate::database::schema::{
    assignment_co_executors, assignments, incoming_documents, outgoing_documents, users,
};
use crate::database::{UniversalTimestamp, UniversalUuid};
use crate::error::StoreError;
use crate::models::{
    Assignment, AssignmentQuery, AssignmentStatus, AssignmentUpdate, DocumentKind, NewAssignment,
    Page,
};

diesel::define_sql_function!(fn lower(x: Text) -> Text);

/// `assignments` left-joined with the executor and both document registers.
macro_rules! joined_assignments {
    () => {
        assignments::table
            .left_join(users::table.on(users::id.eq(assignments::executor_id)))
            .left_join(
                incoming_documents::table.on(incoming_documents::id
                    .eq(assignments::document_id)
                    .and(assignments::document_kind.eq(DocumentKind::Incoming.as_str()))),
            )
            .left_join(
                outgoing_documents::table.on(outgoing_documents::id
                    .eq(assignments::document_id)
                    .and(assignments::document_kind.eq(DocumentKind::Outgoing.as_str()))),
            )
    };
}

/// Selection matching [`AssignmentJoinRow`].
macro_rules! assignment_columns {
    () => {
        (
            AssignmentRow::as_select(),
            users::full_name.nullable(),
            incoming_documents::number.nullable(),
            incoming_documents::subject.nullable(),
            outgoing_documents::number.nullable(),
            outgoing_documents::subject.nullable(),
        )
    };
}

/// Loads co-executor rows (with names) for a set of assignment ids.
macro_rules! load_co_executors {
    ($conn:expr, $ids:expr) => {
        assignment_co_executors::table
            .left_join(users::table.on(users::id.eq(assignment_co_executors::user_id)))
            .filter(assignment_co_executors::assignment_id.eq_any($ids))
            .select((
                assignment_co_executors::assignment_id,
                assignment_co_executors::user_id,
                users::full_name.nullable(),
            ))
            .order((
                assignment_co_executors::assignment_id.asc(),
                users::full_name.nullable().asc(),
            ))
            .load::<CoExecutorJoinRow>($conn)
    };
}

fn hydrate(
    rows: Vec<AssignmentJoinRow>,
    co_rows: Vec<CoExecutorJoinRow>,
) -> Result<Vec<Assignment>, StoreError> {
    let mut co_executors = group_co_executors(co_rows)?;
    rows.into_iter()
        .map(|row| into_assignment(row, &mut co_executors))
        .collect()
}

fn co_executor_rows(assignment_id: &str, user_ids: &[UniversalUuid]) -> Vec<CoExecutorRow> {
    user_ids
        .iter()
        .map(|user| CoExecutorRow {
            assignment_id: assignment_id.to_string(),
            user_id: user.to_string(),
        })
        .collect()
}

/// Data access for assignments.
#[derive(Clone)]
pub struct AssignmentDAL<'a> {
    dal: &'a DAL,
}

impl<'a> AssignmentDAL<'a> {
    pub fn new(dal: &'a DAL) -> Self {
        Self { dal }
    }

    /// Inserts a new assignment in status `new` together with its co-executors.
    pub async fn create(&self, new: NewAssignment) -> Result<Assignment, StoreError> {
        let id = UniversalUuid::new_v4();
        let now = UniversalTimestamp::now().to_naive();
        let row = AssignmentRow {
            id: id.to_string(),
            document_id: new.document.id.to_string(),
            document_kind: new.document.kind.as_str().to_string(),
            executor_id: new.executor_id.to_string(),
            content: new.content,
            deadline: new.deadline,
            status: AssignmentStatus::New.as_str().to_string(),
            report: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        };
        let co_rows = co_executor_rows(&row.id, &new.co_executor_ids);

        crate::interact_backend!(self.dal, |conn| {
            conn.transaction::<_, diesel::result::Error, _>(|conn| {
                diesel::insert_into(assignments::table)
                    .values(&row)
                    .execute(conn)?;
                if !co_rows.is_empty() {
                    diesel::insert_into(assignment_co_executors::table)
                        .values(&co_rows)
                        .execute(conn)?;
                }
                Ok(())
            })
        })?;

        debug!(assignment_id = %id, "Assignment row inserted");
        self.get_by_id(id)
            .await?
            .ok_or(StoreError::Database(diesel::result::Error::NotFound))
    }

    /// Fetches one assignment with its joins, or `None` if absent.
    pub async fn get_by_id(&self, id: UniversalUuid) -> Result<Option<Assignment>, StoreError> {
        let id = id.to_string();
        let (rows, co_rows) = crate::interact_backend!(self.dal, |conn| {
            let rows: Vec<AssignmentJoinRow> = joined_assignments!()
                .filter(assignments::id.eq(&id))
                .select(assignment_columns!())
                .load(conn)?;
            if rows.is_empty() {
                return Ok::<_, diesel::result::Error>((rows, Vec::new()));
            }
            let co_rows = load_co_executors!(conn, vec![id.clone()])?;
            Ok((rows, co_rows))
        })?;

        Ok(hydrate(rows, co_rows)?.into_iter().next())
    }

    /// Returns one page of assignments matching `query`, newest first.
    ///
    /// `today` anchors the overdue filter.
    pub async fn list(
        &self,
        query: &AssignmentQuery,
        today: NaiveDate,
    ) -> Result<Page<Assignment>, StoreError> {
        if query.is_trivially_empty() {
            return Ok(Page {
                items: Vec::new(),
                total_count: 0,
                page: query.page,
                page_size: query.page_size,
            });
        }

        let search_pattern = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s.to_lowercase()));
        let document_id = query.document_id.map(|id| id.to_string());
        let executor = query.executor_id;
        let status = query.status;
        let show_finished = query.show_finished;
        let deadline_from = query.deadline_from;
        let deadline_to = query.deadline_to;
        let overdue_sql = query
            .overdue_only
            .then(|| predicates::overdue_sql(self.dal.backend(), today));
        let limit = query.page_size;
        let offset = query.offset();

        let (total_count, rows, co_rows) = crate::interact_backend!(self.dal, |conn| {
            let filtered = || {
                let mut q = joined_assignments!().into_boxed();
                if let Some(pattern) = &search_pattern {
                    q = q.filter(
                        lower(assignments::content)
                            .like(pattern.clone())
                            .or(lower(incoming_documents::number).like(pattern.clone()))
                            .or(lower(incoming_documents::subject).like(pattern.clone()))
                            .or(lower(outgoing_documents::number).like(pattern.clone()))
                            .or(lower(outgoing_documents::subject).like(pattern.clone())),
                    );
                }
                if let Some(document_id) = &document_id {
                    q = q.filter(assignments::document_id.eq(document_id.clone()));
                }
                if let Some(user) = executor {
                    q = q.filter(predicates::involving(user));
                }
                if let Some(status) = status {
                    q = q.filter(assignments::status.eq(status.as_str()));
                }
                if !show_finished {
                    q = q.filter(assignments::status.ne(AssignmentStatus::Finished.as_str()));
                }
                if let Some(from) = deadline_from {
                    q = q.filter(assignments::deadline.ge(from));
                }
                if let Some(to) = deadline_to {
                    q = q.filter(assignments::deadline.le(to));
                }
                if let Some(overdue_sql) = &overdue_sql {
                    q = q.filter(sql::<Bool>(overdue_sql));
                }
                q
            };

            conn.transaction::<_, diesel::result::Error, _>(|conn| {
                let total_count: i64 = filtered().count().get_result(conn)?;
                let rows: Vec<AssignmentJoinRow> = filtered()
                    .select(assignment_columns!())
                    .order((assignments::created_at.desc(), assignments::id.desc()))
                    .limit(limit)
                    .offset(offset)
                    .load(conn)?;
                let ids: Vec<String> = rows.iter().map(|r| r.0.id.clone()).collect();
                let co_rows = if ids.is_empty() {
                    Vec::new()
                } else {
                    load_co_executors!(conn, ids)?
                };
                Ok((total_count, rows, co_rows))
            })
        })?;

        Ok(Page {
            items: hydrate(rows, co_rows)?,
            total_count,
            page: query.page,
            page_size: query.page_size,
        })
    }

    /// Active assignments (`new`, `in_progress`) with a deadline in
    /// `[from, until]`, soonest deadline first. When `involving` is set only
    /// that user's assignments (as executor or co-executor) are returned.
    pub async fn expiring(
        &self,
        involving: Option<UniversalUuid>,
        from: NaiveDate,
        until: NaiveDate,
    ) -> Result<Vec<Assignment>, StoreError> {
        let active = [
            AssignmentStatus::New.as_str(),
            AssignmentStatus::InProgress.as_str(),
        ];

        let (rows, co_rows) = crate::interact_backend!(self.dal, |conn| {
            let mut q = joined_assignments!()
                .filter(assignments::status.eq_any(active))
                .filter(assignments::deadline.between(from, until))
                .into_boxed();
            if let Some(user) = involving {
                q = q.filter(predicates::involving(user));
            }
            let rows: Vec<AssignmentJoinRow> = q
                .select(assignment_columns!())
                .order((assignments::deadline.asc(), assignments::created_at.asc()))
                .load(conn)?;
            let ids: Vec<String> = rows.iter().map(|r| r.0.id.clone()).collect();
            let co_rows = if ids.is_empty() {
                Vec::new()
            } else {
                load_co_executors!(conn, ids)?
            };
            Ok::<_, diesel::result::Error>((rows, co_rows))
        })?;

        hydrate(rows, co_rows)
    }

    /// Replaces executor, content, deadline and the co-executor set.
    ///
    /// Status, report and completion timestamp are untouched. Returns `false`
    /// if the assignment does not exist.
    pub async fn update_details(
        &self,
        id: UniversalUuid,
        update: AssignmentUpdate,
    ) -> Result<bool, StoreError> {
        let id = id.to_string();
        let now = UniversalTimestamp::now().to_naive();
        let co_rows = co_executor_rows(&id, &update.co_executor_ids);
        let executor_id = update.executor_id.to_string();
        let content = update.content;
        let deadline = update.deadline;

        let found = crate::interact_backend!(self.dal, |conn| {
            conn.transaction::<_, diesel::result::Error, _>(|conn| {
                let updated = diesel::update(assignments::table.find(&id))
                    .set((
                        assignments::executor_id.eq(&executor_id),
                        assignments::content.eq(&content),
                        assignments::deadline.eq(deadline),
                        assignments::updated_at.eq(now),
                    ))
                    .execute(conn)?;
                if updated == 0 {
                    return Ok(false);
                }

                diesel::delete(
                    assignment_co_executors::table
                        .filter(assignment_co_executors::assignment_id.eq(&id)),
                )
                .execute(conn)?;
                if !co_rows.is_empty() {
                    diesel::insert_into(assignment_co_executors::table)
                        .values(&co_rows)
                        .execute(conn)?;
                }
                Ok(true)
            })
        })?;

        Ok(found)
    }

    /// Writes a status change. `report` replaces the stored report when given.
    /// Returns `false` if the assignment does not exist.
    pub async fn update_status(
        &self,
        id: UniversalUuid,
        status: AssignmentStatus,
        report: Option<String>,
        completed_at: Option<UniversalTimestamp>,
    ) -> Result<bool, StoreError> {
        let id = id.to_string();
        let now = UniversalTimestamp::now().to_naive();
        let completed_at: Option<NaiveDateTime> = completed_at.map(|ts| ts.to_naive());

        let found = crate::interact_backend!(self.dal, |conn| {
            conn.transaction::<_, diesel::result::Error, _>(|conn| {
                let updated = diesel::update(assignments::table.find(&id))
                    .set((
                        assignments::status.eq(status.as_str()),
                        assignments::completed_at.eq(completed_at),
                        assignments::updated_at.eq(now),
                    ))
                    .execute(conn)?;
                if updated > 0 {
                    if let Some(report) = report {
                        diesel::update(assignments::table.find(&id))
                            .set(assignments::report.eq(Some(report)))
                            .execute(conn)?;
                    }
                }
                Ok(updated > 0)
            })
        })?;

        Ok(found)
    }

    /// Deletes an assignment and its co-executor rows. Returns `false` if
    /// nothing was deleted.
    pub async fn delete(&self, id: UniversalUuid) -> Result<bool, StoreError> {
        let id = id.to_string();

        let deleted = crate::interact_backend!(self.dal, |conn| {
            conn.transaction::<_, diesel::result::Error, _>(|conn| {
                diesel::delete(
                    assignment_co_executors::table
                        .filter(assignment_co_executors::assignment_id.eq(&id)),
                )
                .execute(conn)?;
                diesel::delete(assignments::table.find(&id)).execute(conn)
            })
        })?;

        Ok(deleted > 0)
    }
}
