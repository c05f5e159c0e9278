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

//! Read-only aggregate queries feeding the role-specific dashboard.
//!
//! All lateness checks go through [`predicates`] so the counts agree with
//! [`Assignment::is_overdue`](crate::models::Assignment::is_overdue) and
//! [`Assignment::is_finished_late`](crate::models::Assignment::is_finished_late).
//! The clerk's reporting window is the one place a finished row without a
//! recorded completion falls back to its last update.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
#[cfg(feature = "sqlite")]
use diesel::sql_types::BigInt;
#[cfg(feature = "postgres")]
use diesel::sql_types::Text;

use super::predicates;
use super::DAL;
use crate::database::schema::{assignments, incoming_documents, outgoing_documents, users};
use crate::database::UniversalUuid;
use crate::error::StoreError;
use crate::models::AssignmentStatus;

/// Recorded completion instant.
const RECORDED_COMPLETION: &str = "assignments.completed_at";

/// Completion instant for the clerk window: recorded, else last update.
const EFFECTIVE_COMPLETION: &str = "COALESCE(assignments.completed_at, assignments.updated_at)";

#[cfg(feature = "postgres")]
#[derive(QueryableByName)]
struct PrettySize {
    #[diesel(sql_type = Text)]
    size: String,
}

#[cfg(feature = "sqlite")]
#[derive(QueryableByName)]
struct ByteSize {
    #[diesel(sql_type = BigInt)]
    size: i64,
}

/// Formats a byte count the way PostgreSQL's `pg_size_pretty` does.
pub fn pretty_size(bytes: i64) -> String {
    const UNITS: [&str; 5] = ["kB", "MB", "GB", "TB", "PB"];
    const LIMIT: i64 = 10 * 1024;

    if bytes.abs() < LIMIT {
        return format!("{} bytes", bytes);
    }
    let mut size = bytes;
    let mut unit = UNITS[0];
    for (i, name) in UNITS.iter().enumerate() {
        size = (size + 512) / 1024;
        unit = name;
        if size.abs() < LIMIT || i == UNITS.len() - 1 {
            break;
        }
    }
    format!("{} {}", size, unit)
}

/// Aggregate queries over assignments and the directory.
#[derive(Clone)]
pub struct DashboardDAL<'a> {
    dal: &'a DAL,
}

impl<'a> DashboardDAL<'a> {
    pub fn new(dal: &'a DAL) -> Self {
        Self { dal }
    }

    /// Assignments in `status` where `user` is executor or co-executor.
    pub async fn count_involving_with_status(
        &self,
        user: UniversalUuid,
        status: AssignmentStatus,
    ) -> Result<i64, StoreError> {
        let count = crate::interact_backend!(self.dal, |conn| {
            assignments::table
                .filter(predicates::involving(user))
                .filter(assignments::status.eq(status.as_str()))
                .count()
                .get_result::<i64>(conn)
        })?;
        Ok(count)
    }

    /// Overdue assignments (on `today`) where `user` is involved.
    pub async fn count_overdue_involving(
        &self,
        user: UniversalUuid,
        today: NaiveDate,
    ) -> Result<i64, StoreError> {
        let backend = self.dal.backend();
        let count = crate::interact_backend!(self.dal, |conn| {
            assignments::table
                .filter(predicates::involving(user))
                .filter(predicates::overdue(backend, today))
                .count()
                .get_result::<i64>(conn)
        })?;
        Ok(count)
    }

    /// `(finished, finished_late)` over assignments where `user` is involved.
    ///
    /// Without a recorded completion a finished row is never counted late.
    pub async fn finished_counts_involving(
        &self,
        user: UniversalUuid,
    ) -> Result<(i64, i64), StoreError> {
        let backend = self.dal.backend();
        let finished = AssignmentStatus::Finished.as_str();
        let counts = crate::interact_backend!(self.dal, |conn| {
            let total: i64 = assignments::table
                .filter(predicates::involving(user))
                .filter(assignments::status.eq(finished))
                .count()
                .get_result(conn)?;
            let late: i64 = assignments::table
                .filter(predicates::involving(user))
                .filter(assignments::status.eq(finished))
                .filter(predicates::completed_after_deadline(
                    backend,
                    RECORDED_COMPLETION,
                ))
                .count()
                .get_result(conn)?;
            Ok::<_, diesel::result::Error>((total, late))
        })?;
        Ok(counts)
    }

    /// `(incoming, outgoing)` documents registered within `[start, end]`.
    pub async fn document_counts_between(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<(i64, i64), StoreError> {
        let counts = crate::interact_backend!(self.dal, |conn| {
            let incoming: i64 = incoming_documents::table
                .filter(incoming_documents::created_at.between(start, end))
                .count()
                .get_result(conn)?;
            let outgoing: i64 = outgoing_documents::table
                .filter(outgoing_documents::created_at.between(start, end))
                .count()
                .get_result(conn)?;
            Ok::<_, diesel::result::Error>((incoming, outgoing))
        })?;
        Ok(counts)
    }

    /// Overdue assignments (on `today`) whose deadline lies in
    /// `[start_date, end_date]`.
    pub async fn count_overdue_with_deadline_between(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
        today: NaiveDate,
    ) -> Result<i64, StoreError> {
        let backend = self.dal.backend();
        let count = crate::interact_backend!(self.dal, |conn| {
            assignments::table
                .filter(assignments::deadline.between(start_date, end_date))
                .filter(predicates::overdue(backend, today))
                .count()
                .get_result::<i64>(conn)
        })?;
        Ok(count)
    }

    /// `(finished, finished_late)` over finished assignments whose effective
    /// completion instant lies in `[start, end]`.
    pub async fn finished_counts_between(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<(i64, i64), StoreError> {
        let backend = self.dal.backend();
        let finished = AssignmentStatus::Finished.as_str();
        let counts = crate::interact_backend!(self.dal, |conn| {
            let in_window = || {
                assignments::table
                    .filter(assignments::status.eq(finished))
                    .filter(
                        assignments::completed_at.between(start, end).or(assignments::completed_at
                            .is_null()
                            .and(assignments::updated_at.between(start, end))),
                    )
            };
            let total: i64 = in_window().count().get_result(conn)?;
            let late: i64 = in_window()
                .filter(predicates::completed_after_deadline(
                    backend,
                    EFFECTIVE_COMPLETION,
                ))
                .count()
                .get_result(conn)?;
            Ok::<_, diesel::result::Error>((total, late))
        })?;
        Ok(counts)
    }

    pub async fn user_count(&self) -> Result<i64, StoreError> {
        let count = crate::interact_backend!(self.dal, |conn| {
            users::table.count().get_result::<i64>(conn)
        })?;
        Ok(count)
    }

    /// Incoming plus outgoing documents, all time.
    pub async fn document_total(&self) -> Result<i64, StoreError> {
        self.dal.directory().count_documents().await
    }

    /// Human-readable size of the database on disk.
    pub async fn storage_size(&self) -> Result<String, StoreError> {
        crate::backend_dispatch!(
            self.dal.backend(),
            self.storage_size_postgres().await,
            self.storage_size_sqlite().await
        )
    }

    #[cfg(feature = "postgres")]
    async fn storage_size_postgres(&self) -> Result<String, StoreError> {
        let conn = self
            .dal
            .database
            .get_postgres_connection()
            .await
            .map_err(|e| StoreError::ConnectionPool(e.to_string()))?;
        let row: PrettySize = conn
            .interact(|conn| {
                diesel::sql_query(
                    "SELECT pg_size_pretty(pg_database_size(current_database())) AS size",
                )
                .get_result(conn)
            })
            .await
            .map_err(|e| StoreError::ConnectionPool(e.to_string()))??;
        Ok(row.size)
    }

    #[cfg(feature = "sqlite")]
    async fn storage_size_sqlite(&self) -> Result<String, StoreError> {
        let conn = self
            .dal
            .database
            .get_sqlite_connection()
            .await
            .map_err(|e| StoreError::ConnectionPool(e.to_string()))?;
        let row: ByteSize = conn
            .interact(|conn| {
                diesel::sql_query(
                    "SELECT page_count * page_size AS size \
                     FROM pragma_page_count(), pragma_page_size()",
                )
                .get_result(conn)
            })
            .await
            .map_err(|e| StoreError::ConnectionPool(e.to_string()))??;
        Ok(pretty_size(row.size))
    }
}
