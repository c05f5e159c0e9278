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

//! SQL predicates shared by list and dashboard queries.
//!
//! These are the query-side twins of [`Assignment::is_overdue`] and
//! [`Assignment::is_finished_late`]; both sides compare the calendar date of a
//! completion instant (UTC) with the deadline date. Only values the engine
//! formats itself (dates, UUIDs) are ever spliced into the SQL text.
//!
//! [`Assignment::is_overdue`]: crate::models::Assignment::is_overdue
//! [`Assignment::is_finished_late`]: crate::models::Assignment::is_finished_late

use chrono::NaiveDate;
use diesel::dsl::sql;
use diesel::expression::SqlLiteral;
use diesel::sql_types::Bool;

use crate::database::{BackendType, UniversalUuid};

/// SQL for the calendar date of a timestamp expression.
pub fn calendar_date(backend: BackendType, expr: &str) -> String {
    match backend {
        #[cfg(feature = "postgres")]
        BackendType::Postgres => format!("CAST({} AS DATE)", expr),
        #[cfg(feature = "sqlite")]
        BackendType::Sqlite => format!("date({})", expr),
    }
}

fn date_literal(date: NaiveDate) -> String {
    format!("'{}'", date.format("%Y-%m-%d"))
}

/// SQL text of the overdue rule, evaluated against `today`.
pub fn overdue_sql(backend: BackendType, today: NaiveDate) -> String {
    format!(
        "((assignments.status IN ('new', 'in_progress') AND assignments.deadline < {today}) \
         OR (assignments.status = 'completed' AND {completed} > assignments.deadline))",
        today = date_literal(today),
        completed = calendar_date(backend, "assignments.completed_at"),
    )
}

/// Assignments that are overdue on `today`.
pub fn overdue(backend: BackendType, today: NaiveDate) -> SqlLiteral<Bool> {
    sql::<Bool>(&overdue_sql(backend, today))
}

/// Rows whose `instant_column` falls on a calendar date after the deadline.
pub fn completed_after_deadline(backend: BackendType, instant_column: &str) -> SqlLiteral<Bool> {
    sql::<Bool>(&format!(
        "{} > assignments.deadline",
        calendar_date(backend, instant_column)
    ))
}

/// Assignments where `user` is the primary executor or a co-executor.
pub fn involving(user: UniversalUuid) -> SqlLiteral<Bool> {
    sql::<Bool>(&format!(
        "(assignments.executor_id = '{user}' OR EXISTS (\
         SELECT 1 FROM assignment_co_executors ce \
         WHERE ce.assignment_id = assignments.id AND ce.user_id = '{user}'))",
        user = user
    ))
}
