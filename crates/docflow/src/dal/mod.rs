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

//! Unified Data Access Layer with runtime backend selection.
//!
//! The [`DAL`] hands out one accessor per aggregate. Each accessor method
//! obtains a pooled connection for the active backend and runs its diesel
//! work inside the pool's `interact`, so the same query code serves
//! PostgreSQL and SQLite. Where the SQL genuinely differs between backends
//! the accessor splits into `_postgres` / `_sqlite` methods and dispatches
//! with [`backend_dispatch!`](crate::backend_dispatch).
//!
//! ```rust,ignore
//! let dal = DAL::new(Database::try_new("sqlite://docflow.db", 1, None)?);
//! let page = dal.assignment().list(&query, today).await?;
//! ```

use crate::database::{BackendType, Database};

pub mod acknowledgment;
pub mod assignment;
pub mod dashboard;
pub mod directory;
pub mod models;
pub mod predicates;

pub use acknowledgment::AcknowledgmentDAL;
pub use assignment::AssignmentDAL;
pub use dashboard::DashboardDAL;
pub use directory::DirectoryDAL;

/// Dispatches to backend-specific expressions.
///
/// ```rust,ignore
/// backend_dispatch!(
///     self.dal.backend(),
///     self.confirm_postgres(id).await,
///     self.confirm_sqlite(id).await
/// )
/// ```
#[macro_export]
macro_rules! backend_dispatch {
    ($backend:expr, $pg:expr, $sqlite:expr) => {
        match $backend {
            #[cfg(feature = "postgres")]
            $crate::database::BackendType::Postgres => $pg,
            #[cfg(feature = "sqlite")]
            $crate::database::BackendType::Sqlite => $sqlite,
        }
    };
}

/// Runs `body` on a pooled connection of whichever backend is active.
///
/// The body is expanded once per backend, so it must only use query
/// builder calls both backends support. It runs on a blocking thread and
/// must own everything it captures. Pool and interaction failures are
/// returned early as [`StoreError::ConnectionPool`](crate::error::StoreError);
/// the body's own result is the value of the macro.
///
/// ```rust,ignore
/// let count: i64 = interact_backend!(self.dal, |conn| {
///     users::table.count().get_result(conn)
/// })?;
/// ```
#[macro_export]
macro_rules! interact_backend {
    ($dal:expr, |$conn:ident| $body:expr) => {
        match $dal.backend() {
            #[cfg(feature = "postgres")]
            $crate::database::BackendType::Postgres => {
                let pooled = $dal
                    .database
                    .get_postgres_connection()
                    .await
                    .map_err(|e| $crate::error::StoreError::ConnectionPool(e.to_string()))?;
                pooled
                    .interact(move |$conn| $body)
                    .await
                    .map_err(|e| $crate::error::StoreError::ConnectionPool(e.to_string()))?
            }
            #[cfg(feature = "sqlite")]
            $crate::database::BackendType::Sqlite => {
                let pooled = $dal
                    .database
                    .get_sqlite_connection()
                    .await
                    .map_err(|e| $crate::error::StoreError::ConnectionPool(e.to_string()))?;
                pooled
                    .interact(move |$conn| $body)
                    .await
                    .map_err(|e| $crate::error::StoreError::ConnectionPool(e.to_string()))?
            }
        }
    };
}

/// The unified Data Access Layer.
///
/// `DAL` is `Clone`; clones share the underlying connection pool.
#[derive(Clone, Debug)]
pub struct DAL {
    pub database: Database,
}

impl DAL {
    pub fn new(database: Database) -> Self {
        DAL { database }
    }

    pub fn backend(&self) -> BackendType {
        self.database.backend()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn assignment(&self) -> AssignmentDAL {
        AssignmentDAL::new(self)
    }

    pub fn acknowledgment(&self) -> AcknowledgmentDAL {
        AcknowledgmentDAL::new(self)
    }

    pub fn dashboard(&self) -> DashboardDAL {
        DashboardDAL::new(self)
    }

    pub fn directory(&self) -> DirectoryDAL {
        DirectoryDAL::new(self)
    }
}
