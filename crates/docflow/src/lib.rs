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

//! # docflow
//!
//! The workflow and notification engine behind an office document-registration
//! application. Three pieces of behaviour live here:
//!
//! - the **assignment lifecycle**: a role-gated state machine over work items
//!   delegated to staff, including completion timestamps and deadline lateness;
//! - the **acknowledgment fan-out**: one task broadcast to many recipients, each
//!   of whom views and confirms it, with the task completing atomically once the
//!   last recipient confirms;
//! - the **dashboard aggregation**: role-specific counts and expiring lists
//!   computed over the same records.
//!
//! Persistence runs on diesel with runtime selection between PostgreSQL and
//! SQLite (see [`database::Database`]). Callers authenticate elsewhere and pass
//! an explicit [`Actor`] into every workflow operation.
//!
//! ```rust,ignore
//! use docflow::{Database, DAL, Actor, Role};
//! use docflow::workflow::AssignmentWorkflow;
//!
//! let database = Database::try_new("sqlite://docflow.db", 1, None)?;
//! database.run_migrations().await?;
//! let workflow = AssignmentWorkflow::new(DAL::new(database), Default::default());
//! let clerk = Actor::new(clerk_id, [Role::Clerk]);
//! let page = workflow.get_list(Some(&clerk), Default::default()).await?;
//! ```

#[cfg(not(any(feature = "postgres", feature = "sqlite")))]
compile_error!("at least one of the `postgres` or `sqlite` features must be enabled");

pub mod config;
pub mod dal;
pub mod database;
pub mod error;
pub mod identity;
pub mod logging;
pub mod models;
pub mod policy;
pub mod workflow;

pub use dal::DAL;
pub use database::{BackendType, Database};
pub use error::{StoreError, WorkflowError};
pub use identity::{Actor, Role};
pub use logging::init_logging;
