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

//! Domain models exchanged between the workflows, the DAL and callers.

pub mod acknowledgment;
pub mod assignment;
pub mod dashboard;
pub mod directory;

pub use acknowledgment::{
    AcknowledgmentRecipient, AcknowledgmentTask, ConfirmOutcome, NewAcknowledgment,
    RecipientUpdate,
};
pub use assignment::{
    Assignment, AssignmentQuery, AssignmentStatus, AssignmentUpdate, CoExecutor, DocumentKind,
    DocumentRef, NewAssignment, Page,
};
pub use dashboard::{DashboardStats, Period, ReportingWindow};
pub use directory::{Document, NewDocument, NewUser, User};
