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

//! Structured audit events for workflow state changes.
//!
//! Each event carries an `event_type` field from [`events`] so log pipelines
//! can filter on it without parsing messages.

use crate::database::UniversalUuid;
use crate::models::AssignmentStatus;

pub mod events {
    pub const ASSIGNMENT_CREATED: &str = "assignment.created";
    pub const ASSIGNMENT_UPDATED: &str = "assignment.updated";
    pub const ASSIGNMENT_TRANSITIONED: &str = "assignment.transitioned";
    pub const ASSIGNMENT_TRANSITION_DENIED: &str = "assignment.transition.denied";
    pub const ASSIGNMENT_DELETED: &str = "assignment.deleted";

    pub const ACKNOWLEDGMENT_CREATED: &str = "acknowledgment.created";
    pub const ACKNOWLEDGMENT_VIEWED: &str = "acknowledgment.viewed";
    pub const ACKNOWLEDGMENT_CONFIRMED: &str = "acknowledgment.confirmed";
    pub const ACKNOWLEDGMENT_COMPLETED: &str = "acknowledgment.completed";
    pub const ACKNOWLEDGMENT_DELETED: &str = "acknowledgment.deleted";
}

pub fn log_assignment_created(actor: UniversalUuid, assignment: UniversalUuid, executor: UniversalUuid) {
    tracing::info!(
        event_type = events::ASSIGNMENT_CREATED,
        actor_id = %actor,
        assignment_id = %assignment,
        executor_id = %executor,
        "Assignment created"
    );
}

pub fn log_assignment_updated(actor: UniversalUuid, assignment: UniversalUuid) {
    tracing::info!(
        event_type = events::ASSIGNMENT_UPDATED,
        actor_id = %actor,
        assignment_id = %assignment,
        "Assignment details updated"
    );
}

pub fn log_assignment_transitioned(
    actor: UniversalUuid,
    assignment: UniversalUuid,
    from: AssignmentStatus,
    to: AssignmentStatus,
) {
    tracing::info!(
        event_type = events::ASSIGNMENT_TRANSITIONED,
        actor_id = %actor,
        assignment_id = %assignment,
        from = %from,
        to = %to,
        "Assignment status changed"
    );
}

pub fn log_assignment_transition_denied(
    actor: UniversalUuid,
    assignment: UniversalUuid,
    from: AssignmentStatus,
    to: AssignmentStatus,
) {
    tracing::warn!(
        event_type = events::ASSIGNMENT_TRANSITION_DENIED,
        actor_id = %actor,
        assignment_id = %assignment,
        from = %from,
        to = %to,
        "Assignment status change denied"
    );
}

pub fn log_assignment_deleted(actor: UniversalUuid, assignment: UniversalUuid) {
    tracing::warn!(
        event_type = events::ASSIGNMENT_DELETED,
        actor_id = %actor,
        assignment_id = %assignment,
        "Assignment deleted"
    );
}

pub fn log_acknowledgment_created(actor: UniversalUuid, task: UniversalUuid, recipients: usize) {
    tracing::info!(
        event_type = events::ACKNOWLEDGMENT_CREATED,
        actor_id = %actor,
        acknowledgment_id = %task,
        recipients,
        "Acknowledgment created"
    );
}

pub fn log_acknowledgment_viewed(actor: UniversalUuid, task: UniversalUuid) {
    tracing::debug!(
        event_type = events::ACKNOWLEDGMENT_VIEWED,
        actor_id = %actor,
        acknowledgment_id = %task,
        "Acknowledgment viewed"
    );
}

pub fn log_acknowledgment_confirmed(actor: UniversalUuid, task: UniversalUuid) {
    tracing::info!(
        event_type = events::ACKNOWLEDGMENT_CONFIRMED,
        actor_id = %actor,
        acknowledgment_id = %task,
        "Acknowledgment confirmed"
    );
}

pub fn log_acknowledgment_completed(task: UniversalUuid) {
    tracing::info!(
        event_type = events::ACKNOWLEDGMENT_COMPLETED,
        acknowledgment_id = %task,
        "All recipients confirmed; acknowledgment completed"
    );
}

pub fn log_acknowledgment_deleted(actor: UniversalUuid, task: UniversalUuid) {
    tracing::warn!(
        event_type = events::ACKNOWLEDGMENT_DELETED,
        actor_id = %actor,
        acknowledgment_id = %task,
        "Acknowledgment deleted"
    );
}
