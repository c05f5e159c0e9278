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

//! Authorization policy.
//!
//! Every permission decision the workflows make is looked up in the tables in
//! this module: which roles may perform an operation, which status moves each
//! capacity may make, and which dashboard view a role set resolves to.

use crate::error::WorkflowError;
use crate::identity::{Actor, Role};
use crate::models::{Assignment, AssignmentStatus};

/// Operations gated by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CreateAssignment,
    ViewAssignments,
    UpdateAssignment,
    DeleteAssignment,
    /// Editing or deleting an assignment whose status is `finished`.
    ModifyFinishedAssignment,
    CreateAcknowledgment,
    DeleteAcknowledgment,
    ViewAcknowledgments,
    ListActiveAcknowledgments,
    /// Reading another user's pending acknowledgments.
    ViewOthersAcknowledgments,
    ViewDashboard,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::CreateAssignment => "create assignments",
            Operation::ViewAssignments => "view assignments",
            Operation::UpdateAssignment => "update assignments",
            Operation::DeleteAssignment => "delete assignments",
            Operation::ModifyFinishedAssignment => "modify finished assignments",
            Operation::CreateAcknowledgment => "create acknowledgments",
            Operation::DeleteAcknowledgment => "delete acknowledgments",
            Operation::ViewAcknowledgments => "view acknowledgments",
            Operation::ListActiveAcknowledgments => "list active acknowledgments",
            Operation::ViewOthersAcknowledgments => "view other users' acknowledgments",
            Operation::ViewDashboard => "view the dashboard",
        }
    }
}

/// Who may perform an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Any authenticated actor.
    Authenticated,
    /// An actor holding at least one of the listed roles.
    AnyRole(&'static [Role]),
}

const STAFF: &[Role] = &[Role::Admin, Role::Clerk];

pub const OPERATION_RULES: &[(Operation, Requirement)] = &[
    (Operation::CreateAssignment, Requirement::Authenticated),
    (Operation::ViewAssignments, Requirement::Authenticated),
    (Operation::UpdateAssignment, Requirement::AnyRole(STAFF)),
    (Operation::DeleteAssignment, Requirement::AnyRole(STAFF)),
    (Operation::ModifyFinishedAssignment, Requirement::AnyRole(&[Role::Admin])),
    (Operation::CreateAcknowledgment, Requirement::AnyRole(STAFF)),
    (Operation::DeleteAcknowledgment, Requirement::AnyRole(STAFF)),
    (Operation::ViewAcknowledgments, Requirement::Authenticated),
    (Operation::ListActiveAcknowledgments, Requirement::AnyRole(STAFF)),
    (Operation::ViewOthersAcknowledgments, Requirement::AnyRole(STAFF)),
    (Operation::ViewDashboard, Requirement::Authenticated),
];

/// The capacity in which an actor attempts a status transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capacity {
    Holder(Role),
    /// The assignment's own primary executor, whatever roles they hold.
    AssignedExecutor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusSet {
    Any,
    OneOf(&'static [AssignmentStatus]),
}

impl StatusSet {
    pub fn contains(&self, status: AssignmentStatus) -> bool {
        match self {
            StatusSet::Any => true,
            StatusSet::OneOf(set) => set.contains(&status),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRule {
    pub capacity: Capacity,
    pub from: StatusSet,
    pub to: StatusSet,
}

/// Allowed assignment status moves, in priority order. Only the first rule
/// whose capacity the actor holds is consulted.
pub const TRANSITION_RULES: &[TransitionRule] = &[
    TransitionRule {
        capacity: Capacity::Holder(Role::Admin),
        from: StatusSet::Any,
        to: StatusSet::Any,
    },
    TransitionRule {
        capacity: Capacity::Holder(Role::Clerk),
        from: StatusSet::OneOf(&[AssignmentStatus::Completed]),
        to: StatusSet::OneOf(&[AssignmentStatus::Finished, AssignmentStatus::Returned]),
    },
    TransitionRule {
        capacity: Capacity::AssignedExecutor,
        from: StatusSet::OneOf(&[AssignmentStatus::New, AssignmentStatus::InProgress]),
        to: StatusSet::OneOf(&[AssignmentStatus::InProgress, AssignmentStatus::Completed]),
    },
];

/// Dashboard views in descending priority.
pub const DASHBOARD_ROLE_PRIORITY: [Role; 3] = [Role::Admin, Role::Clerk, Role::Executor];

/// Returns the actor, or `Unauthenticated` if there is none.
pub fn require_actor(actor: Option<&Actor>) -> Result<&Actor, WorkflowError> {
    actor.ok_or(WorkflowError::Unauthenticated)
}

fn requirement_for(operation: Operation) -> Requirement {
    OPERATION_RULES
        .iter()
        .find(|(op, _)| *op == operation)
        .map(|(_, requirement)| *requirement)
        // Operations missing from the table are closed to everyone but admins.
        .unwrap_or(Requirement::AnyRole(&[Role::Admin]))
}

/// Whether `actor` may perform `operation`.
pub fn permits(actor: &Actor, operation: Operation) -> bool {
    match requirement_for(operation) {
        Requirement::Authenticated => true,
        Requirement::AnyRole(roles) => actor.has_any_role(roles),
    }
}

/// Checks authentication and the role requirement for `operation`.
pub fn authorize(actor: Option<&Actor>, operation: Operation) -> Result<&Actor, WorkflowError> {
    let actor = require_actor(actor)?;
    if permits(actor, operation) {
        Ok(actor)
    } else {
        Err(WorkflowError::Forbidden(format!(
            "not permitted to {}",
            operation.as_str()
        )))
    }
}

fn holds_capacity(actor: &Actor, assignment: &Assignment, capacity: Capacity) -> bool {
    match capacity {
        Capacity::Holder(role) => actor.has_role(role),
        Capacity::AssignedExecutor => assignment.executor_id == actor.user_id,
    }
}

/// Whether `actor` may move `assignment` into `target`.
///
/// Decided by the first rule whose capacity the actor holds, so a clerk who
/// is also the assigned executor is bound by the clerk rule alone.
pub fn transition_permitted(actor: &Actor, assignment: &Assignment, target: AssignmentStatus) -> bool {
    TRANSITION_RULES
        .iter()
        .find(|rule| holds_capacity(actor, assignment, rule.capacity))
        .map(|rule| rule.from.contains(assignment.status) && rule.to.contains(target))
        .unwrap_or(false)
}

/// Checks a status transition against [`TRANSITION_RULES`].
pub fn authorize_transition(
    actor: &Actor,
    assignment: &Assignment,
    target: AssignmentStatus,
) -> Result<(), WorkflowError> {
    if transition_permitted(actor, assignment, target) {
        Ok(())
    } else {
        Err(WorkflowError::Forbidden(format!(
            "cannot move assignment from {} to {}",
            assignment.status, target
        )))
    }
}

/// Picks the dashboard view for `actor`.
///
/// A requested role is honoured only when held. Otherwise the highest-priority
/// held role wins, and actors holding neither admin nor clerk get the
/// executor view.
pub fn resolve_dashboard_role(actor: &Actor, requested: Option<Role>) -> Role {
    if let Some(role) = requested {
        if actor.has_role(role) {
            return role;
        }
    }
    DASHBOARD_ROLE_PRIORITY
        .into_iter()
        .find(|role| actor.has_role(*role))
        .unwrap_or(Role::Executor)
}
