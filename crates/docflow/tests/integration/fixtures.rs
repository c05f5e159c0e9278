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


//! Test fixtures: an isolated, migrated in-memory SQLite database per test,
//! seeded with one user per role and one document per register.

use std::sync::Once;

use chrono::{Duration, NaiveDate};
use docflow::config::WorkflowConfig;
use docflow::database::universal_types::today;
use docflow::database::{UniversalTimestamp, UniversalUuid};
use docflow::models::{
    Assignment, AssignmentStatus, Document, DocumentKind, NewDocument, NewUser, User,
};
use docflow::workflow::{
    AcknowledgmentWorkflow, AssignmentWorkflow, CreateAssignmentRequest, DashboardService,
};
use docflow::{Database, Role, DAL};
use tracing::info;

static INIT: Once = Once::new();

pub struct TestContext {
    pub dal: DAL,
    pub config: WorkflowConfig,
    pub admin: User,
    pub clerk: User,
    pub executor: User,
    pub colleague: User,
    pub incoming: Document,
    pub outgoing: Document,
}

impl TestContext {
    pub async fn new() -> Self {
        INIT.call_once(|| docflow::init_logging(Some("warn")));

        let url = format!(
            "file:docflow_{}?mode=memory&cache=shared",
            UniversalUuid::new_v4().as_uuid().simple()
        );
        let database = Database::try_new(&url, 1, None).expect("Failed to open test database");
        database
            .run_migrations()
            .await
            .expect("Failed to run migrations");
        let dal = DAL::new(database);
        info!(url = %url, "Test database ready");

        let admin = add_user(&dal, "admin", "Admin A.", &[Role::Admin]).await;
        let clerk = add_user(&dal, "clerk", "Clerk C.", &[Role::Clerk]).await;
        let executor = add_user(&dal, "exec", "Executor E.", &[Role::Executor]).await;
        let colleague = add_user(&dal, "colleague", "Colleague K.", &[Role::Executor]).await;
        let incoming = add_document(&dal, DocumentKind::Incoming, "IN-2026/014", "Budget request", None).await;
        let outgoing = add_document(&dal, DocumentKind::Outgoing, "OUT-2026/003", "Reply to ministry", None).await;

        Self {
            dal,
            config: WorkflowConfig::default(),
            admin,
            clerk,
            executor,
            colleague,
            incoming,
            outgoing,
        }
    }

    pub fn assignments(&self) -> AssignmentWorkflow {
        AssignmentWorkflow::new(self.dal.clone(), self.config.clone())
    }

    pub fn acknowledgments(&self) -> AcknowledgmentWorkflow {
        AcknowledgmentWorkflow::new(self.dal.clone())
    }

    pub fn dashboard(&self) -> DashboardService {
        DashboardService::new(self.dal.clone(), self.config.clone())
    }

    pub async fn add_user(&self, login: &str, roles: &[Role]) -> User {
        add_user(&self.dal, login, login, roles).await
    }

    pub async fn add_document(
        &self,
        kind: DocumentKind,
        number: &str,
        created_at: Option<UniversalTimestamp>,
    ) -> Document {
        add_document(&self.dal, kind, number, "Test document", created_at).await
    }

    /// A clerk-created assignment on the incoming document.
    pub async fn assign(&self, executor: &User, deadline: Option<NaiveDate>) -> Assignment {
        self.assign_with(executor, &[], deadline, "Prepare a reply").await
    }

    pub async fn assign_with(
        &self,
        executor: &User,
        co_executors: &[&User],
        deadline: Option<NaiveDate>,
        content: &str,
    ) -> Assignment {
        self.assignments()
            .create(
                Some(&self.clerk.actor()),
                CreateAssignmentRequest {
                    document_id: self.incoming.id.to_string(),
                    document_kind: "incoming".to_string(),
                    executor_id: executor.id.to_string(),
                    content: content.to_string(),
                    deadline: deadline.map(|d| d.format("%Y-%m-%d").to_string()),
                    co_executor_ids: co_executors.iter().map(|u| u.id.to_string()).collect(),
                },
            )
            .await
            .expect("Failed to create assignment")
    }

    /// Writes a status and completion instant directly, bypassing the policy.
    pub async fn force_status(
        &self,
        assignment: &Assignment,
        status: AssignmentStatus,
        completed_at: Option<UniversalTimestamp>,
    ) {
        let found = self
            .dal
            .assignment()
            .update_status(assignment.id, status, None, completed_at)
            .await
            .expect("Failed to force status");
        assert!(found, "assignment {} vanished", assignment.id);
    }
}

async fn add_user(dal: &DAL, login: &str, full_name: &str, roles: &[Role]) -> User {
    dal.directory()
        .create_user(NewUser {
            login: login.to_string(),
            full_name: full_name.to_string(),
            roles: roles.iter().copied().collect(),
        })
        .await
        .expect("Failed to create user")
}

async fn add_document(
    dal: &DAL,
    kind: DocumentKind,
    number: &str,
    subject: &str,
    created_at: Option<UniversalTimestamp>,
) -> Document {
    dal.directory()
        .create_document(NewDocument {
            kind,
            number: number.to_string(),
            subject: subject.to_string(),
            created_at,
        })
        .await
        .expect("Failed to create document")
}

pub fn days_from_today(days: i64) -> NaiveDate {
    today() + Duration::days(days)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(date: NaiveDate, h: u32, min: u32) -> UniversalTimestamp {
    UniversalTimestamp::from(date.and_hms_opt(h, min, 0).unwrap())
}
