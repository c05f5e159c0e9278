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

//! Role-specific dashboard summaries.

use chrono::{Duration, NaiveDate};
use tracing::{warn, Instrument};

use super::requests::StatsRequest;
use super::{non_blank, parse_date};
use crate::config::WorkflowConfig;
use crate::dal::DAL;
use crate::database::universal_types::today;
use crate::error::WorkflowError;
use crate::identity::{Actor, Role};
use crate::models::{AssignmentStatus, DashboardStats, Period, ReportingWindow};
use crate::policy::{self, Operation};

/// Shown instead of a storage size the backend cannot report.
pub const UNKNOWN_SIZE: &str = "N/A";

#[derive(Clone)]
pub struct DashboardService {
    dal: DAL,
    config: WorkflowConfig,
}

impl DashboardService {
    pub fn new(dal: DAL, config: WorkflowConfig) -> Self {
        Self { dal, config }
    }

    /// Builds the summary for the actor's dashboard role.
    ///
    /// `role` is honoured only if the actor holds it; otherwise admin, then
    /// clerk, then the executor view are tried in that order. `start_date`
    /// and `end_date` bound the clerk's reporting window.
    pub async fn get_stats(
        &self,
        actor: Option<&Actor>,
        role: Option<&str>,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<DashboardStats, WorkflowError> {
        self.stats(
            actor,
            StatsRequest {
                role: role.map(str::to_string),
                start_date: start_date.map(str::to_string),
                end_date: end_date.map(str::to_string),
                period: None,
            },
        )
        .await
    }

    /// Like [`get_stats`](Self::get_stats), taking the parameters as a request.
    pub async fn stats(
        &self,
        actor: Option<&Actor>,
        request: StatsRequest,
    ) -> Result<DashboardStats, WorkflowError> {
        let actor = policy::authorize(actor, Operation::ViewDashboard)?;
        let today = today();
        let requested = non_blank(request.role.as_deref()).and_then(Role::from_str);
        let role = policy::resolve_dashboard_role(actor, requested);
        let window = resolve_window(&request, today)?;

        let span = tracing::info_span!("dashboard.stats", actor_id = %actor.user_id, role = %role);
        async {
            match role {
                Role::Executor => self.executor_stats(actor, today).await,
                Role::Clerk => self.clerk_stats(window, today).await,
                Role::Admin => self.admin_stats().await,
            }
        }
        .instrument(span)
        .await
    }

    async fn executor_stats(
        &self,
        actor: &Actor,
        today: NaiveDate,
    ) -> Result<DashboardStats, WorkflowError> {
        let storage = WorkflowError::storage;
        let dashboard = self.dal.dashboard();
        let user = actor.user_id;
        let mut stats = DashboardStats::for_role(Role::Executor);

        stats.my_assignments_new = Some(
            dashboard
                .count_involving_with_status(user, AssignmentStatus::New)
                .await
                .map_err(storage("dashboard.executor"))?,
        );
        stats.my_assignments_in_progress = Some(
            dashboard
                .count_involving_with_status(user, AssignmentStatus::InProgress)
                .await
                .map_err(storage("dashboard.executor"))?,
        );
        stats.my_assignments_overdue = Some(
            dashboard
                .count_overdue_involving(user, today)
                .await
                .map_err(storage("dashboard.executor"))?,
        );
        let (finished, late) = dashboard
            .finished_counts_involving(user)
            .await
            .map_err(storage("dashboard.executor"))?;
        stats.my_assignments_finished = Some(finished);
        stats.my_assignments_finished_late = Some(late);

        stats.expiring_assignments = self
            .dal
            .assignment()
            .expiring(
                Some(user),
                today,
                today + Duration::days(self.config.executor_expiring_days),
            )
            .await
            .map_err(storage("dashboard.executor"))?;

        Ok(stats)
    }

    async fn clerk_stats(
        &self,
        window: ReportingWindow,
        today: NaiveDate,
    ) -> Result<DashboardStats, WorkflowError> {
        let storage = WorkflowError::storage;
        let dashboard = self.dal.dashboard();
        let mut stats = DashboardStats::for_role(Role::Clerk);

        let (incoming, outgoing) = dashboard
            .document_counts_between(window.start(), window.end())
            .await
            .map_err(storage("dashboard.clerk"))?;
        stats.incoming_count = Some(incoming);
        stats.outgoing_count = Some(outgoing);

        stats.all_assignments_overdue = Some(
            dashboard
                .count_overdue_with_deadline_between(window.start_date, window.end_date, today)
                .await
                .map_err(storage("dashboard.clerk"))?,
        );

        let (finished, late) = dashboard
            .finished_counts_between(window.start(), window.end())
            .await
            .map_err(storage("dashboard.clerk"))?;
        stats.all_assignments_finished = Some(finished);
        stats.all_assignments_finished_late = Some(late);

        stats.expiring_assignments = self
            .dal
            .assignment()
            .expiring(None, today, today + Duration::days(self.config.clerk_expiring_days))
            .await
            .map_err(storage("dashboard.clerk"))?;

        Ok(stats)
    }

    async fn admin_stats(&self) -> Result<DashboardStats, WorkflowError> {
        let dashboard = self.dal.dashboard();
        let mut stats = DashboardStats::for_role(Role::Admin);

        stats.user_count = Some(
            dashboard
                .user_count()
                .await
                .map_err(WorkflowError::storage("dashboard.admin"))?,
        );
        stats.total_documents = Some(
            dashboard
                .document_total()
                .await
                .map_err(WorkflowError::storage("dashboard.admin"))?,
        );
        stats.db_size = Some(match dashboard.storage_size().await {
            Ok(size) => size,
            Err(e) => {
                warn!(error = %e, "Database size unavailable");
                UNKNOWN_SIZE.to_string()
            }
        });

        Ok(stats)
    }
}

/// A named period wins over explicit dates; otherwise the dates are resolved
/// with their month-to-date defaults.
fn resolve_window(request: &StatsRequest, today: NaiveDate) -> Result<ReportingWindow, WorkflowError> {
    if let Some(name) = non_blank(request.period.as_deref()) {
        let period = Period::from_str(name)
            .ok_or_else(|| WorkflowError::Validation(format!("unknown period '{}'", name)))?;
        return Ok(ReportingWindow::for_period(period, today));
    }

    let start = parse_date("startDate", request.start_date.as_deref())?;
    let end = parse_date("endDate", request.end_date.as_deref())?;
    ReportingWindow::resolve(start, end, today).map_err(WorkflowError::Validation)
}
