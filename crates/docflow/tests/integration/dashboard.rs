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

use docflow::models::{AssignmentStatus, DocumentKind};
use docflow::workflow::StatsRequest;
use docflow::{Role, WorkflowError};

use crate::fixtures::{at, date, days_from_today, TestContext};

#[tokio::test]
async fn test_executor_dashboard_counts_own_and_co_executed_work() {
    let ctx = TestContext::new().await;
    let deadline = date(2025, 1, 10);

    let a1 = ctx.assign(&ctx.executor, Some(days_from_today(1))).await;
    let a2 = ctx.assign(&ctx.executor, Some(days_from_today(-1))).await;
    ctx.force_status(&a2, AssignmentStatus::InProgress, None).await;
    let a3 = ctx
        .assign_with(&ctx.colleague, &[&ctx.executor], Some(days_from_today(3)), "Help out")
        .await;
    let a4 = ctx.assign(&ctx.executor, Some(deadline)).await;
    ctx.force_status(&a4, AssignmentStatus::Completed, Some(at(date(2025, 1, 12), 9, 0)))
        .await;
    let a5 = ctx.assign(&ctx.executor, Some(deadline)).await;
    ctx.force_status(&a5, AssignmentStatus::Finished, Some(at(deadline, 23, 30)))
        .await;
    let a6 = ctx.assign(&ctx.executor, Some(deadline)).await;
    ctx.force_status(&a6, AssignmentStatus::Finished, Some(at(date(2025, 1, 11), 0, 10)))
        .await;
    ctx.assign(&ctx.colleague, Some(days_from_today(-3))).await;
    ctx.assign(&ctx.executor, Some(days_from_today(5))).await;

    let stats = ctx
        .dashboard()
        .get_stats(Some(&ctx.executor.actor()), None, None, None)
        .await
        .unwrap();

    assert_eq!(stats.role, Role::Executor);
    assert_eq!(stats.my_assignments_new, Some(3));
    assert_eq!(stats.my_assignments_in_progress, Some(1));
    assert_eq!(stats.my_assignments_overdue, Some(2));
    assert_eq!(stats.my_assignments_finished, Some(2));
    assert_eq!(stats.my_assignments_finished_late, Some(1));
    let expiring: Vec<_> = stats.expiring_assignments.iter().map(|a| a.id).collect();
    assert_eq!(expiring, vec![a1.id, a3.id]);

    assert_eq!(stats.incoming_count, None);
    assert_eq!(stats.user_count, None);
    assert_eq!(stats.db_size, None);
}

#[tokio::test]
async fn test_finished_without_completion_time_is_not_late_for_executor() {
    let ctx = TestContext::new().await;
    let unrecorded = ctx.assign(&ctx.executor, Some(days_from_today(-10))).await;
    ctx.force_status(&unrecorded, AssignmentStatus::Finished, None).await;

    let executor = ctx
        .dashboard()
        .get_stats(Some(&ctx.executor.actor()), None, None, None)
        .await
        .unwrap();
    assert_eq!(executor.my_assignments_finished, Some(1));
    assert_eq!(executor.my_assignments_finished_late, Some(0));

    // The clerk window dates it by its last update, which is after the deadline.
    let clerk = ctx
        .dashboard()
        .get_stats(Some(&ctx.clerk.actor()), None, None, None)
        .await
        .unwrap();
    assert_eq!(clerk.all_assignments_finished, Some(1));
    assert_eq!(clerk.all_assignments_finished_late, Some(1));
}

#[tokio::test]
async fn test_clerk_dashboard_reports_on_the_window() {
    let ctx = TestContext::new().await;
    ctx.add_document(DocumentKind::Incoming, "IN-2025/101", Some(at(date(2025, 3, 5), 11, 0)))
        .await;
    ctx.add_document(DocumentKind::Outgoing, "OUT-2025/040", Some(at(date(2025, 3, 31), 23, 0)))
        .await;
    ctx.add_document(DocumentKind::Incoming, "IN-2025/150", Some(at(date(2025, 4, 1), 0, 0)))
        .await;

    let deadline = date(2025, 3, 9);
    let late = ctx.assign(&ctx.executor, Some(deadline)).await;
    ctx.force_status(&late, AssignmentStatus::Finished, Some(at(date(2025, 3, 10), 10, 0)))
        .await;
    let on_time = ctx.assign(&ctx.executor, Some(deadline)).await;
    ctx.force_status(&on_time, AssignmentStatus::Finished, Some(at(date(2025, 3, 5), 15, 0)))
        .await;
    let earlier = ctx.assign(&ctx.executor, Some(date(2025, 2, 1))).await;
    ctx.force_status(&earlier, AssignmentStatus::Finished, Some(at(date(2025, 2, 20), 9, 0)))
        .await;
    ctx.assign(&ctx.executor, Some(date(2025, 3, 15))).await;
    ctx.assign(&ctx.colleague, Some(date(2025, 4, 2))).await;
    let soon = ctx.assign(&ctx.colleague, Some(days_from_today(5))).await;

    let stats = ctx
        .dashboard()
        .get_stats(
            Some(&ctx.clerk.actor()),
            None,
            Some("2025-03-01"),
            Some("2025-03-31"),
        )
        .await
        .unwrap();

    assert_eq!(stats.role, Role::Clerk);
    assert_eq!(stats.incoming_count, Some(1));
    assert_eq!(stats.outgoing_count, Some(1));
    assert_eq!(stats.all_assignments_overdue, Some(1));
    assert_eq!(stats.all_assignments_finished, Some(2));
    assert_eq!(stats.all_assignments_finished_late, Some(1));
    let expiring: Vec<_> = stats.expiring_assignments.iter().map(|a| a.id).collect();
    assert_eq!(expiring, vec![soon.id]);

    assert_eq!(stats.my_assignments_new, None);
    assert_eq!(stats.total_documents, None);
}

#[tokio::test]
async fn test_clerk_window_defaults_to_month_to_date() {
    let ctx = TestContext::new().await;
    let stats = ctx
        .dashboard()
        .get_stats(Some(&ctx.clerk.actor()), None, None, None)
        .await
        .unwrap();

    // The seeded documents were registered just now.
    assert_eq!(stats.incoming_count, Some(1));
    assert_eq!(stats.outgoing_count, Some(1));

    let yearly = ctx
        .dashboard()
        .stats(
            Some(&ctx.clerk.actor()),
            StatsRequest {
                period: Some("year".into()),
                start_date: Some("2030-01-01".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(yearly.incoming_count, Some(1));
}

#[tokio::test]
async fn test_admin_dashboard_reports_system_totals() {
    let ctx = TestContext::new().await;
    ctx.add_user("auditor", &[Role::Clerk, Role::Executor]).await;
    ctx.add_document(DocumentKind::Outgoing, "OUT-2026/004", None).await;

    let stats = ctx
        .dashboard()
        .get_stats(Some(&ctx.admin.actor()), None, None, None)
        .await
        .unwrap();

    assert_eq!(stats.role, Role::Admin);
    assert_eq!(stats.user_count, Some(5));
    assert_eq!(stats.total_documents, Some(3));
    let size = stats.db_size.expect("admin view carries a size");
    assert!(!size.is_empty());
    assert!(stats.expiring_assignments.is_empty());
    assert_eq!(stats.all_assignments_finished, None);
}

#[tokio::test]
async fn test_dashboard_role_resolution() {
    let ctx = TestContext::new().await;
    let dashboard = ctx.dashboard();
    let cases = [
        (ctx.admin.actor(), None, Role::Admin),
        (ctx.admin.actor(), Some("clerk"), Role::Admin),
        (ctx.admin.actor(), Some("executor"), Role::Admin),
        (ctx.clerk.actor(), None, Role::Clerk),
        (ctx.clerk.actor(), Some("admin"), Role::Clerk),
        (ctx.clerk.actor(), Some("executor"), Role::Clerk),
        (ctx.executor.actor(), Some("executor"), Role::Executor),
        (ctx.executor.actor(), Some("clerk"), Role::Executor),
        (ctx.executor.actor(), Some("admin"), Role::Executor),
        (ctx.clerk.actor(), Some("supervisor"), Role::Clerk),
    ];

    for (actor, requested, expected) in cases {
        let stats = dashboard
            .get_stats(Some(&actor), requested, None, None)
            .await
            .unwrap();
        assert_eq!(stats.role, expected, "requested {requested:?}");
    }

    let err = dashboard.get_stats(None, None, None, None).await.unwrap_err();
    assert!(matches!(err, WorkflowError::Unauthenticated));
}

#[tokio::test]
async fn test_inverted_window_is_rejected_for_every_view() {
    let ctx = TestContext::new().await;
    let dashboard = ctx.dashboard();

    for actor in [ctx.clerk.actor(), ctx.executor.actor(), ctx.admin.actor()] {
        let err = dashboard
            .get_stats(Some(&actor), None, Some("2025-03-31"), Some("2025-03-01"))
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Validation(_)));
    }
}

#[tokio::test]
async fn test_serialised_summary_omits_other_views() {
    let ctx = TestContext::new().await;
    ctx.assign(&ctx.executor, Some(days_from_today(2))).await;

    let stats = ctx
        .dashboard()
        .get_stats(Some(&ctx.executor.actor()), None, None, None)
        .await
        .unwrap();
    let json = serde_json::to_value(&stats).unwrap();
    let object = json.as_object().unwrap();

    assert!(object.contains_key("myAssignmentsNew"));
    assert!(object.contains_key("expiringAssignments"));
    for absent in ["incomingCount", "allAssignmentsOverdue", "userCount", "dbSize"] {
        assert!(!object.contains_key(absent), "{absent} should be omitted");
    }
}
