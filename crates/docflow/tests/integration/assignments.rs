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


//! Assignment lifecycle: creation, transitions, edits, deletion and queries.

use docflow::database::universal_types::today;
use docflow::database::{UniversalTimestamp, UniversalUuid};
use docflow::models::AssignmentStatus;
use docflow::workflow::{
    AssignmentFilter, CreateAssignmentRequest, TransitionRequest, UpdateAssignmentRequest,
};
use docflow::{Role, WorkflowError};

use crate::fixtures::{at, date, days_from_today, TestContext};

fn transition(id: UniversalUuid, status: &str) -> TransitionRequest {
    TransitionRequest {
        id: id.to_string(),
        status: status.to_string(),
        report: None,
    }
}

#[tokio::test]
async fn test_create_then_get_round_trips_fields() {
    let ctx = TestContext::new().await;
    let deadline = date(2026, 12, 1);

    let created = ctx
        .assign_with(&ctx.executor, &[&ctx.colleague], Some(deadline), "Draft the budget reply")
        .await;

    let fetched = ctx
        .assignments()
        .get_by_id(Some(&ctx.executor.actor()), &created.id.to_string())
        .await
        .unwrap()
        .expect("assignment should exist");

    assert_eq!(fetched, created);
    assert_eq!(fetched.status, AssignmentStatus::New);
    assert_eq!(fetched.document.id, ctx.incoming.id);
    assert_eq!(fetched.executor_id, ctx.executor.id);
    assert_eq!(fetched.executor_name.as_deref(), Some("Executor E."));
    assert_eq!(fetched.content, "Draft the budget reply");
    assert_eq!(fetched.deadline, Some(deadline));
    assert_eq!(fetched.document_number.as_deref(), Some("IN-2026/014"));
    assert_eq!(fetched.document_subject.as_deref(), Some("Budget request"));
    assert_eq!(fetched.co_executors.len(), 1);
    assert_eq!(fetched.co_executors[0].user_id, ctx.colleague.id);
    assert_eq!(fetched.co_executors[0].full_name.as_deref(), Some("Colleague K."));
    assert_eq!(fetched.completed_at, None);
    assert_eq!(fetched.report, None);
}

#[tokio::test]
async fn test_get_unknown_id_is_none() {
    let ctx = TestContext::new().await;
    let missing = ctx
        .assignments()
        .get_by_id(Some(&ctx.clerk.actor()), &UniversalUuid::new_v4().to_string())
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_create_validates_input() {
    let ctx = TestContext::new().await;
    let workflow = ctx.assignments();
    let clerk = ctx.clerk.actor();
    let valid = CreateAssignmentRequest {
        document_id: ctx.incoming.id.to_string(),
        document_kind: "incoming".to_string(),
        executor_id: ctx.executor.id.to_string(),
        content: "Check figures".to_string(),
        deadline: None,
        co_executor_ids: vec![],
    };

    let err = workflow.create(None, valid.clone()).await.unwrap_err();
    assert!(matches!(err, WorkflowError::Unauthenticated));

    let err = workflow
        .create(Some(&clerk), CreateAssignmentRequest { document_id: "doc-1".into(), ..valid.clone() })
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::InvalidReference(_)));

    let err = workflow
        .create(Some(&clerk), CreateAssignmentRequest { document_kind: "memo".into(), ..valid.clone() })
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Validation(_)));

    let err = workflow
        .create(Some(&clerk), CreateAssignmentRequest { deadline: Some("01.12.2026".into()), ..valid.clone() })
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Validation(_)));

    let err = workflow
        .create(
            Some(&clerk),
            CreateAssignmentRequest { executor_id: UniversalUuid::new_v4().to_string(), ..valid.clone() },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::InvalidReference(_)));

    // Outgoing kind does not resolve an incoming document id.
    let err = workflow
        .create(Some(&clerk), CreateAssignmentRequest { document_kind: "outgoing".into(), ..valid.clone() })
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::InvalidReference(_)));

    // Creation carries no role restriction.
    let created = workflow
        .create(Some(&ctx.colleague.actor()), valid)
        .await
        .unwrap();
    assert_eq!(created.status, AssignmentStatus::New);
}

#[tokio::test]
async fn test_executor_works_an_assignment_to_completion() {
    let ctx = TestContext::new().await;
    let assignment = ctx.assign(&ctx.executor, None).await;
    let workflow = ctx.assignments();
    let executor = ctx.executor.actor();

    let started = workflow
        .transition_status(Some(&executor), transition(assignment.id, "in_progress"))
        .await
        .unwrap();
    assert_eq!(started.status, AssignmentStatus::InProgress);
    assert_eq!(started.completed_at, None);

    let before = UniversalTimestamp::now();
    let completed = workflow
        .transition_status(
            Some(&executor),
            TransitionRequest {
                report: Some("Reply sent".to_string()),
                ..transition(assignment.id, "completed")
            },
        )
        .await
        .unwrap();
    let after = UniversalTimestamp::now();

    assert_eq!(completed.status, AssignmentStatus::Completed);
    assert_eq!(completed.report.as_deref(), Some("Reply sent"));
    let stamped = completed.completed_at.expect("completion must be stamped");
    assert!(stamped >= before && stamped <= after);
}

#[tokio::test]
async fn test_reentering_active_states_clears_completion() {
    let ctx = TestContext::new().await;
    let assignment = ctx.assign(&ctx.executor, None).await;
    let workflow = ctx.assignments();

    workflow
        .transition_status(Some(&ctx.executor.actor()), transition(assignment.id, "completed"))
        .await
        .unwrap();

    for target in ["new", "in_progress", "returned", "cancelled"] {
        workflow
            .transition_status(Some(&ctx.admin.actor()), transition(assignment.id, "completed"))
            .await
            .unwrap();
        let moved = workflow
            .transition_status(Some(&ctx.admin.actor()), transition(assignment.id, target))
            .await
            .unwrap();
        assert_eq!(moved.status.as_str(), target);
        assert_eq!(moved.completed_at, None, "moving to {target} must clear completion");
    }
}

#[tokio::test]
async fn test_clerk_finishes_completed_work_and_keeps_completion_time() {
    let ctx = TestContext::new().await;
    let assignment = ctx.assign(&ctx.executor, None).await;
    let workflow = ctx.assignments();

    let completed = workflow
        .transition_status(Some(&ctx.executor.actor()), transition(assignment.id, "completed"))
        .await
        .unwrap();

    let finished = workflow
        .transition_status(Some(&ctx.clerk.actor()), transition(assignment.id, "finished"))
        .await
        .unwrap();
    assert_eq!(finished.status, AssignmentStatus::Finished);
    assert_eq!(finished.completed_at, completed.completed_at);
}

#[tokio::test]
async fn test_clerk_may_return_completed_work() {
    let ctx = TestContext::new().await;
    let assignment = ctx.assign(&ctx.executor, None).await;
    let workflow = ctx.assignments();
    workflow
        .transition_status(Some(&ctx.executor.actor()), transition(assignment.id, "completed"))
        .await
        .unwrap();

    let returned = workflow
        .transition_status(Some(&ctx.clerk.actor()), transition(assignment.id, "returned"))
        .await
        .unwrap();
    assert_eq!(returned.status, AssignmentStatus::Returned);
    assert_eq!(returned.completed_at, None);
}

#[tokio::test]
async fn test_executor_cannot_finish_own_assignment() {
    let ctx = TestContext::new().await;
    let assignment = ctx.assign(&ctx.executor, None).await;
    let workflow = ctx.assignments();
    workflow
        .transition_status(Some(&ctx.executor.actor()), transition(assignment.id, "completed"))
        .await
        .unwrap();

    let err = workflow
        .transition_status(Some(&ctx.executor.actor()), transition(assignment.id, "finished"))
        .await
        .unwrap_err();
    match err {
        WorkflowError::Forbidden(reason) => assert!(reason.contains("finished")),
        other => panic!("expected Forbidden, got {other:?}"),
    }

    let unchanged = workflow
        .get_by_id(Some(&ctx.admin.actor()), &assignment.id.to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged.status, AssignmentStatus::Completed);
}

#[tokio::test]
async fn test_clerk_cannot_finish_from_new() {
    let ctx = TestContext::new().await;
    let assignment = ctx.assign(&ctx.executor, None).await;

    let err = ctx
        .assignments()
        .transition_status(Some(&ctx.clerk.actor()), transition(assignment.id, "finished"))
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Forbidden(_)));
}

#[tokio::test]
async fn test_clerk_assigned_as_executor_cannot_start_work() {
    let ctx = TestContext::new().await;
    let registrar = ctx.add_user("registrar", &[Role::Clerk]).await;
    let assignment = ctx.assign(&registrar, None).await;
    let workflow = ctx.assignments();

    for target in ["in_progress", "completed"] {
        let err = workflow
            .transition_status(Some(&registrar.actor()), transition(assignment.id, target))
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Forbidden(_)), "{target}: {err:?}");
    }

    ctx.force_status(&assignment, AssignmentStatus::Completed, Some(UniversalTimestamp::now()))
        .await;
    let finished = workflow
        .transition_status(Some(&registrar.actor()), transition(assignment.id, "finished"))
        .await
        .unwrap();
    assert_eq!(finished.status, AssignmentStatus::Finished);
}

#[tokio::test]
async fn test_finished_reachable_only_by_admin_or_clerk_from_completed() {
    let ctx = TestContext::new().await;
    let workflow = ctx.assignments();
    let others = [ctx.executor.actor(), ctx.colleague.actor()];

    for from in AssignmentStatus::ALL {
        let assignment = ctx.assign(&ctx.executor, None).await;
        ctx.force_status(&assignment, from, None).await;

        for actor in &others {
            let result = workflow
                .transition_status(Some(actor), transition(assignment.id, "finished"))
                .await;
            assert!(
                matches!(result, Err(WorkflowError::Forbidden(_))),
                "non-staff moved {from} to finished"
            );
        }

        let clerk = workflow
            .transition_status(Some(&ctx.clerk.actor()), transition(assignment.id, "finished"))
            .await;
        assert_eq!(clerk.is_ok(), from == AssignmentStatus::Completed, "clerk from {from}");

        ctx.force_status(&assignment, from, None).await;
        let admin = workflow
            .transition_status(Some(&ctx.admin.actor()), transition(assignment.id, "finished"))
            .await;
        assert!(admin.is_ok(), "admin from {from}");
    }
}

#[tokio::test]
async fn test_bystanders_and_co_executors_cannot_transition() {
    let ctx = TestContext::new().await;
    let assignment = ctx
        .assign_with(&ctx.executor, &[&ctx.colleague], None, "Joint work")
        .await;
    let workflow = ctx.assignments();

    let err = workflow
        .transition_status(Some(&ctx.colleague.actor()), transition(assignment.id, "in_progress"))
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Forbidden(_)));

    let err = workflow
        .transition_status(None, transition(assignment.id, "in_progress"))
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Unauthenticated));
}

#[tokio::test]
async fn test_transition_rejects_unknown_status_and_missing_assignment() {
    let ctx = TestContext::new().await;
    let assignment = ctx.assign(&ctx.executor, None).await;
    let workflow = ctx.assignments();

    let err = workflow
        .transition_status(Some(&ctx.admin.actor()), transition(assignment.id, "archived"))
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Validation(_)));

    let err = workflow
        .transition_status(Some(&ctx.admin.actor()), transition(UniversalUuid::new_v4(), "new"))
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::NotFound(_)));
}

#[tokio::test]
async fn test_omitted_report_keeps_the_stored_one() {
    let ctx = TestContext::new().await;
    let assignment = ctx.assign(&ctx.executor, None).await;
    let workflow = ctx.assignments();
    let executor = ctx.executor.actor();

    workflow
        .transition_status(
            Some(&executor),
            TransitionRequest {
                report: Some("First draft".into()),
                ..transition(assignment.id, "in_progress")
            },
        )
        .await
        .unwrap();
    let completed = workflow
        .transition_status(Some(&executor), transition(assignment.id, "completed"))
        .await
        .unwrap();
    assert_eq!(completed.report.as_deref(), Some("First draft"));

    let returned = workflow
        .transition_status(
            Some(&ctx.clerk.actor()),
            TransitionRequest {
                report: Some("Needs a signature".into()),
                ..transition(assignment.id, "returned")
            },
        )
        .await
        .unwrap();
    assert_eq!(returned.report.as_deref(), Some("Needs a signature"));
}

#[tokio::test]
async fn test_update_details_replaces_fields_and_preserves_state() {
    let ctx = TestContext::new().await;
    let assignment = ctx
        .assign_with(&ctx.executor, &[&ctx.colleague], None, "Original")
        .await;
    let workflow = ctx.assignments();
    workflow
        .transition_status(
            Some(&ctx.executor.actor()),
            TransitionRequest {
                report: Some("Done".into()),
                ..transition(assignment.id, "completed")
            },
        )
        .await
        .unwrap();

    let third = ctx.add_user("third", &[Role::Executor]).await;
    let request = UpdateAssignmentRequest {
        id: assignment.id.to_string(),
        executor_id: ctx.colleague.id.to_string(),
        content: "Revised".to_string(),
        deadline: Some("2027-01-15".to_string()),
        co_executor_ids: vec![third.id.to_string()],
    };

    let err = workflow
        .update_details(Some(&ctx.executor.actor()), request.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Forbidden(_)));

    let updated = workflow
        .update_details(Some(&ctx.clerk.actor()), request)
        .await
        .unwrap();
    assert_eq!(updated.executor_id, ctx.colleague.id);
    assert_eq!(updated.content, "Revised");
    assert_eq!(updated.deadline, Some(date(2027, 1, 15)));
    assert_eq!(updated.co_executors.len(), 1);
    assert_eq!(updated.co_executors[0].user_id, third.id);
    assert_eq!(updated.status, AssignmentStatus::Completed);
    assert_eq!(updated.report.as_deref(), Some("Done"));
    assert!(updated.completed_at.is_some());
}

#[tokio::test]
async fn test_finished_assignments_are_admin_only() {
    let ctx = TestContext::new().await;
    let assignment = ctx.assign(&ctx.executor, None).await;
    ctx.force_status(&assignment, AssignmentStatus::Finished, Some(UniversalTimestamp::now()))
        .await;
    let workflow = ctx.assignments();
    let request = UpdateAssignmentRequest {
        id: assignment.id.to_string(),
        executor_id: ctx.executor.id.to_string(),
        content: "Late edit".to_string(),
        deadline: None,
        co_executor_ids: vec![],
    };

    let err = workflow
        .update_details(Some(&ctx.clerk.actor()), request.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::InvalidState(_)));

    let err = workflow
        .delete(Some(&ctx.clerk.actor()), &assignment.id.to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::InvalidState(_)));

    let edited = workflow
        .update_details(Some(&ctx.admin.actor()), request)
        .await
        .unwrap();
    assert_eq!(edited.content, "Late edit");
    assert_eq!(edited.status, AssignmentStatus::Finished);

    workflow
        .delete(Some(&ctx.admin.actor()), &assignment.id.to_string())
        .await
        .unwrap();
    assert!(workflow
        .get_by_id(Some(&ctx.admin.actor()), &assignment.id.to_string())
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_update_of_missing_assignment_is_not_found() {
    let ctx = TestContext::new().await;
    let err = ctx
        .assignments()
        .update_details(
            Some(&ctx.clerk.actor()),
            UpdateAssignmentRequest {
                id: UniversalUuid::new_v4().to_string(),
                executor_id: ctx.executor.id.to_string(),
                content: "Nothing".to_string(),
                deadline: None,
                co_executor_ids: vec![],
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::NotFound(_)));
}

#[tokio::test]
async fn test_delete_removes_co_executors_and_ignores_absent_ids() {
    let ctx = TestContext::new().await;
    let assignment = ctx
        .assign_with(&ctx.executor, &[&ctx.colleague], None, "To be dropped")
        .await;
    let workflow = ctx.assignments();

    let err = workflow
        .delete(Some(&ctx.executor.actor()), &assignment.id.to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Forbidden(_)));

    workflow
        .delete(Some(&ctx.clerk.actor()), &assignment.id.to_string())
        .await
        .unwrap();
    workflow
        .delete(Some(&ctx.clerk.actor()), &assignment.id.to_string())
        .await
        .unwrap();

    let listed = workflow
        .get_list(
            Some(&ctx.clerk.actor()),
            AssignmentFilter {
                executor_id: Some(ctx.colleague.id.to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(listed.total_count, 0);
}

#[tokio::test]
async fn test_list_filters() {
    let ctx = TestContext::new().await;
    let mine = ctx.assign(&ctx.executor, Some(date(2026, 3, 10))).await;
    let shared = ctx
        .assign_with(&ctx.colleague, &[&ctx.executor], Some(date(2026, 3, 20)), "Shared task")
        .await;
    ctx.assign(&ctx.colleague, None).await;
    let done = ctx.assign(&ctx.executor, None).await;
    ctx.force_status(&done, AssignmentStatus::Finished, Some(UniversalTimestamp::now()))
        .await;
    let workflow = ctx.assignments();
    let clerk = ctx.clerk.actor();

    // Executor filter covers co-executors and hides finished work by default.
    let page = workflow
        .get_list(
            Some(&clerk),
            AssignmentFilter {
                executor_id: Some(ctx.executor.id.to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let mut ids: Vec<_> = page.items.iter().map(|a| a.id).collect();
    let mut expected = vec![shared.id, mine.id];
    ids.sort();
    expected.sort();
    assert_eq!(page.total_count, 2);
    assert_eq!(ids, expected);

    let page = workflow
        .get_list(
            Some(&clerk),
            AssignmentFilter {
                executor_id: Some(ctx.executor.id.to_string()),
                show_finished: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(page.total_count, 3);

    // An explicit finished filter needs show_finished.
    let page = workflow
        .get_list(
            Some(&clerk),
            AssignmentFilter {
                status: Some("finished".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.total_count, 0);

    let page = workflow
        .get_list(
            Some(&clerk),
            AssignmentFilter {
                status: Some("finished".into()),
                show_finished: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(page.items.iter().map(|a| a.id).collect::<Vec<_>>(), vec![done.id]);

    // Search is case-insensitive over content and document fields.
    let page = workflow
        .get_list(
            Some(&clerk),
            AssignmentFilter {
                search: Some("SHARED".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(page.items.iter().map(|a| a.id).collect::<Vec<_>>(), vec![shared.id]);

    let page = workflow
        .get_list(
            Some(&clerk),
            AssignmentFilter {
                search: Some("in-2026/014".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(page.total_count, 3);

    let page = workflow
        .get_list(
            Some(&clerk),
            AssignmentFilter {
                deadline_from: Some("2026-03-15".into()),
                deadline_to: Some("2026-03-31".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(page.items.iter().map(|a| a.id).collect::<Vec<_>>(), vec![shared.id]);

    let page = workflow
        .get_list(
            Some(&clerk),
            AssignmentFilter {
                document_id: Some(ctx.outgoing.id.to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(page.total_count, 0);

    let err = workflow
        .get_list(
            Some(&clerk),
            AssignmentFilter {
                executor_id: Some("someone".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::InvalidReference(_)));

    let err = workflow.get_list(None, AssignmentFilter::default()).await.unwrap_err();
    assert!(matches!(err, WorkflowError::Unauthenticated));
}

#[tokio::test]
async fn test_list_pagination_is_clamped() {
    let ctx = TestContext::new().await;
    for _ in 0..3 {
        ctx.assign(&ctx.executor, None).await;
    }
    let workflow = ctx.assignments();
    let clerk = ctx.clerk.actor();

    let page = workflow
        .get_list(
            Some(&clerk),
            AssignmentFilter {
                page: Some(0),
                page_size: Some(0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!((page.page, page.page_size), (1, 20));
    assert_eq!(page.items.len(), 3);

    let page = workflow
        .get_list(
            Some(&clerk),
            AssignmentFilter {
                page: Some(2),
                page_size: Some(2),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.total_count, 3);
    assert_eq!(page.total_pages(), 2);

    let page = workflow
        .get_list(
            Some(&clerk),
            AssignmentFilter {
                page_size: Some(10_000),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(page.page_size, 100);
}

#[tokio::test]
async fn test_list_page_far_past_the_end_is_empty() {
    let ctx = TestContext::new().await;
    for _ in 0..3 {
        ctx.assign(&ctx.executor, None).await;
    }

    let page = ctx
        .assignments()
        .get_list(
            Some(&ctx.clerk.actor()),
            AssignmentFilter {
                page: Some(i64::MAX),
                page_size: Some(100),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.total_count, 3);
    assert_eq!(page.page, i64::MAX);
}

#[tokio::test]
async fn test_deadline_yesterday_is_overdue() {
    let ctx = TestContext::new().await;
    let assignment = ctx.assign(&ctx.executor, Some(days_from_today(-1))).await;
    assert!(assignment.is_overdue(today()));

    let page = ctx
        .assignments()
        .get_list(
            Some(&ctx.clerk.actor()),
            AssignmentFilter {
                overdue_only: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(page.items.iter().map(|a| a.id).collect::<Vec<_>>(), vec![assignment.id]);
}

#[tokio::test]
async fn test_overdue_filter_agrees_with_domain_predicate() {
    let ctx = TestContext::new().await;
    let deadline = date(2026, 2, 10);
    let cases = [
        (AssignmentStatus::New, Some(days_from_today(-1)), None),
        (AssignmentStatus::New, Some(today()), None),
        (AssignmentStatus::New, None, None),
        (AssignmentStatus::InProgress, Some(days_from_today(-30)), None),
        (AssignmentStatus::InProgress, Some(days_from_today(2)), None),
        (AssignmentStatus::Completed, Some(deadline), Some(at(deadline, 23, 30))),
        (AssignmentStatus::Completed, Some(deadline), Some(at(date(2026, 2, 11), 0, 10))),
        (AssignmentStatus::Returned, Some(days_from_today(-5)), None),
        (AssignmentStatus::Cancelled, Some(days_from_today(-5)), None),
        (AssignmentStatus::Finished, Some(deadline), Some(at(date(2026, 2, 12), 9, 0))),
    ];
    for (status, deadline, completed_at) in cases {
        let assignment = ctx.assign(&ctx.executor, deadline).await;
        ctx.force_status(&assignment, status, completed_at).await;
    }

    let workflow = ctx.assignments();
    let clerk = ctx.clerk.actor();
    let everything = workflow
        .get_list(
            Some(&clerk),
            AssignmentFilter {
                show_finished: true,
                page_size: Some(100),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(everything.total_count, cases.len() as i64);

    let overdue = workflow
        .get_list(
            Some(&clerk),
            AssignmentFilter {
                show_finished: true,
                overdue_only: true,
                page_size: Some(100),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let today = today();
    let mut expected: Vec<_> = everything
        .items
        .iter()
        .filter(|a| a.is_overdue(today))
        .map(|a| a.id)
        .collect();
    let mut actual: Vec<_> = overdue.items.iter().map(|a| a.id).collect();
    expected.sort();
    actual.sort();
    assert_eq!(actual, expected);
    assert_eq!(actual.len(), 3);
}
