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

//! Dashboard summary types and reporting-window resolution.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::assignment::Assignment;
use crate::identity::Role;

/// Role-specific dashboard summary.
///
/// Only the fields belonging to the resolved role are populated; the others
/// are omitted from the serialised form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub role: Role,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub my_assignments_new: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub my_assignments_in_progress: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub my_assignments_overdue: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub my_assignments_finished: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub my_assignments_finished_late: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub incoming_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outgoing_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_assignments_overdue: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_assignments_finished: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_assignments_finished_late: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_documents: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_size: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub expiring_assignments: Vec<Assignment>,
}

impl DashboardStats {
    /// An empty summary tagged with `role`.
    pub fn for_role(role: Role) -> Self {
        Self {
            role,
            my_assignments_new: None,
            my_assignments_in_progress: None,
            my_assignments_overdue: None,
            my_assignments_finished: None,
            my_assignments_finished_late: None,
            incoming_count: None,
            outgoing_count: None,
            all_assignments_overdue: None,
            all_assignments_finished: None,
            all_assignments_finished_late: None,
            user_count: None,
            total_documents: None,
            db_size: None,
            expiring_assignments: Vec::new(),
        }
    }
}

/// Named reporting periods, each ending today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Month,
    Quarter,
    Year,
}

impl Period {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "month" => Some(Period::Month),
            "quarter" => Some(Period::Quarter),
            "year" => Some(Period::Year),
            _ => None,
        }
    }

    /// First day of the period containing `today`.
    pub fn start_for(&self, today: NaiveDate) -> NaiveDate {
        let month = match self {
            Period::Month => today.month(),
            Period::Quarter => (today.month0() / 3) * 3 + 1,
            Period::Year => 1,
        };
        NaiveDate::from_ymd_opt(today.year(), month, 1).unwrap_or(today)
    }
}

/// An inclusive reporting window spanning whole calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportingWindow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl ReportingWindow {
    /// Resolves optional bounds against `today`: the start defaults to the first
    /// of the current month, the end to today.
    pub fn resolve(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<Self, String> {
        let start_date = start.unwrap_or_else(|| Period::Month.start_for(today));
        let end_date = end.unwrap_or(today);
        if start_date > end_date {
            return Err(format!(
                "start date {} is after end date {}",
                start_date, end_date
            ));
        }
        Ok(Self {
            start_date,
            end_date,
        })
    }

    pub fn for_period(period: Period, today: NaiveDate) -> Self {
        Self {
            start_date: period.start_for(today),
            end_date: today,
        }
    }

    /// First instant of the window (UTC).
    pub fn start(&self) -> NaiveDateTime {
        self.start_date.and_time(NaiveTime::MIN)
    }

    /// Last representable instant of the window at microsecond precision (UTC).
    pub fn end(&self) -> NaiveDateTime {
        self.end_date
            .and_hms_micro_opt(23, 59, 59, 999_999)
            .unwrap_or_else(|| self.end_date.and_time(NaiveTime::MIN))
    }
}
