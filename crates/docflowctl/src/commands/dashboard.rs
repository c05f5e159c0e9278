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


//! Implementation of the `dashboard stats` command.

use anyhow::{Context, Result};
use docflow::config::DocflowConfig;
use docflow::workflow::{DashboardService, StatsRequest};

pub struct StatsArgs {
    pub role: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub period: Option<String>,
}

pub async fn stats(config: &DocflowConfig, login: &str, args: StatsArgs) -> Result<()> {
    let dal = super::connect(config).await?;
    let actor = super::actor_for_login(&dal, login).await?;

    let service = DashboardService::new(dal, config.workflow.clone());
    let summary = service
        .stats(
            Some(&actor),
            StatsRequest {
                role: args.role,
                start_date: args.start,
                end_date: args.end,
                period: args.period,
            },
        )
        .await
        .context("Failed to compute dashboard")?;

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
