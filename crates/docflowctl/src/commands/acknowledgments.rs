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


//! Implementation of the `acknowledgments pending` command.

use anyhow::{Context, Result};
use docflow::config::DocflowConfig;
use docflow::workflow::AcknowledgmentWorkflow;
use tracing::info;

pub async fn pending(config: &DocflowConfig, login: &str) -> Result<()> {
    let dal = super::connect(config).await?;
    let actor = super::actor_for_login(&dal, login).await?;

    let tasks = AcknowledgmentWorkflow::new(dal)
        .get_pending_for_user(Some(&actor), None)
        .await
        .context("Failed to list pending acknowledgments")?;

    info!(count = tasks.len(), login, "Pending acknowledgments");
    println!("{}", serde_json::to_string_pretty(&tasks)?);
    Ok(())
}
