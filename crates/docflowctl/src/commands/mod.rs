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


//! Subcommand implementations.

pub mod acknowledgments;
pub mod dashboard;
pub mod directory;
pub mod migrate;

use anyhow::{anyhow, Context, Result};
use docflow::config::DocflowConfig;
use docflow::{Actor, DAL};

/// Opens the configured database.
pub async fn connect(config: &DocflowConfig) -> Result<DAL> {
    let database = config
        .database
        .connect()
        .with_context(|| format!("Failed to connect to database at {}", config.database.url))?;
    Ok(DAL::new(database))
}

/// Resolves a login into the credential commands act with.
pub async fn actor_for_login(dal: &DAL, login: &str) -> Result<Actor> {
    let user = dal
        .directory()
        .find_user_by_login(login)
        .await
        .context("Failed to look up user")?
        .ok_or_else(|| anyhow!("No user with login '{}'", login))?;
    Ok(user.actor())
}
