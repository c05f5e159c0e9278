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


//! Implementation of the `directory` commands.

use anyhow::{anyhow, Context, Result};
use docflow::config::DocflowConfig;
use docflow::models::{DocumentKind, NewDocument, NewUser};
use docflow::Role;
use tracing::info;

pub async fn add_user(
    config: &DocflowConfig,
    login: String,
    full_name: String,
    roles: &str,
) -> Result<()> {
    let roles = Role::parse_list(roles);
    if roles.is_empty() {
        return Err(anyhow!("At least one role is required (admin, clerk, executor)"));
    }

    let dal = super::connect(config).await?;
    let user = dal
        .directory()
        .create_user(NewUser {
            login,
            full_name,
            roles,
        })
        .await
        .context("Failed to create user")?;

    info!(user_id = %user.id, login = %user.login, "User added");
    println!("{}", user.id);
    Ok(())
}

pub async fn add_document(
    config: &DocflowConfig,
    kind: &str,
    number: String,
    subject: String,
) -> Result<()> {
    let kind = DocumentKind::from_str(kind)
        .ok_or_else(|| anyhow!("Unknown document kind '{}'. Use incoming or outgoing", kind))?;

    let dal = super::connect(config).await?;
    let document = dal
        .directory()
        .create_document(NewDocument {
            kind,
            number,
            subject,
            created_at: None,
        })
        .await
        .context("Failed to register document")?;

    info!(document_id = %document.id, kind = %kind, number = %document.number, "Document registered");
    println!("{}", document.id);
    Ok(())
}
