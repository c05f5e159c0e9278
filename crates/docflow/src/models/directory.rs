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

//! Minimal user and document directory records the engine resolves names
//! and references against.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::assignment::DocumentKind;
use crate::database::{UniversalTimestamp, UniversalUuid};
use crate::identity::{Actor, Role};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UniversalUuid,
    pub login: String,
    pub full_name: String,
    pub roles: BTreeSet<Role>,
    pub created_at: UniversalTimestamp,
}

impl User {
    /// The credential this user acts with.
    pub fn actor(&self) -> Actor {
        Actor::new(self.id, self.roles.iter().copied())
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub login: String,
    pub full_name: String,
    pub roles: BTreeSet<Role>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: UniversalUuid,
    pub kind: DocumentKind,
    pub number: String,
    pub subject: String,
    pub created_at: UniversalTimestamp,
}

#[derive(Debug, Clone)]
pub struct NewDocument {
    pub kind: DocumentKind,
    pub number: String,
    pub subject: String,
    /// Registration instant; defaults to now.
    pub created_at: Option<UniversalTimestamp>,
}
