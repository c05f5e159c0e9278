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

//! The minimal user and document directory the engine resolves references
//! against.

use diesel::prelude::*;

use super::models::{into_document, DocumentRow, UserRow};
use super::DAL;
use crate::database::schema::{incoming_documents, outgoing_documents, users};
use crate::database::{UniversalTimestamp, UniversalUuid};
use crate::error::StoreError;
use crate::identity::Role;
use crate::models::{Document, DocumentKind, DocumentRef, NewDocument, NewUser, User};

/// Data access for users and registered documents.
#[derive(Clone)]
pub struct DirectoryDAL<'a> {
    dal: &'a DAL,
}

impl<'a> DirectoryDAL<'a> {
    pub fn new(dal: &'a DAL) -> Self {
        Self { dal }
    }

    pub async fn create_user(&self, new: NewUser) -> Result<User, StoreError> {
        let row = UserRow {
            id: UniversalUuid::new_v4().to_string(),
            login: new.login,
            full_name: new.full_name,
            roles: Role::join(&new.roles),
            created_at: UniversalTimestamp::now().to_naive(),
        };
        let inserted = row.clone();

        crate::interact_backend!(self.dal, |conn| {
            diesel::insert_into(users::table)
                .values(&inserted)
                .execute(conn)
        })?;

        row.into_user()
    }

    pub async fn get_user(&self, id: UniversalUuid) -> Result<Option<User>, StoreError> {
        let id = id.to_string();
        let row: Option<UserRow> = crate::interact_backend!(self.dal, |conn| {
            users::table
                .find(&id)
                .select(UserRow::as_select())
                .first(conn)
                .optional()
        })?;
        row.map(UserRow::into_user).transpose()
    }

    pub async fn find_user_by_login(&self, login: &str) -> Result<Option<User>, StoreError> {
        let login = login.to_string();
        let row: Option<UserRow> = crate::interact_backend!(self.dal, |conn| {
            users::table
                .filter(users::login.eq(&login))
                .select(UserRow::as_select())
                .first(conn)
                .optional()
        })?;
        row.map(UserRow::into_user).transpose()
    }

    /// The subset of `ids` that exist in the directory, in input order.
    pub async fn existing_user_ids(
        &self,
        ids: &[UniversalUuid],
    ) -> Result<Vec<UniversalUuid>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let wanted: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
        let found: Vec<String> = crate::interact_backend!(self.dal, |conn| {
            users::table
                .filter(users::id.eq_any(wanted))
                .select(users::id)
                .load::<String>(conn)
        })?;
        Ok(ids
            .iter()
            .copied()
            .filter(|id| found.iter().any(|f| f == &id.to_string()))
            .collect())
    }

    pub async fn count_users(&self) -> Result<i64, StoreError> {
        let count = crate::interact_backend!(self.dal, |conn| {
            users::table.count().get_result::<i64>(conn)
        })?;
        Ok(count)
    }

    /// Registers a document in the register matching its kind.
    pub async fn create_document(&self, new: NewDocument) -> Result<Document, StoreError> {
        let id = UniversalUuid::new_v4().to_string();
        let created_at = new
            .created_at
            .unwrap_or_else(UniversalTimestamp::now)
            .to_naive();
        let kind = new.kind;
        let row: DocumentRow = (id, new.number, new.subject, created_at);
        let inserted = row.clone();

        crate::interact_backend!(self.dal, |conn| {
            let (id, number, subject, created_at) = inserted;
            match kind {
                DocumentKind::Incoming => diesel::insert_into(incoming_documents::table)
                    .values((
                        incoming_documents::id.eq(id),
                        incoming_documents::number.eq(number),
                        incoming_documents::subject.eq(subject),
                        incoming_documents::created_at.eq(created_at),
                    ))
                    .execute(conn),
                DocumentKind::Outgoing => diesel::insert_into(outgoing_documents::table)
                    .values((
                        outgoing_documents::id.eq(id),
                        outgoing_documents::number.eq(number),
                        outgoing_documents::subject.eq(subject),
                        outgoing_documents::created_at.eq(created_at),
                    ))
                    .execute(conn),
            }
        })?;

        into_document(kind, row)
    }

    pub async fn get_document(&self, doc: DocumentRef) -> Result<Option<Document>, StoreError> {
        let id = doc.id.to_string();
        let kind = doc.kind;
        let row: Option<DocumentRow> = crate::interact_backend!(self.dal, |conn| {
            match kind {
                DocumentKind::Incoming => incoming_documents::table
                    .find(&id)
                    .select((
                        incoming_documents::id,
                        incoming_documents::number,
                        incoming_documents::subject,
                        incoming_documents::created_at,
                    ))
                    .first::<DocumentRow>(conn)
                    .optional(),
                DocumentKind::Outgoing => outgoing_documents::table
                    .find(&id)
                    .select((
                        outgoing_documents::id,
                        outgoing_documents::number,
                        outgoing_documents::subject,
                        outgoing_documents::created_at,
                    ))
                    .first::<DocumentRow>(conn)
                    .optional(),
            }
        })?;
        row.map(|row| into_document(kind, row)).transpose()
    }

    /// Documents registered in both registers.
    pub async fn count_documents(&self) -> Result<i64, StoreError> {
        let (incoming, outgoing) = crate::interact_backend!(self.dal, |conn| {
            let incoming: i64 = incoming_documents::table.count().get_result(conn)?;
            let outgoing: i64 = outgoing_documents::table.count().get_result(conn)?;
            Ok::<_, diesel::result::Error>((incoming, outgoing))
        })?;
        Ok(incoming + outgoing)
    }
}
