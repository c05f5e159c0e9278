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

//! Diesel table definitions shared by both backends.
//!
//! Identifiers are canonical UUID text, instants are UTC `TIMESTAMP`, deadlines
//! are calendar `DATE`. Statuses and document kinds are stored as their
//! lowercase wire strings.

diesel::table! {
    users (id) {
        id -> Text,
        login -> Text,
        full_name -> Text,
        /// comma-separated role names
        roles -> Text,
        created_at -> Timestamp,
    }
}

diesel::table! {
    incoming_documents (id) {
        id -> Text,
        number -> Text,
        subject -> Text,
        created_at -> Timestamp,
    }
}

diesel::table! {
    outgoing_documents (id) {
        id -> Text,
        number -> Text,
        subject -> Text,
        created_at -> Timestamp,
    }
}

diesel::table! {
    assignments (id) {
        id -> Text,
        document_id -> Text,
        document_kind -> Text,
        executor_id -> Text,
        content -> Text,
        deadline -> Nullable<Date>,
        status -> Text,
        report -> Nullable<Text>,
        completed_at -> Nullable<Timestamp>,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

diesel::table! {
    assignment_co_executors (assignment_id, user_id) {
        assignment_id -> Text,
        user_id -> Text,
    }
}

diesel::table! {
    acknowledgments (id) {
        id -> Text,
        document_id -> Text,
        document_kind -> Text,
        content -> Text,
        creator_id -> Text,
        created_at -> Timestamp,
        completed_at -> Nullable<Timestamp>,
    }
}

diesel::table! {
    acknowledgment_recipients (id) {
        id -> Text,
        acknowledgment_id -> Text,
        user_id -> Text,
        viewed_at -> Nullable<Timestamp>,
        confirmed_at -> Nullable<Timestamp>,
        created_at -> Timestamp,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    users,
    incoming_documents,
    outgoing_documents,
    assignments,
    assignment_co_executors,
    acknowledgments,
    acknowledgment_recipients,
);
