use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

use super::schema::documents;

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = documents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)] // Some fields used only for database operations
pub struct DocumentRow {
    pub collection: String,
    pub doc_id: String,
    pub doc_year: Option<i32>,
    pub doc_month: Option<i32>,
    pub seq: i64,
    pub data: Value,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = documents)]
pub struct NewDocumentRow {
    pub collection: String,
    pub doc_id: String,
    pub doc_year: Option<i32>,
    pub doc_month: Option<i32>,
    pub data: Value,
}
