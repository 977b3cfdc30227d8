use libris_auth::Owned;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// A catalog record.
///
/// `id`, `createdBy`, and `createdAt` are assigned by the store on
/// creation and never change afterwards; `updatedAt` is absent until the
/// first update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub year_published: i32,
    /// Identity of the creator. Hand-edited catalog files may lose this
    /// field; such records belong to nobody and refuse every mutation.
    #[serde(default)]
    pub created_by: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<OffsetDateTime>,
}

impl Owned for Book {
    fn owner(&self) -> Option<&str> {
        let owner = self.created_by.trim();
        (!owner.is_empty()).then_some(owner)
    }
}

/// Request body for creating a book. All fields are required.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBook {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub year_published: YearValue,
}

/// Request body for updating a book; absent fields keep their prior values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateBook {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    pub year_published: Option<YearValue>,
}

/// Publication year as clients send it: a JSON number, or a numeric string
/// (HTML form values arrive as strings).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum YearValue {
    Number(i64),
    Text(String),
}

impl YearValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(value) => value.trim().parse().ok(),
        }
    }
}
