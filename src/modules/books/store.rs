//! The record store: an in-memory, insertion-ordered collection of books
//! persisted wholesale to a JSON file on every mutation.
//!
//! One mutex guards the entire read-modify-flush sequence, so an in-flight
//! flush can never observe a half-applied mutation from a second caller.
//! Ownership is NOT checked here; that is the guard's job.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use thiserror::Error;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::models::{Book, CreateBook, UpdateBook, YearValue};

/// Oldest publication year accepted for a record.
const YEAR_FLOOR: i32 = 1000;

/// Failures surfaced by store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("book {0} not found")]
    NotFound(Uuid),
    #[error("invalid {field}: {reason}")]
    InvalidField {
        field: &'static str,
        reason: String,
    },
    /// The catalog file may now disagree with memory; the request that hit
    /// this must not be reported as successful.
    #[error("failed to persist catalog: {0}")]
    Persistence(#[source] io::Error),
}

pub struct BookStore {
    path: PathBuf,
    books: Mutex<Vec<Book>>,
}

impl BookStore {
    /// Load the catalog from its backing file. A missing file is an empty
    /// catalog; a file that exists but does not parse is a startup error.
    pub async fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();

        let books: Vec<Book> = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .with_context(|| format!("failed to parse catalog file {}", path.display()))?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("failed to read catalog file {}", path.display()));
            }
        };

        // Ids are minted internally, but the file is hand-editable; refuse
        // to start on a catalog that violates id uniqueness.
        let mut seen = std::collections::HashSet::with_capacity(books.len());
        for book in &books {
            if !seen.insert(book.id) {
                anyhow::bail!(
                    "catalog file {} contains duplicate record id {}",
                    path.display(),
                    book.id
                );
            }
        }

        tracing::info!(catalog = %path.display(), records = books.len(), "catalog loaded");

        Ok(Self {
            path,
            books: Mutex::new(books),
        })
    }

    /// All records in insertion order. Never fails.
    pub async fn list(&self) -> Vec<Book> {
        self.books.lock().await.clone()
    }

    /// Records created by `identity`, in insertion order.
    pub async fn list_by_creator(&self, identity: &str) -> Vec<Book> {
        self.books
            .lock()
            .await
            .iter()
            .filter(|book| book.created_by == identity)
            .cloned()
            .collect()
    }

    /// Look up a single record by id.
    pub async fn get(&self, id: Uuid) -> Option<Book> {
        self.books
            .lock()
            .await
            .iter()
            .find(|book| book.id == id)
            .cloned()
    }

    /// Number of records currently held.
    pub async fn count(&self) -> usize {
        self.books.lock().await.len()
    }

    /// Validate input, append a new record, and flush.
    ///
    /// `createdBy` always comes from the verified caller identity, never
    /// from the request body.
    pub async fn create(&self, input: CreateBook, creator: &str) -> Result<Book, StoreError> {
        let title = required_text("title", &input.title)?;
        let author = required_text("author", &input.author)?;
        let genre = required_text("genre", &input.genre)?;
        let year_published = validated_year(&input.year_published)?;

        let book = Book {
            id: Uuid::new_v4(),
            title,
            author,
            genre,
            year_published,
            created_by: creator.to_string(),
            created_at: OffsetDateTime::now_utc(),
            updated_at: None,
        };

        let mut books = self.books.lock().await;
        books.push(book.clone());
        self.flush(&books).await?;

        tracing::info!(id = %book.id, created_by = creator, "book created");
        Ok(book)
    }

    /// Apply the fields present in `patch` to an existing record and flush.
    ///
    /// `id`, `createdBy`, and `createdAt` never change; `updatedAt` is
    /// (re)stamped even for an empty patch.
    pub async fn update(&self, id: Uuid, patch: UpdateBook) -> Result<Book, StoreError> {
        let title = patch
            .title
            .as_deref()
            .map(|value| required_text("title", value))
            .transpose()?;
        let author = patch
            .author
            .as_deref()
            .map(|value| required_text("author", value))
            .transpose()?;
        let genre = patch
            .genre
            .as_deref()
            .map(|value| required_text("genre", value))
            .transpose()?;
        let year_published = patch
            .year_published
            .as_ref()
            .map(validated_year)
            .transpose()?;

        let mut books = self.books.lock().await;
        let index = books
            .iter()
            .position(|book| book.id == id)
            .ok_or(StoreError::NotFound(id))?;

        let mut updated = books[index].clone();
        if let Some(title) = title {
            updated.title = title;
        }
        if let Some(author) = author {
            updated.author = author;
        }
        if let Some(genre) = genre {
            updated.genre = genre;
        }
        if let Some(year_published) = year_published {
            updated.year_published = year_published;
        }
        updated.updated_at = Some(OffsetDateTime::now_utc());

        books[index] = updated.clone();
        self.flush(&books).await?;

        tracing::info!(id = %id, "book updated");
        Ok(updated)
    }

    /// Remove a record and flush. Deleting an unknown id reports
    /// `NotFound` rather than silently succeeding.
    pub async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut books = self.books.lock().await;
        let index = books
            .iter()
            .position(|book| book.id == id)
            .ok_or(StoreError::NotFound(id))?;

        books.remove(index);
        self.flush(&books).await?;

        tracing::info!(id = %id, "book deleted");
        Ok(())
    }

    /// Serialize the entire collection and durably replace the backing
    /// file. Runs under the collection lock; writes go to a sibling temp
    /// file first so a crash mid-write cannot truncate the catalog.
    async fn flush(&self, books: &[Book]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(books)
            .map_err(|err| StoreError::Persistence(io::Error::new(io::ErrorKind::InvalidData, err)))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(StoreError::Persistence)?;
            }
        }

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json.as_bytes())
            .await
            .map_err(StoreError::Persistence)?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(StoreError::Persistence)?;

        Ok(())
    }
}

fn required_text(field: &'static str, value: &str) -> Result<String, StoreError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(StoreError::InvalidField {
            field,
            reason: "must be a non-empty string".to_string(),
        });
    }
    Ok(value.to_string())
}

fn validated_year(value: &YearValue) -> Result<i32, StoreError> {
    let year = value.as_int().ok_or_else(|| StoreError::InvalidField {
        field: "yearPublished",
        reason: "must be an integer".to_string(),
    })?;

    let max = OffsetDateTime::now_utc().year() + 1;
    if year < i64::from(YEAR_FLOOR) || year > i64::from(max) {
        return Err(StoreError::InvalidField {
            field: "yearPublished",
            reason: format!("must be between {YEAR_FLOOR} and {max}"),
        });
    }

    Ok(year as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_store_path(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join("books.json")
    }

    fn valid_input() -> CreateBook {
        CreateBook {
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            genre: "Science Fiction".to_string(),
            year_published: YearValue::Number(1965),
        }
    }

    #[tokio::test]
    async fn create_assigns_id_creator_and_timestamps() {
        let dir = tempfile::tempdir().unwrap();
        let store = BookStore::open(scratch_store_path(&dir)).await.unwrap();

        let book = store.create(valid_input(), "user1").await.unwrap();

        assert_eq!(book.created_by, "user1");
        assert_eq!(book.year_published, 1965);
        assert!(book.updated_at.is_none());
        assert_eq!(store.count().await, 1);
    }

    #[tokio::test]
    async fn create_rejects_far_future_year_naming_the_field() {
        let dir = tempfile::tempdir().unwrap();
        let store = BookStore::open(scratch_store_path(&dir)).await.unwrap();

        let mut input = valid_input();
        input.year_published = YearValue::Number(3000);

        match store.create(input, "user1").await {
            Err(StoreError::InvalidField { field, .. }) => assert_eq!(field, "yearPublished"),
            other => panic!("expected InvalidField, got {other:?}"),
        }
        assert_eq!(store.count().await, 0);
    }

    #[tokio::test]
    async fn create_accepts_year_1999_as_a_numeric_string() {
        let dir = tempfile::tempdir().unwrap();
        let store = BookStore::open(scratch_store_path(&dir)).await.unwrap();

        let mut input = valid_input();
        input.year_published = YearValue::Text("1999".to_string());

        let book = store.create(input, "user1").await.unwrap();
        assert_eq!(book.year_published, 1999);
    }

    #[tokio::test]
    async fn create_rejects_pre_floor_years_and_blank_fields() {
        let dir = tempfile::tempdir().unwrap();
        let store = BookStore::open(scratch_store_path(&dir)).await.unwrap();

        let mut input = valid_input();
        input.year_published = YearValue::Number(999);
        assert!(matches!(
            store.create(input, "user1").await,
            Err(StoreError::InvalidField {
                field: "yearPublished",
                ..
            })
        ));

        let mut input = valid_input();
        input.title = "   ".to_string();
        assert!(matches!(
            store.create(input, "user1").await,
            Err(StoreError::InvalidField { field: "title", .. })
        ));
    }

    #[tokio::test]
    async fn empty_patch_changes_nothing_but_updated_at() {
        let dir = tempfile::tempdir().unwrap();
        let store = BookStore::open(scratch_store_path(&dir)).await.unwrap();
        let created = store.create(valid_input(), "user1").await.unwrap();

        let updated = store.update(created.id, UpdateBook::default()).await.unwrap();

        assert!(updated.updated_at.is_some());
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.title, created.title);
        assert_eq!(updated.author, created.author);
        assert_eq!(updated.genre, created.genre);
        assert_eq!(updated.year_published, created.year_published);
        assert_eq!(updated.created_by, created.created_by);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn update_applies_only_present_fields() {
        let dir = tempfile::tempdir().unwrap();
        let store = BookStore::open(scratch_store_path(&dir)).await.unwrap();
        let created = store.create(valid_input(), "user1").await.unwrap();

        let patch = UpdateBook {
            title: Some("Dune Messiah".to_string()),
            year_published: Some(YearValue::Number(1969)),
            ..UpdateBook::default()
        };
        let updated = store.update(created.id, patch).await.unwrap();

        assert_eq!(updated.title, "Dune Messiah");
        assert_eq!(updated.year_published, 1969);
        assert_eq!(updated.author, created.author);
        assert_eq!(updated.genre, created.genre);
    }

    #[tokio::test]
    async fn update_rejects_present_but_invalid_fields() {
        let dir = tempfile::tempdir().unwrap();
        let store = BookStore::open(scratch_store_path(&dir)).await.unwrap();
        let created = store.create(valid_input(), "user1").await.unwrap();

        let patch = UpdateBook {
            genre: Some("".to_string()),
            ..UpdateBook::default()
        };
        assert!(matches!(
            store.update(created.id, patch).await,
            Err(StoreError::InvalidField { field: "genre", .. })
        ));
    }

    #[tokio::test]
    async fn update_and_delete_of_unknown_id_report_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = BookStore::open(scratch_store_path(&dir)).await.unwrap();

        let id = Uuid::new_v4();
        assert!(matches!(
            store.update(id, UpdateBook::default()).await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.delete(id).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn catalog_round_trips_through_the_backing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = scratch_store_path(&dir);

        let store = BookStore::open(&path).await.unwrap();
        store.create(valid_input(), "user1").await.unwrap();
        let mut second = valid_input();
        second.title = "Foundation".to_string();
        second.author = "Isaac Asimov".to_string();
        store.create(second, "admin").await.unwrap();
        let before = store.list().await;

        let reloaded = BookStore::open(&path).await.unwrap();
        let after = reloaded.list().await;

        assert_eq!(before, after);
        assert_eq!(after[0].title, "Dune");
        assert_eq!(after[1].title, "Foundation");
    }

    #[tokio::test]
    async fn delete_persists_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let path = scratch_store_path(&dir);

        let store = BookStore::open(&path).await.unwrap();
        let book = store.create(valid_input(), "user1").await.unwrap();
        store.delete(book.id).await.unwrap();

        let reloaded = BookStore::open(&path).await.unwrap();
        assert_eq!(reloaded.count().await, 0);
    }

    #[tokio::test]
    async fn corrupt_catalog_file_fails_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = scratch_store_path(&dir);
        tokio::fs::write(&path, b"not json at all").await.unwrap();

        assert!(BookStore::open(&path).await.is_err());
    }

    #[tokio::test]
    async fn duplicate_ids_in_catalog_file_fail_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = scratch_store_path(&dir);

        let record = serde_json::json!({
            "id": "96a92f2f-ca25-4691-9022-77230bf9c041",
            "title": "Dune",
            "author": "Frank Herbert",
            "genre": "Science Fiction",
            "yearPublished": 1965,
            "createdBy": "user1",
            "createdAt": "2025-07-29T17:37:22.519Z"
        });
        let doubled = serde_json::to_vec(&vec![record.clone(), record]).unwrap();
        tokio::fs::write(&path, doubled).await.unwrap();

        assert!(BookStore::open(&path).await.is_err());
    }

    #[tokio::test]
    async fn list_by_creator_filters_records() {
        let dir = tempfile::tempdir().unwrap();
        let store = BookStore::open(scratch_store_path(&dir)).await.unwrap();

        store.create(valid_input(), "user1").await.unwrap();
        let mut other = valid_input();
        other.title = "The Great Gatsby".to_string();
        store.create(other, "admin").await.unwrap();

        let mine = store.list_by_creator("user1").await;
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].created_by, "user1");
        assert_eq!(store.list().await.len(), 2);
    }
}
