//! In-process document store.
//!
//! Records are serialized to BSON documents exactly as the Mongo driver
//! would write them and kept per collection in insertion order. The
//! semantics mirror a MongoDB collection with its default unique `_id`
//! index:
//!
//! - duplicate `_id` on insert fails with [`AppError::DuplicateKey`]
//! - `insert_many` checks the whole batch first and inserts nothing on conflict
//! - `replace_one` only counts a modification when the stored document changes
//!   and refuses to change a stored `_id`
//!
//! ```ignore
//! let db = MemoryDatabase::new("catalog");
//! let repo = DocumentRepository::new(Arc::new(db.collection::<Product>("products")));
//! ```

use std::collections::{HashMap, HashSet};
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::{self, Bson, Document};
use tokio::sync::RwLock;

use crate::error::AppError;
use crate::models::{Entity, ID_FIELD};
use crate::store::{DocumentStore, Filter, WriteOutcome};

type Collections = HashMap<String, Vec<Document>>;

/// An in-memory database. Clones share the same collections.
#[derive(Clone)]
pub struct MemoryDatabase {
    name: Arc<str>,
    collections: Arc<RwLock<Collections>>,
}

impl MemoryDatabase {
    pub fn new(name: &str) -> Self {
        Self {
            name: Arc::from(name),
            collections: Arc::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the named collection typed as `T`. Collections spring into
    /// existence on first write.
    pub fn collection<T: Entity>(&self, name: &str) -> MemoryCollection<T> {
        MemoryCollection {
            name: name.to_string(),
            collections: Arc::clone(&self.collections),
            _record: PhantomData,
        }
    }

    /// Raw documents currently stored in `collection`.
    pub async fn documents(&self, collection: &str) -> Vec<Document> {
        self.collections
            .read()
            .await
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }
}

/// A typed view over one collection of a [`MemoryDatabase`].
pub struct MemoryCollection<T> {
    name: String,
    collections: Arc<RwLock<Collections>>,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for MemoryCollection<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            collections: Arc::clone(&self.collections),
            _record: PhantomData,
        }
    }
}

impl<T: Entity> MemoryCollection<T> {
    fn duplicate_key(&self, id: &Bson) -> AppError {
        AppError::DuplicateKey {
            collection: self.name.clone(),
            key: key_text(id),
        }
    }
}

fn encode<T: Entity>(item: &T) -> Result<(Document, Bson), AppError> {
    let document = bson::to_document(item)?;
    let id = document
        .get(ID_FIELD)
        .cloned()
        .ok_or_else(|| AppError::Store(format!("document has no '{}' field", ID_FIELD)))?;
    Ok((document, id))
}

fn key_text(id: &Bson) -> String {
    match id {
        Bson::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn contains_id(documents: &[Document], id: &Bson) -> bool {
    documents.iter().any(|doc| doc.get(ID_FIELD) == Some(id))
}

#[async_trait]
impl<T: Entity> DocumentStore<T> for MemoryCollection<T> {
    fn collection_name(&self) -> &str {
        &self.name
    }

    async fn find(&self, filter: &Filter, limit: Option<i64>) -> Result<Vec<T>, AppError> {
        // Driver semantics: zero means no limit, negative means its absolute value
        let limit = match limit {
            Some(n) if n != 0 => usize::try_from(n.unsigned_abs()).unwrap_or(usize::MAX),
            _ => usize::MAX,
        };

        let collections = self.collections.read().await;
        let Some(documents) = collections.get(&self.name) else {
            return Ok(Vec::new());
        };

        documents
            .iter()
            .filter(|doc| filter.matches(doc))
            .take(limit)
            .map(|doc| bson::from_document(doc.clone()).map_err(AppError::from))
            .collect()
    }

    async fn insert_one(&self, item: &T) -> Result<(), AppError> {
        let (document, id) = encode(item)?;

        let mut collections = self.collections.write().await;
        let documents = collections.entry(self.name.clone()).or_default();
        if contains_id(documents, &id) {
            return Err(self.duplicate_key(&id));
        }

        documents.push(document);
        Ok(())
    }

    async fn insert_many(&self, items: &[T]) -> Result<(), AppError> {
        if items.is_empty() {
            return Err(AppError::Store(
                "insert_many requires at least one document".to_string(),
            ));
        }

        let encoded = items.iter().map(encode).collect::<Result<Vec<_>, _>>()?;

        let mut collections = self.collections.write().await;
        let documents = collections.entry(self.name.clone()).or_default();

        let mut batch_keys = HashSet::new();
        for (_, id) in &encoded {
            if contains_id(documents, id) || !batch_keys.insert(key_text(id)) {
                return Err(self.duplicate_key(id));
            }
        }

        documents.extend(encoded.into_iter().map(|(document, _)| document));
        Ok(())
    }

    async fn replace_one(
        &self,
        filter: &Filter,
        item: &T,
        upsert: bool,
    ) -> Result<WriteOutcome, AppError> {
        let (replacement, id) = encode(item)?;

        let mut collections = self.collections.write().await;
        let documents = collections.entry(self.name.clone()).or_default();

        match documents.iter().position(|doc| filter.matches(doc)) {
            Some(index) => {
                let stored = &mut documents[index];
                if stored.get(ID_FIELD) != Some(&id) {
                    return Err(AppError::Store(format!(
                        "replacement would change the immutable '{}' field",
                        ID_FIELD
                    )));
                }

                let modified = *stored != replacement;
                if modified {
                    *stored = replacement;
                }
                Ok(WriteOutcome::replaced(1, u64::from(modified)))
            }
            None if upsert => {
                if contains_id(documents, &id) {
                    return Err(self.duplicate_key(&id));
                }
                documents.push(replacement);
                Ok(WriteOutcome::replaced(0, 0))
            }
            None => Ok(WriteOutcome::replaced(0, 0)),
        }
    }

    async fn delete_one(&self, filter: &Filter) -> Result<WriteOutcome, AppError> {
        let mut collections = self.collections.write().await;
        let Some(documents) = collections.get_mut(&self.name) else {
            return Ok(WriteOutcome::deleted(0));
        };

        match documents.iter().position(|doc| filter.matches(doc)) {
            Some(index) => {
                documents.remove(index);
                Ok(WriteOutcome::deleted(1))
            }
            None => Ok(WriteOutcome::deleted(0)),
        }
    }

    async fn delete_many(&self, filter: &Filter) -> Result<WriteOutcome, AppError> {
        let mut collections = self.collections.write().await;
        let Some(documents) = collections.get_mut(&self.name) else {
            return Ok(WriteOutcome::deleted(0));
        };

        let before = documents.len();
        documents.retain(|doc| !filter.matches(doc));
        Ok(WriteOutcome::deleted((before - documents.len()) as u64))
    }
}
