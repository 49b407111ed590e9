//! File-backed document store.
//!
//! A flat collection of schema-less JSON documents, one per line of a
//! JSON-lines file. Documents are held in memory behind an async mutex and
//! every mutation is persisted before the lock is released, so a store call
//! that returns has already hit the file.

use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// A schema-less record: a JSON object keyed by field name.
pub type Document = serde_json::Map<String, Value>;

/// Field-equality filter, matched against every listed pair.
pub type Filter<'a> = [(&'a str, Value)];

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store i/o: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed document on line {line}: {source}")]
    Parse {
        line: usize,
        source: serde_json::Error,
    },
    #[error("encode document: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("duplicate value for unique field `{0}`")]
    Duplicate(String),
}

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    docs: Mutex<Vec<Document>>,
}

impl FileStore {
    /// Open a store at `path`, loading any existing documents. A missing
    /// file starts an empty collection; a malformed line is an error.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let docs = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => parse_lines(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path,
            docs: Mutex::new(docs),
        })
    }

    /// All documents, in insertion order.
    pub async fn find_all(&self) -> Vec<Document> {
        self.docs.lock().await.clone()
    }

    /// First document matching every field in `filter`.
    pub async fn find_one(&self, filter: &Filter<'_>) -> Option<Document> {
        self.docs
            .lock()
            .await
            .iter()
            .find(|doc| matches(doc, filter))
            .cloned()
    }

    /// Insert `doc`, rejecting it if another document already holds the same
    /// value for `key`. The existence check and the insert happen under one
    /// lock acquisition, so concurrent inserts cannot both pass the check.
    pub async fn insert_unique(
        &self,
        key: &str,
        doc: Document,
    ) -> Result<Document, StoreError> {
        let mut docs = self.docs.lock().await;
        if docs.iter().any(|d| d.get(key) == doc.get(key)) {
            return Err(StoreError::Duplicate(key.to_string()));
        }
        self.append_line(&doc).await?;
        docs.push(doc.clone());
        Ok(doc)
    }

    /// Merge `set` into the first document matching `filter`. Returns the
    /// number of documents updated (0 or 1).
    pub async fn update_one(
        &self,
        filter: &Filter<'_>,
        set: Document,
    ) -> Result<u64, StoreError> {
        let mut docs = self.docs.lock().await;
        let Some(doc) = docs.iter_mut().find(|doc| matches(doc, filter)) else {
            return Ok(0);
        };
        for (field, value) in set {
            doc.insert(field, value);
        }
        self.rewrite(&docs).await?;
        Ok(1)
    }

    /// Remove the first document matching `filter`. Returns the number of
    /// documents deleted (0 or 1).
    pub async fn delete_one(&self, filter: &Filter<'_>) -> Result<u64, StoreError> {
        let mut docs = self.docs.lock().await;
        let Some(idx) = docs.iter().position(|doc| matches(doc, filter)) else {
            return Ok(0);
        };
        docs.remove(idx);
        self.rewrite(&docs).await?;
        Ok(1)
    }

    async fn append_line(&self, doc: &Document) -> Result<(), StoreError> {
        let mut line = serde_json::to_string(doc)?;
        line.push('\n');
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    async fn rewrite(&self, docs: &[Document]) -> Result<(), StoreError> {
        let mut contents = String::new();
        for doc in docs {
            contents.push_str(&serde_json::to_string(doc)?);
            contents.push('\n');
        }
        tokio::fs::write(&self.path, contents).await?;
        Ok(())
    }
}

fn parse_lines(contents: &str) -> Result<Vec<Document>, StoreError> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str(line).map_err(|source| StoreError::Parse {
                line: idx + 1,
                source,
            })
        })
        .collect()
}

fn matches(doc: &Document, filter: &Filter<'_>) -> bool {
    filter.iter().all(|(field, value)| doc.get(*field) == Some(value))
}
