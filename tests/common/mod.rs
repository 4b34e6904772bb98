//! In-memory collaborators shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tableswap::adapters::database::{KeyValueStore, RelationalStore, StoreTransaction};
use tableswap::adapters::extract::{ExportArtifact, Extractor};
use tableswap::adapters::lifecycle::WorkerLifecycle;
use tableswap::adapters::notify::NotificationSink;
use tableswap::core::state::DesignationStore;
use tableswap::core::sync::{Collaborators, SyncCoordinator, SyncSettings};
use tableswap::domain::{
    Result, SourceRow, SqlIdentifier, SqlValue, SyncError, TargetTables,
};
use tempfile::TempDir;

pub const DESIGNATION_KEY: &str = "CurrentTableName";

/// A committed batch as seen by the store
#[derive(Debug, Clone)]
pub struct CommittedBatch {
    pub sql: String,
    pub rows: Vec<Vec<SqlValue>>,
}

#[derive(Debug, Default)]
pub struct StoreLog {
    pub statements: Mutex<Vec<String>>,
    pub committed: Mutex<Vec<CommittedBatch>>,
    pub begins: AtomicUsize,
    pub rollbacks: AtomicUsize,
}

/// Relational store that records everything and fails on request
#[derive(Clone, Default)]
pub struct RecordingStore {
    pub log: Arc<StoreLog>,
    failing_batches: HashSet<usize>,
    failing_statement: Option<String>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the insert of the n-th opened transaction (0-based) fail
    pub fn failing_batches(mut self, batches: impl IntoIterator<Item = usize>) -> Self {
        self.failing_batches = batches.into_iter().collect();
        self
    }

    /// Makes every plain statement starting with `prefix` fail
    pub fn failing_statement(mut self, prefix: &str) -> Self {
        self.failing_statement = Some(prefix.to_string());
        self
    }

    pub fn statements(&self) -> Vec<String> {
        self.log.statements.lock().unwrap().clone()
    }

    pub fn committed(&self) -> Vec<CommittedBatch> {
        self.log.committed.lock().unwrap().clone()
    }

    pub fn committed_batch_sizes(&self) -> Vec<usize> {
        self.committed().iter().map(|b| b.rows.len()).collect()
    }

    pub fn begins(&self) -> usize {
        self.log.begins.load(Ordering::SeqCst)
    }

    pub fn rollbacks(&self) -> usize {
        self.log.rollbacks.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RelationalStore for RecordingStore {
    async fn execute(&self, sql: &str) -> Result<u64> {
        if let Some(prefix) = &self.failing_statement {
            if sql.starts_with(prefix.as_str()) {
                return Err(SyncError::Database(format!("injected failure: {sql}")));
            }
        }
        self.log.statements.lock().unwrap().push(sql.to_string());
        Ok(0)
    }

    async fn begin(&self) -> Result<Box<dyn StoreTransaction>> {
        let index = self.log.begins.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(RecordingTransaction {
            log: self.log.clone(),
            fail: self.failing_batches.contains(&index),
            pending: None,
        }))
    }
}

struct RecordingTransaction {
    log: Arc<StoreLog>,
    fail: bool,
    pending: Option<CommittedBatch>,
}

#[async_trait]
impl StoreTransaction for RecordingTransaction {
    async fn execute_batch(&mut self, sql: &str, rows: &[Vec<SqlValue>]) -> Result<u64> {
        if self.fail {
            return Err(SyncError::BatchTransaction("injected insert failure".to_string()));
        }
        self.pending = Some(CommittedBatch {
            sql: sql.to_string(),
            rows: rows.to_vec(),
        });
        Ok(rows.len() as u64)
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        if let Some(batch) = self.pending {
            self.log.committed.lock().unwrap().push(batch);
        }
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        self.log.rollbacks.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Key-value store backed by a map
#[derive(Default)]
pub struct MemoryKv {
    items: Mutex<HashMap<String, String>>,
    fail_writes: bool,
}

impl MemoryKv {
    pub fn with_value(key: &str, value: &str) -> Self {
        let kv = Self::default();
        kv.items
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        kv
    }

    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.items.lock().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKv {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.value(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes {
            return Err(SyncError::Designation("injected write failure".to_string()));
        }
        self.items
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Sink keeping every published message
#[derive(Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingSink {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn publish(&self, message: &str) -> Result<()> {
        self.messages.lock().unwrap().push(message.to_string());
        if self.fail {
            return Err(SyncError::Notification("injected delivery failure".to_string()));
        }
        Ok(())
    }
}

/// Lifecycle counting terminate calls
#[derive(Default)]
pub struct CountingLifecycle {
    calls: AtomicUsize,
}

impl CountingLifecycle {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl WorkerLifecycle for CountingLifecycle {
    fn terminate(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Extractor returning a pre-written artifact, or failing
pub struct StubExtractor {
    artifact: Option<PathBuf>,
    _dir: Option<TempDir>,
}

impl StubExtractor {
    /// Artifact with `count` valid rows
    pub fn with_rows(count: usize) -> Self {
        Self::with_source_rows(&sample_rows(count))
    }

    pub fn with_source_rows(rows: &[SourceRow]) -> Self {
        let dir = TempDir::new().unwrap();
        let path = write_artifact(dir.path(), rows);
        Self {
            artifact: Some(path),
            _dir: Some(dir),
        }
    }

    /// Artifact with arbitrary raw content
    pub fn with_raw(content: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("DATA.csv");
        std::fs::write(&path, content).unwrap();
        Self {
            artifact: Some(path),
            _dir: Some(dir),
        }
    }

    pub fn failing() -> Self {
        Self {
            artifact: None,
            _dir: None,
        }
    }
}

#[async_trait]
impl Extractor for StubExtractor {
    async fn extract(&self) -> Result<ExportArtifact> {
        match &self.artifact {
            Some(path) => Ok(ExportArtifact { path: path.clone() }),
            None => Err(SyncError::Export("export command exited with status 1".to_string())),
        }
    }
}

/// `count` bindable rows; every seventh rating is empty
pub fn sample_rows(count: usize) -> Vec<SourceRow> {
    (0..count)
        .map(|i| {
            let rating = if i % 7 == 0 {
                String::new()
            } else {
                (i % 10).to_string()
            };
            SourceRow::new(format!("ID-{i}"), "2024-03-01 12:00:00", rating)
        })
        .collect()
}

/// Writes rows in the export artifact format
pub fn write_artifact(dir: &Path, rows: &[SourceRow]) -> PathBuf {
    let mut content = String::from("\"ID\",\"STATUS_DATE\",\"RATING\"\r\n");
    for row in rows {
        content.push_str(&format!(
            "\"{}\",\"{}\",\"{}\"\r\n",
            row.id, row.status_date, row.rating
        ));
    }
    let path = dir.join("DATA.csv");
    std::fs::write(&path, content).unwrap();
    path
}

/// All collaborators of one test run
pub struct Harness {
    pub store: RecordingStore,
    pub kv: Arc<MemoryKv>,
    pub sink: Arc<RecordingSink>,
    pub lifecycle: Arc<CountingLifecycle>,
    pub extractor: Arc<StubExtractor>,
}

impl Harness {
    pub fn new(extractor: StubExtractor) -> Self {
        Self {
            store: RecordingStore::new(),
            kv: Arc::new(MemoryKv::default()),
            sink: Arc::new(RecordingSink::default()),
            lifecycle: Arc::new(CountingLifecycle::default()),
            extractor: Arc::new(extractor),
        }
    }

    pub fn with_store(mut self, store: RecordingStore) -> Self {
        self.store = store;
        self
    }

    pub fn with_kv(mut self, kv: MemoryKv) -> Self {
        self.kv = Arc::new(kv);
        self
    }

    pub fn with_sink(mut self, sink: RecordingSink) -> Self {
        self.sink = Arc::new(sink);
        self
    }

    pub fn coordinator(&self, batch_size: usize) -> SyncCoordinator {
        self.coordinator_with(batch_size, true, self.sink.clone())
    }

    /// Coordinator with an explicit sink and table creation setting
    pub fn coordinator_with(
        &self,
        batch_size: usize,
        create_tables: bool,
        sink: Arc<dyn NotificationSink>,
    ) -> SyncCoordinator {
        let settings = SyncSettings {
            tables: TargetTables::new(
                SqlIdentifier::new("table_blue").unwrap(),
                SqlIdentifier::new("table_green").unwrap(),
            )
            .unwrap(),
            view: SqlIdentifier::new("my_view").unwrap(),
            batch_size: NonZeroUsize::new(batch_size).unwrap(),
            create_tables,
        };

        let collaborators = Collaborators {
            extractor: self.extractor.clone(),
            store: Arc::new(self.store.clone()),
            designations: DesignationStore::new(self.kv.clone(), DESIGNATION_KEY),
            sink,
            lifecycle: self.lifecycle.clone(),
        };

        SyncCoordinator::new(settings, collaborators)
    }

    pub fn active_value(&self) -> Option<String> {
        self.kv.value(DESIGNATION_KEY)
    }

    pub fn view_statements(&self) -> Vec<String> {
        self.store
            .statements()
            .into_iter()
            .filter(|s| s.contains("VIEW"))
            .collect()
    }
}
