#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use contactbook_core::{
    ConfirmPrompt, Contact, ContactBook, ContactStore, KeyValueStore, ManualClock,
    MemoryKeyValueStore, RenderFrame, RenderSink, StorageError, StorageMedium, StorageResult,
};

pub const STORAGE_KEY: &str = "contacts";

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap()
}

/// Keeps every rendered frame for later assertions.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub frames: Vec<RenderFrame>,
}

impl RecordingSink {
    pub fn last(&self) -> &RenderFrame {
        self.frames.last().expect("at least one frame rendered")
    }
}

impl RenderSink for RecordingSink {
    fn render(&mut self, frame: &RenderFrame) {
        self.frames.push(frame.clone());
    }
}

/// Answers every confirmation with a fixed value and counts the prompts.
#[derive(Debug)]
pub struct FixedPrompt {
    pub answer: bool,
    pub asked: usize,
}

impl FixedPrompt {
    pub fn yes() -> Self {
        Self {
            answer: true,
            asked: 0,
        }
    }

    pub fn no() -> Self {
        Self {
            answer: false,
            asked: 0,
        }
    }
}

impl ConfirmPrompt for FixedPrompt {
    fn confirm_delete(&mut self, _contact: &Contact) -> bool {
        self.asked += 1;
        self.answer
    }
}

pub type MemoryBook<'c> =
    ContactBook<MemoryKeyValueStore, &'c ManualClock, RecordingSink, FixedPrompt>;

pub fn memory_book(clock: &ManualClock, store: MemoryKeyValueStore) -> MemoryBook<'_> {
    ContactBook::open(
        ContactStore::new(store, STORAGE_KEY),
        clock,
        RecordingSink::default(),
        FixedPrompt::yes(),
    )
}

pub fn memory_with_raw(raw: &str) -> MemoryKeyValueStore {
    let mut store = MemoryKeyValueStore::new();
    store.set_item(STORAGE_KEY, raw).unwrap();
    store
}

/// Medium whose reads and writes always fail with a non-quota error.
pub struct BrokenStore;

impl KeyValueStore for BrokenStore {
    fn get_item(&self, _key: &str) -> StorageResult<Option<String>> {
        Err(StorageError::Unavailable("disk detached".to_string()))
    }

    fn set_item(&mut self, _key: &str, _value: &str) -> StorageResult<()> {
        Err(StorageError::Unavailable("disk detached".to_string()))
    }

    fn remove_item(&mut self, _key: &str) -> StorageResult<()> {
        Ok(())
    }

    fn medium(&self) -> StorageMedium {
        StorageMedium::Memory
    }
}
