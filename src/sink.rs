//! Persistence and notification boundary for resolved turns.

use crate::battle::state::{BattleState, TurnResult};
use crate::errors::SinkError;
use crate::player::Side;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::sync::Mutex;

/// Everything the outside world needs about one resolved turn.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TurnRecord {
    pub battle_id: String,
    pub state: BattleState,
    pub result: TurnResult,
    pub winner: Option<Side>,
}

/// Receives every resolved turn. Failures are reported, never retried.
pub trait TurnSink: Send + Sync {
    fn publish(&self, record: &TurnRecord) -> Result<(), SinkError>;
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl TurnSink for NullSink {
    fn publish(&self, _record: &TurnRecord) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Keeps every record in memory, in publish order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    records: Mutex<Vec<TurnRecord>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<TurnRecord> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl TurnSink for RecordingSink {
    fn publish(&self, record: &TurnRecord) -> Result<(), SinkError> {
        let mut records = self.records.lock().map_err(|_| SinkError::Poisoned)?;
        records.push(record.clone());
        Ok(())
    }
}

/// Writes one JSON object per line.
#[derive(Debug)]
pub struct JsonLinesSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write + Send> TurnSink for JsonLinesSink<W> {
    fn publish(&self, record: &TurnRecord) -> Result<(), SinkError> {
        let line = serde_json::to_string(record)?;
        let mut writer = self.writer.lock().map_err(|_| SinkError::Poisoned)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}
