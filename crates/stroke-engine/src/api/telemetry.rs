use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::Node;

/// One evaluated stroke attempt, as shipped to the telemetry collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrokeRecord {
    pub user_id: u32,
    pub character_id: u32,
    pub stroke_index: usize,
    /// Compacted trace (see `Compaction`).
    pub path: Vec<Node>,
    pub score: f32,
    /// 1-based attempt number for this stroke.
    #[serde(default)]
    pub attempt: u32,
}

/// Optional reply from the telemetry service. Parsed for logging only.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrokeRecordResponse {
    pub record_id: u64,
    #[serde(default)]
    pub simplified_nodes: Vec<Node>,
}

impl StrokeRecordResponse {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Errors a telemetry sink may report. The engine logs them and moves on.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TelemetryError {
    #[error("telemetry sink unavailable: {0}")]
    Unavailable(String),
    #[error("telemetry record could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Fire-and-forget destination for stroke records.
///
/// `submit` must return promptly; anything slow (HTTP, disk) happens on the
/// other side of the sink. Errors are logged by the caller and otherwise
/// ignored.
pub trait TelemetrySink {
    fn submit(&mut self, record: StrokeRecord) -> Result<(), TelemetryError>;
}

impl<S: TelemetrySink + ?Sized> TelemetrySink for Box<S> {
    fn submit(&mut self, record: StrokeRecord) -> Result<(), TelemetryError> {
        (**self).submit(record)
    }
}

/// Discards every record.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTelemetry;

impl TelemetrySink for NullTelemetry {
    fn submit(&mut self, _record: StrokeRecord) -> Result<(), TelemetryError> {
        Ok(())
    }
}

/// Bounded FIFO of pending records, drained by the host.
///
/// When full, the oldest record is dropped to make room.
#[derive(Debug)]
pub struct TelemetryOutbox {
    pending: VecDeque<StrokeRecord>,
    capacity: usize,
    dropped: u64,
}

impl TelemetryOutbox {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            pending: VecDeque::with_capacity(capacity),
            capacity,
            dropped: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Change the bound. Shrinking drops the oldest records that no longer fit.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        let excess = self.pending.len().saturating_sub(self.capacity);
        if excess > 0 {
            self.pending.drain(..excess);
            self.dropped += excess as u64;
            log::warn!("telemetry outbox shrunk to {}, dropped {} records", self.capacity, excess);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Records discarded because the outbox was full.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn drain(&mut self) -> Vec<StrokeRecord> {
        self.pending.drain(..).collect()
    }

    /// Drain pending records as a JSON array.
    pub fn drain_json(&mut self) -> Result<String, TelemetryError> {
        let json = serde_json::to_string(&self.pending)?;
        self.pending.clear();
        Ok(json)
    }
}

impl Default for TelemetryOutbox {
    fn default() -> Self {
        Self::new(64)
    }
}

impl TelemetrySink for TelemetryOutbox {
    fn submit(&mut self, record: StrokeRecord) -> Result<(), TelemetryError> {
        if self.pending.len() >= self.capacity {
            self.pending.pop_front();
            self.dropped += 1;
            log::warn!("telemetry outbox full, dropped oldest record ({} total)", self.dropped);
        }
        self.pending.push_back(record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(stroke_index: usize) -> StrokeRecord {
        StrokeRecord {
            user_id: 1,
            character_id: 3,
            stroke_index,
            path: vec![Node::new(150.0, 300.0), Node::new(450.0, 300.0)],
            score: 0.5,
            attempt: 1,
        }
    }

    #[test]
    fn record_serializes_camel_case() {
        let json = serde_json::to_value(record(2)).unwrap();
        assert_eq!(json["userId"], 1);
        assert_eq!(json["characterId"], 3);
        assert_eq!(json["strokeIndex"], 2);
        assert_eq!(json["path"][1]["x"], 450.0);
        assert_eq!(json["score"], 0.5);
    }

    #[test]
    fn outbox_fifo_and_drain() {
        let mut outbox = TelemetryOutbox::new(4);
        outbox.submit(record(0)).unwrap();
        outbox.submit(record(1)).unwrap();
        let drained = outbox.drain();
        assert_eq!(drained.iter().map(|r| r.stroke_index).collect::<Vec<_>>(), vec![0, 1]);
        assert!(outbox.is_empty());
    }

    #[test]
    fn outbox_drops_oldest_when_full() {
        let mut outbox = TelemetryOutbox::new(2);
        for i in 0..5 {
            outbox.submit(record(i)).unwrap();
        }
        assert_eq!(outbox.len(), 2);
        assert_eq!(outbox.dropped(), 3);
        let drained = outbox.drain();
        assert_eq!(drained[0].stroke_index, 3);
        assert_eq!(drained[1].stroke_index, 4);
    }

    #[test]
    fn shrinking_drops_oldest() {
        let mut outbox = TelemetryOutbox::new(8);
        for i in 0..6 {
            outbox.submit(record(i)).unwrap();
        }
        outbox.set_capacity(2);
        assert_eq!(outbox.capacity(), 2);
        assert_eq!(outbox.dropped(), 4);
        let kept: Vec<usize> = outbox.drain().iter().map(|r| r.stroke_index).collect();
        assert_eq!(kept, vec![4, 5]);

        outbox.set_capacity(0);
        assert_eq!(outbox.capacity(), 1);
    }

    #[test]
    fn drain_json_is_array() {
        let mut outbox = TelemetryOutbox::default();
        assert_eq!(outbox.drain_json().unwrap(), "[]");
        outbox.submit(record(0)).unwrap();
        let json = outbox.drain_json().unwrap();
        let parsed: Vec<StrokeRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, vec![record(0)]);
        assert!(outbox.is_empty());
    }

    #[test]
    fn response_echo_parses() {
        let r = StrokeRecordResponse::from_json(
            r#"{"recordId": 12, "simplifiedNodes": [{"x": 1, "y": 2}]}"#,
        )
        .unwrap();
        assert_eq!(r.record_id, 12);
        assert_eq!(r.simplified_nodes, vec![Node::new(1.0, 2.0)]);
    }

    #[test]
    fn boxed_sink_forwards() {
        let mut sink: Box<dyn TelemetrySink> = Box::new(NullTelemetry);
        assert!(sink.submit(record(0)).is_ok());
    }
}
