use serde::{Deserialize, Serialize};

use crate::geometry::{overall_direction, Node};

/// Tunables for stroke scoring. Distances are in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// A trace point closer than this (strictly) reaches a reference node.
    pub proximity_radius: f32,
    /// Traces with fewer points score 0 outright.
    pub min_trace_points: usize,
    /// Multiplier applied when either endpoint is missed.
    pub endpoint_penalty: f32,
    /// Multiplier applied when the trace runs against the reference direction.
    pub direction_penalty: f32,
    /// A stroke passes when its score is strictly above this.
    pub pass_threshold: f32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            proximity_radius: 30.0,
            min_trace_points: 5,
            endpoint_penalty: 0.5,
            direction_penalty: 0.7,
            pass_threshold: 0.7,
        }
    }
}

/// Outcome of scoring one trace against one reference stroke.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScoreResult {
    /// Final score in [0, 1], after endpoint and direction penalties.
    pub passed_fraction: f32,
    pub passed: bool,
    /// Per reference node: whether the trace reached it.
    pub reached: Vec<bool>,
}

impl ScoreResult {
    /// A failed result with no node reached.
    pub fn failed(node_count: usize) -> Self {
        Self {
            passed_fraction: 0.0,
            passed: false,
            reached: vec![false; node_count],
        }
    }

    pub fn reached_count(&self) -> usize {
        self.reached.iter().filter(|&&r| r).count()
    }
}

/// Judges a raw trace against a reference stroke.
///
/// Proximity to the skeleton nodes stands in for shape similarity. The
/// endpoints weigh more than the interior, and a trace drawn against the
/// reference direction is penalised.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrokeScorer {
    config: ScoringConfig,
}

impl StrokeScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn score(&self, trace: &[Node], reference: &[Node]) -> ScoreResult {
        let cfg = &self.config;
        if trace.len() < cfg.min_trace_points || trace.is_empty() || reference.is_empty() {
            return ScoreResult::failed(reference.len());
        }

        let radius = cfg.proximity_radius;
        let near = |a: Node, b: Node| a.distance(b) < radius;

        let start = reference[0];
        let end = reference[reference.len() - 1];
        let trace_first = trace[0];
        let trace_last = trace[trace.len() - 1];

        // Endpoints are matched as an unordered pair; orientation is the
        // direction check's job.
        let forward = (near(trace_first, start), near(trace_last, end));
        let reversed = (near(trace_last, start), near(trace_first, end));
        let hits = |(a, b): (bool, bool)| a as u8 + b as u8;
        let (start_hit, end_hit) = if hits(reversed) > hits(forward) { reversed } else { forward };

        let mut reached = vec![false; reference.len()];
        let mut passed_count = start_hit as usize + end_hit as usize;
        let checks = if reference.len() == 1 {
            reached[0] = start_hit && end_hit;
            2
        } else {
            reached[0] = start_hit;
            reached[reference.len() - 1] = end_hit;
            for (i, &node) in reference.iter().enumerate().take(reference.len() - 1).skip(1) {
                if trace.iter().any(|&p| near(p, node)) {
                    reached[i] = true;
                    passed_count += 1;
                }
            }
            reference.len()
        };

        let mut score = passed_count as f32 / checks as f32;

        if !(start_hit && end_hit) {
            score *= cfg.endpoint_penalty;
        }

        // A single node has no direction to follow. Any longer reference
        // whose ends coincide gives a zero dot product and is penalised.
        if reference.len() > 1 {
            let reference_dir = end.to_vec2() - start.to_vec2();
            if reference_dir.dot(overall_direction(trace)) <= 0.0 {
                score *= cfg.direction_penalty;
            }
        }

        let score = if score.is_finite() { score.clamp(0.0, 1.0) } else { 0.0 };

        log::debug!(
            "stroke score {:.3} ({} of {} checks, start={} end={})",
            score,
            passed_count,
            checks,
            start_hit,
            end_hit
        );

        ScoreResult {
            passed_fraction: score,
            passed: score > cfg.pass_threshold,
            reached,
        }
    }
}
