use serde::{Deserialize, Serialize};

use crate::geometry::Compaction;
use crate::scoring::ScoringConfig;

/// Engine configuration, provided by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Canvas width in pixels (default: 800).
    pub canvas_width: f32,
    /// Canvas height in pixels (default: 600).
    pub canvas_height: f32,
    pub scoring: ScoringConfig,
    /// How traces are compacted before telemetry (default: Douglas–Peucker, 5 px).
    pub compaction: Compaction,
    /// Maximum pending telemetry records (default: 64).
    pub telemetry_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            canvas_width: 800.0,
            canvas_height: 600.0,
            scoring: ScoringConfig::default(),
            compaction: Compaction::default(),
            telemetry_capacity: 64,
        }
    }
}

impl EngineConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(Self::sanitized)
    }

    /// Clamp values that would make scoring or simplification meaningless.
    pub fn sanitized(mut self) -> Self {
        let s = &mut self.scoring;
        if !(s.proximity_radius >= 0.0) {
            log::warn!("proximity_radius {} clamped to 0", s.proximity_radius);
            s.proximity_radius = 0.0;
        }
        for (name, v) in [
            ("endpoint_penalty", &mut s.endpoint_penalty),
            ("direction_penalty", &mut s.direction_penalty),
        ] {
            if !(0.0..=1.0).contains(&*v) {
                let clamped = if v.is_nan() { 1.0 } else { v.clamp(0.0, 1.0) };
                log::warn!("{} {} clamped to {}", name, v, clamped);
                *v = clamped;
            }
        }
        if let Compaction::DouglasPeucker { tolerance } = &mut self.compaction {
            if !(*tolerance >= 0.0) {
                log::warn!("simplify tolerance {} clamped to 0", tolerance);
                *tolerance = 0.0;
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_is_default() {
        assert_eq!(EngineConfig::from_json("{}").unwrap(), EngineConfig::default());
    }

    #[test]
    fn partial_override() {
        let cfg = EngineConfig::from_json(
            r#"{"canvas_width": 600, "scoring": {"proximity_radius": 25}, "compaction": {"mode": "key_points"}}"#,
        )
        .unwrap();
        assert_eq!(cfg.canvas_width, 600.0);
        assert_eq!(cfg.canvas_height, 600.0);
        assert_eq!(cfg.scoring.proximity_radius, 25.0);
        assert_eq!(cfg.scoring.pass_threshold, 0.7);
        assert_eq!(cfg.compaction, Compaction::KeyPoints);
    }

    #[test]
    fn negative_values_clamped() {
        let cfg = EngineConfig::from_json(
            r#"{"scoring": {"proximity_radius": -4, "endpoint_penalty": 3}, "compaction": {"mode": "douglas_peucker", "tolerance": -1}}"#,
        )
        .unwrap();
        assert_eq!(cfg.scoring.proximity_radius, 0.0);
        assert_eq!(cfg.scoring.endpoint_penalty, 1.0);
        assert_eq!(cfg.compaction, Compaction::DouglasPeucker { tolerance: 0.0 });
    }

    #[test]
    fn bad_json_is_error() {
        assert!(EngineConfig::from_json(r#"{"canvas_width": "wide"}"#).is_err());
    }
}
