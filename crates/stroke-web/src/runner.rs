use stroke_engine::{
    encode_commands, geometry::as_floats, CharacterSet, EngineConfig, InputEvent, SessionContext,
    StrokeRecordResponse, TelemetryOutbox, TelemetrySink, TraceEngine,
};

/// Practice session runner that wires the engine to the page.
///
/// A concrete demo creates a `thread_local!` PracticeRunner and exports free
/// functions via `#[wasm_bindgen]` (see `export_practice!`), because
/// wasm-bindgen cannot export the generic engine directly.
pub struct PracticeRunner {
    library: CharacterSet,
    config: EngineConfig,
    session: SessionContext,
    engine: Option<TraceEngine<TelemetryOutbox>>,
    /// Header + command records for the host to read after `flush`.
    command_buffer: Vec<f32>,
    /// Records left behind by engines that were replaced before the host
    /// collected them. Bounded like the engine's own outbox.
    carried_telemetry: TelemetryOutbox,
    /// Overflow counted by engines that have since been retired.
    retired_dropped: u64,
}

impl PracticeRunner {
    pub fn new(library: CharacterSet) -> Self {
        let config = EngineConfig::default();
        let carried_telemetry = TelemetryOutbox::new(config.telemetry_capacity);
        Self {
            library,
            config,
            session: SessionContext::default(),
            engine: None,
            command_buffer: Vec::with_capacity(64),
            carried_telemetry,
            retired_dropped: 0,
        }
    }

    /// Replace the engine configuration. Applies from the next character
    /// selection on.
    pub fn configure(&mut self, json: &str) -> bool {
        match EngineConfig::from_json(json) {
            Ok(config) => {
                self.carried_telemetry.set_capacity(config.telemetry_capacity);
                self.config = config;
                true
            }
            Err(e) => {
                log::warn!("ignoring invalid engine config: {}", e);
                false
            }
        }
    }

    pub fn set_user(&mut self, user_id: u32) {
        self.session = SessionContext { user_id };
    }

    /// Start practising `id` with a fresh progression. Returns false if the
    /// library has no such character.
    pub fn select_character(&mut self, id: u32) -> bool {
        let Some(character) = self.library.get(id).cloned() else {
            log::warn!("unknown character {}", id);
            return false;
        };
        self.retire_engine();
        let outbox = TelemetryOutbox::new(self.config.telemetry_capacity);
        self.engine = Some(TraceEngine::new(character, self.session, self.config.clone(), outbox));
        true
    }

    /// Leave practice. Pending telemetry is kept for the host.
    pub fn exit_practice(&mut self) {
        self.retire_engine();
        self.command_buffer.clear();
    }

    /// Forward a pointer event to the engine. Evaluated immediately.
    pub fn push_input(&mut self, event: InputEvent) {
        if let Some(engine) = self.engine.as_mut() {
            engine.handle(event);
        }
    }

    /// Pack the commands emitted since the last flush. Returns the count.
    pub fn flush(&mut self) -> u32 {
        let Some(engine) = self.engine.as_mut() else {
            self.command_buffer.clear();
            return 0;
        };
        let commands = engine.drain_commands();
        encode_commands(
            &commands,
            engine.current_stroke(),
            engine.character().stroke_count(),
            &mut self.command_buffer,
        );
        commands.len() as u32
    }

    /// Hand every pending telemetry record to the host as a JSON array.
    pub fn take_telemetry_json(&mut self) -> String {
        let mut records = self.carried_telemetry.drain();
        if let Some(engine) = self.engine.as_mut() {
            records.extend(engine.sink_mut().drain());
        }
        match serde_json::to_string(&records) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("dropping {} telemetry records: {}", records.len(), e);
                "[]".to_string()
            }
        }
    }

    /// Log the service's echo for a recorded stroke. Never affects state.
    pub fn acknowledge_telemetry(&self, json: &str) {
        match StrokeRecordResponse::from_json(json) {
            Ok(r) => log::debug!(
                "stroke record {} stored ({} simplified nodes)",
                r.record_id,
                r.simplified_nodes.len()
            ),
            Err(e) => log::warn!("unreadable telemetry response: {}", e),
        }
    }

    /// Records discarded because an outbox was full, across every engine
    /// this runner has retired plus the live one.
    pub fn telemetry_dropped(&self) -> u64 {
        let live = self.engine.as_ref().map(|e| e.sink().dropped()).unwrap_or(0);
        self.retired_dropped + self.carried_telemetry.dropped() + live
    }

    fn retire_engine(&mut self) {
        if let Some(mut engine) = self.engine.take() {
            self.retired_dropped += engine.sink().dropped();
            for record in engine.sink_mut().drain() {
                // The outbox never refuses a record
                let _ = self.carried_telemetry.submit(record);
            }
        }
    }

    // ---- Accessors read by the page ----

    pub fn commands_ptr(&self) -> *const f32 {
        self.command_buffer.as_ptr()
    }

    pub fn commands_len(&self) -> u32 {
        self.command_buffer.len() as u32
    }

    pub fn command_buffer(&self) -> &[f32] {
        &self.command_buffer
    }

    pub fn live_path(&self) -> &[f32] {
        self.engine.as_ref().map(|e| as_floats(e.live_path())).unwrap_or(&[])
    }

    pub fn engine(&self) -> Option<&TraceEngine<TelemetryOutbox>> {
        self.engine.as_ref()
    }

    pub fn stroke_index(&self) -> u32 {
        self.engine.as_ref().map(|e| e.current_stroke() as u32).unwrap_or(0)
    }

    pub fn stroke_count(&self) -> u32 {
        self.engine
            .as_ref()
            .map(|e| e.character().stroke_count() as u32)
            .unwrap_or(0)
    }

    pub fn is_complete(&self) -> bool {
        self.engine.as_ref().map(|e| e.is_complete()).unwrap_or(false)
    }

    pub fn last_score(&self) -> f32 {
        self.engine
            .as_ref()
            .and_then(|e| e.last_score())
            .map(|s| s.passed_fraction)
            .unwrap_or(0.0)
    }

    pub fn character_list_json(&self) -> String {
        serde_json::to_string(&self.library.previews()).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn character_json(&self, id: u32) -> String {
        self.library
            .get(id)
            .and_then(|c| serde_json::to_string(c).ok())
            .unwrap_or_else(|| "null".to_string())
    }

    pub fn canvas_width(&self) -> f32 {
        self.config.canvas_width
    }

    pub fn canvas_height(&self) -> f32 {
        self.config.canvas_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stroke_engine::bridge::protocol::{
        CMD_CHARACTER_COMPLETE, CMD_SHOW_STROKE_NODES, HEADER_COMMAND_COUNT, HEADER_FLOATS,
        HEADER_STROKE_INDEX,
    };
    use stroke_engine::{CharacterDefinition, Node, ReferenceStroke, StrokeRecord};

    fn library() -> CharacterSet {
        let stroke = |y: f32| {
            ReferenceStroke::new(vec![Node::new(150.0, y), Node::new(300.0, y), Node::new(450.0, y)])
        };
        CharacterSet::new(vec![
            CharacterDefinition { id: 1, name: "一".into(), svg_url: None, strokes: vec![stroke(300.0)] },
            CharacterDefinition {
                id: 2,
                name: "二".into(),
                svg_url: None,
                strokes: vec![stroke(250.0), stroke(350.0)],
            },
        ])
        .unwrap()
    }

    fn draw(runner: &mut PracticeRunner, y: f32) {
        runner.push_input(InputEvent::PointerDown { x: 150.0, y });
        for i in 1..=60 {
            runner.push_input(InputEvent::PointerMove { x: 150.0 + i as f32 * 5.0, y });
        }
        runner.push_input(InputEvent::PointerUp { x: 450.0, y });
    }

    #[test]
    fn input_before_selection_is_ignored() {
        let mut r = PracticeRunner::new(library());
        draw(&mut r, 300.0);
        assert_eq!(r.flush(), 0);
        assert_eq!(r.take_telemetry_json(), "[]");
        assert!(!r.is_complete());
    }

    #[test]
    fn unknown_character_rejected() {
        let mut r = PracticeRunner::new(library());
        assert!(!r.select_character(99));
        assert!(r.engine().is_none());
    }

    #[test]
    fn flush_packs_commands() {
        let mut r = PracticeRunner::new(library());
        assert!(r.select_character(2));
        assert_eq!(r.flush(), 2);
        let buf = r.command_buffer();
        assert_eq!(buf[HEADER_COMMAND_COUNT], 2.0);
        assert_eq!(buf[HEADER_FLOATS], CMD_SHOW_STROKE_NODES as f32);

        draw(&mut r, 250.0);
        draw(&mut r, 350.0);
        let n = r.flush() as usize;
        assert_eq!(n, 6);
        let buf = r.command_buffer();
        assert_eq!(buf[HEADER_STROKE_INDEX], 2.0);
        let last = HEADER_FLOATS + (n - 1) * 4;
        assert_eq!(buf[last], CMD_CHARACTER_COMPLETE as f32);
        assert_eq!(buf[last + 1], 2.0);
        assert!(r.is_complete());
        assert_eq!(r.last_score(), 1.0);
    }

    #[test]
    fn telemetry_survives_character_switch() {
        let mut r = PracticeRunner::new(library());
        r.set_user(7);
        r.select_character(1);
        draw(&mut r, 300.0);
        r.select_character(2);
        assert_eq!(r.stroke_index(), 0);

        let json = r.take_telemetry_json();
        let records: Vec<StrokeRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].user_id, 7);
        assert_eq!(records[0].character_id, 1);
        assert_eq!(r.take_telemetry_json(), "[]");
    }

    #[test]
    fn carried_telemetry_is_bounded() {
        let mut r = PracticeRunner::new(library());
        assert!(r.configure(r#"{"telemetry_capacity": 4}"#));
        for _ in 0..50 {
            r.select_character(1);
            for _ in 0..5 {
                // Misses the stroke entirely, so each attempt is a retry
                draw(&mut r, 500.0);
            }
        }
        r.exit_practice();

        let records: Vec<StrokeRecord> = serde_json::from_str(&r.take_telemetry_json()).unwrap();
        assert_eq!(records.len(), 4);
        // Only the last engine's newest attempts survive
        assert_eq!(records.iter().map(|rec| rec.attempt).collect::<Vec<_>>(), vec![2, 3, 4, 5]);
        assert_eq!(r.telemetry_dropped(), 50 * 5 - 4);
    }

    #[test]
    fn exit_keeps_pending_telemetry() {
        let mut r = PracticeRunner::new(library());
        r.select_character(1);
        draw(&mut r, 300.0);
        r.exit_practice();
        assert!(r.engine().is_none());
        assert_eq!(r.commands_len(), 0);
        let records: Vec<StrokeRecord> = serde_json::from_str(&r.take_telemetry_json()).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn live_path_as_floats() {
        let mut r = PracticeRunner::new(library());
        r.select_character(1);
        r.push_input(InputEvent::PointerDown { x: 1.0, y: 2.0 });
        r.push_input(InputEvent::PointerMove { x: 3.0, y: 4.0 });
        assert_eq!(r.live_path(), &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn configure_applies_to_next_selection() {
        let mut r = PracticeRunner::new(library());
        assert!(!r.configure("not json"));
        assert!(r.configure(r#"{"canvas_width": 600, "scoring": {"proximity_radius": 5}}"#));
        assert_eq!(r.canvas_width(), 600.0);
        r.select_character(1);
        // Trace 10 px off the skeleton now misses every node
        draw(&mut r, 310.0);
        assert_eq!(r.stroke_index(), 0);
    }

    #[test]
    fn character_json_round_trip() {
        let r = PracticeRunner::new(library());
        let list: serde_json::Value = serde_json::from_str(&r.character_list_json()).unwrap();
        assert_eq!(list[1]["name"], "二");
        let c = CharacterDefinition::from_json(&r.character_json(2)).unwrap();
        assert_eq!(c.stroke_count(), 2);
        assert_eq!(r.character_json(42), "null");
    }
}
