use crate::api::commands::RenderCommand;
use crate::api::config::EngineConfig;
use crate::api::telemetry::{StrokeRecord, TelemetrySink};
use crate::assets::CharacterDefinition;
use crate::capture::PathAccumulator;
use crate::geometry::Node;
use crate::input::{InputEvent, InputQueue};
use crate::progression::{Phase, Progression, Transition};
use crate::scoring::{ScoreResult, StrokeScorer};

/// Who is practising. Passed in explicitly; the engine never looks it up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionContext {
    pub user_id: u32,
}

/// Result of evaluating one finished trace.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeOutcome {
    /// The stroke the trace was judged against.
    pub stroke: usize,
    pub score: ScoreResult,
    pub transition: Transition,
}

/// Wires pointer input to capture, scoring and progression for one character.
///
/// Everything runs synchronously on the caller's thread. Output goes to two
/// places: render commands queue up until the host drains them, and one
/// telemetry record per evaluated stroke is handed to the sink after the
/// state transition has been applied.
pub struct TraceEngine<S: TelemetrySink> {
    character: CharacterDefinition,
    session: SessionContext,
    config: EngineConfig,
    scorer: StrokeScorer,
    accumulator: PathAccumulator,
    progression: Progression,
    commands: Vec<RenderCommand>,
    last_score: Option<ScoreResult>,
    sink: S,
}

impl<S: TelemetrySink> TraceEngine<S> {
    pub fn new(character: CharacterDefinition, session: SessionContext, config: EngineConfig, sink: S) -> Self {
        let progression = Progression::new(character.id, character.stroke_count());
        let scorer = StrokeScorer::new(config.scoring);

        // Only the first stroke's markers start visible
        let mut commands = Vec::with_capacity(character.stroke_count() + 4);
        for stroke in 0..character.stroke_count() {
            if stroke == 0 {
                commands.push(RenderCommand::ShowStrokeNodes { stroke });
            } else {
                commands.push(RenderCommand::HideStrokeNodes { stroke });
            }
        }

        log::info!(
            "practice started: character {} ({}), {} strokes, user {}",
            character.id,
            character.name,
            character.stroke_count(),
            session.user_id
        );

        Self {
            character,
            session,
            config,
            scorer,
            accumulator: PathAccumulator::new(),
            progression,
            commands,
            last_score: None,
            sink,
        }
    }

    /// Start a trace. Ignored once the character is complete.
    pub fn on_pointer_down(&mut self, p: Node) {
        if self.progression.is_complete() {
            return;
        }
        self.accumulator.begin(p);
    }

    /// Extend the active trace; no-op without one.
    pub fn on_pointer_move(&mut self, p: Node) {
        self.accumulator.extend(p);
    }

    /// Finish the trace and evaluate it. Returns `None` when there was no
    /// trace to evaluate.
    pub fn on_pointer_up(&mut self) -> Option<StrokeOutcome> {
        let path = self.accumulator.end();
        if path.is_empty() {
            return None;
        }

        let stroke = match self.progression.phase() {
            Phase::AwaitingStroke(i) => i,
            Phase::CharacterComplete => return None,
        };

        let reference = self
            .character
            .stroke(stroke)
            .map(|s| s.nodes.as_slice())
            .unwrap_or(&[]);
        let score = self.scorer.score(&path, reference);
        let transition = self.progression.apply(&score);
        self.emit_for(transition, &score);

        self.ship_telemetry(stroke, &path, &score);

        self.last_score = Some(score.clone());
        Some(StrokeOutcome { stroke, score, transition })
    }

    /// Pointer released outside the surface: evaluated like a normal release.
    pub fn on_pointer_cancel(&mut self) -> Option<StrokeOutcome> {
        self.on_pointer_up()
    }

    /// Dispatch one input event.
    pub fn handle(&mut self, event: InputEvent) -> Option<StrokeOutcome> {
        match event {
            InputEvent::PointerDown { x, y } => {
                self.on_pointer_down(Node::new(x, y));
                None
            }
            InputEvent::PointerMove { x, y } => {
                self.on_pointer_move(Node::new(x, y));
                None
            }
            InputEvent::PointerUp { .. } => self.on_pointer_up(),
            InputEvent::PointerCancel => self.on_pointer_cancel(),
        }
    }

    /// Drain and handle every queued event in order.
    pub fn process(&mut self, input: &mut InputQueue) -> Vec<StrokeOutcome> {
        input.drain().into_iter().filter_map(|e| self.handle(e)).collect()
    }

    /// Take the render commands emitted since the last drain.
    pub fn drain_commands(&mut self) -> Vec<RenderCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn pending_commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// The trace in progress, for live ink. Empty when not tracing.
    pub fn live_path(&self) -> &[Node] {
        self.accumulator.points()
    }

    pub fn is_tracing(&self) -> bool {
        self.accumulator.is_active()
    }

    /// Reference nodes of the strokes already passed, for redraws.
    pub fn completed_strokes(&self) -> impl Iterator<Item = &[Node]> {
        self.character
            .strokes
            .iter()
            .take(self.progression.completed_strokes())
            .map(|s| s.nodes.as_slice())
    }

    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    pub fn current_stroke(&self) -> usize {
        self.progression.current_stroke()
    }

    pub fn is_complete(&self) -> bool {
        self.progression.is_complete()
    }

    pub fn character(&self) -> &CharacterDefinition {
        &self.character
    }

    pub fn session(&self) -> SessionContext {
        self.session
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn last_score(&self) -> Option<&ScoreResult> {
        self.last_score.as_ref()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    fn emit_for(&mut self, transition: Transition, score: &ScoreResult) {
        let fraction = score.passed_fraction;
        match transition {
            Transition::Advanced { completed, next } => {
                self.commands.push(RenderCommand::MarkStrokeComplete { stroke: completed });
                self.commands.push(RenderCommand::SuccessFeedback { stroke: completed, score: fraction });
                self.commands.push(RenderCommand::ShowStrokeNodes { stroke: next });
            }
            Transition::Completed { completed } => {
                self.commands.push(RenderCommand::MarkStrokeComplete { stroke: completed });
                self.commands.push(RenderCommand::SuccessFeedback { stroke: completed, score: fraction });
                self.commands.push(RenderCommand::CharacterComplete { character_id: self.character.id });
            }
            Transition::Retry { stroke } => {
                self.commands.push(RenderCommand::ClearLiveInk);
                self.commands.push(RenderCommand::RedrawCompletedStrokes { count: stroke });
                self.commands.push(RenderCommand::FailureFeedback { stroke, score: fraction });
            }
            Transition::Ignored => {}
        }
    }

    fn ship_telemetry(&mut self, stroke: usize, path: &[Node], score: &ScoreResult) {
        let record = StrokeRecord {
            user_id: self.session.user_id,
            character_id: self.character.id,
            stroke_index: stroke,
            path: self.config.compaction.apply(path),
            score: score.passed_fraction,
            attempt: self.progression.attempts(stroke),
        };
        if let Err(e) = self.sink.submit(record) {
            log::warn!(
                "telemetry for character {} stroke {} not recorded: {}",
                self.character.id,
                stroke,
                e
            );
        }
    }
}
