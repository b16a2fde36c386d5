//! Scene graph navigation: typewriter reveal, branch selection, and the
//! quiz-pending / end-reached signals read by the controller.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use story_content::{Catalog, EndingKind, QuestionId, QuizId, Scene, SceneId, SceneKind};

use crate::input::{Button, ButtonEdges};

/// Which outgoing edge a transition should follow.
///
/// `Success` walks `next_scene_a`, `Failure` walks `next_scene_b`. During
/// live navigation the controller passes `Success`; after a quiz the hint
/// carries the quiz outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BranchPath {
    Success,
    Failure,
}

/// Observable navigator states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigatorState {
    /// No story in progress.
    Idle,
    /// Scene text is being revealed one increment per tick.
    Revealing,
    /// Text fully revealed; waiting for a confirm press.
    AwaitingAdvance,
    /// A quiz trigger fired; navigation is parked until the controller
    /// resolves the quiz and calls [`SceneNavigator::continue_after_quiz`].
    QuizPending,
    /// Terminal until an explicit reset.
    EndReached,
}

/// Typewriter pacing.
#[derive(Debug, Clone)]
pub struct RevealConfig {
    /// Glyphs revealed per tick. Values below 1 are read as 1.
    pub glyphs_per_tick: u16,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self { glyphs_per_tick: 2 }
    }
}

/// The scene graph navigator.
///
/// Holds the current position in the read-only scene table plus the text
/// reveal cursor. All mutation happens in [`update`](Self::update),
/// [`start`](Self::start), [`continue_after_quiz`](Self::continue_after_quiz)
/// and [`reset`](Self::reset); every other method is a read-only query.
#[derive(Debug, Clone)]
pub struct SceneNavigator {
    config: RevealConfig,
    state: NavigatorState,
    current: Option<SceneId>,
    /// Glyphs of the current scene's text revealed so far.
    reveal_cursor: usize,
    /// Glyph count of the current scene's text.
    text_len: usize,
}

impl SceneNavigator {
    pub fn new(config: RevealConfig) -> Self {
        Self {
            config,
            state: NavigatorState::Idle,
            current: None,
            reveal_cursor: 0,
            text_len: 0,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(RevealConfig::default())
    }

    /// Return to `Idle` with no current scene.
    pub fn reset(&mut self) {
        self.state = NavigatorState::Idle;
        self.current = None;
        self.reveal_cursor = 0;
        self.text_len = 0;
    }

    /// Bind the starting scene and begin revealing its text.
    ///
    /// An out-of-range scene id is a silent no-op.
    pub fn start(&mut self, catalog: &Catalog, scene: SceneId) {
        if catalog.scene(scene).is_none() {
            warn!("navigator start ignored: scene {scene} is out of range");
            return;
        }
        self.enter_scene(catalog, scene);
        debug!("navigator started at scene {scene}");
    }

    /// Advance the navigator by one tick.
    ///
    /// While `Revealing` this reveals one increment of text; while
    /// `AwaitingAdvance` a rising confirm press advances along the edge the
    /// hint selects. All other states ignore the tick.
    pub fn update(&mut self, catalog: &Catalog, edges: ButtonEdges, hint: BranchPath) {
        match self.state {
            NavigatorState::Revealing => {
                let step = self.config.glyphs_per_tick.max(1) as usize;
                self.reveal_cursor = (self.reveal_cursor + step).min(self.text_len);
                if self.reveal_cursor >= self.text_len {
                    // One-way latch per scene entry.
                    self.state = NavigatorState::AwaitingAdvance;
                    debug!("scene text fully revealed, awaiting advance");
                }
            }
            NavigatorState::AwaitingAdvance => {
                if edges.rising(Button::CONFIRM) {
                    self.advance(catalog, hint);
                }
            }
            NavigatorState::Idle | NavigatorState::QuizPending | NavigatorState::EndReached => {}
        }
    }

    /// Resolve the confirm press on the current scene.
    fn advance(&mut self, catalog: &Catalog, hint: BranchPath) {
        let Some(scene) = self.current.and_then(|id| catalog.scene(id)) else {
            warn!("advance with no current scene; treating as an ending");
            self.state = NavigatorState::EndReached;
            return;
        };

        match scene.kind {
            SceneKind::Normal => self.follow_edge(catalog, hint),
            SceneKind::QuizTrigger => {
                self.state = NavigatorState::QuizPending;
                debug!("scene {} parked pending its quiz", scene.id);
            }
            SceneKind::GoodEnding | SceneKind::BadEnding => {
                self.state = NavigatorState::EndReached;
                debug!("scene {} reached the {:?} ending", scene.id, scene.kind);
            }
        }
    }

    /// Clear the quiz-pending signal and walk the hint-selected edge,
    /// driven by the quiz outcome instead of live input.
    ///
    /// A valid edge re-enters `Revealing` with the cursor reset; a missing
    /// or dangling edge lands in `EndReached`.
    pub fn continue_after_quiz(&mut self, catalog: &Catalog, hint: BranchPath) {
        debug!("continuing after quiz along the {hint:?} path");
        self.follow_edge(catalog, hint);
    }

    fn follow_edge(&mut self, catalog: &Catalog, hint: BranchPath) {
        let target = self
            .current
            .and_then(|id| catalog.scene(id))
            .and_then(|scene| match hint {
                BranchPath::Success => scene.next_scene_a,
                BranchPath::Failure => scene.next_scene_b,
            });

        match target {
            Some(next) if catalog.scene(next).is_some() => {
                self.enter_scene(catalog, next);
                debug!("moved to scene {next}");
            }
            Some(next) => {
                warn!("edge to out-of-range scene {next}; treating as an ending");
                self.state = NavigatorState::EndReached;
            }
            None => {
                self.state = NavigatorState::EndReached;
                debug!("no {hint:?} edge from the current scene; end reached");
            }
        }
    }

    fn enter_scene(&mut self, catalog: &Catalog, id: SceneId) {
        self.current = Some(id);
        self.reveal_cursor = 0;
        self.text_len = catalog
            .scene(id)
            .map(|s| s.text.chars().count())
            .unwrap_or(0);
        self.state = NavigatorState::Revealing;
    }

    pub fn state(&self) -> NavigatorState {
        self.state
    }

    /// Whether a quiz trigger is waiting for the controller.
    pub fn should_trigger_quiz(&self) -> bool {
        self.state == NavigatorState::QuizPending
    }

    /// The full quiz the current scene triggers, bounds-checked.
    pub fn triggered_quiz(&self, catalog: &Catalog) -> Option<QuizId> {
        let scene = self.current.and_then(|id| catalog.scene(id))?;
        if scene.kind != SceneKind::QuizTrigger {
            return None;
        }
        scene.trigger_quiz.filter(|&id| catalog.quiz(id).is_some())
    }

    /// The single question the current scene triggers, bounds-checked.
    ///
    /// When a scene carries both references, single-question mode wins;
    /// callers must check this before [`triggered_quiz`](Self::triggered_quiz).
    pub fn question_id(&self, catalog: &Catalog) -> Option<QuestionId> {
        let scene = self.current.and_then(|id| catalog.scene(id))?;
        if scene.kind != SceneKind::QuizTrigger {
            return None;
        }
        scene
            .question_id
            .filter(|&id| catalog.question(id).is_some())
    }

    pub fn reached_end(&self) -> bool {
        self.state == NavigatorState::EndReached
    }

    /// The ending kind of the current scene, defaulting to `Bad` when no
    /// scene is current or the scene is not an ending.
    pub fn ending(&self, catalog: &Catalog) -> EndingKind {
        self.current
            .and_then(|id| catalog.scene(id))
            .and_then(|scene| scene.kind.ending())
            .unwrap_or(EndingKind::Bad)
    }

    pub fn current_scene<'a>(&self, catalog: &'a Catalog) -> Option<&'a Scene> {
        self.current.and_then(|id| catalog.scene(id))
    }

    /// The revealed prefix of the current scene's text.
    pub fn visible_text<'a>(&self, catalog: &'a Catalog) -> &'a str {
        let Some(scene) = self.current_scene(catalog) else {
            return "";
        };
        match scene.text.char_indices().nth(self.reveal_cursor) {
            Some((byte, _)) => &scene.text[..byte],
            None => &scene.text,
        }
    }

    /// Whether the full scene text is on screen.
    pub fn fully_revealed(&self) -> bool {
        self.reveal_cursor >= self.text_len
    }

    /// Whether the navigator is waiting for a confirm press.
    pub fn awaiting_input(&self) -> bool {
        self.state == NavigatorState::AwaitingAdvance
    }

    /// Background id of the current scene, for the renderer.
    pub fn background(&self, catalog: &Catalog) -> Option<u8> {
        self.current_scene(catalog).map(|s| s.background)
    }

    /// Music id of the current scene, for the renderer.
    pub fn music(&self, catalog: &Catalog) -> Option<u8> {
        self.current_scene(catalog).map(|s| s.music)
    }
}
