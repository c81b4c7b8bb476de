//! The player: one owner of configuration, playback state and the engine.
//!
//! Every public operation is a named transition. It drives the engine,
//! updates [`PlaybackState`] and emits exactly one [`PlayerEvent`] (or none,
//! when the transition does not apply in the current state). Engine progress
//! comes back through [`Player::handle_engine_event`]; deferred restarts go
//! out through [`Player::take_scheduled`].

use log::{debug, error, warn};

use crate::config::{AnimationSettings, EffectiveSettings, PlayerConfig, Segment};
use crate::controls::{ControlBar, ControlInputs};
use crate::engine::{EngineError, EngineEvent, EngineParams, RenderEngine, RendererSettings};
use crate::error::{ErrorInfo, PlayerError};
use crate::events::{EventBus, Listener, PlayerEvent, PlayerEventKind, SubscriptionId};
use crate::schedule::{ScheduledTask, Task};
use crate::seek::SeekTarget;
use crate::snapshot::Snapshot;
use crate::state::{PlaybackState, PlayerState};
use lottie_bundle_core::{
    file_stem, resolve_source, AnimationDocument, Bundle, BundleError, Direction, Fetch, Manifest,
    ManifestAnimation, PlayMode, Source,
};

/// Pixels of page scroll per frame when animating on scroll.
pub const SCROLL_PX_PER_FRAME: f32 = 3.0;

const DEFAULT_STEM: &str = "animation";

/// Proof that a load was started; results for an older ticket are dropped.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

pub struct Player<E: RenderEngine> {
    engine: E,
    config: PlayerConfig,
    playback: PlaybackState,
    /// Settings in force for the current animation.
    active: EffectiveSettings,
    animations: Vec<AnimationDocument>,
    manifest: Option<Manifest>,
    is_dot_lottie: bool,
    source: Option<Source>,
    generation: u64,
    events: EventBus,
    scheduled: Vec<ScheduledTask>,
}

impl<E: RenderEngine> Player<E> {
    pub fn new(engine: E, config: PlayerConfig) -> Self {
        let active = EffectiveSettings::resolve(&config, None, None);
        Self {
            engine,
            config,
            playback: PlaybackState::new(),
            active,
            animations: Vec::new(),
            manifest: None,
            is_dot_lottie: false,
            source: None,
            generation: 0,
            events: EventBus::new(),
            scheduled: Vec::new(),
        }
    }

    // ---- accessors ----

    pub fn state(&self) -> PlayerState {
        self.playback.state
    }

    pub fn previous_state(&self) -> PlayerState {
        self.playback.prev
    }

    pub fn playback(&self) -> &PlaybackState {
        &self.playback
    }

    /// Whole loops completed in the current run.
    pub fn loop_count(&self) -> u32 {
        self.playback.loop_count()
    }

    pub fn position(&self) -> f32 {
        self.playback.position
    }

    pub fn seeker(&self) -> f32 {
        self.playback.seeker
    }

    pub fn total_frames(&self) -> f32 {
        self.playback.total_frames
    }

    pub fn current_animation(&self) -> usize {
        self.playback.current_animation
    }

    pub fn current_animation_id(&self) -> Option<&str> {
        self.manifest
            .as_ref()
            .and_then(|m| m.animations.get(self.playback.current_animation))
            .map(|a| a.id.as_str())
    }

    pub fn manifest(&self) -> Option<&Manifest> {
        self.manifest.as_ref()
    }

    pub fn animations(&self) -> &[AnimationDocument] {
        &self.animations
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn settings(&self) -> &EffectiveSettings {
        &self.active
    }

    pub fn error(&self) -> Option<&ErrorInfo> {
        self.playback.error.as_ref()
    }

    pub fn is_bounce(&self) -> bool {
        self.active.mode == PlayMode::Bounce
    }

    pub fn is_dot_lottie(&self) -> bool {
        self.is_dot_lottie
    }

    pub fn segment(&self) -> Option<Segment> {
        self.config.segment
    }

    pub fn source(&self) -> Option<&Source> {
        self.source.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn controls(&self) -> ControlBar {
        ControlBar::build(ControlInputs {
            visible: self.config.controls,
            state: self.playback.state,
            looping: self.active.looping,
            boomerang: self.is_bounce(),
            position: self.playback.position,
            seeker: self.playback.seeker,
            total_frames: self.playback.total_frames,
            current_animation: self.playback.current_animation,
            animation_count: self.animations.len(),
            error: self.playback.error.as_ref().map(|e| e.message.as_str()),
        })
    }

    // ---- events & scheduling ----

    pub fn subscribe(&mut self, kind: Option<PlayerEventKind>, listener: Listener) -> SubscriptionId {
        self.events.subscribe(kind, listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    fn emit(&mut self, event: PlayerEvent) {
        self.events.emit(&event);
    }

    fn transition(&mut self, next: PlayerState, event: Option<PlayerEvent>) {
        debug!(
            "player: {} -> {}",
            self.playback.state.name(),
            next.name()
        );
        self.playback.transition(next);
        if let Some(event) = event {
            self.emit(event);
        }
    }

    /// Hand pending deferred work to the host.
    pub fn take_scheduled(&mut self) -> Vec<ScheduledTask> {
        std::mem::take(&mut self.scheduled)
    }

    fn schedule(&mut self, delay_ms: u32, task: Task) {
        self.scheduled.push(ScheduledTask {
            delay_ms,
            task,
            generation: self.generation,
        });
    }

    /// Run a task the host has held for its delay.
    pub fn run_scheduled(&mut self, task: ScheduledTask) {
        if task.generation != self.generation {
            debug!(
                "player: dropping {:?} from generation {} (now {})",
                task.task, task.generation, self.generation
            );
            return;
        }
        match task.task {
            Task::Resume => {
                // The user may have paused during the intermission.
                if self.playback.state == PlayerState::Playing {
                    self.engine.play();
                }
            }
        }
    }

    // ---- loading ----

    /// Fetch, resolve and start `source` in one go. Failures end in the
    /// Error state with an Error event; read [`Player::error`] for details.
    pub fn load(&mut self, source: Source, fetch: &mut dyn Fetch) {
        let ticket = self.begin_load(source.clone());
        let result = resolve_source(&source, fetch);
        self.complete_load(ticket, result);
    }

    /// Reload the last source from scratch. Does nothing before the first load.
    pub fn reload(&mut self, fetch: &mut dyn Fetch) {
        match self.source.clone() {
            Some(source) => self.load(source, fetch),
            None => warn!("player: reload requested before any load"),
        }
    }

    /// Start an asynchronous load. The host resolves the source and passes
    /// the outcome to [`Player::complete_load`] with the returned ticket.
    pub fn begin_load(&mut self, source: Source) -> LoadTicket {
        self.generation += 1;
        self.scheduled.clear();
        self.engine.destroy();
        self.animations.clear();
        self.manifest = None;
        self.is_dot_lottie = false;
        self.source = Some(source);
        self.playback.reset_progress(0.0);
        self.playback.current_animation = 0;
        self.transition(PlayerState::Loading, None);
        LoadTicket {
            generation: self.generation,
        }
    }

    /// Finish a load started by [`Player::begin_load`]. Never fails: errors
    /// are recorded in the playback state and announced as an Error event.
    pub fn complete_load(&mut self, ticket: LoadTicket, result: Result<Bundle, BundleError>) {
        if ticket.generation != self.generation || self.playback.state == PlayerState::Destroyed {
            debug!(
                "player: discarding stale load (ticket {}, now {})",
                ticket.generation, self.generation
            );
            return;
        }
        match result {
            Ok(bundle) => {
                self.install_bundle(bundle);
                self.start_current();
            }
            Err(err) => self.fail(&PlayerError::from(err)),
        }
    }

    fn install_bundle(&mut self, bundle: Bundle) {
        self.is_dot_lottie = bundle.is_dot_lottie;
        let manifest = match bundle.manifest {
            Some(m) => m,
            None => synthesize_manifest(bundle.animations.len()),
        };
        self.playback.current_animation = manifest
            .active_index()
            .filter(|i| *i < bundle.animations.len())
            .unwrap_or(0);
        self.manifest = Some(manifest);
        self.animations = bundle.animations;
    }

    /// Instantiate the current animation and autoplay when asked to.
    fn start_current(&mut self) {
        match self.instantiate() {
            Ok(()) => {
                if self.active.autoplay && !self.config.animate_on_scroll {
                    self.play();
                }
            }
            Err(err) => self.fail(&err),
        }
    }

    fn effective_for(&self, index: usize) -> EffectiveSettings {
        let entry = self
            .manifest
            .as_ref()
            .and_then(|m| m.animations.get(index));
        let overrides = self.config.multi_animation_settings.get(index);
        EffectiveSettings::resolve(&self.config, entry, overrides)
    }

    /// Hand the current document to a fresh engine instance.
    fn instantiate(&mut self) -> Result<(), PlayerError> {
        let index = self.playback.current_animation;
        let document = self.animations.get(index).ok_or(PlayerError::NotLoaded)?;
        let missing = document.missing_fields();
        if !missing.is_empty() {
            return Err(PlayerError::Malformed { missing });
        }
        let total_frames = match self.config.segment {
            Some(segment) => segment.len(),
            None => document.total_frames(),
        };

        self.active = self.effective_for(index);
        self.engine.destroy();
        self.engine.load(EngineParams {
            document,
            renderer: self.config.renderer,
            looping: self.active.engine_loop(),
            autoplay: false,
            initial_segment: self.config.segment,
            renderer_settings: RendererSettings::for_mode(
                self.config.renderer,
                self.config.object_fit,
            ),
        })?;
        self.apply_active();

        self.playback.reset_progress(total_frames);
        if self.active.direction == Direction::Backward {
            self.playback.set_position(self.last_frame());
        }
        self.transition(PlayerState::Paused, None);
        Ok(())
    }

    fn apply_active(&mut self) {
        self.engine.set_speed(self.active.speed);
        self.engine.set_direction(self.active.direction);
        self.engine.set_loop(self.active.engine_loop());
        self.engine.set_subframe(self.config.subframe);
    }

    fn fail(&mut self, err: &PlayerError) {
        error!("player: load failed ({}): {err}", err.category());
        let info = err.info();
        self.playback.error = Some(info.clone());
        self.transition(
            PlayerState::Error,
            Some(PlayerEvent::Error {
                message: info.message,
                status: info.status,
            }),
        );
    }

    /// Index of the final frame; engines count frames `0..total_frames`.
    fn last_frame(&self) -> f32 {
        (self.playback.total_frames - 1.0).max(0.0)
    }

    fn ready(&self) -> bool {
        self.playback.state.has_animation() && !self.animations.is_empty()
    }

    // ---- playback ----

    pub fn play(&mut self) {
        if !self.ready() || self.playback.state == PlayerState::Playing {
            return;
        }
        if self.playback.state == PlayerState::Completed {
            self.restart_completed();
        } else {
            self.engine.play();
        }
        self.transition(PlayerState::Playing, Some(PlayerEvent::Play));
    }

    /// Replay after a completed run. A bounce picks up from where it stopped
    /// in the other direction; otherwise playback starts over from the
    /// boundary its direction begins at.
    fn restart_completed(&mut self) {
        self.playback.loop_half_units = 0;
        let last = self.last_frame();
        if self.is_bounce() {
            self.active.direction = self.active.direction.reversed();
            self.engine.set_direction(self.active.direction);
            let frame = self.engine.current_frame();
            self.engine.go_to_and_play(frame, true);
        } else if self.active.direction == Direction::Backward {
            self.engine.go_to_and_play(last, true);
        } else {
            self.engine.go_to_and_play(0.0, true);
        }
    }

    pub fn pause(&mut self) {
        if !self.ready() || self.playback.state == PlayerState::Paused {
            return;
        }
        self.engine.pause();
        self.transition(PlayerState::Paused, Some(PlayerEvent::Pause));
    }

    pub fn stop(&mut self) {
        if !self.ready() {
            return;
        }
        self.engine.stop();
        self.playback.loop_half_units = 0;
        self.playback.set_position(0.0);
        self.transition(PlayerState::Stopped, Some(PlayerEvent::Stop));
    }

    pub fn toggle_play(&mut self) {
        if self.playback.state == PlayerState::Playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Seek to `"<frame>"` or `"<percent>%"`. Any other input is ignored.
    pub fn seek(&mut self, value: &str) {
        match SeekTarget::parse(value) {
            Some(target) => self.seek_to(target),
            None => debug!("player: ignoring seek to {value:?}"),
        }
    }

    pub fn seek_to(&mut self, target: SeekTarget) {
        if !self.ready() {
            return;
        }
        let frame = target
            .frame(self.playback.total_frames)
            .clamp(0.0, self.last_frame());
        let keep_playing = self.playback.state == PlayerState::Playing
            || (self.playback.state == PlayerState::Frozen
                && self.playback.prev == PlayerState::Playing);

        if keep_playing {
            self.engine.go_to_and_play(frame, true);
            if self.playback.state != PlayerState::Playing {
                self.transition(PlayerState::Playing, None);
            }
        } else {
            self.engine.go_to_and_stop(frame, true);
            if self.playback.state != PlayerState::Paused {
                self.engine.pause();
                self.transition(PlayerState::Paused, None);
            }
        }
        self.playback.set_position(frame);
    }

    // ---- settings ----

    pub fn set_speed(&mut self, speed: f32) {
        self.config.speed = speed;
        self.active.speed = speed;
        self.engine.set_speed(speed);
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.config.direction = direction;
        self.active.direction = direction;
        self.engine.set_direction(direction);
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.config.looping = looping;
        self.active.looping = looping;
        self.engine.set_loop(self.active.engine_loop());
    }

    pub fn toggle_looping(&mut self) {
        self.set_looping(!self.active.looping);
    }

    pub fn set_mode(&mut self, mode: PlayMode) {
        self.config.mode = mode;
        self.active.mode = mode;
        self.engine.set_loop(self.active.engine_loop());
    }

    pub fn toggle_boomerang(&mut self) {
        let mode = match self.active.mode {
            PlayMode::Bounce => PlayMode::Normal,
            PlayMode::Normal => PlayMode::Bounce,
        };
        self.set_mode(mode);
    }

    /// Stop looping after `count` loops; `None` or zero loops forever.
    pub fn set_count(&mut self, count: Option<u32>) {
        let count = count.filter(|c| *c > 0);
        self.config.count = count;
        self.active.count = count;
        self.engine.set_loop(self.active.engine_loop());
    }

    pub fn set_intermission(&mut self, ms: u32) {
        self.config.intermission = ms;
        self.active.intermission = ms;
        self.engine.set_loop(self.active.engine_loop());
    }

    pub fn set_subframe(&mut self, enabled: bool) {
        self.config.subframe = enabled;
        self.engine.set_subframe(enabled);
    }

    pub fn set_segment(&mut self, segment: Option<Segment>) -> Result<(), PlayerError> {
        self.config.segment = segment;
        if !self.ready() {
            return Ok(());
        }
        match segment {
            Some(segment) => {
                self.engine.play_segments(segment, true);
                self.playback.total_frames = segment.len();
                self.playback.set_position(0.0);
                if !self.playback.state.is_playing() {
                    self.engine.pause();
                }
                Ok(())
            }
            None => self.restart_animation(),
        }
    }

    pub fn set_multi_animation_settings(&mut self, settings: Vec<AnimationSettings>) {
        self.config.multi_animation_settings = settings;
        if !self.animations.is_empty() {
            self.active = self.effective_for(self.playback.current_animation);
            self.apply_active();
        }
    }

    /// Reflect a host attribute. Returns whether the attribute is a
    /// configuration attribute at all.
    pub fn apply_attribute(&mut self, name: &str, value: Option<&str>) -> Result<bool, PlayerError> {
        let before = self.config.clone();
        if !self.config.apply_attribute(name, value)? {
            return Ok(false);
        }
        if self.animations.is_empty() || !self.playback.state.has_animation() {
            return Ok(true);
        }
        if before.renderer != self.config.renderer || before.object_fit != self.config.object_fit {
            self.restart_animation()?;
        } else if before.segment != self.config.segment {
            self.set_segment(self.config.segment)?;
        } else {
            self.active = self.effective_for(self.playback.current_animation);
            self.apply_active();
        }
        Ok(true)
    }

    /// Rebuild the engine for the current animation, keeping play state.
    fn restart_animation(&mut self) -> Result<(), PlayerError> {
        let was_playing = self.playback.state.is_playing();
        if let Err(err) = self.instantiate() {
            self.fail(&err);
            return Err(err);
        }
        if was_playing {
            self.play();
        }
        Ok(())
    }

    // ---- multi-animation ----

    pub fn next(&mut self) -> Result<(), PlayerError> {
        let index = self.playback.current_animation + 1;
        if index >= self.animations.len() {
            return Ok(());
        }
        self.switch_to(index, PlayerEvent::Next)
    }

    pub fn prev(&mut self) -> Result<(), PlayerError> {
        if self.playback.current_animation == 0 || self.animations.is_empty() {
            return Ok(());
        }
        self.switch_to(self.playback.current_animation - 1, PlayerEvent::Previous)
    }

    fn switch_to(&mut self, index: usize, event: PlayerEvent) -> Result<(), PlayerError> {
        self.generation += 1;
        self.scheduled.clear();
        self.playback.current_animation = index;
        if let Err(err) = self.instantiate() {
            self.fail(&err);
            return Err(err);
        }
        self.emit(event);
        if self.active.autoplay {
            self.play();
        }
        Ok(())
    }

    // ---- snapshot ----

    /// Capture the frame on screen. `name` overrides the file stem taken
    /// from the source locator.
    pub fn snapshot(&self, name: Option<&str>) -> Result<Snapshot, PlayerError> {
        if !self.ready() {
            return Err(PlayerError::NotLoaded);
        }
        let data = self.engine.snapshot_svg().ok_or(PlayerError::NotLoaded)?;
        let stem = name
            .or_else(|| self.source.as_ref().and_then(Source::locator).and_then(file_stem))
            .unwrap_or(DEFAULT_STEM);
        Ok(Snapshot::svg(stem, self.playback.position, data))
    }

    // ---- host lifecycle ----

    /// The player was attached to the host document.
    pub fn connect(&mut self) {
        self.emit(PlayerEvent::Rendered);
    }

    /// The player was removed from the host document.
    pub fn disconnect(&mut self) {
        self.destroy();
    }

    pub fn destroy(&mut self) {
        if self.playback.state == PlayerState::Destroyed {
            return;
        }
        self.generation += 1;
        self.scheduled.clear();
        self.engine.destroy();
        self.animations.clear();
        self.transition(PlayerState::Destroyed, Some(PlayerEvent::Destroyed));
    }

    /// Pause on behalf of the host, remembering what to resume to.
    pub fn freeze(&mut self) {
        if !self.ready() {
            return;
        }
        if self.playback.state != PlayerState::Frozen {
            self.playback.prev = self.playback.state;
        }
        self.engine.pause();
        self.playback.state = PlayerState::Frozen;
        self.emit(PlayerEvent::Freeze);
    }

    /// Resume after [`Player::freeze`] if the player was playing before.
    pub fn unfreeze(&mut self) {
        if self.playback.state == PlayerState::Frozen && self.playback.prev == PlayerState::Playing {
            self.engine.play();
            self.transition(PlayerState::Playing, Some(PlayerEvent::Play));
        }
    }

    pub fn set_document_hidden(&mut self, hidden: bool) {
        self.playback.hidden = hidden;
        self.on_visibility_changed();
    }

    pub fn set_intersecting(&mut self, visible: bool) {
        self.playback.visible = visible;
        self.on_visibility_changed();
    }

    fn on_visibility_changed(&mut self) {
        let in_view = self.playback.visible && !self.playback.hidden;
        match self.playback.state {
            PlayerState::Playing if !in_view => self.freeze(),
            PlayerState::Frozen if in_view && !self.config.animate_on_scroll => self.unfreeze(),
            _ => {}
        }
    }

    pub fn pointer_enter(&mut self) {
        if self.config.hover && self.playback.state != PlayerState::Playing {
            self.play();
        }
    }

    pub fn pointer_leave(&mut self) {
        if self.config.hover && self.playback.state == PlayerState::Playing {
            self.pause();
        }
    }

    /// Drive the frame from page scroll. Scroll beyond one viewport is
    /// measured from the bottom of the first viewport.
    pub fn scroll(&mut self, scroll_y: f32, viewport_height: f32) {
        if !self.config.animate_on_scroll || !self.ready() || !self.playback.visible {
            return;
        }
        let adjusted = if scroll_y > viewport_height {
            scroll_y - viewport_height
        } else {
            scroll_y
        };
        let last = self.last_frame();
        let frame = (adjusted / SCROLL_PX_PER_FRAME).floor().clamp(0.0, last);
        self.engine.go_to_and_stop(frame, true);
        self.playback.set_position(frame);
        if frame >= last && self.playback.state != PlayerState::Paused {
            self.transition(PlayerState::Paused, Some(PlayerEvent::Pause));
        }
    }

    pub fn seek_drag_start(&mut self) {
        if !self.ready() {
            return;
        }
        let resume = self.playback.state == PlayerState::Playing;
        self.playback.drag_resume = Some(resume);
        if resume {
            self.pause();
        }
    }

    /// Move the seeker to `percent` (0..=100) while dragging.
    pub fn seek_drag(&mut self, percent: f32) {
        let total = self.playback.total_frames;
        let frame = (total * percent.clamp(0.0, 100.0) / 100.0).round();
        self.seek_to(SeekTarget::Frame(frame));
    }

    pub fn seek_drag_end(&mut self) {
        if self.playback.drag_resume.take() == Some(true) {
            self.play();
        }
    }

    // ---- engine callbacks ----

    pub fn handle_engine_event(&mut self, event: EngineEvent) {
        if matches!(
            self.playback.state,
            PlayerState::Destroyed | PlayerState::Error
        ) {
            debug!("player: ignoring engine event {event:?} in {}", self.playback.state.name());
            return;
        }
        match event {
            EngineEvent::EnterFrame { frame } => {
                self.playback.set_position(frame);
                self.emit(PlayerEvent::Frame {
                    frame,
                    seeker: self.playback.seeker,
                });
            }
            EngineEvent::DataReady => self.emit(PlayerEvent::Load),
            EngineEvent::DomLoaded => self.emit(PlayerEvent::Ready),
            EngineEvent::DataFailed => {
                let err = PlayerError::from(EngineError::new("animation data failed"));
                self.fail(&err);
            }
            EngineEvent::LoopComplete => {
                if self.active.looping {
                    self.on_loop_complete();
                }
            }
            EngineEvent::Complete => {
                if self.active.looping && self.active.managed_loop() {
                    self.on_loop_complete();
                } else {
                    self.on_complete();
                }
            }
        }
    }

    fn on_complete(&mut self) {
        let frame = self.engine.current_frame();
        self.playback.set_position(frame);
        self.transition(
            PlayerState::Completed,
            Some(PlayerEvent::Complete {
                frame,
                seeker: self.playback.seeker,
            }),
        );
        let next = self.playback.current_animation + 1;
        if next < self.animations.len() && self.effective_for(next).autoplay {
            if let Err(err) = self.next() {
                warn!("player: advancing to animation {next} failed: {err}");
            }
        }
    }

    fn on_loop_complete(&mut self) {
        let bounce = self.is_bounce();
        self.playback.loop_half_units += if bounce { 1 } else { 2 };
        self.emit(PlayerEvent::Loop);

        if !self.active.managed_loop() {
            return;
        }
        if let Some(count) = self.active.count {
            if self.playback.loop_half_units >= count * 2 {
                self.on_complete();
                return;
            }
        }

        let last = self.last_frame();
        let boundary = if bounce {
            // Hold where this leg ended, then run the other way.
            let end = match self.active.direction {
                Direction::Forward => last,
                Direction::Backward => 0.0,
            };
            self.active.direction = self.active.direction.reversed();
            self.engine.set_direction(self.active.direction);
            end
        } else {
            match self.active.direction {
                Direction::Forward => 0.0,
                Direction::Backward => last,
            }
        };
        self.engine.go_to_and_stop(boundary, true);
        self.playback.set_position(boundary);

        if self.active.intermission > 0 {
            self.schedule(self.active.intermission, Task::Resume);
        } else {
            self.engine.play();
        }
    }
}

/// Single-entry manifest for sources that carry none.
fn synthesize_manifest(len: usize) -> Manifest {
    Manifest {
        animations: (0..len)
            .map(|_| ManifestAnimation {
                id: uuid::Uuid::new_v4().to_string(),
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    }
}
