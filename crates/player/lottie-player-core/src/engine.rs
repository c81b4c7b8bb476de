//! Contract with the external rendering engine.
//!
//! The player never draws. It hands a document and settings to an engine
//! (lottie-web in the browser, anything else natively), drives it through
//! this trait, and is told about progress through [`EngineEvent`]s that the
//! host feeds back into [`crate::Player::handle_engine_event`].

use serde::{Deserialize, Serialize};

use crate::config::{ObjectFit, RenderMode, Segment};
use lottie_bundle_core::{AnimationDocument, Direction};

/// Renderer-specific options, mirroring lottie-web's `rendererSettings`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RendererSettings {
    pub preserve_aspect_ratio: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_preserve_aspect_ratio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide_on_transparent: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progressive_load: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clear_canvas: Option<bool>,
}

impl RendererSettings {
    pub fn for_mode(mode: RenderMode, fit: ObjectFit) -> Self {
        let ratio = fit.preserve_aspect_ratio().to_string();
        match mode {
            RenderMode::Svg => Self {
                image_preserve_aspect_ratio: Some(ratio.clone()),
                preserve_aspect_ratio: ratio,
                hide_on_transparent: Some(true),
                progressive_load: Some(true),
                clear_canvas: None,
            },
            RenderMode::Canvas => Self {
                preserve_aspect_ratio: ratio,
                image_preserve_aspect_ratio: None,
                hide_on_transparent: None,
                progressive_load: Some(true),
                clear_canvas: Some(true),
            },
            RenderMode::Html => Self {
                preserve_aspect_ratio: ratio,
                image_preserve_aspect_ratio: None,
                hide_on_transparent: Some(true),
                progressive_load: None,
                clear_canvas: None,
            },
        }
    }
}

/// Everything an engine needs to instantiate an animation.
#[derive(Clone, Debug)]
pub struct EngineParams<'a> {
    pub document: &'a AnimationDocument,
    pub renderer: RenderMode,
    pub looping: bool,
    pub autoplay: bool,
    pub initial_segment: Option<Segment>,
    pub renderer_settings: RendererSettings,
}

/// Engine-side failure while instantiating or driving an animation.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("engine error: {message}")]
pub struct EngineError {
    pub message: String,
}

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Lifecycle callbacks emitted by the engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEvent {
    /// A new frame was rendered.
    EnterFrame { frame: f32 },
    /// Playback reached the end of a non-looping run.
    Complete,
    /// The engine wrapped around on its own loop.
    LoopComplete,
    /// Animation data parsed.
    DataReady,
    /// Initial render attached to the container.
    DomLoaded,
    /// Animation data could not be used.
    DataFailed,
}

/// Operations the player needs from a rendering engine.
pub trait RenderEngine {
    /// Instantiate an animation, replacing any previous one.
    fn load(&mut self, params: EngineParams<'_>) -> Result<(), EngineError>;
    /// Tear down the current animation, if any.
    fn destroy(&mut self);

    fn play(&mut self);
    fn pause(&mut self);
    fn stop(&mut self);
    /// Jump to `value` (a frame when `is_frame`, else milliseconds) and hold.
    fn go_to_and_stop(&mut self, value: f32, is_frame: bool);
    /// Jump to `value` and continue playing.
    fn go_to_and_play(&mut self, value: f32, is_frame: bool);

    fn set_speed(&mut self, speed: f32);
    fn set_direction(&mut self, direction: Direction);
    fn set_loop(&mut self, looping: bool);
    fn set_subframe(&mut self, enabled: bool);
    fn play_segments(&mut self, segment: Segment, force: bool);

    fn current_frame(&self) -> f32;
    fn total_frames(&self) -> f32;
    fn direction(&self) -> Direction;

    /// Serialize the frame currently on screen as an SVG document.
    fn snapshot_svg(&self) -> Option<String>;
}
