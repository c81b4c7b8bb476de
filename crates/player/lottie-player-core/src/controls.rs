//! Control bar view model.
//!
//! Plain data describing what the control surface should show. Hosts render
//! it however they like and route clicks back to the matching player
//! operation.

use serde::{Deserialize, Serialize};

use crate::state::PlayerState;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlayGlyph {
    Play,
    Pause,
}

/// Snapshot of the control surface.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlBar {
    /// The host asked for controls to be shown.
    pub visible: bool,
    /// Glyph on the play toggle: pause while playing, play otherwise.
    pub play_glyph: PlayGlyph,
    pub looping: bool,
    pub boomerang: bool,
    /// Seeker slider value, 0..=100.
    pub seeker: f32,
    /// `"<frame>/<total>"`.
    pub frame_label: String,
    pub show_prev: bool,
    pub show_next: bool,
    pub prev_enabled: bool,
    pub next_enabled: bool,
    pub state: PlayerState,
    pub error: Option<String>,
}

/// Inputs to [`ControlBar::build`], gathered by the player.
#[derive(Clone, Debug, Default)]
pub struct ControlInputs<'a> {
    pub visible: bool,
    pub state: PlayerState,
    pub looping: bool,
    pub boomerang: bool,
    pub position: f32,
    pub seeker: f32,
    pub total_frames: f32,
    pub current_animation: usize,
    pub animation_count: usize,
    pub error: Option<&'a str>,
}

impl ControlBar {
    pub fn build(input: ControlInputs<'_>) -> Self {
        let multi = input.animation_count > 1;
        Self {
            visible: input.visible,
            play_glyph: if input.state.is_playing() {
                PlayGlyph::Pause
            } else {
                PlayGlyph::Play
            },
            looping: input.looping,
            boomerang: input.boomerang,
            seeker: input.seeker,
            frame_label: format!(
                "{}/{}",
                input.position.round() as i64,
                input.total_frames.round() as i64
            ),
            show_prev: multi,
            show_next: multi,
            prev_enabled: multi && input.current_animation > 0,
            next_enabled: multi && input.current_animation + 1 < input.animation_count,
            state: input.state,
            error: input.error.map(str::to_string),
        }
    }
}
