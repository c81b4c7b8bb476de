use serde::{Deserialize, Serialize};

use crate::error::ErrorInfo;

/// Lifecycle state of a player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerState {
    /// Source is being fetched or the engine is starting
    #[default]
    Loading,
    /// Player is playing
    Playing,
    /// Player is paused
    Paused,
    /// Player is stopped at the first frame
    Stopped,
    /// Playback ran to the end and will not loop again
    Completed,
    /// Loading or rendering failed
    Error,
    /// Paused by the host (hidden tab, scrolled out of view)
    Frozen,
    /// Torn down; no further operations have any effect
    Destroyed,
}

impl PlayerState {
    /// Get the name of this state
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Stopped => "stopped",
            Self::Completed => "completed",
            Self::Error => "error",
            Self::Frozen => "frozen",
            Self::Destroyed => "destroyed",
        }
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing)
    }

    /// States in which the engine holds a usable animation.
    #[inline]
    pub fn has_animation(&self) -> bool {
        matches!(
            self,
            Self::Playing | Self::Paused | Self::Stopped | Self::Completed | Self::Frozen
        )
    }
}

/// Everything the player tracks about the current playback.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaybackState {
    pub state: PlayerState,
    /// State before the last transition.
    pub prev: PlayerState,
    /// Completed loops, in half units: a bounce leg adds 1, a full loop 2.
    pub loop_half_units: u32,
    /// Current frame relative to the animation's in point.
    pub position: f32,
    /// Progress through the animation, 0..=100.
    pub seeker: f32,
    /// Index into the loaded animations.
    pub current_animation: usize,
    /// Frames in the current animation.
    pub total_frames: f32,
    /// Host document hidden (visibility API).
    pub hidden: bool,
    /// Container intersecting the viewport.
    pub visible: bool,
    /// Seeker drag in progress; resumes playback on release when set.
    pub drag_resume: Option<bool>,
    pub error: Option<ErrorInfo>,
}

impl PlaybackState {
    pub fn new() -> Self {
        Self {
            visible: true,
            ..Default::default()
        }
    }

    /// Move to `next`, remembering the state being left.
    pub fn transition(&mut self, next: PlayerState) {
        self.prev = self.state;
        self.state = next;
    }

    /// Record a frame reported by the engine.
    pub fn set_position(&mut self, frame: f32) {
        self.position = frame;
        self.seeker = if self.total_frames > 0.0 {
            (frame * 100.0 / self.total_frames).clamp(0.0, 100.0)
        } else {
            0.0
        };
    }

    /// Whole loops completed so far.
    pub fn loop_count(&self) -> u32 {
        self.loop_half_units / 2
    }

    /// Clear per-animation progress, keeping host signals.
    pub fn reset_progress(&mut self, total_frames: f32) {
        self.loop_half_units = 0;
        self.total_frames = total_frames;
        self.position = 0.0;
        self.seeker = 0.0;
        self.drag_resume = None;
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_remembers_previous_state() {
        let mut s = PlaybackState::new();
        s.transition(PlayerState::Playing);
        s.transition(PlayerState::Paused);
        assert_eq!(s.state, PlayerState::Paused);
        assert_eq!(s.prev, PlayerState::Playing);
    }

    #[test]
    fn seeker_tracks_position() {
        let mut s = PlaybackState::new();
        s.reset_progress(200.0);
        s.set_position(50.0);
        assert_eq!(s.seeker, 25.0);
        s.set_position(500.0);
        assert_eq!(s.seeker, 100.0);
    }

    #[test]
    fn half_units_round_down_to_loops() {
        let mut s = PlaybackState::new();
        s.loop_half_units = 5;
        assert_eq!(s.loop_count(), 2);
    }

    #[test]
    fn state_names() {
        assert_eq!(PlayerState::Frozen.name(), "frozen");
        assert!(PlayerState::Completed.has_animation());
        assert!(!PlayerState::Error.has_animation());
    }
}
