//! Lottie Player Core (engine-agnostic)
//!
//! Configuration, playback state machine, lifecycle events and control-bar
//! model for a Lottie / dotLottie player. Rendering is delegated to a
//! [`RenderEngine`]; sources are resolved by `lottie-bundle-core`. Adapters
//! (wasm, native test harnesses) supply the engine, the fetcher and a timer.

pub mod config;
pub mod controls;
pub mod engine;
pub mod error;
pub mod events;
pub mod player;
pub mod schedule;
pub mod seek;
pub mod snapshot;
pub mod state;

pub use config::{AnimationSettings, EffectiveSettings, ObjectFit, PlayerConfig, RenderMode, Segment};
pub use controls::{ControlBar, PlayGlyph};
pub use engine::{EngineError, EngineEvent, EngineParams, RenderEngine, RendererSettings};
pub use error::{ErrorInfo, PlayerError, BROKEN_FILE_MESSAGE};
pub use events::{EventBus, Listener, PlayerEvent, PlayerEventKind, SubscriptionId};
pub use player::{LoadTicket, Player, SCROLL_PX_PER_FRAME};
pub use schedule::{ScheduledTask, Task, TimerQueue};
pub use seek::SeekTarget;
pub use snapshot::Snapshot;
pub use state::{PlaybackState, PlayerState};

// Re-exports so adapters need only this crate.
pub use lottie_bundle_core::{
    AnimationDocument, Bundle, BundleError, Direction, Fetch, FetchResponse, LocalFetcher,
    Manifest, ManifestAnimation, PlayMode, Source,
};
