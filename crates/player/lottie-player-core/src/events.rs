//! Lifecycle events and their subscribers.
//!
//! Every named player transition emits exactly one [`PlayerEvent`]. Hosts
//! subscribe per kind (or to everything) and map events to whatever their UI
//! layer uses; the wasm adapter forwards them to JS callbacks.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// Discrete lifecycle signals.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
#[non_exhaustive]
pub enum PlayerEvent {
    Play,
    Pause,
    Stop,
    /// Playback reached the end and will not restart.
    Complete {
        frame: f32,
        seeker: f32,
    },
    /// A loop (or bounce leg) finished.
    Loop,
    Error {
        message: String,
        status: u16,
    },
    /// Paused by the host rather than the user.
    Freeze,
    /// First render attached.
    Ready,
    Frame {
        frame: f32,
        seeker: f32,
    },
    Destroyed,
    /// Player attached to the host document.
    Rendered,
    /// Animation data parsed by the engine.
    Load,
    Next,
    Previous,
}

/// Discriminant of [`PlayerEvent`], used as a subscription key.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlayerEventKind {
    Play,
    Pause,
    Stop,
    Complete,
    Loop,
    Error,
    Freeze,
    Ready,
    Frame,
    Destroyed,
    Rendered,
    Load,
    Next,
    Previous,
}

impl PlayerEventKind {
    pub const ALL: [PlayerEventKind; 14] = [
        Self::Play,
        Self::Pause,
        Self::Stop,
        Self::Complete,
        Self::Loop,
        Self::Error,
        Self::Freeze,
        Self::Ready,
        Self::Frame,
        Self::Destroyed,
        Self::Rendered,
        Self::Load,
        Self::Next,
        Self::Previous,
    ];

    /// Event name as seen by hosts (`"play"`, `"frame"`, ...).
    pub fn name(&self) -> &'static str {
        match self {
            Self::Play => "play",
            Self::Pause => "pause",
            Self::Stop => "stop",
            Self::Complete => "complete",
            Self::Loop => "loop",
            Self::Error => "error",
            Self::Freeze => "freeze",
            Self::Ready => "ready",
            Self::Frame => "frame",
            Self::Destroyed => "destroyed",
            Self::Rendered => "rendered",
            Self::Load => "load",
            Self::Next => "next",
            Self::Previous => "previous",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }
}

impl PlayerEvent {
    pub fn kind(&self) -> PlayerEventKind {
        match self {
            Self::Play => PlayerEventKind::Play,
            Self::Pause => PlayerEventKind::Pause,
            Self::Stop => PlayerEventKind::Stop,
            Self::Complete { .. } => PlayerEventKind::Complete,
            Self::Loop => PlayerEventKind::Loop,
            Self::Error { .. } => PlayerEventKind::Error,
            Self::Freeze => PlayerEventKind::Freeze,
            Self::Ready => PlayerEventKind::Ready,
            Self::Frame { .. } => PlayerEventKind::Frame,
            Self::Destroyed => PlayerEventKind::Destroyed,
            Self::Rendered => PlayerEventKind::Rendered,
            Self::Load => PlayerEventKind::Load,
            Self::Next => PlayerEventKind::Next,
            Self::Previous => PlayerEventKind::Previous,
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.kind().name()
    }
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type Listener = Box<dyn FnMut(&PlayerEvent)>;

/// Per-kind listener table. `None` keys listen to every event.
#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    listeners: HashMap<Option<PlayerEventKind>, Vec<(SubscriptionId, Listener)>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listen to one kind of event, or all of them with `None`.
    pub fn subscribe(&mut self, kind: Option<PlayerEventKind>, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.entry(kind).or_default().push((id, listener));
        id
    }

    /// Returns whether the subscription existed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        for list in self.listeners.values_mut() {
            if let Some(idx) = list.iter().position(|(sid, _)| *sid == id) {
                list.remove(idx);
                return true;
            }
        }
        false
    }

    pub fn emit(&mut self, event: &PlayerEvent) {
        let kind = event.kind();
        if let Some(list) = self.listeners.get_mut(&Some(kind)) {
            for (_, listener) in list.iter_mut() {
                listener(event);
            }
        }
        if let Some(list) = self.listeners.get_mut(&None) {
            for (_, listener) in list.iter_mut() {
                listener(event);
            }
        }
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    pub fn len(&self) -> usize {
        self.listeners.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.len())
            .finish()
    }
}
