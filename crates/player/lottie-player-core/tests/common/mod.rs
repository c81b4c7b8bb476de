#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use lottie_player_core::{
    Direction, EngineError, EngineParams, LocalFetcher, Player, PlayerConfig, PlayerEvent,
    RenderEngine, Segment, Source,
};

/// Engine call, as recorded by [`FakeEngine`].
#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Load { looping: bool, autoplay: bool },
    Destroy,
    Play,
    Pause,
    Stop,
    GoToAndStop(f32),
    GoToAndPlay(f32),
    Speed(f32),
    Direction(Direction),
    Loop(bool),
    Subframe(bool),
    Segments(Segment),
}

/// Engine that renders nothing and remembers what it was asked to do.
#[derive(Debug, Default)]
pub struct FakeEngine {
    pub calls: Vec<Call>,
    pub frame: f32,
    pub total: f32,
    pub direction: Direction,
    pub looping: bool,
    pub loaded: bool,
    pub fail_load: bool,
}

impl FakeEngine {
    pub fn clear(&mut self) {
        self.calls.clear();
    }

    pub fn last(&self) -> Option<&Call> {
        self.calls.last()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }
}

impl RenderEngine for FakeEngine {
    fn load(&mut self, params: EngineParams<'_>) -> Result<(), EngineError> {
        if self.fail_load {
            return Err(EngineError::new("renderer unavailable"));
        }
        self.total = params.document.total_frames();
        self.looping = params.looping;
        self.frame = 0.0;
        self.loaded = true;
        self.calls.push(Call::Load {
            looping: params.looping,
            autoplay: params.autoplay,
        });
        Ok(())
    }

    fn destroy(&mut self) {
        self.loaded = false;
        self.calls.push(Call::Destroy);
    }

    fn play(&mut self) {
        self.calls.push(Call::Play);
    }

    fn pause(&mut self) {
        self.calls.push(Call::Pause);
    }

    fn stop(&mut self) {
        self.frame = 0.0;
        self.calls.push(Call::Stop);
    }

    fn go_to_and_stop(&mut self, value: f32, _is_frame: bool) {
        self.frame = value;
        self.calls.push(Call::GoToAndStop(value));
    }

    fn go_to_and_play(&mut self, value: f32, _is_frame: bool) {
        self.frame = value;
        self.calls.push(Call::GoToAndPlay(value));
    }

    fn set_speed(&mut self, speed: f32) {
        self.calls.push(Call::Speed(speed));
    }

    fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
        self.calls.push(Call::Direction(direction));
    }

    fn set_loop(&mut self, looping: bool) {
        self.looping = looping;
        self.calls.push(Call::Loop(looping));
    }

    fn set_subframe(&mut self, enabled: bool) {
        self.calls.push(Call::Subframe(enabled));
    }

    fn play_segments(&mut self, segment: Segment, _force: bool) {
        self.calls.push(Call::Segments(segment));
    }

    fn current_frame(&self) -> f32 {
        self.frame
    }

    fn total_frames(&self) -> f32 {
        self.total
    }

    fn direction(&self) -> Direction {
        self.direction
    }

    fn snapshot_svg(&self) -> Option<String> {
        self.loaded
            .then(|| format!("<svg data-frame=\"{}\"></svg>", self.frame))
    }
}

pub fn fetcher() -> LocalFetcher {
    LocalFetcher::new(lottie_test_fixtures::root())
}

pub fn player(config: PlayerConfig) -> Player<FakeEngine> {
    Player::new(FakeEngine::default(), config)
}

/// Player with the named fixture loaded.
pub fn loaded(name: &str, config: PlayerConfig) -> Player<FakeEngine> {
    let mut p = player(config);
    let locator = lottie_test_fixtures::animations::locator(name).unwrap();
    p.load(Source::Url(locator), &mut fetcher());
    assert!(p.error().is_none(), "{name} failed to load: {:?}", p.error());
    p
}

/// Player with an in-memory document loaded.
pub fn loaded_document(doc: serde_json::Value, config: PlayerConfig) -> Player<FakeEngine> {
    let mut p = player(config);
    p.load(Source::Document(doc), &mut fetcher());
    assert!(p.error().is_none(), "document failed to load: {:?}", p.error());
    p
}

/// Every event the player emits from now on.
pub fn record(p: &mut Player<FakeEngine>) -> Rc<RefCell<Vec<PlayerEvent>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    p.subscribe(None, Box::new(move |e| sink.borrow_mut().push(e.clone())));
    seen
}

pub fn names(events: &Rc<RefCell<Vec<PlayerEvent>>>) -> Vec<&'static str> {
    events.borrow().iter().map(|e| e.name()).collect()
}
