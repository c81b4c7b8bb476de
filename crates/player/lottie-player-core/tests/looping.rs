mod common;

use common::{loaded, names, record, Call};
use lottie_player_core::{
    Direction, EngineEvent, PlayMode, PlayerConfig, PlayerEvent, PlayerState, TimerQueue,
};

fn counted(mode: PlayMode, count: u32) -> PlayerConfig {
    PlayerConfig {
        looping: true,
        count: Some(count),
        mode,
        ..Default::default()
    }
}

#[test]
fn bounce_count_completes_after_twice_the_events() {
    let mut p = loaded("bouncing-ball", counted(PlayMode::Bounce, 3));
    assert!(!p.engine().looping, "managed loops keep the engine loop off");
    p.play();
    let events = record(&mut p);

    for _ in 0..5 {
        p.handle_engine_event(EngineEvent::Complete);
        assert_eq!(p.state(), PlayerState::Playing);
    }
    assert_eq!(p.loop_count(), 2);
    p.handle_engine_event(EngineEvent::Complete);
    assert_eq!(p.state(), PlayerState::Completed);
    assert_eq!(p.loop_count(), 3);

    let seen = names(&events);
    assert_eq!(seen.iter().filter(|n| **n == "loop").count(), 6);
    assert_eq!(seen.last(), Some(&"complete"));
}

#[test]
fn normal_count_completes_after_count_events() {
    let mut p = loaded("bouncing-ball", counted(PlayMode::Normal, 3));
    p.play();
    p.handle_engine_event(EngineEvent::Complete);
    p.handle_engine_event(EngineEvent::Complete);
    assert_eq!(p.state(), PlayerState::Playing);
    p.handle_engine_event(EngineEvent::Complete);
    assert_eq!(p.state(), PlayerState::Completed);
    assert_eq!(p.loop_count(), 3);
}

#[test]
fn bounce_reverses_at_each_boundary() {
    let config = PlayerConfig {
        looping: true,
        mode: PlayMode::Bounce,
        ..Default::default()
    };
    let mut p = loaded("bouncing-ball", config);
    p.play();
    p.engine_mut().clear();

    p.handle_engine_event(EngineEvent::Complete);
    assert_eq!(
        p.engine().calls,
        vec![
            Call::Direction(Direction::Backward),
            Call::GoToAndStop(99.0),
            Call::Play
        ]
    );
    assert_eq!(p.settings().direction, Direction::Backward);

    p.engine_mut().clear();
    p.handle_engine_event(EngineEvent::Complete);
    assert_eq!(
        p.engine().calls,
        vec![
            Call::Direction(Direction::Forward),
            Call::GoToAndStop(0.0),
            Call::Play
        ]
    );
}

#[test]
fn normal_managed_loop_restarts_from_the_start() {
    let config = PlayerConfig {
        looping: true,
        direction: Direction::Backward,
        count: Some(10),
        ..Default::default()
    };
    let mut p = loaded("bouncing-ball", config);
    p.play();
    p.engine_mut().clear();
    p.handle_engine_event(EngineEvent::Complete);
    assert_eq!(p.engine().calls, vec![Call::GoToAndStop(99.0), Call::Play]);
}

#[test]
fn intermission_defers_the_restart() {
    let config = PlayerConfig {
        looping: true,
        intermission: 500,
        ..Default::default()
    };
    let mut p = loaded("bouncing-ball", config);
    p.play();
    p.engine_mut().clear();
    p.handle_engine_event(EngineEvent::Complete);
    assert_eq!(p.engine().calls, vec![Call::GoToAndStop(0.0)]);

    let mut timers = TimerQueue::new();
    timers.extend(p.take_scheduled());
    assert_eq!(timers.len(), 1);
    assert!(timers.advance(499).is_empty());
    for task in timers.advance(1) {
        p.run_scheduled(task);
    }
    assert_eq!(p.engine().last(), Some(&Call::Play));
}

#[test]
fn pausing_during_intermission_cancels_the_restart() {
    let config = PlayerConfig {
        looping: true,
        intermission: 200,
        ..Default::default()
    };
    let mut p = loaded("bouncing-ball", config);
    p.play();
    p.handle_engine_event(EngineEvent::Complete);
    let tasks = p.take_scheduled();
    p.pause();
    p.engine_mut().clear();
    for task in tasks {
        p.run_scheduled(task);
    }
    assert!(p.engine().calls.is_empty());
}

#[test]
fn timers_from_a_destroyed_player_are_dropped() {
    let config = PlayerConfig {
        looping: true,
        intermission: 200,
        ..Default::default()
    };
    let mut p = loaded("bouncing-ball", config);
    p.play();
    p.handle_engine_event(EngineEvent::Complete);
    let tasks = p.take_scheduled();
    p.destroy();
    p.engine_mut().clear();
    for task in tasks {
        p.run_scheduled(task);
    }
    assert!(p.engine().calls.is_empty());
}

#[test]
fn native_loop_counts_engine_wraps() {
    let config = PlayerConfig {
        looping: true,
        ..Default::default()
    };
    let mut p = loaded("spinner", config);
    assert!(p.engine().looping);
    p.play();
    let events = record(&mut p);
    p.handle_engine_event(EngineEvent::LoopComplete);
    p.handle_engine_event(EngineEvent::LoopComplete);
    assert_eq!(p.loop_count(), 2);
    assert_eq!(p.state(), PlayerState::Playing);
    assert_eq!(names(&events), vec!["loop", "loop"]);
}

#[test]
fn completion_without_loop() {
    let mut p = loaded("bouncing-ball", PlayerConfig::default());
    p.play();
    p.engine_mut().frame = 99.0;
    let events = record(&mut p);
    p.handle_engine_event(EngineEvent::Complete);
    assert_eq!(p.state(), PlayerState::Completed);
    assert_eq!(
        events.borrow().as_slice(),
        &[PlayerEvent::Complete {
            frame: 99.0,
            seeker: 99.0
        }]
    );
}

#[test]
fn toggle_play_after_completion_restarts() {
    let mut p = loaded("bouncing-ball", PlayerConfig::default());
    p.play();
    p.handle_engine_event(EngineEvent::Complete);
    p.toggle_play();
    assert_eq!(p.state(), PlayerState::Playing);
    assert_eq!(p.engine().last(), Some(&Call::GoToAndPlay(0.0)));

    p.set_direction(Direction::Backward);
    p.handle_engine_event(EngineEvent::Complete);
    p.toggle_play();
    assert_eq!(p.engine().last(), Some(&Call::GoToAndPlay(99.0)));
}

#[test]
fn boomerang_replay_runs_back_from_where_it_stopped() {
    let mut p = loaded("bouncing-ball", PlayerConfig::default());
    p.toggle_boomerang();
    assert!(p.is_bounce());
    p.play();
    p.engine_mut().frame = 99.0;
    p.handle_engine_event(EngineEvent::Complete);
    assert_eq!(p.state(), PlayerState::Completed);

    p.engine_mut().clear();
    p.play();
    assert_eq!(
        p.engine().calls,
        vec![
            Call::Direction(Direction::Backward),
            Call::GoToAndPlay(99.0)
        ]
    );
    assert_eq!(p.loop_count(), 0);
}

#[test]
fn enabling_bounce_hands_looping_back_to_the_player() {
    let config = PlayerConfig {
        looping: true,
        ..Default::default()
    };
    let mut p = loaded("bouncing-ball", config);
    assert!(p.engine().looping);
    p.toggle_boomerang();
    assert!(!p.engine().looping);
    p.toggle_boomerang();
    assert!(p.engine().looping);
    p.set_count(Some(2));
    assert!(!p.engine().looping);
    p.set_count(Some(0));
    assert!(p.engine().looping);
}
