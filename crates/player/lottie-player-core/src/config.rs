//! Player configuration.
//!
//! Plain data with documented defaults. Hosts either deserialize it (the wasm
//! constructor takes camelCase JSON) or reflect element attributes into it
//! with [`PlayerConfig::apply_attribute`]. Changes reach the engine through
//! the player's setters or on the next load.

use serde::{Deserialize, Serialize};

use crate::error::PlayerError;
use lottie_bundle_core::{Direction, ManifestAnimation, PlayMode};

/// Which lottie-web renderer to use.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    #[default]
    Svg,
    Canvas,
    Html,
}

impl RenderMode {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Canvas => "canvas",
            Self::Html => "html",
        }
    }
}

/// CSS-like fit of the animation inside its container.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObjectFit {
    #[default]
    Contain,
    Cover,
    Fill,
    None,
    ScaleDown,
}

impl ObjectFit {
    /// SVG `preserveAspectRatio` value equivalent to this fit.
    pub fn preserve_aspect_ratio(&self) -> &'static str {
        match self {
            Self::Contain | Self::ScaleDown => "xMidYMid meet",
            Self::Cover => "xMidYMid slice",
            Self::Fill => "none",
            Self::None => "xMinYMin slice",
        }
    }
}

/// Inclusive frame range restricting playback. Serialized as `[start, end]`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
pub struct Segment {
    pub start: f32,
    pub end: f32,
}

impl Segment {
    pub fn new(start: f32, end: f32) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    pub fn len(&self) -> f32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= 0.0
    }
}

impl From<[f32; 2]> for Segment {
    fn from([a, b]: [f32; 2]) -> Self {
        Self::new(a, b)
    }
}

impl From<Segment> for [f32; 2] {
    fn from(s: Segment) -> Self {
        [s.start, s.end]
    }
}

/// Per-animation overrides for multi-animation bundles. Unset fields fall
/// back to the manifest entry, then to the player configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnimationSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autoplay: Option<bool>,
    #[serde(rename = "loop", skip_serializing_if = "Option::is_none")]
    pub looping: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<PlayMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intermission: Option<u32>,
}

fn default_speed() -> f32 {
    1.0
}

fn default_background() -> String {
    "transparent".to_string()
}

/// User-facing player configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerConfig {
    /// Start playing as soon as the animation is loaded.
    pub autoplay: bool,
    /// Restart when playback reaches the end.
    #[serde(rename = "loop")]
    pub looping: bool,
    /// Playback speed multiplier.
    #[serde(default = "default_speed")]
    pub speed: f32,
    pub direction: Direction,
    pub renderer: RenderMode,
    pub object_fit: ObjectFit,
    /// Frame range to restrict playback to.
    pub segment: Option<Segment>,
    /// Render between whole frames.
    pub subframe: bool,
    /// Stop looping after this many loops (half loops per bounce leg).
    pub count: Option<u32>,
    pub mode: PlayMode,
    /// Pause between loops, in milliseconds.
    pub intermission: u32,
    /// Play on pointer enter, pause on pointer leave.
    pub hover: bool,
    /// Show the control bar.
    pub controls: bool,
    #[serde(default = "default_background")]
    pub background: String,
    /// Accessible description of the animation.
    pub description: Option<String>,
    /// Drive the current frame from page scroll instead of time.
    pub animate_on_scroll: bool,
    pub multi_animation_settings: Vec<AnimationSettings>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            autoplay: false,
            looping: false,
            speed: default_speed(),
            direction: Direction::Forward,
            renderer: RenderMode::Svg,
            object_fit: ObjectFit::Contain,
            segment: None,
            subframe: false,
            count: None,
            mode: PlayMode::Normal,
            intermission: 0,
            hover: false,
            controls: false,
            background: default_background(),
            description: None,
            animate_on_scroll: false,
            multi_animation_settings: Vec::new(),
        }
    }
}

fn parse_flag(value: Option<&str>) -> bool {
    match value {
        None => false,
        Some(v) => !v.trim().eq_ignore_ascii_case("false"),
    }
}

fn invalid(name: &str, value: &str) -> PlayerError {
    PlayerError::InvalidAttribute {
        name: name.to_string(),
        value: value.to_string(),
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, PlayerError> {
    value.trim().parse().map_err(|_| invalid(name, value))
}

fn parse_segment(name: &str, value: &str) -> Result<Segment, PlayerError> {
    let trimmed = value.trim();
    if trimmed.starts_with('[') {
        let pair: [f32; 2] = serde_json::from_str(trimmed).map_err(|_| invalid(name, value))?;
        return Ok(pair.into());
    }
    let (a, b) = trimmed.split_once(',').ok_or_else(|| invalid(name, value))?;
    Ok(Segment::new(parse_number(name, a)?, parse_number(name, b)?))
}

fn parse_direction(name: &str, value: &str) -> Result<Direction, PlayerError> {
    let n: i8 = parse_number(name, value)?;
    Direction::try_from(n).map_err(|_| invalid(name, value))
}

fn parse_keyword<T: serde::de::DeserializeOwned>(name: &str, value: &str) -> Result<T, PlayerError> {
    let quoted = serde_json::Value::String(value.trim().to_ascii_lowercase());
    serde_json::from_value(quoted).map_err(|_| invalid(name, value))
}

impl PlayerConfig {
    /// Reflect an element attribute into the configuration.
    ///
    /// `value` is `None` when the attribute was removed. Returns `Ok(false)`
    /// for attributes this configuration does not own.
    pub fn apply_attribute(&mut self, name: &str, value: Option<&str>) -> Result<bool, PlayerError> {
        let key = name.to_ascii_lowercase().replace('-', "");
        let raw = value.unwrap_or("");
        match key.as_str() {
            "autoplay" => self.autoplay = parse_flag(value),
            "loop" => self.looping = parse_flag(value),
            "subframe" => self.subframe = parse_flag(value),
            "hover" => self.hover = parse_flag(value),
            "controls" => self.controls = parse_flag(value),
            "animateonscroll" => self.animate_on_scroll = parse_flag(value),
            "speed" => {
                self.speed = match value {
                    Some(v) => parse_number(name, v)?,
                    None => default_speed(),
                }
            }
            "direction" => {
                self.direction = match value {
                    Some(v) => parse_direction(name, v)?,
                    None => Direction::Forward,
                }
            }
            "renderer" => {
                self.renderer = match value {
                    Some(v) => parse_keyword(name, v)?,
                    None => RenderMode::Svg,
                }
            }
            "objectfit" => {
                self.object_fit = match value {
                    Some(v) => parse_keyword(name, v)?,
                    None => ObjectFit::Contain,
                }
            }
            "mode" => {
                self.mode = match value {
                    Some(v) => parse_keyword(name, v)?,
                    None => PlayMode::Normal,
                }
            }
            "segment" => {
                self.segment = match value {
                    Some(v) if !v.trim().is_empty() => Some(parse_segment(name, v)?),
                    _ => None,
                }
            }
            "count" => {
                self.count = match value {
                    Some(v) if !v.trim().is_empty() => {
                        Some(parse_number::<u32>(name, v)?).filter(|c| *c > 0)
                    }
                    _ => None,
                }
            }
            "intermission" => {
                self.intermission = match value {
                    Some(v) => parse_number(name, v)?,
                    None => 0,
                }
            }
            "background" => {
                self.background = value
                    .map(str::to_string)
                    .unwrap_or_else(default_background)
            }
            "description" => self.description = value.map(str::to_string),
            "multianimationsettings" => {
                self.multi_animation_settings = match value {
                    Some(v) if !v.trim().is_empty() => {
                        serde_json::from_str(v).map_err(|_| invalid(name, raw))?
                    }
                    _ => Vec::new(),
                }
            }
            _ => return Ok(false),
        }
        Ok(true)
    }
}

/// Settings in force for one animation: the per-animation override, then the
/// bundle manifest entry, then the player configuration.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveSettings {
    pub autoplay: bool,
    #[serde(rename = "loop")]
    pub looping: bool,
    pub speed: f32,
    pub direction: Direction,
    pub mode: PlayMode,
    pub count: Option<u32>,
    pub intermission: u32,
}

impl EffectiveSettings {
    pub fn resolve(
        config: &PlayerConfig,
        entry: Option<&ManifestAnimation>,
        overrides: Option<&AnimationSettings>,
    ) -> Self {
        let o = overrides.cloned().unwrap_or_default();
        let e = entry.cloned().unwrap_or_default();
        Self {
            autoplay: o.autoplay.or(e.autoplay).unwrap_or(config.autoplay),
            looping: o
                .looping
                .or(e.looping.map(|l| l.is_looping()))
                .unwrap_or(config.looping),
            speed: o.speed.or(e.speed).unwrap_or(config.speed),
            direction: o.direction.or(e.direction).unwrap_or(config.direction),
            mode: o.mode.or(e.play_mode).unwrap_or(config.mode),
            count: o
                .count
                .or(e.looping.and_then(|l| l.count()))
                .or(config.count)
                .filter(|c| *c > 0),
            intermission: o
                .intermission
                .or(e.intermission)
                .unwrap_or(config.intermission),
        }
    }

    /// Looping the player drives itself instead of the engine's native loop:
    /// bounce legs, repeat counts and intermission pauses all need a hook at
    /// every loop boundary.
    pub fn managed_loop(&self) -> bool {
        self.mode == PlayMode::Bounce || self.count.is_some() || self.intermission > 0
    }

    /// Loop flag handed to the engine.
    pub fn engine_loop(&self) -> bool {
        self.looping && !self.managed_loop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lottie_bundle_core::LoopSetting;

    #[test]
    fn defaults_match_documentation() {
        let c = PlayerConfig::default();
        assert!(!c.autoplay && !c.looping && !c.subframe && !c.hover);
        assert_eq!(c.speed, 1.0);
        assert_eq!(c.direction, Direction::Forward);
        assert_eq!(c.renderer, RenderMode::Svg);
        assert_eq!(c.object_fit, ObjectFit::Contain);
        assert_eq!(c.mode, PlayMode::Normal);
        assert_eq!(c.background, "transparent");
    }

    #[test]
    fn empty_json_deserializes_to_defaults() {
        let c: PlayerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(c, PlayerConfig::default());
    }

    #[test]
    fn camel_case_json() {
        let c: PlayerConfig = serde_json::from_str(
            r#"{ "loop": true, "objectFit": "scale-down", "segment": [10, 40], "direction": -1,
                 "multiAnimationSettings": [{ "autoplay": true, "mode": "bounce" }] }"#,
        )
        .unwrap();
        assert!(c.looping);
        assert_eq!(c.object_fit, ObjectFit::ScaleDown);
        assert_eq!(c.segment, Some(Segment::new(10.0, 40.0)));
        assert_eq!(c.direction, Direction::Backward);
        assert_eq!(c.multi_animation_settings[0].mode, Some(PlayMode::Bounce));
    }

    #[test]
    fn boolean_attributes_follow_html_presence() {
        let mut c = PlayerConfig::default();
        assert!(c.apply_attribute("autoplay", Some("")).unwrap());
        assert!(c.autoplay);
        c.apply_attribute("autoplay", Some("false")).unwrap();
        assert!(!c.autoplay);
        c.apply_attribute("loop", Some("loop")).unwrap();
        assert!(c.looping);
        c.apply_attribute("loop", None).unwrap();
        assert!(!c.looping);
    }

    #[test]
    fn valued_attributes_parse() {
        let mut c = PlayerConfig::default();
        c.apply_attribute("speed", Some("2.5")).unwrap();
        c.apply_attribute("direction", Some("-1")).unwrap();
        c.apply_attribute("objectFit", Some("Cover")).unwrap();
        c.apply_attribute("mode", Some("bounce")).unwrap();
        c.apply_attribute("segment", Some("5, 20")).unwrap();
        c.apply_attribute("count", Some("3")).unwrap();
        c.apply_attribute("renderer", Some("canvas")).unwrap();
        assert_eq!(c.speed, 2.5);
        assert_eq!(c.direction, Direction::Backward);
        assert_eq!(c.object_fit, ObjectFit::Cover);
        assert_eq!(c.mode, PlayMode::Bounce);
        assert_eq!(c.segment, Some(Segment::new(5.0, 20.0)));
        assert_eq!(c.count, Some(3));
        assert_eq!(c.renderer, RenderMode::Canvas);
    }

    #[test]
    fn bad_values_and_unknown_names() {
        let mut c = PlayerConfig::default();
        assert!(matches!(
            c.apply_attribute("speed", Some("fast")),
            Err(PlayerError::InvalidAttribute { .. })
        ));
        assert!(c.apply_attribute("direction", Some("2")).is_err());
        assert!(c.apply_attribute("mode", Some("sideways")).is_err());
        assert_eq!(c.apply_attribute("src", Some("a.json")).unwrap(), false);
        assert_eq!(c.speed, 1.0);
    }

    #[test]
    fn zero_count_means_unbounded() {
        let mut c = PlayerConfig::default();
        c.apply_attribute("count", Some("0")).unwrap();
        assert_eq!(c.count, None);
    }

    #[test]
    fn managed_loop_detection() {
        let mut c = PlayerConfig::default();
        c.looping = true;
        let plain = EffectiveSettings::resolve(&c, None, None);
        assert!(!plain.managed_loop());
        assert!(plain.engine_loop());
        c.intermission = 200;
        assert!(EffectiveSettings::resolve(&c, None, None).managed_loop());
        c.intermission = 0;
        let bounce = AnimationSettings {
            mode: Some(PlayMode::Bounce),
            ..Default::default()
        };
        let s = EffectiveSettings::resolve(&c, None, Some(&bounce));
        assert!(s.managed_loop());
        assert!(!s.engine_loop());
    }

    #[test]
    fn override_then_manifest_then_config() {
        let mut c = PlayerConfig::default();
        c.speed = 3.0;
        c.count = Some(9);
        let entry = ManifestAnimation {
            id: "a".into(),
            speed: Some(2.0),
            looping: Some(LoopSetting::Count(4)),
            play_mode: Some(PlayMode::Bounce),
            ..Default::default()
        };
        let over = AnimationSettings {
            speed: Some(0.5),
            ..Default::default()
        };
        let s = EffectiveSettings::resolve(&c, Some(&entry), Some(&over));
        assert_eq!(s.speed, 0.5);
        assert_eq!(s.count, Some(4));
        assert_eq!(s.mode, PlayMode::Bounce);
        assert!(s.looping);

        let s = EffectiveSettings::resolve(&c, None, None);
        assert_eq!(s.speed, 3.0);
        assert_eq!(s.count, Some(9));
    }

    #[test]
    fn object_fit_maps_to_preserve_aspect_ratio() {
        assert_eq!(ObjectFit::Cover.preserve_aspect_ratio(), "xMidYMid slice");
        assert_eq!(ObjectFit::Fill.preserve_aspect_ratio(), "none");
    }
}
