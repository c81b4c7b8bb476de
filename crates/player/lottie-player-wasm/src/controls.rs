//! Control bar markup.
//!
//! Buttons carry a `data-action` attribute; one delegated click listener
//! on the bar routes them to [`crate::DotLottiePlayer::control_action`].

use lottie_player_core::{ControlBar, PlayGlyph};

fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn toggle_class(on: bool) -> &'static str {
    if on {
        "toggle active"
    } else {
        "toggle"
    }
}

/// Parts of the bar that need a full re-render when they change. Seeker and
/// frame label are patched in place so an active drag is not interrupted.
pub(crate) fn render_key(bar: &ControlBar) -> String {
    format!(
        "{}|{:?}|{}|{}|{}|{}|{:?}",
        bar.visible,
        bar.play_glyph,
        bar.looping,
        bar.boomerang,
        bar.prev_enabled,
        bar.next_enabled,
        bar.error
    )
}

pub(crate) fn render(bar: &ControlBar) -> String {
    if !bar.visible {
        return String::new();
    }
    let (glyph, label) = match bar.play_glyph {
        PlayGlyph::Play => ("&#9654;", "Play"),
        PlayGlyph::Pause => ("&#10074;&#10074;", "Pause"),
    };
    let prev = if bar.show_prev {
        format!(
            r#"<button data-action="prev" aria-label="Previous animation"{}>&#9198;</button>"#,
            if bar.prev_enabled { "" } else { " disabled" }
        )
    } else {
        String::new()
    };
    let next = if bar.show_next {
        format!(
            r#"<button data-action="next" aria-label="Next animation"{}>&#9197;</button>"#,
            if bar.next_enabled { "" } else { " disabled" }
        )
    } else {
        String::new()
    };
    let error = match &bar.error {
        Some(message) => format!(r#"<span class="error" role="alert">{}</span>"#, html_escape(message)),
        None => String::new(),
    };

    format!(
        r#"<div class="lottie-controls" role="toolbar" aria-label="Animation controls">
  <button data-action="toggle-play" aria-label="{label}">{glyph}</button>
  <button data-action="stop" aria-label="Stop">&#9632;</button>
  {prev}{next}
  <input class="seeker" type="range" min="0" max="100" step="1" value="{seeker}" aria-label="Seek">
  <span class="frame">{frame}</span>
  <button data-action="toggle-loop" class="{loop_class}" aria-pressed="{looping}" aria-label="Loop">&#8635;</button>
  <button data-action="toggle-boomerang" class="{bounce_class}" aria-pressed="{boomerang}" aria-label="Boomerang">&#8644;</button>
  <button data-action="snapshot" aria-label="Download frame">&#8615;</button>
  {error}
</div>"#,
        seeker = bar.seeker.round(),
        frame = html_escape(&bar.frame_label),
        loop_class = toggle_class(bar.looping),
        looping = bar.looping,
        bounce_class = toggle_class(bar.boomerang),
        boomerang = bar.boomerang,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use lottie_player_core::PlayerState;

    fn bar() -> ControlBar {
        ControlBar {
            visible: true,
            play_glyph: PlayGlyph::Pause,
            looping: true,
            boomerang: false,
            seeker: 42.4,
            frame_label: "42/100".into(),
            show_prev: false,
            show_next: false,
            prev_enabled: false,
            next_enabled: false,
            state: PlayerState::Playing,
            error: None,
        }
    }

    #[test]
    fn renders_buttons_with_actions() {
        let html = render(&bar());
        assert!(html.contains(r#"data-action="toggle-play" aria-label="Pause""#));
        assert!(html.contains(r#"value="42""#));
        assert!(html.contains(r#"class="toggle active" aria-pressed="true" aria-label="Loop""#));
        assert!(!html.contains(r#"data-action="next""#));
    }

    #[test]
    fn hidden_bar_renders_nothing() {
        let mut b = bar();
        b.visible = false;
        assert!(render(&b).is_empty());
    }

    #[test]
    fn error_text_is_escaped() {
        let mut b = bar();
        b.error = Some("<b>bad</b>".into());
        assert!(render(&b).contains("&lt;b&gt;bad&lt;/b&gt;"));
    }

    #[test]
    fn key_ignores_seeker_movement() {
        let a = bar();
        let mut b = bar();
        b.seeker = 90.0;
        b.frame_label = "90/100".into();
        assert_eq!(render_key(&a), render_key(&b));
        b.play_glyph = PlayGlyph::Play;
        assert_ne!(render_key(&a), render_key(&b));
    }

    #[test]
    fn navigation_buttons_respect_bounds() {
        let mut b = bar();
        b.show_prev = true;
        b.show_next = true;
        b.next_enabled = true;
        let html = render(&b);
        assert!(html.contains(r#"data-action="prev" aria-label="Previous animation" disabled"#));
        assert!(html.contains(r#"data-action="next" aria-label="Next animation">"#));
    }
}
