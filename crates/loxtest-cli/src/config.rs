//! Terminal configuration via environment variables
//!
//! Read once at startup and handed to the reporter; nothing here changes
//! during a run.

use colored::{Color, Colorize};
use regex::Regex;
use std::env;

/// Terminal configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Terminal advertises 256 colours (TERM ends in -256 or -256color)
    pub extended_palette: bool,
    /// Disable colored output (LOXTEST_NO_COLOR=1 or NO_COLOR=1)
    pub no_color: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            extended_palette: env::var("TERM")
                .map(|term| supports_256_colors(&term))
                .unwrap_or(false),
            no_color: flag_set("LOXTEST_NO_COLOR") || flag_set("NO_COLOR"),
        }
    }

    /// Build the palette for this terminal; `force_plain` comes from `--no-color`
    ///
    /// Colour is only enabled when `colored` will actually paint (stdout is a
    /// terminal or colour is forced), so the reporter falls back to bracketed
    /// diffs in pipes and logs.
    pub fn palette(&self, force_plain: bool) -> Palette {
        let wanted = !(self.no_color || force_plain);
        Palette::new(
            self.extended_palette,
            wanted && colored::control::SHOULD_COLORIZE.should_colorize(),
        )
    }
}

/// A colour switch counts only when set to a non-empty value
fn flag_set(name: &str) -> bool {
    env::var(name).map(|v| !v.is_empty()).unwrap_or(false)
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn supports_256_colors(term: &str) -> bool {
    Regex::new(r"(?i)-256(color)?$")
        .map(|re| re.is_match(term))
        .unwrap_or(false)
}

/// Semantic tag for console text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Group headers and the summary label
    Info,
    /// Secondary information: search progress, "Found" labels
    Detail,
    Warn,
    Error,
    Success,
    /// Mismatching span inside a diff
    Highlight,
}

/// Maps tones to colours for the active terminal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    info: Color,
    enabled: bool,
}

/// xterm colour 253, a light grey readable on dark 256-colour themes
const EXTENDED_INFO: Color = Color::TrueColor {
    r: 218,
    g: 218,
    b: 218,
};

impl Palette {
    pub fn new(extended: bool, enabled: bool) -> Self {
        Self {
            info: if extended { EXTENDED_INFO } else { Color::Blue },
            enabled,
        }
    }

    /// Palette that never emits escape codes
    #[cfg(test)]
    pub fn plain() -> Self {
        Self::new(false, false)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn color(&self, tone: Tone) -> Color {
        match tone {
            Tone::Info => self.info,
            Tone::Detail => Color::Cyan,
            Tone::Warn => Color::Yellow,
            Tone::Error | Tone::Highlight => Color::Red,
            Tone::Success => Color::Green,
        }
    }

    /// Render `text` in the colour for `tone`
    pub fn paint(&self, tone: Tone, text: &str) -> String {
        if self.enabled {
            text.color(self.color(tone)).to_string()
        } else {
            text.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serial_test::serial;

    #[rstest]
    #[case("xterm-256color", true)]
    #[case("screen-256color", true)]
    #[case("XTERM-256COLOR", true)]
    #[case("rxvt-256", true)]
    #[case("xterm", false)]
    #[case("xterm-256colors", false)]
    #[case("dumb", false)]
    fn test_supports_256_colors(#[case] term: &str, #[case] expected: bool) {
        assert_eq!(supports_256_colors(term), expected);
    }

    const COLOR_VARS: [&str; 3] = ["TERM", "LOXTEST_NO_COLOR", "NO_COLOR"];

    /// Run `f` with the colour variables set as given, restoring them afterwards
    fn with_color_env(vars: &[(&str, Option<&str>)], f: impl FnOnce()) {
        let saved: Vec<(&str, Option<String>)> =
            COLOR_VARS.iter().map(|name| (*name, env::var(name).ok())).collect();
        for name in COLOR_VARS {
            env::remove_var(name);
        }
        for (name, value) in vars {
            if let Some(value) = value {
                env::set_var(name, value);
            }
        }

        f();

        for (name, value) in saved {
            match value {
                Some(value) => env::set_var(name, value),
                None => env::remove_var(name),
            }
        }
    }

    #[test]
    #[serial]
    fn test_config_defaults() {
        with_color_env(&[], || {
            let config = Config::from_env();
            assert!(!config.extended_palette);
            assert!(!config.no_color);
        });
    }

    #[test]
    #[serial]
    fn test_config_extended_palette() {
        with_color_env(&[("TERM", Some("xterm-256color"))], || {
            let config = Config::from_env();
            assert!(config.extended_palette);
            assert_eq!(config.palette(false).color(Tone::Info), EXTENDED_INFO);
        });
    }

    #[test]
    #[serial]
    fn test_config_no_color() {
        with_color_env(&[("LOXTEST_NO_COLOR", Some("1"))], || {
            let config = Config::from_env();
            assert!(config.no_color);
            assert!(!config.palette(false).is_enabled());
        });

        // Also test NO_COLOR (standard)
        with_color_env(&[("NO_COLOR", Some("1"))], || {
            assert!(Config::from_env().no_color);
        });
    }

    #[test]
    #[serial]
    fn test_empty_no_color_is_ignored() {
        with_color_env(&[("NO_COLOR", Some("")), ("LOXTEST_NO_COLOR", Some(""))], || {
            assert!(!Config::from_env().no_color);
        });
    }

    #[test]
    #[serial]
    fn test_palette_follows_terminal_support() {
        let config = Config {
            extended_palette: false,
            no_color: false,
        };

        colored::control::set_override(false);
        let piped = config.palette(false);
        colored::control::set_override(true);
        let forced = config.palette(false);
        let flagged = config.palette(true);
        colored::control::unset_override();

        assert!(!piped.is_enabled());
        assert!(forced.is_enabled());
        assert!(!flagged.is_enabled());
    }

    #[test]
    fn test_default_info_color_is_blue() {
        let palette = Palette::new(false, true);
        assert_eq!(palette.color(Tone::Info), Color::Blue);
        assert_eq!(palette.color(Tone::Highlight), Color::Red);
    }

    #[test]
    fn test_plain_palette_leaves_text_alone() {
        assert_eq!(Palette::plain().paint(Tone::Error, "failed"), "failed");
    }
}
