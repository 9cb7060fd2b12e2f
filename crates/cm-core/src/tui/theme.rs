//! Theme and styling for the console TUI.
//!
//! Consistent colors and styles across all widgets using ftui's
//! Theme/StyleSheet system with WCAG accessibility validation.

use ftui::style::{
    contrast_ratio, meets_wcag_aa, meets_wcag_aaa, ColorProfile, Rgb as FtuiRgb, StyleSheet,
    Theme as FtuiTheme, ThemeBuilder,
};
use ftui::PackedRgba;
use ftui::Style as FtuiStyle;

/// Theme mode selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    /// Light theme for high ambient light.
    Light,
    /// Dark theme (default).
    #[default]
    Dark,
    /// High contrast for accessibility (WCAG AAA).
    HighContrast,
    /// No color, respecting the `NO_COLOR` environment variable.
    NoColor,
}

/// Domain RGB color definitions for WCAG validation.
#[derive(Debug, Clone)]
struct StatusColors {
    error: FtuiRgb,
    warning: FtuiRgb,
    success: FtuiRgb,
    bg: FtuiRgb,
    fg: FtuiRgb,
}

/// Theme configuration for the TUI.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Current theme mode.
    pub mode: ThemeMode,

    ftui_theme: FtuiTheme,
    stylesheet: StyleSheet,
    status: StatusColors,
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_env()
    }
}

// ---------------------------------------------------------------------------
// RGB constants
// ---------------------------------------------------------------------------

const DARK_BG: FtuiRgb = FtuiRgb::new(30, 30, 30);
const DARK_FG: FtuiRgb = FtuiRgb::new(220, 220, 220);
const DARK_ERROR: FtuiRgb = FtuiRgb::new(255, 80, 80);
const DARK_WARNING: FtuiRgb = FtuiRgb::new(255, 200, 50);
const DARK_SUCCESS: FtuiRgb = FtuiRgb::new(80, 220, 80);
const DARK_HIGHLIGHT: FtuiRgb = FtuiRgb::new(0, 200, 200);
const DARK_MUTED: FtuiRgb = FtuiRgb::new(128, 128, 128);
const DARK_BORDER: FtuiRgb = FtuiRgb::new(80, 80, 80);
const DARK_BORDER_FOCUSED: FtuiRgb = FtuiRgb::new(0, 200, 200);

const LIGHT_BG: FtuiRgb = FtuiRgb::new(255, 255, 255);
const LIGHT_FG: FtuiRgb = FtuiRgb::new(30, 30, 30);
const LIGHT_ERROR: FtuiRgb = FtuiRgb::new(200, 0, 0);
const LIGHT_WARNING: FtuiRgb = FtuiRgb::new(140, 100, 0);
const LIGHT_SUCCESS: FtuiRgb = FtuiRgb::new(0, 128, 0);
const LIGHT_HIGHLIGHT: FtuiRgb = FtuiRgb::new(0, 80, 200);
const LIGHT_MUTED: FtuiRgb = FtuiRgb::new(128, 128, 128);
const LIGHT_BORDER: FtuiRgb = FtuiRgb::new(180, 180, 180);
const LIGHT_BORDER_FOCUSED: FtuiRgb = FtuiRgb::new(0, 80, 200);

// High contrast (WCAG AAA: 7:1 minimum)
const HC_BG: FtuiRgb = FtuiRgb::new(0, 0, 0);
const HC_FG: FtuiRgb = FtuiRgb::new(255, 255, 255);
const HC_ERROR: FtuiRgb = FtuiRgb::new(255, 100, 100);
const HC_WARNING: FtuiRgb = FtuiRgb::new(255, 255, 80);
const HC_SUCCESS: FtuiRgb = FtuiRgb::new(100, 255, 100);
const HC_HIGHLIGHT: FtuiRgb = FtuiRgb::new(255, 255, 0);
const HC_MUTED: FtuiRgb = FtuiRgb::new(200, 200, 200);
const HC_BORDER: FtuiRgb = FtuiRgb::new(255, 255, 255);
const HC_BORDER_FOCUSED: FtuiRgb = FtuiRgb::new(255, 255, 0);

impl Theme {
    /// Auto-detect theme from environment variables.
    ///
    /// Priority:
    /// 1. `NO_COLOR` set → NoColor theme
    /// 2. `CM_HIGH_CONTRAST` set → HighContrast theme
    /// 3. Default → Dark theme
    pub fn from_env() -> Self {
        if std::env::var("NO_COLOR").is_ok() {
            return Self::no_color();
        }
        if std::env::var("CM_HIGH_CONTRAST").is_ok() {
            return Self::high_contrast();
        }
        Self::dark()
    }

    /// Resolve a configured theme name, falling back to env detection.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "dark" => Self::dark(),
            "high-contrast" => Self::high_contrast(),
            "none" => Self::no_color(),
            _ => Self::from_env(),
        }
    }

    /// Create a dark theme (default).
    pub fn dark() -> Self {
        let ftui_theme = ThemeBuilder::new()
            .background(ftui::Color::rgb(DARK_BG.r, DARK_BG.g, DARK_BG.b))
            .text(ftui::Color::rgb(DARK_FG.r, DARK_FG.g, DARK_FG.b))
            .error(ftui::Color::rgb(DARK_ERROR.r, DARK_ERROR.g, DARK_ERROR.b))
            .warning(ftui::Color::rgb(
                DARK_WARNING.r,
                DARK_WARNING.g,
                DARK_WARNING.b,
            ))
            .success(ftui::Color::rgb(
                DARK_SUCCESS.r,
                DARK_SUCCESS.g,
                DARK_SUCCESS.b,
            ))
            .primary(ftui::Color::rgb(
                DARK_HIGHLIGHT.r,
                DARK_HIGHLIGHT.g,
                DARK_HIGHLIGHT.b,
            ))
            .text_muted(ftui::Color::rgb(DARK_MUTED.r, DARK_MUTED.g, DARK_MUTED.b))
            .border(ftui::Color::rgb(
                DARK_BORDER.r,
                DARK_BORDER.g,
                DARK_BORDER.b,
            ))
            .border_focused(ftui::Color::rgb(
                DARK_BORDER_FOCUSED.r,
                DARK_BORDER_FOCUSED.g,
                DARK_BORDER_FOCUSED.b,
            ))
            .build();

        let status = StatusColors {
            error: DARK_ERROR,
            warning: DARK_WARNING,
            success: DARK_SUCCESS,
            bg: DARK_BG,
            fg: DARK_FG,
        };

        let sheet = build_stylesheet(&status);

        Self {
            mode: ThemeMode::Dark,
            ftui_theme,
            stylesheet: sheet,
            status,
        }
    }

    /// Create a light theme.
    pub fn light() -> Self {
        let ftui_theme = ThemeBuilder::new()
            .background(ftui::Color::rgb(LIGHT_BG.r, LIGHT_BG.g, LIGHT_BG.b))
            .text(ftui::Color::rgb(LIGHT_FG.r, LIGHT_FG.g, LIGHT_FG.b))
            .error(ftui::Color::rgb(
                LIGHT_ERROR.r,
                LIGHT_ERROR.g,
                LIGHT_ERROR.b,
            ))
            .warning(ftui::Color::rgb(
                LIGHT_WARNING.r,
                LIGHT_WARNING.g,
                LIGHT_WARNING.b,
            ))
            .success(ftui::Color::rgb(
                LIGHT_SUCCESS.r,
                LIGHT_SUCCESS.g,
                LIGHT_SUCCESS.b,
            ))
            .primary(ftui::Color::rgb(
                LIGHT_HIGHLIGHT.r,
                LIGHT_HIGHLIGHT.g,
                LIGHT_HIGHLIGHT.b,
            ))
            .text_muted(ftui::Color::rgb(
                LIGHT_MUTED.r,
                LIGHT_MUTED.g,
                LIGHT_MUTED.b,
            ))
            .border(ftui::Color::rgb(
                LIGHT_BORDER.r,
                LIGHT_BORDER.g,
                LIGHT_BORDER.b,
            ))
            .border_focused(ftui::Color::rgb(
                LIGHT_BORDER_FOCUSED.r,
                LIGHT_BORDER_FOCUSED.g,
                LIGHT_BORDER_FOCUSED.b,
            ))
            .build();

        let status = StatusColors {
            error: LIGHT_ERROR,
            warning: LIGHT_WARNING,
            success: LIGHT_SUCCESS,
            bg: LIGHT_BG,
            fg: LIGHT_FG,
        };

        let sheet = build_stylesheet(&status);

        Self {
            mode: ThemeMode::Light,
            ftui_theme,
            stylesheet: sheet,
            status,
        }
    }

    /// Create a high contrast theme (WCAG AAA: 7:1 minimum ratio).
    pub fn high_contrast() -> Self {
        let ftui_theme = ThemeBuilder::new()
            .background(ftui::Color::rgb(HC_BG.r, HC_BG.g, HC_BG.b))
            .text(ftui::Color::rgb(HC_FG.r, HC_FG.g, HC_FG.b))
            .error(ftui::Color::rgb(HC_ERROR.r, HC_ERROR.g, HC_ERROR.b))
            .warning(ftui::Color::rgb(HC_WARNING.r, HC_WARNING.g, HC_WARNING.b))
            .success(ftui::Color::rgb(HC_SUCCESS.r, HC_SUCCESS.g, HC_SUCCESS.b))
            .primary(ftui::Color::rgb(
                HC_HIGHLIGHT.r,
                HC_HIGHLIGHT.g,
                HC_HIGHLIGHT.b,
            ))
            .text_muted(ftui::Color::rgb(HC_MUTED.r, HC_MUTED.g, HC_MUTED.b))
            .border(ftui::Color::rgb(HC_BORDER.r, HC_BORDER.g, HC_BORDER.b))
            .border_focused(ftui::Color::rgb(
                HC_BORDER_FOCUSED.r,
                HC_BORDER_FOCUSED.g,
                HC_BORDER_FOCUSED.b,
            ))
            .build();

        let status = StatusColors {
            error: HC_ERROR,
            warning: HC_WARNING,
            success: HC_SUCCESS,
            bg: HC_BG,
            fg: HC_FG,
        };

        let sheet = build_stylesheet(&status);

        Self {
            mode: ThemeMode::HighContrast,
            ftui_theme,
            stylesheet: sheet,
            status,
        }
    }

    /// Create a no-color theme for terminals without color support.
    /// Respects the `NO_COLOR` environment variable (<https://no-color.org/>).
    pub fn no_color() -> Self {
        let ftui_theme = ThemeBuilder::new().build();

        let status = StatusColors {
            error: FtuiRgb::new(255, 255, 255),
            warning: FtuiRgb::new(255, 255, 255),
            success: FtuiRgb::new(255, 255, 255),
            bg: FtuiRgb::new(0, 0, 0),
            fg: FtuiRgb::new(255, 255, 255),
        };

        let sheet = build_no_color_stylesheet();

        Self {
            mode: ThemeMode::NoColor,
            ftui_theme,
            stylesheet: sheet,
            status,
        }
    }

    /// Access the underlying ftui theme.
    pub fn ftui_theme(&self) -> &FtuiTheme {
        &self.ftui_theme
    }

    /// Access the stylesheet with named style classes.
    pub fn stylesheet(&self) -> &StyleSheet {
        &self.stylesheet
    }

    /// Get an ftui style by class name from the stylesheet.
    pub fn class(&self, name: &str) -> FtuiStyle {
        self.stylesheet.get_or_default(name)
    }

    /// Get the current color profile based on terminal capabilities.
    pub fn color_profile() -> ColorProfile {
        ColorProfile::detect()
    }

    /// Validate that all status colors meet WCAG AA (4.5:1 ratio)
    /// against the theme's background color.
    pub fn validate_wcag_aa(&self) -> Vec<String> {
        let mut failures = Vec::new();
        let bg = self.status.bg;

        for (name, fg) in [
            ("error", self.status.error),
            ("warning", self.status.warning),
            ("success", self.status.success),
            ("text", self.status.fg),
        ] {
            if !meets_wcag_aa(fg, bg) {
                let ratio = contrast_ratio(fg, bg);
                failures.push(format!(
                    "{name} ({fg:?}) on bg ({bg:?}) fails WCAG AA: {ratio:.2}:1 < 4.5:1"
                ));
            }
        }

        failures
    }

    /// Validate that all status colors meet WCAG AAA (7:1 ratio)
    /// against the theme's background color.
    pub fn validate_wcag_aaa(&self) -> Vec<String> {
        let mut failures = Vec::new();
        let bg = self.status.bg;

        for (name, fg) in [
            ("error", self.status.error),
            ("warning", self.status.warning),
            ("success", self.status.success),
            ("text", self.status.fg),
        ] {
            if !meets_wcag_aaa(fg, bg) {
                let ratio = contrast_ratio(fg, bg);
                failures.push(format!(
                    "{name} ({fg:?}) on bg ({bg:?}) fails WCAG AAA: {ratio:.2}:1 < 7.0:1"
                ));
            }
        }

        failures
    }
}

// ---------------------------------------------------------------------------
// StyleSheet builders
// ---------------------------------------------------------------------------

/// Build the standard stylesheet with tone-aware row styles.
fn build_stylesheet(colors: &StatusColors) -> StyleSheet {
    let sheet = StyleSheet::new();

    // Row tones
    sheet.define(
        "tone.warning",
        FtuiStyle::new().fg(PackedRgba::rgb(
            colors.warning.r,
            colors.warning.g,
            colors.warning.b,
        )),
    );

    // Table styles
    sheet.define(
        "table.header",
        FtuiStyle::new()
            .fg(PackedRgba::rgb(colors.fg.r, colors.fg.g, colors.fg.b))
            .bold(),
    );
    sheet.define(
        "table.selected",
        FtuiStyle::new().bg(PackedRgba::rgb(60, 60, 60)),
    );

    // Search
    sheet.define(
        "search.highlight",
        FtuiStyle::new()
            .bg(PackedRgba::rgb(80, 80, 0))
            .fg(PackedRgba::rgb(255, 255, 255)),
    );

    // Status indicators
    sheet.define(
        "status.error",
        FtuiStyle::new()
            .fg(PackedRgba::rgb(
                colors.error.r,
                colors.error.g,
                colors.error.b,
            ))
            .bold(),
    );
    sheet.define(
        "status.warning",
        FtuiStyle::new().fg(PackedRgba::rgb(
            colors.warning.r,
            colors.warning.g,
            colors.warning.b,
        )),
    );
    sheet.define(
        "status.success",
        FtuiStyle::new().fg(PackedRgba::rgb(
            colors.success.r,
            colors.success.g,
            colors.success.b,
        )),
    );

    // Borders
    sheet.define("border.normal", FtuiStyle::new());
    sheet.define("border.focused", FtuiStyle::new().bold());

    sheet
}

/// Build a stylesheet for NO_COLOR mode using only text attributes.
fn build_no_color_stylesheet() -> StyleSheet {
    let sheet = StyleSheet::new();

    sheet.define("tone.warning", FtuiStyle::new().bold());

    sheet.define("table.header", FtuiStyle::new().bold());
    sheet.define("table.selected", FtuiStyle::new().reverse());
    sheet.define("search.highlight", FtuiStyle::new().reverse());

    sheet.define("status.error", FtuiStyle::new().bold().underline());
    sheet.define("status.warning", FtuiStyle::new().bold());
    sheet.define("status.success", FtuiStyle::new());

    sheet.define("border.normal", FtuiStyle::new());
    sheet.define("border.focused", FtuiStyle::new().bold());

    sheet
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dark_theme_mode() {
        let theme = Theme::dark();
        assert_eq!(theme.mode, ThemeMode::Dark);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Theme::from_name("light").mode, ThemeMode::Light);
        assert_eq!(Theme::from_name("dark").mode, ThemeMode::Dark);
        assert_eq!(
            Theme::from_name("high-contrast").mode,
            ThemeMode::HighContrast
        );
        assert_eq!(Theme::from_name("none").mode, ThemeMode::NoColor);
    }

    #[test]
    fn test_dark_theme_status_colors_meet_wcag_aa() {
        let theme = Theme::dark();
        let failures = theme.validate_wcag_aa();
        assert!(
            failures.is_empty(),
            "Dark theme WCAG AA failures: {failures:?}"
        );
    }

    #[test]
    fn test_light_theme_status_colors_meet_wcag_aa() {
        let theme = Theme::light();
        let failures = theme.validate_wcag_aa();
        assert!(
            failures.is_empty(),
            "Light theme WCAG AA failures: {failures:?}"
        );
    }

    #[test]
    fn test_high_contrast_theme_meets_wcag_aaa() {
        let theme = Theme::high_contrast();
        let failures = theme.validate_wcag_aaa();
        assert!(
            failures.is_empty(),
            "High contrast WCAG AAA failures: {failures:?}"
        );
    }

    #[test]
    fn test_stylesheet_has_all_required_classes() {
        let required = [
            "tone.warning",
            "table.header",
            "table.selected",
            "search.highlight",
            "status.error",
            "status.warning",
            "status.success",
            "border.normal",
            "border.focused",
        ];

        for theme in [
            Theme::dark(),
            Theme::light(),
            Theme::high_contrast(),
            Theme::no_color(),
        ] {
            for class in &required {
                assert!(
                    theme.stylesheet().contains(class),
                    "Theme {:?} missing stylesheet class: {class}",
                    theme.mode
                );
            }
        }
    }

    #[test]
    fn test_theme_class_accessor() {
        let theme = Theme::dark();
        let _style = theme.class("tone.warning");
        // Missing class returns default style without panic
        let _default = theme.class("nonexistent.class");
    }
}
