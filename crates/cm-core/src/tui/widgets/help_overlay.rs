//! Keyboard shortcut reference, shown as a centered modal over the table.

use ftui::text::{Line as FtuiLine, Span as FtuiSpan, Text as FtuiText};
use ftui::widgets::block::Block as FtuiBlock;
use ftui::widgets::modal::{Modal, ModalPosition, ModalSizeConstraints};
use ftui::widgets::paragraph::Paragraph as FtuiParagraph;
use ftui::widgets::Widget as FtuiWidget;
use ftui::PackedRgba;
use ftui::Style as FtuiStyle;

use crate::tui::layout::Breakpoint;
use crate::tui::theme::Theme;

/// Shortcut listing, grouped as (section title, [(keys, action)]).
const SHORTCUTS: &[(&str, &[(&str, &str)])] = &[
    (
        "Navigation",
        &[
            ("j / Down", "Move down"),
            ("k / Up", "Move up"),
            ("Home", "Go to top"),
            ("End", "Go to bottom"),
            ("PgUp/PgDn", "Page up/down"),
            ("Tab", "Next tab"),
            ("Shift+Tab", "Previous tab"),
        ],
    ),
    (
        "Search",
        &[
            ("/", "Start search"),
            ("f / C-f", "Cycle column scope"),
            ("Enter", "Commit search"),
            ("Esc", "Clear search"),
        ],
    ),
    (
        "Records",
        &[
            ("Space", "Toggle selection"),
            ("A", "Select all visible"),
            ("u", "Unselect all"),
            ("n", "New record"),
            ("e", "Edit highlighted record"),
            ("d / Del", "Delete selected"),
            ("r", "Refresh tab"),
        ],
    ),
    ("General", &[("?", "Toggle help"), ("q", "Quit")]),
];

/// One-line-per-topic digest for terminals too narrow for the full listing.
const DIGEST: &[&str] = &[
    "Navigation: j/k/Home/End",
    "Tabs: Tab/Shift+Tab",
    "Search: /  Scope: f",
    "Select: Space/A/u",
    "Edit: n/e/d  Refresh: r",
    "Help: ?  Quit: q",
];

/// Keys column width in the full listing.
const KEY_COL_WIDTH: usize = 12;

/// Modal listing the console's keyboard shortcuts.
///
/// Minimal terminals get the compact digest; everything else gets the
/// sectioned listing.
#[derive(Debug, Default)]
pub struct HelpOverlay<'a> {
    theme: Option<&'a Theme>,
    breakpoint: Option<Breakpoint>,
}

impl<'a> HelpOverlay<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn theme(mut self, theme: &'a Theme) -> Self {
        self.theme = Some(theme);
        self
    }

    pub fn breakpoint(mut self, breakpoint: Breakpoint) -> Self {
        self.breakpoint = Some(breakpoint);
        self
    }

    fn heading_style(&self) -> FtuiStyle {
        match self.theme {
            Some(t) => t.stylesheet().get_or_default("table.header"),
            None => FtuiStyle::new().bold(),
        }
    }

    fn key_style(&self) -> FtuiStyle {
        match self.theme {
            Some(t) => t.stylesheet().get_or_default("table.selected"),
            None => FtuiStyle::new().fg(PackedRgba::rgb(0, 255, 255)).bold(),
        }
    }

    fn text_style(&self) -> FtuiStyle {
        match self.theme {
            Some(t) => t.class("border.normal"),
            None => FtuiStyle::default(),
        }
    }

    fn lines(&self) -> Vec<FtuiLine> {
        if self.breakpoint == Some(Breakpoint::Minimal) {
            return DIGEST.iter().map(|row| FtuiLine::raw(*row)).collect();
        }

        let heading = self.heading_style();
        let key = self.key_style();
        let action = self.text_style();

        let mut lines = vec![
            FtuiLine::from_spans([FtuiSpan::styled("  Columbarium Console Help", heading)]),
            FtuiLine::raw(""),
        ];

        for (section, bindings) in SHORTCUTS {
            lines.push(FtuiLine::from_spans([FtuiSpan::styled(
                format!("  {section}:"),
                heading,
            )]));
            for (keys, what) in *bindings {
                lines.push(FtuiLine::from_spans([
                    FtuiSpan::styled(format!("    {keys:width$}", width = KEY_COL_WIDTH), key),
                    FtuiSpan::styled(*what, action),
                ]));
            }
            lines.push(FtuiLine::raw(""));
        }

        lines
    }

    pub fn render_view(&self, area: ftui::layout::Rect, frame: &mut ftui::render::frame::Frame) {
        let border_style = match self.theme {
            Some(t) => t.stylesheet().get_or_default("border.focused"),
            None => FtuiStyle::new().fg(PackedRgba::rgb(0, 255, 255)),
        };

        let block = FtuiBlock::bordered()
            .title(" Help ")
            .border_style(border_style);

        let text: FtuiText = self.lines().into_iter().collect();
        let body = FtuiParagraph::new(text).style(self.text_style()).block(block);

        let size = ModalSizeConstraints::new()
            .min_width(30)
            .max_width((area.width as f32 * 0.5) as u16)
            .min_height(10)
            .max_height((area.height as f32 * 0.7) as u16);

        let modal = Modal::new(body).position(ModalPosition::Center).size(size);
        FtuiWidget::render(&modal, area, frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered_text(overlay: &HelpOverlay) -> String {
        overlay
            .lines()
            .iter()
            .map(|l| {
                l.spans()
                    .iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_full_listing_covers_every_binding() {
        let text = rendered_text(&HelpOverlay::new());

        assert!(text.contains("Columbarium Console Help"));
        for (section, bindings) in SHORTCUTS {
            assert!(text.contains(&format!("{section}:")), "{section} heading");
            for (keys, what) in *bindings {
                assert!(text.contains(keys), "{keys}");
                assert!(text.contains(what), "{what}");
            }
        }
    }

    #[test]
    fn test_minimal_breakpoint_gets_digest() {
        let compact = HelpOverlay::new().breakpoint(Breakpoint::Minimal);
        let text = rendered_text(&compact);

        assert!(text.contains("Search: /"));
        assert!(text.contains("Quit: q"));
        assert!(!text.contains("Columbarium Console Help"));
        assert_eq!(compact.lines().len(), DIGEST.len());
    }

    #[test]
    fn test_full_listing_line_count() {
        let total: usize = SHORTCUTS.iter().map(|(_, b)| b.len()).sum();
        // Title, blank after it, then per section a heading, its bindings,
        // and a trailing blank.
        let expected = 2 + SHORTCUTS.len() * 2 + total;
        assert_eq!(HelpOverlay::new().lines().len(), expected);
    }

    #[test]
    fn test_digest_is_shorter_than_full_listing() {
        let full = HelpOverlay::new().breakpoint(Breakpoint::Wide);
        let compact = HelpOverlay::new().breakpoint(Breakpoint::Minimal);
        assert!(full.lines().len() > compact.lines().len());
    }

    #[test]
    fn test_keys_column_is_aligned() {
        let full = HelpOverlay::new();
        for line in full.lines() {
            let spans = line.spans();
            if spans.len() == 2 {
                assert_eq!(spans[0].as_str().len(), 4 + KEY_COL_WIDTH);
            }
        }
    }
}
