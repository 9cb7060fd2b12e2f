//! Terminal layout for the console screen.
//!
//! The screen is always four stacked rows (tab strip, search, record table,
//! status bar); what changes with terminal width is how much vertical room
//! each row gets. [`Breakpoint`] classifies the width, [`ResponsiveLayout`]
//! turns a frame area into the four row rects, and [`LayoutState`] remembers
//! the last size so resizes can be logged when they cross a width class.

use std::fmt;

use ftui::layout::{Constraint, Flex, Rect};
use tracing::{debug, trace};

/// Width below which the screen shows a "terminal too small" notice.
const USABLE_MIN_WIDTH: u16 = 40;
/// Height below which the screen shows a "terminal too small" notice.
const USABLE_MIN_HEIGHT: u16 = 10;

// ---------------------------------------------------------------------------
// Breakpoints
// ---------------------------------------------------------------------------

/// Width classes the layout distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Breakpoint {
    /// Under 80 columns. Search collapses to a single row.
    Minimal,
    /// 80 to 119 columns.
    Compact,
    /// 120 to 199 columns.
    Standard,
    /// 200 columns and up.
    Wide,
}

impl Breakpoint {
    /// Classify a terminal size. Only width matters; height shortfalls are
    /// handled by [`ResponsiveLayout::is_too_small`] instead.
    pub fn from_size(width: u16, _height: u16) -> Self {
        if width >= 200 {
            Breakpoint::Wide
        } else if width >= 120 {
            Breakpoint::Standard
        } else if width >= 80 {
            Breakpoint::Compact
        } else {
            Breakpoint::Minimal
        }
    }
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Breakpoint::Minimal => "minimal",
            Breakpoint::Compact => "compact",
            Breakpoint::Standard => "standard",
            Breakpoint::Wide => "wide",
        })
    }
}

// ---------------------------------------------------------------------------
// Row areas
// ---------------------------------------------------------------------------

/// The four row rects of the main screen, top to bottom.
#[derive(Debug, Clone, Copy)]
pub struct MainAreas {
    /// Entity tab strip.
    pub tabs: Rect,
    /// Search input.
    pub search: Rect,
    /// Record table.
    pub table: Rect,
    /// Status bar.
    pub status: Rect,
}

// ---------------------------------------------------------------------------
// Layout calculator
// ---------------------------------------------------------------------------

/// Splits a frame area into the main screen rows for its width class.
#[derive(Debug, Clone, Copy)]
pub struct ResponsiveLayout {
    area: Rect,
    breakpoint: Breakpoint,
}

impl ResponsiveLayout {
    pub fn new(area: Rect) -> Self {
        let breakpoint = Breakpoint::from_size(area.width, area.height);
        trace!(
            width = area.width,
            height = area.height,
            breakpoint = %breakpoint,
            "layout.calculate"
        );
        Self { area, breakpoint }
    }

    pub fn breakpoint(&self) -> Breakpoint {
        self.breakpoint
    }

    /// True when the terminal is too small to render anything useful.
    pub fn is_too_small(&self) -> bool {
        self.area.width < USABLE_MIN_WIDTH || self.area.height < USABLE_MIN_HEIGHT
    }

    /// Split the frame into tab, search, table, and status rows.
    pub fn main_areas(&self) -> MainAreas {
        // Minimal terminals trade the bordered search box for a bare input
        // row and let the table floor shrink.
        let (search_rows, table_floor) = match self.breakpoint {
            Breakpoint::Minimal => (1, 5),
            _ => (3, 10),
        };

        let rows = Flex::vertical()
            .constraints([
                Constraint::Fixed(1),
                Constraint::Fixed(search_rows),
                Constraint::Min(table_floor),
                Constraint::Fixed(1),
            ])
            .split(self.area);

        MainAreas {
            tabs: rows[0],
            search: rows[1],
            table: rows[2],
            status: rows[3],
        }
    }

    /// A centered rect sized as a percentage of the frame, for dialogs and
    /// forms. Clamped to at least 30x10 and padded two cells from the edges.
    pub fn popup_area(&self, width_pct: u16, height_pct: u16) -> Rect {
        let width = pct_of(self.area.width, width_pct)
            .max(30)
            .min(self.area.width.saturating_sub(4));
        let height = pct_of(self.area.height, height_pct)
            .max(10)
            .min(self.area.height.saturating_sub(4));

        Rect::new(
            self.area.x + self.area.width.saturating_sub(width) / 2,
            self.area.y + self.area.height.saturating_sub(height) / 2,
            width,
            height,
        )
    }
}

fn pct_of(whole: u16, pct: u16) -> u16 {
    (whole as u32 * pct as u32 / 100) as u16
}

// ---------------------------------------------------------------------------
// Size tracking
// ---------------------------------------------------------------------------

/// Remembers the terminal size between resize events so breakpoint
/// transitions can be detected and logged.
#[derive(Debug, Clone)]
pub struct LayoutState {
    breakpoint: Breakpoint,
    size: (u16, u16),
}

impl LayoutState {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            breakpoint: Breakpoint::from_size(width, height),
            size: (width, height),
        }
    }

    /// Record a new terminal size. Returns true when the width class changed.
    pub fn update(&mut self, width: u16, height: u16) -> bool {
        let next = Breakpoint::from_size(width, height);
        let crossed = next != self.breakpoint;

        if crossed {
            debug!(from = %self.breakpoint, to = %next, "layout.breakpoint_change");
        } else if self.size != (width, height) {
            debug!(width, height, breakpoint = %next, "layout.resize");
        }

        self.breakpoint = next;
        self.size = (width, height);
        crossed
    }

    pub fn breakpoint(&self) -> Breakpoint {
        self.breakpoint
    }

    pub fn size(&self) -> (u16, u16) {
        self.size
    }
}
