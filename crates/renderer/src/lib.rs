//! Page layout for the terminal dashboard.
//!
//! Decides which sections appear, in which order, and where each one lands
//! on screen. Widgets draw themselves into the areas handed out here.

use dash_config::{DashConfig, DashboardConfig, Section};
use dash_core::DashState;
use dash_theme::Theme;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};

/// Rows taken by the title bar with its status line.
pub const HEADER_HEIGHT: u16 = 3;

/// Which sections appear on the page, top to bottom.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLayout {
    pub sections:      Vec<Section>,
    pub sidebar_width: u16,
}

/// Screen areas for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageAreas {
    pub header:   Rect,
    /// Every laid-out section, the sidebar included, in layout order.
    pub sections: Vec<(Section, Rect)>,
}

impl PageAreas {
    pub fn get(&self, section: Section) -> Option<Rect> {
        self.sections.iter().find(|(s, _)| *s == section).map(|(_, area)| *area)
    }
}

impl PageLayout {
    /// Build a [`PageLayout`] from the loaded configuration.
    ///
    /// Duplicates are dropped, as are sections with nothing to show: the map
    /// without a `map` block, the dataset without a `[dataset]` block.
    pub fn from_config(config: &DashConfig, dashboard: &DashboardConfig) -> Self {
        let mut sections: Vec<Section> = Vec::with_capacity(config.global.layout.len());
        for section in &config.global.layout {
            let available = match section {
                Section::Map     => dashboard.map.is_some(),
                Section::Dataset => config.dataset.is_some(),
                _ => true,
            };
            if available && !sections.contains(section) {
                sections.push(*section);
            }
        }
        Self {
            sections,
            sidebar_width: config.global.sidebar_width,
        }
    }

    pub fn contains(&self, section: Section) -> bool {
        self.sections.contains(&section)
    }

    /// Split `area` into the header and one rect per section.
    ///
    /// The sidebar, when present, takes a fixed-width column on the left for
    /// the full body height. The other sections stack in the remaining column
    /// at the height `height` asks for; the chart also absorbs leftover rows.
    pub fn split(&self, area: Rect, height: impl Fn(Section) -> u16) -> PageAreas {
        let [header, body] =
            Layout::vertical([Constraint::Length(HEADER_HEIGHT), Constraint::Min(0)]).areas(area);

        let mut sections = Vec::with_capacity(self.sections.len());
        let main = if self.contains(Section::Sidebar) {
            let [side, main] =
                Layout::horizontal([Constraint::Length(self.sidebar_width), Constraint::Min(0)]).areas(body);
            sections.push((Section::Sidebar, side));
            main
        } else {
            body
        };

        let stacked: Vec<Section> = self.sections.iter().copied().filter(|s| *s != Section::Sidebar).collect();
        let constraints = stacked.iter().map(|s| match s {
            Section::Chart => Constraint::Min(height(*s)),
            other => Constraint::Length(height(*other)),
        });
        let rects = Layout::vertical(constraints).split(main);
        sections.extend(stacked.into_iter().zip(rects.iter().copied()));

        PageAreas { header, sections }
    }
}

/// Status summary: tick count, interval and the last tick error.
pub fn status_line(state: &DashState, interval_secs: u64, theme: &Theme) -> Line<'static> {
    let ticks = state.view().map_or(0, |v| v.tick);
    let mut status = format!("tick {ticks} · every {interval_secs}s");
    if let Some(view) = state.view() {
        status.push_str(&format!(" · {} sample(s)", view.len()));
    }
    if state.failed_ticks > 0 {
        status.push_str(&format!(" · {} failed", state.failed_ticks));
    }

    let mut spans = vec![Span::styled(status, theme.caption())];
    if let Some(err) = &state.last_error {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(format!("last tick failed: {err}"), theme.fg(theme.accent)));
    }
    Line::from(spans)
}
