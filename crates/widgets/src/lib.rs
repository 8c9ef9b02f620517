pub mod chart;
pub mod dataset;
pub mod grid;
pub mod map;
pub mod sidebar;
pub mod value_box;

pub use chart::{ChartModel, TrendChart};
pub use dataset::{DatasetGrid, StaticPanel};
pub use grid::{table_view, DataGrid};
pub use map::{MapPanel, Tile};
pub use sidebar::Sidebar;
pub use value_box::{TimestampBox, ValueBox};

use dash_theme::Theme;
use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;

/// Shown wherever a widget has nothing to display before the first tick.
pub const PLACEHOLDER: &str = "no data yet";

/// Bordered block with a themed title; every panel sits in one.
pub fn titled(title: &str, theme: &Theme) -> Block<'static> {
    Block::bordered()
        .title(Line::styled(format!(" {title} "), theme.heading()))
        .border_style(theme.caption())
}

/// Fill `area` with the placeholder inside `block`.
pub(crate) fn render_placeholder(f: &mut Frame, area: Rect, block: Block<'_>, theme: &Theme) {
    f.render_widget(Paragraph::new(PLACEHOLDER).style(theme.caption()).block(block), area);
}
