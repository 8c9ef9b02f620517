use crate::{render_placeholder, titled};
use dash_config::DashboardConfig;
use dash_core::{widget::DashWidget, DashState};
use dash_theme::Theme;
use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

/// Displays the latest value with its unit, e.g. `11.7 mm`.
#[derive(Debug, Clone)]
pub struct ValueBox {
    title:     String,
    caption:   String,
    unit:      String,
    precision: usize,
}

impl ValueBox {
    pub fn new(title: impl Into<String>, caption: impl Into<String>, unit: impl Into<String>, precision: usize) -> Self {
        Self {
            title:   title.into(),
            caption: caption.into(),
            unit:    unit.into(),
            precision,
        }
    }

    pub fn from_config(cfg: &DashboardConfig) -> Self {
        Self::new(&cfg.schema.value, &cfg.caption, &cfg.unit, cfg.decimals as usize)
    }

    /// The value line alone, without styling.
    pub fn label(&self, state: &DashState) -> Option<String> {
        let view = state.view()?;
        let value = view.latest.value();
        Some(if self.unit.is_empty() {
            format!("{value:.prec$}", prec = self.precision)
        } else {
            format!("{value:.prec$} {}", self.unit, prec = self.precision)
        })
    }

    /// Rows needed: borders, value, caption.
    pub fn height(&self) -> u16 {
        4
    }

    pub fn render(&self, f: &mut Frame, area: Rect, state: &DashState, theme: &Theme) {
        let block = titled(&self.title, theme);
        let Some(label) = self.label(state) else {
            render_placeholder(f, area, block, theme);
            return;
        };
        let lines = vec![
            Line::styled(label, theme.value()),
            Line::styled(self.caption.clone(), theme.caption()),
        ];
        f.render_widget(Paragraph::new(lines).block(block), area);
    }
}

impl DashWidget for ValueBox {
    fn id(&self) -> &str {
        "value_box"
    }
}

/// Displays when the latest reading was taken.
#[derive(Debug, Clone, Default)]
pub struct TimestampBox;

impl TimestampBox {
    pub fn new() -> Self {
        Self
    }

    pub fn height(&self) -> u16 {
        3
    }

    pub fn render(&self, f: &mut Frame, area: Rect, state: &DashState, theme: &Theme) {
        let block = titled("Last reading", theme);
        match state.view() {
            Some(view) => {
                let stamp = Paragraph::new(view.latest.timestamp().to_string()).style(theme.text());
                f.render_widget(stamp.block(block), area);
            }
            None => render_placeholder(f, area, block, theme),
        }
    }
}

impl DashWidget for TimestampBox {
    fn id(&self) -> &str {
        "timestamp_box"
    }
}
