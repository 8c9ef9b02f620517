use crate::grid::table_view;
use crate::titled;
use dash_core::dataset::{Dataset, Record};
use dash_core::schema::require_columns;
use dash_core::Result;
use dash_theme::Theme;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use std::collections::HashSet;
use tracing::debug;

/// A panel fed by static data rather than by the sampler.
pub trait StaticPanel: Send + Sync + std::fmt::Debug {
    /// Check column references against the record type.
    fn validate(&self) -> Result<()>;

    /// Rows the panel wants on screen.
    fn height(&self) -> u16;

    fn render(&self, f: &mut Frame, area: Rect, theme: &Theme);
}

/// Rows of a static dataset whose categorical column is in an accepted set.
#[derive(Debug, Clone)]
pub struct DatasetGrid<R> {
    title:         String,
    dataset:       Dataset<R>,
    filter_column: String,
    include:       HashSet<String>,
    max_rows:      usize,
}

impl<R: Record> DatasetGrid<R> {
    pub fn new(
        title: impl Into<String>,
        dataset: Dataset<R>,
        filter_column: impl Into<String>,
        include: impl IntoIterator<Item = String>,
        max_rows: usize,
    ) -> Self {
        Self {
            title: title.into(),
            dataset,
            filter_column: filter_column.into(),
            include: include.into_iter().collect(),
            max_rows,
        }
    }
}

impl<R> StaticPanel for DatasetGrid<R>
where
    R: Record + Send + Sync + std::fmt::Debug,
{
    fn validate(&self) -> Result<()> {
        require_columns("dataset grid", [self.filter_column.as_str()], R::columns())
    }

    /// Borders, header, rows and the footer line.
    fn height(&self) -> u16 {
        u16::try_from(self.max_rows).unwrap_or(u16::MAX).saturating_add(4)
    }

    fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let block = titled(&self.title, theme);
        let inner = block.inner(area);
        f.render_widget(block, area);

        let rows = match self.dataset.filter_by_membership(&self.filter_column, &self.include) {
            Ok(rows) => rows,
            Err(e) => {
                debug!("Dataset panel '{}' cannot filter: {e}", self.title);
                f.render_widget(Paragraph::new(Line::styled(e.to_string(), theme.caption())), inner);
                return;
            }
        };

        let [body, footer] = Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(inner);
        let shown = &rows[..rows.len().min(self.max_rows)];
        f.render_widget(table_view(&Dataset::table_of(shown), 1, theme), body);

        let mut selected: Vec<&str> = self.include.iter().map(String::as_str).collect();
        selected.sort_unstable();
        let summary = format!(
            "{} of {} rows where {} in [{}]",
            rows.len(),
            self.dataset.len(),
            self.filter_column,
            selected.join(", ")
        );
        f.render_widget(Paragraph::new(Line::styled(summary, theme.caption())), footer);
    }
}
