use crate::{render_placeholder, titled};
use dash_config::DashboardConfig;
use dash_core::schema::{require_columns, BEST_FIT_COLUMN};
use dash_core::window::DEFAULT_CAPACITY;
use dash_core::{fit_trend, widget::DashWidget, Cell, DashState, ReadingSchema, Result, Table};
use dash_theme::Theme;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::text::Line;
use ratatui::widgets::{Cell as TableCell, Row, Table as TableWidget};
use ratatui::Frame;

/// Full snapshot as a table, with a `best_fit_line` column once two samples exist.
#[derive(Debug, Clone)]
pub struct DataGrid {
    title:         String,
    /// Columns to show; empty = all.
    columns:       Vec<String>,
    show_best_fit: bool,
    precision:     usize,
    /// Rows reserved on screen: the window capacity.
    rows:          usize,
}

impl DataGrid {
    pub fn new(title: impl Into<String>, columns: Vec<String>, show_best_fit: bool, precision: usize) -> Self {
        Self {
            title: title.into(),
            columns,
            show_best_fit,
            precision,
            rows: DEFAULT_CAPACITY,
        }
    }

    pub fn from_config(cfg: &DashboardConfig) -> Self {
        let mut grid = Self::new(
            format!("{} readings", cfg.title),
            cfg.grid.columns.clone(),
            cfg.grid.show_best_fit,
            cfg.decimals as usize,
        );
        grid.rows = cfg.capacity;
        grid
    }

    /// The table this grid would draw, before formatting.
    pub fn table(&self, state: &DashState) -> Option<Table> {
        let view = state.view()?;
        let full = match fit_trend(view) {
            Ok(trend) if self.show_best_fit => view.tabular.with_best_fit(&trend),
            _ => view.tabular.clone(),
        };
        Some(self.select(&full))
    }

    /// Keep only the configured columns, in configured order. The trend
    /// column is skipped silently while it does not exist yet.
    fn select(&self, table: &Table) -> Table {
        if self.columns.is_empty() {
            return table.clone();
        }
        let picked: Vec<(usize, &String)> = self
            .columns
            .iter()
            .filter_map(|name| table.column_index(name).map(|idx| (idx, name)))
            .collect();

        Table {
            columns: picked.iter().map(|(_, name)| (*name).clone()).collect(),
            rows: table
                .rows
                .iter()
                .map(|row| picked.iter().filter_map(|(idx, _)| row.get(*idx).cloned()).collect())
                .collect(),
        }
    }

    /// Rows needed: borders, header and one row per reading.
    pub fn height(&self) -> u16 {
        u16::try_from(self.rows).unwrap_or(u16::MAX).saturating_add(3)
    }

    pub fn render(&self, f: &mut Frame, area: Rect, state: &DashState, theme: &Theme) {
        let block = titled(&self.title, theme);
        match self.table(state) {
            Some(table) => f.render_widget(table_view(&table, self.precision, theme).block(block), area),
            None        => render_placeholder(f, area, block, theme),
        }
    }
}

impl DashWidget for DataGrid {
    fn id(&self) -> &str {
        "data_grid"
    }

    fn referenced_columns(&self) -> Vec<&str> {
        self.columns.iter().map(String::as_str).collect()
    }

    /// With the trend column switched off, listing it would never show anything.
    fn validate(&self, schema: &ReadingSchema) -> Result<()> {
        if self.show_best_fit {
            schema.validate(self.id(), self.referenced_columns())
        } else {
            require_columns(self.id(), self.referenced_columns(), &schema.base_columns())
        }
    }
}

/// Build a table widget for `table`: header row, then one row per record.
/// Numbers are right-aligned with `precision` decimals, text left-aligned.
pub fn table_view(table: &Table, precision: usize, theme: &Theme) -> TableWidget<'static> {
    let text: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| row.iter().map(|c| format!("{c:.precision$}")).collect())
        .collect();

    let widths: Vec<Constraint> = table
        .columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let width = text
                .iter()
                .filter_map(|row| row.get(i))
                .map(|s| s.chars().count())
                .chain(std::iter::once(name.chars().count()))
                .max()
                .unwrap_or(0);
            Constraint::Length(u16::try_from(width).unwrap_or(u16::MAX))
        })
        .collect();

    let header = Row::new(table.columns.iter().cloned()).style(theme.heading());
    let rows: Vec<Row<'static>> = table
        .rows
        .iter()
        .zip(text)
        .map(|(row, text)| {
            Row::new(row.iter().zip(text).map(|(cell, s)| match cell {
                Cell::Float(_) => TableCell::from(Line::from(s).alignment(Alignment::Right)),
                Cell::Text(_)  => TableCell::from(s),
            }))
            .style(theme.text())
        })
        .collect();

    TableWidget::new(rows, widths).header(header).column_spacing(2)
}
