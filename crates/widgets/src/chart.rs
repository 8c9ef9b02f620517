use crate::{render_placeholder, titled};
use dash_config::DashboardConfig;
use dash_core::schema::require_columns;
use dash_core::trend::fit_values;
use dash_core::{widget::DashWidget, Cell, DashState, ReadingSchema, Result, Timestamp, Trend};
use dash_theme::Theme;
use ratatui::layout::Rect;
use ratatui::symbols::Marker;
use ratatui::text::Line;
use ratatui::widgets::{Axis, Chart, Dataset, GraphType};
use ratatui::Frame;

/// Data behind one chart frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartModel {
    /// X-axis label per sample.
    pub labels: Vec<String>,
    /// Y value per sample.
    pub points: Vec<f64>,
    /// Regression line over the points, if at least two exist.
    pub trend:  Option<Trend>,
}

impl ChartModel {
    /// Lowest and highest value drawn, padded when the series is flat.
    pub fn y_bounds(&self) -> (f64, f64) {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        let mut include = |v: f64| {
            lo = lo.min(v);
            hi = hi.max(v);
        };
        self.points.iter().copied().for_each(&mut include);
        if let Some(trend) = &self.trend {
            include(trend.at(0));
            include(trend.at(self.last_index()));
        }
        if !lo.is_finite() || !hi.is_finite() {
            return (0.0, 1.0);
        }
        if hi - lo < f64::EPSILON {
            return (lo - 0.5, hi + 0.5);
        }
        (lo, hi)
    }

    fn last_index(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// `(sample index, value)` pairs for the scatter.
    fn scatter(&self) -> Vec<(f64, f64)> {
        self.points.iter().enumerate().map(|(i, v)| (i as f64, *v)).collect()
    }

    /// End points of the regression line, spanning every sample.
    fn line(&self) -> Option<Vec<(f64, f64)>> {
        let trend = self.trend?;
        let last = self.last_index();
        Some(vec![(0.0, trend.at(0)), (last as f64, trend.at(last))])
    }
}

/// Scatter of the readings with the least-squares line drawn over it.
#[derive(Debug, Clone)]
pub struct TrendChart {
    title:      String,
    x:          String,
    y:          String,
    height:     u16,
    show_trend: bool,
    precision:  usize,
}

impl TrendChart {
    pub fn new(title: impl Into<String>, x: impl Into<String>, y: impl Into<String>, height: u16) -> Self {
        Self {
            title:      title.into(),
            x:          x.into(),
            y:          y.into(),
            height:     height.max(2),
            show_trend: true,
            precision:  1,
        }
    }

    pub fn from_config(cfg: &DashboardConfig) -> Self {
        let mut chart = Self::new(&cfg.chart.title, &cfg.chart.x, &cfg.chart.y, cfg.chart.height);
        chart.show_trend = cfg.chart.show_trend;
        chart.precision = cfg.decimals as usize;
        chart
    }

    /// Build the plotted series from the current view.
    pub fn model(&self, state: &DashState) -> Option<ChartModel> {
        let table = &state.view()?.tabular;

        let points: Vec<f64> = table.column(&self.y)?.into_iter().filter_map(Cell::as_f64).collect();
        let labels: Vec<String> = table
            .column(&self.x)?
            .into_iter()
            .map(|cell| match cell {
                Cell::Text(s) => Timestamp::parse(s)
                    .map(|ts| ts.time_of_day())
                    .unwrap_or_else(|| s.clone()),
                Cell::Float(v) => format!("{v:.prec$}", prec = self.precision),
            })
            .collect();

        let trend = if self.show_trend { fit_values(&points).ok() } else { None };
        Some(ChartModel { labels, points, trend })
    }

    /// Rows needed: borders, plot, x axis and its labels.
    pub fn height(&self) -> u16 {
        self.height.saturating_add(4)
    }

    pub fn render(&self, f: &mut Frame, area: Rect, state: &DashState, theme: &Theme) {
        let block = titled(&self.title, theme);
        let model = match self.model(state) {
            Some(model) if !model.points.is_empty() => model,
            _ => return render_placeholder(f, area, block, theme),
        };

        let scatter = model.scatter();
        let line = model.line();

        // Points go last so they stay visible where the line crosses them.
        let mut datasets = Vec::with_capacity(2);
        if let Some(line) = &line {
            datasets.push(
                Dataset::default()
                    .marker(Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(theme.fg(theme.trend))
                    .data(line),
            );
        }
        datasets.push(
            Dataset::default()
                .marker(Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(theme.fg(theme.points))
                .data(&scatter),
        );

        let (lo, hi) = model.y_bounds();
        let x_max = (model.last_index() as f64).max(1.0);
        let x_labels: Vec<Line> = match (model.labels.first(), model.labels.last()) {
            (Some(first), Some(last)) if model.labels.len() > 1 => vec![first.clone().into(), last.clone().into()],
            (Some(first), _) => vec![first.clone().into()],
            _ => Vec::new(),
        };
        let y_labels = vec![
            Line::from(format!("{lo:.prec$}", prec = self.precision)),
            Line::from(format!("{hi:.prec$}", prec = self.precision)),
        ];

        let chart = Chart::new(datasets)
            .block(block.title_bottom(self.legend(&model, theme)))
            .legend_position(None)
            .x_axis(
                Axis::default()
                    .style(theme.caption())
                    .bounds([0.0, x_max])
                    .labels(x_labels),
            )
            .y_axis(
                Axis::default()
                    .style(theme.caption())
                    .bounds([lo, hi])
                    .labels(y_labels),
            );
        f.render_widget(chart, area);
    }

    fn legend(&self, model: &ChartModel, theme: &Theme) -> Line<'static> {
        match &model.trend {
            Some(trend) => Line::styled(format!(" best fit: slope {:+.3}/sample ", trend.slope), theme.fg(theme.trend)),
            None if self.show_trend => Line::styled(" trend needs at least 2 samples ", theme.caption()),
            None => Line::default(),
        }
    }
}

impl DashWidget for TrendChart {
    fn id(&self) -> &str {
        "trend_chart"
    }

    fn referenced_columns(&self) -> Vec<&str> {
        vec![self.x.as_str(), self.y.as_str()]
    }

    /// The chart fits its own line, so only the reading columns can be axes.
    fn validate(&self, schema: &ReadingSchema) -> Result<()> {
        require_columns(self.id(), self.referenced_columns(), &schema.base_columns())
    }
}
