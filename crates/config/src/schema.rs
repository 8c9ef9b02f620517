use dash_core::{DashError, ReadingSchema, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure parsed from `dash.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashConfig {
    /// Global settings.
    pub global: GlobalConfig,
    /// Every dashboard variant that can be run; `global.active` picks one.
    pub dashboards: Vec<DashboardConfig>,
    /// Optional static dataset shown under the live panels.
    pub dataset: Option<DatasetConfig>,
    /// Theme / visual settings.
    pub theme: ThemeConfig,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            global:     GlobalConfig::default(),
            dashboards: vec![DashboardConfig::finch(), DashboardConfig::penguin()],
            dataset:    None,
            theme:      ThemeConfig::default(),
        }
    }
}

impl DashConfig {
    /// Look up a dashboard by name.
    pub fn dashboard(&self, name: &str) -> Option<&DashboardConfig> {
        self.dashboards.iter().find(|d| d.name == name)
    }

    /// The dashboard to run: `name_override` if given, else `global.active`.
    pub fn active_dashboard(&self, name_override: Option<&str>) -> Result<&DashboardConfig> {
        let name = name_override.unwrap_or(&self.global.active);
        self.dashboard(name).ok_or_else(|| {
            let known: Vec<&str> = self.dashboards.iter().map(|d| d.name.as_str()).collect();
            DashError::Config(format!(
                "unknown dashboard '{name}' (configured: {})",
                known.join(", ")
            ))
        })
    }

    /// Reject values that would make the sampler or the renderers misbehave.
    pub fn validate(&self) -> Result<()> {
        if self.dashboards.is_empty() {
            return Err(DashError::Config("no dashboards configured".into()));
        }
        for (i, dash) in self.dashboards.iter().enumerate() {
            if self.dashboards[..i].iter().any(|d| d.name == dash.name) {
                return Err(DashError::Config(format!(
                    "dashboard '{}' is defined twice",
                    dash.name
                )));
            }
            dash.validate()?;
        }
        if let Some(dataset) = &self.dataset {
            dataset.validate()?;
        }
        Ok(())
    }
}

/// Global settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Name of the dashboard to run.
    pub active: String,
    /// Columns given to the sidebar when it is part of the layout.
    pub sidebar_width: u16,
    /// Page sections, top to bottom.
    pub layout: Vec<Section>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            active:        "finch".to_string(),
            sidebar_width: 32,
            layout:        Section::DEFAULT_ORDER.to_vec(),
        }
    }
}

/// A block of the rendered page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Sidebar,
    ValueBox,
    Timestamp,
    Grid,
    Chart,
    Map,
    Dataset,
}

impl Section {
    pub const DEFAULT_ORDER: [Section; 7] = [
        Section::Sidebar,
        Section::ValueBox,
        Section::Timestamp,
        Section::Grid,
        Section::Chart,
        Section::Map,
        Section::Dataset,
    ];
}

/// Largest sample window a dashboard may keep.
pub const MAX_CAPACITY: usize = 10_000;

/// Longest tick interval: one day.
pub const MAX_INTERVAL_SECS: u64 = 86_400;

/// One live dashboard: how readings are produced and how they are labelled.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub name: String,
    /// Page title.
    pub title: String,
    /// Seconds between ticks.
    pub interval_secs: u64,
    /// Readings kept in the sample window.
    pub capacity: usize,
    /// Lower bound of the synthetic value range (inclusive).
    pub min: f64,
    /// Upper bound of the synthetic value range (inclusive).
    pub max: f64,
    /// Decimal places kept on each generated value.
    pub decimals: u32,
    /// Fixed RNG seed for reproducible runs; `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Unit appended to the value box, e.g. `"mm"`.
    pub unit: String,
    /// Caption under the value box.
    pub caption: String,
    /// Canonical column names.
    pub schema: ReadingSchema,
    pub sidebar: SidebarConfig,
    pub chart: ChartConfig,
    pub grid: GridConfig,
    pub map: Option<MapConfig>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self::finch()
    }
}

impl DashboardConfig {
    /// Darwin's finches: beak depth in millimetres.
    pub fn finch() -> Self {
        Self {
            name:          "finch".to_string(),
            title:         "Darwin's Finches".to_string(),
            interval_secs: 5,
            capacity:      dash_core::window::DEFAULT_CAPACITY,
            min:           5.0,
            max:           15.0,
            decimals:      1,
            seed:          None,
            unit:          "mm".to_string(),
            caption:       "Finch Beaks".to_string(),
            schema:        ReadingSchema::new("beak_depth"),
            sidebar: SidebarConfig {
                heading:     "Finch Data".to_string(),
                description: "A look at Darwin's Finches.".to_string(),
                links:       Vec::new(),
            },
            chart: ChartConfig {
                title: "Beak depth with a Regression Line".to_string(),
                x:     "timestamp".to_string(),
                y:     "beak_depth".to_string(),
                ..ChartConfig::default()
            },
            grid: GridConfig::default(),
            map: Some(MapConfig {
                title: "Galapagos Islands".to_string(),
                lat:   -0.777259,
                lon:   -91.142578,
                zoom:  7,
            }),
        }
    }

    /// Antarctic penguins: air temperature in degrees Celsius.
    pub fn penguin() -> Self {
        Self {
            name:          "penguin".to_string(),
            title:         "Antarctic Penguins".to_string(),
            interval_secs: 8,
            min:           -18.0,
            max:           -16.0,
            unit:          "°C".to_string(),
            caption:       "Current Temperature".to_string(),
            schema:        ReadingSchema::new("temp"),
            sidebar: SidebarConfig {
                heading:     "Antarctic Explorer".to_string(),
                description: "A demonstration of live data.".to_string(),
                links:       Vec::new(),
            },
            chart: ChartConfig {
                title: "Temperature readings with Regression Line".to_string(),
                x:     "timestamp".to_string(),
                y:     "temp".to_string(),
                ..ChartConfig::default()
            },
            map: Some(MapConfig {
                title: "Palmer Station".to_string(),
                lat:   -64.7743,
                lon:   -64.0533,
                zoom:  6,
            }),
            ..Self::finch()
        }
    }

    pub fn validate(&self) -> Result<()> {
        let fail = |msg: String| Err(DashError::Config(format!("dashboard '{}': {msg}", self.name)));

        if self.name.trim().is_empty() {
            return Err(DashError::Config("dashboard name must not be empty".into()));
        }
        if !(1..=MAX_INTERVAL_SECS).contains(&self.interval_secs) {
            return fail(format!(
                "interval_secs must be between 1 and {MAX_INTERVAL_SECS}, got {}",
                self.interval_secs
            ));
        }
        if !(1..=MAX_CAPACITY).contains(&self.capacity) {
            return fail(format!(
                "capacity must be between 1 and {MAX_CAPACITY}, got {}",
                self.capacity
            ));
        }
        if !self.min.is_finite() || !self.max.is_finite() {
            return fail("min and max must be finite".into());
        }
        if self.min > self.max {
            return fail(format!("min ({}) is greater than max ({})", self.min, self.max));
        }
        if self.chart.height < 2 {
            return fail("chart.height must be at least 2".into());
        }
        if let Some(map) = &self.map {
            if !(-85.0511..=85.0511).contains(&map.lat) || !(-180.0..=180.0).contains(&map.lon) {
                return fail(format!("map centre ({}, {}) is out of range", map.lat, map.lon));
            }
            if map.zoom > 19 {
                return fail(format!("map zoom {} exceeds 19", map.zoom));
            }
        }
        self.schema.check()
    }
}

/// Sidebar text and links.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SidebarConfig {
    pub heading:     String,
    pub description: String,
    pub links:       Vec<LinkConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkConfig {
    pub label: String,
    pub href:  String,
}

/// Trend chart settings. `x` and `y` name reading columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub title:  String,
    pub x:      String,
    pub y:      String,
    /// Plot area height in terminal rows.
    pub height: u16,
    /// Overlay the least-squares line when at least two samples exist.
    pub show_trend: bool,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            title:      "Current Trend".to_string(),
            x:          "timestamp".to_string(),
            y:          "value".to_string(),
            height:     8,
            show_trend: true,
        }
    }
}

/// Data grid settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Columns to show, in order. Empty = every column of the view.
    pub columns: Vec<String>,
    /// Append the `best_fit_line` column when a trend is available.
    pub show_best_fit: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns:       Vec::new(),
            show_best_fit: true,
        }
    }
}

/// Map panel centre and zoom.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    pub title: String,
    pub lat:   f64,
    pub lon:   f64,
    pub zoom:  u8,
}

/// Which record type a dataset file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    #[default]
    Penguins,
    Finches,
}

/// Static dataset view: a JSON array of records filtered by one categorical column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    pub title: String,
    pub path:  PathBuf,
    #[serde(default)]
    pub kind:  DatasetKind,
    /// Categorical column used for the membership filter, e.g. `"species"`.
    pub filter_column: String,
    /// Accepted values of `filter_column`.
    #[serde(default)]
    pub include: Vec<String>,
    /// Maximum rows rendered.
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,
}

fn default_max_rows() -> usize {
    10
}

impl DatasetConfig {
    pub fn validate(&self) -> Result<()> {
        if self.filter_column.trim().is_empty() {
            return Err(DashError::Config("dataset.filter_column must not be empty".into()));
        }
        Ok(())
    }
}

/// Theme / styling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Emit ANSI colour escapes. `NO_COLOR` in the environment overrides this.
    pub color: bool,
    /// Primary text colour (hex, e.g. `"#cdd6f4"`).
    pub foreground: String,
    /// Headings and value boxes.
    pub accent: String,
    /// Secondary text: captions, axes, placeholders.
    pub muted: String,
    /// Scatter points.
    pub points: String,
    /// Regression line.
    pub trend: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            color:      true,
            foreground: "#cdd6f4".to_string(),
            accent:     "#800080".to_string(), // purple
            muted:      "#a6adc8".to_string(),
            points:     "#cba6f7".to_string(),
            trend:      "#f9e2af".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = DashConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.active_dashboard(None).unwrap().name, "finch");
        assert_eq!(cfg.active_dashboard(Some("penguin")).unwrap().unit, "°C");
    }

    #[test]
    fn penguin_inherits_finch_sampling_defaults() {
        let penguin = DashboardConfig::penguin();
        assert_eq!(penguin.capacity, 5);
        assert_eq!(penguin.decimals, 1);
        assert_eq!(penguin.schema.value, "temp");
    }

    #[test]
    fn parses_partial_toml() {
        let raw = r#"
            [global]
            active = "lab"

            [[dashboards]]
            name = "lab"
            title = "Lab bench"
            interval_secs = 2
            min = 20.0
            max = 25.0
            unit = "°C"
            schema = { value = "bench_temp" }
            chart = { y = "bench_temp" }

            [[dashboards.sidebar.links]]
            label = "Source"
            href = "https://example.org/src"
        "#;
        let cfg: DashConfig = toml::from_str(raw).unwrap();
        cfg.validate().unwrap();

        let lab = cfg.active_dashboard(None).unwrap();
        assert_eq!(lab.interval_secs, 2);
        assert_eq!(lab.schema.value, "bench_temp");
        assert_eq!(lab.schema.timestamp, "timestamp");
        assert_eq!(lab.chart.x, "timestamp");
        assert_eq!(lab.chart.height, 8);
        assert_eq!(lab.sidebar.links.len(), 1);
        assert!(cfg.theme.color);
        assert_eq!(cfg.global.layout, Section::DEFAULT_ORDER.to_vec());
    }

    #[test]
    fn custom_layout_parses_snake_case() {
        let cfg: DashConfig = toml::from_str(
            "[global]\nlayout = [\"value_box\", \"chart\"]\n",
        )
        .unwrap();
        assert_eq!(cfg.global.layout, vec![Section::ValueBox, Section::Chart]);
    }

    #[test]
    fn rejects_inverted_range() {
        let mut dash = DashboardConfig::finch();
        dash.min = 15.0;
        dash.max = 5.0;
        assert!(matches!(dash.validate(), Err(DashError::Config(_))));
    }

    #[test]
    fn rejects_zero_interval_and_capacity() {
        let mut dash = DashboardConfig::finch();
        dash.interval_secs = 0;
        assert!(dash.validate().is_err());

        let mut dash = DashboardConfig::finch();
        dash.capacity = 0;
        assert!(dash.validate().is_err());
    }

    #[test]
    fn rejects_oversized_capacity_and_interval() {
        let mut dash = DashboardConfig::finch();
        dash.capacity = MAX_CAPACITY;
        dash.interval_secs = MAX_INTERVAL_SECS;
        dash.validate().unwrap();

        dash.capacity = usize::MAX;
        assert!(matches!(dash.validate(), Err(DashError::Config(msg)) if msg.contains("capacity")));

        let mut dash = DashboardConfig::finch();
        dash.interval_secs = MAX_INTERVAL_SECS + 1;
        assert!(matches!(dash.validate(), Err(DashError::Config(msg)) if msg.contains("interval_secs")));
    }

    #[test]
    fn rejects_duplicate_names_and_unknown_active() {
        let mut cfg = DashConfig::default();
        cfg.dashboards.push(DashboardConfig::finch());
        assert!(cfg.validate().is_err());

        let cfg = DashConfig::default();
        assert!(cfg.active_dashboard(Some("owl")).is_err());
    }

    #[test]
    fn dataset_block_defaults() {
        let raw = r#"
            [dataset]
            title = "Palmer Penguins"
            path = "penguins.json"
            filter_column = "species"
            include = ["Adelie"]
        "#;
        let cfg: DashConfig = toml::from_str(raw).unwrap();
        let dataset = cfg.dataset.unwrap();
        assert_eq!(dataset.kind, DatasetKind::Penguins);
        assert_eq!(dataset.max_rows, 10);
    }
}
