use crate::titled;
use dash_config::MapConfig;
use dash_core::widget::DashWidget;
use dash_theme::Theme;
use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use std::f64::consts::PI;

/// Web-mercator ("slippy map") tile coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub zoom: u8,
    pub x:    u32,
    pub y:    u32,
}

impl Tile {
    /// Tile containing `(lat, lon)` at `zoom`.
    pub fn containing(lat: f64, lon: f64, zoom: u8) -> Self {
        let n = 2f64.powi(i32::from(zoom));
        let max = (n as u32).saturating_sub(1);
        let lat_rad = lat.to_radians();

        let x = ((lon + 180.0) / 360.0 * n).floor();
        let y = ((1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n).floor();

        Self {
            zoom,
            x: (x.max(0.0) as u32).min(max),
            y: (y.max(0.0) as u32).min(max),
        }
    }

    /// OpenStreetMap raster URL for this tile.
    pub fn url(&self) -> String {
        format!("https://tile.openstreetmap.org/{}/{}/{}.png", self.zoom, self.x, self.y)
    }
}

/// Static map panel: where the readings come from.
#[derive(Debug, Clone)]
pub struct MapPanel {
    title: String,
    lat:   f64,
    lon:   f64,
    zoom:  u8,
}

impl MapPanel {
    pub fn new(title: impl Into<String>, lat: f64, lon: f64, zoom: u8) -> Self {
        Self { title: title.into(), lat, lon, zoom }
    }

    pub fn from_config(cfg: &MapConfig) -> Self {
        Self::new(&cfg.title, cfg.lat, cfg.lon, cfg.zoom)
    }

    pub fn tile(&self) -> Tile {
        Tile::containing(self.lat, self.lon, self.zoom)
    }

    /// Rows needed: borders, centre, tile and URL.
    pub fn height(&self) -> u16 {
        5
    }

    pub fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let tile = self.tile();
        let lines = vec![
            Line::styled(format!("centre {:.4}°, {:.4}°  zoom {}", self.lat, self.lon, self.zoom), theme.text()),
            Line::styled(format!("tile {}/{}/{}", tile.zoom, tile.x, tile.y), theme.text()),
            Line::styled(tile.url(), theme.caption()),
        ];
        f.render_widget(Paragraph::new(lines).block(titled(&self.title, theme)), area);
    }
}

impl DashWidget for MapPanel {
    fn id(&self) -> &str {
        "map"
    }
}
