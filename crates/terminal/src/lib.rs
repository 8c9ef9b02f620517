//! Terminal host for `dash`.
//!
//! Owns the terminal and the event loop, and wires together all background
//! tasks:
//! - Sampler task (one reading per tick, fresh derived view)
//! - Config file watcher (live reload on change)
//! - Terminal events (quit keys, resize)
//! - Ctrl-C (graceful shutdown)

use crossterm::event::{Event, EventStream, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use dash_config::{
    default_path, load as load_config, DashConfig, DashboardConfig, DatasetKind, Section,
};
use dash_core::dataset::{Dataset, FinchRecord, PenguinRecord};
use dash_core::widget::{validate_widgets, DashWidget};
use dash_core::{DashState, Message, Result};
use dash_renderer::{status_line, PageLayout, HEADER_HEIGHT};
use dash_sampler::{spawn_sampler, Sampler, Scheduler};
use dash_theme::Theme;
use dash_widgets::{
    titled, DataGrid, DatasetGrid, MapPanel, Sidebar, StaticPanel, TimestampBox, TrendChart,
    ValueBox,
};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::widgets::Paragraph;
use ratatui::{Frame, Terminal};
use std::io::{self, Stdout};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Environment variable that picks a dashboard by name, overriding `global.active`.
pub const DASHBOARD_ENV: &str = "DASH_DASHBOARD";

type Tui = Terminal<CrosstermBackend<Stdout>>;

// ── Entry point ───────────────────────────────────────────────────────────────

/// Start the dashboard.  Returns after `q`, Esc or Ctrl-C.
pub fn run() -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run_async())
}

async fn run_async() -> Result<()> {
    let path = default_path();
    let config = load_config(&path)?;
    let selected = std::env::var(DASHBOARD_ENV).ok();

    // Fails here, before the first tick, if any widget references a column
    // the reading schema does not have.
    let mut dash = Dashboard::new(config, selected, path.clone())?;
    info!(
        "Running dashboard '{}' every {}s, window of {}",
        dash.dashboard.name, dash.dashboard.interval_secs, dash.dashboard.capacity
    );

    let mut scheduler = Scheduler::new();
    let mut views = spawn_sampler(
        &mut scheduler,
        build_sampler(&dash.dashboard),
        Duration::from_secs(dash.dashboard.interval_secs),
    )?;
    let (_watcher, mut reloads) = dash_config::ConfigWatcher::spawn(&path);

    let mut terminal = enter_terminal()?;
    let result = event_loop(&mut terminal, &mut dash, &mut views, &mut reloads).await;

    // Always restore the terminal, even if the loop returned an error.
    let _ = std::panic::take_hook();
    restore_terminal(&mut terminal)?;

    scheduler.shutdown();
    info!("dash stopped");
    result
}

async fn event_loop(
    terminal: &mut Tui,
    dash: &mut Dashboard,
    views: &mut mpsc::Receiver<Message>,
    reloads: &mut mpsc::Receiver<()>,
) -> Result<()> {
    let mut events = EventStream::new();
    terminal.draw(|f| dash.render(f))?;

    loop {
        let msg = tokio::select! {
            Some(msg) = views.recv() => msg,
            Some(()) = reloads.recv() => Message::ConfigReloaded,
            Some(event) = events.next() => match event {
                Ok(event) => match terminal_message(&event) {
                    Some(msg) => msg,
                    None => continue,
                },
                Err(e) => {
                    warn!("Terminal event error: {e}");
                    continue;
                }
            },
            _ = tokio::signal::ctrl_c() => Message::Shutdown,
        };

        if !dash.update(msg) {
            return Ok(());
        }
        terminal.draw(|f| dash.render(f))?;
    }
}

/// Raw mode plus the alternate screen, with a panic hook that undoes both.
fn enter_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, crossterm::cursor::Show);
        original_hook(info);
    }));
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, crossterm::cursor::Show)?;
    Ok(())
}

/// Map a terminal event to a message; most events are ignored.
///
/// Raw mode swallows the SIGINT, so Ctrl-C arrives here as a key.
pub fn terminal_message(event: &Event) -> Option<Message> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(Message::Shutdown),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Message::Shutdown),
            _ => None,
        },
        Event::Resize(..) => Some(Message::Redraw),
        _ => None,
    }
}

/// Sampler for `cfg`: uniform values on the system clock.
pub fn build_sampler(cfg: &DashboardConfig) -> Sampler {
    Sampler::uniform(cfg.capacity, cfg.schema.clone(), cfg.min, cfg.max, cfg.seed)
        .with_decimals(cfg.decimals)
}

fn config_dir(path: &Path) -> PathBuf {
    path.parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

// ── State ─────────────────────────────────────────────────────────────────────

/// The running dashboard: state, configuration and every consumer.
#[derive(Debug)]
pub struct Dashboard {
    state:       DashState,
    dashboard:   DashboardConfig,
    /// Name override from the environment, kept for reloads.
    selected:    Option<String>,
    config_path: PathBuf,
    theme:       Theme,
    layout:      PageLayout,
    // Consumers
    sidebar:     Sidebar,
    value:       ValueBox,
    timestamp:   TimestampBox,
    grid:        DataGrid,
    chart:       TrendChart,
    map:         Option<MapPanel>,
    dataset:     Option<Box<dyn StaticPanel>>,
}

impl Dashboard {
    /// Build every consumer from `config` and validate them against the
    /// reading schema. `config_path` is re-read on reload; relative dataset
    /// paths resolve against its directory.
    pub fn new(config: DashConfig, selected: Option<String>, config_path: PathBuf) -> Result<Self> {
        let dashboard = config.active_dashboard(selected.as_deref())?.clone();

        let sidebar   = Sidebar::from_config(&dashboard.sidebar);
        let value     = ValueBox::from_config(&dashboard);
        let timestamp = TimestampBox::new();
        let grid      = DataGrid::from_config(&dashboard);
        let chart     = TrendChart::from_config(&dashboard);
        let map       = dashboard.map.as_ref().map(MapPanel::from_config);

        let mut widgets: Vec<&dyn DashWidget> = vec![&sidebar, &value, &timestamp, &grid, &chart];
        if let Some(map) = &map {
            widgets.push(map);
        }
        validate_widgets(&dashboard.schema, &widgets)?;

        let dataset = match &config.dataset {
            Some(cfg) => {
                let path = config_dir(&config_path).join(&cfg.path);
                let panel: Box<dyn StaticPanel> = match cfg.kind {
                    DatasetKind::Penguins => Box::new(DatasetGrid::new(
                        &cfg.title,
                        Dataset::<PenguinRecord>::load(&path)?,
                        &cfg.filter_column,
                        cfg.include.clone(),
                        cfg.max_rows,
                    )),
                    DatasetKind::Finches => Box::new(DatasetGrid::new(
                        &cfg.title,
                        Dataset::<FinchRecord>::load(&path)?,
                        &cfg.filter_column,
                        cfg.include.clone(),
                        cfg.max_rows,
                    )),
                };
                panel.validate()?;
                Some(panel)
            }
            None => None,
        };

        Ok(Self {
            state: DashState::default(),
            theme: Theme::from_config(&config.theme),
            layout: PageLayout::from_config(&config, &dashboard),
            dashboard,
            selected,
            config_path,
            sidebar,
            value,
            timestamp,
            grid,
            chart,
            map,
            dataset,
        })
    }

    pub fn state(&self) -> &DashState {
        &self.state
    }

    pub fn dashboard(&self) -> &DashboardConfig {
        &self.dashboard
    }

    // ── Update ────────────────────────────────────────────────────────────────

    /// Apply one event. Returns `false` when the loop should stop.
    pub fn update(&mut self, msg: Message) -> bool {
        match msg {
            Message::ViewUpdated(view) => {
                self.state.apply_view(view);
            }
            Message::TickFailed(reason) => {
                self.state.record_failure(reason);
            }
            Message::ConfigReloaded => match dash_config::reload(&self.config_path) {
                Ok(Some(cfg)) => self.reload_from(cfg),
                Ok(None) => info!(
                    "Config file '{}' is gone; keeping current settings",
                    self.config_path.display()
                ),
                Err(e) => warn!("Config reload failed: {e}"),
            },
            Message::Redraw => {}
            Message::Shutdown => return false,
        }
        true
    }

    /// Swap in display settings from `config`, keeping the live state.
    ///
    /// Sampling settings (interval, capacity, range) belong to the running
    /// sampler task and only take effect after a restart. A changed reading
    /// schema is refused outright: the sampler keeps producing the old
    /// columns, so widgets checked against the new ones would find nothing.
    pub fn reload_from(&mut self, config: DashConfig) {
        let next = match Self::new(config, self.selected.clone(), self.config_path.clone()) {
            Ok(next) => next,
            Err(e) => {
                warn!("Config reload rejected, keeping current settings: {e}");
                return;
            }
        };

        if next.dashboard.name != self.dashboard.name {
            warn!(
                "Active dashboard changed to '{}'; restart to switch",
                next.dashboard.name
            );
            return;
        }
        if next.dashboard.schema != self.dashboard.schema {
            warn!("Reading schema changed; restart to apply, keeping current settings");
            return;
        }
        if sampling_changed(&self.dashboard, &next.dashboard) {
            warn!("Sampling settings changed; they apply after a restart");
        }

        let state = std::mem::take(&mut self.state);
        *self = Self { state, ..next };
        info!("Config reloaded");
    }

    // ── View ──────────────────────────────────────────────────────────────────

    /// Draw the full page for the current state.
    pub fn render(&self, f: &mut Frame) {
        let (state, theme) = (&self.state, &self.theme);
        let areas = self.layout.split(f.area(), |section| self.height(section));

        let status = status_line(state, self.dashboard.interval_secs, theme);
        f.render_widget(
            Paragraph::new(status).block(titled(&self.dashboard.title, theme)),
            areas.header,
        );

        for (section, area) in areas.sections {
            match section {
                Section::Sidebar   => self.sidebar.render(f, area, theme),
                Section::ValueBox  => self.value.render(f, area, state, theme),
                Section::Timestamp => self.timestamp.render(f, area, state, theme),
                Section::Grid      => self.grid.render(f, area, state, theme),
                Section::Chart     => self.chart.render(f, area, state, theme),
                Section::Map => {
                    if let Some(map) = &self.map {
                        map.render(f, area, theme);
                    }
                }
                Section::Dataset => {
                    if let Some(panel) = &self.dataset {
                        panel.render(f, area, theme);
                    }
                }
            }
        }
    }

    /// Rows `section` asks for in the main column.
    fn height(&self, section: Section) -> u16 {
        match section {
            Section::Sidebar   => 0,
            Section::ValueBox  => self.value.height(),
            Section::Timestamp => self.timestamp.height(),
            Section::Grid      => self.grid.height(),
            Section::Chart     => self.chart.height(),
            Section::Map       => self.map.as_ref().map_or(0, MapPanel::height),
            Section::Dataset   => self.dataset.as_ref().map_or(0, |panel| panel.height()),
        }
    }

    /// Rows the whole page needs to show every section at full height.
    pub fn page_height(&self) -> u16 {
        self.layout
            .sections
            .iter()
            .map(|section| self.height(*section))
            .fold(HEADER_HEIGHT, u16::saturating_add)
    }
}

fn sampling_changed(old: &DashboardConfig, new: &DashboardConfig) -> bool {
    old.interval_secs != new.interval_secs
        || old.capacity != new.capacity
        || old.min != new.min
        || old.max != new.max
        || old.decimals != new.decimals
        || old.seed != new.seed
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;
    use crossterm::event::{KeyEvent, KeyEventState};
    use dash_config::ThemeConfig;
    use dash_core::DashError;
    use dash_sampler::{ReplaySource, SteppingClock};
    use ratatui::backend::TestBackend;

    fn plain_config() -> DashConfig {
        DashConfig {
            theme: ThemeConfig { color: false, ..ThemeConfig::default() },
            ..DashConfig::default()
        }
    }

    fn dashboard() -> Dashboard {
        Dashboard::new(plain_config(), None, PathBuf::from("dash.toml")).unwrap()
    }

    fn scripted_sampler(cfg: &DashboardConfig, values: &[f64]) -> Sampler {
        let clock = SteppingClock::starting_at("2024-06-01 09:00:00", ChronoDuration::seconds(1)).unwrap();
        Sampler::new(cfg.capacity, cfg.schema.clone(), ReplaySource::new(values.to_vec()), clock)
    }

    /// Draw `dash` on a 120-column test terminal tall enough for every
    /// section and return the screen as text.
    fn screen(dash: &Dashboard) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, dash.page_height())).unwrap();
        terminal.draw(|f| dash.render(f)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(usize::from(buffer.area.width))
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>().trim_end().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind:  KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn first_render_shows_placeholders() {
        let page = screen(&dashboard());
        assert!(page.contains("Darwin's Finches"));
        assert!(page.contains("tick 0 · every 5s"));
        assert!(page.contains("no data yet"));
        assert!(page.contains("Galapagos Islands"));
    }

    #[test]
    fn stale_column_name_fails_at_startup() {
        let mut config = plain_config();
        config.dashboards[0].chart.y = "beak depth".to_string();
        let err = Dashboard::new(config, None, PathBuf::from("dash.toml")).unwrap_err();
        match err {
            DashError::SchemaMismatch { consumer, column, .. } => {
                assert_eq!(consumer, "trend_chart");
                assert_eq!(column, "beak depth");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn grid_column_typo_fails_at_startup() {
        let mut config = plain_config();
        config.dashboards[0].grid.columns = vec!["beak".into(), "timestamp".into()];
        assert!(matches!(
            Dashboard::new(config, None, PathBuf::from("dash.toml")),
            Err(DashError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn selected_dashboard_overrides_active() {
        let dash = Dashboard::new(plain_config(), Some("penguin".into()), PathBuf::from("dash.toml")).unwrap();
        assert_eq!(dash.dashboard().unit, "°C");
        assert!(screen(&dash).contains("Antarctic Penguins"));
    }

    #[test]
    fn missing_dataset_file_fails_at_startup() {
        let mut config = plain_config();
        config.dataset = Some(dash_config::DatasetConfig {
            title:         "Palmer Penguins".into(),
            path:          "does-not-exist.json".into(),
            kind:          DatasetKind::Penguins,
            filter_column: "species".into(),
            include:       vec!["Adelie".into()],
            max_rows:      5,
        });
        let err = Dashboard::new(config, None, std::env::temp_dir().join("dash.toml")).unwrap_err();
        assert!(matches!(err, DashError::Dataset(_)));
    }

    #[test]
    fn demo_config_loads_with_dataset() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/dash.toml");
        let config = load_config(&path).unwrap();
        let dash = Dashboard::new(config, None, path).unwrap();

        assert_eq!(dash.dashboard().name, "penguin");
        let page = screen(&dash);
        assert!(page.contains("Palmer Penguins"));
        assert!(page.contains("8 of 10 rows where species in [Adelie, Gentoo]"));
    }

    #[test]
    fn updates_apply_views_and_failures() {
        let mut dash = dashboard();
        let mut sampler = scripted_sampler(dash.dashboard(), &[5.1, 6.2]);

        assert!(dash.update(Message::ViewUpdated(sampler.tick().unwrap())));
        assert!(dash.update(Message::TickFailed("clock error: gone".into())));
        assert_eq!(dash.state().failed_ticks, 1);
        assert!(screen(&dash).contains("last tick failed: clock error: gone"));

        assert!(dash.update(Message::ViewUpdated(sampler.tick().unwrap())));
        assert!(dash.state().last_error.is_none());
        assert!(dash.update(Message::Redraw));
        assert!(!dash.update(Message::Shutdown));
    }

    #[test]
    fn quit_keys_and_resize_map_to_messages() {
        let none = KeyModifiers::NONE;
        assert!(matches!(terminal_message(&key(KeyCode::Char('q'), none)), Some(Message::Shutdown)));
        assert!(matches!(terminal_message(&key(KeyCode::Esc, none)), Some(Message::Shutdown)));
        assert!(matches!(
            terminal_message(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Message::Shutdown)
        ));
        assert!(terminal_message(&key(KeyCode::Char('c'), none)).is_none());
        assert!(matches!(terminal_message(&Event::Resize(80, 24)), Some(Message::Redraw)));
        assert!(terminal_message(&Event::FocusGained).is_none());
    }

    #[test]
    fn reload_keeps_state_and_applies_labels() {
        let mut dash = dashboard();
        let mut sampler = scripted_sampler(dash.dashboard(), &[9.5]);
        dash.update(Message::ViewUpdated(sampler.tick().unwrap()));

        let mut config = plain_config();
        config.dashboards[0].title = "Finch Watch".into();
        config.dashboards[0].unit = "millimetres".into();
        dash.reload_from(config);

        let page = screen(&dash);
        assert!(page.contains("Finch Watch"));
        assert!(page.contains("9.5 millimetres"));
        assert_eq!(dash.state().view().unwrap().tick, 1);
    }

    #[test]
    fn invalid_reload_is_rejected() {
        let mut dash = dashboard();
        let mut config = plain_config();
        config.dashboards[0].chart.x = "time".into();
        dash.reload_from(config);
        assert_eq!(dash.chart.referenced_columns(), vec!["timestamp", "beak_depth"]);
    }

    #[test]
    fn schema_change_on_reload_is_rejected() {
        let mut dash = dashboard();
        let mut sampler = scripted_sampler(dash.dashboard(), &[5.1, 6.2, 7.3]);
        for _ in 0..3 {
            dash.update(Message::ViewUpdated(sampler.tick().unwrap()));
        }

        // Self-consistent on its own, but the running sampler still emits
        // `beak_depth`.
        let mut config = plain_config();
        config.dashboards[0].schema.value = "depth".into();
        config.dashboards[0].chart.y = "depth".into();
        config.dashboards[0].title = "Renamed".into();
        dash.reload_from(config);

        assert_eq!(dash.dashboard().schema.value, "beak_depth");
        assert_eq!(dash.dashboard().title, "Darwin's Finches");
        let model = dash.chart.model(dash.state()).unwrap();
        assert_eq!(model.points, vec![5.1, 6.2, 7.3]);
        assert!(model.trend.is_some());
        assert!(screen(&dash).contains("best fit: slope +1.100/sample"));
    }

    #[test]
    fn reload_with_missing_file_keeps_current_settings() {
        let path = std::env::temp_dir()
            .join(format!("dash-missing-{}", std::process::id()))
            .join("dash.toml");
        let mut dash = Dashboard::new(plain_config(), None, path).unwrap();

        let mut config = plain_config();
        config.dashboards[0].title = "Finch Watch".into();
        dash.reload_from(config);

        // The file is not there: settings stay as they are instead of
        // reverting to the built-in defaults.
        assert!(dash.update(Message::ConfigReloaded));
        assert_eq!(dash.dashboard().title, "Finch Watch");
    }

    #[tokio::test(start_paused = true)]
    async fn seven_ticks_end_to_end() {
        let mut dash = dashboard();
        let cfg = dash.dashboard().clone();
        let mut scheduler = Scheduler::new();
        let mut rx = spawn_sampler(
            &mut scheduler,
            scripted_sampler(&cfg, &[5.1, 6.2, 7.3, 8.4, 9.5, 10.6, 11.7]),
            Duration::from_secs(cfg.interval_secs),
        )
        .unwrap();

        for _ in 0..7 {
            let msg = rx.recv().await.unwrap();
            assert!(dash.update(msg));
        }

        let view = dash.state().view().unwrap();
        assert_eq!(view.values(), vec![7.3, 8.4, 9.5, 10.6, 11.7]);
        assert_eq!(view.latest.value(), 11.7);

        let page = screen(&dash);
        assert!(page.contains("11.7 mm"));
        assert!(page.contains("best_fit_line"));
        assert!(page.contains("tick 7 · every 5s · 5 sample(s)"));
    }
}
