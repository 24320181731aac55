//! World Map Clock
//!
//! Shows the current time in a user-chosen list of zones, both as a list and
//! as labeled markers on a world map.

mod cities;
mod drawing;
mod layout;
mod projection;
mod ticker;
mod ui;
mod zones;

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use nannou::prelude::*;
use nannou_egui::{self, Egui};
use serde::{Deserialize, Serialize};
use shared::{format_live_time, FileStore, KeyValueStore, MemoryStore};
use tracing::{info, warn};

use crate::drawing::{colors, draw_map_base, draw_markers, MapView};
use crate::layout::{layout_labels, LabelLayoutConfig, MapLayout};
use crate::projection::{CanvasSize, Mercator, ProjectionConfig};
use crate::ticker::Ticker;
use crate::ui::{draw_popular_grid, draw_zone_panel, AddFieldState, ZonePanelResult};
use crate::zones::ZoneListStore;

const CLOCK_NAME: &str = "world_map";
const LEFT_PANEL_WIDTH: f32 = 300.0;
const BOTTOM_PANEL_HEIGHT: f32 = 110.0;
const TICK_INTERVAL: Duration = Duration::from_secs(1);

fn main() {
    if let Err(e) = tracing_subscriber::fmt::try_init() {
        eprintln!("world_map: logging disabled: {}", e);
    }
    nannou::app(model).update(update).exit(exit).run();
}

/// Persisted configuration
///
/// The zone list itself lives in the key/value store, not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct Config {
    hour12: bool,
    show_popular: bool,
    canvas: CanvasSize,
    projection: ProjectionConfig,
    layout: LabelLayoutConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hour12: false,
            show_popular: true,
            canvas: CanvasSize::default(),
            projection: ProjectionConfig::default(),
            layout: LabelLayoutConfig::default(),
        }
    }
}

/// Application state
struct Model {
    /// Tracked zones and the highlighted zone
    zones: ZoneListStore<Box<dyn KeyValueStore>>,
    /// Persisted settings
    config: Config,
    /// Projection for the configured canvas
    projection: Mercator,
    /// Instant the labels were last rendered for
    now: DateTime<Utc>,
    /// One-second refresh timer
    ticker: Ticker,
    /// Marker and label positions for the current zone list
    map_layout: MapLayout<Tz>,
    /// Where the map canvas sits in the window
    map_view: MapView,
    /// Add-zone field state
    add_field: AddFieldState,
    /// Scroll the highlighted zone into view on the next frame
    scroll_to_selected: bool,
    /// egui integration
    egui: Egui,
}

impl Model {
    /// Recompute marker and label positions
    fn refresh_layout(&mut self) {
        let now = self.now;
        let hour12 = self.config.hour12;
        self.map_layout = layout_labels(
            self.zones.zones(),
            |tz| tz.name(),
            &self.projection,
            self.config.canvas,
            &self.config.layout,
            |&tz| format_live_time(tz, now, hour12),
        );
    }

    fn add_from_input(&mut self, input: &str) {
        match self.zones.add_from_input(input) {
            Ok(_) => {
                self.add_field.accept();
                self.refresh_layout();
            }
            Err(e) => self.add_field.reject(e.to_string()),
        }
    }

    fn select(&mut self, tz: Tz) {
        self.zones.select(tz);
        self.scroll_to_selected = true;
    }

    /// Popular city click: highlight and track
    fn activate(&mut self, tz: Tz) {
        self.zones.activate(tz);
        self.scroll_to_selected = true;
        self.refresh_layout();
    }

    fn apply_zone_panel(&mut self, result: ZonePanelResult) {
        if let Some(input) = result.add_input {
            self.add_from_input(&input);
        }
        if let Some(tz) = result.remove_zone {
            if self.zones.remove_zone(tz) {
                self.refresh_layout();
            }
        }
        if let Some((from, to)) = result.reorder {
            if self.zones.reorder(from, to) {
                self.refresh_layout();
            }
        }
        if let Some(tz) = result.select_zone {
            self.select(tz);
        }
        if result.reset {
            self.zones.reset();
            self.refresh_layout();
        }
        if result.hour12_changed {
            save_config(&self.config);
            self.refresh_layout();
        }
    }
}

fn save_config(config: &Config) {
    if let Err(e) = shared::save_config(CLOCK_NAME, config) {
        warn!(error = %e, "failed to save config");
    }
}

fn load_config() -> Config {
    match shared::load_config(CLOCK_NAME) {
        Ok(Some(config)) => config,
        Ok(None) => Config::default(),
        Err(e) => {
            warn!(error = %e, "failed to load config, using defaults");
            Config::default()
        }
    }
}

fn open_storage() -> Box<dyn KeyValueStore> {
    match FileStore::open_default() {
        Ok(store) => {
            info!(path = %store.root().display(), "using zone storage");
            Box::new(store)
        }
        Err(e) => {
            warn!(error = %e, "no durable storage, zones will not be saved");
            Box::new(MemoryStore::new())
        }
    }
}

fn model(app: &App) -> Model {
    // Create window
    let window_id = app
        .new_window()
        .title("World Map Clock")
        .size(1280, 760)
        .min_size(960, 560)
        .view(view)
        .mouse_pressed(mouse_pressed)
        .raw_event(raw_window_event)
        .build()
        .unwrap();

    let window = app.window(window_id).unwrap();
    let egui = Egui::from_window(&window);

    let config = load_config();
    let zones = ZoneListStore::load(open_storage());
    let projection = Mercator::new(config.projection, config.canvas);
    let bottom = if config.show_popular { BOTTOM_PANEL_HEIGHT } else { 0.0 };
    let map_view = MapView::calculate(app.window_rect(), LEFT_PANEL_WIDTH, bottom, config.canvas);

    let mut ticker = Ticker::new(TICK_INTERVAL);
    ticker.start(Instant::now());

    let mut model = Model {
        zones,
        projection,
        now: Utc::now(),
        ticker,
        map_layout: MapLayout {
            labels: Vec::new(),
            config: config.layout,
        },
        map_view,
        add_field: AddFieldState::default(),
        scroll_to_selected: false,
        config,
        egui,
    };
    model.refresh_layout();
    model
}

fn update(app: &App, model: &mut Model, update: Update) {
    let bottom = if model.config.show_popular { BOTTOM_PANEL_HEIGHT } else { 0.0 };
    model.map_view =
        MapView::calculate(app.window_rect(), LEFT_PANEL_WIDTH, bottom, model.config.canvas);

    if model.ticker.poll(Instant::now()) {
        model.now = Utc::now();
        model.refresh_layout();
    }

    // Collect state for UI (before borrowing egui)
    let zones = model.zones.zones().to_vec();
    let selected = model.zones.selected();
    let now = model.now;
    let scroll_to_selected = model.scroll_to_selected;
    let show_popular = model.config.show_popular;
    let mut hour12 = model.config.hour12;

    // Begin egui frame
    model.egui.set_elapsed_time(update.since_start);
    let ctx = model.egui.begin_frame();

    let panel_result = draw_zone_panel(
        &ctx,
        &mut model.add_field,
        &zones,
        selected,
        scroll_to_selected,
        now,
        &mut hour12,
    );
    let popular_click = if show_popular {
        draw_popular_grid(&ctx, now, hour12)
    } else {
        None
    };

    drop(ctx);

    model.scroll_to_selected = false;
    model.config.hour12 = hour12;
    model.apply_zone_panel(panel_result);
    if let Some(tz) = popular_click {
        model.activate(tz);
    }
}

fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();

    draw.background().color(colors::BACKGROUND);

    draw_map_base(&draw, &model.map_view, model.config.canvas, &model.projection);
    draw_markers(&draw, &model.map_view, &model.map_layout, model.zones.selected());

    draw.to_frame(app, &frame).unwrap();

    // Render egui on top
    model.egui.draw_to_frame(&frame).unwrap();
}

fn mouse_pressed(app: &App, model: &mut Model, button: MouseButton) {
    if button != MouseButton::Left {
        return;
    }
    let position = app.mouse.position();
    if !model.map_view.contains(position) {
        return;
    }
    let (x, y) = model.map_view.to_canvas(position);
    if let Some(tz) = model.map_layout.label_at(x, y).map(|label| label.zone) {
        model.select(tz);
    }
}

fn raw_window_event(_app: &App, model: &mut Model, event: &nannou::winit::event::WindowEvent) {
    model.egui.handle_raw_event(event);
}

/// Stop the refresh timer and flush the zone list
fn exit(_app: &App, mut model: Model) {
    model.ticker.cancel();
    model.zones.flush();
    save_config(&model.config);
}
