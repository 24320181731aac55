//! UI module - egui zone list panel and popular city grid
//!
//! Panels only report what the user did; `main.rs` applies the results to
//! the zone store after the egui frame ends.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use nannou_egui::egui;
use shared::{compute_zone_time_at, format_live_time, local_clock_at};

use crate::cities::{display_name, popular_zones, suggest};

const MAX_SUGGESTIONS: usize = 8;

/// State of the add-zone text field
#[derive(Default)]
pub struct AddFieldState {
    /// Current input text
    pub input: String,
    /// Rejection message from the last add attempt
    pub error: Option<String>,
    /// Completion candidates for `input`
    pub suggestions: Vec<&'static str>,
}

impl AddFieldState {
    pub fn update_suggestions(&mut self) {
        self.suggestions = if self.input.trim().is_empty() {
            Vec::new()
        } else {
            suggest(&self.input, MAX_SUGGESTIONS)
        };
    }

    /// Clear the field after a successful add
    pub fn accept(&mut self) {
        self.input.clear();
        self.error = None;
        self.suggestions.clear();
    }

    pub fn reject(&mut self, message: String) {
        self.error = Some(message);
    }
}

/// Result of zone panel interactions
#[derive(Default)]
pub struct ZonePanelResult {
    /// Text submitted from the add field
    pub add_input: Option<String>,
    /// Zone whose remove button was clicked
    pub remove_zone: Option<Tz>,
    /// Move a zone from one index to another
    pub reorder: Option<(usize, usize)>,
    /// Zone row clicked
    pub select_zone: Option<Tz>,
    /// Reset to the default list
    pub reset: bool,
    /// 12/24 hour toggle changed
    pub hour12_changed: bool,
}

/// Draw the zone list panel (left side)
pub fn draw_zone_panel(
    ctx: &egui::Context,
    add_field: &mut AddFieldState,
    zones: &[Tz],
    selected: Option<Tz>,
    scroll_to_selected: bool,
    now: DateTime<Utc>,
    hour12: &mut bool,
) -> ZonePanelResult {
    let mut result = ZonePanelResult::default();

    egui::SidePanel::left("zone_panel")
        .resizable(false)
        .exact_width(crate::LEFT_PANEL_WIDTH)
        .show(ctx, |ui| {
            ui.add_space(10.0);
            ui.heading("World Clock");
            ui.add_space(6.0);

            // Local clock
            let local = local_clock_at(now);
            ui.label(
                egui::RichText::new(&local.time)
                    .size(32.0)
                    .monospace()
                    .color(egui::Color32::from_rgb(230, 232, 235)),
            );
            ui.label(
                egui::RichText::new(format!("{}  {}", local.date, local.weekday))
                    .size(12.0)
                    .color(egui::Color32::from_rgb(160, 165, 175)),
            );
            ui.add_space(10.0);

            // Add field
            ui.horizontal(|ui| {
                let response = ui.add(
                    egui::TextEdit::singleline(&mut add_field.input)
                        .hint_text("City name or time zone")
                        .desired_width(180.0),
                );
                if response.changed() {
                    add_field.error = None;
                    add_field.update_suggestions();
                }
                let submitted =
                    response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if ui.button("Add").clicked() || submitted {
                    result.add_input = Some(add_field.input.clone());
                }
            });

            if let Some(error) = &add_field.error {
                ui.colored_label(egui::Color32::from_rgb(239, 68, 68), error);
            }

            // Suggestions
            if !add_field.suggestions.is_empty() {
                ui.add_space(4.0);
                for &candidate in &add_field.suggestions {
                    if ui.selectable_label(false, candidate).clicked() {
                        result.add_input = Some(candidate.to_string());
                    }
                }
            }

            ui.add_space(10.0);
            ui.separator();
            ui.add_space(6.0);

            ui.label(
                egui::RichText::new(format!("Tracked Zones ({})", zones.len()))
                    .size(12.0)
                    .color(egui::Color32::from_rgb(160, 165, 175)),
            );
            ui.add_space(5.0);

            egui::ScrollArea::vertical()
                .max_height(420.0)
                .show(ui, |ui| {
                    for (index, &tz) in zones.iter().enumerate() {
                        let is_selected = selected == Some(tz);
                        let zone_time = compute_zone_time_at(tz, now);

                        let row = ui.horizontal(|ui| {
                            // Reorder buttons
                            ui.vertical(|ui| {
                                if ui
                                    .add_enabled(index > 0, egui::Button::new("▲").small())
                                    .clicked()
                                {
                                    result.reorder = Some((index, index - 1));
                                }
                                if ui
                                    .add_enabled(index + 1 < zones.len(), egui::Button::new("▼").small())
                                    .clicked()
                                {
                                    result.reorder = Some((index, index + 1));
                                }
                            });

                            ui.vertical(|ui| {
                                let name_color = if is_selected {
                                    egui::Color32::from_rgb(250, 204, 21)
                                } else {
                                    egui::Color32::from_rgb(230, 232, 235)
                                };
                                let name = ui.add(
                                    egui::Label::new(
                                        egui::RichText::new(display_name(tz.name())).color(name_color),
                                    )
                                    .sense(egui::Sense::click()),
                                );
                                if name.on_hover_text(tz.name()).clicked() {
                                    result.select_zone = Some(tz);
                                }

                                ui.label(
                                    egui::RichText::new(format!(
                                        "{}  {} {}",
                                        zone_time.format_time(*hour12),
                                        zone_time.tz_abbrev,
                                        zone_time.format_utc_offset()
                                    ))
                                    .size(11.0)
                                    .color(egui::Color32::from_rgb(140, 145, 155)),
                                );
                            });

                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                if ui.small_button("×").on_hover_text("Remove zone").clicked() {
                                    result.remove_zone = Some(tz);
                                }
                            });
                        });

                        if is_selected && scroll_to_selected {
                            row.response.scroll_to_me(Some(egui::Align::Center));
                        }

                        ui.add_space(4.0);
                    }
                });

            ui.add_space(10.0);
            ui.separator();
            ui.add_space(6.0);

            if ui.checkbox(hour12, "12-hour clock").changed() {
                result.hour12_changed = true;
            }
            if ui.button("Reset zones").clicked() {
                result.reset = true;
            }
        });

    result
}

/// Draw the popular city grid (bottom); returns the clicked zone
pub fn draw_popular_grid(ctx: &egui::Context, now: DateTime<Utc>, hour12: bool) -> Option<Tz> {
    let mut clicked = None;

    egui::TopBottomPanel::bottom("popular_panel")
        .resizable(false)
        .exact_height(crate::BOTTOM_PANEL_HEIGHT)
        .show(ctx, |ui| {
            ui.add_space(6.0);
            ui.label(
                egui::RichText::new("Popular Cities")
                    .size(12.0)
                    .color(egui::Color32::from_rgb(160, 165, 175)),
            );
            ui.horizontal_wrapped(|ui| {
                for tz in popular_zones() {
                    let text = format!(
                        "{}\n{}",
                        display_name(tz.name()),
                        format_live_time(tz, now, hour12)
                    );
                    if ui
                        .add(egui::Button::new(text).min_size(egui::vec2(96.0, 40.0)))
                        .clicked()
                    {
                        clicked = Some(tz);
                    }
                }
            });
        });

    clicked
}
