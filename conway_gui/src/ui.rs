// ui.rs - egui rendering and input for LifeApp

use std::num::NonZeroU64;
use std::time::Duration;

use eframe::egui;
use egui::{Color32, Pos2, Rect, Stroke, Vec2};

use conway::{Coord, Grid, PATTERNS};

use crate::LifeApp;

const BOX_SIZE: f32 = 14.0;
const SPACING: f32 = 0.5;

impl eframe::App for LifeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // The clock ticks on its own task; one snapshot per frame keeps the
        // drawing consistent even if a tick lands mid-frame.
        let grid = self.simulation.snapshot();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Conway's Game of Life");

            ui.horizontal(|ui| {
                let button_text = if self.simulation.is_running() {
                    "⏸ Pause"
                } else {
                    "▶ Start"
                };
                if ui.button(button_text).clicked() {
                    self.simulation.toggle_clock();
                }

                if ui.button("⏭ Step").clicked() {
                    self.simulation.step();
                }

                if ui.button("⏹ Clear").clicked() {
                    self.simulation.stop();
                    self.simulation.clear();
                }

                if ui.button("🎲 Random").clicked() {
                    self.simulation.stop();
                    self.random_seed = self.random_seed.wrapping_add(1);
                    self.simulation.randomize(self.random_seed);
                }

                ui.separator();

                ui.label("Pattern:");
                egui::ComboBox::from_id_source("pattern_selector")
                    .selected_text(PATTERNS[self.selected_pattern].name)
                    .show_ui(ui, |ui| {
                        for (i, pattern) in PATTERNS.iter().enumerate() {
                            ui.selectable_value(&mut self.selected_pattern, i, pattern.name);
                        }
                    });

                if ui.button("Apply Pattern").clicked() {
                    self.simulation.stop();
                    let pattern = &PATTERNS[self.selected_pattern];
                    if let Err(err) = self.simulation.apply_pattern(pattern) {
                        tracing::warn!(%err, pattern = pattern.name, "Pattern does not fit");
                    }
                }
            });

            ui.horizontal(|ui| {
                ui.label("Speed:");
                let mut speed = 1000.0 / self.simulation.interval().as_millis().max(1) as f32;
                if ui.add(egui::Slider::new(&mut speed, 0.5..=30.0).suffix(" gen/sec")).changed() {
                    let millis = (1000.0 / speed).round() as u64;
                    if let Some(interval) = NonZeroU64::new(millis) {
                        self.simulation.set_interval(interval);
                    }
                }

                ui.separator();

                ui.label("Live:");
                ui.color_edit_button_srgba(&mut self.live_color);
                ui.label("Dead:");
                ui.color_edit_button_srgba(&mut self.dead_color);
            });

            ui.separator();

            let status = if self.simulation.is_running() { "running" } else { "stopped" };
            ui.horizontal(|ui| {
                ui.label(format!("Clock: {status}"));
                ui.label(format!("Ticks: {}", self.simulation.ticks_elapsed()));
                if self.simulation.cycle_detected() {
                    ui.label("(repeating)");
                }
            });

            ui.separator();

            if let Some(coord) = self.draw_grid(ui, &grid) {
                if let Err(err) = self.simulation.toggle(coord) {
                    tracing::warn!(%err, "Ignoring click");
                }
            }

            ui.separator();

            let total = grid.height() * grid.width();
            let live_cells = grid.live_cells();
            ui.horizontal(|ui| {
                ui.label(format!("Live cells: {live_cells}"));
                ui.label(format!("Dead cells: {}", total - live_cells));
                ui.label(format!("Population: {:.1}%", live_cells as f32 / total as f32 * 100.0));
            });
        });

        if self.simulation.is_running() {
            let frame = self.simulation.interval().min(Duration::from_millis(100));
            ctx.request_repaint_after(frame);
        }
    }
}

impl LifeApp {
    /// Paint `grid`; returns the cell under a click, if any.
    fn draw_grid(&self, ui: &mut egui::Ui, grid: &Grid) -> Option<Coord> {
        let pitch = BOX_SIZE + SPACING;
        let total_size = Vec2::new(
            pitch * grid.width() as f32 - SPACING,
            pitch * grid.height() as f32 - SPACING,
        );

        let (response, painter) = ui.allocate_painter(total_size, egui::Sense::click());
        let origin = response.rect.min;

        painter.rect_filled(response.rect, 0.0, Color32::BLACK);

        for (row, cells) in grid.rows().enumerate() {
            for (col, &alive) in cells.iter().enumerate() {
                let top_left = origin + Vec2::new(col as f32 * pitch, row as f32 * pitch);
                let rect = Rect::from_min_size(top_left, Vec2::splat(BOX_SIZE));
                let color = if alive { self.live_color } else { self.dead_color };

                painter.rect_filled(rect, 1.0, color);
                painter.rect_stroke(rect, 1.0, Stroke::new(0.2, Color32::from_gray(60)));
            }
        }

        if !response.clicked() {
            return None;
        }
        let pos = response.interact_pointer_pos()?;
        cell_at(origin, pos, pitch)
    }
}

fn cell_at(origin: Pos2, pos: Pos2, pitch: f32) -> Option<Coord> {
    let offset = pos - origin;
    if offset.x < 0.0 || offset.y < 0.0 {
        return None;
    }
    let row = (offset.y / pitch) as usize;
    let col = (offset.x / pitch) as usize;
    Some(Coord::from((row, col)))
}
