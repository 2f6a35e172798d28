// ui.rs - Controls, the grid canvas and the pattern picker

use eframe::egui;
use egui::{Color32, ColorImage, Rect, TextureHandle, TextureOptions, Vec2};
use std::time::Instant;

use conway::{Color, ExtinctionPolicy, HaltReason, Palette, PixelBuffer, Present, Surface, TickOutcome};

use crate::LifeApp;

/// Visible surface: the off-screen buffer uploaded as one egui texture.
pub struct Screen {
    ctx: egui::Context,
    texture: Option<TextureHandle>,
}

impl Screen {
    pub fn new(ctx: egui::Context) -> Self {
        Self { ctx, texture: None }
    }
}

impl Present<PixelBuffer> for Screen {
    fn present(&mut self, offscreen: &PixelBuffer) {
        let image = ColorImage::from_rgba_unmultiplied(
            [offscreen.width(), offscreen.height()],
            offscreen.as_rgba(),
        );
        match &mut self.texture {
            Some(texture) => texture.set(image, TextureOptions::NEAREST),
            None => {
                self.texture = Some(self.ctx.load_texture("life-grid", image, TextureOptions::NEAREST));
            }
        }
    }
}

fn to_color32(color: Color) -> Color32 {
    let [r, g, b, a] = color.0;
    Color32::from_rgba_unmultiplied(r, g, b, a)
}

fn from_color32(color: Color32) -> Color {
    Color(color.to_array())
}

impl eframe::App for LifeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        if let Some(outcome) = self.sim.poll(now) {
            self.show_outcome(outcome);
        }

        egui::TopBottomPanel::bottom("controls").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                if ui.button("▶ Start").clicked() {
                    self.status = None;
                    self.sim.start(now);
                }
                if ui.button("⏸ Stop").clicked() {
                    self.sim.stop();
                }
                if ui.button("⏹ Reset").clicked() {
                    self.reset();
                }
                if ui.button("Step").clicked() {
                    let outcome = self.sim.step_once();
                    self.show_outcome(outcome);
                }

                ui.separator();

                let mut rate = self.sim.tick_rate();
                if ui.add(egui::Slider::new(&mut rate, 0.0..=60.0).suffix(" TPS")).changed() {
                    self.sim.set_tick_rate(rate, now);
                }

                ui.separator();

                if ui.button("Load Patterns").clicked() {
                    self.open_pattern_picker();
                }
                if let Some(name) = &self.loaded_pattern {
                    ui.label(name.as_str());
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(format!("Generation: {}", self.sim.generation()));
                });
            });

            ui.horizontal(|ui| {
                let mut halt = self.sim.config().extinction == ExtinctionPolicy::Halt;
                if ui.checkbox(&mut halt, "Stop when empty").changed() {
                    self.sim.set_extinction_policy(if halt {
                        ExtinctionPolicy::Halt
                    } else {
                        ExtinctionPolicy::KeepTicking
                    });
                }

                ui.label("Cycle check:");
                let mut window = self.sim.config().cycle_window;
                if ui.add(egui::DragValue::new(&mut window).clamp_range(0..=64)).changed() {
                    self.sim.set_cycle_window(window);
                }

                ui.separator();

                // Show current colors
                let palette = self.sim.config().palette;
                let mut live = to_color32(palette.live);
                let mut dead = to_color32(palette.dead);
                ui.label("Live:");
                let live_changed = ui.color_edit_button_srgba(&mut live).changed();
                ui.label("Dead:");
                let dead_changed = ui.color_edit_button_srgba(&mut dead).changed();
                if live_changed || dead_changed {
                    self.sim.set_palette(Palette { live: from_color32(live), dead: from_color32(dead) });
                }

                ui.separator();

                ui.label("Save to:");
                ui.text_edit_singleline(&mut self.save_path);
                if ui.button("💾 Save").clicked() {
                    self.save_pattern();
                }
            });

            // Statistics
            ui.horizontal(|ui| {
                let grid = self.sim.grid();
                let total = grid.rows() * grid.cols();
                let live_cells = grid.live_count();
                ui.label(format!("{}x{}", grid.rows(), grid.cols()));
                ui.label(format!("Live cells: {live_cells}"));
                ui.label(format!("Population: {:.1}%", live_cells as f32 / total as f32 * 100.0));
                if let Some(status) = &self.status {
                    ui.separator();
                    ui.label(status.as_str());
                }
            });
            ui.add_space(4.0);
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(Color32::BLACK))
            .show(ctx, |ui| {
                let available = ui.available_size();
                let cell = self.sim.renderer().cell_size as f32;
                if self.fit_to_window && available.x >= cell && available.y >= cell {
                    if let Err(e) = self.sim.fit_to_viewport(available.x, available.y) {
                        log::warn!("cannot fit grid to {available:?}: {e}");
                    }
                }
                if let Some(name) = self.pending_pattern.take() {
                    self.load_named(&name);
                }

                self.sim.render(&mut self.screen);

                let buffer = self.sim.offscreen();
                let size = Vec2::new(buffer.width() as f32, buffer.height() as f32);
                let (response, painter) = ui.allocate_painter(size, egui::Sense::click());

                if let Some(texture) = &self.screen.texture {
                    let uv = Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                    painter.image(texture.id(), response.rect, uv, Color32::WHITE);
                }

                if response.clicked() {
                    if let Some(pos) = response.interact_pointer_pos() {
                        let local = pos - response.rect.min;
                        if let Some((row, col)) = self.sim.cell_at(local.x, local.y) {
                            self.sim.toggle(row, col);
                        }
                    }
                }
            });

        if self.show_patterns {
            self.pattern_window(ctx);
        }

        // Keep frames coming while ticks are scheduled
        if let Some(wait) = self.sim.time_until_tick(Instant::now()) {
            ctx.request_repaint_after(wait);
        }
    }
}

impl LifeApp {
    fn show_outcome(&mut self, outcome: TickOutcome) {
        let TickOutcome::Halted(reason) = outcome else {
            return;
        };
        let generation = self.sim.generation();
        self.status = Some(match reason {
            HaltReason::Extinct => format!("All cells dead, stopped at generation {generation}"),
            HaltReason::Cycle => format!("Pattern repeats at generation {generation}"),
        });
    }

    fn pattern_window(&mut self, ctx: &egui::Context) {
        let mut open = true;
        let mut load = false;
        let mut source_changed = false;

        egui::Window::new("Select a Pattern")
            .collapsible(false)
            .open(&mut open)
            .show(ctx, |ui| {
                if self.sources.len() > 1 {
                    let current = self.selected_source;
                    egui::ComboBox::from_id_source("pattern_source")
                        .selected_text(self.sources[current].label())
                        .show_ui(ui, |ui| {
                            for (i, source) in self.sources.iter().enumerate() {
                                ui.selectable_value(&mut self.selected_source, i, source.label());
                            }
                        });
                    source_changed = self.selected_source != current;
                    ui.separator();
                }

                let mut clicked = None;
                egui::ScrollArea::vertical().max_height(400.0).show(ui, |ui| {
                    egui::Grid::new("pattern_names").num_columns(4).show(ui, |ui| {
                        for (i, name) in self.pattern_names.iter().enumerate() {
                            let selected = self.selected_pattern.as_deref() == Some(name.as_str());
                            if ui.selectable_label(selected, name.as_str()).clicked() {
                                clicked = Some(name.clone());
                            }
                            if i % 4 == 3 {
                                ui.end_row();
                            }
                        }
                    });
                });
                if clicked.is_some() {
                    self.selected_pattern = clicked;
                }

                ui.separator();
                ui.horizontal(|ui| {
                    load = ui.button("Load").clicked();
                    if ui.button("Close").clicked() {
                        self.show_patterns = false;
                    }
                });
            });

        if source_changed {
            self.selected_pattern = None;
            self.refresh_pattern_names();
        }
        if load {
            self.load_selected_pattern();
        }
        if !open {
            self.show_patterns = false;
        }
    }
}
