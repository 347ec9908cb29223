//! Main application state and UI.

use std::path::PathBuf;
use std::time::Instant;

use chrono::NaiveDate;
use eframe::egui::{self, Pos2, Stroke, Vec2};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, Plot};

use crate::core::{DashboardCore, MindState, MindStateDistribution};
use crate::data::{self, LoadReport};
use crate::layout::{ForceLayout, LayoutState};
use crate::settings::Settings;
use crate::theme;

/// Main dashboard application
pub struct DashboardApp {
    // Data pipeline
    core: Option<DashboardCore>,
    load_error: Option<String>,
    load_report: Option<LoadReport>,
    data_dir: PathBuf,

    // Layout
    layout: ForceLayout,
    view: LayoutState,

    // Range slider state: indices into the sorted union of known dates
    slider_dates: Vec<NaiveDate>,
    start_ix: usize,
    end_ix: usize,

    // Viewport state
    pan_offset: Vec2,
    zoom: f32,
    hovered_word: Option<String>,
    dragged_word: Option<String>,

    // Display
    node_size: f32,
    show_labels: bool,
    physics_enabled: bool,

    // Settings persistence
    settings: Settings,
    settings_dirty: bool,
    last_settings_save: Instant,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, data_dir: Option<PathBuf>) -> Self {
        let settings = Settings::load();

        let layout = ForceLayout {
            repulsion: settings.repulsion,
            attraction: settings.attraction,
            centering: settings.centering,
            ..ForceLayout::default()
        };

        let mut app = Self {
            core: None,
            load_error: None,
            load_report: None,
            data_dir: data_dir.unwrap_or_else(|| settings.data_dir.clone()),
            layout,
            view: LayoutState::default(),
            slider_dates: Vec::new(),
            start_ix: 0,
            end_ix: 0,
            pan_offset: Vec2::ZERO,
            zoom: 1.0,
            hovered_word: None,
            dragged_word: None,
            node_size: settings.node_size,
            show_labels: settings.show_labels,
            physics_enabled: settings.physics_enabled,
            settings,
            settings_dirty: false,
            last_settings_save: Instant::now(),
        };
        app.load_data();
        app
    }

    /// (Re)load both tables and rebuild everything derived from them.
    /// Any load failure aborts: the app shows the error with no partial data.
    fn load_data(&mut self) {
        match data::load_dir(&self.data_dir) {
            Ok(loaded) => {
                let core = DashboardCore::new(loaded.store);
                self.slider_dates = core.store().known_dates();
                self.start_ix = 0;
                self.end_ix = self.slider_dates.len().saturating_sub(1);
                self.view.sync(core.graph());
                self.load_report = Some(loaded.report);
                self.load_error = None;
                self.core = Some(core);
            }
            Err(err) => {
                tracing::warn!("load failed: {err}");
                self.load_error = Some(err.to_string());
                self.load_report = None;
                self.core = None;
            }
        }
    }

    /// Mark settings as needing to be saved
    fn mark_settings_dirty(&mut self) {
        self.settings_dirty = true;
    }

    /// Copy current UI state to settings struct
    fn sync_settings_from_ui(&mut self) {
        self.settings.data_dir = self.data_dir.clone();
        self.settings.node_size = self.node_size;
        self.settings.show_labels = self.show_labels;
        self.settings.physics_enabled = self.physics_enabled;
        self.settings.repulsion = self.layout.repulsion;
        self.settings.attraction = self.layout.attraction;
        self.settings.centering = self.layout.centering;
    }

    /// Save settings if dirty and enough time has passed (debounce)
    fn maybe_save_settings(&mut self) {
        if self.settings_dirty && self.last_settings_save.elapsed().as_secs() >= 2 {
            self.sync_settings_from_ui();
            self.settings.save();
            self.settings_dirty = false;
            self.last_settings_save = Instant::now();
        }
    }

    /// Push the slider positions into the core. A rejected edit (inverted
    /// boundary) leaves the range as it was and snaps the sliders back.
    fn apply_range_edit(&mut self) {
        let Some(core) = &mut self.core else {
            return;
        };
        if self.slider_dates.is_empty() {
            return;
        }

        let start = self.slider_dates[self.start_ix];
        let end = self.slider_dates[self.end_ix];
        match core.set_range(start, end) {
            Ok(()) => self.view.sync(core.graph()),
            Err(err) => {
                tracing::warn!("range edit rejected: {err}");
                self.start_ix = nearest_date_index(&self.slider_dates, core.range().start());
                self.end_ix = nearest_date_index(&self.slider_dates, core.range().end());
            }
        }
    }

    fn render_top_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("MindGraph");
            ui.separator();

            let day_count = self.slider_dates.len();
            if day_count > 1 {
                let max_ix = day_count - 1;
                let mut changed = false;

                ui.label("From");
                let start_date = self.slider_dates[self.start_ix];
                changed |= ui
                    .add(
                        egui::Slider::new(&mut self.start_ix, 0..=max_ix)
                            .show_value(false)
                            .text(start_date.format("%Y-%m-%d").to_string()),
                    )
                    .changed();

                ui.label("to");
                let end_date = self.slider_dates[self.end_ix];
                changed |= ui
                    .add(
                        egui::Slider::new(&mut self.end_ix, 0..=max_ix)
                            .show_value(false)
                            .text(end_date.format("%Y-%m-%d").to_string()),
                    )
                    .changed();

                if changed {
                    self.apply_range_edit();
                }
            }

            ui.separator();
            if ui.button("Reload").clicked() {
                self.load_data();
            }

            if let Some(report) = &self.load_report {
                ui.label(
                    egui::RichText::new(format!(
                        "{} occurrences, {} day stats ({} ms)",
                        report.occurrence_rows, report.day_stat_rows, report.load_time_ms
                    ))
                    .color(theme::text::MUTED),
                );
            }
        });
    }

    fn render_controls(&mut self, ui: &mut egui::Ui) {
        ui.heading("Display");
        if ui
            .add(egui::Slider::new(&mut self.node_size, 4.0..=24.0).text("Node size"))
            .changed()
        {
            self.mark_settings_dirty();
        }
        if ui.checkbox(&mut self.show_labels, "Labels").changed() {
            self.mark_settings_dirty();
        }

        ui.add_space(8.0);
        ui.heading("Physics");
        if ui.checkbox(&mut self.physics_enabled, "Enabled").changed() {
            self.mark_settings_dirty();
        }
        let mut changed = false;
        changed |= ui
            .add(egui::Slider::new(&mut self.layout.repulsion, 1000.0..=30000.0).text("Repulsion"))
            .changed();
        changed |= ui
            .add(egui::Slider::new(&mut self.layout.attraction, 0.01..=0.3).text("Attraction"))
            .changed();
        changed |= ui
            .add(egui::Slider::new(&mut self.layout.centering, 0.0..=0.01).text("Centering"))
            .changed();
        if changed {
            self.mark_settings_dirty();
        }
    }

    fn render_summary(&mut self, ui: &mut egui::Ui) {
        let Some(core) = &self.core else {
            return;
        };

        // Selection or range header.
        match core.selected().and_then(|w| core.word_summary(w)) {
            Some(summary) => {
                ui.heading(&summary.word);
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new("Occurrences:").strong());
                    ui.label(summary.count.to_string());
                });
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new("Mostly felt:").strong());
                    match summary.dominant {
                        Some(state) => {
                            ui.colored_label(theme::mind_state_color(state), state.label());
                        }
                        None => {
                            ui.colored_label(theme::text::MUTED, "no day stats");
                        }
                    }
                });

                // Most recent dated occurrences, explicit tag when the row
                // carried one.
                ui.add_space(4.0);
                ui.label(egui::RichText::new("Recent days").strong());
                let range = core.range();
                let recent: Vec<(NaiveDate, Option<MindState>)> = core
                    .store()
                    .occurrences()
                    .iter()
                    .filter(|o| o.word == summary.word && range.contains(o.date))
                    .rev()
                    .take(8)
                    .map(|o| (o.date, o.tag))
                    .collect();
                for (date, tag) in recent {
                    ui.horizontal(|ui| {
                        ui.label(
                            egui::RichText::new(date.format("%Y-%m-%d").to_string())
                                .color(theme::text::SECONDARY),
                        );
                        if let Some(state) = tag {
                            ui.colored_label(theme::mind_state_color(state), state.label());
                        }
                    });
                }
            }
            None => {
                ui.heading("Range");
                let graph = core.graph();
                ui.label(format!(
                    "{} — {}",
                    core.range().start().format("%Y-%m-%d"),
                    core.range().end().format("%Y-%m-%d")
                ));
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new("Words:").strong());
                    ui.label(graph.node_count().to_string());
                });
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new("Links:").strong());
                    ui.label(graph.edge_count().to_string());
                });
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new("Occurrences:").strong());
                    ui.label(graph.total_count().to_string());
                });
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new("Days with stats:").strong());
                    ui.label(core.day_stats_in_range().len().to_string());
                });
            }
        }

        // Mind-state pie for the active selection/range.
        ui.add_space(10.0);
        ui.separator();
        ui.label(egui::RichText::new("Mind state").strong());
        let dist = core.active_distribution();
        let (rect, _) = ui.allocate_exact_size(Vec2::new(140.0, 140.0), egui::Sense::hover());
        draw_pie(ui.painter(), rect, &dist);
        for (state, count) in dist.iter().filter(|(_, c)| *c > 0) {
            ui.horizontal(|ui| {
                ui.colored_label(theme::mind_state_color(state), "●");
                ui.label(format!("{} × {}", state.label(), count));
            });
        }
        if dist.is_empty() {
            ui.colored_label(theme::text::MUTED, "No day stats in range");
        }

        // Sleep histogram over the active range.
        ui.add_space(10.0);
        ui.separator();
        ui.label(egui::RichText::new("Sleep hours").strong());
        let bars: Vec<Bar> = core
            .day_stats_in_range()
            .iter()
            .enumerate()
            .map(|(i, stat)| Bar::new(i as f64, stat.sleep_hours as f64).width(0.8))
            .collect();
        Plot::new("sleep_histogram")
            .height(130.0)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(theme::accent::SLEEP));
            });

        // Top words by occurrence count; clicking a row selects the word.
        ui.add_space(10.0);
        ui.separator();
        ui.label(egui::RichText::new("Top words").strong());
        let mut rows: Vec<(String, usize, Option<MindState>)> = core
            .graph()
            .nodes()
            .map(|n| (n.word.clone(), n.count, core.dominant_mind_state(&n.word).ok()))
            .collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        rows.truncate(12);

        let mut clicked: Option<String> = None;
        TableBuilder::new(ui)
            .striped(true)
            .column(Column::remainder())
            .column(Column::auto())
            .column(Column::auto())
            .header(18.0, |mut header| {
                header.col(|ui| {
                    ui.strong("Word");
                });
                header.col(|ui| {
                    ui.strong("Count");
                });
                header.col(|ui| {
                    ui.strong("State");
                });
            })
            .body(|mut body| {
                for (word, count, dominant) in &rows {
                    body.row(18.0, |mut row| {
                        row.col(|ui| {
                            if ui.link(word).clicked() {
                                clicked = Some(word.clone());
                            }
                        });
                        row.col(|ui| {
                            ui.label(count.to_string());
                        });
                        row.col(|ui| match dominant {
                            Some(state) => {
                                ui.colored_label(theme::mind_state_color(*state), state.label());
                            }
                            None => {
                                ui.colored_label(theme::text::MUTED, "—");
                            }
                        });
                    });
                }
            });

        if let Some(word) = clicked {
            if let Some(core) = &mut self.core {
                core.select_word(&word);
            }
        }
    }

    fn render_graph(&mut self, ui: &mut egui::Ui) {
        let Some(core) = &mut self.core else {
            return;
        };

        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
        let rect = response.rect;
        let center = rect.center();

        let scroll_delta = ui.input(|i| i.smooth_scroll_delta);
        let zoom_delta = ui.input(|i| i.zoom_delta());
        let hover_pos = response.hover_pos();

        // Cursor-anchored zoom (pinch or ctrl+scroll).
        if let Some(cursor_pos) = hover_pos {
            if zoom_delta != 1.0 {
                let new_zoom = (self.zoom * zoom_delta).clamp(0.1, 5.0);
                let cursor_offset = cursor_pos - center - self.pan_offset;
                let zoom_factor = 1.0 - new_zoom / self.zoom;
                self.pan_offset += cursor_offset * zoom_factor;
                self.zoom = new_zoom;
            } else if scroll_delta != Vec2::ZERO && response.hovered() {
                self.pan_offset += scroll_delta;
            }
        }

        // Cache for the transform closures.
        let pan_offset = self.pan_offset;
        let zoom = self.zoom;
        let to_screen = move |pos: Pos2| -> Pos2 { center + pos.to_vec2() * zoom + pan_offset };
        let from_screen = move |pos: Pos2| -> Pos2 { ((pos - center - pan_offset) / zoom).to_pos2() };

        // Node drag pins the word; background drag pans.
        if response.drag_started() {
            if let Some(word) = &self.hovered_word {
                self.dragged_word = Some(word.clone());
                self.view.pin(word);
            }
        }
        if response.dragged() {
            match &self.dragged_word {
                Some(word) => {
                    if let Some(pointer) = response.interact_pointer_pos() {
                        self.view.set_pos(word, from_screen(pointer));
                    }
                }
                None => self.pan_offset += response.drag_delta(),
            }
        }
        if response.drag_stopped() {
            self.view.unpin();
            self.dragged_word = None;
        }

        if self.physics_enabled {
            self.layout.step(&mut self.view, core.graph());
            ui.ctx().request_repaint();
        }

        let max_count = core.graph().max_count();
        let selected = core.selected().map(str::to_owned);
        let neighbor_set: Option<std::collections::HashSet<String>> = selected
            .as_deref()
            .map(|w| core.graph().neighbors(w).into_iter().map(str::to_owned).collect());

        // Edges first, behind the nodes; edges touching the selection pop.
        for (a, b) in core.graph().edges() {
            let (Some(pa), Some(pb)) = (self.view.get_pos(a), self.view.get_pos(b)) else {
                continue;
            };
            let touches_selection =
                selected.as_deref() == Some(a) || selected.as_deref() == Some(b);
            let (width, color) = if touches_selection {
                (2.0 * zoom, theme::accent::SELECTED.gamma_multiply(0.8))
            } else {
                (1.2 * zoom, theme::accent::EDGE.gamma_multiply(0.6))
            };
            painter.line_segment([to_screen(pa), to_screen(pb)], Stroke::new(width, color));
        }

        // Hover: nearest node whose disc the cursor is inside (plus slack).
        let mut new_hovered: Option<String> = None;
        if let Some(hover_pos) = hover_pos {
            let mut best = f32::MAX;
            for node in core.graph().nodes() {
                let Some(pos) = self.view.get_pos(&node.word) else {
                    continue;
                };
                let radius = node_radius(self.node_size, node.count, max_count) * zoom;
                let distance = to_screen(pos).distance(hover_pos);
                if distance <= radius + 6.0 && distance < best {
                    best = distance;
                    new_hovered = Some(node.word.clone());
                }
            }
        }
        self.hovered_word = new_hovered;

        // Nodes.
        for node in core.graph().nodes() {
            let Some(pos) = self.view.get_pos(&node.word) else {
                continue;
            };
            let screen_pos = to_screen(pos);
            let is_hovered = self.hovered_word.as_deref() == Some(node.word.as_str());
            let is_selected = selected.as_deref() == Some(node.word.as_str());

            let base = node_radius(self.node_size, node.count, max_count) * zoom;
            let radius = if is_hovered || is_selected { base * 1.25 } else { base };

            let mut fill = match core.dominant_mind_state(&node.word) {
                Ok(state) => theme::mind_state_color(state),
                Err(_) => theme::NO_DATA_NODE,
            };
            // With a selection active, fade everything outside its neighborhood.
            if let Some(neighbors) = &neighbor_set {
                if !is_selected && !neighbors.contains(&node.word) {
                    fill = fill.gamma_multiply(0.35);
                }
            }
            painter.circle_filled(screen_pos, radius, fill);

            let border = if is_selected {
                Stroke::new(2.5, theme::accent::SELECTED)
            } else if is_hovered {
                Stroke::new(2.0, theme::accent::HOVERED)
            } else {
                Stroke::new(1.0, fill.gamma_multiply(0.6))
            };
            painter.circle_stroke(screen_pos, radius, border);

            if self.show_labels {
                painter.text(
                    screen_pos + Vec2::new(0.0, -(radius + 4.0)),
                    egui::Align2::CENTER_BOTTOM,
                    &node.word,
                    egui::FontId::proportional(11.0 * zoom.clamp(0.6, 1.6)),
                    theme::text::SECONDARY,
                );
            }
        }

        // Click: toggle the hovered word, or clear on empty canvas.
        if response.clicked() {
            match self.hovered_word.clone() {
                Some(word) => {
                    core.select_word(&word);
                }
                None => {
                    core.clear_selection();
                }
            }
        }

        // Tooltip for the hovered word.
        if let Some(word) = self.hovered_word.clone() {
            if let (Some(summary), Some(pos)) = (core.word_summary(&word), self.view.get_pos(&word))
            {
                let anchor = to_screen(pos) + Vec2::new(self.node_size * zoom + 10.0, 0.0);
                let state_label = summary
                    .dominant
                    .map(|s| s.label())
                    .unwrap_or("no day stats");
                painter.text(
                    anchor,
                    egui::Align2::LEFT_CENTER,
                    format!("{} · {} days · {}", summary.word, summary.count, state_label),
                    egui::FontId::proportional(12.0),
                    theme::text::PRIMARY,
                );
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.maybe_save_settings();

        egui::TopBottomPanel::top("top_bar")
            .frame(egui::Frame::default().fill(theme::bg::PANEL).inner_margin(8.0))
            .show(ctx, |ui| {
                self.render_top_bar(ui);
            });

        if let Some(error) = self.load_error.clone() {
            egui::CentralPanel::default()
                .frame(egui::Frame::none().fill(theme::bg::GRAPH))
                .show(ctx, |ui| {
                    ui.centered_and_justified(|ui| {
                        ui.colored_label(theme::accent::ERROR, format!("Failed to load data: {error}"));
                    });
                });
            return;
        }

        egui::SidePanel::left("controls")
            .frame(egui::Frame::default().fill(theme::bg::PANEL).inner_margin(8.0))
            .default_width(220.0)
            .show(ctx, |ui| {
                self.render_controls(ui);
            });

        egui::SidePanel::right("summary")
            .frame(egui::Frame::default().fill(theme::bg::PANEL).inner_margin(8.0))
            .default_width(260.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.render_summary(ui);
                });
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(theme::bg::GRAPH))
            .show(ctx, |ui| {
                self.render_graph(ui);
            });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        // Force save settings on exit
        if self.settings_dirty {
            self.sync_settings_from_ui();
            self.settings.save();
        }
    }
}

/// Index of the slider notch closest to `date` (exact when present).
fn nearest_date_index(dates: &[NaiveDate], date: NaiveDate) -> usize {
    match dates.binary_search(&date) {
        Ok(ix) => ix,
        Err(ix) => ix.min(dates.len().saturating_sub(1)),
    }
}

/// Node radius grows with the square root of the occurrence count so large
/// counts stay readable next to singletons.
fn node_radius(base: f32, count: usize, max_count: usize) -> f32 {
    if max_count == 0 {
        return base;
    }
    let scale = (count as f32 / max_count as f32).sqrt();
    base * (0.55 + 0.85 * scale)
}

/// Pie segments as (state, start, sweep) fractions of a full turn, in
/// enumeration order, zero counts skipped.
fn pie_slices(dist: &MindStateDistribution) -> Vec<(MindState, f32, f32)> {
    let total = dist.total();
    if total == 0 {
        return Vec::new();
    }
    let mut start = 0.0_f32;
    let mut slices = Vec::new();
    for (state, count) in dist.iter() {
        if count == 0 {
            continue;
        }
        let sweep = count as f32 / total as f32;
        slices.push((state, start, sweep));
        start += sweep;
    }
    slices
}

fn draw_pie(painter: &egui::Painter, rect: egui::Rect, dist: &MindStateDistribution) {
    use std::f32::consts::TAU;

    let center = rect.center();
    let radius = rect.width().min(rect.height()) * 0.5 - 4.0;
    let slices = pie_slices(dist);

    if slices.is_empty() {
        painter.circle_stroke(center, radius, Stroke::new(1.0, theme::text::MUTED));
        return;
    }

    for (state, start, sweep) in slices {
        // Fan out the arc with enough segments to look round.
        let start_angle = start * TAU - TAU / 4.0;
        let sweep_angle = sweep * TAU;
        let steps = ((sweep_angle / 0.15).ceil() as usize).max(2);

        let mut points = vec![center];
        for i in 0..=steps {
            let angle = start_angle + sweep_angle * i as f32 / steps as f32;
            points.push(center + radius * Vec2::angled(angle));
        }
        painter.add(egui::Shape::convex_polygon(
            points,
            theme::mind_state_color(state),
            Stroke::new(1.0, theme::bg::PANEL),
        ));
    }
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod app_tests;
