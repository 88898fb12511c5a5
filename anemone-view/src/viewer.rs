//! Interactive viewer for the anemone feeding model, built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns the simulation and its
//! configuration and implements [`eframe::App`] to draw a projection of
//! the 3-D scene and control the run through an egui UI.

use anemone_core::{
    anemone::{ConsumptionScan, perpendicular},
    config::Config,
    simulation::Simulation,
    types::Point3,
};
use eframe::App;
use glam::Vec2;

/// Axis plane the scene is projected onto.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Projection {
    /// Looking down -z: x to the right, y up.
    Xy,
    /// Looking down +x: z to the right, y up.
    Zy,
    /// Looking down -y: x to the right, z up.
    Xz,
}

impl Projection {
    const ALL: [Projection; 3] = [Projection::Xy, Projection::Zy, Projection::Xz];

    fn label(self) -> &'static str {
        match self {
            Projection::Xy => "XY",
            Projection::Zy => "ZY",
            Projection::Xz => "XZ",
        }
    }

    /// Drops the viewing axis, keeping (horizontal, vertical) world coordinates.
    fn project(self, p: Point3) -> Vec2 {
        let (h, v) = match self {
            Projection::Xy => (p.x, p.y),
            Projection::Zy => (p.z, p.y),
            Projection::Xz => (p.x, p.z),
        };
        Vec2::new(h as f32, v as f32)
    }
}

/// Main application state for the interactive viewer.
///
/// [`Viewer`] glues together:
/// - The simulation core: [`Simulation`] built from a [`Config`].
/// - UI configuration (projection, pan/zoom, timing).
/// - eframe/egui callbacks for drawing and user interaction.
///
/// The typical per-frame update is:
/// 1. Handle UI interactions / input.
/// 2. If `running` is `true` and enough time has passed, call [`Viewer::step_once`].
/// 3. Render the domain, anemone and food.
///
/// ### Fields
/// - `cfg` - Configuration the current simulation was built from.
/// - `draft` - Configuration being edited in the side panel.
/// - `sim` - The running simulation, `None` if the last build failed.
/// - `error` - Message from the last failed build or step.
///
/// - `steps` - Steps executed since the last reset.
/// - `consumed_total` - Food eaten since the last reset.
/// - `last_consumed` - Positions eaten in the last step (for highlighting).
///
/// - `running` - Whether the simulation is currently auto-advancing.
/// - `projection` - Axis plane used for drawing.
/// - `zoom` - Pixels per world unit.
/// - `pan` - Screen-space pan offset in pixels.
///
/// - `step_interval` - Target time between automatic simulation steps (seconds).
/// - `last_step_time` - Time stamp of the last step (egui time).
/// - `last_step_dt` - Actual time delta between the last two steps (for display only).
pub struct Viewer {
    cfg: Config,
    draft: Config,
    sim: Option<Simulation>,
    error: Option<String>,

    steps: u64,
    consumed_total: usize,
    last_consumed: Vec<Point3>,

    running: bool,
    projection: Projection,
    zoom: f32,
    pan: egui::Vec2,

    step_interval: f64,
    last_step_time: f64,
    last_step_dt: f64,
}

impl Viewer {
    /// Creates a viewer running the default configuration, seen from the side.
    pub fn new() -> Self {
        let cfg = Config::default();
        let mut viewer = Self {
            draft: cfg.clone(),
            cfg,
            sim: None,
            error: None,
            steps: 0,
            consumed_total: 0,
            last_consumed: Vec::new(),
            running: false,
            projection: Projection::Xy,
            zoom: 250.0,
            pan: egui::vec2(0.0, 0.0),
            step_interval: 0.05,
            last_step_time: 0.0,
            last_step_dt: 0.0,
        };
        viewer.reset();
        viewer
    }

    /// Rebuilds the simulation from `cfg` and clears the run counters.
    ///
    /// A construction error is kept in `error` and leaves `sim` empty.
    fn reset(&mut self) {
        match Simulation::from_config(&self.cfg) {
            Ok(sim) => {
                self.sim = Some(sim);
                self.error = None;
            }
            Err(e) => {
                log::warn!("Unable to instantiate anemone model: {e}");
                self.sim = None;
                self.error = Some(e.to_string());
            }
        }
        self.steps = 0;
        self.consumed_total = 0;
        self.last_consumed.clear();
        self.running = false;
    }

    /// Makes the edited configuration current and rebuilds.
    ///
    /// If the draft cannot build a simulation, the previous simulation and
    /// configuration stay in place and the error is shown.
    fn apply_draft(&mut self) {
        match Simulation::from_config(&self.draft) {
            Ok(sim) => {
                self.cfg = self.draft.clone();
                self.sim = Some(sim);
                self.error = None;
                self.steps = 0;
                self.consumed_total = 0;
                self.last_consumed.clear();
                self.running = false;
            }
            Err(e) => {
                self.error = Some(e.to_string());
            }
        }
    }

    /// Whether the run's end conditions still allow another step.
    fn can_step(&self) -> bool {
        self.sim.as_ref().is_some_and(|sim| {
            self.cfg
                .run_limits()
                .allows_step(self.steps, sim.food.len())
        })
    }

    /// Advances the simulation by a single step.
    ///
    /// Positions eaten in this step are stored in `last_consumed` so they
    /// can be highlighted in the next frame. A failing step stops auto-run.
    fn step_once(&mut self) {
        let Some(sim) = self.sim.as_mut() else {
            return;
        };
        match sim.step() {
            Ok(report) => {
                self.steps += 1;
                self.consumed_total += report.consumed.len();
                self.last_consumed = report.consumed;
            }
            Err(e) => {
                log::error!("Step failed: {e}");
                self.error = Some(e.to_string());
                self.running = false;
            }
        }
    }

    /// Converts a projected world position to screen-space.
    ///
    /// World coordinates are scaled by `zoom`, offset by `pan`, and then
    /// centered inside the given `rect`. The vertical axis is flipped so
    /// that positive world values go up.
    fn world_to_screen(&self, p: Vec2, rect: egui::Rect) -> egui::Pos2 {
        let center = rect.center();
        egui::pos2(
            center.x + p.x * self.zoom + self.pan.x,
            center.y - p.y * self.zoom + self.pan.y,
        )
    }

    /// Converts a screen-space position back to projected world-space.
    ///
    /// This is the inverse of [`Viewer::world_to_screen`] (up to floating
    /// point rounding).
    fn screen_to_world(&self, p: egui::Pos2, rect: egui::Rect) -> Vec2 {
        let center = rect.center();
        let x = (p.x - center.x - self.pan.x) / self.zoom;
        let y = (center.y - p.y + self.pan.y) / self.zoom;
        Vec2::new(x, y)
    }

    fn point_to_screen(&self, p: Point3, rect: egui::Rect) -> egui::Pos2 {
        self.world_to_screen(self.projection.project(p), rect)
    }

    /// Helper to draw a labeled `usize` [`egui::DragValue`].
    fn labeled_drag_usize(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut usize,
        range: std::ops::RangeInclusive<usize>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Helper to draw a labeled `f64` [`egui::DragValue`].
    fn labeled_drag_f64(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut f64,
        range: std::ops::RangeInclusive<f64>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(
                egui::DragValue::new(value)
                    .range(range)
                    .speed(speed)
                    .max_decimals(4),
            );
        });
    }

    /// Builds the top panel UI (run controls, stepping, projection, zoom).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .button(if self.running { "⏸ Pause" } else { "▶ Run" })
                    .clicked()
                {
                    self.running = !self.running && self.can_step();
                }

                ui.add(
                    egui::DragValue::new(&mut self.step_interval)
                        .prefix("dt target = ")
                        .range(0.0..=1.0)
                        .speed(0.01),
                );

                if ui.button("Step").clicked() && self.can_step() {
                    let now = ctx.input(|i| i.time);
                    if self.last_step_time > 0.0 {
                        self.last_step_dt = now - self.last_step_time;
                    }
                    self.step_once();
                    self.last_step_time = now;
                }

                if ui.button("Reset").clicked() {
                    self.reset();
                }

                ui.separator();
                for projection in Projection::ALL {
                    if ui
                        .selectable_label(self.projection == projection, projection.label())
                        .clicked()
                    {
                        self.projection = projection;
                    }
                }

                ui.separator();
                ui.add(egui::Slider::new(&mut self.zoom, 20.0..=2000.0).text("Zoom"));
            });
        });
    }

    /// Builds the bottom status bar (timestep, food remaining, consumption).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("dt target = {:.3} s", self.step_interval));
                ui.label(format!("dt last = {:.3} s", self.last_step_dt));
                ui.separator();
                ui.label(format!("timestep = {}", self.steps));
                if let Some(sim) = &self.sim {
                    ui.label(format!("food remaining = {}", sim.food.len()));
                }
                ui.label(format!("consumed = {}", self.consumed_total));
                if self.sim.is_some() && !self.can_step() {
                    ui.label("run ended");
                }
            });
        });
    }

    /// Builds the right-hand panel for editing the configuration.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(240.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.heading("Config");

                    let sim = &mut self.draft.simulation;
                    ui.separator();
                    ui.label("End conditions");
                    ui.horizontal(|ui| {
                        ui.label("num_timesteps:");
                        ui.add(egui::DragValue::new(&mut sim.num_timesteps).speed(100.0));
                    });
                    Self::labeled_drag_usize(
                        ui,
                        "min_remaining_food:",
                        &mut sim.min_remaining_food_pieces,
                        0..=100_000,
                        1.0,
                    );

                    ui.separator();
                    ui.label("Motion");
                    Self::labeled_drag_f64(
                        ui,
                        "max_diffusion:",
                        &mut sim.max_food_diffusion_per_timestep,
                        0.0..=1.0,
                        0.0005,
                    );
                    let model = &mut self.draft.model;
                    Self::labeled_drag_f64(
                        ui,
                        "current.x:",
                        &mut model.current_vector_x,
                        -1.0..=1.0,
                        0.001,
                    );
                    Self::labeled_drag_f64(
                        ui,
                        "current.y:",
                        &mut model.current_vector_y,
                        -1.0..=1.0,
                        0.001,
                    );
                    Self::labeled_drag_f64(
                        ui,
                        "current.z:",
                        &mut model.current_vector_z,
                        -1.0..=1.0,
                        0.001,
                    );

                    ui.separator();
                    ui.label("Consumption scan");
                    ui.horizontal(|ui| {
                        let scan = &mut self.draft.simulation.consumption_scan;
                        if ui
                            .selectable_label(*scan == ConsumptionScan::FirstSensor, "First sensor")
                            .clicked()
                        {
                            *scan = ConsumptionScan::FirstSensor;
                        }
                        if ui
                            .selectable_label(*scan == ConsumptionScan::AllSensors, "All sensors")
                            .clicked()
                        {
                            *scan = ConsumptionScan::AllSensors;
                        }
                    });

                    let mut seeded = self.draft.simulation.random_seed.is_some();
                    ui.horizontal(|ui| {
                        ui.checkbox(&mut seeded, "random_seed");
                        if seeded {
                            let seed = self.draft.simulation.random_seed.get_or_insert(0);
                            ui.add(egui::DragValue::new(seed));
                        } else {
                            self.draft.simulation.random_seed = None;
                        }
                    });

                    let model = &mut self.draft.model;
                    ui.separator();
                    ui.label("Food");
                    Self::labeled_drag_usize(
                        ui,
                        "num_pieces_food:",
                        &mut model.num_pieces_food,
                        0..=100_000,
                        10.0,
                    );

                    ui.separator();
                    ui.label("Anemone");
                    Self::labeled_drag_usize(
                        ui,
                        "num_tentacles:",
                        &mut model.num_tentacles,
                        1..=64,
                        1.0,
                    );
                    Self::labeled_drag_usize(
                        ui,
                        "num_tentacle_elements:",
                        &mut model.num_tentacle_elements,
                        1..=100,
                        1.0,
                    );
                    Self::labeled_drag_f64(
                        ui,
                        "disk_radius:",
                        &mut model.disk_radius,
                        0.001..=0.999,
                        0.005,
                    );
                    Self::labeled_drag_f64(
                        ui,
                        "tentacle_length:",
                        &mut model.tentacle_length,
                        0.001..=0.999,
                        0.005,
                    );
                    Self::labeled_drag_f64(
                        ui,
                        "center.x:",
                        &mut model.disk_center_x,
                        -1.0..=0.999,
                        0.01,
                    );
                    Self::labeled_drag_f64(
                        ui,
                        "center.y:",
                        &mut model.disk_center_y,
                        -1.0..=0.999,
                        0.01,
                    );
                    Self::labeled_drag_f64(
                        ui,
                        "center.z:",
                        &mut model.disk_center_z,
                        -1.0..=0.999,
                        0.01,
                    );
                    Self::labeled_drag_f64(
                        ui,
                        "normal.x:",
                        &mut model.disk_normal_vector_x,
                        -1.0..=1.0,
                        0.01,
                    );
                    Self::labeled_drag_f64(
                        ui,
                        "normal.y:",
                        &mut model.disk_normal_vector_y,
                        -1.0..=1.0,
                        0.01,
                    );
                    Self::labeled_drag_f64(
                        ui,
                        "normal.z:",
                        &mut model.disk_normal_vector_z,
                        -1.0..=1.0,
                        0.01,
                    );

                    ui.separator();
                    ui.horizontal(|ui| {
                        if ui.button("Apply & reset").clicked() {
                            self.apply_draft();
                        }
                        if ui.button("Defaults").clicked() {
                            self.draft = Config::default();
                        }
                    });

                    if let Some(err) = &self.error {
                        ui.colored_label(egui::Color32::LIGHT_RED, err.as_str());
                    }
                });
            });
    }

    /// Draws the domain boundary, the disk rim and the tentacles.
    fn draw_anemone(&self, painter: &egui::Painter, rect: egui::Rect, sim: &Simulation) {
        // Every projection shows the domain as the square [-1, 1) x [-1, 1).
        let corners: Vec<egui::Pos2> = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)]
            .into_iter()
            .map(|(h, v)| self.world_to_screen(Vec2::new(h, v), rect))
            .collect();
        painter.add(egui::Shape::closed_line(
            corners,
            egui::Stroke::new(1.0, egui::Color32::DARK_GRAY),
        ));

        let anemone = &sim.anemone;

        let segments = 64;
        let rim: Vec<egui::Pos2> = (0..segments)
            .filter_map(|i| {
                let theta = (i as f64) / (segments as f64) * std::f64::consts::TAU;
                let dir = perpendicular(anemone.normal(), theta)?.try_normalize()?;
                Some(self.point_to_screen(anemone.center() + dir * anemone.disk_radius(), rect))
            })
            .collect();
        if rim.len() > 2 {
            painter.add(egui::Shape::closed_line(
                rim,
                egui::Stroke::new(1.0, egui::Color32::LIGHT_BLUE),
            ));
        }

        for tentacle in anemone.tentacles() {
            let (Some(&root), Some(&tip)) = (tentacle.first(), tentacle.last()) else {
                continue;
            };
            painter.line_segment(
                [self.point_to_screen(root, rect), self.point_to_screen(tip, rect)],
                egui::Stroke::new(1.5, egui::Color32::LIGHT_GREEN),
            );
            for &p in tentacle {
                painter.circle_filled(self.point_to_screen(p, rect), 1.5, egui::Color32::GREEN);
            }
        }

        // Reach of the sensor that decides the default consumption scan.
        if let Some(first) = anemone.sensitive_points().next() {
            painter.circle_stroke(
                self.point_to_screen(first, rect),
                anemone.reaction_distance() as f32 * self.zoom,
                egui::Stroke::new(1.0, egui::Color32::from_rgba_unmultiplied(255, 255, 0, 96)),
            );
        }

        painter.circle_filled(
            self.point_to_screen(anemone.center(), rect),
            3.0,
            egui::Color32::WHITE,
        );
    }

    /// Builds the central panel where the scene is drawn and navigated.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let response = ui.allocate_response(ui.available_size(), egui::Sense::click_and_drag());
            let rect = response.rect;
            let painter = ui.painter_at(rect);

            // Pan with drag.
            if response.dragged() {
                self.pan += response.drag_delta();
            }

            // Zoom around the mouse cursor.
            let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
            if scroll != 0.0 {
                let pointer_screen = response.hover_pos().unwrap_or(rect.center());
                let world_before = self.screen_to_world(pointer_screen, rect);

                let factor = (1.0 + scroll * 0.001).clamp(0.5, 2.0);
                self.zoom = (self.zoom * factor).clamp(20.0, 2000.0);

                let screen_after = self.world_to_screen(world_before, rect);
                self.pan += pointer_screen - screen_after;
            }

            if let Some(sim) = &self.sim {
                self.draw_anemone(&painter, rect, sim);

                for p in sim.food.positions() {
                    painter.circle_filled(
                        self.point_to_screen(p, rect),
                        1.5,
                        egui::Color32::LIGHT_RED,
                    );
                }
            }

            for &p in &self.last_consumed {
                painter.circle_filled(self.point_to_screen(p, rect), 4.0, egui::Color32::RED);
            }

            // Auto-run simulation if requested.
            if self.running {
                if !self.can_step() {
                    self.running = false;
                } else {
                    let now = ctx.input(|i| i.time);
                    let elapsed = now - self.last_step_time;
                    if elapsed >= self.step_interval {
                        if self.last_step_time > 0.0 {
                            self.last_step_dt = elapsed;
                        }
                        self.step_once();
                        self.last_step_time = now;
                    }
                }

                ctx.request_repaint();
            }
        });
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anemone_core::food::FoodSet;
    use glam::DVec3;

    fn test_rect() -> egui::Rect {
        egui::Rect::from_min_size(egui::Pos2::new(0.0, 0.0), egui::vec2(800.0, 600.0))
    }

    #[test]
    fn world_to_screen_and_back_is_roundtrip() {
        let mut viewer = Viewer::new();
        viewer.zoom = 300.0;
        viewer.pan = egui::vec2(15.0, -7.0);
        let rect = test_rect();

        let world_points = [
            Vec2::new(0.0, 0.0),
            Vec2::new(0.5, -0.25),
            Vec2::new(-0.9, 0.75),
        ];

        let eps = 1e-4;

        for p in world_points {
            let screen = viewer.world_to_screen(p, rect);
            let back = viewer.screen_to_world(screen, rect);

            assert!(
                (back.x - p.x).abs() < eps && (back.y - p.y).abs() < eps,
                "roundtrip mismatch: p={:?}, back={:?}",
                p,
                back
            );
        }
    }

    #[test]
    fn projections_keep_the_right_axes() {
        let p = DVec3::new(0.1, 0.2, 0.3);
        assert!(Projection::Xy.project(p).abs_diff_eq(Vec2::new(0.1, 0.2), 1e-6));
        assert!(Projection::Zy.project(p).abs_diff_eq(Vec2::new(0.3, 0.2), 1e-6));
        assert!(Projection::Xz.project(p).abs_diff_eq(Vec2::new(0.1, 0.3), 1e-6));
    }

    #[test]
    fn new_builds_default_simulation() {
        let viewer = Viewer::new();
        let sim = viewer.sim.as_ref().unwrap();
        assert_eq!(sim.food.len(), 1000);
        assert_eq!(sim.anemone.tentacles().len(), 12);
        assert!(viewer.error.is_none());
        assert!(viewer.can_step());
    }

    #[test]
    fn step_once_advances_counters() {
        let mut viewer = Viewer::new();
        viewer.step_once();
        viewer.step_once();
        assert_eq!(viewer.steps, 2);
        let remaining = viewer.sim.as_ref().unwrap().food.len();
        assert_eq!(remaining + viewer.consumed_total, 1000);
    }

    #[test]
    fn reset_restores_basic_state() {
        let mut viewer = Viewer::new();
        viewer.step_once();
        viewer.last_consumed.push(DVec3::ZERO);
        viewer.running = true;
        viewer.sim.as_mut().unwrap().food = FoodSet::default();

        viewer.reset();

        assert_eq!(viewer.steps, 0);
        assert_eq!(viewer.consumed_total, 0);
        assert!(viewer.last_consumed.is_empty());
        assert!(!viewer.running);
        assert_eq!(viewer.sim.as_ref().unwrap().food.len(), 1000);
    }

    #[test]
    fn invalid_draft_keeps_previous_simulation() {
        let mut viewer = Viewer::new();
        viewer.draft.model.disk_radius = 0.0;

        viewer.apply_draft();

        assert!(viewer.error.as_deref().unwrap().contains("disk_radius"));
        assert!(viewer.sim.is_some());
        assert_eq!(viewer.cfg, Config::default());
    }

    #[test]
    fn valid_draft_rebuilds_simulation() {
        let mut viewer = Viewer::new();
        viewer.draft.model.num_tentacles = 5;
        viewer.draft.model.num_pieces_food = 20;
        viewer.step_once();

        viewer.apply_draft();

        let sim = viewer.sim.as_ref().unwrap();
        assert_eq!(sim.anemone.tentacles().len(), 5);
        assert_eq!(sim.food.len(), 20);
        assert_eq!(viewer.steps, 0);
        assert!(viewer.error.is_none());
    }

    #[test]
    fn end_conditions_stop_stepping() {
        let mut viewer = Viewer::new();
        viewer.cfg.simulation.num_timesteps = 1;
        assert!(viewer.can_step());
        viewer.step_once();
        assert!(!viewer.can_step());
    }
}
