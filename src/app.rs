//! Main application state and UI.

use crate::api::ApiClient;
use crate::graph::camera::{Camera, CameraCommand, Transform, PANEL_WIDTH};
use crate::graph::interact::{DragController, DragPhase};
use crate::graph::layout::ForceLayout;
use crate::graph::scene;
use crate::graph::style::{self, EDGE_SOURCE_OFFSET, EDGE_TARGET_OFFSET, NODE_RADIUS};
use crate::graph::types::{Entity, GraphData, GraphState, RelationKind};
use crate::settings::Settings;
use crate::theme;
use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Stroke, Vec2};
use std::sync::mpsc::{self, Receiver};
use std::time::Instant;

/// Events the graph view emits toward the rest of the app in one frame
#[derive(Debug, Clone, PartialEq)]
pub enum GraphEvent {
    NodeClicked(String),
    BackgroundClicked,
    HoverChanged(Option<String>),
    ZoomChanged(f32),
    NodeDroppedOnNode(String, String),
}

/// A relationship proposal awaiting confirmation in the detail panel
#[derive(Debug, Clone, PartialEq)]
pub struct RelationDraft {
    pub source: String,
    pub target: String,
    pub kind: RelationKind,
    pub weight: i32,
}

/// Main explorer application
pub struct ExplorerApp {
    // API client
    api: ApiClient,
    api_connected: bool,
    api_error: Option<String>,

    // Graph engine
    data: GraphData,
    state: GraphState,
    layout: ForceLayout,
    camera: Camera,
    drag: DragController,
    panning: bool,
    needs_rebuild: bool,

    // Externally-owned UI state fed into the projector
    selected: Option<String>,
    hovered: Option<String>,
    draft: Option<RelationDraft>,

    // Chrome state
    search_query: String,
    loading: bool,
    fetch_rx: Option<Receiver<Result<GraphData, String>>>,

    last_scale: f32,
    last_frame: Instant,

    // Settings persistence
    settings: Settings,
    settings_dirty: bool,
    last_settings_save: Instant,
}

impl ExplorerApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let mut app = Self::with_settings(Settings::load());
        app.check_api();
        app.load_graph();
        app
    }

    /// Construct without touching the network; `new` fetches afterwards.
    pub fn with_settings(settings: Settings) -> Self {
        let mut layout = ForceLayout::default();
        layout.charge = settings.charge;
        layout.link_strength = settings.link_strength;
        layout.center_strength = settings.center_strength;
        layout.collision_radius = settings.collision_radius;

        Self {
            api: ApiClient::new(settings.api_base_url.clone()),
            api_connected: false,
            api_error: None,

            data: GraphData::default(),
            state: GraphState::new(),
            layout,
            camera: Camera::new(),
            drag: DragController::new(),
            panning: false,
            needs_rebuild: false,

            selected: None,
            hovered: None,
            draft: None,

            search_query: String::new(),
            loading: false,
            fetch_rx: None,

            last_scale: 1.0,
            last_frame: Instant::now(),

            settings,
            settings_dirty: false,
            last_settings_save: Instant::now(),
        }
    }

    fn check_api(&mut self) {
        match self.api.health() {
            Ok(true) => {
                self.api_connected = true;
                self.api_error = None;
            }
            Ok(false) => {
                self.api_connected = false;
                self.api_error = Some("API unhealthy".to_string());
            }
            Err(e) => {
                self.api_connected = false;
                self.api_error = Some(e);
            }
        }
    }

    /// Kick off a background fetch of the full graph
    fn load_graph(&mut self) {
        if self.loading {
            return;
        }
        self.loading = true;

        let (tx, rx) = mpsc::channel();
        self.fetch_rx = Some(rx);

        let base_url = self.settings.api_base_url.clone();
        std::thread::spawn(move || {
            let api = ApiClient::new(base_url);
            let _ = tx.send(api.fetch_graph());
        });
    }

    fn poll_fetch(&mut self) {
        let Some(rx) = self.fetch_rx.take() else {
            return;
        };

        match rx.try_recv() {
            Ok(Ok(data)) => {
                self.loading = false;
                self.api_connected = true;
                self.api_error = None;
                self.data = data;
                self.needs_rebuild = true;
                self.layout.restart();
            }
            Ok(Err(e)) => {
                self.loading = false;
                self.api_connected = false;
                tracing::warn!(error = %e, "graph fetch failed");
                self.api_error = Some(e);
            }
            Err(mpsc::TryRecvError::Empty) => {
                self.fetch_rx = Some(rx);
            }
            Err(mpsc::TryRecvError::Disconnected) => {
                self.loading = false;
                self.api_error = Some("fetch worker disappeared".to_string());
            }
        }
    }

    /// Mark settings as needing to be saved
    fn mark_settings_dirty(&mut self) {
        self.settings_dirty = true;
    }

    /// Save settings if dirty and enough time has passed (debounce)
    fn maybe_save_settings(&mut self) {
        if self.settings_dirty && self.last_settings_save.elapsed().as_secs() >= 2 {
            self.settings.save();
            self.settings_dirty = false;
            self.last_settings_save = Instant::now();
        }
    }

    fn entry(&self, id: &str) -> Option<&Entity> {
        self.data.entries.iter().find(|e| e.id == id)
    }

    fn entry_title(&self, id: &str) -> String {
        self.entry(id).map_or_else(|| id.to_string(), |e| e.title.clone())
    }

    /// Route one frame's worth of graph events into app state
    fn handle_events(&mut self, events: Vec<GraphEvent>) {
        for event in events {
            match event {
                GraphEvent::NodeClicked(id) => {
                    self.selected = Some(id);
                }
                GraphEvent::BackgroundClicked => {
                    self.selected = None;
                    self.draft = None;
                }
                GraphEvent::HoverChanged(id) => {
                    tracing::trace!(?id, "hover changed");
                }
                GraphEvent::ZoomChanged(scale) => {
                    tracing::trace!(scale, "zoom changed");
                }
                GraphEvent::NodeDroppedOnNode(source, target) => {
                    tracing::info!(%source, %target, "relationship proposed by drop");
                    self.selected = Some(source.clone());
                    self.draft = Some(RelationDraft {
                        source,
                        target,
                        kind: RelationKind::RelatedTo,
                        weight: 5,
                    });
                }
            }
        }
    }

    /// Confirm the pending relationship draft against the data service and
    /// merge the result into the local edge list.
    fn confirm_draft(&mut self) {
        let Some(draft) = self.draft.take() else {
            return;
        };

        match self
            .api
            .create_relationship(&draft.source, &draft.target, draft.kind, draft.weight)
        {
            Ok(relation) => {
                self.data.relations.push(relation);
                self.needs_rebuild = true;
                self.layout.reheat(0.3);
            }
            Err(e) => {
                tracing::warn!(error = %e, "relationship creation failed");
                self.api_error = Some(e);
                // Keep the draft so the user can retry or cancel
                self.draft = Some(draft);
            }
        }
    }

    fn render_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Lexigraph");
            ui.separator();

            // API status
            if self.api_connected {
                ui.colored_label(Color32::from_rgb(34, 197, 94), "●");
            } else {
                ui.colored_label(Color32::from_rgb(239, 68, 68), "● offline");
                if ui.button("Retry").clicked() {
                    self.check_api();
                    self.load_graph();
                }
            }
            if let Some(err) = self.api_error.clone() {
                ui.colored_label(Color32::from_rgb(239, 68, 68), truncate(&err, 48))
                    .on_hover_text(err);
            }

            ui.separator();
            self.render_search(ui);

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                self.render_settings_menu(ui);

                if ui
                    .button(if self.settings.dark_mode { "☀" } else { "🌙" })
                    .clicked()
                {
                    self.settings.dark_mode = !self.settings.dark_mode;
                    self.mark_settings_dirty();
                }

                if ui.button("⟳").on_hover_text("Reload").clicked() {
                    self.load_graph();
                }

                ui.separator();

                if ui.button("＋").on_hover_text("Zoom in").clicked() {
                    self.camera.push(CameraCommand::ZoomIn);
                }
                ui.label(format!("{:.0}%", self.camera.scale() * 100.0));
                if ui.button("－").on_hover_text("Zoom out").clicked() {
                    self.camera.push(CameraCommand::ZoomOut);
                }
                if ui.button("Reset view").clicked() {
                    self.camera.push(CameraCommand::Reset);
                }
            });
        });
    }

    fn render_search(&mut self, ui: &mut egui::Ui) {
        let response = ui.add(
            egui::TextEdit::singleline(&mut self.search_query)
                .hint_text("Search entries...")
                .desired_width(220.0),
        );

        let popup_id = ui.make_persistent_id("search_results");
        if response.changed() && !self.search_query.is_empty() {
            ui.memory_mut(|m| m.open_popup(popup_id));
        }

        let matches: Vec<(String, String)> = if self.search_query.is_empty() {
            Vec::new()
        } else {
            let query = self.search_query.to_lowercase();
            self.data
                .entries
                .iter()
                .filter(|e| entry_matches(e, &query))
                .take(8)
                .map(|e| (e.id.clone(), e.title.clone()))
                .collect()
        };

        if !matches.is_empty() {
            egui::popup_below_widget(
                ui,
                popup_id,
                &response,
                egui::PopupCloseBehavior::CloseOnClick,
                |ui| {
                    ui.set_min_width(220.0);
                    for (id, title) in matches {
                        if ui.button(title).clicked() {
                            self.selected = Some(id.clone());
                            self.camera.push(CameraCommand::CenterOn(id));
                            self.search_query.clear();
                        }
                    }
                },
            );
        }
    }

    fn render_settings_menu(&mut self, ui: &mut egui::Ui) {
        ui.menu_button("⚙", |ui| {
            ui.label("Simulation");
            if ui
                .checkbox(&mut self.settings.physics_enabled, "Physics enabled")
                .changed()
            {
                if self.settings.physics_enabled {
                    self.layout.reheat(0.5);
                } else {
                    self.layout.stop();
                }
                self.mark_settings_dirty();
            }

            let mut changed = false;
            changed |= ui
                .add(egui::Slider::new(&mut self.settings.charge, -600.0..=-50.0).text("Charge"))
                .changed();
            changed |= ui
                .add(egui::Slider::new(&mut self.settings.link_strength, 0.1..=1.0).text("Link"))
                .changed();
            changed |= ui
                .add(
                    egui::Slider::new(&mut self.settings.center_strength, 0.0..=1.0)
                        .text("Centering"),
                )
                .changed();
            changed |= ui
                .add(
                    egui::Slider::new(&mut self.settings.collision_radius, 10.0..=60.0)
                        .text("Collision radius"),
                )
                .changed();

            if changed {
                self.layout.charge = self.settings.charge;
                self.layout.link_strength = self.settings.link_strength;
                self.layout.center_strength = self.settings.center_strength;
                self.layout.collision_radius = self.settings.collision_radius;
                self.layout.reheat(0.3);
                self.mark_settings_dirty();
            }

            ui.separator();
            if ui
                .checkbox(&mut self.settings.show_titles, "Show titles")
                .changed()
            {
                self.mark_settings_dirty();
            }

            ui.separator();
            ui.label("Categories");
            for category in theme::CATEGORIES {
                ui.horizontal(|ui| {
                    ui.colored_label(theme::category_style(category).stroke, "●");
                    ui.label(*category);
                });
            }
        });
    }

    fn render_detail_panel(&mut self, ui: &mut egui::Ui) {
        let Some(id) = self.selected.clone() else {
            return;
        };

        let Some(entry) = self.entry(&id).cloned() else {
            ui.label("Entry no longer exists");
            return;
        };

        ui.add_space(6.0);
        ui.heading(&entry.title);
        ui.horizontal(|ui| {
            let style = theme::category_style(&entry.category);
            let category = if entry.category.is_empty() {
                "Other"
            } else {
                entry.category.as_str()
            };
            ui.colored_label(style.stroke, category);
            if !entry.enabled {
                ui.weak("(disabled)");
            }
        });

        if !entry.description.is_empty() {
            ui.add_space(4.0);
            ui.label(&entry.description);
        }
        if !entry.tags.is_empty() {
            ui.add_space(4.0);
            ui.weak(entry.tags.join(", "));
        }

        // Relationship draft form, opened by dropping a node on another
        if self.draft.is_some() {
            ui.separator();
            self.render_draft_form(ui);
        }

        ui.separator();
        ui.strong("Relations");

        let outgoing: Vec<String> = self
            .data
            .relations
            .iter()
            .filter(|r| r.source == id)
            .map(|r| {
                format!(
                    "→ {} {} (w{})",
                    r.kind.label(),
                    self.entry_title(&r.target),
                    r.weight
                )
            })
            .collect();
        let incoming: Vec<String> = self
            .data
            .relations
            .iter()
            .filter(|r| r.target == id)
            .map(|r| {
                format!(
                    "← {} {} (w{})",
                    r.kind.inverse().label(),
                    self.entry_title(&r.source),
                    r.weight
                )
            })
            .collect();

        if outgoing.is_empty() && incoming.is_empty() {
            ui.weak("No relations yet. Drag this node onto another to link them.");
        }
        for line in outgoing.iter().chain(incoming.iter()) {
            ui.label(line);
        }
    }

    fn render_draft_form(&mut self, ui: &mut egui::Ui) {
        let (source_title, target_title) = match &self.draft {
            Some(d) => (self.entry_title(&d.source), self.entry_title(&d.target)),
            None => return,
        };

        let mut confirm = false;
        let mut cancel = false;

        if let Some(draft) = &mut self.draft {
            ui.strong("New relationship");
            ui.label(format!("{} → {}", source_title, target_title));

            egui::ComboBox::from_id_salt("draft_kind")
                .selected_text(draft.kind.label())
                .show_ui(ui, |ui| {
                    for &kind in RelationKind::all() {
                        ui.selectable_value(&mut draft.kind, kind, kind.label());
                    }
                });
            ui.add(egui::Slider::new(&mut draft.weight, 1..=10).text("Weight"));

            ui.horizontal(|ui| {
                confirm = ui.button("Create").clicked();
                cancel = ui.button("Cancel").clicked();
            });
        }

        if confirm {
            self.confirm_draft();
        } else if cancel {
            self.draft = None;
        }
    }

    fn render_graph(&mut self, ui: &mut egui::Ui, dt: f32) -> Vec<GraphEvent> {
        let mut events = Vec::new();

        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
        let rect = response.rect;

        // Degenerate viewport: render nothing, simulate nothing
        if !viewport_ready(rect.size()) {
            return events;
        }
        let viewport = rect.size();

        if self.needs_rebuild {
            scene::rebuild(&mut self.state, &self.data, viewport, &mut rand::thread_rng());
            self.needs_rebuild = false;
        }

        // Gestures first; they cancel programmatic animations
        let hover_pos = response.hover_pos();
        let scroll_delta = ui.input(|i| i.smooth_scroll_delta);
        let zoom_delta = ui.input(|i| i.zoom_delta());

        if !self.drag.is_dragging() {
            if self.panning && response.dragged_by(egui::PointerButton::Primary) {
                self.camera.pan_by(response.drag_delta());
            }
            if scroll_delta != Vec2::ZERO && response.hovered() {
                self.camera.pan_by(scroll_delta);
            }
            if let Some(cursor) = hover_pos {
                if zoom_delta != 1.0 {
                    self.camera
                        .zoom_at((cursor - rect.min).to_pos2(), zoom_delta);
                }
            }
        }

        // Camera commands, animations, and selection-follow
        self.camera
            .tick(dt, &self.state, viewport, self.selected.as_deref());
        let transform = self.camera.transform();
        let scale = transform.scale;
        if (scale - self.last_scale).abs() > 1e-3 {
            self.last_scale = scale;
            events.push(GraphEvent::ZoomChanged(scale));
        }

        let to_screen = |p: Pos2| rect.min + transform.apply(p).to_vec2();
        let to_world = |p: Pos2| transform.invert((p - rect.min).to_pos2());

        // Pointer interaction: pin/unpin must run even while energy is high
        let pointer_hit = hover_pos.and_then(|p| hit_node(&self.state, &transform, rect, p));

        if response.drag_started_by(egui::PointerButton::Primary) {
            match self.drag_candidate(response.interact_pointer_pos(), rect) {
                Some(node) => self.drag.begin(&mut self.state, &mut self.layout, node),
                None => self.panning = true,
            }
        }
        if self.drag.is_dragging() {
            if let Some(pointer) = response.interact_pointer_pos() {
                self.drag.update(&mut self.state, to_world(pointer));
            }
        }
        if response.drag_stopped() {
            self.panning = false;
            if let Some((source, target)) = self.drag.finish(&mut self.state, &mut self.layout) {
                events.push(GraphEvent::NodeDroppedOnNode(source, target));
            }
        }

        // Hover and click resolve against pre-step positions
        if !self.drag.is_dragging() {
            let new_hovered = pointer_hit.map(|i| self.state.nodes[i].id.clone());
            if new_hovered != self.hovered {
                self.hovered = new_hovered.clone();
                events.push(GraphEvent::HoverChanged(new_hovered));
            }
        }
        if response.clicked() {
            match pointer_hit {
                Some(node) => {
                    events.push(GraphEvent::NodeClicked(self.state.nodes[node].id.clone()))
                }
                None => events.push(GraphEvent::BackgroundClicked),
            }
        }

        // Physics
        if self.settings.physics_enabled {
            let center = Pos2::new(viewport.x / 2.0, viewport.y / 2.0);
            self.layout.step(&mut self.state, center);
        }

        // Presentation
        let pal = theme::palette(self.settings.dark_mode);
        painter.rect_filled(rect, 0.0, pal.canvas);

        let pending_id: Option<String> = self
            .drag
            .snap_target()
            .map(|i| self.state.nodes[i].id.clone())
            .or_else(|| self.draft.as_ref().map(|d| d.target.clone()));

        let (node_visuals, edge_visuals) = style::project(
            &self.state,
            self.selected.as_deref(),
            self.hovered.as_deref(),
            pending_id.as_deref(),
        );

        // Layer 1: edges
        for (edge, vis) in self.state.edges.iter().zip(&edge_visuals) {
            let source = &self.state.nodes[edge.source];
            let target = &self.state.nodes[edge.target];

            let delta = target.pos - source.pos;
            let dist = delta.length().max(1.0);
            let dir = delta / dist;
            let a = source.pos + dir * EDGE_SOURCE_OFFSET;
            let b = target.pos - dir * EDGE_TARGET_OFFSET;

            let base = if vis.active {
                pal.link_active
            } else {
                pal.link_default
            };
            let color = base.gamma_multiply(vis.opacity);
            painter.line_segment([to_screen(a), to_screen(b)], Stroke::new(1.5 * scale, color));

            if vis.arrow {
                let perp = Vec2::new(-dir.y, dir.x);
                let tip = target.pos - dir * (NODE_RADIUS + 3.0);
                let left = tip - dir * 10.0 + perp * 5.0;
                let right = tip - dir * 10.0 - perp * 5.0;
                painter.add(egui::Shape::convex_polygon(
                    vec![to_screen(tip), to_screen(left), to_screen(right)],
                    color,
                    Stroke::NONE,
                ));
            }

            if vis.label {
                let mid = to_screen(source.pos + delta * 0.5);
                let galley = painter.layout_no_wrap(
                    edge.kind.label().to_string(),
                    FontId::proportional(10.0 * scale),
                    pal.link_active,
                );
                let text_pos = mid - galley.size() / 2.0;
                painter.rect_filled(
                    Rect::from_min_size(text_pos, galley.size()).expand(2.0 * scale),
                    2.0,
                    pal.halo.gamma_multiply(0.8),
                );
                painter.galley(text_pos, galley, pal.link_active);
            }
        }

        // Layer 2: drag indicator toward the snap candidate
        if let DragPhase::Snapped { node, target } = self.drag.phase() {
            let from = to_screen(self.state.nodes[node].pos);
            let to = to_screen(self.state.nodes[target].pos);
            painter.extend(egui::Shape::dashed_line(
                &[from, to],
                Stroke::new(2.0 * scale, theme::PENDING),
                6.0 * scale,
                4.0 * scale,
            ));
        }

        // Layer 3: draft connector, rendered above the drag indicator
        if let (Some(selected), Some(draft)) = (self.selected.as_deref(), &self.draft) {
            if let (Some(source), Some(target)) =
                (self.state.node(selected), self.state.node(&draft.target))
            {
                painter.extend(egui::Shape::dashed_line(
                    &[to_screen(source.pos), to_screen(target.pos)],
                    Stroke::new(3.0 * scale, theme::PENDING),
                    6.0 * scale,
                    4.0 * scale,
                ));
            }
        }

        // Layer 4: nodes
        for (node, vis) in self.state.nodes.iter().zip(&node_visuals) {
            let center = to_screen(node.pos);
            let cat = theme::category_style(&node.category);

            painter.circle_filled(
                center,
                vis.fill_radius * scale,
                cat.fill.gamma_multiply(vis.opacity),
            );

            let ring = Stroke::new(
                vis.ring_width * scale,
                cat.stroke.gamma_multiply(vis.opacity * vis.ring_opacity),
            );
            if vis.ring_dashed {
                dashed_circle(&painter, center, vis.radius * scale, ring);
            } else {
                painter.circle_stroke(center, vis.radius * scale, ring);
            }

            if self.settings.show_titles {
                painter.text(
                    center + Vec2::new(0.0, 35.0 * scale),
                    Align2::CENTER_CENTER,
                    truncate(&node.title, 15),
                    FontId::proportional(12.0 * scale),
                    pal.text.gamma_multiply(vis.opacity),
                );
            }
        }

        // Loading/empty indicator
        if self.loading {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "Loading...",
                FontId::proportional(24.0),
                pal.text_muted,
            );
        } else if self.state.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No entries to display",
                FontId::proportional(18.0),
                pal.text_muted,
            );
        }

        events
    }

    /// Node under the pointer, for starting a drag
    fn drag_candidate(&self, pointer: Option<Pos2>, rect: Rect) -> Option<usize> {
        pointer.and_then(|p| hit_node(&self.state, &self.camera.transform(), rect, p))
    }
}

impl eframe::App for ExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32().min(0.1);
        self.last_frame = now;

        self.poll_fetch();

        ctx.set_visuals(if self.settings.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        });

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.render_toolbar(ui);
        });

        if self.selected.is_some() {
            let pal = theme::palette(self.settings.dark_mode);
            egui::SidePanel::right("detail_panel")
                .exact_width(PANEL_WIDTH)
                .resizable(false)
                .frame(egui::Frame::side_top_panel(&ctx.style()).fill(pal.panel))
                .show(ctx, |ui| {
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        self.render_detail_panel(ui);
                    });
                });
        }

        let mut events = Vec::new();
        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                events = self.render_graph(ui, dt);
            });
        let had_events = !events.is_empty();
        self.handle_events(events);

        self.maybe_save_settings();

        // Keep frames coming while anything is in motion, and for one more
        // frame after events so the camera sees selection changes
        if !self.layout.is_settled() || self.camera.is_busy() || self.loading || had_events {
            ctx.request_repaint();
        }
    }
}

/// Below one pixel in either dimension the host container is not ready
fn viewport_ready(size: Vec2) -> bool {
    size.x >= 1.0 && size.y >= 1.0
}

/// Topmost node within clickable range of a screen position
fn hit_node(state: &GraphState, transform: &Transform, rect: Rect, screen: Pos2) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    // Hover/click range follows the rendered radius, with a floor so deep
    // zoom-out still allows picking
    let range = ((NODE_RADIUS + 2.0) * transform.scale * 1.5).max(8.0);

    for (i, node) in state.nodes.iter().enumerate() {
        let pos = rect.min + transform.apply(node.pos).to_vec2();
        let distance = pos.distance(screen);
        if distance <= range && best.map_or(true, |(_, d)| distance < d) {
            best = Some((i, distance));
        }
    }

    best.map(|(i, _)| i)
}

/// Dashed ring approximation: alternating segments of a 24-gon
fn dashed_circle(painter: &egui::Painter, center: Pos2, radius: f32, stroke: Stroke) {
    const SEGMENTS: usize = 24;
    for i in (0..SEGMENTS).step_by(2) {
        let a0 = i as f32 / SEGMENTS as f32 * std::f32::consts::TAU;
        let a1 = (i + 1) as f32 / SEGMENTS as f32 * std::f32::consts::TAU;
        painter.line_segment(
            [
                center + Vec2::angled(a0) * radius,
                center + Vec2::angled(a1) * radius,
            ],
            stroke,
        );
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

/// Case-insensitive match over title and tags (query already lowercased)
fn entry_matches(entry: &Entity, query: &str) -> bool {
    entry.title.to_lowercase().contains(query)
        || entry.tags.iter().any(|t| t.to_lowercase().contains(query))
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod app_tests;
