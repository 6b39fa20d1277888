//! Electrostatics Demonstrations
//!
//! Balloon and paper on top, ruler and water below, each in its own
//! 600x400 container. Shows:
//! - Charging by friction (balloon on hair, ruler on wool)
//! - Induced attraction of neutral paper
//! - Polar water molecules pulled towards a charged ruler
//!
//! Controls:
//! - Drag: Move the balloon or the ruler
//! - B: Rub the balloon on the hair
//! - W: Rub the ruler with the wool
//! - R: Reset both experiments
//! - Escape: Quit

use common::{Camera2D, GraphicsContext};
use electrostatics::balloon::Balloon;
use electrostatics::constants::{CONTAINER_HEIGHT, CONTAINER_WIDTH};
use electrostatics::controller::{Action, Dispatcher};
use electrostatics::drag::Rect;
use electrostatics::equations_ui::{
    draw_equations_sidebar, draw_widget_overlay, water_labels, OverlayAction, APP_TITLE,
    BALLOON_LABELS, BALLOON_TEXT, ELECTROSTATICS_EQUATIONS, ELECTROSTATICS_VARIABLES, LESSON_SECTIONS, WATER_TEXT,
};
use electrostatics::jitter::ThreadJitter;
use electrostatics::renderer::{Layer, Renderer};
use electrostatics::scene::{balloon_scene, droplets, paper_poses, water_scene, Droplet, PaperPose};
use electrostatics::timer::FrameHandle;
use electrostatics::water::WaterStream;
use glam::Vec2;
use winit::{
    event::{ElementState, Event, KeyEvent, MouseButton, WindowEvent},
    event_loop::ControlFlow,
    keyboard::{KeyCode, PhysicalKey},
};

const MAX_VERTICES: usize = 60000;

/// Top-left corners of the two containers, in logical pixels
const BALLOON_ORIGIN: Vec2 = Vec2::new(20.0, 50.0);
const WATER_ORIGIN: Vec2 = Vec2::new(20.0, 470.0);

struct EguiState {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

/// One of the two experiments; also which object the pointer is holding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Experiment {
    Balloon,
    Water,
}

struct App {
    ctx: GraphicsContext,
    renderer: Renderer,
    camera: Camera2D,
    balloon: Dispatcher<Balloon>,
    water: Dispatcher<WaterStream>,
    water_frames: FrameHandle,
    jitter: ThreadJitter,
    // Paper poses only change when the balloon state does
    poses: Vec<PaperPose>,
    poses_revision: Option<u64>,
    droplets: Vec<Droplet>,
    cursor: Vec2,
    grab: Option<Experiment>,
    egui: EguiState,
}

fn container() -> Rect {
    Rect::from_size(CONTAINER_WIDTH, CONTAINER_HEIGHT)
}

impl App {
    fn new(ctx: GraphicsContext) -> Self {
        let camera = Camera2D::new(ctx.size.width, ctx.size.height, ctx.scale_factor());
        let renderer = Renderer::new(&ctx, &camera, MAX_VERTICES);

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &ctx.window,
            Some(ctx.window.scale_factor() as f32),
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&ctx.device, ctx.config.format, None, 1);

        Self {
            ctx,
            renderer,
            camera,
            balloon: Dispatcher::new(Balloon::new(Some(container()))),
            water: Dispatcher::new(WaterStream::new(Some(container()))),
            water_frames: FrameHandle::start("water"),
            jitter: ThreadJitter,
            poses: Vec::new(),
            poses_revision: None,
            droplets: Vec::new(),
            cursor: Vec2::ZERO,
            grab: None,
            egui: EguiState {
                ctx: egui_ctx,
                state: egui_state,
                renderer: egui_renderer,
            },
        }
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.ctx.resize(new_size);
        self.camera
            .resize(self.ctx.size.width, self.ctx.size.height, self.ctx.scale_factor());
    }

    fn update(&mut self, dt: f32) {
        self.balloon.dispatch(Action::FrameTick { dt });

        if let Some(request) = self.water_frames.pending() {
            if self.water_frames.fire(request) {
                self.water.dispatch(Action::FrameTick { dt });
                self.droplets = droplets(self.water.state().curvature, &mut self.jitter);
            }
        }

        if self.poses_revision != Some(self.balloon.revision()) {
            self.poses = paper_poses(&self.balloon.state().pieces, &mut self.jitter);
            self.poses_revision = Some(self.balloon.revision());
        }
    }

    fn apply_overlay(&mut self, experiment: Experiment, action: OverlayAction) {
        match (experiment, action) {
            (Experiment::Balloon, OverlayAction::Charge) => self.balloon.dispatch(Action::Charge),
            (Experiment::Balloon, OverlayAction::Reset) => self.balloon.dispatch(Action::Reset),
            (Experiment::Water, OverlayAction::Charge) => self.water.dispatch(Action::Charge),
            (Experiment::Water, OverlayAction::Reset) => {
                self.water.dispatch(Action::Reset);
                self.water_frames.rearm();
            }
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.renderer.update_camera(&self.ctx.queue, &self.camera);

        let balloon_shapes = balloon_scene(self.balloon.state(), &self.poses);
        let water_shapes = water_scene(self.water.state(), &self.droplets);
        let size = Vec2::new(CONTAINER_WIDTH, CONTAINER_HEIGHT);
        let batches = self.renderer.update_layers(
            &self.ctx.queue,
            &[
                Layer {
                    origin: BALLOON_ORIGIN,
                    size,
                    shapes: &balloon_shapes,
                },
                Layer {
                    origin: WATER_ORIGIN,
                    size,
                    shapes: &water_shapes,
                },
            ],
        );

        // Build egui UI
        let raw_input = self.egui.state.take_egui_input(&self.ctx.window);
        let balloon = self.balloon.state();
        let water = self.water.state();
        let mut balloon_action = None;
        let mut water_action = None;
        let full_output = self.egui.ctx.run(raw_input, |ctx| {
            egui::TopBottomPanel::top("status").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(format!("Globo: {}", balloon.charge.label()));
                    ui.separator();
                    ui.label(format!("Papel atraído: {}/{}", balloon.affected_count(), balloon.pieces.len()));
                    ui.separator();
                    ui.label(format!("Regla: {}", water.charge.label()));
                    ui.separator();
                    ui.label(format!("Curvatura: {:+.1}", water.curvature));
                    ui.separator();
                    if let Some(elapsed) = water.rubbing_elapsed() {
                        ui.label(
                            egui::RichText::new(format!("FROTANDO {elapsed:.1}s"))
                                .color(egui::Color32::YELLOW),
                        );
                    } else {
                        ui.label("B / W: cargar, R: reiniciar");
                    }
                });
            });

            draw_equations_sidebar(
                ctx,
                "Electrostática",
                LESSON_SECTIONS,
                ELECTROSTATICS_EQUATIONS,
                ELECTROSTATICS_VARIABLES,
            );

            for (origin, title) in [
                (BALLOON_ORIGIN, "Globo y trozos de papel"),
                (WATER_ORIGIN, "Regla y chorro de agua"),
            ] {
                egui::Area::new(egui::Id::new(title))
                    .fixed_pos(egui::pos2(origin.x, origin.y - 20.0))
                    .show(ctx, |ui| {
                        ui.label(egui::RichText::new(title).strong());
                    });
            }

            balloon_action = draw_widget_overlay(
                ctx,
                egui::pos2(BALLOON_ORIGIN.x, BALLOON_ORIGIN.y),
                &BALLOON_TEXT,
                BALLOON_LABELS,
                balloon.charge.can_charge(),
            );
            water_action = draw_widget_overlay(
                ctx,
                egui::pos2(WATER_ORIGIN.x, WATER_ORIGIN.y),
                &WATER_TEXT,
                &water_labels(water),
                water.charge.can_charge(),
            );
        });

        self.egui.state.handle_platform_output(&self.ctx.window, full_output.platform_output);
        let tris = self.egui.ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui.renderer.update_texture(&self.ctx.device, &self.ctx.queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.ctx.size.width, self.ctx.size.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.renderer.render(
            &mut encoder,
            &view,
            &batches,
            &self.camera,
            (self.ctx.size.width, self.ctx.size.height),
        );

        self.egui.renderer.update_buffers(
            &self.ctx.device,
            &self.ctx.queue,
            &mut encoder,
            &tris,
            &screen_descriptor,
        );
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.egui.renderer.render(&mut render_pass, &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui.renderer.free_texture(id);
        }

        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        if let Some(action) = balloon_action {
            self.apply_overlay(Experiment::Balloon, action);
        }
        if let Some(action) = water_action {
            self.apply_overlay(Experiment::Water, action);
        }

        Ok(())
    }

    fn handle_press(&mut self) {
        let local = self.cursor - BALLOON_ORIGIN;
        if container().contains(local) {
            self.balloon.dispatch(Action::DragStart { pointer: local });
            if self.balloon.state().is_dragging() {
                self.grab = Some(Experiment::Balloon);
            }
            return;
        }

        let local = self.cursor - WATER_ORIGIN;
        if container().contains(local) {
            self.water.dispatch(Action::DragStart { pointer: local });
            if self.water.state().is_dragging() {
                self.grab = Some(Experiment::Water);
            }
        }
    }

    fn handle_cursor(&mut self, x: f64, y: f64) {
        self.cursor = self.camera.screen_to_world(x, y);

        match self.grab {
            Some(Experiment::Balloon) => self.balloon.dispatch(Action::DragMove {
                pointer: self.cursor - BALLOON_ORIGIN,
            }),
            Some(Experiment::Water) => self.water.dispatch(Action::DragMove {
                pointer: self.cursor - WATER_ORIGIN,
            }),
            None => {}
        }
    }

    fn handle_release(&mut self) {
        match self.grab.take() {
            Some(Experiment::Balloon) => self.balloon.dispatch(Action::DragEnd),
            Some(Experiment::Water) => self.water.dispatch(Action::DragEnd),
            None => {}
        }
    }

    fn handle_key(&mut self, key: KeyCode, state: ElementState) {
        if state != ElementState::Pressed {
            return;
        }

        match key {
            KeyCode::KeyB => self.apply_overlay(Experiment::Balloon, OverlayAction::Charge),
            KeyCode::KeyW => self.apply_overlay(Experiment::Water, OverlayAction::Charge),
            KeyCode::KeyR => {
                self.grab = None;
                self.apply_overlay(Experiment::Balloon, OverlayAction::Reset);
                self.apply_overlay(Experiment::Water, OverlayAction::Reset);
            }
            _ => {}
        }
    }

    fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        self.egui.state.on_window_event(&self.ctx.window, event).consumed
    }

    /// Stop the redraw loop and drop pending timers before the window goes away
    fn unmount(&mut self) {
        self.water_frames.cancel();
        self.balloon.unmount();
        self.water.unmount();
    }
}

fn main() {
    let (ctx, event_loop) = pollster::block_on(GraphicsContext::new(
        APP_TITLE,
        1000,
        890,
    ));

    let mut app = App::new(ctx);

    let mut last_time = std::time::Instant::now();

    event_loop
        .run(move |event, elwt| {
            elwt.set_control_flow(ControlFlow::Poll);

            match event {
                Event::WindowEvent { ref event, .. } => {
                    let consumed = app.handle_window_event(event);

                    // A drag must end even when released over the sidebar
                    if let WindowEvent::MouseInput {
                        state: ElementState::Released,
                        button: MouseButton::Left,
                        ..
                    } = event
                    {
                        app.handle_release();
                    }

                    if !consumed {
                        match event {
                            WindowEvent::CloseRequested => {
                                app.unmount();
                                elwt.exit();
                            }
                            WindowEvent::Resized(size) => app.resize(*size),
                            WindowEvent::ScaleFactorChanged { .. } => {
                                let size = app.ctx.window.inner_size();
                                app.resize(size);
                            }
                            WindowEvent::MouseInput {
                                state: ElementState::Pressed,
                                button: MouseButton::Left,
                                ..
                            } => app.handle_press(),
                            WindowEvent::CursorMoved { position, .. } => {
                                app.handle_cursor(position.x, position.y)
                            }
                            WindowEvent::KeyboardInput {
                                event:
                                    KeyEvent {
                                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                                        state: ElementState::Pressed,
                                        ..
                                    },
                                ..
                            } => {
                                app.unmount();
                                elwt.exit();
                            }
                            WindowEvent::KeyboardInput {
                                event:
                                    KeyEvent {
                                        physical_key: PhysicalKey::Code(key),
                                        state,
                                        ..
                                    },
                                ..
                            } => app.handle_key(*key, *state),
                            WindowEvent::RedrawRequested => {
                                let now = std::time::Instant::now();
                                // Charging delay is wall-clock time, so no clamp
                                let dt = (now - last_time).as_secs_f32();
                                last_time = now;

                                app.update(dt);
                                match app.render() {
                                    Ok(_) => {}
                                    Err(wgpu::SurfaceError::Lost) => app.resize(app.ctx.size),
                                    Err(wgpu::SurfaceError::OutOfMemory) => {
                                        log::error!("out of GPU memory");
                                        elwt.exit();
                                    }
                                    Err(e) => log::error!("render error: {e:?}"),
                                }
                            }
                            _ => {}
                        }
                    }
                }
                Event::AboutToWait => {
                    app.ctx.window.request_redraw();
                }
                _ => {}
            }
        })
        .expect("Event loop error");
}
