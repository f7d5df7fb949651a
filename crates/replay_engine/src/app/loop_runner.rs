use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use crate::playback::{Playback, PlaybackError, PlaybackObserver, PlaybackStatus, Slot};
use crate::replay::{Phase, Replay, Turn};

use super::input::{ActionStates, InputAction};
use super::metrics::MetricsAccumulator;
use super::pacing::{non_zero_or, FramePacer, DEFAULT_MAX_FRAME_DELTA};
use super::rendering::{
    build_hud_lines, FrameOptions, HudData, RenderStyle, Renderer, SpriteSet, Viewport,
};

pub const MIN_SPEED: f64 = 0.125;
pub const MAX_SPEED: f64 = 64.0;
pub const DEFAULT_SPEED: f64 = 2.0;
pub const DEFAULT_SCALE: u32 = 10;

const DEFAULT_METRICS_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub window_title: String,
    /// Pixels per map cell.
    pub scale: u32,
    /// Turns per second.
    pub speed: f64,
    /// `None` or `Some(0)` renders uncapped.
    pub max_render_fps: Option<u32>,
    pub show_grid: bool,
    pub show_hud: bool,
    pub max_frame_delta: Duration,
    pub metrics_log_interval: Duration,
    /// Directory holding the hill and water sprites. Shapes are drawn without it.
    pub asset_dir: Option<PathBuf>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window_title: "Ants Replay Visualizer".to_string(),
            scale: DEFAULT_SCALE,
            speed: DEFAULT_SPEED,
            max_render_fps: Some(60),
            show_grid: false,
            show_hud: true,
            max_frame_delta: DEFAULT_MAX_FRAME_DELTA,
            metrics_log_interval: DEFAULT_METRICS_INTERVAL,
            asset_dir: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to open viewer window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("failed to present frame: {0}")]
    Render(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
    #[error("playback failed: {0}")]
    Playback(#[from] PlaybackError),
}

/// Opens a window sized to the map and plays `replay` until it is closed.
pub fn run_viewer(config: ViewerConfig, replay: Replay) -> Result<(), AppError> {
    let style = RenderStyle::new(config.scale);
    let sprites = match &config.asset_dir {
        Some(dir) => SpriteSet::load_from_dir(dir),
        None => SpriteSet::empty(),
    };
    let buffer = Viewport::for_map(replay.map(), style.scale);

    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(buffer.width as f64, buffer.height as f64))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let renderer = Renderer::new(Arc::clone(&window), buffer).map_err(AppError::CreateRenderer)?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let pacer = FramePacer::new(config.max_frame_delta, config.max_render_fps);
    let metrics_interval = non_zero_or(config.metrics_log_interval, DEFAULT_METRICS_INTERVAL);
    let session = ViewerSession::new(&config, replay);

    info!(
        map_width = session.playback.replay().map().width,
        map_height = session.playback.replay().map().height,
        scale = style.scale,
        speed = session.playback.speed(),
        max_frame_delta_ms = pacer.max_frame_delta().as_millis() as u64,
        metrics_log_interval_ms = metrics_interval.as_millis() as u64,
        render_fps_cap = %pacer.cap_label(),
        hill_sprite = sprites.hill_alive.is_some(),
        water_sprite = sprites.water.is_some(),
        "viewer_config"
    );

    let mut viewer = ViewerLoop {
        session,
        renderer,
        style,
        sprites,
        pacer,
        actions: ActionStates::default(),
        metrics: MetricsAccumulator::new(metrics_interval),
        last_frame: Instant::now(),
        last_present: Instant::now(),
        last_fps: 0.0,
    };
    let mut failure: Option<AppError> = None;

    let run_result = event_loop.run(|event, window_target| match event {
        Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
            WindowEvent::CloseRequested => {
                info!(reason = "window_close", "shutdown_requested");
                window_target.exit();
            }
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                let size = window.inner_size();
                if let Err(error) = viewer.renderer.resize(size.width, size.height) {
                    warn!(error = %error, "renderer_resize_failed");
                    window_target.exit();
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let Some(action) = InputAction::from_physical_key(event.physical_key) {
                    viewer
                        .actions
                        .set(action, event.state == ElementState::Pressed);
                }
            }
            WindowEvent::RedrawRequested => match viewer.redraw() {
                Ok(SessionCommand::Continue) => {}
                Ok(SessionCommand::Quit) => {
                    info!(reason = "escape_key", "shutdown_requested");
                    window_target.exit();
                }
                Err(frame_error) => {
                    failure = Some(frame_error);
                    window_target.exit();
                }
            },
            _ => {}
        },
        Event::AboutToWait => {
            viewer.renderer.window().request_redraw();
        }
        Event::LoopExiting => {
            info!("shutdown");
        }
        _ => {}
    });

    match failure {
        Some(error) => Err(error),
        None => run_result.map_err(AppError::EventLoopRun),
    }
}

/// Everything one redraw touches.
struct ViewerLoop {
    session: ViewerSession,
    renderer: Renderer,
    style: RenderStyle,
    sprites: SpriteSet,
    pacer: FramePacer,
    actions: ActionStates,
    metrics: MetricsAccumulator,
    last_frame: Instant,
    last_present: Instant,
    last_fps: f32,
}

impl ViewerLoop {
    fn redraw(&mut self) -> Result<SessionCommand, AppError> {
        let now = Instant::now();
        let frame_dt = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;

        let mut command = SessionCommand::Continue;
        for action in self.actions.drain_pressed() {
            if self.session.handle_action(action) == SessionCommand::Quit {
                command = SessionCommand::Quit;
            }
        }

        let played_before = self.session.playback.clock().elapsed();
        let dt = self.pacer.clamp(frame_dt).as_secs_f64();
        let status = match self.session.playback.tick_with(dt, &mut PlaybackLog) {
            Ok(status) => status,
            Err(playback_error) => {
                error!(error = %playback_error, "playback_failed");
                return Err(playback_error.into());
            }
        };
        self.metrics
            .record_simulated(self.session.playback.clock().elapsed() - played_before);

        let idle = self
            .pacer
            .idle_before_present(Instant::now().saturating_duration_since(self.last_present));
        if !idle.is_zero() {
            thread::sleep(idle);
        }

        let hud_lines = self
            .session
            .show_hud
            .then(|| build_hud_lines(&self.session.hud_data(&status, self.last_fps), &self.style));
        let options = FrameOptions {
            show_grid: self.session.show_grid,
        };
        if let Err(render_error) = self.renderer.render_frame(
            self.session.playback.registry(),
            &self.style,
            &self.sprites,
            options,
            hud_lines.as_deref(),
        ) {
            error!(error = %render_error, "renderer_draw_failed");
            return Err(AppError::Render(render_error));
        }
        self.last_present = Instant::now();
        self.metrics.record_frame(frame_dt);

        if let Some(snapshot) = self.metrics.maybe_snapshot(now) {
            self.last_fps = snapshot.fps;
            info!(
                fps = snapshot.fps,
                frame_time_ms = snapshot.frame_time_ms,
                worst_frame_ms = snapshot.worst_frame_ms,
                turns_per_second = snapshot.turns_per_second,
                entity_count = self.session.playback.registry().len(),
                "loop_metrics"
            );
        }

        Ok(command)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionCommand {
    Continue,
    Quit,
}

/// Viewer state that input can change: the playback's speed and pause flag,
/// and the grid and HUD toggles.
#[derive(Debug)]
struct ViewerSession {
    playback: Playback,
    show_grid: bool,
    show_hud: bool,
}

impl ViewerSession {
    fn new(config: &ViewerConfig, replay: Replay) -> Self {
        Self {
            playback: Playback::new(replay, clamp_speed(config.speed)),
            show_grid: config.show_grid,
            show_hud: config.show_hud,
        }
    }

    fn handle_action(&mut self, action: InputAction) -> SessionCommand {
        match action {
            InputAction::Quit => return SessionCommand::Quit,
            InputAction::TogglePause => {
                let paused = !self.playback.is_paused();
                self.playback.set_paused(paused);
                info!(paused, "pause_toggled");
            }
            InputAction::SpeedUp | InputAction::SlowDown => {
                let factor = if action == InputAction::SpeedUp { 2.0 } else { 0.5 };
                let speed = clamp_speed(self.playback.speed() * factor);
                self.playback.set_speed(speed);
                info!(speed, "speed_changed");
            }
            InputAction::ToggleGrid => {
                self.show_grid = !self.show_grid;
                debug!(show_grid = self.show_grid, "grid_toggled");
            }
            InputAction::ToggleHud => {
                self.show_hud = !self.show_hud;
                debug!(show_hud = self.show_hud, "hud_toggled");
            }
        }
        SessionCommand::Continue
    }

    fn hud_data<'a>(&'a self, status: &'a PlaybackStatus, fps: f32) -> HudData<'a> {
        let replay = self.playback.replay();
        let (turn_number, phase, finished_reason) = match status {
            PlaybackStatus::Playing { turn, phase, .. } => (*turn, *phase, None),
            PlaybackStatus::Finished { reason } => {
                (replay.last_turn_number(), Phase::Remove, Some(reason.as_str()))
            }
        };
        HudData {
            turn: replay.turn(turn_number),
            last_turn: replay.last_turn_number(),
            phase,
            speed: self.playback.speed(),
            paused: self.playback.is_paused(),
            finished_reason,
            fps,
        }
    }
}

struct PlaybackLog;

impl PlaybackObserver for PlaybackLog {
    fn bucket_applied(&mut self, slot: Slot, event_count: usize) {
        if event_count > 0 {
            debug!(
                turn = slot.turn,
                phase = %slot.phase,
                event_count,
                "bucket_applied"
            );
        }
    }

    fn turn_completed(&mut self, turn: &Turn) {
        debug!(
            turn = turn.turn_number,
            ants = ?turn.ants,
            hive = ?turn.hive,
            scores = ?turn.scores,
            "turn_completed"
        );
    }

    fn finished(&mut self, reason: &str) {
        info!(reason, "playback_finished");
    }
}

fn clamp_speed(speed: f64) -> f64 {
    if speed.is_finite() {
        speed.clamp(MIN_SPEED, MAX_SPEED)
    } else {
        DEFAULT_SPEED
    }
}
