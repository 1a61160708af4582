use std::sync::Arc;
use std::time::Duration;

use instant::Instant;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::config::Settings;
use crate::input::{self, Key, KeyAction};
use crate::render::atlas::SpriteAtlas;
use crate::render::instance::SpriteInstance;
use crate::render::GpuState;
use crate::scene::Scene;
use crate::signal::scheduler::{FrameScheduler, RequestToken};
use crate::signal::{FrameHub, FRAME_TOPIC};

/// Initial window size in logical pixels.
const WINDOW_WIDTH: f64 = 960.0;
const WINDOW_HEIGHT: f64 = 540.0;
/// How often to log FPS, in frame-clock milliseconds.
const FPS_LOG_INTERVAL_MS: f64 = 5000.0;
/// Sprites on screen at once, roughly.
const INITIAL_INSTANCE_CAPACITY: usize = 128;

// ---------------------------------------------------------------------------
// Frame timing
// ---------------------------------------------------------------------------

/// One reporting window of frame gaps.
#[derive(Debug, Clone, Copy, PartialEq)]
struct FrameSummary {
    fps: f64,
    avg_ms: f64,
    min_ms: f64,
    max_ms: f64,
    total_frames: u64,
}

/// Gaps between delivered tick timestamps, summarized once per window.
#[derive(Default)]
struct FrameStats {
    total_frames: u64,
    window_start_ms: Option<f64>,
    last_tick_ms: Option<f64>,
    gaps: u32,
    gap_sum_ms: f64,
    gap_min_ms: f64,
    gap_max_ms: f64,
}

impl FrameStats {
    /// Feed one delivered frame. Returns a summary when a window closes.
    fn record(&mut self, timestamp_ms: f64) -> Option<FrameSummary> {
        self.total_frames += 1;
        let window_start = *self.window_start_ms.get_or_insert(timestamp_ms);

        if let Some(last) = self.last_tick_ms.replace(timestamp_ms) {
            let gap = timestamp_ms - last;
            if self.gaps == 0 {
                self.gap_min_ms = gap;
                self.gap_max_ms = gap;
            }
            self.gaps += 1;
            self.gap_sum_ms += gap;
            self.gap_min_ms = self.gap_min_ms.min(gap);
            self.gap_max_ms = self.gap_max_ms.max(gap);
        }

        let span_ms = timestamp_ms - window_start;
        if span_ms < FPS_LOG_INTERVAL_MS || self.gaps == 0 {
            return None;
        }

        let summary = FrameSummary {
            fps: self.gaps as f64 * 1000.0 / span_ms,
            avg_ms: self.gap_sum_ms / self.gaps as f64,
            min_ms: self.gap_min_ms,
            max_ms: self.gap_max_ms,
            total_frames: self.total_frames,
        };
        self.window_start_ms = Some(timestamp_ms);
        self.gaps = 0;
        self.gap_sum_ms = 0.0;
        Some(summary)
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// Top-level application state.
struct App {
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,

    // Sprite sheet, generated once and shared by CPU and GPU
    atlas: SpriteAtlas,

    // Per-frame signal: scheduler fires, hub fans out to animators
    scheduler: FrameScheduler,
    pending_frame: Option<RequestToken>,
    hub: FrameHub,

    scene: Scene,

    // All frame timestamps are milliseconds since this instant
    clock_origin: Instant,

    frame_stats: FrameStats,

    // Reusable instance buffer (avoid per-frame allocation)
    instance_buf: Vec<SpriteInstance>,
}

impl App {
    fn new(settings: Settings) -> Self {
        Self {
            window: None,
            gpu: None,
            atlas: SpriteAtlas::generate(),
            scheduler: FrameScheduler::new(settings.cadence),
            pending_frame: None,
            hub: FrameHub::new(),
            scene: Scene::new(WINDOW_WIDTH as f32, WINDOW_HEIGHT as f32, settings.bee_count),
            clock_origin: Instant::now(),
            frame_stats: FrameStats::default(),
            instance_buf: Vec::with_capacity(INITIAL_INSTANCE_CAPACITY),
        }
    }

    fn now_ms(&self) -> f64 {
        self.clock_origin.elapsed().as_secs_f64() * 1000.0
    }

    /// Handle a redraw: deliver the armed frame if it is due, then paint.
    fn on_redraw(&mut self) {
        let now = self.now_ms();
        let Some(tick) = self.scheduler.poll(now) else {
            // Redraw without a due frame (expose, resize): repaint the last frame.
            if let Some(gpu) = &self.gpu {
                gpu.render_frame();
            }
            return;
        };

        // Re-arm before doing the frame's work, like a requestAnimationFrame loop.
        self.pending_frame = Some(self.scheduler.request_next_frame(now));

        let notified = self.hub.publish(FRAME_TOPIC, &tick);
        if let Some(stats) = self.frame_stats.record(tick.timestamp_ms) {
            log::info!(
                "FPS: {:.0} | avg: {:.2}ms | min: {:.2}ms | max: {:.2}ms | frames: {} | animators: {} running, {} notified",
                stats.fps,
                stats.avg_ms,
                stats.min_ms,
                stats.max_ms,
                stats.total_frames,
                self.scene.running_animators(),
                notified,
            );
        }
        self.scene.update();
        self.scene
            .build_instances(&self.atlas, &mut self.instance_buf);

        if let Some(gpu) = &mut self.gpu {
            gpu.update_instances(&self.instance_buf);
            gpu.render_frame();
        }
    }

    fn on_key(&mut self, event_loop: &ActiveEventLoop, key: Key, action: KeyAction) {
        if key == Key::Escape {
            if action == KeyAction::Pressed {
                log::info!("ESC pressed, exiting");
                event_loop.exit();
            }
            return;
        }
        let now = self.now_ms();
        if let Err(e) = self.scene.handle_key(key, action, &mut self.hub, now) {
            log::warn!("ignoring {key:?} {action:?}: {e}");
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title("spriteloop")
            .with_inner_size(winit::dpi::LogicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT));

        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        log::info!("Window created: {}x{}", size.width, size.height);

        let gpu = match GpuState::new(window.clone(), &self.atlas) {
            Ok(gpu) => gpu,
            Err(e) => {
                log::error!("GPU init failed: {e}");
                event_loop.exit();
                return;
            }
        };
        self.gpu = Some(gpu);
        log::info!(
            "wgpu + sprite pipeline initialized ({}x{} atlas)",
            self.atlas.width,
            self.atlas.height
        );

        self.scene.resize(size.width as f32, size.height as f32);
        let now = self.now_ms();
        if let Err(e) = self.scene.start(&mut self.hub, now) {
            log::error!("Scene setup failed: {e}");
            event_loop.exit();
            return;
        }

        self.pending_frame = Some(self.scheduler.request_next_frame(now));
        log::info!("Frame cadence: {}", self.scheduler.cadence().label());

        self.window = Some(window);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(window) = &self.window else {
            return;
        };

        match self.scheduler.deadline_ms() {
            Some(due) if due <= self.now_ms() => {
                window.request_redraw();
                event_loop.set_control_flow(ControlFlow::Poll);
            }
            Some(due) => {
                let wake = self.clock_origin + Duration::from_secs_f64(due / 1000.0);
                event_loop.set_control_flow(ControlFlow::WaitUntil(wake));
            }
            None => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size.width, new_size.height);
                }
                if new_size.width > 0 && new_size.height > 0 {
                    self.scene
                        .resize(new_size.width as f32, new_size.height as f32);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let Some((key, action)) = input::translate(&event) {
                    self.on_key(event_loop, key, action);
                }
            }
            WindowEvent::RedrawRequested => self.on_redraw(),
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(token) = self.pending_frame.take() {
            self.scheduler.cancel_request(token);
        }
        self.scene.stop(&mut self.hub);
        let leftover = self.hub.subscriber_count(FRAME_TOPIC);
        if leftover > 0 {
            log::warn!("{leftover} frame handlers still registered at shutdown");
        }
        self.hub.clear();
        log::info!(
            "Shut down after {} frames",
            self.scheduler.frames_delivered()
        );
    }
}

/// Entry point: create the event loop and run.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env();
    log::info!("Settings: {:?}", settings);

    let event_loop = EventLoop::new()?;
    let mut app = App::new(settings);
    event_loop.run_app(&mut app)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stays_quiet_inside_a_window() {
        let mut stats = FrameStats::default();
        for i in 0..300 {
            assert_eq!(stats.record(i as f64 * 16.0), None);
        }
    }

    #[test]
    fn summarizes_gaps_once_the_window_closes() {
        let mut stats = FrameStats::default();
        let mut now = 0.0;
        let mut summary = None;
        // Alternate 10 ms and 30 ms gaps until five seconds have passed.
        for i in 0..260 {
            summary = stats.record(now);
            if summary.is_some() {
                break;
            }
            now += if i % 2 == 0 { 10.0 } else { 30.0 };
        }
        let summary = summary.expect("window should close at 5000 ms");
        assert_eq!(now, 5000.0);
        assert_eq!(summary.total_frames, 251);
        assert_eq!(summary.fps, 50.0);
        assert_eq!(summary.avg_ms, 20.0);
        assert_eq!(summary.min_ms, 10.0);
        assert_eq!(summary.max_ms, 30.0);

        // The next window starts fresh from the closing frame.
        assert_eq!(stats.record(5016.0), None);
    }
}
