/// Frame timing for the simulation loop.
///
/// The game integrates with a variable delta time, so the clock's job is
/// to measure the time between frames, keep that measurement sane when the
/// window stalls (drag, debugger, minimize), and track FPS for logging.
use std::time::{Duration, Instant};

/// Upper bound on a single frame's delta time. A stalled window otherwise
/// produces one giant integration step that tunnels through collision
/// blocks thinner than `velocity * dt`.
const MAX_FRAME_TIME: Duration = Duration::from_millis(250);

/// FPS tracking window (average over last N frames)
const FPS_WINDOW_SIZE: usize = 60;

/// Per-frame clock state
pub struct FrameClock {
    /// Time of last frame, None until the first `begin_frame`
    last_frame_time: Option<Instant>,

    /// Frame timing history for FPS calculation
    frame_times: Vec<Duration>,

    /// Current frame number
    frame_count: u64,

    /// Current FPS (updated periodically)
    current_fps: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last_frame_time: None,
            frame_times: Vec::with_capacity(FPS_WINDOW_SIZE),
            frame_count: 0,
            current_fps: 0.0,
        }
    }

    /// Begin a new frame, returning the delta time in seconds since the
    /// previous call. The very first frame reports 0.0; the simulation
    /// treats a zero delta as a no-op, so nothing moves until timing is
    /// established.
    pub fn begin_frame(&mut self) -> f32 {
        let now = Instant::now();
        self.frame_count += 1;

        let Some(last) = self.last_frame_time.replace(now) else {
            return 0.0;
        };

        let frame_time = now.duration_since(last).min(MAX_FRAME_TIME);

        self.frame_times.push(frame_time);
        if self.frame_times.len() > FPS_WINDOW_SIZE {
            self.frame_times.remove(0);
        }

        if self.frame_count % 10 == 0 {
            self.update_fps();
        }

        frame_time.as_secs_f32()
    }

    /// Get current FPS
    pub fn fps(&self) -> f32 {
        self.current_fps
    }

    /// Get total number of frames begun
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    fn update_fps(&mut self) {
        if self.frame_times.is_empty() {
            self.current_fps = 0.0;
            return;
        }

        let total: Duration = self.frame_times.iter().sum();
        let avg_frame_time = total / self.frame_times.len() as u32;

        self.current_fps = if avg_frame_time.as_secs_f32() > 0.0 {
            1.0 / avg_frame_time.as_secs_f32()
        } else {
            0.0
        };

        log::trace!("avg fps over last {} frames: {:.1}", self.frame_times.len(), self.current_fps);
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
