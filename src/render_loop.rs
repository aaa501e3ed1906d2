//! Per-frame loop: advance time, ease the camera, draw.

use std::cell::OnceCell;
use std::time::Instant;

use anyhow::Result;
use log::error;

use crate::scene::SceneState;

/// Source of elapsed time since the loop started
pub trait Clock {
    /// Seconds since the clock started; monotonic, starts at 0
    fn elapsed(&self) -> f32;
}

/// Wall clock backed by [`Instant`]. Starts on its first reading, so setup
/// time before the first frame is not counted.
#[derive(Debug, Default)]
pub struct MonotonicClock {
    start: OnceCell<Instant>,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for MonotonicClock {
    fn elapsed(&self) -> f32 {
        self.start.get_or_init(Instant::now).elapsed().as_secs_f32()
    }
}

/// Clock advanced by hand (headless runs and tests)
#[derive(Debug, Default)]
pub struct ManualClock {
    elapsed_s: f32,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, elapsed_s: f32) {
        self.elapsed_s = elapsed_s.max(self.elapsed_s);
    }

    pub fn advance(&mut self, dt_s: f32) {
        self.elapsed_s += dt_s.max(0.0);
    }
}

impl Clock for ManualClock {
    fn elapsed(&self) -> f32 {
        self.elapsed_s
    }
}

/// Anything that can draw the scene from its camera
pub trait FrameRenderer {
    fn draw(&mut self, scene: &SceneState) -> Result<()>;
}

/// What the host should do after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Schedule the next frame on the next display refresh
    Continue,
    /// The loop was stopped; schedule nothing
    Stopped,
}

/// Render loop with an explicit stop flag.
///
/// The host calls [`RenderLoop::frame`] whenever the display is ready for
/// a new frame; nothing stops the loop except [`RenderLoop::stop`] or a
/// draw failure.
pub struct RenderLoop<C: Clock> {
    clock: C,
    running: bool,
    frames: u64,
}

impl<C: Clock> RenderLoop<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            running: true,
            frames: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Frames drawn so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Run one iteration. A draw error stops the loop and is returned.
    pub fn frame<R: FrameRenderer + ?Sized>(
        &mut self,
        scene: &mut SceneState,
        renderer: &mut R,
    ) -> Result<LoopState> {
        if !self.running {
            return Ok(LoopState::Stopped);
        }

        let elapsed_s = self.clock.elapsed();
        scene.uniforms.set_time(elapsed_s)?;

        scene.controls.update(&mut scene.camera);

        if let Err(e) = renderer.draw(scene) {
            error!("draw failed, stopping render loop: {e:#}");
            self.running = false;
            return Err(e);
        }

        self.frames += 1;
        Ok(LoopState::Continue)
    }

    /// Drive frames until stopped. `next_frame` blocks until the display is
    /// ready and returns `false` once no more refreshes will come.
    pub fn run<R, F>(
        &mut self,
        scene: &mut SceneState,
        renderer: &mut R,
        mut next_frame: F,
    ) -> Result<()>
    where
        R: FrameRenderer + ?Sized,
        F: FnMut(&mut Self) -> bool,
    {
        while self.running && next_frame(self) {
            self.frame(scene, renderer)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::RenderConfig;
    use crate::scene::{SceneParams, Viewport};
    use crate::uniforms::names;

    fn scene() -> SceneState {
        let config = RenderConfig {
            plane_segments: 4,
            ..RenderConfig::default()
        };
        SceneState::new(&SceneParams::default(), &config, Viewport::new(800.0, 600.0, 1.0))
            .unwrap()
    }

    /// Records what it saw at each draw
    #[derive(Default)]
    struct Recorder {
        times: Vec<f32>,
        fail_at: Option<usize>,
    }

    impl FrameRenderer for Recorder {
        fn draw(&mut self, scene: &SceneState) -> Result<()> {
            if self.fail_at == Some(self.times.len()) {
                anyhow::bail!("device lost");
            }
            self.times.push(scene.uniforms.float(names::TIME)?);
            Ok(())
        }
    }

    #[test]
    fn test_time_uniform_equals_elapsed() {
        let mut scene = scene();
        let mut renderer = Recorder::default();
        let mut render_loop = RenderLoop::new(ManualClock::new());

        for t in [0.0, 0.016, 1.5, 60.25, 3600.125] {
            render_loop.clock_mut().set(t);
            let state = render_loop.frame(&mut scene, &mut renderer).unwrap();
            assert_eq!(state, LoopState::Continue);
            assert_eq!(scene.uniforms.float(names::TIME).unwrap(), t);
        }
        assert_eq!(renderer.times, vec![0.0, 0.016, 1.5, 60.25, 3600.125]);
        assert_eq!(render_loop.frames(), 5);
    }

    #[test]
    fn test_stop_flag_halts_frames() {
        let mut scene = scene();
        let mut renderer = Recorder::default();
        let mut render_loop = RenderLoop::new(ManualClock::new());

        render_loop.stop();
        assert!(!render_loop.is_running());
        assert_eq!(
            render_loop.frame(&mut scene, &mut renderer).unwrap(),
            LoopState::Stopped
        );
        assert!(renderer.times.is_empty());
    }

    #[test]
    fn test_run_until_stopped() {
        let mut scene = scene();
        let mut renderer = Recorder::default();
        let mut render_loop = RenderLoop::new(ManualClock::new());

        render_loop
            .run(&mut scene, &mut renderer, |lp| {
                if lp.frames() == 10 {
                    lp.stop();
                }
                lp.clock_mut().advance(0.5);
                true
            })
            .unwrap();

        assert_eq!(render_loop.frames(), 10);
        assert_eq!(renderer.times.len(), 10);
        assert_eq!(renderer.times[0], 0.5);
        assert_eq!(*renderer.times.last().unwrap(), 5.0);
    }

    #[test]
    fn test_draw_failure_is_fatal() {
        let mut scene = scene();
        let mut renderer = Recorder {
            fail_at: Some(3),
            ..Recorder::default()
        };
        let mut render_loop = RenderLoop::new(ManualClock::new());

        let result = render_loop.run(&mut scene, &mut renderer, |lp| {
            lp.clock_mut().advance(0.1);
            true
        });

        assert!(result.is_err());
        assert!(!render_loop.is_running());
        assert_eq!(renderer.times.len(), 3);
    }

    #[test]
    fn test_frame_steps_damping() {
        let mut scene = scene();
        let mut renderer = Recorder::default();
        let mut render_loop = RenderLoop::new(ManualClock::new());

        scene.controls.rotate(200.0, 0.0, 600.0);
        let start = scene.camera.position;
        render_loop.frame(&mut scene, &mut renderer).unwrap();
        assert_ne!(scene.camera.position, start);
    }

    #[test]
    fn test_manual_clock_is_monotonic() {
        let mut clock = ManualClock::new();
        clock.set(2.0);
        clock.set(1.0);
        clock.advance(-5.0);
        assert_eq!(clock.elapsed(), 2.0);
    }

    #[test]
    fn test_monotonic_clock_starts_on_first_reading() {
        let clock = MonotonicClock::new();
        std::thread::sleep(std::time::Duration::from_millis(200));

        let first = clock.elapsed();
        assert!(first < 0.05, "first reading {first}");
        assert!(clock.elapsed() >= first);
    }

    #[test]
    fn test_first_frame_time_is_zero_after_setup_delay() {
        let mut scene = scene();
        let mut renderer = Recorder::default();
        let mut render_loop = RenderLoop::new(MonotonicClock::new());

        // Window and GPU setup happen between construction and the first frame
        std::thread::sleep(std::time::Duration::from_millis(300));

        render_loop.frame(&mut scene, &mut renderer).unwrap();
        assert!(renderer.times[0] < 0.05, "first frame time {}", renderer.times[0]);

        std::thread::sleep(std::time::Duration::from_millis(20));
        render_loop.frame(&mut scene, &mut renderer).unwrap();
        assert!(renderer.times[1] > renderer.times[0]);
    }
}
