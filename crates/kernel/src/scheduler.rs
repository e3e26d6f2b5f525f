//! Frame scheduling for a world.
//!
//! The loop is driven from outside: a desktop app calls [`RenderLoop::frame`]
//! from its redraw callback, a headless run hands [`RenderLoop::run`] a
//! [`FrameSource`] that says when the next refresh is due. Either way, frame
//! N+1 never starts before frame N has returned.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crate::{World, WorldError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

/// Stops a render loop from anywhere, including other threads.
#[derive(Debug, Clone)]
pub struct LoopHandle(Arc<AtomicBool>);

impl LoopHandle {
    /// The loop finishes the frame in progress, if any, then stops.
    pub fn stop(&self) {
        self.0.store(false, Ordering::Relaxed);
    }

    pub fn is_alive(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// The per-world render loop.
///
/// A loop is bound to the world that started it; driving it with any other
/// world fails with [`WorldError::ForeignWorld`] and draws nothing.
#[derive(Debug)]
pub struct RenderLoop {
    world: u64,
    state: LoopState,
    alive: Arc<AtomicBool>,
    frames: u64,
}

impl RenderLoop {
    /// Start the world's loop. A world can only be started once.
    pub fn start(world: &mut World) -> Result<Self, WorldError> {
        world.claim_loop()?;
        tracing::info!(container = world.container(), "render loop started");
        Ok(Self {
            world: world.id(),
            state: LoopState::Running,
            alive: Arc::new(AtomicBool::new(true)),
            frames: 0,
        })
    }

    pub fn handle(&self) -> LoopHandle {
        LoopHandle(Arc::clone(&self.alive))
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Frames drawn by this loop.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// One display refresh: land finished model loads, then draw.
    ///
    /// Returns `Ok(false)` once the loop has stopped. A render failure stops
    /// the loop for good and is returned.
    pub fn frame(&mut self, world: &mut World) -> Result<bool, WorldError> {
        if world.id() != self.world {
            return Err(WorldError::ForeignWorld);
        }
        if self.state == LoopState::Stopped {
            return Ok(false);
        }
        if !self.alive.load(Ordering::Relaxed) {
            self.state = LoopState::Stopped;
            tracing::info!(frames = self.frames, "render loop stopped");
            return Ok(false);
        }

        world.poll_loads();
        if let Err(err) = world.render_frame() {
            self.state = LoopState::Stopped;
            tracing::error!(frame = self.frames, "render failed, stopping loop: {err}");
            return Err(err);
        }
        self.frames += 1;
        tracing::trace!(frame = self.frames, "frame rendered");
        Ok(true)
    }

    /// Draw frames until the source runs dry or the loop stops.
    pub fn run<S: FrameSource>(
        &mut self,
        world: &mut World,
        source: &mut S,
    ) -> Result<u64, WorldError> {
        if world.id() != self.world {
            return Err(WorldError::ForeignWorld);
        }
        while self.state == LoopState::Running && source.next_frame() {
            if !self.frame(world)? {
                break;
            }
        }
        Ok(self.frames)
    }
}

/// Tells the loop when the next display refresh is due.
pub trait FrameSource {
    /// Block until the next refresh. `false` means no more frames.
    fn next_frame(&mut self) -> bool;
}

/// A fixed number of back-to-back frames.
#[derive(Debug, Clone)]
pub struct FixedFrames {
    remaining: u64,
}

impl FixedFrames {
    pub fn new(count: u64) -> Self {
        Self { remaining: count }
    }
}

impl FrameSource for FixedFrames {
    fn next_frame(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }
}

/// Frames on a fixed refresh interval, optionally bounded.
#[derive(Debug, Clone)]
pub struct Paced {
    interval: Duration,
    next: Option<Instant>,
    remaining: Option<u64>,
}

impl Paced {
    /// Unbounded frames `interval` apart.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next: None,
            remaining: None,
        }
    }

    /// Refresh rate in Hz, e.g. 60.
    pub fn hz(rate: u32) -> Self {
        Self::new(Duration::from_secs(1) / rate.max(1))
    }

    pub fn with_limit(mut self, frames: u64) -> Self {
        self.remaining = Some(frames);
        self
    }
}

impl FrameSource for Paced {
    fn next_frame(&mut self) -> bool {
        if let Some(remaining) = &mut self.remaining {
            if *remaining == 0 {
                return false;
            }
            *remaining -= 1;
        }
        let now = Instant::now();
        match self.next {
            Some(due) if due > now => {
                thread::sleep(due - now);
                self.next = Some(due + self.interval);
            }
            // First frame, or running behind: draw now, no catch-up burst.
            _ => self.next = Some(now + self.interval),
        }
        true
    }
}
