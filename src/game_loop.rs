use std::io;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::engine::{FrameState, SimulationEngine};
use crate::error::Result;
use crate::input::{GameInput, InputSource};
use crate::placement::RandomSource;

/// Draws one frame from a board snapshot.
pub trait Renderer {
    fn draw(&mut self, frame: &FrameState, paused: bool) -> io::Result<()>;
}

/// Paces the loop between iterations.
pub trait Clock {
    fn wait(&mut self);
}

/// Sleeps out the rest of each period, measured from the previous `wait`.
#[derive(Debug, Clone)]
pub struct FixedRateClock {
    period: Duration,
    last_tick: Option<Instant>,
}

impl FixedRateClock {
    #[must_use]
    pub fn new(ticks_per_second: u32) -> Self {
        Self {
            period: Duration::from_secs(1) / ticks_per_second.max(1),
            last_tick: None,
        }
    }

    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }
}

impl Clock for FixedRateClock {
    fn wait(&mut self) {
        if let Some(last_tick) = self.last_tick {
            let elapsed = last_tick.elapsed();
            if elapsed < self.period {
                thread::sleep(self.period - elapsed);
            }
        }

        self.last_tick = Some(Instant::now());
    }
}

/// Why a run finished.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum LoopExit {
    /// The player asked to quit.
    Quit,
    /// `run_for` used up its iteration budget.
    Budget,
}

/// Drives the engine: input, tick, draw, wait.
pub struct GameLoop<S, I, R, C> {
    engine: SimulationEngine<S>,
    input: I,
    renderer: R,
    clock: C,
    paused: bool,
    resets: u64,
}

impl<S, I, R, C> GameLoop<S, I, R, C>
where
    S: RandomSource,
    I: InputSource,
    R: Renderer,
    C: Clock,
{
    #[must_use]
    pub fn new(engine: SimulationEngine<S>, input: I, renderer: R, clock: C) -> Self {
        Self {
            engine,
            input,
            renderer,
            clock,
            paused: false,
            resets: 0,
        }
    }

    #[must_use]
    pub fn engine(&self) -> &SimulationEngine<S> {
        &self.engine
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Number of snake resets seen so far.
    #[must_use]
    pub fn resets(&self) -> u64 {
        self.resets
    }

    /// Runs until the player quits.
    pub fn run(&mut self) -> Result<()> {
        self.renderer.draw(&self.engine.initial_state(), self.paused)?;

        loop {
            if self.step()? == Some(LoopExit::Quit) {
                return Ok(());
            }
        }
    }

    /// Runs at most `iterations` loop iterations.
    pub fn run_for(&mut self, iterations: u64) -> Result<LoopExit> {
        self.renderer.draw(&self.engine.initial_state(), self.paused)?;

        for _ in 0..iterations {
            if let Some(exit) = self.step()? {
                return Ok(exit);
            }
        }

        Ok(LoopExit::Budget)
    }

    /// One iteration; returns `Some(LoopExit::Quit)` when the player quits.
    fn step(&mut self) -> Result<Option<LoopExit>> {
        while let Some(input) = self.input.poll()? {
            match input {
                GameInput::Quit => {
                    info!(
                        tick = self.engine.tick_count,
                        resets = self.resets,
                        "shutdown_requested"
                    );
                    return Ok(Some(LoopExit::Quit));
                }
                GameInput::Pause => {
                    self.paused = !self.paused;
                    info!(paused = self.paused, "pause_toggled");
                }
                GameInput::Direction(direction) => {
                    if !self.paused && !self.engine.request_turn(direction) {
                        debug!(?direction, "turn_rejected");
                    }
                }
            }
        }

        let frame = if self.paused {
            self.engine.snapshot()
        } else {
            let frame = self.engine.tick(None)?;
            if frame.reset_occurred() {
                self.resets += 1;
            }
            frame
        };

        self.renderer.draw(&frame, self.paused)?;
        self.clock.wait();
        Ok(None)
    }
}
