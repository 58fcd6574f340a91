//! Bounded random number sources
//!
//! The game asks every random question through a `RandomSource`. While
//! recording, a seeded generator answers and each answer is written to the
//! recorder's trace; on replay the trace answers in order.

use crate::replay::Recorder;
use crate::{GameError, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;
use std::cell::RefCell;
use std::rc::Rc;

pub trait RandomSource {
    /// A value in `lower..=upper`
    fn draw(&mut self, lower: i32, upper: i32) -> Result<i32>;

    /// How many values have been handed out so far
    fn drawn(&self) -> usize;
}

fn check_bounds(lower: i32, upper: i32) -> Result<()> {
    if lower > upper {
        return Err(GameError::InvalidAction(format!(
            "empty random range {}..={}",
            lower, upper
        )));
    }
    Ok(())
}

/// Seeded generator without a recorder, for unrecorded live games
pub struct SeededRandom {
    rng: ChaCha12Rng,
    drawn: usize,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        SeededRandom {
            rng: ChaCha12Rng::seed_from_u64(seed),
            drawn: 0,
        }
    }
}

impl RandomSource for SeededRandom {
    fn draw(&mut self, lower: i32, upper: i32) -> Result<i32> {
        check_bounds(lower, upper)?;
        self.drawn += 1;
        Ok(self.rng.gen_range(lower..=upper))
    }

    fn drawn(&self) -> usize {
        self.drawn
    }
}

/// Seeded generator that appends every value to a recorder's trace
pub struct CapturingRandom {
    inner: SeededRandom,
    recorder: Rc<RefCell<Recorder>>,
}

impl CapturingRandom {
    pub fn new(seed: u64, recorder: Rc<RefCell<Recorder>>) -> Self {
        CapturingRandom {
            inner: SeededRandom::new(seed),
            recorder,
        }
    }
}

impl RandomSource for CapturingRandom {
    fn draw(&mut self, lower: i32, upper: i32) -> Result<i32> {
        let value = self.inner.draw(lower, upper)?;
        self.recorder.borrow_mut().record_random(value);
        Ok(value)
    }

    fn drawn(&self) -> usize {
        self.inner.drawn()
    }
}

/// Hands out a recorded trace in order, ignoring the requested bounds
#[derive(Debug, Clone)]
pub struct ReplayRandom {
    trace: Vec<i32>,
    cursor: usize,
}

impl ReplayRandom {
    pub fn new(trace: Vec<i32>) -> Self {
        ReplayRandom { trace, cursor: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.trace.len() - self.cursor
    }
}

impl RandomSource for ReplayRandom {
    fn draw(&mut self, _lower: i32, _upper: i32) -> Result<i32> {
        let value = *self
            .trace
            .get(self.cursor)
            .ok_or(GameError::ExhaustedRandomTrace { consumed: self.cursor })?;
        self.cursor += 1;
        Ok(value)
    }

    fn drawn(&self) -> usize {
        self.cursor
    }
}

/// Source for games that recorded no random draws; any draw is an error
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRandom;

impl RandomSource for NullRandom {
    fn draw(&mut self, _lower: i32, _upper: i32) -> Result<i32> {
        Err(GameError::ExhaustedRandomTrace { consumed: 0 })
    }

    fn drawn(&self) -> usize {
        0
    }
}

/// Replaying source for `trace`, or the null source when it is empty
pub fn replay_source(trace: &[i32]) -> Box<dyn RandomSource> {
    if trace.is_empty() {
        Box::new(NullRandom)
    } else {
        Box::new(ReplayRandom::new(trace.to_vec()))
    }
}
