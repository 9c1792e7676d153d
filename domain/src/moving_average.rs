//! Windowed moving average over a fixed circular buffer.
//!
//! The buffer holds `capacity` weighted samples and is pre-filled with an
//! initial value, so `mean` and `median` are defined from the first call.
//! Only the trailing `window_size` samples contribute; the running sum is
//! kept incrementally both on `add` and on window resizes.

use crate::core::error::DomainError;
use std::collections::VecDeque;

/// Default number of samples in the trailing window
pub const DEFAULT_WINDOW_SIZE: usize = 32;

/// Default buffer capacity, also the bound on the window size
pub const DEFAULT_CAPACITY: usize = 10_000;

#[derive(Debug, Clone)]
pub struct MovingAverage {
    values: Vec<f64>,
    weights: Vec<f64>,
    next: usize,
    window_size: usize,
    sum: f64,
    mean_history: VecDeque<f64>,
    median_history: VecDeque<f64>,
}

impl MovingAverage {
    pub fn new(initial_value: f64, window_size: usize, capacity: usize) -> Result<Self, DomainError> {
        if window_size == 0 || window_size > capacity {
            return Err(DomainError::WindowOutOfBounds {
                requested: window_size,
                capacity,
            });
        }
        Ok(Self {
            values: vec![initial_value; capacity],
            weights: vec![1.0; capacity],
            next: 0,
            window_size,
            sum: initial_value * window_size as f64,
            mean_history: VecDeque::new(),
            median_history: VecDeque::new(),
        })
    }

    /// Average with the default window and capacity
    pub fn with_initial(initial_value: f64) -> Self {
        Self {
            values: vec![initial_value; DEFAULT_CAPACITY],
            weights: vec![1.0; DEFAULT_CAPACITY],
            next: 0,
            window_size: DEFAULT_WINDOW_SIZE,
            sum: initial_value * DEFAULT_WINDOW_SIZE as f64,
            mean_history: VecDeque::new(),
            median_history: VecDeque::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.values.len()
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn add(&mut self, value: f64) {
        self.add_weighted(value, 1.0);
    }

    pub fn add_weighted(&mut self, value: f64, weight: f64) {
        let leaving = self.slot_back(self.window_size);
        self.sum += value * weight - self.weighted(leaving);
        self.values[self.next] = value;
        self.weights[self.next] = weight;
        self.next = (self.next + 1) % self.capacity();

        let (mean, median) = (self.mean(), self.median());
        push_bounded(&mut self.mean_history, mean, self.values.len());
        push_bounded(&mut self.median_history, median, self.values.len());
    }

    pub fn mean(&self) -> f64 {
        self.sum / self.window_size as f64
    }

    /// Median of the raw samples in the window
    pub fn median(&self) -> f64 {
        let mut window: Vec<f64> = (1..=self.window_size)
            .map(|back| self.values[self.slot_back(back)])
            .collect();
        window.sort_by(f64::total_cmp);
        let mid = window.len() / 2;
        if window.len() % 2 == 0 {
            (window[mid - 1] + window[mid]) / 2.0
        } else {
            window[mid]
        }
    }

    /// Resize the window, adjusting the running sum by the samples entering
    /// or leaving it.
    pub fn set_window_size(&mut self, window_size: usize) -> Result<(), DomainError> {
        if window_size == 0 || window_size > self.capacity() {
            return Err(DomainError::WindowOutOfBounds {
                requested: window_size,
                capacity: self.capacity(),
            });
        }
        let current = self.window_size;
        if window_size < current {
            for back in window_size + 1..=current {
                self.sum -= self.weighted(self.slot_back(back));
            }
        } else {
            for back in current + 1..=window_size {
                self.sum += self.weighted(self.slot_back(back));
            }
        }
        self.window_size = window_size;
        Ok(())
    }

    pub fn mean_history(&self) -> &VecDeque<f64> {
        &self.mean_history
    }

    pub fn median_history(&self) -> &VecDeque<f64> {
        &self.median_history
    }

    /// Slot holding the sample added `back` calls ago (1 = most recent)
    fn slot_back(&self, back: usize) -> usize {
        let capacity = self.capacity();
        (self.next + capacity - back % capacity) % capacity
    }

    fn weighted(&self, slot: usize) -> f64 {
        self.values[slot] * self.weights[slot]
    }
}

fn push_bounded(history: &mut VecDeque<f64>, value: f64, bound: usize) {
    if history.len() == bound {
        history.pop_front();
    }
    history.push_back(value);
}
