//! IO sinks for circuit public inputs.
//!
//! A `Sink` is how a circuit hands its public inputs to the outside world.
//! Each driver picks the sink that matches what its wires carry: indices,
//! values, or nothing.

use crate::driver::Driver;
use crate::error::Error;

/// A sink for circuit public inputs.
pub trait Sink<D: Driver> {
    /// Push a wire as the next public input.
    fn push(&mut self, wire: D::W) -> Result<(), Error>;

    /// Push several wires in order.
    fn push_many<I: IntoIterator<Item = D::W>>(&mut self, wires: I) -> Result<(), Error> {
        for wire in wires {
            self.push(wire)?;
        }
        Ok(())
    }
}

/// A sink that collects public input field elements.
#[derive(Debug, Clone)]
pub struct CollectingSink<F> {
    /// The collected public input values.
    pub inputs: Vec<F>,
}

impl<F> CollectingSink<F> {
    /// Create a new empty collecting sink.
    pub fn new() -> Self {
        CollectingSink { inputs: Vec::new() }
    }

    /// Get the collected inputs.
    pub fn into_inputs(self) -> Vec<F> {
        self.inputs
    }
}

impl<F> Default for CollectingSink<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// A sink that records which witness positions are public.
#[derive(Debug, Clone, Default)]
pub struct IndexSink {
    /// Witness indices of the public inputs, in push order.
    pub indices: Vec<usize>,
}

impl IndexSink {
    /// Create a new index sink.
    pub const fn new() -> Self {
        IndexSink {
            indices: Vec::new(),
        }
    }
}

/// A sink that counts public inputs without storing them.
#[derive(Debug, Clone, Default)]
pub struct CountingSink {
    /// The number of public inputs pushed.
    pub count: usize,
}

impl CountingSink {
    /// Create a new counting sink.
    pub const fn new() -> Self {
        CountingSink { count: 0 }
    }

    /// Get the count.
    pub const fn count(&self) -> usize {
        self.count
    }
}
