pub extern crate nalgebra as na;

pub mod cache;
pub mod cli;
pub mod config;
pub mod generator;
pub mod geodetic;
pub mod interruptor;
pub mod propagator;
pub mod resolver;
pub mod sink;
pub mod source;

pub use crate::generator::{GenerateError, GenerationReport, Generator};
pub use crate::interruptor::Interruptor;
pub use crate::resolver::{FixedTle, SelectionPolicy, TleProvider, TleResolver, Unavailable};
