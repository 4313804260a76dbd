#![no_std]
#![doc = include_str!("../README.md")]

#[macro_use]
mod fmt;

pub mod baseline;
pub mod config;
pub mod controller;
mod error;
pub mod gesture;
pub mod hardware;
mod lookup_tables;
pub mod metronome;
pub mod mode;
pub mod sensor;
pub mod touch;

#[cfg(test)]
mod mock;

pub use controller::{Board, CycleReport, PianoMetronome};
pub use error::Error;
