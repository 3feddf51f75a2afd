//! Testing utilities for code built on shellkit.
//!
//! This module provides:
//! - A manual clock that advances when slept on
//! - A sleeper that only records requested pauses
//! - Scripted operations that fail until a chosen attempt

mod mocks;

pub use crate::args::MapEnvironment;
pub use mocks::{ManualClock, RecordingSleeper, ScriptedOperation};
