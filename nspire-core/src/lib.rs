//! # nspire-core
//!
//! Core protocol implementation for the TI-Nspire USB file service.
//!
//! This crate provides the low-level protocol primitives:
//! - Frame encoding and response decoding
//! - Command definitions
//! - Service session state
//! - Protocol constants

pub mod command;
pub mod constants;
pub mod error;
pub mod packet;
pub mod session;

pub use command::Command;
pub use error::{Error, Result};
pub use session::{Session, SessionState};
