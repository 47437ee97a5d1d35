//! # Core Runtime Module
//!
//! Runtime infrastructure shared by the player crates:
//! - Logging and tracing setup, with forwarding to host loggers
//! - Configuration and engine injection
//! - Event bus for playback and decode lifecycle events
//!
//! ## Overview
//!
//! Nothing here touches the engine directly. `core-playback` drives the
//! engine and reports through the [`events::EventBus`]; `core-service`
//! wires both together from a [`config::CoreConfig`].

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
