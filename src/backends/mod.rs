//! Backends module - External tool integrations
//!
//! This module provides:
//! - Player hand-off (vlc by default)
//! - Track downloads (youtube-dl by default)
//! - Doctor command for checking the external tools

pub mod doctor;
pub mod fetch;
pub mod player;
