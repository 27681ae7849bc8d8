//! Combat and monster AI core of a single-player 2D action RPG.
//!
//! The simulation is synchronous and deterministic for a given seed and
//! sequence of timestamps; the binary wraps it in a fixed-rate tick loop.

pub mod catalog;
pub mod cli;
pub mod combat;
pub mod commands;
pub mod config;
pub mod display;
pub mod entities;
pub mod navigation;
pub mod persistence;
pub mod world;
