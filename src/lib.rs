//! newsdeck: a cyberpunk terminal news deck.
//!
//! Aggregates RSS headlines across a user-extensible source registry and
//! renders them alongside a memo line, CPU/RAM gauges, a scrolling market
//! ticker, and a weather badge. All state lives on the UI task; background
//! fetches report back over an mpsc channel.

pub mod app;
pub mod config;
pub mod feed;
pub mod filter;
pub mod market;
pub mod settings;
pub mod sources;
pub mod startup;
pub mod sysstats;
pub mod theme;
pub mod ui;
pub mod util;
pub mod weather;
