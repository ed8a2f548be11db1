//! Pingpad - API endpoint monitoring client
//!
//! This library talks to the Pingpad backend to manage HTTP endpoints, run
//! tests against them, follow the alarm feed, and turn test-result history
//! into bucketed analytics for charts.

pub mod analytics;
pub mod cli;
pub mod client;
pub mod config;
pub mod logging;
pub mod model;
pub mod poller;
pub mod session;
pub mod views;
