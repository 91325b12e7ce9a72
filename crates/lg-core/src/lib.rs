//! lg-core: the Legion concierge terminal client.
//!
//! Holds the message reducer, preview panel layout, approval estimator,
//! session handling and the interactive loop. Exposed as a library for
//! integration testing.

pub mod approval;
pub mod config;
pub mod dates;
pub mod display;
pub mod images;
pub mod links;
pub mod preview;
pub mod reducer;
pub mod repl;
pub mod session;
pub mod style;
pub mod views;
