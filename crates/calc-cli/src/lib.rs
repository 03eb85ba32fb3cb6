//! calc-cli: command-line front end for `calc-engine`.
//!
//! Reads calculation requests from JSON files, evaluates them with the
//! engine's `Calculator`, and writes JSON results.
pub mod config;
pub mod evaluate;
pub mod util;
