//! Command-line front end for `lesson-check`.

pub mod cli;
pub mod logging;
