//! Progress and diagnostics reporting for pipeline stages.
//!
//! Stages never log through a global switch. They take a [`Reporter`] and
//! tell it what they are doing; [`LogReporter`] forwards to the `log` facade
//! and [`NullReporter`] swallows everything (tests, library embedding).

use std::fmt;

pub trait Reporter {
    fn debug(&self, args: fmt::Arguments<'_>);
    fn info(&self, args: fmt::Arguments<'_>);
    fn warn(&self, args: fmt::Arguments<'_>);
}

/// Forwards reports to the `log` facade under the `craters` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn debug(&self, args: fmt::Arguments<'_>) {
        log::debug!(target: "craters", "{}", args);
    }

    fn info(&self, args: fmt::Arguments<'_>) {
        log::info!(target: "craters", "{}", args);
    }

    fn warn(&self, args: fmt::Arguments<'_>) {
        log::warn!(target: "craters", "{}", args);
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn debug(&self, _args: fmt::Arguments<'_>) {}

    fn info(&self, _args: fmt::Arguments<'_>) {}

    fn warn(&self, _args: fmt::Arguments<'_>) {}
}
