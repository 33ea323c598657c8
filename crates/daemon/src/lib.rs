//! `corrtrack-daemon` -- process entry point and scheduling.

pub mod trigger;
