//! CLI library components for the territorial division builder.

pub mod logging;
pub mod pipeline;
