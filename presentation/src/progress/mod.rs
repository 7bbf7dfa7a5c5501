//! Stage progress display

pub mod reporter;
