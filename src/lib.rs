//! A minimal stack virtual machine: an assembler for its text format, the
//! instruction set, and the engine that runs it over `i8`..`i64` or `f64`.

pub mod assembler;
pub mod config;
pub mod vm;
