//! Command handlers, one module per command group.

pub mod doctor;
pub mod init;
pub mod misc;
pub mod records;
