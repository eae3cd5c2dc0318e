// src/lib.rs

#[macro_use]
pub mod macros;

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod log;
pub mod specs;

pub mod diary;
pub mod nutrition;
pub mod report;

pub mod csv;
pub mod file;
pub mod format;
pub mod progress;
pub mod runner;
