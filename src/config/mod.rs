// src/config/mod.rs

pub mod consts;
pub mod credentials;
pub mod options;
