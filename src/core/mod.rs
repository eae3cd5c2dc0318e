// src/core/mod.rs

pub mod embedded;
pub mod html;
pub mod json;
pub mod net;
pub mod sanitize;

pub use net::{Session, Transport};
