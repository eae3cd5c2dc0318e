// src/config/credentials.rs
use std::{fs, io, path::Path};

use serde::Deserialize;

use crate::error::{FoodError, Result};

#[derive(Debug, Deserialize)]
struct CredentialsFile {
    mynetdiary: Credentials,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Read `credentials.yaml`:
/// ```yaml
/// mynetdiary:
///   username: me@example.com
///   password: hunter2
/// ```
pub fn load(path: &Path) -> Result<Credentials> {
    let text = fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => {
            FoodError::Config(format!("configuration file not found: {}", path.display()))
        }
        _ => FoodError::Io(e),
    })?;
    parse(&text).map_err(|e| FoodError::Config(format!("error reading file {}: {e}", path.display())))
}

fn parse(text: &str) -> std::result::Result<Credentials, serde_yaml::Error> {
    serde_yaml::from_str::<CredentialsFile>(text).map(|f| f.mynetdiary)
}
