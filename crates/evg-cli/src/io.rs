//! Obstacle files and JSON output.

use anyhow::{Context, Result};
use evg_core::{format_obstacles, parse_obstacles, Obstacle};
use serde::Serialize;
use std::fs;
use std::path::Path;

pub fn load_obstacles(path: &Path) -> Result<Vec<Obstacle>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading obstacles from {}", path.display()))?;
    parse_obstacles(&text).with_context(|| format!("parsing {}", path.display()))
}

pub fn save_obstacles(path: &Path, obstacles: &[Obstacle]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }
    fs::write(path, format_obstacles(obstacles))
        .with_context(|| format!("writing obstacles to {}", path.display()))
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serializing JSON")?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))
}
