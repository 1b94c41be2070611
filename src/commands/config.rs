use std::path::Path;

use anyhow::Result;
use calsheet_core::Settings;
use owo_colors::OwoColorize;

pub fn run(settings: &Settings, explicit: Option<&Path>) -> Result<()> {
    let config_path = match explicit {
        Some(path) => path.to_path_buf(),
        None => Settings::config_path()?,
    };

    println!("{}", "Paths".bold());
    println!(
        "  Config:  {}{}",
        config_path.display(),
        if config_path.exists() { "" } else { " (not found, using defaults)" }
    );
    println!("  Icons:   {}", settings.icons_dir().display());
    println!();
    println!("{}", "Effective settings".bold());
    print!("{}", settings.to_toml()?);

    Ok(())
}
