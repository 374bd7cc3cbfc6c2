// src/cli/init.rs — First-time setup: write a default config

use crate::infra::config::Config;
use crate::infra::paths;

pub fn run_init(force: bool) -> anyhow::Result<()> {
    let path = paths::config_file();
    if path.exists() && !force {
        println!("Config already exists at {} (use --force to overwrite)", path.display());
        return Ok(());
    }

    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(&path, Config::default().to_toml()?)?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}
