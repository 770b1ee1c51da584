//! Config command implementation.

use crate::cli::{ConfigAction, ConfigArgs};
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use std::path::Path;

/// Execute the config command.
pub fn execute_config(
    args: ConfigArgs,
    config: &Config,
    path: &Path,
    formatter: &Formatter,
) -> Result<()> {
    match args.action {
        ConfigAction::Show => print!("{}", config.to_toml()?),
        ConfigAction::Path => println!("{}", path.display()),
        ConfigAction::Init { force } => {
            if init_config(path, force)? {
                println!("{}", formatter.success(&format!("Wrote {}", path.display())));
            } else {
                let message = format!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                );
                println!("{}", formatter.warning(&message));
            }
        }
    }

    Ok(())
}

/// Write a default configuration to `path`; returns whether a file was written.
pub fn init_config(path: &Path, force: bool) -> Result<bool> {
    if path.exists() && !force {
        return Ok(false);
    }
    Config::default().save(path)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_init_does_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[settings]\ncolor = false\n").unwrap();

        assert!(!init_config(&path, false).unwrap());
        assert!(!Config::load(&path).unwrap().settings.color);

        assert!(init_config(&path, true).unwrap());
        assert!(Config::load(&path).unwrap().settings.color);
    }

    #[test]
    fn test_init_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pronos").join("config.toml");

        assert!(init_config(&path, false).unwrap());
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[ingest]"));
        assert!(contents.contains("Europe/Paris"));
    }
}
