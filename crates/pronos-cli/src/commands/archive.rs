//! Archive command implementation.

use crate::cache::{load_archive, save_archive, ARCHIVE_KEY};
use crate::cli::{ArchiveAction, ArchiveArgs};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use pronos_domain::{ArchivedAnalysis, KeyValueCache};
use std::io::{self, Write};

/// Execute the archive command.
pub fn execute_archive<C>(args: ArchiveArgs, cache: &mut C, formatter: &Formatter) -> Result<()>
where
    C: KeyValueCache<Error = CliError>,
{
    match args.action {
        ArchiveAction::List => {
            println!("{}", formatter.format_archive(&load_archive(cache)?)?);
        }
        ArchiveAction::Show { id } => {
            let entry = find_entry(cache, &id)?;
            println!("{}", formatter.format_archived(&entry)?);
        }
        ArchiveAction::Remove { id } => {
            remove_entry(cache, &id)?;
            println!("{}", formatter.success(&format!("Removed {}", id)));
        }
        ArchiveAction::Clear { yes } => {
            let count = load_archive(cache)?.len();
            if count == 0 {
                println!("{}", formatter.info("Archive is already empty"));
                return Ok(());
            }

            if !yes {
                print!("About to delete {} archived analysis(es). Continue? [y/N] ", count);
                io::stdout().flush()?;

                let mut response = String::new();
                io::stdin().read_line(&mut response)?;

                if !response.trim().eq_ignore_ascii_case("y") {
                    println!("{}", formatter.info("Operation cancelled"));
                    return Ok(());
                }
            }

            cache.remove(ARCHIVE_KEY)?;
            println!("{}", formatter.success(&format!("Deleted {} archived analysis(es)", count)));
        }
    }

    Ok(())
}

/// Look up an archived analysis by id.
pub fn find_entry<C>(cache: &C, id: &str) -> Result<ArchivedAnalysis>
where
    C: KeyValueCache<Error = CliError>,
{
    load_archive(cache)?
        .into_iter()
        .find(|entry| entry.id == id)
        .ok_or_else(|| CliError::NotFound(id.to_string()))
}

/// Remove an archived analysis by id.
pub fn remove_entry<C>(cache: &mut C, id: &str) -> Result<()>
where
    C: KeyValueCache<Error = CliError>,
{
    let mut archive = load_archive(cache)?;
    let before = archive.len();
    archive.retain(|entry| entry.id != id);
    if archive.len() == before {
        return Err(CliError::NotFound(id.to_string()));
    }
    save_archive(cache, &archive)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::FileCache;
    use crate::commands::analyze::archive_analysis;
    use crate::config::OutputFormat;
    use pronos_domain::{AnalysisQuery, AnalysisResult};

    fn entry(cache: &mut FileCache, team: &str) -> String {
        let query = AnalysisQuery {
            sport: "Tennis".to_string(),
            team1: team.to_string(),
            team2: "Alcaraz".to_string(),
            bet_type: "Victoire".to_string(),
        };
        let result = AnalysisResult {
            analysis: "Serré".to_string(),
            confidence: 64,
            key_data: Vec::new(),
            recommended_bet: "Plus de 3.5 sets".to_string(),
            recommendation_reason: String::new(),
            date: "--.--.----".to_string(),
            time: "--:--".to_string(),
            sources: Vec::new(),
        };
        archive_analysis(cache, query, result).unwrap()
    }

    #[test]
    fn test_find_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = FileCache::open(dir.path().join("cache.json")).unwrap();
        let first = entry(&mut cache, "Sinner");
        let second = entry(&mut cache, "Djokovic");

        assert_eq!(find_entry(&cache, &first).unwrap().query.team1, "Sinner");

        remove_entry(&mut cache, &first).unwrap();
        assert!(matches!(find_entry(&cache, &first), Err(CliError::NotFound(_))));
        assert_eq!(load_archive(&cache).unwrap()[0].id, second);
    }

    #[test]
    fn test_remove_unknown_id() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = FileCache::open(dir.path().join("cache.json")).unwrap();
        entry(&mut cache, "Sinner");

        assert!(matches!(remove_entry(&mut cache, "missing"), Err(CliError::NotFound(_))));
        assert_eq!(load_archive(&cache).unwrap().len(), 1);
    }

    #[test]
    fn test_clear_with_yes() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = FileCache::open(dir.path().join("cache.json")).unwrap();
        entry(&mut cache, "Sinner");
        let formatter = Formatter::new(OutputFormat::Quiet, false);

        execute_archive(
            ArchiveArgs {
                action: ArchiveAction::Clear { yes: true },
            },
            &mut cache,
            &formatter,
        )
        .unwrap();
        assert!(load_archive(&cache).unwrap().is_empty());
    }
}
