//! Document discovery: walk the project tree for summarizable files.
//!
//! Discovery is idempotent across runs: a document whose summary already
//! exists under the output directory is excluded, so re-running a batch
//! only picks up new or previously failed documents.

use crate::config::Config;
use crate::sink::summary_path_for;
use crate::source::SourceKind;
use anyhow::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Find all documents under the project dir that still need a summary.
///
/// Results are sorted for a stable processing order. The output
/// directory itself is never scanned, so summaries are not treated as
/// input documents.
pub fn discover_documents(config: &Config) -> Result<Vec<PathBuf>> {
    let roots: Vec<PathBuf> = if config.folders.is_empty() {
        vec![config.project_dir.clone()]
    } else {
        config
            .folders
            .iter()
            .map(|f| config.project_dir.join(f))
            .collect()
    };

    let mut documents = Vec::new();
    for root in &roots {
        if !root.exists() {
            tracing::warn!(folder = %root.display(), "Configured folder does not exist, skipping");
            continue;
        }
        collect_from(root, config, &mut documents);
    }

    documents.sort();
    documents.dedup();
    tracing::info!(count = documents.len(), "Discovered documents needing summaries");
    Ok(documents)
}

fn collect_from(root: &Path, config: &Config, documents: &mut Vec<PathBuf>) {
    // Depth 0 is the walk root itself, which may legitimately be
    // dot-named; the hidden check applies only below it.
    let walker = WalkDir::new(root).into_iter().filter_entry(|entry| {
        entry.path() != config.output_dir && (entry.depth() == 0 || !is_hidden(entry.path()))
    });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping unreadable directory entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if SourceKind::from_path(path).is_none() {
            continue;
        }
        if summary_path_for(config, path).exists() {
            tracing::debug!(path = %path.display(), "Summary already exists, skipping");
            continue;
        }
        documents.push(path.to_path_buf());
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::write_summary;
    use std::fs;
    use tempfile::tempdir;

    fn test_config(dir: &Path) -> Config {
        Config::load(dir.to_path_buf(), None, None, None, false).unwrap()
    }

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "content").unwrap();
    }

    #[test]
    fn test_discovers_supported_extensions_only() {
        let dir = tempdir().unwrap();
        let config = test_config(dir.path());
        touch(&config.project_dir.join("a.txt"));
        touch(&config.project_dir.join("b.pdf"));
        touch(&config.project_dir.join("c.gdoc"));
        touch(&config.project_dir.join("d.docx"));
        touch(&config.project_dir.join("Makefile"));

        let found = discover_documents(&config).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.txt", "b.pdf", "c.gdoc"]);
    }

    #[test]
    fn test_skips_documents_with_existing_summaries() {
        let dir = tempdir().unwrap();
        let config = test_config(dir.path());
        touch(&config.project_dir.join("done.txt"));
        touch(&config.project_dir.join("pending.txt"));
        write_summary(&config, &config.project_dir.join("done.txt"), "done").unwrap();

        let found = discover_documents(&config).unwrap();
        assert_eq!(found.len(), 1);
        assert!(found[0].ends_with("pending.txt"));
    }

    #[test]
    fn test_output_dir_is_not_scanned() {
        let dir = tempdir().unwrap();
        let config = test_config(dir.path());
        // A .txt inside the output dir must never be picked up as input.
        touch(&config.output_dir.join("old_summary.txt"));

        let found = discover_documents(&config).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_folder_allow_list_restricts_scan() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("distill.toml"),
            "[discovery]\nfolders = [\"docs\"]\n",
        )
        .unwrap();
        let config = test_config(dir.path());
        touch(&config.project_dir.join("docs/in.txt"));
        touch(&config.project_dir.join("scratch/out.txt"));

        let found = discover_documents(&config).unwrap();
        assert_eq!(found.len(), 1);
        assert!(found[0].ends_with("docs/in.txt"));
    }

    #[test]
    fn test_missing_configured_folder_is_not_fatal() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("distill.toml"),
            "[discovery]\nfolders = [\"docs\", \"absent\"]\n",
        )
        .unwrap();
        let config = test_config(dir.path());
        touch(&config.project_dir.join("docs/in.txt"));

        let found = discover_documents(&config).unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_hidden_files_and_dirs_skipped() {
        let dir = tempdir().unwrap();
        let config = test_config(dir.path());
        touch(&config.project_dir.join(".hidden.txt"));
        touch(&config.project_dir.join(".cache/inner.txt"));
        touch(&config.project_dir.join("visible.txt"));

        let found = discover_documents(&config).unwrap();
        assert_eq!(found.len(), 1);
        assert!(found[0].ends_with("visible.txt"));
    }

    #[test]
    fn test_discovery_is_idempotent_as_summaries_accumulate() {
        let dir = tempdir().unwrap();
        let config = test_config(dir.path());
        touch(&config.project_dir.join("one.txt"));
        touch(&config.project_dir.join("nested/two.txt"));

        let first = discover_documents(&config).unwrap();
        assert_eq!(first.len(), 2);

        for doc in &first {
            write_summary(&config, doc, "s").unwrap();
        }
        let second = discover_documents(&config).unwrap();
        assert!(second.is_empty());
    }
}
