//! Validate command - check generated artifacts

use std::{collections::BTreeSet, path::Path};

use color_eyre::eyre::{Result, bail};
use siteseo_core::{Config, ContentStore, slugify};
use siteseo_generator::ARTIFACTS;

/// Validation result.
#[derive(Debug, Default)]
struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Run the validate command.
///
/// Fails when any artifact or its `.gz` companion is missing. Taxonomy drift
/// and a missing IndexNow key file are warnings, fatal only in strict mode.
pub fn run(config_path: &Path, content: &Path, output: &Path, strict: bool) -> Result<()> {
    tracing::info!(?config_path, ?output, strict, "Validating artifacts");

    let mut result = ValidationResult::default();

    println!("Checking artifacts in {}...", output.display());
    let missing = missing_artifacts(output);
    for name in ARTIFACTS {
        for file in [name.to_string(), format!("{name}.gz")] {
            if missing.contains(&file) {
                println!("  ✗ {file}");
                result.add_error(format!("Missing artifact: {file}"));
            } else {
                println!("  ✓ {file}");
            }
        }
    }

    println!("\nChecking configuration...");
    match Config::load_with_env(config_path) {
        Ok(config) => {
            println!("  ✓ Configuration valid");

            if config.index_now.enabled {
                let key_file = format!("{}.txt", config.index_now.key);
                if !output.join(&key_file).exists() {
                    result.add_warning(format!("IndexNow key file {key_file} not found"));
                }
            }

            println!("\nChecking taxonomies...");
            let store = ContentStore::load_lenient(content);
            for warning in taxonomy_drift(&config, &store) {
                result.add_warning(warning);
            }
        }
        Err(e) => {
            println!("  ⚠ Configuration unavailable: {e}");
            result.add_warning(format!("Configuration unavailable, skipped taxonomy checks: {e}"));
        }
    }

    println!();
    println!("Summary:");
    println!("  Errors:   {}", result.errors.len());
    println!("  Warnings: {}", result.warnings.len());

    if result.has_errors() {
        println!();
        println!("Errors:");
        for err in &result.errors {
            println!("  ✗ {err}");
        }
    }

    if result.has_warnings() {
        println!();
        println!("Warnings:");
        for warn in &result.warnings {
            println!("  ⚠ {warn}");
        }
    }

    if result.has_errors() {
        bail!("Validation failed with {} error(s)", result.errors.len());
    }

    if strict && result.has_warnings() {
        bail!(
            "Validation failed with {} warning(s) (strict mode)",
            result.warnings.len()
        );
    }

    println!();
    println!("✓ All artifacts present");

    Ok(())
}

/// Artifact file names (plain and `.gz`) absent from `output`.
pub fn missing_artifacts(output: &Path) -> Vec<String> {
    ARTIFACTS
        .iter()
        .flat_map(|name| [name.to_string(), format!("{name}.gz")])
        .filter(|file| !output.join(file).is_file())
        .collect()
}

/// Categories and tags used by posts but absent from the configured
/// vocabulary. Terms are compared by slug.
pub fn taxonomy_drift(config: &Config, store: &ContentStore) -> Vec<String> {
    let categories: BTreeSet<_> = config.taxonomies.categories.iter().map(|c| slugify(c)).collect();
    let tags: BTreeSet<_> = config.taxonomies.tags.iter().map(|t| slugify(t)).collect();

    let mut unknown_categories = BTreeSet::new();
    let mut unknown_tags = BTreeSet::new();

    for post in &store.posts {
        if !post.category.is_empty() && !categories.contains(&slugify(&post.category)) {
            unknown_categories.insert(post.category.as_str());
        }
        for tag in &post.tags {
            if !tags.contains(&slugify(tag)) {
                unknown_tags.insert(tag.as_str());
            }
        }
    }

    unknown_categories
        .into_iter()
        .map(|c| format!("Category '{c}' is used by posts but not listed in taxonomies.categories"))
        .chain(
            unknown_tags
                .into_iter()
                .map(|t| format!("Tag '{t}' is used by posts but not listed in taxonomies.tags")),
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use chrono::{TimeZone, Utc};
    use siteseo_core::{BlogPost, SiteEntry};
    use tempfile::TempDir;

    use super::*;

    fn post(category: &str, tags: &[&str]) -> BlogPost {
        BlogPost {
            id: "1".to_string(),
            title: "Title".to_string(),
            slug: "title".to_string(),
            excerpt: String::new(),
            content: String::new(),
            category: category.to_string(),
            tags: tags.iter().map(ToString::to_string).collect(),
            publish_date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            updated_at: None,
            author: String::new(),
            featured: false,
            reading_time: 1,
        }
    }

    fn write_config(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("siteseo.json");
        fs::write(&path, r#"{"siteUrl": "https://example.com"}"#).unwrap();
        path
    }

    #[test]
    fn test_missing_artifacts_in_empty_dir() {
        let dir = TempDir::new().unwrap();

        let missing = missing_artifacts(dir.path());

        assert_eq!(missing.len(), ARTIFACTS.len() * 2);
        assert!(missing.contains(&"sitemap.xml.gz".to_string()));
    }

    #[test]
    fn test_missing_gz_companion_only() {
        let dir = TempDir::new().unwrap();
        for name in ARTIFACTS {
            fs::write(dir.path().join(name), "x").unwrap();
            fs::write(dir.path().join(format!("{name}.gz")), "x").unwrap();
        }
        fs::remove_file(dir.path().join("rss.xml.gz")).unwrap();

        assert_eq!(missing_artifacts(dir.path()), vec!["rss.xml.gz"]);
    }

    #[test]
    fn test_run_fails_on_missing_artifacts() {
        let dir = TempDir::new().unwrap();
        let config_path = write_config(dir.path());

        let result = run(&config_path, dir.path(), &dir.path().join("public"), false);

        assert!(result.is_err());
    }

    #[test]
    fn test_run_passes_after_build() {
        let dir = TempDir::new().unwrap();
        let config_path = write_config(dir.path());
        let output = dir.path().join("public");
        crate::cmd::build::run(&config_path, dir.path(), &output).unwrap();

        assert!(run(&config_path, dir.path(), &output, true).is_ok());
    }

    #[test]
    fn test_taxonomy_drift() {
        let mut config = Config::new("https://example.com");
        config.taxonomies.categories = vec!["Web Development".to_string()];
        config.taxonomies.tags = vec!["React".to_string()];

        let store = ContentStore::new(
            vec![
                post("web-development", &["react"]),
                post("Quantum", &["React", "qubits"]),
            ],
            SiteEntry::default(),
        );

        let drift = taxonomy_drift(&config, &store);

        assert_eq!(drift.len(), 2);
        assert!(drift[0].contains("'Quantum'"));
        assert!(drift[1].contains("'qubits'"));
    }

    #[test]
    fn test_strict_mode_fails_on_drift() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("siteseo.json");
        fs::write(
            &config_path,
            r#"{"siteUrl": "https://example.com", "taxonomies": {"categories": [], "tags": []}}"#,
        )
        .unwrap();
        let content = dir.path().join("content");
        fs::create_dir_all(&content).unwrap();
        fs::write(
            content.join("blog-posts.json"),
            serde_json::to_string(&[post("Quantum", &[])]).unwrap(),
        )
        .unwrap();
        let output = dir.path().join("public");
        crate::cmd::build::run(&config_path, &content, &output).unwrap();

        assert!(run(&config_path, &content, &output, false).is_ok());
        assert!(run(&config_path, &content, &output, true).is_err());
    }
}
