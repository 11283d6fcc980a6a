//! Batch Driver
//!
//! Turns a set of selected files into a set of transformed outputs, tolerant
//! of partial failure. Files are processed under a bounded worker pool
//! (`buffer_unordered`); definitions within one file stay sequential because
//! a single file's rewrite is not divided further.
//!
//! The only state shared between workers is the generation cache behind the
//! shared generator handle; each worker owns its file's filesystem I/O.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use futures::stream::StreamExt;
use tracing::{info, warn};

use crate::analyzer::select_files;
use crate::config::{Config, OnConflict};
use crate::constants::transform::OUTPUT_FILE_PREFIX;
use crate::generator::SharedGenerator;
use crate::transform::{DocstringTransformer, SkippedDefinition};
use crate::types::{DocsmithError, GenerateError, Result};

// =============================================================================
// Report Types
// =============================================================================

/// One file that could not be processed, with its cause
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: DocsmithError,
}

/// Aggregated result of one batch run
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Input path → written output path
    pub outputs: BTreeMap<PathBuf, PathBuf>,
    /// Files that failed, with causes, so the caller can retry the subset
    pub failures: Vec<FileFailure>,
    /// Definitions left undocumented in otherwise successful files
    pub definition_skips: Vec<(PathBuf, SkippedDefinition)>,
}

impl BatchReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.definition_skips.is_empty()
    }
}

enum FileOutcome {
    Written {
        output: PathBuf,
        inserted: usize,
        skipped: Vec<SkippedDefinition>,
    },
    ConflictSkipped,
}

// =============================================================================
// Driver
// =============================================================================

pub struct BatchDriver {
    config: Config,
    generator: SharedGenerator,
}

impl BatchDriver {
    pub fn new(config: Config, generator: SharedGenerator) -> Self {
        Self { config, generator }
    }

    /// Process every selected file under the bounded worker pool.
    ///
    /// One file's failure never aborts the others; only an empty selection
    /// is fatal to the batch.
    pub async fn run(&self) -> Result<BatchReport> {
        let files = select_files(&self.config.include, &self.config.exclude)?;
        info!(
            files = files.len(),
            workers = self.config.max_workers,
            inplace = self.config.inplace,
            "Starting batch"
        );

        let mut report = BatchReport::default();

        let mut stream = futures::stream::iter(files)
            .map(|path| async move {
                let outcome = self.process_file(&path).await;
                (path, outcome)
            })
            .buffer_unordered(self.config.max_workers);

        while let Some((path, outcome)) = stream.next().await {
            match outcome {
                Ok(FileOutcome::Written {
                    output,
                    inserted,
                    skipped,
                }) => {
                    info!(path = %path.display(), inserted, "Wrote output");
                    for skip in skipped {
                        report.definition_skips.push((path.clone(), skip));
                    }
                    report.outputs.insert(path, output);
                }
                Ok(FileOutcome::ConflictSkipped) => {
                    warn!(path = %path.display(), "Output exists, skipping file");
                }
                Err(error) => {
                    warn!(path = %path.display(), %error, "File failed");
                    report.failures.push(FileFailure { path, error });
                }
            }
        }

        info!(
            succeeded = report.outputs.len(),
            failed = report.failures.len(),
            definition_skips = report.definition_skips.len(),
            "Batch complete"
        );

        Ok(report)
    }

    async fn process_file(&self, path: &Path) -> Result<FileOutcome> {
        let output = self.output_path(path);

        // Copy-mode collisions are a configuration error, never silently
        // overwritten
        if !self.config.inplace && tokio::fs::try_exists(&output).await? {
            return match self.config.on_conflict {
                OnConflict::Fail => Err(DocsmithError::OutputConflict { path: output }),
                OnConflict::Skip => Ok(FileOutcome::ConflictSkipped),
            };
        }

        let source = tokio::fs::read_to_string(path).await?;

        let transformer = DocstringTransformer::new(&self.config, self.generator.as_ref());
        let outcome = transformer
            .transform(&path.to_string_lossy(), &source)
            .await?;

        // A file whose every generation attempt failed accomplished nothing;
        // report it for retry instead of writing an unchanged copy
        if outcome.inserted == 0 && !outcome.skipped.is_empty() {
            let causes: Vec<String> = outcome
                .skipped
                .iter()
                .map(|s| format!("{} ({})", s.name, s.error))
                .collect();
            return Err(GenerateError {
                kind: outcome.skipped[0].error.kind,
                message: format!("all definitions failed: {}", causes.join(", ")),
                provider: outcome.skipped[0].error.provider.clone(),
            }
            .into());
        }

        tokio::fs::write(&output, &outcome.code).await?;

        Ok(FileOutcome::Written {
            output,
            inserted: outcome.inserted,
            skipped: outcome.skipped,
        })
    }

    /// In-place mode rewrites the original; copy mode derives a sibling
    /// prefixed with `modified_`
    fn output_path(&self, path: &Path) -> PathBuf {
        if self.config.inplace {
            return path.to_path_buf();
        }

        let basename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        path.with_file_name(format!("{}{}", OUTPUT_FILE_PREFIX, basename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{DocstringGenerator, GenerateRequest};
    use crate::schema::{ClassDocstring, DocstringData, FunctionDocstring};
    use async_trait::async_trait;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    /// Succeeds unless the definition mentions the poison marker
    struct MarkerGenerator;

    #[async_trait]
    impl DocstringGenerator for MarkerGenerator {
        async fn generate(
            &self,
            request: &GenerateRequest,
        ) -> std::result::Result<DocstringData, GenerateError> {
            if request.definition.contains("poison") {
                return Err(GenerateError::content_too_large("definition too large"));
            }
            Ok(match request.kind {
                crate::types::DefinitionKind::Function => {
                    DocstringData::Function(FunctionDocstring {
                        description: "Does work.".to_string(),
                        ..Default::default()
                    })
                }
                crate::types::DefinitionKind::Class => DocstringData::Class(ClassDocstring {
                    description: "Holds state.".to_string(),
                }),
            })
        }

        fn name(&self) -> &str {
            "marker"
        }
    }

    fn driver_for(dir: &TempDir, configure: impl FnOnce(&mut Config)) -> BatchDriver {
        let mut config = Config {
            include: vec![format!("{}/*.py", dir.path().display())],
            exclude: vec![format!("{}/modified_*.py", dir.path().display())],
            ..Default::default()
        };
        configure(&mut config);
        BatchDriver::new(config, Arc::new(MarkerGenerator))
    }

    fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn test_copy_mode_writes_modified_sibling() {
        let dir = TempDir::new().unwrap();
        let input = write_file(&dir, "a.py", "def f():\n    return 1\n");

        let report = driver_for(&dir, |_| {}).run().await.unwrap();

        let output = dir.path().join("modified_a.py");
        assert_eq!(report.outputs.get(&input), Some(&output));

        let written = fs::read_to_string(&output).unwrap();
        assert!(written.contains("\"\"\"Does work.\"\"\""));
        // Original is untouched in copy mode
        assert_eq!(
            fs::read_to_string(&input).unwrap(),
            "def f():\n    return 1\n"
        );
    }

    #[tokio::test]
    async fn test_inplace_mode_rewrites_original() {
        let dir = TempDir::new().unwrap();
        let input = write_file(&dir, "a.py", "def f():\n    return 1\n");

        let report = driver_for(&dir, |c| c.inplace = true).run().await.unwrap();

        assert_eq!(report.outputs.get(&input), Some(&input));
        assert!(fs::read_to_string(&input).unwrap().contains("\"\"\"Does work.\"\"\""));
    }

    #[tokio::test]
    async fn test_partial_failure_isolation() {
        let dir = TempDir::new().unwrap();
        let good_a = write_file(&dir, "a.py", "def f():\n    return 1\n");
        let bad = write_file(&dir, "k.py", "def poison():\n    return 0\n");
        let good_b = write_file(&dir, "z.py", "def g():\n    return 2\n");

        let report = driver_for(&dir, |_| {}).run().await.unwrap();

        assert!(report.outputs.contains_key(&good_a));
        assert!(report.outputs.contains_key(&good_b));
        assert!(!report.outputs.contains_key(&bad));

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].path, bad);
        assert!(matches!(
            report.failures[0].error,
            DocsmithError::Generate(ref e) if e.is_capacity()
        ));
    }

    #[tokio::test]
    async fn test_mixed_file_writes_and_records_skips() {
        let dir = TempDir::new().unwrap();
        let input = write_file(
            &dir,
            "a.py",
            "def f():\n    return 1\n\n\ndef poison():\n    return 0\n",
        );

        let report = driver_for(&dir, |_| {}).run().await.unwrap();

        // One definition succeeded, so the file is written with the other
        // recorded as a skip
        assert!(report.outputs.contains_key(&input));
        assert_eq!(report.definition_skips.len(), 1);
        assert_eq!(report.definition_skips[0].1.name, "poison");

        let written = fs::read_to_string(dir.path().join("modified_a.py")).unwrap();
        assert!(written.contains("def f():\n    \"\"\"Does work.\"\"\""));
        assert!(written.contains("def poison():\n    return 0\n"));
    }

    #[tokio::test]
    async fn test_conflict_fail_mode() {
        let dir = TempDir::new().unwrap();
        let input = write_file(&dir, "a.py", "def f():\n    return 1\n");
        write_file(&dir, "modified_a.py", "existing\n");

        let report = driver_for(&dir, |_| {}).run().await.unwrap();

        assert!(!report.outputs.contains_key(&input));
        assert_eq!(report.failures.len(), 1);
        assert!(matches!(
            report.failures[0].error,
            DocsmithError::OutputConflict { .. }
        ));
        // Never silently overwritten
        assert_eq!(
            fs::read_to_string(dir.path().join("modified_a.py")).unwrap(),
            "existing\n"
        );
    }

    #[tokio::test]
    async fn test_conflict_skip_mode() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "a.py", "def f():\n    return 1\n");
        write_file(&dir, "modified_a.py", "existing\n");

        let report = driver_for(&dir, |c| c.on_conflict = OnConflict::Skip)
            .run()
            .await
            .unwrap();

        assert!(report.outputs.is_empty());
        assert!(report.failures.is_empty());
        assert_eq!(
            fs::read_to_string(dir.path().join("modified_a.py")).unwrap(),
            "existing\n"
        );
    }

    #[tokio::test]
    async fn test_empty_selection_is_fatal() {
        let dir = TempDir::new().unwrap();
        let err = driver_for(&dir, |_| {}).run().await.unwrap_err();
        assert!(matches!(err, DocsmithError::Selection(_)));
    }

    #[tokio::test]
    async fn test_file_without_definitions_round_trips() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "a.py", "x = 1\ny = 2\n");

        let report = driver_for(&dir, |_| {}).run().await.unwrap();
        assert_eq!(report.outputs.len(), 1);
        assert_eq!(
            fs::read_to_string(dir.path().join("modified_a.py")).unwrap(),
            "x = 1\ny = 2\n"
        );
    }
}
