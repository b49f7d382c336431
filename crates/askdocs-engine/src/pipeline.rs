//! Directory ingestion: discover, extract, chunk, embed, persist.

use crate::error::{EngineError, EngineResult};
use askdocs_config::Config;
use askdocs_core::Passage;
use askdocs_extract::{ExtractError, ExtractorRegistry};
use askdocs_index::{SplitConfig, TextSplitter, VectorIndex};
use askdocs_llm::Embedder;
use futures_util::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// What one ingestion run did.
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    /// Candidate files found under the documents directory.
    pub files_seen: usize,
    /// Files that yielded at least one passage.
    pub files_indexed: usize,
    /// Files skipped because extraction failed or nothing was left
    /// after chunking.
    pub files_skipped: usize,
    /// Passages in the resulting index.
    pub passage_count: usize,
    /// True when an existing snapshot was loaded instead of rebuilding.
    pub reused_snapshot: bool,
}

/// Turns a directory of documents into a built, persisted index.
///
/// Ingestion is idempotent: when a snapshot already exists at the
/// configured path it is loaded and returned without touching the
/// documents or the embedding API. A snapshot built with a different
/// embedding function is an error; deleting the snapshot forces a
/// rebuild.
pub struct IngestPipeline {
    splitter: TextSplitter,
    registry: Arc<ExtractorRegistry>,
    embedder: Arc<dyn Embedder>,
    snapshot_path: PathBuf,
    extensions: Vec<String>,
    max_concurrent_files: usize,
    embed_batch_size: usize,
}

impl IngestPipeline {
    pub fn new(
        config: &Config,
        embedder: Arc<dyn Embedder>,
        snapshot_path: PathBuf,
    ) -> EngineResult<Self> {
        let splitter = TextSplitter::new(SplitConfig {
            chunk_size: config.chunking.chunk_size,
            chunk_overlap: config.chunking.chunk_overlap,
        })?;

        Ok(Self {
            splitter,
            registry: Arc::new(ExtractorRegistry::with_defaults()),
            embedder,
            snapshot_path,
            extensions: config.ingest.extensions.clone(),
            max_concurrent_files: config.ingest.max_concurrent_files.max(1),
            embed_batch_size: config.ingest.embed_batch_size,
        })
    }

    /// Ingest the directory, or load the existing snapshot.
    pub async fn run(&self, docs_dir: &Path) -> EngineResult<(VectorIndex, IngestReport)> {
        if self.snapshot_path.exists() {
            let index = VectorIndex::load(&self.snapshot_path, self.embedder.identifier())?;
            info!(
                "Reusing existing snapshot ({} passages); delete it to rebuild",
                index.len()
            );
            let report = IngestReport {
                passage_count: index.len(),
                reused_snapshot: true,
                ..Default::default()
            };
            return Ok((index, report));
        }

        if !docs_dir.is_dir() {
            return Err(EngineError::DocsDirMissing(docs_dir.to_path_buf()));
        }

        let files = self.discover_files(docs_dir);
        info!("Found {} candidate files in {:?}", files.len(), docs_dir);

        let mut report = IngestReport {
            files_seen: files.len(),
            ..Default::default()
        };

        // Extraction and chunking are blocking work; run a bounded
        // number of files at a time on the blocking pool.
        let results: Vec<(PathBuf, Result<Vec<Passage>, ExtractError>)> =
            stream::iter(files.into_iter().map(|path| {
                let registry = Arc::clone(&self.registry);
                let splitter = self.splitter.clone();
                async move {
                    let task_path = path.clone();
                    let outcome = tokio::task::spawn_blocking(move || {
                        let docs = registry.extract(&task_path)?;
                        Ok::<_, ExtractError>(splitter.split_documents(&docs))
                    })
                    .await
                    .map_err(|e| EngineError::Task(e.to_string()))?;
                    Ok::<_, EngineError>((path, outcome))
                }
            }))
            .buffer_unordered(self.max_concurrent_files)
            .collect::<Vec<EngineResult<_>>>()
            .await
            .into_iter()
            .collect::<EngineResult<Vec<_>>>()?;

        // Completion order is nondeterministic; re-sort so the index
        // is built in a stable file order.
        let mut per_file: Vec<(PathBuf, Vec<Passage>)> = Vec::new();
        for (path, outcome) in results {
            match outcome {
                Ok(passages) if !passages.is_empty() => {
                    debug!("{:?}: {} passages", path, passages.len());
                    per_file.push((path, passages));
                }
                Ok(_) => {
                    warn!("Skipping {:?}: no text after extraction", path);
                    report.files_skipped += 1;
                }
                Err(e) => {
                    warn!("Skipping {:?}: {}", path, e);
                    report.files_skipped += 1;
                }
            }
        }
        per_file.sort_by(|a, b| a.0.cmp(&b.0));

        report.files_indexed = per_file.len();
        let passages: Vec<Passage> = per_file.into_iter().flat_map(|(_, p)| p).collect();

        if passages.is_empty() {
            return Err(EngineError::EmptyCorpus);
        }

        report.passage_count = passages.len();
        let index =
            VectorIndex::build(passages, self.embedder.as_ref(), self.embed_batch_size).await?;
        index.save(&self.snapshot_path)?;

        Ok((index, report))
    }

    /// Walk the directory for files with a configured extension,
    /// skipping hidden files and directories.
    fn discover_files(&self, docs_dir: &Path) -> Vec<PathBuf> {
        WalkDir::new(docs_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0
                    || !entry
                        .file_name()
                        .to_str()
                        .map(|name| name.starts_with('.'))
                        .unwrap_or(false)
            })
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| {
                path.extension()
                    .and_then(|e| e.to_str())
                    .map(|ext| {
                        self.extensions
                            .iter()
                            .any(|wanted| wanted.eq_ignore_ascii_case(ext))
                    })
                    .unwrap_or(false)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use askdocs_llm::{Embedder, LlmResult};
    use async_trait::async_trait;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;

    struct CountingEmbedder {
        identifier: String,
        calls: AtomicUsize,
    }

    impl CountingEmbedder {
        fn new(identifier: &str) -> Self {
            Self {
                identifier: identifier.to_string(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Embedder for CountingEmbedder {
        async fn embed(&self, texts: &[String]) -> LlmResult<Vec<Vec<f32>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(texts
                .iter()
                .map(|t| vec![t.len() as f32, 1.0, 2.0])
                .collect())
        }

        fn identifier(&self) -> &str {
            &self.identifier
        }
    }

    fn pipeline(
        embedder: Arc<CountingEmbedder>,
        snapshot: PathBuf,
    ) -> IngestPipeline {
        IngestPipeline::new(&Config::default(), embedder, snapshot).unwrap()
    }

    #[tokio::test]
    async fn test_ingest_builds_and_snapshots() {
        let docs = tempdir().unwrap();
        let data = tempdir().unwrap();
        let snapshot = data.path().join("index.json");

        fs::write(docs.path().join("a.txt"), "alpha document text").unwrap();
        fs::write(docs.path().join("b.md"), "# Beta\n\nmarkdown body").unwrap();
        fs::write(docs.path().join("ignored.xyz"), "not a supported type").unwrap();

        let embedder = Arc::new(CountingEmbedder::new("test-embed"));
        let p = pipeline(Arc::clone(&embedder), snapshot.clone());

        let (index, report) = p.run(docs.path()).await.unwrap();
        assert!(!report.reused_snapshot);
        assert_eq!(report.files_seen, 2);
        assert_eq!(report.files_indexed, 2);
        assert_eq!(report.files_skipped, 0);
        assert_eq!(index.len(), report.passage_count);
        assert!(snapshot.exists());
        assert!(embedder.calls.load(Ordering::SeqCst) >= 1);
    }

    #[tokio::test]
    async fn test_second_run_reuses_snapshot() {
        let docs = tempdir().unwrap();
        let data = tempdir().unwrap();
        let snapshot = data.path().join("index.json");

        fs::write(docs.path().join("a.txt"), "alpha document text").unwrap();

        let embedder = Arc::new(CountingEmbedder::new("test-embed"));
        let p = pipeline(Arc::clone(&embedder), snapshot.clone());
        p.run(docs.path()).await.unwrap();

        let calls_after_build = embedder.calls.load(Ordering::SeqCst);
        let (index, report) = p.run(docs.path()).await.unwrap();
        assert!(report.reused_snapshot);
        assert_eq!(index.len(), report.passage_count);
        // Nothing was re-embedded.
        assert_eq!(embedder.calls.load(Ordering::SeqCst), calls_after_build);
    }

    #[tokio::test]
    async fn test_incompatible_snapshot_is_an_error() {
        let docs = tempdir().unwrap();
        let data = tempdir().unwrap();
        let snapshot = data.path().join("index.json");

        fs::write(docs.path().join("a.txt"), "alpha document text").unwrap();

        let old = Arc::new(CountingEmbedder::new("embed-v1"));
        pipeline(old, snapshot.clone())
            .run(docs.path())
            .await
            .unwrap();

        let new = Arc::new(CountingEmbedder::new("embed-v2"));
        let result = pipeline(new, snapshot).run(docs.path()).await;
        assert!(matches!(
            result,
            Err(EngineError::Index(
                askdocs_index::IndexError::IncompatibleSnapshot { .. }
            ))
        ));
    }

    #[tokio::test]
    async fn test_unreadable_file_is_skipped() {
        let docs = tempdir().unwrap();
        let data = tempdir().unwrap();
        let snapshot = data.path().join("index.json");

        fs::write(docs.path().join("good.txt"), "useful text").unwrap();
        // A .pdf that is not a PDF fails extraction but must not sink
        // the whole run.
        fs::write(docs.path().join("bad.pdf"), "this is not a pdf").unwrap();

        let embedder = Arc::new(CountingEmbedder::new("test-embed"));
        let (index, report) = pipeline(embedder, snapshot)
            .run(docs.path())
            .await
            .unwrap();

        assert_eq!(report.files_seen, 2);
        assert_eq!(report.files_indexed, 1);
        assert_eq!(report.files_skipped, 1);
        assert!(index.len() >= 1);
    }

    #[tokio::test]
    async fn test_empty_corpus_is_an_error() {
        let docs = tempdir().unwrap();
        let data = tempdir().unwrap();
        let snapshot = data.path().join("index.json");

        fs::write(docs.path().join("unsupported.xyz"), "text").unwrap();

        let embedder = Arc::new(CountingEmbedder::new("test-embed"));
        let result = pipeline(embedder, snapshot).run(docs.path()).await;
        assert!(matches!(result, Err(EngineError::EmptyCorpus)));
    }

    #[tokio::test]
    async fn test_missing_docs_dir() {
        let data = tempdir().unwrap();
        let snapshot = data.path().join("index.json");

        let embedder = Arc::new(CountingEmbedder::new("test-embed"));
        let result = pipeline(embedder, snapshot)
            .run(Path::new("/no/such/dir"))
            .await;
        assert!(matches!(result, Err(EngineError::DocsDirMissing(_))));
    }

    #[tokio::test]
    async fn test_hidden_files_are_ignored() {
        let docs = tempdir().unwrap();
        let data = tempdir().unwrap();
        let snapshot = data.path().join("index.json");

        fs::write(docs.path().join("visible.txt"), "visible text").unwrap();
        fs::write(docs.path().join(".hidden.txt"), "hidden text").unwrap();

        let embedder = Arc::new(CountingEmbedder::new("test-embed"));
        let (_, report) = pipeline(embedder, snapshot)
            .run(docs.path())
            .await
            .unwrap();
        assert_eq!(report.files_seen, 1);
    }
}
