//! The in-memory vector index and its JSON snapshot.

use crate::error::{IndexError, IndexResult};
use askdocs_core::{Passage, RetrievalResult, ScoredPassage};
use askdocs_llm::Embedder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// One indexed passage together with its embedding vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorRecord {
    pub passage: Passage,
    pub vector: Vec<f32>,
}

/// On-disk form of the index. Written whole, read whole.
#[derive(Serialize)]
struct SnapshotRef<'a> {
    embedding_id: &'a str,
    dimension: usize,
    built_at: DateTime<Utc>,
    records: &'a [VectorRecord],
}

#[derive(Deserialize)]
struct Snapshot {
    embedding_id: String,
    dimension: usize,
    built_at: DateTime<Utc>,
    records: Vec<VectorRecord>,
}

/// Summary of a snapshot file, for status reporting.
#[derive(Debug, Clone)]
pub struct SnapshotInfo {
    pub embedding_id: String,
    pub dimension: usize,
    pub built_at: DateTime<Utc>,
    pub record_count: usize,
}

/// Read just the summary of a snapshot without keeping the records.
pub fn snapshot_info(path: &Path) -> IndexResult<SnapshotInfo> {
    if !path.exists() {
        return Err(IndexError::SnapshotMissing(path.to_path_buf()));
    }
    let data = fs::read(path)?;
    let snapshot: Snapshot = serde_json::from_slice(&data)?;
    Ok(SnapshotInfo {
        embedding_id: snapshot.embedding_id,
        dimension: snapshot.dimension,
        built_at: snapshot.built_at,
        record_count: snapshot.records.len(),
    })
}

/// Immutable nearest-neighbor index over embedded passages.
///
/// Built once from a batch of passages, searched by cosine similarity,
/// and persisted as a single JSON snapshot. Equal scores keep build
/// order, so repeated searches over the same index are deterministic.
pub struct VectorIndex {
    records: Vec<VectorRecord>,
    dimension: usize,
    embedding_id: String,
    built_at: DateTime<Utc>,
}

impl VectorIndex {
    /// Embed all passages in batches and build the index. Fails whole:
    /// any embedding error aborts the build with nothing kept.
    pub async fn build(
        passages: Vec<Passage>,
        embedder: &dyn Embedder,
        batch_size: usize,
    ) -> IndexResult<Self> {
        if passages.is_empty() {
            return Err(IndexError::NoPassages);
        }

        let batch_size = batch_size.max(1);
        let mut records = Vec::with_capacity(passages.len());
        let mut dimension = 0usize;

        for batch in passages.chunks(batch_size) {
            let texts: Vec<String> = batch.iter().map(|p| p.text.clone()).collect();
            let vectors = embedder
                .embed(&texts)
                .await
                .map_err(IndexError::Embedding)?;

            if vectors.len() != batch.len() {
                return Err(IndexError::EmbeddingCount {
                    expected: batch.len(),
                    actual: vectors.len(),
                });
            }

            for (passage, vector) in batch.iter().zip(vectors) {
                if dimension == 0 {
                    dimension = vector.len();
                }
                if vector.is_empty() || vector.len() != dimension {
                    return Err(IndexError::DimensionMismatch {
                        expected: dimension,
                        actual: vector.len(),
                    });
                }
                records.push(VectorRecord {
                    passage: passage.clone(),
                    vector,
                });
            }

            debug!("Embedded {}/{} passages", records.len(), passages.len());
        }

        info!(
            "Built index: {} passages, dimension {}, embedding '{}'",
            records.len(),
            dimension,
            embedder.identifier()
        );

        Ok(Self {
            records,
            dimension,
            embedding_id: embedder.identifier().to_string(),
            built_at: Utc::now(),
        })
    }

    /// Return the top `k` passages by cosine similarity to the query
    /// vector. Fewer than `k` records yields all of them.
    pub fn search(&self, query_vector: &[f32], k: usize) -> IndexResult<RetrievalResult> {
        if k == 0 {
            return Err(IndexError::InvalidTopK);
        }
        if query_vector.len() != self.dimension {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimension,
                actual: query_vector.len(),
            });
        }

        let mut scored: Vec<ScoredPassage> = self
            .records
            .iter()
            .map(|record| ScoredPassage {
                passage: record.passage.clone(),
                score: cosine_similarity(query_vector, &record.vector),
            })
            .collect();

        // Stable sort: ties keep insertion order.
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(k);

        Ok(scored)
    }

    /// Write the snapshot atomically: serialize to a temp file in the
    /// destination directory, then rename over the final path.
    pub fn save(&self, path: &Path) -> IndexResult<()> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent)?;

        let snapshot = SnapshotRef {
            embedding_id: &self.embedding_id,
            dimension: self.dimension,
            built_at: self.built_at,
            records: &self.records,
        };

        let temp = NamedTempFile::new_in(parent)?;
        {
            let mut writer = BufWriter::new(temp.as_file());
            serde_json::to_writer(&mut writer, &snapshot)?;
            writer.flush()?;
        }
        temp.persist(path)
            .map_err(|e| IndexError::Persist(e.to_string()))?;

        info!("Saved index snapshot to {:?} ({} records)", path, self.records.len());
        Ok(())
    }

    /// Load a snapshot, refusing one that was built with a different
    /// embedding function than the one currently configured.
    pub fn load(path: &Path, expected_identifier: &str) -> IndexResult<Self> {
        if !path.exists() {
            return Err(IndexError::SnapshotMissing(path.to_path_buf()));
        }

        let data = fs::read(path)?;
        let snapshot: Snapshot = serde_json::from_slice(&data)?;

        if snapshot.embedding_id != expected_identifier {
            return Err(IndexError::IncompatibleSnapshot {
                expected: expected_identifier.to_string(),
                found: snapshot.embedding_id,
            });
        }

        info!(
            "Loaded index snapshot from {:?} ({} records, embedding '{}')",
            path,
            snapshot.records.len(),
            snapshot.embedding_id
        );

        Ok(Self {
            records: snapshot.records,
            dimension: snapshot.dimension,
            embedding_id: snapshot.embedding_id,
            built_at: snapshot.built_at,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn embedding_identifier(&self) -> &str {
        &self.embedding_id
    }
}

/// Cosine similarity between two equal-length vectors. Zero vectors
/// score 0.0 instead of dividing by zero.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
