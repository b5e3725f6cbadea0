//! Read-only LanceDB similarity index.

use crate::embeddings::EmbeddingProvider;
use crate::index::SimilarityIndex;
use crate::types::{Passage, ScoredPassage};
use arrow_array::{Array, Float32Array, RecordBatch, StringArray};
use futures::TryStreamExt;
use grounded_core::{AppError, AppResult};
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::{DistanceType, Table};
use std::path::Path;
use std::sync::Arc;

/// Column holding the passage text.
const TEXT_COLUMN: &str = "text";
/// Optional column holding the source label.
const SOURCE_COLUMN: &str = "source";
/// Optional column holding a JSON metadata object.
const METADATA_COLUMN: &str = "metadata";
/// Distance column appended by vector search.
const DISTANCE_COLUMN: &str = "_distance";

/// LanceDB-backed similarity index over an existing passage table.
pub struct LanceDbIndex {
    table: Table,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl LanceDbIndex {
    /// Open an existing LanceDB table.
    ///
    /// # Arguments
    /// * `db_path` - Directory of the LanceDB database
    /// * `table_name` - Name of the passage table (typically "passages")
    /// * `embedder` - Provider used to embed queries; must match the one that
    ///   built the index
    pub async fn open(
        db_path: &Path,
        table_name: &str,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> AppResult<Self> {
        if !db_path.exists() {
            return Err(AppError::Index(format!(
                "No index found at {:?}. Build the index before asking questions.",
                db_path
            )));
        }

        let uri = db_path.to_string_lossy().to_string();
        let conn = lancedb::connect(&uri)
            .execute()
            .await
            .map_err(|e| AppError::Index(format!("Failed to connect to LanceDB: {}", e)))?;

        let table = conn
            .open_table(table_name)
            .execute()
            .await
            .map_err(|e| {
                AppError::Index(format!("Failed to open table '{}': {}", table_name, e))
            })?;

        tracing::debug!(
            "Opened LanceDB index at {:?} (table '{}', embedder {}/{})",
            db_path,
            table_name,
            embedder.provider_name(),
            embedder.model_name()
        );

        Ok(Self { table, embedder })
    }
}

#[async_trait::async_trait]
impl SimilarityIndex for LanceDbIndex {
    async fn search_with_scores(&self, query: &str, k: usize) -> AppResult<Vec<ScoredPassage>> {
        let query_embedding = self.embedder.embed(query).await?;

        let batches = self
            .table
            .query()
            .nearest_to(query_embedding)
            .map_err(|e| AppError::Index(format!("Failed to create query: {}", e)))?
            .distance_type(DistanceType::L2)
            .limit(k)
            .execute()
            .await
            .map_err(|e| AppError::Index(format!("Failed to execute search: {}", e)))?
            .try_collect::<Vec<_>>()
            .await
            .map_err(|e| AppError::Index(format!("Failed to collect results: {}", e)))?;

        let mut results = Vec::new();
        for batch in &batches {
            results.extend(batch_to_passages(batch)?);
        }

        results.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        results.truncate(k);

        tracing::debug!(
            "Retrieved {} passages (requested top-{})",
            results.len(),
            k
        );

        Ok(results)
    }
}

/// Convert one search result batch into scored passages.
fn batch_to_passages(batch: &RecordBatch) -> AppResult<Vec<ScoredPassage>> {
    let texts = string_column(batch, TEXT_COLUMN)?
        .ok_or_else(|| AppError::Index(format!("Missing '{}' column", TEXT_COLUMN)))?;
    let distances = batch
        .column_by_name(DISTANCE_COLUMN)
        .ok_or_else(|| AppError::Index(format!("Missing '{}' column", DISTANCE_COLUMN)))?
        .as_any()
        .downcast_ref::<Float32Array>()
        .ok_or_else(|| AppError::Index(format!("Invalid '{}' column", DISTANCE_COLUMN)))?;
    let sources = string_column(batch, SOURCE_COLUMN)?;
    let metadata = string_column(batch, METADATA_COLUMN)?;

    let mut passages = Vec::with_capacity(batch.num_rows());
    for row in 0..batch.num_rows() {
        let mut fields = match metadata {
            Some(column) if !column.is_null(row) => parse_metadata(column.value(row))?,
            _ => serde_json::Map::new(),
        };

        if let Some(column) = sources {
            if !column.is_null(row) {
                fields.insert(
                    "source".to_string(),
                    serde_json::Value::String(column.value(row).to_string()),
                );
            }
        }

        let text = if texts.is_null(row) {
            String::new()
        } else {
            texts.value(row).to_string()
        };

        passages.push(ScoredPassage::new(
            Passage {
                text,
                metadata: fields,
            },
            distances.value(row),
        ));
    }

    Ok(passages)
}

/// Look up an optional Utf8 column by name.
fn string_column<'a>(batch: &'a RecordBatch, name: &str) -> AppResult<Option<&'a StringArray>> {
    match batch.column_by_name(name) {
        None => Ok(None),
        Some(column) => column
            .as_any()
            .downcast_ref::<StringArray>()
            .map(Some)
            .ok_or_else(|| AppError::Index(format!("Invalid '{}' column", name))),
    }
}

fn parse_metadata(raw: &str) -> AppResult<serde_json::Map<String, serde_json::Value>> {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Object(map)) => Ok(map),
        Ok(_) => Err(AppError::Index(
            "Passage metadata is not a JSON object".to_string(),
        )),
        Err(e) => Err(AppError::Index(format!(
            "Failed to parse passage metadata: {}",
            e
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow_schema::{DataType, Field, Schema};

    fn batch(with_source: bool) -> RecordBatch {
        let mut fields = vec![
            Field::new(TEXT_COLUMN, DataType::Utf8, false),
            Field::new(METADATA_COLUMN, DataType::Utf8, true),
        ];
        let mut columns: Vec<Arc<dyn Array>> = vec![
            Arc::new(StringArray::from(vec!["alpha", "beta"])),
            Arc::new(StringArray::from(vec![
                Some(r#"{"source":"meta.md","page":3}"#),
                None,
            ])),
        ];

        if with_source {
            fields.push(Field::new(SOURCE_COLUMN, DataType::Utf8, true));
            columns.push(Arc::new(StringArray::from(vec![Some("column.md"), None])));
        }

        fields.push(Field::new(DISTANCE_COLUMN, DataType::Float32, true));
        columns.push(Arc::new(Float32Array::from(vec![0.1_f32, 0.4])));

        RecordBatch::try_new(Arc::new(Schema::new(fields)), columns).unwrap()
    }

    #[test]
    fn test_batch_with_metadata_only() {
        let passages = batch_to_passages(&batch(false)).unwrap();

        assert_eq!(passages.len(), 2);
        assert_eq!(passages[0].passage.text, "alpha");
        assert_eq!(passages[0].passage.source(), "meta.md");
        assert_eq!(passages[0].passage.metadata["page"], serde_json::json!(3));
        assert_eq!(passages[0].distance, 0.1_f32);
        assert_eq!(passages[1].passage.source(), "unknown");
    }

    #[test]
    fn test_source_column_wins_over_metadata() {
        let passages = batch_to_passages(&batch(true)).unwrap();
        assert_eq!(passages[0].passage.source(), "column.md");
        assert_eq!(passages[1].passage.source(), "unknown");
    }

    #[test]
    fn test_missing_distance_column() {
        let schema = Schema::new(vec![Field::new(TEXT_COLUMN, DataType::Utf8, false)]);
        let batch = RecordBatch::try_new(
            Arc::new(schema),
            vec![Arc::new(StringArray::from(vec!["alpha"])) as Arc<dyn Array>],
        )
        .unwrap();

        let err = batch_to_passages(&batch).unwrap_err();
        assert!(err.to_string().contains("_distance"));
    }

    #[test]
    fn test_metadata_must_be_object() {
        assert!(parse_metadata("[1,2]").is_err());
        assert!(parse_metadata("not json").is_err());
        assert_eq!(parse_metadata("{}").unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_open_missing_path() {
        let temp = tempfile::TempDir::new().unwrap();
        let embedder: Arc<dyn EmbeddingProvider> =
            Arc::new(crate::embeddings::providers::mock::MockProvider::new(16));

        let result = LanceDbIndex::open(&temp.path().join("absent"), "passages", embedder).await;
        assert!(matches!(result, Err(AppError::Index(_))));
    }
}
