//! Offline evaluation of answer quality with an LLM judge.
//!
//! Each question is answered by the engine; answered questions are then
//! scored for faithfulness (nothing beyond the context) and relevance
//! (addresses the question) by a judge model.

mod judge;

pub use judge::Judge;

use crate::engine::AnswerEngine;
use crate::types::AnswerOptions;
use chrono::{DateTime, Utc};
use grounded_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Placeholder recorded when an item has no expected answer.
pub const NO_GROUND_TRUTH: &str = "(no ground truth)";

/// Answers longer than this are truncated in records.
const ANSWER_PREVIEW_CHARS: usize = 200;

/// One question of an eval set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalItem {
    pub question: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_answer: Option<String>,
}

/// Outcome for one eval item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalRecord {
    pub question: String,
    pub expected: String,
    pub answer: String,
    pub used_llm: bool,
    pub faithful: bool,
    pub relevant: bool,
}

impl EvalRecord {
    pub fn passed(&self) -> bool {
        self.faithful && self.relevant
    }
}

/// Aggregate scores. Percentages of faithful and relevant answers are
/// relative to answered items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalSummary {
    pub total: usize,
    pub answered: usize,
    pub faithful: usize,
    pub relevant: usize,
    pub answered_pct: f64,
    pub faithful_pct: f64,
    pub relevant_pct: f64,
}

impl EvalSummary {
    fn from_records(records: &[EvalRecord]) -> Self {
        let total = records.len();
        let answered = records.iter().filter(|r| r.used_llm).count();
        let faithful = records.iter().filter(|r| r.faithful).count();
        let relevant = records.iter().filter(|r| r.relevant).count();

        Self {
            total,
            answered,
            faithful,
            relevant,
            answered_pct: percent(answered, total),
            faithful_pct: percent(faithful, answered),
            relevant_pct: percent(relevant, answered),
        }
    }
}

fn percent(count: usize, of: usize) -> f64 {
    if of == 0 {
        0.0
    } else {
        count as f64 / of as f64 * 100.0
    }
}

/// Full result of an eval run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalReport {
    pub generated_at: DateTime<Utc>,
    pub records: Vec<EvalRecord>,
    pub summary: EvalSummary,
}

/// Default eval set location for a workspace.
pub fn default_eval_path(workspace: &Path) -> PathBuf {
    workspace.join("eval").join("eval_set.json")
}

/// Load an eval set from a JSON array file.
pub fn load_eval_set(path: &Path) -> AppResult<Vec<EvalItem>> {
    if !path.exists() {
        return Err(AppError::Eval(format!("Eval set {:?} not found", path)));
    }

    let content = fs::read_to_string(path)
        .map_err(|e| AppError::Eval(format!("Failed to read eval set {:?}: {}", path, e)))?;

    serde_json::from_str(&content)
        .map_err(|e| AppError::Eval(format!("Failed to parse eval set {:?}: {}", path, e)))
}

/// Answer and score every item in order.
///
/// `on_record` is called after each item with its 0-based position, so
/// callers can report progress.
pub async fn run_eval<F>(
    engine: &AnswerEngine,
    judge: &Judge,
    items: &[EvalItem],
    mut on_record: F,
) -> AppResult<EvalReport>
where
    F: FnMut(usize, &EvalRecord),
{
    tracing::info!("Running eval on {} questions", items.len());

    let mut records = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let result = engine
            .answer_with(&item.question, AnswerOptions::with_context())
            .await?;
        let context = result.context.unwrap_or_default();

        let (faithful, relevant) = if result.used_llm {
            let faithful = judge
                .score_faithfulness(&context, &item.question, &result.answer)
                .await?;
            let relevant = judge
                .score_relevance(&item.question, &result.answer)
                .await?;
            (faithful, relevant)
        } else {
            (false, false)
        };

        let record = EvalRecord {
            question: item.question.clone(),
            expected: item
                .expected_answer
                .clone()
                .unwrap_or_else(|| NO_GROUND_TRUTH.to_string()),
            answer: preview(&result.answer),
            used_llm: result.used_llm,
            faithful,
            relevant,
        };

        tracing::debug!(
            "Eval item {}: used_llm={} faithful={} relevant={}",
            i + 1,
            record.used_llm,
            record.faithful,
            record.relevant
        );

        on_record(i, &record);
        records.push(record);
    }

    let summary = EvalSummary::from_records(&records);
    tracing::info!(
        "Eval complete: {}/{} answered, {} faithful, {} relevant",
        summary.answered,
        summary.total,
        summary.faithful,
        summary.relevant
    );

    Ok(EvalReport {
        generated_at: Utc::now(),
        records,
        summary,
    })
}

fn preview(answer: &str) -> String {
    if answer.chars().count() > ANSWER_PREVIEW_CHARS {
        let head: String = answer.chars().take(ANSWER_PREVIEW_CHARS).collect();
        format!("{}...", head)
    } else {
        answer.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(used_llm: bool, faithful: bool, relevant: bool) -> EvalRecord {
        EvalRecord {
            question: "q".to_string(),
            expected: NO_GROUND_TRUTH.to_string(),
            answer: "a".to_string(),
            used_llm,
            faithful,
            relevant,
        }
    }

    #[test]
    fn test_summary_relative_to_answered() {
        let records = vec![
            record(true, true, true),
            record(true, false, true),
            record(false, false, false),
            record(false, false, false),
        ];

        let summary = EvalSummary::from_records(&records);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.answered, 2);
        assert_eq!(summary.answered_pct, 50.0);
        assert_eq!(summary.faithful_pct, 50.0);
        assert_eq!(summary.relevant_pct, 100.0);
    }

    #[test]
    fn test_summary_with_nothing_answered() {
        let summary = EvalSummary::from_records(&[record(false, false, false)]);
        assert_eq!(summary.faithful_pct, 0.0);
        assert_eq!(summary.relevant_pct, 0.0);

        let empty = EvalSummary::from_records(&[]);
        assert_eq!(empty.answered_pct, 0.0);
    }

    #[test]
    fn test_preview_truncates_long_answers() {
        assert_eq!(preview("short"), "short");

        let exact = "x".repeat(200);
        assert_eq!(preview(&exact), exact);

        let long = "é".repeat(250);
        let shown = preview(&long);
        assert_eq!(shown.chars().count(), 203);
        assert!(shown.ends_with("..."));
    }

    #[test]
    fn test_load_eval_set() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("eval_set.json");
        fs::write(
            &path,
            r#"[{"question": "What is X?", "expected_answer": "X is Y."}, {"question": "Who?"}]"#,
        )
        .unwrap();

        let items = load_eval_set(&path).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].expected_answer.as_deref(), Some("X is Y."));
        assert_eq!(items[1].expected_answer, None);
    }

    #[test]
    fn test_load_missing_eval_set() {
        let temp = TempDir::new().unwrap();
        let err = load_eval_set(&default_eval_path(temp.path())).unwrap_err();
        assert!(matches!(err, AppError::Eval(_)));
    }
}
