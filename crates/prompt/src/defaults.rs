//! Built-in prompt definitions.

use crate::types::PromptDefinition;

/// Fixed refusal returned whenever the system declines to answer.
///
/// Consumers compare against this literal, so it must never change.
pub const REFUSAL_ANSWER: &str = "I don't know based on the provided documents.";

/// Grounded answering prompt: system rules plus context and question.
pub const ANSWER_PROMPT_ID: &str = "rag.answer";

/// LLM-as-judge prompt checking an answer against its context.
pub const FAITHFULNESS_PROMPT_ID: &str = "eval.faithfulness";

/// LLM-as-judge prompt checking an answer addresses the question.
pub const RELEVANCE_PROMPT_ID: &str = "eval.relevance";

const ANSWER_SYSTEM: &str = concat!(
    "You are a helpful assistant.\n",
    "Answer ONLY using the provided context.\n",
    "If the answer is not in the context, say: \"I don't know based on the provided documents.\"\n",
);

const ANSWER_TEMPLATE: &str = "Context:\n{{context}}\n\nQuestion: {{question}}";

const FAITHFULNESS_TEMPLATE: &str = concat!(
    "You are evaluating whether an AI answer is faithful to the provided context.\n\n",
    "Context:\n{{context}}\n\n",
    "Question: {{question}}\n\n",
    "Answer: {{answer}}\n\n",
    "Does the answer contain ANY information that is not present in or directly inferable from the context?\n",
    "Answer with exactly one word: Yes or No",
);

const RELEVANCE_TEMPLATE: &str = concat!(
    "You are evaluating whether an AI answer relevantly addresses the question.\n\n",
    "Question: {{question}}\n\n",
    "Answer: {{answer}}\n\n",
    "Does the answer directly address the question in a relevant way?\n",
    "Answer with exactly one word: Yes or No",
);

const ANSWER_VARIABLES: &[&str] = &["context", "question"];
const FAITHFULNESS_VARIABLES: &[&str] = &["context", "question", "answer"];
const RELEVANCE_VARIABLES: &[&str] = &["question", "answer"];

/// IDs of every built-in prompt.
pub const BUILTIN_PROMPT_IDS: [&str; 3] =
    [ANSWER_PROMPT_ID, FAITHFULNESS_PROMPT_ID, RELEVANCE_PROMPT_ID];

/// Look up a built-in prompt definition by ID.
pub fn builtin_prompt(id: &str) -> Option<PromptDefinition> {
    let (title, system, template, required): (&str, Option<&str>, &str, &[&str]) = match id {
        ANSWER_PROMPT_ID => (
            "Grounded answer",
            Some(ANSWER_SYSTEM),
            ANSWER_TEMPLATE,
            ANSWER_VARIABLES,
        ),
        FAITHFULNESS_PROMPT_ID => (
            "Faithfulness judge",
            None,
            FAITHFULNESS_TEMPLATE,
            FAITHFULNESS_VARIABLES,
        ),
        RELEVANCE_PROMPT_ID => (
            "Relevance judge",
            None,
            RELEVANCE_TEMPLATE,
            RELEVANCE_VARIABLES,
        ),
        _ => return None,
    };

    Some(PromptDefinition {
        id: id.to_string(),
        title: title.to_string(),
        api_version: "1.0".to_string(),
        created_by: "builtin".to_string(),
        system: system.map(str::to_string),
        template: template.to_string(),
        required_variables: required.iter().map(|v| v.to_string()).collect(),
    })
}
