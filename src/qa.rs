use crate::models::ScoredDocument;

/// Prompt template for the question-answering loop
pub const ANSWER_TEMPLATE: &str = "
You are an expert in answering questions about all schemes for farmers in India.

Use the following context from the scheme database to answer the user's question.
If you don't know the answer based on the context, say so - don't make up information.

Context:
{context}

Question: {question}

Answer:
";

/// Format retrieved documents into a readable context string
pub fn format_context(documents: &[ScoredDocument]) -> String {
    documents
        .iter()
        .map(|hit| format!("Scheme: {}", hit.document.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Substitute context and question into the answer template
pub fn build_prompt(context: &str, question: &str) -> String {
    ANSWER_TEMPLATE
        .replace("{context}", context)
        .replace("{question}", question)
}
