use crate::models::DocumentRequirement;
use anyhow::{Context, Result};

/// Build the extraction prompt for a scheme's free-text documents field
pub fn extraction_prompt(document_text: &str) -> String {
    format!(
        r#"Analyze the following text which lists required documents for a scheme. Your task is to extract each document and classify it.

**Instructions:**
1. Identify each distinct document mentioned.
2. Determine if a document is "Required" or "Optional". A document is "Optional" ONLY if the text explicitly states a condition like "(if applicable)", "(only for...)", or "(wherever applicable)". All other documents are "Required".
3. Provide a brief, clean description for each document.
4. Return your response as a valid JSON array of objects. Each object must have three keys: "name", "status", and "description".
5. **IMPORTANT**: Do not add any text, explanation, or markdown formatting (like ```json) before or after the JSON array. Your entire output must be only the JSON array.

**Text to Analyze:**
"{document_text}"

**Example Output Format:**
[
  {{"name": "Aadhaar Card", "status": "Required", "description": "Copy of Aadhaar Card"}},
  {{"name": "Disability Certificate", "status": "Optional", "description": "Issued by Competent Authority (only for PWDs, if applicable)"}}
]"#
    )
}

/// Strip markdown code fences the model may wrap its reply in
pub fn strip_code_fences(reply: &str) -> String {
    reply
        .trim()
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Parse a model reply into requirement entries.
/// The reply must be a JSON array of {name, status, description} objects
/// once code fences are stripped; anything else is an error.
pub fn parse_requirements(reply: &str) -> Result<Vec<DocumentRequirement>> {
    let cleaned = strip_code_fences(reply);
    let requirements: Vec<DocumentRequirement> =
        serde_json::from_str(&cleaned).context("Model reply is not a valid requirements array")?;
    Ok(requirements)
}
