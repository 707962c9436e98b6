use serde::{Deserialize, Serialize};

/// One scheme row from the CSV export
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SchemeRow {
    pub scheme_name: String,
    pub details: String,
    pub benefits: String,
    pub eligibility: String,
    pub application: String,
    pub documents: String,
    pub level: String,
    #[serde(rename = "schemeCategory")]
    pub scheme_category: String,
    pub slug: String,
    pub tags: String,
}

impl SchemeRow {
    /// Build the text blob that gets embedded for this scheme
    pub fn to_content(&self) -> String {
        format!(
            "Name: {}. Details: {}. Benefits: {}. Eligibility: {}. Application: {}. Documents: {}. Level: {}. Category: {}.",
            self.scheme_name,
            self.details,
            self.benefits,
            self.eligibility,
            self.application,
            self.documents,
            self.level,
            self.scheme_category,
        )
    }
}

/// Metadata stored alongside each indexed document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentMetadata {
    pub slug: String,
    pub tags: String,
}

/// A denormalized scheme document as stored in the vector index
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SchemeDocument {
    /// Row-order identifier, "0" upward
    pub id: String,
    pub content: String,
    pub metadata: DocumentMetadata,
}

impl SchemeDocument {
    pub fn from_row(id: usize, row: &SchemeRow) -> Self {
        Self {
            id: id.to_string(),
            content: row.to_content(),
            metadata: DocumentMetadata {
                slug: row.slug.clone(),
                tags: row.tags.clone(),
            },
        }
    }
}

/// A retrieval hit: a stored document plus its similarity to the query
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDocument {
    pub document: SchemeDocument,
    pub score: f32,
}

/// Whether a document must be submitted or only applies conditionally
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DocStatus {
    Required,
    Optional,
}

/// One entry of a scheme's structured documents list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentRequirement {
    pub name: String,
    pub status: DocStatus,
    pub description: String,
}
