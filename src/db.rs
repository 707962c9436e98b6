use crate::models::DocumentRequirement;
use anyhow::{Context, Result};
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, to_bson, Bson, Document};
use mongodb::{Client, Collection};

/// Free-text field holding the raw documents list of a scheme
pub const DOCUMENTS_FIELD: &str = "documents";
/// Derived field written by the structuring job
pub const STRUCTURED_FIELD: &str = "documents_structured";
pub const SCHEME_NAME_FIELD: &str = "scheme_name";

/// MongoDB access to the scheme collection
pub struct SchemeDb {
    collection: Collection<Document>,
}

impl SchemeDb {
    /// Connect to MongoDB and select the scheme collection
    pub async fn connect(uri: &str, database: &str, collection: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri)
            .await
            .context("Failed to connect to MongoDB")?;
        let collection = client.database(database).collection::<Document>(collection);
        Ok(Self { collection })
    }

    /// Fetch every record of the collection, unfiltered
    pub async fn fetch_all(&self) -> Result<Vec<Document>> {
        let mut cursor = self
            .collection
            .find(doc! {})
            .await
            .context("Failed to query schemes")?;

        let mut documents = Vec::new();
        while let Some(document) = cursor.try_next().await.context("Failed to read scheme")? {
            documents.push(document);
        }
        Ok(documents)
    }

    /// Filter selecting records the structuring job still has to process
    pub(crate) fn unstructured_filter() -> Document {
        doc! { STRUCTURED_FIELD: { "$exists": false } }
    }

    /// Fetch every record lacking the derived structured-documents field
    pub async fn fetch_unstructured(&self) -> Result<Vec<Document>> {
        let mut cursor = self
            .collection
            .find(Self::unstructured_filter())
            .await
            .context("Failed to query unstructured schemes")?;

        let mut documents = Vec::new();
        while let Some(document) = cursor.try_next().await.context("Failed to read scheme")? {
            documents.push(document);
        }
        Ok(documents)
    }

    /// Write the parsed requirements array onto a record
    pub async fn set_structured(
        &self,
        id: &Bson,
        requirements: &[DocumentRequirement],
    ) -> Result<()> {
        let value =
            to_bson(&requirements).context("Failed to convert structured documents to BSON")?;

        self.collection
            .update_one(
                doc! { "_id": id.clone() },
                doc! { "$set": { STRUCTURED_FIELD: value } },
            )
            .await
            .context("Failed to update scheme")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unstructured_filter_shape() {
        let filter = SchemeDb::unstructured_filter();
        assert_eq!(
            filter,
            doc! { "documents_structured": { "$exists": false } }
        );
    }

    #[tokio::test]
    #[ignore] // Requires MONGODB_URI pointing at a live cluster
    async fn test_connect_and_fetch_all() {
        let uri = std::env::var("MONGODB_URI").unwrap();
        let db = SchemeDb::connect(&uri, "farmers", "schemes").await.unwrap();
        let schemes = db.fetch_all().await.unwrap();
        assert!(!schemes.is_empty());
    }
}
