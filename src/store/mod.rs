pub mod r#trait;
pub mod local;
pub mod retriever;

pub use local::{source_checksum, IndexMeta, LocalVectorStore};
pub use retriever::Retriever;
pub use r#trait::VectorIndex;
