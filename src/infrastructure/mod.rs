pub mod documents;
pub mod llm;
pub mod media;
pub mod observability;
pub mod persistence;
pub mod speech;
pub mod storage;
