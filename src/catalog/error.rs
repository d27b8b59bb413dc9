use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("unknown body id: {0}")]
    UnknownBody(String),
    #[error("empty body id list")]
    EmptySelection,
}
