use crate::ingestion::IngestionError;
use crate::structures::BuildConfig;

#[derive(Debug)]
pub enum SourceLocation {
    Local(String),
    Remote(String),
}

pub fn resolve_path(config: &BuildConfig) -> Result<String, IngestionError> {
    match config.location()? {
        SourceLocation::Local(path) => Ok(path),
        SourceLocation::Remote(url) => Err(IngestionError::RemoteUnsupported(url)),
    }
}
