use crate::errors::StorageError;
use crate::store::SurveyState;
use std::path::Path;
use tokio::fs;

/// Reads the snapshot slot. `Ok(None)` means there is no prior state.
pub async fn load_data(path: &Path) -> Result<Option<SurveyState>, StorageError> {
    match fs::read(path).await {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

pub async fn persist_data(path: &Path, data: &SurveyState) -> Result<(), StorageError> {
    let payload = serde_json::to_vec_pretty(data)?;
    fs::write(path, payload).await?;
    Ok(())
}
