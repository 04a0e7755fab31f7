use std::io;
use std::path::{Path, PathBuf};

use super::artifact::ModelArtifact;

#[derive(Debug, thiserror::Error)]
pub enum ModelLoadError {
    #[error("Model file not found. Please ensure the model file is in the correct location.")]
    NotFound { path: PathBuf },

    #[error("Error reading the model. The file might be corrupted.")]
    Corrupt { path: PathBuf, reason: String },

    #[error("Error opening the model file: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ModelLoadError {
    /// Path and underlying cause, for the log.
    pub fn detail(&self) -> String {
        match self {
            ModelLoadError::NotFound { path } => format!("{}: not found", path.display()),
            ModelLoadError::Corrupt { path, reason } => format!("{}: {reason}", path.display()),
            ModelLoadError::Io { path, source } => format!("{}: {source}", path.display()),
        }
    }
}

/// Read and validate a JSON model artifact.
pub fn load_model(path: &Path) -> Result<ModelArtifact, ModelLoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => ModelLoadError::NotFound {
            path: path.to_path_buf(),
        },
        // not UTF-8 → cannot be a JSON artifact
        io::ErrorKind::InvalidData => ModelLoadError::Corrupt {
            path: path.to_path_buf(),
            reason: source.to_string(),
        },
        _ => ModelLoadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let artifact: ModelArtifact =
        serde_json::from_str(&text).map_err(|e| ModelLoadError::Corrupt {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    artifact.validate().map_err(|reason| ModelLoadError::Corrupt {
        path: path.to_path_buf(),
        reason,
    })?;

    Ok(artifact)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::predictor::artifact::fixtures::centroid_model;

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_model(&dir.path().join("model.json")).unwrap_err();
        assert!(matches!(err, ModelLoadError::NotFound { .. }));
        assert!(err.to_string().starts_with("Model file not found"));
    }

    #[test]
    fn garbage_is_corrupt() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"\x80\x04\x95 not json").unwrap();
        let err = load_model(file.path()).unwrap_err();
        assert!(matches!(err, ModelLoadError::Corrupt { .. }));
        assert!(err.to_string().contains("corrupted"));
    }

    #[test]
    fn inconsistent_artifact_is_corrupt() {
        let mut model = centroid_model();
        if let crate::predictor::artifact::Estimator::NearestCentroid { centroids, .. } =
            &mut model.estimator
        {
            centroids.pop();
        }
        let file = tempfile::NamedTempFile::new().unwrap();
        serde_json::to_writer(file.as_file(), &model).unwrap();
        match load_model(file.path()).unwrap_err() {
            err @ ModelLoadError::Corrupt { .. } => assert!(err.detail().contains("centroids")),
            other => panic!("expected corrupt, got {other:?}"),
        }
    }

    #[test]
    fn valid_artifact_round_trips_from_disk() {
        let file = tempfile::NamedTempFile::new().unwrap();
        serde_json::to_writer_pretty(file.as_file(), &centroid_model()).unwrap();
        let loaded = load_model(file.path()).unwrap();
        assert_eq!(loaded, centroid_model());
    }
}
