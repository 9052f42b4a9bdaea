use std::path::{Path, PathBuf};

use super::{
    parse_datasets, DatasetSource, Datasets, LoadError, RawArtifacts, CATALOG_ARTIFACT,
    CONTENT_ARTIFACT, CORRELATION_ARTIFACT, POPULAR_ARTIFACT,
};

/// Reads the artifacts from a local directory
#[derive(Debug, Clone)]
pub struct FileSource {
    data_dir: PathBuf,
}

impl FileSource {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }

    async fn read(&self, artifact: &'static str) -> Result<Vec<u8>, LoadError> {
        tokio::fs::read(self.data_dir.join(artifact))
            .await
            .map_err(|source| LoadError::Io { artifact, source })
    }
}

#[async_trait::async_trait]
impl DatasetSource for FileSource {
    async fn load(&self) -> Result<Datasets, LoadError> {
        let (catalog, popular, correlation, content) = tokio::try_join!(
            self.read(CATALOG_ARTIFACT),
            self.read(POPULAR_ARTIFACT),
            self.read(CORRELATION_ARTIFACT),
            self.read(CONTENT_ARTIFACT),
        )?;

        let raw = RawArtifacts {
            catalog,
            popular,
            correlation,
            content,
        };

        parse_datasets(&raw)
    }

    fn describe(&self) -> String {
        format!("directory {}", self.data_dir.display())
    }
}
