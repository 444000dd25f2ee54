use std::{fs, path::PathBuf};

use falab_lib::error::FaError;

/// Byte sink for render artifacts, keyed by render id.
pub struct ArtifactSink {
    dir: PathBuf,
}

impl ArtifactSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        ArtifactSink { dir: dir.into() }
    }

    pub fn save_tex(&self, id: &str, tex: &str) -> Result<(), FaError> {
        self.write(id, "tex", tex)
    }

    pub fn save_svg(&self, id: &str, svg: &str) -> Result<(), FaError> {
        self.write(id, "svg", svg)
    }

    pub fn load_tex(&self, id: &str) -> Result<String, FaError> {
        self.read(id, "tex")
    }

    pub fn load_svg(&self, id: &str) -> Result<String, FaError> {
        self.read(id, "svg")
    }

    fn write(&self, id: &str, extension: &str, content: &str) -> Result<(), FaError> {
        check_id(id)?;

        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)
                .map_err(|e| FaError::OperationFailed(format!("creating artifact dir: {}", e)))?;
        }

        fs::write(self.dir.join(format!("{}.{}", id, extension)), content)
            .map_err(|e| FaError::OperationFailed(format!("writing artifact {}: {}", id, e)))
    }

    fn read(&self, id: &str, extension: &str) -> Result<String, FaError> {
        check_id(id)?;

        fs::read_to_string(self.dir.join(format!("{}.{}", id, extension)))
            .map_err(|_| FaError::NotFound(format!("no {} artifact for id {}", extension, id)))
    }
}

/// Ids are path components; restrict them to a safe character set.
fn check_id(id: &str) -> Result<(), FaError> {
    let safe = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if safe {
        Ok(())
    } else {
        Err(FaError::NotFound(format!("no artifact for id {}", id)))
    }
}
