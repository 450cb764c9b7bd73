// ABOUTME: Terraform partial backend configuration rendering.
// ABOUTME: Produces the file passed to `terraform init -backend-config=...`.

use std::fmt;
use std::path::Path;

use serde::Serialize;

/// Values for Terraform's S3 backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackendConfig {
    pub bucket: String,
    pub key: String,
    pub region: String,
    pub dynamodb_table: String,
    pub encrypt: bool,
}

impl BackendConfig {
    /// Write the rendered configuration to `path`.
    pub fn write_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_string())
    }
}

impl fmt::Display for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "bucket         = \"{}\"", self.bucket)?;
        writeln!(f, "key            = \"{}\"", self.key)?;
        writeln!(f, "region         = \"{}\"", self.region)?;
        writeln!(f, "dynamodb_table = \"{}\"", self.dynamodb_table)?;
        writeln!(f, "encrypt        = {}", self.encrypt)
    }
}
