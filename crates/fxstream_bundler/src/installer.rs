use fxstream_common::{Error, Result};
use std::{path::Path, process::Command};
use tracing::debug;

/// Installs the packages listed in a manifest into a target directory.
pub trait PackageInstaller {
    /// Install `manifest` into `target`, running from `layer_dir`.
    fn install(&self, layer_dir: &Path, manifest: &Path, target: &Path) -> Result<()>;
}

/// Installs with `pip install -r <manifest> -t <target>`.
#[derive(Debug, Clone)]
pub struct PipInstaller {
    program: String,
}

impl PipInstaller {
    /// Use `program` instead of `pip`, e.g. `pip3`.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for PipInstaller {
    fn default() -> Self {
        Self::with_program("pip")
    }
}

impl PackageInstaller for PipInstaller {
    fn install(&self, layer_dir: &Path, manifest: &Path, target: &Path) -> Result<()> {
        debug!("Running {} in {}", self.program, layer_dir.display());

        let status = Command::new(&self.program)
            .arg("install")
            .arg("-r")
            .arg(manifest)
            .arg("-t")
            .arg(target)
            .current_dir(layer_dir)
            .status()
            .map_err(|e| Error::ExternalService(format!("Failed to run {}: {}", self.program, e)))?;

        if !status.success() {
            return Err(Error::ExternalService(format!(
                "{} install failed in {} ({})",
                self.program,
                layer_dir.display(),
                status
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_program_is_external_service_error() {
        let dir = tempfile::tempdir().unwrap();
        let installer = PipInstaller::with_program("fxstream-no-such-installer");

        let result = installer.install(
            dir.path(),
            Path::new("requirements.txt"),
            Path::new("python"),
        );
        assert!(matches!(result, Err(Error::ExternalService(_))));
    }
}
