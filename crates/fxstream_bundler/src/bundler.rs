use crate::installer::PackageInstaller;
use fxstream_common::Result;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::info;

/// Directory holding one subdirectory per layer.
pub const LAYERS_DIR: &str = "lambda/layers";

/// Per-layer dependency manifest.
pub const MANIFEST_FILE: &str = "requirements.txt";

/// Per-layer folder that receives installed packages.
pub const OUTPUT_DIR: &str = "python";

/// Outcome of a bundling run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BundleReport {
    /// Layers whose dependencies were installed
    pub built: Vec<String>,

    /// Layers skipped for lack of a manifest
    pub skipped: Vec<String>,
}

/// Installs each layer's dependencies into its output folder.
pub struct LayerBundler<I> {
    root: PathBuf,
    installer: I,
}

impl<I: PackageInstaller> LayerBundler<I> {
    pub fn new(root: impl Into<PathBuf>, installer: I) -> Self {
        Self {
            root: root.into(),
            installer,
        }
    }

    /// Build every layer under the root, in name order.
    ///
    /// Plain files in the root are ignored. An installer failure stops the run.
    pub fn run(&self) -> Result<BundleReport> {
        let mut layers = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                layers.push(entry.path());
            }
        }
        layers.sort();

        let mut report = BundleReport::default();
        for layer_dir in layers {
            let name = layer_name(&layer_dir);

            if !layer_dir.join(MANIFEST_FILE).is_file() {
                info!("Skipping layer {} as no {} found.", name, MANIFEST_FILE);
                report.skipped.push(name);
                continue;
            }

            info!("Building layer: {}", name);
            fs::create_dir_all(layer_dir.join(OUTPUT_DIR))?;
            self.installer
                .install(&layer_dir, Path::new(MANIFEST_FILE), Path::new(OUTPUT_DIR))?;
            report.built.push(name);
        }

        Ok(report)
    }
}

fn layer_name(layer_dir: &Path) -> String {
    layer_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
