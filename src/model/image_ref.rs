use std::path::{Path, PathBuf};

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
/// Handle to a raster image on local storage.
///
/// The engine only reads the file behind an `ImageRef`; it never moves or deletes it.
pub struct ImageRef {
    path: PathBuf,
}

impl ImageRef {
    /// Wrap a storage path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Storage location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name without extension; the identity used for montage keys.
    pub fn identifier(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Uppercase caption: the last `_`-separated segment of the file stem.
    ///
    /// `out/tmp81_character_Luna.png` is labeled `LUNA`.
    pub fn label(&self) -> String {
        let stem = self.identifier();
        stem.rsplit('_').next().unwrap_or_default().to_uppercase()
    }

    /// File name with extension, used in placeholder messages.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// True if the backing file currently exists.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }
}

impl From<PathBuf> for ImageRef {
    fn from(path: PathBuf) -> Self {
        Self::new(path)
    }
}

impl From<&Path> for ImageRef {
    fn from(path: &Path) -> Self {
        Self::new(path)
    }
}

impl From<&str> for ImageRef {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/image_ref.rs"]
mod tests;
