use std::{
    collections::HashSet,
    fmt,
    path::{Path, PathBuf},
    sync::{
        Mutex, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
};

use sha2::{Digest, Sha256};

use crate::{
    config::CacheConfig,
    foundation::{
        error::{PressError, PressResult},
        lru::LruCache,
    },
    model::image_ref::ImageRef,
    montage::compose::MontageComposer,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Slot assignment of the images in a composed montage.
pub enum MontageOrdering {
    /// Sort by label, then identifier, so every ordering of a set renders identically.
    #[default]
    SortedByLabel,
    /// Keep the first caller's order.
    AsGiven,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// What happens to the file of a composite evicted from the cache.
pub enum EvictionPolicy {
    /// Leave it on disk.
    #[default]
    Keep,
    /// Delete it.
    Delete,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Lowercase hex SHA-256 of an image set.
pub struct MontageKey(String);

impl MontageKey {
    /// Key of the set of identifiers in `refs`; order and duplicates are ignored.
    pub fn from_refs(refs: &[ImageRef]) -> Self {
        let mut ids: Vec<String> = refs.iter().map(ImageRef::identifier).collect();
        ids.sort();
        ids.dedup();
        let digest = Sha256::digest(ids.join("|").as_bytes());
        Self(digest.iter().map(|b| format!("{b:02x}")).collect())
    }

    /// Hex digest.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the composite for this key.
    pub fn file_name(&self) -> String {
        format!("merge_{}.png", self.0)
    }
}

impl fmt::Display for MontageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Content-addressed store of composed montages.
///
/// Each distinct image set is composed at most once while its entry is cached and its file
/// exists. The entry map is locked for the whole of a miss, composition included.
pub struct MontageCache<C: MontageComposer> {
    composer: C,
    output_dir: PathBuf,
    ordering: MontageOrdering,
    eviction: EvictionPolicy,
    entries: Mutex<LruCache<MontageKey, PathBuf>>,
    compositions: AtomicU64,
}

impl<C: MontageComposer> MontageCache<C> {
    /// Empty cache writing composites into `output_dir`.
    pub fn new(composer: C, output_dir: impl Into<PathBuf>, config: &CacheConfig) -> Self {
        Self {
            composer,
            output_dir: output_dir.into(),
            ordering: config.ordering,
            eviction: config.eviction,
            entries: Mutex::new(LruCache::new(config.montage_capacity)),
            compositions: AtomicU64::new(0),
        }
    }

    /// Underlying composer.
    pub fn composer(&self) -> &C {
        &self.composer
    }

    /// Directory receiving composites.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Number of recorded composites.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True if nothing is recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of recorded composites.
    pub fn capacity(&self) -> usize {
        self.lock().capacity()
    }

    /// Compositions performed since construction.
    pub fn composition_count(&self) -> u64 {
        self.compositions.load(Ordering::Relaxed)
    }

    /// Where the composite for `key` is written.
    pub fn path_for(&self, key: &MontageKey) -> PathBuf {
        self.output_dir.join(key.file_name())
    }

    /// True if the set in `refs` is recorded. Does not count as a use.
    pub fn contains(&self, refs: &[ImageRef]) -> bool {
        self.lock().peek(&MontageKey::from_refs(refs)).is_some()
    }

    /// Path of the composite for the set in `refs`, composing it on a miss.
    #[tracing::instrument(skip(self, refs), fields(images = refs.len()))]
    pub fn get_or_create(&self, refs: &[ImageRef]) -> PressResult<PathBuf> {
        if refs.is_empty() {
            return Err(PressError::invalid_input(
                "montage reference list must not be empty",
            ));
        }
        let key = MontageKey::from_refs(refs);

        let mut entries = self.lock();
        if let Some(path) = entries.get(&key).cloned() {
            if path.is_file() {
                tracing::debug!(key = %key, "montage cache hit");
                return Ok(path);
            }
            tracing::debug!(key = %key, path = %path.display(), "montage artifact missing; regenerating");
            entries.remove(&key);
        } else {
            tracing::debug!(key = %key, "montage cache miss");
        }

        let ordered = self.ordered(refs);
        let out = self.path_for(&key);
        self.composer.compose(&ordered, &out)?;
        self.compositions.fetch_add(1, Ordering::Relaxed);

        for (old_key, old_path) in entries.insert(key, out.clone()) {
            match self.eviction {
                EvictionPolicy::Keep => {
                    tracing::debug!(key = %old_key, "montage evicted; file kept");
                }
                EvictionPolicy::Delete => {
                    if let Err(e) = std::fs::remove_file(&old_path) {
                        tracing::warn!(path = %old_path.display(), error = %e, "failed to delete evicted montage");
                    }
                }
            }
        }
        Ok(out)
    }

    /// Deduplicate by identifier, then apply the configured ordering.
    fn ordered(&self, refs: &[ImageRef]) -> Vec<ImageRef> {
        let mut seen = HashSet::new();
        let mut out: Vec<ImageRef> = refs
            .iter()
            .filter(|r| seen.insert(r.identifier()))
            .cloned()
            .collect();
        if self.ordering == MontageOrdering::SortedByLabel {
            out.sort_by_cached_key(|r| (r.label(), r.identifier()));
        }
        out
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LruCache<MontageKey, PathBuf>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/montage/cache.rs"]
mod tests;
