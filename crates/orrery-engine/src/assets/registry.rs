use std::collections::HashMap;

use crate::api::types::TextureHandle;
use crate::assets::manifest::SceneManifest;

/// Resolves texture identifiers to decoded texture handles.
/// Image decoding happens on the other side of this trait.
pub trait AssetLoader {
    /// Look up a texture by name. Returns None if unknown.
    fn texture(&self, name: &str) -> Option<TextureHandle>;
}

/// Registry of named textures, built from a SceneManifest.
/// Handles are assigned in sorted name order so they are stable across runs.
pub struct TextureRegistry {
    textures: HashMap<String, TextureHandle>,
}

impl TextureRegistry {
    pub fn new() -> Self {
        Self {
            textures: HashMap::new(),
        }
    }

    /// Build a registry from a parsed SceneManifest.
    pub fn from_manifest(manifest: &SceneManifest) -> Self {
        let mut names: Vec<&String> = manifest.textures.keys().collect();
        names.sort();
        let mut registry = Self::new();
        for name in names {
            registry.insert(name.clone());
        }
        registry
    }

    /// Register a texture name, returning its handle (existing or new).
    pub fn insert(&mut self, name: impl Into<String>) -> TextureHandle {
        let next = TextureHandle(self.textures.len() as u32);
        *self.textures.entry(name.into()).or_insert(next)
    }

    /// Registered names in handle order.
    pub fn names(&self) -> Vec<&str> {
        let mut entries: Vec<_> = self.textures.iter().collect();
        entries.sort_by_key(|(_, handle)| **handle);
        entries.into_iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

impl AssetLoader for TextureRegistry {
    fn texture(&self, name: &str) -> Option<TextureHandle> {
        self.textures.get(name).copied()
    }
}

impl Default for TextureRegistry {
    fn default() -> Self {
        Self::new()
    }
}
