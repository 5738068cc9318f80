//! Texture set and the group → texture selection rule.

use std::path::Path;

use crate::catalog::{GroupId, TextureKey};
use crate::error::LoadError;

/// Decoded RGBA8 image (straight alpha, row-major, no padding).
#[derive(Debug, Clone, PartialEq)]
pub struct TextureImage {
    pub key: TextureKey,
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureImage {
    /// Decodes `bytes`; the format is sniffed from the content, not the key.
    pub fn decode(key: TextureKey, bytes: &[u8]) -> Result<Self, LoadError> {
        let img = image::load_from_memory(bytes)
            .map_err(|source| LoadError::TextureDecode { key: key.to_string(), source })?
            .to_rgba8();

        Ok(Self {
            key,
            width: img.width(),
            height: img.height(),
            rgba: img.into_raw(),
        })
    }
}

/// The fixed set of textures available to shapes, in load order.
#[derive(Debug, Clone, Default)]
pub struct TextureSet {
    images: Vec<TextureImage>,
}

impl TextureSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads and decodes every key in `keys`, resolving each relative to `root`.
    ///
    /// Repeated keys are loaded once.
    pub fn load<'a>(
        root: &Path,
        keys: impl IntoIterator<Item = &'a TextureKey>,
    ) -> Result<Self, LoadError> {
        let mut set = Self::new();
        for key in keys {
            if set.contains(key) {
                continue;
            }
            let path = root.join(key.as_str());
            let bytes = std::fs::read(&path)
                .map_err(|source| LoadError::TextureRead { path: path.clone(), source })?;
            let image = TextureImage::decode(key.clone(), &bytes)?;
            log::debug!("loaded texture '{key}' ({}x{})", image.width, image.height);
            set.insert(image);
        }
        Ok(set)
    }

    /// Adds or replaces the image stored under its key.
    pub fn insert(&mut self, image: TextureImage) {
        match self.images.iter_mut().find(|i| i.key == image.key) {
            Some(slot) => *slot = image,
            None => self.images.push(image),
        }
    }

    pub fn get(&self, key: &TextureKey) -> Option<&TextureImage> {
        self.images.iter().find(|i| &i.key == key)
    }

    pub fn contains(&self, key: &TextureKey) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TextureImage> {
        self.images.iter()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Fill selection by group: one group gets `primary`, every other group gets
/// `fallback`. A shape's own declared texture is not consulted.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureRule {
    pub primary_group: GroupId,
    pub primary: TextureKey,
    pub fallback: TextureKey,
}

impl TextureRule {
    #[inline]
    pub fn select(&self, group: &GroupId) -> &TextureKey {
        if group == &self.primary_group { &self.primary } else { &self.fallback }
    }

    /// Both textures the rule can select, primary first.
    pub fn keys(&self) -> [&TextureKey; 2] {
        [&self.primary, &self.fallback]
    }
}

impl Default for TextureRule {
    fn default() -> Self {
        Self {
            primary_group: GroupId::new("A"),
            primary: TextureKey::new("textures/stone.jpg"),
            fallback: TextureKey::new("textures/marble.jpg"),
        }
    }
}
