use std::path::{Path, PathBuf};

use crate::catalog::Catalog;
use crate::error::LoadError;
use crate::geometry::Viewport;
use crate::registry::ShapeRegistry;
use crate::texture::{TextureRule, TextureSet};

/// Default catalog location, relative to the assets root.
pub const CATALOG_PATH: &str = "data/shapes.json";

/// Where the catalog and textures are read from.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetSource {
    /// Directory texture keys are resolved against.
    pub root: PathBuf,
    /// Catalog document path.
    pub catalog: PathBuf,
}

impl AssetSource {
    /// Uses `<root>/data/shapes.json` as catalog.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let catalog = root.join(CATALOG_PATH);
        Self { root, catalog }
    }

    pub fn with_catalog(mut self, catalog: impl Into<PathBuf>) -> Self {
        self.catalog = catalog.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Output of [`load`]: the laid-out registry plus the decoded textures.
#[derive(Debug)]
pub struct LoadedScene {
    pub registry: ShapeRegistry,
    pub textures: TextureSet,
}

/// Reads the catalog and the rule's texture set, then builds the registry for
/// `viewport`.
pub fn load(
    source: &AssetSource,
    rule: &TextureRule,
    viewport: Viewport,
) -> Result<LoadedScene, LoadError> {
    log::info!("loading catalog {}", source.catalog.display());
    let catalog = Catalog::from_path(&source.catalog)?;

    let textures = TextureSet::load(&source.root, rule.keys())?;
    let registry = ShapeRegistry::build(catalog, &textures, rule, viewport)?;

    log::info!("registered {} shapes, {} textures", registry.len(), textures.len());
    Ok(LoadedScene { registry, textures })
}
