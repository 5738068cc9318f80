use crate::catalog::{Catalog, GroupId, ShapeId, TextureKey};
use crate::error::LoadError;
use crate::geometry::{polygon_contains, Point, Viewport};
use crate::mapper;
use crate::texture::{TextureRule, TextureSet};

/// One interactive shape.
///
/// `screen_points` is derived from `normalized_points` and the registry's
/// viewport; it is only ever written by [`ShapeRegistry::relayout`].
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeRecord {
    pub id: ShapeId,
    pub group: GroupId,
    /// Texture declared by the catalog. Validated at load, not used for fills.
    pub texture_key: TextureKey,
    normalized_points: Vec<Point>,
    screen_points: Vec<Point>,
}

impl ShapeRecord {
    #[inline]
    pub fn normalized_points(&self) -> &[Point] {
        &self.normalized_points
    }

    #[inline]
    pub fn screen_points(&self) -> &[Point] {
        &self.screen_points
    }

    /// Hit-test against the current screen geometry.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        polygon_contains(&self.screen_points, p)
    }

    /// Display line for the info sink.
    pub fn describe(&self) -> String {
        format!("Group: {} | ID: {}", self.group, self.id)
    }
}

/// All shapes of the catalog, in catalog (paint) order.
///
/// Built once; shapes are never added or removed afterwards.
#[derive(Debug, Clone)]
pub struct ShapeRegistry {
    shapes: Vec<ShapeRecord>,
    viewport: Viewport,
}

impl ShapeRegistry {
    /// Registers every catalog shape and lays it out for `viewport`.
    ///
    /// Fails if a shape's declared texture, or the texture the rule picks for
    /// its group, is not part of `textures`.
    pub fn build(
        catalog: Catalog,
        textures: &TextureSet,
        rule: &TextureRule,
        viewport: Viewport,
    ) -> Result<Self, LoadError> {
        let mut shapes = Vec::with_capacity(catalog.shapes.len());

        for desc in catalog.shapes {
            for key in [&desc.texture_key, rule.select(&desc.group)] {
                if !textures.contains(key) {
                    return Err(LoadError::MissingTexture {
                        key: key.to_string(),
                        shape: desc.id.to_string(),
                    });
                }
            }
            if &desc.texture_key != rule.select(&desc.group) {
                log::debug!(
                    "shape '{}' declares texture '{}' but group '{}' renders with '{}'",
                    desc.id,
                    desc.texture_key,
                    desc.group,
                    rule.select(&desc.group),
                );
            }

            shapes.push(ShapeRecord {
                id: desc.id,
                group: desc.group,
                texture_key: desc.texture_key,
                screen_points: Vec::with_capacity(desc.points.len()),
                normalized_points: desc.points,
            });
        }

        let mut registry = Self { shapes, viewport };
        registry.relayout(viewport);
        Ok(registry)
    }

    /// Recomputes the screen geometry of every shape for `viewport`.
    pub fn relayout(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        for shape in &mut self.shapes {
            shape.screen_points = mapper::map_points(&shape.normalized_points, viewport);
        }
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn get(&self, id: &ShapeId) -> Option<&ShapeRecord> {
        self.shapes.iter().find(|s| &s.id == id)
    }

    /// Topmost shape (last in paint order) containing `p`.
    pub fn shape_at(&self, p: Point) -> Option<&ShapeRecord> {
        self.shapes.iter().rev().find(|s| s.contains(p))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShapeRecord> {
        self.shapes.iter()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}
