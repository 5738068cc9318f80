//! Shape catalog document.
//!
//! ```json
//! { "shapes": [
//!     { "id": "s1", "group": "A", "texture": "textures/stone.jpg",
//!       "points": [[0.1, 0.1], [0.4, 0.1], [0.25, 0.4]] }
//! ] }
//! ```
//!
//! Polygons are not explicitly closed; the last point connects back to the
//! first when drawn.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::error::LoadError;
use crate::geometry::Point;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            #[inline]
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }
    };
}

string_id!(
    /// Shape identifier, unique across the catalog.
    ShapeId
);
string_id!(
    /// Group label shared by one or more shapes.
    GroupId
);
string_id!(
    /// Texture reference: the texture's path relative to the assets root.
    TextureKey
);

/// One entry of the catalog.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ShapeDescriptor {
    pub id: ShapeId,
    pub group: GroupId,
    #[serde(rename = "texture")]
    pub texture_key: TextureKey,
    pub points: Vec<Point>,
}

/// Validated catalog, in document order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Catalog {
    pub shapes: Vec<ShapeDescriptor>,
}

impl Catalog {
    /// Parses and validates a catalog document.
    pub fn from_json(src: &str) -> Result<Self, LoadError> {
        let catalog: Catalog = serde_json::from_str(src)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Reads, parses and validates the catalog at `path`.
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let src = std::fs::read_to_string(path).map_err(|source| LoadError::CatalogRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&src)
    }

    fn validate(&self) -> Result<(), LoadError> {
        let mut seen = HashSet::with_capacity(self.shapes.len());

        for shape in &self.shapes {
            let invalid = |reason: String| LoadError::InvalidShape {
                id: shape.id.to_string(),
                reason,
            };

            if shape.points.len() < 3 {
                return Err(invalid(format!(
                    "polygon needs at least 3 points, got {}",
                    shape.points.len()
                )));
            }
            if let Some((i, p)) = shape
                .points
                .iter()
                .enumerate()
                .find(|(_, p)| !p.is_finite() || !p.is_normalized())
            {
                return Err(invalid(format!(
                    "point {i} ({}, {}) is outside the unit square",
                    p.x, p.y
                )));
            }
            if !seen.insert(&shape.id) {
                return Err(LoadError::DuplicateId(shape.id.to_string()));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_SHAPES: &str = r#"{
        "shapes": [
            { "id": "s1", "group": "A", "texture": "textures/stone.jpg",
              "points": [[0.1, 0.1], [0.4, 0.1], [0.4, 0.4], [0.1, 0.4]] },
            { "id": "s2", "group": "B", "texture": "textures/marble.jpg",
              "points": [[0.5, 0.5], [0.9, 0.5], [0.7, 0.9]] }
        ]
    }"#;

    #[test]
    fn parses_in_document_order() {
        let catalog = Catalog::from_json(TWO_SHAPES).unwrap();
        assert_eq!(catalog.shapes.len(), 2);
        assert_eq!(catalog.shapes[0].id.as_str(), "s1");
        assert_eq!(catalog.shapes[0].group.as_str(), "A");
        assert_eq!(catalog.shapes[1].texture_key.as_str(), "textures/marble.jpg");
        assert_eq!(catalog.shapes[1].points[2], Point::new(0.7, 0.9));
    }

    #[test]
    fn empty_catalog_is_valid() {
        let catalog = Catalog::from_json(r#"{ "shapes": [] }"#).unwrap();
        assert!(catalog.shapes.is_empty());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = Catalog::from_json(r#"{ "shapes": [ { "id": "s1" "#).unwrap_err();
        assert!(matches!(err, LoadError::CatalogParse(_)));
    }

    #[test]
    fn missing_field_is_a_parse_error() {
        let err = Catalog::from_json(
            r#"{ "shapes": [ { "id": "s1", "group": "A", "points": [[0,0],[1,0],[1,1]] } ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::CatalogParse(_)));
    }

    #[test]
    fn rejects_degenerate_polygon() {
        let err = Catalog::from_json(
            r#"{ "shapes": [ { "id": "s1", "group": "A", "texture": "t",
                 "points": [[0,0],[1,1]] } ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::InvalidShape { ref id, .. } if id == "s1"));
    }

    #[test]
    fn rejects_out_of_range_point() {
        let err = Catalog::from_json(
            r#"{ "shapes": [ { "id": "s9", "group": "A", "texture": "t",
                 "points": [[0,0],[1.5,0],[1,1]] } ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::InvalidShape { ref id, .. } if id == "s9"));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = Catalog::from_json(
            r#"{ "shapes": [
                { "id": "s1", "group": "A", "texture": "t", "points": [[0,0],[1,0],[1,1]] },
                { "id": "s1", "group": "B", "texture": "t", "points": [[0,0],[1,0],[1,1]] }
            ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::DuplicateId(ref id) if id == "s1"));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Catalog::from_path(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, LoadError::CatalogRead { .. }));
    }
}
