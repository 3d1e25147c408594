use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::catalog::PlaceCatalog;
use crate::visit::PlaceId;

/// Minimal GeoJSON `FeatureCollection` as served for the world map.
///
/// Features that do not fit the model are dropped one by one; a single odd
/// feature never rejects the collection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeatureCollection {
    #[serde(default, deserialize_with = "lenient_features")]
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    #[serde(default, deserialize_with = "feature_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub properties: FeatureProperties,
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeatureProperties {
    #[serde(default, deserialize_with = "feature_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

fn lenient_features<'de, D>(deserializer: D) -> Result<Vec<Feature>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    let total = raw.len();
    let features: Vec<Feature> = raw
        .into_iter()
        .filter_map(|value| serde_json::from_value(value).ok())
        .collect();
    if features.len() < total {
        tracing::warn!(
            skipped = total - features.len(),
            "ignoring malformed geography features"
        );
    }
    Ok(features)
}

/// GeoJSON allows string or numeric ids.
fn feature_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(id)) => Some(id),
        Some(Value::Number(id)) => Some(id.to_string()),
        _ => None,
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Ring coordinates are `[lon, lat]` (extra ordinates ignored).
pub type Ring = Vec<Vec<f64>>;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Polygon { coordinates: Vec<Ring> },
    MultiPolygon { coordinates: Vec<Vec<Ring>> },
    #[serde(other)]
    Unsupported,
}

impl Geometry {
    /// All rings of the geometry, outer and holes alike.
    pub fn rings(&self) -> Vec<&Ring> {
        match self {
            Geometry::Polygon { coordinates } => coordinates.iter().collect(),
            Geometry::MultiPolygon { coordinates } => coordinates.iter().flatten().collect(),
            Geometry::Unsupported => Vec::new(),
        }
    }
}

/// A named, drawable place.
#[derive(Debug, Clone)]
pub struct PlaceShape {
    pub id: PlaceId,
    pub name: String,
    pub geometry: Geometry,
}

impl Feature {
    fn place_id(&self) -> Option<&str> {
        self.id
            .as_deref()
            .or(self.properties.id.as_deref())
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

impl FeatureCollection {
    /// Features with an id, a name and a polygon geometry. Others are skipped.
    pub fn shapes(&self) -> Vec<PlaceShape> {
        self.features
            .iter()
            .filter_map(|feature| {
                let id = feature.place_id()?;
                let name = feature.properties.name.as_deref()?;
                let geometry = feature.geometry.clone()?;
                if matches!(geometry, Geometry::Unsupported) {
                    return None;
                }
                Some(PlaceShape {
                    id: id.to_string(),
                    name: name.to_string(),
                    geometry,
                })
            })
            .collect()
    }

    /// Catalog of every named feature, drawable or not.
    pub fn catalog(&self) -> PlaceCatalog {
        PlaceCatalog::from_entries(self.features.iter().filter_map(|feature| {
            let id = feature.place_id()?;
            let name = feature.properties.name.as_deref()?;
            Some((id.to_string(), name.to_string()))
        }))
    }
}
