//! DTOs for decoding Overpass JSON responses.
//!
//! The adapter decodes into these transport DTOs first, then maps into
//! [`FeatureElement`] values in one pass. Relations and other element types
//! are not used by the aggregator and are dropped.

use serde::Deserialize;
use stepfree_core::FeatureElement;
use stepfree_core::features::Tags;

#[derive(Debug, Deserialize)]
pub(super) struct OverpassResponseDto {
    #[serde(default)]
    pub(super) elements: Vec<OverpassElementDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct OverpassElementDto {
    #[serde(rename = "type")]
    pub(super) element_type: String,
    pub(super) id: i64,
    pub(super) lat: Option<f64>,
    pub(super) lon: Option<f64>,
    #[serde(default)]
    pub(super) tags: Tags,
    pub(super) geometry: Option<Vec<OverpassPointDto>>,
}

#[derive(Debug, Deserialize)]
pub(super) struct OverpassPointDto {
    pub(super) lat: f64,
    pub(super) lon: f64,
}

impl OverpassResponseDto {
    pub(super) fn into_domain_elements(self) -> Result<Vec<FeatureElement>, String> {
        self.elements
            .into_iter()
            .filter_map(OverpassElementDto::into_domain_element)
            .collect()
    }
}

impl OverpassElementDto {
    fn into_domain_element(self) -> Option<Result<FeatureElement, String>> {
        match self.element_type.as_str() {
            "node" => Some(self.into_node()),
            "way" => Some(Ok(self.into_way())),
            _ => None,
        }
    }

    fn into_node(self) -> Result<FeatureElement, String> {
        let (Some(lat), Some(lon)) = (self.lat, self.lon) else {
            return Err(format!("node {} missing coordinates", self.id));
        };
        if !lat.is_finite() || !lon.is_finite() {
            return Err(format!("node {} includes non-finite coordinates", self.id));
        }
        Ok(FeatureElement::Node {
            id: self.id,
            lat,
            lon,
            tags: self.tags,
        })
    }

    fn into_way(self) -> FeatureElement {
        FeatureElement::Way {
            id: self.id,
            tags: self.tags,
            geometry: self.geometry.map(|points| {
                points
                    .into_iter()
                    .map(|point| [point.lat, point.lon])
                    .collect()
            }),
        }
    }
}
