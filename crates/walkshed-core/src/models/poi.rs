use serde::{Deserialize, Serialize};
use std::fmt;

use super::Coordinate;

/// Output bucket a point of interest is classified into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Supermarket,
    Pharmacy,
    Restaurant,
    #[serde(rename = "fastfood")]
    FastFood,
    Hotel,
}

impl Category {
    /// All buckets in classification priority order
    pub const ALL: [Category; 5] = [
        Category::Supermarket,
        Category::Pharmacy,
        Category::Restaurant,
        Category::FastFood,
        Category::Hotel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Supermarket => "supermarket",
            Category::Pharmacy => "pharmacy",
            Category::Restaurant => "restaurant",
            Category::FastFood => "fastfood",
            Category::Hotel => "hotel",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point of interest returned by the POI provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poi {
    /// Provider identifier
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    pub coordinate: Coordinate,

    /// Raw provider category tags, e.g. `catering.fast_food`
    pub tags: Vec<String>,

    /// Canonical labels appended by the classifier
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl Poi {
    pub fn new(id: impl Into<String>, coordinate: Coordinate, tags: Vec<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            address: None,
            coordinate,
            tags,
            categories: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Points of interest grouped by output bucket
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategorizedResult {
    #[serde(default)]
    pub supermarket: Vec<Poi>,
    #[serde(default)]
    pub pharmacy: Vec<Poi>,
    #[serde(default)]
    pub restaurant: Vec<Poi>,
    #[serde(default)]
    pub fastfood: Vec<Poi>,
    #[serde(default)]
    pub hotel: Vec<Poi>,
}

impl CategorizedResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bucket(&self, category: Category) -> &[Poi] {
        match category {
            Category::Supermarket => &self.supermarket,
            Category::Pharmacy => &self.pharmacy,
            Category::Restaurant => &self.restaurant,
            Category::FastFood => &self.fastfood,
            Category::Hotel => &self.hotel,
        }
    }

    pub fn bucket_mut(&mut self, category: Category) -> &mut Vec<Poi> {
        match category {
            Category::Supermarket => &mut self.supermarket,
            Category::Pharmacy => &mut self.pharmacy,
            Category::Restaurant => &mut self.restaurant,
            Category::FastFood => &mut self.fastfood,
            Category::Hotel => &mut self.hotel,
        }
    }

    /// Total number of classified points across all buckets
    pub fn total(&self) -> usize {
        Category::ALL.iter().map(|c| self.bucket(*c).len()).sum()
    }
}
