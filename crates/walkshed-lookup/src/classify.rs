use walkshed_core::models::{CategorizedResult, Category, Poi};

/// A provider tag and the bucket it maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationRule {
    pub tag: &'static str,
    pub category: Category,
}

impl ClassificationRule {
    pub const fn new(tag: &'static str, category: Category) -> Self {
        Self { tag, category }
    }

    pub fn matches(&self, poi: &Poi) -> bool {
        poi.has_tag(self.tag)
    }
}

/// Rules in priority order; the first match wins
pub const DEFAULT_RULES: [ClassificationRule; 5] = [
    ClassificationRule::new("commercial.supermarket", Category::Supermarket),
    ClassificationRule::new("healthcare.pharmacy", Category::Pharmacy),
    ClassificationRule::new("catering.restaurant", Category::Restaurant),
    ClassificationRule::new("catering.fast_food", Category::FastFood),
    ClassificationRule::new("accommodation.hotel", Category::Hotel),
];

/// Maps multi-valued provider tags onto exactly one output bucket
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<ClassificationRule>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(DEFAULT_RULES.to_vec())
    }
}

impl Classifier {
    pub fn new(rules: Vec<ClassificationRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[ClassificationRule] {
        &self.rules
    }

    /// Provider tags to request, in rule order
    pub fn tags(&self) -> Vec<String> {
        self.rules.iter().map(|r| r.tag.to_string()).collect()
    }

    /// First matching bucket, without touching the point
    pub fn category_of(&self, poi: &Poi) -> Option<Category> {
        self.rules.iter().find(|rule| rule.matches(poi)).map(|rule| rule.category)
    }

    /// Append the canonical label of the first matching rule
    pub fn classify(&self, poi: &mut Poi) -> Option<Category> {
        let category = self.category_of(poi)?;
        poi.categories.push(category);
        Some(category)
    }

    /// Bucket every point; points matching no rule are dropped
    pub fn categorize(&self, pois: Vec<Poi>) -> CategorizedResult {
        let mut result = CategorizedResult::new();

        for mut poi in pois {
            match self.classify(&mut poi) {
                Some(category) => result.bucket_mut(category).push(poi),
                None => tracing::debug!(id = %poi.id, tags = ?poi.tags, "Dropping unclassified place"),
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use walkshed_core::models::Coordinate;

    fn poi(id: &str, tags: &[&str]) -> Poi {
        Poi::new(id, Coordinate::new(0.0, 0.0), tags.iter().map(|t| t.to_string()).collect())
    }

    #[test]
    fn test_fast_food_only() {
        let result = Classifier::default().categorize(vec![poi("f", &["catering.fast_food"])]);

        assert_eq!(result.fastfood.len(), 1);
        assert_eq!(result.fastfood[0].categories, vec![Category::FastFood]);
        assert_eq!(result.total(), 1);
    }

    #[test]
    fn test_priority_order() {
        let result = Classifier::default()
            .categorize(vec![poi("s", &["commercial.supermarket", "catering.restaurant"])]);

        assert_eq!(result.supermarket.len(), 1);
        assert!(result.restaurant.is_empty());
        assert_eq!(result.supermarket[0].categories, vec![Category::Supermarket]);
    }

    #[test]
    fn test_priority_ignores_tag_order() {
        let classifier = Classifier::default();
        let mut hotel_first = poi("h", &["accommodation.hotel", "healthcare.pharmacy"]);
        assert_eq!(classifier.classify(&mut hotel_first), Some(Category::Pharmacy));
    }

    #[test]
    fn test_unmatched_is_dropped() {
        let result = Classifier::default().categorize(vec![poi("p", &["leisure.park"])]);
        assert_eq!(result.total(), 0);
    }

    #[test]
    fn test_parent_tag_does_not_match() {
        let classifier = Classifier::default();
        assert_eq!(classifier.category_of(&poi("c", &["catering"])), None);
    }

    #[test]
    fn test_each_bucket() {
        let result = Classifier::default().categorize(vec![
            poi("1", &["commercial.supermarket"]),
            poi("2", &["healthcare.pharmacy"]),
            poi("3", &["catering.restaurant"]),
            poi("4", &["catering.fast_food"]),
            poi("5", &["accommodation.hotel"]),
        ]);

        for category in Category::ALL {
            assert_eq!(result.bucket(category).len(), 1, "bucket {}", category);
        }
    }

    #[test]
    fn test_tags_follow_rule_order() {
        assert_eq!(
            Classifier::default().tags(),
            vec![
                "commercial.supermarket",
                "healthcare.pharmacy",
                "catering.restaurant",
                "catering.fast_food",
                "accommodation.hotel",
            ]
        );
    }
}
