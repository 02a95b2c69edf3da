use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_COLOR: &str = "#26d653";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ActivityLabel {
    #[serde(skip)]
    pub name: String,
    /// Points earned per minute. Never negative.
    pub productivity_rate: f64,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub description: String,
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

impl ActivityLabel {
    pub fn new(name: impl Into<String>, productivity_rate: f64) -> Self {
        Self {
            name: name.into(),
            productivity_rate,
            color: default_color(),
            description: String::new(),
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Name-keyed label registry. Iteration is in name order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelRegistry {
    labels: BTreeMap<String, ActivityLabel>,
}

impl LabelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        default_labels().into_iter().collect()
    }

    pub fn get(&self, name: &str) -> Option<&ActivityLabel> {
        self.labels.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.labels.contains_key(name)
    }

    /// Rate for `name`; labels missing from the registry score nothing.
    pub fn rate(&self, name: &str) -> f64 {
        self.labels
            .get(name)
            .map(|l| l.productivity_rate.max(0.0))
            .unwrap_or(0.0)
    }

    pub fn color(&self, name: &str) -> &str {
        self.labels
            .get(name)
            .map(|l| l.color.as_str())
            .unwrap_or(DEFAULT_COLOR)
    }

    pub fn insert(&mut self, label: ActivityLabel) -> Option<ActivityLabel> {
        self.labels.insert(label.name.clone(), label)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut ActivityLabel> {
        self.labels.get_mut(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<ActivityLabel> {
        self.labels.remove(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActivityLabel> {
        self.labels.values()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// On-disk shape: `{ "name": { productivity_rate, color, description } }`.
    pub fn from_map(map: BTreeMap<String, ActivityLabel>) -> Self {
        map.into_iter()
            .map(|(name, mut label)| {
                label.name = name;
                label
            })
            .collect()
    }

    pub fn to_map(&self) -> BTreeMap<String, ActivityLabel> {
        self.labels.clone()
    }
}

impl FromIterator<ActivityLabel> for LabelRegistry {
    fn from_iter<I: IntoIterator<Item = ActivityLabel>>(iter: I) -> Self {
        let mut registry = LabelRegistry::new();
        for label in iter {
            registry.insert(label);
        }
        registry
    }
}

pub fn default_labels() -> Vec<ActivityLabel> {
    vec![
        ActivityLabel::new("Deep Work", 2.0)
            .with_color("#196127")
            .with_description("Focused, high-concentration work"),
        ActivityLabel::new("Learning", 1.5)
            .with_color("#239a3b")
            .with_description("Educational activities and skill development"),
        ActivityLabel::new("Planning", 1.0)
            .with_color("#26d653")
            .with_description("Strategic planning and organization"),
        ActivityLabel::new("Communication", 0.8)
            .with_color("#40c463")
            .with_description("Meetings, emails, and team collaboration"),
        ActivityLabel::new("Administrative", 0.5)
            .with_color("#9be9a8")
            .with_description("Routine administrative tasks"),
        ActivityLabel::new("Break", 0.0)
            .with_color("#ebedf0")
            .with_description("Rest and recovery time"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_label_has_zero_rate_and_fallback_color() {
        let registry = LabelRegistry::with_defaults();
        assert_eq!(registry.rate("Deep Work"), 2.0);
        assert_eq!(registry.rate("Gaming"), 0.0);
        assert_eq!(registry.color("Gaming"), DEFAULT_COLOR);
    }

    #[test]
    fn test_map_roundtrip_restores_names() {
        let registry = LabelRegistry::with_defaults();
        let json = serde_json::to_string(&registry.to_map()).unwrap();
        let map: BTreeMap<String, ActivityLabel> = serde_json::from_str(&json).unwrap();
        let restored = LabelRegistry::from_map(map);
        assert_eq!(restored, registry);
        assert_eq!(restored.get("Learning").unwrap().name, "Learning");
    }

    #[test]
    fn test_missing_color_defaults() {
        let map: BTreeMap<String, ActivityLabel> =
            serde_json::from_str(r#"{"Reading": {"productivity_rate": 1.2}}"#).unwrap();
        let registry = LabelRegistry::from_map(map);
        assert_eq!(registry.color("Reading"), DEFAULT_COLOR);
        assert_eq!(registry.get("Reading").unwrap().description, "");
    }
}
