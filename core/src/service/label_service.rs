use crate::error::{CoreError, CoreResult};
use crate::model::{ActivityLabel, LabelRegistry};
use crate::repository::LabelRepository;
use log::info;

/// Fields to change on an existing label; `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelUpdate {
    pub productivity_rate: Option<f64>,
    pub description: Option<String>,
    pub color: Option<String>,
}

pub struct LabelService<R: LabelRepository> {
    repo: R,
}

impl<R: LabelRepository> LabelService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn list(&self) -> CoreResult<LabelRegistry> {
        self.repo.get_labels().map_err(CoreError::provider)
    }

    pub fn get(&self, name: &str) -> CoreResult<ActivityLabel> {
        self.list()?
            .get(name)
            .cloned()
            .ok_or_else(|| CoreError::NotFound(format!("label '{}'", name)))
    }

    pub fn add(
        &self,
        name: &str,
        productivity_rate: f64,
        description: Option<String>,
        color: Option<String>,
    ) -> CoreResult<ActivityLabel> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::Validation("label name must not be empty".to_string()));
        }
        validate_rate(productivity_rate)?;

        let mut labels = self.list()?;
        if labels.contains(name) {
            return Err(CoreError::Conflict(format!("label '{}' already exists", name)));
        }

        let mut label = ActivityLabel::new(name, productivity_rate);
        if let Some(description) = description {
            label.description = description;
        }
        if let Some(color) = color {
            label.color = validate_color(color)?;
        }
        labels.insert(label.clone());
        self.repo.save_labels(&labels).map_err(CoreError::provider)?;
        info!("added label '{}' at {} points/min", label.name, label.productivity_rate);
        Ok(label)
    }

    pub fn update(&self, name: &str, changes: LabelUpdate) -> CoreResult<ActivityLabel> {
        if let Some(rate) = changes.productivity_rate {
            validate_rate(rate)?;
        }
        let color = changes.color.map(validate_color).transpose()?;

        let mut labels = self.list()?;
        let label = labels
            .get_mut(name)
            .ok_or_else(|| CoreError::NotFound(format!("label '{}'", name)))?;

        if let Some(rate) = changes.productivity_rate {
            label.productivity_rate = rate;
        }
        if let Some(description) = changes.description {
            label.description = description;
        }
        if let Some(color) = color {
            label.color = color;
        }
        let updated = label.clone();

        self.repo.save_labels(&labels).map_err(CoreError::provider)?;
        info!("updated label '{}'", name);
        Ok(updated)
    }

    /// Activities already logged under the label stay, and score 0 from now on.
    pub fn delete(&self, name: &str) -> CoreResult<ActivityLabel> {
        let mut labels = self.list()?;
        let removed = labels
            .remove(name)
            .ok_or_else(|| CoreError::NotFound(format!("label '{}'", name)))?;
        self.repo.save_labels(&labels).map_err(CoreError::provider)?;
        info!("deleted label '{}'", name);
        Ok(removed)
    }
}

fn validate_rate(rate: f64) -> CoreResult<()> {
    if !rate.is_finite() || rate < 0.0 {
        return Err(CoreError::Validation(format!(
            "productivity rate must be a non-negative number, got {}",
            rate
        )));
    }
    Ok(())
}

fn validate_color(color: String) -> CoreResult<String> {
    let trimmed = color.trim();
    let hex = trimmed.strip_prefix('#').unwrap_or("");
    let valid = matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit());
    if !valid {
        return Err(CoreError::Validation(format!("color must be #rgb or #rrggbb, got '{}'", color)));
    }
    Ok(trimmed.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::cell::RefCell;

    struct MockLabelRepo {
        labels: RefCell<LabelRegistry>,
    }

    impl MockLabelRepo {
        fn with_defaults() -> Self {
            Self { labels: RefCell::new(LabelRegistry::with_defaults()) }
        }
    }

    impl LabelRepository for MockLabelRepo {
        fn get_labels(&self) -> Result<LabelRegistry> { Ok(self.labels.borrow().clone()) }
        fn save_labels(&self, labels: &LabelRegistry) -> Result<()> {
            *self.labels.borrow_mut() = labels.clone();
            Ok(())
        }
    }

    #[test]
    fn test_add_label() {
        let service = LabelService::new(MockLabelRepo::with_defaults());
        let label = service.add("Reading", 1.2, None, Some("#ABCDEF".to_string())).unwrap();
        assert_eq!(label.color, "#abcdef");
        assert_eq!(service.get("Reading").unwrap().productivity_rate, 1.2);
    }

    #[test]
    fn test_add_rejects_duplicates_and_bad_input() {
        let service = LabelService::new(MockLabelRepo::with_defaults());
        assert!(matches!(service.add("Deep Work", 1.0, None, None), Err(CoreError::Conflict(_))));
        assert!(matches!(service.add("Neg", -0.5, None, None), Err(CoreError::Validation(_))));
        assert!(matches!(service.add("NaN", f64::NAN, None, None), Err(CoreError::Validation(_))));
        assert!(matches!(service.add("  ", 1.0, None, None), Err(CoreError::Validation(_))));
        assert!(matches!(
            service.add("Color", 1.0, None, Some("green".to_string())),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn test_update_changes_only_given_fields() {
        let service = LabelService::new(MockLabelRepo::with_defaults());
        let before = service.get("Learning").unwrap();
        let updated = service
            .update("Learning", LabelUpdate { productivity_rate: Some(1.75), ..Default::default() })
            .unwrap();
        assert_eq!(updated.productivity_rate, 1.75);
        assert_eq!(updated.color, before.color);
        assert_eq!(updated.description, before.description);
    }

    #[test]
    fn test_update_and_delete_missing() {
        let service = LabelService::new(MockLabelRepo::with_defaults());
        assert!(matches!(service.update("Nope", LabelUpdate::default()), Err(CoreError::NotFound(_))));
        assert!(matches!(service.delete("Nope"), Err(CoreError::NotFound(_))));
        service.delete("Break").unwrap();
        assert!(!service.list().unwrap().contains("Break"));
    }
}
