//! Validation Layer: raw form fields in, normalized product or field issues out.

use models::Category;

use super::domain::{ProductForm, ValidatedProduct};
use crate::errors::FieldIssue;

pub const NAME_MAX: usize = 100;
pub const DESCRIPTION_MAX: usize = 500;

/// Check every field and report all problems at once.
pub fn validate(form: &ProductForm) -> Result<ValidatedProduct, Vec<FieldIssue>> {
    let mut issues = Vec::new();

    let name = required_text(&mut issues, "name", form.name.as_deref(), NAME_MAX, "Name");
    let description = required_text(&mut issues, "description", form.description.as_deref(), DESCRIPTION_MAX, "Description");
    let price = parse_price(&mut issues, form.price.as_deref());
    let category = form.category.as_deref().map(str::trim).and_then(Category::parse);
    if category.is_none() {
        issues.push(FieldIssue::new("invalid_enum_value", "category", "Invalid category"));
    }
    let image = form.image.as_deref().map(str::trim).unwrap_or_default().to_string();

    match (name, description, price, category) {
        (Some(name), Some(description), Some(price), Some(category)) if issues.is_empty() => {
            Ok(ValidatedProduct { name, price, description, category, image })
        }
        _ => Err(issues),
    }
}

fn required_text(issues: &mut Vec<FieldIssue>, field: &str, raw: Option<&str>, max: usize, label: &str) -> Option<String> {
    let value = raw.map(str::trim).unwrap_or_default();
    if value.is_empty() {
        issues.push(FieldIssue::new("too_small", field, format!("{} is required", label)));
        return None;
    }
    if value.chars().count() > max {
        issues.push(FieldIssue::new("too_big", field, format!("{} too long", label)));
        return None;
    }
    Some(value.to_string())
}

fn parse_price(issues: &mut Vec<FieldIssue>, raw: Option<&str>) -> Option<f64> {
    let parsed = raw.map(str::trim).and_then(|s| s.parse::<f64>().ok()).filter(|p| p.is_finite());
    match parsed {
        None => {
            issues.push(FieldIssue::new("invalid_type", "price", "Price must be a number"));
            None
        }
        Some(p) if p <= 0.0 => {
            issues.push(FieldIssue::new("too_small", "price", "Price must be positive"));
            None
        }
        Some(p) => Some(p),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, price: &str, description: &str, category: &str) -> ProductForm {
        ProductForm {
            name: Some(name.into()),
            price: Some(price.into()),
            description: Some(description.into()),
            category: Some(category.into()),
            image: None,
        }
    }

    fn fields(issues: &[FieldIssue]) -> Vec<&str> {
        issues.iter().map(FieldIssue::field).collect()
    }

    #[test]
    fn valid_form_is_normalized() {
        let v = validate(&form("  Algebra ", "12.50", " Intro ", "Grammar")).expect("valid");
        assert_eq!(v.name, "Algebra");
        assert_eq!(v.description, "Intro");
        assert_eq!(v.price, 12.5);
        assert_eq!(v.category, Category::Grammar);
        assert_eq!(v.image, "");
    }

    #[test]
    fn every_known_category_is_accepted() {
        for c in Category::ALL {
            assert!(validate(&form("n", "1", "d", c.as_str())).is_ok(), "{}", c);
        }
    }

    #[test]
    fn non_positive_or_non_numeric_price_fails() {
        for bad in ["0", "-1", "abc", "", "NaN", "inf"] {
            let issues = validate(&form("n", bad, "d", "Convo")).expect_err(bad);
            assert_eq!(fields(&issues), vec!["price"], "{}", bad);
        }
        assert!(validate(&form("n", "0.01", "d", "Convo")).is_ok());
    }

    #[test]
    fn all_issues_are_reported_together() {
        let issues = validate(&ProductForm::default()).expect_err("empty form");
        assert_eq!(fields(&issues), vec!["name", "description", "price", "category"]);
        assert_eq!(issues[0].message, "Name is required");
        assert_eq!(issues[3].message, "Invalid category");
    }

    #[test]
    fn length_limits_count_characters() {
        let ok = "é".repeat(NAME_MAX);
        assert!(validate(&form(&ok, "1", "d", "Convo")).is_ok());
        let issues = validate(&form(&"a".repeat(NAME_MAX + 1), "1", &"b".repeat(DESCRIPTION_MAX + 1), "Convo"))
            .expect_err("too long");
        assert_eq!(issues[0].message, "Name too long");
        assert_eq!(issues[1].message, "Description too long");
    }

    #[test]
    fn category_outside_enumeration_fails() {
        let issues = validate(&form("n", "1", "d", "grammar")).expect_err("case-sensitive");
        assert_eq!(fields(&issues), vec!["category"]);
    }

    #[test]
    fn image_is_optional_and_kept() {
        let mut f = form("n", "1", "d", "Convo");
        f.image = Some("123-a.png".into());
        assert_eq!(validate(&f).expect("valid").image, "123-a.png");
    }
}
