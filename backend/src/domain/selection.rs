use super::models::Kid;

/// Decide which kid should be selected.
///
/// 1. A remembered selection that still matches an existing kid wins.
/// 2. Otherwise, if there is exactly one kid, it is selected.
/// 3. Otherwise nothing is selected and the user has to pick.
pub fn resolve_selection(remembered: Option<&str>, kids: &[Kid]) -> Option<String> {
    if let Some(id) = remembered {
        if kids.iter().any(|kid| kid.id == id) {
            return Some(id.to_string());
        }
    }
    match kids {
        [only] => Some(only.id.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shared::Gender;

    fn kid(id: &str) -> Kid {
        Kid {
            id: id.to_string(),
            name: id.to_uppercase(),
            birthdate: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            gender: Gender::Other,
            photo_uri: None,
        }
    }

    #[test]
    fn test_remembered_selection_wins() {
        let kids = vec![kid("a"), kid("b")];
        assert_eq!(resolve_selection(Some("b"), &kids), Some("b".to_string()));
    }

    #[test]
    fn test_single_kid_is_auto_selected() {
        let kids = vec![kid("a")];
        assert_eq!(resolve_selection(None, &kids), Some("a".to_string()));
        assert_eq!(resolve_selection(Some("gone"), &kids), Some("a".to_string()));
    }

    #[test]
    fn test_no_default_with_several_kids_or_none() {
        let kids = vec![kid("a"), kid("b")];
        assert_eq!(resolve_selection(None, &kids), None);
        assert_eq!(resolve_selection(Some("gone"), &kids), None);
        assert_eq!(resolve_selection(Some("a"), &[]), None);
    }
}
