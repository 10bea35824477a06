//! Copy-on-write reads and writes against a resume tree.
//!
//! Nothing here mutates its input. Writes return a new root that shares every
//! untouched subtree with the old one, so callers can detect change with
//! `Arc::ptr_eq`.

use serde_json::Value;

use crate::editing::error::EditError;
use crate::editing::node::PathNode;
use crate::editing::path::DataPath;

/// Reads the value at `path`.
pub fn get<N: PathNode>(tree: &N, path: &DataPath) -> Result<Value, EditError> {
    tree.read(path.steps()).map_err(|miss| miss.at(path))
}

/// Returns a copy of `tree` with the node at `path` replaced by `value`.
///
/// The parent container must already exist. The value must decode into the
/// target's type, so strings stay strings and arrays stay arrays.
pub fn set<N: PathNode + Clone>(tree: &N, path: &DataPath, value: Value) -> Result<N, EditError> {
    let mut next = tree.clone();
    next.write(path.steps(), value)
        .map_err(|miss| miss.at(path))?;
    Ok(next)
}

/// Inserts `item` into the array at `array_path`, appending when `index` is
/// `None`. Returns the new tree and the position the item landed at.
pub fn insert_at<N: PathNode + Clone>(
    tree: &N,
    array_path: &DataPath,
    index: Option<usize>,
    item: Value,
) -> Result<(N, usize), EditError> {
    let mut next = tree.clone();
    let list = next
        .list_mut(array_path.steps())
        .map_err(|miss| miss.at(array_path))?;
    let position = index.unwrap_or(list.len());
    list.insert_value(position, item)
        .map_err(|miss| miss.at(array_path))?;
    Ok((next, position))
}

/// Removes the element at `index` from the array at `array_path`. Removing
/// down to an empty array is allowed.
pub fn remove_at<N: PathNode + Clone>(
    tree: &N,
    array_path: &DataPath,
    index: usize,
) -> Result<(N, Value), EditError> {
    let mut next = tree.clone();
    let removed = next
        .list_mut(array_path.steps())
        .and_then(|list| list.remove_value(index))
        .map_err(|miss| miss.at(array_path))?;
    Ok((next, removed))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::models::resume::ResumeData;
    use serde_json::json;

    fn path(s: &str) -> DataPath {
        DataPath::parse(s).unwrap()
    }

    fn tree() -> ResumeData {
        serde_json::from_value(json!({
            "personalInfo": { "fullName": "", "title": "Engineer" },
            "experience": [
                { "id": "e1", "company": "Acme", "bulletPoints": ["Did X"] },
                { "id": "e2", "company": "Globex", "description": "Line A\nLine B" }
            ],
            "skills": [{ "id": "s1", "name": "Rust" }],
            "sections": [{ "id": "c1", "title": "Awards", "content": "" }]
        }))
        .unwrap()
    }

    #[test]
    fn test_write_then_read_round_trips() {
        let t = tree();
        for (p, v) in [
            ("personalInfo.fullName", json!("Jane Doe")),
            ("experience[1].company", json!("Initech")),
            ("experience.0.bulletPoints.0", json!("Did Y")),
            ("experience[0].current", json!(true)),
            ("sections[0].title", json!("Honors")),
            ("skills[0].rating", json!("Expert")),
            ("includeSocialLinks", json!(false)),
        ] {
            let next = set(&t, &path(p), v.clone()).unwrap();
            assert_eq!(get(&next, &path(p)).unwrap(), v, "round trip for {p}");
        }
    }

    #[test]
    fn test_set_leaves_other_paths_unchanged() {
        let t = tree();
        let next = set(&t, &path("personalInfo.fullName"), json!("Jane Doe")).unwrap();
        assert_eq!(get(&next, &path("personalInfo.title")).unwrap(), json!("Engineer"));
        assert_eq!(get(&t, &path("personalInfo.fullName")).unwrap(), json!(""));
        assert_eq!(next.experience, t.experience);
    }

    #[test]
    fn test_set_shares_untouched_subtrees() {
        let t = tree();
        let next = set(&t, &path("experience[1].company"), json!("Initech")).unwrap();

        assert!(!Arc::ptr_eq(&t.experience, &next.experience));
        assert!(Arc::ptr_eq(&t.experience[0], &next.experience[0]));
        assert!(!Arc::ptr_eq(&t.experience[1], &next.experience[1]));
        assert!(Arc::ptr_eq(&t.personal_info, &next.personal_info));
        assert!(Arc::ptr_eq(&t.skills, &next.skills));
        assert!(Arc::ptr_eq(&t.sections, &next.sections));
        assert_eq!(t.experience[1].company, "Globex");
    }

    #[test]
    fn test_set_rejects_shape_changes() {
        let t = tree();
        let err = set(&t, &path("personalInfo.fullName"), json!(42)).unwrap_err();
        assert!(matches!(err, EditError::TypeMismatch { .. }));

        let err = set(&t, &path("experience"), json!("not an array")).unwrap_err();
        assert!(matches!(err, EditError::TypeMismatch { .. }));

        let err = set(&t, &path("experience[0].bulletPoints"), json!({"a": 1})).unwrap_err();
        assert!(matches!(err, EditError::TypeMismatch { .. }));
    }

    #[test]
    fn test_missing_intermediates_are_not_found() {
        let t = tree();
        for p in [
            "experience[5].company",
            "personalInfo.nickname",
            "experience[1].bulletPoints[0]",
            "education[0].school",
            "personalInfo[0]",
            "experience.company",
        ] {
            let err = get(&t, &path(p)).unwrap_err();
            assert!(
                matches!(err, EditError::PathNotFound { .. }),
                "expected PathNotFound for {p}, got {err:?}"
            );
            let err = set(&t, &path(p), json!("x")).unwrap_err();
            assert!(matches!(err, EditError::PathNotFound { .. }), "set {p}");
        }
    }

    #[test]
    fn test_unset_optional_reads_null_and_accepts_string() {
        let t = tree();
        assert_eq!(get(&t, &path("skills[0].rating")).unwrap(), Value::Null);
        let next = set(&t, &path("skills[0].rating"), json!("Advanced")).unwrap();
        assert_eq!(next.skills[0].rating.as_deref(), Some("Advanced"));
        let cleared = set(&next, &path("skills[0].rating"), Value::Null).unwrap();
        assert_eq!(cleared.skills[0].rating, None);
    }

    #[test]
    fn test_insert_then_remove_restores_array() {
        let t = tree();
        let arr = path("experience");
        let (inserted, at) =
            insert_at(&t, &arr, Some(1), json!({ "id": "e9", "company": "New" })).unwrap();
        assert_eq!(at, 1);
        assert_eq!(inserted.experience.len(), 3);
        assert_eq!(inserted.experience[1].company, "New");
        assert_eq!(inserted.experience[2].company, "Globex");

        let (restored, removed) = remove_at(&inserted, &arr, 1).unwrap();
        assert_eq!(removed["id"], "e9");
        assert_eq!(restored, t);
    }

    #[test]
    fn test_insert_appends_without_index() {
        let t = tree();
        let (next, at) =
            insert_at(&t, &path("experience[0].bulletPoints"), None, json!("Did Z")).unwrap();
        assert_eq!(at, 1);
        assert_eq!(
            next.experience[0].bullet_points.as_deref().unwrap(),
            &vec!["Did X".to_string(), "Did Z".to_string()]
        );
    }

    #[test]
    fn test_insert_into_unset_list_is_not_found() {
        let t = tree();
        let err = insert_at(&t, &path("sections[0].items"), None, json!("x")).unwrap_err();
        assert!(matches!(err, EditError::PathNotFound { .. }));
    }

    #[test]
    fn test_insert_past_end_is_not_found() {
        let t = tree();
        let err = insert_at(&t, &path("skills"), Some(5), json!({ "id": "s2", "name": "Go" }))
            .unwrap_err();
        assert!(matches!(err, EditError::PathNotFound { .. }));
    }

    #[test]
    fn test_insert_rejects_wrong_item_shape() {
        let t = tree();
        let err = insert_at(&t, &path("experience[0].bulletPoints"), None, json!(7)).unwrap_err();
        assert!(matches!(err, EditError::TypeMismatch { .. }));
    }

    #[test]
    fn test_array_ops_on_non_array_are_type_mismatch() {
        let t = tree();
        let err = insert_at(&t, &path("personalInfo.fullName"), None, json!("x")).unwrap_err();
        assert!(matches!(err, EditError::TypeMismatch { .. }));
        let err = remove_at(&t, &path("personalInfo"), 0).unwrap_err();
        assert!(matches!(err, EditError::TypeMismatch { .. }));
    }

    #[test]
    fn test_remove_allows_emptying_array() {
        let t = tree();
        let (next, _) = remove_at(&t, &path("experience[0].bulletPoints"), 0).unwrap();
        assert_eq!(next.experience[0].bullet_points.as_deref().unwrap().len(), 0);

        let err = remove_at(&next, &path("experience[0].bulletPoints"), 0).unwrap_err();
        assert!(matches!(err, EditError::PathNotFound { .. }));
    }

    #[test]
    fn test_project_bullet_alias() {
        let t: ResumeData = serde_json::from_value(json!({
            "projects": [{ "id": "p1", "name": "CLI", "highlights": ["Fast"] }]
        }))
        .unwrap();
        assert_eq!(
            get(&t, &path("projects[0].bulletPoints[0]")).unwrap(),
            get(&t, &path("projects[0].highlights[0]")).unwrap()
        );
    }
}
