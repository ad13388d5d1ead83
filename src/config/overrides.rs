//! Command-line overrides (`--set keyboard.enableKeySounds=true`)

use hamster_merge::ConfigTree;
use serde_json::{Map, Value};

use super::error::ConfigError;

/// Parse one `dotted.path=value` assignment.
///
/// The value is read as a YAML scalar, so `true`, `42` and `0.5` keep their
/// types; anything else is taken as a string.
pub fn parse_assignment(assignment: &str) -> Result<(Vec<String>, Value), ConfigError> {
    let (path, raw) = assignment.split_once('=').ok_or_else(|| {
        ConfigError::Malformed(format!("override '{}' is not of the form key=value", assignment))
    })?;

    let segments: Vec<String> = path.trim().split('.').map(|s| s.trim().to_string()).collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(ConfigError::Malformed(format!(
            "override '{}' has an empty key segment",
            assignment
        )));
    }

    let raw = raw.trim();
    let value = match serde_yaml::from_str::<Value>(raw) {
        Ok(Value::Null) if raw.is_empty() => Value::String(String::new()),
        Ok(v @ (Value::Bool(_) | Value::Number(_) | Value::String(_))) => v,
        _ => Value::String(raw.to_string()),
    };

    Ok((segments, value))
}

/// Build an override tree from assignments. Later assignments win.
pub fn overrides_to_tree<I, S>(assignments: I) -> Result<ConfigTree, ConfigError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut tree = ConfigTree::new();
    for assignment in assignments {
        let (path, value) = parse_assignment(assignment.as_ref())?;
        insert_path(&mut tree, &path, value);
    }
    Ok(tree)
}

fn insert_path(tree: &mut ConfigTree, path: &[String], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };

    let mut current = tree;
    for key in parents {
        let entry = current
            .entry(key.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        current = match entry {
            Value::Object(map) => map,
            _ => unreachable!("entry was just replaced with an object"),
        };
    }
    current.insert(last.clone(), value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_typed_values() {
        let (path, value) = parse_assignment("keyboard.enableKeySounds=true").unwrap();
        assert_eq!(path, vec!["keyboard", "enableKeySounds"]);
        assert_eq!(value, json!(true));

        let (_, value) = parse_assignment("toolbar.heightOfToolbar = 60").unwrap();
        assert_eq!(value, json!(60));

        let (_, value) = parse_assignment("swipe.longPressDelay=0.5").unwrap();
        assert_eq!(value, json!(0.5));

        let (_, value) = parse_assignment("keyboard.keyValueOfSpaceLeftButton=,").unwrap();
        assert_eq!(value, json!(","));
    }

    #[test]
    fn test_non_scalar_kept_as_string() {
        let (_, value) = parse_assignment("keyboard.useColorSchema=[a, b]").unwrap();
        assert_eq!(value, json!("[a, b]"));
    }

    #[test]
    fn test_invalid_assignments() {
        assert!(parse_assignment("keyboard.enableKeySounds").is_err());
        assert!(parse_assignment("keyboard..x=1").is_err());
        assert!(parse_assignment("=1").is_err());
    }

    #[test]
    fn test_overrides_to_tree() {
        let tree = overrides_to_tree([
            "toolbar.heightOfToolbar=60",
            "toolbar.enableToolbar=false",
            "rime.maximumNumberOfCandidateWords=50",
        ])
        .unwrap();

        assert_eq!(
            Value::Object(tree),
            json!({
                "toolbar": {"heightOfToolbar": 60, "enableToolbar": false},
                "rime": {"maximumNumberOfCandidateWords": 50}
            })
        );
    }

    #[test]
    fn test_later_assignment_wins() {
        let tree = overrides_to_tree(["a=1", "a.b=2"]).unwrap();
        assert_eq!(Value::Object(tree), json!({"a": {"b": 2}}));
    }
}
