use crate::parsing::prometheus::remote_write_models::Label;

/// Turns a tag map into the label list of a remote write time series.
///
/// Remote write receivers expect labels sorted by name. The ordering is the
/// byte order of the names, so it does not depend on the iteration order of
/// the source map.
pub fn normalize_labels<'a, I>(tags: I) -> Vec<Label>
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    let mut labels: Vec<Label> = tags
        .into_iter()
        .map(|(name, value)| Label {
            name: name.clone(),
            value: value.clone(),
        })
        .collect();
    // Tag keys are unique, an unstable sort is enough
    labels.sort_unstable_by(|a, b| a.name.cmp(&b.name));
    labels
}

/// `name=value, name=value` rendering used in logs.
pub fn format_labels(labels: &[Label]) -> String {
    labels
        .iter()
        .map(|label| format!("{}={}", label.name, label.value))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, HashMap};

    fn names(labels: &[Label]) -> Vec<&str> {
        labels.iter().map(|label| label.name.as_str()).collect()
    }

    #[test]
    fn test_labels_are_sorted_by_name() {
        let mut tags = HashMap::new();
        tags.insert("job".to_string(), "node".to_string());
        tags.insert("__name__".to_string(), "up".to_string());
        tags.insert("instance".to_string(), "localhost:9100".to_string());
        tags.insert("Zone".to_string(), "a".to_string());

        let labels = normalize_labels(&tags);
        assert_eq!(names(&labels), vec!["Zone", "__name__", "instance", "job"]);
        assert_eq!(labels[1].value, "up");
    }

    #[test]
    fn test_same_labels_regardless_of_source_order() {
        let pairs = [("b", "2"), ("a", "1"), ("c", "3")];
        let hash: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let tree: BTreeMap<String, String> = pairs
            .iter()
            .rev()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        assert_eq!(normalize_labels(&hash), normalize_labels(&tree));
    }

    #[test]
    fn test_empty_tags() {
        let tags: HashMap<String, String> = HashMap::new();
        assert!(normalize_labels(&tags).is_empty());
    }

    #[test]
    fn test_format_labels() {
        let labels = vec![
            Label {
                name: "__name__".to_string(),
                value: "up".to_string(),
            },
            Label {
                name: "job".to_string(),
                value: "node".to_string(),
            },
        ];
        assert_eq!(format_labels(&labels), "__name__=up, job=node");
        assert_eq!(format_labels(&[]), "");
    }
}
