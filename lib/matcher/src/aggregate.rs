//! Grouping of per-field selections by API name

use crate::select::FieldSelection;
use ahash::AHashMap;
use fieldmatch_core::ApiMethod;
use serde::{Deserialize, Serialize};

/// A field recommended for an API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub field: String,
    pub score: f64,
}

/// Fields recommended for one API name
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRecommendations {
    pub api: String,
    pub entries: Vec<Recommendation>,
}

/// API name → recommended fields, in first-insertion order
///
/// An API with no qualifying field has no entry at all.
#[derive(Debug, Clone, Default)]
pub struct Recommendations {
    apis: Vec<ApiRecommendations>,
    index: AHashMap<String, usize>,
}

impl Recommendations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a raw (api, field, score) selection
    pub fn push(&mut self, api: &str, field: &str, score: f64) {
        let slot = match self.index.get(api) {
            Some(&slot) => slot,
            None => {
                self.index.insert(api.to_string(), self.apis.len());
                self.apis.push(ApiRecommendations {
                    api: api.to_string(),
                    entries: Vec::new(),
                });
                self.apis.len() - 1
            }
        };
        self.apis[slot].entries.push(Recommendation {
            field: field.to_string(),
            score,
        });
    }

    /// Collapse repeated fields under each API to their maximum score
    ///
    /// The surviving entry keeps the position of the field's first occurrence.
    pub fn dedup_by_max_score(&mut self) {
        for api in &mut self.apis {
            let mut positions: AHashMap<String, usize> = AHashMap::with_capacity(api.entries.len());
            let mut unique: Vec<Recommendation> = Vec::with_capacity(api.entries.len());
            for entry in api.entries.drain(..) {
                match positions.get(&entry.field) {
                    Some(&pos) => {
                        if entry.score > unique[pos].score {
                            unique[pos].score = entry.score;
                        }
                    }
                    None => {
                        positions.insert(entry.field.clone(), unique.len());
                        unique.push(entry);
                    }
                }
            }
            api.entries = unique;
        }
    }

    pub fn get(&self, api: &str) -> Option<&[Recommendation]> {
        self.index
            .get(api)
            .map(|&slot| self.apis[slot].entries.as_slice())
    }

    pub fn contains_api(&self, api: &str) -> bool {
        self.index.contains_key(api)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ApiRecommendations> {
        self.apis.iter()
    }

    pub fn api_names(&self) -> Vec<&str> {
        self.apis.iter().map(|a| a.api.as_str()).collect()
    }

    /// Number of APIs with at least one recommendation
    pub fn len(&self) -> usize {
        self.apis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apis.is_empty()
    }

    /// Number of (api, field) entries across all APIs
    pub fn total_entries(&self) -> usize {
        self.apis.iter().map(|a| a.entries.len()).sum()
    }
}

impl PartialEq for Recommendations {
    fn eq(&self, other: &Self) -> bool {
        self.apis == other.apis
    }
}

/// Invert per-field selections into per-API recommendations
///
/// `selections[i]` holds the candidates of `field_names[i]`; candidate
/// indices refer to `api_methods`. APIs sharing a name share one entry list.
pub fn aggregate(
    field_names: &[String],
    api_methods: &[ApiMethod],
    selections: &[FieldSelection],
) -> Recommendations {
    let mut recommendations = Recommendations::new();
    for (field, selection) in field_names.iter().zip(selections) {
        for candidate in selection {
            let api = &api_methods[candidate.api_index];
            recommendations.push(&api.name, field, candidate.score);
        }
    }
    recommendations.dedup_by_max_score();
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::select::Candidate;
    use smallvec::smallvec;

    fn apis(names: &[&str]) -> Vec<ApiMethod> {
        names.iter().map(|n| ApiMethod::new(*n, format!("{n} description"))).collect()
    }

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn c(api_index: usize, score: f64) -> Candidate {
        Candidate { api_index, score }
    }

    #[test]
    fn test_groups_by_api_in_first_insertion_order() {
        let selections: Vec<FieldSelection> = vec![
            smallvec![c(1, 0.9)],
            smallvec![c(0, 0.8)],
            smallvec![c(1, 0.85)],
        ];
        let result = aggregate(&fields(&["a", "b", "c"]), &apis(&["X", "Y"]), &selections);

        assert_eq!(result.api_names(), vec!["Y", "X"]);
        let y: Vec<&str> = result.get("Y").unwrap().iter().map(|r| r.field.as_str()).collect();
        assert_eq!(y, vec!["a", "c"]);
        assert_eq!(result.get("X").unwrap()[0].field, "b");
        assert_eq!(result.total_entries(), 3);
    }

    #[test]
    fn test_api_without_fields_is_absent() {
        let selections: Vec<FieldSelection> = vec![smallvec![c(0, 0.9)], smallvec![]];
        let result = aggregate(&fields(&["a", "b"]), &apis(&["X", "Y"]), &selections);
        assert!(result.contains_api("X"));
        assert!(!result.contains_api("Y"));
        assert_eq!(result.get("Y"), None);
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_shared_name_keeps_max_score() {
        // Two catalog entries named "X"; field "a" qualifies against both
        let selections: Vec<FieldSelection> = vec![
            smallvec![c(0, 0.82), c(2, 0.91)],
            smallvec![c(2, 0.88)],
        ];
        let result = aggregate(&fields(&["a", "b"]), &apis(&["X", "Y", "X"]), &selections);

        let x = result.get("X").unwrap();
        assert_eq!(x.len(), 2);
        assert_eq!(x[0], Recommendation { field: "a".into(), score: 0.91 });
        assert_eq!(x[1], Recommendation { field: "b".into(), score: 0.88 });
        assert!(!result.contains_api("Y"));
    }

    #[test]
    fn test_dedup_keeps_first_position() {
        let mut result = Recommendations::new();
        result.push("X", "a", 0.5);
        result.push("X", "b", 0.6);
        result.push("X", "a", 0.9);
        result.push("X", "b", 0.4);
        result.dedup_by_max_score();

        let x = result.get("X").unwrap();
        assert_eq!(x.len(), 2);
        assert_eq!((x[0].field.as_str(), x[0].score), ("a", 0.9));
        assert_eq!((x[1].field.as_str(), x[1].score), ("b", 0.6));
    }

    #[test]
    fn test_empty_selections_give_empty_result() {
        let selections: Vec<FieldSelection> = vec![smallvec![], smallvec![]];
        let result = aggregate(&fields(&["a", "b"]), &apis(&["X"]), &selections);
        assert!(result.is_empty());
        assert_eq!(result.total_entries(), 0);
    }
}
