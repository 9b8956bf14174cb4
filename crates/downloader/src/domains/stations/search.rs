//! Station search by loose name input.
//!
//! A candidate matches when every character of the query shows up in its
//! `group_name + name` label in the same order (gaps allowed). Matches keep
//! the registry order; there is no ranking.

use crate::StationRegistry;

/// A station that matched a search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub label: String,
    pub oid: String,
}

/// Without the `fuzzy` feature callers fall back to
/// [`StationRegistry::find_by_name`].
#[cfg(feature = "fuzzy")]
impl StationRegistry {
    pub fn fuzzy_candidates(&self, query: &str) -> Vec<Candidate> {
        let query = query.to_lowercase();
        self.list()
            .iter()
            .filter_map(|station| {
                let label = station.search_label();
                is_subsequence(&query, &label.to_lowercase()).then(|| Candidate {
                    label,
                    oid: station.oid.clone(),
                })
            })
            .collect()
    }
}

#[cfg_attr(not(feature = "fuzzy"), allow(dead_code))]
fn is_subsequence(query: &str, candidate: &str) -> bool {
    let mut remaining = candidate.chars();
    query.chars().all(|q| remaining.any(|c| c == q))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_subsequence() {
        assert!(is_subsequence("", "東京都東京"));
        assert!(is_subsequence("東東", "東京都東京"));
        assert!(is_subsequence("京京", "東京都東京"));
        assert!(!is_subsequence("京東京東", "東京都東京"));
        assert!(!is_subsequence("大", "東京都東京"));
    }

    #[cfg(feature = "fuzzy")]
    mod fuzzy {
        use super::super::*;

        const SAMPLE: &str = r#"{
            "4447662": {"oid": "4447662", "prec_no": "44", "block_no": "47662", "name": "東京",
                        "group_name": "東京都", "lat": [35, 41.5], "long": [139, 45.0], "elev": 25.2},
            "440366":  {"oid": "440366", "prec_no": "44", "block_no": "0366", "name": "練馬",
                        "group_name": "東京都", "lat": [35, 44.1], "long": [139, 40.0], "elev": 38,
                        "obstype": "auto4"},
            "6747765": {"oid": "6747765", "prec_no": "67", "block_no": "47765", "name": "広島",
                        "group_name": "広島県", "lat": [34, 23.9], "long": [132, 27.7], "elev": 3.6}
        }"#;

        #[test]
        fn test_single_match() {
            let registry = StationRegistry::load(SAMPLE).unwrap();
            let found = registry.fuzzy_candidates("都練");
            assert_eq!(
                found,
                vec![Candidate {
                    label: "東京都練馬".to_string(),
                    oid: "440366".to_string()
                }]
            );
        }

        #[test]
        fn test_no_match() {
            let registry = StationRegistry::load(SAMPLE).unwrap();
            assert!(registry.fuzzy_candidates("大阪").is_empty());
        }

        #[test]
        fn test_matches_keep_registry_order() {
            let registry = StationRegistry::load(SAMPLE).unwrap();
            let ids: Vec<String> = registry
                .fuzzy_candidates("東京")
                .into_iter()
                .map(|c| c.oid)
                .collect();
            assert_eq!(ids, vec!["4447662", "440366"]);
        }
    }
}
