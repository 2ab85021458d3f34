use serde::{Deserialize, Serialize};

use crate::MAX_PLACE_RESULTS;

/// One country with its cities, as shipped in the static place dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryCities {
    pub country: String,
    pub cities: Vec<String>,
}

/// One entry of the static dial-code dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialCode {
    pub dial_code: String,
}

/// A single searchable (city, country) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceEntry {
    pub city: String,
    pub country: String,
}

/// Flattened, immutable search index over the place dataset.
///
/// Built once per dataset load and never mutated afterwards. Duplicate city
/// names (within or across countries) are kept as distinct entries; the
/// country field disambiguates them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceIndex {
    entries: Vec<PlaceEntry>,
}

impl PlaceIndex {
    /// Flattens the nested dataset, preserving source ordering.
    #[must_use]
    pub fn build(nested: &[CountryCities]) -> Self {
        let entries = nested
            .iter()
            .flat_map(|group| {
                group.cities.iter().map(|city| PlaceEntry {
                    city: city.clone(),
                    country: group.country.clone(),
                })
            })
            .collect();
        Self { entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[PlaceEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact membership check for the constrained birth-place field.
    #[must_use]
    pub fn contains_city(&self, city: &str) -> bool {
        self.entries.iter().any(|e| e.city == city)
    }

    /// Case-insensitive prefix match on the city field only.
    ///
    /// The empty query matches every entry. Results are truncated to the
    /// first [`MAX_PLACE_RESULTS`] matches in index order; this is a hard
    /// cap, not a relevance ranking. Linear scan is fine for indexes in the
    /// low thousands; a sorted prefix structure would replace it if the
    /// dataset grew by orders of magnitude, without changing this contract.
    #[must_use]
    pub fn filter(&self, query: &str) -> Vec<&PlaceEntry> {
        let needle = query.to_lowercase();
        self.entries
            .iter()
            .filter(|e| e.city.to_lowercase().starts_with(&needle))
            .take(MAX_PLACE_RESULTS)
            .collect()
    }
}

/// A selectable option as the surrounding form consumes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceOption {
    pub value: String,
    pub label: String,
}

/// Maps filtered entries to options; the label carries the country so
/// duplicate city names stay distinguishable.
#[must_use]
pub fn place_options(matches: &[&PlaceEntry]) -> Vec<PlaceOption> {
    matches
        .iter()
        .map(|e| PlaceOption {
            value: e.city.clone(),
            label: format!("{}, {}", e.city, e.country),
        })
        .collect()
}

/// Dial-code option, derived 1:1 from the static code dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialCodeOption {
    pub value: String,
    pub label: String,
}

#[must_use]
pub fn dial_code_options(codes: &[DialCode]) -> Vec<DialCodeOption> {
    codes
        .iter()
        .map(|c| DialCodeOption {
            value: c.dial_code.clone(),
            label: c.dial_code.clone(),
        })
        .collect()
}
