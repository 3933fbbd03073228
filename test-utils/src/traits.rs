use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// `category -> item name -> image uri`
pub type TraitsInput = BTreeMap<String, BTreeMap<String, String>>;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TraitRow {
    pub label: String,
    pub name: String,
    pub uri: String,
}

/// Flattens a category map into one row per trait, labelled with its
/// category.
pub fn transform_traits_data(input: &TraitsInput) -> Vec<TraitRow> {
    input
        .iter()
        .flat_map(|(label, items)| {
            items.iter().map(move |(name, uri)| TraitRow {
                label: label.clone(),
                name: name.clone(),
                uri: uri.clone(),
            })
        })
        .collect()
}
