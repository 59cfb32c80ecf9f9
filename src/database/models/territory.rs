use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Territory {
    pub territory_id: String,
    pub territory_description: String,
    pub region_id: i32,
}

/// Territory as shown in the assignment checklist
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TerritoryOption {
    pub territory_id: String,
    pub territory_description: String,
    pub region_id: i32,
    pub is_selected: bool,
}

impl TerritoryOption {
    /// Mark each territory as selected when it is in `assigned`
    pub fn checklist(territories: Vec<Territory>, assigned: &BTreeSet<String>) -> Vec<TerritoryOption> {
        territories
            .into_iter()
            .map(|t| TerritoryOption {
                is_selected: assigned.contains(&t.territory_id),
                territory_id: t.territory_id,
                territory_description: t.territory_description,
                region_id: t.region_id,
            })
            .collect()
    }
}

/// One checklist entry coming back from the form; descriptive fields are ignored
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerritorySelection {
    #[serde(alias = "territoryID")]
    pub territory_id: String,
    #[serde(default)]
    pub is_selected: bool,
}

impl TerritorySelection {
    /// Ids of the selected entries, deduplicated
    pub fn selected_ids(selections: &[TerritorySelection]) -> BTreeSet<String> {
        selections
            .iter()
            .filter(|s| s.is_selected)
            .map(|s| s.territory_id.trim().to_string())
            .collect()
    }
}
