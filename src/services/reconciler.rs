//! Employee/territory relation reconciliation.
//!
//! A write carries the complete desired set of territory ids. The plan is the
//! set difference in both directions; ids present on both sides are left alone,
//! so their association rows are never deleted and recreated.

use std::collections::BTreeSet;

use crate::database::DatabaseError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TerritoryPlan {
    pub employee_id: i32,
    pub to_add: BTreeSet<String>,
    pub to_remove: BTreeSet<String>,
}

impl TerritoryPlan {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }

    /// The association set after applying this plan to `current`
    pub fn apply_to(&self, current: &BTreeSet<String>) -> BTreeSet<String> {
        current
            .difference(&self.to_remove)
            .chain(self.to_add.iter())
            .cloned()
            .collect()
    }
}

/// `to_remove = current - desired`, `to_add = desired - current`
pub fn plan(employee_id: i32, current: &BTreeSet<String>, desired: &BTreeSet<String>) -> TerritoryPlan {
    TerritoryPlan {
        employee_id,
        to_add: desired.difference(current).cloned().collect(),
        to_remove: current.difference(desired).cloned().collect(),
    }
}

/// Every desired id must name an existing territory
pub fn check_known(desired: &BTreeSet<String>, known: &BTreeSet<String>) -> Result<(), DatabaseError> {
    let unknown: Vec<&str> = desired.difference(known).map(String::as_str).collect();
    if unknown.is_empty() {
        return Ok(());
    }
    Err(DatabaseError::Validation {
        field: "territories".to_string(),
        message: format!("Unknown territory id(s): {}", unknown.join(", ")),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn diff_adds_and_removes_only_changes() {
        let current = set(&["A", "B", "C"]);
        let desired = set(&["B", "C", "D"]);
        let plan = plan(7, &current, &desired);

        assert_eq!(plan.to_add, set(&["D"]));
        assert_eq!(plan.to_remove, set(&["A"]));
        assert_eq!(plan.apply_to(&current), desired);
    }

    #[test]
    fn second_application_is_empty() {
        let current = set(&["A"]);
        let desired = set(&["B", "C"]);
        let first = plan(1, &current, &desired);
        let after = first.apply_to(&current);

        let second = plan(1, &after, &desired);
        assert!(second.is_empty());
        assert_eq!(after, desired);
    }

    #[test]
    fn empty_desired_clears_everything() {
        let current = set(&["A", "B"]);
        let plan = plan(1, &current, &BTreeSet::new());
        assert!(plan.to_add.is_empty());
        assert_eq!(plan.to_remove, current);
        assert!(plan.apply_to(&current).is_empty());
    }

    #[test]
    fn unknown_territories_are_rejected() {
        let known = set(&["01581", "01730"]);
        assert!(check_known(&set(&["01581"]), &known).is_ok());

        match check_known(&set(&["01581", "99999"]), &known) {
            Err(DatabaseError::Validation { field, message }) => {
                assert_eq!(field, "territories");
                assert!(message.contains("99999"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
