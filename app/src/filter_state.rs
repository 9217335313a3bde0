//! FILENAME: app/src/filter_state.rs
// PURPOSE: Checkbox panel state for the operator and platform filters.
// CONTEXT: Every item starts checked. An all-unchecked group means "no restriction".

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use abtest_engine::{FilterOptions, FilterSelection};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

// ============================================================================
// TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterDimension {
    Operator,
    Platform,
}

impl FilterDimension {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterDimension::Operator => "operator",
            FilterDimension::Platform => "platform",
        }
    }
}

impl fmt::Display for FilterDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterDimension {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "operator" | "operators" => Ok(FilterDimension::Operator),
            "platform" | "platforms" => Ok(FilterDimension::Platform),
            other => Err(AppError::InvalidCommand(format!("unknown filter dimension '{}'", other))),
        }
    }
}

/// State of a group's "select all" checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllState {
    Checked,
    Unchecked,
    Indeterminate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterItem {
    pub value: String,
    pub checked: bool,
}

// ============================================================================
// FILTER GROUP
// ============================================================================

/// One checkbox group, items in the order the options were derived.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterGroup {
    items: Vec<FilterItem>,
}

impl FilterGroup {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FilterGroup {
            items: values
                .into_iter()
                .map(|v| FilterItem { value: v.into(), checked: true })
                .collect(),
        }
    }

    pub fn items(&self) -> &[FilterItem] {
        &self.items
    }

    /// Returns false when `value` is not part of the group.
    pub fn set_item(&mut self, value: &str, checked: bool) -> bool {
        match self.items.iter_mut().find(|item| item.value == value) {
            Some(item) => {
                item.checked = checked;
                true
            }
            None => false,
        }
    }

    pub fn set_all(&mut self, checked: bool) {
        for item in &mut self.items {
            item.checked = checked;
        }
    }

    pub fn all_state(&self) -> AllState {
        let checked = self.items.iter().filter(|item| item.checked).count();
        if checked == self.items.len() {
            AllState::Checked
        } else if checked == 0 {
            AllState::Unchecked
        } else {
            AllState::Indeterminate
        }
    }

    /// Checked values, or every value when nothing is checked.
    pub fn selected(&self) -> BTreeSet<String> {
        let checked: BTreeSet<String> = self
            .items
            .iter()
            .filter(|item| item.checked)
            .map(|item| item.value.clone())
            .collect();

        if checked.is_empty() {
            self.items.iter().map(|item| item.value.clone()).collect()
        } else {
            checked
        }
    }
}

// ============================================================================
// FILTER PANEL
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterPanel {
    pub operators: FilterGroup,
    pub platforms: FilterGroup,
}

impl FilterPanel {
    pub fn from_options(options: &FilterOptions) -> Self {
        FilterPanel {
            operators: FilterGroup::new(options.operators.iter().cloned()),
            platforms: FilterGroup::new(options.platforms.iter().cloned()),
        }
    }

    pub fn group(&self, dimension: FilterDimension) -> &FilterGroup {
        match dimension {
            FilterDimension::Operator => &self.operators,
            FilterDimension::Platform => &self.platforms,
        }
    }

    fn group_mut(&mut self, dimension: FilterDimension) -> &mut FilterGroup {
        match dimension {
            FilterDimension::Operator => &mut self.operators,
            FilterDimension::Platform => &mut self.platforms,
        }
    }

    pub fn set_item(&mut self, dimension: FilterDimension, value: &str, checked: bool) -> Result<(), AppError> {
        if self.group_mut(dimension).set_item(value, checked) {
            Ok(())
        } else {
            Err(AppError::UnknownFilterValue {
                dimension: dimension.to_string(),
                value: value.to_string(),
            })
        }
    }

    pub fn set_all(&mut self, dimension: FilterDimension, checked: bool) {
        self.group_mut(dimension).set_all(checked);
    }

    /// The selection handed to the aggregator.
    pub fn selection(&self) -> FilterSelection {
        FilterSelection {
            operators: self.operators.selected(),
            platforms: self.platforms.selected(),
        }
    }
}
