//! Schema validation for layout documents.
//!
//! Layout documents are deserialized into raw string form first, so every
//! problem can be reported with its element path before anything is typed.

use crate::data::CardType;
use crate::layout::{Area, FieldBinding, FieldKey, Layout};

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawDocument {
    #[serde(default)]
    pub layout: Vec<RawLayout>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawLayout {
    #[serde(rename = "for")]
    pub card_type: String,
    #[serde(default)]
    pub field: Vec<RawField>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawField {
    pub key: String,
    pub area: String,
    #[serde(default)]
    pub required: bool,
}

/// The schema rule a layout document broke, in checking order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rule {
    UnknownCardType,
    DuplicateLayout,
    UnknownFieldKey,
    UnknownArea,
    DuplicateArea,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::UnknownCardType => write!(f, "unknown card type"),
            Rule::DuplicateLayout => write!(f, "duplicate layout"),
            Rule::UnknownFieldKey => write!(f, "unknown field key"),
            Rule::UnknownArea => write!(f, "unknown area"),
            Rule::DuplicateArea => write!(f, "duplicate area"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    /// Element path, e.g. `layout[1].field[0].area`.
    pub path: String,
    pub rule: Rule,
    /// The offending attribute value.
    pub value: String,
}

impl SchemaViolation {
    fn new(path: String, rule: Rule, value: &str) -> Self {
        Self { path, rule, value: value.to_string() }
    }
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} `{}`", self.path, self.rule, self.value)
    }
}

pub type ValidationResult = std::result::Result<Vec<Layout>, Vec<SchemaViolation>>;

fn for_path(i: usize) -> String {
    format!("layout[{i}].for")
}

fn field_path(i: usize, j: usize, attr: &str) -> String {
    format!("layout[{i}].field[{j}].{attr}")
}

fn parse_all<T: FromStr>(
    values: impl Iterator<Item = (String, String)>,
    rule: Rule,
    violations: &mut Vec<SchemaViolation>,
) -> HashMap<String, T> {
    let mut parsed = HashMap::new();
    for (path, value) in values {
        match value.parse::<T>() {
            Ok(v) => {
                parsed.insert(path, v);
            }
            Err(_) => violations.push(SchemaViolation::new(path, rule, &value)),
        }
    }
    parsed
}

/// Validates a raw document against the closed enumerations.
///
/// All violations are collected, grouped by rule in checking order.
pub fn validate(doc: &RawDocument) -> ValidationResult {
    let mut violations = Vec::new();

    let types: HashMap<String, CardType> = parse_all(
        doc.layout
            .iter()
            .enumerate()
            .map(|(i, l)| (for_path(i), l.card_type.clone())),
        Rule::UnknownCardType,
        &mut violations,
    );

    let mut seen_types = HashSet::new();
    for (i, layout) in doc.layout.iter().enumerate() {
        if let Some(card_type) = types.get(&for_path(i)) {
            if !seen_types.insert(*card_type) {
                violations.push(SchemaViolation::new(
                    for_path(i),
                    Rule::DuplicateLayout,
                    &layout.card_type,
                ));
            }
        }
    }

    let fields = || {
        doc.layout.iter().enumerate().flat_map(|(i, l)| {
            l.field.iter().enumerate().map(move |(j, f)| (i, j, f))
        })
    };

    let keys: HashMap<String, FieldKey> = parse_all(
        fields().map(|(i, j, f)| (field_path(i, j, "key"), f.key.clone())),
        Rule::UnknownFieldKey,
        &mut violations,
    );

    let areas: HashMap<String, Area> = parse_all(
        fields().map(|(i, j, f)| (field_path(i, j, "area"), f.area.clone())),
        Rule::UnknownArea,
        &mut violations,
    );

    for (i, layout) in doc.layout.iter().enumerate() {
        let mut seen_areas = HashSet::new();
        for (j, field) in layout.field.iter().enumerate() {
            let path = field_path(i, j, "area");
            if let Some(area) = areas.get(&path) {
                if !seen_areas.insert(*area) {
                    violations.push(SchemaViolation::new(path, Rule::DuplicateArea, &field.area));
                }
            }
        }
    }

    if !violations.is_empty() {
        return Err(violations);
    }

    let layouts = doc
        .layout
        .iter()
        .enumerate()
        .filter_map(|(i, layout)| {
            let card_type = *types.get(&for_path(i))?;
            let bindings = layout
                .field
                .iter()
                .enumerate()
                .filter_map(|(j, field)| {
                    let key = *keys.get(&field_path(i, j, "key"))?;
                    let area = *areas.get(&field_path(i, j, "area"))?;
                    Some(FieldBinding { key, area, required: field.required })
                })
                .collect();
            Some(Layout::new(card_type, bindings))
        })
        .collect();
    Ok(layouts)
}
