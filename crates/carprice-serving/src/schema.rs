//! Feature schema and the column layout derived from it.
//!
//! The feature schema is the ordered list of column names the model and the
//! scaler were fitted on. It is the source of truth for which indicator
//! columns exist: reference categories are whatever the schema omits.
//!
//! [`ColumnLayout::resolve`] maps every schema column to a logical field once,
//! at load time, so the encoder works with positions instead of names.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use carprice_core::{normalize_column_name, CategoricalField, NumericField};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ServingError, ServingResult};

/// On-disk forms of the schema: a bare list, or an object with `columns`.
#[derive(Deserialize)]
#[serde(untagged)]
enum SchemaFile {
    List(Vec<String>),
    Object { columns: Vec<String> },
}

impl From<SchemaFile> for FeatureSchema {
    fn from(file: SchemaFile) -> Self {
        match file {
            SchemaFile::List(columns) | SchemaFile::Object { columns } => Self { columns },
        }
    }
}

impl From<FeatureSchema> for Vec<String> {
    fn from(schema: FeatureSchema) -> Self {
        schema.columns
    }
}

/// Ordered feature column names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SchemaFile", into = "Vec<String>")]
pub struct FeatureSchema {
    columns: Vec<String>,
}

impl FeatureSchema {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a schema from JSON text.
    pub fn from_json_str(json: &str) -> ServingResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| ServingError::schema_load(format!("invalid feature schema: {e}")))
    }

    /// Load a schema file.
    pub fn load(path: impl AsRef<Path>) -> ServingResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            ServingError::schema_load(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&json)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// What a single schema column encodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnRole {
    /// A raw numeric input, later replaced by the scaler output.
    Numeric(NumericField),
    /// A 0/1 indicator for one category of a categorical field.
    Indicator {
        field: CategoricalField,
        category: &'static str,
    },
}

impl ColumnRole {
    /// Classify a column name, or `None` if it matches no known field.
    pub fn classify(name: &str) -> Option<Self> {
        let normalized = normalize_column_name(name);

        if let Some(field) = NumericField::ALL
            .into_iter()
            .find(|f| f.aliases().contains(&normalized.as_str()))
        {
            return Some(ColumnRole::Numeric(field));
        }

        for field in CategoricalField::ALL {
            for prefix in field.column_prefixes() {
                let Some(rest) = normalized
                    .strip_prefix(prefix)
                    .and_then(|r| r.strip_prefix('_'))
                else {
                    continue;
                };
                if let Some(category) = field
                    .categories()
                    .iter()
                    .copied()
                    .find(|c| normalize_column_name(c) == rest)
                {
                    return Some(ColumnRole::Indicator { field, category });
                }
            }
        }

        None
    }
}

/// An indicator column and the category it stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indicator {
    pub position: usize,
    pub field: CategoricalField,
    pub category: &'static str,
}

/// Mapping from logical fields to positions in the feature vector.
#[derive(Debug, Clone)]
pub struct ColumnLayout {
    columns: Arc<[String]>,
    roles: Vec<ColumnRole>,
    numeric: [usize; 3],
    indicators: Vec<Indicator>,
}

impl ColumnLayout {
    /// Resolve every schema column to a field.
    ///
    /// Fails if a column is unknown or repeated, if a numeric field has no
    /// column, or if a categorical field has no indicator column at all.
    pub fn resolve(schema: &FeatureSchema) -> ServingResult<Self> {
        if schema.is_empty() {
            return Err(ServingError::schema_mismatch("feature schema has no columns"));
        }

        let mut roles = Vec::with_capacity(schema.len());
        let mut seen = HashSet::with_capacity(schema.len());
        for name in schema.columns() {
            let role = ColumnRole::classify(name).ok_or_else(|| {
                ServingError::schema_mismatch(format!(
                    "column {name:?} does not correspond to any known field"
                ))
            })?;
            if !seen.insert(role) {
                return Err(ServingError::schema_mismatch(format!(
                    "column {name:?} duplicates an earlier column"
                )));
            }
            roles.push(role);
        }

        let mut numeric = [usize::MAX; 3];
        let mut indicators = Vec::new();
        for (position, role) in roles.iter().enumerate() {
            match *role {
                ColumnRole::Numeric(field) => numeric[field.index()] = position,
                ColumnRole::Indicator { field, category } => indicators.push(Indicator {
                    position,
                    field,
                    category,
                }),
            }
        }

        for field in NumericField::ALL {
            if numeric[field.index()] == usize::MAX {
                return Err(ServingError::schema_mismatch(format!(
                    "numeric column {:?} is missing",
                    field.column_name()
                )));
            }
        }

        let layout = Self {
            columns: schema.columns().to_vec().into(),
            roles,
            numeric,
            indicators,
        };

        for field in CategoricalField::ALL {
            if layout.indicators(field).next().is_none() {
                return Err(ServingError::schema_mismatch(format!(
                    "no indicator columns for {field}"
                )));
            }
            let references = layout.reference_categories(field);
            if references.len() > 1 {
                warn!(
                    field = %field,
                    references = ?references,
                    "Several categories share the all-zero encoding"
                );
            }
            debug!(field = %field, references = ?references, "Resolved reference categories");
        }

        Ok(layout)
    }

    /// Number of columns in the feature vector.
    pub fn width(&self) -> usize {
        self.roles.len()
    }

    /// Column names in schema order.
    pub fn columns(&self) -> &Arc<[String]> {
        &self.columns
    }

    pub fn role(&self, position: usize) -> Option<ColumnRole> {
        self.roles.get(position).copied()
    }

    pub fn numeric_position(&self, field: NumericField) -> usize {
        self.numeric[field.index()]
    }

    /// Positions of the numeric columns in [`NumericField::ALL`] order.
    pub fn numeric_positions(&self) -> [usize; 3] {
        self.numeric
    }

    /// Indicator columns of one categorical field, in schema order.
    pub fn indicators(&self, field: CategoricalField) -> impl Iterator<Item = &Indicator> {
        self.indicators.iter().filter(move |i| i.field == field)
    }

    /// Known categories of `field` that have no indicator column.
    pub fn reference_categories(&self, field: CategoricalField) -> Vec<&'static str> {
        field
            .categories()
            .iter()
            .copied()
            .filter(|c| !self.indicators(field).any(|i| i.category == *c))
            .collect()
    }
}
