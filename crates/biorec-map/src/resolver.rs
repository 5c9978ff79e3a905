use biorec_ingest::RowSource;

use crate::{MappingIndex, MappingTarget};

/// Resolves dotted field keys against the current row of a [`RowSource`].
///
/// Borrowed immutably per row; the caller advances the cursor between rows.
pub struct FieldResolver<'a> {
    index: &'a MappingIndex,
    source: &'a dyn RowSource,
}

impl<'a> FieldResolver<'a> {
    pub fn new(index: &'a MappingIndex, source: &'a dyn RowSource) -> Self {
        Self { index, source }
    }

    /// Resolves `field` for the current row, or `None` when the field is
    /// unmapped or its cell is absent with no usable mapping default.
    ///
    /// An empty cell value is a present value and is returned as-is; mapping
    /// defaults only fill in for cells the row does not have at all.
    pub fn get_opt(&self, field: &str) -> Option<String> {
        let target = self.index.get(field)?;
        self.resolve_target(target)
    }

    /// Resolves `field`, falling back to `def` when nothing is mapped or
    /// present.
    pub fn get_or(&self, field: &str, def: &str) -> String {
        self.get_opt(field)
            .unwrap_or_else(|| def.to_string())
    }

    /// Resolves `field` with an empty-string fallback.
    pub fn get(&self, field: &str) -> String {
        self.get_or(field, "")
    }

    /// Non-empty trait values for `category` in the current row, as
    /// `(trait name, value)` pairs.
    pub fn trait_values(&self, category: &str) -> Vec<(String, String)> {
        self.index
            .trait_targets()
            .iter()
            .filter(|t| t.category.eq_ignore_ascii_case(category))
            .filter_map(|t| {
                self.resolve_target(&t.target)
                    .filter(|v| !v.is_empty())
                    .map(|v| (t.trait_name.clone(), v))
            })
            .collect()
    }

    fn resolve_target(&self, target: &MappingTarget) -> Option<String> {
        let (value, mapping_default) = match target {
            MappingTarget::Fixed { default_value } => (default_value.clone(), default_value),
            MappingTarget::Column {
                index,
                default_value,
            } => (
                self.source.value(*index).map(str::to_string),
                default_value,
            ),
        };

        match value {
            Some(v) => Some(v),
            None => match mapping_default {
                Some(d) if !d.trim().is_empty() => Some(d.clone()),
                _ => None,
            },
        }
    }
}
