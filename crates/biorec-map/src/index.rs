use std::collections::BTreeMap;

use biorec_model::FieldMapping;

/// Where a resolved field's value comes from: a fixed per-run default, or an
/// indexed source column with an optional fallback default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingTarget {
    Fixed { default_value: Option<String> },
    Column {
        index: usize,
        default_value: Option<String>,
    },
}

/// A `Category.Other` mapping contributing a free-form trait to one entity
/// category. The trait keeps the source column header as its name.
#[derive(Debug, Clone)]
pub struct TraitTarget {
    pub category: String,
    pub trait_name: String,
    pub target: MappingTarget,
}

/// The mapping list resolved against the staged source columns, built once
/// per run.
///
/// Keys are target field names normalised to lowercase, so lookups are
/// case-insensitive. `Category.Other` targets are kept out of the field index
/// (several of them may share one target name) and resolved separately as
/// traits.
#[derive(Debug, Default)]
pub struct MappingIndex {
    targets: BTreeMap<String, MappingTarget>,
    trait_targets: Vec<TraitTarget>,
}

impl MappingIndex {
    /// Resolves every mapping's source column against `columns`
    /// (case-insensitively) and indexes it under its lowercased target name.
    ///
    /// Mappings whose source column is not present in the staged data are
    /// skipped; fixed mappings need no source column.
    pub fn build(mappings: &[FieldMapping], columns: &[String]) -> Self {
        let mut index = Self::default();

        for mapping in mappings {
            if mapping.target_column.trim().is_empty() {
                continue;
            }

            let target = if mapping.is_fixed {
                MappingTarget::Fixed {
                    default_value: mapping.default_value.clone(),
                }
            } else {
                let position = columns
                    .iter()
                    .position(|c| c.eq_ignore_ascii_case(&mapping.source_column));
                match position {
                    Some(i) => {
                        tracing::debug!(
                            "{} mapped to {} (index {})",
                            mapping.target_column,
                            mapping.source_column,
                            i
                        );
                        MappingTarget::Column {
                            index: i,
                            default_value: mapping.default_value.clone(),
                        }
                    }
                    None => {
                        tracing::warn!(
                            "source column {} for {} not present in staged data; mapping skipped",
                            mapping.source_column,
                            mapping.target_column
                        );
                        continue;
                    }
                }
            };

            if let Some(category) = mapping.trait_category() {
                index.trait_targets.push(TraitTarget {
                    category: category.to_string(),
                    trait_name: mapping.source_column.clone(),
                    target,
                });
            } else {
                index
                    .targets
                    .insert(mapping.target_column.to_lowercase(), target);
            }
        }

        index
    }

    pub fn get(&self, field: &str) -> Option<&MappingTarget> {
        self.targets.get(&field.to_lowercase())
    }

    pub fn trait_targets(&self) -> &[TraitTarget] {
        &self.trait_targets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(source: &str, target: &str) -> FieldMapping {
        FieldMapping {
            source_column: source.to_string(),
            target_column: target.to_string(),
            is_fixed: false,
            default_value: None,
        }
    }

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn lookup_is_case_insensitive_on_target() {
        let index = MappingIndex::build(
            &[mapping("Loc", "Site.Locality")],
            &columns(&["Loc", "Collector"]),
        );
        assert!(index.get("site.locality").is_some());
        assert!(index.get("SITE.LOCALITY").is_some());
        assert!(index.get("Site.Site Name").is_none());
    }

    #[test]
    fn source_column_match_is_case_insensitive() {
        let index = MappingIndex::build(&[mapping("LOC", "Site.Locality")], &columns(&["loc"]));
        assert_eq!(
            index.get("Site.Locality"),
            Some(&MappingTarget::Column {
                index: 0,
                default_value: None
            })
        );
    }

    #[test]
    fn missing_source_column_drops_the_mapping() {
        let index = MappingIndex::build(&[mapping("Gone", "Site.Locality")], &columns(&["Loc"]));
        assert!(index.get("Site.Locality").is_none());
    }

    #[test]
    fn fixed_mappings_need_no_source_column() {
        let fixed = FieldMapping {
            source_column: String::new(),
            target_column: "Region.Region".to_string(),
            is_fixed: true,
            default_value: Some("Australia".to_string()),
        };
        let index = MappingIndex::build(&[fixed], &columns(&["Loc"]));
        assert_eq!(
            index.get("Region.Region"),
            Some(&MappingTarget::Fixed {
                default_value: Some("Australia".to_string())
            })
        );
    }

    #[test]
    fn other_targets_become_traits_not_fields() {
        let index = MappingIndex::build(
            &[
                mapping("Soil", "Site.Other"),
                mapping("Slope", "Site.Other"),
                mapping("Bait", "Material.Other"),
            ],
            &columns(&["Soil", "Slope", "Bait"]),
        );
        assert!(index.get("Site.Other").is_none());
        assert_eq!(index.trait_targets().len(), 3);
        assert_eq!(index.trait_targets()[0].category, "Site");
        assert_eq!(index.trait_targets()[0].trait_name, "Soil");
        assert_eq!(index.trait_targets()[2].category, "Material");
    }
}
