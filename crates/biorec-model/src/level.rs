use serde::{Deserialize, Serialize};

/// How deep into the record hierarchy a row reaches, decided from which
/// categories the mapping profile targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImportLevel {
    /// Only region fields are mapped.
    Region,
    /// Site fields (with or without region fields) but nothing deeper.
    Site,
    /// Site visit fields but no taxa and no material.
    Visit,
    /// Taxon fields only; no locality data and no material.
    TaxaOnly,
    /// Material fields together with taxon fields, or taxa plus locality data.
    MaterialWithTaxa,
    /// Material fields with no taxon fields mapped.
    MaterialWithoutTaxa,
}

impl ImportLevel {
    /// True when rows at this level create material records.
    pub fn has_material(self) -> bool {
        matches!(
            self,
            ImportLevel::MaterialWithTaxa | ImportLevel::MaterialWithoutTaxa
        )
    }

    /// True when rows at this level resolve a taxon.
    pub fn has_taxa(self) -> bool {
        matches!(self, ImportLevel::TaxaOnly | ImportLevel::MaterialWithTaxa)
    }

    /// True when rows at this level resolve the region/site/visit chain.
    pub fn has_locality(self) -> bool {
        !matches!(self, ImportLevel::TaxaOnly)
    }
}

impl std::fmt::Display for ImportLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ImportLevel::Region => "region",
            ImportLevel::Site => "site",
            ImportLevel::Visit => "site visit",
            ImportLevel::TaxaOnly => "taxa only",
            ImportLevel::MaterialWithTaxa => "material with taxa",
            ImportLevel::MaterialWithoutTaxa => "material without taxa",
        };
        f.write_str(name)
    }
}
