use serde::{Deserialize, Serialize};

use crate::TaxonId;

/// One rung of the taxonomic rank ladder: a display name plus the short code
/// stored with taxon records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaxonRankName {
    pub long_name: String,
    pub code: String,
}

impl TaxonRankName {
    pub fn new(long_name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            long_name: long_name.into(),
            code: code.into(),
        }
    }
}

/// The ordered rank ladder, outermost rank first. Loaded once at run start and
/// read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankLadder {
    ranks: Vec<TaxonRankName>,
}

impl RankLadder {
    pub fn new(ranks: Vec<TaxonRankName>) -> Self {
        Self { ranks }
    }

    /// The conventional Linnaean ladder used when the host supplies nothing
    /// more specific.
    pub fn standard() -> Self {
        Self::new(vec![
            TaxonRankName::new("Kingdom", "KING"),
            TaxonRankName::new("Phylum", "PHYL"),
            TaxonRankName::new("Class", "CL"),
            TaxonRankName::new("Order", "ORD"),
            TaxonRankName::new("Family", "FAM"),
            TaxonRankName::new("Genus", "GEN"),
            TaxonRankName::new("Species", "SP"),
            TaxonRankName::new("Subspecies", "SSP"),
        ])
    }

    pub fn ranks(&self) -> &[TaxonRankName] {
        &self.ranks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TaxonRankName> {
        self.ranks.iter()
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}

/// The value a row supplies for one rank. A full-ladder vector of these is the
/// identity of a taxon for caching purposes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaxonRankValue {
    pub long_name: String,
    pub value: String,
}

impl TaxonRankValue {
    pub fn new(long_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            long_name: long_name.into(),
            value: value.into(),
        }
    }
}

/// A taxon record to persist at one rank of the ladder.
///
/// Authority fields are populated only when this rank is the deepest one the
/// row supplies a name for; intermediate ancestors are created bare.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxonInsert {
    pub parent: Option<TaxonId>,
    pub epithet: String,
    pub author: String,
    pub year: String,
    pub changed_combination: bool,
    pub rank_code: String,
    pub kingdom_type: String,
    pub unverified: bool,
    pub name_status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_ladder_runs_kingdom_to_subspecies() {
        let ladder = RankLadder::standard();
        assert_eq!(ladder.len(), 8);
        assert_eq!(ladder.ranks()[0].long_name, "Kingdom");
        assert_eq!(ladder.ranks()[7].long_name, "Subspecies");
    }

    #[test]
    fn rank_value_vectors_compare_by_content() {
        let a = vec![
            TaxonRankValue::new("Kingdom", "Animalia"),
            TaxonRankValue::new("Phylum", ""),
        ];
        let b = vec![
            TaxonRankValue::new("Kingdom", "Animalia"),
            TaxonRankValue::new("Phylum", ""),
        ];
        assert_eq!(a, b);

        let c = vec![
            TaxonRankValue::new("Kingdom", "Animalia"),
            TaxonRankValue::new("Phylum", "Chordata"),
        ];
        assert_ne!(a, c);
    }
}
