pub mod error;
pub mod ids;
pub mod level;
pub mod mapping;
pub mod material;
pub mod site;
pub mod taxon;
pub mod units;

pub use error::{ImportError, Result};
pub use ids::{MaterialId, MaterialPartId, RegionId, SiteId, SiteVisitId, TaxonId};
pub use level::ImportLevel;
pub use mapping::{FieldMapping, MappingConfig};
pub use material::{Material, MaterialPart};
pub use site::{
    CoordinateType, DateType, ElevationType, PositionAreaType, Region, RegionRank, Site,
    SiteVisit,
};
pub use taxon::{RankLadder, TaxonInsert, TaxonRankName, TaxonRankValue};
pub use units::{RangeType, UnitRange};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_config_serializes() {
        let config = MappingConfig {
            profile_name: "avian-survey".to_string(),
            mappings: vec![FieldMapping {
                source_column: "Loc".to_string(),
                target_column: "Site.Locality".to_string(),
                is_fixed: false,
                default_value: None,
            }],
        };
        let json = serde_json::to_string(&config).expect("serialize config");
        let round: MappingConfig = serde_json::from_str(&json).expect("deserialize config");
        assert_eq!(round.profile_name, "avian-survey");
        assert_eq!(round.mappings.len(), 1);
        assert_eq!(round.mappings[0].target_column, "Site.Locality");
    }

    #[test]
    fn fixed_flag_defaults_to_false_on_deserialize() {
        let json = r#"{"source_column":"Loc","target_column":"Site.Locality"}"#;
        let mapping: FieldMapping = serde_json::from_str(json).expect("deserialize mapping");
        assert!(!mapping.is_fixed);
        assert_eq!(mapping.default_value, None);
    }

    #[test]
    fn run_fatal_errors_are_flagged() {
        let err = ImportError::RankLadderLoad {
            reason: "service unavailable".to_string(),
        };
        assert!(err.is_run_fatal());
        assert!(!ImportError::NoMappedCategories.is_run_fatal());
    }
}
