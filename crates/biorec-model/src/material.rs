use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::MaterialId;
use crate::SiteVisitId;
use crate::TaxonId;

/// A collected specimen, attached to a site visit and optionally determined
/// to a taxon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    pub site_visit: SiteVisitId,
    pub taxon: Option<TaxonId>,
    pub accession_number: String,
    pub registration_number: String,
    pub collector_number: String,
    pub identified_by: String,
    pub identified_on: Option<NaiveDate>,
    pub identification_reference: Option<i32>,
    pub identification_ref_page: String,
    pub identification_method: String,
    pub identification_accuracy: String,
    pub identification_name_qualification: String,
    pub identification_notes: String,
    pub institution: String,
    pub collection_method: String,
    pub abundance: String,
    pub macro_habitat: String,
    pub micro_habitat: String,
    pub source: String,
    pub special_label: String,
    pub original_label: String,
}

/// A physical sub-part or sample of a specimen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialPart {
    pub material: MaterialId,
    pub part_name: String,
    pub sample_type: String,
    pub specimen_count: i32,
    pub specimen_count_qualifier: String,
    pub life_stage: String,
    pub gender: String,
    pub registration_number: String,
    pub condition: String,
    pub storage_site: String,
    pub storage_method: String,
    pub curation_status: String,
    pub notes: String,
}
