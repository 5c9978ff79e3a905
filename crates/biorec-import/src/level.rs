//! Classifies a mapping profile into an import level.

use biorec_model::{FieldMapping, ImportError, ImportLevel, Result};

/// Decides how deep into the record hierarchy each row of this run reaches,
/// from which categories the mapping profile targets.
///
/// Material outranks everything; taxon fields combined with any locality
/// category still drive the full material chain. With neither material nor
/// taxa mapped, the deepest locality category wins.
pub fn classify_level(mappings: &[FieldMapping]) -> Result<ImportLevel> {
    let mut region = false;
    let mut site = false;
    let mut visit = false;
    let mut material = false;
    let mut taxa = false;

    for mapping in mappings {
        match mapping.category() {
            Some("Region") => region = true,
            Some("Site") => site = true,
            Some("SiteVisit") => visit = true,
            Some("Material") => material = true,
            Some("Taxon") => taxa = true,
            _ => {}
        }
    }

    if !(region || site || visit || material || taxa) {
        return Err(ImportError::NoMappedCategories);
    }

    if material {
        return Ok(if taxa {
            ImportLevel::MaterialWithTaxa
        } else {
            ImportLevel::MaterialWithoutTaxa
        });
    }

    if taxa {
        return Ok(if region || site || visit {
            ImportLevel::MaterialWithTaxa
        } else {
            ImportLevel::TaxaOnly
        });
    }

    Ok(if visit {
        ImportLevel::Visit
    } else if site {
        ImportLevel::Site
    } else {
        ImportLevel::Region
    })
}
