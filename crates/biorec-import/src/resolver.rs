//! Hierarchical entity resolution: region chain, site, visit, taxon ladder,
//! material and part, plus traits and common names.
//!
//! Consecutive rows usually repeat the same place and collecting event, so
//! the last resolved region, site and visit are cached against their full
//! attribute tuples. Taxa are cached for the whole run, keyed by the value
//! of every rank in the ladder.

use std::collections::BTreeMap;

use biorec_model::{
    DateType, ImportError, Material, MaterialId, MaterialPart, MaterialPartId, RankLadder,
    RegionId, RegionRank, Result, Site, SiteId, SiteVisit, SiteVisitId, TaxonId, TaxonInsert,
    TaxonRankValue,
};
use biorec_transform::normalization::{
    compact_date_to_calendar, compact_date_to_string, date_text_to_compact, parse_compact_date,
};
use biorec_transform::{ValueReader, resolve_elevation, resolve_position};
use chrono::NaiveDate;
use tracing::debug;

use crate::store::ImportStore;

/// Root region for rows that map no political region of their own.
const IMPORT_ROOT_REGION: &str = "[Imported Data]";

#[derive(Debug, Clone, PartialEq)]
struct RegionKey {
    political: String,
    country: String,
    state: String,
    county: String,
}

#[derive(Debug, Clone, PartialEq)]
struct SiteKey {
    name: String,
    locality: String,
    distance: String,
    direction: String,
    informal: String,
    coordinate_type: biorec_model::CoordinateType,
    x1: Option<f64>,
    y1: Option<f64>,
    x2: Option<f64>,
    y2: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
struct VisitKey {
    site: SiteId,
    name: String,
    collector: String,
    start_date: Option<i32>,
    end_date: Option<i32>,
    start_time: Option<i32>,
    end_time: Option<i32>,
    field_number: String,
    casual_date: String,
}

#[derive(Debug)]
struct Cached<K, I> {
    key: K,
    id: I,
}

/// Resolves the entity chain for each row, reusing identities where a row
/// repeats what came immediately before (regions, sites, visits) or anywhere
/// earlier in the run (taxa).
pub struct HierarchicalResolver {
    ranks: RankLadder,
    last_region: Option<Cached<RegionKey, RegionId>>,
    last_site: Option<Cached<SiteKey, SiteId>>,
    last_visit: Option<Cached<VisitKey, SiteVisitId>>,
    taxon_cache: BTreeMap<Vec<TaxonRankValue>, TaxonId>,
}

impl HierarchicalResolver {
    pub fn new(ranks: RankLadder) -> Self {
        Self {
            ranks,
            last_region: None,
            last_site: None,
            last_visit: None,
            taxon_cache: BTreeMap::new(),
        }
    }

    /// Resolves the political-region chain for the current row.
    ///
    /// A blank or unmapped region falls back to a fixed import root so every
    /// site gets a parent. Country, state and county each chain under the
    /// previous level when supplied.
    pub fn resolve_region(
        &mut self,
        reader: &ValueReader<'_>,
        store: &mut dyn ImportStore,
    ) -> Result<RegionId> {
        let resolver = reader.resolver();
        let mut political = resolver.get_or("Region.Region", IMPORT_ROOT_REGION);
        if political.trim().is_empty() {
            political = IMPORT_ROOT_REGION.to_string();
        }
        let key = RegionKey {
            political,
            country: resolver.get("Region.Country"),
            state: resolver.get("Region.State/Province"),
            county: resolver.get("Region.County"),
        };

        if let Some(cached) = &self.last_region
            && cached.key == key
        {
            return Ok(cached.id);
        }

        let mut id = store.import_region(&key.political, None, RegionRank::Region)?;
        if !key.country.trim().is_empty() {
            id = store.import_region(&key.country, Some(id), RegionRank::Country)?;
        }
        if !key.state.trim().is_empty() {
            id = store.import_region(&key.state, Some(id), RegionRank::StateProvince)?;
        }
        if !key.county.trim().is_empty() {
            id = store.import_region(&key.county, Some(id), RegionRank::County)?;
        }

        self.last_region = Some(Cached { key, id });
        Ok(id)
    }

    /// Resolves the site for the current row, creating one under `region`
    /// unless the row repeats the previous site's identifying fields.
    ///
    /// The cache key covers name, locality, offsets and coordinates but not
    /// the region: a row that changes only its region fields still reuses
    /// the previous site.
    pub fn resolve_site(
        &mut self,
        reader: &ValueReader<'_>,
        store: &mut dyn ImportStore,
        region: RegionId,
    ) -> Result<SiteId> {
        let resolver = reader.resolver();
        let position = resolve_position(reader)?;
        let elevation = resolve_elevation(reader)?;

        let locality = resolver.get("Site.Locality");
        let mut name = resolver.get("Site.Site Name");
        if name.trim().is_empty() {
            name = locality.clone();
        }

        let key = SiteKey {
            name,
            locality,
            distance: resolver.get("Site.Distance from place"),
            direction: resolver.get("Site.Direction from place"),
            informal: resolver.get("Site.Informal locality"),
            coordinate_type: position.coordinate_type,
            x1: position.x1,
            y1: position.y1,
            x2: position.x2,
            y2: position.y2,
        };

        if let Some(cached) = &self.last_site
            && cached.key == key
        {
            return Ok(cached.id);
        }

        let site = Site {
            name: key.name.clone(),
            political_region: region,
            locality_type: 0,
            locality: key.locality.clone(),
            distance_from_place: key.distance.clone(),
            direction_from_place: key.direction.clone(),
            informal_locality: key.informal.clone(),
            coordinate_type: position.coordinate_type,
            position_area_type: position.position_area_type,
            x1: position.x1,
            y1: position.y1,
            x2: position.x2,
            y2: position.y2,
            xy_display_format: 1,
            position_source: resolver.get("Site.Position source"),
            position_error: resolver.get("Site.Position error"),
            generated_by: resolver.get("Site.Generated by"),
            generated_on: resolver.get("Site.Generated on"),
            original_position: resolver.get("Site.Original position"),
            utm_source: resolver.get("Site.UTM source"),
            utm_map_projection: resolver.get("Site.UTM map projection"),
            utm_map_name: resolver.get("Site.UTM map name"),
            utm_map_version: resolver.get("Site.UTM map version"),
            elevation_type: elevation.elevation_type,
            elevation_upper: elevation.upper,
            elevation_lower: elevation.lower,
            elevation_depth: elevation.depth,
            elevation_units: elevation.units,
            elevation_source: resolver.get("Site.Elevation source"),
            elevation_error: resolver.get("Site.Elevation error"),
            geo_era: resolver.get("Site.Geological era"),
            geo_state: resolver.get("Site.Geological state"),
            geo_plate: resolver.get("Site.Geological plate"),
            geo_formation: resolver.get("Site.Geological formation"),
            geo_member: resolver.get("Site.Geological member"),
            geo_bed: resolver.get("Site.Geological bed"),
            geo_name: resolver.get("Site.Geological name"),
            geo_age_bottom: resolver.get("Site.Geological age bottom"),
            geo_age_top: resolver.get("Site.Geological age top"),
            geo_notes: resolver.get("Site.Geological notes"),
        };

        let id = store.import_site(&site)?;
        self.last_site = Some(Cached { key, id });
        Ok(id)
    }

    /// Resolves the site visit for the current row under `site`.
    ///
    /// A start date in compact form fixes the date type; otherwise the visit
    /// is casually dated and free-text dates pass through verbatim. An end
    /// date that is not compact is an error when the start date was fixed,
    /// and casual text otherwise.
    pub fn resolve_site_visit(
        &mut self,
        reader: &ValueReader<'_>,
        store: &mut dyn ImportStore,
        site: SiteId,
    ) -> Result<SiteVisitId> {
        let resolver = reader.resolver();
        let collector = resolver.get("SiteVisit.Collector(s)");
        let mut casual_date = resolver.get("SiteVisit.Casual time");

        let start_date = reader.get_compact_date("SiteVisit.Start Date", None, false)?;
        let date_type = if start_date.is_some() {
            casual_date = resolver.get_or("SiteVisit.Start Date", &casual_date);
            DateType::Fixed
        } else {
            DateType::Casual
        };

        let end_date = reader.get_compact_date("SiteVisit.End Date", None, false)?;
        if end_date.is_none() {
            let raw_end = resolver.get("SiteVisit.End Date");
            if !raw_end.trim().is_empty() {
                if date_type == DateType::Fixed {
                    return Err(ImportError::MixedDateFormats { value: raw_end });
                }
                if casual_date.trim().is_empty() {
                    casual_date = raw_end;
                }
            }
        }

        let start_time = reader.get_i32("SiteVisit.Start Time", None, true)?;
        let end_time = reader.get_i32("SiteVisit.End Time", None, true)?;
        let field_number = resolver.get("SiteVisit.Field number");

        let mut name = resolver.get("SiteVisit.Visit Name");
        if name.trim().is_empty() {
            name = match (start_date, end_date) {
                (Some(start), _) if start > 0 => match date_type {
                    DateType::Fixed => format!("{collector}, {}", compact_date_to_string(start)),
                    DateType::Casual => format!("{collector}, {casual_date}"),
                },
                (_, Some(end)) if end > 0 => match date_type {
                    DateType::Fixed => format!("{collector}, {}", compact_date_to_string(end)),
                    DateType::Casual => format!("{collector}, {casual_date}"),
                },
                _ => collector.clone(),
            };
        }

        let key = VisitKey {
            site,
            name,
            collector,
            start_date,
            end_date,
            start_time,
            end_time,
            field_number,
            casual_date,
        };

        if let Some(cached) = &self.last_visit
            && cached.key == key
        {
            return Ok(cached.id);
        }

        let visit = SiteVisit {
            site,
            name: key.name.clone(),
            field_number: key.field_number.clone(),
            collector: key.collector.clone(),
            date_type,
            start_date,
            end_date,
            start_time,
            end_time,
            casual_date: key.casual_date.clone(),
        };

        let id = store.import_site_visit(&visit)?;
        self.last_visit = Some(Cached { key, id });
        Ok(id)
    }

    /// Resolves the taxon for the current row, or `None` when no rank field
    /// carries a value.
    ///
    /// The cache key is the value of every rank in the ladder, so rows naming
    /// the same species under different higher ranks stay distinct. On a miss
    /// the ladder is walked outermost-first, creating each populated rank
    /// under the previous one. Authority metadata attaches only at the
    /// deepest populated rank; a populated kingdom restarts the parent chain.
    pub fn resolve_taxon(
        &mut self,
        reader: &ValueReader<'_>,
        store: &mut dyn ImportStore,
    ) -> Result<Option<TaxonId>> {
        let ladder: Vec<TaxonRankValue> = self
            .ranks
            .iter()
            .map(|rank| {
                TaxonRankValue::new(
                    rank.long_name.clone(),
                    reader.resolver().get(&format!("Taxon.{}", rank.long_name)),
                )
            })
            .collect();

        let Some(deepest) = ladder
            .iter()
            .rposition(|rank| !rank.value.trim().is_empty())
        else {
            return Ok(None);
        };

        if let Some(id) = self.taxon_cache.get(&ladder) {
            debug!(taxon = id.value(), "taxon ladder served from cache");
            return Ok(Some(*id));
        }

        let mut parent: Option<TaxonId> = None;
        for (position, rank) in self.ranks.iter().enumerate() {
            let epithet = ladder[position].value.trim();
            if epithet.is_empty() {
                continue;
            }
            if rank.long_name == "Kingdom" {
                parent = None;
            }

            let insert = if position == deepest {
                let verified = reader.get_bool("Taxon.Verified", false, true)?;
                TaxonInsert {
                    parent,
                    epithet: epithet.to_string(),
                    author: reader.resolver().get("Taxon.Author"),
                    year: reader.resolver().get("Taxon.Year"),
                    changed_combination: reader.get_bool(
                        "Taxon.Changed Combination",
                        false,
                        true,
                    )?,
                    rank_code: rank.code.clone(),
                    kingdom_type: reader.resolver().get("Taxon.KingdomType"),
                    unverified: !verified,
                    name_status: reader.resolver().get("Taxon.Name Status"),
                }
            } else {
                TaxonInsert {
                    parent,
                    epithet: epithet.to_string(),
                    author: String::new(),
                    year: String::new(),
                    changed_combination: false,
                    rank_code: rank.code.clone(),
                    kingdom_type: String::new(),
                    unverified: false,
                    name_status: String::new(),
                }
            };

            parent = Some(store.import_taxon(&insert)?);
        }

        let Some(id) = parent else {
            return Ok(None);
        };
        self.taxon_cache.insert(ladder, id);
        Ok(Some(id))
    }
}

/// Inserts the row's non-empty trait values for `category` against
/// `entity_id`, named after their source columns.
pub fn insert_traits(
    reader: &ValueReader<'_>,
    store: &mut dyn ImportStore,
    category: &str,
    entity_id: i64,
) -> Result<()> {
    for (name, value) in reader.resolver().trait_values(category) {
        store.import_trait(category, entity_id, &name, &value)?;
    }
    Ok(())
}

/// Attaches the row's common name to `taxon`, when one is mapped.
pub fn insert_common_name(
    reader: &ValueReader<'_>,
    store: &mut dyn ImportStore,
    taxon: TaxonId,
) -> Result<()> {
    let name = reader.resolver().get("Taxon.Common Name");
    if !name.trim().is_empty() {
        store.import_common_name(taxon, &name)?;
    }
    Ok(())
}

/// Builds and persists the material record for the current row.
///
/// A blank material name falls back to institution-qualified accession or
/// registration numbers. With `Material.Create Label` set, the original
/// label is synthesised from locality, collectors and start date instead of
/// read from the row.
pub fn add_material(
    reader: &ValueReader<'_>,
    store: &mut dyn ImportStore,
    visit: SiteVisitId,
    taxon: Option<TaxonId>,
) -> Result<MaterialId> {
    let resolver = reader.resolver();

    let accession_number = resolver.get("Material.Accession number");
    let registration_number = resolver.get("Material.Registration number");
    let institution = resolver.get("Material.Institute");

    let mut name = resolver.get("Material.Material name");
    if name.trim().is_empty() {
        name = if !institution.trim().is_empty() && !accession_number.trim().is_empty() {
            format!("{institution}:{accession_number}")
        } else if !institution.trim().is_empty() && !registration_number.trim().is_empty() {
            format!("{institution}:{registration_number}")
        } else if !accession_number.trim().is_empty() {
            accession_number.clone()
        } else {
            registration_number.clone()
        };
    }

    let original_label = if reader.get_bool("Material.Create Label", false, true)? {
        let mut date_text = resolver.get_or("SiteVisit.Start Date", "0");
        if date_text != "0"
            && let Ok(compact) = parse_compact_date(&date_text)
        {
            date_text = compact_date_to_string(compact);
        }
        format!(
            "Import derived: {}; {}; {}",
            resolver.get("Site.Locality"),
            resolver.get("SiteVisit.Collector(s)"),
            date_text
        )
    } else {
        resolver.get("Material.Original label")
    };

    let material = Material {
        name,
        site_visit: visit,
        taxon,
        accession_number,
        registration_number,
        collector_number: resolver.get("Material.Collector number"),
        identified_by: resolver.get("Material.Identified by"),
        identified_on: parse_identified_on(reader)?,
        identification_reference: reader.get_i32(
            "Material.Identification reference",
            None,
            false,
        )?,
        identification_ref_page: resolver.get("Material.Identification reference page"),
        identification_method: resolver.get("Material.Identification method"),
        identification_accuracy: resolver.get("Material.Identification accuracy"),
        identification_name_qualification: resolver.get("Material.Name qualifier"),
        identification_notes: resolver.get("Material.Identification notes"),
        institution,
        collection_method: resolver.get("Material.Collection method"),
        abundance: resolver.get("Material.Abundance"),
        macro_habitat: resolver.get("Material.Macrohabitat"),
        micro_habitat: resolver.get("Material.Microhabitat"),
        source: resolver.get("Material.Source"),
        special_label: resolver.get("Material.Special label"),
        original_label,
    };

    store.import_material(&material)
}

/// Builds and persists the specimen part record for the current row. An
/// absent or zero specimen count is stored as one.
pub fn add_material_part(
    reader: &ValueReader<'_>,
    store: &mut dyn ImportStore,
    material: MaterialId,
) -> Result<MaterialPartId> {
    let resolver = reader.resolver();
    let count = reader
        .get_i32("Material.Number of specimens", None, true)?
        .filter(|n| *n != 0)
        .unwrap_or(1);

    let part = MaterialPart {
        material,
        part_name: resolver.get("Material.Part name"),
        sample_type: resolver.get("Material.Sample type"),
        specimen_count: count,
        specimen_count_qualifier: resolver.get("Material.Number of specimens qualifier"),
        life_stage: resolver.get("Material.Life stage"),
        gender: resolver.get("Material.Gender"),
        registration_number: resolver.get("Material.Part registration number"),
        condition: resolver.get("Material.Condition"),
        storage_site: resolver.get("Material.Storage site"),
        storage_method: resolver.get("Material.Storage method"),
        curation_status: resolver.get("Material.Curation status"),
        notes: resolver.get("Material.Notes"),
    };

    store.insert_material_part(&part)
}

/// Reads `Material.Identified on` as a calendar date: compact digit dates
/// and natural date text are both accepted, with unknown components clamped.
fn parse_identified_on(reader: &ValueReader<'_>) -> Result<Option<NaiveDate>> {
    let raw = reader.resolver().get("Material.Identified on");
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let invalid = |reason: String| ImportError::InvalidDate {
        field: "Material.Identified on".to_string(),
        value: raw.clone(),
        reason,
    };

    let compact = if trimmed.chars().all(|c| c.is_ascii_digit()) {
        parse_compact_date(trimmed).map_err(&invalid)?
    } else {
        date_text_to_compact(trimmed)
            .ok_or_else(|| invalid("not a recognisable date".to_string()))?
    };

    compact_date_to_calendar(compact)
        .map(Some)
        .ok_or_else(|| invalid("not a calendar date".to_string()))
}
