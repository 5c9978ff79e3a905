use biorec_import::{CancelToken, Importer, MemoryStore, NullLogger, NullProgress, ProgressSink};
use biorec_ingest::CsvRowSource;
use biorec_model::FieldMapping;
use biorec_transform::StandardFieldValidator;

fn mapping(source: &str, target: &str) -> FieldMapping {
    FieldMapping {
        source_column: source.to_string(),
        target_column: target.to_string(),
        is_fixed: false,
        default_value: None,
    }
}

fn fixed(target: &str, value: &str) -> FieldMapping {
    FieldMapping {
        source_column: String::new(),
        target_column: target.to_string(),
        is_fixed: true,
        default_value: Some(value.to_string()),
    }
}

fn source(columns: &[&str], rows: &[&[&str]]) -> CsvRowSource {
    CsvRowSource::from_rows(
        columns.iter().map(|c| c.to_string()).collect(),
        rows.iter()
            .map(|row| row.iter().map(|v| v.to_string()).collect())
            .collect(),
    )
}

#[test]
fn adjacent_duplicate_rows_share_one_site() {
    let mappings = vec![fixed("Region.Region", "Australia"), mapping("Loc", "Site.Locality")];
    let mut rows = source(
        &["Loc"],
        &[&["Creek A"], &["Creek A"], &["Creek B"]],
    );
    let mut store = MemoryStore::new();
    let validator = StandardFieldValidator::new();
    let importer = Importer::new(&mappings, &validator);

    let summary = importer
        .run(&mut rows, &mut store, &mut NullProgress, &mut NullLogger)
        .expect("run");

    assert_eq!(summary.successes, 3);
    assert_eq!(summary.errors, 0);

    // One region for the whole run, one site shared by the first two rows.
    assert_eq!(store.regions.len(), 1);
    assert_eq!(store.regions[0].name, "Australia");
    assert_eq!(store.sites.len(), 2);
    assert_eq!(store.sites[0].1.locality, "Creek A");
    assert_eq!(store.sites[1].1.locality, "Creek B");
    assert_eq!(store.sites[0].1.political_region, store.regions[0].id);
}

#[test]
fn a_failed_row_rolls_back_and_the_run_continues() {
    let mappings = vec![
        fixed("Region.Region", "Australia"),
        mapping("Loc", "Site.Locality"),
        mapping("Coll", "SiteVisit.Collector(s)"),
        mapping("Start", "SiteVisit.Start Date"),
        mapping("End", "SiteVisit.End Date"),
    ];
    let mut rows = source(
        &["Loc", "Coll", "Start", "End"],
        &[
            &["Creek A", "Firth", "19990304", "19990306"],
            &["Creek B", "Firth", "19990401", "next week"],
            &["Creek C", "Firth", "19990501", "19990502"],
        ],
    );
    let mut store = MemoryStore::new();
    let validator = StandardFieldValidator::new();
    let importer = Importer::new(&mappings, &validator);

    let summary = importer
        .run(&mut rows, &mut store, &mut NullProgress, &mut NullLogger)
        .expect("run");

    assert_eq!(summary.successes, 2);
    assert_eq!(summary.errors, 1);

    // Row 2 created its site before the end date failed; the rollback
    // removed it again.
    let localities: Vec<&str> = store.sites.iter().map(|(_, s)| s.locality.as_str()).collect();
    assert_eq!(localities, vec!["Creek A", "Creek C"]);
    assert_eq!(store.site_visits.len(), 2);

    assert_eq!(rows.error_rows().len(), 1);
    assert_eq!(rows.error_rows()[0].values[0], "Creek B");
    assert!(rows.error_rows()[0].message.contains("end date"));
}

#[test]
fn out_of_range_coordinates_reject_the_row() {
    let mappings = vec![
        mapping("Loc", "Site.Locality"),
        mapping("X", "Site.Longitude"),
        mapping("Y", "Site.Latitude"),
    ];
    let mut rows = source(&["Loc", "X", "Y"], &[&["Creek A", "524593", "5252353"]]);
    let mut store = MemoryStore::new();
    let validator = StandardFieldValidator::new();
    let importer = Importer::new(&mappings, &validator);

    let summary = importer
        .run(&mut rows, &mut store, &mut NullProgress, &mut NullLogger)
        .expect("run");

    assert_eq!(summary.successes, 0);
    assert_eq!(summary.errors, 1);
    assert!(store.sites.is_empty());
    assert!(
        rows.error_rows()[0]
            .message
            .contains("outside the latitude/longitude range")
    );
}

#[test]
fn full_ladder_taxa_are_reused_across_non_adjacent_rows() {
    let mappings = vec![
        mapping("Reg", "Material.Registration number"),
        mapping("K", "Taxon.Kingdom"),
        mapping("G", "Taxon.Genus"),
        mapping("S", "Taxon.Species"),
        mapping("Au", "Taxon.Author"),
        mapping("CN", "Taxon.Common Name"),
    ];
    let mut rows = source(
        &["Reg", "K", "G", "S", "Au", "CN"],
        &[
            &["K1", "Animalia", "Macropus", "rufus", "Desmarest", "Red Kangaroo"],
            &["K2", "Animalia", "Macropus", "giganteus", "Shaw", ""],
            &["K3", "Animalia", "Macropus", "rufus", "Desmarest", ""],
        ],
    );
    let mut store = MemoryStore::new();
    let validator = StandardFieldValidator::new();
    let importer = Importer::new(&mappings, &validator);

    let summary = importer
        .run(&mut rows, &mut store, &mut NullProgress, &mut NullLogger)
        .expect("run");

    assert_eq!(summary.successes, 3);

    // Rows 1 and 2 each walk the ladder; row 3 matches row 1's full ladder
    // and creates nothing new.
    assert_eq!(store.taxa.len(), 6);
    assert_eq!(store.materials.len(), 3);
    assert_eq!(store.materials[0].1.taxon, store.materials[2].1.taxon);
    assert_ne!(store.materials[0].1.taxon, store.materials[1].1.taxon);

    // Authority lands on the species, not the ranks above it.
    let rufus = &store.taxa[2].1;
    assert_eq!(rufus.epithet, "rufus");
    assert_eq!(rufus.author, "Desmarest");
    assert_eq!(store.taxa[1].1.author, "");

    // All rows share the blank locality chain.
    assert_eq!(store.regions.len(), 1);
    assert_eq!(store.regions[0].name, "[Imported Data]");
    assert_eq!(store.sites.len(), 1);
    assert_eq!(store.site_visits.len(), 1);

    // Material names fall back to the registration numbers.
    assert_eq!(store.materials[0].1.name, "K1");
    assert_eq!(store.material_parts.len(), 3);

    assert_eq!(store.common_names.len(), 1);
    assert_eq!(store.common_names[0].1, "Red Kangaroo");
}

#[test]
fn blank_rank_values_leave_material_without_a_taxon() {
    let mappings = vec![
        mapping("Name", "Material.Material name"),
        mapping("Sp", "Taxon.Species"),
        mapping("CN", "Taxon.Common Name"),
    ];
    let mut rows = source(&["Name", "Sp", "CN"], &[&["spec-1", "", "Mystery"]]);
    let mut store = MemoryStore::new();
    let validator = StandardFieldValidator::new();
    let importer = Importer::new(&mappings, &validator);

    let summary = importer
        .run(&mut rows, &mut store, &mut NullProgress, &mut NullLogger)
        .expect("run");

    assert_eq!(summary.successes, 1);
    assert!(store.taxa.is_empty());
    // No taxon, so the mapped common name has nothing to attach to.
    assert!(store.common_names.is_empty());
    assert_eq!(store.materials.len(), 1);
    assert_eq!(store.materials[0].1.taxon, None);
    assert_eq!(store.materials[0].1.name, "spec-1");
}

#[test]
fn other_columns_become_traits_named_after_their_source() {
    let mappings = vec![
        mapping("Loc", "Site.Locality"),
        mapping("Soil type", "Site.Other"),
        mapping("Vegetation", "Site.Other"),
    ];
    let mut rows = source(
        &["Loc", "Soil type", "Vegetation"],
        &[&["Creek A", "clay", ""]],
    );
    let mut store = MemoryStore::new();
    let validator = StandardFieldValidator::new();
    let importer = Importer::new(&mappings, &validator);

    let summary = importer
        .run(&mut rows, &mut store, &mut NullProgress, &mut NullLogger)
        .expect("run");

    assert_eq!(summary.successes, 1);
    // The blank vegetation cell is skipped.
    assert_eq!(store.traits.len(), 1);
    assert_eq!(store.traits[0].category, "Site");
    assert_eq!(store.traits[0].name, "Soil type");
    assert_eq!(store.traits[0].value, "clay");
    assert_eq!(store.traits[0].entity_id, store.sites[0].0.value());
}

struct CancelAfterRows {
    cancel: CancelToken,
    seen: usize,
    limit: usize,
}

impl ProgressSink for CancelAfterRows {
    fn start(&mut self, _label: &str) {}

    fn message(&mut self, label: &str, _percent: Option<i32>) {
        if label.starts_with("Importing rows - Stage 2 (") {
            self.seen += 1;
            if self.seen == self.limit {
                self.cancel.cancel();
            }
        }
    }

    fn end(&mut self, _label: &str) {}
}

#[test]
fn cancellation_stops_after_the_row_in_flight() {
    let mappings = vec![mapping("Loc", "Site.Locality")];
    let mut rows = source(
        &["Loc"],
        &[&["A"], &["B"], &["C"], &["D"], &["E"]],
    );
    let mut store = MemoryStore::new();
    let validator = StandardFieldValidator::new();
    let importer = Importer::new(&mappings, &validator);
    let mut progress = CancelAfterRows {
        cancel: importer.cancel_token(),
        seen: 0,
        limit: 2,
    };

    let summary = importer
        .run(&mut rows, &mut store, &mut progress, &mut NullLogger)
        .expect("run");

    // The token fired while row 2 was being reported; that row still
    // completed, the remaining three were never touched.
    assert_eq!(summary.rows_processed(), 2);
    assert_eq!(summary.successes, 2);
    assert_eq!(store.sites.len(), 2);
}
