//! The row loop: one transaction per row, error routing, progress phases and
//! cooperative cancellation.

use biorec_ingest::RowSource;
use biorec_map::{FieldResolver, MappingIndex};
use biorec_model::{FieldMapping, ImportError, ImportLevel, Result};
use biorec_transform::{FieldValidator, ValueReader};
use tracing::debug;

use crate::level::classify_level;
use crate::progress::{CancelToken, ImportLogger, LogLevel, ProgressSink};
use crate::resolver::{
    HierarchicalResolver, add_material, add_material_part, insert_common_name, insert_traits,
};
use crate::store::ImportStore;

/// Aggregate counts for a completed or cancelled run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportSummary {
    pub successes: usize,
    pub errors: usize,
}

impl ImportSummary {
    /// Rows examined: committed plus rejected.
    pub fn rows_processed(&self) -> usize {
        self.successes + self.errors
    }
}

/// Drives an import run: classifies the mapping profile once, then walks the
/// staged rows one transaction at a time.
///
/// A bad row is rolled back, routed to the error sink and counted; the run
/// always continues to the next row. Only initialisation failures propagate.
pub struct Importer<'a> {
    mappings: &'a [FieldMapping],
    validator: &'a dyn FieldValidator,
    cancel: CancelToken,
}

impl<'a> Importer<'a> {
    pub fn new(mappings: &'a [FieldMapping], validator: &'a dyn FieldValidator) -> Self {
        Self {
            mappings,
            validator,
            cancel: CancelToken::new(),
        }
    }

    /// Shares `cancel` with whatever may request cancellation mid-run.
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// A token that cancels this run when triggered.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Runs the import over `source` to completion or cancellation.
    ///
    /// Cancellation is polled at row boundaries; the row in flight when the
    /// token fires still commits or rolls back before the loop exits.
    pub fn run(
        &self,
        source: &mut dyn RowSource,
        store: &mut dyn ImportStore,
        progress: &mut dyn ProgressSink,
        logger: &mut dyn ImportLogger,
    ) -> Result<ImportSummary> {
        progress.start("Initialising...");
        logger.log(LogLevel::Info, "Caching rank data...");
        let ranks = store
            .ordered_ranks()
            .map_err(|err| ImportError::RankLadderLoad {
                reason: err.to_string(),
            })?;
        logger.log(LogLevel::Info, "Initialisation complete");

        progress.message("Importing rows - Stage 1", Some(0));
        logger.log(LogLevel::Info, "Stage 1 - Preprocessing rows...");
        let row_count = source.row_count();
        logger.log(
            LogLevel::Info,
            &format!("Stage 1 Complete, {row_count} rows staged for import."),
        );

        logger.log(LogLevel::Info, "Caching column mappings...");
        let columns: Vec<String> = (0..source.column_count())
            .map(|i| source.column_name(i).unwrap_or_default().to_string())
            .collect();
        let index = MappingIndex::build(self.mappings, &columns);
        let classified = classify_level(self.mappings);
        if let Ok(level) = &classified {
            debug!(%level, "mapping profile classified");
        }

        let mut resolver = HierarchicalResolver::new(ranks);
        let mut summary = ImportSummary::default();

        progress.message("Importing rows - Stage 2", Some(10));
        let mut row_number = 0usize;
        let mut last_percent = 0;

        while source.move_next() && !self.cancel.is_cancelled() {
            row_number += 1;
            let percent = ((row_number as f64 / row_count as f64) * 90.0) as i32 + 10;
            if percent != last_percent {
                progress.message(
                    &format!("Importing rows - Stage 2 ({row_number} of {row_count})"),
                    Some(percent),
                );
                last_percent = percent;
            }

            let committed = {
                let field_resolver = FieldResolver::new(&index, &*source);
                let reader = ValueReader::new(&field_resolver, self.validator);
                run_row_transaction(&reader, store, &mut resolver, &classified)
            };

            match committed {
                Ok(()) => summary.successes += 1,
                Err(err) => {
                    logger.log(
                        LogLevel::Error,
                        &format!("Error on Row {row_number}: {err}"),
                    );
                    if let Err(rollback_err) = store.rollback_transaction() {
                        logger.log(
                            LogLevel::Error,
                            &format!("Rollback failed on Row {row_number}: {rollback_err}"),
                        );
                    }
                    source.route_current_to_errors(&err.to_string());
                    summary.errors += 1;
                }
            }
        }

        progress.message("Importing rows - Stage 2 Complete", Some(100));
        logger.log(
            LogLevel::Info,
            &format!(
                "{} Rows successfully imported, {} rows failed with errors",
                summary.successes, summary.errors
            ),
        );
        progress.end("Importing rows - Stage 2 Complete");

        Ok(summary)
    }
}

/// One row, one transaction: begin, resolve every level the classification
/// calls for, commit. Any error leaves the transaction open for the caller
/// to roll back.
fn run_row_transaction(
    reader: &ValueReader<'_>,
    store: &mut dyn ImportStore,
    resolver: &mut HierarchicalResolver,
    classified: &Result<ImportLevel>,
) -> Result<()> {
    store.begin_transaction()?;
    let level = match classified {
        Ok(level) => *level,
        Err(_) => return Err(ImportError::NoMappedCategories),
    };
    resolve_levels(reader, store, resolver, level)?;
    store.commit_transaction()
}

/// Resolves and persists the current row down to `level`, attaching traits
/// and common names as each identity becomes known.
fn resolve_levels(
    reader: &ValueReader<'_>,
    store: &mut dyn ImportStore,
    resolver: &mut HierarchicalResolver,
    level: ImportLevel,
) -> Result<()> {
    match level {
        ImportLevel::Region => {
            resolver.resolve_region(reader, store)?;
        }
        ImportLevel::Site => {
            let region = resolver.resolve_region(reader, store)?;
            let site = resolver.resolve_site(reader, store, region)?;
            insert_traits(reader, store, "Site", site.value())?;
        }
        ImportLevel::Visit => {
            let region = resolver.resolve_region(reader, store)?;
            let site = resolver.resolve_site(reader, store, region)?;
            insert_traits(reader, store, "Site", site.value())?;
            let visit = resolver.resolve_site_visit(reader, store, site)?;
            insert_traits(reader, store, "SiteVisit", visit.value())?;
        }
        ImportLevel::MaterialWithTaxa => {
            let region = resolver.resolve_region(reader, store)?;
            let site = resolver.resolve_site(reader, store, region)?;
            insert_traits(reader, store, "Site", site.value())?;
            let visit = resolver.resolve_site_visit(reader, store, site)?;
            insert_traits(reader, store, "SiteVisit", visit.value())?;
            let taxon = resolver.resolve_taxon(reader, store)?;
            if let Some(taxon) = taxon {
                insert_traits(reader, store, "Taxon", taxon.value())?;
                insert_common_name(reader, store, taxon)?;
            }
            let material = add_material(reader, store, visit, taxon)?;
            insert_traits(reader, store, "Material", material.value())?;
            add_material_part(reader, store, material)?;
        }
        ImportLevel::MaterialWithoutTaxa => {
            let region = resolver.resolve_region(reader, store)?;
            let site = resolver.resolve_site(reader, store, region)?;
            insert_traits(reader, store, "Site", site.value())?;
            let visit = resolver.resolve_site_visit(reader, store, site)?;
            insert_traits(reader, store, "SiteVisit", visit.value())?;
            let material = add_material(reader, store, visit, None)?;
            insert_traits(reader, store, "Material", material.value())?;
            add_material_part(reader, store, material)?;
        }
        ImportLevel::TaxaOnly => {
            if let Some(taxon) = resolver.resolve_taxon(reader, store)? {
                insert_common_name(reader, store, taxon)?;
                insert_traits(reader, store, "Taxon", taxon.value())?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use biorec_ingest::CsvRowSource;
    use biorec_transform::StandardFieldValidator;

    use crate::progress::{NullLogger, NullProgress};
    use crate::store::MemoryStore;

    use super::*;

    #[test]
    fn unmapped_profiles_fail_every_row_without_aborting() {
        let mappings = vec![FieldMapping {
            source_column: "col".to_string(),
            target_column: "Unassigned".to_string(),
            is_fixed: false,
            default_value: None,
        }];
        let mut source = CsvRowSource::from_rows(
            vec!["col".to_string()],
            vec![vec!["a".to_string()], vec!["b".to_string()]],
        );
        let mut store = MemoryStore::new();
        let validator = StandardFieldValidator::new();
        let importer = Importer::new(&mappings, &validator);

        let summary = importer
            .run(
                &mut source,
                &mut store,
                &mut NullProgress,
                &mut NullLogger,
            )
            .unwrap();
        assert_eq!(summary.successes, 0);
        assert_eq!(summary.errors, 2);
        assert_eq!(source.error_rows().len(), 2);
        assert!(
            source.error_rows()[0]
                .message
                .contains("no recognisable mapped data")
        );
    }

    #[test]
    fn summaries_add_both_outcomes() {
        let summary = ImportSummary {
            successes: 3,
            errors: 2,
        };
        assert_eq!(summary.rows_processed(), 5);
    }
}
