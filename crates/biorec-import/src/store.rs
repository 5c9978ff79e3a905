//! The persistence seam for resolved entities, and an in-memory
//! implementation for tests and dry runs.

use biorec_model::{
    ImportError, Material, MaterialId, MaterialPart, MaterialPartId, RankLadder, RegionId,
    RegionRank, Result, Site, SiteId, SiteVisit, SiteVisitId, TaxonId, TaxonInsert,
};

/// Persists resolved entities inside per-row transactions.
///
/// One transaction is open at a time, scoped to exactly one row. Identities
/// returned by `import_*` calls are stable for the rest of the run; a host
/// database is free to find-or-create rather than blindly insert.
pub trait ImportStore {
    /// The taxonomic rank ladder this store resolves taxa against, outermost
    /// rank first.
    fn ordered_ranks(&self) -> Result<RankLadder>;

    fn begin_transaction(&mut self) -> Result<()>;
    fn commit_transaction(&mut self) -> Result<()>;
    fn rollback_transaction(&mut self) -> Result<()>;

    fn import_region(
        &mut self,
        name: &str,
        parent: Option<RegionId>,
        rank: RegionRank,
    ) -> Result<RegionId>;
    fn import_site(&mut self, site: &Site) -> Result<SiteId>;
    fn import_site_visit(&mut self, visit: &SiteVisit) -> Result<SiteVisitId>;
    fn import_taxon(&mut self, taxon: &TaxonInsert) -> Result<TaxonId>;
    fn import_common_name(&mut self, taxon: TaxonId, name: &str) -> Result<()>;
    fn import_trait(&mut self, category: &str, entity_id: i64, name: &str, value: &str)
    -> Result<()>;
    fn import_material(&mut self, material: &Material) -> Result<MaterialId>;
    fn insert_material_part(&mut self, part: &MaterialPart) -> Result<MaterialPartId>;
}

/// A region row as persisted by [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct StoredRegion {
    pub id: RegionId,
    pub name: String,
    pub parent: Option<RegionId>,
    pub rank: RegionRank,
}

/// A trait row as persisted by [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct StoredTrait {
    pub category: String,
    pub entity_id: i64,
    pub name: String,
    pub value: String,
}

/// Borrowed view of every [`MemoryStore`] table, for JSON export.
#[derive(Debug, serde::Serialize)]
struct StoreExport<'a> {
    regions: &'a [StoredRegion],
    sites: &'a [(SiteId, Site)],
    site_visits: &'a [(SiteVisitId, SiteVisit)],
    taxa: &'a [(TaxonId, TaxonInsert)],
    common_names: &'a [(TaxonId, String)],
    traits: &'a [StoredTrait],
    materials: &'a [(MaterialId, Material)],
    material_parts: &'a [(MaterialPartId, MaterialPart)],
}

#[derive(Debug, Clone, Copy)]
struct Snapshot {
    regions: usize,
    sites: usize,
    site_visits: usize,
    taxa: usize,
    common_names: usize,
    traits: usize,
    materials: usize,
    material_parts: usize,
    next_id: i64,
}

/// An append-only [`ImportStore`] held in memory.
///
/// Every `import_*` call appends; deduplication is a host-database concern.
/// Rollback truncates each table back to its length at `begin_transaction`.
#[derive(Debug)]
pub struct MemoryStore {
    ranks: RankLadder,
    pub regions: Vec<StoredRegion>,
    pub sites: Vec<(SiteId, Site)>,
    pub site_visits: Vec<(SiteVisitId, SiteVisit)>,
    pub taxa: Vec<(TaxonId, TaxonInsert)>,
    pub common_names: Vec<(TaxonId, String)>,
    pub traits: Vec<StoredTrait>,
    pub materials: Vec<(MaterialId, Material)>,
    pub material_parts: Vec<(MaterialPartId, MaterialPart)>,
    next_id: i64,
    open: Option<Snapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            ranks: RankLadder::standard(),
            regions: Vec::new(),
            sites: Vec::new(),
            site_visits: Vec::new(),
            taxa: Vec::new(),
            common_names: Vec::new(),
            traits: Vec::new(),
            materials: Vec::new(),
            material_parts: Vec::new(),
            next_id: 0,
            open: None,
        }
    }

    /// Replaces the standard rank ladder.
    pub fn with_ranks(mut self, ranks: RankLadder) -> Self {
        self.ranks = ranks;
        self
    }

    /// Serializes every table to pretty JSON. Entity rows appear as
    /// `[id, record]` pairs in insertion order.
    pub fn export_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&StoreExport {
            regions: &self.regions,
            sites: &self.sites,
            site_visits: &self.site_visits,
            taxa: &self.taxa,
            common_names: &self.common_names,
            traits: &self.traits,
            materials: &self.materials,
            material_parts: &self.material_parts,
        })
    }

    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            regions: self.regions.len(),
            sites: self.sites.len(),
            site_visits: self.site_visits.len(),
            taxa: self.taxa.len(),
            common_names: self.common_names.len(),
            traits: self.traits.len(),
            materials: self.materials.len(),
            material_parts: self.material_parts.len(),
            next_id: self.next_id,
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.regions.truncate(snapshot.regions);
        self.sites.truncate(snapshot.sites);
        self.site_visits.truncate(snapshot.site_visits);
        self.taxa.truncate(snapshot.taxa);
        self.common_names.truncate(snapshot.common_names);
        self.traits.truncate(snapshot.traits);
        self.materials.truncate(snapshot.materials);
        self.material_parts.truncate(snapshot.material_parts);
        self.next_id = snapshot.next_id;
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ImportStore for MemoryStore {
    fn ordered_ranks(&self) -> Result<RankLadder> {
        Ok(self.ranks.clone())
    }

    fn begin_transaction(&mut self) -> Result<()> {
        if self.open.is_some() {
            return Err(ImportError::Store {
                operation: "begin".to_string(),
                reason: "a transaction is already open".to_string(),
            });
        }
        self.open = Some(self.snapshot());
        Ok(())
    }

    fn commit_transaction(&mut self) -> Result<()> {
        self.open.take().map(|_| ()).ok_or_else(|| ImportError::Store {
            operation: "commit".to_string(),
            reason: "no open transaction".to_string(),
        })
    }

    fn rollback_transaction(&mut self) -> Result<()> {
        let snapshot = self.open.take().ok_or_else(|| ImportError::Store {
            operation: "rollback".to_string(),
            reason: "no open transaction".to_string(),
        })?;
        self.restore(snapshot);
        Ok(())
    }

    fn import_region(
        &mut self,
        name: &str,
        parent: Option<RegionId>,
        rank: RegionRank,
    ) -> Result<RegionId> {
        let id = RegionId::new(self.next_id());
        self.regions.push(StoredRegion {
            id,
            name: name.to_string(),
            parent,
            rank,
        });
        Ok(id)
    }

    fn import_site(&mut self, site: &Site) -> Result<SiteId> {
        let id = SiteId::new(self.next_id());
        self.sites.push((id, site.clone()));
        Ok(id)
    }

    fn import_site_visit(&mut self, visit: &SiteVisit) -> Result<SiteVisitId> {
        let id = SiteVisitId::new(self.next_id());
        self.site_visits.push((id, visit.clone()));
        Ok(id)
    }

    fn import_taxon(&mut self, taxon: &TaxonInsert) -> Result<TaxonId> {
        let id = TaxonId::new(self.next_id());
        self.taxa.push((id, taxon.clone()));
        Ok(id)
    }

    fn import_common_name(&mut self, taxon: TaxonId, name: &str) -> Result<()> {
        self.common_names.push((taxon, name.to_string()));
        Ok(())
    }

    fn import_trait(
        &mut self,
        category: &str,
        entity_id: i64,
        name: &str,
        value: &str,
    ) -> Result<()> {
        self.traits.push(StoredTrait {
            category: category.to_string(),
            entity_id,
            name: name.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }

    fn import_material(&mut self, material: &Material) -> Result<MaterialId> {
        let id = MaterialId::new(self.next_id());
        self.materials.push((id, material.clone()));
        Ok(id)
    }

    fn insert_material_part(&mut self, part: &MaterialPart) -> Result<MaterialPartId> {
        let id = MaterialPartId::new(self.next_id());
        self.material_parts.push((id, part.clone()));
        Ok(id)
    }
}
