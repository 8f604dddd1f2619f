use std::collections::BTreeMap;

use crate::catalog::OrbitModel;

/// Element sets grouped by the source they came from. Sources keep the
/// order in which they were declared or discovered; objects within a
/// source are ordered by name.
#[derive(Debug, Default)]
pub struct Catalog {
    sources: Vec<CatalogSource>,
}

#[derive(Debug)]
pub struct CatalogSource {
    pub label: String,
    pub objects: BTreeMap<String, OrbitModel>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a source. Empty sources are dropped so downstream code
    /// never has to skip them.
    pub fn push_source(&mut self, label: impl Into<String>, objects: BTreeMap<String, OrbitModel>) {
        if objects.is_empty() {
            return;
        }
        self.sources.push(CatalogSource {
            label: label.into(),
            objects,
        });
    }

    pub fn sources(&self) -> &[CatalogSource] {
        &self.sources
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn object_count(&self) -> usize {
        self.sources.iter().map(|s| s.objects.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::parse_records;

    const RECORD: &str = "ISS (ZARYA)\n\
        1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927\n\
        2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537\n";

    #[test]
    fn sources_keep_insertion_order() {
        let mut catalog = Catalog::new();
        catalog.push_source("beta", parse_records(RECORD).objects);
        catalog.push_source("alpha", parse_records(RECORD).objects);
        let labels: Vec<_> = catalog.sources().iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, ["beta", "alpha"]);
        assert_eq!(catalog.object_count(), 2);
    }

    #[test]
    fn empty_sources_are_dropped() {
        let mut catalog = Catalog::new();
        catalog.push_source("nothing", BTreeMap::new());
        assert!(catalog.is_empty());
        assert_eq!(catalog.object_count(), 0);
    }

    // Error assertions across the crate unwrap results carrying catalogs
    // and models, which needs Debug all the way down.
    #[test]
    fn catalogs_format_for_debug_output() {
        let mut catalog = Catalog::new();
        catalog.push_source("combined", parse_records(RECORD).objects);
        let dump = format!("{:?}", catalog);
        assert!(dump.contains("combined"));
        assert!(dump.contains("ISS (ZARYA)"));
    }
}
