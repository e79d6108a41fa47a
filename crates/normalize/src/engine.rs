use crate::action::Category;
use crate::detect::{
    audit_variants, detect_affix_strips, detect_color_splits, detect_common_prefixes,
    detect_display_names, detect_product_lines, detect_swapped_layers,
};
use crate::error::{NormalizeError, Result};
use crate::execute::Executor;
use crate::plan::Scan;
use crate::report::CleanupReport;
use catalog_rules::{AffixPosition, RuleBook};
use catalog_store::{CatalogStore, FsStore, MemoryStore, NodePath, StoreError};
use std::collections::HashSet;
use std::path::Path;

/// What a run covers and whether it writes.
#[derive(Debug, Clone, Default)]
pub struct CleanupOptions {
    /// Write to disk; otherwise the run works on an in-memory snapshot.
    pub apply: bool,
    /// Only this brand.
    pub brand: Option<String>,
    /// Only this category.
    pub category: Option<Category>,
}

/// One detector pass in the per-brand sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    Swap,
    PrefixStrip,
    ProductLinePrefix,
    ProductLineSuffix,
    SuffixStrip,
    ColorSplit,
    CommonPrefix,
    DisplayNames,
}

impl Pass {
    /// Swaps change which node is a type, so they precede splits; brand
    /// rules run before the generic common-prefix scan.
    const ORDER: [Pass; 8] = [
        Pass::Swap,
        Pass::PrefixStrip,
        Pass::ProductLinePrefix,
        Pass::ProductLineSuffix,
        Pass::SuffixStrip,
        Pass::ColorSplit,
        Pass::CommonPrefix,
        Pass::DisplayNames,
    ];

    fn categories(self) -> &'static [Category] {
        match self {
            Pass::Swap => &[Category::Swap],
            Pass::PrefixStrip => &[Category::SeriesAffix, Category::ImportPrefix],
            Pass::ProductLinePrefix | Pass::ProductLineSuffix => &[Category::ProductLine],
            Pass::SuffixStrip => &[Category::SeriesAffix, Category::ImportPrefix],
            Pass::ColorSplit => &[Category::ColorSplit],
            Pass::CommonPrefix => &[Category::CommonPrefix],
            Pass::DisplayNames => &[Category::DisplayName],
        }
    }

    fn detect(self, store: &dyn CatalogStore, rules: &RuleBook, brand: &str) -> Scan {
        match self {
            Pass::Swap => detect_swapped_layers(store, brand),
            Pass::PrefixStrip => detect_affix_strips(store, rules, brand, AffixPosition::Prefix),
            Pass::ProductLinePrefix => {
                detect_product_lines(store, rules, brand, AffixPosition::Prefix)
            }
            Pass::ProductLineSuffix => {
                detect_product_lines(store, rules, brand, AffixPosition::Suffix)
            }
            Pass::SuffixStrip => detect_affix_strips(store, rules, brand, AffixPosition::Suffix),
            Pass::ColorSplit => detect_color_splits(store, brand),
            Pass::CommonPrefix => detect_common_prefixes(store, brand),
            Pass::DisplayNames => detect_display_names(store, brand),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Scanning(usize),
    Reducing,
    Reporting,
    Done,
}

/// Drives the detectors over every brand, feeding proposals to one executor
/// so collisions are tracked across the whole run.
pub struct Normalizer<'r> {
    rules: &'r RuleBook,
    options: CleanupOptions,
}

impl<'r> Normalizer<'r> {
    pub fn new(rules: &'r RuleBook, options: CleanupOptions) -> Self {
        Self { rules, options }
    }

    /// Run every pass against `store` and return the report.
    pub fn run(&self, store: &mut dyn CatalogStore) -> CleanupReport {
        let mut report = CleanupReport::new();
        let brands = self.brands(&*store, &mut report);
        let mut executor = Executor::new(self.rules);

        let mut phase = Phase::Scanning(0);
        loop {
            log::trace!("Cleanup phase {phase:?}");
            phase = match phase {
                Phase::Scanning(index) => match brands.get(index) {
                    Some(brand) => {
                        log::info!("Scanning brand {}/{}: {brand}", index + 1, brands.len());
                        self.scan_brand(store, &mut executor, brand, &mut report);
                        Phase::Scanning(index + 1)
                    }
                    None => Phase::Reducing,
                },
                Phase::Reducing => {
                    self.audit(store, &mut executor, &brands, &mut report);
                    Phase::Reporting
                }
                Phase::Reporting => {
                    let summary = report.summary();
                    log::info!(
                        "Cleanup finished: {} auto, {} manual review, {} skipped, {} errors",
                        summary.auto,
                        summary.manual_review,
                        summary.skipped,
                        summary.errors
                    );
                    Phase::Done
                }
                Phase::Done => break,
            };
        }
        report
    }

    fn brands(&self, store: &dyn CatalogStore, report: &mut CleanupReport) -> Vec<String> {
        if let Some(brand) = &self.options.brand {
            if store.exists(&NodePath::new([brand.as_str()])) {
                return vec![brand.clone()];
            }
            log::warn!("Brand {brand} not found");
            report.errors.push(format!("Brand '{brand}' not found"));
            return Vec::new();
        }
        match store.list_children(&NodePath::root()) {
            Ok(brands) => brands,
            Err(err) => {
                report.errors.push(format!("Cannot list brands: {err}"));
                Vec::new()
            }
        }
    }

    fn wants(&self, categories: &[Category]) -> bool {
        self.options
            .category
            .map_or(true, |only| categories.contains(&only))
    }

    fn absorb(&self, scan: &mut Scan, report: &mut CleanupReport) {
        scan.retain_category(self.options.category);
        report
            .skipped
            .extend(scan.skipped.drain(..).map(|skip| skip.message));
        for err in scan.errors.drain(..) {
            if !report.errors.contains(&err) {
                report.errors.push(err);
            }
        }
    }

    fn scan_brand(
        &self,
        store: &mut dyn CatalogStore,
        executor: &mut Executor<'_>,
        brand: &str,
        report: &mut CleanupReport,
    ) {
        for pass in Pass::ORDER {
            if !self.wants(pass.categories()) {
                continue;
            }
            let mut scan = pass.detect(&*store, self.rules, brand);
            self.absorb(&mut scan, report);
            if !scan.proposals.is_empty() {
                log::debug!("{brand}: {pass:?} proposed {}", scan.proposals.len());
            }
            for proposal in scan.proposals {
                executor.execute(store, proposal, report);
            }
        }
    }

    /// Read-only audit over the settled tree, skipping anything the
    /// structural passes already reported.
    fn audit(
        &self,
        store: &mut dyn CatalogStore,
        executor: &mut Executor<'_>,
        brands: &[String],
        report: &mut CleanupReport,
    ) {
        if !self.wants(&[Category::TechSpec, Category::LongName]) {
            return;
        }
        let surfaced: HashSet<String> = report
            .actions
            .iter()
            .flat_map(|action| [action.old_path.clone(), action.new_path.clone()])
            .filter(|path| !path.is_empty())
            .collect();
        let mut scan = audit_variants(
            &*store,
            self.rules,
            brands,
            &surfaced,
            self.options.category,
        );
        self.absorb(&mut scan, report);
        for proposal in scan.proposals {
            executor.execute(store, proposal, report);
        }
    }
}

/// Run a cleanup over the catalog at `root`.
///
/// With `apply` unset the catalog is snapshotted into memory and the same
/// pipeline runs on the copy, so the disk is never written.
pub fn run_cleanup(
    root: &Path,
    rules: &RuleBook,
    options: &CleanupOptions,
) -> Result<CleanupReport> {
    let mut disk = FsStore::open(root).map_err(|err| match err {
        StoreError::MissingRoot(path) => NormalizeError::MissingRoot(path),
        other => other.into(),
    })?;
    let normalizer = Normalizer::new(rules, options.clone());

    if options.apply {
        log::info!("Applying fixes to {}", root.display());
        return Ok(normalizer.run(&mut disk));
    }

    log::info!("Dry run over {}", root.display());
    let (mut overlay, unreadable) = MemoryStore::snapshot(root)?;
    let mut report = normalizer.run(&mut overlay);
    for line in unreadable {
        if !report.errors.contains(&line) {
            report.errors.push(line);
        }
    }
    Ok(report)
}
