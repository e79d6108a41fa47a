use crate::action::{Action, Category};
use serde::Serialize;
use std::collections::BTreeMap;

/// Everything one run found and did, in the order it happened.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    pub actions: Vec<Action>,
    /// Proposals dropped because of a collision or an empty result.
    pub skipped: Vec<String>,
    /// Unreadable documents and failed store operations.
    pub errors: Vec<String>,
}

/// Counts printed at the end of the report and emitted by `--json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub auto: usize,
    pub manual_review: usize,
    pub skipped: usize,
    pub errors: usize,
    pub total: usize,
}

impl CleanupReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn auto_actions(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter().filter(|a| a.is_auto())
    }

    pub fn manual_actions(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter().filter(|a| !a.is_auto())
    }

    pub fn summary(&self) -> ReportSummary {
        let auto = self.auto_actions().count();
        ReportSummary {
            auto,
            manual_review: self.actions.len() - auto,
            skipped: self.skipped.len(),
            errors: self.errors.len(),
            total: self.actions.len(),
        }
    }

    /// Nothing to fix, review, skip or report as an error.
    pub fn is_clean(&self) -> bool {
        self.actions.is_empty() && self.skipped.is_empty() && self.errors.is_empty()
    }
}

fn by_category<'a>(
    actions: impl Iterator<Item = &'a Action>,
) -> BTreeMap<Category, Vec<&'a Action>> {
    let mut grouped: BTreeMap<Category, Vec<&Action>> = BTreeMap::new();
    for action in actions {
        grouped.entry(action.category).or_default().push(action);
    }
    grouped
}

fn rule(out: &mut String, ch: char) {
    out.push_str(&ch.to_string().repeat(60));
    out.push('\n');
}

/// Render the human-readable report. Identical input yields identical text.
pub fn render_report(report: &CleanupReport, applied: bool) -> String {
    let mut out = String::new();
    rule(&mut out, '=');
    out.push_str("CATALOG NAMING CLEANUP REPORT\n");
    rule(&mut out, '=');
    out.push('\n');

    let mode = if applied {
        "APPLIED"
    } else {
        "DRY RUN (use --apply to execute)"
    };
    out.push_str(&format!("Mode: {mode}\n\n"));

    let summary = report.summary();

    if summary.auto > 0 {
        rule(&mut out, '-');
        out.push_str(&format!("AUTO-FIXABLE ({}):\n", summary.auto));
        rule(&mut out, '-');
        for (category, actions) in by_category(report.auto_actions()) {
            out.push_str(&format!(
                "\n  Category {} - {} ({}):\n",
                category,
                category.fixed_label(),
                actions.len()
            ));
            for action in actions {
                out.push_str(&format!("    {}\n", action.old_path));
                if !action.new_path.is_empty() {
                    out.push_str(&format!("      -> {}\n", action.new_path));
                }
            }
        }
        out.push('\n');
    }

    if summary.manual_review > 0 {
        rule(&mut out, '-');
        out.push_str(&format!("MANUAL REVIEW NEEDED ({}):\n", summary.manual_review));
        rule(&mut out, '-');
        for (category, actions) in by_category(report.manual_actions()) {
            out.push_str(&format!(
                "\n  Category {} - {} ({}):\n",
                category,
                category.review_label(),
                actions.len()
            ));
            for action in actions {
                out.push_str(&format!("    {}\n", action.old_path));
                out.push_str(&format!("      Reason: {}\n", action.description));
            }
        }
        out.push('\n');
    }

    if !report.skipped.is_empty() {
        rule(&mut out, '-');
        out.push_str(&format!("SKIPPED ({}):\n", report.skipped.len()));
        rule(&mut out, '-');
        for line in &report.skipped {
            out.push_str(&format!("    {line}\n"));
        }
        out.push('\n');
    }

    if !report.errors.is_empty() {
        rule(&mut out, '-');
        out.push_str(&format!("ERRORS ({}):\n", report.errors.len()));
        rule(&mut out, '-');
        for line in &report.errors {
            out.push_str(&format!("    {line}\n"));
        }
        out.push('\n');
    }

    rule(&mut out, '-');
    out.push_str("SUMMARY:\n");
    out.push_str(&format!("  Auto-fixable:   {}\n", summary.auto));
    out.push_str(&format!("  Manual review:  {}\n", summary.manual_review));
    out.push_str(&format!("  Skipped:        {}\n", summary.skipped));
    out.push_str(&format!("  Errors:         {}\n", summary.errors));
    out.push_str(&format!("  Total issues:   {}\n", summary.total));
    rule(&mut out, '=');
    out
}
