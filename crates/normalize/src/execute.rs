//! Execution phase: applies accepted proposals to the store.

use crate::action::Action;
use crate::guard::CollisionGuard;
use crate::plan::{Fix, NameFix, Proposal, TypeName};
use crate::report::CleanupReport;
use catalog_rules::vocabulary::{VARIANT_SCOPED_DOCUMENTS, VARIANT_SCOPED_FIELDS};
use catalog_rules::{
    affix_name_pattern, display_name, strip_name_pattern, tidy_name, Anchor, RuleBook,
};
use catalog_store::{CatalogStore, Document, NodePath, Result, TYPE_DOCUMENT, VARIANT_DOCUMENT};
use serde_json::Value;

/// Display name for a filament type id: override, else generated.
pub fn type_display_name(rules: &RuleBook, id: &str) -> String {
    rules
        .type_name(id)
        .map(str::to_string)
        .unwrap_or_else(|| display_name(id))
}

/// Display name for a variant id: override, else generated.
pub fn variant_display_name(rules: &RuleBook, id: &str) -> String {
    rules
        .variant_name(id)
        .map(str::to_string)
        .unwrap_or_else(|| display_name(id))
}

/// Name for a variant whose id lost `fix.fragment`: the override table, then
/// the old name with the fragment removed, then one generated from the id.
pub fn resolve_variant_name(
    rules: &RuleBook,
    new_id: &str,
    old_name: Option<&str>,
    fix: &NameFix,
) -> String {
    if let Some(name) = rules.variant_name(new_id) {
        return name.to_string();
    }
    let tidy = old_name.map(tidy_name).unwrap_or_default();
    if !tidy.is_empty() {
        let derived = affix_name_pattern(&fix.fragment, fix.anchor);
        let matching = fix
            .pattern
            .iter()
            .chain(derived.iter())
            .find(|pattern| pattern.is_match(&tidy));
        match matching {
            Some(pattern) => {
                if let Some(cleaned) = strip_name_pattern(&tidy, pattern) {
                    return cleaned;
                }
            }
            None => return tidy,
        }
    }
    display_name(new_id)
}

/// Variant-scoped attributes of a type document, in document order.
fn scoped_fields(doc: Option<&Document>) -> Vec<(String, Value)> {
    let Some(doc) = doc else {
        return Vec::new();
    };
    doc.iter()
        .filter(|(key, _)| VARIANT_SCOPED_FIELDS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

fn set_text(doc: &mut Document, key: &str, value: impl Into<String>) {
    doc.insert(key.to_string(), Value::String(value.into()));
}

fn node_id(node: &NodePath) -> &str {
    node.name().unwrap_or_default()
}

/// Applies proposals in order, guarding every destination.
pub struct Executor<'r> {
    rules: &'r RuleBook,
    guard: CollisionGuard,
}

impl<'r> Executor<'r> {
    pub fn new(rules: &'r RuleBook) -> Self {
        Self {
            rules,
            guard: CollisionGuard::new(),
        }
    }

    /// Check the proposal against the guard, record it, then apply it.
    /// Collisions are recorded as skips and store failures as errors.
    pub fn execute(
        &mut self,
        store: &mut dyn CatalogStore,
        proposal: Proposal,
        report: &mut CleanupReport,
    ) {
        let category = proposal.category;
        let old_path = proposal.source.to_string();

        if !store.exists(&proposal.source) {
            log::debug!("Cat {category}: {old_path} is gone, skipping");
            report
                .skipped
                .push(format!("Cat {category}: {old_path} no longer exists"));
            return;
        }

        let new_path = match proposal.fix.target() {
            Some(target) => {
                if !self.guard.try_claim(&*store, target) {
                    log::debug!("Cat {category}: {old_path} -> {target} collides");
                    report
                        .skipped
                        .push(format!("Cat {category}: {old_path} -> {target} would collide"));
                    return;
                }
                target.to_string()
            }
            None => String::new(),
        };

        log::debug!("Cat {category}: {} {old_path}", proposal.description);
        report.actions.push(Action {
            category,
            brand: proposal.brand.clone(),
            old_path: old_path.clone(),
            new_path,
            description: proposal.description.clone(),
            confidence: proposal.fix.confidence(),
        });

        let source = &proposal.source;
        let result = match &proposal.fix {
            Fix::Rename { target, name } => self.rename(store, source, target, name, report),
            Fix::Move {
                target,
                type_name,
                name,
            } => self.relocate(store, source, target, type_name, name, report),
            Fix::Split { target } => self.split(store, source, target, report),
            Fix::Swap { target } => self.swap(store, source, target, report),
            Fix::SetName { name } => self.set_name(store, source, name, report),
            Fix::Review => Ok(()),
        };

        if let Err(err) = result {
            log::warn!("Cat {category}: failed to apply fix to {old_path}: {err}");
            report.errors.push(format!("Cat {category}: {old_path}: {err}"));
        }
    }

    fn load(
        &self,
        store: &dyn CatalogStore,
        node: &NodePath,
        name: &str,
        report: &mut CleanupReport,
    ) -> Option<Document> {
        match store.read_document(node, name) {
            Ok(doc) => doc,
            Err(err) => {
                log::warn!("Cannot read {node}/{name}: {err}");
                let line = format!("{node}/{name}: {err}");
                if !report.errors.contains(&line) {
                    report.errors.push(line);
                }
                None
            }
        }
    }

    /// Create the type document for `ty` from `template` unless `ty`
    /// already has one. Returns whether `ty` was created.
    fn ensure_type(
        &self,
        store: &mut dyn CatalogStore,
        ty: &NodePath,
        template: Option<&Document>,
        template_id: &str,
        type_name: &TypeName,
    ) -> Result<bool> {
        if store.has_document(ty, TYPE_DOCUMENT) {
            return Ok(false);
        }
        let created = !store.exists(ty);
        let id = node_id(ty);
        let name = match type_name {
            TypeName::Generated => type_display_name(self.rules, id),
            TypeName::ProductLine { line, anchor } => match self.rules.type_name(id) {
                Some(name) => name.to_string(),
                None => {
                    let base = template
                        .and_then(|doc| doc.get("name"))
                        .and_then(Value::as_str)
                        .map(str::to_string)
                        .unwrap_or_else(|| type_display_name(self.rules, template_id));
                    let line = type_display_name(self.rules, line);
                    match anchor {
                        Anchor::Start => format!("{line} {base}"),
                        Anchor::End => format!("{base} {line}"),
                    }
                }
            },
        };

        let mut doc = template.cloned().unwrap_or_default();
        doc.retain(|key, _| !VARIANT_SCOPED_FIELDS.contains(&key.as_str()));
        set_text(&mut doc, "id", id);
        set_text(&mut doc, "name", name);
        log::debug!("Creating filament type {ty}");
        store.write_document(ty, TYPE_DOCUMENT, &doc)?;
        Ok(created)
    }

    /// Move `source` to `target`. When the move fails, a type node created
    /// for it is removed again.
    fn move_into(
        &self,
        store: &mut dyn CatalogStore,
        source: &NodePath,
        target: &NodePath,
        new_type: Option<&NodePath>,
    ) -> Result<()> {
        let Err(err) = store.move_subtree(source, target) else {
            return Ok(());
        };
        if let Some(ty) = new_type {
            log::debug!("Removing filament type {ty} after failed move");
            if let Err(cleanup) = store.delete_subtree(ty) {
                log::warn!("Cannot remove {ty}: {cleanup}");
            }
        }
        Err(err)
    }

    /// Give a variant document the id of its node and a recomputed name.
    fn rewrite_variant(
        &self,
        store: &mut dyn CatalogStore,
        node: &NodePath,
        fix: &NameFix,
        report: &mut CleanupReport,
    ) -> Result<()> {
        let Some(mut doc) = self.load(&*store, node, VARIANT_DOCUMENT, report) else {
            return Ok(());
        };
        let id = node_id(node);
        let old_name = doc.get("name").and_then(Value::as_str).map(str::to_string);
        let name = resolve_variant_name(self.rules, id, old_name.as_deref(), fix);
        set_text(&mut doc, "id", id);
        set_text(&mut doc, "name", name);
        store.write_document(node, VARIANT_DOCUMENT, &doc)
    }

    fn remove_if_empty(&self, store: &mut dyn CatalogStore, ty: &NodePath) -> Result<()> {
        match store.list_children(ty) {
            Ok(children) if children.is_empty() => {
                log::debug!("Removing emptied filament type {ty}");
                store.delete_subtree(ty)
            }
            Ok(_) => Ok(()),
            Err(err) if err.is_not_found() => Ok(()),
            Err(err) => Err(err),
        }
    }

    /// Move documents that belong to one colorway from `from` to `to`.
    fn relocate_scoped_documents(
        &self,
        store: &mut dyn CatalogStore,
        from: &NodePath,
        to: &NodePath,
    ) -> Result<()> {
        for name in VARIANT_SCOPED_DOCUMENTS {
            if store.has_document(from, name) && !store.has_document(to, name) {
                store.move_document(from, to, name)?;
            }
        }
        Ok(())
    }

    fn rename(
        &self,
        store: &mut dyn CatalogStore,
        source: &NodePath,
        target: &NodePath,
        name: &NameFix,
        report: &mut CleanupReport,
    ) -> Result<()> {
        store.move_subtree(source, target)?;
        self.rewrite_variant(store, target, name, report)
    }

    fn relocate(
        &self,
        store: &mut dyn CatalogStore,
        source: &NodePath,
        target: &NodePath,
        type_name: &TypeName,
        name: &NameFix,
        report: &mut CleanupReport,
    ) -> Result<()> {
        let (Some(source_type), Some(target_type)) = (source.parent(), target.parent()) else {
            return Ok(());
        };
        let template = self.load(&*store, &source_type, TYPE_DOCUMENT, report);
        let created = self.ensure_type(
            store,
            &target_type,
            template.as_ref(),
            node_id(&source_type),
            type_name,
        )?;
        self.move_into(store, source, target, created.then_some(&target_type))?;
        self.rewrite_variant(store, target, name, report)?;
        self.remove_if_empty(store, &source_type)
    }

    /// `source` is the filament type being split; `target` the new variant
    /// under the head type.
    fn split(
        &mut self,
        store: &mut dyn CatalogStore,
        source: &NodePath,
        target: &NodePath,
        report: &mut CleanupReport,
    ) -> Result<()> {
        let Some(head) = target.parent() else {
            return Ok(());
        };
        let source_doc = self.load(&*store, source, TYPE_DOCUMENT, report);
        self.ensure_type(
            store,
            &head,
            source_doc.as_ref(),
            node_id(source),
            &TypeName::Generated,
        )?;

        let tail = node_id(target);
        let mut variant = Document::new();
        set_text(&mut variant, "id", tail);
        set_text(&mut variant, "name", variant_display_name(self.rules, tail));
        variant.extend(scoped_fields(source_doc.as_ref()));
        store.write_document(target, VARIANT_DOCUMENT, &variant)?;
        self.relocate_scoped_documents(store, source, target)?;

        for child in store.list_children(source)? {
            let from = source.join(child.as_str());
            let to = head.join(child.as_str());
            if !self.guard.try_claim(&*store, &to) {
                log::debug!("Leaving {from} in place, {to} is taken");
                continue;
            }
            store.move_subtree(&from, &to)?;
        }
        self.remove_if_empty(store, source)
    }

    /// `source` is `material/color/product`; `target` is
    /// `material/product/color`.
    fn swap(
        &self,
        store: &mut dyn CatalogStore,
        source: &NodePath,
        target: &NodePath,
        report: &mut CleanupReport,
    ) -> Result<()> {
        let (Some(color_type), Some(product_type)) = (source.parent(), target.parent()) else {
            return Ok(());
        };
        let color_doc = self.load(&*store, &color_type, TYPE_DOCUMENT, report);
        let created = self.ensure_type(
            store,
            &product_type,
            color_doc.as_ref(),
            node_id(&color_type),
            &TypeName::Generated,
        )?;
        self.move_into(store, source, target, created.then_some(&product_type))?;

        let color = node_id(target);
        let mut variant = self
            .load(&*store, target, VARIANT_DOCUMENT, report)
            .unwrap_or_default();
        for (key, value) in scoped_fields(color_doc.as_ref()) {
            variant.entry(key).or_insert(value);
        }
        set_text(&mut variant, "id", color);
        set_text(&mut variant, "name", variant_display_name(self.rules, color));
        store.write_document(target, VARIANT_DOCUMENT, &variant)?;
        self.relocate_scoped_documents(store, &color_type, target)?;

        self.remove_if_empty(store, &color_type)
    }

    fn set_name(
        &self,
        store: &mut dyn CatalogStore,
        node: &NodePath,
        name: &str,
        report: &mut CleanupReport,
    ) -> Result<()> {
        let Some(mut doc) = self.load(&*store, node, VARIANT_DOCUMENT, report) else {
            return Ok(());
        };
        set_text(&mut doc, "name", name);
        store.write_document(node, VARIANT_DOCUMENT, &doc)
    }
}
