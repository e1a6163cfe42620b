//! Traversal over the page → row → column → field hierarchy.
//!
//! The same visitor serves both a form definition's top-level pages and the
//! settings-context tree every field carries, so the two operation modes it
//! offers cover all tree access in the engine:
//!
//! - [`PagesVisitor::visit`]: depth-first search in document order with
//!   stop-on-first-match semantics;
//! - [`PagesVisitor::map_fields`]: structural rewrite that rebuilds every
//!   level of the tree and never aliases its input.

use formdef_model::{Column, Field, FieldPatch, Page, Row};

/// Stateless traversal over an ordered sequence of pages.
pub struct PagesVisitor<'a> {
    pages: &'a [Page],
}

impl<'a> PagesVisitor<'a> {
    pub fn new(pages: &'a [Page]) -> Self {
        Self { pages }
    }

    /// Visit every field in document order: pages, then rows, then columns,
    /// then the column's fields, recursing into a field's nested fields
    /// before moving to the next sibling.
    ///
    /// Traversal halts at the first `true` returned by the predicate. A
    /// matching parent still has its nested fields visited before the halt
    /// takes effect; the stop is evaluated after the subtree. Callers collect
    /// results through the closure.
    pub fn visit<F>(&self, mut predicate: F)
    where
        F: FnMut(&Field) -> bool,
    {
        'pages: for page in self.pages {
            for row in &page.rows {
                for column in &row.columns {
                    for field in &column.fields {
                        if visit_field(field, &mut predicate) {
                            break 'pages;
                        }
                    }
                }
            }
        }
    }

    /// Rebuild the tree, replacing each field with the result of `transform`.
    ///
    /// The transform receives the field and its index within its column (or
    /// within its parent's nested-field list) and returns a [`FieldPatch`]:
    ///
    /// - `merge == true`: the patch is applied onto a copy of the original
    ///   field, so untouched attributes survive;
    /// - `merge == false`: the patch becomes the entire field, except that
    ///   nested fields are reattached from the original when the patch did
    ///   not set them;
    /// - `include_nested == true`: the original nested fields are run through
    ///   the same transform and merge rule, and the result replaces the
    ///   field's nested fields (nested fields introduced by the patch survive
    ///   only when the original had none).
    ///
    /// Every page, row and column is freshly rebuilt; no part of the returned
    /// tree aliases the input.
    pub fn map_fields<F>(&self, mut transform: F, merge: bool, include_nested: bool) -> Vec<Page>
    where
        F: FnMut(&Field, usize) -> FieldPatch,
    {
        self.pages
            .iter()
            .map(|page| Page {
                title: page.title.clone(),
                rows: page
                    .rows
                    .iter()
                    .map(|row| Row {
                        columns: row
                            .columns
                            .iter()
                            .map(|column| Column {
                                size: column.size,
                                fields: column
                                    .fields
                                    .iter()
                                    .enumerate()
                                    .map(|(index, field)| {
                                        map_field(field, index, &mut transform, merge, include_nested)
                                    })
                                    .collect(),
                                extra: column.extra.clone(),
                            })
                            .collect(),
                        extra: row.extra.clone(),
                    })
                    .collect(),
                extra: page.extra.clone(),
            })
            .collect()
    }
}

fn visit_field<F>(field: &Field, predicate: &mut F) -> bool
where
    F: FnMut(&Field) -> bool,
{
    let matched = predicate(field);
    let mut nested_matched = false;
    for nested in &field.nested_fields {
        if visit_field(nested, predicate) {
            nested_matched = true;
            break;
        }
    }
    matched || nested_matched
}

fn map_field<F>(
    field: &Field,
    index: usize,
    transform: &mut F,
    merge: bool,
    include_nested: bool,
) -> Field
where
    F: FnMut(&Field, usize) -> FieldPatch,
{
    let patch = transform(field, index);
    let mut next = if merge {
        patch.apply_to(field)
    } else {
        let reattach_nested = patch.nested_fields.is_none();
        let mut bare = patch.into_field();
        if reattach_nested {
            bare.nested_fields = field.nested_fields.clone();
        }
        bare
    };
    if include_nested && !field.nested_fields.is_empty() {
        next.nested_fields = field
            .nested_fields
            .iter()
            .enumerate()
            .map(|(nested_index, nested)| {
                map_field(nested, nested_index, transform, merge, include_nested)
            })
            .collect();
    }
    next
}
