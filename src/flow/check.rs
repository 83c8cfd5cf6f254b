// SPDX-License-Identifier: MIT

//! Static integrity checks for authored documents
//!
//! The runtime tolerates every defect reported here; this exists so authors
//! find out before users do.

use regex::Regex;
use std::collections::HashSet;
use url::Url;

use crate::flow::document::{ActionKind, Document, ReferenceKind, Validation};
use crate::kit::error::DocumentError;

/// Collect every integrity defect in a document
pub fn check(document: &Document) -> Vec<DocumentError> {
    let mut errors = Vec::new();

    if document.pages.is_empty() {
        errors.push(DocumentError::Empty);
    }

    let mut page_ids = HashSet::new();
    let mut block_ids = HashSet::new();
    for page in &document.pages {
        if !page_ids.insert(page.id.as_str()) {
            errors.push(DocumentError::DuplicatePage(page.id.clone()));
        }
        if let Some(url) = page.redirect_url() {
            if Url::parse(url).is_err() {
                errors.push(DocumentError::InvalidRedirect {
                    page: page.id.clone(),
                    url: url.to_string(),
                });
            }
        }
        for block in &page.blocks {
            if !block_ids.insert(block.id.as_str()) {
                errors.push(DocumentError::DuplicateBlock {
                    block: block.id.clone(),
                    page: page.id.clone(),
                });
            }
            if !block.validations.is_empty() && !block.kind.accepts_input() {
                errors.push(DocumentError::ValidationsWithoutInput {
                    block: block.id.clone(),
                });
            }
            for validation in block.validations.iter() {
                if let Validation::Pattern(pattern) = validation {
                    if let Err(e) = Regex::new(pattern) {
                        errors.push(DocumentError::InvalidPattern {
                            block: block.id.clone(),
                            message: e.to_string(),
                        });
                    }
                }
            }
        }
    }

    let mut ruled = HashSet::new();
    for rule in &document.rules {
        if !page_ids.contains(rule.page_id.as_str()) {
            errors.push(DocumentError::DanglingRule(rule.page_id.clone()));
        }
        if !ruled.insert(rule.page_id.as_str()) {
            errors.push(DocumentError::DuplicateRule(rule.page_id.clone()));
        }
        for (index, action) in rule.actions.iter().enumerate() {
            if action.condition.is_malformed() {
                errors.push(DocumentError::MalformedCondition {
                    page: rule.page_id.clone(),
                    action: index,
                });
            }
            if let (ActionKind::Hide, Some(target)) = (action.kind, &action.details.target) {
                if target.kind == ReferenceKind::Block && document.block(&target.value).is_none() {
                    errors.push(DocumentError::UnknownHideTarget {
                        page: rule.page_id.clone(),
                        block: target.value.clone(),
                    });
                }
            }
            if let Some(target) = action.jump_target() {
                if !page_ids.contains(target) {
                    errors.push(DocumentError::UnknownJumpTarget {
                        page: rule.page_id.clone(),
                        target: target.to_string(),
                    });
                }
            }
        }
    }

    errors
}
