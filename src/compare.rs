// src/compare.rs
//! Per-path comparison pipeline: normalize both sides, extract typed
//! documents, and run the field comparators in a fixed order.

use anyhow::Result;

use crate::analysis::FieldComparators;
use crate::config::CompareConfig;
use crate::extract::Extractor;
use crate::models::{Document, PathComparison};
use crate::normalize::Normalizer;

pub struct PageComparator {
    normalizer: Normalizer,
    extractor: Extractor,
    fields: FieldComparators,
}

impl PageComparator {
    pub fn new(config: &CompareConfig) -> Result<Self> {
        Ok(PageComparator {
            normalizer: Normalizer::new(config)?,
            extractor: Extractor::new()?,
            fields: FieldComparators::new(),
        })
    }

    /// Compares two renderings of the same path. Both sides are normalized
    /// with the same source→target rewrite so absolute references to
    /// `domain1` read as `domain2` references on either side.
    pub fn compare_page(
        &self,
        path: &str,
        markup1: &str,
        markup2: &str,
        domain1: &str,
        domain2: &str,
    ) -> PathComparison {
        let normalized1 = self.normalizer.normalize(markup1, domain1, domain2);
        let normalized2 = self.normalizer.normalize(markup2, domain1, domain2);

        let document1 = self.extractor.extract(&normalized1);
        let document2 = self.extractor.extract(&normalized2);

        self.compare_documents(path, &document1, &document2)
    }

    /// Field-comparator stage alone, for callers that already hold extracted
    /// documents.
    pub fn compare_documents(
        &self,
        path: &str,
        document1: &Document,
        document2: &Document,
    ) -> PathComparison {
        let mut differences = Vec::new();

        if let Some(diff) = self.fields.compare_title(&document1.title, &document2.title) {
            differences.push(diff);
        }
        if let Some(diff) = self
            .fields
            .compare_headings(&document1.headings, &document2.headings)
        {
            differences.push(diff);
        }
        if let Some(diff) = self
            .fields
            .compare_paragraphs(&document1.paragraphs, &document2.paragraphs)
        {
            differences.push(diff);
        }
        if let Some(diff) = self.fields.compare_links(&document1.links, &document2.links) {
            differences.push(diff);
        }
        if let Some(diff) = self.fields.compare_images(&document1.images, &document2.images) {
            differences.push(diff);
        }
        if let Some(diff) = self.fields.compare_forms(&document1.forms, &document2.forms) {
            differences.push(diff);
        }

        PathComparison {
            url: path.to_string(),
            has_differences: !differences.is_empty(),
            differences,
        }
    }
}
