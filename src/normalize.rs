// src/normalize.rs
//! Markup canonicalization ahead of comparison.
//!
//! Two renderings of the same page differ in ways that carry no meaning:
//! CSRF tokens, cache-buster classes, comment banners, whitespace, and
//! absolute links pointing at their own host. The normalizer removes that
//! noise so the extractor sees equivalent markup for equivalent pages.

use html5ever::parse_document;
use html5ever::serialize::{serialize, SerializeOpts};
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::Attribute;
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};
use regex::Regex;
use std::collections::HashSet;

use crate::config::CompareConfig;

pub struct Normalizer {
    ignore_elements: HashSet<String>,
    ignore_attributes: HashSet<String>,
    ignore_classes: HashSet<String>,
    whitespace_runs: Regex,
    inter_tag_gaps: Regex,
}

impl Normalizer {
    pub fn new(config: &CompareConfig) -> Result<Self, regex::Error> {
        Ok(Normalizer {
            ignore_elements: config.ignore_elements.clone(),
            ignore_attributes: config.ignore_attributes.clone(),
            ignore_classes: config.ignore_classes.clone(),
            whitespace_runs: Regex::new(r"\s+")?,
            inter_tag_gaps: Regex::new(r">\s+<")?,
        })
    }

    /// Canonicalizes `markup`: removes ignored elements, attributes, and
    /// class tokens, strips comments, rewrites `href`/`src` values containing
    /// `source_domain` to point at `target_domain`, and collapses whitespace.
    ///
    /// Pure string transform; never fails. Unparseable input degrades to
    /// plain whitespace collapsing.
    pub fn normalize(&self, markup: &str, source_domain: &str, target_domain: &str) -> String {
        let dom = match parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut markup.as_bytes())
        {
            Ok(dom) => dom,
            Err(_) => return self.collapse_whitespace(markup),
        };

        self.scrub_node(&dom.document, source_domain, target_domain);

        let mut out = Vec::new();
        let root: SerializableHandle = dom.document.clone().into();
        if serialize(&mut out, &root, SerializeOpts::default()).is_err() {
            return self.collapse_whitespace(markup);
        }

        self.collapse_whitespace(&String::from_utf8_lossy(&out))
    }

    fn collapse_whitespace(&self, markup: &str) -> String {
        let collapsed = self.whitespace_runs.replace_all(markup, " ");
        let collapsed = self.inter_tag_gaps.replace_all(&collapsed, "><");
        collapsed.trim().to_string()
    }

    fn scrub_node(&self, handle: &Handle, source_domain: &str, target_domain: &str) {
        if let NodeData::Element { attrs, .. } = &handle.data {
            self.scrub_attributes(&mut attrs.borrow_mut(), source_domain, target_domain);
        }

        handle
            .children
            .borrow_mut()
            .retain(|child| !self.should_drop(child));

        for child in handle.children.borrow().iter() {
            self.scrub_node(child, source_domain, target_domain);
        }
    }

    fn should_drop(&self, node: &Handle) -> bool {
        match &node.data {
            NodeData::Comment { .. } => true,
            NodeData::Element { name, .. } => {
                let tag = name.local.to_string().to_lowercase();
                self.ignore_elements.contains(tag.as_str())
            }
            _ => false,
        }
    }

    fn scrub_attributes(&self, attrs: &mut Vec<Attribute>, source_domain: &str, target_domain: &str) {
        attrs.retain(|attr| !self.ignore_attributes.contains(attr.name.local.as_ref()));

        for attr in attrs.iter_mut() {
            let name = attr.name.local.as_ref();
            if name == "href" || name == "src" {
                let value = attr.value.to_string();
                if value.contains(source_domain) {
                    // First occurrence only, like the rest of the rewrite
                    // pipeline expects.
                    let rewritten = value.replacen(source_domain, target_domain, 1);
                    attr.value = StrTendril::from_slice(&rewritten);
                }
            }
        }

        if let Some(pos) = attrs.iter().position(|a| a.name.local.as_ref() == "class") {
            let kept: Vec<String> = attrs[pos]
                .value
                .split_whitespace()
                .filter(|class| {
                    !self
                        .ignore_classes
                        .iter()
                        .any(|noise| class.contains(noise.as_str()))
                })
                .map(str::to_string)
                .collect();

            if kept.is_empty() {
                attrs.remove(pos);
            } else {
                attrs[pos].value = StrTendril::from_slice(&kept.join(" "));
            }
        }
    }
}
