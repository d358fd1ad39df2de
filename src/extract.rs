// src/extract.rs
//! Structured content extraction from normalized markup.

use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

use crate::models::{Document, Form, FormInput, Image, Link};

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("invalid selector: {0}")]
    Selector(String),
}

/// Parses normalized markup into a typed [`Document`]. Extraction is
/// deterministic and total: malformed input degrades field-by-field to
/// empty defaults, never to an error.
pub struct Extractor {
    title: Selector,
    headings: Selector,
    paragraphs: Selector,
    links: Selector,
    images: Selector,
    forms: Selector,
    inputs: Selector,
}

impl Extractor {
    pub fn new() -> Result<Self, ExtractError> {
        Ok(Extractor {
            title: parse_selector("title")?,
            // Levels flattened into one document-order sequence.
            headings: parse_selector("h1, h2, h3, h4, h5, h6")?,
            paragraphs: parse_selector("p")?,
            links: parse_selector("a[href]")?,
            images: parse_selector("img[src]")?,
            forms: parse_selector("form")?,
            inputs: parse_selector("input, textarea, select")?,
        })
    }

    pub fn extract(&self, markup: &str) -> Document {
        let html = Html::parse_document(markup);

        let title = html
            .select(&self.title)
            .next()
            .map(|el| element_text(&el))
            .unwrap_or_default();

        let headings = html
            .select(&self.headings)
            .map(|el| element_text(&el))
            .collect();

        let paragraphs = html
            .select(&self.paragraphs)
            .map(|el| element_text(&el))
            .filter(|text| !text.is_empty())
            .collect();

        let links = html
            .select(&self.links)
            .filter_map(|el| {
                el.value().attr("href").map(|href| Link {
                    text: element_text(&el),
                    href: href.to_string(),
                })
            })
            .collect();

        let images = html
            .select(&self.images)
            .filter_map(|el| {
                el.value().attr("src").map(|src| Image {
                    alt: el.value().attr("alt").unwrap_or("").to_string(),
                    src: src.to_string(),
                })
            })
            .collect();

        let forms = html
            .select(&self.forms)
            .map(|form| Form {
                action: form.value().attr("action").unwrap_or("").to_string(),
                method: form.value().attr("method").unwrap_or("GET").to_string(),
                inputs: form
                    .select(&self.inputs)
                    .map(|input| FormInput {
                        name: input.value().attr("name").unwrap_or("").to_string(),
                        input_type: input.value().attr("type").unwrap_or("text").to_string(),
                    })
                    .collect(),
            })
            .collect();

        Document {
            title,
            headings,
            paragraphs,
            links,
            images,
            forms,
        }
    }
}

fn parse_selector(css: &str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|e| ExtractError::Selector(e.to_string()))
}

fn element_text(el: &ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> Extractor {
        Extractor::new().unwrap()
    }

    #[test]
    fn test_extracts_all_fields() {
        let html = r#"<html><head><title> Store </title></head><body>
            <h1>Welcome</h1><h3>Deals</h3><h2>News</h2>
            <p>First paragraph.</p><p>   </p><p>Second.</p>
            <a href="/cart">Cart</a>
            <img src="/logo.png" alt="Logo">
            <form action="/search" method="post">
                <input name="q"><textarea name="note"></textarea>
            </form>
        </body></html>"#;

        let doc = extractor().extract(html);

        assert_eq!(doc.title, "Store");
        assert_eq!(doc.headings, vec!["Welcome", "Deals", "News"]);
        assert_eq!(doc.paragraphs, vec!["First paragraph.", "Second."]);
        assert_eq!(doc.links.len(), 1);
        assert_eq!(doc.links[0].text, "Cart");
        assert_eq!(doc.links[0].href, "/cart");
        assert_eq!(doc.images[0].alt, "Logo");
        assert_eq!(doc.forms.len(), 1);
        assert_eq!(doc.forms[0].action, "/search");
        assert_eq!(doc.forms[0].method, "post");
        assert_eq!(doc.forms[0].inputs.len(), 2);
        assert_eq!(doc.forms[0].inputs[0].name, "q");
        assert_eq!(doc.forms[0].inputs[0].input_type, "text");
    }

    #[test]
    fn test_heading_levels_flatten_in_document_order() {
        let html = "<html><body><h2>B</h2><h1>A</h1><h6>C</h6></body></html>";
        let doc = extractor().extract(html);
        assert_eq!(doc.headings, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_missing_attributes_get_defaults() {
        let html = r#"<html><body>
            <img src="/pic.jpg">
            <form><input></form>
        </body></html>"#;

        let doc = extractor().extract(html);

        assert_eq!(doc.images[0].alt, "");
        assert_eq!(doc.forms[0].action, "");
        assert_eq!(doc.forms[0].method, "GET");
        assert_eq!(doc.forms[0].inputs[0].name, "");
        assert_eq!(doc.forms[0].inputs[0].input_type, "text");
    }

    #[test]
    fn test_malformed_markup_degrades_to_empty_fields() {
        let doc = extractor().extract("<<<not really html >");
        assert_eq!(doc.title, "");
        assert!(doc.headings.is_empty());
        assert!(doc.links.is_empty());
        assert!(doc.forms.is_empty());
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let html = r#"<html><body><h1>A</h1><p>text</p><a href="/x">x</a></body></html>"#;
        let ex = extractor();
        assert_eq!(ex.extract(html), ex.extract(html));
    }
}
