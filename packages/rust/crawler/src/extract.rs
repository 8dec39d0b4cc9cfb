//! Document body extraction from EUR-Lex HTML renditions.
//!
//! The service serves two markup variants: newer renditions wrap the act
//! in a `<div id="docHtml">` container surrounded by page furniture,
//! older ones are a bare document. With the container present only its
//! text is taken; otherwise the whole document's text is.

use scraper::{Html, Selector};

/// Literal phrase the service returns when an act has no rendition in
/// the requested language. Expected absence, not a fault to retry.
pub const NOT_FOUND_PHRASE: &str = "The requested document does not exist.";

/// Extract plain text from a document rendition.
pub fn extract_text(html: &str) -> String {
    let doc = Html::parse_document(html);

    let container_sel = Selector::parse("div#docHtml").expect("valid selector");
    if let Some(container) = doc.select(&container_sel).next() {
        return container.text().collect();
    }

    doc.root_element().text().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_variant_extracts_only_container_text() {
        let html = r#"<html><body>
            <nav>Site navigation</nav>
            <div id="docHtml"><p>Article 1</p><p>Scope of this Regulation.</p></div>
            <footer>Page footer</footer>
        </body></html>"#;

        let text = extract_text(html);
        assert!(text.contains("Article 1"));
        assert!(text.contains("Scope of this Regulation."));
        assert!(!text.contains("Site navigation"));
        assert!(!text.contains("Page footer"));
    }

    #[test]
    fn bare_variant_extracts_whole_document_text() {
        let html = "<html><body><p>Article 1</p><p>Scope.</p></body></html>";
        let text = extract_text(html);
        assert!(text.contains("Article 1"));
        assert!(text.contains("Scope."));
    }

    #[test]
    fn extracted_text_has_no_markup() {
        let html = r#"<html><body><div id="docHtml"><b>Article</b> <i>1</i></div></body></html>"#;
        let text = extract_text(html);
        assert!(!text.contains('<'));
        assert!(text.contains("Article"));
    }
}
