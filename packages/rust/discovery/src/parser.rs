//! Parser for the SPARQL endpoint's HTML result page.
//!
//! With `format=text/html` the endpoint renders one result row per
//! `<pre>` element, quoted, e.g. `"32023R0001"`. The CELEX identifier
//! is characters 2–11 of the row (1-indexed): skip the leading quote,
//! take the next ten characters.

use std::collections::BTreeSet;

use lexharvest_shared::{CELEX_ID_LEN, CelexId};
use scraper::{Html, Selector};

/// Extract the set of CELEX identifiers from a query result page.
///
/// Rows too short to hold an identifier are skipped; duplicates collapse
/// into the set.
pub(crate) fn parse_result_rows(html: &str) -> BTreeSet<CelexId> {
    let doc = Html::parse_document(html);
    let row_sel = Selector::parse("pre").expect("valid selector");

    let mut ids = BTreeSet::new();
    for el in doc.select(&row_sel) {
        let row: String = el.text().collect();
        let id: String = row.chars().skip(1).take(CELEX_ID_LEN).collect();
        if id.chars().count() == CELEX_ID_LEN {
            ids.insert(CelexId::new(id));
        }
    }

    ids
}
