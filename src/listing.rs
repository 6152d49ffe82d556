use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;
use scraper::{Html, Selector};

use crate::domain::ElectionLink;
use crate::error::ScrapeError;
use crate::filter::ElectionFilter;

static ELECTION_HREF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[?&]election=\d+").expect("valid election href regex"));
static ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid anchor selector"));

/// Extracts election links from the results index page, keeping the ones
/// whose text passes `filter`. Document order is preserved.
pub fn parse_election_links(
    html: &str,
    base_url: &Url,
    filter: &ElectionFilter,
) -> Result<Vec<ElectionLink>, ScrapeError> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();
    for anchor in document.select(&ANCHOR) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if !ELECTION_HREF.is_match(href) {
            continue;
        }
        let text = collapse_ws(&anchor.text().collect::<String>());
        if !filter.matches(&text) {
            continue;
        }
        let election_id = election_id(base_url, href)?;
        links.push(ElectionLink {
            text,
            href: href.to_string(),
            election_id,
        });
    }
    Ok(links)
}

/// Value of the `election` query parameter of `href`.
pub fn election_id(base_url: &Url, href: &str) -> Result<String, ScrapeError> {
    let url = base_url
        .join(href)
        .map_err(|_| ScrapeError::MissingElectionId(href.to_string()))?;
    url.query_pairs()
        .find(|(key, _)| key == "election")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ScrapeError::MissingElectionId(href.to_string()))
}

pub(crate) fn collapse_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
