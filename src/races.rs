use std::sync::LazyLock;

use reqwest::Url;
use scraper::{Html, Selector};
use tracing::debug;

use crate::domain::RaceOption;
use crate::error::ScrapeError;
use crate::listing::collapse_ws;

static RACE_SELECT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#race").expect("valid race selector"));
static OPTION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("option").expect("valid option selector"));

/// Race options of the election detail page, in selector order. Options
/// without a value are prompts and are skipped.
pub fn parse_race_options(html: &str, page_url: &Url) -> Result<Vec<RaceOption>, ScrapeError> {
    let document = Html::parse_document(html);
    let select = document
        .select(&RACE_SELECT)
        .next()
        .ok_or_else(|| ScrapeError::MissingRaceSelector(page_url.to_string()))?;

    let mut races = Vec::new();
    for option in select.select(&OPTION) {
        let race_name = collapse_ws(&option.text().collect::<String>());
        let race_id = option
            .value()
            .attr("value")
            .map(|value| value.trim().to_string())
            .unwrap_or_else(|| race_name.clone());
        if race_id.is_empty() {
            debug!(race = %race_name, "skipping race option without id");
            continue;
        }
        races.push(RaceOption { race_id, race_name });
    }
    Ok(races)
}

/// Full-export request for one race: empty `ward` and `precinct`.
pub fn export_url(export_base: &Url, election_id: &str, race_id: &str) -> Url {
    let mut url = export_base.clone();
    url.query_pairs_mut()
        .clear()
        .append_pair("election", election_id)
        .append_pair("race", race_id)
        .append_pair("ward", "")
        .append_pair("precinct", "");
    url
}
