use std::time::{Duration, Instant};

use serde::Serialize;

use crate::clean::clean_file;
use crate::config::SiteConfig;
use crate::domain::{ElectionCategory, ElectionLink, RaceOption};
use crate::error::ScrapeError;
use crate::filter::{ElectionFilter, RaceFilter};
use crate::fs_util::ensure_dir;
use crate::listing::parse_election_links;
use crate::races::{export_url, parse_race_options};
use crate::site::SiteClient;
use crate::store::Store;

/// What to scrape: election categories and years select elections,
/// districts and keywords select races within them.
#[derive(Debug, Clone, Default)]
pub struct ScrapeRequest {
    pub categories: Vec<ElectionCategory>,
    pub years: Vec<String>,
    pub districts: Vec<String>,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub dry_run: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub started_at: String,
    pub finished_at: String,
    pub dry_run: bool,
    pub elections: Vec<ElectionResult>,
}

impl RunResult {
    pub fn race_count(&self) -> usize {
        self.elections.iter().map(|election| election.races.len()).sum()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ElectionResult {
    pub election_id: String,
    pub year: String,
    pub name: String,
    pub link_text: String,
    pub races: Vec<RaceResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RaceResult {
    pub race_id: String,
    pub race_name: String,
    pub action: String,
    pub raw_path: String,
    pub clean_path: Option<String>,
    pub rows: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub message: String,
    pub elapsed: Option<Duration>,
}

pub trait ProgressSink {
    fn event(&self, event: ProgressEvent);
}

pub struct App<C: SiteClient> {
    store: Store,
    client: C,
    site: SiteConfig,
}

impl<C: SiteClient> App<C> {
    pub fn new(store: Store, client: C, site: SiteConfig) -> Self {
        Self {
            store,
            client,
            site,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn run(
        &self,
        request: &ScrapeRequest,
        options: RunOptions,
        sink: &dyn ProgressSink,
    ) -> Result<RunResult, ScrapeError> {
        let started_at = iso_timestamp();
        let election_filter = ElectionFilter::new(&request.categories, &request.years)?;
        let race_filter = RaceFilter::new(&request.districts, &request.keywords)?;

        if !options.dry_run {
            ensure_dir(self.store.root().as_std_path())?;
        }

        let index_url = self.site.index_url()?;
        sink.event(ProgressEvent {
            message: format!("phase=Listing; fetching {index_url}"),
            elapsed: None,
        });
        let start = Instant::now();
        let html = self.client.get_text(&index_url)?;
        let links = parse_election_links(&html, &self.site.base_url, &election_filter)?;
        sink.event(ProgressEvent {
            message: format!(
                "phase=Listing; {} elections match {:?} in years {:?}",
                links.len(),
                election_filter.labels(),
                election_filter.years()
            ),
            elapsed: Some(start.elapsed()),
        });

        let mut elections = Vec::with_capacity(links.len());
        for link in &links {
            elections.push(self.scrape_election(link, &race_filter, &options, sink)?);
        }

        Ok(RunResult {
            started_at,
            finished_at: iso_timestamp(),
            dry_run: options.dry_run,
            elections,
        })
    }

    fn scrape_election(
        &self,
        link: &ElectionLink,
        race_filter: &RaceFilter,
        options: &RunOptions,
        sink: &dyn ProgressSink,
    ) -> Result<ElectionResult, ScrapeError> {
        let year = link.year()?.to_string();
        let name = link.name();
        let page_url = self.site.join(&link.href)?;

        sink.event(ProgressEvent {
            message: format!("phase=Races; election {} ({})", link.election_id, link.text),
            elapsed: None,
        });
        let html = self.client.get_text(&page_url)?;
        let races: Vec<RaceOption> = parse_race_options(&html, &page_url)?
            .into_iter()
            .filter(|race| race_filter.matches(&race.race_name))
            .collect();
        sink.event(ProgressEvent {
            message: format!("phase=Races; {} races selected", races.len()),
            elapsed: None,
        });

        let export_base = self.site.export_url()?;
        let mut results = Vec::with_capacity(races.len());
        for race in races {
            if options.dry_run {
                results.push(RaceResult {
                    raw_path: self.store.raw_path(&year, &name, &race.race_name).to_string(),
                    race_id: race.race_id,
                    race_name: race.race_name,
                    action: "planned".to_string(),
                    clean_path: None,
                    rows: None,
                });
                continue;
            }

            let url = export_url(&export_base, &link.election_id, &race.race_id);
            sink.event(ProgressEvent {
                message: format!("phase=Export; {}", race.race_name),
                elapsed: None,
            });
            let start = Instant::now();
            let content = self.client.get_bytes(&url)?;
            let raw_path = self
                .store
                .write_raw(&year, &name, &race.race_name, &content)?;
            sink.event(ProgressEvent {
                message: format!("phase=Clean; {raw_path}"),
                elapsed: Some(start.elapsed()),
            });
            let cleaned = clean_file(&self.store, &raw_path)?;

            results.push(RaceResult {
                race_id: race.race_id,
                race_name: race.race_name,
                action: "downloaded".to_string(),
                raw_path: raw_path.to_string(),
                clean_path: Some(cleaned.path.to_string()),
                rows: Some(cleaned.rows),
            });
        }

        Ok(ElectionResult {
            election_id: link.election_id.clone(),
            year,
            name,
            link_text: link.text.clone(),
            races: results,
        })
    }
}

fn iso_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}
