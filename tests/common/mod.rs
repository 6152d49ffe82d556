#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use reqwest::Url;

use precinct_results::error::ScrapeError;
use precinct_results::site::SiteClient;

pub struct Precinct {
    pub number: u32,
    pub smith: u32,
    pub jones: u32,
}

pub fn precincts(count: u32) -> Vec<Precinct> {
    (1..=count)
        .map(|number| Precinct {
            number,
            smith: 100 + number,
            jones: 50 + number,
        })
        .collect()
}

/// One ward table: marker row, header row, precinct rows, totals row.
pub fn ward_table(ward: u32, precincts: &[Precinct]) -> String {
    let mut html = String::from("<table>\n");
    html.push_str(&format!(
        "<tr><td colspan=\"6\">Ward {ward}</td></tr>\n"
    ));
    html.push_str(
        "<tr><td>PRECINCT</td><td>VOTES</td><td>JANE SMITH</td><td>%</td><td>JOHN JONES</td><td>%</td></tr>\n",
    );
    let (mut total_smith, mut total_jones) = (0, 0);
    for precinct in precincts {
        let votes = precinct.smith + precinct.jones;
        html.push_str(&format!(
            "<tr><td>{}</td><td>{votes}</td><td>{}</td><td>{:.2}%</td><td>{}</td><td>{:.2}%</td></tr>\n",
            precinct.number,
            precinct.smith,
            precinct.smith as f64 * 100.0 / votes as f64,
            precinct.jones,
            precinct.jones as f64 * 100.0 / votes as f64,
        ));
        total_smith += precinct.smith;
        total_jones += precinct.jones;
    }
    html.push_str(&format!(
        "<tr><td>Total</td><td>{}</td><td>{total_smith}</td><td></td><td>{total_jones}</td><td></td></tr>\n",
        total_smith + total_jones
    ));
    html.push_str("</table>\n");
    html
}

pub fn export_document(wards: &[(u32, Vec<Precinct>)]) -> String {
    let mut html = String::from(
        "<html><body>\n<table><tr><td>Municipal General - 2/26/2019</td></tr><tr><td>Mayor</td></tr></table>\n",
    );
    for (ward, precincts) in wards {
        html.push_str(&ward_table(*ward, precincts));
    }
    html.push_str("</body></html>\n");
    html
}

/// Serves canned pages keyed by full URL and records every request.
#[derive(Default)]
pub struct MockSite {
    pages: HashMap<String, Vec<u8>>,
    requests: Mutex<Vec<String>>,
}

impl MockSite {
    pub fn page(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
        self.pages.insert(url.to_string(), body.into());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn lookup(&self, url: &Url) -> Result<Vec<u8>, ScrapeError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.pages
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| ScrapeError::Status {
                status: 404,
                url: url.to_string(),
            })
    }
}

impl SiteClient for MockSite {
    fn get_text(&self, url: &Url) -> Result<String, ScrapeError> {
        let bytes = self.lookup(url)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn get_bytes(&self, url: &Url) -> Result<Vec<u8>, ScrapeError> {
        self.lookup(url)
    }
}
