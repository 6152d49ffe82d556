use regex::{Regex, RegexBuilder};
use tracing::warn;

use crate::domain::{DistrictCode, ElectionCategory};
use crate::error::ScrapeError;

const ORDINAL: &str = r"(?:st|nd|rd|th)";

/// Regex fragment matching the official race name for a district code.
pub fn district_pattern(code: DistrictCode) -> String {
    match code {
        DistrictCode::Ward(n) => format!(r"\balderman\W+{n}{ORDINAL}\s+ward\b"),
        DistrictCode::President => {
            r"\bpresident\s+and\s+vice[\s-]+president\b|\bpresident,?\s+u\.?\s?s\.?".to_string()
        }
        DistrictCode::Congress(n) => {
            format!(r"\bcongress\W+{n}{ORDINAL}\s+(?:congressional\s+)?district\b")
        }
        DistrictCode::StateSenate(n) => {
            format!(r"\bstate\s+senat(?:e|or)\W+{n}{ORDINAL}\s+(?:legislative\s+)?district\b")
        }
        DistrictCode::StateHouse(n) => {
            format!(r"\bstate\s+rep(?:resentative|\.)?\W+{n}{ORDINAL}\s+(?:representative\s+)?district\b")
        }
    }
}

/// Maps a raw code from the command line to its pattern, or `None` with a
/// notice when the code is not recognized.
pub fn map_district(code: &str) -> Option<String> {
    match code.parse::<DistrictCode>() {
        Ok(code) => Some(district_pattern(code)),
        Err(raw) => {
            warn!(code = %raw, "unrecognized district code, skipping");
            None
        }
    }
}

#[derive(Debug, Clone)]
pub enum RaceFilter {
    /// No district or keyword was requested.
    All,
    /// Codes or keywords were requested but none produced a pattern.
    Nothing,
    Pattern(Regex),
}

impl RaceFilter {
    pub fn new(districts: &[String], keywords: &[String]) -> Result<Self, ScrapeError> {
        if districts.is_empty() && keywords.is_empty() {
            return Ok(RaceFilter::All);
        }

        let mut fragments: Vec<String> = districts
            .iter()
            .filter_map(|code| map_district(code))
            .collect();
        fragments.extend(
            keywords
                .iter()
                .map(|keyword| keyword.trim())
                .filter(|keyword| !keyword.is_empty())
                .map(regex::escape),
        );

        if fragments.is_empty() {
            warn!("no usable district code or keyword given; no race will be selected");
            return Ok(RaceFilter::Nothing);
        }

        let combined = fragments
            .iter()
            .map(|fragment| format!("(?:{fragment})"))
            .collect::<Vec<_>>()
            .join("|");
        let regex = RegexBuilder::new(&combined)
            .case_insensitive(true)
            .build()
            .map_err(|err| ScrapeError::InvalidPattern(err.to_string()))?;
        Ok(RaceFilter::Pattern(regex))
    }

    pub fn matches(&self, race_name: &str) -> bool {
        match self {
            RaceFilter::All => true,
            RaceFilter::Nothing => false,
            RaceFilter::Pattern(regex) => regex.is_match(race_name),
        }
    }
}

/// Predicate over the link text of the results index.
#[derive(Debug, Clone)]
pub struct ElectionFilter {
    labels: Vec<String>,
    years: Vec<String>,
}

impl ElectionFilter {
    pub fn new(categories: &[ElectionCategory], years: &[String]) -> Result<Self, ScrapeError> {
        let years: Vec<String> = years
            .iter()
            .map(|year| year.trim().to_string())
            .filter(|year| !year.is_empty())
            .collect();
        let mut labels = Vec::new();
        for category in categories {
            for label in category.labels() {
                if !labels.contains(&label) {
                    labels.push(label);
                }
            }
        }
        if labels.is_empty() && years.is_empty() {
            return Err(ScrapeError::EmptySelection);
        }
        Ok(Self { labels, years })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn years(&self) -> &[String] {
        &self.years
    }

    pub fn matches(&self, text: &str) -> bool {
        let category_ok =
            self.labels.is_empty() || self.labels.iter().any(|label| text.contains(label.as_str()));
        let year_ok =
            self.years.is_empty() || self.years.iter().any(|year| text.contains(year.as_str()));
        category_ok && year_ok
    }
}
