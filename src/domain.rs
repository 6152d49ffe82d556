use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::ScrapeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Party {
    #[value(name = "dem", aliases = ["d", "democrat", "democratic"])]
    Dem,
    #[value(name = "rep", aliases = ["r", "republican"])]
    Rep,
    #[value(name = "grn", aliases = ["g", "green"])]
    Grn,
    #[value(name = "np", aliases = ["n", "non", "nonpartisan", "non-partisan"])]
    NonPartisan,
}

impl Party {
    /// Suffix the results index uses after `Primary - `.
    pub fn site_label(&self) -> &'static str {
        match self {
            Party::Dem => "DEM",
            Party::Rep => "REP",
            Party::Grn => "GRN",
            Party::NonPartisan => "Non-Partisan",
        }
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.site_label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElectionCategory {
    Primary,
    PartyPrimary(Party),
    General,
    Runoff,
}

impl ElectionCategory {
    /// Substrings of the index link text that identify this category.
    pub fn labels(&self) -> Vec<String> {
        match self {
            ElectionCategory::Primary => vec!["Primary".to_string()],
            ElectionCategory::PartyPrimary(party) => {
                vec![format!("Primary - {}", party.site_label())]
            }
            ElectionCategory::General => vec![
                "General Election".to_string(),
                "Municipal General".to_string(),
                "Geeral".to_string(),
            ],
            ElectionCategory::Runoff => vec!["Municipal Runoffs".to_string()],
        }
    }
}

/// Short district code given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DistrictCode {
    Ward(u32),
    President,
    Congress(u32),
    StateSenate(u32),
    StateHouse(u32),
}

impl fmt::Display for DistrictCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistrictCode::Ward(n) => write!(f, "W{n}"),
            DistrictCode::President => write!(f, "pres"),
            DistrictCode::Congress(n) => write!(f, "IL{n}"),
            DistrictCode::StateSenate(n) => write!(f, "SS{n}"),
            DistrictCode::StateHouse(n) => write!(f, "SR{n}"),
        }
    }
}

impl FromStr for DistrictCode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_uppercase();
        if normalized == "PRES" {
            return Ok(DistrictCode::President);
        }

        let split = normalized
            .find(|ch: char| ch.is_ascii_digit())
            .ok_or_else(|| value.to_string())?;
        let (prefix, digits) = normalized.split_at(split);
        if !digits.chars().all(|ch| ch.is_ascii_digit()) || digits.starts_with('0') {
            return Err(value.to_string());
        }
        let number: u32 = digits.parse().map_err(|_| value.to_string())?;

        let (code, max) = match prefix {
            "W" => (DistrictCode::Ward(number), 50),
            "IL" => (DistrictCode::Congress(number), 9),
            "SS" => (DistrictCode::StateSenate(number), 118),
            "SR" => (DistrictCode::StateHouse(number), 59),
            _ => return Err(value.to_string()),
        };
        if number > max {
            return Err(value.to_string());
        }
        Ok(code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElectionLink {
    pub text: String,
    pub href: String,
    pub election_id: String,
}

impl ElectionLink {
    /// First whitespace-separated token of the link text.
    pub fn year(&self) -> Result<&str, ScrapeError> {
        self.text
            .split_whitespace()
            .next()
            .ok_or_else(|| ScrapeError::MissingElectionYear(self.text.clone()))
    }

    /// Text between the year and the trailing ` - <date>` suffix.
    pub fn name(&self) -> String {
        let text = self.text.trim();
        let rest = match text.split_once(char::is_whitespace) {
            Some((_, rest)) => rest.trim(),
            None => return String::new(),
        };
        match rest.rsplit_once(" - ") {
            Some((name, _date)) => name.trim().to_string(),
            None => rest.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RaceOption {
    pub race_id: String,
    pub race_name: String,
}
