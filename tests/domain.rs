use clap::ValueEnum;

use precinct_results::domain::{DistrictCode, ElectionCategory, ElectionLink, Party};

#[test]
fn party_codes_accept_aliases() {
    let cases = [
        ("d", Party::Dem),
        ("democrat", Party::Dem),
        ("Democratic", Party::Dem),
        ("r", Party::Rep),
        ("republican", Party::Rep),
        ("g", Party::Grn),
        ("green", Party::Grn),
        ("n", Party::NonPartisan),
        ("non", Party::NonPartisan),
        ("nonpartisan", Party::NonPartisan),
        ("non-partisan", Party::NonPartisan),
    ];
    for (input, expected) in cases {
        assert_eq!(Party::from_str(input, true), Ok(expected), "{input}");
    }
    assert!(Party::from_str("libertarian", true).is_err());
}

#[test]
fn category_labels() {
    assert_eq!(ElectionCategory::Primary.labels(), vec!["Primary"]);
    assert_eq!(
        ElectionCategory::PartyPrimary(Party::NonPartisan).labels(),
        vec!["Primary - Non-Partisan"]
    );
    assert_eq!(
        ElectionCategory::General.labels(),
        vec!["General Election", "Municipal General", "Geeral"]
    );
    assert_eq!(ElectionCategory::Runoff.labels(), vec!["Municipal Runoffs"]);
}

#[test]
fn district_codes_round_trip_through_display() {
    for code in ["W12", "pres", "IL3", "SS45", "SR20"] {
        let parsed: DistrictCode = code.parse().unwrap();
        assert_eq!(parsed.to_string(), code);
    }
}

#[test]
fn election_link_fields() {
    let link = ElectionLink {
        text: "2015 Municipal Runoffs - 4/7/2015".to_string(),
        href: "election-results-specifics.asp?election=9".to_string(),
        election_id: "9".to_string(),
    };
    assert_eq!(link.year().unwrap(), "2015");
    assert_eq!(link.name(), "Municipal Runoffs");
}
