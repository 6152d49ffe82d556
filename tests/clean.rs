mod common;

use assert_matches::assert_matches;
use camino::{Utf8Path, Utf8PathBuf};

use common::{Precinct, export_document, precincts, ward_table};
use precinct_results::clean::clean_file;
use precinct_results::error::ScrapeError;
use precinct_results::store::Store;

fn store_in(temp: &tempfile::TempDir) -> Store {
    Store::new(Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap())
}

fn write_raw(store: &Store, content: &[u8]) -> Utf8PathBuf {
    store
        .write_raw("2019", "Municipal General", "Mayor", content)
        .unwrap()
}

fn read_lines(path: &Utf8Path) -> Vec<String> {
    std::fs::read_to_string(path.as_std_path())
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn ten_row_ward_table_yields_seven_records() {
    let temp = tempfile::tempdir().unwrap();
    let store = store_in(&temp);
    let raw = write_raw(&store, export_document(&[(3, precincts(7))]).as_bytes());

    let output = clean_file(&store, &raw).unwrap();
    assert_eq!(output.wards, 1);
    assert_eq!(output.rows, 7);
    assert!(
        output
            .path
            .ends_with("clean/2019/2019 Municipal General Mayor.tsv")
    );

    let lines = read_lines(&output.path);
    assert_eq!(lines.len(), 8);
    assert_eq!(
        lines[0],
        "Precinct\tVotes\tvotes|Jane Smith\tpct|Jane Smith\tvotes|John Jones\tpct|John Jones"
    );
    assert_eq!(lines[1], "03001\t152\t101\t66.45\t51\t33.55");
    assert!(lines.iter().all(|line| !line.contains("Total")));
}

#[test]
fn precinct_codes_are_ward_plus_precinct() {
    let temp = tempfile::tempdir().unwrap();
    let store = store_in(&temp);
    let raw = write_raw(
        &store,
        export_document(&[(3, precincts(12)), (41, precincts(2))]).as_bytes(),
    );

    let output = clean_file(&store, &raw).unwrap();
    let codes: Vec<String> = read_lines(&output.path)
        .iter()
        .skip(1)
        .map(|line| line.split('\t').next().unwrap().to_string())
        .collect();
    assert_eq!(codes.len(), 14);
    assert!(codes.iter().all(|code| code.len() == 5));
    assert_eq!(codes[11], "03012");
    assert_eq!(codes[12], "41001");
    assert_eq!(codes[13], "41002");
}

#[test]
fn percent_columns_pair_with_their_candidate() {
    let temp = tempfile::tempdir().unwrap();
    let store = store_in(&temp);
    let raw = write_raw(&store, export_document(&[(1, precincts(3))]).as_bytes());

    let output = clean_file(&store, &raw).unwrap();
    let lines = read_lines(&output.path);
    let header: Vec<&str> = lines[0].split('\t').collect();
    assert!(!header.contains(&"%"));
    let votes = header.iter().position(|h| *h == "votes|Jane Smith").unwrap();
    assert_eq!(header[votes + 1], "pct|Jane Smith");

    for line in &lines[1..] {
        assert!(!line.contains('%'));
    }
}

#[test]
fn cleaning_is_idempotent() {
    let temp = tempfile::tempdir().unwrap();
    let store = store_in(&temp);
    let raw = write_raw(
        &store,
        export_document(&[(2, precincts(4)), (5, precincts(3))]).as_bytes(),
    );

    let first = clean_file(&store, &raw).unwrap();
    let first_bytes = std::fs::read(first.path.as_std_path()).unwrap();
    let second = clean_file(&store, &raw).unwrap();
    let second_bytes = std::fs::read(second.path.as_std_path()).unwrap();
    assert_eq!(first.path, second.path);
    assert_eq!(first_bytes, second_bytes);
}

#[test]
fn utf8_headers_are_repaired() {
    let temp = tempfile::tempdir().unwrap();
    let store = store_in(&temp);
    let html = export_document(&[(1, precincts(1))]).replace("JOHN JONES", "JOSÉ NUÑEZ");
    let raw = write_raw(&store, html.as_bytes());

    let output = clean_file(&store, &raw).unwrap();
    let lines = read_lines(&output.path);
    assert!(lines[0].contains("votes|José Nuñez\tpct|José Nuñez"));
}

#[test]
fn missing_ward_marker_aborts() {
    let temp = tempfile::tempdir().unwrap();
    let store = store_in(&temp);
    let html = export_document(&[(1, precincts(2))]).replace("Ward 1", "Precincts");
    let raw = write_raw(&store, html.as_bytes());

    let err = clean_file(&store, &raw).unwrap_err();
    assert_matches!(err, ScrapeError::MissingWardMarker { table: 1, .. });
    assert!(!store.clean_path_for(&raw).unwrap().as_std_path().exists());
}

#[test]
fn unparseable_precinct_aborts() {
    let temp = tempfile::tempdir().unwrap();
    let store = store_in(&temp);
    let mut rows = precincts(2);
    rows.push(Precinct {
        number: 3,
        smith: 1,
        jones: 1,
    });
    let html = format!(
        "<table><tr><td>cover</td></tr></table>{}",
        ward_table(4, &rows).replace("<tr><td>3</td>", "<tr><td>3A</td>")
    );
    let raw = write_raw(&store, html.as_bytes());

    let err = clean_file(&store, &raw).unwrap_err();
    assert_matches!(err, ScrapeError::InvalidPrecinct { ward: 4, ref value, .. } if value == "3A");
}

#[test]
fn export_without_ward_tables_is_rejected() {
    let temp = tempfile::tempdir().unwrap();
    let store = store_in(&temp);
    let raw = write_raw(&store, b"<table><tr><td>cover</td></tr></table>");

    let err = clean_file(&store, &raw).unwrap_err();
    assert_matches!(err, ScrapeError::NoWardTables(_));
    assert!(err.is_malformed_export());
}

#[test]
fn wide_ward_marker_adds_no_columns() {
    let temp = tempfile::tempdir().unwrap();
    let store = store_in(&temp);
    let html = concat!(
        "<table><tr><td>cover</td></tr></table>",
        "<table>",
        "<tr><td colspan=\"8\">Ward 7</td></tr>",
        "<tr><td>Precinct</td><td>A</td><td>%</td></tr>",
        "<tr><td>1</td><td>3</td><td>50%</td></tr>",
        "<tr><td>Total</td><td>3</td><td>50%</td></tr>",
        "</table>",
    );
    let raw = write_raw(&store, html.as_bytes());

    let cleaned = clean_file(&store, &raw).unwrap();
    assert_eq!(
        std::fs::read_to_string(cleaned.path.as_std_path()).unwrap(),
        "Precinct\tvotes|A\tpct|A\n07001\t3\t50\n"
    );
}
