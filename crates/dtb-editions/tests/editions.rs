use std::fs;

use dtb_editions::hash::sha256_hex;
use dtb_editions::{EditionError, EditionRegistry, load_registry, verify_source};
use dtb_model::{ColumnLayout, ModelError};

const OVERRIDE: &str = r#"
[manifest]
schema = "dtb-editions"
schema_version = 1

[[editions]]
year = 2018
layout = "six-level"
file = "DTB_2018.xls"
sheet = "DTB_2018_Subdistrito"

[[editions]]
year = 2000
layout = "six-level-gapped"
file = "DTB_2000.csv"
skip_rows = 2

[[editions]]
year = 1991
layout = "fixed-width"
file = "DTB1991.TXT"
"#;

#[test]
fn loads_override_file() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("editions.toml");
    fs::write(&path, OVERRIDE).expect("write editions file");

    let registry = load_registry(Some(&path)).expect("load registry");
    assert_eq!(registry.len(), 3);

    let edition = registry.get(2018).expect("2018 edition");
    assert_eq!(edition.layout, ColumnLayout::SixLevel);
    assert_eq!(edition.sheet.as_deref(), Some("DTB_2018_Subdistrito"));
    assert_eq!(edition.skip_rows, 1);

    assert_eq!(registry.get(2000).expect("2000 edition").skip_rows, 2);
    assert_eq!(registry.get(1991).expect("1991 edition").skip_rows, 0);
    assert!(registry.get(2010).is_err());
}

#[test]
fn unknown_layout_is_a_configuration_error() {
    let text = OVERRIDE.replace("\"six-level-gapped\"", "\"seven-level\"");
    let error = EditionRegistry::from_toml_str(&text, "inline").expect_err("bad layout");
    match error {
        EditionError::Layout { year, source } => {
            assert_eq!(year, 2000);
            assert_eq!(source, ModelError::UnknownLayout("seven-level".to_string()));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn rejects_duplicate_years() {
    let text = format!(
        "{OVERRIDE}\n[[editions]]\nyear = 2018\nlayout = \"four-level\"\nfile = \"x.xls\"\n"
    );
    let error = EditionRegistry::from_toml_str(&text, "inline").expect_err("duplicate");
    assert!(matches!(error, EditionError::DuplicateEdition { year: 2018 }));
}

#[test]
fn rejects_wrong_schema() {
    let text = OVERRIDE.replace("schema = \"dtb-editions\"", "schema = \"other\"");
    let error = EditionRegistry::from_toml_str(&text, "inline").expect_err("schema");
    assert!(matches!(error, EditionError::InvalidTable { .. }));
}

#[test]
fn verifies_pinned_checksum() {
    let bytes = b"35,S\xe3o Paulo\n";
    let pinned = sha256_hex(bytes);
    let text = format!(
        "[manifest]\nschema = \"dtb-editions\"\nschema_version = 1\n\n\
         [[editions]]\nyear = 1950\nlayout = \"two-level\"\nfile = \"DTB_1950.csv\"\nsha256 = \"{}\"\n",
        pinned.to_uppercase()
    );
    let registry = EditionRegistry::from_toml_str(&text, "inline").expect("load");
    let edition = registry.get(1950).expect("1950 edition");
    assert_eq!(edition.sha256.as_deref(), Some(pinned.as_str()));

    verify_source(edition, bytes).expect("matching checksum");
    let error = verify_source(edition, b"tampered").expect_err("mismatch");
    assert!(matches!(error, EditionError::Sha256Mismatch { .. }));
}

#[test]
fn unpinned_editions_always_verify() {
    let registry = EditionRegistry::builtin();
    let edition = registry.get(2010).expect("2010 edition");
    verify_source(edition, b"anything").expect("no pin");
}
