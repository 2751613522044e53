// Integration tests for building the character index from files

use mojifinder::core::config::IndexConfig;
use mojifinder::{CharIndex, Index};
use std::fs;
use tempfile::TempDir;

/// A few lines in full UnicodeData.txt layout
const UNICODE_DATA: &str = "\
0000;<control>;Cc;0;BN;;;;;N;NULL;;;;
0041;LATIN CAPITAL LETTER A;Lu;0;L;;;;;N;;;;0061;
0061;LATIN SMALL LETTER A;Ll;0;L;;;;;N;;;0041;;0041
263A;WHITE SMILING FACE;So;0;ON;;;;;N;;;;;
263B;BLACK SMILING FACE;So;0;ON;;;;;N;;;;;
4E00;<CJK Ideograph, First>;Lo;0;L;;;;;N;;;;;
1F600;GRINNING FACE;So;0;ON;;;;;N;;;;;
";

fn write_table(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("UnicodeData.txt");
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_load_unicode_data_file() {
    let temp = TempDir::new().unwrap();
    let path = write_table(&temp, UNICODE_DATA);

    let index = CharIndex::from_file(&path, 32..=0x10FFFF).unwrap();
    assert_eq!(index.len(), 5);
    assert_eq!(index.name('\u{263A}'), Some("WHITE SMILING FACE"));
    assert_eq!(index.name('\u{4E00}'), None);

    assert_eq!(index.search("face"), vec!['\u{263A}', '\u{263B}', '\u{1F600}']);
    assert_eq!(index.search("smiling face black"), vec!['\u{263B}']);
    assert_eq!(index.search("letter a"), vec!['A', 'a']);
}

#[test]
fn test_load_respects_code_point_range() {
    let temp = TempDir::new().unwrap();
    let path = write_table(&temp, UNICODE_DATA);

    let config = IndexConfig {
        data_file: Some(path),
        first_code_point: 0x100,
        last_code_point: 0xFFFF,
    };
    let index = CharIndex::from_config(&config).unwrap();
    assert_eq!(index.len(), 2);
    assert!(index.search("letter").is_empty());
    assert!(index.search("grinning").is_empty());
}

#[test]
fn test_malformed_table_reports_line() {
    let temp = TempDir::new().unwrap();
    let path = write_table(&temp, "0041;LATIN CAPITAL LETTER A\nZZZZ;BROKEN\n");

    let err = CharIndex::from_file(&path, 32..=0x10FFFF).unwrap_err();
    assert!(err.to_string().contains("line 2"));
}

#[test]
fn test_missing_table_is_config_error() {
    let temp = TempDir::new().unwrap();
    let err = CharIndex::from_file(temp.path().join("absent.txt"), 32..=0x10FFFF).unwrap_err();
    assert!(err.is_config_error());
}

#[test]
fn test_default_config_uses_bundled_table() {
    let index = CharIndex::from_config(&IndexConfig::default()).unwrap();
    assert!(!index.is_empty());

    assert_eq!(index.search("hiragana letter a"), vec!['\u{3041}', '\u{3042}']);
    assert_eq!(index.search("arabic letter alef").len(), 46);
    assert_eq!(index.search("cjk unified ideograph").len(), 92_905);

    let found = index.search("cat face");
    assert_eq!(found.first(), Some(&'\u{1F431}'));
    assert_eq!(
        index.format(&found[..1]),
        vec!["U+1F431\t\u{1F431}\tCAT FACE".to_string()]
    );
}
