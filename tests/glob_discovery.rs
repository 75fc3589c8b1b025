//! Discovery patterns must select the same files the CWL glob would.
//!
//! `glob::Pattern` is the oracle; the generated pattern is compiled with
//! `regex` and anchored at the start the way Galaxy applies it.

use cwl2galaxy::codegen::glob::{DESIGNATION, discovery};
use regex::Regex;

const FILES: &[&str] = &[
    "report.txt",
    "report.html",
    "sample_1_fastqc.html",
    "sample_12_fastqc.zip",
    "part_a.log",
    "part_ab.log",
    "part_9.log",
    "a+b(1).txt",
    "notes.md",
    "x",
];

fn compile(pattern: &str) -> Regex {
    Regex::new(&format!("^{pattern}")).unwrap()
}

fn assert_agrees(glob: &str) {
    let oracle = glob::Pattern::new(glob).unwrap();
    let found = discovery(Some(glob), false);
    assert_ne!(found.pattern, DESIGNATION, "{glob}");
    let re = compile(&found.pattern);
    for file in FILES {
        assert_eq!(
            re.is_match(file),
            oracle.matches(file),
            "glob {glob:?} vs pattern {:?} on {file:?}",
            found.pattern
        );
    }
}

#[test]
fn plain_globs_agree_with_glob_matching() {
    for glob in [
        "*.txt",
        "*_fastqc.html",
        "part_?.log",
        "part_[ab].log",
        "part_[!ab].log",
        "part_[0-9].log",
        "a+b(1).txt",
        "report.*",
        "*",
    ] {
        assert_agrees(glob);
    }
}

#[test]
fn directory_globs_match_within_directory() {
    for glob in ["results/*.txt", "out/nested/part_?.log"] {
        let oracle = glob::Pattern::new(glob).unwrap();
        let found = discovery(Some(glob), false);
        let directory = found.directory.clone().expect("directory split off");
        let re = compile(&found.pattern);
        for file in FILES {
            let path = format!("{directory}/{file}");
            assert_eq!(re.is_match(file), oracle.matches(&path), "{glob} on {path}");
        }
    }
}

#[test]
fn scattered_globs_match_every_prefixed_file() {
    let found = discovery(Some("part_"), true);
    let re = compile(&found.pattern);
    let oracle = glob::Pattern::new("part_*").unwrap();
    for file in FILES {
        assert_eq!(re.is_match(file), oracle.matches(file), "{file}");
    }
}

#[test]
fn designation_group_captures_whole_name() {
    let found = discovery(Some("*_fastqc.html"), false);
    let caps = compile(&found.pattern)
        .captures("sample_1_fastqc.html")
        .unwrap();
    assert_eq!(&caps["designation"], "sample_1_fastqc.html");
}
