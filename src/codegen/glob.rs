//! CWL output glob → Galaxy `discover_datasets` pattern.
//!
//! Galaxy discovers output files with a Python regex whose named group
//! `designation` becomes the dataset identifier.

use crate::parse::is_expression;

/// Galaxy's built-in pattern that takes every file, named after itself.
pub const DESIGNATION: &str = "__designation__";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovery {
    pub pattern: String,
    /// Directory the pattern is matched in, relative to the job working directory.
    pub directory: Option<String>,
}

/// Build the discovery for a glob. `scatter` appends `*` so one glob
/// collects every file an array output produced.
pub fn discovery(glob: Option<&str>, scatter: bool) -> Discovery {
    let Some(glob) = glob.filter(|g| !is_expression(g)) else {
        return Discovery {
            pattern: DESIGNATION.to_string(),
            directory: None,
        };
    };

    let (directory, file) = match glob.rsplit_once('/') {
        Some((dir, file)) => (Some(dir).filter(|d| !d.is_empty()), file),
        None => (None, glob),
    };

    let pattern = if file.is_empty() {
        DESIGNATION.to_string()
    } else if scatter {
        designation_pattern(&format!("{file}*"))
    } else {
        designation_pattern(file)
    };

    Discovery {
        pattern,
        directory: directory.map(str::to_string),
    }
}

/// `out_*.txt` → `(?P<designation>out_.*\.txt)$`
pub fn designation_pattern(file_glob: &str) -> String {
    format!("(?P<designation>{})$", glob_to_regex(file_glob))
}

/// Translate shell-glob syntax into regex syntax, fnmatch style.
///
/// An unterminated `[` is a literal bracket.
pub fn glob_to_regex(glob: &str) -> String {
    let chars: Vec<char> = glob.chars().collect();
    let mut out = String::with_capacity(glob.len() * 2);
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        i += 1;
        match c {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            '[' => {
                let mut j = i;
                if j < chars.len() && chars[j] == '!' {
                    j += 1;
                }
                if j < chars.len() && chars[j] == ']' {
                    j += 1;
                }
                while j < chars.len() && chars[j] != ']' {
                    j += 1;
                }
                if j >= chars.len() {
                    out.push_str(r"\[");
                    continue;
                }
                let set: String = chars[i..j].iter().collect();
                i = j + 1;
                out.push('[');
                let body = match set.strip_prefix('!') {
                    Some(negated) => {
                        out.push('^');
                        negated
                    }
                    None => {
                        if set.starts_with('^') {
                            out.push('\\');
                        }
                        set.as_str()
                    }
                };
                for ch in body.chars() {
                    if matches!(ch, '\\' | '[') {
                        out.push('\\');
                    }
                    out.push(ch);
                }
                out.push(']');
            }
            other => out.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcards_and_literals() {
        assert_eq!(glob_to_regex("*.txt"), r".*\.txt");
        assert_eq!(glob_to_regex("part_?.log"), r"part_.\.log");
        assert_eq!(glob_to_regex("a+b(1)"), r"a\+b\(1\)");
    }

    #[test]
    fn bracket_sets() {
        assert_eq!(glob_to_regex("[abc].txt"), r"[abc]\.txt");
        assert_eq!(glob_to_regex("[!0-9]x"), "[^0-9]x");
        assert_eq!(glob_to_regex("[^a]"), r"[\^a]");
        assert_eq!(glob_to_regex("[]]"), "[]]");
        assert_eq!(glob_to_regex("[abc"), r"\[abc");
    }

    #[test]
    fn slash_splits_directory() {
        let d = discovery(Some("results/*.bam"), false);
        assert_eq!(d.directory.as_deref(), Some("results"));
        assert_eq!(d.pattern, r"(?P<designation>.*\.bam)$");

        let d = discovery(Some("out.txt"), false);
        assert_eq!(d.directory, None);
        assert_eq!(d.pattern, r"(?P<designation>out\.txt)$");
    }

    #[test]
    fn scatter_appends_star() {
        let d = discovery(Some("chunk_"), true);
        assert_eq!(d.pattern, "(?P<designation>chunk_.*)$");
    }

    #[test]
    fn expressions_and_missing_globs_use_designation() {
        for glob in [None, Some("$(inputs.name).txt"), Some("${ return 'x'; }"), Some("outdir/")] {
            assert_eq!(discovery(glob, false).pattern, DESIGNATION);
        }
        assert_eq!(discovery(Some("outdir/"), false).directory.as_deref(), Some("outdir"));
    }
}
