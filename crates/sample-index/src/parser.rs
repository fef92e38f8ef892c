//! File name parsing.
//!
//! Result files are named either `<sample>.<ext>` or
//! `<sample>__<label>.<ext>`. Both conventions go through the same rule: the
//! stem is split at the first [`LABEL_SEPARATOR`], and a stem without one is
//! the sample identifier on its own with the [`MAIN_LABEL`] label.

use crate::kinds::SupportedKinds;
use crate::types::{FileEntry, ParsedFile, MAIN_LABEL};

pub const LABEL_SEPARATOR: &str = "__";

/// Parses a listing entry. Directories and hidden entries are not indexable.
pub fn parse_entry(entry: &FileEntry, kinds: &SupportedKinds) -> Option<ParsedFile> {
    if entry.is_dir {
        return None;
    }
    parse_file_name(&entry.name, kinds)
}

/// Splits a file name into sample identifier and label.
///
/// Returns `None` for names that are not part of the index: hidden names,
/// unsupported extensions, and names without a sample identifier.
pub fn parse_file_name(name: &str, kinds: &SupportedKinds) -> Option<ParsedFile> {
    if name.is_empty() || name.starts_with('.') {
        return None;
    }

    let (stem, raw_extension) = name.rsplit_once('.')?;
    let extension = raw_extension.to_ascii_lowercase();
    let kind = kinds.kind_of(&extension)?;

    let (sample_id, label, natural_main) = match stem.split_once(LABEL_SEPARATOR) {
        Some((sample_id, label)) => {
            let label = if label.is_empty() { MAIN_LABEL } else { label };
            (sample_id, label, false)
        }
        None => (stem, MAIN_LABEL, true),
    };

    if sample_id.is_empty() {
        return None;
    }

    Some(ParsedFile {
        sample_id: sample_id.to_string(),
        label: label.to_string(),
        kind,
        extension,
        natural_main,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FileKind;

    fn parse(name: &str) -> Option<ParsedFile> {
        parse_file_name(name, &SupportedKinds::default())
    }

    #[test]
    fn unsuffixed_name_is_its_own_sample() {
        let parsed = parse("B_002.jpg").expect("parsed");
        assert_eq!(parsed.sample_id, "B_002");
        assert_eq!(parsed.label, MAIN_LABEL);
        assert_eq!(parsed.kind, FileKind::Image);
        assert!(parsed.natural_main);
    }

    #[test]
    fn labelled_name_splits_at_separator() {
        let parsed = parse("A_001__Spectrum.pdf").expect("parsed");
        assert_eq!(parsed.sample_id, "A_001");
        assert_eq!(parsed.label, "Spectrum");
        assert_eq!(parsed.kind, FileKind::Document);
        assert!(!parsed.natural_main);
    }

    #[test]
    fn split_happens_at_first_separator() {
        let parsed = parse("ADOM_001__spectrum__2.png").expect("parsed");
        assert_eq!(parsed.sample_id, "ADOM_001");
        assert_eq!(parsed.label, "spectrum__2");
    }

    #[test]
    fn explicit_main_label_is_still_labelled() {
        let parsed = parse("A_001__Main.png").expect("parsed");
        assert_eq!(parsed.label, "Main");
        assert!(!parsed.natural_main);
    }

    #[test]
    fn single_underscores_do_not_split() {
        let parsed = parse("ADOM_001_stats.csv").expect("parsed");
        assert_eq!(parsed.sample_id, "ADOM_001_stats");
        assert_eq!(parsed.kind, FileKind::Table);
    }

    #[test]
    fn extension_match_ignores_case() {
        let parsed = parse("C_3.PNG").expect("parsed");
        assert_eq!(parsed.extension, "png");
    }

    #[test]
    fn stem_keeps_inner_dots() {
        let parsed = parse("run.1__fit.svg").expect("parsed");
        assert_eq!(parsed.sample_id, "run.1");
        assert_eq!(parsed.label, "fit");
    }

    #[test]
    fn trailing_separator_falls_back_to_main_label() {
        let parsed = parse("A__.png").expect("parsed");
        assert_eq!(parsed.sample_id, "A");
        assert_eq!(parsed.label, MAIN_LABEL);
        assert!(!parsed.natural_main);
    }

    #[test]
    fn non_indexable_names_are_skipped() {
        assert!(parse(".DS_Store").is_none());
        assert!(parse(".hidden.png").is_none());
        assert!(parse("notes.txt").is_none());
        assert!(parse("README").is_none());
        assert!(parse("__orphan.png").is_none());
        assert!(parse("").is_none());
    }

    #[test]
    fn directories_are_skipped() {
        let mut entry = FileEntry::file("graphs.png", "/data/graphs.png");
        entry.is_dir = true;
        assert!(parse_entry(&entry, &SupportedKinds::default()).is_none());
    }

    #[test]
    fn narrowed_kinds_skip_tables() {
        let kinds = SupportedKinds::from_extensions(["png", "pdf"]).expect("kinds");
        assert!(parse_file_name("A_001__stats.xlsx", &kinds).is_none());
        assert!(parse_file_name("A_001.png", &kinds).is_some());
    }
}
