use std::{
    fmt::{self, Write as _},
    fs,
    path::{Path, PathBuf},
};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{errors::AppResult, models::domain::Bundle};

static FILE_EXTENSION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\.[^/.]+$").expect("FILE_EXTENSION_REGEX is a valid regex pattern")
});

static UNSAFE_FILE_CHARS_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[/\\:*?"<>|\x00-\x1F]"#).expect("UNSAFE_FILE_CHARS_REGEX is a valid regex pattern")
});

const FALLBACK_FILE_STEM: &str = "StudyAids";

/// `notes.pdf` becomes `notes_StudyAids.txt`; a name that is only an
/// extension falls back to `StudyAids_StudyAids.txt`. Path separators and
/// other characters a file name cannot hold become `_`, so the result is
/// always a single component inside the export directory.
pub fn study_aids_file_name(document_name: &str) -> String {
    let stem = FILE_EXTENSION_REGEX.replace(document_name, "");
    let stem = UNSAFE_FILE_CHARS_REGEX.replace_all(&stem, "_");
    let stem = stem.trim_matches(|c: char| c == '.' || c.is_whitespace());
    let stem = if stem.is_empty() { FALLBACK_FILE_STEM } else { stem };
    format!("{}_StudyAids.txt", stem)
}

/// Plain-text study sheet: summary, sections, then each question with its
/// lettered options and the reason. The correct answer itself is left out.
pub fn render_study_aids(bundle: &Bundle) -> String {
    let mut out = String::new();
    // writing into a String never fails
    let _ = write_study_sheet(&mut out, bundle);
    out
}

fn write_study_sheet(out: &mut impl fmt::Write, bundle: &Bundle) -> fmt::Result {
    writeln!(out, "Study Aids for: {}\n", bundle.document_name)?;

    writeln!(out, "SUMMARY\n")?;
    writeln!(out, "{}\n", bundle.summary.main_text.trim())?;

    if let Some(sections) = bundle
        .summary
        .section_text
        .as_deref()
        .filter(|s| !s.trim().is_empty())
    {
        writeln!(out, "Section Summaries:\n")?;
        writeln!(out, "{}\n", sections.trim())?;
    }

    writeln!(out, "QUIZ\n")?;
    for (i, question) in bundle.quiz.questions.iter().enumerate() {
        writeln!(out, "Q{}: {}", i + 1, question.text)?;
        for (letter, option) in ('a'..='z').zip(&question.options) {
            writeln!(out, "  {}) {}", letter, option)?;
        }
        writeln!(out, "Reason for correct answer: {}\n", question.reason)?;
    }
    Ok(())
}

pub fn write_study_aids(bundle: &Bundle, dir: impl AsRef<Path>) -> AppResult<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let path = dir.join(study_aids_file_name(&bundle.document_name));
    fs::write(&path, render_study_aids(bundle))?;
    log::info!(
        "Wrote study aids for '{}' to {}",
        bundle.document_name,
        path.display()
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::{Question, Quiz, Summary};

    fn bundle() -> Bundle {
        Bundle::new(
            "chapter1.pdf",
            Summary::new("Numbers add up.").with_sections("Part 1: addition"),
            Quiz::new(vec![Question::new(
                "2+2?",
                &["3", "4", "5", "6"],
                "4",
                "Arithmetic",
            )]),
        )
    }

    #[test]
    fn file_name_strips_last_extension() {
        assert_eq!(study_aids_file_name("chapter1.pdf"), "chapter1_StudyAids.txt");
        assert_eq!(study_aids_file_name("notes.v2.md"), "notes.v2_StudyAids.txt");
        assert_eq!(study_aids_file_name("Custom Quiz: Rivers"), "Custom Quiz_ Rivers_StudyAids.txt");
        assert_eq!(study_aids_file_name(".pdf"), "StudyAids_StudyAids.txt");
        assert_eq!(study_aids_file_name(""), "StudyAids_StudyAids.txt");
    }

    #[test]
    fn file_name_never_leaves_the_export_directory() {
        assert_eq!(
            study_aids_file_name("Custom Quiz: Rivers/Lakes"),
            "Custom Quiz_ Rivers_Lakes_StudyAids.txt"
        );
        assert_eq!(study_aids_file_name("../x"), "_x_StudyAids.txt");
        assert_eq!(study_aids_file_name("../../x.pdf"), "_.._x_StudyAids.txt");
        assert_eq!(study_aids_file_name(r"a\b"), "a_b_StudyAids.txt");
        assert_eq!(study_aids_file_name(".."), "StudyAids_StudyAids.txt");
    }

    #[test]
    fn write_handles_topics_with_slashes() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = Bundle::custom("Rivers/Lakes", Summary::new("Water"), bundle().quiz);

        let path = write_study_aids(&bundle, dir.path()).unwrap();

        assert_eq!(path.parent(), Some(dir.path()));
        assert!(path.exists());
    }

    #[test]
    fn render_lists_options_and_reason_but_not_answer_line() {
        let text = render_study_aids(&bundle());

        assert!(text.starts_with("Study Aids for: chapter1.pdf"));
        assert!(text.contains("SUMMARY\n\nNumbers add up."));
        assert!(text.contains("Section Summaries:\n\nPart 1: addition"));
        assert!(text.contains("Q1: 2+2?\n  a) 3\n  b) 4\n  c) 5\n  d) 6\n"));
        assert!(text.contains("Reason for correct answer: Arithmetic"));
        assert!(!text.contains("Answer:"));
    }

    #[test]
    fn render_skips_missing_sections() {
        let mut b = bundle();
        b.summary.section_text = None;
        assert!(!render_study_aids(&b).contains("Section Summaries:"));
    }

    #[test]
    fn write_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_study_aids(&bundle(), dir.path().join("out")).unwrap();

        assert_eq!(path.file_name().unwrap(), "chapter1_StudyAids.txt");
        let written = fs::read_to_string(path).unwrap();
        assert!(written.contains("QUIZ"));
    }
}
