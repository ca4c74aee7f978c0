//! Tests for resolving link-files on disk into document references.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use drive_links::{resolve_link_file, DocumentKind, ExportProfile};

fn write_link(dir: &Path, file: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(file);
    fs::write(&path, content).unwrap();
    path
}

fn desktop_entry(name: &str, url: &str) -> String {
    format!(
        "[Desktop Entry]\nEncoding=UTF-8\nName={}\nType=Link\nURL={}\nIcon=text-html\n",
        name, url
    )
}

mod supported_kinds {
    use super::*;

    #[test]
    fn office_profile() {
        let dir = TempDir::new().unwrap();
        let cases = [
            ("https://docs.google.com/document/d/d1/edit", DocumentKind::Document, "Notes.docx"),
            ("https://docs.google.com/spreadsheets/d/s1/edit#gid=0", DocumentKind::Spreadsheet, "Notes.xlsx"),
            ("https://docs.google.com/presentation/d/p1/edit?usp=drive_web", DocumentKind::Presentation, "Notes.pptx"),
        ];

        for (url, kind, expected_name) in cases {
            let path = write_link(dir.path(), "Notes.desktop", &desktop_entry("Notes", url));
            let reference = resolve_link_file(&path, ExportProfile::OfficeOpenXml).unwrap();

            assert_eq!(reference.kind(), kind);
            assert_eq!(reference.display_name(), expected_name);
            assert_eq!(reference.url(), url);
            assert_eq!(
                reference.export_mime(),
                ExportProfile::OfficeOpenXml.format_for(kind).mime_type
            );
        }
    }

    #[test]
    fn open_document_profile() {
        let dir = TempDir::new().unwrap();
        let path = write_link(
            dir.path(),
            "Plan.desktop",
            &desktop_entry("Plan", "https://docs.google.com/document/d/d1/edit"),
        );

        let reference = resolve_link_file(&path, ExportProfile::OpenDocument).unwrap();

        assert_eq!(reference.display_name(), "Plan.odt");
        assert_eq!(reference.export_mime(), "application/vnd.oasis.opendocument.text");
    }

    #[test]
    fn name_with_spaces_and_dots() {
        let dir = TempDir::new().unwrap();
        let path = write_link(
            dir.path(),
            "x.desktop",
            &desktop_entry("Minutes 2024.03 (final)", "https://docs.google.com/document/d/d1/edit"),
        );

        let reference = resolve_link_file(&path, ExportProfile::OfficeOpenXml).unwrap();

        assert_eq!(reference.display_name(), "Minutes 2024.03 (final).docx");
    }
}

mod unresolved {
    use super::*;

    fn assert_unresolved(content: &str) {
        let dir = TempDir::new().unwrap();
        let path = write_link(dir.path(), "x.desktop", content);
        assert!(resolve_link_file(&path, ExportProfile::OfficeOpenXml).is_none());
    }

    #[test]
    fn missing_url() {
        assert_unresolved("[Desktop Entry]\nName=Report\nType=Link\n");
    }

    #[test]
    fn non_drive_url() {
        assert_unresolved(&desktop_entry("Site", "https://example.com/page"));
    }

    #[test]
    fn unsupported_object_types() {
        assert_unresolved(&desktop_entry("Folder", "https://drive.google.com/folder/d/f1/view"));
        assert_unresolved(&desktop_entry("Form", "https://docs.google.com/forms/d/f1/edit"));
        assert_unresolved(&desktop_entry("Pdf", "https://drive.google.com/file/d/f1/view"));
    }

    #[test]
    fn missing_name() {
        assert_unresolved("URL=https://docs.google.com/document/d/d1/edit\n");
    }

    #[test]
    fn binary_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("x.desktop");
        fs::write(&path, [0xff, 0xfe, 0x00, 0x55]).unwrap();
        assert!(resolve_link_file(&path, ExportProfile::OfficeOpenXml).is_none());
    }
}

mod names {
    use super::*;

    fn display_name(name: &str) -> String {
        let dir = TempDir::new().unwrap();
        let path = write_link(
            dir.path(),
            "x.desktop",
            &desktop_entry(name, "https://docs.google.com/document/d/d1/edit"),
        );
        resolve_link_file(&path, ExportProfile::OfficeOpenXml)
            .unwrap()
            .display_name()
            .to_string()
    }

    #[test]
    fn separators_stay_in_one_component() {
        assert_eq!(display_name("Q1/Q2 Plan"), "Q1_Q2 Plan.docx");
        assert_eq!(display_name("/tmp/owned"), "_tmp_owned.docx");
        assert_eq!(display_name("..\\escape"), ".._escape.docx");
        assert_eq!(Path::new(&display_name("../../etc/x")).components().count(), 1);
    }

    #[test]
    fn surrounding_whitespace_is_kept() {
        assert_eq!(display_name(" Report"), " Report.docx");
    }
}
