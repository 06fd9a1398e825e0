use filedesk_core::{
    format_file_size, modified_file_name, AcceptRule, DropZone, FileCategory, FileIds, OfferedFile,
};

#[test]
fn word_rule_accepts_doc_and_docx_only() {
    let rule = AcceptRule::word_document();
    assert!(rule.accepts("report.docx", None));
    assert!(rule.accepts("legacy.doc", None));

    let err = rule.validate("notes.txt", Some("text/plain")).unwrap_err();
    assert_eq!(err.file_name, "notes.txt");
    assert_eq!(err.message, "Please upload only Word files (.doc or .docx)");
}

#[test]
fn extension_checks_are_case_sensitive() {
    assert!(!AcceptRule::checklist_document().accepts("REPORT.DOCX", None));
}

#[test]
fn video_rule_goes_by_mime_prefix() {
    let rule = AcceptRule::video();
    assert!(rule.accepts("clip.bin", Some("video/mp4")));
    assert!(!rule.accepts("clip.mp4", None));
    assert!(!rule.accepts("clip.mp4", Some("audio/mpeg")));
}

#[test]
fn script_rule_accepts_by_mime_or_extension() {
    let rule = AcceptRule::script();
    assert!(rule.accepts("lines", Some("application/vnd.ms-excel.sheet.macroEnabled.12")));
    assert!(rule.accepts("lines.xls", None));
    assert!(!rule.accepts("lines.xlsm", None));
    assert!(AcceptRule::formatter_spreadsheet().accepts("lines.xlsm", None));
}

#[test]
fn speech_rows_rule_wants_excel_by_extension() {
    let rule = AcceptRule::speech_rows();
    assert!(rule.accepts("lines.xlsx", None));
    assert!(rule.accepts("lines.xls", None));
    assert!(!rule.accepts("lines.csv", Some("text/csv")));
    assert!(!rule.accepts("lines", Some("application/vnd.ms-excel")));

    let err = rule.validate("lines.txt", None).unwrap_err();
    assert_eq!(err.message, "Please upload a valid Excel file (.xlsx or .xls)");
}

#[test]
fn drop_zone_splits_accepted_and_rejected() {
    let zone = DropZone::new(AcceptRule::word_document());
    let mut ids = FileIds::default();
    let mut accepted = Vec::new();

    let rejected = zone.offer(
        vec![
            OfferedFile::new("a.docx", "/tmp/a.docx", 10),
            OfferedFile::new("b.txt", "/tmp/b.txt", 10),
            OfferedFile::new("c.doc", "/tmp/c.doc", 10),
        ],
        &mut ids,
        |file| accepted.push(file),
    );

    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0].file_name, "b.txt");
    let names: Vec<_> = accepted.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["a.docx", "c.doc"]);
    assert_eq!(accepted[0].id, 1);
    assert_eq!(accepted[1].id, 2);
    assert!(accepted.iter().all(|f| f.category == FileCategory::Document));
}

#[test]
fn file_sizes_use_binary_units() {
    assert_eq!(format_file_size(0), "0 Bytes");
    assert_eq!(format_file_size(512), "512 Bytes");
    assert_eq!(format_file_size(1536), "1.5 KB");
    assert_eq!(format_file_size(5 * 1024 * 1024), "5 MB");
}

#[test]
fn modified_name_keeps_extension() {
    assert_eq!(modified_file_name("sheet.xlsx"), "sheet_modified.xlsx");
    assert_eq!(modified_file_name("archive.tar.xls"), "archive.tar_modified.xls");
    assert_eq!(modified_file_name("noext"), "noext_modified");
}
