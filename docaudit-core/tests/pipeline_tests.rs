//! Pipeline boundary tests over a small Markdown corpus.
//!
//! The corpus in `test_fixtures/corpus/` is audited end to end with the default
//! schema, and the tests assert on the report at each boundary:
//!
//! - Source boundary: discovery order, skip entries for unreadable documents
//! - Record boundary: presence, scoped counts, missing-item text, warnings
//! - Chapter boundary: PartSplit / Unified / Ambiguous tags and tallies
//! - Schema boundary: a broken schema aborts before any document is read
//!
//! Property tests at the bottom check evaluation against generated documents.

use docaudit_core::*;
use std::path::PathBuf;

// ============================================================================
// Fixture helpers
// ============================================================================

fn corpus_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_fixtures/corpus")
}

fn audit_corpus() -> ComplianceReport {
    let mut processor = AuditProcessor::new(AuditConfig::default()).unwrap();
    processor
        .run_discovered(&DirectorySource::new(corpus_dir()))
        .unwrap()
}

fn record<'a>(report: &'a ComplianceReport, filename: &str) -> &'a DocumentRecord {
    report
        .record(filename)
        .unwrap_or_else(|| panic!("no record for {filename}"))
}

fn ids(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

// ============================================================================
// Source boundary
// ============================================================================

mod source_boundary {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    #[test]
    fn discovers_markdown_in_name_order() {
        let report = audit_corpus();
        let filenames: Vec<&str> = report.records.iter().map(|r| r.filename.as_str()).collect();

        assert_eq!(
            filenames,
            vec![
                "01-docker-basics.md",
                "02-docker-compose.md",
                "03-network-Part1.md",
                "03-network-Part2.md",
                "04-volume-a.md",
                "04-volume-b.md",
                "05-monitoring.md",
                "notes.md",
            ]
        );
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn missing_file_is_skipped_not_counted() {
        let mut processor = AuditProcessor::new(AuditConfig::default()).unwrap();
        let source = DirectorySource::new(corpus_dir());

        let report = processor.run(&source, &ids(&["01-docker-basics.md", "99-missing.md"]));

        assert_eq!(report.summary.evaluated, 1);
        assert_eq!(report.summary.fully_compliant, vec!["01-docker-basics.md"]);
        assert!(report.summary.non_compliant.is_empty());
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].identifier, "99-missing.md");
        assert_eq!(report.skipped[0].reason, SkipReason::NotFound);
    }

    #[test]
    fn undecodable_file_is_skipped_with_decode_reason() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("01-ok.md"), "## 목차\n").unwrap();
        fs::write(dir.path().join("02-latin1.md"), b"## caf\xe9\n").unwrap();

        let mut processor = AuditProcessor::new(AuditConfig::default()).unwrap();
        let report = processor
            .run_discovered(&DirectorySource::new(dir.path()))
            .unwrap();

        assert_eq!(report.summary.evaluated, 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].identifier, "02-latin1.md");
        assert_eq!(report.skipped[0].reason, SkipReason::DecodeError);
        assert!(report
            .summary
            .non_compliant
            .iter()
            .all(|doc| doc.filename != "02-latin1.md"));
    }

    #[test]
    fn byte_order_mark_does_not_hide_first_line() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("01-bom.md"),
            "\u{FEFF}> **학습 목표**: 첫 줄이 목표\n",
        )
        .unwrap();

        let mut processor = AuditProcessor::new(AuditConfig::default()).unwrap();
        let report = processor
            .run_discovered(&DirectorySource::new(dir.path()))
            .unwrap();

        assert!(record(&report, "01-bom.md").is_present("learning_goal"));
    }

    #[test]
    fn skip_reasons_serialize_with_distinct_codes() {
        let source = MemorySource::new().with_bytes("02-bad.md", &[0xff]);
        let mut processor = AuditProcessor::new(AuditConfig::default()).unwrap();
        let report = processor.run(&source, &ids(&["01-gone.md", "02-bad.md"]));

        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["skipped"][0]["reason"], "not_found");
        assert_eq!(json["skipped"][1]["reason"], "decode_error");
    }
}

// ============================================================================
// Record boundary
// ============================================================================

mod record_boundary {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn complete_document_is_fully_compliant() {
        let report = audit_corpus();
        let basics = record(&report, "01-docker-basics.md");

        assert!(basics.fully_compliant);
        assert!(basics.missing.is_empty());
        assert_eq!(basics.chapter, 1);
        assert!(!basics.is_part);
        assert_eq!(basics.count("analogies"), Some(2));
        assert_eq!(basics.count("scenarios"), Some(3));
        assert_eq!(basics.count("faq"), Some(3));
        assert_eq!(basics.count("interview"), Some(5));
        assert_eq!(basics.count("toc"), None);
        assert_eq!(basics.tallies.get("interview.junior"), Some(&1));
        assert_eq!(basics.tallies.get("interview.mid"), Some(&1));
        assert_eq!(basics.coverage.satisfied, 12);
        assert!(basics.warnings.is_empty());
    }

    #[test]
    fn deficient_document_lists_exact_missing_items() {
        let report = audit_corpus();
        let compose = record(&report, "02-docker-compose.md");

        assert!(!compose.fully_compliant);
        assert_eq!(
            compose.missing,
            vec![
                MissingItem::InsufficientCount {
                    rule: "scenarios".to_string(),
                    label: "주니어시나리오".to_string(),
                    actual: 2,
                    required: 3,
                },
                MissingItem::SectionMissing {
                    rule: "faq".to_string(),
                    label: "FAQ".to_string(),
                },
            ]
        );
        assert_eq!(
            compose.missing_descriptions(),
            vec![
                "주니어시나리오: insufficient count: 2/3",
                "FAQ: section missing",
            ]
        );
    }

    #[test]
    fn absent_section_counts_zero_and_reports_no_count_entry() {
        let report = audit_corpus();
        let compose = record(&report, "02-docker-compose.md");

        assert!(!compose.is_present("faq"));
        assert_eq!(compose.count("faq"), Some(0));
        assert!(compose
            .missing
            .iter()
            .all(|item| !matches!(item, MissingItem::InsufficientCount { rule, .. } if rule == "faq")));
    }

    #[test]
    fn stray_item_outside_section_is_warned_not_counted() {
        let report = audit_corpus();
        let compose = record(&report, "02-docker-compose.md");

        assert_eq!(compose.count("scenarios"), Some(2));
        assert_eq!(
            compose.warnings,
            vec![DataQualityWarning::ItemsOutsideSection {
                rule: "scenarios".to_string(),
                outside: 1,
            }]
        );
    }

    #[test]
    fn summary_separates_compliant_and_non_compliant() {
        let report = audit_corpus();

        assert_eq!(report.summary.evaluated, 8);
        assert_eq!(
            report.summary.fully_compliant,
            vec!["01-docker-basics.md", "03-network-Part1.md"]
        );
        assert_eq!(report.summary.non_compliant.len(), 6);
        assert!(!report.is_clean());
    }

    #[test]
    fn item_before_heading_is_not_counted() {
        let engine = RuleEngine::new(&AuditConfig::default()).unwrap();
        let text = "### Q1 앞에 놓인 질문\n## FAQ\n### Q2\n### Q3\n";

        let record = engine.evaluate("01-x.md", text);

        assert_eq!(record.count("faq"), Some(2));
        assert_eq!(
            record.missing_descriptions().last().map(String::as_str),
            Some("면접질문: section missing")
        );
        assert!(record
            .missing_descriptions()
            .contains(&"FAQ: insufficient count: 2/3".to_string()));
    }

    #[test]
    fn threshold_met_exactly_has_no_entry() {
        let engine = RuleEngine::new(&AuditConfig::default()).unwrap();
        let record = engine.evaluate("01-x.md", "## FAQ\n### Q1\n### Q2\n### Q3\n");

        assert!(record.missing.iter().all(|item| item.rule() != "faq"));
    }
}

// ============================================================================
// Chapter boundary
// ============================================================================

mod chapter_boundary {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn chapters_are_tagged() {
        let report = audit_corpus();
        let tags: Vec<(u32, ChapterTag)> = report
            .chapters
            .iter()
            .map(|c| (c.chapter, c.classification.tag()))
            .collect();

        assert_eq!(
            tags,
            vec![
                (0, ChapterTag::Unified),
                (1, ChapterTag::Unified),
                (2, ChapterTag::Unified),
                (3, ChapterTag::PartSplit),
                (4, ChapterTag::Ambiguous),
                (5, ChapterTag::Unified),
            ]
        );
    }

    #[test]
    fn part_split_reports_per_file_coverage() {
        let report = audit_corpus();
        let chapter = report.chapter(3).unwrap();

        let ChapterClassification::PartSplit { files } = &chapter.classification else {
            panic!("chapter 3 should be PartSplit");
        };
        let per_file: Vec<(&str, u32, u32)> = files
            .iter()
            .map(|f| (f.filename.as_str(), f.satisfied, f.total))
            .collect();
        assert_eq!(
            per_file,
            vec![("03-network-Part1.md", 12, 12), ("03-network-Part2.md", 3, 12)]
        );
    }

    #[test]
    fn unified_tiers_follow_coverage() {
        let report = audit_corpus();

        let tier_of = |chapter: u32| match &report.chapter(chapter).unwrap().classification {
            ChapterClassification::Unified { tier, coverage, .. } => (*tier, *coverage),
            other => panic!("chapter {chapter} should be Unified, got {other:?}"),
        };

        assert_eq!(tier_of(1), (CoverageTier::HighCoverage, 12));
        assert_eq!(tier_of(2), (CoverageTier::HighCoverage, 11));
        assert_eq!(tier_of(5), (CoverageTier::LowCoverage, 4));
        assert_eq!(tier_of(0), (CoverageTier::LowCoverage, 0));
    }

    #[test]
    fn chapter_tally() {
        let report = audit_corpus();

        assert_eq!(
            report.chapter_summary,
            ChapterSummary {
                total_chapters: 6,
                part_split: 1,
                unified_high_coverage: 2,
                unified_low_coverage: 2,
                ambiguous: 1,
            }
        );
    }
}

// ============================================================================
// Schema boundary
// ============================================================================

mod schema_boundary {
    use super::*;
    use pretty_assertions::assert_eq;

    fn schema_error(result: anyhow::Result<AuditProcessor>) -> String {
        let err = result.err().expect("schema should be rejected");
        match err.downcast_ref::<AuditError>() {
            Some(AuditError::SchemaConfig { rule, .. }) => rule.clone(),
            other => panic!("expected SchemaConfig, got {other:?}"),
        }
    }

    #[test]
    fn count_rule_without_items_aborts() {
        let mut config = AuditConfig::default();
        config.checklist.push(RuleConfig {
            min_count: Some(2),
            ..RuleConfig::section("examples", "예제", "예제")
        });

        assert_eq!(schema_error(AuditProcessor::new(config)), "examples");
    }

    #[test]
    fn non_positive_threshold_aborts() {
        let mut config = AuditConfig::default();
        for rule in config.checklist.iter_mut().filter(|r| r.id == "faq") {
            rule.min_count = Some(0);
        }

        assert_eq!(schema_error(AuditProcessor::new(config)), "faq");
    }

    #[test]
    fn malformed_yaml_schema_fails_to_load() {
        let yaml = "checklist:\n  - id: faq\n    text: FAQ\n    items: '### Q'\n    min_count: -1\n";
        let err = AuditConfig::from_yaml(yaml).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<AuditError>(),
            Some(AuditError::SchemaConfig { rule, .. }) if rule == "faq"
        ));
    }

    #[test]
    fn custom_yaml_schema_drives_evaluation() {
        let yaml = r#"
checklist:
  - id: examples
    label: Examples
    text: Examples
    items: '### item \d+'
    min_count: 3
categories:
  - id: examples_heading
    label: Examples
    text: Examples
chapter:
  high_coverage_threshold: 1
"#;
        let config = AuditConfig::from_yaml(yaml).unwrap();
        let mut processor = AuditProcessor::new(config).unwrap();
        let source = MemorySource::new().with_document(
            "01-guide.md",
            "### item 1\n## Examples\n### item 2\n### item 3\n## Next\n### item 4\n",
        );

        let report = processor.run(&source, &ids(&["01-guide.md"]));
        let guide = record(&report, "01-guide.md");

        assert_eq!(guide.count("examples"), Some(2));
        assert_eq!(
            guide.missing_descriptions(),
            vec!["Examples: insufficient count: 2/3"]
        );
        assert_eq!(guide.coverage.total, 1);
        assert_eq!(guide.coverage.satisfied, 1);
        assert!(matches!(
            report.chapter(1).unwrap().classification,
            ChapterClassification::Unified { tier: CoverageTier::HighCoverage, .. }
        ));
    }

    #[test]
    fn schema_without_categories_is_rejected() {
        let yaml = "categories: []\n";
        let err = AuditConfig::from_yaml(yaml).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<AuditError>(),
            Some(AuditError::SchemaConfig { rule, .. }) if rule == "chapter.high_coverage_threshold"
        ));
    }
}

// ============================================================================
// Properties
// ============================================================================

mod properties {
    use super::*;
    use proptest::prelude::*;

    const LINES: &[&str] = &[
        "> **학습 목표**: 목표",
        "**예상 학습 시간**: 1시간",
        "**난이도**: 초급",
        "## 목차",
        "## 왜 필요한가",
        "## 실생활 비유",
        "### 비유 1",
        "## 주니어 시나리오",
        "### 시나리오 1",
        "## FAQ",
        "### Q1",
        "## 면접 질문",
        "#### 주니어",
        "**Q1**: 질문",
        "## 핵심 정리",
        "본문",
        "",
    ];

    // Everything except the FAQ heading, so a generated prefix can never open the section
    const NON_FAQ_LINES: &[&str] = &[
        "## 목차",
        "### Q1",
        "### Q2",
        "## 면접 질문",
        "**Q1**: 질문",
        "본문",
        "",
    ];

    fn document() -> impl Strategy<Value = String> {
        prop::collection::vec(prop::sample::select(LINES), 0..40).prop_map(|lines| lines.join("\n"))
    }

    fn lines_without_faq() -> impl Strategy<Value = String> {
        prop::collection::vec(prop::sample::select(NON_FAQ_LINES), 0..15)
            .prop_map(|lines| lines.join("\n"))
    }

    proptest! {
        #[test]
        fn evaluation_is_deterministic(text in document()) {
            let engine = RuleEngine::new(&AuditConfig::default()).unwrap();
            prop_assert_eq!(engine.evaluate("01-x.md", &text), engine.evaluate("01-x.md", &text));
        }

        #[test]
        fn compliant_iff_nothing_missing(text in document()) {
            let engine = RuleEngine::new(&AuditConfig::default()).unwrap();
            let record = engine.evaluate("01-x.md", &text);

            prop_assert_eq!(record.fully_compliant, record.missing.is_empty());
            for rule in engine.checklist() {
                if rule.counts_items() && !record.is_present(rule.id()) {
                    prop_assert_eq!(record.count(rule.id()), Some(0));
                }
            }
        }

        #[test]
        fn only_items_inside_the_span_are_counted(
            before in lines_without_faq(),
            inside in 0usize..8,
            after in lines_without_faq(),
        ) {
            let items: Vec<String> = (1..=inside).map(|i| format!("### Q{i}")).collect();
            let text = format!(
                "{before}\n## FAQ\n{}\n## 다음 단계\n{after}\n",
                items.join("\n")
            );

            let engine = RuleEngine::new(&AuditConfig::default()).unwrap();
            let record = engine.evaluate("01-x.md", &text);

            prop_assert!(record.is_present("faq"));
            prop_assert_eq!(record.count("faq"), Some(inside as u32));
        }
    }
}
