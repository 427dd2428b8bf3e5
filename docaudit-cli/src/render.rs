// Console rendering for audit reports
//
// Every function returns a String so main.rs decides where it goes.

use docaudit_core::rules::CompiledRule;
use docaudit_core::*;

fn check(value: bool) -> &'static str {
    if value {
        "✅"
    } else {
        "❌"
    }
}

/// Count columns carry their threshold, e.g. `FAQ (3+)`.
fn column_header(rule: &CompiledRule) -> String {
    match rule.min_count() {
        Some(n) if rule.counts_items() => format!("{} ({}+)", rule.label(), n),
        _ => rule.label().to_string(),
    }
}

/// Per-document Markdown table: ✅/❌ for presence rules, the scoped count for
/// count rules, then the missing list.
pub fn compliance_table(report: &ComplianceReport, checklist: &[CompiledRule]) -> String {
    let mut out = String::new();

    let headers: Vec<String> = checklist.iter().map(column_header).collect();
    out.push_str(&format!("| File | {} | Missing |\n", headers.join(" | ")));
    out.push_str(&format!("|{}\n", "---|".repeat(headers.len() + 2)));

    for record in &report.records {
        let cells: Vec<String> = checklist
            .iter()
            .map(|rule| {
                if !rule.counts_items() {
                    return check(record.is_present(rule.id())).to_string();
                }
                match record.count(rule.id()) {
                    Some(n) => n.to_string(),
                    None => check(false).to_string(),
                }
            })
            .collect();

        let missing = if record.missing.is_empty() {
            "none".to_string()
        } else {
            record.missing_descriptions().join(", ")
        };

        out.push_str(&format!(
            "| {} | {} | {} |\n",
            record.filename, cells.join(" | "), missing
        ));
    }

    out
}

/// Compliant list, then each non-compliant document with its unmet items.
pub fn compliance_details(report: &ComplianceReport) -> String {
    let mut out = String::new();
    let summary = &report.summary;

    out.push_str(&format!(
        "✅ Fully compliant ({}/{}):\n",
        summary.fully_compliant_count(),
        summary.evaluated
    ));
    for filename in &summary.fully_compliant {
        out.push_str(&format!("   - {filename}\n"));
    }

    if !summary.non_compliant.is_empty() {
        out.push_str(&format!("\n⚠️  Needs work ({}):\n", summary.non_compliant.len()));
        for document in &summary.non_compliant {
            out.push_str(&format!("\n   {}:\n", document.filename));
            for item in &document.missing {
                out.push_str(&format!("      - [ ] {item}\n"));
            }
        }
    }

    let warned: Vec<&DocumentRecord> = report
        .records
        .iter()
        .filter(|record| !record.warnings.is_empty())
        .collect();
    if !warned.is_empty() {
        out.push_str("\n🔎 Data-quality warnings:\n");
        for record in warned {
            for warning in &record.warnings {
                out.push_str(&format!("   - {}: {}\n", record.filename, warning));
            }
        }
    }

    out
}

/// Chapter-by-chapter classification and the chapter tally.
pub fn chapter_analysis(report: &ComplianceReport) -> String {
    let mut out = String::new();

    out.push_str("📚 Chapter analysis:\n");
    for chapter in &report.chapters {
        match &chapter.classification {
            ChapterClassification::PartSplit { files } => {
                out.push_str(&format!("\n   Chapter {:02} [PartSplit]\n", chapter.chapter));
                for file in files {
                    out.push_str(&format!(
                        "      - {}: {}/{}\n",
                        file.filename, file.satisfied, file.total
                    ));
                }
            }
            ChapterClassification::Unified {
                filename,
                coverage,
                total,
                tier,
                missing,
            } => {
                let tier = match tier {
                    CoverageTier::HighCoverage => "high coverage",
                    CoverageTier::LowCoverage => "low coverage",
                };
                out.push_str(&format!(
                    "\n   Chapter {:02} [Unified, {}] {}: {}/{}\n",
                    chapter.chapter,
                    tier,
                    filename,
                    coverage,
                    total
                ));
                if !missing.is_empty() {
                    out.push_str(&format!("      missing: {}\n", missing.join(", ")));
                }
            }
            ChapterClassification::Ambiguous { filenames } => {
                out.push_str(&format!(
                    "\n   Chapter {:02} [Ambiguous] manual review: {}\n",
                    chapter.chapter, filenames.join(", ")
                ));
            }
        }
    }

    let tally = &report.chapter_summary;
    out.push_str("\n📊 Chapter tally:\n");
    out.push_str(&format!("   Total chapters: {}\n", tally.total_chapters));
    out.push_str(&format!("   PartSplit: {}\n", tally.part_split));
    out.push_str(&format!(
        "   Unified: {} (high coverage: {}, low coverage: {})\n",
        tally.unified(),
        tally.unified_high_coverage,
        tally.unified_low_coverage
    ));
    out.push_str(&format!("   Ambiguous: {}\n", tally.ambiguous));

    out
}

/// Documents that could not be evaluated; empty when none were skipped.
pub fn skipped_block(report: &ComplianceReport) -> String {
    let mut out = String::new();
    if report.skipped.is_empty() {
        return out;
    }

    out.push_str(&format!("🚫 Skipped ({}):\n", report.skipped.len()));
    for skipped in &report.skipped {
        out.push_str(&format!(
            "   - {} [{}] {}\n",
            skipped.identifier,
            skipped.reason,
            skipped.detail
        ));
    }
    out
}
