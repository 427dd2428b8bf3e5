use crate::classifier::ChapterClassifier;
use crate::config::AuditConfig;
use crate::error::AuditError;
use crate::rules::RuleEngine;
use crate::sources::DocumentSource;
use crate::types::*;
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Simple profiler that collects timings for batch steps
pub struct StepProfiler {
    enabled: bool,
    timings: Vec<(String, Duration)>,
}

impl StepProfiler {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            timings: Vec::new(),
        }
    }

    pub fn time_step<F, R>(&mut self, step_name: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        if !self.enabled {
            return f();
        }

        let start = Instant::now();
        let result = f();
        let elapsed = start.elapsed();

        self.timings.push((step_name.to_string(), elapsed));
        debug!("⏱️  {}: {:.0}ms", step_name, elapsed.as_millis());

        result
    }

    pub fn timings(&self) -> &[(String, Duration)] {
        &self.timings
    }

    pub fn print_summary(&self) {
        if !self.enabled || self.timings.is_empty() {
            return;
        }

        println!("\n📊 Performance Summary:");
        let total: Duration = self.timings.iter().map(|(_, d)| *d).sum();

        for (step, duration) in &self.timings {
            let percentage = if total.is_zero() {
                0.0
            } else {
                (duration.as_secs_f64() / total.as_secs_f64()) * 100.0
            };
            println!(
                "   {:.<35} {:.0}ms ({:.1}%)",
                step,
                duration.as_millis(),
                percentage
            );
        }
        println!("   {:.<35} {:.0}ms", "Total", total.as_millis());
    }
}

/// Runs a schema over a batch of documents and produces one report.
pub struct AuditProcessor {
    engine: RuleEngine,
    classifier: ChapterClassifier,
    fingerprint: String,
    profiler: StepProfiler,
}

impl AuditProcessor {
    /// Validate and compile the schema. A `SchemaConfig` error here means no
    /// document may be evaluated.
    pub fn new(config: AuditConfig) -> Result<Self> {
        let engine = RuleEngine::new(&config)?;
        let fingerprint = config
            .fingerprint()
            .context("Failed to fingerprint checklist schema")?;
        let classifier = ChapterClassifier::new(&config.chapter);

        info!(
            "📋 Schema loaded: {} checklist rule(s), {} categor(ies), fingerprint {}",
            engine.checklist().len(),
            engine.categories().len(),
            &fingerprint[..12.min(fingerprint.len())]
        );

        Ok(Self {
            engine,
            classifier,
            fingerprint,
            profiler: StepProfiler::new(false),
        })
    }

    pub fn with_profiling(mut self, enabled: bool) -> Self {
        self.profiler = StepProfiler::new(enabled);
        self
    }

    pub fn engine(&self) -> &RuleEngine {
        &self.engine
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn profiler(&self) -> &StepProfiler {
        &self.profiler
    }

    /// Evaluate every document `source.discover()` lists.
    pub fn run_discovered(&mut self, source: &dyn DocumentSource) -> Result<ComplianceReport> {
        let identifiers = source
            .discover()
            .with_context(|| format!("Failed to discover documents in {} source", source.name()))?;
        info!("📁 Discovered {} document(s)", identifiers.len());
        Ok(self.run(source, &identifiers))
    }

    /// Evaluate the given identifiers in order. Repeated identifiers are
    /// evaluated once; unreadable documents become skip entries.
    pub fn run(&mut self, source: &dyn DocumentSource, identifiers: &[String]) -> ComplianceReport {
        info!(
            "📄 Auditing {} document(s) from {} source",
            identifiers.len(),
            source.name()
        );

        let engine = &self.engine;
        let (records, skipped) = self.profiler.time_step("Document evaluation", || {
            Self::evaluate_all(engine, source, identifiers)
        });

        let classifier = &self.classifier;
        let chapters = self
            .profiler
            .time_step("Chapter classification", || classifier.classify_all(&records));

        let fingerprint = self.fingerprint.clone();
        let report = self.profiler.time_step("Report aggregation", || {
            ComplianceReport::build(records, chapters, skipped, fingerprint)
        });

        info!(
            "✅ Audit complete: {} evaluated, {} compliant, {} skipped, {} chapter(s)",
            report.summary.evaluated,
            report.summary.fully_compliant_count(),
            report.skipped.len(),
            report.chapter_summary.total_chapters
        );

        report
    }

    fn evaluate_all(
        engine: &RuleEngine,
        source: &dyn DocumentSource,
        identifiers: &[String],
    ) -> (Vec<DocumentRecord>, Vec<SkippedDocument>) {
        let mut seen = HashSet::new();
        let mut records = Vec::new();
        let mut skipped = Vec::new();

        for identifier in identifiers {
            if !seen.insert(identifier.as_str()) {
                debug!("🔁 {} listed more than once, evaluating once", identifier);
                continue;
            }

            match source.read(identifier) {
                Ok(text) => {
                    let record = engine.evaluate(identifier, &text);
                    for warning in &record.warnings {
                        warn!("⚠️  {}: {}", identifier, warning);
                    }
                    debug!(
                        "{} {} ({} missing)",
                        if record.fully_compliant { "✅" } else { "❌" },
                        identifier,
                        record.missing.len()
                    );
                    records.push(record);
                }
                Err(err) => {
                    warn!("⚠️  Skipping {}: {}", identifier, err);
                    skipped.push(skip_entry(identifier, &err));
                }
            }
        }

        (records, skipped)
    }
}

fn skip_entry(identifier: &str, err: &AuditError) -> SkippedDocument {
    let reason = match err {
        AuditError::Decode { .. } => SkipReason::DecodeError,
        _ => SkipReason::NotFound,
    };
    let detail = match err {
        AuditError::Io { source, .. } => format!("{err}: {source}"),
        _ => err.to_string(),
    };
    SkippedDocument {
        identifier: identifier.to_string(),
        reason,
        detail,
    }
}
