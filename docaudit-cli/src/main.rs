use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

// Import from docaudit-core
use docaudit_core::{AuditConfig, AuditProcessor, ComplianceReport, DirectorySource};

// Import CLI utilities
use docaudit::render;

#[derive(Parser)]
#[command(name = "docaudit")]
#[command(about = "Audit Markdown documents against a checklist schema")]
struct Args {
    /// Directory containing the documents
    #[arg(short, long, default_value = ".")]
    dir: String,

    /// Documents to audit, relative to --dir (default: every *.md in --dir)
    #[arg(long, num_args = 1..)]
    files: Vec<String>,

    /// Path to custom checklist schema (YAML format)
    #[arg(short, long)]
    config: Option<String>,

    /// Write the full report to this path
    #[arg(short, long)]
    output: Option<String>,

    /// Report format for --output: json or yaml
    #[arg(short = 'f', long, default_value = "json")]
    format: String,

    /// Print the per-document compliance table
    #[arg(long)]
    table: bool,

    /// Print the chapter analysis
    #[arg(long)]
    chapters: bool,

    /// Print the active checklist schema as YAML and exit
    #[arg(long)]
    show_schema: bool,

    /// Enable detailed profiling of batch steps
    #[arg(long)]
    profile: bool,

    /// Increase log verbosity (-v info, -vv debug); overrides RUST_LOG
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Exit with status 1 when any document is non-compliant or skipped
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    println!("🦀 Docaudit Checklist Auditor");

    // A present but broken schema file aborts here, before any document is read
    let config = AuditConfig::load_or_default(args.config.as_deref())?;

    if let Some(config_path) = &args.config {
        println!("📋 Loaded schema from: {}", config_path);
    } else {
        println!("📋 Using default schema");
    }

    if args.show_schema {
        println!("\n{}", config.to_yaml()?);
        return Ok(());
    }

    let mut processor = AuditProcessor::new(config)?.with_profiling(args.profile);
    let source = DirectorySource::new(&args.dir);
    info!("📁 Source root: {}", source.root().display());

    println!("📄 Auditing: {}", args.dir);
    let report = if args.files.is_empty() {
        processor.run_discovered(&source)?
    } else {
        processor.run(&source, &args.files)
    };

    if args.table {
        println!("\n{}", render::compliance_table(&report, processor.engine().checklist()));
    }

    println!("\n{}", render::compliance_details(&report));

    let skipped = render::skipped_block(&report);
    if !skipped.is_empty() {
        println!("{}", skipped);
    }

    if args.chapters {
        println!("{}", render::chapter_analysis(&report));
    }

    if let Some(output_path) = &args.output {
        save_report(&report, output_path, &args.format)?;
    }

    processor.profiler().print_summary();

    if args.strict && !report.is_clean() {
        eprintln!(
            "❌ {} non-compliant, {} skipped",
            report.summary.non_compliant.len(),
            report.skipped.len()
        );
        std::process::exit(1);
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn save_report(report: &ComplianceReport, output_path: &str, format: &str) -> Result<()> {
    report.save_with_format(output_path, format)?;

    match format {
        "yaml" | "yml" => println!("💾 YAML report saved to: {}", output_path),
        "json" => println!("💾 JSON report saved to: {}", output_path),
        _ => {
            println!("⚠️  Unknown report format '{}', using json", format);
            println!("💾 JSON report saved to: {}", output_path);
        }
    }

    Ok(())
}
