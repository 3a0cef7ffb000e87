use clap::{Parser, Subcommand};
use pharmaguard::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Rule-based pharmacogenomic drug risk evaluation
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to a settings TOML file (defaults to $PHARMAGUARD_CONFIG, then built-in defaults)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate a drug against a VCF file and produce a report
    Analyze {
        /// Drug name, e.g. Codeine
        #[arg(short, long)]
        drug: String,
        /// VCF file to evaluate. Uses the drug's registered sample file when omitted
        #[arg(short, long)]
        vcf: Option<PathBuf>,
        /// Write the PDF report to this path
        #[arg(short, long)]
        pdf: Option<PathBuf>,
        /// Print the full response as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// List the pharmacogene calls found in a VCF file
    Extract {
        /// VCF file to scan
        vcf: PathBuf,
    },
    /// List the supported drugs and their rules
    Drugs,
}

fn main() {
    let cli = Cli::parse();

    let settings = Settings::load(cli.config.as_deref())
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load settings: {}", e)));
    init_tracing(&settings.logging.filter);

    match cli.command {
        Command::Analyze {
            drug,
            vcf,
            pdf,
            json,
        } => run_analysis(&settings, &drug, vcf, pdf, json),
        Command::Extract { vcf } => run_extraction(&vcf),
        Command::Drugs => list_drugs(),
    }
}

fn init_tracing(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run_analysis(
    settings: &Settings,
    drug: &str,
    vcf: Option<PathBuf>,
    pdf_path: Option<PathBuf>,
    json: bool,
) {
    let total_start = Instant::now();

    // --- 1. Knowledge tables ---
    let analyzer = Analyzer::from_settings(settings)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to initialise analyzer: {}", e)));

    // --- 2. Input selection ---
    let source = match vcf {
        Some(path) => VariantSource::Path(path),
        None => VariantSource::Default,
    };

    // --- 3. Evaluation and report ---
    let analysis_start = Instant::now();
    let response = analyzer
        .analyze(drug, source.clone())
        .unwrap_or_else(|e| exit_with_error(&e.to_string()));
    let analysis_duration = analysis_start.elapsed();

    if let Some(path) = &pdf_path {
        if response.pdf_base64.is_empty() {
            eprintln!("No report generated; nothing written to '{}'", path.display());
        } else {
            let bytes = response
                .pdf_bytes()
                .unwrap_or_else(|e| exit_with_error(&format!("Corrupt report payload: {}", e)));
            fs::write(path, bytes).unwrap_or_else(|e| {
                exit_with_error(&format!(
                    "Failed to write report to '{}': {}",
                    path.display(),
                    e
                ))
            });
        }
    }

    if json {
        let output = serde_json::to_string_pretty(&response)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialise response: {}", e)));
        println!("{}", output);
        return;
    }

    // --- 4. Results and Summary ---
    let result = &response.result;
    println!("\nEvaluation Finished!");
    println!("  -> Drug: {}", response.drug);
    println!("  -> Recommendation: {}", result.recommendation);
    println!("  -> Confidence: {:.0}%", result.confidence * 100.0);
    if let Some(gene) = result.gene {
        println!(
            "  -> Gene: {} ({})",
            gene,
            result.phenotype.as_deref().unwrap_or("phenotype not determined")
        );
    }
    if let Some(reason) = trace_reason(&analyzer, drug, &source) {
        println!("  -> Reason: {}", reason);
    }
    if let Some(explanation) = &response.explanation {
        println!("\n{}", explanation.trim());
    }
    if let Some(path) = &pdf_path {
        if !response.pdf_base64.is_empty() {
            println!("\nReport written to '{}'", path.display());
        }
    }

    println!("\n--- Performance Summary ---");
    println!("Analysis:             {:?}", analysis_duration);
    println!("Total Execution:      {:?}", total_start.elapsed());
    println!();
}

/// Re-runs the evaluation with tracing enabled to explain which calls decided it.
fn trace_reason(analyzer: &Analyzer, drug: &str, source: &VariantSource) -> Option<String> {
    let summary = match source {
        VariantSource::Path(path) => extract_path(path).ok()?,
        VariantSource::Default => extract_path(analyzer.default_input(drug)?).ok()?,
        VariantSource::Upload(bytes) => extract_bytes(bytes),
    };
    let (_, trace) = analyzer.evaluator().evaluate_traced(drug, &summary.records);
    Some(TraceFormatter::format_trace(&trace))
}

fn run_extraction(vcf: &Path) {
    let start = Instant::now();
    let summary = extract_path(vcf).unwrap_or_else(|e| exit_with_error(&e.to_string()));

    println!("Found {} pharmacogene call(s) in '{}'", summary.records.len(), vcf.display());
    for record in &summary.records {
        println!(
            "  {:<8} {:<14} {}",
            record.gene, record.variant_id, record.star_allele
        );
    }

    println!("\n--- Dataset Summary ---");
    println!("Lines:                {}", summary.lines);
    println!("Headers:              {}", summary.skipped_for(SkipReason::Header));
    println!("Too few fields:       {}", summary.skipped_for(SkipReason::TooFewFields));
    println!("Missing GENE:         {}", summary.skipped_for(SkipReason::MissingGene));
    println!("Untargeted genes:     {}", summary.skipped_for(SkipReason::UntargetedGene));
    println!("Malformed:            {}", summary.skipped_for(SkipReason::Malformed));
    println!("Extraction:           {:?}", start.elapsed());
}

fn list_drugs() {
    let rules = RuleTable::builtin();
    println!("Supported drugs:");
    for rule in rules.iter() {
        let genes: Vec<String> = rule.required_genes.iter().map(Gene::to_string).collect();
        println!(
            "  {:<13} genes: {:<8} risk if '{}' -> {}",
            rule.drug,
            genes.join(","),
            rule.risk_phenotype,
            rule.recommendation_on_risk
        );
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
