use clap::Parser;
use pharmaguard::knowledge::PhenotypeTable;
use pharmaguard::variant::{Gene, TARGET_GENES};
use rand::Rng;
use rand::rngs::ThreadRng;
use rand::seq::IndexedRandom;
use std::fmt::Write as _;
use std::fs;

/// A CLI tool to generate synthetic VCF files for the PharmaGuard extractor
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated VCF file to
    #[arg(short, long, default_value = "generated_patient.vcf")]
    output: String,

    /// The number of data lines to generate
    #[arg(short, long, default_value_t = 50)]
    lines: usize,

    /// Share of lines (0.0 - 1.0) that carry a non-target gene
    #[arg(long, default_value_t = 0.2)]
    untargeted: f64,

    /// Share of lines (0.0 - 1.0) that are deliberately malformed
    #[arg(long, default_value_t = 0.05)]
    malformed: f64,
}

const UNTARGETED_GENES: [&str; 5] = ["CFTR", "BRCA1", "APOE", "HLA-B", "VKORC1"];

// Alleles outside the phenotype table exercise the "Unknown risk" branch.
const UNMAPPED_ALLELES: [&str; 3] = ["*99", "*150", "*4.013"];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut rng = rand::rng();

    for (name, share) in [("--untargeted", cli.untargeted), ("--malformed", cli.malformed)] {
        if !(0.0..=1.0).contains(&share) {
            eprintln!("Error: {} ({}) must be between 0.0 and 1.0", name, share);
            std::process::exit(1);
        }
    }

    println!("Generating synthetic VCF with {} data line(s)...", cli.lines);

    let phenotypes = PhenotypeTable::bundled()?;
    let mut vcf = header();
    let mut counts = [0usize; 3];

    for _ in 0..cli.lines {
        let line = if rng.random_bool(cli.malformed) {
            counts[2] += 1;
            malformed_line(&mut rng)
        } else if rng.random_bool(cli.untargeted) {
            counts[1] += 1;
            untargeted_line(&mut rng)
        } else {
            counts[0] += 1;
            target_line(&mut rng, &phenotypes)
        };
        vcf.push_str(&line);
        vcf.push('\n');
    }

    fs::write(&cli.output, vcf)?;

    println!("-> {} target gene call(s)", counts[0]);
    println!("-> {} untargeted gene call(s)", counts[1]);
    println!("-> {} malformed line(s)", counts[2]);
    println!("Successfully generated and saved VCF to '{}'", cli.output);

    Ok(())
}

fn header() -> String {
    let mut out = String::new();
    out.push_str("##fileformat=VCFv4.2\n");
    out.push_str("##source=pharmaguard-vcf-gen\n");
    out.push_str("##INFO=<ID=GENE,Number=1,Type=String,Description=\"Pharmacogene symbol\">\n");
    out.push_str("##INFO=<ID=STAR,Number=1,Type=String,Description=\"Star allele\">\n");
    out.push_str("#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n");
    out
}

fn data_line(rng: &mut ThreadRng, id: &str, info: &str) -> String {
    let mut line = String::new();
    let bases = ["A", "C", "G", "T"];
    let _ = write!(
        line,
        "{}\t{}\t{}\t{}\t{}\t{}\tPASS\t{}",
        rng.random_range(1..=22),
        rng.random_range(1_000_000..150_000_000),
        id,
        bases.choose(rng).unwrap_or(&"N"),
        bases.choose(rng).unwrap_or(&"N"),
        rng.random_range(20..=99),
        info
    );
    line
}

fn random_rsid(rng: &mut ThreadRng) -> String {
    if rng.random_bool(0.1) {
        ".".to_string()
    } else {
        format!("rs{}", rng.random_range(1_000..99_999_999))
    }
}

fn target_line(rng: &mut ThreadRng, phenotypes: &PhenotypeTable) -> String {
    let gene: Gene = *TARGET_GENES.choose(rng).unwrap_or(&Gene::Cyp2d6);
    let known = phenotypes.alleles(gene);

    let info = if rng.random_bool(0.1) {
        format!("GENE={}", gene)
    } else {
        let star = if rng.random_bool(0.15) || known.is_empty() {
            UNMAPPED_ALLELES.choose(rng).copied().unwrap_or("*99")
        } else {
            known.choose(rng).copied().unwrap_or("*1")
        };
        format!("GENE={};STAR={}", gene, star)
    };

    let id = random_rsid(rng);
    data_line(rng, &id, &info)
}

fn untargeted_line(rng: &mut ThreadRng) -> String {
    let gene = UNTARGETED_GENES.choose(rng).copied().unwrap_or("CFTR");
    let id = random_rsid(rng);
    data_line(rng, &id, &format!("GENE={};STAR=*1", gene))
}

fn malformed_line(rng: &mut ThreadRng) -> String {
    match rng.random_range(0..3) {
        // Too few columns.
        0 => format!("{}\t{}\trs123", rng.random_range(1..=22), rng.random_range(1..1_000_000)),
        // Info column without a GENE key.
        1 => {
            let id = random_rsid(rng);
            data_line(rng, &id, "DP=30;AF=0.5")
        }
        // Blank line.
        _ => String::new(),
    }
}
