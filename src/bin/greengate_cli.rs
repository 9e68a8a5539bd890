use greengate::{
    ENZYMES, about,
    assembly::{AssemblyOutcome, CloningReport, LigationStep, SequenceAssembler},
    document::Document,
    executor::DesignatedThread,
    logging::setup_logging,
    options::CloningParameters,
};
use serde::Serialize;
use std::{env, sync::Arc};

#[derive(Serialize)]
struct ProductSummary {
    name: String,
    length: usize,
    circular: bool,
    annotations: usize,
}

#[derive(Serialize)]
struct ReportSummary {
    enzyme: String,
    fragment_count: usize,
    outcome: AssemblyOutcome,
    ligations: Vec<LigationStep>,
    products: Vec<ProductSummary>,
    warnings: Vec<String>,
    messages: Vec<String>,
    output: Option<String>,
}

struct GlobalArgs {
    params_path: Option<String>,
    enzyme: Option<String>,
    output: Option<String>,
    verbosity: u8,
    quiet: bool,
}

fn usage() {
    eprintln!(
        "Usage:\n  \
  greengate_cli --version\n  \
  greengate_cli enzymes\n  \
  greengate_cli [--params PATH] [--enzyme NAME] [--output OUT.gb] [-v|-q] assemble FILE...\n\n  \
  Files are read as FASTA (.fa, .fasta, .fna, .fas) or GenBank (anything else).\n  \
  The first file provides the destination fragment."
    );
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Could not serialize JSON output: {e}"))?;
    println!("{text}");
    Ok(())
}

fn option_value(args: &[String], idx: usize) -> Result<String, String> {
    args.get(idx + 1)
        .cloned()
        .ok_or_else(|| format!("Missing value for {}", args[idx]))
}

/// Consumes leading options; returns them and the index of the command.
fn parse_global_args(args: &[String]) -> Result<(GlobalArgs, usize), String> {
    let mut ret = GlobalArgs {
        params_path: None,
        enzyme: None,
        output: None,
        verbosity: 0,
        quiet: false,
    };
    let mut idx = 1;
    while idx < args.len() {
        match args[idx].as_str() {
            "--params" => ret.params_path = Some(option_value(args, idx)?),
            "--enzyme" => ret.enzyme = Some(option_value(args, idx)?),
            "--output" | "-o" => ret.output = Some(option_value(args, idx)?),
            "-q" | "--quiet" => {
                ret.quiet = true;
                idx += 1;
                continue;
            }
            arg if arg.starts_with("-v") && arg[1..].chars().all(|c| c == 'v') => {
                ret.verbosity = ret.verbosity.saturating_add((arg.len() - 1) as u8);
                idx += 1;
                continue;
            }
            _ => break,
        }
        idx += 2;
    }
    Ok((ret, idx))
}

fn summarize(report: &CloningReport, output: Option<String>) -> ReportSummary {
    ReportSummary {
        enzyme: report.enzyme.clone(),
        fragment_count: report.fragment_count,
        outcome: report.outcome,
        ligations: report.ligations.clone(),
        products: report
            .products
            .iter()
            .map(|dna| ProductSummary {
                name: dna.name().to_string(),
                length: dna.len(),
                circular: dna.is_circular(),
                annotations: dna.annotations().len(),
            })
            .collect(),
        warnings: report.warnings.clone(),
        messages: report.messages.clone(),
        output,
    }
}

fn assemble(global: GlobalArgs, files: &[String]) -> Result<(), String> {
    let mut params = match &global.params_path {
        Some(path) => CloningParameters::load_from_path(path).map_err(|e| e.to_string())?,
        None => CloningParameters::default(),
    };
    if let Some(enzyme) = global.enzyme {
        params.enzyme = enzyme;
    }
    let enzyme = params.resolve_enzyme().map_err(|e| e.to_string())?;

    let documents = files
        .iter()
        .map(|path| Document::load_from_file(path))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.to_string())?;
    params
        .validate_documents(&documents)
        .map_err(|e| e.to_string())?;

    let owner = DesignatedThread::spawn("greengate-config").map_err(|e| e.to_string())?;
    let report = SequenceAssembler::default()
        .with_owning_thread(Arc::new(owner))
        .perform_cloning(&enzyme, &documents)
        .map_err(|e| e.to_string())?;

    if let (Some(path), Some(product)) = (&global.output, report.product()) {
        product
            .write_genbank_file(path)
            .map_err(|e| format!("Could not write GenBank output '{path}': {e}"))?;
    }
    print_json(&summarize(&report, global.output))
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args: Vec<String> = env::args().collect();
    if args.len() <= 1 {
        usage();
        return Err("Missing command".to_string());
    }
    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("{}", about::version_cli_text());
        return Ok(());
    }

    let (global, cmd_idx) = parse_global_args(&args)?;
    if args.len() <= cmd_idx {
        usage();
        return Err("Missing command".to_string());
    }
    setup_logging(global.verbosity, global.quiet).map_err(|e| e.to_string())?;

    let command = &args[cmd_idx];
    match command.as_str() {
        "enzymes" => print_json(&ENZYMES.restriction_enzymes()),
        "assemble" => {
            let files = &args[cmd_idx + 1..];
            if files.is_empty() {
                usage();
                return Err("assemble requires at least one file".to_string());
            }
            assemble(global, files)
        }
        _ => {
            usage();
            Err(format!("Unknown command '{command}'"))
        }
    }
}
