use desadv_decoder::config::runtime::{FormatVariant, Strictness};
use desadv_decoder::{batch, logging, pipeline};
use std::env;
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize global logging system
    logging::init_global_logging()?;

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <interchange-file|inbox-directory> [options]", args[0]);
        eprintln!("       {} --help", args[0]);
        std::process::exit(1);
    }

    if args[1] == "--help" {
        print_help(&args[0]);
        return Ok(());
    }

    let input_path = Path::new(&args[1]);
    let (options, progress_reporting) = parse_options(&args[2..]);

    if input_path.is_file() {
        process_single_file(input_path, options)?;
    } else if input_path.is_dir() {
        process_inbox(input_path, options, progress_reporting)?;
    } else {
        eprintln!("Error: Input must be an interchange file or an inbox directory");
        eprintln!("  Path: {}", input_path.display());
        std::process::exit(1);
    }

    Ok(())
}

fn print_help(program_name: &str) {
    println!("DESADV decoder v{}", env!("CARGO_PKG_VERSION"));
    println!("Decodes despatch-advice interchanges into shipment documents");
    println!();
    println!("USAGE:");
    println!(
        "    {} <file.txt>                     # Decode a single interchange",
        program_name
    );
    println!(
        "    {} <inbox-dir> [options]          # Decode every file in an inbox",
        program_name
    );
    println!();
    println!("OPTIONS:");
    println!("    --help          Show this help message");
    println!("    --strict        Abort a document on the first bad line (default)");
    println!("    --permissive    Drop bad line groups and keep decoding");
    println!("    --edifact       Expect EDIFACT control characters instead of pipes");
    println!("    --quiet         Suppress per-file progress reporting");
    println!();
    println!("Known interchange extensions: .txt, .edi, .pla");
    println!("Files whose leading record is not the DESADV sentinel are skipped");
    println!("silently; unrelated formats routinely share the inbox.");
}

fn parse_options(args: &[String]) -> (pipeline::DecodeOptions, bool) {
    let mut variant = FormatVariant::LegacyPipe;
    let mut strictness = Strictness::Strict;
    let mut progress_reporting = true;

    for arg in args {
        match arg.as_str() {
            "--strict" => strictness = Strictness::Strict,
            "--permissive" => strictness = Strictness::Permissive,
            "--edifact" => variant = FormatVariant::Edifact,
            "--quiet" => progress_reporting = false,
            _ => {
                eprintln!("Warning: Unknown option '{}'", arg);
            }
        }
    }

    (
        pipeline::DecodeOptions::new(variant, strictness),
        progress_reporting,
    )
}

fn process_single_file(
    path: &Path,
    options: pipeline::DecodeOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Processing file: {}", path.display());

    match pipeline::decode_file(path, options) {
        Ok(pipeline::DecodeOutcome::Document(decoded)) => {
            println!("\nSUCCESS: document decoded");
            print_document_summary(&decoded);
            logging::print_cargo_style_summary();
        }
        Ok(pipeline::DecodeOutcome::NotThisFormat) => {
            println!("\nSKIPPED: not a DESADV interchange");
        }
        Err(error) => {
            eprintln!("\nFAILED: {}", error);
            eprintln!("  code: {}", error.error_code());
            logging::print_cargo_style_summary();
            std::process::exit(1);
        }
    }

    Ok(())
}

fn process_inbox(
    inbox: &Path,
    options: pipeline::DecodeOptions,
    progress_reporting: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Starting batch run: {}", inbox.display());

    let config = batch::BatchConfig {
        inbox_path: inbox.to_path_buf(),
        options,
        progress_reporting,
    };

    match batch::run_batch(&config) {
        Ok(results) => {
            println!("\nBatch run completed!");
            print_batch_results(&results);
            logging::print_cargo_style_summary();

            if results.has_failures() {
                std::process::exit(1);
            }
        }
        Err(error) => {
            eprintln!("Batch run failed: {}", error);
            logging::print_cargo_style_summary();
            std::process::exit(1);
        }
    }

    Ok(())
}

fn print_document_summary(decoded: &pipeline::DecodedDocument) {
    let doc = &decoded.document;
    println!("  Document: {}", doc.number);
    println!("  Lines: {}", doc.lines.len());
    if let Some(date) = doc.expedition_date {
        println!("  Expedition date: {}", date);
    }
    for supplier in &doc.suppliers {
        println!("  Party {}: {}", supplier.qualifier, supplier.identifier);
    }
    if !decoded.line_errors.is_empty() {
        println!("\nDropped line groups:");
        for dropped in &decoded.line_errors {
            println!("  {} at {}: {}", dropped.line_code, dropped.pos, dropped.error);
        }
    }
}

fn print_batch_results(results: &batch::BatchResults) {
    println!("Batch Summary:");
    println!("  Files decoded: {}", results.decoded_count());
    println!("  Not this format: {}", results.not_this_format.len());
    println!("  Failed: {}", results.failed.len());
    println!("  Skipped (unknown extension): {}", results.skipped.len());

    if !results.failed.is_empty() {
        println!("\nFailed Files:");
        for (path, error) in &results.failed {
            println!("  {}: {}", path.display(), error);
        }
    }

    if !results.decoded.is_empty() && results.decoded.len() <= 10 {
        println!("\nDecoded Documents:");
        for (path, decoded) in &results.decoded {
            println!(
                "  {}: {} ({} lines)",
                path.display(),
                decoded.document.number,
                decoded.document.lines.len()
            );
        }
    }
}
