use mailbuilder_mjml::{compile_request, CompileError, CompileRequest};
use std::env;
use std::fs;
use std::path::Path;
use std::process;

fn main() {
    env_logger::init();
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: mjml-compile <request.json|request.yaml>...");
        eprintln!();
        eprintln!("Examples:");
        eprintln!("  mjml-compile welcome.json");
        eprintln!("  RUST_LOG=debug mjml-compile campaigns/*.yaml");
        process::exit(1);
    }

    let mut exit_code = 0;
    let files: Vec<_> = args[1..].to_vec();

    for file_path in files {
        match compile_file(&file_path) {
            Ok(mjml) => {
                eprintln!("✓ {} compiled", file_path);
                println!("{}", mjml);
            }
            Err(e) => {
                eprintln!("✗ {} has errors:", file_path);
                print_error(&e);
                exit_code = 1;
            }
        }
    }

    process::exit(exit_code);
}

fn compile_file(path: &str) -> Result<String, CompileError> {
    let content = fs::read_to_string(path)
        .map_err(|e| CompileError::InvalidRequest(format!("Failed to read file: {}", e)))?;

    let is_yaml = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
    let request = if is_yaml {
        CompileRequest::from_yaml(&content)?
    } else {
        CompileRequest::from_json(&content)?
    };

    Ok(compile_request(&request, None)?.mjml)
}

fn print_error(error: &CompileError) {
    match error {
        CompileError::InvalidBlockData { id, kind, reason } => {
            eprintln!("  Invalid data for block '{}' ({}):", id, kind);
            eprintln!("    {}", reason);
        }
        CompileError::InvalidTemplateData { reason, .. } => {
            eprintln!("  Template data is not a valid JSON object:");
            eprintln!("    {}", reason);
        }
        CompileError::TemplateRender { id, kind, reason } => {
            eprintln!("  Template error in block '{}' ({}):", id, kind);
            eprintln!("    {}", reason);
        }
        CompileError::InvalidRequest(msg) => {
            eprintln!("  Invalid request:");
            eprintln!("    {}", msg);
        }
        CompileError::DeserializationError(msg) => {
            eprintln!("  Deserialization error:");
            eprintln!("    {}", msg);
        }
    }
}
