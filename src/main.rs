use std::env;
use std::path::Path;
use std::process;
use veem::assembler::assemble_file;
use veem::config::{Config, NumericKind, VmConfig};
use veem::vm::{Value, VirtualMachine};

/// Assembles the program file for numeric type `V` and runs it.
///
/// # Returns
/// * `Ok(String)` - The final value, formatted for printing.
/// * `Err(String)` - Error message if assembly or execution fails.
fn run_program<V: Value>(program_file: &Path, vm_config: &VmConfig) -> Result<String, String> {
    log::info!(
        "Assembling '{}' as a {} program...",
        program_file.display(),
        V::NAME
    );
    let program = assemble_file::<V>(program_file)
        .map_err(|e| format!("Failed to assemble program: {}", e))?;
    log::info!("Program assembled: {} instructions.", program.len());

    let result = VirtualMachine::with_config(&program, vm_config)
        .run()
        .map_err(|e| format!("Execution failed: {}", e))?;
    Ok(result.to_string())
}

fn main() {
    env_logger::init();
    log::info!("Booting veem...");

    let config_path = env::args().nth(1).unwrap_or_else(|| "config.toml".to_string());
    let config = match Config::load(Path::new(&config_path)) {
        Ok(c) => c,
        Err(e) => {
            log::error!("Failed to load configuration '{}': {}", config_path, e);
            process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        log::error!("{}", e);
        process::exit(1);
    }
    log::info!("Configuration loaded and validated.");

    let program_file = Path::new(&config.program_file);
    let outcome = match config.numeric {
        NumericKind::I8 => run_program::<i8>(program_file, &config.vm),
        NumericKind::I16 => run_program::<i16>(program_file, &config.vm),
        NumericKind::I32 => run_program::<i32>(program_file, &config.vm),
        NumericKind::I64 => run_program::<i64>(program_file, &config.vm),
        NumericKind::F64 => run_program::<f64>(program_file, &config.vm),
    };

    match outcome {
        Ok(value) => println!("{}", value),
        Err(e) => {
            log::error!("{}", e);
            process::exit(1);
        }
    }
}
