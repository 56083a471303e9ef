//! # iface-adapter
//!
//! Command-line front end: run adapter scripts, invoke an adapter export of a
//! text module, or dump a module's adapter signatures as JSON.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use iface_adapter::adapter::{AdapterModule, Config, DEFAULT_MAX_STACK_DEPTH};
use iface_adapter::runtime::{dummy_values, Instance, Value};
use iface_adapter::{wast, wat};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "iface-adapter")]
#[command(about = "Interface adapter loader, runner and script tester")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Use verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Reject `@interface` adapter definitions
    #[arg(long)]
    no_interface_types: bool,

    /// Largest operand stack an adapter may need
    #[arg(long, default_value_t = DEFAULT_MAX_STACK_DEPTH)]
    max_stack_depth: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one or more .wast adapter scripts
    Run {
        /// Script files
        #[arg(required = true)]
        scripts: Vec<PathBuf>,
    },

    /// Invoke an exported adapter of a text module
    Invoke {
        /// Module file
        module: PathBuf,
        /// Export name
        export: String,
        /// Arguments as `type:value`, e.g. `i32:-1` or `u16:0xffff`
        args: Vec<String>,
        /// Call with zero values of the parameter types instead of `args`
        #[arg(long, conflicts_with = "args")]
        dummy: bool,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the adapter signatures of a module as JSON
    Inspect {
        /// Module file
        module: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let config = Config::new()
        .wasm_interface_types(!cli.no_interface_types)
        .max_stack_depth(cli.max_stack_depth);

    match cli.command {
        Commands::Run { scripts } => run_scripts(&scripts, &config),
        Commands::Invoke {
            module,
            export,
            args,
            dummy,
            json,
        } => invoke(&module, &export, &args, dummy, json, &config),
        Commands::Inspect { module } => {
            let module = load_module(&module, &config)?;
            let signatures: Vec<_> = module.adapters().iter().map(|a| a.signature()).collect();
            println!("{}", serde_json::to_string_pretty(&signatures)?);
            Ok(())
        }
    }
}

fn load_module(path: &Path, config: &Config) -> Result<AdapterModule> {
    let source = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    wat::parse_with_config(&source, config).with_context(|| format!("failed to load {}", path.display()))
}

fn run_scripts(scripts: &[PathBuf], config: &Config) -> Result<()> {
    let mut failed = 0;
    for path in scripts {
        let source = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
        let report =
            wast::run_script_with_config(&source, config).with_context(|| format!("failed to parse {}", path.display()))?;

        for failure in &report.failures {
            eprintln!("{}: {failure}", path.display());
        }
        println!(
            "{}: {} module(s), {} assertion(s) passed, {} failed, {} skipped",
            path.display(),
            report.modules,
            report.assertions(),
            report.failures.len(),
            report.skipped
        );
        if !report.passed() {
            failed += 1;
        }
    }
    if failed > 0 {
        bail!("{failed} of {} script(s) failed", scripts.len());
    }
    Ok(())
}

fn invoke(path: &Path, export: &str, args: &[String], dummy: bool, json: bool, config: &Config) -> Result<()> {
    let instance = Instance::new(load_module(path, config)?);
    let func = instance
        .get_export(export)
        .ok_or_else(|| anyhow!("no adapter exported as {export:?} in {}", path.display()))?;

    let args = if dummy {
        dummy_values(func.params())
    } else {
        args.iter().map(|arg| parse_arg(arg)).collect::<Result<Vec<_>>>()?
    };

    let results = instance
        .invoke(export, args)
        .with_context(|| format!("invoking {export}"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        for value in &results {
            println!("{value}");
        }
    }
    Ok(())
}

/// Parse a `type:value` command-line argument.
fn parse_arg(arg: &str) -> Result<Value> {
    let (ty, value) = arg
        .split_once(':')
        .ok_or_else(|| anyhow!("argument {arg:?} is not of the form type:value"))?;
    Value::from_strings(ty, value).map_err(|e| anyhow!(e))
}
