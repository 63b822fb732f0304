//! CLI entry point for the `ls8` virtual machine binary.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

use ls8::loader::parse_program;
use ls8_core::{run, run_traced, Fault, Machine, OutputSink, RunConfig, TraceSink};
#[cfg(test)]
use tempfile as _;
use thiserror as _;

const USAGE_TEXT: &str = "\
Usage: ls8 <program.ls8> [options]

Options:
  -t, --trace          Print a machine-state trace line to stderr before
                       each instruction
  --max-steps <n>      Abort if the program has not halted after n
                       instructions
  -h, --help           Show this help message

Examples:
  ls8 demos/mult.ls8
  ls8 demos/call.ls8 --trace
";

#[derive(Debug, PartialEq, Eq)]
struct RunArgs {
    program: PathBuf,
    trace: bool,
    max_steps: Option<u64>,
}

#[derive(Debug)]
enum ParseResult {
    Run(RunArgs),
    Help,
}

#[allow(clippy::while_let_on_iterator)]
fn parse_args(mut args: impl Iterator<Item = OsString>) -> Result<ParseResult, String> {
    let mut program: Option<PathBuf> = None;
    let mut trace = false;
    let mut max_steps: Option<u64> = None;

    while let Some(arg) = args.next() {
        if arg == "--help" || arg == "-h" {
            return Ok(ParseResult::Help);
        }

        if arg == "--trace" || arg == "-t" {
            trace = true;
            continue;
        }

        if arg == "--max-steps" {
            let value = args
                .next()
                .ok_or_else(|| "missing value for --max-steps".to_string())?;
            let parsed = value
                .to_string_lossy()
                .parse::<u64>()
                .map_err(|_| format!("invalid --max-steps value: {}", value.to_string_lossy()))?;
            max_steps = Some(parsed);
            continue;
        }

        if arg.to_string_lossy().starts_with('-') {
            return Err(format!("unknown option: {}", arg.to_string_lossy()));
        }

        if program.is_some() {
            return Err("multiple program paths provided".to_string());
        }
        program = Some(PathBuf::from(arg));
    }

    let program = program.ok_or_else(|| "missing program path".to_string())?;
    Ok(ParseResult::Run(RunArgs {
        program,
        trace,
        max_steps,
    }))
}

/// Sink that prints each `PRN` value to stdout, one decimal value per
/// line.
struct StdoutSink;

impl OutputSink for StdoutSink {
    fn print_value(&mut self, value: u8) {
        println!("{value}");
    }
}

/// Trace hook that prints one machine-state line to stderr per step,
/// keeping traced output away from `PRN` values on stdout.
struct StderrTrace;

impl TraceSink for StderrTrace {
    fn on_step(&mut self, machine: &Machine) {
        eprintln!("{}", machine.trace_line());
    }
}

fn execute(machine: &mut Machine, args: &RunArgs) -> Result<(), Fault> {
    let mut sink = StdoutSink;
    let config = RunConfig {
        step_budget: args.max_steps,
    };

    if args.trace {
        run_traced(machine, &mut sink, &config, &mut StderrTrace).map(|_| ())
    } else {
        run(machine, &mut sink, &config).map(|_| ())
    }
}

fn run_program(args: &RunArgs) -> Result<(), i32> {
    let source = match fs::read_to_string(&args.program) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("error: cannot read {}: {e}", args.program.display());
            return Err(2);
        }
    };

    let image = match parse_program(&source) {
        Ok(image) => image,
        Err(e) => {
            eprintln!("{}: error: {e}", args.program.display());
            return Err(1);
        }
    };

    let mut machine = Machine::new();
    if let Err(e) = machine.load_program(&image) {
        eprintln!("error: {e}");
        return Err(1);
    }

    if let Err(e) = execute(&mut machine, args) {
        eprintln!("error: {e}");
        return Err(1);
    }

    Ok(())
}

fn main() {
    let exit_code = match parse_args(env::args_os().skip(1)) {
        Ok(ParseResult::Help) => {
            println!("{USAGE_TEXT}");
            0
        }
        Ok(ParseResult::Run(args)) => match run_program(&args) {
            Ok(()) => 0,
            Err(code) => code,
        },
        Err(error) => {
            eprintln!("error: {error}");
            eprintln!("{USAGE_TEXT}");
            1
        }
    };

    std::process::exit(exit_code);
}
