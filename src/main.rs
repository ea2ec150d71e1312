// src/main.rs
//! Vector exp harness CLI
//! Runs the kernel harness and provides dataset and trace tooling

use clap::{Arg, ArgAction, ArgMatches, Command};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use vexp_harness::config::HarnessConfig;
use vexp_harness::dataset::ExpDatasets;
use vexp_harness::harness::{self, HarnessDriver};
use vexp_harness::pipeview::{self, KindFilter, PipeViewOptions, DEFAULT_CYCLE_TIME};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let matches = cli().get_matches();

    match matches.subcommand() {
        Some(("run", sub_matches)) => {
            cmd_run(Some(sub_matches))?;
        }
        Some(("validate", sub_matches)) => {
            cmd_validate(sub_matches)?;
        }
        Some(("config-gen", sub_matches)) => {
            cmd_config_gen(sub_matches)?;
        }
        Some(("gen-data", sub_matches)) => {
            cmd_gen_data(sub_matches)?;
        }
        Some(("pipeview", sub_matches)) => {
            cmd_pipeview(sub_matches)?;
        }
        _ => {
            cmd_run(None)?;
        }
    }

    Ok(())
}

fn cli() -> Command {
    Command::new("vexp-harness")
        .version("0.1.0")
        .about("Correctness and cycle-count harness for vector exp kernels")
        .subcommand(
            Command::new("run")
                .about("Run all kernel variants and check their results")
                .arg(Arg::new("config")
                    .short('c')
                    .long("config")
                    .value_name("FILE")
                    .help("Configuration file (defaults if omitted)"))
        )
        .subcommand(
            Command::new("validate")
                .about("Validate harness configuration file")
                .arg(Arg::new("config")
                    .short('c')
                    .long("config")
                    .value_name("FILE")
                    .help("Configuration file to validate")
                    .required(true))
        )
        .subcommand(
            Command::new("config-gen")
                .about("Generate default configuration file")
                .arg(Arg::new("output")
                    .short('o')
                    .long("output")
                    .value_name("FILE")
                    .help("Output file path")
                    .default_value("config/vexp-default.toml"))
        )
        .subcommand(
            Command::new("gen-data")
                .about("Emit the input and golden dataset")
                .arg(Arg::new("config")
                    .short('c')
                    .long("config")
                    .value_name("FILE")
                    .help("Configuration file (defaults if omitted)"))
                .arg(Arg::new("format")
                    .short('f')
                    .long("format")
                    .help("Output format")
                    .value_parser(["json", "asm"])
                    .default_value("json"))
                .arg(Arg::new("output")
                    .short('o')
                    .long("output")
                    .value_name("FILE")
                    .help("Output file path (stdout if omitted)"))
        )
        .subcommand(
            Command::new("pipeview")
                .about("Convert a Saturn simulation log to an O3PipeView trace")
                .arg(Arg::new("cycle-time")
                    .short('c')
                    .long("cycle-time")
                    .help("Ticks per cycle")
                    .value_parser(clap::value_parser!(u64))
                    .default_value("1000"))
                .arg(Arg::new("compute")
                    .short('X')
                    .long("compute")
                    .help("Show compute instructions")
                    .action(ArgAction::SetTrue))
                .arg(Arg::new("load")
                    .short('L')
                    .long("load")
                    .help("Show load instructions")
                    .action(ArgAction::SetTrue))
                .arg(Arg::new("store")
                    .short('S')
                    .long("store")
                    .help("Show store instructions")
                    .action(ArgAction::SetTrue))
                .arg(Arg::new("unretired")
                    .short('u')
                    .long("unretired")
                    .help("Show instructions that were never issued")
                    .action(ArgAction::SetTrue))
                .arg(Arg::new("input")
                    .value_name("LOG")
                    .help("Simulation log")
                    .required(true))
        )
}

fn load_config(matches: Option<&ArgMatches>) -> Result<HarnessConfig, Box<dyn std::error::Error>> {
    match matches.and_then(|m| m.get_one::<String>("config")) {
        Some(path) => {
            log::info!("loading configuration from {}", path);
            Ok(HarnessConfig::from_file(path)?)
        }
        None => Ok(HarnessConfig::default()),
    }
}

/// Opens `path` for writing, or stdout when no path is given.
fn output_writer(path: Option<&String>) -> Result<Box<dyn Write>, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            if let Some(parent) = Path::new(path).parent() {
                std::fs::create_dir_all(parent)?;
            }
            Ok(Box::new(BufWriter::new(File::create(path)?)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout()))),
    }
}

fn cmd_run(matches: Option<&ArgMatches>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(matches)?;

    let result = HarnessDriver::from_config(config).and_then(|mut driver| {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        let report = driver.run(&mut out);
        out.flush()?;
        report
    });

    match &result {
        Ok(report) => log::info!(
            "checked {} variants, {} cycles total",
            report.checked.len(),
            report.total_cycles()
        ),
        Err(e) => eprintln!("{}", e),
    }

    std::process::exit(harness::exit_code(&result));
}

fn cmd_validate(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = matches
        .get_one::<String>("config")
        .ok_or("missing configuration path")?;

    println!("Validating harness configuration: {}", config_path);

    match HarnessConfig::from_file(config_path) {
        Ok(config) => {
            println!("✓ Configuration is valid");
            println!("  64-bit elements: {}", config.dataset.expected_f64);
            println!("  32-bit elements: {}", config.dataset.expected_f32);
            println!("  Tolerance: {}", config.validation.tolerance);
            println!("  Counters: {}", config.counters.source);
            if let Some(file) = &config.dataset.file {
                println!("  Dataset file: {}", file.display());
            }
        }
        Err(e) => {
            eprintln!("✗ Configuration validation failed: {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}

fn cmd_config_gen(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let output_path = matches
        .get_one::<String>("output")
        .ok_or("missing output path")?;

    println!("Generating default harness configuration: {}", output_path);

    if let Some(parent) = Path::new(output_path).parent() {
        std::fs::create_dir_all(parent)?;
    }

    HarnessConfig::default().save_to_file(output_path)?;

    println!("✓ Configuration saved to {}", output_path);
    println!("  Use 'vexp-harness validate -c {}' to verify", output_path);

    Ok(())
}

fn cmd_gen_data(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(Some(matches))?;
    config.validate()?;
    let datasets = ExpDatasets::from_config(&config.dataset)?;

    let mut out = output_writer(matches.get_one::<String>("output"))?;
    match matches.get_one::<String>("format").map(String::as_str) {
        Some("asm") => datasets.write_assembly(&mut out)?,
        _ => writeln!(out, "{}", datasets.to_json_string()?)?,
    }
    out.flush()?;

    log::info!(
        "wrote {} 64-bit and {} 32-bit elements",
        datasets.len_f64(),
        datasets.len_f32()
    );
    Ok(())
}

fn cmd_pipeview(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let input = matches.get_one::<String>("input").ok_or("missing log path")?;

    let options = PipeViewOptions {
        cycle_time: matches
            .get_one::<u64>("cycle-time")
            .copied()
            .unwrap_or(DEFAULT_CYCLE_TIME),
        filter: KindFilter::from_flags(
            matches.get_flag("compute"),
            matches.get_flag("load"),
            matches.get_flag("store"),
        ),
        show_unretired: matches.get_flag("unretired"),
    };

    let reader = BufReader::new(File::open(input)?);
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let count = pipeview::convert(reader, &options, &mut out)?;
    out.flush()?;

    log::info!("converted {} instructions from {}", count, input);
    Ok(())
}
