use clap::{Parser, Subcommand};
use std::process::ExitCode;

use downlink_o_mat::analysis::{analyze, AnalysisMode, AnalysisReport, AnalysisRequest};
use downlink_o_mat::catalog::Catalog;
use downlink_o_mat::config::{Config, OutputFormat};

#[derive(Parser)]
#[command(name = "downlink-o-mat")]
#[command(about = "Satellite downlink contact analysis")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an analysis request and print the report
    Analyze {
        request: String,
        #[arg(long)]
        config: Option<String>,
        /// Catalog file, overrides the one named in the config
        #[arg(long)]
        catalog: Option<String>,
        #[arg(long, value_enum)]
        mode: Option<AnalysisMode>,
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Check a request against the catalog without analysing it
    Validate {
        request: String,
        #[arg(long)]
        config: Option<String>,
        #[arg(long)]
        catalog: Option<String>,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            request,
            config,
            catalog,
            mode,
            format,
        } => run_analyze(&request, config, catalog, mode, format),
        Commands::Validate {
            request,
            config,
            catalog,
        } => validate(&request, config, catalog),
    }
}

/// Config, catalog and request, in that order.
fn load(
    request: &str,
    config: Option<String>,
    catalog: Option<String>,
) -> Result<(Config, Catalog, AnalysisRequest), String> {
    let config = match config {
        Some(path) => Config::from_file(&path).map_err(|e| format!("Config error: {}", e))?,
        None => Config::default(),
    };
    let catalog_path = catalog
        .or_else(|| {
            config
                .catalog
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned())
        })
        .ok_or_else(|| "No catalog given (use --catalog or set catalog in the config)".to_string())?;
    let catalog =
        Catalog::from_file(&catalog_path).map_err(|e| format!("Catalog error: {}", e))?;
    let request =
        AnalysisRequest::from_file(request).map_err(|e| format!("Request error: {}", e))?;
    Ok((config, catalog, request))
}

fn run_analyze(
    request: &str,
    config: Option<String>,
    catalog: Option<String>,
    mode: Option<AnalysisMode>,
    format: Option<OutputFormat>,
) -> ExitCode {
    let (config, catalog, mut request) = match load(request, config, catalog) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(mode) = mode {
        request.mode = mode;
    }

    let report = match analyze(&request, &catalog, &config) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Analysis failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match render(&report, format.unwrap_or(config.output.format)) {
        Ok(text) => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Output error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn render(report: &AnalysisReport, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => report.to_json().map_err(|e| e.to_string()),
        OutputFormat::Yaml => report.to_yaml().map_err(|e| e.to_string()),
    }
}

fn validate(request: &str, config: Option<String>, catalog: Option<String>) -> ExitCode {
    let (_, catalog, request) = match load(request, config, catalog) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let antennas = match catalog.select_antennas(&request.antennas) {
        Ok(antennas) => antennas,
        Err(e) => {
            eprintln!("Catalog error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = catalog.select_operators(&request.operators) {
        eprintln!("Catalog error: {}", e);
        return ExitCode::FAILURE;
    }

    println!(
        "Request is valid ({} mode, {} to {}, {} antennas)",
        request.mode,
        request.start,
        request.end,
        antennas.len()
    );
    for antenna in antennas {
        let station = catalog
            .ground_station(antenna.ground_station)
            .map(|gs| gs.name.as_str())
            .unwrap_or("?");
        println!("  {}: {} @ {}", antenna.id, antenna.name, station);
    }
    ExitCode::SUCCESS
}
