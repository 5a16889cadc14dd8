use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::{ArgAction, Parser};
use color_eyre::eyre::{Result, WrapErr, eyre};
use serde_json::Value;

use screenform::{
    DocumentFormat, FormSession, FormValues, OutputDestination, OutputOptions, audit_dependencies,
    emit, load_screen_config, parse_document_str, render_blueprint, validate,
};

#[derive(Debug, Parser)]
#[command(
    name = "screenform",
    version,
    about = "Validate, audit, and render screen configuration documents"
)]
struct Cli {
    /// Screen spec: file path or "-" for stdin. Accepts a bare screen
    /// configuration or a persisted document envelope.
    #[arg(short = 's', long = "screen", value_name = "SPEC")]
    screen: String,

    /// Form values file (JSON object of field -> value) used when rendering
    #[arg(short = 'v', long = "values", value_name = "FILE")]
    values: Option<PathBuf>,

    /// Emit the render blueprint instead of just validating
    #[arg(short = 'b', long = "blueprint")]
    blueprint: bool,

    /// Report authoring problems the validator does not reject
    #[arg(short = 'a', long = "audit")]
    audit: bool,

    /// Output destinations ("-" writes to stdout). Accepts multiple values per flag use.
    #[arg(short = 'o', long = "output", value_name = "DEST", num_args = 1.., action = ArgAction::Append)]
    outputs: Vec<String>,

    /// Emit compact JSON rather than pretty formatting
    #[arg(long = "no-pretty")]
    no_pretty: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let raw = read_screen(&cli.screen)?;
    let candidate = unwrap_envelope(&raw);

    let report = validate(candidate);
    if !report.valid {
        for error in &report.errors {
            eprintln!("error: {error}");
        }
        return Err(eyre!(
            "screen configuration is invalid ({} error{})",
            report.errors.len(),
            if report.errors.len() == 1 { "" } else { "s" }
        ));
    }

    let config = load_screen_config(candidate).map_err(|err| eyre!(err))?;

    if cli.audit {
        let findings = audit_dependencies(&config);
        if findings.is_empty() {
            eprintln!("audit: no findings");
        }
        for finding in &findings {
            eprintln!("warning [{}]: {}", finding.widget_id, finding.message);
        }
        if !cli.blueprint {
            return Ok(());
        }
    }

    if cli.blueprint {
        let initial = match &cli.values {
            Some(path) => {
                let contents = fs::read_to_string(path)
                    .wrap_err_with(|| format!("failed to read values file {}", path.display()))?;
                let parsed = parse_document_str(&contents, DocumentFormat::from_path(path))
                    .map_err(|err| eyre!(err))?;
                form_values(parsed)
                    .ok_or_else(|| eyre!("values file must contain a JSON object"))?
            }
            None => FormValues::new(),
        };
        let session = FormSession::with_initial_values(&config, initial);
        let rendered = render_blueprint(&config, &session);
        let options = OutputOptions::new(DocumentFormat::Json)
            .with_pretty(!cli.no_pretty)
            .with_destinations(destinations(&cli.outputs));
        emit(&rendered, &options).map_err(|err| eyre!(err))?;
        return Ok(());
    }

    eprintln!("screen configuration is valid");
    Ok(())
}

fn read_screen(spec: &str) -> Result<Value> {
    if spec == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .wrap_err("failed to read screen from stdin")?;
        return parse_document_str(&buffer, DocumentFormat::Json).map_err(|err| eyre!(err));
    }
    let contents =
        fs::read_to_string(spec).wrap_err_with(|| format!("failed to read screen file {spec}"))?;
    parse_document_str(&contents, DocumentFormat::from_path(spec)).map_err(|err| eyre!(err))
}

// A persisted document wraps the configuration under `config`; a bare
// configuration is used as-is.
fn unwrap_envelope(raw: &Value) -> &Value {
    match raw.get("config") {
        Some(config) if raw.get("screenKey").is_some() => config,
        _ => raw,
    }
}

fn destinations(outputs: &[String]) -> Vec<OutputDestination> {
    if outputs.is_empty() {
        return vec![OutputDestination::Stdout];
    }
    outputs
        .iter()
        .map(|output| {
            if output == "-" {
                OutputDestination::Stdout
            } else {
                OutputDestination::file(output)
            }
        })
        .collect()
}

// Converts a JSON object into the ordered map the form session expects.
fn form_values(value: Value) -> Option<FormValues> {
    match value {
        Value::Object(map) => Some(map.into_iter().collect()),
        _ => None,
    }
}
