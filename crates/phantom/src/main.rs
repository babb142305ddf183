use std::path::PathBuf;
use std::process::ExitCode;

use tracing::error;
use tracing_subscriber::EnvFilter;

use nema_phantom::{build_phantom, PhantomError, PhantomParams};
use phantom_assembly::AssemblySummary;

const USAGE: &str = "usage: nema-phantom [--json] [PARAMS.json]";

struct Args {
    json: bool,
    params: Option<PathBuf>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        json: false,
        params: None,
    };
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--json" => args.json = true,
            "-h" | "--help" => return Err(USAGE.to_string()),
            flag if flag.starts_with('-') => return Err(format!("unknown option '{flag}'\n{USAGE}")),
            path if args.params.is_none() => args.params = Some(PathBuf::from(path)),
            _ => return Err(USAGE.to_string()),
        }
    }
    Ok(args)
}

fn run(args: &Args) -> Result<String, PhantomError> {
    let params = match &args.params {
        Some(path) => PhantomParams::from_file(path)?,
        None => PhantomParams::default(),
    };
    let model = build_phantom(&params)?;
    let summary = AssemblySummary::of(&model.filled);
    if args.json {
        Ok(format!("{}\n", summary.to_json()?))
    } else {
        Ok(summary.to_string())
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "nema_phantom=info".into()))
        .with_writer(std::io::stderr)
        .init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::from(2);
        }
    };
    match run(&args) {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "phantom build failed");
            ExitCode::FAILURE
        }
    }
}
