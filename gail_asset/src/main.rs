pub(crate) mod mesh;
pub(crate) mod utils;

use anyhow::Result;
use log::{debug, error, info, warn};
use mesh::obj;
use std::path::Path;
use structopt::StructOpt;
use walkdir::WalkDir;

// Cli arguments
#[derive(StructOpt, Debug)]
#[structopt(name = "gail_asset")]
struct CliArgs {
    /// Specify the input folder
    input: String,
    /// Output debug info
    #[structopt(short = "v", long = "verbose")]
    verbose: bool,
}

/// Happens during setup
#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("Input folder does not exist: {0}")]
    InputFolderNonExistent(String),
}

fn main() -> Result<()> {
    let args = CliArgs::from_args();

    if !args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    } else {
        env_logger::Builder::new()
            .filter(None, log::LevelFilter::Debug)
            .init();
    }

    let (processed, failed) = inspect(Path::new(&args.input))?;
    info!("Checked {} models, {} failed", processed, failed);

    Ok(())
}

/// Walks `input_path` and loads every model in it. A broken model is logged
/// and does not stop the walk.
fn inspect(input_path: &Path) -> Result<(usize, usize)> {
    if !input_path.is_dir() {
        return Err(CliError::InputFolderNonExistent(input_path.display().to_string()).into());
    }

    let (mut processed, mut failed) = (0, 0);
    for entry in WalkDir::new(input_path).sort_by_file_name() {
        let path = match &entry {
            Err(err) => {
                warn!("Error parsing path: {}", err);
                continue;
            }
            Ok(entry) => entry.path(),
        };

        if path.is_dir() {
            continue;
        }

        // check extension
        if let Some(Some(extension)) = path.extension().map(|x| x.to_str()) {
            match extension.to_ascii_lowercase().as_ref() {
                "obj" => match obj::process(path) {
                    Ok(Some(_)) => processed += 1,
                    Ok(None) => {}
                    Err(err) => {
                        error!("Failed to process {}: {:#}", path.display(), err);
                        failed += 1;
                    }
                },
                "toml" => debug!("Ignored toml file: {}", &path.display()),
                _ => warn!("Could not handle path: {}", &path.display()),
            }
        } else {
            warn!(
                "Ignored file \"{}\", because no file extension was found.",
                path.display()
            );
        }
    }

    Ok((processed, failed))
}
