use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use log::debug;
use toritocopy::eltorito_parser::{decode, Catalog, Result, ToritoError};

/// Extracts the initial boot image from a bootable "El Torito" CD image.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The CD image or device to read
    source: PathBuf,

    /// Write the boot image to the specified file
    #[arg(short, long)]
    outfile: Option<PathBuf>,
}

// exit codes, stable so scripts can branch on the outcome
const EXIT_NOT_BOOTABLE: u8 = 1;
const EXIT_INVALID: u8 = 2;
const EXIT_NO_CATALOG: u8 = 3;
const EXIT_IO: u8 = 4;

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    match run(&args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(EXIT_IO)
        }
    }
}

fn run(args: &Args) -> Result<ExitCode> {
    let source = &args.source;
    match decode(source)? {
        Catalog::NoCatalog => {
            println!("{}: no \"El Torito\" boot record found.", source.display());
            Ok(ExitCode::from(EXIT_NO_CATALOG))
        }
        Catalog::Decoded(catalog) => {
            println!("{catalog}");
            let valid = catalog.is_valid();
            let bootable = catalog.is_bootable();
            if !valid {
                println!(
                    "{}: \"Booting catalog\" does not validate.",
                    source.display()
                );
                return Ok(ExitCode::from(EXIT_INVALID));
            }
            if !bootable {
                println!(
                    "{}: does not appear to be a bootable \"El Torito\" CD image.",
                    source.display()
                );
                return Ok(ExitCode::from(EXIT_NOT_BOOTABLE));
            }
            if let Some(outfile) = &args.outfile {
                let image = catalog.disk_image()?;
                write_output(outfile, &image)?;
                debug!("run: wrote {} bytes to {:?}", image.len(), outfile);
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn write_output(path: &Path, data: &[u8]) -> Result<()> {
    let wrap = |source: std::io::Error| ToritoError::WriteOutput {
        path: path.to_path_buf(),
        source,
    };
    let mut file = File::create(path).map_err(wrap)?;
    file.write_all(data).map_err(wrap)?;
    Ok(())
}
