//! Command-line interface implementation for inception.
//! Provides argument parsing and help text formatting using clap.

use clap::{error::ErrorKind, CommandFactory, Parser};
use std::path::PathBuf;

/// Command-line arguments structure for inception.
#[derive(Parser, Debug)]
#[command(author, version, about = "inception: apply a project template to an output directory", long_about = None)]
pub struct Args {
    /// Template to apply: a directory, a zip archive or a stored package (`name[@version]`)
    #[arg(long = "template-path", value_name = "PATH")]
    pub template_path: String,

    /// Where the output should be put
    #[arg(short, long, value_name = "PATH", default_value = ".")]
    pub output: PathBuf,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Read answers as a JSON object from stdin instead of prompting
    #[arg(short, long)]
    pub stdin: bool,

    /// Store the template in the local package repository and exit
    #[arg(long)]
    pub save: bool,
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With status code 1 if required arguments are missing
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.kind() == ErrorKind::MissingRequiredArgument {
                let _ = Args::command()
                    .help_template(
                        r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                    )
                    .print_help();
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}
