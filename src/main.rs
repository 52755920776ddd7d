//! inception's main application entry point.
//! Parses the command line, opens the template and runs its program.

use inception::{
    cli::{get_args, Args},
    commands::Context,
    error::{default_error_handler, Error, Result},
    loader::{get_loader, Template},
    logger::init_logger,
    prompt::{DialoguerPrompter, PresetPrompter, Prompter},
    registry::{data_path, Database, FileManager},
    renderer::MiniJinjaRenderer,
    runner::Runner,
};
use log::{debug, info};
use std::path::Path;
use url::Url;

/// Main application entry point.
fn main() {
    let args = get_args();

    init_logger(args.verbose);

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Opens the template named on the command line.
///
/// Directories and archives are opened directly. Anything else is looked up
/// in the local repository as `name` or `name@version`.
fn open_template(template_path: &str) -> Result<Template> {
    let unsupported = match get_loader(template_path) {
        Ok(template) => return Ok(template),
        Err(e @ Error::UnsupportedSourceError { .. }) => e,
        Err(e) => return Err(e),
    };
    if Path::new(template_path).exists() || template_path.contains(['/', '\\']) {
        return Err(unsupported);
    }

    let (name, version) = match template_path.split_once('@') {
        Some((name, version)) => (name, Some(version)),
        None => (template_path, None),
    };
    let data = data_path()?;
    let manager = FileManager::new(&data);
    if manager.latest(name)?.is_none() && Database::new(&data).get(name)?.is_none() {
        return Err(unsupported);
    }

    debug!("Looking up package '{}' in the local repository.", name);
    manager.load(name, version).map_err(|e| {
        if let Error::VersionNotFoundError { .. } = e {
            if let Ok(Some(url)) = Database::new(&data).get(name) {
                info!("Package '{}' is known to come from {}.", name, url);
            }
        }
        e
    })
}

/// Stores the template in the local repository and records where it came from.
fn save_template(template_path: &str) -> Result<()> {
    let data = data_path()?;
    let package = FileManager::new(&data).save(template_path)?;

    let source = std::fs::canonicalize(template_path)?;
    let template = get_loader(&package)?;
    let metadata = template.metadata()?;
    if let Ok(url) = Url::from_file_path(&source) {
        Database::new(&data).insert(&metadata.name, url.as_str())?;
    }

    println!("Stored {} {} in '{}'.", metadata.name, metadata.version, package.display());
    Ok(())
}

/// Main application logic execution.
///
/// # Flow
/// 1. Opens the template (directory, archive or stored package)
/// 2. Chooses the prompter: stdin answers or interactive questions
/// 3. Runs the template program against the output directory
fn run(args: Args) -> Result<()> {
    if args.save {
        return save_template(&args.template_path);
    }

    let template = open_template(&args.template_path)?;

    let renderer = MiniJinjaRenderer::new();
    let prompter: Box<dyn Prompter> = if args.stdin {
        Box::new(PresetPrompter::from_stdin()?)
    } else {
        Box::new(DialoguerPrompter::new())
    };
    let mut context = Context::new(&*prompter, &renderer);

    Runner::new(&template).run(&args.output, &mut context)?;

    println!("Template applied successfully in {}.", args.output.display());
    Ok(())
}
