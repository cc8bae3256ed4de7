mod cli;
mod logging;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use colored::*;
use dotenv::dotenv;
use tracing::{debug, error, info};
use transmission_check::platform::os_bytes;
use transmission_check::run::{self, Mode, RunStatus};
use transmission_check::{config, report, RepairEngine, ResumeRecord, StorageFilename};

fn main() -> ExitCode {
    dotenv().ok();

    let _guard = logging::init_logger();

    let args = Cli::parse();

    let result = execute(&args);
    if let Err(err) = &result {
        error!("{:#}", err);
    }
    ExitCode::from(run::exit_code_for(&result))
}

fn execute(args: &Cli) -> Result<RunStatus> {
    let config = config::load_configuration().context("Error loading configuration")?;
    debug!("Configuration: {:?}", config);

    let mut record = ResumeRecord::load(&args.resume_file).with_context(|| {
        format!(
            "Resume file '{}' could not be opened",
            args.resume_file.display()
        )
    })?;

    if args.verbose {
        debug!("Parameters: {:?}", args);
        print!("{}", report::render(&record));
    }

    let engine = RepairEngine::new(&config);

    let summary = match args.replacement() {
        Some((old, new)) => {
            let old = os_bytes(old).context("Replacement text is not valid Unicode")?;
            let new = os_bytes(new).context("Replacement text is not valid Unicode")?;
            let mode = Mode::Rewrite {
                old: &old,
                new: &new,
            };
            run::run_mode(&engine, &mut record, mode, args.make_changes)?
        }
        None => {
            println!("\n==============================");
            println!("{}", "        Repair attempts       ".bold());
            println!("==============================\n");

            let storage = StorageFilename::from_path(&args.resume_file)?;
            let mode = Mode::Repair { storage: &storage };
            let summary = run::run_mode(&engine, &mut record, mode, args.make_changes)?;
            if summary.flagged_count > 0 {
                info!(
                    "{} inconsistencies left in place, rerun with --make-changes to repair",
                    format!("{}", summary.flagged_count).yellow()
                );
            }
            summary
        }
    };

    let shown = if args.make_changes {
        summary.repaired_count
    } else {
        0
    };
    info!("Repaired inconsistencies: {}", format!("{}", shown).green());

    let status = run::commit(
        &record,
        &args.resume_file,
        &summary,
        config.backup_before_write,
    )
    .context("Error while saving the new .resume file")?;
    match status {
        RunStatus::Repaired => info!("{}", "The file was successfully modified.".green()),
        RunStatus::Untouched => info!("The file remains untouched."),
    }
    Ok(status)
}
