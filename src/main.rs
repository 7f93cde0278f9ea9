use clap::{Parser, Subcommand};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use stepscript::{DryRunActions, Executor, config, parse, report_timing};

/// StepScript - keyword-driven test scripts with nested control flow
#[derive(Parser, Debug)]
#[command(
    name = "stepscript",
    about = "Parse and execute keyword-driven test scripts with If/Else and For-each blocks",
    after_help = "ENVIRONMENT VARIABLES:\n\
        STEPSCRIPT_LOG_ENABLED       Write run logs as JSON (default: true)\n\
        STEPSCRIPT_LOG_DIR           Directory for run logs\n\
        STEPSCRIPT_SCREENSHOT_DIR    Directory for failure screenshots\n\
        STEPSCRIPT_VIDEO_RECORD_ON   Keep videos for all, failed or off"
)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Execute one or more test scripts
    Run {
        /// Paths to script files, executed in order
        #[arg(required = true)]
        scripts: Vec<PathBuf>,

        /// Print results as JSON instead of the step-by-step report
        #[arg(long)]
        json: bool,
    },

    /// Parse a script and dump the step tree without executing it
    Parse {
        /// Path to the script file
        script: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn Error>> {
    let args = Args::parse();

    match args.command {
        Commands::Run { scripts, json } => run_scripts(&scripts, json).await,
        Commands::Parse { script } => {
            let text = std::fs::read_to_string(&script)?;
            let cases = parse(&text)?;
            println!("{}", serde_json::to_string_pretty(&cases)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn run_scripts(scripts: &[PathBuf], json: bool) -> Result<ExitCode, Box<dyn Error>> {
    let settings = config::get();
    if !json {
        if settings.screenshots.enabled {
            println!("Failure screenshots: {}", settings.screenshots.dir);
        }
        if settings.videos.enabled {
            println!(
                "Video recordings: {} (kept on: {})",
                settings.videos.dir,
                settings.videos.record_on.as_str()
            );
        }
    }

    let mut executor = Executor::new(DryRunActions::new()).verbose(!json);

    for script in scripts {
        let text = std::fs::read_to_string(script)?;
        let cases = parse(&text)?;

        for case in &cases {
            let result = executor.execute_test_case(case).await;
            if !json {
                report_timing(&result, executor.step_timings());
            }
            if let Err(failure) = executor.teardown().await {
                eprintln!("Warning: teardown after \"{}\" failed: {}", case.name, failure);
            }
        }
    }

    let recorder = executor.recorder();
    if json {
        println!("{}", serde_json::to_string_pretty(recorder.results())?);
    }

    if settings.logging.enabled {
        let log_path = recorder.save_logs(Path::new(&settings.logging.output_dir))?;
        if !json {
            println!("\nResults written to {}", log_path.display());
        }
    }

    let failed = recorder.failed_count();
    let total = recorder.results().len();
    if !json {
        println!("\n{} of {} tests passed", total - failed, total);
    }

    if failed > 0 {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
