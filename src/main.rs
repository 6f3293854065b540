use anyhow::Result;
use clap::Parser;
use logo_studio::cli;
use logo_studio::logging::{self, LogTarget};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let headless = args.is_headless();

    // The TUI owns the terminal, so interactive sessions log to a file.
    let target = if headless {
        LogTarget::Stderr
    } else {
        LogTarget::File(logging::default_log_file())
    };
    if let Err(e) = logging::init(args.verbose, target) {
        eprintln!("warning: logging disabled: {e:#}");
    }

    match cli::run(args).await {
        Ok(()) => {
            if headless {
                std::process::exit(0);
            }
            Ok(())
        }
        Err(e) => {
            if headless {
                eprintln!("{e}");
                std::process::exit(1);
            }
            Err(e)
        }
    }
}
