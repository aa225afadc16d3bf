use std::env;
use std::process;

use anyhow::{bail, Result};
use tracing_subscriber::EnvFilter;

use media_rename::config::{self, EngineConfig, Settings};
use media_rename::models::MediaType;
use media_rename::session::SessionState;
use media_rename::tui;

const USAGE: &str = "\
Usage: media-rename [OPTIONS]

Options:
  -m, --movies <DIR>   open DIR as a movie session
  -s, --series <DIR>   open DIR as a series session
  -h, --help           print this message

Without options the picker inside the interface is used.";

fn parse_args() -> Result<Option<(MediaType, String)>> {
    let mut args = env::args().skip(1);
    let mut initial = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                println!("{USAGE}");
                process::exit(0);
            }
            "-m" | "--movies" => {
                let Some(dir) = args.next() else {
                    bail!("{arg} requires a directory argument");
                };
                initial = Some((MediaType::Movie, dir));
            }
            "-s" | "--series" => {
                let Some(dir) = args.next() else {
                    bail!("{arg} requires a directory argument");
                };
                initial = Some((MediaType::Series, dir));
            }
            other => bail!("unknown argument: {other}\n\n{USAGE}"),
        }
    }
    Ok(initial)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Raw mode owns stdout; diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let initial = parse_args()?;
    let settings_path = config::settings_path();
    let settings = Settings::load(&settings_path);
    let session = SessionState::new(EngineConfig::new());

    tui::run_tui(session, settings, settings_path, initial).await
}
