use std::path::PathBuf;
use std::process;

use iced::Size;
use order_tracking::app::State;
use order_tracking::config::{self, Config};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: order-tracking [--config <path>] [--api-url <url>]";

struct Args {
    config: Option<PathBuf>,
    api_url: Option<String>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        config: None,
        api_url: None,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                args.config = Some(iter.next().ok_or("--config needs a path")?.into());
            }
            "--api-url" => {
                args.api_url = Some(iter.next().ok_or("--api-url needs a URL")?);
            }
            "-h" | "--help" => {
                println!("{USAGE}");
                process::exit(0);
            }
            other => return Err(format!("unknown argument: {other}")),
        }
    }
    Ok(args)
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("order-tracking: {e}\n{USAGE}");
            process::exit(2);
        }
    };

    let mut config: Config = match &args.config {
        Some(path) => config::load_from(path),
        None => config::load(),
    };
    if let Some(url) = args.api_url {
        config.api_url = url;
    }

    tracing::info!("Starting order tracking against {:?}", config.api_url);

    let size = Size::new(config.window.width, config.window.height);
    iced::application(move || State::new(config.clone()), State::update, State::view)
        .title(State::title)
        .subscription(State::subscription)
        .theme(State::theme)
        .window_size(size)
        .run()
}
