use std::sync::Arc;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use playlist_pilot::{
    cli,
    config::{self, Settings},
    error,
    session::Session,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API
    Auth,

    #[clap(about = "Create a playlist from a list of songs")]
    Playlist(PlaylistOptions),

    /// List available playback devices
    Devices,

    /// Serve entry points as JSON lines on stdin/stdout
    Session,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct PlaylistOptions {
    /// Title of the new playlist
    #[clap(long)]
    title: String,

    /// Songs as '<artist> <song title>' separated by semicolons
    #[clap(long)]
    songs: String,

    /// Start playback after the playlist is created
    #[clap(long)]
    play: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

fn load_settings() -> Settings {
    match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => error!("Cannot load settings. Err: {}", e),
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth => {
            let session = Session::new(load_settings());
            cli::auth(&session).await;
        }
        Command::Playlist(opt) => {
            let session = Session::new(load_settings());
            cli::playlist(&session, opt.title, opt.songs, opt.play).await
        }
        Command::Devices => cli::devices(&Session::new(load_settings())).await,
        Command::Session => {
            let session =
                Session::new(load_settings()).with_narrator(Arc::new(cli::EventNarrator));
            if let Err(e) = cli::session(session).await {
                error!("Session ended with error: {}", e);
            }
        }
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
