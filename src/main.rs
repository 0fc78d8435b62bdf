use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use conduit_feed::commands::{App, account, article, favorite, feed, tags};
use conduit_feed::session::{Session, session_dir};

const DEFAULT_API_URL: &str = "https://api.realworld.io";

/// A command-line reader for Conduit (RealWorld) blogs
#[derive(Parser)]
#[command(name = "conduit", version)]
struct Args {
    /// Base URL of the Conduit server
    #[arg(long, global = true, env = "CONDUIT_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Show one page of articles
    Feed {
        /// Page number, starting at 1
        #[arg(long)]
        page: Option<String>,
        /// Only show articles with this tag
        #[arg(long)]
        tag: Option<String>,
        /// global_feed, your_feed or tag
        #[arg(long)]
        tab: Option<String>,
    },
    /// List popular tags
    Tags,
    /// Show an article with its comments
    Article {
        slug: String,
    },
    /// Favorite an article, or unfavorite it if already favorited
    Favorite {
        slug: String,
    },
    /// Log in and remember the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "CONDUIT_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and remember the session
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "CONDUIT_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the logged in user
    Whoami,
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("CONDUIT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn run(args: Args) -> anyhow::Result<()> {
    let app = App::new(args.api_url, Session::at(&session_dir()?));

    match args.command {
        Some(Command::Feed {
            ref page,
            ref tag,
            ref tab,
        }) => feed::cmd_feed(&app, page.as_deref(), tag.as_deref(), tab.as_deref()),
        Some(Command::Tags) => tags::cmd_tags(&app),
        Some(Command::Article { ref slug }) => article::cmd_article(&app, slug),
        Some(Command::Favorite { ref slug }) => favorite::cmd_favorite(&app, slug),
        Some(Command::Login {
            ref email,
            ref password,
        }) => account::cmd_login(&app, email, password),
        Some(Command::Register {
            ref username,
            ref email,
            ref password,
        }) => account::cmd_register(&app, username, email, password),
        Some(Command::Logout) => account::cmd_logout(&app),
        Some(Command::Whoami) => account::cmd_whoami(&app),
        None => feed::cmd_feed(&app, None, None, None),
    }
}

fn main() {
    init_logging();
    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
