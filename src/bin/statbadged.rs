use clap::{Parser, Subcommand};
use statbadge::badge::BadgeStyle;
use statbadge::config::ServiceConfig;
use statbadge::storage::Store;
use statbadge::{logger, server, svg, types};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "statbadged", version, about = "SVG profile statistics badges", long_about = None)]
struct Cli {
    #[arg(long, global = true, help = "Path to a config file (TOML). Defaults to $STATBADGE_CONFIG or ./statbadge.toml")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Listen address, e.g. 127.0.0.1:3000")]
    bind: Option<String>,
    #[arg(long, global = true, help = "Snapshot file holding view counts and cached badges")]
    data: Option<PathBuf>,
    #[arg(long, global = true, help = "Keep all state in memory")]
    ephemeral: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Run the HTTP service (default)")]
    Serve,
    #[command(about = "Print a badge SVG to stdout")]
    Render {
        #[arg(long, default_value = "badge")]
        label: String,
        #[arg(long)]
        value: String,
        #[arg(long, default_value = "blue")]
        color: String,
        #[arg(long, default_value = statbadge::badge::request::DEFAULT_LABEL_COLOR)]
        label_color: String,
        #[arg(long, help = "flat | flat-square | rounded")]
        style: Option<String>,
    },
    #[command(about = "Print the stored view count for an identity")]
    Views {
        #[arg(help = "Username whose counter to read")]
        identity: String,
    },
    #[command(about = "Remove expired cache entries from the snapshot")]
    Purge,
}

impl Cli {
    fn load_config(&self) -> Result<ServiceConfig, Box<dyn std::error::Error>> {
        // Precedence: CLI > env > config file > defaults
        let mut cfg = ServiceConfig::load(self.config.as_deref())?;
        if let Some(b) = &self.bind { cfg.bind = b.clone(); }
        if let Some(d) = &self.data { cfg.data_path = d.clone(); }
        if self.ephemeral { cfg.ephemeral = true; }
        cfg.validate()?;
        Ok(cfg)
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let cfg = cli.load_config()?;
    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            logger::configure_logging(cfg.log_dir.as_deref(), &cfg.log_level, cfg.log_retention)?;
            let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
            runtime.block_on(server::run(cfg))?;
        }
        Commands::Render { label, value, color, label_color, style } => {
            let style = BadgeStyle::parse_or_default(style.as_deref());
            println!("{}", svg::render(&label, &value, &color, &label_color, style));
        }
        Commands::Views { identity } => {
            let store = Store::open(&cfg.data_path)?;
            println!("{}", store.view_count(identity.trim()));
        }
        Commands::Purge => {
            let store = Store::open(&cfg.data_path)?;
            let purged = store.cache_purge_expired(types::now_millis())?;
            println!("purged {purged} expired cache entries ({} remain)", store.cache_len());
        }
    }
    Ok(())
}
