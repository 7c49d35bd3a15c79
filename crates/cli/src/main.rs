use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "lintra")]
#[command(about = "LINE translation relay", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version
    Version,

    /// Create the configuration directory and a default config file.
    Init {
        /// Config file path (default: LINTRA_CONFIG_PATH or ~/.lintra/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,
    },

    /// Run the webhook gateway (POST /webhook, GET / health).
    Serve {
        /// Config file path (default: LINTRA_CONFIG_PATH or ~/.lintra/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,

        /// Listen port (default from config or 3000)
        #[arg(long, short)]
        port: Option<u16>,
    },

    /// Classify and translate one text from the command line (no gateway).
    Translate {
        /// Text to translate
        text: String,

        /// Config file path (default: LINTRA_CONFIG_PATH or ~/.lintra/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Version) => {
            println!("lintra {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Init { config }) => {
            if let Err(e) = run_init(config) {
                log::error!("init failed: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Serve { config, port }) => {
            if let Err(e) = run_serve(config, port).await {
                log::error!("gateway failed: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Translate { text, config }) => {
            if let Err(e) = run_translate(text, config).await {
                log::error!("translate failed: {}", e);
                std::process::exit(1);
            }
        }
        None => {
            println!("Run with --help for usage");
        }
    }
}

fn run_init(config_path: Option<std::path::PathBuf>) -> anyhow::Result<()> {
    let path = config_path.unwrap_or_else(lib::config::default_config_path);
    lib::config::init_config_file(&path)?;
    println!("initialized configuration at {}", path.display());
    Ok(())
}

async fn run_serve(
    config_path: Option<std::path::PathBuf>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    let (mut config, _path) = lib::config::load_config(config_path)?;
    if let Some(p) = port {
        config.gateway.port = p;
    }
    log::info!(
        "starting gateway on {}:{}",
        config.gateway.bind,
        config.gateway.port
    );
    lib::gateway::run_gateway(config).await
}

async fn run_translate(
    text: String,
    config_path: Option<std::path::PathBuf>,
) -> anyhow::Result<()> {
    let (config, _path) = lib::config::load_config(config_path)?;
    let pair = lib::classify::classify(config.translate.policy, &text);
    log::info!("classified {}→{}", pair.source, pair.target);
    let client = lib::translate::MyMemoryClient::new(config.translate.endpoint.clone());
    let res = client.translate(&text, pair.source, pair.target).await?;
    match res.translated_text() {
        Some(t) => println!("{}", t),
        None => println!("{}", lib::dispatch::UNTRANSLATABLE_REPLY),
    }
    Ok(())
}
