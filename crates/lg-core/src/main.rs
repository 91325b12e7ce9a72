use lg_client::mock::fixtures;
use lg_client::{AccountClient, ChatClient};
use lg_core::config::Config;
use lg_core::repl::{run_repl, App, ChatBackend};
use lg_core::session::Session;
use lg_core::style::Style;

fn print_help() {
    println!("legion: terminal client for the Legion travel concierge");
    println!();
    println!("Usage:");
    println!("  legion                Interactive chat");
    println!();
    println!("Options:");
    println!("  --url <url>       Concierge backend base URL (overrides config and LEGION_API_URL)");
    println!("  --mock            Use a scripted offline backend");
    println!("  --previews        Open preview panels regardless of card");
    println!("  --version         Print version");
    println!("  --help            Print this help");
    println!();
    println!("Config: $XDG_CONFIG_HOME/legion/config.toml. Logs: RUST_LOG, written to stderr.");
}

fn init_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "lg_core={level},lg_client={level},lg_protocol={level}"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return;
    }

    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("legion {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let mut config = Config::load_or_default();
    init_logging(&config.log.level);

    if let Some(pos) = args.iter().position(|a| a == "--url") {
        match args.get(pos + 1) {
            Some(url) => config.api.base_url = url.clone(),
            None => {
                eprintln!("error: --url needs a value");
                std::process::exit(2);
            }
        }
    }
    if args.iter().any(|a| a == "--previews") {
        config.chat.previews = true;
    }
    let mock = args.iter().any(|a| a == "--mock");

    let (backend, accounts) = if mock {
        (ChatBackend::Mock(fixtures::travel_demo()), None)
    } else {
        let chat = match ChatClient::new(config.api.base_url.as_str()) {
            Ok(client) => client,
            Err(e) => {
                eprintln!("error: failed to create HTTP client: {e}");
                std::process::exit(1);
            }
        };
        let accounts = match AccountClient::new(config.api.base_url.as_str(), config.api.timeout()) {
            Ok(client) => client,
            Err(e) => {
                eprintln!("error: failed to create HTTP client: {e}");
                std::process::exit(1);
            }
        };
        (ChatBackend::Http(chat), Some(accounts))
    };

    let session = Session::init(config.session.resolve_path());
    let app = App::new(&config, backend, accounts, session, Style::new());

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("error: failed to create async runtime: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(run_repl(app)) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
