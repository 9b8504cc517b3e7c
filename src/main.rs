use clap::Parser;
use colored::Colorize;
use ip_toolbox::output::{render, OutputFormat};
use ip_toolbox::service::ROUTES;
use ip_toolbox::{init_logging, Config, Service};
use std::error::Error;
use std::io::Read;

/// Network address utilities.
#[derive(Debug, Parser)]
#[command(name = "ip-toolbox")]
#[command(about = "Subnet calculation, address summarization and conversion")]
struct Cli {
    /// Route to call, e.g. /api/ip/summary.
    #[arg(required_unless_present = "list_routes")]
    route: Option<String>,
    /// JSON request body; read from stdin when omitted or "-".
    body: Option<String>,
    /// How to print the response.
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
    /// Print the available routes and exit.
    #[arg(long)]
    list_routes: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    let cli = Cli::parse();
    let config = Config::from_env()?;
    init_logging(&config.log_config)?;

    if cli.list_routes {
        for route in ROUTES {
            println!("{route}");
        }
        return Ok(());
    }
    let route = cli.route.unwrap_or_default();
    log::info!("#Start main() route={route}");

    let body = match cli.body {
        Some(body) if body != "-" => body,
        _ => {
            let mut body = String::new();
            std::io::stdin().read_to_string(&mut body)?;
            body
        }
    };

    let service = Service::with_system_resolver(config);
    let response = service.handle(&route, &body).await;
    println!("{}", render(&response, cli.format));

    if !response.is_success() {
        eprintln!("{} {route}", format!("failed ({})", response.status).on_red());
        std::process::exit(1);
    }
    Ok(())
}
