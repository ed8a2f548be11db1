use clap::Parser;
use pingpad::cli::{
    self, alarms, analytics, auth, endpoints, handle_completions, handle_config_init, keys, Cli,
    Commands, ConfigCommands,
};

async fn run(cli: Cli) -> anyhow::Result<String> {
    // Commands that never touch the backend
    match &cli.command {
        Commands::Config(ConfigCommands::Init(args)) => return handle_config_init(args),
        Commands::Completions(args) => {
            handle_completions(args);
            return Ok(String::new());
        }
        _ => {}
    }

    let config = cli::load_config(&cli.global)?;
    if let Err(e) = pingpad::logging::init_tracing(&config.logging) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }
    let client = cli::build_client(&config)?;

    match cli.command {
        Commands::Endpoints(cmd) => endpoints::handle_endpoints(cmd, client).await,
        Commands::Analytics(args) => {
            analytics::handle_analytics(&args, client, config.analytics).await
        }
        Commands::Alarms(cmd) => alarms::handle_alarms(cmd, client, config.polling).await,
        Commands::Keys(cmd) => keys::handle_keys(cmd, client).await,
        Commands::Login(args) => {
            auth::handle_login(client, &args.email, &args.password, &args.output).await
        }
        Commands::Register(args) => {
            auth::handle_register(client, &args.email, &args.name, &args.password, &args.output)
                .await
        }
        Commands::LoginAsTest(args) => auth::handle_login_as_test(client, &args).await,
        Commands::Whoami(args) => auth::handle_whoami(client, &args).await,
        Commands::Profile(cmd) => auth::handle_profile(cmd, client).await,
        Commands::Config(_) | Commands::Completions(_) => Ok(String::new()),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
