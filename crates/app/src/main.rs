//! Chairtime Application CLI

use std::process;

use chairtime_app::{
    database::{self, Db},
    domain::shops::{
        PgShopsService, ShopsService,
        models::{NewShop, ShopUuid},
    },
};
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "chairtime-app", about = "Chairtime CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Shop(ShopCommand),
}

#[derive(Debug, Args)]
struct ShopCommand {
    #[command(subcommand)]
    command: ShopSubcommand,
}

#[derive(Debug, Subcommand)]
enum ShopSubcommand {
    Create(CreateShopArgs),
}

#[derive(Debug, Args)]
struct CreateShopArgs {
    /// Shop display name
    #[arg(long)]
    name: String,

    /// IANA timezone the shop's calendar runs on
    #[arg(long, default_value = "Asia/Karachi")]
    timezone: String,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,
}

#[tokio::main]
pub async fn main() {
    let _env = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(error) = run(cli).await {
        eprintln!("{error}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Commands::Shop(ShopCommand {
            command: ShopSubcommand::Create(args),
        }) => create_shop(args).await,
    }
}

async fn create_shop(args: CreateShopArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgShopsService::new(Db::new(pool));

    let shop = service
        .create_shop(NewShop {
            uuid: ShopUuid::new(),
            name: args.name,
            timezone: args.timezone,
        })
        .await
        .map_err(|error| format!("failed to create shop: {error}"))?;

    println!("shop_uuid: {}", shop.uuid);
    println!("shop_name: {}", shop.name);
    println!("shop_timezone: {}", shop.timezone);

    Ok(())
}
