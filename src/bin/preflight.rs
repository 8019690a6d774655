use restaurant_reviews::infra::{init_logging, Config};
use restaurant_reviews::DatabaseService;

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight\n\
         \n\
         Reads env vars (or .env):\n\
           DATABASE_URL (default sqlite://restaurant_reviews.db)\n\
           DB_MAX_CONNECTIONS (default 5)\n\
         Connects, ensures the schema exists and prints row counts.\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }

    let config = Config::from_env()?;

    println!("> Preflight:");
    println!("  DATABASE_URL={}", config.database_url);
    println!("  DB_MAX_CONNECTIONS={}", config.max_connections);
    println!("  BIND_ADDR={}", config.bind_addr);

    let db_service = DatabaseService::new(&config).await?;
    sqlx::query("SELECT 1").execute(db_service.pool()).await?;
    println!("  Database reachable, schema ensured.");

    for (table, count) in db_service.table_counts().await? {
        println!("  {}: {} rows", table, count);
    }

    println!("> Preflight OK");
    Ok(())
}
