use eurofin::rates::RateFeedClient;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = match RateFeedClient::with_defaults() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("ERROR: {e}");
            std::process::exit(1);
        }
    };

    let table = match client.fetch_rates().await {
        Ok(t) => t,
        Err(e) => {
            eprintln!("ERROR: {e}");
            std::process::exit(1);
        }
    };

    if let Some(date) = table.date() {
        println!("=== ECB reference rates for {date} ===\n");
    }
    for (currency, rate) in table.iter() {
        println!("  {currency} -> €1 = {rate}");
    }

    // Cross rate through EUR
    match table.convert(100.0, "USD", "CHF") {
        Ok(chf) => println!("\n  100 USD = {chf:.2} CHF"),
        Err(e) => println!("\n  USD -> CHF: {e}"),
    }
}
