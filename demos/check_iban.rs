use eurofin::iban::BankAccountClient;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let number = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "738120256174".to_string());

    let result = match BankAccountClient::with_defaults() {
        Ok(client) => client.check_account(&number).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(info) => match serde_json::to_string_pretty(&info) {
            Ok(json) => println!("{json}"),
            Err(e) => println!("{info:?} ({e})"),
        },
        Err(e) => {
            eprintln!("ERROR: {e}");
            std::process::exit(1);
        }
    }
}
