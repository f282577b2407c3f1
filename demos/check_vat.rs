use eurofin::FinanceError;
use eurofin::vat::{VatValidationClient, sanitize_vat_number};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let numbers: Vec<String> = match std::env::args().skip(1).collect::<Vec<_>>() {
        args if args.is_empty() => vec!["BE0836157420".into(), "BE 0836.157.420".into(), "B".into()],
        args => args,
    };

    let client = match VatValidationClient::with_defaults() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("ERROR: {e}");
            std::process::exit(1);
        }
    };

    let mut failed = false;
    for number in &numbers {
        println!("{number} (sanitized: {})", sanitize_vat_number(number));
        match client.check_vat(number).await {
            Ok(info) => {
                println!("  valid={}", info.is_valid);
                if info.is_valid {
                    println!("  name={}", info.name);
                    println!("  address={}", info.address.replace('\n', ", "));
                }
            }
            Err(FinanceError::NotValid) => println!("  rejected by VIES as invalid input"),
            Err(e) => {
                println!("  ERROR: {e}");
                failed = true;
            }
        }
    }

    if failed {
        std::process::exit(1);
    }
}
