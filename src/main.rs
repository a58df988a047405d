use std::env;

use tracing::error;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().init();

    let raw_args: Vec<String> = env::args().collect();
    match raw_args.get(1).map(|s| s.as_str()) {
        Some("serve") => {
            let port = raw_args
                .get(2)
                .and_then(|s| s.parse::<u16>().ok())
                .unwrap_or(8080);
            if let Err(e) = nestegg::api::run_http_server(port).await {
                error!("server error: {e}");
                std::process::exit(1);
            }
        }
        Some("plan") => {
            let mut args = vec!["nestegg".to_string()];
            args.extend(raw_args.iter().skip(2).cloned());
            match nestegg::api::run_plan_cli(args) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("{e}");
                    std::process::exit(2);
                }
            }
        }
        _ => {
            eprintln!("Usage: cargo run -- serve [port] | plan [--flags]");
            std::process::exit(1);
        }
    }
}
