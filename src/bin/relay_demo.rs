//! Demo that boots the pipeline once and prints the rendered notices.
//! Point `NOTICE_RELAY_CONFIG_PATH` (or `config/notice_relay.toml`) at a
//! config with a `url` to exercise the remote path.

use notice_relay::RelayConfig;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("notice_relay=debug,warn")),
        )
        .with_target(false)
        .init();

    let config = match RelayConfig::load_default() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("relay-demo: config error: {e:#}");
            std::process::exit(1);
        }
    };
    tracing::info!(?config, mode = ?notice_relay::current_mode(), "booting pipeline");

    let pipeline = notice_relay::init(config);
    let notices = notice_relay::render(&pipeline).await;

    if notices.is_empty() {
        println!("no active notices");
    } else {
        for n in &notices {
            println!("== {}\n{}\n", n.title, n.body);
        }
    }
    println!("relay-demo done ({} notices)", notices.len());
}
