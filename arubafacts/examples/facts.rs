//! Collect facts from an Aruba Instant AP and print them as JSON.
//!
//! # Usage
//!
//! With password authentication:
//! ```bash
//! cargo run --example facts -- --host 10.0.0.5 --user admin --password secret
//! ```
//!
//! With SSH key authentication and a ping from the AP:
//! ```bash
//! cargo run --example facts -- --host 10.0.0.5 --user admin --key ~/.ssh/id_ed25519 --ping 10.0.0.1
//! ```

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use arubafacts::{Driver, DriverBuilder, FactsDriver};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set RUST_LOG=debug for the command exchanges
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut builder = DriverBuilder::new(&args.host)
        .port(args.port)
        .username(&args.user)
        .timeout(Duration::from_secs(args.timeout));

    if let Some(password) = &args.password {
        builder = builder.password(password);
    } else if let Some(key_path) = &args.key {
        builder = builder.private_key(key_path);
    } else {
        eprintln!("Error: Must provide either --password or --key");
        std::process::exit(1);
    }

    let mut driver = builder.build()?;

    eprintln!("Connecting to {}:{}...", args.host, args.port);
    driver.open().await?;

    let facts = driver.get_facts().await?;
    println!("{}", serde_json::to_string_pretty(&facts)?);

    let neighbors = driver.get_lldp_neighbors().await?;
    println!("{}", serde_json::to_string_pretty(&neighbors)?);

    if let Some(target) = &args.ping {
        let outcome = driver.ping(target).await?;
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    }

    driver.close().await?;
    Ok(())
}

/// Simple argument parser (avoiding external dependencies)
struct Args {
    host: String,
    port: u16,
    user: String,
    password: Option<String>,
    key: Option<PathBuf>,
    timeout: u64,
    ping: Option<String>,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut host = "localhost".to_string();
        let mut port = 22u16;
        let mut user = "admin".to_string();
        let mut password = None;
        let mut key = None;
        let mut timeout = 60u64;
        let mut ping = None;

        let mut i = 1;
        while i < args.len() {
            let value = args.get(i + 1).cloned();
            match args[i].as_str() {
                "--host" | "-h" => host = value.unwrap_or(host),
                "--port" | "-p" => port = value.and_then(|v| v.parse().ok()).unwrap_or(22),
                "--user" | "-u" => user = value.unwrap_or(user),
                "--password" | "-P" => password = value,
                "--key" | "-k" => key = value.map(PathBuf::from),
                "--timeout" | "-t" => {
                    timeout = value.and_then(|v| v.parse().ok()).unwrap_or(60)
                }
                "--ping" => ping = value,
                "--help" => {
                    Self::print_help();
                    std::process::exit(0);
                }
                other => {
                    eprintln!("Unknown argument: {}", other);
                    i += 1;
                    continue;
                }
            }
            i += 2;
        }

        Self {
            host,
            port,
            user,
            password,
            key,
            timeout,
            ping,
        }
    }

    fn print_help() {
        println!(
            r#"arubafacts facts example

USAGE:
    cargo run --example facts -- [OPTIONS]

OPTIONS:
    -h, --host <HOST>        Access point address [default: localhost]
    -p, --port <PORT>        SSH port [default: 22]
    -u, --user <USER>        Username [default: admin]
    -P, --password <PASS>    Password for authentication
    -k, --key <PATH>         Path to SSH private key
    -t, --timeout <SECS>     Connection and command timeout [default: 60]
    --ping <TARGET>          Also ping TARGET from the access point
    --help                   Print this help message
"#
        );
    }
}
