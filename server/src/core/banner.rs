//! Startup banner

use super::config::{AppConfig, is_all_interfaces};
use super::constants::APP_NAME;

const W: usize = 10;

/// Print the startup banner with the API address and bootstrap token
pub fn print_banner(config: &AppConfig, bootstrap_token: Option<&str>) {
    let host = &config.server.host;
    let port = config.server.port;
    let display_host = if is_all_interfaces(host) {
        "localhost"
    } else {
        host.as_str()
    };

    println!();
    println!(
        "  \x1b[1m\x1b[36m{}\x1b[0m \x1b[90mv{}\x1b[0m",
        APP_NAME,
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!(
        "  \x1b[32m➜\x1b[0m  \x1b[1m{:<W$}\x1b[0m \x1b[36mhttp://{}:{}/api\x1b[0m",
        "API:", display_host, port
    );

    match bootstrap_token {
        Some(token) => println!(
            "  \x1b[32m➜\x1b[0m  \x1b[1m{:<W$}\x1b[0m {} \x1b[90m(POST /api/auth/exchange)\x1b[0m",
            "Token:", token
        ),
        None => println!(
            "  \x1b[33m➜\x1b[0m  \x1b[1m{:<W$}\x1b[0m auth disabled, all requests act as the local user",
            "Auth:"
        ),
    }

    if host == "127.0.0.1" || host == "localhost" {
        println!(
            "  \x1b[90m➜  {:<W$} use --host 0.0.0.0 to expose\x1b[0m",
            "Network:"
        );
    } else if !is_all_interfaces(host) {
        println!(
            "  \x1b[32m➜\x1b[0m  \x1b[1m{:<W$}\x1b[0m \x1b[36mhttp://{}:{}\x1b[0m",
            "Network:", host, port
        );
    }

    let limits = config.query.limits;
    println!(
        "  \x1b[90m➜  {:<W$} depth {} / conditions {} / {} bytes\x1b[0m",
        "Queries:", limits.max_depth, limits.max_conditions, limits.max_param_bytes
    );
    println!();
}
