//! Host and/or join a single chat room.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin onechat -- -serve 127.0.0.1:8080
//! cargo run --bin onechat -- -conn 127.0.0.1:8080 -name alice
//! cargo run --bin onechat -- -serve 127.0.0.1:8080 -conn 127.0.0.1:8080 -name host
//! ```

use onechat_client::{
    cli::{Args, USAGE},
    run_client,
};
use onechat_server::Server;
use onechat_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse_normalized();

    if args.serve.is_none() && args.conn.is_none() {
        println!("{}", USAGE);
        return;
    }

    // Bind before dialing so a process that hosts and joins finds the listener
    let hosting = match &args.serve {
        Some(addr) => match Server::bind(addr, args.server_config()).await {
            Ok(server) => Some(tokio::spawn(server.run())),
            Err(e) => {
                tracing::error!("Server error: {}", e);
                std::process::exit(1);
            }
        },
        None => None,
    };

    if let Some(addr) = &args.conn {
        println!("Dialing {} as '{}'.", addr, args.name);
        if let Err(e) = run_client(addr, &args.name, args.client_config()).await {
            eprintln!("{}", e);
            std::process::exit(1);
        }
        // The user quit; a room hosted by this process goes with them
        if let Some(hosting) = &hosting {
            hosting.abort();
        }
    } else if let Some(hosting) = hosting {
        match hosting.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::error!("Server error: {}", e);
                std::process::exit(1);
            }
            Err(e) => {
                tracing::error!("Server task failed: {}", e);
                std::process::exit(1);
            }
        }
    }

    println!("Exited.");
}
