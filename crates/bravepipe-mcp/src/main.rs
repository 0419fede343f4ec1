use anyhow::Result;
use clap::{Parser, Subcommand};

#[cfg(feature = "stdio")]
mod mcp;

#[derive(Parser, Debug)]
#[command(name = "bravepipe")]
#[command(about = "Brave Search tools (MCP stdio server)", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run as an MCP stdio server (for Cursor / MCP clients).
    #[cfg(feature = "stdio")]
    McpStdio,
    /// Diagnose configuration/launch issues (json; no secrets).
    Doctor(DoctorCmd),
    /// Print version info.
    Version(VersionCmd),
}

#[derive(clap::Args, Debug)]
struct DoctorCmd {
    /// Also probe the stdio MCP handshake by spawning a child server.
    #[arg(long, action = clap::ArgAction::Set, default_value_t = false)]
    check_stdio: bool,
    /// Timeout for the handshake probe.
    #[arg(long, default_value_t = 5_000)]
    timeout_ms: u64,
}

#[derive(clap::Args, Debug)]
struct VersionCmd {}

fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    // Stdout belongs to the MCP transport; everything we log goes to stderr.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bravepipe=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_env_file() {
    // Optional env-file loader (opt-in).
    //
    // MCP server environments often aren't interactive shells, so users want
    // a single place to keep keys without exporting them manually.
    // Opt-in only (BRAVEPIPE_ENV_FILE); sets vars only if not already set in
    // the process environment; does not log values.
    if let Ok(p) = std::env::var("BRAVEPIPE_ENV_FILE") {
        let p = p.trim();
        if p.is_empty() {
            return;
        }
        if let Ok(txt) = std::fs::read_to_string(p) {
            for raw in txt.lines() {
                let s = raw.trim();
                if s.is_empty() || s.starts_with('#') {
                    continue;
                }
                let Some((k, v)) = s.split_once('=') else {
                    continue;
                };
                let k = k.trim();
                let v = v.trim();
                if k.is_empty() {
                    continue;
                }
                if std::env::var_os(k).is_none() {
                    std::env::set_var(k, v);
                }
            }
        }
    }
}

fn version() -> Result<()> {
    let payload = serde_json::json!({
        "schema_version": 1,
        "name": "bravepipe",
        "version": env!("CARGO_PKG_VERSION"),
    });
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

async fn doctor(args: DoctorCmd) -> Result<()> {
    let t0 = std::time::Instant::now();

    let api_key_configured = bravepipe_local::client::api_key_from_env().is_some();
    let endpoint_overridden = std::env::var("BRAVEPIPE_API_ENDPOINT")
        .ok()
        .is_some_and(|s| !s.trim().is_empty());

    let mut checks = Vec::new();
    checks.push(serde_json::json!({
        "name": "api_key_configured",
        "ok": api_key_configured,
        "message": if api_key_configured {
            "Brave API key found in the environment"
        } else {
            "no Brave API key in the environment"
        },
        "hint": if api_key_configured {
            ""
        } else {
            "Set BRAVEPIPE_API_KEY (or BRAVE_API_KEY)."
        },
    }));

    // Check: stdio MCP handshake (optional).
    let mut stdio_ok: Option<bool> = None;
    let mut stdio_tool_count: Option<usize> = None;
    let mut stdio_error: Option<serde_json::Value> = None;
    let mut stdio_elapsed_ms: Option<u128> = None;

    #[cfg(feature = "stdio")]
    if args.check_stdio {
        use rmcp::service::ServiceExt;
        use rmcp::transport::{ConfigureCommandExt, TokioChildProcess};
        use tokio::process::Command;

        let exe =
            std::env::current_exe().unwrap_or_else(|_| std::path::PathBuf::from("bravepipe"));
        let child = TokioChildProcess::new(Command::new(exe).configure(|cmd| {
            cmd.args(["mcp-stdio"]);
            // The probe exercises the handshake only; a placeholder key keeps
            // it hermetic and no request ever leaves the process.
            cmd.env("BRAVEPIPE_API_KEY", "doctor-probe");
            cmd.env_remove("BRAVE_API_KEY");
            cmd.env("RUST_LOG", "error");
        }))?;

        let service = ().serve(child).await?;
        let check_t0 = std::time::Instant::now();
        let res = tokio::time::timeout(
            std::time::Duration::from_millis(args.timeout_ms),
            service.list_tools(Default::default()),
        )
        .await;
        stdio_elapsed_ms = Some(check_t0.elapsed().as_millis());

        match res {
            Ok(Ok(tools)) => {
                stdio_ok = Some(true);
                stdio_tool_count = Some(tools.tools.len());
            }
            Ok(Err(e)) => {
                stdio_ok = Some(false);
                stdio_error = Some(serde_json::json!({
                    "code": "handshake_failed",
                    "message": e.to_string(),
                    "hint": "The child process closed the stdio transport early. Check that the binary prints nothing to stdout in mcp-stdio mode and that it was built with the `stdio` feature."
                }));
            }
            Err(_elapsed) => {
                stdio_ok = Some(false);
                stdio_error = Some(serde_json::json!({
                    "code": "timeout",
                    "message": format!("stdio handshake timed out after {}ms", args.timeout_ms),
                    "hint": "The child did not respond to list_tools in time."
                }));
            }
        }

        let _ = service.cancel().await;
    }

    #[cfg(not(feature = "stdio"))]
    if args.check_stdio {
        stdio_ok = Some(false);
    }

    checks.push(serde_json::json!({
        "name": "mcp_stdio_handshake",
        "ok": if args.check_stdio { stdio_ok.unwrap_or(false) } else { true },
        "skipped": !args.check_stdio,
        "message": if !args.check_stdio {
            "stdio MCP handshake skipped"
        } else if stdio_ok.unwrap_or(false) {
            "stdio MCP handshake succeeded"
        } else {
            "stdio MCP handshake failed"
        },
        "hint": if !args.check_stdio || stdio_ok.unwrap_or(false) {
            ""
        } else if cfg!(feature = "stdio") {
            "Check that your MCP client points at the correct `bravepipe` binary with args: [\"mcp-stdio\"]."
        } else {
            "`mcp-stdio` requires building with feature `stdio`."
        },
        "tool_count": stdio_tool_count,
        "elapsed_ms": stdio_elapsed_ms,
        "error": stdio_error,
    }));

    let payload = serde_json::json!({
        "schema_version": 1,
        "name": "bravepipe",
        "version": env!("CARGO_PKG_VERSION"),
        "elapsed_ms": t0.elapsed().as_millis(),
        "features": {
            "stdio": cfg!(feature = "stdio"),
        },
        "configured": {
            "api_key": api_key_configured,
            "endpoint_override": endpoint_overridden,
        },
        "checks": checks,
    });
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    load_env_file();
    init_tracing();

    let cli = Cli::parse();
    match cli.command {
        #[cfg(feature = "stdio")]
        Commands::McpStdio => {
            mcp::server::serve_stdio()
                .await
                .map_err(|e| anyhow::anyhow!(e.to_string()))?;
        }
        Commands::Doctor(args) => doctor(args).await?,
        Commands::Version(_) => version()?,
    }

    Ok(())
}
