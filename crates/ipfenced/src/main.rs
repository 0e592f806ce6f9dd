// # ipfenced - IPFence Daemon
//
// Thin integration layer over ipfence-core. The daemon only:
// 1. Reads configuration from environment variables
// 2. Initializes the runtime and tracing
// 3. Assembles the backend registry and opens the store
// 4. Preloads an optional blocklist file
// 5. Waits for shutdown signals and runs the stop protocol
//
// All membership logic lives in ipfence-core.
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// - `IPFENCE_BACKEND`: backend name to open (default: memory)
// - `IPFENCE_BACKEND_PARAMS`: backend-specific parameters as JSON
// - `IPFENCE_BLOCKLIST_FILE`: file with one ip-or-cidr rule per line;
//   blank lines and `#` comments are ignored
// - `IPFENCE_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
//
// ## Example
//
// ```bash
// export IPFENCE_BACKEND=memory
// export IPFENCE_BLOCKLIST_FILE=/etc/ipfence/blocklist.txt
//
// ipfenced
// ```

use anyhow::{Context, Result};
use ipfence_core::traits::IpStore;
use ipfence_core::{BackendRegistry, StoreConfig, store};
use std::env;
use std::net::IpAddr;
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum IpfenceExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<IpfenceExitCode> for ExitCode {
    fn from(code: IpfenceExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    backend: String,
    backend_params: Option<String>,
    blocklist_file: Option<String>,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Self {
        Self {
            backend: env::var("IPFENCE_BACKEND").unwrap_or_else(|_| "memory".to_string()),
            backend_params: env::var("IPFENCE_BACKEND_PARAMS").ok(),
            blocklist_file: env::var("IPFENCE_BLOCKLIST_FILE").ok(),
            log_level: env::var("IPFENCE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        }
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if self.backend.is_empty() {
            anyhow::bail!(
                "IPFENCE_BACKEND cannot be empty. \
                Set it via: export IPFENCE_BACKEND=memory"
            );
        }

        if let Some(ref params) = self.backend_params {
            serde_json::from_str::<serde_json::Value>(params)
                .context("IPFENCE_BACKEND_PARAMS is not valid JSON")?;
        }

        if let Some(ref path) = self.blocklist_file {
            if path.is_empty() {
                anyhow::bail!("IPFENCE_BLOCKLIST_FILE cannot be empty when set");
            }
            if !Path::new(path).exists() {
                anyhow::bail!("IPFENCE_BLOCKLIST_FILE does not exist: {}", path);
            }
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "IPFENCE_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }

    /// Build the store configuration handed to the registry
    fn store_config(&self) -> Result<StoreConfig> {
        let params = match self.backend_params {
            Some(ref text) => serde_json::from_str(text)
                .context("IPFENCE_BACKEND_PARAMS is not valid JSON")?,
            None => serde_json::Value::Null,
        };
        Ok(StoreConfig::new(self.backend.as_str()).with_params(params))
    }
}

fn main() -> ExitCode {
    let config = Config::from_env();

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return IpfenceExitCode::ConfigError.into();
    }

    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return IpfenceExitCode::ConfigError.into();
    }

    info!("Starting ipfenced daemon");
    info!("Backend: {}", config.backend);

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return IpfenceExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_daemon(config).await {
            error!("Daemon error: {}", e);
            IpfenceExitCode::RuntimeError
        } else {
            IpfenceExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Run the daemon
async fn run_daemon(config: Config) -> Result<()> {
    // Assemble the registry before any store is opened.
    let registry = BackendRegistry::new();
    store::memory::register(&registry);

    let store_config = config.store_config()?;
    let ip_store = registry
        .open_store(&store_config)
        .with_context(|| format!("failed to open backend '{}'", config.backend))?;
    info!("Store opened");

    if let Some(ref path) = config.blocklist_file {
        let loaded = preload_blocklist(ip_store.as_ref(), Path::new(path))
            .await
            .with_context(|| format!("failed to preload blocklist '{}'", path))?;
        info!("Preloaded {} blocklist rule(s) from {}", loaded, path);
    }

    info!("Ready to answer membership queries");

    let signal_name = wait_for_shutdown().await?;
    info!("Received shutdown signal: {}", signal_name);

    // Non-blocking initiation; await teardown with a bound so a stuck
    // backend cannot hang the exit path.
    let handle = ip_store.stop();
    match tokio::time::timeout(Duration::from_secs(10), handle.wait()).await {
        Ok(Ok(())) => info!("Store stopped cleanly"),
        Ok(Err(e)) => return Err(e).context("store teardown failed"),
        Err(_) => anyhow::bail!("store teardown timed out after 10s"),
    }

    Ok(())
}

/// Load one ip-or-cidr rule per line into the store
///
/// Returns the number of rules applied. A rule containing `/` is added
/// as a network; anything else must parse as a single address.
async fn preload_blocklist(store: &dyn IpStore, path: &Path) -> Result<usize> {
    let text = std::fs::read_to_string(path)?;

    let mut loaded = 0usize;
    for (line_no, line) in text.lines().enumerate() {
        let rule = normalize_rule_line(line);
        if rule.is_empty() {
            continue;
        }

        if rule.contains('/') {
            store
                .add_network(rule)
                .await
                .with_context(|| format!("line {}", line_no + 1))?;
        } else {
            let addr: IpAddr = rule
                .parse()
                .with_context(|| format!("bad address '{}' at line {}", rule, line_no + 1))?;
            store.add_ip(addr).await?;
        }
        loaded += 1;
    }

    Ok(loaded)
}

/// Strip comments and whitespace from a blocklist line
fn normalize_rule_line(line: &str) -> &str {
    let line = line.trim();
    if line.starts_with('#') {
        return "";
    }
    line.split_once('#')
        .map(|(rule, _)| rule)
        .unwrap_or(line)
        .trim()
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    let name = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };
    Ok(name)
}

/// Wait for shutdown signals (SIGINT only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}
