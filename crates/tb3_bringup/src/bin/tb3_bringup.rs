//! TurtleBot3 Combined Bringup CLI
//!
//! Usage:
//!   tb3_bringup
//!   tb3_bringup -m burger -d iron
//!   tb3_bringup --dry-run
//!   tb3_bringup --disable service_caller

use std::collections::HashSet;
use tb3_bringup::{
    bringup_description, preflight, AmentIndex, BringupArgs, Executor, ExecutorConfig,
};
use tokio::sync::watch;

#[tokio::main]
async fn main() {
    let args: BringupArgs = argh::from_env();

    // Initialize logging
    let env = env_logger::Env::default().default_filter_or(args.log_level.to_lowercase());
    env_logger::init_from_env(env);

    // Resolve configuration: environment first, CLI overrides on top
    let config = match args.resolve_config() {
        Ok(c) => c,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    log::info!(
        "Bringup config: model={} distro={} use_sim_time={}",
        config.model,
        config.distro,
        config.use_sim_time
    );

    // Compose the launch description
    let index = AmentIndex::from_env();
    let description = match bringup_description(&config, &index) {
        Ok(d) => d,
        Err(e) => {
            log::error!("Failed to compose launch description: {}", e);
            std::process::exit(1);
        }
    };

    // Validate only mode
    if args.validate {
        match preflight(&description) {
            Ok(()) => {
                println!("Bringup description is valid");
                println!("  Actions: {}", description.actions().len());
            }
            Err(e) => {
                log::error!("Preflight failed: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    let disable = args
        .disable
        .map(|n| n.into_iter().collect::<HashSet<_>>())
        .unwrap_or_default();

    let executor_config = ExecutorConfig {
        disable,
        ..Default::default()
    };
    let mut executor = Executor::new(description, executor_config);

    // Dry run mode
    if args.dry_run {
        let plan = executor.plan();
        if args.json {
            match serde_json::to_string_pretty(&plan) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    log::error!("Failed to serialize launch plan: {}", e);
                    std::process::exit(1);
                }
            }
        } else {
            println!("{}", plan);
        }
        return;
    }

    // Create shutdown channel
    let (shutdown_tx, shutdown_rx) = watch::channel(());

    // Set up Ctrl+C handler
    {
        let shutdown_tx = shutdown_tx.clone();
        ctrlc::set_handler(move || {
            log::info!("Received Ctrl+C, initiating shutdown...");
            let _ = shutdown_tx.send(());
        })
        .expect("Error setting Ctrl+C handler");
    }

    // Launch all actions in order
    if let Err(e) = executor.launch(shutdown_rx.clone()).await {
        log::error!("Launch failed: {}", e);
        executor.shutdown().await;
        std::process::exit(1);
    }

    // Wait for shutdown signal or all processes to exit
    executor.wait(shutdown_rx).await;

    // Shutdown all processes in reverse order
    executor.shutdown().await;

    log::info!("Bringup launcher exiting");
}
