//! Device Lifecycle
//!
//! A field device moves uninitialised -> initialised -> online <-> offline,
//! with a self-transition for heartbeats that refresh the device in place.
//! Callbacks log each move and stamp the context with what they observed.
//!
//! Run with: cargo run --example device_lifecycle

use statecraft::{Context, Machine, State, Transition};
use tracing::{info, warn};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let machine = Machine::builder("device_007")
        .states([
            State::new("uninitialised"),
            State::new("initialised").on_enter(|scope| {
                let firmware = scope
                    .context
                    .get_as::<String>("firmware")
                    .unwrap_or_else(|| "unknown".to_owned());
                info!(firmware = %firmware, "device provisioned");
                Ok(scope.context)
            }),
            State::new("online")
                .on_enter(|scope| {
                    info!("device online");
                    Ok(scope.context)
                })
                .on_exit(|scope| {
                    warn!("device leaving online");
                    Ok(scope.context)
                }),
            State::new("offline").on_enter(|scope| {
                warn!("device offline");
                Ok(scope.context)
            }),
        ])
        .transitions([
            Transition::new("configure", "uninitialised", "initialised"),
            Transition::new("connect", "initialised", "online"),
            Transition::new("connect", "offline", "online"),
            Transition::new("disconnect", "online", "offline"),
            // a heartbeat refreshes the device in place: the online state's
            // own callbacks stay quiet, only the transition's fire
            Transition::new("heartbeat", "online", "online").on_exit(|scope| {
                let beats = scope.context.get_as::<i64>("beats").unwrap_or(0);
                Ok(scope.context.with("beats", beats + 1))
            }),
        ])
        .initial("uninitialised")
        .build()
        .expect("device graph is valid");

    println!("=== Device Lifecycle ===\n");
    println!("starting at: {}", machine.current_state_name());

    machine
        .transition("configure", Context::new().with("firmware", "2.4.1"))
        .expect("configure is valid from uninitialised");
    machine
        .transition("connect", Context::new())
        .expect("connect is valid from initialised");

    let mut ctx = Context::new();
    for _ in 0..3 {
        ctx = machine
            .transition("heartbeat", ctx)
            .expect("heartbeat is valid while online");
    }
    println!(
        "heartbeats while online: {}",
        ctx.get_as::<i64>("beats").unwrap_or(0)
    );

    machine
        .transition("disconnect", Context::new())
        .expect("disconnect is valid from online");
    machine
        .transition("connect", Context::new())
        .expect("connect is valid from offline");

    // an out-of-order command is rejected and changes nothing
    if let Err(err) = machine.transition("configure", Context::new()) {
        println!("rejected as expected: {err}");
    }

    println!("\npath travelled: {:?}", machine.history().path());
    println!("ending at: {}", machine.current_state_name());
}
