//! Status Board
//!
//! Drives a machine by destination state instead of by transition name:
//! monitors report the status they observed, and the board moves to it if
//! exactly one declared route permits the change. Implied self-transitions
//! make repeated reports of the current status succeed as no-ops.
//!
//! Run with: cargo run --example status_board

use statecraft::{states, transitions, Context, Machine};
use tracing::info;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let machine = Machine::builder("service_status")
        .states(states!["operational", "degraded", "down"])
        .transitions(transitions![
            "degrade", "operational" => "degraded";
            "fail", "degraded" => "down";
            "collapse", "operational" => "down";
            "recover", "degraded" => "operational";
            "restore", "down" => "degraded";
        ])
        .imply_self_transitions(true)
        .initial("operational")
        .build()
        .expect("status graph is valid");

    println!("=== Status Board ===\n");

    let reports = [
        "operational",
        "operational",
        "degraded",
        "degraded",
        "down",
        "degraded",
        "operational",
        "down",
    ];

    for report in reports {
        match machine.change_state(report, Context::new()) {
            Ok(_) => info!(status = report, "board updated"),
            Err(err) => info!(status = report, %err, "report ignored"),
        }
    }

    println!("\ncurrent status: {}", machine.current_state_name());
    println!("status history: {:?}", machine.history().path());
}
