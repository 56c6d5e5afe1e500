//! Enter the network namespace of another process, then restore.
//!
//! Usage: sudo cargo run --example enter_net -- <pid>

use std::fs;

use nsdive_core::{KindSet, NsTarget};
use nsdive_session::SessionGroup;

fn net_ns() -> String {
    fs::read_link("/proc/self/ns/net")
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|_| "<unreadable>".to_string())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_target(false)
        .init();

    let pid = std::env::args()
        .nth(1)
        .ok_or("usage: enter_net <pid>")?;

    println!("before: {}", net_ns());

    let kinds = KindSet::new().with_net(true);
    let mut group = SessionGroup::open(NsTarget::process(pid), &kinds)?;

    group.enter_all()?;
    println!("inside: {}", net_ns());

    group.exit_all()?;
    println!("after:  {}", net_ns());

    Ok(())
}
