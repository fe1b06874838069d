//! Simple usage example
//!
//! Run with `RUST_LOG=ticket_queue=trace` to see the registry's events.

use ticket_queue::{DefaultRegistry, QueueError, Ticket};
use tracing_subscriber::EnvFilter;

fn fill_and_drain(queues: &mut DefaultRegistry, ticket: Ticket, values: &[i32]) -> Result<(), QueueError> {
    for &v in values {
        queues.push(ticket, v)?;
    }
    println!("{}", queues.snapshot(ticket)?);
    for _ in values {
        println!("Removed from queue: {}", queues.pop(ticket)?);
    }
    Ok(())
}

fn main() -> Result<(), QueueError> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    println!("ticket_queue - Simple Example\n");

    let mut queues = DefaultRegistry::new();

    let first = queues.create()?;
    println!("Ticket: {first}");
    fill_and_drain(&mut queues, first, &[11, 12, 13])?;

    let second = queues.create()?;
    println!("Ticket: {second}");
    fill_and_drain(&mut queues, second, &[910, 920, 930, 940, 950])?;

    queues.delete(first)?;
    queues.delete(second)?;

    // both tickets are dead now
    match queues.pop(first) {
        Err(e) => println!("Stale ticket rejected ({}): {e}", e.code()),
        Ok(v) => println!("Unexpected value from deleted queue: {v}"),
    }

    println!("\nExample completed successfully!");
    Ok(())
}
