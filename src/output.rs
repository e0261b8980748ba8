//! Terminal rendering for the demo summary.

use crate::pipeline::stats::StatsSnapshot;
use owo_colors::OwoColorize;

/// Prints the end-of-session counters.
pub fn render_summary(snapshot: &StatsSnapshot) {
    println!();
    println!("session summary");
    println!("  frames produced   {}", snapshot.produced);
    println!(
        "  frames delivered  {}",
        snapshot.delivered.to_string().green()
    );
    let drop_pct = snapshot.drop_ratio() * 100.0;
    let dropped = format!("{} ({:.1}%)", snapshot.dropped, drop_pct);
    if snapshot.dropped == 0 {
        println!("  frames dropped    {}", dropped);
    } else {
        println!("  frames dropped    {}", dropped.yellow());
    }
    if snapshot.failed > 0 {
        println!(
            "  frames failed     {}",
            snapshot.failed.to_string().red()
        );
    }
}
