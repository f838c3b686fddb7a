//! List monitors command

use anyhow::Result;
use vigil_core::capture;

/// List attached monitors in the order `--monitor` indexes them
pub fn list_monitors() -> Result<()> {
    println!("Vigil - Attached Monitors\n");

    let monitors = capture::list_monitors()?;

    if monitors.is_empty() {
        println!("No monitors found.");
        return Ok(());
    }

    println!("{:<7} {:<30} {:<12} {}", "Index", "Name", "Resolution", "Primary");
    println!("{}", "-".repeat(58));

    for monitor in monitors {
        println!(
            "{:<7} {:<30} {:<12} {}",
            monitor.index,
            truncate(&monitor.name, 28),
            format!("{}x{}", monitor.width, monitor.height),
            if monitor.is_primary { "yes" } else { "" }
        );
    }

    Ok(())
}

// Truncation counts chars, not bytes; monitor names can be multibyte.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max - 3).collect();
        format!("{}...", head)
    }
}
