// ============================================================================
// Terminal Output Functions
// ============================================================================

use serde_json::Value;
use crate::client::Args;
use crate::client::config::Config;
use crate::client::poller::Snapshot;

pub fn log_startup_banner(args: &Args, config: &Config) {
    println!("====================================");
    println!("  ipwall admin client");
    println!("====================================");
    println!("Backend: {}", config.server_url);
    println!("Config file: {}", args.config);
    match config.timeout_secs {
        Some(secs) => println!("Request timeout: {}s", secs),
        None => println!("Request timeout: none"),
    }
    println!("------------------------------------");
}

pub fn print_status(snapshot: Option<&Snapshot>) {
    print!("{}", render_status(snapshot));
}

/// Renders a `/status` snapshot as a tree
///
/// Arrays list their items, objects list `key: value` pairs, anything else
/// is printed inline.
pub fn render_status(snapshot: Option<&Snapshot>) -> String {
    let mut out = String::new();
    out.push_str("\n╔══════════════════════════════════════════════════════════════════════╗\n");
    out.push_str("║                           FIREWALL STATUS                            ║\n");
    out.push_str("╚══════════════════════════════════════════════════════════════════════╝\n");

    let snapshot = match snapshot {
        Some(snapshot) => snapshot,
        None => {
            out.push_str("   └─ Status unavailable\n");
            return out;
        }
    };

    if snapshot.is_empty() {
        out.push_str("   └─ Empty\n");
        return out;
    }

    for (key, value) in snapshot {
        match value {
            Value::Array(items) => {
                out.push_str(&format!("\n{}: {} entries\n", key, items.len()));
                push_children(&mut out, items.iter().map(inline).collect());
            }
            Value::Object(map) => {
                out.push_str(&format!("\n{}: {} entries\n", key, map.len()));
                push_children(
                    &mut out,
                    map.iter().map(|(k, v)| format!("{}: {}", k, inline(v))).collect(),
                );
            }
            other => out.push_str(&format!("\n{}: {}\n", key, inline(other))),
        }
    }
    out
}

fn push_children(out: &mut String, children: Vec<String>) {
    if children.is_empty() {
        out.push_str("   └─ (none)\n");
        return;
    }
    for (idx, child) in children.iter().enumerate() {
        let prefix = if idx == children.len() - 1 { "└─" } else { "├─" };
        out.push_str(&format!("   {} {}\n", prefix, child));
    }
}

fn inline(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
