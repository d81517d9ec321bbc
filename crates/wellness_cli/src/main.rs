//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `wellness_core` linkage without the Flutter runtime.
//! - Print the support-chat reply for a message given as arguments.

fn main() {
    println!("wellness_core ping={}", wellness_core::ping());
    println!("wellness_core version={}", wellness_core::core_version());

    let message = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if !message.trim().is_empty() {
        println!("reply={}", wellness_core::respond(&message));
    }
}
