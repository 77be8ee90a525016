//! MyFit main entrypoint.

use myfit::run;
use myfit::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(format!("Error: {e}"));
        for hint in e.hints() {
            eprintln!("   • {hint}");
        }
        std::process::exit(1);
    }
}
