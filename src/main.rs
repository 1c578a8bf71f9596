//! garageledger main entrypoint.

use garageledger::run;
use garageledger::ui::messages::error;

fn main() {
    println!();
    if let Err(e) = run() {
        error(format!("Error: {}", e));
        std::process::exit(1);
    }
}
