//! motion_keys: interactive entry point.

use clap::Parser;
use motion_keys::app::run;
use motion_keys::config::{self, Cli};
use motion_keys::logging;

fn main() {
    let cli = Cli::parse();
    logging::init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║          Motion Keys — zones over motion, keys out           ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let cfg = match config::resolve(&cli) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    println!("  Actuator:  {:?}", cfg.actuator);
    println!("  Threshold: {}", cfg.threshold);
    println!("  Saves:     {}", cfg.save_path.display());
    println!();
    println!("  Opening editor window…  (right-drag = simulated hand)");
    println!();

    if let Err(e) = run(cfg) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
