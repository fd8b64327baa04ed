//! Minimal clenv demo.
//!
//! Try:
//!
//! ```sh
//! cargo run --example clenv_demo -- --port 7000 --verbose
//! PORT=5000 cargo run --example clenv_demo
//! cargo run --example clenv_demo -- -c demo.lenv
//! ```

use clenv::{Clenv, FlagDef};

fn main() {
    let config = Clenv::builder()
        .options(|flags, env| {
            flags
                .option(
                    FlagDef::int("port")
                        .alias('p')
                        .default(env.int("PORT", 3000))
                        .help("Server port"),
                )
                .option(
                    FlagDef::string("api-key")
                        .alias('k')
                        .default(env.string("API_KEY", ""))
                        .help("API key"),
                )
                .option(
                    FlagDef::bool("verbose")
                        .alias('v')
                        .default(env.bool("VERBOSE", false))
                        .help("Verbose output"),
                )
        })
        .load()
        .unwrap_or_else(|e| e.exit());

    if config.bool("verbose").unwrap_or(false) {
        for (key, value) in config.iter() {
            println!("{key} = {value}");
        }
    }

    println!(
        "server would start on port {}",
        config.int("port").unwrap_or(3000)
    );
}
