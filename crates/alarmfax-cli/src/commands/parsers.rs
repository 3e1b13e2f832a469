//! Parsers command - list the registered fax parsers.

use console::style;

use alarmfax_core::ParserRegistry;
use alarmfax_core::fax::generic::GENERIC_ALIAS;

use super::config::load_config;

pub async fn run(config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let registry = ParserRegistry::new();

    println!("{}", style("Registered parsers:").bold());
    for alias in registry.aliases().into_iter().chain([GENERIC_ALIAS]) {
        if alias == config.parser.alias {
            println!("  {} {}", style("*").green(), style(alias).green());
        } else {
            println!("    {}", alias);
        }
    }

    if alias_missing(&registry, &config.parser.alias) {
        println!();
        println!(
            "{} Configured parser '{}' is not registered.",
            style("⚠").yellow(),
            config.parser.alias
        );
    }

    Ok(())
}

fn alias_missing(registry: &ParserRegistry, alias: &str) -> bool {
    alias != GENERIC_ALIAS && registry.get(alias).is_err()
}
