use anyhow::Result;

use routerwatch_core::config::Config;

pub fn print_effective(config: &Config) -> Result<()> {
    let output = config.to_toml_string()?;
    println!("{}", output);
    Ok(())
}
