//! Drill-down command

use anyhow::Result;
use vantage_core::{Dimension, DrillDown};

use super::print_json;

pub fn cmd_drill(dimension: Dimension, name: &str, json: bool) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("Row name must not be empty");
    }

    let drill = DrillDown::new(name, dimension);
    if json {
        return print_json(&drill);
    }

    println!("🔎 {} = {}", drill.target.dimension, drill.row);
    println!("   {}", drill.route);
    Ok(())
}
