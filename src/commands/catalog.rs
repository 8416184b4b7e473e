use super::render::new_table;
use anyhow::Result;
use colored::Colorize;
use comfy_table::Cell;
use cost_projector::catalog::Catalog;

/// Execute the catalog command
pub fn execute(json: bool) -> Result<()> {
    if json {
        let mut listing = serde_json::Map::new();
        for catalog in Catalog::ALL {
            listing.insert(catalog.name().to_string(), serde_json::to_value(catalog.models())?);
        }
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    for catalog in Catalog::ALL {
        println!("{}", catalog.name().green().bold());
        let mut table = new_table(&["ID", "NAME", "PROVIDER", "RATE"]);
        for (idx, model) in catalog.models().iter().enumerate() {
            let id = if idx == 0 {
                format!("{} (default)", model.id)
            } else {
                model.id.to_string()
            };
            table.add_row(vec![
                Cell::new(id),
                Cell::new(model.display_name),
                Cell::new(model.provider),
                Cell::new(model.rate_label()),
            ]);
        }
        println!("{}", table);
        println!();
    }

    Ok(())
}
