use anyhow::Result;

use crate::output;

pub fn execute() -> Result<()> {
    let registry = super::registry()?;

    println!("Registered Validators:");
    for descriptor in registry.descriptors() {
        output::print_descriptor(descriptor);
    }

    Ok(())
}
