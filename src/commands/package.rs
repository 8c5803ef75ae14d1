use crate::core::package::package;
use crate::error::Result;
use std::path::Path;

pub fn package_directory(source: &Path, output: &Path) -> Result<()> {
    package(source, output)?;
    println!("Done!");
    Ok(())
}
