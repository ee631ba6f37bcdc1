use std::path::PathBuf;

use super::{open_with, require_active, FileExportSink};

pub fn run(out: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let dir = match out {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let mut app = open_with(false, Box::new(FileExportSink::new(dir.clone())))?;
    require_active(&app)?;
    match app.export_csv()? {
        Some(filename) => println!("{}", dir.join(filename).display()),
        None => println!("No labels to export."),
    }
    Ok(())
}
