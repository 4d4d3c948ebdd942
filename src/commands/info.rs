use crate::commands::read_input;
use crate::pdf::inspect;
use anyhow::Result;
use std::path::Path;

pub fn run<P: AsRef<Path>>(path: P) -> Result<()> {
    let (name, bytes) = read_input(&path)?;
    let info = inspect(&bytes)?;

    println!("File: {}", name);
    println!("Pages: {}", info.page_count);

    if let Some(title) = &info.title {
        println!("Title: {}", title);
    }
    if let Some(author) = &info.author {
        println!("Author: {}", author);
    }

    Ok(())
}
