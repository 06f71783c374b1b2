//! List and show commands

use super::load_inventory;
use anyhow::Result;
use shelf_core::{Book, Inventory};

fn print_book(book: &Book) {
    println!("{:<38} {:>4}  {} ({})", book.id, book.quantity, book.title, book.author);
}

/// Print every book in a catalog
pub fn list(catalog: &str, json: bool) -> Result<()> {
    let books = load_inventory(catalog)?.list_all()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&books)?);
        return Ok(());
    }

    println!("{:<38} {:>4}  Title (Author)", "Id", "Qty");
    for book in &books {
        print_book(book);
    }
    println!("{} books", books.len());

    Ok(())
}

/// Print a single book from a catalog
pub fn show(catalog: &str, id: &str, json: bool) -> Result<()> {
    let book = load_inventory(catalog)?.get(id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&book)?);
    } else {
        println!("Id:       {}", book.id);
        println!("Title:    {}", book.title);
        println!("Author:   {}", book.author);
        println!("Quantity: {}", book.quantity);
    }

    Ok(())
}
