//! Plain-text output of boards and sessions.

use corkboard_core::listing::BoardPage;
use corkboard_core::models::{BoardCategory, BoardDetail, BoardSummary};
use corkboard_core::utils::{format_date, format_optional, preview, truncate};
use corkboard_core::Session;

/// Width of the title column in the list
const TITLE_WIDTH: usize = 48;

/// Width of the one-line content preview
const PREVIEW_WIDTH: usize = 72;

pub fn print_page(page: &BoardPage, category: Option<&BoardCategory>) {
    if !page.notices.is_empty() {
        println!("Notices");
        for notice in &page.notices {
            println!("  #{:<5} {}", notice.id, truncate(&notice.title, TITLE_WIDTH));
        }
        println!();
    }

    match category {
        Some(c) => println!("Posts in {}", c.label()),
        None => println!("All posts"),
    }

    if page.is_empty() {
        println!("  No posts yet.");
        return;
    }
    for board in &page.content {
        print_summary(board);
    }

    println!();
    println!(
        "Page {} of {} ({} posts)",
        page.page + 1,
        page.total_pages.max(1),
        page.total_elements
    );
    if page.has_previous() {
        println!("  previous: corkboard list --page {}", page.page);
    }
    if page.has_next() {
        println!("  next:     corkboard list --page {}", page.page + 2);
    }
}

fn print_summary(board: &BoardSummary) {
    println!(
        "  #{:<5} [{}] {}  ({})",
        board.id,
        board.category.label(),
        truncate(&board.title, TITLE_WIDTH),
        format_date(&board.created_at)
    );
    if !board.content.is_empty() {
        println!("         {}", preview(&board.content, PREVIEW_WIDTH));
    }
}

pub fn print_detail(board: &BoardDetail, image_url: Option<&str>) {
    println!("[{}] {}", board.board_category.label(), board.title);
    println!("Posted: {}", format_date(&board.created_at));
    println!();
    println!("{}", board.content);
    if let Some(url) = image_url {
        println!();
        println!("Image: {}", url);
    }
}

pub fn print_identity(session: &Session) {
    if !session.is_authenticated() {
        println!("Not signed in.");
        return;
    }
    let username = format_optional(session.identity.username.as_deref(), "unknown");
    match session.identity.display_name.as_deref() {
        Some(name) if name != username => println!("Signed in as {} <{}>", name, username),
        _ => println!("Signed in as {}", username),
    }
}
