//! Table and JSON rendering for CLI results.

use crate::types::{Blog, BlogPage, FeedbackPage, MessageResponse, UserPage};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

fn print_json<T: Serialize>(item: &T) {
    let json = serde_json::to_string_pretty(item).unwrap_or_else(|_| "{}".to_string());
    println!("{json}");
}

fn truncate(value: &str, max: usize) -> String {
    let flat = value.replace(['\n', '\r'], " ");
    if flat.chars().count() <= max {
        return flat;
    }
    let mut out: String = flat.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn pagination(page: u32, total_pages: Option<u32>) -> String {
    match total_pages {
        Some(total) => format!("page {page} of {total}"),
        None => format!("page {page}"),
    }
}

pub fn format_blog_row(blog: &Blog) -> String {
    let reactions = match (blog.likes, blog.dislikes) {
        (Some(l), Some(d)) => format!("+{l}/-{d}"),
        _ => String::new(),
    };
    let blocked = if blog.is_blocked == Some(true) {
        " [blocked]"
    } else {
        ""
    };
    format!(
        "{:>5}  {:<40}  {:>6} reads  {}{}",
        blog.id,
        truncate(&blog.title, 40),
        blog.read_count,
        reactions,
        blocked
    )
}

pub fn print_blog_page(page: &BlogPage, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(page),
        OutputFormat::Table => {
            if page.blogs.is_empty() {
                println!("No results found.");
            }
            for blog in &page.blogs {
                println!("{}", format_blog_row(blog));
            }
            println!("-- {}", pagination(page.page, page.total_pages));
        }
    }
}

pub fn print_blog(blog: &Blog, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(blog),
        OutputFormat::Table => {
            println!("#{} {}", blog.id, blog.title);
            if let Some(created) = blog.created_at {
                println!("created {}", created.format("%Y-%m-%d %H:%M"));
            }
            if let Some(url) = &blog.image_url {
                println!("image {url}");
            }
            println!();
            println!("{}", blog.content);
        }
    }
}

pub fn print_feedback_page(page: &FeedbackPage, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(page),
        OutputFormat::Table => {
            if page.feedbacks.is_empty() {
                println!("No results found.");
            }
            for fb in &page.feedbacks {
                let author = fb
                    .user_name
                    .clone()
                    .or_else(|| fb.user_id.map(|id| format!("user {id}")))
                    .unwrap_or_default();
                let listed = match fb.is_listed {
                    Some(false) => " [hidden]",
                    _ => "",
                };
                println!("{:>5}  {:<16}  {}{}", fb.id, truncate(&author, 16), truncate(&fb.comment, 60), listed);
            }
            println!("-- {}", pagination(page.page, page.total_pages));
        }
    }
}

pub fn print_user_page(page: &UserPage, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(page),
        OutputFormat::Table => {
            if page.users.is_empty() {
                println!("No results found.");
            }
            for user in &page.users {
                let name = user.full_name.as_deref().unwrap_or("");
                let status = if user.is_blocked { "blocked" } else { "active" };
                let role = if user.is_admin { "admin" } else { "reader" };
                println!(
                    "{:>5}  {:<24}  {:<32}  {:<7}  {}",
                    user.id,
                    truncate(name, 24),
                    truncate(&user.email, 32),
                    status,
                    role
                );
            }
            println!("-- {}", pagination(page.page, page.total_pages));
        }
    }
}

pub fn print_message(message: &MessageResponse, fallback: &str, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(message),
        OutputFormat::Table => {
            let text = if message.message.trim().is_empty() {
                fallback
            } else {
                message.message.trim()
            };
            print_success(text);
        }
    }
}

pub fn print_success(msg: &str) {
    println!("✓ {msg}");
}

pub fn print_warning(msg: &str) {
    eprintln!("⚠ {msg}");
}

pub fn print_error(msg: &str) {
    eprintln!("✗ {msg}");
}
