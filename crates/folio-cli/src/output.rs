// Terminal rendering for the CLI - plain tables, or machine formats on stdout
use folio_core::{Category, ExportFormat, Exporter, FilteredResult, ProjectRecord, RelatedProject};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

pub fn print_result(result: &FilteredResult<'_>, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table => print_table(result),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(result)?),
        OutputFormat::Csv => print!("{}", Exporter::render(&result.items, ExportFormat::Csv)?),
        OutputFormat::Markdown => {
            print!("{}", Exporter::render(&result.items, ExportFormat::Markdown)?)
        }
    }
    Ok(())
}

fn print_table(result: &FilteredResult<'_>) {
    if result.is_empty() {
        println!("No projects match. (page 1 of 1)");
        return;
    }

    match result.range() {
        Some((first, last)) => println!(
            "Showing {}-{} of {} projects (page {} of {})\n",
            first, last, result.total_count, result.page, result.page_count
        ),
        None => println!(
            "Page {} is past the end: {} projects over {} pages\n",
            result.page, result.total_count, result.page_count
        ),
    }

    println!(
        "{:<28} {:<16} {:<20} {}",
        "SLUG", "CATEGORY", "CLIENT", "TITLE"
    );
    for record in &result.items {
        println!(
            "{:<28} {:<16} {:<20} {}",
            truncate(&record.slug, 28),
            truncate(record.effective_category(), 16),
            truncate(&record.client, 20),
            record.title
        );
    }

    if result.has_next() {
        let next = result.criteria.clone().with_page(result.page + 1);
        println!("\nNext page: --query '{}'", next);
    }
}

pub fn print_record(record: &ProjectRecord, related: &[RelatedProject<'_>]) {
    println!("{}", record.title);
    println!("{}", "=".repeat(record.title.chars().count().max(1)));
    println!("Slug:      {}", record.slug);
    println!("Category:  {}", record.effective_category());
    if !record.client.is_empty() {
        println!("Client:    {}", record.client);
    }
    if !record.tags.is_empty() {
        println!("Tags:      {}", record.tags.join(", "));
    }
    if let Some(created) = record.created_at {
        println!("Created:   {}", created.format("%Y-%m-%d"));
    }
    if let Some(updated) = record.updated_at {
        println!("Updated:   {}", updated.format("%Y-%m-%d"));
    }
    if !record.objective.is_empty() {
        println!("\n{}", record.objective);
    }

    if !related.is_empty() {
        println!("\nRelated:");
        for item in related {
            println!("  {:<28} {:>4.0}%", item.record.slug, item.score * 100.0);
        }
    }
}

pub fn print_related(slug: &str, related: &[RelatedProject<'_>]) {
    if related.is_empty() {
        println!("Nothing shares a tag with {}", slug);
        return;
    }

    for item in related {
        println!(
            "{:<28} {:>4.0}%  {}",
            item.record.slug,
            item.score * 100.0,
            item.record.title
        );
    }
}

pub fn print_counts(label: &str, counts: &[(String, usize)]) {
    println!("{:<24} {:>5}", label.to_uppercase(), "COUNT");
    for (name, count) in counts {
        println!("{:<24} {:>5}", name, count);
    }
}

/// Category tabs: display name, count and the keywords that select it.
/// Custom categories have no keywords and show their slug.
pub fn print_categories(counts: &[(String, usize)]) {
    println!("{:<18} {:>5}  {}", "CATEGORY", "COUNT", "KEYWORDS");
    for (name, count) in counts {
        match name.parse::<Category>() {
            Ok(category) => println!(
                "{:<18} {:>5}  {}",
                category.label(),
                count,
                category.keywords().join(", ")
            ),
            Err(_) => println!("{:<18} {:>5}", name, count),
        }
    }
}

/// Cut to `width` chars, marking the cut with an ellipsis
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(1)).collect();
    format!("{}…", kept)
}
