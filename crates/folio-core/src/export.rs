use crate::{models::ProjectRecord, Error, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Markdown,
}

impl ExportFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(ExportFormat::Json),
            "csv" => Some(ExportFormat::Csv),
            "md" | "markdown" => Some(ExportFormat::Markdown),
            _ => None,
        }
    }
}

/// Exporter for project lists
pub struct Exporter;

impl Exporter {
    /// Export projects to a file, picking the format from the extension
    pub fn export_to_file<P: AsRef<Path>>(projects: &[&ProjectRecord], path: P) -> Result<()> {
        let path = path.as_ref();

        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(ExportFormat::from_extension)
            .ok_or_else(|| {
                Error::ExportError(
                    "Could not determine export format from extension. Use .json, .csv, or .md"
                        .to_string(),
                )
            })?;

        Self::export_to_file_with_format(projects, path, format)
    }

    /// Export projects to a file with explicit format
    pub fn export_to_file_with_format<P: AsRef<Path>>(
        projects: &[&ProjectRecord],
        path: P,
        format: ExportFormat,
    ) -> Result<()> {
        let content = Self::render(projects, format)?;

        let mut file = File::create(path)
            .map_err(|e| Error::ExportError(format!("Failed to create file: {}", e)))?;

        file.write_all(content.as_bytes())
            .map_err(|e| Error::ExportError(format!("Failed to write file: {}", e)))?;

        Ok(())
    }

    pub fn render(projects: &[&ProjectRecord], format: ExportFormat) -> Result<String> {
        match format {
            ExportFormat::Json => Self::to_json(projects),
            ExportFormat::Csv => Ok(Self::to_csv(projects)),
            ExportFormat::Markdown => Ok(Self::to_markdown(projects)),
        }
    }

    pub fn to_json(projects: &[&ProjectRecord]) -> Result<String> {
        Ok(serde_json::to_string_pretty(projects)?)
    }

    pub fn to_csv(projects: &[&ProjectRecord]) -> String {
        let mut output = String::new();

        output.push_str("Id,Slug,Title,Client,Category,Tags,Objective,Created At,Updated At\n");

        for project in projects {
            output.push_str(&format!(
                "{},{},{},{},{},{},{},{},{}\n",
                Self::escape_csv(&project.id),
                Self::escape_csv(&project.slug),
                Self::escape_csv(&project.title),
                Self::escape_csv(&project.client),
                project.effective_category(),
                Self::escape_csv(&project.tags.join(";")),
                Self::escape_csv(&project.objective),
                project
                    .created_at
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default(),
                project
                    .updated_at
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default(),
            ));
        }

        output
    }

    pub fn to_markdown(projects: &[&ProjectRecord]) -> String {
        let mut output = String::new();

        output.push_str("# Projects\n\n");
        output.push_str(&format!("Total projects: {}\n\n", projects.len()));
        output.push_str("---\n\n");

        for project in projects {
            output.push_str(&format!("## {}\n\n", project.title));

            output.push_str(&format!("**Category:** {}", project.effective_category()));
            if !project.client.is_empty() {
                output.push_str(&format!(" | **Client:** {}", project.client));
            }
            output.push_str("\n\n");

            if !project.objective.is_empty() {
                output.push_str(&format!("{}\n\n", project.objective));
            }

            if !project.tags.is_empty() {
                output.push_str("**Tags:** ");
                let tags: Vec<String> = project.tags.iter().map(|t| format!("`{}`", t)).collect();
                output.push_str(&tags.join(", "));
                output.push_str("\n\n");
            }

            output.push_str(&format!("Slug: `{}`\n", project.slug));
            output.push_str("\n---\n\n");
        }

        if !projects.is_empty() {
            output.push_str("## Category Distribution\n\n");

            // Keep first-seen order so the summary reads like the list above
            let mut counts: Vec<(&str, usize)> = Vec::new();
            for project in projects {
                let category = project.effective_category();
                match counts.iter_mut().find(|(name, _)| *name == category) {
                    Some((_, n)) => *n += 1,
                    None => counts.push((category, 1)),
                }
            }

            for (category, count) in counts {
                output.push_str(&format!("- {}: {}\n", category, count));
            }
        }

        output
    }

    /// Escape CSV special characters
    fn escape_csv(s: &str) -> String {
        if s.contains(',') || s.contains('"') || s.contains('\n') {
            format!("\"{}\"", s.replace('"', "\"\""))
        } else {
            s.to_string()
        }
    }
}
