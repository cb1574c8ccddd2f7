//! Topic comment file writer with Handlebars template engine
//!
//! This module renders the comments of each crawled topic and saves them as
//! one file per topic.

use anyhow::{Context, Result};
use handlebars::Handlebars;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::OutputFormat;
use crate::models::{Comment, CrawlReport, TopicComments};
use crate::utils::sanitize_filename;

/// Default plain text template
const DEFAULT_TEMPLATE: &str = include_str!("../../templates/comments.hbs");

/// Template data for one comment
#[derive(Debug, Serialize)]
struct CommentTemplateData<'c> {
    body: &'c str,
    // Rendered as text so that a zero count still shows up
    likes: Option<String>,
    replies: &'c [String],
}

impl<'c> From<&'c Comment> for CommentTemplateData<'c> {
    fn from(comment: &'c Comment) -> Self {
        Self {
            body: &comment.body,
            likes: comment.like_count.map(|n| n.to_string()),
            replies: &comment.replies,
        }
    }
}

#[derive(Debug, Serialize)]
struct TopicTemplateData<'c> {
    topic: &'c str,
    comments: Vec<CommentTemplateData<'c>>,
}

/// Comment writer producing one file per topic
pub struct CommentWriter<'a> {
    /// Handlebars template engine
    handlebars: Handlebars<'a>,

    /// Output directory
    output_dir: PathBuf,

    /// File format
    format: OutputFormat,
}

impl<'a> CommentWriter<'a> {
    /// Create a new CommentWriter with the default template
    ///
    /// # Example
    /// ```no_run
    /// use redian::config::OutputFormat;
    /// use redian::storage::CommentWriter;
    /// use std::path::Path;
    ///
    /// let writer = CommentWriter::new(Path::new("./output"), OutputFormat::Text).unwrap();
    /// ```
    pub fn new(output_dir: &Path, format: OutputFormat) -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(handlebars::no_escape);

        handlebars
            .register_template_string("comments", DEFAULT_TEMPLATE)
            .context("Failed to register default comments template")?;

        fs::create_dir_all(output_dir).context("Failed to create output directory")?;

        Ok(Self {
            handlebars,
            output_dir: output_dir.to_path_buf(),
            format,
        })
    }

    /// Create with custom template file (text format only)
    pub fn with_template(output_dir: &Path, template_path: &Path) -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(handlebars::no_escape);

        handlebars
            .register_template_file("comments", template_path)
            .context("Failed to register custom template")?;

        fs::create_dir_all(output_dir).context("Failed to create output directory")?;

        Ok(Self {
            handlebars,
            output_dir: output_dir.to_path_buf(),
            format: OutputFormat::Text,
        })
    }

    /// Render one topic in the configured format
    pub fn render(&self, topic: &TopicComments) -> Result<String> {
        match self.format {
            OutputFormat::Text => {
                let data = TopicTemplateData {
                    topic: &topic.topic,
                    comments: topic.comments.iter().map(CommentTemplateData::from).collect(),
                };
                self.handlebars
                    .render("comments", &data)
                    .context("Failed to render comments template")
            }
            OutputFormat::Json => serde_json::to_string_pretty(&topic.comments)
                .context("Failed to serialize comments"),
        }
    }

    /// File path a topic is written to
    pub fn path_for(&self, topic: &str) -> PathBuf {
        let extension = match self.format {
            OutputFormat::Text => "txt",
            OutputFormat::Json => "json",
        };
        self.output_dir
            .join(format!("{}.{extension}", sanitize_filename(topic)))
    }

    /// Save one topic, overwriting an existing file
    pub fn save_topic(&self, topic: &TopicComments) -> Result<PathBuf> {
        let rendered = self.render(topic)?;
        let filepath = self.path_for(&topic.topic);

        let mut file = File::create(&filepath)
            .with_context(|| format!("Failed to create file: {}", filepath.display()))?;

        file.write_all(rendered.as_bytes())
            .with_context(|| format!("Failed to write to file: {}", filepath.display()))?;

        tracing::debug!(path = %filepath.display(), comments = topic.comments.len(), "Saved topic");
        Ok(filepath)
    }

    /// Save every topic of a report
    ///
    /// # Returns
    /// Paths of the written files, in report order
    pub fn save_report(&self, report: &CrawlReport) -> Result<Vec<PathBuf>> {
        report
            .topics
            .iter()
            .map(|topic| self.save_topic(topic))
            .collect()
    }

    /// Get output directory
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}
