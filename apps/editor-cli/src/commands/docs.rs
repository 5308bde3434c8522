//! Document commands.

use super::{failure, Context};
use crate::output::{self, OutputFormat};
use anyhow::Result;
use editor_docs::{Document, DocumentFields};

fn print_document(doc: &Document, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            output::print_heading(&doc.title);
            output::print_row("ID", doc.identifier().unwrap_or("-"));
            for (name, value) in &doc.extra {
                output::print_row(name, &value.to_string());
            }
            println!();
            println!("{}", doc.content);
        }
        OutputFormat::Json => output::print_json(doc)?,
    }
    Ok(())
}

/// List all documents.
pub async fn docs_list(ctx: &Context) -> Result<()> {
    let client = ctx.document_client()?;
    client.list_documents().await;
    if client.error().is_some() {
        return Err(failure(&client, "Failed to fetch documents"));
    }

    let docs = client.documents();
    match ctx.format {
        OutputFormat::Text => {
            if docs.is_empty() {
                println!("No documents found");
            } else {
                println!("{:<26} {}", "ID", "Title");
                println!("{}", "-".repeat(60));
                for doc in &docs {
                    println!("{:<26} {}", doc.identifier().unwrap_or("-"), doc.title);
                }
            }
        }
        OutputFormat::Json => output::print_json(&docs)?,
    }

    Ok(())
}

/// Show one document.
pub async fn docs_show(ctx: &Context, id: &str) -> Result<()> {
    let client = ctx.document_client()?;
    match client.get_document(id).await {
        Some(doc) => print_document(&doc, &ctx.format),
        None => Err(failure(&client, "Document not found")),
    }
}

/// Create a document.
pub async fn docs_create(ctx: &Context, title: String, content: String) -> Result<()> {
    let client = ctx.document_client()?;
    match client
        .create_document(&DocumentFields::new(title, content))
        .await
    {
        Some(doc) => match ctx.format {
            OutputFormat::Text => {
                output::print_success(
                    &format!("Created document {}", doc.identifier().unwrap_or("-")),
                    &ctx.format,
                );
                Ok(())
            }
            OutputFormat::Json => output::print_json(&doc),
        },
        None => Err(failure(&client, "Failed to add document")),
    }
}

/// Update a document's title and/or content.
pub async fn docs_update(
    ctx: &Context,
    id: &str,
    title: Option<String>,
    content: Option<String>,
) -> Result<()> {
    if title.is_none() && content.is_none() {
        anyhow::bail!("Nothing to update (pass --title and/or --content)");
    }

    let fields = DocumentFields {
        title,
        content,
        ..Default::default()
    };

    let client = ctx.document_client()?;
    match client.update_document(id, &fields).await {
        Some(doc) => print_document(&doc, &ctx.format),
        None => Err(failure(&client, "Failed to update document")),
    }
}

/// Share a document by mail.
pub async fn docs_share(ctx: &Context, id: &str, email: &str) -> Result<()> {
    let client = ctx.document_client()?;
    match client.share_document(id, email).await {
        Some(response) => match ctx.format {
            OutputFormat::Text => {
                output::print_success(&format!("Shared {} with {}", id, email), &ctx.format);
                Ok(())
            }
            OutputFormat::Json => output::print_json(&response),
        },
        None => Err(failure(&client, "Failed to share document")),
    }
}
