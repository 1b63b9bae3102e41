//! Printing of description markup as plain text or Markdown

use crate::cache::NodeCache;
use crate::config::Config;
use crate::error::Result;
use crate::model::TextSegment;
use crate::tree::Tree;

/// What a printer may consult while printing: the tree for link targets, the cache for
/// refid resolution and the config for link shape.
#[derive(Clone, Copy)]
pub struct PrintContext<'a> {
    pub tree: &'a Tree,
    pub cache: &'a NodeCache,
    pub config: &'a Config,
}

/// Turns description markup into text. A `Ref` whose refid is not cached is an error,
/// never silently printed as plain text.
pub trait TextPrinter {
    fn print(&self, segments: &[TextSegment], ctx: &PrintContext<'_>) -> Result<String>;
}

/// Text only; markup is dropped, refs print their label.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainPrinter;

/// GitHub-flavoured Markdown.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkdownPrinter;

impl TextPrinter for PlainPrinter {
    fn print(&self, segments: &[TextSegment], ctx: &PrintContext<'_>) -> Result<String> {
        let mut out = String::new();
        write_plain(&mut out, segments, ctx)?;
        Ok(tidy(&out))
    }
}

impl TextPrinter for MarkdownPrinter {
    fn print(&self, segments: &[TextSegment], ctx: &PrintContext<'_>) -> Result<String> {
        let mut out = String::new();
        write_markdown(&mut out, segments, ctx)?;
        Ok(tidy(&out))
    }
}

fn write_plain(out: &mut String, segments: &[TextSegment], ctx: &PrintContext<'_>) -> Result<()> {
    for segment in segments {
        match segment {
            TextSegment::Text(text) => push_collapsed(out, text),
            TextSegment::Bold(inner) | TextSegment::Emphasis(inner) => {
                write_plain(out, inner, ctx)?
            }
            TextSegment::Code(code) => out.push_str(code),
            TextSegment::Ref { refid, text } => {
                ctx.cache.find(refid)?;
                out.push_str(text);
            }
            TextSegment::Link { text, .. } => out.push_str(text),
            TextSegment::LineBreak => out.push('\n'),
            TextSegment::ParagraphBreak => out.push_str("\n\n"),
        }
    }
    Ok(())
}

fn write_markdown(out: &mut String, segments: &[TextSegment], ctx: &PrintContext<'_>) -> Result<()> {
    for segment in segments {
        match segment {
            TextSegment::Text(text) => push_collapsed(out, text),
            TextSegment::Bold(inner) => {
                out.push_str("**");
                write_markdown(out, inner, ctx)?;
                out.push_str("**");
            }
            TextSegment::Emphasis(inner) => {
                out.push('*');
                write_markdown(out, inner, ctx)?;
                out.push('*');
            }
            TextSegment::Code(code) => {
                out.push('`');
                out.push_str(code);
                out.push('`');
            }
            TextSegment::Ref { refid, text } => {
                let target = ctx.cache.find(refid)?;
                let url = ctx.config.url_for(ctx.tree, target);
                out.push_str(&format!("[{}]({})", text, url));
            }
            TextSegment::Link { url, text } => out.push_str(&format!("[{}]({})", text, url)),
            TextSegment::LineBreak => out.push('\n'),
            TextSegment::ParagraphBreak => out.push_str("\n\n"),
        }
    }
    Ok(())
}

/// Append `text` with every whitespace run collapsed to one space.
fn push_collapsed(out: &mut String, text: &str) {
    let mut last_space = out.ends_with(' ');
    for c in text.chars() {
        if c.is_whitespace() {
            if !last_space {
                out.push(' ');
                last_space = true;
            }
        } else {
            out.push(c);
            last_space = false;
        }
    }
}

/// Trim line ends and keep at most one blank line between paragraphs.
fn tidy(raw: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    for line in raw.lines().map(str::trim) {
        if line.is_empty() && lines.last().is_none_or(|l| l.is_empty()) {
            continue;
        }
        lines.push(line);
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}
