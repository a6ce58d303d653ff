//! Markdown to LaTeX conversion

use std::fmt::Write as _;
use std::io::Write as _;
use std::process::{Command, Stdio};

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use super::escape;
use crate::{Error, Result};

/// Converts markdown panel text into LaTeX markup.
pub trait MarkupConverter {
    /// Convert one markdown source.
    ///
    /// # Errors
    ///
    /// Returns `Error::Conversion` if the converter rejects the input.
    fn convert(&self, markdown: &str) -> Result<String>;
}

/// Built-in converter walking pulldown-cmark events.
///
/// Produces the same commands pandoc's LaTeX writer uses for the common
/// constructs: sectioning, `\emph`, `\textbf`, `\texttt`, `verbatim`,
/// `itemize`/`enumerate` with `\tightlist`, `\href`, `quote` and
/// `\includegraphics`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CmarkLatex;

impl MarkupConverter for CmarkLatex {
    fn convert(&self, markdown: &str) -> Result<String> {
        let mut writer = LatexWriter::default();
        for event in Parser::new_ext(markdown, Options::empty()) {
            writer.event(event);
        }
        Ok(writer.finish())
    }
}

#[derive(Default)]
struct LatexWriter {
    out: String,
    lists: Vec<bool>,
    in_code_block: bool,
    image_depth: usize,
}

impl LatexWriter {
    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => {
                if self.image_depth > 0 {
                    return;
                }
                if self.in_code_block {
                    self.out.push_str(&text);
                } else {
                    self.out.push_str(&escape(&text));
                }
            }
            Event::Code(code) => {
                self.out.push_str("\\texttt{");
                self.out.push_str(&escape(&code));
                self.out.push('}');
            }
            Event::SoftBreak => self.out.push('\n'),
            Event::HardBreak => self.out.push_str("\\\\\n"),
            Event::Rule => {
                self.out.push_str(
                    "\\begin{center}\\rule{0.5\\linewidth}{0.5pt}\\end{center}\n\n",
                );
            }
            Event::InlineMath(math) => {
                self.out.push('$');
                self.out.push_str(&math);
                self.out.push('$');
            }
            Event::DisplayMath(math) => {
                self.out.push_str("\\[");
                self.out.push_str(&math);
                self.out.push_str("\\]");
            }
            Event::TaskListMarker(checked) => {
                self.out.push_str(if checked { "[x] " } else { "[ ] " });
            }
            Event::Html(_) | Event::InlineHtml(_) | Event::FootnoteReference(_) => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { level, .. } => {
                let command = match level {
                    HeadingLevel::H1 => "section",
                    HeadingLevel::H2 => "subsection",
                    HeadingLevel::H3 => "subsubsection",
                    HeadingLevel::H4 => "paragraph",
                    HeadingLevel::H5 | HeadingLevel::H6 => "subparagraph",
                };
                self.out.push('\\');
                self.out.push_str(command);
                self.out.push('{');
            }
            Tag::Emphasis => self.out.push_str("\\emph{"),
            Tag::Strong => self.out.push_str("\\textbf{"),
            Tag::CodeBlock(_) => {
                self.in_code_block = true;
                self.out.push_str("\\begin{verbatim}\n");
            }
            Tag::List(start) => {
                self.lists.push(start.is_some());
                match start {
                    Some(first) => {
                        self.out.push_str("\\begin{enumerate}\n");
                        if first != 1 {
                            let _ = writeln!(
                                self.out,
                                "\\setcounter{{enumi}}{{{}}}",
                                first.saturating_sub(1)
                            );
                        }
                    }
                    None => self.out.push_str("\\begin{itemize}\n"),
                }
                self.out.push_str("\\tightlist\n");
            }
            Tag::Item => self.out.push_str("\\item\n  "),
            Tag::BlockQuote(_) => self.out.push_str("\\begin{quote}\n"),
            Tag::Link { dest_url, .. } => {
                self.out.push_str("\\href{");
                self.out.push_str(&url(&dest_url));
                self.out.push_str("}{");
            }
            Tag::Image { dest_url, .. } => {
                self.image_depth += 1;
                if self.image_depth == 1 {
                    self.out.push_str("\\includegraphics{");
                    self.out.push_str(&url(&dest_url));
                    self.out.push('}');
                }
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.out.push_str("\n\n"),
            TagEnd::Heading(_) => self.out.push_str("}\n\n"),
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Link => {
                self.out.push('}');
            }
            TagEnd::CodeBlock => {
                self.in_code_block = false;
                if !self.out.ends_with('\n') {
                    self.out.push('\n');
                }
                self.out.push_str("\\end{verbatim}\n\n");
            }
            TagEnd::List(_) => {
                let ordered = self.lists.pop().unwrap_or(false);
                let env = if ordered { "enumerate" } else { "itemize" };
                let _ = write!(self.out, "\\end{{{env}}}\n\n");
            }
            TagEnd::Item => {
                if !self.out.ends_with('\n') {
                    self.out.push('\n');
                }
            }
            TagEnd::BlockQuote(_) => self.out.push_str("\\end{quote}\n\n"),
            TagEnd::Image => self.image_depth = self.image_depth.saturating_sub(1),
            _ => {}
        }
    }

    fn finish(self) -> String {
        let mut out = self.out.trim_end().to_string();
        if !out.is_empty() {
            out.push('\n');
        }
        out
    }
}

/// Escape the characters hyperref cannot take raw in a URL argument.
fn url(dest: &str) -> String {
    dest.replace('%', "\\%").replace('#', "\\#")
}

/// Converter shelling out to `pandoc -f markdown -t latex`.
#[derive(Debug, Clone)]
pub struct Pandoc {
    program: String,
}

impl Pandoc {
    /// Use `pandoc` from `PATH`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_program("pandoc")
    }

    /// Use a specific pandoc executable.
    #[must_use]
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for Pandoc {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkupConverter for Pandoc {
    fn convert(&self, markdown: &str) -> Result<String> {
        let mut child = Command::new(&self.program)
            .args(["-f", "markdown", "-t", "latex"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::Conversion(format!("failed to start {}: {e}", self.program)))?;

        // stdin is dropped before waiting so the child sees end of input
        let written = child
            .stdin
            .take()
            .map_or(Ok(()), |mut stdin| stdin.write_all(markdown.as_bytes()));
        if let Err(e) = written {
            let _ = child.kill();
            let _ = child.wait();
            return Err(Error::Conversion(format!(
                "failed to send markdown to {}: {e}",
                self.program
            )));
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(Error::Conversion(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        String::from_utf8(output.stdout)
            .map_err(|e| Error::Conversion(format!("{} produced invalid UTF-8: {e}", self.program)))
    }
}
