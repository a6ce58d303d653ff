//! LaTeX document pieces
//!
//! Fixed header/footer templates, text escaping, markdown conversion and
//! per-section rendering.

mod markdown;
mod section;

pub use markdown::{CmarkLatex, MarkupConverter, Pandoc};
pub use section::{figure_block, section_to_latex};

/// Placeholder in [`HEADER`] replaced by the report owner.
pub const AUTHOR_PLACEHOLDER: &str = "AUTHOR";

/// Placeholder in [`HEADER`] replaced by the report name.
pub const TITLE_PLACEHOLDER: &str = "TITLE";

/// Document preamble up to `\maketitle`.
pub const HEADER: &str = r"
\documentclass{article}
\usepackage{graphicx}
\usepackage{csvsimple}
\usepackage{booktabs}
\usepackage{longtable}
\usepackage{hyperref}

\providecommand{\tightlist}{%
  \setlength{\itemsep}{0pt}\setlength{\parskip}{0pt}}
\title{TITLE}
\author{%
  AUTHOR
}
\begin{document}
\maketitle";

/// Bibliography and document end.
pub const FOOTER: &str = r"
\begin{thebibliography}{9}
\bibitem{wandb}
  Weights and Biases,
  \\\texttt{http://wandb.com}
\end{thebibliography}
\end{document}
";

/// [`HEADER`] with the author and title placeholders replaced verbatim.
///
/// The author is substituted first, so a title containing `AUTHOR` is
/// left alone, while an author containing `TITLE` gets replaced too.
#[must_use]
pub fn header(author: &str, title: &str) -> String {
    HEADER
        .replace(AUTHOR_PLACEHOLDER, author)
        .replace(TITLE_PLACEHOLDER, title)
}

/// Escape LaTeX special characters in plain text.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\textbackslash{}"),
            '~' => out.push_str("\\textasciitilde{}"),
            '^' => out.push_str("\\textasciicircum{}"),
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}
