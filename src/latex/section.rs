//! Section rendering

use std::fmt::Write;
use std::path::PathBuf;

use super::MarkupConverter;
use crate::experiment::Section;
use crate::Result;

/// Render one report section: its markdown panels converted in order,
/// then a figure block of its charts.
///
/// A section without markdown panels or charts renders to `""`.
///
/// # Errors
///
/// Returns the converter's error if a markdown panel fails to convert.
pub fn section_to_latex(
    section: &Section,
    charts: &[PathBuf],
    converter: &dyn MarkupConverter,
) -> Result<String> {
    let mut latex = String::new();
    for markdown in section.markdown() {
        latex.push_str(&converter.convert(markdown)?);
    }
    latex.push_str(&figure_block(charts));
    Ok(latex)
}

/// `figure` environment including each chart at half line width, in
/// input order. Empty for no charts.
#[must_use]
pub fn figure_block(charts: &[PathBuf]) -> String {
    if charts.is_empty() {
        return String::new();
    }

    let mut block = String::from("\\begin{figure}[h]\n");
    for chart in charts {
        let _ = writeln!(
            block,
            "\\includegraphics[width=0.5\\linewidth]{{{}}}",
            chart.display()
        );
    }
    block.push_str("\\end{figure}\n");
    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experiment::Panel;
    use crate::latex::CmarkLatex;

    #[test]
    fn test_markdown_panels_in_order() {
        let section = Section::new(
            "Results",
            vec![
                Panel::markdown("# First"),
                Panel::other("Scatter Plot"),
                Panel::markdown("second"),
            ],
        );
        let latex = section_to_latex(&section, &[], &CmarkLatex).unwrap();
        assert_eq!(latex, "\\section{First}\nsecond\n");
    }

    #[test]
    fn test_figure_block() {
        let charts = vec![
            PathBuf::from("charts/section_0_a.png"),
            PathBuf::from("charts/section_0_b.png"),
        ];
        assert_eq!(
            figure_block(&charts),
            "\\begin{figure}[h]\n\
             \\includegraphics[width=0.5\\linewidth]{charts/section_0_a.png}\n\
             \\includegraphics[width=0.5\\linewidth]{charts/section_0_b.png}\n\
             \\end{figure}\n"
        );
    }

    #[test]
    fn test_empty_section_renders_nothing() {
        let section = Section::new("Plots only", vec![Panel::other("Run History Line Plot")]);
        assert_eq!(section_to_latex(&section, &[], &CmarkLatex).unwrap(), "");
    }
}
