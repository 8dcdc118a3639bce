//! Documentation text helpers.

const TAB_SIZE: usize = 8;

/// Normalize a docstring the way Python's `inspect.cleandoc` does.
///
/// Tabs are expanded, the first line loses its leading whitespace, the common
/// indentation of the remaining lines is removed, and leading and trailing
/// blank lines are dropped. Applying it twice changes nothing.
pub fn clean_doc(doc: &str) -> String
{
    let mut lines: Vec<String> = doc.split('\n').map(expand_tabs).collect();

    let margin = lines
        .iter()
        .skip(1)
        .filter(|line| !line.trim_start().is_empty())
        .map(|line| indentation(line))
        .min()
        .unwrap_or(0);

    if let Some(first) = lines.first_mut() {
        *first = first.trim_start().to_string();
    }
    for line in lines.iter_mut().skip(1) {
        let cut = margin.min(indentation(line));
        *line = line.chars().skip(cut).collect();
    }

    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    let leading_blank = lines.iter().take_while(|line| line.is_empty()).count();
    lines.drain(..leading_blank);

    lines.join("\n")
}

/// First one or two lines of a cleaned docstring, joined by a space.
///
/// Returns an empty string for missing or blank documentation.
pub fn doc_head(doc: Option<&str>) -> String
{
    let Some(doc) = doc else {
        return String::new();
    };
    let cleaned = clean_doc(doc);
    let head: Vec<&str> = cleaned.trim().lines().take(2).collect();
    head.join(" ").trim().to_string()
}

/// Leading whitespace, in characters.
fn indentation(line: &str) -> usize
{
    line.chars().take_while(|c| c.is_whitespace()).count()
}

fn expand_tabs(line: &str) -> String
{
    if !line.contains('\t') {
        return line.to_string();
    }
    let mut out = String::with_capacity(line.len() + TAB_SIZE);
    let mut column = 0;
    for c in line.chars() {
        if c == '\t' {
            let spaces = TAB_SIZE - column % TAB_SIZE;
            out.extend(std::iter::repeat(' ').take(spaces));
            column += spaces;
        } else {
            out.push(c);
            column += 1;
        }
    }
    out
}
