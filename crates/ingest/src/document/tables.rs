//! Detection of column-aligned tables in extracted page text.
//!
//! pdf-extract lays out table rows as single lines whose cells are separated
//! by runs of spaces (or tabs). Two or more such lines in a row are treated
//! as a table and rendered as a `[TABLE]` block of `cell | cell` rows.

use std::sync::OnceLock;

use regex_lite::Regex;

/// Minimum consecutive multi-cell lines that make a table.
const MIN_TABLE_ROWS: usize = 2;

fn cell_separator() -> &'static Regex {
    static SEP: OnceLock<Regex> = OnceLock::new();
    SEP.get_or_init(|| Regex::new(r"\t+| {2,}").expect("static cell pattern"))
}

/// Split a line into non-empty trimmed cells.
pub(crate) fn split_cells(line: &str) -> Vec<String> {
    cell_separator()
        .split(line.trim())
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

/// Find all tables in a page, each as a list of rows of cells.
pub(crate) fn detect_tables(text: &str) -> Vec<Vec<Vec<String>>> {
    let mut tables = Vec::new();
    let mut current: Vec<Vec<String>> = Vec::new();

    for line in text.lines() {
        let cells = split_cells(line);
        if cells.len() >= 2 {
            current.push(cells);
            continue;
        }
        if current.len() >= MIN_TABLE_ROWS {
            tables.push(std::mem::take(&mut current));
        } else {
            current.clear();
        }
    }
    if current.len() >= MIN_TABLE_ROWS {
        tables.push(current);
    }
    tables
}

/// Render tables as `[TABLE]` blocks to append after the page text.
pub(crate) fn render_tables(tables: &[Vec<Vec<String>>]) -> String {
    let mut out = String::new();
    for table in tables {
        out.push_str("\n\n[TABLE]\n");
        for row in table {
            out.push_str(&row.join(" | "));
            out.push('\n');
        }
        out.push_str("[/TABLE]\n\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_split_on_wide_gaps_only() {
        assert_eq!(
            split_cells("Revenue   142,610   111,239"),
            vec!["Revenue", "142,610", "111,239"]
        );
        assert_eq!(split_cells("Net income\t2023"), vec!["Net income", "2023"]);
        assert_eq!(split_cells("plain sentence text"), vec!["plain sentence text"]);
    }

    #[test]
    fn two_aligned_lines_form_a_table() {
        let text = "Key figures\nRevenue    155,498    142,610\nEBIT    18,482    22,662\nSee notes.";
        let tables = detect_tables(text);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].len(), 2);
        assert_eq!(tables[0][1], vec!["EBIT", "18,482", "22,662"]);
    }

    #[test]
    fn single_aligned_line_is_not_a_table() {
        let text = "Intro\nRevenue    155,498\nBody text follows.";
        assert!(detect_tables(text).is_empty());
    }

    #[test]
    fn render_matches_block_format() {
        let tables = vec![vec![
            vec!["Year".to_string(), "Sales".to_string()],
            vec!["2023".to_string(), "96.8".to_string()],
        ]];
        assert_eq!(
            render_tables(&tables),
            "\n\n[TABLE]\nYear | Sales\n2023 | 96.8\n[/TABLE]\n\n"
        );
    }
}
