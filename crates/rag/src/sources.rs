use indexmap::IndexMap;
use reportlens_core::Chunk;

struct SourceGroup<'a> {
    company: &'a str,
    year: &'a str,
    source_file: &'a str,
    count: usize,
}

/// Attribution block listing one entry per (company, year), first-seen order.
pub fn format_sources(chunks: &[Chunk]) -> String {
    if chunks.is_empty() {
        return "No sources available".to_string();
    }

    let mut groups: IndexMap<(&str, &str), SourceGroup<'_>> = IndexMap::new();
    for chunk in chunks {
        let meta = &chunk.metadata;
        groups
            .entry((meta.company.as_str(), meta.year.as_str()))
            .or_insert_with(|| SourceGroup {
                company: &meta.company,
                year: &meta.year,
                source_file: &meta.source_file,
                count: 0,
            })
            .count += 1;
    }

    let mut out = String::from("\n\nSources:\n");
    out.push_str(&"=".repeat(60));
    out.push('\n');
    for (i, group) in groups.values().enumerate() {
        out.push_str(&format!(
            "{}. {} Annual Report {}\n   File: {}\n   Chunks referenced: {}\n",
            i + 1,
            group.company,
            group.year,
            group.source_file,
            group.count
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use reportlens_core::DocumentMetadata;

    fn chunk(company: &str, year: &str, file: &str) -> Chunk {
        Chunk {
            content: "…".into(),
            metadata: DocumentMetadata {
                company: company.into(),
                source_file: file.into(),
                year: year.into(),
                page: Some(1),
            },
        }
    }

    #[test]
    fn empty_sources() {
        assert_eq!(format_sources(&[]), "No sources available");
    }

    #[test]
    fn groups_by_company_and_year() {
        let chunks = vec![
            chunk("BMW", "2023", "BMW_2023.pdf"),
            chunk("Tesla", "2023", "Tesla_2023.pdf"),
            chunk("BMW", "2023", "BMW_2023_supplement.pdf"),
            chunk("BMW", "2022", "BMW_2022.pdf"),
        ];
        let expected = format!(
            "\n\nSources:\n{}\n\
             1. BMW Annual Report 2023\n   File: BMW_2023.pdf\n   Chunks referenced: 2\n\
             2. Tesla Annual Report 2023\n   File: Tesla_2023.pdf\n   Chunks referenced: 1\n\
             3. BMW Annual Report 2022\n   File: BMW_2022.pdf\n   Chunks referenced: 1\n",
            "=".repeat(60)
        );
        assert_eq!(format_sources(&chunks), expected);
    }
}
