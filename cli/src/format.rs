//! Output formatting.

use weft_analyzer::QueryAnalysis;
use weft_session::EntityClass;
use weft_synthesizer::UpdateTemplate;

const HEADER: [&str; 6] = ["variable", "datatype", "functional", "nullable", "reference", "predicate"];

fn yes_no(flag: bool) -> String {
    String::from(if flag { "yes" } else { "no" })
}

/// Left-aligned columns separated by two spaces.
fn table(rows: &[Vec<String>]) -> String {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|i| rows.iter().filter_map(|r| r.get(i)).map(String::len).max().unwrap_or(0))
        .collect();

    let mut out = String::new();
    for row in rows {
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{:width$}", cell, width = widths[i]))
            .collect();
        out.push_str(cells.join("  ").trim_end());
        out.push('\n');
    }
    out
}

pub fn analysis(analysis: &QueryAnalysis) -> String {
    let mut rows = vec![HEADER.iter().map(|h| h.to_string()).collect::<Vec<_>>()];
    for (name, props) in &analysis.variables {
        rows.push(vec![
            format!("?{}", name),
            props.datatype.clone(),
            yes_no(props.functional),
            yes_no(props.nullable),
            yes_no(props.is_object_reference),
            props
                .predicate
                .as_ref()
                .map_or_else(|| "-".to_string(), |p| p.to_string()),
        ]);
    }

    let mut out = format!("anchor: ?{}\n\n", analysis.anchor);
    out.push_str(&table(&rows));

    out.push_str("\ndependencies:\n");
    if analysis.dependencies.is_empty() {
        out.push_str("  (none)\n");
    }
    for dep in &analysis.dependencies {
        let optional = if dep.optional { " (optional)" } else { "" };
        out.push_str(&format!(
            "  ?{} {} ?{}{}\n",
            dep.subject, dep.predicate, dep.object, optional
        ));
    }

    out.push_str("\nambiguous: ");
    if analysis.ambiguous.is_empty() {
        out.push_str("(none)\n");
    } else {
        let names: Vec<String> = analysis.ambiguous.iter().map(|v| format!("?{}", v)).collect();
        out.push_str(&names.join(", "));
        out.push('\n');
    }
    out
}

pub fn templates<'a>(templates: impl IntoIterator<Item = &'a UpdateTemplate>) -> String {
    let mut out = String::new();
    for template in templates {
        out.push_str(&template.to_string());
        out.push_str("\n\n");
    }
    out
}

pub fn class(class: &EntityClass) -> String {
    let mut out = class.to_string();
    out.push('\n');
    out.push_str(&templates(
        std::iter::once(class.creation_template()).chain(class.initializers().map(|(_, t)| t)),
    ));
    out
}
