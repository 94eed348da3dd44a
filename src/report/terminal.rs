use anyhow::Result;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::config::RulesSource;
use crate::models::{Clause, ContractAssessment, KeyFacts, RiskLevel};

/// Render a colored terminal report for every assessed document.
pub fn render(
    assessments: &[ContractAssessment],
    rules: &RulesSource,
    verbose: bool,
    quiet: bool,
) -> Result<()> {
    if quiet {
        for a in assessments {
            println!("{}", summary_line(a));
        }
        return Ok(());
    }

    println!(
        "\n {} v{}",
        "contract-risk".bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(" Rules: {}\n", rules);

    for a in assessments {
        render_assessment(a, verbose);
    }
    Ok(())
}

fn render_assessment(a: &ContractAssessment, verbose: bool) {
    let high = a.count_at(RiskLevel::High);
    let medium = a.count_at(RiskLevel::Medium);
    let low = a.count_at(RiskLevel::Low);

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", truncate(&a.document_id, 48).bold());
    println!(
        " │  {:<48} │",
        format!("Contract type    : {} ({})", a.contract_type, a.language)
    );
    println!(
        " │  {:<48} │",
        format!("Overall risk     : {} ({:.2})", a.score.band, a.score.value)
    );
    println!(" │  {:<48} │", format!("Clauses          : {}", a.clauses.len()));
    println!(
        " │  {:<48} │",
        format!("{}  High          : {:>4}", "✗".red(), high)
    );
    println!(
        " │  {:<48} │",
        format!("{}  Medium        : {:>4}", "⚠".yellow(), medium)
    );
    println!(
        " │  {:<48} │",
        format!("{}  Low           : {:>4}", "✓".green(), low)
    );
    println!(" └────────────────────────────────────────────────────┘\n");

    println!(" {}\n", a.explanation);
    render_facts(&a.facts);

    if high > 0 {
        println!(" {} Clauses requiring attention:\n", "[HIGH]".red().bold());
        render_table(&a.clauses, RiskLevel::High, verbose);
        println!();
    }

    if medium > 0 {
        println!(" {} Clauses to review:\n", "[MEDIUM]".yellow().bold());
        render_table(&a.clauses, RiskLevel::Medium, verbose);
        println!();
    }

    if verbose && low > 0 {
        println!(" {} Standard clauses:\n", "[LOW]".green().bold());
        render_table(&a.clauses, RiskLevel::Low, verbose);
        println!();
    }
}

fn render_facts(facts: &KeyFacts) {
    let mut lines: Vec<String> = facts
        .parties
        .iter()
        .map(|(role, name)| format!("{:<15}: {}", role, name))
        .collect();
    if !facts.amounts.is_empty() {
        lines.push(format!("{:<15}: {}", "Amounts", facts.amounts.join(", ")));
    }
    if let Some(law) = &facts.governing_law {
        lines.push(format!("{:<15}: {}", "Governing law", law));
    }
    if let Some(place) = &facts.jurisdiction {
        lines.push(format!("{:<15}: {}", "Jurisdiction", place));
    }
    if lines.is_empty() {
        return;
    }

    println!(" {}", "Key facts".bold());
    for line in lines {
        println!("   {}", line);
    }
    println!();
}

fn render_table(clauses: &[Clause], level: RiskLevel, verbose: bool) {
    let mut header = vec![
        Cell::new("#").add_attribute(Attribute::Bold),
        Cell::new("Category").add_attribute(Attribute::Bold),
        Cell::new("Risk").add_attribute(Attribute::Bold),
        Cell::new("Why").add_attribute(Attribute::Bold),
        Cell::new("Suggestion").add_attribute(Attribute::Bold),
    ];
    if verbose {
        header.push(Cell::new("Evidence").add_attribute(Attribute::Bold));
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);

    for clause in clauses.iter().filter(|c| c.risk_or_low() == level) {
        let mut row = vec![
            Cell::new(clause.index + 1).set_alignment(CellAlignment::Right),
            Cell::new(clause.category_or_other().to_string()),
            Cell::new(level.to_string())
                .fg(level_color(level))
                .set_alignment(CellAlignment::Center),
            Cell::new(&clause.explanation),
            Cell::new(clause.suggestion.as_deref().unwrap_or("—")),
        ];
        if verbose {
            row.push(Cell::new(evidence_lines(clause)));
        }
        table.add_row(row);
    }

    println!("{}", table);
}

fn evidence_lines(clause: &Clause) -> String {
    let mut lines: Vec<String> = clause
        .category_evidence
        .iter()
        .chain(clause.evidence.iter())
        .map(|e| format!("{}: \"{}\"", e.rule_id, truncate(e.matched.trim(), 40)))
        .collect();
    if lines.is_empty() {
        lines.push("—".to_string());
    }
    lines.join("\n")
}

fn level_color(level: RiskLevel) -> Color {
    match level {
        RiskLevel::Low => Color::Green,
        RiskLevel::Medium => Color::Yellow,
        RiskLevel::High => Color::Red,
    }
}

fn summary_line(a: &ContractAssessment) -> String {
    let band = match a.score.band {
        RiskLevel::Low => a.score.band.to_string().green(),
        RiskLevel::Medium => a.score.band.to_string().yellow(),
        RiskLevel::High => a.score.band.to_string().red(),
    };
    format!(
        "{}: {}  Risk: {} ({:.2})  High: {}  Medium: {}  Low: {}",
        a.document_id,
        a.contract_type,
        band,
        a.score.value,
        a.count_at(RiskLevel::High),
        a.count_at(RiskLevel::Medium),
        a.count_at(RiskLevel::Low),
    )
}

fn truncate(s: &str, max: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() > max {
        format!("{}…", chars[..max - 1].iter().collect::<String>())
    } else {
        s.to_string()
    }
}
