use std::path::Path;

use anyhow::{Context, Result};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerIndex, PdfLayerReference, PdfPageIndex, Point, Polygon, Rgb,
};
use printpdf::path::{PaintMode, WindingOrder};

use crate::models::{ContractAssessment, KeyFacts, RiskLevel};

const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const MARGIN: f32 = 18.0;
const COVER_HDR_H: f32 = 72.0; // gradient header height on cover page

// ── Palette ───────────────────────────────────────────────────────────────────
const BG:           (f32, f32, f32) = (1.00, 1.00, 1.00);
const PANEL:        (f32, f32, f32) = (1.00, 1.00, 1.00);
const PANEL_ALT:    (f32, f32, f32) = (0.95, 0.96, 0.99); // alternating row tint
const PANEL_BORDER: (f32, f32, f32) = (0.85, 0.87, 0.92);
const ACCENT_BLU:   (f32, f32, f32) = (0.20, 0.46, 0.95);
const ACCENT_PUR:   (f32, f32, f32) = (0.52, 0.30, 0.95);
const TEXT_PRI:     (f32, f32, f32) = (0.07, 0.08, 0.14);
const TEXT_SEC:     (f32, f32, f32) = (0.36, 0.40, 0.52);
const TEXT_MUT:     (f32, f32, f32) = (0.58, 0.63, 0.72);
const WHITE:        (f32, f32, f32) = (1.00, 1.00, 1.00);
const WHITE_DIM:    (f32, f32, f32) = (0.82, 0.89, 1.00);

const LOW_BG:  (f32, f32, f32) = (0.90, 0.98, 0.92);
const LOW_FG:  (f32, f32, f32) = (0.07, 0.52, 0.22);
const MED_BG:  (f32, f32, f32) = (1.00, 0.95, 0.87);
const MED_FG:  (f32, f32, f32) = (0.70, 0.40, 0.02);
const HIGH_BG: (f32, f32, f32) = (1.00, 0.91, 0.91);
const HIGH_FG: (f32, f32, f32) = (0.76, 0.09, 0.13);

const R_BADGE: f32 = 1.5;

const LINE_H: f32 = 3.8;
const EXPLAIN_WRAP: usize = 70;
const FACT_WRAP: usize = 80;

// ── Public entry point ────────────────────────────────────────────────────────

/// Render a PDF report: one cover page and clause table per document.
pub fn render(assessments: &[ContractAssessment], output_path: &Path) -> Result<()> {
    let doc = PdfDocument::empty("Contract Risk Report");

    for a in assessments {
        add_cover_page(&doc, a)?;
        add_clause_pages(&doc, a)?;
    }

    let bytes = doc.save_to_bytes()?;
    std::fs::write(output_path, &bytes)
        .with_context(|| format!("Failed to write PDF to {}", output_path.display()))?;

    println!("PDF report written to: {}", output_path.display());
    Ok(())
}

// ── Cover page ────────────────────────────────────────────────────────────────

fn add_cover_page(doc: &PdfDocumentReference, a: &ContractAssessment) -> Result<()> {
    let (page_idx, layer_idx) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Cover");
    let layer = doc.get_page(page_idx).get_layer(layer_idx);

    let font_b = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
    let font_r = doc.add_builtin_font(BuiltinFont::Helvetica)?;

    fill_rect(&layer, 0.0, 0.0, PAGE_W, PAGE_H, BG);
    let hdr_bot = PAGE_H - COVER_HDR_H;
    fill_gradient_h(&layer, 0.0, hdr_bot, PAGE_W, COVER_HDR_H, ACCENT_BLU, ACCENT_PUR, 28);

    set_color(&layer, WHITE_DIM);
    layer.use_text(
        format!("contract-risk v{}", env!("CARGO_PKG_VERSION")),
        7.5, Mm(PAGE_W - MARGIN - 44.0), Mm(PAGE_H - 10.5), &font_r,
    );

    set_color(&layer, WHITE);
    layer.use_text("Contract Risk", 28.0, Mm(MARGIN), Mm(PAGE_H - 26.0), &font_b);
    set_color(&layer, WHITE_DIM);
    layer.use_text(
        format!("{} Contract", a.contract_type),
        28.0, Mm(MARGIN), Mm(PAGE_H - 41.0), &font_b,
    );

    // Document chip with the overall band badge beside it
    let chip_y = hdr_bot - 18.0;
    let chip_h = 12.0f32;
    let chip_w = 106.0f32;
    fill_rounded_rect(&layer, MARGIN, chip_y, chip_w, chip_h, R_BADGE, PANEL);
    stroke_rounded_rect(&layer, MARGIN, chip_y, chip_w, chip_h, R_BADGE, PANEL_BORDER);
    fill_rect(&layer, MARGIN, chip_y, 2.5, chip_h, ACCENT_BLU);

    set_color(&layer, TEXT_MUT);
    layer.use_text("DOCUMENT", 6.0, Mm(MARGIN + 5.0), Mm(chip_y + chip_h - 3.8), &font_b);
    set_color(&layer, TEXT_PRI);
    layer.use_text(
        truncate(&pdf_text(&a.document_id), 34),
        9.5, Mm(MARGIN + 5.0), Mm(chip_y + 2.8), &font_b,
    );

    let (band_fg, band_bg) = level_colors(a.score.band);
    let badge_x = MARGIN + chip_w + 6.0;
    fill_rounded_rect(&layer, badge_x, chip_y, 52.0, chip_h, R_BADGE, band_bg);
    set_color(&layer, band_fg);
    layer.use_text(
        format!("{} RISK  {:.2}", a.score.band.to_string().to_uppercase(), a.score.value),
        9.5, Mm(badge_x + 4.0), Mm(chip_y + 4.2), &font_b,
    );

    set_color(&layer, TEXT_SEC);
    layer.use_text(
        format!("Assessed  {}   Language  {}", today(), a.language),
        9.0, Mm(MARGIN), Mm(chip_y - 8.0), &font_r,
    );

    // ── Overview cards ────────────────────────────────────────────────────────
    let rule_y = chip_y - 16.5;
    draw_hline(&layer, MARGIN, PAGE_W - MARGIN, rule_y, PANEL_BORDER);
    set_color(&layer, TEXT_MUT);
    layer.use_text("OVERVIEW", 6.5, Mm(MARGIN), Mm(rule_y - 7.0), &font_b);

    let card_y  = rule_y - 42.0;
    let card_h  = 26.0f32;
    let gap     = 4.0f32;
    let total_w = PAGE_W - 2.0 * MARGIN;
    let card_w  = (total_w - gap * 3.0) / 4.0;

    let cards: [(&str, String, (f32, f32, f32)); 4] = [
        ("CLAUSES", a.clauses.len().to_string(),                 ACCENT_BLU),
        ("HIGH",    a.count_at(RiskLevel::High).to_string(),     HIGH_FG),
        ("MEDIUM",  a.count_at(RiskLevel::Medium).to_string(),   MED_FG),
        ("LOW",     a.count_at(RiskLevel::Low).to_string(),      LOW_FG),
    ];

    for (i, (label, value, accent)) in cards.iter().enumerate() {
        let cx = MARGIN + (card_w + gap) * i as f32;
        draw_stat_card(&layer, cx, card_y, card_w, card_h, label, value, *accent,
                       &font_r, &font_b);
    }

    // ── Summary and key facts ─────────────────────────────────────────────────
    let mut y = card_y - 13.0;
    draw_hline(&layer, MARGIN, PAGE_W - MARGIN, y, PANEL_BORDER);
    set_color(&layer, TEXT_MUT);
    layer.use_text("SUMMARY", 6.5, Mm(MARGIN), Mm(y - 7.5), &font_b);
    y -= 14.0;
    set_color(&layer, TEXT_PRI);
    for line in wrap_text(&pdf_text(&a.explanation), FACT_WRAP) {
        layer.use_text(line, 9.0, Mm(MARGIN), Mm(y), &font_r);
        y -= LINE_H + 0.8;
    }

    let facts = fact_lines(&a.facts);
    if !facts.is_empty() {
        y -= 4.0;
        draw_hline(&layer, MARGIN, PAGE_W - MARGIN, y, PANEL_BORDER);
        set_color(&layer, TEXT_MUT);
        layer.use_text("KEY FACTS", 6.5, Mm(MARGIN), Mm(y - 7.5), &font_b);
        y -= 15.0;
        for (label, value) in facts {
            if y < 30.0 {
                break;
            }
            fill_rounded_rect(&layer, MARGIN, y + 1.0, 2.0, 2.0, 1.0, ACCENT_BLU);
            set_color(&layer, TEXT_PRI);
            layer.use_text(label, 8.5, Mm(MARGIN + 5.0), Mm(y), &font_b);
            set_color(&layer, TEXT_SEC);
            for line in wrap_text(&pdf_text(&value), 60) {
                layer.use_text(line, 8.5, Mm(MARGIN + 40.0), Mm(y), &font_r);
                y -= LINE_H + 0.6;
            }
            y -= 2.0;
        }
    }

    draw_hline(&layer, MARGIN, PAGE_W - MARGIN, 22.0, PANEL_BORDER);
    set_color(&layer, TEXT_MUT);
    layer.use_text(
        format!("Generated by contract-risk v{}", env!("CARGO_PKG_VERSION")),
        7.5, Mm(MARGIN), Mm(15.0), &font_r,
    );
    layer.use_text(today(), 7.5, Mm(PAGE_W - MARGIN - 22.0), Mm(15.0), &font_r);

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn draw_stat_card(
    layer: &PdfLayerReference,
    x: f32, y: f32, w: f32, h: f32,
    label: &str,
    value: &str,
    accent: (f32, f32, f32),
    font_r: &IndirectFontRef,
    font_b: &IndirectFontRef,
) {
    fill_rounded_rect(layer, x, y, w, h, R_BADGE, PANEL);
    stroke_rounded_rect(layer, x, y, w, h, R_BADGE, PANEL_BORDER);
    fill_rect(layer, x, y + h - 2.0, w, 2.0, accent);

    set_color(layer, accent);
    layer.use_text(value, 20.0, Mm(x + 5.0), Mm(y + h * 0.38), font_b);

    set_color(layer, TEXT_MUT);
    layer.use_text(label, 6.5, Mm(x + 5.0), Mm(y + 3.5), font_r);
}

fn fact_lines(facts: &KeyFacts) -> Vec<(String, String)> {
    let mut lines: Vec<(String, String)> = facts.parties.clone();
    if !facts.amounts.is_empty() {
        lines.push(("Amounts".to_string(), facts.amounts.join(", ")));
    }
    if let Some(law) = &facts.governing_law {
        lines.push(("Governing law".to_string(), law.clone()));
    }
    if let Some(place) = &facts.jurisdiction {
        lines.push(("Jurisdiction".to_string(), place.clone()));
    }
    lines
}

// ── Clause table pages ────────────────────────────────────────────────────────

fn add_clause_pages(doc: &PdfDocumentReference, a: &ContractAssessment) -> Result<()> {
    let font_b = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
    let font_r = doc.add_builtin_font(BuiltinFont::Helvetica)?;

    const BASE_ROW_H: f32 = 8.0;
    const HDR_Y: f32 = 268.5;
    const FIRST_Y: f32 = 259.5;
    const BOT_MARGIN: f32 = 25.0;

    //  #     CATEGORY     RISK       EXPLANATION / SUGGESTION
    //  18…28 28…68        68…90      90…192  (mm)
    let col_x = [MARGIN, MARGIN + 10.0, MARGIN + 50.0, MARGIN + 74.0];
    let headers = ["#", "CATEGORY", "RISK", "EXPLANATION / SUGGESTION"];

    // Pre-compute wrapped text and dynamic row heights
    let rows: Vec<(Vec<String>, Option<Vec<String>>, f32)> = a.clauses.iter().map(|c| {
        let explain = wrap_text(&pdf_text(&c.explanation), EXPLAIN_WRAP);
        let suggest = c.suggestion.as_deref()
            .map(|s| wrap_text(&format!("Suggestion: {}", pdf_text(s)), EXPLAIN_WRAP));
        let n = explain.len() + suggest.as_ref().map_or(0, |s| s.len());
        let h = BASE_ROW_H + n.saturating_sub(1) as f32 * LINE_H;
        (explain, suggest, h)
    }).collect();

    let mut cur_y = FIRST_Y;
    let mut page_state: Option<(PdfPageIndex, PdfLayerIndex)> = None;
    let mut page_num: u32 = 0;

    for (clause, (explain, suggest, row_h)) in a.clauses.iter().zip(rows.iter()) {
        let row_h = *row_h;

        let (pi, li) = match page_state {
            Some(state) if cur_y - row_h >= BOT_MARGIN => state,
            _ => {
                page_num += 1;
                let state = new_clause_page(doc, a, page_num, &headers, &col_x, HDR_Y,
                                            &font_r, &font_b);
                cur_y = FIRST_Y;
                page_state = Some(state);
                state
            }
        };
        let layer = doc.get_page(pi).get_layer(li);

        let level = clause.risk_or_low();
        let (fg, bg) = level_colors(level);

        if clause.index % 2 == 0 {
            fill_rect(&layer, MARGIN, cur_y - row_h + 1.5, PAGE_W - 2.0 * MARGIN, row_h, PANEL_ALT);
        }

        let text_y = cur_y - 4.0;

        set_color(&layer, TEXT_PRI);
        layer.use_text((clause.index + 1).to_string(), 8.0, Mm(col_x[0] + 1.5), Mm(text_y), &font_b);
        set_color(&layer, TEXT_SEC);
        layer.use_text(
            truncate(&clause.category_or_other().to_string(), 24),
            8.0, Mm(col_x[1] + 1.5), Mm(text_y), &font_r,
        );

        let badge_x = col_x[2] + 1.5;
        let badge_y = text_y - 1.3;
        fill_rounded_rect(&layer, badge_x, badge_y, 18.0, 4.8, R_BADGE, bg);
        set_color(&layer, fg);
        layer.use_text(level.to_string().to_uppercase(), 7.0, Mm(badge_x + 2.5), Mm(badge_y + 1.1), &font_b);

        let mut line_y = text_y;
        set_color(&layer, TEXT_PRI);
        for line in explain {
            layer.use_text(line.as_str(), 7.5, Mm(col_x[3] + 1.5), Mm(line_y), &font_r);
            line_y -= LINE_H;
        }
        if let Some(lines) = suggest {
            set_color(&layer, ACCENT_BLU);
            for line in lines {
                layer.use_text(line.as_str(), 7.5, Mm(col_x[3] + 1.5), Mm(line_y), &font_b);
                line_y -= LINE_H;
            }
        }

        draw_hline(&layer, MARGIN, PAGE_W - MARGIN, cur_y - row_h + 1.5, PANEL_BORDER);
        cur_y -= row_h;
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn new_clause_page(
    doc: &PdfDocumentReference,
    a: &ContractAssessment,
    page_num: u32,
    headers: &[&str],
    col_x: &[f32],
    hdr_y: f32,
    font_r: &IndirectFontRef,
    font_b: &IndirectFontRef,
) -> (PdfPageIndex, PdfLayerIndex) {
    let (pi, li) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Clauses");
    let layer = doc.get_page(pi).get_layer(li);

    fill_rect(&layer, 0.0, 0.0, PAGE_W, PAGE_H, BG);
    fill_gradient_h(&layer, 0.0, PAGE_H - 2.5, PAGE_W, 2.5, ACCENT_BLU, ACCENT_PUR, 21);

    set_color(&layer, TEXT_PRI);
    let heading = format!("Clauses: {}", pdf_text(&a.document_id));
    layer.use_text(truncate(&heading, 46), 14.0, Mm(MARGIN), Mm(282.5), font_b);
    set_color(&layer, TEXT_MUT);
    layer.use_text(
        format!("Page {}", page_num),
        8.0, Mm(PAGE_W - MARGIN - 14.0), Mm(283.0), font_r,
    );
    draw_hline(&layer, MARGIN, PAGE_W - MARGIN, 277.5, PANEL_BORDER);

    fill_rounded_rect(&layer, MARGIN, hdr_y - 7.5, PAGE_W - 2.0 * MARGIN, 9.5, R_BADGE, PANEL);
    stroke_rounded_rect(&layer, MARGIN, hdr_y - 7.5, PAGE_W - 2.0 * MARGIN, 9.5, R_BADGE, PANEL_BORDER);
    set_color(&layer, TEXT_MUT);
    for (h, x) in headers.iter().zip(col_x) {
        layer.use_text(*h, 7.0, Mm(x + 1.5), Mm(hdr_y - 4.0), font_b);
    }

    draw_hline(&layer, MARGIN, PAGE_W - MARGIN, 22.0, PANEL_BORDER);
    set_color(&layer, TEXT_MUT);
    layer.use_text(
        format!("contract-risk v{}", env!("CARGO_PKG_VERSION")),
        7.5, Mm(MARGIN), Mm(15.0), font_r,
    );

    (pi, li)
}

fn level_colors(level: RiskLevel) -> ((f32, f32, f32), (f32, f32, f32)) {
    match level {
        RiskLevel::Low    => (LOW_FG, LOW_BG),
        RiskLevel::Medium => (MED_FG, MED_BG),
        RiskLevel::High   => (HIGH_FG, HIGH_BG),
    }
}

// ── Drawing helpers ───────────────────────────────────────────────────────────

fn set_color(layer: &PdfLayerReference, (r, g, b): (f32, f32, f32)) {
    layer.set_fill_color(Color::Rgb(Rgb { r, g, b, icc_profile: None }));
}

fn fill_rect(layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32,
             (r, g, b): (f32, f32, f32)) {
    layer.set_fill_color(Color::Rgb(Rgb { r, g, b, icc_profile: None }));
    layer.add_polygon(Polygon {
        rings: vec![vec![
            (Point::new(Mm(x),     Mm(y)),     false),
            (Point::new(Mm(x + w), Mm(y)),     false),
            (Point::new(Mm(x + w), Mm(y + h)), false),
            (Point::new(Mm(x),     Mm(y + h)), false),
        ]],
        mode: PaintMode::Fill,
        winding_order: WindingOrder::NonZero,
    });
    layer.set_fill_color(Color::Rgb(Rgb { r: 0.0, g: 0.0, b: 0.0, icc_profile: None }));
}

/// Clockwise ring approximating a rounded rectangle, 8 segments per corner.
fn rounded_rect_ring(x: f32, y: f32, w: f32, h: f32, r: f32) -> Vec<(Point, bool)> {
    let r = r.min(w / 2.0).min(h / 2.0);
    const SEGS: usize = 8;
    let mut pts = Vec::with_capacity(4 * (SEGS + 1));

    let corners = [
        (x + w - r, y + r,     270.0f32, 360.0f32),
        (x + w - r, y + h - r, 0.0f32,   90.0f32),
        (x + r,     y + h - r, 90.0f32,  180.0f32),
        (x + r,     y + r,     180.0f32, 270.0f32),
    ];

    for (cx, cy, start, end) in &corners {
        for i in 0..=SEGS {
            let t = i as f32 / SEGS as f32;
            let angle = (start + (end - start) * t).to_radians();
            pts.push((
                Point::new(Mm(cx + r * angle.cos()), Mm(cy + r * angle.sin())),
                false,
            ));
        }
    }
    pts
}

fn fill_rounded_rect(layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32,
                     r: f32, (cr, cg, cb): (f32, f32, f32)) {
    layer.set_fill_color(Color::Rgb(Rgb { r: cr, g: cg, b: cb, icc_profile: None }));
    layer.add_polygon(Polygon {
        rings: vec![rounded_rect_ring(x, y, w, h, r)],
        mode: PaintMode::Fill,
        winding_order: WindingOrder::NonZero,
    });
    layer.set_fill_color(Color::Rgb(Rgb { r: 0.0, g: 0.0, b: 0.0, icc_profile: None }));
}

fn stroke_rounded_rect(layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32,
                       r: f32, (cr, cg, cb): (f32, f32, f32)) {
    layer.set_outline_color(Color::Rgb(Rgb { r: cr, g: cg, b: cb, icc_profile: None }));
    layer.set_outline_thickness(0.4);
    layer.add_polygon(Polygon {
        rings: vec![rounded_rect_ring(x, y, w, h, r)],
        mode: PaintMode::Stroke,
        winding_order: WindingOrder::NonZero,
    });
    layer.set_outline_color(Color::Rgb(Rgb { r: 0.0, g: 0.0, b: 0.0, icc_profile: None }));
    layer.set_outline_thickness(1.0);
}

fn draw_hline(layer: &PdfLayerReference, x1: f32, x2: f32, y: f32,
              (r, g, b): (f32, f32, f32)) {
    layer.set_outline_color(Color::Rgb(Rgb { r, g, b, icc_profile: None }));
    layer.set_outline_thickness(0.3);
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(x1), Mm(y)), false),
            (Point::new(Mm(x2), Mm(y)), false),
        ],
        is_closed: false,
    });
    layer.set_outline_color(Color::Rgb(Rgb { r: 0.0, g: 0.0, b: 0.0, icc_profile: None }));
    layer.set_outline_thickness(1.0);
}

/// Left-to-right gradient drawn as `steps` vertical strips.
#[allow(clippy::too_many_arguments)]
fn fill_gradient_h(
    layer: &PdfLayerReference,
    x: f32, y: f32, w: f32, h: f32,
    from: (f32, f32, f32),
    to: (f32, f32, f32),
    steps: usize,
) {
    let step_w = w / steps as f32;
    for i in 0..steps {
        let t = i as f32 / (steps - 1).max(1) as f32;
        let color = (
            from.0 + (to.0 - from.0) * t,
            from.1 + (to.1 - from.1) * t,
            from.2 + (to.2 - from.2) * t,
        );
        // Overlap strips slightly to prevent rounding gaps
        fill_rect(layer, x + i as f32 * step_w, y, step_w + 0.6, h, color);
    }
}

// ── Text helpers ──────────────────────────────────────────────────────────────

/// Builtin PDF fonts only cover Latin-1; spell out the rupee sign and
/// replace anything else outside that range.
fn pdf_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '₹' => out.push_str("Rs. "),
            '’' | '‘' => out.push('\''),
            '“' | '”' => out.push('"'),
            '—' | '–' => out.push('-'),
            c if (c as u32) < 0x100 => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

/// Shorten to `max` characters, marking the cut with ASCII dots the built-in
/// fonts can draw.
fn truncate(s: &str, max: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() > max {
        let keep = max.saturating_sub(3);
        format!("{}...", chars[..keep].iter().collect::<String>())
    } else {
        s.to_string()
    }
}

fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    if text.len() <= max_chars {
        return vec![text.to_string()];
    }
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.len() + 1 + word.len() > max_chars {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        } else {
            current.push(' ');
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn today() -> String {
    chrono::Utc::now().format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Language;
    use crate::pipeline::Pipeline;
    use crate::rules::RuleSet;

    #[test]
    fn test_render_writes_pdf() {
        let pipeline = Pipeline::new(RuleSet::shared());
        let mut text = String::new();
        for i in 1..=40 {
            text.push_str(&format!(
                "{i}. The Employee shall not engage in similar business within 2 years, and the Company may terminate without notice.\n\n"
            ));
        }
        let (_, a) = pipeline.analyze("long.txt", text.as_bytes(), Some(Language::En)).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("report.pdf");
        render(&[a], &out).unwrap();

        let bytes = std::fs::read(&out).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_pdf_text_replaces_unsupported_glyphs() {
        assert_eq!(pdf_text("₹5,000 due"), "Rs. 5,000 due");
        assert_eq!(pdf_text("कर्मचारी ok"), "???????? ok");
        assert_eq!(pdf_text("Employee’s"), "Employee's");
    }

    #[test]
    fn test_truncate_stays_within_latin1() {
        assert_eq!(truncate("short", 10), "short");
        let cut = truncate(&pdf_text("a-very-long-contract-file-name.txt"), 12);
        assert_eq!(cut, "a-very-lo...");
        assert!(cut.chars().all(|c| (c as u32) < 0x100));
    }

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("short", 10), vec!["short"]);
        assert_eq!(
            wrap_text("one two three four", 9),
            vec!["one two", "three", "four"]
        );
    }
}
