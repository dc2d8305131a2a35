//! Paginated PDF report of the full alert store.
//!
//! Layout mirrors the on-screen board: header with general statistics, then
//! every alert newest-first with a running index counting down, severity
//! lines in the marker palette, and a page footer with current/total pages.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerIndex, PdfLayerReference, PdfPageIndex, Point, Rgb,
};
use thiserror::Error;

use super::model::{format_display, Alert, Severity};
use super::view;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 20.0;
/// Content past this y (from the top) starts a new page.
const PAGE_BREAK_Y: f32 = 270.0;
/// Rough Helvetica advance: avg glyph ~0.5em, 1pt = 0.3528mm.
const MM_PER_CHAR_PT: f32 = 0.1764;

#[derive(Error, Debug)]
pub enum ReportError {
    /// Exporting an empty store is refused; no file is produced.
    #[error("não há ocorrências para exportar")]
    Empty,
    #[error("falha de E/S ao gravar o relatório: {0}")]
    Io(#[from] std::io::Error),
    #[error("falha ao gerar o PDF: {0}")]
    Pdf(#[from] printpdf::Error),
}

/// File name for a report generated at `now`.
pub fn report_file_name(now: DateTime<Local>) -> String {
    format!("relatorio-defesa-civil-{}.pdf", now.format("%Y-%m-%d"))
}

/// Write the report for `alerts` into `out_dir`, returning the file path.
pub fn export_report(
    alerts: &[Alert],
    out_dir: &Path,
    now: DateTime<Local>,
) -> Result<PathBuf, ReportError> {
    let (doc, _page_count) = render(alerts, now)?;
    let path = out_dir.join(report_file_name(now));
    let file = File::create(&path)?;
    doc.save(&mut BufWriter::new(file))?;
    Ok(path)
}

/// Build the document and return it with its final page count.
fn render(
    alerts: &[Alert],
    now: DateTime<Local>,
) -> Result<(PdfDocumentReference, usize), ReportError> {
    if alerts.is_empty() {
        return Err(ReportError::Empty);
    }

    let (doc, first_page, first_layer) = PdfDocument::new(
        "Relatório de Ocorrências",
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "conteudo",
    );
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

    let mut pages = vec![(first_page, first_layer)];
    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    let mut y = 20.0;

    // Header
    text_centered(&layer, "RELATÓRIO DE OCORRÊNCIAS", 18.0, y, &bold);
    y += 10.0;
    text_centered(&layer, "Sistema de Alertas da Defesa Civil", 12.0, y, &regular);
    y += 5.0;
    text_centered(
        &layer,
        &format!("Gerado em: {}", format_display(now)),
        10.0,
        y,
        &regular,
    );
    y += 10.0;
    rule(&layer, y, (0, 0, 0));
    y += 10.0;

    // Statistics block, always over the unfiltered store.
    let stats = view::stats(alerts, now);
    let media = alerts.iter().filter(|a| a.severity == Severity::Media).count();
    let baixa = alerts.iter().filter(|a| a.severity == Severity::Baixa).count();

    text_at(&layer, "ESTATÍSTICAS GERAIS", 11.0, MARGIN, y, &bold);
    y += 7.0;
    text_at(
        &layer,
        &format!("Total de Ocorrências: {}", stats.total),
        10.0,
        MARGIN,
        y,
        &regular,
    );
    y += 5.0;
    text_at(
        &layer,
        &format!("Ocorrências Hoje: {}", stats.today),
        10.0,
        MARGIN,
        y,
        &regular,
    );
    y += 5.0;
    text_at(
        &layer,
        &format!(
            "Severidade Alta: {} | Média: {} | Baixa: {}",
            stats.high, media, baixa
        ),
        10.0,
        MARGIN,
        y,
        &regular,
    );
    y += 10.0;
    rule(&layer, y, (0, 0, 0));
    y += 10.0;

    text_at(&layer, "OCORRÊNCIAS REGISTRADAS", 11.0, MARGIN, y, &bold);
    y += 10.0;

    // Newest first; index counts down to 1 so it matches the list numbering.
    let total = alerts.len();
    for (position, alert) in alerts.iter().rev().enumerate() {
        if y > PAGE_BREAK_Y {
            layer = start_page(&doc, &mut pages);
            y = 20.0;
        }

        text_at(
            &layer,
            &format!("{}. {}", total - position, alert.kind.label()),
            10.0,
            MARGIN,
            y,
            &bold,
        );
        y += 6.0;

        set_fill(&layer, alert.severity.report_rgb());
        text_at(
            &layer,
            &format!("Severidade: {}", alert.severity.label().to_uppercase()),
            9.0,
            MARGIN + 5.0,
            y,
            &regular,
        );
        set_fill(&layer, (0, 0, 0));
        y += 5.0;

        text_at(
            &layer,
            &format!("Local: {}", alert.address),
            9.0,
            MARGIN + 5.0,
            y,
            &regular,
        );
        y += 5.0;
        text_at(
            &layer,
            &format!("Coordenadas: {}, {}", alert.latitude, alert.longitude),
            9.0,
            MARGIN + 5.0,
            y,
            &regular,
        );
        y += 5.0;

        // Long descriptions can spill past the page bottom on their own, so
        // the break threshold is re-checked per wrapped line.
        for line in wrap_text(&format!("Descrição: {}", alert.description), 100) {
            if y > PAGE_BREAK_Y {
                layer = start_page(&doc, &mut pages);
                y = 20.0;
            }
            text_at(&layer, &line, 9.0, MARGIN + 5.0, y, &regular);
            y += 5.0;
        }

        text_at(
            &layer,
            &format!("Data/Hora: {}", alert.created_at_display),
            9.0,
            MARGIN + 5.0,
            y,
            &regular,
        );
        y += 8.0;
        rule(&layer, y, (200, 200, 200));
        y += 8.0;
    }

    // Footer pass, now that the page count is known.
    let page_count = pages.len();
    for (number, (page, layer_idx)) in pages.iter().enumerate() {
        let footer_layer = doc.get_page(*page).get_layer(*layer_idx);
        set_fill(&footer_layer, (150, 150, 150));
        text_centered(
            &footer_layer,
            &format!("Página {} de {}", number + 1, page_count),
            8.0,
            PAGE_HEIGHT - 10.0,
            &regular,
        );
    }

    Ok((doc, page_count))
}

fn start_page(
    doc: &PdfDocumentReference,
    pages: &mut Vec<(PdfPageIndex, PdfLayerIndex)>,
) -> PdfLayerReference {
    let (page, layer_idx) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "conteudo");
    pages.push((page, layer_idx));
    doc.get_page(page).get_layer(layer_idx)
}

/// Place text with `y` measured from the top of the page.
fn text_at(
    layer: &PdfLayerReference,
    text: &str,
    size: f32,
    x: f32,
    y: f32,
    font: &IndirectFontRef,
) {
    layer.use_text(text, size, Mm(x), Mm(PAGE_HEIGHT - y), font);
}

fn text_centered(
    layer: &PdfLayerReference,
    text: &str,
    size: f32,
    y: f32,
    font: &IndirectFontRef,
) {
    let width = text.chars().count() as f32 * size * MM_PER_CHAR_PT;
    let x = ((PAGE_WIDTH - width) / 2.0).max(MARGIN);
    text_at(layer, text, size, x, y, font);
}

fn set_fill(layer: &PdfLayerReference, (r, g, b): (u8, u8, u8)) {
    layer.set_fill_color(Color::Rgb(Rgb::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        None,
    )));
}

/// Horizontal rule across the content width at `y` from the top.
fn rule(layer: &PdfLayerReference, y: f32, color: (u8, u8, u8)) {
    layer.set_outline_color(Color::Rgb(Rgb::new(
        f32::from(color.0) / 255.0,
        f32::from(color.1) / 255.0,
        f32::from(color.2) / 255.0,
        None,
    )));
    layer.set_outline_thickness(0.5);
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(MARGIN), Mm(PAGE_HEIGHT - y)), false),
            (Point::new(Mm(PAGE_WIDTH - MARGIN), Mm(PAGE_HEIGHT - y)), false),
        ],
        is_closed: false,
    });
}

/// Greedy word wrap; long unbreakable words get their own line.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.chars().count() + 1 + word.chars().count() <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(current);
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
