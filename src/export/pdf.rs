//! Minimal single-page PDF 1.4 rendering
//!
//! One Helvetica text line per event. Lines that do not fit on the page are
//! summarized in a final "... and N more" line.

use crate::types::PropertyTimeline;

const PAGE_WIDTH: u32 = 612;
const PAGE_HEIGHT: u32 = 792;
const MARGIN: u32 = 50;
const LEADING: u32 = 14;
const FONT_SIZE: u32 = 10;
const MAX_LINE_CHARS: usize = 100;

/// PDF string literal body: ASCII only, with `\`, `(` and `)` escaped
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars().take(MAX_LINE_CHARS) {
        match c {
            '\\' | '(' | ')' => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_ascii() && !c.is_ascii_control() => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

fn text_lines(timeline: &PropertyTimeline) -> Vec<String> {
    let capacity = ((PAGE_HEIGHT - 2 * MARGIN) / LEADING) as usize;
    let mut lines = vec![
        format!("Property timeline: {}", timeline.property_id),
        format!("{} events", timeline.events.len()),
        String::new(),
    ];

    let room = capacity.saturating_sub(lines.len() + 1);
    for event in timeline.events.iter().take(room) {
        lines.push(format!(
            "{}  {}  {}",
            event.event.timestamp.format("%Y-%m-%d"),
            event.event.event_type.as_str(),
            event.event.title
        ));
    }
    if timeline.events.len() > room {
        lines.push(format!("... and {} more", timeline.events.len() - room));
    }
    lines
}

fn content_stream(lines: &[String]) -> String {
    let mut stream = format!(
        "BT\n/F1 {} Tf\n{} TL\n{} {} Td\n",
        FONT_SIZE,
        LEADING,
        MARGIN,
        PAGE_HEIGHT - MARGIN
    );
    for line in lines {
        stream.push_str(&format!("({}) Tj T*\n", escape(line)));
    }
    stream.push_str("ET");
    stream
}

pub fn to_pdf(timeline: &PropertyTimeline) -> Vec<u8> {
    let stream = content_stream(&text_lines(timeline));
    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] /Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R >>",
            PAGE_WIDTH, PAGE_HEIGHT
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
        format!("<< /Length {} >>\nstream\n{}\nendstream", stream.len(), stream),
    ];

    let mut out = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.push_str(&format!("{} 0 obj\n{}\nendobj\n", i + 1, body));
    }

    let xref_at = out.len();
    out.push_str(&format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1));
    for offset in offsets {
        out.push_str(&format!("{:010} 00000 n \n", offset));
    }
    out.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF",
        objects.len() + 1,
        xref_at
    ));
    out.into_bytes()
}
