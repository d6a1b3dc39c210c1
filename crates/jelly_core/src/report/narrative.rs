//! Narrative (HTML) export.
//!
//! One self-contained document: inline styling only, every image re-encoded
//! to PNG and embedded as a base64 data URI. The file must stay renderable
//! with no network and no sibling files.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::ImageFormat;
use std::io::Cursor;
use std::path::Path;
use tracing::info;

use crate::batch::{BatchItem, BatchResult};
use crate::error::{Error, Result};
use crate::gallery::GalleryAssets;
use crate::metrics::EVALUATION;
use crate::species::{self, SpeciesRecord};

/// Render the narrative report for one batch.
pub fn render_narrative(batch: &BatchResult, gallery: &GalleryAssets) -> Result<String> {
    if batch.is_empty() {
        return Err(Error::EmptyBatch);
    }

    let counts = batch.tier_counts();
    let result_cards: String = batch.items.iter().map(result_card).collect();

    let html = format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Jellyfish Identification Report</title>
<style>
    body {{
        margin: 0;
        padding: 2rem 1rem;
        background: linear-gradient(160deg, #020b18 0%, #041e3a 40%, #062d55 100%);
        color: #a8c8e8;
        font-family: ui-sans-serif, system-ui, sans-serif;
        line-height: 1.6;
    }}
    .wrap {{ max-width: 56rem; margin: 0 auto; }}
    h1 {{ color: #7fffd4; margin-bottom: 0.2rem; }}
    h2 {{ color: #7fffd4; font-size: 1.2rem; margin: 0 0 0.4rem; }}
    h3 {{ color: #00bfff; margin-top: 2.5rem; }}
    .sub {{ color: #7ecfea; text-transform: uppercase; letter-spacing: 2px; font-size: 0.8rem; }}
    .stats {{ display: flex; flex-wrap: wrap; gap: 0.8rem; margin: 1.5rem 0; }}
    .stat-card {{
        flex: 1 1 8rem;
        background: rgba(255,255,255,0.03);
        border: 1px solid rgba(0,191,255,0.25);
        border-radius: 12px;
        padding: 0.8rem;
        text-align: center;
    }}
    .stat-value {{ font-size: 1.8rem; font-weight: 700; color: #00bfff; }}
    .stat-label {{ font-size: 0.75rem; text-transform: uppercase; letter-spacing: 1px; }}
    .card {{
        display: flex;
        gap: 1.2rem;
        background: rgba(255,255,255,0.03);
        border: 1px solid rgba(255,255,255,0.08);
        border-radius: 16px;
        padding: 1.2rem;
        margin-bottom: 1rem;
    }}
    .thumb {{ width: 160px; height: 160px; object-fit: cover; border-radius: 12px; flex-shrink: 0; }}
    .placeholder {{
        display: flex; align-items: center; justify-content: center;
        font-size: 4rem; background: rgba(0,191,255,0.08);
    }}
    .badge {{
        display: inline-block;
        border-radius: 99px;
        padding: 0.15rem 0.8rem;
        font-size: 0.78rem;
        font-weight: 600;
        color: #041e3a;
    }}
    .bar-row {{ display: flex; align-items: center; gap: 0.5rem; font-size: 0.8rem; margin-top: 0.25rem; }}
    .bar-label {{ width: 11rem; }}
    .bar {{ flex: 1; height: 0.45rem; background: rgba(255,255,255,0.08); border-radius: 99px; overflow: hidden; }}
    .bar-fill {{ height: 100%; background: linear-gradient(90deg, #00bfff, #7fffd4); }}
    .bar-pct {{ width: 3.5rem; text-align: right; color: #7fffd4; }}
    dl.facts {{ display: grid; grid-template-columns: auto 1fr; gap: 0.1rem 1rem; font-size: 0.85rem; margin: 0.6rem 0 0; }}
    dl.facts dt {{ color: #00bfff; text-transform: uppercase; font-size: 0.68rem; letter-spacing: 2px; align-self: center; }}
    dl.facts dd {{ margin: 0; }}
    .fact {{ font-size: 0.85rem; margin: 0.6rem 0 0; }}
    .note {{ font-size: 0.8rem; color: #7ecfea; margin: 0.4rem 0 0; }}
    .filename {{ font-size: 0.72rem; color: #2a6fa8; margin: 0.4rem 0 0; font-family: ui-monospace, monospace; }}
    table {{ border-collapse: collapse; width: 100%; font-size: 0.82rem; }}
    th, td {{ border: 1px solid rgba(255,255,255,0.12); padding: 0.35rem 0.6rem; text-align: right; }}
    th {{ color: #00bfff; }}
    td:first-child, th:first-child {{ text-align: left; }}
    td.diag {{ color: #7fffd4; font-weight: 700; }}
    .gallery {{ display: flex; flex-wrap: wrap; gap: 0.8rem; }}
    .gallery-card {{
        flex: 1 1 14rem;
        background: rgba(255,255,255,0.03);
        border: 1px solid rgba(255,255,255,0.08);
        border-radius: 12px;
        padding: 0.8rem;
        text-align: center;
    }}
    .gallery-card .thumb {{ width: 100%; height: 120px; margin-bottom: 0.5rem; }}
    .gallery-card .placeholder {{ font-size: 3rem; }}
    footer {{ text-align: center; color: #2a6fa8; font-size: 0.75rem; margin-top: 3rem; letter-spacing: 1px; }}
</style>
</head>
<body>
<div class="wrap">
<header>
    <h1>Jellyfish Identification Report</h1>
    <p class="sub">Deep learning identification of six jellyfish species</p>
</header>

<section class="stats">
    <div class="stat-card"><div class="stat-value">{classified}</div><div class="stat-label">Images classified</div></div>
    <div class="stat-card"><div class="stat-value">{high}</div><div class="stat-label">High confidence</div></div>
    <div class="stat-card"><div class="stat-value">{moderate}</div><div class="stat-label">Moderate confidence</div></div>
    <div class="stat-card"><div class="stat-value">{low}</div><div class="stat-label">Low confidence</div></div>
    <div class="stat-card"><div class="stat-value">{skipped}</div><div class="stat-label">Skipped</div></div>
</section>

<section>
{result_cards}
</section>

<h3>Model Evaluation</h3>
{metrics_section}

<h3>Species Gallery</h3>
<section class="gallery">
{gallery_cards}
</section>

<footer>Generated by jellyid · MobileNetV2 · 6 species</footer>
</div>
</body>
</html>"##,
        classified = batch.items.len(),
        high = counts.high,
        moderate = counts.moderate,
        low = counts.low,
        skipped = batch.skipped.len(),
        result_cards = result_cards,
        metrics_section = metrics_section(),
        gallery_cards = gallery_cards(gallery),
    );

    Ok(html)
}

/// Render and write the narrative report to a file.
pub fn write_narrative(
    batch: &BatchResult,
    gallery: &GalleryAssets,
    path: impl AsRef<Path>,
) -> Result<()> {
    let html = render_narrative(batch, gallery)?;
    std::fs::write(&path, &html)?;
    info!(
        bytes = html.len(),
        images = batch.items.len(),
        "narrative report written"
    );
    Ok(())
}

fn result_card(item: &BatchItem) -> String {
    let tier = item.prediction.tier();
    let top_bars: String = item
        .prediction
        .top_k()
        .iter()
        .map(|score| {
            let name = species::by_index(score.index)
                .map(|r| r.display_name)
                .unwrap_or(score.identifier);
            let pct = score.probability * 100.0;
            format!(
                r#"<div class="bar-row"><span class="bar-label">{label}</span><div class="bar"><div class="bar-fill" style="width:{pct:.1}%"></div></div><span class="bar-pct">{pct:.1}%</span></div>"#,
                label = html_escape(name),
                pct = pct,
            )
        })
        .collect();

    let filename = item
        .file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| item.file.to_string_lossy().into_owned());

    format!(
        r#"<article class="card">
    {image}
    <div>
        <h2>{emoji} {name}</h2>
        <span class="badge" style="background:{color}">{tier} · {confidence:.1}%</span>
        <div>{top_bars}</div>
        <dl class="facts">
            <dt>Scientific name</dt><dd><i>{scientific}</i></dd>
            <dt>Habitat</dt><dd>{habitat}</dd>
            <dt>Size</dt><dd>{size}</dd>
            <dt>Sting danger</dt><dd>{danger}</dd>
        </dl>
        <p class="fact">{fact}</p>
        <p class="note">{advisory}</p>
        <p class="filename">{filename}</p>
    </div>
</article>
"#,
        image = embedded_image(&item.file, item.species),
        emoji = item.species.emoji,
        name = html_escape(item.species.display_name),
        color = tier.badge_color(),
        tier = tier.label(),
        confidence = item.prediction.confidence * 100.0,
        top_bars = top_bars,
        scientific = html_escape(item.species.scientific),
        habitat = html_escape(item.species.habitat),
        size = html_escape(item.species.size),
        danger = html_escape(item.species.danger.label()),
        fact = html_escape(item.species.fact),
        advisory = html_escape(tier.advisory()),
        filename = html_escape(&filename),
    )
}

/// Re-encode a source image to PNG and inline it. Falls back to the species
/// emoji when the file became unreadable between classification and export.
fn embedded_image(path: &Path, record: &SpeciesRecord) -> String {
    match encode_png(path) {
        Some(b64) => format!(
            r#"<img class="thumb" src="data:image/png;base64,{b64}" alt="{alt}">"#,
            alt = html_escape(record.display_name),
        ),
        None => format!(r#"<div class="thumb placeholder">{}</div>"#, record.emoji),
    }
}

fn encode_png(path: &Path) -> Option<String> {
    let img = image::open(path).ok()?;
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).ok()?;
    Some(BASE64.encode(buf.into_inner()))
}

fn metrics_section() -> String {
    let snapshot = &EVALUATION;
    let short_names: Vec<&str> = species::all()
        .iter()
        .map(|r| r.display_name.strip_suffix(" Jellyfish").unwrap_or(r.display_name))
        .collect();

    let matrix_header: String = short_names
        .iter()
        .map(|n| format!("<th>{}</th>", html_escape(n)))
        .collect();
    let matrix_rows: String = snapshot
        .matrix
        .iter()
        .enumerate()
        .map(|(row_idx, row)| {
            let cells: String = row
                .iter()
                .enumerate()
                .map(|(col_idx, count)| {
                    if col_idx == row_idx {
                        format!(r#"<td class="diag">{count}</td>"#)
                    } else {
                        format!("<td>{count}</td>")
                    }
                })
                .collect();
            format!(
                "<tr><td>{}</td>{}</tr>",
                html_escape(short_names[row_idx]),
                cells
            )
        })
        .collect();

    let class_rows: String = snapshot
        .per_class()
        .iter()
        .enumerate()
        .map(|(idx, m)| {
            format!(
                "<tr><td>{name}</td><td>{precision:.3}</td><td>{recall:.3}</td><td>{f1:.3}</td><td>{support}</td></tr>",
                name = html_escape(short_names[idx]),
                precision = m.precision,
                recall = m.recall,
                f1 = m.f1,
                support = m.support,
            )
        })
        .collect();

    format!(
        r#"<section class="stats">
    <div class="stat-card"><div class="stat-value">{accuracy:.1}%</div><div class="stat-label">Accuracy</div></div>
    <div class="stat-card"><div class="stat-value">{macro_f1:.3}</div><div class="stat-label">Macro F1</div></div>
    <div class="stat-card"><div class="stat-value">{total}</div><div class="stat-label">Held-out images</div></div>
</section>
<p class="note">Confusion matrix (rows: actual, columns: predicted)</p>
<table>
    <thead><tr><th></th>{matrix_header}</tr></thead>
    <tbody>{matrix_rows}</tbody>
</table>
<p class="note">Per-class metrics</p>
<table>
    <thead><tr><th>Species</th><th>Precision</th><th>Recall</th><th>F1</th><th>Support</th></tr></thead>
    <tbody>{class_rows}</tbody>
</table>"#,
        accuracy = snapshot.accuracy() * 100.0,
        macro_f1 = snapshot.macro_f1(),
        total = snapshot.total(),
        matrix_header = matrix_header,
        matrix_rows = matrix_rows,
        class_rows = class_rows,
    )
}

fn gallery_cards(gallery: &GalleryAssets) -> String {
    species::all()
        .iter()
        .map(|record| {
            let image = match gallery.path_for(record.identifier).and_then(encode_png) {
                Some(b64) => format!(
                    r#"<img class="thumb" src="data:image/png;base64,{b64}" alt="{alt}">"#,
                    alt = html_escape(record.display_name),
                ),
                None => {
                    format!(r#"<div class="thumb placeholder">{}</div>"#, record.emoji)
                }
            };
            format!(
                r#"<div class="gallery-card">
    {image}
    <h2>{name}</h2>
    <p class="fact"><i>{scientific}</i></p>
    <p class="note">{danger}</p>
</div>
"#,
                image = image,
                name = html_escape(record.display_name),
                scientific = html_escape(record.scientific),
                danger = html_escape(record.danger.label()),
            )
        })
        .collect()
}

/// Escape HTML special characters.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
