//! Printing the visible window

use std::io::Write;
use anyhow::Result;
use serde::Serialize;
use wv_core::{DashboardContext, ViewSeries, ViewSummary};

use crate::cli::OutputFormat;

/// JSON document written for `--format json`
#[derive(Serialize)]
struct JsonReport<'a> {
    mode: wv_core::Mode,
    start: usize,
    end: usize,
    start_percent: f64,
    end_percent: f64,
    fields: &'static [&'static str],
    points: &'a ViewSeries,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<&'a ViewSummary>,
}

/// Write `visible` in `format`; indices are offset by the range start
pub fn render<W: Write>(
    out: &mut W,
    format: OutputFormat,
    context: &DashboardContext,
    visible: &ViewSeries,
    summary: Option<&ViewSummary>,
) -> Result<()> {
    match format {
        OutputFormat::Table => render_table(out, context, visible, summary),
        OutputFormat::Json => {
            let report = JsonReport {
                mode: context.mode,
                start: context.range.start,
                end: context.range.end,
                start_percent: context.start_percent,
                end_percent: context.end_percent,
                fields: visible.field_names(),
                points: visible,
                summary,
            };
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)?;
            Ok(())
        }
        OutputFormat::Csv => render_csv(out, context, visible),
    }
}

fn render_table<W: Write>(
    out: &mut W,
    context: &DashboardContext,
    visible: &ViewSeries,
    summary: Option<&ViewSummary>,
) -> Result<()> {
    writeln!(
        out,
        "mode: {}  range: {}..={} of {} ({:.1}% - {:.1}%)",
        context.mode,
        context.range.start,
        context.range.end,
        context.view_len,
        context.start_percent,
        context.end_percent,
    )?;

    if visible.is_empty() {
        writeln!(out, "(no data)")?;
        return Ok(());
    }

    write!(out, "{:>6}  {:<20}", "index", "full_date")?;
    for name in visible.field_names() {
        write!(out, "  {:>17}", name)?;
    }
    writeln!(out)?;

    for i in 0..visible.len() {
        write!(
            out,
            "{:>6}  {:<20}",
            context.range.start + i,
            visible.timestamp(i).unwrap_or("-"),
        )?;
        for value in visible.values(i).unwrap_or_default() {
            write!(out, "  {:>17.2}", value)?;
        }
        writeln!(out)?;
    }

    if let Some(summary) = summary {
        writeln!(out)?;
        writeln!(out, "points: {}", summary.count)?;
        if let Some(hours) = summary.span_hours {
            writeln!(out, "span: {} h", hours)?;
        }
        for field in &summary.fields {
            writeln!(
                out,
                "{:<17}  total {:>12.2}  min {:>10.2}  max {:>10.2}  mean {:>10.2}",
                field.name, field.total, field.min, field.max, field.mean,
            )?;
        }
        if let Some(within) = summary.within_forecast {
            writeln!(out, "within forecast band: {}/{}", within, summary.count)?;
        }
    }

    Ok(())
}

fn render_csv<W: Write>(out: &mut W, context: &DashboardContext, visible: &ViewSeries) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);

    let mut header = vec!["index", "full_date"];
    header.extend_from_slice(visible.field_names());
    writer.write_record(&header)?;

    for i in 0..visible.len() {
        let mut record = vec![
            (context.range.start + i).to_string(),
            visible.timestamp(i).unwrap_or_default().to_string(),
        ];
        record.extend(visible.values(i).unwrap_or_default().iter().map(|v| v.to_string()));
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}
