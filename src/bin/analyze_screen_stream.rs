//! Host stream inspection tool
//!
//! Reads one host-stream JSON record, decodes it and prints the screen text,
//! the field table and the redraw runs.
//!
//! Usage: `analyze_screen_stream <record.json>` (`-` reads stdin)

use std::io::Read;

use anyhow::{bail, Context, Result};
use tn5250web::lib5250::protocol::{decode, decode_error_line, HostStream};
use tn5250web::lib5250::segmenter::DisplaySegmenter;

fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text).context("reading stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("reading {path}"))
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let Some(path) = std::env::args().nth(1) else {
        bail!("usage: analyze_screen_stream <record.json | ->");
    };

    let stream = HostStream::from_json(&read_input(&path)?).context("parsing host record")?;
    let (screen, data) = decode(&stream).context("decoding host record")?;
    let size = screen.size();

    println!("Screen {}x{} (message light {})", size.rows, size.cols, if size.msg_light { "on" } else { "off" });
    println!("Cursor at row {}, col {}", screen.cursor().row + 1, screen.cursor().col + 1);
    println!();
    for row in 0..screen.rows() {
        println!("{:2} |{}|", row + 1, screen.row_text(row));
    }

    println!();
    println!("Fields ({}):", data.field_count());
    for (index, field) in data.fields().iter().enumerate() {
        println!(
            "  #{index:<3} row {:>2} col {:>3} len {:>3}  {:?} {:?} {:?}{}{}{}",
            field.row + 1,
            field.col + 1,
            field.len,
            field.ffw.shift_edit,
            field.ffw.adjust_fill,
            field.dbcs,
            if field.ffw.bypass { " bypass" } else { "" },
            if field.ffw.mandatory_enter { " mandatory" } else { "" },
            if field.ffw.monocase { " monocase" } else { "" },
        );
    }

    let runs = DisplaySegmenter::new(&screen, &data).segment();
    println!();
    println!("Runs ({}):", runs.len());
    for run in &runs {
        let (row, col) = screen.mapping().pos_to_coord(run.pos);
        println!(
            "  row {:>2} col {:>3} len {:>3}  {:?}{}{}",
            row + 1,
            col + 1,
            run.len,
            run.attr.color,
            if run.dbcs { " dbcs" } else { "" },
            run.field.map(|index| format!(" field #{index}")).unwrap_or_default(),
        );
    }

    if let Some(line) = decode_error_line(&stream).context("decoding error line")? {
        println!();
        println!("Host message: {}", line.text.trim_end());
    }
    Ok(())
}
