//! Host record decoding, the screen model and redraw runs

mod utils;

use tn5250web::error::ProtocolError;
use tn5250web::lib5250::field::{DbcsType, ShiftEdit};
use tn5250web::lib5250::overlay::ErrorOverlay;
use tn5250web::lib5250::protocol::{decode, decode_error_line, HostStream};
use tn5250web::lib5250::screen::{Color, ScreenAttr, ScreenSize, Usage};
use tn5250web::lib5250::segmenter::{segment, DisplaySegmenter, SegmentState};
use utils::*;

#[test]
fn test_decode_sign_on_record() {
    let (screen, data) = decode(&sign_on_stream()).unwrap();

    assert_eq!(screen.size(), ScreenSize::STANDARD);
    assert_eq!(data.field_count(), 3);
    assert_eq!(screen.cursor_pos(), 5 * 80 + 52);
    assert!(screen.row_text(0).contains("Sign On"));

    let user = data.field(0).unwrap();
    assert!(user.ffw.monocase);
    assert_eq!(user.ffw.shift_edit, ShiftEdit::AlphaShift);
    assert!(data.field(2).unwrap().ffw.mandatory_enter);

    assert_eq!(screen.field_at(6 * 80 + 55), Some(1));
    assert_eq!(screen.entry(6 * 80 + 55).unwrap().usage, Usage::Input);
    assert_eq!(screen.field_at(6 * 80 + 62), None);
}

#[test]
fn test_attribute_runs_start_after_change_point() {
    let (screen, _) = decode(&sign_on_stream()).unwrap();

    assert!(screen.entry(32).unwrap().attr.is_default());
    assert_eq!(screen.entry(33).unwrap().attr.color, Color::White);
    assert_eq!(screen.entry(40).unwrap().attr.color, Color::White);
    assert!(screen.entry(41).unwrap().attr.is_default());
}

#[test]
fn test_record_from_json() {
    let json = r#"{
        "screenSize": "27,132",
        "regenerationBuffer": "MAIN",
        "regenBufferAttributes": "",
        "fieldTable": "20,6,2,0x4000,1,0x8200",
        "commandKeySwitches": "",
        "cursorPosition": "20,6,1"
    }"#;
    let stream = HostStream::from_json(json).unwrap();
    let (screen, data) = decode(&stream).unwrap();

    assert_eq!(screen.size(), ScreenSize::WIDE);
    assert_eq!(screen.len(), 27 * 132);
    assert_eq!(data.field(0).unwrap().dbcs, DbcsType::J);
    assert!(screen.cursor().blink);
    assert!(decode_error_line(&stream).unwrap().is_none());
}

#[test]
fn test_json_round_trip_omits_empty_error_line() {
    let json = sign_on_stream().to_json().unwrap();
    assert!(json.contains("\"regenBufferAttributes\""));
    assert!(!json.contains("errorRegenerationBuffer"));
}

#[test]
fn test_invalid_records() {
    let mut stream = text_stream("x");
    stream.screen_size = "25,80".into();
    assert!(matches!(decode(&stream), Err(ProtocolError::InvalidScreenSize { .. })));

    let mut stream = text_stream("x");
    stream.cursor_position = "24,0".into();
    assert!(matches!(decode(&stream), Err(ProtocolError::InvalidCursorPosition { row: 24, col: 0 })));

    let mut stream = text_stream("x");
    stream.field_table = "23,75,10,0x4000,0".into();
    assert!(matches!(decode(&stream), Err(ProtocolError::FieldOutOfBounds { .. })));

    let mut stream = text_stream("x");
    stream.field_table = "0xFFFFFFFFFFFFFFFF,0,1,0x4000,0".into();
    assert!(matches!(decode(&stream), Err(ProtocolError::FieldOutOfBounds { row: usize::MAX, .. })));

    let mut stream = text_stream("x");
    stream.field_table = "0,5,0xFFFFFFFFFFFFFFFF,0x4000,0".into();
    assert!(matches!(decode(&stream), Err(ProtocolError::FieldOutOfBounds { col: 5, .. })));

    let mut stream = text_stream("x");
    stream.regen_buffer_attributes = "0,0x22,5".into();
    assert!(matches!(decode(&stream), Err(ProtocolError::IncompleteData { .. })));

    let mut stream = text_stream("x");
    stream.field_table = "1,zz,2,0x4000,0".into();
    assert!(matches!(decode(&stream), Err(ProtocolError::MalformedNumber { .. })));
}

#[test]
fn test_attribute_change_point_past_buffer_end() {
    let mut stream = text_stream("x");
    stream.regen_buffer_attributes = "0xFFFFFFFFFFFFFFFF,0x22".into();
    let (screen, _) = decode(&stream).unwrap();
    assert!(screen.attr_map().iter().all(|entry| entry.attr.is_default()));

    // a successor past the end clamps the run to the buffer
    stream.regen_buffer_attributes = "1919,0x20,0xFFFFFFFFFFFFFFFF,0x22".into();
    let (screen, _) = decode(&stream).unwrap();
    assert_eq!(screen.attr_map().len(), 1920);
}

#[test]
fn test_field_table_edge_entries_are_dropped() {
    let mut stream = text_stream("x");
    // invalid FFW, zero length, overlap with the first valid field
    stream.field_table = "1,0,5,0x8000,0,2,0,0,0x4000,0,3,0,5,0x4000,0,3,2,5,0x4000,0".into();
    let (_, data) = decode(&stream).unwrap();
    assert_eq!(data.field_count(), 1);
    assert_eq!(data.field(0).unwrap().row, 3);
}

#[test]
fn test_field_table_overflow() {
    let table = (0..257)
        .map(|i| format!("{},{},1,0x4000,0", i / 80, i % 80))
        .collect::<Vec<_>>()
        .join(",");
    let mut stream = text_stream("");
    stream.field_table = table;
    assert!(matches!(decode(&stream), Err(ProtocolError::FormatTableOverflow { .. })));
}

#[test]
fn test_blank_screen_has_no_runs() {
    let (screen, data) = decode(&text_stream("")).unwrap();
    assert!(segment(&screen, &data).is_empty());
}

#[test]
fn test_runs_cover_text_and_empty_fields() {
    let (screen, data) = decode(&sign_on_stream()).unwrap();
    let runs = segment(&screen, &data);

    let title = runs.iter().find(|run| run.pos <= 33 && 33 < run.pos + run.len).unwrap();
    assert_eq!(title.attr.color, Color::White);

    let user = runs.iter().find(|run| run.field == Some(0)).unwrap();
    assert_eq!(user.pos, 5 * 80 + 52);
    assert_eq!(user.len, 10);

    for run in &runs {
        assert!(run.len > 0);
        assert_eq!(run.pos / 80, (run.pos + run.len - 1) / 80, "run crosses a row: {run:?}");
    }
}

#[test]
fn test_non_display_field_is_not_drawn() {
    let mut stream = sign_on_stream();
    stream.regen_buffer_attributes = "531,0x27,541,0x20".into();
    let (screen, data) = decode(&stream).unwrap();

    assert!(screen.entry(6 * 80 + 52).unwrap().attr.non_display);
    let runs = segment(&screen, &data);
    assert!(runs.iter().all(|run| run.field != Some(1)));
    assert!(runs.iter().any(|run| run.field == Some(0)));
}

#[test]
fn test_segmenter_respects_valid_length() {
    let (screen, data) = decode(&sign_on_stream()).unwrap();
    let mut segmenter = DisplaySegmenter::new(&screen, &data).with_valid_len(80);
    let runs = segmenter.segment();

    assert!(runs.iter().all(|run| run.pos + run.len <= 80));
    assert_eq!(segmenter.state(), SegmentState::NoSection);
}

#[test]
fn test_double_byte_text_gets_its_own_run() {
    let (screen, data) = decode(&text_stream("ab日本cd")).unwrap();
    let runs = DisplaySegmenter::new(&screen, &data).with_valid_len(80).segment();

    assert_eq!(runs.len(), 3);
    assert!(!runs[0].dbcs);
    assert!(runs[1].dbcs);
    assert_eq!((runs[1].pos, runs[1].len), (2, 2));
    // trailing nulls keep counting in the last run
    assert!(!runs[2].dbcs);
    assert_eq!((runs[2].pos, runs[2].len), (4, 76));
    assert!(screen.has_dbcs());
}

#[test]
fn test_host_error_line() {
    let mut stream = sign_on_stream();
    stream.error_regeneration_buffer = Some("CPF1107 Password not correct".into());
    stream.error_attributes = Some("0,0x28".into());
    stream.error_cursor_position = Some("0,1".into());

    let line = decode_error_line(&stream).unwrap().unwrap();
    assert_eq!(line.attributes, vec![(0, 0x28)]);
    assert_eq!(line.cursor.map(|cursor| cursor.col), Some(1));
}

#[test]
fn test_error_overlay_restores_last_row_once() {
    let (mut screen, _) = decode(&sign_on_stream()).unwrap();
    let original = screen.row_text(23);
    let mut overlay = ErrorOverlay::new();

    overlay.save_last_screen_row(&screen, 23);
    screen.write_row(23, "0007 Field requires data", ScreenAttr::from_code(0x22));
    // a second save keeps the first snapshot
    overlay.save_last_screen_row(&screen, 23);
    assert!(screen.row_text(23).starts_with("0007"));

    assert!(overlay.restore_last_screen_row(&mut screen));
    assert_eq!(screen.row_text(23), original);
    assert!(!overlay.restore_last_screen_row(&mut screen));
    assert!(!overlay.is_saved());
}
