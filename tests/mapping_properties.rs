//! Property tests for buffer mapping, FFW decoding and segmentation

use proptest::prelude::*;

use tn5250web::lib5250::dataset::DataSet;
use tn5250web::lib5250::field::{Field, FieldFormatWord};
use tn5250web::lib5250::mapping::BufferMapping;
use tn5250web::lib5250::screen::{Screen, ScreenSize};
use tn5250web::lib5250::segmenter::segment;

fn screen_size() -> impl Strategy<Value = ScreenSize> {
    prop_oneof![Just(ScreenSize::STANDARD), Just(ScreenSize::WIDE)]
}

fn cell() -> impl Strategy<Value = char> {
    prop_oneof![
        4 => Just('\0'),
        4 => Just(' '),
        4 => proptest::char::range('A', 'Z'),
        1 => proptest::char::range('\u{4E00}', '\u{4E20}'),
    ]
}

proptest! {
    #[test]
    fn prop_position_round_trip(size in screen_size(), seed in 0usize..10_000) {
        let mapping = BufferMapping::new(size.rows, size.cols);
        let pos = seed % mapping.buffer_len();
        let (row, col) = mapping.pos_to_coord(pos);
        prop_assert!(row < size.rows && col < size.cols);
        prop_assert_eq!(mapping.coord_to_pos(row, col), pos);
    }

    #[test]
    fn prop_ffw_factory_accepts_only_identified_words(word in any::<u16>()) {
        let decoded = FieldFormatWord::factory(word);
        prop_assert_eq!(decoded.is_some(), word & 0xC000 == 0x4000);
    }

    #[test]
    fn prop_load_attributes_never_panics(
        size in screen_size(),
        runs in proptest::collection::vec((any::<usize>(), any::<u8>()), 0..40),
    ) {
        let mut screen = Screen::new(size);
        screen.load_regeneration_buffer(&" ".repeat(size.buffer_len()));
        screen.load_attributes(&runs);
        prop_assert_eq!(screen.attr_map().len(), size.buffer_len());
    }

    #[test]
    fn prop_runs_stay_in_rows_and_do_not_overlap(
        cells in proptest::collection::vec(cell(), 1920),
        runs in proptest::collection::vec((0usize..1920, 0x20u8..0x40), 0..20),
        fields in proptest::collection::vec((0usize..24, 0usize..80, 1usize..30), 0..8),
    ) {
        let mut screen = Screen::new(ScreenSize::STANDARD);
        let mut sorted = runs;
        sorted.sort_by_key(|&(pos, _)| pos);
        screen.load_regeneration_buffer(&cells.iter().collect::<String>());
        screen.load_attributes(&sorted);

        let mut data = DataSet::new(screen.len());
        let ffw = FieldFormatWord::factory(0x4000).unwrap();
        for (row, col, len) in fields {
            let field = Field::new(row, col, len, ffw);
            let cols = screen.cols();
            if field.end_pos(cols) > screen.len() {
                continue;
            }
            if (field.start_pos(cols)..field.end_pos(cols)).any(|pos| screen.field_at(pos).is_some()) {
                continue;
            }
            let index = data.add_field(field.clone()).unwrap();
            screen.apply_field(index, &field);
        }

        let mut covered = vec![false; screen.len()];
        for run in segment(&screen, &data) {
            prop_assert!(run.len > 0);
            prop_assert!(run.pos + run.len <= screen.len());
            prop_assert_eq!(run.pos / 80, (run.pos + run.len - 1) / 80);
            prop_assert!(!run.attr.non_display);
            for pos in run.pos..run.pos + run.len {
                prop_assert!(!covered[pos], "position {} drawn twice", pos);
                covered[pos] = true;
            }
        }
    }
}
