use pcbexpose_gerber::{interpret, Axis, CoordinateFormat, Shape};
use proptest::prelude::*;

proptest! {
    #[test]
    fn decode_format_round_trip(
        integer in 1u32..=4,
        decimal in 1u32..=6,
        raw in -9_999_999i64..=9_999_999,
    ) {
        let fs = format!("FSLAX{}{}Y{}{}", integer, decimal, integer, decimal);
        let format = CoordinateFormat::parse_fs(&fs).unwrap();
        let text = raw.to_string();

        let value = format.decode_raw(&text, Axis::X).unwrap();
        prop_assert_eq!(format.format(value, Axis::X), text);

        let again = format.decode_raw(&format.format(value, Axis::Y), Axis::Y).unwrap();
        prop_assert!((again - value).abs() <= 10f64.powi(-(decimal as i32)));
    }

    #[test]
    fn region_emits_exactly_one_item(points in prop::collection::vec((0i32..50_000, 0i32..50_000), 1..20)) {
        let mut doc = String::from("%FSLAX24Y24*%\n%MOIN*%\nG01*\nG36*\nX0Y0D02*\n");
        for (x, y) in &points {
            doc.push_str(&format!("X{}Y{}D01*\n", x, y));
        }
        doc.push_str("G37*\nM02*\n");

        let layer = interpret(&doc).unwrap();
        prop_assert_eq!(layer.items.len(), 1);
        prop_assert!(matches!(layer.items[0].shape, Shape::Outline(_)));
    }

    #[test]
    fn bounds_cover_every_flash(flashes in prop::collection::vec((-20_000i32..20_000, -20_000i32..20_000), 1..30)) {
        let mut doc = String::from("%FSLAX24Y24*%\n%ADD10C,0.02*%\nD10*\n");
        for (x, y) in &flashes {
            doc.push_str(&format!("X{}Y{}D03*\n", x, y));
        }
        let layer = interpret(&doc).unwrap();
        prop_assert_eq!(layer.items.len(), flashes.len());
        for (x, y) in &flashes {
            let (x, y) = (*x as f64 / 1e4, *y as f64 / 1e4);
            prop_assert!(layer.bounds.min_x() <= x - 0.01 + 1e-9);
            prop_assert!(layer.bounds.max_y() >= y + 0.01 - 1e-9);
        }
    }
}
