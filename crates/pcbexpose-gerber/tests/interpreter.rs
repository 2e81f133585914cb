use pcbexpose_core::{Bounds, Point};
use pcbexpose_gerber::{interpret, interpret_with_bounds, GerberError, Polarity, Shape, Termination};

#[test]
fn test_circle_flash_at_origin() {
    let doc = "%FSLAX24Y24*%\n%MOIN*%\n%ADD10C,0.010*%\nD10*\nX0Y0D03*\nM02*\n";
    let layer = interpret(doc).unwrap();

    assert_eq!(layer.items.len(), 1);
    let item = &layer.items[0];
    assert_eq!(item.polarity, Polarity::Dark);
    match &item.shape {
        Shape::Ellipse {
            center,
            width,
            height,
        } => {
            assert_eq!(*center, Point::new(0.0, 0.0));
            assert_eq!(*width, 0.010);
            assert_eq!(*height, 0.010);
        }
        other => panic!("expected ellipse, got {:?}", other),
    }
    assert_eq!(layer.termination, Termination::Stopped { position: 11 });
    assert!((layer.bounds.width() - 0.010).abs() < 1e-12);
}

#[test]
fn test_fixed_digit_coordinate() {
    let doc = "%FSLAX24Y24*%\n%ADD10C,0.010*%\nD10*\nX12345Y0D03*\n";
    let layer = interpret(doc).unwrap();
    match &layer.items[0].shape {
        Shape::Ellipse { center, .. } => assert!((center.x - 1.2345).abs() < 1e-12),
        other => panic!("expected ellipse, got {:?}", other),
    }
}

#[test]
fn test_undefined_aperture_halts() {
    let doc = "%FSLAX24Y24*%\n%ADD10C,0.010*%\nD10*\nX0Y0D03*\nD15*\nX100Y100D03*\n";
    let err = interpret(doc).unwrap_err();
    assert!(matches!(err, GerberError::UndefinedAperture { code: 15, .. }));
    assert!(err.to_string().contains("D15"));
}

#[test]
fn test_stop_discards_remaining_tokens() {
    let doc = "%ADD10C,0.010*%\nD10*\nX0Y0D03*\nM00*\nX1000Y1000D03*\nD99*\n";
    let layer = interpret(doc).unwrap();
    assert!(layer.is_stopped());
    assert_eq!(layer.items.len(), 1);
}

#[test]
fn test_millimeter_document() {
    let doc = "%FSLAX33Y33*%\n%MOMM*%\n%ADD10R,2.54X1.27*%\nD10*\nX25400Y25400D03*\n";
    let layer = interpret(doc).unwrap();
    match &layer.items[0].shape {
        Shape::Rectangle {
            center,
            width,
            height,
        } => {
            assert!((center.x - 1.0).abs() < 1e-9);
            assert!((width - 0.1).abs() < 1e-9);
            assert!((height - 0.05).abs() < 1e-9);
        }
        other => panic!("expected rectangle, got {:?}", other),
    }
}

#[test]
fn test_hole_is_always_clear() {
    let doc = "%ADD10C,0.060X0.030*%\n%LPC*%\nD10*\nX0Y0D03*\n";
    let layer = interpret(doc).unwrap();
    assert_eq!(layer.items.len(), 2);
    assert_eq!(layer.items[0].polarity, Polarity::Clear);
    assert_eq!(layer.items[1].polarity, Polarity::Clear);
    assert!(layer.items[1].shape.is_ellipse());
}

#[test]
fn test_macro_aperture_flash() {
    let doc = concat!(
        "%FSLAX24Y24*%\n%MOIN*%\n",
        "%AMRECTROT*\n0 rotated rectangle*\n21,1,$1,$2,0,0,$3*%\n",
        "%ADD20RECTROT,0.2X0.1X90*%\n",
        "D20*\nX10000Y10000D03*\n",
    );
    let layer = interpret(doc).unwrap();
    assert_eq!(layer.items.len(), 1);
    assert_eq!(layer.apertures_defined, 1);
    let (min, max) = layer.items[0].shape.bounds();
    assert!((max.x - min.x - 0.1).abs() < 1e-4);
    assert!((max.y - min.y - 0.2).abs() < 1e-4);
}

#[test]
fn test_unknown_macro_is_fatal() {
    let err = interpret("%ADD20MISSING,0.2*%\n").unwrap_err();
    assert_eq!(
        err,
        GerberError::UnknownMacro {
            name: "MISSING".to_string(),
            position: 1
        }
    );
}

#[test]
fn test_bounds_threaded_between_layers() {
    let copper = "%FSLAX24Y24*%\n%ADD10C,0.1*%\nD10*\nX0Y0D03*\nX20000Y10000D03*\n";
    let drills = "%FSLAX24Y24*%\n%ADD10C,0.02*%\nD10*\nX10000Y5000D03*\n";

    let first = interpret_with_bounds(copper, Bounds::new()).unwrap();
    let shared = interpret_with_bounds(drills, first.bounds).unwrap();
    assert_eq!(shared.bounds, first.bounds);

    let alone = interpret(drills).unwrap();
    assert!(alone.bounds.width() < first.bounds.width());
}

#[test]
fn test_rectangle_draw_adds_end_pads() {
    let doc = "%FSLAX24Y24*%\n%ADD11R,0.03X0.04*%\nD11*\nX0Y0D02*\nX10000Y0D01*\n";
    let layer = interpret(doc).unwrap();
    assert_eq!(layer.items.len(), 3);
    assert!((layer.bounds.max_x() - 1.025).abs() < 1e-4);
}

#[test]
fn test_single_quadrant_arc() {
    // quarter circle from (1,0) to (0,1) around the origin
    let doc = "%FSLAX24Y24*%\n%ADD10C,0.01*%\nD10*\nG74*\nX10000Y0D02*\nG03X0Y10000I10000J0D01*\n";
    let layer = interpret(doc).unwrap();
    assert_eq!(layer.items.len(), 1);
    let (min, max) = layer.items[0].shape.bounds();
    assert!(min.x > -0.01 && min.y > -0.01);
    assert!(max.x < 1.01 && max.y < 1.01);
}

#[test]
fn test_macro_rotation_turns_clockwise() {
    let doc = "%FSLAX24Y24*%\n%MOIN*%\n%AMV*\n20,1,0.1,0,0,1,0,90*%\n%ADD10V*%\nD10*\nX0Y0D03*\n";
    let layer = interpret(doc).unwrap();
    assert_eq!(layer.items.len(), 1);
    let (min, max) = layer.items[0].shape.bounds();
    assert!((min.y + 1.0).abs() < 1e-4);
    assert!(max.y.abs() < 1e-4);
}

#[test]
fn test_outline_with_huge_vertex_count_is_skipped() {
    let doc = "%FSLAX24Y24*%\n%MOIN*%\n%AMT*\n4,1,1e30,0,0,0.1,0,0*%\n%ADD10T*%\nD10*\nX0Y0D03*\n";
    let layer = interpret(doc).unwrap();
    assert!(layer.items.is_empty());
    assert_eq!(layer.apertures_defined, 1);
}
