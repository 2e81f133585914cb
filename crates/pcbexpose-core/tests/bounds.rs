use pcbexpose_core::{Bounds, Point};
use proptest::prelude::*;

fn rect() -> impl Strategy<Value = (f64, f64, f64, f64)> {
    (-50.0..50.0f64, -50.0..50.0f64, 0.0..10.0f64, 0.0..10.0f64)
}

proptest! {
    #[test]
    fn bounds_never_shrink(rects in prop::collection::vec(rect(), 1..40)) {
        let mut bounds = Bounds::new();
        for (x, y, w, h) in rects {
            let before = bounds;
            bounds.include_rect(Point::new(x, y), Point::new(x + w, y + h));
            prop_assert!(bounds.contains(&before));
            prop_assert!(bounds.width() >= before.width());
            prop_assert!(bounds.height() >= before.height());
            prop_assert!(bounds.min_x() <= x);
            prop_assert!(bounds.max_y() >= y + h);
        }
    }
}

#[test]
fn test_shared_frame_across_layers() {
    let mut copper = Bounds::new();
    copper.include_rect(Point::new(0.0, 0.0), Point::new(2.0, 1.0));

    let mut drills = copper;
    drills.include_point(Point::new(0.5, 0.5));
    assert_eq!(drills, copper);

    drills.include_point(Point::new(2.5, 1.5));
    assert_eq!(drills.width(), 2.5);
    assert_eq!(drills.height(), 1.5);
}
