use dashcanvas::adapter::{ChartData, ChartRenderable, Dataset, Fill};
use dashcanvas::format::{EMPTY_NO_SELECTION, STATUS_NONE};
use dashcanvas::{Dashboard, Handle, Point, PointerTarget, Rect, SeriesArea, VisualKind};

fn pie_chart() -> Box<ChartRenderable> {
    let data = ChartData {
        labels: ["Apparel", "Footwear", "Accessories", "Beauty", "Home"]
            .into_iter()
            .map(String::from)
            .collect(),
        datasets: vec![Dataset::new("Share").fill(Fill::PerItem(
            ["#2F5597", "#ED7D31", "#A5A5A5", "#FFC000", "#5B9BD5"]
                .into_iter()
                .map(String::from)
                .collect(),
        ))],
    };
    Box::new(ChartRenderable::new(VisualKind::Pie, data))
}

#[test]
fn report_page_walkthrough() {
    let mut dash = Dashboard::default();

    let a = dash.add_visual(VisualKind::Line, None).panel.unwrap();
    assert_eq!(dash.registry().get(a).unwrap().rect(), Rect::new(40, 40, 380, 260));

    let b = dash.add_visual(VisualKind::Donut, None).panel.unwrap();
    assert_eq!(dash.registry().get(b).unwrap().rect(), Rect::new(58, 54, 380, 260));
    assert_eq!(dash.selected(), Some(b));

    // Drag A far to the right: x clamps to 1280 - 380.
    dash.pointer_down(PointerTarget::Header { panel: a }, Point::new(100, 50));
    assert_eq!(dash.selected(), Some(a));
    dash.pointer_move(Point::new(2100, 50));
    dash.pointer_up();
    assert_eq!(dash.registry().get(a).unwrap().rect().x, 900);
    assert_eq!(dash.format().x, "900");

    // Grow A past the right edge with the se handle.
    dash.pointer_down(
        PointerTarget::Handle { panel: a, handle: Handle::Se },
        Point::new(1280, 300),
    );
    dash.pointer_move(Point::new(1780, 300));
    dash.pointer_up();
    let r = dash.registry().get(a).unwrap().rect();
    assert!(r.x + r.w <= 1280, "{r:?}");
    assert!(r.x >= 0);

    // Delete B while it is selected.
    dash.select(b);
    dash.pointer_down(PointerTarget::Delete { panel: b }, Point::new(0, 0));
    assert_eq!(dash.selected(), None);
    assert_eq!(dash.format().status, STATUS_NONE);
    assert_eq!(dash.format().series, SeriesArea::Empty(EMPTY_NO_SELECTION.into()));
}

#[test]
fn pie_slice_recolor_is_immediate() {
    let mut dash = Dashboard::default();
    let chart = pie_chart();
    let state = chart.state();
    let pie = dash.add_visual(VisualKind::Pie, Some(chart)).panel.unwrap();

    let row = dash.format().series_row("slice_2").unwrap().clone();
    assert_eq!(row.label, "Accessories");
    assert_eq!(row.color, "#a5a5a5");

    let change = dash.input_series_color("slice_2", "#ff0000");
    assert!(change.colors);
    assert_eq!(state.borrow().updates, 1);

    let panel = dash.registry().get(pie).unwrap();
    assert_eq!(panel.series_by_key("slice_2").unwrap().color(), "#ff0000");
    assert_eq!(dash.format().series_row("slice_2").unwrap().color, "#ff0000");
    assert_eq!(dash.format().series_row("slice_1").unwrap().color, "#ed7d31");
}

#[test]
fn deleting_a_chart_panel_releases_it() {
    let mut dash = Dashboard::default();
    let chart = pie_chart();
    let state = chart.state();
    let pie = dash.add_visual(VisualKind::Pie, Some(chart)).panel.unwrap();
    dash.delete_panel(pie);
    assert!(state.borrow().released);
    assert!(dash.registry().is_empty());
    // Color edits on a removed panel are silent no-ops.
    assert!(dash.input_series_color("slice_0", "#000000").is_empty());
}
