//! Pick resolution integration tests against the headless backend.

use fieldscope::*;
use serde_json::{json, Value};

fn scene() -> Value {
    json!({
        "name": "magnet.Geom",
        "data": [
            {
                "id": "magnet",
                "polygons": {
                    "vertices": [0, 0, 0, 1, 0, 0, 1, 1, 0],
                    "lengths": [3],
                    "colors": [0, 1, 0]
                },
                "lines": {
                    "vertices": [0, 0, 0, 1, 0, 0, 1, 1, 0, 0, 0, 0,  5, 5, 5, 6, 6, 6],
                    "lengths": [4, 2],
                    "colors": [0, 0, 0, 1, 1, 0]
                }
            },
            {
                "id": "pole",
                "polygons": {
                    "vertices": [0, 0, 1, 1, 0, 1, 1, 1, 1],
                    "lengths": [3],
                    "colors": [1, 0, 0]
                }
            },
            {
                "vectors": {
                    "vertices": [0, 0, 0, 1, 0, 0],
                    "directions": [1, 0, 0, 0, 0, 1],
                    "magnitudes": [1, 3],
                    "range": [0, 4],
                    "units": "T"
                }
            },
            {
                "lines": {"vertices": [9, 9, 9, 8, 8, 8], "lengths": [2]}
            }
        ]
    })
}

fn viewer() -> Viewer<MemoryHost> {
    let host = MemoryHost::new().with_property("model_data", scene());
    Viewer::with_backend(host, HeadlessBackend::new()).expect("scene builds")
}

fn click() -> PickInput {
    PickInput::new(Vec2::new(120.0, 80.0), Modifiers::CONTROL)
}

fn script(viewer: &mut Viewer<MemoryHost>, cell: Option<(&str, usize)>, point: Option<(&str, usize)>) {
    let cell = cell.map(|(actor, cell_id)| CellPick {
        actors: vec![actor.to_string()],
        cell_id,
    });
    let point = point.map(|(actor, point_id)| PointPick {
        actors: vec![actor.to_string()],
        point_id,
    });
    viewer
        .backend_mut()
        .expect("backend attached")
        .script_pick(cell, point);
}

fn mesh<'a>(viewer: &'a Viewer<MemoryHost>, name: &str) -> &'a SubmittedMesh {
    viewer
        .backend()
        .and_then(|b| b.mesh(name))
        .expect("mesh submitted")
}

fn glyph_colors(viewer: &Viewer<MemoryHost>) -> Vec<Rgb8> {
    viewer
        .backend()
        .and_then(|b| b.glyphs("vector_2"))
        .expect("glyphs submitted")
        .glyphs
        .colors
        .clone()
}

#[test]
fn test_pick_needs_modifier() {
    let mut viewer = viewer();
    script(&mut viewer, Some(("geomSurface_0", 2)), None);
    let plain = PickInput::new(Vec2::new(120.0, 80.0), Modifiers::default());
    assert_eq!(viewer.handle_pick(plain).unwrap(), PickOutcome::Ignored);
    assert!(viewer.selection().is_idle());
    assert!(viewer.take_events().is_empty());
}

#[test]
fn test_no_hit_changes_nothing() {
    let mut viewer = viewer();
    assert_eq!(viewer.handle_pick(click()).unwrap(), PickOutcome::NoHit);
    assert!(viewer.take_events().is_empty());

    // outline-only objects are not pickable
    script(&mut viewer, Some(("geomSurface_3", 0)), None);
    assert_eq!(viewer.handle_pick(click()).unwrap(), PickOutcome::NoHit);
}

#[test]
fn test_select_and_deselect_object() {
    let mut viewer = viewer();
    // cell 2 is the polygon, after two line cells
    script(&mut viewer, Some(("geomSurface_0", 2)), None);

    let outcome = viewer.handle_pick(click()).unwrap();
    assert_eq!(
        outcome,
        PickOutcome::ObjectSelected {
            group: "magnet".into(),
            color: [0, 255, 0]
        }
    );
    assert_eq!(viewer.selection().group.as_deref(), Some("magnet"));
    assert_eq!(viewer.selection_text(), "magnet");
    assert_eq!(
        viewer.host().last_write("selected_obj_color"),
        Some(&json!("#00ff00"))
    );
    assert_eq!(viewer.take_events(), vec![ViewerEvent::Pick(outcome)]);

    // green mirrors to blue
    assert_eq!(mesh(&viewer, "geomSurface_0").edge_color, [0, 0, 255]);
    assert_eq!(&mesh(&viewer, "geomSurface_0").buffers.cell_colors[..3], &[0, 0, 255]);
    assert_eq!(mesh(&viewer, "geomSurface_1").edge_color, [0, 0, 0]);

    let outcome = viewer.handle_pick(click()).unwrap();
    assert_eq!(
        outcome,
        PickOutcome::ObjectDeselected {
            group: "magnet".into()
        }
    );
    assert!(viewer.selection().is_idle());
    assert_eq!(mesh(&viewer, "geomSurface_0").edge_color, [0, 0, 0]);
}

#[test]
fn test_selecting_another_object_moves_highlight() {
    let mut viewer = viewer();
    script(&mut viewer, Some(("geomSurface_0", 2)), None);
    viewer.handle_pick(click()).unwrap();

    script(&mut viewer, Some(("geomSurface_1", 0)), None);
    let outcome = viewer.handle_pick(click()).unwrap();
    assert_eq!(
        outcome,
        PickOutcome::ObjectSelected {
            group: "pole".into(),
            color: [255, 0, 0]
        }
    );
    assert_eq!(mesh(&viewer, "geomSurface_0").edge_color, [0, 0, 0]);
    // red mirrors onto itself, so the edges go white
    assert_eq!(mesh(&viewer, "geomSurface_1").edge_color, [255, 255, 255]);
}

fn single_face(color: [f64; 3]) -> Viewer<MemoryHost> {
    let scene = json!({
        "name": "face",
        "data": [{
            "id": "face",
            "polygons": {
                "vertices": [0, 0, 0, 1, 0, 0, 1, 1, 0],
                "lengths": [3],
                "colors": color
            },
            "lines": {
                "vertices": [0, 0, 0, 1, 0, 0, 1, 1, 0, 0, 0, 0],
                "lengths": [4]
            }
        }]
    });
    let host = MemoryHost::new().with_property("model_data", scene);
    Viewer::with_backend(host, HeadlessBackend::new()).expect("scene builds")
}

#[test]
fn test_highlight_contrasts_with_hueless_faces() {
    let cases = [
        ([0.5, 0.5, 0.5], [255, 255, 255]),
        ([1.0, 1.0, 1.0], [0, 0, 0]),
        ([0.0, 1.0, 1.0], [255, 255, 255]),
        ([1.0, 0.0, 0.0], [255, 255, 255]),
    ];
    for (face, edge) in cases {
        let mut viewer = single_face(face);
        // cell 1 is the polygon, after the outline
        script(&mut viewer, Some(("geomSurface_0", 1)), None);
        let PickOutcome::ObjectSelected { color, .. } = viewer.handle_pick(click()).unwrap() else {
            panic!("expected an object for face {face:?}");
        };
        let edges = mesh(&viewer, "geomSurface_0");
        assert_ne!(edges.edge_color, color, "face {face:?}");
        assert_eq!(edges.edge_color, edge, "face {face:?}");
        assert_eq!(&edges.buffers.cell_colors[..3], &edge[..]);
    }
}

#[test]
fn test_outline_pick_uses_face_color() {
    let mut viewer = viewer();
    // line cell 0 outlines the polygon
    script(&mut viewer, Some(("geomSurface_0", 0)), None);
    assert_eq!(
        viewer.handle_pick(click()).unwrap(),
        PickOutcome::ObjectSelected {
            group: "magnet".into(),
            color: [0, 255, 0]
        }
    );
}

#[test]
fn test_loose_edge_pick_uses_edge_color() {
    let mut viewer = viewer();
    // line cell 1 outlines nothing
    script(&mut viewer, Some(("geomSurface_0", 1)), None);
    assert_eq!(
        viewer.handle_pick(click()).unwrap(),
        PickOutcome::ObjectSelected {
            group: "magnet".into(),
            color: [255, 255, 0]
        }
    );
}

#[test]
fn test_selected_color_property_recolors_faces() {
    let mut viewer = viewer();
    set_and_pick(&mut viewer);
    viewer
        .host_mut()
        .set_property("selected_obj_color", json!("#123456"));
    viewer.on_property_change("selected_obj_color").unwrap();
    let colors = &mesh(&viewer, "geomSurface_0").buffers.cell_colors;
    assert_eq!(&colors[8..12], &[0x12, 0x34, 0x56, 255]);
    // other groups keep their faces
    assert_eq!(
        &mesh(&viewer, "geomSurface_1").buffers.cell_colors,
        &[255, 0, 0, 255]
    );
}

fn set_and_pick(viewer: &mut Viewer<MemoryHost>) {
    script(viewer, Some(("geomSurface_0", 2)), None);
    viewer.handle_pick(click()).unwrap();
}

#[test]
fn test_vector_sample_toggle_restores_color() {
    let mut viewer = viewer();
    let before = glyph_colors(&viewer);
    script(&mut viewer, None, Some(("vector_2", 1)));

    let PickOutcome::VectorSampleSelected {
        actor,
        index,
        reading,
    } = viewer.handle_pick(click()).unwrap()
    else {
        panic!("expected a vector sample");
    };
    assert_eq!((actor.as_str(), index), ("vector_2", 1));
    assert_eq!(reading.magnitude, 3.0);
    assert_eq!(reading.pointer_fraction, 0.75);
    assert_eq!(reading.formatted_text, "3T  θ 0°  φ 0°  at (1,0,0)");
    assert_eq!(viewer.selection_text(), reading.formatted_text);

    let highlighted = glyph_colors(&viewer);
    assert_ne!(highlighted[1], before[1]);
    assert_eq!(highlighted[0], before[0]);
    let sample = viewer.selection().sample.clone().unwrap();
    assert_eq!(sample.prior_color, before[1]);

    assert_eq!(
        viewer.handle_pick(click()).unwrap(),
        PickOutcome::VectorSampleDeselected {
            actor: "vector_2".into(),
            index: 1
        }
    );
    assert_eq!(glyph_colors(&viewer), before);
    assert!(viewer.selection().is_idle());
}

#[test]
fn test_switching_samples_restores_previous() {
    let mut viewer = viewer();
    let before = glyph_colors(&viewer);
    script(&mut viewer, None, Some(("vector_2", 0)));
    viewer.handle_pick(click()).unwrap();
    script(&mut viewer, None, Some(("vector_2", 1)));
    viewer.handle_pick(click()).unwrap();

    let after = glyph_colors(&viewer);
    assert_eq!(after[0], before[0]);
    assert_ne!(after[1], before[1]);
    assert_eq!(viewer.selection().sample.as_ref().unwrap().index, 1);
}

#[test]
fn test_failed_readout_still_restores_previous_sample() {
    let mut viewer = viewer();
    let before = glyph_colors(&viewer);
    script(&mut viewer, None, Some(("vector_2", 0)));
    viewer.handle_pick(click()).unwrap();
    assert_ne!(glyph_colors(&viewer)[0], before[0]);

    viewer.options_mut().readout_precision.magnitude = -1;
    script(&mut viewer, None, Some(("vector_2", 1)));
    assert!(matches!(
        viewer.handle_pick(click()),
        Err(FieldscopeError::InvalidPrecision(-1))
    ));
    assert_eq!(glyph_colors(&viewer), before);
    assert!(viewer.selection().is_idle());
    let stored = &viewer.registry().get("vector_2").unwrap().vectors().unwrap().attributes;
    assert_eq!(stored.colors, before);
}

#[test]
fn test_cell_hit_on_glyph_uses_point_index() {
    let mut viewer = viewer();
    script(&mut viewer, Some(("vector_2", 0)), Some(("vector_2", 1)));
    let outcome = viewer.handle_pick(click()).unwrap();
    assert!(matches!(
        outcome,
        PickOutcome::VectorSampleSelected { index: 1, .. }
    ));
}

#[test]
fn test_point_only_hit_skips_surfaces() {
    let mut viewer = viewer();
    script(&mut viewer, None, Some(("geomSurface_0", 0)));
    assert_eq!(viewer.handle_pick(click()).unwrap(), PickOutcome::NoHit);
    assert!(viewer.selection().is_idle());
}

#[test]
fn test_rebuild_clears_selection() {
    let mut viewer = viewer();
    set_and_pick(&mut viewer);
    assert!(!viewer.selection().is_idle());
    viewer.refresh().unwrap();
    assert!(viewer.selection().is_idle());
    assert_eq!(viewer.selection_text(), "--");
}
