//! Demo driving a viewer against the headless backend.
//!
//! Builds a small magnet scene (one face with its outline and a pair of field
//! samples), then walks through a face pick, a vector-sample pick and a few
//! property changes, printing what the viewer reports.
//!
//! Run with `RUST_LOG=debug` to see the viewer's diagnostics.

use fieldscope::*;
use pollster::FutureExt;
use serde_json::json;

fn main() -> Result<()> {
    init_logging();

    let scene = json!({
        "name": "magnet.Geom",
        "data": [
            {
                "id": "block",
                "polygons": {
                    "vertices": [0, 0, 0, 1, 0, 0, 1, 1, 0, 0, 1, 0],
                    "lengths": [4],
                    "colors": [0.2, 0.6, 0.9]
                },
                "lines": {
                    "vertices": [0, 0, 0, 1, 0, 0, 1, 1, 0, 0, 1, 0, 0, 0, 0],
                    "lengths": [5]
                }
            },
            {
                "id": "field",
                "vectors": {
                    "vertices": [0.5, 0.5, 1, 0.5, 0.5, 2],
                    "directions": [0, 0, 1, 0.6, 0, 0.8],
                    "magnitudes": [0.12, 0.48],
                    "units": "T"
                }
            }
        ]
    });

    let mut viewer = Viewer::new(MemoryHost::new().with_property("model_data", scene));
    let (signal, ready) = ready_channel();
    signal.ready(HeadlessBackend::new());
    viewer.wait_ready(ready).block_on()?;

    println!("actors:");
    for actor in viewer.registry().iter() {
        println!(
            "  {} ({:?}, group {}, pickable {})",
            actor.name(),
            actor.kind(),
            actor.group(),
            actor.is_pickable()
        );
    }
    if let Some((min, max)) = viewer.scene().bounds() {
        println!("bounds: {min} .. {max}");
    }

    let click = PickInput::new(Vec2::new(200.0, 150.0), Modifiers::CONTROL);

    // the outline edge resolves to the face it surrounds
    if let Some(backend) = viewer.backend_mut() {
        backend.script_pick(
            Some(CellPick {
                actors: vec!["geomSurface_0".into()],
                cell_id: 0,
            }),
            None,
        );
    }
    println!("face pick: {:?}", viewer.handle_pick(click)?);
    println!("selection: {}", viewer.selection_text());

    if let Some(backend) = viewer.backend_mut() {
        backend.script_pick(
            None,
            Some(PointPick {
                actors: vec!["vector_1".into()],
                point_id: 1,
            }),
        );
    }
    viewer.handle_pick(click)?;
    println!("sample pick: {}", viewer.selection_text());
    println!("sample pick again: {:?}", viewer.handle_pick(click)?);

    viewer.host_mut().set_property("vector_color_map_name", json!("coolwarm"));
    viewer.on_property_change("vector_color_map_name")?;
    viewer.on_custom_message(&json!({"type": "axis", "axis": "Z", "dir": 1}));

    if let Some(backend) = viewer.backend() {
        if let Some(glyphs) = backend.glyphs("vector_1") {
            println!("glyph colors: {:?}", glyphs.glyphs.colors);
        }
        println!("camera: {:?}", backend.camera());
        println!("redraws: {}", backend.render_count());
    }
    Ok(())
}
