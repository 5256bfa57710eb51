//! End-to-end scenarios through the JSON request/response schema.

use opti::model::{OptimizeRequest, OptimizeResponse, UnplacedReason};
use serde_json::json;

fn run(request: serde_json::Value) -> OptimizeResponse {
    let request: OptimizeRequest = serde_json::from_value(request).unwrap();
    opti::optimize(&request)
}

fn single_material(
    board: serde_json::Value,
    parts: serde_json::Value,
    params: serde_json::Value,
) -> serde_json::Value {
    json!({
        "materials": [{
            "id": "m1",
            "name": "Test board",
            "parts": parts,
            "board": board,
            "params": params,
        }]
    })
}

#[test]
fn scenario_a_small_parts_on_large_sheet() {
    let response = run(single_material(
        json!({
            "w_mm": 2800, "h_mm": 2070,
            "trim_top_mm": 10, "trim_right_mm": 10, "trim_bottom_mm": 10, "trim_left_mm": 10
        }),
        json!([{ "id": "p1", "w_mm": 600, "h_mm": 400, "qty": 2, "allow_rot_90": true, "grain_locked": false }]),
        json!({ "kerf_mm": 3 }),
    ));

    assert!(response.errors.is_empty());
    let result = &response.results[0];
    assert_eq!(result.material_id, "m1");
    assert_eq!(result.material_name, "Test board");
    assert_eq!(result.placements.len(), 2);
    assert!(result.unplaced.is_empty());
    assert!(result.placements.iter().all(|p| p.board_id == 0));
    for p in &result.placements {
        assert!(p.x_mm >= 10.0 && p.y_mm >= 10.0);
        assert!(p.x_mm + p.w_mm <= 2790.0);
        assert!(p.y_mm + p.h_mm <= 2060.0);
    }

    let m = &result.metrics;
    assert_eq!(m.boards_used, 1);
    assert_eq!(m.placed_count, 2);
    assert_eq!(m.unplaced_count, 0);
    assert_eq!(m.used_area_mm2, 480_000.0);
    assert_eq!(m.board_area_mm2, 2780.0 * 2050.0);
    assert_eq!(m.waste_pct, 91.58);
    assert!(m.total_cut_length_mm > 0.0);

    assert_eq!(result.debug.board_width, 2800.0);
    assert_eq!(result.debug.board_height, 2070.0);
    assert_eq!(result.debug.usable_width, 2780.0);
    assert_eq!(result.debug.usable_height, 2050.0);
    assert_eq!(result.debug.bins_count, 1);
    assert_eq!(result.debug.panels_count, 2);
    assert_eq!(result.board_cut_lengths.len(), 1);
    assert_eq!(result.board_cut_lengths[&0], m.total_cut_length_mm);
}

#[test]
fn scenario_b_part_wider_than_board() {
    let response = run(single_material(
        json!({ "w_mm": 1000, "h_mm": 1000 }),
        json!([{ "id": "long", "w_mm": 1200, "h_mm": 100, "qty": 1, "allow_rot_90": true }]),
        json!({}),
    ));

    let result = &response.results[0];
    assert!(result.placements.is_empty());
    assert_eq!(result.unplaced.len(), 1);
    assert_eq!(result.unplaced[0].id, "long");
    assert_eq!(result.unplaced[0].reason, Some(UnplacedReason::ExceedsBoard));
    assert_eq!(result.metrics.boards_used, 0);
    assert_eq!(result.metrics.waste_pct, 0.0);

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(
        json["results"][0]["unplaced"][0]["reason"],
        "exceeds board dimensions"
    );
}

#[test]
fn scenario_c_eleven_squares_need_several_boards() {
    let parts: Vec<serde_json::Value> = (0..11)
        .map(|i| json!({ "id": format!("sq{i}"), "w_mm": 400, "h_mm": 400, "qty": 1, "allow_rot_90": false }))
        .collect();
    let response = run(single_material(
        json!({ "w_mm": 1000, "h_mm": 1000 }),
        json!(parts),
        json!({}),
    ));

    let result = &response.results[0];
    assert_eq!(result.placements.len(), 11);
    assert!(result.unplaced.is_empty());
    assert!(result.metrics.boards_used >= 2);
    assert!(result.placements.iter().all(|p| p.rot_deg == 0));
    // At most four 400x400 fit one 1000x1000 sheet
    for board_id in 0..result.metrics.boards_used {
        let on_board = result
            .placements
            .iter()
            .filter(|p| p.board_id == board_id)
            .count();
        assert!((1..=4).contains(&on_board));
    }
}

#[test]
fn scenario_d_empty_parts_list() {
    let response = run(single_material(
        json!({ "w_mm": 2800, "h_mm": 2070 }),
        json!([]),
        json!({ "kerf_mm": 4 }),
    ));

    let result = &response.results[0];
    assert!(result.placements.is_empty());
    assert!(result.unplaced.is_empty());
    assert_eq!(result.metrics.boards_used, 0);
    assert_eq!(result.metrics.waste_pct, 0.0);
    assert_eq!(result.metrics.total_cut_length_mm, 0.0);
    assert!(result.board_cut_lengths.is_empty());
    assert_eq!(result.debug.panels_count, 0);
}

#[test]
fn grain_locked_part_is_never_rotated() {
    let response = run(single_material(
        json!({ "w_mm": 1000, "h_mm": 300 }),
        json!([
            { "id": "locked", "w_mm": 250, "h_mm": 900, "qty": 1, "allow_rot_90": true, "grain_locked": true },
            { "id": "free", "w_mm": 250, "h_mm": 900, "qty": 1, "allow_rot_90": true }
        ]),
        json!({}),
    ));

    let result = &response.results[0];
    assert_eq!(result.placements.len(), 1);
    assert_eq!(result.placements[0].id, "free");
    assert_eq!(result.placements[0].rot_deg, 90);
    assert_eq!(result.placements[0].w_mm, 900.0);
    assert_eq!(result.unplaced[0].id, "locked");
}

#[test]
fn sub_millimetre_kerf_and_parts() {
    let response = run(single_material(
        json!({ "w_mm": 100.5, "h_mm": 50 }),
        json!([{ "id": "half", "w_mm": 49.9, "h_mm": 50, "qty": 2, "allow_rot_90": false }]),
        json!({ "kerf_mm": 0.7 }),
    ));

    let result = &response.results[0];
    assert_eq!(result.metrics.boards_used, 1);
    let mut xs: Vec<f64> = result.placements.iter().map(|p| p.x_mm).collect();
    xs.sort_by(f64::total_cmp);
    assert_eq!(xs, vec![0.0, 50.6]);
}

#[test]
fn kerf_is_charged_between_parts() {
    let response = run(single_material(
        json!({ "w_mm": 100, "h_mm": 100 }),
        json!([{ "id": "half", "w_mm": 50, "h_mm": 100, "qty": 2, "allow_rot_90": false }]),
        json!({ "kerf_mm": 5 }),
    ));
    assert_eq!(response.results[0].metrics.boards_used, 2);
}

#[test]
fn invalid_material_does_not_block_others() {
    let response = run(json!({
        "materials": [
            {
                "id": "broken", "name": "No kerf sign",
                "parts": [{ "id": "a", "w_mm": 10, "h_mm": 10, "qty": 1 }],
                "board": { "w_mm": 100, "h_mm": 100 },
                "params": { "kerf_mm": -2 }
            },
            {
                "id": "fine", "name": "Valid",
                "parts": [{ "id": "a", "w_mm": 10, "h_mm": 10, "qty": 1 }],
                "board": { "w_mm": 100, "h_mm": 100 }
            }
        ]
    }));

    assert_eq!(response.results.len(), 1);
    assert_eq!(response.results[0].material_id, "fine");
    assert_eq!(response.errors.len(), 1);
    assert_eq!(response.errors[0].material_id, "broken");
    assert!(response.errors[0].error.contains("kerf"));
}

#[test]
fn incomplete_materials_fail_alone() {
    let response = run(json!({
        "materials": [
            { "id": "bad", "parts": [] },
            {
                "id": "ok", "name": "Valid",
                "parts": [{ "id": "a", "w_mm": 10, "h_mm": 10, "qty": 2 }],
                "board": { "w_mm": 100, "h_mm": 100 }
            },
            {
                "id": "no-height",
                "parts": [{ "id": "a", "w_mm": 10, "h_mm": 10, "qty": 1 }],
                "board": { "w_mm": 100 }
            },
            {
                "id": "half-qty",
                "parts": [{ "id": "a", "w_mm": 10, "h_mm": 10, "qty": 1.5 }],
                "board": { "w_mm": 100, "h_mm": 100 }
            }
        ]
    }));

    assert_eq!(response.results.len(), 1);
    assert_eq!(response.results[0].material_id, "ok");
    assert_eq!(response.results[0].metrics.placed_count, 2);

    let failed: Vec<(&str, &str)> = response
        .errors
        .iter()
        .map(|e| (e.material_id.as_str(), e.error.as_str()))
        .collect();
    assert_eq!(
        failed,
        vec![
            ("bad", "material has no board"),
            ("no-height", "board h_mm is missing"),
            (
                "half-qty",
                "part a: quantity must be a positive whole number, got 1.5"
            ),
        ]
    );
}

#[test]
fn response_schema_field_names() {
    let response = run(single_material(
        json!({ "w_mm": 500, "h_mm": 500, "trim_left_mm": 5 }),
        json!([{ "id": 17, "w_mm": 100, "h_mm": 100, "qty": 1 }]),
        json!({}),
    ));
    let json = serde_json::to_value(&response).unwrap();
    let result = &json["results"][0];

    assert_eq!(result["material_id"], "m1");
    assert_eq!(
        result["placements"][0],
        json!({ "id": "17", "x_mm": 5.0, "y_mm": 0.0, "w_mm": 100.0, "h_mm": 100.0, "rot_deg": 0, "board_id": 0 })
    );
    for key in [
        "used_area_mm2",
        "board_area_mm2",
        "waste_pct",
        "placed_count",
        "unplaced_count",
        "boards_used",
        "total_cut_length_mm",
    ] {
        assert!(result["metrics"].get(key).is_some(), "missing metrics.{key}");
    }
    for key in [
        "board_width",
        "board_height",
        "usable_width",
        "usable_height",
        "bins_count",
        "panels_count",
    ] {
        assert!(result["debug"].get(key).is_some(), "missing debug.{key}");
    }
    assert!(result["board_cut_lengths"].get("0").is_some());
    assert!(json.get("errors").is_none());
}

#[test]
fn same_seed_same_output() {
    let request = single_material(
        json!({ "w_mm": 2440, "h_mm": 1220, "trim_top_mm": 5, "trim_left_mm": 5 }),
        json!([
            { "id": "a", "w_mm": 300, "h_mm": 200, "qty": 4 },
            { "id": "b", "w_mm": 200, "h_mm": 300, "qty": 3 },
            { "id": "c", "w_mm": 600, "h_mm": 100, "qty": 5 },
            { "id": "d", "w_mm": 100, "h_mm": 600, "qty": 2, "grain_locked": true },
            { "id": "e", "w_mm": 750, "h_mm": 500, "qty": 2 }
        ]),
        json!({ "kerf_mm": 3.2, "seed": 1234 }),
    );

    let first = serde_json::to_string(&run(request.clone())).unwrap();
    let second = serde_json::to_string(&run(request)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn heuristic_can_be_selected() {
    for heuristic in ["best_area_fit", "best_short_side_fit", "best_long_side_fit"] {
        let response = run(single_material(
            json!({ "w_mm": 1000, "h_mm": 600 }),
            json!([
                { "id": "a", "w_mm": 400, "h_mm": 300, "qty": 3 },
                { "id": "b", "w_mm": 150, "h_mm": 150, "qty": 4 }
            ]),
            json!({ "heuristic": heuristic }),
        ));
        let result = &response.results[0];
        assert_eq!(result.metrics.placed_count, 7, "{heuristic}");
    }
}

#[test]
fn zero_time_limit_reports_timeouts() {
    let response = run(single_material(
        json!({ "w_mm": 1000, "h_mm": 1000 }),
        json!([{ "id": "a", "w_mm": 100, "h_mm": 100, "qty": 3 }]),
        json!({ "time_limit_ms": 0 }),
    ));
    let result = &response.results[0];
    assert!(result.placements.is_empty());
    assert_eq!(result.unplaced.len(), 3);
    assert!(
        result
            .unplaced
            .iter()
            .all(|u| u.reason == Some(UnplacedReason::Timeout))
    );
}
