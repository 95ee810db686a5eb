#![allow(clippy::float_cmp)]

use super::*;
use crate::scene::ObjectKind;

fn room_at(floor_id: u32, x: f64, z: f64, id: &str) -> RenderObject {
    RenderObject {
        floor_id,
        x,
        z,
        y: 0.0,
        visible: true,
        kind: ObjectKind::Room { id: id.into(), name: id.into() },
    }
}

fn slab(floor_id: u32) -> RenderObject {
    RenderObject {
        floor_id,
        x: 0.0,
        z: 0.0,
        y: f64::from(floor_id - 1) * 8.0,
        visible: true,
        kind: ObjectKind::Floor { name: format!("F{floor_id}"), width: 20.0, depth: 15.0, current: floor_id == 1 },
    }
}

fn room_ids(order: &[&RenderObject]) -> Vec<String> {
    order
        .iter()
        .filter_map(|o| match &o.kind {
            ObjectKind::Room { id, .. } => Some(id.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn depth_key_weights_axes() {
    let mut obj = room_at(1, 2.0, 4.0, "a");
    obj.y = 10.0;
    assert_eq!(depth_key(&obj), 2.0 + 4.0 * 0.5 + 10.0 * 0.1);
}

#[test]
fn lower_floor_sorts_first() {
    let upper = room_at(2, 0.0, 0.0, "upper");
    let lower = room_at(1, 50.0, 50.0, "lower");
    assert_eq!(compare(&lower, &upper), Ordering::Less);
}

#[test]
fn nearer_objects_sort_last_within_a_floor() {
    let far = room_at(1, 1.0, 0.0, "small");
    let near = room_at(1, 9.0, 0.0, "large");
    assert_eq!(compare(&far, &near), Ordering::Less);
    assert_eq!(compare(&near, &far), Ordering::Greater);
}

#[test]
fn equal_keys_keep_build_order() {
    let objects = vec![
        room_at(1, 2.0, 2.0, "first"),
        room_at(1, 3.0, 0.0, "second"),
        room_at(1, 1.0, 4.0, "third"),
    ];
    // All three have depth 3.0.
    let order = paint_order(&objects);
    assert_eq!(room_ids(&order.objects), vec!["first", "second", "third"]);
}

#[test]
fn floors_are_split_into_their_own_pass() {
    let objects = vec![
        slab(2),
        room_at(2, 1.0, 1.0, "b"),
        slab(1),
        room_at(1, 1.0, 1.0, "a"),
    ];
    let order = paint_order(&objects);
    let floor_ids: Vec<u32> = order.floors.iter().map(|o| o.floor_id).collect();
    assert_eq!(floor_ids, vec![1, 2]);
    assert_eq!(room_ids(&order.objects), vec!["a", "b"]);
}

#[test]
fn invisible_objects_are_not_painted() {
    let mut hidden = room_at(1, 0.0, 0.0, "hidden");
    hidden.visible = false;
    let objects = vec![slab(1), hidden, room_at(1, 0.0, 0.0, "shown")];
    let order = paint_order(&objects);
    assert_eq!(room_ids(&order.objects), vec!["shown"]);
}

#[test]
fn mixed_floors_and_depths_sort_totally() {
    let objects = vec![
        room_at(2, 0.0, 0.0, "2-near0"),
        room_at(1, 0.0, 0.0, "1-d0"),
        room_at(1, 4.0, 0.0, "1-d4"),
        room_at(2, 6.0, 0.0, "2-d6"),
        room_at(1, 2.0, 0.0, "1-d2"),
    ];
    let order = paint_order(&objects);
    assert_eq!(room_ids(&order.objects), vec!["1-d0", "1-d2", "1-d4", "2-near0", "2-d6"]);
}

#[test]
fn empty_input_gives_empty_passes() {
    let order = paint_order(&[]);
    assert!(order.floors.is_empty());
    assert!(order.objects.is_empty());
}
