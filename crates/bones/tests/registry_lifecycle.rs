//! Integration tests for loader lifecycles driven through the registry
//!
//! These tests verify that:
//! - enable/disable round trips leave the tree as it was
//! - disabling waits for state owners and resumes on its own
//! - image-loaded notifications retire single bones
//! - properties survive detach/reattach through the saved-state store

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use bones::{ElementId, ElementKind, LayoutHost, LoaderRegistry, LoaderState, Retention};
use bones_layout::{ElementTree, PaintLayer, Visibility};
use bones_paint::PaintContext;

/// A feed card: title, avatar image and a nested row with two labels
struct Card {
    tree: ElementTree,
    card: ElementId,
    title: ElementId,
    avatar: ElementId,
    row: ElementId,
    labels: [ElementId; 2],
}

fn card() -> Card {
    let mut tree = ElementTree::new();
    let card = tree.insert_root(ElementKind::Generic);
    let title = tree.insert(card, ElementKind::Text).unwrap();
    let avatar = tree.insert(card, ElementKind::Image).unwrap();
    let row = tree.insert(card, ElementKind::Generic).unwrap();
    let first = tree.insert(row, ElementKind::Text).unwrap();
    let second = tree.insert(row, ElementKind::Text).unwrap();

    tree.set_size(card, 300.0, 160.0);
    tree.set_size(title, 300.0, 18.0);
    tree.set_position(avatar, 0.0, 30.0);
    tree.set_size(avatar, 48.0, 48.0);
    tree.set_position(row, 0.0, 90.0);
    tree.set_size(row, 300.0, 40.0);
    tree.set_size(first, 140.0, 14.0);
    tree.set_position(second, 150.0, 0.0);
    tree.set_size(second, 140.0, 14.0);
    tree.layout_pass();

    Card {
        tree,
        card,
        title,
        avatar,
        row,
        labels: [first, second],
    }
}

fn state(registry: &LoaderRegistry, id: ElementId) -> Option<LoaderState> {
    registry.skeleton(id).map(|drawable| drawable.state())
}

#[test]
fn test_instant_round_trip_restores_tree() {
    let Card {
        mut tree,
        card,
        title,
        avatar,
        ..
    } = card();
    let mut registry = LoaderRegistry::default();
    registry
        .add_skeleton_loader(&tree, card)
        .unwrap()
        .builder()
        .state_transition(false);

    registry.set_skeleton_enabled(&mut tree, card, true).unwrap();
    assert_eq!(state(&registry, card), Some(LoaderState::Enabled));
    assert_eq!(tree.visibility(title), Visibility::Invisible);
    let mut ctx = PaintContext::new();
    assert!(registry.draw(card, &mut ctx));

    registry.set_skeleton_enabled(&mut tree, card, false).unwrap();
    assert_eq!(state(&registry, card), Some(LoaderState::Disabled));
    for id in [title, avatar] {
        assert_eq!(tree.visibility(id), Visibility::Visible);
        assert_eq!(tree.alpha(id), 1.0);
    }
    assert_eq!(tree.foreground(card), PaintLayer::Empty);
    let manager = registry.skeleton(card).map(|drawable| drawable.manager());
    assert_eq!(manager.map(|m| m.listener_count()), Some(0));
    assert_eq!(manager.map(|m| m.skeleton().bone_count()), Some(0));
    assert!(!registry.draw(card, &mut PaintContext::new()));
}

#[test]
fn test_fade_out_over_frames() {
    let Card { mut tree, card, title, .. } = card();
    let mut registry = LoaderRegistry::default();
    registry.set_skeleton_enabled(&mut tree, card, true).unwrap();

    let start = Instant::now();
    registry.tick_at(&mut tree, start);
    registry.set_skeleton_enabled(&mut tree, card, false).unwrap();
    assert_eq!(state(&registry, card), Some(LoaderState::Disabling));

    registry.tick_at(&mut tree, start + Duration::from_millis(100));
    assert!(tree.alpha(title) > 0.0 && tree.alpha(title) < 1.0);

    registry.tick_at(&mut tree, start + Duration::from_millis(400));
    assert_eq!(state(&registry, card), Some(LoaderState::Disabled));
    assert_eq!(tree.alpha(title), 1.0);
}

#[test]
fn test_disable_waits_for_state_owner() {
    let Card {
        mut tree,
        card,
        title,
        avatar,
        ..
    } = card();
    let mut registry = LoaderRegistry::default();
    registry.set_skeleton_enabled(&mut tree, card, true).unwrap();
    assert_eq!(registry.set_bone_state_owner(&tree, avatar, true), Ok(true));

    registry.set_skeleton_enabled(&mut tree, card, false).unwrap();
    registry.tick(&mut tree, 16.0);
    assert_eq!(state(&registry, card), Some(LoaderState::Enabled));
    let waiting = registry.skeleton(card).map(|d| d.properties().is_waiting());
    assert_eq!(waiting, Some(true));
    assert_eq!(tree.visibility(title), Visibility::Invisible);

    registry.set_bone_state_owner(&tree, avatar, false).unwrap();
    registry.tick(&mut tree, 16.0);
    assert_eq!(state(&registry, card), Some(LoaderState::Disabling));
    registry.tick(&mut tree, 300.0);
    assert_eq!(state(&registry, card), Some(LoaderState::Disabled));
    assert_eq!(tree.visibility(title), Visibility::Visible);
}

#[test]
fn test_nested_row_owns_its_labels() {
    let Card {
        mut tree,
        card,
        row,
        labels,
        ..
    } = card();
    let mut registry = LoaderRegistry::default();
    registry.set_skeleton_enabled(&mut tree, card, true).unwrap();
    registry.set_skeleton_enabled(&mut tree, row, true).unwrap();
    assert!(registry.skeleton(row).is_none());

    registry.set_skeleton_enabled(&mut tree, card, false).unwrap();
    registry.tick(&mut tree, 16.0);
    assert_eq!(state(&registry, card), Some(LoaderState::Enabled));

    registry.set_skeleton_enabled(&mut tree, row, false).unwrap();
    registry.tick(&mut tree, 16.0);
    assert_eq!(state(&registry, card), Some(LoaderState::Disabling));
    registry.tick(&mut tree, 300.0);
    for label in labels {
        assert_eq!(tree.alpha(label), 1.0);
    }
}

#[test]
fn test_image_loaded_retires_one_bone() {
    let Card {
        mut tree,
        card,
        title,
        avatar,
        ..
    } = card();
    let mut registry = LoaderRegistry::default();
    registry.set_skeleton_enabled(&mut tree, card, true).unwrap();
    let has_bone = |registry: &LoaderRegistry, id| {
        registry
            .skeleton(card)
            .is_some_and(|d| d.manager().skeleton().bone(id).is_some())
    };
    assert!(has_bone(&registry, avatar));

    registry.notify_image_loaded(&mut tree, avatar);
    registry.tick(&mut tree, 16.0);
    registry.tick(&mut tree, 300.0);

    assert!(!has_bone(&registry, avatar));
    assert!(has_bone(&registry, title));
    assert_eq!(tree.alpha(avatar), 1.0);
    assert_eq!(tree.visibility(title), Visibility::Invisible);
    assert_eq!(state(&registry, card), Some(LoaderState::Enabled));
}

#[test]
fn test_standalone_image_bone() {
    let mut tree = ElementTree::new();
    let avatar = tree.insert_root(ElementKind::Image);
    tree.set_size(avatar, 64.0, 64.0);
    tree.layout_pass();

    let mut registry = LoaderRegistry::default();
    registry.set_bone_enabled(&mut tree, avatar, true).unwrap();
    let drawable = registry.bone(avatar);
    assert_eq!(drawable.map(|d| d.state()), Some(LoaderState::Enabled));
    let height = drawable
        .and_then(|d| d.manager().bone())
        .and_then(|bone| bone.bounds())
        .map(|bounds| bounds.height);
    assert_eq!(height, Some(64.0));

    registry.notify_image_loaded(&mut tree, avatar);
    assert_eq!(
        registry.bone(avatar).map(|d| d.state()),
        Some(LoaderState::Disabling)
    );
    registry.tick(&mut tree, 2500.0);
    assert_eq!(registry.bone(avatar).map(|d| d.state()), Some(LoaderState::Disabled));
}

#[test]
fn test_enable_before_layout_is_deferred() {
    let mut tree = ElementTree::new();
    let card = tree.insert_root(ElementKind::Generic);
    let title = tree.insert(card, ElementKind::Text).unwrap();
    tree.set_size(card, 100.0, 40.0);
    tree.set_size(title, 100.0, 12.0);

    let mut registry = LoaderRegistry::default();
    registry.set_skeleton_enabled(&mut tree, card, true).unwrap();
    assert_eq!(state(&registry, card), Some(LoaderState::Disabled));
    assert_eq!(tree.visibility(title), Visibility::Visible);

    tree.layout_pass();
    registry.on_layout_complete(&mut tree);
    assert_eq!(state(&registry, card), Some(LoaderState::Enabled));
    assert_eq!(tree.visibility(title), Visibility::Invisible);
}

#[test]
fn test_zero_height_leaf_before_first_layout() {
    let mut tree = ElementTree::new();
    let card = tree.insert_root(ElementKind::Generic);
    let label = tree.insert(card, ElementKind::Text).unwrap();
    let sibling = tree.insert(card, ElementKind::Text).unwrap();
    tree.set_size(card, 100.0, 40.0);
    tree.set_size(label, 100.0, 0.0);
    tree.set_position(sibling, 0.0, 20.0);
    tree.set_size(sibling, 100.0, 12.0);

    let mut registry = LoaderRegistry::default();
    registry.set_skeleton_enabled(&mut tree, card, true).unwrap();
    tree.layout_pass();
    registry.on_layout_complete(&mut tree);
    let pending = registry.skeleton(card).map(|d| d.manager().skeleton().is_pending());
    assert_eq!(pending, Some(true));

    tree.layout_pass();
    registry.on_layout_complete(&mut tree);
    assert_eq!(tree.measured_size(label), (100.0, 10.0));
    let bones = registry.skeleton(card).map(|d| {
        let skeleton = d.manager().skeleton();
        (skeleton.bone(label).is_some(), skeleton.bone_count())
    });
    assert_eq!(bones, Some((true, 2)));
}

#[test]
fn test_ignoring_a_fading_leaf_restores_it() {
    let Card {
        mut tree,
        card,
        title,
        avatar,
        ..
    } = card();
    let mut registry = LoaderRegistry::default();
    registry.set_skeleton_enabled(&mut tree, card, true).unwrap();
    registry.set_skeleton_enabled(&mut tree, card, false).unwrap();
    registry.tick(&mut tree, 50.0);
    assert!(tree.alpha(title) > 0.0 && tree.alpha(title) < 1.0);

    assert_eq!(registry.set_ignored(&tree, title, true), Ok(true));
    registry.set_skeleton_enabled(&mut tree, card, true).unwrap();
    assert_eq!(state(&registry, card), Some(LoaderState::Enabled));
    assert_eq!(tree.visibility(title), Visibility::Visible);
    assert_eq!(tree.alpha(title), 1.0);
    assert_eq!(tree.visibility(avatar), Visibility::Invisible);

    registry.set_skeleton_enabled(&mut tree, card, false).unwrap();
    for _ in 0..30 {
        registry.tick(&mut tree, 16.0);
    }
    assert_eq!(state(&registry, card), Some(LoaderState::Disabled));
    assert_eq!(tree.alpha(title), 1.0);
    assert_eq!(tree.alpha(avatar), 1.0);
}

#[test]
fn test_saved_state_survives_reattach() {
    let Card { mut tree, card, .. } = card();
    let mut registry = LoaderRegistry::default();
    registry
        .add_skeleton_loader(&tree, card)
        .unwrap()
        .builder()
        .saved_state(true)
        .state_transition_duration_ms(900)
        .with_shimmer_builder(|rays| rays.count(3));

    registry.set_skeleton_enabled(&mut tree, card, true).unwrap();
    assert!(registry.detach(&mut tree, card));
    assert_eq!(registry.saved_state().retention(card), Some(Retention::Strong));

    let drawable = registry.add_skeleton_loader(&tree, card).unwrap();
    assert_eq!(drawable.properties().state_transition_duration_ms, 900);
    assert_eq!(drawable.properties().shimmer_ray_properties.count, 3);
    assert!(registry.saved_state().is_empty());
}

#[test]
fn test_weak_saved_state_expires() {
    let Card { mut tree, card, .. } = card();
    let mut registry = LoaderRegistry::default();
    registry
        .add_skeleton_loader(&tree, card)
        .unwrap()
        .builder()
        .weak_saved_state(true)
        .state_transition(false);

    registry.set_skeleton_enabled(&mut tree, card, true).unwrap();
    registry.set_skeleton_enabled(&mut tree, card, false).unwrap();
    assert_eq!(registry.saved_state().retention(card), Some(Retention::Transient));
    assert_eq!(registry.expire_transient_state(), 1);
    assert!(registry.saved_state().is_empty());
}

#[test]
fn test_shimmer_listeners_cleared_on_release() {
    let Card { mut tree, card, .. } = card();
    let mut registry = LoaderRegistry::default();
    registry.set_skeleton_enabled(&mut tree, card, true).unwrap();

    let ended = Rc::new(Cell::new(0u32));
    let seen = ended.clone();
    if let Some(drawable) = registry.skeleton_mut(card) {
        drawable.add_animation_listener(None, Some(Box::new(move || seen.set(seen.get() + 1))));
    }
    registry.tick(&mut tree, 16.0);
    registry.set_skeleton_enabled(&mut tree, card, false).unwrap();
    registry.tick(&mut tree, 16.0);
    registry.tick(&mut tree, 300.0);

    assert_eq!(ended.get(), 1);
    let listeners = registry.skeleton(card).map(|d| d.manager().listener_count());
    assert_eq!(listeners, Some(0));
}
