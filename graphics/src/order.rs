//! Priority bands and compositing order.

use marionette_core::asset::LayerPriority;

/// Back-to-front band order while the arms are behind the torso.
pub const ARMS_BACK_ORDER: [LayerPriority; 8] = [
    LayerPriority::Background,
    LayerPriority::BelowArms,
    LayerPriority::Arms,
    LayerPriority::AboveArms,
    LayerPriority::BelowBody,
    LayerPriority::Body,
    LayerPriority::AboveBody,
    LayerPriority::Overlay,
];

/// Back-to-front band order while the arms are in front of the torso.
pub const ARMS_FRONT_ORDER: [LayerPriority; 8] = [
    LayerPriority::Background,
    LayerPriority::BelowBody,
    LayerPriority::Body,
    LayerPriority::AboveBody,
    LayerPriority::BelowArms,
    LayerPriority::Arms,
    LayerPriority::AboveArms,
    LayerPriority::Overlay,
];

/// Position of `priority` in the active band order.
pub fn priority_rank(priority: LayerPriority, arms_in_front: bool) -> usize {
    let order = if arms_in_front {
        &ARMS_FRONT_ORDER
    } else {
        &ARMS_BACK_ORDER
    };
    order.iter().position(|&p| p == priority).unwrap_or(order.len())
}

/// Stable sort by band rank; equal ranks keep their relative order.
pub fn sort_by_priority<T, F>(items: &mut [T], arms_in_front: bool, priority: F)
where
    F: Fn(&T) -> LayerPriority,
{
    items.sort_by_key(|item| priority_rank(priority(item), arms_in_front));
}
