//! Label-to-control association.
//!
//! A `label=` candidate names the text a user sees next to a field. The
//! `<label>` itself is never the thing to type into, so once a label is found
//! this module finds the form control it belongs to.

use super::engine::satisfies;
use holdfast_common::locator::Requirement;
use holdfast_common::protocol::{ElementId, ElementSnapshot, Rect, is_inside};

/// Result of attempting to find an associated control.
#[derive(Debug, PartialEq)]
pub enum AssociationResult {
    /// Found an associated control with the given element ID.
    Found(ElementId),
    /// No association was found.
    NoAssociation,
}

const MAX_ADJACENT_ELEMENTS: usize = 5;
const MAX_VERTICAL_GAP_PX: f32 = 50.0;

/// Find the form control a label belongs to.
///
/// Association strategies (in priority order):
/// 1. `for` attribute: `<label for="x">` → control with `id="x"`
/// 2. Nested control: `<label>Text <input></label>` → control inside the label's box
/// 3. Adjacent control: `<label>Text</label><input>` → nearest control on or next to its row
pub fn find_associated_control(
    label: &ElementSnapshot,
    controls: &[ElementSnapshot],
    requirement: Requirement,
) -> AssociationResult {
    if let Some(id) = find_by_for_attribute(label, controls, requirement) {
        return AssociationResult::Found(id);
    }

    if let Some(id) = find_nested_control(label, controls, requirement) {
        return AssociationResult::Found(id);
    }

    if let Some(id) = find_adjacent_control(&label.rect, controls, requirement) {
        return AssociationResult::Found(id);
    }

    AssociationResult::NoAssociation
}

fn find_by_for_attribute(
    label: &ElementSnapshot,
    controls: &[ElementSnapshot],
    requirement: Requirement,
) -> Option<ElementId> {
    let for_id = label.attr("for")?;
    controls
        .iter()
        .find(|c| c.attr("id") == Some(for_id) && satisfies(c, requirement))
        .map(|c| c.id)
}

fn find_nested_control(
    label: &ElementSnapshot,
    controls: &[ElementSnapshot],
    requirement: Requirement,
) -> Option<ElementId> {
    // A label with no box (not rendered) would "contain" every other unrendered control.
    if label.rect.width <= 0.0 || label.rect.height <= 0.0 {
        return None;
    }

    controls
        .iter()
        .find(|c| {
            c.id != label.id && is_inside(&c.rect, &label.rect) && satisfies(c, requirement)
        })
        .map(|c| c.id)
}

/// `<label>Email</label><input>`, and `<input><label>Text</label>` where the
/// control comes first (checkboxes).
fn find_adjacent_control(
    label_rect: &Rect,
    controls: &[ElementSnapshot],
    requirement: Requirement,
) -> Option<ElementId> {
    if label_rect.width <= 0.0 || label_rect.height <= 0.0 {
        return None;
    }

    let mut candidates: Vec<&ElementSnapshot> =
        controls.iter().filter(|c| satisfies(c, requirement)).collect();

    candidates.sort_by(|a, b| {
        let a_dist = calculate_proximity(label_rect, &a.rect);
        let b_dist = calculate_proximity(label_rect, &b.rect);
        a_dist
            .partial_cmp(&b_dist)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    for candidate in candidates.iter().take(MAX_ADJACENT_ELEMENTS) {
        let label_bottom = label_rect.bottom();
        let label_top = label_rect.y;
        let elem_bottom = candidate.rect.bottom();

        let is_same_row = (candidate.rect.y <= label_bottom + MAX_VERTICAL_GAP_PX)
            && (elem_bottom >= label_top - MAX_VERTICAL_GAP_PX);

        let is_below = candidate.rect.y >= label_bottom
            && candidate.rect.y <= label_bottom + MAX_VERTICAL_GAP_PX;

        let is_above = elem_bottom <= label_top && elem_bottom >= label_top - MAX_VERTICAL_GAP_PX;

        if is_same_row || is_below || is_above {
            return Some(candidate.id);
        }
    }

    None
}

/// Lower score means closer. Vertical distance is weighted more heavily so
/// controls on the label's row win over ones in the next column.
fn calculate_proximity(label_rect: &Rect, elem_rect: &Rect) -> f32 {
    let (label_x, label_y) = label_rect.center();
    let (elem_x, elem_y) = elem_rect.center();
    let dy = (label_y - elem_y).abs();
    let dx = (label_x - elem_x).abs();
    dy * 2.0 + dx
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(id: ElementId, tag: &str, rect: Rect) -> ElementSnapshot {
        ElementSnapshot {
            id,
            tag: tag.into(),
            rect,
            visible: true,
            enabled: true,
            ..Default::default()
        }
    }

    fn with_attr(mut e: ElementSnapshot, name: &str, value: &str) -> ElementSnapshot {
        e.attributes.insert(name.to_string(), value.to_string());
        e
    }

    #[test]
    fn test_for_attribute_wins_over_proximity() {
        let label = with_attr(
            element(1, "label", Rect::new(0.0, 0.0, 80.0, 20.0)),
            "for",
            "email",
        );
        let near = element(2, "input", Rect::new(90.0, 0.0, 100.0, 20.0));
        let target = with_attr(
            element(3, "input", Rect::new(0.0, 300.0, 100.0, 20.0)),
            "id",
            "email",
        );

        let result =
            find_associated_control(&label, &[near, target], Requirement::Actionable);
        assert_eq!(result, AssociationResult::Found(3));
    }

    #[test]
    fn test_nested_control() {
        let label = element(1, "label", Rect::new(0.0, 0.0, 200.0, 30.0));
        let outside = element(2, "input", Rect::new(0.0, 40.0, 100.0, 20.0));
        let inside = element(3, "input", Rect::new(150.0, 5.0, 20.0, 20.0));

        let result =
            find_associated_control(&label, &[outside, inside], Requirement::Actionable);
        assert_eq!(result, AssociationResult::Found(3));
    }

    #[test]
    fn test_adjacent_control_below_label() {
        let label = element(1, "label", Rect::new(0.0, 0.0, 80.0, 20.0));
        let far = element(2, "input", Rect::new(0.0, 400.0, 100.0, 20.0));
        let below = element(3, "input", Rect::new(0.0, 30.0, 100.0, 20.0));

        let result = find_associated_control(&label, &[far, below], Requirement::Actionable);
        assert_eq!(result, AssociationResult::Found(3));
    }

    #[test]
    fn test_adjacent_skips_disabled_controls() {
        let label = element(1, "label", Rect::new(0.0, 0.0, 80.0, 20.0));
        let mut disabled = element(2, "input", Rect::new(0.0, 30.0, 100.0, 20.0));
        disabled.enabled = false;

        let result = find_associated_control(&label, &[disabled], Requirement::Actionable);
        assert_eq!(result, AssociationResult::NoAssociation);
    }

    #[test]
    fn test_unrendered_label_has_no_geometry_association() {
        let label = element(1, "label", Rect::default());
        let mut hidden = element(2, "input", Rect::default());
        hidden.visible = false;

        let result = find_associated_control(&label, &[hidden], Requirement::Present);
        assert_eq!(result, AssociationResult::NoAssociation);
    }
}
