use crate::modifier::number::{minify_angle, short_number};
use crate::modifier::Modifier;
use crate::node::{Node, NodeType, NumberValue};
use squish_shared::byte_stream::Location;

fn dimension_node(text: &str, negative: bool, unit: &str) -> Node {
    let mut value = NumberValue::new(text);
    value.negative = negative;

    Node::new(
        NodeType::Dimension {
            value,
            unit: unit.to_string(),
        },
        Location::default(),
    )
}

/// The percentage position of a color stop list, when it has one
fn stop_percentage(list: &[Node]) -> Option<f64> {
    if list.len() == 2 {
        if let NodeType::Percentage { value } = &*list[1].effective().node_type {
            let mut v = value.value.parse::<f64>().ok()?;
            if value.negative {
                v = -v;
            }
            return Some(v);
        }
    }

    None
}

impl Modifier<'_> {
    /// `linear-gradient()`: angle preminification, direction keywords to
    /// degrees, stop-list reversal when the opposite angle is shorter, and
    /// redundant `0%`/`100%` endpoint positions.
    pub(super) fn rewrite_linear_gradient(&mut self, parameters: &mut Vec<Vec<Node>>) {
        if parameters.is_empty() {
            return;
        }

        self.gradient_direction_to_angle(parameters);
        self.reverse_gradient_when_shorter(parameters);
        drop_redundant_stop_endpoints(parameters);
    }

    fn gradient_direction_to_angle(&mut self, parameters: &mut [Vec<Node>]) {
        let first = &mut parameters[0];

        if first.len() == 1 {
            if let NodeType::Dimension { value, unit } = &mut *first[0].node_type {
                minify_angle(value, unit);
            }
            return;
        }

        // `to <side>` has a fixed degree equivalent
        if first.len() == 2 && first[0].is_ident_value("to") {
            let angle = match &*first[1].node_type {
                NodeType::Ident { value } => match value.as_literal() {
                    Some("top") => Some("0"),
                    Some("bottom") => Some("180"),
                    Some("left") => Some("270"),
                    Some("right") => Some("90"),
                    _ => None,
                },
                _ => None,
            };

            if let Some(angle) = angle {
                *first = vec![dimension_node(angle, false, "deg")];
            }
        }
    }

    /// Rendering the gradient from the opposite end flips the angle by 180
    /// degrees; when that spelling is shorter and every stop position is a
    /// percentage, the stop list is reversed and positions mirror.
    fn reverse_gradient_when_shorter(&mut self, parameters: &mut Vec<Vec<Node>>) {
        if parameters.len() < 3 {
            return;
        }

        let (angle, negative, unit_ok) = match parameters[0].as_slice() {
            [node] => match &*node.node_type {
                NodeType::Dimension { value, unit } if unit == "deg" && value.scientific.is_none() => {
                    match value.value.parse::<f64>() {
                        Ok(v) => (v, value.negative, true),
                        Err(_) => return,
                    }
                }
                _ => (0.0, false, false),
            },
            _ => (0.0, false, false),
        };

        if !unit_ok {
            return;
        }

        let current = if negative { -angle } else { angle };
        let mut opposite = (current + 180.0) % 360.0;
        if opposite < 0.0 {
            opposite += 360.0;
        }

        let current_text_len = usize::from(negative) + short_number(&format!("{angle:.6}")).len();
        let opposite_text = short_number(&format!("{opposite:.6}"));

        if opposite_text.len() >= current_text_len {
            return;
        }

        // Every stop needs a flippable position or none at all
        let stops_ok = parameters[1..].iter().all(|list| {
            list.len() == 1 || stop_percentage(list).is_some()
        });
        if !stops_ok {
            return;
        }

        parameters[0] = vec![dimension_node(&opposite_text, false, "deg")];

        parameters[1..].reverse();
        for list in parameters[1..].iter_mut() {
            if let Some(p) = stop_percentage(list) {
                let flipped = short_number(&format!("{:.6}", 100.0 - p));
                list[1] = Node::new(
                    NodeType::Percentage {
                        value: NumberValue::new(&flipped),
                    },
                    Location::default(),
                );
            }
        }
    }
}

/// A `0%` position on the first stop and a `100%` position on the last are
/// implied, as long as every stop position stays inside 0..100.
fn drop_redundant_stop_endpoints(parameters: &mut [Vec<Node>]) {
    // The first parameter list may be the angle rather than a stop
    let first_stop = match parameters.first().map(Vec::as_slice) {
        Some([node]) if matches!(
            &*node.effective().node_type,
            NodeType::Dimension { unit, .. } if crate::modifier::number::is_angle_unit(unit)
        ) =>
        {
            1
        }
        _ => 0,
    };

    if parameters.len() - first_stop < 2 {
        return;
    }

    let stops = &parameters[first_stop..];
    let in_range = stops.iter().all(|list| match stop_percentage(list) {
        Some(p) => (0.0..=100.0).contains(&p),
        None => list.len() == 1,
    });
    if !in_range {
        return;
    }

    let last = parameters.len() - 1;

    if stop_percentage(&parameters[first_stop]) == Some(0.0) {
        parameters[first_stop].truncate(1);
    }
    if last > first_stop && stop_percentage(&parameters[last]) == Some(100.0) {
        parameters[last].truncate(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::ColorKind;

    fn color(name: &str) -> Node {
        Node::new(
            NodeType::Color {
                kind: ColorKind::PredefinedName,
                value: name.to_string(),
            },
            Location::default(),
        )
    }

    fn percentage(text: &str) -> Node {
        Node::new(
            NodeType::Percentage {
                value: NumberValue::new(text),
            },
            Location::default(),
        )
    }

    #[test]
    fn stop_percentage_reads_the_position() {
        assert_eq!(stop_percentage(&[color("red"), percentage("20")]), Some(20.0));
        assert_eq!(stop_percentage(&[color("red")]), None);
        assert_eq!(stop_percentage(&[color("red"), color("blue")]), None);
    }

    #[test]
    fn endpoints_drop_only_when_all_stops_are_in_range() {
        let mut parameters = vec![
            vec![dimension_node("90", false, "deg")],
            vec![color("red"), percentage("0")],
            vec![color("blue"), percentage("100")],
        ];
        drop_redundant_stop_endpoints(&mut parameters);
        assert_eq!(parameters[1].len(), 1);
        assert_eq!(parameters[2].len(), 1);

        let mut parameters = vec![
            vec![dimension_node("90", false, "deg")],
            vec![color("red"), percentage("0")],
            vec![color("blue"), percentage("110")],
        ];
        drop_redundant_stop_endpoints(&mut parameters);
        assert_eq!(parameters[1].len(), 2);
        assert_eq!(parameters[2].len(), 2);
    }

    #[test]
    fn a_leading_color_stop_is_not_mistaken_for_an_angle() {
        let mut parameters = vec![
            vec![color("red"), percentage("0")],
            vec![color("blue"), percentage("100")],
        ];
        drop_redundant_stop_endpoints(&mut parameters);
        assert_eq!(parameters[0].len(), 1);
        assert_eq!(parameters[1].len(), 1);
    }
}
