use crate::colors::{name_for_hex, shorten_hex, shortest_hex_for_name};
use crate::modifier::number::{percentage_to_number, short_number};
use crate::modifier::{ModContext, Modifier, Visit};
use crate::node::{ColorKind, Node, NodeType, NumberValue};
use squish_shared::byte_stream::Location;

/// Position of a channel element inside a function's parameter lists
type Channel = (usize, usize);

/// Maps the parameter shapes of `rgb()`/`rgba()`/`hsl()`/`hsla()` onto the
/// three channels and the optional alpha: three or four comma separated
/// lists, or the space-and-slash syntax in one list.
fn channel_positions(parameters: &[Vec<Node>]) -> Option<(Channel, Channel, Channel, Option<Channel>)> {
    match parameters.len() {
        3 if parameters.iter().all(|l| !l.is_empty()) => {
            Some(((0, 0), (1, 0), (2, 0), None))
        }
        4 if parameters.iter().all(|l| !l.is_empty()) => {
            Some(((0, 0), (1, 0), (2, 0), Some((3, 0))))
        }
        1 => {
            let list = &parameters[0];
            match list.len() {
                3 => Some(((0, 0), (0, 1), (0, 2), None)),
                5 if list[3].effective().is_delimiter('/') => {
                    Some(((0, 0), (0, 1), (0, 2), Some((0, 4))))
                }
                _ => None,
            }
        }
        _ => None,
    }
}

fn channel<'a>(parameters: &'a [Vec<Node>], at: Channel) -> &'a Node {
    parameters[at.0][at.1].effective()
}

/// Lowercase hex text for the four channels; full alpha is left off
fn hex_from_rgba(r: u8, g: u8, b: u8, a: u8) -> String {
    let hex = if a == u8::MAX {
        format!("{r:02x}{g:02x}{b:02x}")
    } else {
        format!("{r:02x}{g:02x}{b:02x}{a:02x}")
    };

    shorten_hex(&hex)
}

fn number_node(text: &str) -> Node {
    Node::new(
        NodeType::Number {
            value: NumberValue::new(text),
        },
        Location::default(),
    )
}

impl Modifier<'_> {
    fn transparent_color(&self) -> Node {
        let node_type = if self.flags.use_rgba_hex_notation {
            NodeType::Color {
                kind: ColorKind::HexLiteral,
                value: "0000".to_string(),
            }
        } else {
            NodeType::Color {
                kind: ColorKind::PredefinedName,
                value: "transparent".to_string(),
            }
        };

        Node::new(node_type, Location::default())
    }

    /// Hex literals collapse pairwise; names and hex values swap for
    /// whichever is strictly shorter.
    pub(super) fn visit_color(&mut self, kind: &mut ColorKind, value: &mut String) {
        if !self.flags.minify_colors {
            return;
        }

        match kind {
            ColorKind::PredefinedName => {
                if self.flags.use_rgba_hex_notation && value.as_str() == "transparent" {
                    *kind = ColorKind::HexLiteral;
                    *value = "0000".to_string();
                    return;
                }

                if self.has_context(ModContext::DeclarationPropertyValue) {
                    if let Some(hex) = shortest_hex_for_name(value) {
                        if value.len() > hex.len() + 1 {
                            *kind = ColorKind::HexLiteral;
                            *value = hex;
                        }
                    }
                }
            }
            ColorKind::HexLiteral => {
                if self.has_context(ModContext::DeclarationPropertyValue) {
                    *value = shorten_hex(value);

                    if let Some(name) = name_for_hex(value) {
                        if value.len() + 1 > name.len() {
                            *kind = ColorKind::PredefinedName;
                            *value = name.to_string();
                        }
                    }
                }
            }
        }
    }

    /// `rgb()`/`rgba()` with uniform numeric or percentage channels becomes
    /// a hex color, `transparent`, or a numeric-channel `rgba()`.
    pub(super) fn rewrite_rgb_function(&mut self, parameters: &mut Vec<Vec<Node>>) -> Visit {
        let Some((ri, gi, bi, ai)) = channel_positions(parameters) else {
            return Visit::Keep;
        };

        let channels = [
            channel(parameters, ri),
            channel(parameters, gi),
            channel(parameters, bi),
        ];

        let rgb: [u8; 3] = if channels.iter().all(|c| c.is_number()) {
            let mut out = [0u8; 3];
            for (slot, node) in out.iter_mut().zip(channels.iter()) {
                let Ok(v) = node.as_number().value.parse::<f64>() else {
                    return Visit::Keep;
                };
                *slot = v.min(255.0) as u8;
            }
            out
        } else if channels.iter().all(|c| c.is_percentage()) {
            let mut out = [0u8; 3];
            for (slot, node) in out.iter_mut().zip(channels.iter()) {
                let Ok(v) = node.as_percentage().value.parse::<f64>() else {
                    return Visit::Keep;
                };
                *slot = (2.55 * v).round().min(255.0) as u8;
            }
            out
        } else {
            return Visit::Keep;
        };

        let mut alpha_u8 = u8::MAX;
        let mut alpha_str = String::new();
        let mut alpha_is_percentage = false;
        let mut alpha_source_len = 0;

        if let Some(ai) = ai {
            let alpha = channel(parameters, ai);

            if self.flags.use_rgba_hex_notation {
                if alpha.is_number() {
                    let v = alpha.as_number().value.parse::<f64>().unwrap_or(1.0);
                    alpha_u8 = (255.0 * v).round().min(255.0) as u8;
                } else if alpha.is_percentage() {
                    let v = alpha.as_percentage().value.parse::<f64>().unwrap_or(100.0);
                    alpha_u8 = (2.55 * v).round().min(255.0) as u8;
                }

                if alpha_u8 == 0 {
                    return Visit::Replace(self.transparent_color());
                }
            } else {
                if alpha.is_number() {
                    alpha_str = short_number(&alpha.as_number().value);
                } else if alpha.is_percentage() {
                    let text = alpha.as_percentage().value.clone();
                    alpha_is_percentage = true;
                    alpha_source_len = text.len() + 1;
                    alpha_str = percentage_to_number(&text);
                }

                if alpha_str == "0" {
                    return Visit::Replace(self.transparent_color());
                }
            }
        }

        if self.flags.use_rgba_hex_notation
            || ((alpha_str.is_empty() || alpha_str == "1") && alpha_u8 == u8::MAX)
        {
            let hex = hex_from_rgba(rgb[0], rgb[1], rgb[2], alpha_u8);
            return Visit::Replace(Node::new(
                NodeType::Color {
                    kind: ColorKind::HexLiteral,
                    value: hex,
                },
                Location::default(),
            ));
        }

        // No hex form possible: keep the function but use the numeric
        // channel spellings
        parameters[ri.0][ri.1].set_replacement(number_node(&rgb[0].to_string()));
        parameters[gi.0][gi.1].set_replacement(number_node(&rgb[1].to_string()));
        parameters[bi.0][bi.1].set_replacement(number_node(&rgb[2].to_string()));

        if let Some(ai) = ai {
            if alpha_is_percentage && alpha_source_len > alpha_str.len() {
                parameters[ai.0][ai.1].set_replacement(number_node(&alpha_str));
            }
        }

        Visit::Keep
    }

    /// `hsl()`/`hsla()` recalculates to `rgb()`/`rgba()`, but only replaces
    /// when the result is strictly shorter.
    pub(super) fn rewrite_hsl_function(
        &mut self,
        name: &str,
        parameters: &mut Vec<Vec<Node>>,
    ) -> Visit {
        let Some((hi, si, li, ai)) = channel_positions(parameters) else {
            return Visit::Keep;
        };

        let h_node = channel(parameters, hi);
        let s_node = channel(parameters, si);
        let l_node = channel(parameters, li);

        if !s_node.is_percentage() || !l_node.is_percentage() {
            return Visit::Keep;
        }

        let (h_text, h_unit_len) = match &*h_node.node_type {
            NodeType::Number { value } => (value.value.clone(), 0),
            NodeType::Dimension { value, unit } => (value.value.clone(), unit.len()),
            _ => return Visit::Keep,
        };
        let s_text = s_node.as_percentage().value.clone();
        let l_text = l_node.as_percentage().value.clone();

        let (Ok(h), Ok(s), Ok(l)) = (
            h_text.parse::<f64>(),
            s_text.parse::<f64>(),
            l_text.parse::<f64>(),
        ) else {
            return Visit::Keep;
        };

        let mut a = 255.0f64;
        let mut alpha_is_percentage = false;
        let mut alpha_source_len = 0;

        if let Some(ai) = ai {
            let alpha = channel(parameters, ai);

            if alpha.is_percentage() {
                let text = alpha.as_percentage().value.clone();
                alpha_is_percentage = true;
                alpha_source_len = text.len() + 1;
                a *= percentage_to_number(&text).parse::<f64>().unwrap_or(1.0);
            } else if alpha.is_number() {
                a *= alpha.as_number().value.parse::<f64>().unwrap_or(1.0);
            } else {
                return Visit::Keep;
            }

            if a == 0.0 {
                return Visit::Replace(self.transparent_color());
            }
        }

        let [r, g, b] = hsl_to_rgb(h, s, l);

        let r_str = r.to_string();
        let g_str = g.to_string();
        let b_str = b.to_string();

        let mut rgb_parameters = vec![
            vec![number_node(&r_str)],
            vec![number_node(&g_str)],
            vec![number_node(&b_str)],
        ];

        let mut a_str = String::new();

        if a < 255.0 {
            a /= 255.0;
            a_str = short_number(&format!("{a:.6}"));

            // When the rgba() spelling is not shorter, the hsla() stays
            let hsla_len = h_text.len() + h_unit_len + (s_text.len() + 1) + (l_text.len() + 1)
                + a_str.len();
            let rgba_len = r_str.len() + g_str.len() + b_str.len() + a_str.len();

            if hsla_len <= rgba_len {
                if let Some(ai) = ai {
                    if alpha_is_percentage && alpha_source_len > a_str.len() {
                        parameters[ai.0][ai.1].set_replacement(number_node(&a_str));
                    }
                }
                return Visit::Keep;
            }

            rgb_parameters.push(vec![number_node(&a_str)]);
        }

        let rgb_name = if name.ends_with('a') { "rgba" } else { "rgb" };

        Visit::Replace(Node::new(
            NodeType::Function {
                name: rgb_name.to_string(),
                parameters: rgb_parameters,
            },
            Location::default(),
        ))
    }
}

/// The hue-sextant recalculation used for `hsl()`:
/// C = (1 − |2L−1|)·S, X = C·(1 − |H/60 − 1|), m = L − C/2.
fn hsl_to_rgb(mut h: f64, s: f64, l: f64) -> [u8; 3] {
    let s = s / 100.0;
    let l = l / 100.0;

    if h == 360.0 {
        h = 0.0;
    }

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - (h / 60.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (mut r, mut g, mut b) = (m, m, m);

    if (0.0..60.0).contains(&h) {
        r += c;
        g += x;
    } else if (60.0..120.0).contains(&h) {
        r += x;
        g += c;
    } else if (120.0..180.0).contains(&h) {
        g += c;
        b += x;
    } else if (180.0..240.0).contains(&h) {
        g += x;
        b += c;
    } else if (240.0..300.0).contains(&h) {
        r += x;
        b += c;
    } else if (300.0..360.0).contains(&h) {
        r += c;
        b += x;
    }

    [
        (r * 255.0).round().clamp(0.0, 255.0) as u8,
        (g * 255.0).round().clamp(0.0, 255.0) as u8,
        (b * 255.0).round().clamp(0.0, 255.0) as u8,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_building_shortens() {
        assert_eq!(hex_from_rgba(255, 0, 0, 255), "f00");
        assert_eq!(hex_from_rgba(0, 85, 170, 255), "05a");
        assert_eq!(hex_from_rgba(18, 52, 86, 255), "123456");
        assert_eq!(hex_from_rgba(255, 0, 0, 128), "ff000080");
        assert_eq!(hex_from_rgba(0, 0, 0, 0), "0000");
    }

    #[test]
    fn hsl_primary_colors() {
        assert_eq!(hsl_to_rgb(0.0, 100.0, 50.0), [255, 0, 0]);
        assert_eq!(hsl_to_rgb(120.0, 100.0, 50.0), [0, 255, 0]);
        assert_eq!(hsl_to_rgb(240.0, 100.0, 50.0), [0, 0, 255]);
        assert_eq!(hsl_to_rgb(360.0, 100.0, 50.0), [255, 0, 0]);
        assert_eq!(hsl_to_rgb(0.0, 0.0, 100.0), [255, 255, 255]);
        assert_eq!(hsl_to_rgb(0.0, 0.0, 0.0), [0, 0, 0]);
    }
}
